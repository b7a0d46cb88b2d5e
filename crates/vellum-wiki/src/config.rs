//! Wiki configuration and commit metadata.
//!
//! All configuration is an explicit struct handed to [`Wiki::new`]
//! (crate::Wiki) at construction time -- there is no process-wide mutable
//! state to configure.

/// Configuration for a [`Wiki`](crate::Wiki) instance.
#[derive(Clone, Debug)]
pub struct WikiConfig {
    /// Base path prefixed to generated page links (never used to address
    /// storage). With `"/wiki"`, the page `Hobbit` links as `/wiki/Hobbit`.
    pub base_path: String,
    /// Committer name substituted when a caller omits one.
    pub committer_name: String,
    /// Committer email substituted when a caller omits one.
    pub committer_email: String,
}

impl Default for WikiConfig {
    fn default() -> Self {
        Self {
            base_path: "/".to_string(),
            committer_name: "Anonymous".to_string(),
            committer_email: "anon@anon.com".to_string(),
        }
    }
}

impl WikiConfig {
    /// Create a config with the default base path and committer identity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base link path.
    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    /// Set the default committer identity.
    pub fn with_committer(
        mut self,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        self.committer_name = name.into();
        self.committer_email = email.into();
        self
    }
}

/// Metadata for a single commit: message plus optional author identity.
#[derive(Clone, Debug)]
pub struct CommitInfo {
    /// The commit message.
    pub message: String,
    /// Author full name; the configured default is used when absent or blank.
    pub author: Option<String>,
    /// Author email; the configured default is used when absent or blank.
    pub email: Option<String>,
}

impl CommitInfo {
    /// Create commit metadata with only a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            author: None,
            email: None,
        }
    }

    /// Attach an author name and email.
    pub fn with_author(mut self, name: impl Into<String>, email: impl Into<String>) -> Self {
        self.author = Some(name.into());
        self.email = Some(email.into());
        self
    }

    /// Resolve the effective author identity against configured defaults.
    ///
    /// Empty and whitespace-only fields count as absent; substituting the
    /// default is configuration, not a silent failure.
    pub fn resolved_author(&self, config: &WikiConfig) -> (String, String) {
        let author = match self.author.as_deref() {
            Some(name) if !name.trim().is_empty() => name.to_string(),
            _ => config.committer_name.clone(),
        };
        let email = match self.email.as_deref() {
            Some(email) if !email.trim().is_empty() => email.to_string(),
            _ => config.committer_email.clone(),
        };
        (author, email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = WikiConfig::default();
        assert_eq!(config.base_path, "/");
        assert_eq!(config.committer_name, "Anonymous");
        assert_eq!(config.committer_email, "anon@anon.com");
    }

    #[test]
    fn builder_overrides() {
        let config = WikiConfig::new()
            .with_base_path("/wiki")
            .with_committer("Frodo", "frodo@shire.example");
        assert_eq!(config.base_path, "/wiki");
        assert_eq!(config.committer_name, "Frodo");
        assert_eq!(config.committer_email, "frodo@shire.example");
    }

    #[test]
    fn missing_author_falls_back_to_defaults() {
        let config = WikiConfig::default();
        let info = CommitInfo::new("edited Home");
        let (author, email) = info.resolved_author(&config);
        assert_eq!(author, "Anonymous");
        assert_eq!(email, "anon@anon.com");
    }

    #[test]
    fn blank_author_counts_as_missing() {
        let config = WikiConfig::default();
        let info = CommitInfo::new("edit").with_author("  ", "");
        let (author, email) = info.resolved_author(&config);
        assert_eq!(author, "Anonymous");
        assert_eq!(email, "anon@anon.com");
    }

    #[test]
    fn explicit_author_wins() {
        let config = WikiConfig::default();
        let info = CommitInfo::new("edit").with_author("Sam", "sam@shire.example");
        let (author, email) = info.resolved_author(&config);
        assert_eq!(author, "Sam");
        assert_eq!(email, "sam@shire.example");
    }
}
