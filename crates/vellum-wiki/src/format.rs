//! Page content formats and their file extensions.
//!
//! Every page format maps 1:1 to a file extension; the extension is how a
//! tree entry declares its format. The mapping is a closed enumeration with
//! a total, bijective lookup table -- unknown format names fail explicitly
//! instead of falling through an open-ended dynamic dispatch.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::WikiError;

/// The markup format of a wiki page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PageFormat {
    Markdown,
    Textile,
    Rdoc,
    Org,
    Creole,
    Rest,
    Asciidoc,
    Pod,
    Plain,
}

impl PageFormat {
    /// Every supported format, for iteration and exhaustiveness checks.
    pub const ALL: [PageFormat; 9] = [
        Self::Markdown,
        Self::Textile,
        Self::Rdoc,
        Self::Org,
        Self::Creole,
        Self::Rest,
        Self::Asciidoc,
        Self::Pod,
        Self::Plain,
    ];

    /// The file extension registered for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::Textile => "textile",
            Self::Rdoc => "rdoc",
            Self::Org => "org",
            Self::Creole => "creole",
            Self::Rest => "rest",
            Self::Asciidoc => "asciidoc",
            Self::Pod => "pod",
            Self::Plain => "txt",
        }
    }

    /// The inverse of [`extension`](Self::extension).
    ///
    /// Returns `None` for extensions outside the format table; such files
    /// are not pages.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "md" => Some(Self::Markdown),
            "textile" => Some(Self::Textile),
            "rdoc" => Some(Self::Rdoc),
            "org" => Some(Self::Org),
            "creole" => Some(Self::Creole),
            "rest" => Some(Self::Rest),
            "asciidoc" => Some(Self::Asciidoc),
            "pod" => Some(Self::Pod),
            "txt" => Some(Self::Plain),
            _ => None,
        }
    }

    /// The lowercase format name, as entered in an edit form.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Markdown => "markdown",
            Self::Textile => "textile",
            Self::Rdoc => "rdoc",
            Self::Org => "org",
            Self::Creole => "creole",
            Self::Rest => "rest",
            Self::Asciidoc => "asciidoc",
            Self::Pod => "pod",
            Self::Plain => "plain",
        }
    }
}

impl fmt::Display for PageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for PageFormat {
    type Err = WikiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "markdown" => Ok(Self::Markdown),
            "textile" => Ok(Self::Textile),
            "rdoc" => Ok(Self::Rdoc),
            "org" => Ok(Self::Org),
            "creole" => Ok(Self::Creole),
            "rest" => Ok(Self::Rest),
            "asciidoc" => Ok(Self::Asciidoc),
            "pod" => Ok(Self::Pod),
            "plain" => Ok(Self::Plain),
            other => Err(WikiError::UnsupportedFormat(other.to_string())),
        }
    }
}
