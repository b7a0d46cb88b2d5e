use vellum_types::ObjectId;

/// Domain-separated BLAKE3 content hasher.
///
/// Each hasher carries a domain context (e.g. `"vellum-blob-v1"`) fed to
/// BLAKE3's derive-key mode, so identical bytes stored as different object
/// kinds never share an id. A page blob whose bytes happen to equal a
/// serialized commit still gets its own address.
pub struct ContentHasher {
    domain: &'static str,
}

impl ContentHasher {
    /// Hasher for page and file blobs.
    pub const BLOB: Self = Self::new("vellum-blob-v1");
    /// Hasher for directory tree objects.
    pub const TREE: Self = Self::new("vellum-tree-v1");
    /// Hasher for commit objects.
    pub const COMMIT: Self = Self::new("vellum-commit-v1");

    /// Create a hasher with a custom domain context.
    pub const fn new(domain: &'static str) -> Self {
        Self { domain }
    }

    /// Hash raw bytes under this hasher's domain.
    pub fn hash(&self, data: &[u8]) -> ObjectId {
        let mut hasher = blake3::Hasher::new_derive_key(self.domain);
        hasher.update(data);
        ObjectId::from_hash(*hasher.finalize().as_bytes())
    }

    /// Hash a serializable value by its canonical JSON encoding.
    pub fn hash_json<T: serde::Serialize>(&self, value: &T) -> Result<ObjectId, HasherError> {
        let encoded =
            serde_json::to_vec(value).map_err(|e| HasherError::Serialization(e.to_string()))?;
        Ok(self.hash(&encoded))
    }

    /// Whether `data` hashes to `expected` under this domain.
    pub fn verify(&self, data: &[u8], expected: &ObjectId) -> bool {
        self.hash(data) == *expected
    }

    /// The domain context used by this hasher.
    pub fn domain(&self) -> &str {
        self.domain
    }
}

/// Errors from hashing operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum HasherError {
    #[error("serialization error: {0}")]
    Serialization(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rehashing_reproduces_the_id() {
        let page = b"# Welcome\n\nEdit this page.\n";
        assert_eq!(ContentHasher::BLOB.hash(page), ContentHasher::BLOB.hash(page));
        assert!(ContentHasher::BLOB.verify(page, &ContentHasher::BLOB.hash(page)));
    }

    #[test]
    fn domains_partition_the_id_space() {
        let bytes = b"identical bytes";
        let ids = [
            ContentHasher::BLOB.hash(bytes),
            ContentHasher::TREE.hash(bytes),
            ContentHasher::COMMIT.hash(bytes),
        ];
        assert_ne!(ids[0], ids[1]);
        assert_ne!(ids[1], ids[2]);
        assert_ne!(ids[0], ids[2]);
    }

    #[test]
    fn verify_catches_tampering() {
        let id = ContentHasher::TREE.hash(b"entries");
        assert!(!ContentHasher::TREE.verify(b"entries, edited", &id));
        // Same bytes under another domain do not verify either.
        assert!(!ContentHasher::BLOB.verify(b"entries", &id));
    }

    #[test]
    fn json_hashing_is_stable() {
        #[derive(serde::Serialize)]
        struct Entry<'a> {
            name: &'a str,
        }
        let entry = Entry { name: "Home.md" };
        assert_eq!(
            ContentHasher::TREE.hash_json(&entry).unwrap(),
            ContentHasher::TREE.hash_json(&entry).unwrap()
        );
    }

    #[test]
    fn custom_domain_is_its_own_universe() {
        let custom = ContentHasher::new("vellum-test-v1");
        assert_eq!(custom.domain(), "vellum-test-v1");
        assert_ne!(custom.hash(b"x"), ContentHasher::BLOB.hash(b"x"));
    }
}
