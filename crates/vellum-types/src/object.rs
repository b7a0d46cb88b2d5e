use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Length of an object id in bytes (a full BLAKE3 digest).
pub const ID_LEN: usize = 32;

/// Content-addressed identifier for any stored object.
///
/// An `ObjectId` is the BLAKE3 digest of an object's serialized form,
/// domain-separated by object kind (see `vellum-crypto`). The commit ids the
/// wiki hands out in page versions and history listings are `ObjectId`s of
/// commit objects, rendered as hex.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId([u8; ID_LEN]);

impl ObjectId {
    /// Hash raw bytes into an id, without domain separation.
    pub fn from_bytes(data: &[u8]) -> Self {
        Self(*blake3::hash(data).as_bytes())
    }

    /// Wrap a digest that was already computed elsewhere.
    pub const fn from_hash(digest: [u8; ID_LEN]) -> Self {
        Self(digest)
    }

    /// The all-zero id, standing in for "no object".
    pub const fn null() -> Self {
        Self([0u8; ID_LEN])
    }

    /// Whether this is the null id.
    pub fn is_null(&self) -> bool {
        self.0.iter().all(|&b| b == 0)
    }

    /// The raw digest.
    pub fn as_bytes(&self) -> &[u8; ID_LEN] {
        &self.0
    }

    /// Full lowercase hex form, 64 characters.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Abbreviated hex form for log lines and history summaries.
    pub fn short_hex(&self) -> String {
        hex::encode(&self.0[..4])
    }

    /// Parse the hex form back into an id, as received in a version URL.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let decoded = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        let digest: [u8; ID_LEN] =
            decoded
                .as_slice()
                .try_into()
                .map_err(|_| TypeError::InvalidLength {
                    expected: ID_LEN,
                    actual: decoded.len(),
                })?;
        Ok(Self(digest))
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.short_hex())
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn same_content_same_id() {
        assert_eq!(
            ObjectId::from_bytes(b"# Home\n"),
            ObjectId::from_bytes(b"# Home\n")
        );
    }

    #[test]
    fn case_variants_hash_apart() {
        // Folding is naming policy, not hashing policy.
        assert_ne!(ObjectId::from_bytes(b"Home"), ObjectId::from_bytes(b"home"));
    }

    #[test]
    fn null_sentinel() {
        assert!(ObjectId::null().is_null());
        assert!(!ObjectId::from_bytes(b"anything").is_null());
    }

    #[test]
    fn hex_parses_back_to_itself() {
        let id = ObjectId::from_bytes(b"Sidebar.md");
        assert_eq!(ObjectId::from_hex(&id.to_hex()).unwrap(), id);
    }

    #[test]
    fn hex_rejects_garbage_and_truncation() {
        assert!(matches!(
            ObjectId::from_hex("zzzz"),
            Err(TypeError::InvalidHex(_))
        ));
        assert!(matches!(
            ObjectId::from_hex("abcdef"),
            Err(TypeError::InvalidLength {
                expected: 32,
                actual: 3
            })
        ));
    }

    #[test]
    fn display_and_short_forms() {
        let id = ObjectId::from_bytes(b"v1");
        assert_eq!(format!("{id}"), id.to_hex());
        assert_eq!(id.to_hex().len(), 64);
        assert!(id.to_hex().starts_with(&id.short_hex()));
        assert_eq!(id.short_hex().len(), 8);
    }

    #[test]
    fn serde_json_roundtrip() {
        let id = ObjectId::from_bytes(b"commit");
        let parsed: ObjectId =
            serde_json::from_str(&serde_json::to_string(&id).unwrap()).unwrap();
        assert_eq!(parsed, id);
    }

    proptest! {
        #[test]
        fn any_digest_survives_hex_roundtrip(digest in prop::array::uniform32(any::<u8>())) {
            let id = ObjectId::from_hash(digest);
            prop_assert_eq!(ObjectId::from_hex(&id.to_hex()).unwrap(), id);
        }
    }
}
