use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use vellum_crypto::ContentHasher;
use vellum_types::ObjectId;

use crate::error::{StoreError, StoreResult};

/// The kind of object stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    /// Raw content: page text, images, arbitrary bytes.
    Blob,
    /// Directory listing mapping names to object references.
    Tree,
    /// Repository snapshot with parent linkage and author metadata.
    Commit,
}

impl ObjectKind {
    fn hasher(self) -> &'static ContentHasher {
        match self {
            Self::Blob => &ContentHasher::BLOB,
            Self::Tree => &ContentHasher::TREE,
            Self::Commit => &ContentHasher::COMMIT,
        }
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Blob => "blob",
            Self::Tree => "tree",
            Self::Commit => "commit",
        })
    }
}

/// The unit of storage: a kind tag plus serialized bytes.
///
/// The store never looks inside `data`; interpretation belongs to the typed
/// decoders below.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredObject {
    /// The type of this object.
    pub kind: ObjectKind,
    /// The serialized bytes of the object.
    pub data: Vec<u8>,
    /// The size of `data` in bytes.
    pub size: u64,
}

impl StoredObject {
    /// Wrap kind and bytes into a storable object.
    pub fn new(kind: ObjectKind, data: Vec<u8>) -> Self {
        let size = data.len() as u64;
        Self { kind, data, size }
    }

    /// The content address of this object, under its kind's hash domain.
    pub fn compute_id(&self) -> ObjectId {
        self.kind.hasher().hash(&self.data)
    }
}

/// Encode a typed object as a `StoredObject` of the given kind.
fn encode<T: Serialize>(kind: ObjectKind, value: &T) -> StoreResult<StoredObject> {
    let data = serde_json::to_vec(value).map_err(|e| StoreError::Codec(e.to_string()))?;
    Ok(StoredObject::new(kind, data))
}

/// Decode a `StoredObject` back into its typed form, checking the kind tag.
fn decode<T: DeserializeOwned>(expected: ObjectKind, obj: &StoredObject) -> StoreResult<T> {
    if obj.kind != expected {
        return Err(StoreError::CorruptObject {
            id: obj.compute_id(),
            reason: format!("expected {expected}, got {}", obj.kind),
        });
    }
    serde_json::from_slice(&obj.data).map_err(|e| StoreError::Codec(e.to_string()))
}

// ---------------------------------------------------------------------------
// Blob
// ---------------------------------------------------------------------------

/// Raw content object. Page text and attached files are both blobs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blob {
    pub data: Vec<u8>,
}

impl Blob {
    /// Wrap raw bytes.
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Convert into a `StoredObject`. Blob bytes are stored as-is, with no
    /// serialization envelope.
    pub fn to_stored_object(&self) -> StoredObject {
        StoredObject::new(ObjectKind::Blob, self.data.clone())
    }

    /// Decode from a `StoredObject`.
    pub fn from_stored_object(obj: &StoredObject) -> StoreResult<Self> {
        if obj.kind != ObjectKind::Blob {
            return Err(StoreError::CorruptObject {
                id: obj.compute_id(),
                reason: format!("expected blob, got {}", obj.kind),
            });
        }
        Ok(Self {
            data: obj.data.clone(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tree
// ---------------------------------------------------------------------------

/// What a tree entry points at.
///
/// Wiki trees hold only regular files and subdirectories; there are no
/// symlinks or mode bits to carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryMode {
    /// A file (page or attached blob).
    Regular,
    /// A subtree (directory of pages).
    Directory,
}

/// A single entry in a tree object.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    /// Whether this entry is a file or a subtree.
    pub mode: EntryMode,
    /// Entry name, case preserved exactly as written.
    pub name: String,
    /// Content address of the referenced object.
    pub object_id: ObjectId,
}

impl TreeEntry {
    /// Create a new tree entry.
    pub fn new(mode: EntryMode, name: impl Into<String>, object_id: ObjectId) -> Self {
        Self {
            mode,
            name: name.into(),
            object_id,
        }
    }

    /// Whether this entry references a subtree.
    pub fn is_directory(&self) -> bool {
        self.mode == EntryMode::Directory
    }
}

/// Directory listing object. Entries are kept sorted by name so that the
/// same logical directory always serializes to the same bytes, and so the
/// same content address.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tree {
    pub entries: Vec<TreeEntry>,
}

impl Tree {
    /// Build a tree, sorting the entries by name.
    pub fn new(mut entries: Vec<TreeEntry>) -> Self {
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Self { entries }
    }

    /// A tree with no entries.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Convert into a `StoredObject` for storage.
    pub fn to_stored_object(&self) -> StoreResult<StoredObject> {
        encode(ObjectKind::Tree, self)
    }

    /// Decode from a `StoredObject`.
    pub fn from_stored_object(obj: &StoredObject) -> StoreResult<Self> {
        decode(ObjectKind::Tree, obj)
    }

    /// Look up an entry by exact name. Case-insensitive matching is naming
    /// policy and belongs to the wiki layer, not the store.
    pub fn get(&self, name: &str) -> Option<&TreeEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the tree has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// CommitObject
// ---------------------------------------------------------------------------

/// A repository snapshot: the root tree at a point in time plus authorship.
///
/// All versioning metadata lives here; the tree carries nothing but names
/// and content references. A commit has zero or one parent, so the history
/// reachable from the head is a single linear chain back to the initial
/// commit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitObject {
    /// Root tree of the snapshot.
    pub tree: ObjectId,
    /// The previous commit, or `None` for the initial commit.
    pub parent: Option<ObjectId>,
    /// Author full name.
    pub author: String,
    /// Author email address.
    pub email: String,
    /// Commit message.
    pub message: String,
    /// Wall-clock milliseconds since the UNIX epoch.
    pub timestamp_ms: u64,
}

impl CommitObject {
    /// Convert into a `StoredObject` for storage.
    pub fn to_stored_object(&self) -> StoreResult<StoredObject> {
        encode(ObjectKind::Commit, self)
    }

    /// Decode from a `StoredObject`.
    pub fn from_stored_object(obj: &StoredObject) -> StoreResult<Self> {
        decode(ObjectKind::Commit, obj)
    }
}
