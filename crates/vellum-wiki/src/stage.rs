//! The edit set: a private, in-progress delta over a base tree.
//!
//! Every write, update, or delete builds its own [`EditSet`] against the
//! tree of the head commit it observed, mutates it, and then materializes a
//! complete new tree bottom-up. The set owns all of its nodes: a nested map
//! keyed by path segment, where a leaf is either pending file content or a
//! deletion marker.
//!
//! The collision detector lives here because deletion markers staged in the
//! same edit must be visible to it -- a pending deletion frees its name for
//! reuse before anything is committed.

use std::collections::BTreeMap;

use vellum_store::{Blob, EntryMode, ObjectStore, StoreError, Tree, TreeEntry};
use vellum_types::ObjectId;

use crate::error::WikiResult;
use crate::name::{extension, fold};

/// A node in the staged delta tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StageNode {
    /// A staged subdirectory of further edits.
    Dir(BTreeMap<String, StageNode>),
    /// Pending file content to write at this path.
    File(Vec<u8>),
    /// A deletion marker: the entry is removed from the next tree.
    Deleted,
}

/// An in-progress, not-yet-committed set of edits against a base tree.
///
/// Discarded on failure; committed exactly once on success. Two concurrent
/// writers never observe each other's edit sets.
#[derive(Clone, Debug, Default)]
pub struct EditSet {
    /// Root tree of the commit this edit is based on (`None` for an unborn
    /// repository).
    base: Option<ObjectId>,
    /// The staged delta, keyed by path segment.
    root: BTreeMap<String, StageNode>,
}

impl EditSet {
    /// Start an empty edit set against the given base root tree.
    pub fn new(base: Option<ObjectId>) -> Self {
        Self {
            base,
            root: BTreeMap::new(),
        }
    }

    /// The base root tree this edit is staged against.
    pub fn base(&self) -> Option<ObjectId> {
        self.base
    }

    /// Returns `true` if nothing has been staged yet.
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Stage file content at a slash-separated path, creating intermediate
    /// directory nodes as needed. Replaces any previously staged node at the
    /// same path.
    pub fn add(&mut self, path: &str, data: Vec<u8>) {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let Some((file, dirs)) = segments.split_last() else {
            return;
        };
        let map = descend_delta(&mut self.root, dirs);
        map.insert((*file).to_string(), StageNode::File(data));
    }

    /// Stage a deletion marker at a slash-separated path.
    pub fn delete(&mut self, path: &str) {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let Some((file, dirs)) = segments.split_last() else {
            return;
        };
        let map = descend_delta(&mut self.root, dirs);
        map.insert((*file).to_string(), StageNode::Deleted);
    }

    /// Check whether `filename` is already taken in directory `dir`
    /// (`""` for the root), by case/extension-insensitive comparison.
    ///
    /// Siblings come from the base tree plus files staged in this edit set;
    /// a sibling whose folded name is freed by a deletion marker staged here
    /// does not count. With `allow_same_ext`, a sibling whose extension
    /// equals the candidate's exactly is tolerated (the rename-in-place
    /// case).
    ///
    /// Returns the conflicting existing filename, or `None` if the path is
    /// free.
    pub fn path_is_taken(
        &self,
        store: &dyn ObjectStore,
        dir: &str,
        filename: &str,
        allow_same_ext: bool,
    ) -> WikiResult<Option<String>> {
        let segments: Vec<&str> = dir.split('/').filter(|s| !s.is_empty()).collect();

        let mut siblings: Vec<String> = Vec::new();
        if !self.dir_removed(&segments) {
            if let Some(base) = self.base {
                let root = load_tree(store, &base)?;
                if let Some((tree, _)) = descend(store, &root, &segments)? {
                    siblings.extend(
                        tree.entries
                            .iter()
                            .filter(|e| !e.is_directory())
                            .map(|e| e.name.clone()),
                    );
                }
            }
        }
        if let Some(map) = self.dir_map(&segments) {
            for (staged, node) in map {
                if matches!(node, StageNode::File(_)) && !siblings.iter().any(|s| s == staged) {
                    siblings.push(staged.clone());
                }
            }
        }

        let target = fold(filename);
        let target_ext = extension(filename);
        for sibling in siblings {
            if self.frees_name(&segments, &sibling) {
                continue;
            }
            if fold(&sibling) != target {
                continue;
            }
            if allow_same_ext && extension(&sibling) == target_ext {
                continue;
            }
            return Ok(Some(sibling));
        }
        Ok(None)
    }

    /// Build the complete new root tree: base entries merged with this
    /// delta, blobs written for staged files, directories rebuilt bottom-up,
    /// and directories left empty by deletions pruned. Sibling content the
    /// delta never touched is carried over untouched.
    pub fn materialize(&self, store: &dyn ObjectStore) -> WikiResult<ObjectId> {
        let base_tree = match self.base {
            Some(id) => Some(load_tree(store, &id)?),
            None => None,
        };
        match build_tree(store, base_tree.as_ref(), &self.root)? {
            Some(id) => Ok(id),
            // Everything was deleted: the root becomes an empty tree.
            None => Ok(store.write(&Tree::empty().to_stored_object()?)?),
        }
    }

    /// Whether a deletion marker staged at `dir` frees the folded name of
    /// `filename` for reuse within this same edit.
    fn frees_name(&self, dir: &[&str], filename: &str) -> bool {
        let Some(map) = self.dir_map(dir) else {
            return false;
        };
        let target = fold(filename);
        map.iter()
            .any(|(name, node)| matches!(node, StageNode::Deleted) && fold(name) == target)
    }

    /// The staged delta map at `dir`, if one exists.
    fn dir_map(&self, dir: &[&str]) -> Option<&BTreeMap<String, StageNode>> {
        let mut map = &self.root;
        for segment in dir {
            match map.get(*segment) {
                Some(StageNode::Dir(sub)) => map = sub,
                _ => return None,
            }
        }
        Some(map)
    }

    /// Whether some prefix of `dir` is shadowed by a staged deletion or
    /// file, making the base directory unreachable in the next tree.
    fn dir_removed(&self, dir: &[&str]) -> bool {
        let mut map = &self.root;
        for segment in dir {
            match map.get(*segment) {
                Some(StageNode::Dir(sub)) => map = sub,
                Some(_) => return true,
                None => return false,
            }
        }
        false
    }
}

/// Walk (and create) delta directory nodes down to the parent of a leaf.
fn descend_delta<'a>(
    root: &'a mut BTreeMap<String, StageNode>,
    dirs: &[&str],
) -> &'a mut BTreeMap<String, StageNode> {
    let mut map = root;
    for segment in dirs {
        let node = map
            .entry((*segment).to_string())
            .or_insert_with(|| StageNode::Dir(BTreeMap::new()));
        if !matches!(node, StageNode::Dir(_)) {
            *node = StageNode::Dir(BTreeMap::new());
        }
        map = match node {
            StageNode::Dir(sub) => sub,
            _ => unreachable!("node was just normalized to a directory"),
        };
    }
    map
}

/// Merge one directory level of base entries with the delta and write the
/// resulting tree. Returns `None` when the directory ends up empty.
fn build_tree(
    store: &dyn ObjectStore,
    base: Option<&Tree>,
    delta: &BTreeMap<String, StageNode>,
) -> WikiResult<Option<ObjectId>> {
    let mut entries: BTreeMap<String, TreeEntry> = base
        .map(|tree| {
            tree.entries
                .iter()
                .map(|e| (e.name.clone(), e.clone()))
                .collect()
        })
        .unwrap_or_default();

    for (name, node) in delta {
        match node {
            StageNode::Deleted => {
                entries.remove(name);
            }
            StageNode::File(data) => {
                let blob = Blob::new(data.clone());
                let id = store.write(&blob.to_stored_object())?;
                entries.insert(
                    name.clone(),
                    TreeEntry::new(EntryMode::Regular, name.clone(), id),
                );
            }
            StageNode::Dir(sub) => {
                let base_sub = match entries.get(name) {
                    Some(entry) if entry.is_directory() => {
                        Some(load_tree(store, &entry.object_id)?)
                    }
                    _ => None,
                };
                match build_tree(store, base_sub.as_ref(), sub)? {
                    Some(id) => {
                        entries.insert(
                            name.clone(),
                            TreeEntry::new(EntryMode::Directory, name.clone(), id),
                        );
                    }
                    None => {
                        entries.remove(name);
                    }
                }
            }
        }
    }

    if entries.is_empty() {
        return Ok(None);
    }
    let tree = Tree::new(entries.into_values().collect());
    Ok(Some(store.write(&tree.to_stored_object()?)?))
}

/// Load and decode a tree object, treating absence as corruption: a tree
/// referenced by a commit or parent tree must exist.
pub(crate) fn load_tree(store: &dyn ObjectStore, id: &ObjectId) -> WikiResult<Tree> {
    let obj = store.read(id)?.ok_or(StoreError::NotFound(*id))?;
    Ok(Tree::from_stored_object(&obj)?)
}

/// Descend directory segments case-insensitively from `root`.
///
/// Returns the terminal tree plus the actual stored segment names traversed,
/// or `None` when an intermediate segment does not exist.
pub(crate) fn descend(
    store: &dyn ObjectStore,
    root: &Tree,
    segments: &[&str],
) -> WikiResult<Option<(Tree, Vec<String>)>> {
    let mut tree = root.clone();
    let mut actual = Vec::with_capacity(segments.len());
    for segment in segments {
        let folded = segment.to_lowercase();
        let Some(entry) = tree
            .entries
            .iter()
            .find(|e| e.is_directory() && e.name.to_lowercase() == folded)
            .cloned()
        else {
            return Ok(None);
        };
        tree = load_tree(store, &entry.object_id)?;
        actual.push(entry.name);
    }
    Ok(Some((tree, actual)))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use vellum_store::InMemoryObjectStore;

    use super::*;

    /// Build a base tree in the store from (path, content) pairs and return
    /// its root id.
    fn seed_tree(store: &dyn ObjectStore, files: &[(&str, &str)]) -> ObjectId {
        let mut edit = EditSet::new(None);
        for (path, content) in files {
            edit.add(path, content.as_bytes().to_vec());
        }
        edit.materialize(store).unwrap()
    }

    fn read_names(store: &dyn ObjectStore, tree_id: &ObjectId) -> Vec<String> {
        let tree = load_tree(store, tree_id).unwrap();
        tree.entries.iter().map(|e| e.name.clone()).collect()
    }

    // -----------------------------------------------------------------------
    // Staging and materialization
    // -----------------------------------------------------------------------

    #[test]
    fn empty_edit_set_reproduces_base() {
        let store = Arc::new(InMemoryObjectStore::new());
        let base = seed_tree(&*store, &[("Home.md", "home")]);

        let edit = EditSet::new(Some(base));
        assert!(edit.is_empty());
        let rebuilt = edit.materialize(&*store).unwrap();
        assert_eq!(rebuilt, base);
    }

    #[test]
    fn add_creates_nested_directories() {
        let store = Arc::new(InMemoryObjectStore::new());
        let mut edit = EditSet::new(None);
        edit.add("docs/guides/Intro.md", b"intro".to_vec());

        let root_id = edit.materialize(&*store).unwrap();
        let root = load_tree(&*store, &root_id).unwrap();
        assert_eq!(root.len(), 1);
        assert_eq!(root.entries[0].name, "docs");
        assert!(root.entries[0].is_directory());

        let docs = load_tree(&*store, &root.entries[0].object_id).unwrap();
        assert_eq!(docs.entries[0].name, "guides");
    }

    #[test]
    fn untouched_siblings_survive() {
        let store = Arc::new(InMemoryObjectStore::new());
        let base = seed_tree(&*store, &[("Home.md", "home"), ("About.md", "about")]);

        let mut edit = EditSet::new(Some(base));
        edit.add("News.md", b"news".to_vec());
        let root_id = edit.materialize(&*store).unwrap();

        let mut names = read_names(&*store, &root_id);
        names.sort();
        assert_eq!(names, ["About.md", "Home.md", "News.md"]);
    }

    #[test]
    fn delete_removes_entry() {
        let store = Arc::new(InMemoryObjectStore::new());
        let base = seed_tree(&*store, &[("Home.md", "home"), ("Old.md", "old")]);

        let mut edit = EditSet::new(Some(base));
        edit.delete("Old.md");
        let root_id = edit.materialize(&*store).unwrap();

        assert_eq!(read_names(&*store, &root_id), ["Home.md"]);
    }

    #[test]
    fn empty_directories_are_pruned() {
        let store = Arc::new(InMemoryObjectStore::new());
        let base = seed_tree(&*store, &[("docs/Note.md", "note"), ("Home.md", "home")]);

        let mut edit = EditSet::new(Some(base));
        edit.delete("docs/Note.md");
        let root_id = edit.materialize(&*store).unwrap();

        assert_eq!(read_names(&*store, &root_id), ["Home.md"]);
    }

    #[test]
    fn deleting_everything_yields_empty_root() {
        let store = Arc::new(InMemoryObjectStore::new());
        let base = seed_tree(&*store, &[("Home.md", "home")]);

        let mut edit = EditSet::new(Some(base));
        edit.delete("Home.md");
        let root_id = edit.materialize(&*store).unwrap();

        assert!(load_tree(&*store, &root_id).unwrap().is_empty());
    }

    #[test]
    fn add_then_delete_same_path_deletes() {
        let store = Arc::new(InMemoryObjectStore::new());
        let mut edit = EditSet::new(None);
        edit.add("Draft.md", b"draft".to_vec());
        edit.delete("Draft.md");

        let root_id = edit.materialize(&*store).unwrap();
        assert!(load_tree(&*store, &root_id).unwrap().is_empty());
    }

    // -----------------------------------------------------------------------
    // Collision detection
    // -----------------------------------------------------------------------

    #[test]
    fn exact_duplicate_is_taken() {
        let store = Arc::new(InMemoryObjectStore::new());
        let base = seed_tree(&*store, &[("Home.md", "home")]);

        let edit = EditSet::new(Some(base));
        let taken = edit.path_is_taken(&*store, "", "Home.md", false).unwrap();
        assert_eq!(taken, Some("Home.md".to_string()));
    }

    #[test]
    fn case_fold_collides() {
        let store = Arc::new(InMemoryObjectStore::new());
        let base = seed_tree(&*store, &[("Alpha.md", "a")]);

        let edit = EditSet::new(Some(base));
        let taken = edit.path_is_taken(&*store, "", "alpha.md", false).unwrap();
        assert_eq!(taken, Some("Alpha.md".to_string()));
    }

    #[test]
    fn extension_fold_collides_across_formats() {
        let store = Arc::new(InMemoryObjectStore::new());
        let base = seed_tree(&*store, &[("Guide.md", "g")]);

        let edit = EditSet::new(Some(base));
        let taken = edit.path_is_taken(&*store, "", "Guide.org", false).unwrap();
        assert_eq!(taken, Some("Guide.md".to_string()));
    }

    #[test]
    fn different_folded_names_are_free() {
        let store = Arc::new(InMemoryObjectStore::new());
        let base = seed_tree(&*store, &[("Alpha.md", "a")]);

        let edit = EditSet::new(Some(base));
        assert!(edit.path_is_taken(&*store, "", "Beta.md", false).unwrap().is_none());
    }

    #[test]
    fn pending_deletion_frees_the_name() {
        let store = Arc::new(InMemoryObjectStore::new());
        let base = seed_tree(&*store, &[("Foo.md", "foo")]);

        let mut edit = EditSet::new(Some(base));
        edit.delete("Foo.md");
        // The same atomic edit may now reuse the folded slot.
        assert!(edit.path_is_taken(&*store, "", "foo.md", false).unwrap().is_none());
    }

    #[test]
    fn allow_same_ext_tolerates_matching_extension() {
        let store = Arc::new(InMemoryObjectStore::new());
        let base = seed_tree(&*store, &[("Home.md", "home")]);

        let edit = EditSet::new(Some(base));
        assert!(edit.path_is_taken(&*store, "", "home.md", true).unwrap().is_none());
        // A different extension on the same folded name still collides.
        let taken = edit.path_is_taken(&*store, "", "home.org", true).unwrap();
        assert_eq!(taken, Some("Home.md".to_string()));
    }

    #[test]
    fn staged_addition_occupies_its_slot() {
        let store = Arc::new(InMemoryObjectStore::new());
        let mut edit = EditSet::new(None);
        edit.add("New.md", b"new".to_vec());

        let taken = edit.path_is_taken(&*store, "", "new.md", false).unwrap();
        assert_eq!(taken, Some("New.md".to_string()));
    }

    #[test]
    fn collision_scoped_to_directory() {
        let store = Arc::new(InMemoryObjectStore::new());
        let base = seed_tree(&*store, &[("docs/Guide.md", "g")]);

        let edit = EditSet::new(Some(base));
        // Root is free; the docs directory is not.
        assert!(edit.path_is_taken(&*store, "", "Guide.md", false).unwrap().is_none());
        let taken = edit.path_is_taken(&*store, "docs", "guide.md", false).unwrap();
        assert_eq!(taken, Some("Guide.md".to_string()));
    }

    #[test]
    fn directory_lookup_folds_case() {
        let store = Arc::new(InMemoryObjectStore::new());
        let base = seed_tree(&*store, &[("Docs/Guide.md", "g")]);

        let edit = EditSet::new(Some(base));
        let taken = edit.path_is_taken(&*store, "docs", "guide.md", false).unwrap();
        assert_eq!(taken, Some("Guide.md".to_string()));
    }

    #[test]
    fn absent_directory_is_free() {
        let store = Arc::new(InMemoryObjectStore::new());
        let base = seed_tree(&*store, &[("Home.md", "home")]);

        let edit = EditSet::new(Some(base));
        assert!(edit
            .path_is_taken(&*store, "no/such/dir", "Home.md", false)
            .unwrap()
            .is_none());
    }

    // -----------------------------------------------------------------------
    // Store-walk helpers
    // -----------------------------------------------------------------------

    #[test]
    fn descend_reports_actual_segment_case() {
        let store = Arc::new(InMemoryObjectStore::new());
        let root_id = seed_tree(&*store, &[("Docs/Deep/Page.md", "p")]);
        let root = load_tree(&*store, &root_id).unwrap();

        let (tree, actual) = descend(&*store, &root, &["docs", "DEEP"]).unwrap().unwrap();
        assert_eq!(actual, ["Docs", "Deep"]);
        assert_eq!(tree.entries[0].name, "Page.md");
    }

    #[test]
    fn descend_missing_segment_is_none() {
        let store = Arc::new(InMemoryObjectStore::new());
        let root_id = seed_tree(&*store, &[("Docs/Page.md", "p")]);
        let root = load_tree(&*store, &root_id).unwrap();

        assert!(descend(&*store, &root, &["archive"]).unwrap().is_none());
    }
}
