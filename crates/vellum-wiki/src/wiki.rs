//! The wiki: the top-level API over the object and ref stores.
//!
//! Reads (resolve, list, log, diff) never mutate and always observe an
//! immutable commit snapshot. Mutations (write, update, delete) each build a
//! private [`EditSet`] against the head they observed, run collision
//! detection, materialize a complete new tree, and commit with the observed
//! head as parent. The commit step is the only serialized operation: it
//! compare-and-sets the head ref and fails with [`WikiError::Conflict`] if
//! another writer got there first. Either a new commit is produced or
//! nothing changes.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::debug;
use vellum_diff::{diff_blobs, BlobDiff};
use vellum_refs::{RefError, RefStore};
use vellum_store::{Blob, CommitObject, ObjectStore, StoreError, Tree};
use vellum_types::ObjectId;

use crate::config::{CommitInfo, WikiConfig};
use crate::error::{WikiError, WikiResult};
use crate::format::PageFormat;
use crate::markup::Markup;
use crate::name::{canonicalize, extension, fold, strip_extension, valid_page_name};
use crate::page::{Page, Version, WikiFile};
use crate::stage::{descend, load_tree, EditSet};

/// Default history page size.
pub const DEFAULT_PER_PAGE: usize = 20;

/// Pagination window for history queries.
///
/// Page numbers below 1 clamp to 1; pages past the end of history yield an
/// empty sequence, not an error.
#[derive(Clone, Debug)]
pub struct LogOptions {
    /// 1-based page number.
    pub page: usize,
    /// Maximum entries per page.
    pub per_page: usize,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

/// The root handle of a wiki repository.
///
/// Stateless between calls except for configuration: every operation
/// re-reads the head and resolves against an immutable snapshot.
pub struct Wiki {
    store: Arc<dyn ObjectStore>,
    refs: Arc<dyn RefStore>,
    config: WikiConfig,
}

impl Wiki {
    /// Open a wiki over the given stores.
    pub fn new(store: Arc<dyn ObjectStore>, refs: Arc<dyn RefStore>, config: WikiConfig) -> Self {
        Self {
            store,
            refs,
            config,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &WikiConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Resolution
    // -----------------------------------------------------------------------

    /// Resolve a page by human or canonical name.
    ///
    /// `version` is a hex commit id; `None` means the current head. Returns
    /// `Ok(None)` when the version, an intermediate directory, or the page
    /// itself does not exist -- absence is an outcome, not an error.
    /// Matching is case-insensitive on every path segment and
    /// extension-insensitive on the final one.
    pub fn page(&self, name: &str, version: Option<&str>) -> WikiResult<Option<Page>> {
        let Some((commit_id, commit)) = self.commit_at(version)? else {
            return Ok(None);
        };
        let (dirs, base) = split_name(name);
        if base.is_empty() {
            return Ok(None);
        }
        let root = load_tree(&*self.store, &commit.tree)?;
        let dir_refs: Vec<&str> = dirs.iter().map(String::as_str).collect();
        let Some((tree, actual_dirs)) = descend(&*self.store, &root, &dir_refs)? else {
            return Ok(None);
        };

        let target = fold(&base);
        let stamp = Version::from_commit(commit_id, &commit);
        for entry in &tree.entries {
            if entry.is_directory() || !valid_page_name(&entry.name) {
                continue;
            }
            if fold(&entry.name) != target {
                continue;
            }
            let Some(format) = extension(&entry.name).and_then(PageFormat::from_extension) else {
                continue;
            };
            let data = self.read_blob(&entry.object_id)?;
            return Ok(Some(Page {
                name: strip_extension(&entry.name).to_string(),
                path: join_path(&actual_dirs, &entry.name),
                format,
                data,
                version: Some(stamp),
            }));
        }
        Ok(None)
    }

    /// Resolve a non-page file (an image, an attachment) by pathname.
    ///
    /// Same resolution rules as [`page`](Self::page), but the full filename
    /// is matched case-insensitively without extension stripping and no
    /// format semantics apply.
    pub fn file(&self, name: &str, version: Option<&str>) -> WikiResult<Option<WikiFile>> {
        let Some((commit_id, commit)) = self.commit_at(version)? else {
            return Ok(None);
        };
        let segments: Vec<&str> = name.split('/').filter(|s| !s.is_empty()).collect();
        let Some((filename, dirs)) = segments.split_last() else {
            return Ok(None);
        };
        let root = load_tree(&*self.store, &commit.tree)?;
        let Some((tree, actual_dirs)) = descend(&*self.store, &root, dirs)? else {
            return Ok(None);
        };

        let folded = filename.to_lowercase();
        let stamp = Version::from_commit(commit_id, &commit);
        for entry in &tree.entries {
            if entry.is_directory() || entry.name.to_lowercase() != folded {
                continue;
            }
            let data = self.read_blob(&entry.object_id)?;
            return Ok(Some(WikiFile {
                name: entry.name.clone(),
                path: join_path(&actual_dirs, &entry.name),
                data,
                version: Some(stamp),
            }));
        }
        Ok(None)
    }

    /// List every page under a commit's tree as a flat sequence.
    ///
    /// Order follows tree iteration and is not guaranteed stable across
    /// backends; the result is set-equal across repeated calls on the same
    /// commit. An unknown version yields an empty list.
    pub fn pages(&self, version: Option<&str>) -> WikiResult<Vec<Page>> {
        let Some((commit_id, commit)) = self.commit_at(version)? else {
            return Ok(Vec::new());
        };
        let root = load_tree(&*self.store, &commit.tree)?;
        let stamp = Version::from_commit(commit_id, &commit);
        let mut pages = Vec::new();
        self.collect_pages(&root, "", &stamp, &mut pages)?;
        Ok(pages)
    }

    fn collect_pages(
        &self,
        tree: &Tree,
        prefix: &str,
        stamp: &Version,
        out: &mut Vec<Page>,
    ) -> WikiResult<()> {
        for entry in &tree.entries {
            let path = if prefix.is_empty() {
                entry.name.clone()
            } else {
                format!("{prefix}/{}", entry.name)
            };
            if entry.is_directory() {
                let sub = load_tree(&*self.store, &entry.object_id)?;
                self.collect_pages(&sub, &path, stamp, out)?;
                continue;
            }
            if !valid_page_name(&entry.name) {
                continue;
            }
            let Some(format) = extension(&entry.name).and_then(PageFormat::from_extension) else {
                continue;
            };
            let data = self.read_blob(&entry.object_id)?;
            out.push(Page {
                name: strip_extension(&entry.name).to_string(),
                path,
                format,
                data,
                version: Some(stamp.clone()),
            });
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Write a new page. Fails with [`WikiError::DuplicatePage`] if the
    /// folded name is already taken in the target directory; never silently
    /// overwrites. Returns the new commit id.
    pub fn write_page(
        &self,
        name: &str,
        format: PageFormat,
        data: &[u8],
        commit: &CommitInfo,
    ) -> WikiResult<ObjectId> {
        let head = self.commit_at(None)?;
        let (head_id, base_tree) = match &head {
            Some((id, c)) => (Some(*id), Some(c.tree)),
            None => (None, None),
        };

        let (dirs, slug) = split_name(name);
        let filename = format!("{slug}.{}", format.extension());
        let dir = dirs.join("/");

        let mut edit = EditSet::new(base_tree);
        if let Some(existing) = edit.path_is_taken(&*self.store, &dir, &filename, false)? {
            return Err(WikiError::DuplicatePage {
                directory: dir,
                existing,
                attempted: filename,
            });
        }
        let path = join_path(&dirs, &filename);
        edit.add(&path, normalize(data));
        debug!(page = %path, "staged new page");
        self.commit_edit(&edit, head_id, commit)
    }

    /// Update an existing page.
    ///
    /// With the name and format unchanged the blob is replaced in place (the
    /// slot is its own, no collision check). A new name or format stages a
    /// delete of the old path and re-adds under the new one, tolerating a
    /// sibling with the same extension (renaming to a different case of the
    /// same name is not a self-collision) while still rejecting an unrelated
    /// page occupying the folded slot. Returns the new commit id.
    pub fn update_page(
        &self,
        page: &Page,
        new_name: Option<&str>,
        new_format: Option<PageFormat>,
        data: &[u8],
        commit: &CommitInfo,
    ) -> WikiResult<ObjectId> {
        let head = self.commit_at(None)?;
        let (head_id, base_tree) = match &head {
            Some((id, c)) => (Some(*id), Some(c.tree)),
            None => (None, None),
        };

        let name = new_name.map(canonicalize).unwrap_or_else(|| page.name.clone());
        let format = new_format.unwrap_or(page.format);

        let mut edit = EditSet::new(base_tree);
        if name == page.name && format == page.format {
            edit.add(&page.path, normalize(data));
            debug!(page = %page.path, "staged content update");
        } else {
            edit.delete(&page.path);
            let dir = match page.path.rsplit_once('/') {
                Some((dir, _)) => dir.to_string(),
                None => String::new(),
            };
            let filename = format!("{name}.{}", format.extension());
            if let Some(existing) = edit.path_is_taken(&*self.store, &dir, &filename, true)? {
                return Err(WikiError::DuplicatePage {
                    directory: dir,
                    existing,
                    attempted: filename,
                });
            }
            let path = if dir.is_empty() {
                filename
            } else {
                format!("{dir}/{filename}")
            };
            edit.add(&path, normalize(data));
            debug!(from = %page.path, to = %path, "staged rename");
        }
        self.commit_edit(&edit, head_id, commit)
    }

    /// Delete a page. Returns the new commit id.
    pub fn delete_page(&self, page: &Page, commit: &CommitInfo) -> WikiResult<ObjectId> {
        let head = self.commit_at(None)?;
        let (head_id, base_tree) = match &head {
            Some((id, c)) => (Some(*id), Some(c.tree)),
            None => (None, None),
        };

        let mut edit = EditSet::new(base_tree);
        edit.delete(&page.path);
        debug!(page = %page.path, "staged deletion");
        self.commit_edit(&edit, head_id, commit)
    }

    /// Build an in-memory page without staging or committing anything, for
    /// render-before-save workflows. The page is stamped with the current
    /// head's version when one exists.
    pub fn preview_page(&self, name: &str, format: PageFormat, data: &[u8]) -> WikiResult<Page> {
        let (dirs, slug) = split_name(name);
        let filename = format!("{slug}.{}", format.extension());
        let version = self
            .commit_at(None)?
            .map(|(id, c)| Version::from_commit(id, &c));
        Ok(Page {
            name: slug,
            path: join_path(&dirs, &filename),
            format,
            data: data.to_vec(),
            version,
        })
    }

    /// Materialize the edit into a tree, wrap it in a commit with the
    /// observed head as parent, and advance the head -- atomically.
    fn commit_edit(
        &self,
        edit: &EditSet,
        parent: Option<ObjectId>,
        info: &CommitInfo,
    ) -> WikiResult<ObjectId> {
        let tree = edit.materialize(&*self.store)?;
        let (author, email) = info.resolved_author(&self.config);
        let commit = CommitObject {
            tree,
            parent,
            author,
            email,
            message: info.message.clone(),
            timestamp_ms: now_ms(),
        };
        let id = self.store.write(&commit.to_stored_object()?)?;
        self.refs
            .compare_and_set_head(parent, id)
            .map_err(|e| match e {
                RefError::StaleHead { expected, actual } => {
                    WikiError::Conflict { expected, actual }
                }
                other => WikiError::Refs(other),
            })?;
        debug!(commit = %id.short_hex(), "head advanced to new commit");
        Ok(id)
    }

    // -----------------------------------------------------------------------
    // History
    // -----------------------------------------------------------------------

    /// Repository history, newest first, windowed by `opts`.
    pub fn log(&self, opts: &LogOptions) -> WikiResult<Vec<Version>> {
        Ok(paginate(self.ancestry()?, opts))
    }

    /// The versions that touched the blob at `path`, newest first.
    ///
    /// A commit touches a page when the blob resolved at `path` (same
    /// folded-match semantics as page resolution) differs from the parent
    /// commit's -- including the commits that created or deleted it.
    pub fn page_versions(&self, path: &str, opts: &LogOptions) -> WikiResult<Vec<Version>> {
        let mut touched = Vec::new();
        let mut cursor = self.refs.head()?;
        while let Some(id) = cursor {
            let commit = self.read_commit(&id)?;
            let current = self.blob_id_at(&commit.tree, path)?;
            let in_parent = match commit.parent {
                Some(parent_id) => {
                    let parent = self.read_commit(&parent_id)?;
                    self.blob_id_at(&parent.tree, path)?
                }
                None => None,
            };
            if current != in_parent {
                touched.push(Version::from_commit(id, &commit));
            }
            cursor = commit.parent;
        }
        Ok(paginate(touched, opts))
    }

    /// Diff the blob at `path` between two versions (hex commit ids).
    ///
    /// A missing version or absent blob contributes empty content, so the
    /// result degrades to a pure addition or deletion. The diff machinery
    /// itself is a pass-through to `vellum-diff`.
    pub fn diff(&self, from: &str, to: &str, path: &str) -> WikiResult<BlobDiff> {
        let old = self.content_at(from, path)?;
        let new = self.content_at(to, path)?;
        Ok(diff_blobs(&old, &new))
    }

    // -----------------------------------------------------------------------
    // Rendering boundary
    // -----------------------------------------------------------------------

    /// Hand a page to the markup renderer.
    ///
    /// The renderer receives the raw bytes, the format, the configured base
    /// path, and a callback resolving a wiki-link target to an href under
    /// that base path. The engine never inspects the rendered output.
    pub fn render_page(&self, page: &Page, markup: &dyn Markup) -> Vec<u8> {
        let base = self.config.base_path.trim_end_matches('/').to_string();
        let resolve = move |target: &str| format!("{base}/{}", canonicalize(target));
        markup.render(&page.data, page.format, &self.config.base_path, &resolve)
    }

    // -----------------------------------------------------------------------
    // Internal lookups
    // -----------------------------------------------------------------------

    /// Resolve a version identifier to a commit. `None` means the head; a
    /// hex string addresses an explicit commit. Unknown or unparseable
    /// versions resolve to `None`.
    fn commit_at(&self, version: Option<&str>) -> WikiResult<Option<(ObjectId, CommitObject)>> {
        let id = match version {
            None => match self.refs.head()? {
                Some(id) => id,
                None => return Ok(None),
            },
            Some(given) => match ObjectId::from_hex(given.trim()) {
                Ok(id) => id,
                Err(_) => return Ok(None),
            },
        };
        let Some(obj) = self.store.read(&id)? else {
            return Ok(None);
        };
        Ok(Some((id, CommitObject::from_stored_object(&obj)?)))
    }

    /// Read a commit that ancestry links point at; absence is corruption.
    fn read_commit(&self, id: &ObjectId) -> WikiResult<CommitObject> {
        let obj = self.store.read(id)?.ok_or(StoreError::NotFound(*id))?;
        Ok(CommitObject::from_stored_object(&obj)?)
    }

    fn read_blob(&self, id: &ObjectId) -> WikiResult<Vec<u8>> {
        let obj = self.store.read(id)?.ok_or(StoreError::NotFound(*id))?;
        Ok(Blob::from_stored_object(&obj)?.data)
    }

    /// The blob id stored at `path` under the given root tree, matching the
    /// final segment by fold.
    fn blob_id_at(&self, tree_id: &ObjectId, path: &str) -> WikiResult<Option<ObjectId>> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let Some((filename, dirs)) = segments.split_last() else {
            return Ok(None);
        };
        let root = load_tree(&*self.store, tree_id)?;
        let Some((tree, _)) = descend(&*self.store, &root, dirs)? else {
            return Ok(None);
        };
        let target = fold(filename);
        Ok(tree
            .entries
            .iter()
            .find(|e| !e.is_directory() && fold(&e.name) == target)
            .map(|e| e.object_id))
    }

    fn content_at(&self, version: &str, path: &str) -> WikiResult<Vec<u8>> {
        let Some((_, commit)) = self.commit_at(Some(version))? else {
            return Ok(Vec::new());
        };
        match self.blob_id_at(&commit.tree, path)? {
            Some(id) => self.read_blob(&id),
            None => Ok(Vec::new()),
        }
    }

    /// Full ancestry from head, newest first.
    fn ancestry(&self) -> WikiResult<Vec<Version>> {
        let mut versions = Vec::new();
        let mut cursor = self.refs.head()?;
        while let Some(id) = cursor {
            let commit = self.read_commit(&id)?;
            cursor = commit.parent;
            versions.push(Version::from_commit(id, &commit));
        }
        Ok(versions)
    }
}

impl std::fmt::Debug for Wiki {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wiki")
            .field("base_path", &self.config.base_path)
            .finish()
    }
}

/// Split a (possibly slash-separated) page name into canonicalized directory
/// segments and the canonical name stem.
fn split_name(name: &str) -> (Vec<String>, String) {
    let mut segments: Vec<String> = name
        .split('/')
        .map(canonicalize)
        .filter(|s| !s.is_empty())
        .collect();
    let base = segments.pop().unwrap_or_default();
    (segments, base)
}

fn join_path(dirs: &[String], filename: &str) -> String {
    if dirs.is_empty() {
        filename.to_string()
    } else {
        format!("{}/{filename}", dirs.join("/"))
    }
}

/// Strip carriage returns so page content is stored LF-only regardless of
/// the submitting client's platform.
fn normalize(data: &[u8]) -> Vec<u8> {
    data.iter().copied().filter(|&b| b != b'\r').collect()
}

fn paginate(versions: Vec<Version>, opts: &LogOptions) -> Vec<Version> {
    let page = opts.page.max(1);
    versions
        .into_iter()
        .skip((page - 1) * opts.per_page)
        .take(opts.per_page)
        .collect()
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
