//! Page naming rules: canonical slugs, collision folding, and validity.
//!
//! Two forms of a name matter here. The *canonical* form (slug) is what gets
//! stored: whitespace runs collapse to a single hyphen, case is preserved.
//! The *folded* form is what collisions and lookups compare: lowercased with
//! one trailing extension stripped, so `Foo`, `foo`, and `FOO.md` all occupy
//! the same slot.

use crate::format::PageFormat;

/// Convert a human-entered page name into a storage-safe slug.
///
/// Leading/trailing whitespace is trimmed and internal whitespace runs
/// collapse to a single hyphen. Case is preserved; no other normalization is
/// applied -- the deliberate case/extension folding happens at comparison
/// time, not here.
pub fn canonicalize(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join("-")
}

/// The trailing extension of a filename, if it has one.
///
/// An extension is a non-empty run of ASCII alphanumerics after the last
/// dot, with at least one character before the dot (so dotfiles like
/// `.gitignore` have no extension).
pub fn extension(name: &str) -> Option<&str> {
    let idx = name.rfind('.')?;
    if idx == 0 {
        return None;
    }
    let ext = &name[idx + 1..];
    if ext.is_empty() || !ext.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext)
}

/// The filename with its trailing extension removed, if it had one.
pub fn strip_extension(name: &str) -> &str {
    match extension(name) {
        Some(ext) => &name[..name.len() - ext.len() - 1],
        None => name,
    }
}

/// The comparison form used for collision detection and page lookup:
/// lowercase, one trailing extension stripped.
pub fn fold(name: &str) -> String {
    strip_extension(name).to_lowercase()
}

/// Whether a tree entry name is a page.
///
/// Hidden and system entries (leading `.` or `_`) are excluded, as is any
/// extension outside the format table.
pub fn valid_page_name(name: &str) -> bool {
    if name.starts_with('.') || name.starts_with('_') {
        return false;
    }
    if strip_extension(name).is_empty() {
        return false;
    }
    extension(name)
        .and_then(PageFormat::from_extension)
        .is_some()
}
