//! The seam between the storage engine and the markup renderer.
//!
//! Rendering is an external collaborator: the engine hands it raw bytes, the
//! page format, the configured base link path, and a callback that resolves
//! a wiki-link target to an href. It receives rendered bytes back and never
//! inspects them.

use crate::format::PageFormat;

/// A markup renderer.
///
/// Implementations live outside this crate (HTML pipelines, test doubles).
/// `resolve_link` maps a raw page name as written inside a wiki link to the
/// href the renderer should emit for it.
pub trait Markup {
    fn render(
        &self,
        raw: &[u8],
        format: PageFormat,
        base_path: &str,
        resolve_link: &dyn Fn(&str) -> String,
    ) -> Vec<u8>;
}
