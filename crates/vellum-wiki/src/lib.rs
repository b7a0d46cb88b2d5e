//! The Vellum wiki engine.
//!
//! A thin wiki built directly on a content-addressed, version-controlled
//! object store: every edit is a commit, every page is a tree entry resolved
//! by a case-insensitive canonical name. This crate is the storage and
//! naming engine -- it turns human-entered page names and raw text into tree
//! entries, guarantees name-collision safety, makes every multi-step edit
//! atomic, and reconstructs page listings and history from the commit graph.
//!
//! # Modules
//!
//! - [`name`] / [`format`] -- canonical slugs, folding, and the closed
//!   format-to-extension table
//! - [`stage`] -- the per-edit delta tree and the collision detector
//! - [`wiki`] -- the [`Wiki`] handle: resolve, list, write, update, delete,
//!   preview, log, diff
//! - [`page`] -- transient [`Page`], [`WikiFile`], and [`Version`] values
//! - [`markup`] -- the trait seam to the external renderer
//! - [`config`] / [`error`] -- explicit configuration and the error taxonomy
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use vellum_refs::InMemoryRefStore;
//! use vellum_store::InMemoryObjectStore;
//! use vellum_wiki::{CommitInfo, PageFormat, Wiki, WikiConfig};
//!
//! let wiki = Wiki::new(
//!     Arc::new(InMemoryObjectStore::new()),
//!     Arc::new(InMemoryRefStore::new()),
//!     WikiConfig::default(),
//! );
//!
//! wiki.write_page(
//!     "Home",
//!     PageFormat::Markdown,
//!     b"# Welcome\n",
//!     &CommitInfo::new("created Home"),
//! )
//! .unwrap();
//!
//! let page = wiki.page("home", None).unwrap().expect("Home exists");
//! assert_eq!(page.raw_data(), b"# Welcome\n");
//! ```

pub mod config;
pub mod error;
pub mod format;
pub mod markup;
pub mod name;
pub mod page;
pub mod stage;
pub mod wiki;

pub use config::{CommitInfo, WikiConfig};
pub use error::{WikiError, WikiResult};
pub use format::PageFormat;
pub use markup::Markup;
pub use page::{Page, Version, WikiFile};
pub use stage::{EditSet, StageNode};
pub use wiki::{LogOptions, Wiki, DEFAULT_PER_PAGE};
