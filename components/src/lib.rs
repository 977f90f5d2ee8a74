//! # Components
//!
//! This crate turns watch events into file changes: it fills new component
//! files from templates, maintains per-directory index (barrel) files, and
//! creates or removes paired style files.
//!
//! ## Features
//!
//! - **Snippets**: Empty component files are filled from bundled or user templates
//! - **Index Files**: One `export { default as x } from './X';` line per component
//! - **Style Files**: Optional sibling style file plus import
//! - **Ownership**: Only files the tool created are ever cleaned up
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         Components                              │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  TargetEvent ──► Engine ──► ComponentHandler                   │
//! │                    │           │        │                       │
//! │                    ▼           ▼        ▼                       │
//! │               KnownFiles  Snippet/Style  IndexSynchronizer      │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod engine;
pub mod error;
mod fs;
pub mod handler;
pub mod index;
pub mod naming;
pub mod project;
pub mod registry;
pub mod snippet;
pub mod style;
pub mod template;

pub use engine::{Engine, RunSummary};
pub use error::{ComponentError, Result};
pub use handler::{ComponentHandler, HandlerSettings};
pub use index::{IndexSynchronizer, IndexUpdate, resolve_index_file_name};
pub use naming::{component_name, to_camel_case};
pub use project::{ProjectKind, ProjectProfile};
pub use registry::KnownFiles;
pub use snippet::{SnippetOutcome, is_file_empty, write_snippet};
pub use style::{StyleKind, StyleManager};
pub use template::{TemplateKey, TemplateSource, compile};
