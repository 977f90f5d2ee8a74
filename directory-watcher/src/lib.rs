//! # Directory Watcher
//!
//! This crate watches the component directories configured for autosnip and
//! reports component files appearing and disappearing.
//!
//! ## Features
//!
//! - **Initial Scan**: Existing files are reported as created at startup
//! - **Depth Limits**: Watching stops at the configured snippet depth
//! - **Mutual Exclusion**: Nested configured roots are owned by their own watcher
//! - **Single Channel**: All targets feed one ordered event stream
//! - **Directory Moves**: A moved-in directory is walked, a moved-out one is
//!   reported so its components can be forgotten
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Directory Watcher                            │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  WatchTarget ──► WatchCoordinator ──► TargetEvent              │
//! │       │                │                   │                    │
//! │       ▼                ▼                   ▼                    │
//! │  order/exclude   InitialScan+notify   WatchSession             │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod event;
pub mod scanner;
pub mod watcher;

pub use config::{DEFAULT_DEPTH, WatchMode, WatchTarget};
pub use error::{Result, WatcherError};
pub use event::{
    ComponentEvent, ComponentEventKind, DirectoryChanges, TargetEvent, is_component_path,
};
pub use scanner::InitialScan;
pub use watcher::{WatchCoordinator, WatchSession};
