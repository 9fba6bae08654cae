//! Actor system for watch mode.
//!
//! Message-passing concurrency between the file watcher and the remote theme:
//!
//! ```text
//! FsActor --SyncOp--> SyncActor --GraphQL--> store
//! (notify + debounce)  (compile + upload/delete, serial)
//! ```
//!
//! # Module Structure
//!
//! - `messages` - Operations passed between actors
//! - `fs` - File system watcher with per-path debouncing
//! - `sync` - Applies operations to the remote theme in receipt order
//! - `coordinator` - Wires up and runs actors, drains on shutdown

pub mod coordinator;
pub mod fs;
pub mod messages;
pub mod sync;

pub use coordinator::Coordinator;
pub use sync::SyncStats;
