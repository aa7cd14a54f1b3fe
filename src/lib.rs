//! # gsupload - Resolution & Transfer Core
//!
//! gsupload synchronizes a set of local files, selected by name/glob
//! patterns, to a remote directory tree over FTP or SFTP, driven by named,
//! inheritable connection profiles ("bindings") discovered from layered
//! `.gsupload.json` configuration files.
//!
//! This crate is the core library: configuration resolution with per-field
//! provenance, binding selection, gitignore-style exclusion rules, the
//! local-vs-remote diff, and the concurrent transfer orchestrator. The
//! command-line surface, interactive prompting and tree rendering live in
//! consumers of this API.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::env;
//! use gsupload::{binding, config, exclusion, protocol, scan, transfer};
//!
//! fn main() -> Result<(), gsupload::UploadError> {
//!     let cwd = env::current_dir()?;
//!     let merged = config::resolve(&cwd)?;
//!     let target = binding::select(&merged, None, &cwd)?;
//!
//!     let rules = exclusion::ExclusionRuleSet::for_binding(&merged, &target, &cwd)?;
//!     let files = scan::expand_patterns(
//!         &["*.css".to_string()], &rules, &target.local_basepath, &cwd, true,
//!     );
//!
//!     let tasks = transfer::tasks_for_files(&files, &target).map_err(|e| {
//!         gsupload::UploadError::Io(std::io::Error::other(e.to_string()))
//!     })?;
//!     let transport = protocol::transport_for(target.protocol);
//!     let cache = transfer::DirCache::new();
//!     let outcomes = transfer::run(
//!         transport.as_ref(), &target, tasks, &Default::default(), &cache,
//!     );
//!     for outcome in &outcomes {
//!         println!("{} -> {:?}", outcome.task.relative_path, outcome.is_success());
//!     }
//!     Ok(())
//! }
//! ```

pub mod binding;
pub mod config;
pub mod diff;
pub mod error;
pub mod exclusion;
pub mod logging;
pub mod protocol;
pub mod scan;
pub mod transfer;
pub mod types;

// Re-export commonly used types and functions
pub use config::{Binding, MergedConfig};
pub use diff::{DiffClass, DiffResult};
pub use error::{ConfigError, ConnError, SelectionError, TransferError, UploadError};
pub use exclusion::ExclusionRuleSet;
pub use transfer::{DirCache, TransferOutcome, TransferTask};
pub use types::{FileEntry, FileKind, Protocol};

// vim: ts=4
