//! Layered configuration system for gsupload
//!
//! Configuration is assembled from an optional global layer
//! (`~/.gsupload/gsupload.json` or `~/.config/gsupload/gsupload.json`) plus
//! every `.gsupload.json` found walking upward from the start directory.
//! Layers merge shallowest to deepest: `global_excludes` concatenate,
//! bindings merge field by field (deeper layers overwrite only the fields
//! they set), every other top-level key is replaced by the deepest layer.
//!
//! Merging records per-field provenance so inspection tooling can show which
//! layer contributed each value. Binding validation is lazy: a binding may
//! stay incomplete forever as long as it is never selected.

mod discover;
mod merge;

pub use discover::{discover_layers, global_layer_candidates, ConfigLayer, LAYER_FILE_NAME};
pub use merge::{BindingProvenance, MergedConfig, Provenance};

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::types::Protocol;

/// Default number of parallel upload workers
pub const DEFAULT_MAX_WORKERS: usize = 5;

/// One binding as it appears in a layer document. Every field is optional:
/// a layer may contribute only part of a binding and inherit the rest.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BindingDoc {
	pub protocol: Option<Protocol>,
	pub hostname: Option<String>,
	pub port: Option<u16>,
	pub username: Option<String>,
	pub password: Option<String>,
	pub key_filename: Option<String>,
	pub max_workers: Option<usize>,
	pub local_basepath: Option<String>,
	pub remote_basepath: Option<String>,
	pub excludes: Option<Vec<String>>,
	pub comments: Option<String>,
	pub excludes_comments: Option<String>,
	pub ftp_active: Option<bool>,
}

/// Top-level structure of one layer document
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LayerDoc {
	pub comments: Option<String>,
	pub global_excludes: Vec<String>,
	pub bindings: BTreeMap<String, BindingDoc>,
}

/// A fully resolved, validated binding. All required fields are present and
/// `local_basepath` is absolute and normalized.
#[derive(Debug, Clone)]
pub struct Binding {
	pub alias: String,
	pub protocol: Protocol,
	pub hostname: String,
	pub port: u16,
	pub username: String,
	pub password: Option<String>,
	pub key_filename: Option<PathBuf>,
	pub max_workers: usize,
	pub local_basepath: PathBuf,
	pub remote_basepath: String,
	pub excludes: Vec<String>,
	pub comments: Option<String>,
	/// FTP transfer mode; passive unless the binding opts into active
	pub ftp_passive: bool,
}

/// Discover, load and merge every configuration layer visible from
/// `start_dir`.
///
/// Fails with [`ConfigError::NotFound`] when neither a global layer nor any
/// project layer exists, and with [`ConfigError::Invalid`] when a discovered
/// document does not parse.
pub fn resolve(start_dir: &Path) -> Result<MergedConfig, ConfigError> {
	resolve_with_global(start_dir, &global_layer_candidates())
}

/// Same as [`resolve`] but with explicit global layer candidate locations.
/// The first existing candidate wins. Primarily for tests and tooling.
pub fn resolve_with_global(
	start_dir: &Path,
	global_candidates: &[PathBuf],
) -> Result<MergedConfig, ConfigError> {
	let layers = discover_layers(start_dir, global_candidates)?;
	Ok(merge::merge_layers(layers))
}

// vim: ts=4
