//! Configuration layer discovery
//!
//! Finds the optional global layer plus every project layer between the
//! filesystem root and the start directory.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::LayerDoc;
use crate::error::ConfigError;
use crate::logging::*;

/// File name of a project configuration layer
pub const LAYER_FILE_NAME: &str = ".gsupload.json";

/// One discovered configuration document. Immutable once loaded; identified
/// by its origin path.
#[derive(Debug, Clone)]
pub struct ConfigLayer {
	/// Path of the document this layer was loaded from
	pub origin: PathBuf,
	pub doc: LayerDoc,
}

impl ConfigLayer {
	/// Directory containing the layer document. Relative `local_basepath`
	/// values set by this layer resolve against it.
	pub fn dir(&self) -> &Path {
		self.origin.parent().unwrap_or(Path::new("/"))
	}
}

/// Candidate locations for the global layer, in priority order
pub fn global_layer_candidates() -> Vec<PathBuf> {
	match dirs::home_dir() {
		Some(home) => vec![
			home.join(".gsupload").join("gsupload.json"),
			home.join(".config").join("gsupload").join("gsupload.json"),
		],
		None => Vec::new(),
	}
}

/// Discover and load every layer visible from `start_dir`, ordered
/// shallowest to deepest. The global layer, if present, is shallower than
/// all project layers.
pub fn discover_layers(
	start_dir: &Path,
	global_candidates: &[PathBuf],
) -> Result<Vec<ConfigLayer>, ConfigError> {
	let mut layers = Vec::new();

	for candidate in global_candidates {
		if candidate.is_file() {
			debug!(path = %candidate.display(), "loading global config layer");
			layers.push(load_layer(candidate)?);
			break;
		}
	}

	// Collect project layers from start_dir up to the filesystem root, then
	// reverse so shallower layers merge first.
	let mut project_layers = Vec::new();
	let mut current = start_dir.to_path_buf();
	loop {
		let candidate = current.join(LAYER_FILE_NAME);
		if candidate.is_file() {
			project_layers.push(candidate);
		}
		match current.parent() {
			Some(parent) => current = parent.to_path_buf(),
			None => break,
		}
	}
	project_layers.reverse();

	for path in &project_layers {
		debug!(path = %path.display(), "loading project config layer");
		layers.push(load_layer(path)?);
	}

	if layers.is_empty() {
		let mut searched: Vec<PathBuf> = global_candidates.to_vec();
		searched.push(start_dir.join(LAYER_FILE_NAME));
		return Err(ConfigError::NotFound { searched });
	}

	info!(count = layers.len(), "configuration layers loaded");
	Ok(layers)
}

fn load_layer(path: &Path) -> Result<ConfigLayer, ConfigError> {
	let text = fs::read_to_string(path)
		.map_err(|e| ConfigError::Invalid { path: path.to_path_buf(), message: e.to_string() })?;
	let doc: LayerDoc = serde_json::from_str(&text)
		.map_err(|e| ConfigError::Invalid { path: path.to_path_buf(), message: e.to_string() })?;
	Ok(ConfigLayer { origin: path.to_path_buf(), doc })
}


// vim: ts=4
