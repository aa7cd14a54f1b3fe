//! Layer merging with per-field provenance
//!
//! Merge rules, applied layer by layer from shallowest to deepest:
//! - `global_excludes`: list-concatenate, order-preserving, no dedup
//! - `bindings`: field-level merge; a field set by a deeper layer overwrites,
//!   a field left unset is inherited
//! - every other top-level key: replaced by the deepest layer that sets it
//!
//! Provenance is accumulated during the merge itself. This matters for
//! `local_basepath` resolution: a relative value resolves against the
//! directory of the layer that *last set that field*, which may be shallower
//! than the layer that last touched the binding.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use crate::config::{Binding, BindingDoc, ConfigLayer, DEFAULT_MAX_WORKERS};
use crate::error::ConfigError;

/// Provenance of one merged binding
#[derive(Debug, Clone, Default)]
pub struct BindingProvenance {
	/// Every layer that mentioned this binding, in merge order
	pub defined_in: Vec<PathBuf>,
	/// Per field: every layer that set it, in merge order. The last entry
	/// is the layer whose value survived the merge.
	pub fields: BTreeMap<&'static str, Vec<PathBuf>>,
}

impl BindingProvenance {
	/// Layer whose value for `field` survived the merge
	pub fn last_set(&self, field: &str) -> Option<&Path> {
		self.fields.get(field).and_then(|layers| layers.last()).map(PathBuf::as_path)
	}
}

/// Records which layer contributed each merged value
#[derive(Debug, Clone, Default)]
pub struct Provenance {
	/// Layer origins in merge order, shallowest first
	pub layers: Vec<PathBuf>,
	/// One entry per merged exclude pattern: (pattern, contributing layer)
	pub global_excludes: Vec<(String, PathBuf)>,
	pub bindings: BTreeMap<String, BindingProvenance>,
}

/// The single merged configuration of one invocation
#[derive(Debug, Clone, Default)]
pub struct MergedConfig {
	pub comments: Option<String>,
	/// Concatenation of every layer's `global_excludes`, duplicates kept
	pub global_excludes: Vec<String>,
	/// Alias to merged (still partial) binding
	pub bindings: BTreeMap<String, BindingDoc>,
	pub provenance: Provenance,
}

macro_rules! merge_field {
	($acc:expr, $inc:expr, $prov:expr, $origin:expr, $($field:ident),+) => {
		$(
			if let Some(value) = &$inc.$field {
				$acc.$field = Some(value.clone());
				$prov.fields.entry(stringify!($field)).or_default().push($origin.clone());
			}
		)+
	};
}

/// Merge an ordered list of layers (shallowest first) into one
/// [`MergedConfig`]. Associative in application order: merging `[A,B,C]` one
/// at a time equals merging `[A,B]` first and then applying `C`.
pub fn merge_layers(layers: Vec<ConfigLayer>) -> MergedConfig {
	let mut merged = MergedConfig::default();
	for layer in layers {
		apply_layer(&mut merged, &layer);
	}
	merged
}

/// Apply one more layer on top of an existing accumulator
pub fn apply_layer(merged: &mut MergedConfig, layer: &ConfigLayer) {
	let origin = layer.origin.clone();
	merged.provenance.layers.push(origin.clone());

	for pattern in &layer.doc.global_excludes {
		merged.global_excludes.push(pattern.clone());
		merged.provenance.global_excludes.push((pattern.clone(), origin.clone()));
	}

	for (alias, incoming) in &layer.doc.bindings {
		let prov = merged.provenance.bindings.entry(alias.clone()).or_default();
		prov.defined_in.push(origin.clone());

		let acc = merged.bindings.entry(alias.clone()).or_default();
		merge_field!(
			acc,
			incoming,
			prov,
			origin,
			protocol,
			hostname,
			port,
			username,
			password,
			key_filename,
			max_workers,
			local_basepath,
			remote_basepath,
			excludes,
			comments,
			excludes_comments,
			ftp_active
		);
	}

	if layer.doc.comments.is_some() {
		merged.comments = layer.doc.comments.clone();
	}
}

impl MergedConfig {
	/// Resolved absolute local base path of a binding, without validating
	/// the rest of its fields. Used by auto-detection, which only needs the
	/// base path.
	///
	/// An absolute configured value is kept; a relative one resolves against
	/// the directory of the layer that last set the field; an unset one
	/// defaults to the directory of the first layer that defined the
	/// binding.
	pub fn binding_local_basepath(&self, alias: &str) -> Option<PathBuf> {
		let doc = self.bindings.get(alias)?;
		let prov = self.provenance.bindings.get(alias)?;
		let default_dir = prov.defined_in.first()?.parent()?.to_path_buf();

		let resolved = match &doc.local_basepath {
			Some(value) => {
				let expanded = expand_tilde(value);
				if expanded.is_absolute() {
					expanded
				} else {
					let origin_dir = prov
						.last_set("local_basepath")
						.and_then(Path::parent)
						.map(Path::to_path_buf)
						.unwrap_or_else(|| default_dir.clone());
					origin_dir.join(expanded)
				}
			}
			None => default_dir,
		};
		Some(normalize_path(&resolved))
	}

	/// Validate a merged binding and produce the complete [`Binding`].
	///
	/// Validation is lazy: an incomplete binding is only an error when it is
	/// actually selected. Fails with [`ConfigError::MissingField`] naming
	/// the first missing required field.
	pub fn resolve_binding(&self, alias: &str) -> Result<Binding, ConfigError> {
		let missing = |field| ConfigError::MissingField { alias: alias.to_string(), field };

		let doc = self.bindings.get(alias).ok_or_else(|| missing("binding"))?;
		let protocol = doc.protocol.ok_or_else(|| missing("protocol"))?;
		let hostname = doc.hostname.clone().ok_or_else(|| missing("hostname"))?;
		let username = doc.username.clone().ok_or_else(|| missing("username"))?;
		let remote_basepath = doc.remote_basepath.clone().ok_or_else(|| missing("remote_basepath"))?;
		let local_basepath = self.binding_local_basepath(alias).ok_or_else(|| missing("local_basepath"))?;

		Ok(Binding {
			alias: alias.to_string(),
			protocol,
			hostname,
			port: doc.port.unwrap_or_else(|| protocol.default_port()),
			username,
			password: doc.password.clone(),
			key_filename: doc.key_filename.as_deref().map(expand_tilde),
			max_workers: doc.max_workers.unwrap_or(DEFAULT_MAX_WORKERS),
			local_basepath,
			remote_basepath,
			excludes: doc.excludes.clone().unwrap_or_default(),
			comments: doc.comments.clone(),
			ftp_passive: !doc.ftp_active.unwrap_or(false),
		})
	}
}

/// Expand a leading `~` or `~/` against the user's home directory
pub fn expand_tilde(path: &str) -> PathBuf {
	if path == "~" {
		return dirs::home_dir().unwrap_or_else(|| PathBuf::from("~"));
	}
	if let Some(rest) = path.strip_prefix("~/") {
		if let Some(home) = dirs::home_dir() {
			return home.join(rest);
		}
	}
	PathBuf::from(path)
}

/// Lexically normalize a path: drop `.` components and fold `..` onto the
/// preceding component. Does not touch the filesystem, so unresolved
/// symlinks stay as written.
pub fn normalize_path(path: &Path) -> PathBuf {
	let mut out = PathBuf::new();
	for component in path.components() {
		match component {
			Component::CurDir => {}
			Component::ParentDir => {
				if !out.pop() {
					out.push(component.as_os_str());
				}
			}
			other => out.push(other.as_os_str()),
		}
	}
	out
}


// vim: ts=4
