//! Binding selection
//!
//! Maps an explicit alias, or the current working directory, to one concrete
//! binding. Auto-detection never prompts: when several bindings contain the
//! working directory the ambiguity is returned as data and the interactive
//! layer decides.

use std::path::Path;

use crate::config::{Binding, MergedConfig};
use crate::error::{SelectionError, UploadError};
use crate::logging::*;

/// Select and resolve one binding.
///
/// With `explicit_alias` the lookup is exact and fails with
/// [`SelectionError::UnknownAlias`]. Without it, the candidate set is every
/// binding whose resolved local base path is an ancestor-or-equal of `cwd`:
/// zero candidates fail with [`SelectionError::NoMatch`], more than one with
/// [`SelectionError::Ambiguous`] carrying the candidate aliases.
///
/// Required-field validation of the chosen binding happens here, so an
/// incomplete binding surfaces as [`crate::error::ConfigError::MissingField`]
/// only once it is actually selected.
pub fn select(
	merged: &MergedConfig,
	explicit_alias: Option<&str>,
	cwd: &Path,
) -> Result<Binding, UploadError> {
	if let Some(alias) = explicit_alias {
		if !merged.bindings.contains_key(alias) {
			return Err(SelectionError::UnknownAlias { alias: alias.to_string() }.into());
		}
		return Ok(merged.resolve_binding(alias)?);
	}

	let mut candidates: Vec<String> = merged
		.bindings
		.keys()
		.filter(|alias| {
			merged
				.binding_local_basepath(alias)
				.map(|base| path_contains(&base, cwd))
				.unwrap_or(false)
		})
		.cloned()
		.collect();
	candidates.sort();

	match candidates.len() {
		0 => Err(SelectionError::NoMatch { cwd: cwd.to_path_buf() }.into()),
		1 => {
			let alias = &candidates[0];
			debug!(alias = %alias, "auto-detected binding");
			Ok(merged.resolve_binding(alias)?)
		}
		_ => {
			warn!(count = candidates.len(), "multiple bindings match the current directory");
			Err(SelectionError::Ambiguous { candidates }.into())
		}
	}
}

/// Ancestor-or-equal containment by path segments, never by string prefix:
/// `/srv/web` contains `/srv/web/css` but not `/srv/webapp`.
fn path_contains(base: &Path, path: &Path) -> bool {
	path.starts_with(base)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_path_containment_respects_segment_boundaries() {
		assert!(path_contains(Path::new("/srv/web"), Path::new("/srv/web")));
		assert!(path_contains(Path::new("/srv/web"), Path::new("/srv/web/css")));
		assert!(!path_contains(Path::new("/srv/web"), Path::new("/srv/webapp")));
		assert!(!path_contains(Path::new("/srv/web"), Path::new("/srv")));
	}
}

// vim: ts=4
