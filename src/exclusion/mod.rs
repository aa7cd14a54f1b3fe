//! Exclusion engine
//!
//! Compiles gitignore-style patterns gathered from configuration layers and
//! `.gsupload_ignore` files into one rule set, and classifies base-relative
//! paths during traversal. Rules are additive only: a path is excluded as
//! soon as any rule matches, so evaluation order never affects the outcome.

mod ignore;
mod patterns;

pub use ignore::{collect_ignore_files, load_ignore_file, IGNORE_FILE_NAME};
pub use patterns::{CompiledRule, RuleOrigin};

use std::path::Path;

use crate::config::{Binding, MergedConfig};
use crate::error::ExclusionError;

/// An ordered collection of compiled exclusion rules
#[derive(Debug, Default)]
pub struct ExclusionRuleSet {
	rules: Vec<CompiledRule>,
}

impl ExclusionRuleSet {
	/// Compile a list of `(pattern, origin)` pairs. Empty patterns are
	/// skipped; an uncompilable pattern fails the whole set.
	pub fn compile<I, S>(patterns: I) -> Result<Self, ExclusionError>
	where
		I: IntoIterator<Item = (S, RuleOrigin)>,
		S: AsRef<str>,
	{
		let mut rules = Vec::new();
		for (pattern, origin) in patterns {
			let pattern = pattern.as_ref();
			if pattern.trim().is_empty() {
				continue;
			}
			rules.push(CompiledRule::compile(pattern, origin)?);
		}
		Ok(ExclusionRuleSet { rules })
	}

	/// Build the full rule set for one upload run: merged `global_excludes`,
	/// the binding's own excludes, and every `.gsupload_ignore` discovered
	/// between `cwd` and the binding's local base path.
	pub fn for_binding(
		merged: &MergedConfig,
		binding: &Binding,
		cwd: &Path,
	) -> Result<Self, ExclusionError> {
		let binding_origin = merged
			.provenance
			.bindings
			.get(&binding.alias)
			.and_then(|prov| prov.last_set("excludes"))
			.unwrap_or(Path::new(""))
			.to_path_buf();

		let mut patterns: Vec<(String, RuleOrigin)> = Vec::new();
		for (pattern, layer) in &merged.provenance.global_excludes {
			patterns.push((pattern.clone(), RuleOrigin::Config(layer.clone())));
		}
		for pattern in &binding.excludes {
			patterns.push((pattern.clone(), RuleOrigin::Config(binding_origin.clone())));
		}
		for (pattern, file) in collect_ignore_files(cwd, &binding.local_basepath) {
			patterns.push((pattern, RuleOrigin::IgnoreFile(file)));
		}

		Self::compile(patterns)
	}

	/// Whether `rel_path` (relative to the base path, `/`-separated) is
	/// excluded. Any-match semantics; a match on an ancestor directory
	/// excludes the whole subtree.
	pub fn is_excluded(&self, rel_path: &str, is_dir: bool) -> bool {
		let segments: Vec<&str> =
			rel_path.split('/').filter(|s| !s.is_empty() && *s != ".").collect();
		if segments.is_empty() {
			return false;
		}
		self.rules.iter().any(|rule| rule.matches(&segments, is_dir))
	}

	/// Compiled rules in compilation order, for inspection tooling
	pub fn rules(&self) -> &[CompiledRule] {
		&self.rules
	}

	pub fn is_empty(&self) -> bool {
		self.rules.is_empty()
	}
}


// vim: ts=4
