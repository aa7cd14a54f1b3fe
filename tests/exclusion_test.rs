/// Integration tests for exclusion pattern semantics and ignore files
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use gsupload::binding;
use gsupload::config::{self, LAYER_FILE_NAME};
use gsupload::exclusion::{ExclusionRuleSet, RuleOrigin, IGNORE_FILE_NAME};
use gsupload::scan;

fn ruleset(patterns: &[&str]) -> ExclusionRuleSet {
	let origin = RuleOrigin::Config(PathBuf::from("/t/.gsupload.json"));
	ExclusionRuleSet::compile(patterns.iter().map(|p| (*p, origin.clone()))).unwrap()
}

#[test]
fn test_bare_name_matches_any_depth() {
	let rules = ruleset(&["app.tmp"]);
	assert!(rules.is_excluded("app.tmp", false));
	assert!(rules.is_excluded("src/app.tmp", false));
	assert!(rules.is_excluded("a/b/c/app.tmp", false));
	assert!(!rules.is_excluded("app.tmp.bak", false));
}

#[test]
fn test_bare_glob_matches_any_depth() {
	let rules = ruleset(&["*.tmp"]);
	assert!(rules.is_excluded("app.tmp", false));
	assert!(rules.is_excluded("deep/nested/b.tmp", false));
	assert!(!rules.is_excluded("app.tmpl", false));
}

#[test]
fn test_leading_slash_anchors_to_base() {
	let rules = ruleset(&["/app.tmp"]);
	assert!(rules.is_excluded("app.tmp", false));
	assert!(!rules.is_excluded("src/app.tmp", false));
}

#[test]
fn test_anchored_directory_excludes_subtree() {
	let rules = ruleset(&["/dist"]);
	assert!(rules.is_excluded("dist", true));
	assert!(rules.is_excluded("dist/index.html", false));
	assert!(rules.is_excluded("dist/assets/app.js", false));
	assert!(!rules.is_excluded("nested/dist", true));
	assert!(!rules.is_excluded("nested/dist/index.html", false));
}

#[test]
fn test_embedded_slash_is_literal_depth() {
	let rules = ruleset(&["src/*.tmp"]);
	assert!(rules.is_excluded("src/a.tmp", false));
	assert!(!rules.is_excluded("a.tmp", false));
	assert!(!rules.is_excluded("src/deep/a.tmp", false));
	assert!(!rules.is_excluded("other/src/a.tmp", false));
}

#[test]
fn test_double_star_crosses_directories() {
	let rules = ruleset(&["src/**/*.tmp"]);
	assert!(rules.is_excluded("src/a.tmp", false));
	assert!(rules.is_excluded("src/deep/nested/a.tmp", false));
	assert!(!rules.is_excluded("other/a.tmp", false));
}

#[test]
fn test_trailing_slash_matches_directories_only() {
	let rules = ruleset(&["build/"]);
	assert!(rules.is_excluded("build", true));
	assert!(rules.is_excluded("src/build", true));
	// a plain file named build is not excluded
	assert!(!rules.is_excluded("build", false));
	// but files inside a matching directory are, via the ancestor match
	assert!(rules.is_excluded("build/out.js", false));
}

#[test]
fn test_question_mark_never_crosses_separator() {
	let rules = ruleset(&["a?c"]);
	assert!(rules.is_excluded("abc", false));
	assert!(rules.is_excluded("x/abc", false));
	assert!(!rules.is_excluded("a/c", false));
}

#[test]
fn test_star_never_crosses_separator() {
	let rules = ruleset(&["/a*c"]);
	assert!(rules.is_excluded("abbbc", false));
	assert!(!rules.is_excluded("ab/bc", false));
}

#[test]
fn test_rule_origin_is_preserved() {
	let config_origin = RuleOrigin::Config(PathBuf::from("/p/.gsupload.json"));
	let ignore_origin = RuleOrigin::IgnoreFile(PathBuf::from("/p/src/.gsupload_ignore"));
	let rules = ExclusionRuleSet::compile(vec![
		("*.log", config_origin.clone()),
		("/cache", ignore_origin.clone()),
	])
	.unwrap();

	assert_eq!(rules.rules().len(), 2);
	assert_eq!(rules.rules()[0].origin, config_origin);
	assert_eq!(rules.rules()[1].origin, ignore_origin);
}

fn write_layer(dir: &Path, json: &str) {
	fs::create_dir_all(dir).unwrap();
	fs::write(dir.join(LAYER_FILE_NAME), json).unwrap();
}

#[test]
fn test_for_binding_combines_all_sources() {
	let tmp = TempDir::new().unwrap();
	let root = tmp.path();
	write_layer(
		root,
		r#"{
			"global_excludes": ["*.log"],
			"bindings": {"site": {
				"protocol": "ftp", "hostname": "h", "username": "u",
				"remote_basepath": "/www", "local_basepath": ".",
				"excludes": ["*.bak"]
			}}
		}"#,
	);
	let sub = root.join("src");
	fs::create_dir_all(&sub).unwrap();
	fs::write(root.join(IGNORE_FILE_NAME), "/dist\n").unwrap();
	fs::write(sub.join(IGNORE_FILE_NAME), "/cache\n").unwrap();

	let merged = config::resolve_with_global(root, &[]).unwrap();
	let target = binding::select(&merged, Some("site"), &sub).unwrap();
	let rules = ExclusionRuleSet::for_binding(&merged, &target, &sub).unwrap();

	// global excludes and binding excludes
	assert!(rules.is_excluded("x/y.log", false));
	assert!(rules.is_excluded("old.bak", false));
	// base-level ignore file, anchored at the base
	assert!(rules.is_excluded("dist/a.js", false));
	assert!(!rules.is_excluded("nested/dist/a.js", false));
	// sub-directory ignore file, re-anchored to src/
	assert!(rules.is_excluded("src/cache", true));
	assert!(!rules.is_excluded("cache", true));
	assert!(!rules.is_excluded("src/keep.css", false));
}

#[test]
fn test_scan_never_descends_into_excluded_subtrees() {
	let tmp = TempDir::new().unwrap();
	let root = tmp.path();
	for file in ["src/app.css", "dist/bundle.js", "dist/deep/x.js", "notes.log"] {
		let path = root.join(file);
		fs::create_dir_all(path.parent().unwrap()).unwrap();
		fs::write(path, b"x").unwrap();
	}

	let entries = scan::scan_local(root, &ruleset(&["/dist", "*.log"])).unwrap();
	let paths: Vec<&str> = entries.iter().map(|e| e.path.as_str()).collect();

	assert!(paths.contains(&"src"));
	assert!(paths.contains(&"src/app.css"));
	assert!(!paths.iter().any(|p| p.starts_with("dist")));
	assert!(!paths.contains(&"notes.log"));
}

// vim: ts=4
