/// Integration tests for binding selection (explicit alias and auto-detect)
use std::fs;
use std::path::Path;

use tempfile::TempDir;

use gsupload::binding;
use gsupload::config::{self, LAYER_FILE_NAME};
use gsupload::error::{ConfigError, SelectionError, UploadError};

fn write_layer(dir: &Path, json: &str) {
	fs::create_dir_all(dir).unwrap();
	fs::write(dir.join(LAYER_FILE_NAME), json).unwrap();
}

fn project(tmp: &TempDir) -> std::path::PathBuf {
	let root = tmp.path().to_path_buf();
	write_layer(
		&root,
		r#"{"bindings": {
			"site": {
				"protocol": "sftp", "hostname": "h", "username": "u",
				"remote_basepath": "/www", "local_basepath": "web"
			},
			"docs": {
				"protocol": "ftp", "hostname": "h", "username": "u",
				"remote_basepath": "/docs", "local_basepath": "documentation"
			},
			"app": {
				"protocol": "sftp", "hostname": "h", "username": "u",
				"remote_basepath": "/app", "local_basepath": "web/app"
			}
		}}"#,
	);
	for sub in ["web/app/js", "documentation", "elsewhere"] {
		fs::create_dir_all(root.join(sub)).unwrap();
	}
	root
}

#[test]
fn test_explicit_alias_resolves() {
	let tmp = TempDir::new().unwrap();
	let root = project(&tmp);

	let merged = config::resolve_with_global(&root, &[]).unwrap();
	// the alias wins even when the cwd would auto-detect a different binding
	let selected = binding::select(&merged, Some("docs"), &root.join("web")).unwrap();
	assert_eq!(selected.alias, "docs");
	assert_eq!(selected.local_basepath, root.join("documentation"));
}

#[test]
fn test_unknown_alias() {
	let tmp = TempDir::new().unwrap();
	let root = project(&tmp);

	let merged = config::resolve_with_global(&root, &[]).unwrap();
	let err = binding::select(&merged, Some("nope"), &root).unwrap_err();
	match err {
		UploadError::Selection(SelectionError::UnknownAlias { alias }) => {
			assert_eq!(alias, "nope");
		}
		other => panic!("expected UnknownAlias, got {:?}", other),
	}
}

#[test]
fn test_auto_detect_single_match() {
	let tmp = TempDir::new().unwrap();
	let root = project(&tmp);

	let merged = config::resolve_with_global(&root, &[]).unwrap();
	let selected = binding::select(&merged, None, &root.join("documentation")).unwrap();
	assert_eq!(selected.alias, "docs");
}

#[test]
fn test_auto_detect_no_match() {
	let tmp = TempDir::new().unwrap();
	let root = project(&tmp);

	let merged = config::resolve_with_global(&root, &[]).unwrap();
	let err = binding::select(&merged, None, &root.join("elsewhere")).unwrap_err();
	assert!(matches!(err, UploadError::Selection(SelectionError::NoMatch { .. })));
}

#[test]
fn test_auto_detect_ambiguous_lists_exact_candidates() {
	let tmp = TempDir::new().unwrap();
	let root = project(&tmp);

	// web/app/js lies inside both `site` (web) and `app` (web/app)
	let merged = config::resolve_with_global(&root, &[]).unwrap();
	let err = binding::select(&merged, None, &root.join("web/app/js")).unwrap_err();
	match err {
		UploadError::Selection(SelectionError::Ambiguous { candidates }) => {
			assert_eq!(candidates, vec!["app", "site"]);
		}
		other => panic!("expected Ambiguous, got {:?}", other),
	}
}

#[test]
fn test_incomplete_binding_fails_only_when_selected() {
	let tmp = TempDir::new().unwrap();
	let root = tmp.path();
	write_layer(
		root,
		r#"{"bindings": {
			"broken": {"local_basepath": "web"},
			"fine": {
				"protocol": "ftp", "hostname": "h", "username": "u",
				"remote_basepath": "/www", "local_basepath": "other"
			}
		}}"#,
	);
	fs::create_dir_all(root.join("web")).unwrap();
	fs::create_dir_all(root.join("other")).unwrap();

	let merged = config::resolve_with_global(root, &[]).unwrap();

	// selecting the complete binding never touches the incomplete one
	assert!(binding::select(&merged, None, &root.join("other")).is_ok());

	let err = binding::select(&merged, None, &root.join("web")).unwrap_err();
	match err {
		UploadError::Config(ConfigError::MissingField { alias, .. }) => {
			assert_eq!(alias, "broken");
		}
		other => panic!("expected MissingField, got {:?}", other),
	}
}

// vim: ts=4
