//! Integration tests exercising the two public entry points end to end.

use assertables::assert_contains;
use patchkit::{apply_search_replace, apply_unified_diff, ErrorCode, SearchReplaceOptions};

type Result<T> = core::result::Result<T, Box<dyn std::error::Error>>;

#[test]
fn test_search_replace_seed_scenario_a_exact_replace() -> Result<()> {
	// -- Setup & Fixtures
	let original = "function hello() {\n    console.log(\"hello\")\n}\n";
	let patch = "<<<<<<< SEARCH\nfunction hello() {\n    console.log(\"hello\")\n}\n=======\nfunction hello() {\n    console.log(\"hello world\");\n}\n>>>>>>> REPLACE";

	// -- Exec
	let out = apply_search_replace(original, patch, None)?;

	// -- Check
	assert_eq!(out, "function hello() {\n    console.log(\"hello world\");\n}\n");
	Ok(())
}

#[test]
fn test_search_replace_seed_scenario_c_insertion_infers_indent() -> Result<()> {
	// -- Setup & Fixtures
	let original = "function setup() {\n}\n";
	let patch = "<<<<<<< SEARCH\n=======\nconsole.log(\"setup\");\n>>>>>>> REPLACE";
	let options = SearchReplaceOptions {
		start_line: Some(2),
		end_line: None,
	};

	// -- Exec
	let out = apply_search_replace(original, patch, Some(options))?;

	// -- Check
	assert_eq!(out, "function setup() {\n    console.log(\"setup\");\n}\n");
	Ok(())
}

#[test]
fn test_search_replace_deletion_of_absent_content_fails_cleanly() -> Result<()> {
	// -- Setup & Fixtures
	let original = "a\nb\nc\n";
	let patch = "<<<<<<< SEARCH\nnever here\n=======\n>>>>>>> REPLACE";

	// -- Exec
	let err = apply_search_replace(original, patch, None).unwrap_err();

	// -- Check: a miss is a structured error, never a silent no-op.
	assert_eq!(err.code, ErrorCode::SearchBlockNotFound);
	assert_contains!(err.message, "Search block not found");
	Ok(())
}

#[test]
fn test_search_replace_malformed_patch_is_invalid_format() -> Result<()> {
	let err = apply_search_replace("a\n", "no fences here", None).unwrap_err();
	assert_eq!(err.code, ErrorCode::InvalidDiffFormat);
	Ok(())
}

#[test]
fn test_unified_diff_overlapping_hunks_rejected() -> Result<()> {
	// -- Setup & Fixtures
	let original = "a\nb\nc\nd\n";
	let diff = "@@ -1,2 +1,2 @@\n a\n-b\n+B\n@@ -2,2 +2,2 @@\n-b\n+B2\n c\n";

	// -- Exec
	let err = apply_unified_diff(original, diff).unwrap_err();

	// -- Check
	assert_eq!(err.code, ErrorCode::OverlappingHunks);
	Ok(())
}

#[test]
fn test_unified_diff_global_fuzzy_preserves_drift_seed_e() -> Result<()> {
	// -- Setup & Fixtures: the source carries an inline comment the diff's
	// context line was authored without.
	let original = "fn run() {\n    do_thing(); // ok\n    finish();\n}\n";
	let diff = "@@ -1,4 +1,4 @@\n fn run() {\n     do_thing();\n-    finish();\n+    finish_up();\n }\n";

	// -- Exec
	let out = apply_unified_diff(original, diff)?;

	// -- Check: the user's comment survives, the targeted line is updated.
	assert_contains!(out, "do_thing(); // ok");
	assert_contains!(out, "finish_up();");
	Ok(())
}

#[test]
fn test_roundtrip_identity_search_equals_replace() -> Result<()> {
	// -- Setup & Fixtures
	let original = "fn main() {\n    let x = 1;\n    let y = 2;\n}\n";
	let patch = "<<<<<<< SEARCH\nlet x = 1;\n    let y = 2;\n=======\nlet x = 1;\n    let y = 2;\n>>>>>>> REPLACE";

	// -- Exec
	let out = apply_search_replace(original, patch, None)?;

	// -- Check
	assert_eq!(out, original);
	Ok(())
}

#[test]
fn test_multi_block_patch_with_leading_filename_line() -> Result<()> {
	// -- Setup & Fixtures: a caller-supplied filename line precedes the fences.
	let original = "alpha\nbeta\ngamma\n";
	let patch = "src/demo.rs\n<<<<<<< SEARCH\nalpha\n=======\nALPHA\n>>>>>>> REPLACE\n\n<<<<<<< SEARCH\ngamma\n=======\nGAMMA\n>>>>>>> REPLACE";

	// -- Exec
	let out = apply_search_replace(original, patch, None)?;

	// -- Check
	assert_eq!(out, "ALPHA\nbeta\nGAMMA\n");
	Ok(())
}

#[test]
fn test_unified_diff_pure_insertion_at_file_head() -> Result<()> {
	// -- Setup & Fixtures
	let original = "first\nsecond\n";
	let diff = "@@ -0,0 +1,1 @@\n+header comment\n";

	// -- Exec
	let out = apply_unified_diff(original, diff)?;

	// -- Check
	assert_eq!(out, "header comment\nfirst\nsecond\n");
	Ok(())
}
