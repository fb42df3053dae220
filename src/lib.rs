//! Applies textual patches — unified-diff hunks or search/replace fence
//! blocks — to in-memory source text, tolerating drift between the patch
//! and its target via fuzzy matching and hunk splitting.
//!
//! The two public entry points, [`apply_unified_diff`] and
//! [`apply_search_replace`], are pure functions: no I/O, no concurrency,
//! no shared state across calls.

// region:    --- Modules

mod error;
mod primitives;
mod result;
mod sr_applier;
mod sr_locator;
mod sr_parser;
mod ud_applier;
mod ud_parser;

pub use error::ErrorCode;
pub use result::{ApplyError, ApplyResult};
pub use sr_applier::SearchReplaceOptions;
pub use sr_parser::SearchReplaceBlock;
pub use ud_parser::Hunk;

// endregion: --- Modules

/// Applies a unified-diff `diff` to `original`, returning the patched text
/// or a structured [`ApplyError`].
///
/// Hunks are applied in order; overlapping hunks are rejected outright.
/// Each hunk is located first by exact match, then by a global
/// Levenshtein-scored fuzzy scan, and finally (if both fail) by splitting
/// the hunk into independently-locatable change blocks.
pub fn apply_unified_diff(original: &str, diff: &str) -> ApplyResult {
	result::to_apply_result(apply_unified_diff_inner(original, diff))
}

fn apply_unified_diff_inner(original: &str, diff: &str) -> error::Result<String> {
	let hunks = ud_parser::parse_unified_diff(diff)?;
	ud_applier::apply_unified_diff_hunks(original, &hunks)
}

/// Applies a search/replace fence-block `patch` to `original`, returning
/// the patched text or a structured [`ApplyError`].
///
/// `options.start_line` / `options.end_line` (1-based, inclusive) restrict
/// where the locator looks; they are ignored by [`apply_unified_diff`].
pub fn apply_search_replace(original: &str, patch: &str, options: Option<SearchReplaceOptions>) -> ApplyResult {
	result::to_apply_result(apply_search_replace_inner(original, patch, options.unwrap_or_default()))
}

fn apply_search_replace_inner(original: &str, patch: &str, options: SearchReplaceOptions) -> error::Result<String> {
	let blocks = sr_parser::parse_search_replace_blocks(patch)?;
	sr_applier::apply_search_replace_blocks(original, &blocks, options)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_apply_unified_diff_public_entry_point() {
		// -- Setup & Fixtures
		let original = "a\nb\nc\n";
		let diff = "@@ -1,3 +1,3 @@\n a\n-b\n+B\n c\n";

		// -- Exec
		let out = apply_unified_diff(original, diff).unwrap();

		// -- Check
		assert_eq!(out, "a\nB\nc\n");
	}

	#[test]
	fn test_apply_unified_diff_invalid_format() {
		let err = apply_unified_diff("a\n", "not a diff").unwrap_err();
		assert_eq!(err.code, ErrorCode::InvalidDiffFormat);
	}

	#[test]
	fn test_apply_search_replace_public_entry_point_with_default_options() {
		// -- Setup & Fixtures
		let original = "function hello() {\n    console.log(\"hello\")\n}\n";
		let patch =
			"<<<<<<< SEARCH\nconsole.log(\"hello\")\n=======\nconsole.log(\"hello world\");\n>>>>>>> REPLACE";

		// -- Exec
		let out = apply_search_replace(original, patch, None).unwrap();

		// -- Check
		assert!(out.contains("console.log(\"hello world\");"));
	}

	#[test]
	fn test_apply_search_replace_honors_explicit_range_options() {
		// -- Setup & Fixtures
		let original = "a\nprocess()\nb\nc\nd\ne\nf\ng\nprocess()\ni\nj\nk\nl";
		let patch = "<<<<<<< SEARCH\nprocess()\n=======\nprocess_v2()\n>>>>>>> REPLACE";
		let options = SearchReplaceOptions {
			start_line: Some(9),
			end_line: Some(13),
		};

		// -- Exec
		let out = apply_search_replace(original, patch, Some(options)).unwrap();

		// -- Check
		let out_lines: Vec<&str> = out.split('\n').collect();
		assert_eq!(out_lines[1], "process()");
		assert_eq!(out_lines[8], "process_v2()");
	}

	#[test]
	fn test_apply_search_replace_start_line_beyond_source_is_invalid_range_not_not_found() {
		// -- Setup & Fixtures: a 3-line source, a range starting well past its
		// end. This must report INVALID_LINE_RANGE, not a misleading
		// SEARCH_BLOCK_NOT_FOUND_IN_RANGE from an empty, silently-clamped window.
		let original = "one\ntwo\nthree";
		let patch = "<<<<<<< SEARCH\nthree\n=======\nTHREE\n>>>>>>> REPLACE";
		let options = SearchReplaceOptions {
			start_line: Some(100),
			end_line: None,
		};

		// -- Exec
		let err = apply_search_replace(original, patch, Some(options)).unwrap_err();

		// -- Check
		assert_eq!(err.code, ErrorCode::InvalidLineRange);
	}

	#[test]
	fn test_apply_search_replace_invalid_line_range_rejected() {
		let patch = "<<<<<<< SEARCH\nx\n=======\ny\n>>>>>>> REPLACE";
		let options = SearchReplaceOptions {
			start_line: Some(10),
			end_line: Some(2),
		};

		let err = apply_search_replace("a\nb\n", patch, Some(options)).unwrap_err();

		assert_eq!(err.code, ErrorCode::InvalidLineRange);
	}

	#[test]
	fn test_multi_block_patch_applies_in_order() {
		// -- Setup & Fixtures
		let original = "one\ntwo\nthree\n";
		let patch = "<<<<<<< SEARCH\none\n=======\nONE\n>>>>>>> REPLACE\n\n<<<<<<< SEARCH\nthree\n=======\nTHREE\n>>>>>>> REPLACE";

		// -- Exec
		let out = apply_search_replace(original, patch, None).unwrap();

		// -- Check
		assert_eq!(out, "ONE\ntwo\nTHREE\n");
	}
}
