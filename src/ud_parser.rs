//! Parses unified-diff text into an ordered list of hunks (spec.md §4.5).

use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;

/// One `@@ -A,B +C,D @@` hunk and its body lines, markers retained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk {
	pub original_start_line: usize,
	pub original_line_count: usize,
	pub new_start_line: usize,
	pub new_line_count: usize,
	pub lines: Vec<String>,
}

static HEADER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^@@ -(\d+)(?:,(\d+))? \+(\d+)(?:,(\d+))? @@").unwrap());

/// Parses `diff_text` into an ordered list of hunks, or `InvalidDiffFormat`
/// if none were produced.
pub fn parse_unified_diff(diff_text: &str) -> Result<Vec<Hunk>> {
	let mut hunks: Vec<Hunk> = Vec::new();
	let mut current: Option<Hunk> = None;

	for line in diff_text.split('\n') {
		if line.starts_with("---") || line.starts_with("+++") {
			continue;
		}

		if let Some(caps) = HEADER_RE.captures(line) {
			if let Some(h) = current.take() {
				hunks.push(h);
			}

			let original_start_line: usize = caps[1].parse().unwrap_or(0);
			let original_line_count: usize = caps.get(2).map(|m| m.as_str().parse().unwrap_or(1)).unwrap_or(1);
			let new_start_line: usize = caps[3].parse().unwrap_or(0);
			let new_line_count: usize = caps.get(4).map(|m| m.as_str().parse().unwrap_or(1)).unwrap_or(1);

			current = Some(Hunk {
				original_start_line,
				original_line_count,
				new_start_line,
				new_line_count,
				lines: Vec::new(),
			});
			continue;
		}

		if let Some(hunk) = current.as_mut() {
			if line.starts_with(' ') || line.starts_with('+') || line.starts_with('-') {
				hunk.lines.push(line.to_string());
			}
		}
	}

	if let Some(h) = current.take() {
		hunks.push(h);
	}

	if hunks.is_empty() {
		return Err(Error::InvalidDiffFormat);
	}

	Ok(hunks)
}

impl Hunk {
	/// The subsequence of context and deletion lines, markers stripped — the
	/// text expected to already exist in the source.
	pub fn pattern_lines(&self) -> Vec<&str> {
		self.lines
			.iter()
			.filter(|l| l.starts_with(' ') || l.starts_with('-'))
			.map(|l| &l[1..])
			.collect()
	}

	/// The `+`-lines, markers stripped — the text to emit.
	pub fn added_lines(&self) -> Vec<&str> {
		self.lines.iter().filter(|l| l.starts_with('+')).map(|l| &l[1..]).collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_single_hunk() {
		// -- Setup & Fixtures
		let diff = "--- a/f\n+++ b/f\n@@ -1,3 +1,3 @@\n context\n-old\n+new\n context\n";

		// -- Exec
		let hunks = parse_unified_diff(diff).unwrap();

		// -- Check
		assert_eq!(hunks.len(), 1);
		assert_eq!(hunks[0].original_start_line, 1);
		assert_eq!(hunks[0].original_line_count, 3);
		assert_eq!(hunks[0].lines.len(), 4);
	}

	#[test]
	fn test_parse_defaults_missing_counts_to_one() {
		let diff = "@@ -5 +5 @@\n-only\n+replacement\n";

		let hunks = parse_unified_diff(diff).unwrap();

		assert_eq!(hunks[0].original_line_count, 1);
		assert_eq!(hunks[0].new_line_count, 1);
	}

	#[test]
	fn test_parse_multiple_hunks() {
		let diff = "@@ -1,2 +1,2 @@\n context\n-a\n+b\n@@ -10,2 +10,2 @@\n context\n-c\n+d\n";

		let hunks = parse_unified_diff(diff).unwrap();

		assert_eq!(hunks.len(), 2);
		assert_eq!(hunks[1].original_start_line, 10);
	}

	#[test]
	fn test_parse_no_hunks_is_invalid_format() {
		let diff = "not a diff at all";

		let err = parse_unified_diff(diff).unwrap_err();

		assert_eq!(err.code(), crate::error::ErrorCode::InvalidDiffFormat);
	}

	#[test]
	fn test_pattern_lines_strips_markers_keeps_context_and_deletions() {
		let diff = "@@ -1,3 +1,2 @@\n context\n-removed\n+added\n";
		let hunks = parse_unified_diff(diff).unwrap();

		assert_eq!(hunks[0].pattern_lines(), vec!["context", "removed"]);
		assert_eq!(hunks[0].added_lines(), vec!["added"]);
	}

	#[test]
	fn test_parse_insertion_only_hunk_has_empty_pattern() {
		let diff = "@@ -3,0 +4,2 @@\n+first\n+second\n";
		let hunks = parse_unified_diff(diff).unwrap();

		assert!(hunks[0].pattern_lines().is_empty());
		assert_eq!(hunks[0].added_lines(), vec!["first", "second"]);
	}
}
