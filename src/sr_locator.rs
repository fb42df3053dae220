//! Locates the source region a search/replace block's `search` text refers
//! to, honoring an explicit line range or inferring a search window, and
//! applies semantic rejection to fuzzy matches that look plausible but are
//! likely a different edit entirely (spec.md §4.3).

use crate::error::{Error, Result};
use crate::primitives::levenshtein;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::HashSet;

/// Radius (in source lines) around a reference-line anchor to search, when
/// no explicit line range is given.
const REFERENCE_WINDOW_RADIUS: usize = 200;
/// Cap on the search window when no anchor line can be found at all.
const NO_ANCHOR_SCAN_CAP: usize = 500;
/// Acceptance threshold ratio against the untrimmed search text length.
const ACCEPTANCE_RATIO: f64 = 0.35;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocateMatch {
	pub index: usize,
	pub distance: usize,
}

/// Validates caller-supplied `start_line`/`end_line` (both 1-based
/// inclusive) for internal consistency and against `source_len`, the
/// number of lines in the source being patched.
pub fn validate_line_range(start_line: Option<usize>, end_line: Option<usize>, source_len: usize) -> Result<()> {
	if let Some(s) = start_line {
		if s < 1 {
			return Err(Error::invalid_line_range(format!("start_line must be >= 1, got {s}")));
		}
		if s > source_len {
			return Err(Error::invalid_line_range(format!(
				"start_line ({s}) exceeds source length ({source_len})"
			)));
		}
	}
	if let Some(e) = end_line {
		if e < 1 {
			return Err(Error::invalid_line_range(format!("end_line must be >= 1, got {e}")));
		}
		if e > source_len {
			return Err(Error::invalid_line_range(format!(
				"end_line ({e}) exceeds source length ({source_len})"
			)));
		}
	}
	if let (Some(s), Some(e)) = (start_line, end_line) {
		if s > e {
			return Err(Error::invalid_line_range(format!(
				"start_line ({s}) must be <= end_line ({e})"
			)));
		}
	}
	Ok(())
}

/// Finds the best source region for `search_text`, or `None` if nothing
/// clears the acceptance threshold.
pub fn locate(
	source_lines: &[&str],
	search_text: &str,
	start_line: Option<usize>,
	end_line: Option<usize>,
) -> Option<LocateMatch> {
	let (win_start, win_end) = search_window(source_lines, search_text, start_line, end_line);
	if win_end < win_start {
		return None;
	}

	if is_blank_line_search(search_text) {
		return locate_blank_lines(source_lines, search_text, win_start, win_end);
	}

	let search_lines: Vec<&str> = search_text.split('\n').collect();
	let search_len = search_lines.len();
	if search_len == 0 {
		return None;
	}

	let search_trimmed_joined = search_lines.iter().map(|l| l.trim()).collect::<Vec<_>>().join("\n");

	let mut best: Option<(usize, usize)> = None;
	let mut i = win_start;
	while i + search_len <= win_end {
		let slice_trimmed_joined = source_lines[i..i + search_len]
			.iter()
			.map(|l| l.trim())
			.collect::<Vec<_>>()
			.join("\n");
		let dist = levenshtein(&slice_trimmed_joined, &search_trimmed_joined);

		let is_better = match best {
			Some((_, best_dist)) => dist < best_dist,
			None => true,
		};
		if is_better {
			best = Some((i, dist));
		}
		if dist == 0 {
			break;
		}
		i += 1;
	}

	let (index, distance) = best?;

	let threshold = (ACCEPTANCE_RATIO * search_text.chars().count() as f64).floor() as usize;
	if distance > threshold {
		return None;
	}

	if distance > 0 {
		let slice_text = source_lines[index..index + search_len].join("\n");
		if is_semantically_rejected(search_text, &slice_text) {
			tracing::debug!(index, distance, "semantic rejection of fuzzy search/replace candidate");
			return None;
		}
		tracing::warn!(index, distance, threshold, "search/replace block matched fuzzily, not exactly");
	}

	Some(LocateMatch { index, distance })
}

// region:    --- Window inference

fn search_window(
	source_lines: &[&str],
	search_text: &str,
	start_line: Option<usize>,
	end_line: Option<usize>,
) -> (usize, usize) {
	let len = source_lines.len();

	if start_line.is_some() || end_line.is_some() {
		let start_idx = start_line.unwrap_or(1).saturating_sub(1).min(len);
		let end_idx = end_line.unwrap_or(len).min(len);
		return (start_idx, end_idx.max(start_idx));
	}

	if let Some(reference) = search_text.split('\n').find(|l| !l.trim().is_empty()) {
		if let Some(r) = source_lines.iter().position(|l| *l == reference) {
			let search_len = search_text.split('\n').count();
			let lo = r.saturating_sub(REFERENCE_WINDOW_RADIUS);
			let hi = (r + search_len + REFERENCE_WINDOW_RADIUS).min(len);
			return (lo, hi);
		}
	}

	(0, len.min(NO_ANCHOR_SCAN_CAP))
}

// endregion: --- Window inference

// region:    --- Blank-line special case

/// A search text consisting solely of newline characters represents a
/// search for that many consecutive blank lines.
fn is_blank_line_search(search_text: &str) -> bool {
	!search_text.is_empty() && search_text.chars().all(|c| c == '\n')
}

fn locate_blank_lines(source_lines: &[&str], search_text: &str, win_start: usize, win_end: usize) -> Option<LocateMatch> {
	let n = search_text.chars().count().max(1);
	if win_start + n > win_end {
		return None;
	}
	for i in win_start..=(win_end - n) {
		if source_lines[i..i + n].iter().all(|l| l.is_empty()) {
			return Some(LocateMatch { index: i, distance: 0 });
		}
	}
	None
}

// endregion: --- Blank-line special case

// region:    --- Semantic rejection

static LINE_COMMENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"//[^\n]*").unwrap());
static BLOCK_COMMENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)/\*.*?\*/").unwrap());
static NUMERIC_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+(\.\d+)?").unwrap());
static IDENTIFIER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z_][A-Za-z0-9_]*").unwrap());
static QUOTED_LITERAL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"["'](.*?)["']"#).unwrap());

fn strip_comments(text: &str) -> String {
	let no_block = BLOCK_COMMENT_RE.replace_all(text, "");
	LINE_COMMENT_RE.replace_all(&no_block, "").into_owned()
}

fn extract_numeric_literals(text: &str) -> Vec<String> {
	NUMERIC_RE.find_iter(text).map(|m| m.as_str().to_string()).collect()
}

fn extract_identifiers(text: &str) -> HashSet<String> {
	IDENTIFIER_RE
		.find_iter(text)
		.map(|m| m.as_str().to_string())
		.filter(|s| s.chars().count() > 1)
		.collect()
}

fn extract_quoted_literals(text: &str) -> Vec<String> {
	QUOTED_LITERAL_RE.captures_iter(text).map(|c| c[1].to_string()).collect()
}

fn mask_quoted_literals(text: &str) -> String {
	QUOTED_LITERAL_RE
		.replace_all(text, |caps: &Captures| {
			let quote = caps[0].chars().next().unwrap_or('"');
			format!("{quote}{quote}")
		})
		.into_owned()
}

/// Rejects a fuzzy (non-zero-distance) match whose only real difference is
/// a numeric literal, a paired identifier rename, or a large change inside
/// a string literal — patterns that look like a plausible match but are a
/// different edit in disguise.
fn is_semantically_rejected(search_untrimmed: &str, slice_untrimmed: &str) -> bool {
	let search_code = strip_comments(search_untrimmed);
	let slice_code = strip_comments(slice_untrimmed);

	// 1. Numeric check.
	let search_nums = extract_numeric_literals(&search_code);
	if !search_nums.is_empty() && search_nums != extract_numeric_literals(&slice_code) {
		return true;
	}

	// 2. Identifier substitution check.
	let search_ids = extract_identifiers(&search_code);
	let slice_ids = extract_identifiers(&slice_code);
	let only_in_search: Vec<&String> = search_ids.difference(&slice_ids).collect();
	let only_in_slice: Vec<&String> = slice_ids.difference(&search_ids).collect();
	if !only_in_search.is_empty() && !only_in_slice.is_empty() && only_in_search.len() == only_in_slice.len() {
		return true;
	}

	// 3. String-literal check.
	let search_lits = extract_quoted_literals(&search_code);
	let slice_lits = extract_quoted_literals(&slice_code);
	if !search_lits.is_empty() && search_lits.len() == slice_lits.len() {
		let masked_search = mask_quoted_literals(&search_code);
		let masked_slice = mask_quoted_literals(&slice_code);
		if levenshtein(&masked_search, &masked_slice) <= 2 {
			let search_joined = search_lits.concat();
			let slice_joined = slice_lits.concat();
			let lit_dist = levenshtein(&search_joined, &slice_joined);
			if lit_dist as f64 > search_joined.chars().count() as f64 * 0.5 {
				return true;
			}
		}
	}

	false
}

// endregion: --- Semantic rejection
