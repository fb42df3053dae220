//! Locates and applies unified-diff hunks against the current line view,
//! tolerating drift via fuzzy matching and hunk splitting (spec.md §4.6).

use crate::error::{Error, Result};
use crate::primitives::levenshtein;
use crate::ud_parser::Hunk;

/// Fuzzy-match acceptance ratio against the untrimmed pattern text length.
const ACCEPTANCE_RATIO: f64 = 0.20;
/// Window (in source lines) searched for a drifted context/deletion line.
const DRIFT_SEARCH_HORIZON: usize = 10;
/// Context lines padded on each side of a hunk-split change block.
const SPLIT_CONTEXT: usize = 2;

/// Applies `hunks` (already overlap-validated internally) to `original`.
pub fn apply_unified_diff_hunks(original: &str, hunks: &[Hunk]) -> Result<String> {
	validate_no_overlap(hunks)?;

	let mut lines: Vec<String> = original.split('\n').map(|s| s.to_string()).collect();
	let mut offset: isize = 0;

	for hunk in hunks {
		let prev_len = lines.len() as isize;
		let pattern = hunk.pattern_lines();

		if pattern.is_empty() {
			let insert_at = (hunk.original_start_line as isize + offset).max(0).min(lines.len() as isize) as usize;
			let added: Vec<String> = hunk.added_lines().into_iter().map(|s| s.to_string()).collect();
			lines.splice(insert_at..insert_at, added);
			offset += lines.len() as isize - prev_len;
			continue;
		}

		let hint0 = (hunk.original_start_line as isize - 1 + offset).max(0) as usize;
		let unit_lines = &hunk.lines;

		if apply_single_unit(&mut lines, unit_lines, hint0).is_err() {
			apply_hunk_split(&mut lines, unit_lines, hint0)?;
		}

		offset += lines.len() as isize - prev_len;
	}

	Ok(lines.join("\n"))
}

fn validate_no_overlap(hunks: &[Hunk]) -> Result<()> {
	for i in 0..hunks.len() {
		for j in (i + 1)..hunks.len() {
			let a = &hunks[i];
			let b = &hunks[j];
			let a_end = a.original_start_line + a.original_line_count;
			let b_end = b.original_start_line + b.original_line_count;
			if a.original_start_line < b_end && b.original_start_line < a_end {
				return Err(Error::overlapping_hunks(a.original_start_line, a_end, b.original_start_line, b_end));
			}
		}
	}
	Ok(())
}

/// Locates a single hunk (or hunk-split fragment) and splices its processed
/// output into `lines` in place. Fails with `ContextMismatch` if the pattern
/// cannot be located by the exact, guard-gated fuzzy, strategies.
fn apply_single_unit(lines: &mut Vec<String>, unit_lines: &[String], hint0: usize) -> Result<()> {
	let pattern: Vec<&str> = unit_lines
		.iter()
		.filter(|l| l.starts_with(' ') || l.starts_with('-'))
		.map(|l| l.as_str().get(1..).unwrap_or(""))
		.collect();

	let has_context = unit_lines.iter().any(|l| l.starts_with(' '));

	let s = locate_pattern_start(lines, &pattern, hint0, has_context).ok_or_else(|| Error::context_mismatch(hint0 + 1))?;

	let (processed, consumed) = walk_unit(lines, unit_lines, s);
	lines.splice(s..s + consumed, processed);
	Ok(())
}

fn locate_pattern_start(lines: &[String], pattern: &[&str], hint0: usize, has_context: bool) -> Option<usize> {
	if pattern.is_empty() {
		return None;
	}

	// Step 2: exact fast path.
	if hint0 + pattern.len() <= lines.len() {
		let candidate = lines[hint0..hint0 + pattern.len()].join("\n");
		if candidate == pattern.join("\n") {
			return Some(hint0);
		}
	}

	// Step 3: zero-context guard.
	if !has_context {
		return None;
	}

	// Step 4: global fuzzy.
	if pattern.len() > lines.len() {
		return None;
	}

	let pattern_joined = pattern.join("\n");
	let threshold = (ACCEPTANCE_RATIO * pattern_joined.chars().count() as f64).floor() as usize;

	let mut best: Option<(usize, usize)> = None;
	for i in 0..=(lines.len() - pattern.len()) {
		let slice_joined = lines[i..i + pattern.len()].join("\n");
		let dist = levenshtein(&slice_joined, &pattern_joined);
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
	}

	let (index, distance) = best?;
	if distance <= threshold {
		tracing::warn!(index, distance, threshold, "hunk matched via global fuzzy scan, not exactly");
		Some(index)
	} else {
		None
	}
}

/// Walks `unit_lines` against `lines` starting at `s`, preserving drifted
/// source lines verbatim between located context/deletion anchors.
/// Returns the replacement lines and how many source lines they consumed.
fn walk_unit(lines: &[String], unit_lines: &[String], s: usize) -> (Vec<String>, usize) {
	let mut out = Vec::new();
	let mut s_idx = s;
	let len = lines.len();

	for raw in unit_lines {
		let marker = raw.chars().next().unwrap_or(' ');
		let content = raw.get(1..).unwrap_or("");

		match marker {
			'+' => out.push(content.to_string()),
			' ' | '-' => {
				let window_end = (s_idx + DRIFT_SEARCH_HORIZON).min(len);
				let found = (s_idx..window_end).find(|&i| lines[i] == content);

				if let Some(found_idx) = found {
					out.extend(lines[s_idx..found_idx].iter().cloned());
					if marker == ' ' {
						out.push(lines[found_idx].clone());
					}
					s_idx = found_idx + 1;
				} else {
					if marker == ' ' && s_idx < len {
						out.push(lines[s_idx].clone());
					}
					s_idx = (s_idx + 1).min(len);
				}
			}
			_ => {}
		}
	}

	(out, s_idx - s)
}

/// Fallback when the whole hunk cannot be located: partition it into
/// maximal change blocks padded with context, and apply each independently.
fn apply_hunk_split(lines: &mut Vec<String>, unit_lines: &[String], hint0: usize) -> Result<()> {
	let fragments = split_into_fragments(unit_lines);
	if fragments.is_empty() {
		return Err(Error::context_mismatch(hint0 + 1));
	}

	tracing::warn!(fragment_count = fragments.len(), "hunk did not match as a whole, falling back to hunk splitting");

	for fragment in fragments {
		apply_single_unit(lines, &fragment, hint0)?;
	}
	Ok(())
}

fn split_into_fragments(unit_lines: &[String]) -> Vec<Vec<String>> {
	let mut fragments = Vec::new();
	let n = unit_lines.len();
	let mut i = 0;

	while i < n {
		while i < n && unit_lines[i].starts_with(' ') {
			i += 1;
		}
		if i >= n {
			break;
		}
		let block_start = i;
		while i < n && !unit_lines[i].starts_with(' ') {
			i += 1;
		}
		let block_end = i;

		let pad_start = block_start.saturating_sub(SPLIT_CONTEXT);
		let pad_end = (block_end + SPLIT_CONTEXT).min(n);
		fragments.push(unit_lines[pad_start..pad_end].to_vec());
	}

	fragments
}
