//! Composes the new text for a search/replace block: insertion, deletion,
//! and indentation-preserving replacement (spec.md §4.4).

use crate::error::{Error, Result};
use crate::primitives::{common_indent, leading_indent};
use crate::sr_locator::{self, LocateMatch};
use crate::sr_parser::SearchReplaceBlock;

/// 1-based inclusive bounds restricting the locator, per spec.md §6.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchReplaceOptions {
	pub start_line: Option<usize>,
	pub end_line: Option<usize>,
}

/// Applies `blocks` in order to `original`, feeding each block's output into
/// the next.
pub fn apply_search_replace_blocks(
	original: &str,
	blocks: &[SearchReplaceBlock],
	options: SearchReplaceOptions,
) -> Result<String> {
	let source_len = original.split('\n').count();
	sr_locator::validate_line_range(options.start_line, options.end_line, source_len)?;

	let mut working = original.to_string();
	for block in blocks {
		working = apply_one_block(&working, block, options)?;
	}
	Ok(working)
}

fn apply_one_block(working: &str, block: &SearchReplaceBlock, options: SearchReplaceOptions) -> Result<String> {
	if block.search.is_empty() {
		return apply_insertion(working, &block.replace, options.start_line);
	}

	apply_replacement(working, block, options)
}

// region:    --- Insertion

fn apply_insertion(working: &str, replace: &str, start_line: Option<usize>) -> Result<String> {
	let Some(start_line) = start_line else {
		return Err(Error::InsertionRequiresLineNumber);
	};

	if working.is_empty() {
		return Ok(replace.to_string());
	}

	let lines: Vec<&str> = working.split('\n').collect();
	let insert_at = start_line.saturating_sub(1).min(lines.len());
	let insert_at = if start_line == 0 { 0 } else { insert_at };

	let indent = infer_insertion_indent(&lines, insert_at);
	let new_lines = reindent(replace, &indent);

	let mut result_lines: Vec<String> = Vec::with_capacity(lines.len() + new_lines.len());
	result_lines.extend(lines[..insert_at].iter().map(|s| s.to_string()));
	result_lines.extend(new_lines);
	result_lines.extend(lines[insert_at..].iter().map(|s| s.to_string()));

	Ok(result_lines.join("\n"))
}

fn infer_insertion_indent(lines: &[&str], insert_at: usize) -> String {
	if insert_at >= lines.len() {
		return lines.last().map(|l| leading_indent(l).to_string()).unwrap_or_default();
	}

	let cur = leading_indent(lines[insert_at]).to_string();

	if insert_at == 0 {
		return cur;
	}

	let prev = leading_indent(lines[insert_at - 1]).to_string();
	let trimmed_prev = lines[insert_at - 1].trim();

	let is_out_dent = prev.chars().count() > cur.chars().count() && !lines[insert_at].trim().is_empty();
	if is_out_dent {
		return prev;
	}

	if trimmed_prev.ends_with('{') || trimmed_prev.ends_with('[') || trimmed_prev.ends_with('(') {
		return format!("{prev}    ");
	}

	cur
}

// endregion: --- Insertion

// region:    --- Replacement / deletion

fn apply_replacement(working: &str, block: &SearchReplaceBlock, options: SearchReplaceOptions) -> Result<String> {
	let source_lines: Vec<&str> = working.split('\n').collect();

	let search_line_count = if is_blank_line_search(&block.search) {
		block.search.chars().count().max(1)
	} else {
		block.search.split('\n').count()
	};

	let located: Option<LocateMatch> = sr_locator::locate(&source_lines, &block.search, options.start_line, options.end_line);

	let Some(located) = located else {
		return Err(if options.start_line.is_some() || options.end_line.is_some() {
			Error::SearchBlockNotFoundInRange {
				start_line: options.start_line.unwrap_or(1),
				end_line: options.end_line.unwrap_or(source_lines.len()),
			}
		} else {
			Error::SearchBlockNotFound
		});
	};

	let m_start = located.index;
	let m_end = (m_start + search_line_count).min(source_lines.len());

	let source_indent = common_indent(&source_lines[m_start..m_end].join("\n"));

	let new_lines: Vec<String> = if block.replace.is_empty() {
		Vec::new()
	} else {
		reindent(&block.replace, &source_indent)
	};

	let mut result_lines: Vec<String> = Vec::with_capacity(source_lines.len() + new_lines.len());
	result_lines.extend(source_lines[..m_start].iter().map(|s| s.to_string()));
	result_lines.extend(new_lines);
	result_lines.extend(source_lines[m_end..].iter().map(|s| s.to_string()));

	Ok(result_lines.join("\n"))
}

fn is_blank_line_search(search: &str) -> bool {
	!search.is_empty() && search.chars().all(|c| c == '\n')
}

// endregion: --- Replacement / deletion

/// Strips `replace`'s common indent and prepends `target_indent` to every
/// non-blank line; blank lines stay blank rather than being padded.
fn reindent(replace: &str, target_indent: &str) -> Vec<String> {
	let base = common_indent(replace);
	replace
		.split('\n')
		.map(|line| {
			if line.trim().is_empty() {
				String::new()
			} else {
				let stripped = line.strip_prefix(base.as_str()).unwrap_or(line);
				format!("{target_indent}{stripped}")
			}
		})
		.collect()
}
