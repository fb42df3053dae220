//! Parses the search/replace fence-block patch format (spec.md §4.2) into an
//! ordered sequence of `SearchReplaceBlock`s.

use crate::error::{Error, Result};
use crate::primitives::strip_crlf;
use once_cell::sync::Lazy;
use regex::Regex;

/// One `<<<<<<< SEARCH … ======= … >>>>>>> REPLACE` triple. Either side may
/// be empty: empty `search` means insertion, empty `replace` means deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchReplaceBlock {
	pub search: String,
	pub replace: String,
}

static OPEN_CONTAINS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<<<<<<< SEARCH").unwrap());
static OPEN_LINE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^[ \t]*<<<<<<< SEARCH[ \t]*$").unwrap());
static SEP_LINE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^[ \t]*=======+[ \t]*$").unwrap());
static CLOSE_LINE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^[ \t]*>>>>>>> REPLACE[ \t]*$").unwrap());
static LINE_NUM_PREFIX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*\d+\s*\|").unwrap());

/// Parses `patch_text` into an ordered list of search/replace blocks.
///
/// Preprocessing: if the first physical line doesn't itself contain the
/// opening fence, it's discarded (it's assumed to be a caller-supplied
/// filename line). Returns `InvalidDiffFormat` if no block is produced.
pub fn parse_search_replace_blocks(patch_text: &str) -> Result<Vec<SearchReplaceBlock>> {
	let text = strip_crlf(patch_text);
	let text = strip_leading_filename_line(&text);

	let mut blocks = Vec::new();
	let mut pos = 0usize;

	loop {
		let Some(open) = OPEN_LINE_RE.find_at(&text, pos) else {
			break;
		};
		let Some(sep) = SEP_LINE_RE.find_at(&text, open.end()) else {
			break;
		};
		let Some(close) = CLOSE_LINE_RE.find_at(&text, sep.end()) else {
			break;
		};

		let search_raw = &text[open.end()..sep.start()];
		let replace_raw = &text[sep.end()..close.start()];

		blocks.push(SearchReplaceBlock {
			search: clean_block_text(search_raw),
			replace: clean_block_text(replace_raw),
		});

		pos = close.end();
	}

	if blocks.is_empty() {
		return Err(Error::InvalidDiffFormat);
	}

	Ok(blocks)
}

// region:    --- Support

/// If the first physical line doesn't itself contain the opening fence,
/// discard everything up to and including the first newline.
fn strip_leading_filename_line(text: &str) -> String {
	let first_line_end = text.find('\n').map(|i| i + 1).unwrap_or(text.len());
	let first_line = &text[..first_line_end];

	if OPEN_CONTAINS_RE.is_match(first_line) {
		text.to_string()
	} else {
		text[first_line_end..].to_string()
	}
}

/// Applies the block-cleaning rules (spec.md §4.2, significant semantics):
/// strip a single leading newline introduced by the fence match, preserve a
/// lone `\n` (the "search for one blank line" representation), otherwise
/// strip a single trailing newline, then strip `N|` line-number prefixes
/// when every non-blank line carries one.
fn clean_block_text(raw: &str) -> String {
	let stripped_leading = raw.strip_prefix('\n').unwrap_or(raw);

	if stripped_leading == "\n" {
		return stripped_leading.to_string();
	}

	let cleaned = stripped_leading.strip_suffix('\n').unwrap_or(stripped_leading);

	strip_line_number_prefixes(cleaned)
}

/// Strips `N|` prefixes from every line, but only when every non-blank line
/// carries one (a ubiquity check that avoids mangling content that merely
/// contains a pipe character).
fn strip_line_number_prefixes(text: &str) -> String {
	let lines: Vec<&str> = text.split('\n').collect();

	let ubiquitous = lines.iter().any(|l| !l.trim().is_empty())
		&& lines.iter().all(|l| l.trim().is_empty() || LINE_NUM_PREFIX_RE.is_match(l));

	if !ubiquitous {
		return text.to_string();
	}

	lines
		.iter()
		.map(|line| match LINE_NUM_PREFIX_RE.find(line) {
			Some(m) => &line[m.end()..],
			None => line,
		})
		.collect::<Vec<_>>()
		.join("\n")
}

// endregion: --- Support
