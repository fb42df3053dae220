//! Internal error type and the public, closed `ErrorCode` taxonomy
//! (spec.md §7) that every `ApplyResult::Err` carries.

use derive_more::{Display, From};

pub type Result<T> = core::result::Result<T, Error>;

/// The closed set of error codes a caller can match on. Messages are
/// advisory only; callers should match on `code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
	InvalidDiffFormat,
	OverlappingHunks,
	ContextMismatch,
	InsertionRequiresLineNumber,
	InvalidLineRange,
	SearchBlockNotFoundInRange,
	SearchBlockNotFound,
}

impl ErrorCode {
	/// The `SCREAMING_SNAKE_CASE` wire form named in spec.md §6/§7.
	pub fn as_str(self) -> &'static str {
		match self {
			ErrorCode::InvalidDiffFormat => "INVALID_DIFF_FORMAT",
			ErrorCode::OverlappingHunks => "OVERLAPPING_HUNKS",
			ErrorCode::ContextMismatch => "CONTEXT_MISMATCH",
			ErrorCode::InsertionRequiresLineNumber => "INSERTION_REQUIRES_LINE_NUMBER",
			ErrorCode::InvalidLineRange => "INVALID_LINE_RANGE",
			ErrorCode::SearchBlockNotFoundInRange => "SEARCH_BLOCK_NOT_FOUND_IN_RANGE",
			ErrorCode::SearchBlockNotFound => "SEARCH_BLOCK_NOT_FOUND",
		}
	}
}

impl std::fmt::Display for ErrorCode {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.as_str())
	}
}

/// Internal error used by every parsing/locating/applying step. Converts
/// losslessly to `(ErrorCode, message)` at the two public entry points.
#[derive(Debug, Display, From)]
#[display("{self:?}")]
pub enum Error {
	#[display("{_0}")]
	#[from(String, &String, &str)]
	Custom(String),

	#[display("No hunks or search-replace blocks found in patch text")]
	InvalidDiffFormat,

	#[display("Hunks at original lines {a_start}..{a_end} and {b_start}..{b_end} overlap")]
	OverlappingHunks {
		a_start: usize,
		a_end: usize,
		b_start: usize,
		b_end: usize,
	},

	#[display("Could not locate hunk context in source (original_start_line={original_start_line})")]
	ContextMismatch { original_start_line: usize },

	#[display("Insertion block (empty search) requires a start_line")]
	InsertionRequiresLineNumber,

	#[display("start_line/end_line inconsistent with source: {reason}")]
	InvalidLineRange { reason: String },

	#[display("Search block not found within lines {start_line}..{end_line}")]
	SearchBlockNotFoundInRange { start_line: usize, end_line: usize },

	#[display("Search block not found")]
	SearchBlockNotFound,
}

impl std::error::Error for Error {}

impl Error {
	pub fn invalid_line_range(reason: impl Into<String>) -> Self {
		Self::InvalidLineRange { reason: reason.into() }
	}

	pub fn overlapping_hunks(a_start: usize, a_end: usize, b_start: usize, b_end: usize) -> Self {
		Self::OverlappingHunks { a_start, a_end, b_start, b_end }
	}

	pub fn context_mismatch(original_start_line: usize) -> Self {
		Self::ContextMismatch { original_start_line }
	}

	/// Maps this internal error onto the public `(ErrorCode, message)` pair.
	pub fn code(&self) -> ErrorCode {
		match self {
			Error::Custom(_) => ErrorCode::InvalidDiffFormat,
			Error::InvalidDiffFormat => ErrorCode::InvalidDiffFormat,
			Error::OverlappingHunks { .. } => ErrorCode::OverlappingHunks,
			Error::ContextMismatch { .. } => ErrorCode::ContextMismatch,
			Error::InsertionRequiresLineNumber => ErrorCode::InsertionRequiresLineNumber,
			Error::InvalidLineRange { .. } => ErrorCode::InvalidLineRange,
			Error::SearchBlockNotFoundInRange { .. } => ErrorCode::SearchBlockNotFoundInRange,
			Error::SearchBlockNotFound => ErrorCode::SearchBlockNotFound,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_error_code_as_str_matches_spec_taxonomy() {
		assert_eq!(ErrorCode::InvalidDiffFormat.as_str(), "INVALID_DIFF_FORMAT");
		assert_eq!(ErrorCode::OverlappingHunks.as_str(), "OVERLAPPING_HUNKS");
		assert_eq!(ErrorCode::ContextMismatch.as_str(), "CONTEXT_MISMATCH");
		assert_eq!(
			ErrorCode::InsertionRequiresLineNumber.as_str(),
			"INSERTION_REQUIRES_LINE_NUMBER"
		);
		assert_eq!(ErrorCode::InvalidLineRange.as_str(), "INVALID_LINE_RANGE");
		assert_eq!(
			ErrorCode::SearchBlockNotFoundInRange.as_str(),
			"SEARCH_BLOCK_NOT_FOUND_IN_RANGE"
		);
		assert_eq!(ErrorCode::SearchBlockNotFound.as_str(), "SEARCH_BLOCK_NOT_FOUND");
	}

	#[test]
	fn test_error_code_roundtrips_through_error() {
		let err = Error::context_mismatch(12);
		assert_eq!(err.code(), ErrorCode::ContextMismatch);
	}
}
