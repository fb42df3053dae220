//! The public, discriminated outcome of applying a patch (spec.md §3, §6).

use crate::error::{Error, ErrorCode};

/// Structured failure carried by `ApplyResult::Err`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyError {
	pub code: ErrorCode,
	pub message: String,
}

/// Outcome of `apply_unified_diff` / `apply_search_replace`: either the new
/// full text, or a structured error drawn from the closed `ErrorCode` set.
pub type ApplyResult = core::result::Result<String, ApplyError>;

pub(crate) fn to_apply_result(res: crate::error::Result<String>) -> ApplyResult {
	res.map_err(|err| ApplyError {
		code: err.code(),
		message: err.to_string(),
	})
}

impl std::fmt::Display for ApplyError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}: {}", self.code, self.message)
	}
}

impl std::error::Error for ApplyError {}

impl From<Error> for ApplyError {
	fn from(err: Error) -> Self {
		ApplyError {
			code: err.code(),
			message: err.to_string(),
		}
	}
}
