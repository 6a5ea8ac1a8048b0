//! Matchers deciding whether a surviving file is a hit
pub mod literal;
pub mod regex_line;
pub mod wildcard;

use crate::cancel::CancelToken;
use crate::error::Result;
use std::path::Path;

pub use literal::{LiteralMatcher, MAX_CONTENT_SIZE};
pub use regex_line::RegexMatcher;
pub use wildcard::{WildcardMatcher, wildcard_match};

/// Decides whether the file at `path` is a hit.
///
/// Name matchers do no I/O. Content matchers open the file themselves, close
/// it on every exit path, and report I/O failures as errors; whether those
/// errors matter is the caller's decision. Long-running matchers poll
/// `cancel` and return `RfseekError::Cancelled` once it fires.
pub trait Matcher: Send + Sync {
    fn matches(&self, cancel: &CancelToken, path: &Path) -> Result<bool>;
}
