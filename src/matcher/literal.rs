use super::Matcher;
use crate::cancel::CancelToken;
use crate::error::Result;
use log::debug;
use memchr::memmem::Finder;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Files above this size are never read by the literal matcher.
pub const MAX_CONTENT_SIZE: u64 = 10 * 1024 * 1024;

/// Substring search over the whole (bounded) content of a file.
pub struct LiteralMatcher {
    needle: String,
    finder: Finder<'static>,
    ignore_case: bool,
}

impl LiteralMatcher {
    pub fn new(pattern: &str, ignore_case: bool) -> Self {
        let needle = if ignore_case {
            pattern.to_lowercase()
        } else {
            pattern.to_string()
        };
        let finder = Finder::new(needle.as_bytes()).into_owned();
        Self {
            needle,
            finder,
            ignore_case,
        }
    }

    pub fn is_match(&self, content: &[u8]) -> bool {
        if self.ignore_case {
            String::from_utf8_lossy(content)
                .to_lowercase()
                .contains(&self.needle)
        } else {
            self.finder.find(content).is_some()
        }
    }
}

impl Matcher for LiteralMatcher {
    fn matches(&self, cancel: &CancelToken, path: &Path) -> Result<bool> {
        cancel.check()?;

        let file = File::open(path)?;
        let size = file.metadata()?.len();
        if size > MAX_CONTENT_SIZE {
            debug!("Skipping large file ({size} bytes): {}", path.display());
            return Ok(false);
        }

        // The file may have grown since it was stat'ed.
        let mut content = Vec::with_capacity(size as usize);
        file.take(MAX_CONTENT_SIZE + 1).read_to_end(&mut content)?;
        if content.len() as u64 > MAX_CONTENT_SIZE {
            return Ok(false);
        }

        Ok(self.is_match(&content))
    }
}
