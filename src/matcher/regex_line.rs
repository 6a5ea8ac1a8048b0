use super::Matcher;
use crate::cancel::CancelToken;
use crate::error::Result;
use regex::bytes::Regex;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Line-by-line regular expression scan. Stops at the first matching line.
#[derive(Debug, Clone)]
pub struct RegexMatcher {
    regex: Regex,
}

impl RegexMatcher {
    /// Fails when `pattern` is not a valid expression.
    pub fn new(pattern: &str, ignore_case: bool) -> Result<Self> {
        let source = if ignore_case {
            format!("(?i){pattern}")
        } else {
            pattern.to_string()
        };
        Ok(Self {
            regex: Regex::new(&source)?,
        })
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    pub fn is_match_line(&self, line: &[u8]) -> bool {
        self.regex.is_match(line)
    }
}

impl Matcher for RegexMatcher {
    fn matches(&self, cancel: &CancelToken, path: &Path) -> Result<bool> {
        let file = File::open(path)?;
        let mut reader = BufReader::with_capacity(READ_BUFFER_SIZE, file);
        let mut line = Vec::new();

        loop {
            cancel.check()?;

            line.clear();
            if reader.read_until(b'\n', &mut line)? == 0 {
                return Ok(false);
            }
            if self.is_match_line(trim_line_ending(&line)) {
                return Ok(true);
            }
        }
    }
}

fn trim_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
