use super::Matcher;
use crate::cancel::CancelToken;
use crate::error::Result;
use std::path::Path;

/// Matches a file's base name against a `*`/`?` pattern.
#[derive(Debug, Clone)]
pub struct WildcardMatcher {
    pattern: Vec<char>,
    ignore_case: bool,
}

impl WildcardMatcher {
    pub fn new(pattern: &str, ignore_case: bool) -> Self {
        let pattern = if ignore_case {
            pattern.to_lowercase()
        } else {
            pattern.to_string()
        };
        Self {
            pattern: pattern.chars().collect(),
            ignore_case,
        }
    }

    pub fn is_match(&self, name: &str) -> bool {
        if self.ignore_case {
            let folded: Vec<char> = name.to_lowercase().chars().collect();
            match_chars(&folded, &self.pattern)
        } else {
            let subject: Vec<char> = name.chars().collect();
            match_chars(&subject, &self.pattern)
        }
    }
}

impl Matcher for WildcardMatcher {
    fn matches(&self, _cancel: &CancelToken, path: &Path) -> Result<bool> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        Ok(self.is_match(&name))
    }
}

/// `*` matches any run of characters, `?` exactly one, everything else itself.
pub fn wildcard_match(subject: &str, pattern: &str, ignore_case: bool) -> bool {
    WildcardMatcher::new(pattern, ignore_case).is_match(subject)
}

/// Two cursors plus a bookmark at the most recent `*`. On a mismatch we retry
/// with that star swallowing one more subject character, so every position is
/// revisited at most once per star: O(n * m) worst case, constant extra space.
fn match_chars(subject: &[char], pattern: &[char]) -> bool {
    let (mut s, mut p) = (0, 0);
    let mut star: Option<(usize, usize)> = None;

    while s < subject.len() {
        match pattern.get(p) {
            Some('*') => {
                star = Some((p, s));
                p += 1;
            }
            Some(&c) if c == '?' || c == subject[s] => {
                s += 1;
                p += 1;
            }
            _ => match star {
                Some((star_p, star_s)) => {
                    p = star_p + 1;
                    s = star_s + 1;
                    star = Some((star_p, star_s + 1));
                }
                None => return false,
            },
        }
    }

    pattern[p..].iter().all(|&c| c == '*')
}
