use crate::error::{Result, RfseekError};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_WORKERS: usize = 4;

/// Everything a search needs to know. Built once by the caller and then only
/// ever borrowed; no component mutates it once a search has started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    pub root: PathBuf,
    pub ignore_case: bool,
    pub recursive: bool,
    /// `None` means unbounded.
    pub max_depth: Option<usize>,
    pub exclude_dirs: BTreeSet<String>,
    /// Extensions include their leading dot (`.rs`).
    pub include_exts: BTreeSet<String>,
    pub exclude_exts: BTreeSet<String>,
    pub workers: usize,
    /// `None` means no deadline.
    pub timeout: Option<Duration>,
    pub color: bool,
    pub progress: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            ignore_case: false,
            recursive: true,
            max_depth: None,
            exclude_dirs: BTreeSet::new(),
            include_exts: BTreeSet::new(),
            exclude_exts: BTreeSet::new(),
            workers: DEFAULT_WORKERS,
            timeout: None,
            color: true,
            progress: false,
        }
    }
}

impl SearchConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    pub fn ignore_case(mut self, yes: bool) -> Self {
        self.ignore_case = yes;
        self
    }

    pub fn recursive(mut self, yes: bool) -> Self {
        self.recursive = yes;
        self
    }

    /// Negative values mean unbounded, mirroring the `-1` command-line default.
    pub fn max_depth(mut self, depth: i64) -> Self {
        self.max_depth = usize::try_from(depth).ok();
        self
    }

    pub fn exclude_dirs<I, S>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_dirs.extend(dirs.into_iter().map(Into::into));
        self
    }

    pub fn include_exts<I, S>(mut self, exts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.include_exts
            .extend(exts.into_iter().filter_map(|e| normalize_extension(e.as_ref())));
        self
    }

    pub fn exclude_exts<I, S>(mut self, exts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.exclude_exts
            .extend(exts.into_iter().filter_map(|e| normalize_extension(e.as_ref())));
        self
    }

    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// A zero duration disables the deadline.
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout.filter(|t| !t.is_zero());
        self
    }

    pub fn color(mut self, yes: bool) -> Self {
        self.color = yes;
        self
    }

    pub fn progress(mut self, yes: bool) -> Self {
        self.progress = yes;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(RfseekError::Config(
                "worker count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Prefixes a dot when missing; blank values are dropped.
pub fn normalize_extension(ext: &str) -> Option<String> {
    let ext = ext.trim();
    if ext.is_empty() {
        None
    } else if ext.starts_with('.') {
        Some(ext.to_string())
    } else {
        Some(format!(".{ext}"))
    }
}

/// Optional defaults read from a TOML file. Command-line values take
/// precedence; list values are merged.
#[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub ignore_case: Option<bool>,
    pub color: Option<bool>,
    pub progress: Option<bool>,
    pub workers: Option<usize>,
    /// Humantime syntax, e.g. `"30s"` or `"2m"`.
    pub timeout: Option<String>,
    pub exclude_dirs: Vec<String>,
    pub include_exts: Vec<String>,
    pub exclude_exts: Vec<String>,
}

impl FileConfig {
    pub fn load() -> anyhow::Result<Self> {
        match Self::find_config_path() {
            Some(path) => Self::from_path(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    fn find_config_path() -> Option<PathBuf> {
        if let Some(xdg_config) = dirs::config_dir() {
            let xdg_path = xdg_config.join("rfseek/config.toml");
            if xdg_path.exists() {
                return Some(xdg_path);
            }
        }

        if let Some(home) = dirs::home_dir() {
            let home_path = home.join(".rfseek.toml");
            if home_path.exists() {
                return Some(home_path);
            }
        }

        let current_path = Path::new(".rfseek.toml");
        if current_path.exists() {
            return Some(current_path.to_path_buf());
        }

        None
    }

    pub fn timeout(&self) -> Result<Option<Duration>> {
        self.timeout
            .as_deref()
            .map(|raw| {
                humantime::parse_duration(raw).map_err(|e| {
                    RfseekError::Config(format!("invalid timeout {raw:?} in config file: {e}"))
                })
            })
            .transpose()
    }
}
