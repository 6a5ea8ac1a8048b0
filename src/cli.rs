use crate::config::{DEFAULT_WORKERS, FileConfig, SearchConfig};
use crate::error::Result;
use crate::search::SearchMode;
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "rfseek", author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to search
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub path: PathBuf,

    /// Case-insensitive matching
    #[arg(short = 'i', long, global = true)]
    pub ignore_case: bool,

    /// Colored output (default: true); use `--color=false` to disable
    #[arg(
        short = 'c',
        long,
        global = true,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_name = "BOOL"
    )]
    pub color: Option<bool>,

    /// Show a progress spinner on stderr
    #[arg(short = 'P', long, global = true)]
    pub progress: bool,

    /// Log at info level
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Write logs to a file instead of stderr
    #[arg(long, global = true, value_name = "FILE")]
    pub log: Option<PathBuf>,

    /// Ignore the configuration file
    #[arg(long, global = true)]
    pub no_config: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Find files whose name matches a wildcard pattern (`*` and `?`)
    Name {
        pattern: String,
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Find files containing a literal string
    Content {
        pattern: String,
        #[command(flatten)]
        filters: FilterArgs,
        #[command(flatten)]
        pool: PoolArgs,
    },
    /// Find files with at least one line matching a regular expression
    Regex {
        pattern: String,
        #[command(flatten)]
        filters: FilterArgs,
        #[command(flatten)]
        pool: PoolArgs,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Descend into subdirectories (default: true); `--recursive=false` stays in the root
    #[arg(
        short = 'r',
        long,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_name = "BOOL"
    )]
    pub recursive: Option<bool>,

    /// Maximum directory depth, -1 for unlimited
    #[arg(short = 'd', long, default_value_t = -1, allow_negative_numbers = true)]
    pub max_depth: i64,

    /// Directory names to skip entirely (repeatable)
    #[arg(short = 'e', long = "exclude-dir", value_delimiter = ',', value_name = "DIR")]
    pub exclude_dirs: Vec<String>,

    /// Only consider files with these extensions, e.g. `.rs` (repeatable)
    #[arg(short = 'I', long = "include-ext", value_delimiter = ',', value_name = "EXT")]
    pub include_exts: Vec<String>,

    /// Never consider files with these extensions (repeatable)
    #[arg(short = 'E', long = "exclude-ext", value_delimiter = ',', value_name = "EXT")]
    pub exclude_exts: Vec<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct PoolArgs {
    /// Number of parallel matcher workers [default: 4]
    #[arg(short = 'w', long)]
    pub workers: Option<usize>,

    /// Give up after this long, e.g. `10s` or `2m`; 0 disables the deadline
    #[arg(short = 't', long, value_parser = parse_timeout)]
    pub timeout: Option<Duration>,
}

fn parse_timeout(raw: &str) -> std::result::Result<Duration, String> {
    let raw = raw.trim();
    if raw == "0" {
        return Ok(Duration::ZERO);
    }
    humantime::parse_duration(raw).map_err(|e| e.to_string())
}

/// A fully resolved search: what to look for and where.
#[derive(Debug)]
pub struct SearchRequest {
    pub mode: SearchMode,
    pub pattern: String,
    pub config: SearchConfig,
}

impl Cli {
    /// Merges the command line over the file defaults. `None` for commands
    /// that do not search.
    pub fn search_request(&self, file: &FileConfig) -> Result<Option<SearchRequest>> {
        let (mode, pattern, filters, pool) = match &self.command {
            Commands::Name { pattern, filters } => (SearchMode::Name, pattern, filters, None),
            Commands::Content {
                pattern,
                filters,
                pool,
            } => (SearchMode::Content, pattern, filters, Some(pool)),
            Commands::Regex {
                pattern,
                filters,
                pool,
            } => (SearchMode::Regex, pattern, filters, Some(pool)),
            Commands::Completions { .. } => return Ok(None),
        };

        let workers = pool
            .and_then(|p| p.workers)
            .or(file.workers)
            .unwrap_or(DEFAULT_WORKERS);
        let timeout = match pool {
            Some(PoolArgs {
                timeout: Some(t), ..
            }) => Some(*t),
            Some(_) => file.timeout()?,
            None => None,
        };

        let config = SearchConfig::new(&self.path)
            .ignore_case(self.ignore_case || file.ignore_case.unwrap_or(false))
            .recursive(filters.recursive.unwrap_or(true))
            .max_depth(filters.max_depth)
            .exclude_dirs(file.exclude_dirs.iter().chain(&filters.exclude_dirs).cloned())
            .include_exts(file.include_exts.iter().chain(&filters.include_exts))
            .exclude_exts(file.exclude_exts.iter().chain(&filters.exclude_exts))
            .workers(workers)
            .timeout(timeout)
            .color(self.color.or(file.color).unwrap_or(true))
            .progress(self.progress || file.progress.unwrap_or(false));
        config.validate()?;

        Ok(Some(SearchRequest {
            mode,
            pattern: pattern.clone(),
            config,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RfseekError;

    fn request(args: &[&str]) -> SearchRequest {
        let cli = Cli::try_parse_from(args).unwrap();
        cli.search_request(&FileConfig::default()).unwrap().unwrap()
    }

    #[test]
    fn test_defaults() {
        let req = request(&["rfseek", "content", "hello"]);
        assert_eq!(req.mode, SearchMode::Content);
        assert_eq!(req.pattern, "hello");
        assert_eq!(req.config, SearchConfig::new("."));
    }

    #[test]
    fn test_global_and_mode_flags() {
        let req = request(&[
            "rfseek", "-p", "/tmp", "-i", "regex", "^ERROR", "-d", "2", "-e", "target", "-e",
            "node_modules", "-I", "rs,toml", "-E", ".log", "-w", "8", "-t", "1m",
        ]);
        let config = req.config;
        assert_eq!(req.mode, SearchMode::Regex);
        assert_eq!(config.root, PathBuf::from("/tmp"));
        assert!(config.ignore_case);
        assert_eq!(config.max_depth, Some(2));
        assert!(config.exclude_dirs.contains("node_modules"));
        assert!(config.include_exts.contains(".rs"));
        assert!(config.include_exts.contains(".toml"));
        assert!(config.exclude_exts.contains(".log"));
        assert_eq!(config.workers, 8);
        assert_eq!(config.timeout, Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_boolean_flags_accept_values() {
        let req = request(&["rfseek", "--color=false", "name", "*.rs", "--recursive=false"]);
        assert!(!req.config.color);
        assert!(!req.config.recursive);

        let req = request(&["rfseek", "-c", "name", "*.rs", "-r"]);
        assert!(req.config.color);
        assert!(req.config.recursive);
    }

    #[test]
    fn test_negative_depth_and_zero_timeout() {
        let req = request(&["rfseek", "content", "x", "-d", "-1", "-t", "0"]);
        assert_eq!(req.config.max_depth, None);
        assert_eq!(req.config.timeout, None);
    }

    #[test]
    fn test_name_mode_has_no_pool_flags() {
        assert!(Cli::try_parse_from(["rfseek", "name", "*.rs", "-w", "2"]).is_err());
        assert!(Cli::try_parse_from(["rfseek", "name", "*.rs", "-t", "5s"]).is_err());
    }

    #[test]
    fn test_bad_timeout_rejected() {
        assert!(Cli::try_parse_from(["rfseek", "content", "x", "-t", "soon"]).is_err());
    }

    #[test]
    fn test_zero_workers_rejected() {
        let cli = Cli::try_parse_from(["rfseek", "content", "x", "-w", "0"]).unwrap();
        let err = cli.search_request(&FileConfig::default()).unwrap_err();
        assert!(matches!(err, RfseekError::Config(_)));
    }

    #[test]
    fn test_file_defaults_merge_under_cli() {
        let file = FileConfig {
            ignore_case: Some(true),
            color: Some(false),
            workers: Some(2),
            timeout: Some("30s".to_string()),
            exclude_dirs: vec!["target".to_string()],
            ..FileConfig::default()
        };

        let cli = Cli::try_parse_from(["rfseek", "content", "x", "-w", "6", "-e", ".git"]).unwrap();
        let config = cli.search_request(&file).unwrap().unwrap().config;
        assert!(config.ignore_case);
        assert!(!config.color);
        assert_eq!(config.workers, 6);
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
        assert!(config.exclude_dirs.contains("target"));
        assert!(config.exclude_dirs.contains(".git"));

        let cli = Cli::try_parse_from(["rfseek", "--color", "name", "x"]).unwrap();
        let config = cli.search_request(&file).unwrap().unwrap().config;
        assert!(config.color);
        assert_eq!(config.timeout, None);
    }

    #[test]
    fn test_completions_is_not_a_search() {
        let cli = Cli::try_parse_from(["rfseek", "completions", "bash"]).unwrap();
        assert!(cli.search_request(&FileConfig::default()).unwrap().is_none());
    }
}
