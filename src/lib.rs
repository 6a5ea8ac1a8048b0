pub mod cancel;
pub mod cli;
pub mod config;
pub mod entry;
pub mod error;
pub mod filter;
pub mod matcher;
pub mod output;
pub mod progress;
pub mod search;
pub mod walker;

pub use cancel::CancelToken;
pub use clap::Parser;
pub use cli::{Cli, Commands, SearchRequest};
pub use config::{FileConfig, SearchConfig};
pub use entry::Entry;
pub use error::{Result, RfseekError};
pub use filter::{CompositeFilter, DirectoryFilter, EntryFilter, ExtensionFilter};
pub use matcher::{LiteralMatcher, Matcher, RegexMatcher, WildcardMatcher, wildcard_match};
pub use search::{SearchMode, SearchObserver, SearchReport, SearchStatus, Searcher, search};
pub use walker::walk_tree;
