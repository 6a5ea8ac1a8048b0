use crate::cancel::CancelToken;
use crate::config::SearchConfig;
use crate::entry::Entry;
use crate::error::Result;
use crate::filter::EntryFilter;
use log::debug;
use walkdir::WalkDir;

/// Depth-first walk from `config.root`, lexical order inside each directory.
///
/// Directories rejected by `filter` are pruned (the root never is), rejected
/// files are skipped, and every surviving file is handed to `visit`. The walk
/// stops at the first error: a traversal failure, an error from `visit`, or
/// `RfseekError::Cancelled` once the deadline passes.
pub fn walk_tree<F>(
    config: &SearchConfig,
    filter: &dyn EntryFilter,
    cancel: &CancelToken,
    mut visit: F,
) -> Result<()>
where
    F: FnMut(Entry) -> Result<()>,
{
    let max_depth = if config.recursive { usize::MAX } else { 1 };
    let mut entries = WalkDir::new(&config.root)
        .follow_links(false)
        .max_depth(max_depth)
        .sort_by_file_name()
        .into_iter();

    while let Some(item) = entries.next() {
        cancel.check()?;

        let dent = item?;
        let metadata = dent.metadata()?;
        let depth = dent.depth();
        let entry = Entry::from_metadata(dent.into_path(), depth, &metadata);

        if !filter.should_include(&entry.path, &entry) {
            if entry.is_dir && entry.depth > 0 {
                debug!("Pruning directory: {}", entry.path.display());
                entries.skip_current_dir();
            }
            continue;
        }

        if entry.is_dir {
            continue;
        }

        visit(entry)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{CompositeFilter, DirectoryFilter};
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::time::Duration;
    use tempfile::tempdir;

    fn make_tree(root: &Path) {
        fs::create_dir_all(root.join("b/deep")).unwrap();
        fs::create_dir_all(root.join("a")).unwrap();
        fs::create_dir_all(root.join("skip/inner")).unwrap();
        fs::write(root.join("z.txt"), "z").unwrap();
        fs::write(root.join("a/one.txt"), "1").unwrap();
        fs::write(root.join("b/two.txt"), "2").unwrap();
        fs::write(root.join("b/deep/three.txt"), "3").unwrap();
        fs::write(root.join("skip/inner/hidden.txt"), "h").unwrap();
    }

    fn collect(config: &SearchConfig, filter: &dyn EntryFilter) -> Vec<PathBuf> {
        let mut seen = Vec::new();
        walk_tree(config, filter, &CancelToken::none(), |entry| {
            seen.push(entry.path.strip_prefix(&config.root).unwrap().to_path_buf());
            Ok(())
        })
        .unwrap();
        seen
    }

    #[test]
    fn test_lexical_depth_first_order() {
        let dir = tempdir().unwrap();
        make_tree(dir.path());
        let config = SearchConfig::new(dir.path());

        let seen = collect(&config, &CompositeFilter::default());
        let expected: Vec<PathBuf> = [
            "a/one.txt",
            "b/deep/three.txt",
            "b/two.txt",
            "skip/inner/hidden.txt",
            "z.txt",
        ]
        .iter()
        .map(PathBuf::from)
        .collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_pruned_directories_are_not_entered() {
        let dir = tempdir().unwrap();
        make_tree(dir.path());
        let config = SearchConfig::new(dir.path());
        let filter = DirectoryFilter::new(["skip", "deep"], None);

        let seen = collect(&config, &filter);
        assert_eq!(seen.len(), 3);
        assert!(seen.iter().all(|p| !p.starts_with("skip")));
        assert!(!seen.contains(&PathBuf::from("b/deep/three.txt")));
    }

    #[test]
    fn test_root_is_never_pruned() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("skip");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("kept.txt"), "k").unwrap();

        let config = SearchConfig::new(&root).max_depth(0);
        let filter = DirectoryFilter::new(["skip"], Some(0));
        assert_eq!(collect(&config, &filter), vec![PathBuf::from("kept.txt")]);
    }

    #[test]
    fn test_non_recursive_lists_direct_children_only() {
        let dir = tempdir().unwrap();
        make_tree(dir.path());
        let config = SearchConfig::new(dir.path()).recursive(false);

        let seen = collect(&config, &CompositeFilter::default());
        assert_eq!(seen, vec![PathBuf::from("z.txt")]);
    }

    #[test]
    fn test_visit_error_stops_walk() {
        let dir = tempdir().unwrap();
        make_tree(dir.path());
        let config = SearchConfig::new(dir.path());

        let mut visits = 0;
        let result = walk_tree(&config, &CompositeFilter::default(), &CancelToken::none(), |_| {
            visits += 1;
            Err(crate::error::RfseekError::Other("stop".into()))
        });
        assert!(result.is_err());
        assert_eq!(visits, 1);
    }

    #[test]
    fn test_expired_deadline_cancels_walk() {
        let dir = tempdir().unwrap();
        make_tree(dir.path());
        let config = SearchConfig::new(dir.path());
        let cancel = CancelToken::with_timeout(Some(Duration::from_millis(1)));
        std::thread::sleep(Duration::from_millis(10));

        let err = walk_tree(&config, &CompositeFilter::default(), &cancel, |_| Ok(())).unwrap_err();
        assert!(err.is_cancelled());
    }

    #[test]
    fn test_missing_root_is_a_walk_error() {
        let dir = tempdir().unwrap();
        let config = SearchConfig::new(dir.path().join("nope"));
        let err = walk_tree(&config, &CompositeFilter::default(), &CancelToken::none(), |_| Ok(()))
            .unwrap_err();
        assert!(matches!(err, crate::error::RfseekError::Walk(_)));
    }
}
