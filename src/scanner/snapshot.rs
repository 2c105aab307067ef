//! Point-in-time directory listings and their differences.

use async_trait::async_trait;
use std::collections::HashSet;
use std::path::Path;

/// Lists the entry names of a directory.
#[async_trait]
pub trait DirectoryReader: Send + Sync {
    async fn list_entries(&self, path: &Path) -> std::io::Result<Vec<String>>;
}

/// [`DirectoryReader`] backed by the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsReader;

#[async_trait]
impl DirectoryReader for FsReader {
    async fn list_entries(&self, path: &Path) -> std::io::Result<Vec<String>> {
        let mut dir = tokio::fs::read_dir(path).await?;
        let mut names = Vec::new();
        while let Some(entry) = dir.next_entry().await? {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        Ok(names)
    }
}

/// Set of entry names present in a directory at one instant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    names: HashSet<String>,
}

impl Snapshot {
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Names present in `self` but absent from `before`.
    ///
    /// Entries are compared by name only: a folder removed and recreated
    /// between the two snapshots is not reported.
    pub fn added_since(&self, before: &Snapshot) -> Vec<String> {
        diff(before.names.iter(), self.names.iter())
    }
}

impl<S: Into<String>> FromIterator<S> for Snapshot {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Read a snapshot of `path`.
///
/// A read failure is returned as an error, never as an empty snapshot.
pub async fn read_snapshot(reader: &dyn DirectoryReader, path: &Path) -> std::io::Result<Snapshot> {
    let names = reader.list_entries(path).await?;
    Ok(names.into_iter().collect())
}

/// Names in `after` that are not in `before`, without duplicates.
pub fn diff<'a, B, A>(before: B, after: A) -> Vec<String>
where
    B: IntoIterator<Item = &'a String>,
    A: IntoIterator<Item = &'a String>,
{
    let known: HashSet<&str> = before.into_iter().map(String::as_str).collect();
    let mut seen = HashSet::new();
    let mut added = Vec::new();
    for name in after {
        if !known.contains(name.as_str()) && seen.insert(name.as_str()) {
            added.push(name.clone());
        }
    }
    added
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn sorted(mut v: Vec<String>) -> Vec<String> {
        v.sort();
        v
    }

    #[test]
    fn union_yields_only_new_names() {
        let a = names(&["Alien (1979)", "Heat (1995)"]);
        let b = names(&["Matrix (1999)", "Up (2009)"]);
        let union: Vec<String> = a.iter().chain(b.iter()).cloned().collect();

        assert_eq!(sorted(diff(&a, &union)), sorted(b));
    }

    #[test]
    fn identical_snapshots_yield_nothing() {
        let a = names(&["Alien (1979)", "Heat (1995)"]);
        assert!(diff(&a, &a).is_empty());
    }

    #[test]
    fn empty_before_yields_everything() {
        let a = names(&["Alien (1979)", "Heat (1995)"]);
        assert_eq!(sorted(diff(&[], &a)), sorted(a.clone()));
        assert!(diff(&a, &[]).is_empty());
        assert!(diff(&[], &[]).is_empty());
    }

    #[test]
    fn order_does_not_matter() {
        let before = names(&["a", "b", "c"]);
        let after = names(&["d", "c", "e", "a"]);
        let before_rev: Vec<String> = before.iter().rev().cloned().collect();
        let after_rev: Vec<String> = after.iter().rev().cloned().collect();

        let expected = sorted(diff(&before, &after));
        assert_eq!(expected, names(&["d", "e"]));
        assert_eq!(sorted(diff(&before_rev, &after)), expected);
        assert_eq!(sorted(diff(&before, &after_rev)), expected);
        assert_eq!(sorted(diff(&before_rev, &after_rev)), expected);
    }

    #[test]
    fn duplicates_are_reported_once() {
        let after = names(&["x", "x", "y"]);
        assert_eq!(sorted(diff(&[], &after)), names(&["x", "y"]));
    }

    #[test]
    fn snapshot_added_since() {
        let before: Snapshot = ["Alien (1979)"].into_iter().collect();
        let after: Snapshot = ["Alien (1979)", "Matrix (1999)"].into_iter().collect();

        assert_eq!(after.added_since(&before), names(&["Matrix (1999)"]));
        assert!(before.added_since(&after).is_empty());
    }

    #[tokio::test]
    async fn reads_directory_entries() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("Heat (1995)")).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "x").unwrap();

        let snapshot = read_snapshot(&FsReader, dir.path()).await.unwrap();
        assert_eq!(snapshot.len(), 2);
        assert!(snapshot.contains("Heat (1995)"));
        assert!(snapshot.contains("notes.txt"));
    }

    #[tokio::test]
    async fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_snapshot(&FsReader, &dir.path().join("gone")).await;
        assert!(result.is_err());
    }
}
