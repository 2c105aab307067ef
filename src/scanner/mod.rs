//! Library folder scanning: directory snapshots and folder-name parsing.

pub mod identifier;
pub mod snapshot;

pub use identifier::{parse_directory_name, NameError, ParsedName};
pub use snapshot::{diff, read_snapshot, DirectoryReader, FsReader, Snapshot};
