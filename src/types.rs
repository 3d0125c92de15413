//! Core types shared by drivers and entries.

use std::time::SystemTime;

/// Kind of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EntryType {
    /// Leaf content.
    File,
    /// Container of other entries.
    Directory,
}

/// Metadata for an entry.
///
/// Size and modification time are optional: drivers answer `None` when the
/// backend cannot report them, including when the object is absent.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Metadata {
    /// Kind of the entry the metadata was requested for.
    pub kind: EntryType,
    /// Size in bytes.
    pub size: Option<u64>,
    /// Last modification time.
    pub modified: Option<SystemTime>,
}

impl Metadata {
    /// Returns `true` if this describes a file.
    #[inline]
    pub fn is_file(&self) -> bool {
        self.kind == EntryType::File
    }

    /// Returns `true` if this describes a directory.
    #[inline]
    pub fn is_dir(&self) -> bool {
        self.kind == EntryType::Directory
    }
}

/// Static description of a driver implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverInfo {
    /// Short uppercase protocol token, unique across drivers.
    pub protocol: &'static str,
    /// Human-readable description.
    pub description: &'static str,
    /// `true` if entries are directly addressable as local paths and need no
    /// localization.
    pub local: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_kind_helpers() {
        let meta = Metadata {
            kind: EntryType::Directory,
            size: None,
            modified: None,
        };
        assert!(meta.is_dir());
        assert!(!meta.is_file());
    }
}
