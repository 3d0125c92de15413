//! # Driver Traits
//!
//! The contract every storage backend implements.
//!
//! ## Component Traits
//!
//! | Trait | Covers |
//! |-------|--------|
//! | [`DriverRead`] | existence checks, size, modification time, listing |
//! | [`DriverWrite`] | delete, tree delete, mkdir, mkpath, rename |
//! | [`DriverCache`] | local paths, per-entry cache files, download, upload |
//!
//! ## Blanket Implementation
//!
//! [`Driver`] is implemented for any type that implements all three
//! component traits:
//!
//! ```rust
//! use anyfs_drivers::{Driver, FsError};
//!
//! fn tidy(driver: &dyn Driver) -> Result<(), FsError> {
//!     driver.mkpath("/archive/2024")?;
//!     for child in driver.list_children("/inbox")? {
//!         let name = child.rsplit('/').next().unwrap_or_default();
//!         driver.rename(&child, &format!("/archive/2024/{name}"))?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Thread Safety
//!
//! Drivers are `Send` but not required to be `Sync`. A driver serializes
//! all work over its single backend connection and must be used from one
//! thread at a time; it may move between threads, including as a
//! `Box<dyn Driver>`.
//!
//! ## Object Safety
//!
//! All traits are object-safe; the registry hands out `Box<dyn Driver>`.

mod driver_cache;
mod driver_read;
mod driver_write;

pub use driver_cache::DriverCache;
pub use driver_read::DriverRead;
pub use driver_write::DriverWrite;

/// A complete storage driver.
///
/// # Blanket Implementation
///
/// Automatically implemented for any type implementing [`DriverRead`],
/// [`DriverWrite`] and [`DriverCache`]. Never implement it directly.
///
/// # Available Methods
///
/// From [`DriverRead`]:
/// - `info`, `resolver`
/// - `exists`, `file_exists`, `dir_exists`, `is_file`, `is_dir`
/// - `size`, `mod_time`, `metadata`, `list_children`
///
/// From [`DriverWrite`]:
/// - `delete`, `delete_tree`, `mkdir`, `mkpath`, `rename`
///
/// From [`DriverCache`]:
/// - `local_path`, `cache_file`, `download`, `upload`
pub trait Driver: DriverRead + DriverWrite + DriverCache {}

impl<T: DriverRead + DriverWrite + DriverCache + ?Sized> Driver for T {}
