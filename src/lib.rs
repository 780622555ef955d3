// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Extension and age based directory organizer.
//!
//! Oxisort makes one non-recursive pass over the top-level of a target
//! directory, classifies every regular file by its extension through an
//! immutable [`ExtensionCatalog`], and relocates each file into its
//! category subdirectory. An optional age threshold restricts the pass
//! to files strictly older than a given number of days, and a dry-run
//! mode computes every decision without touching the filesystem.
//!
//! The outcome of a run comes back as a [`RunReport`]: counters plus
//! the per-file decisions the pass made, so partial failure is data to
//! inspect instead of console text to squint at.

pub mod catalog;
pub mod fs;
pub mod organize;
pub mod path;
pub mod report;

pub use catalog::{CatalogError, Category, ExtensionCatalog};
pub use fs::{DirEntryInfo, Filesystem, FsError, OsFilesystem};
pub use organize::{OrganizeError, Organizer};
pub use path::default_catalog_path;
pub use report::{Decision, RunReport};
