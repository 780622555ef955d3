// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Extension catalog layout.
//!
//! Specify the layout of the catalog file that Oxisort uses to decide
//! which category directory a file belongs to. File I/O is left to the
//! caller to figure out.
//!
//! # General Layout
//!
//! A catalog is composed of two basic parts: a fallback category, and a
//! table of extension rules. Each rule maps one file extension (leading
//! dot included, e.g., ".pdf") to the category directory its files get
//! relocated into. Any extension without a rule resolves to the fallback
//! category, which itself defaults to "Others".
//!
//! Extension keys are case-insensitive. They get normalized to
//! lower-case with a leading dot during parsing, so "PDF" and ".pdf"
//! name the same rule.

use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fmt::{Display, Error as FmtError, Formatter, Result as FmtResult},
    path::Path,
    str::FromStr,
};

/// Extension catalog.
///
/// An immutable mapping from lower-cased file extension to the category
/// directory files of that extension belong to. Built once at startup,
/// and never mutated afterwards. Given the same catalog and the same
/// extension, [`resolve`](ExtensionCatalog::resolve) always produces the
/// same category.
#[derive(Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
pub struct ExtensionCatalog {
    /// Category assigned to extensions without a rule of their own.
    #[serde(default = "Category::fallback")]
    fallback: Category,

    /// Rule table mapping extension to category.
    #[serde(default)]
    categories: BTreeMap<String, Category>,
}

impl ExtensionCatalog {
    /// Resolve an extension to its category.
    ///
    /// Lookup is case-insensitive. Extensions without a rule, including
    /// the empty extension, resolve to the fallback category.
    pub fn resolve(&self, extension: impl AsRef<str>) -> &Category {
        self.categories
            .get(&extension.as_ref().to_lowercase())
            .unwrap_or(&self.fallback)
    }

    /// Category assigned to unmapped extensions.
    pub fn fallback(&self) -> &Category {
        &self.fallback
    }
}

impl Default for ExtensionCatalog {
    /// Built-in catalog.
    ///
    /// Covers the household extensions a downloads directory tends to
    /// accumulate. Used whenever the user does not provide a catalog
    /// file of their own.
    fn default() -> Self {
        let table = [
            (".pdf", "Documents/PDFs"),
            (".docx", "Documents/Word"),
            (".doc", "Documents/Word"),
            (".pptx", "Documents/Presentations"),
            (".xlsx", "Documents/Spreadsheets"),
            (".txt", "Documents/Text"),
            (".jpg", "Images"),
            (".jpeg", "Images"),
            (".png", "Images"),
            (".gif", "Images"),
            (".svg", "Images"),
            (".py", "Code"),
            (".js", "Code"),
            (".html", "Code"),
            (".css", "Code"),
            (".json", "Data"),
            (".csv", "Data"),
            (".sql", "Data"),
            (".zip", "Archives"),
            (".rar", "Archives"),
            (".tar", "Archives"),
            (".exe", "Applications"),
            (".msi", "Applications"),
            (".deb", "Applications"),
            (".mp4", "Media/Videos"),
            (".mov", "Media/Videos"),
            (".mp3", "Media/Music"),
        ];

        let categories = table
            .into_iter()
            .map(|(extension, category)| (extension.into(), Category(category.into())))
            .collect::<BTreeMap<String, Category>>();

        Self {
            fallback: Category::fallback(),
            categories,
        }
    }
}

impl FromStr for ExtensionCatalog {
    type Err = CatalogError;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        let catalog: ExtensionCatalog = toml::from_str(data).map_err(CatalogError::Deserialize)?;

        // INVARIANT: Normalize all extension keys to lower-case with a
        // leading dot so lookup never depends on how the user spelled
        // the rule.
        let categories = catalog
            .categories
            .into_iter()
            .map(|(extension, category)| {
                let extension = extension.to_lowercase();
                let extension = match extension.starts_with('.') {
                    true => extension,
                    false => format!(".{extension}"),
                };
                (extension, category)
            })
            .collect::<BTreeMap<String, Category>>();

        Ok(Self {
            fallback: catalog.fallback,
            categories,
        })
    }
}

impl Display for ExtensionCatalog {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        fmt.write_str(
            toml::to_string_pretty(self)
                .map_err(CatalogError::Serialize)?
                .as_str(),
        )
    }
}

/// Relative directory path that files of a given extension relocate into.
///
/// A category is always relative to the directory being organized, and
/// spans one or two path segments, e.g., "Images" or "Documents/PDFs".
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct Category(String);

impl Category {
    /// Construct new category.
    ///
    /// # Errors
    ///
    /// - Return [`CatalogError::InvalidCategory`] if the path is empty,
    ///   absolute, escapes upward, or spans more than two segments.
    pub fn new(path: impl Into<String>) -> Result<Self> {
        let path = path.into();
        let segments = path.split('/').collect::<Vec<_>>();
        let valid = !segments.is_empty()
            && segments.len() <= 2
            && segments
                .iter()
                .all(|segment| !segment.is_empty() && *segment != "." && *segment != "..");

        if !valid {
            return Err(CatalogError::InvalidCategory { category: path });
        }

        Ok(Self(path))
    }

    /// Default fallback category.
    pub fn fallback() -> Self {
        Self("Others".into())
    }

    /// Treat category as [`Path`] slice.
    pub fn as_path(&self) -> &Path {
        Path::new(&self.0)
    }
}

impl TryFrom<String> for Category {
    type Error = CatalogError;

    fn try_from(path: String) -> Result<Self, Self::Error> {
        Self::new(path)
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.0
    }
}

impl Display for Category {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        fmt.write_str(self.0.as_str())
    }
}

/// Catalog error types.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Failed to deserialize catalog.
    #[error(transparent)]
    Deserialize(#[from] toml::de::Error),

    /// Failed to serialize catalog.
    #[error(transparent)]
    Serialize(#[from] toml::ser::Error),

    /// Category path breaks the one-or-two relative segment shape.
    #[error("category {category:?} must be one or two relative path segments")]
    InvalidCategory { category: String },
}

impl From<CatalogError> for FmtError {
    fn from(_: CatalogError) -> Self {
        FmtError
    }
}

/// Friendly result alias :3
type Result<T, E = CatalogError> = std::result::Result<T, E>;
