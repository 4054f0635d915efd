use serde::{Deserialize, Serialize};

/// Reference to a book in one of the two catalogs a library entry can point at
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "key", rename_all = "lowercase")]
pub enum BookRef {
    /// Book stored in the local catalog (`books` table)
    Internal(i64),
    /// Book known only to the external catalog, keyed e.g. `/works/OL166894W`
    External(String),
}

impl BookRef {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Internal(_) => "internal",
            Self::External(_) => "external",
        }
    }

    /// Key as stored in the database
    pub fn key(&self) -> String {
        match self {
            Self::Internal(id) => id.to_string(),
            Self::External(key) => key.clone(),
        }
    }

    /// Rebuild from the `(kind, key)` pair stored on a challenge row
    pub fn from_parts(kind: &str, key: &str) -> Option<Self> {
        match kind {
            "internal" => key.parse().ok().map(Self::Internal),
            "external" => Some(Self::External(key.to_string())),
            _ => None,
        }
    }
}

impl std::fmt::Display for BookRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Internal(id) => write!(f, "book #{}", id),
            Self::External(key) => write!(f, "external {}", key),
        }
    }
}

/// Shelf a library entry sits on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingStatus {
    Reading,
    Read,
    #[default]
    WantToRead,
    Searching,
}

impl ReadingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reading => "reading",
            Self::Read => "read",
            Self::WantToRead => "want_to_read",
            Self::Searching => "searching",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "reading" => Some(Self::Reading),
            "read" => Some(Self::Read),
            "want_to_read" => Some(Self::WantToRead),
            "searching" => Some(Self::Searching),
            _ => None,
        }
    }
}

impl std::fmt::Display for ReadingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Chapter progress stored against a library entry.
///
/// Denormalized copy of the owning challenge's chapter counter; only ever
/// moves forward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressMirror {
    pub book: BookRef,
    pub status: ReadingStatus,
    pub current_chapter: u32,
    pub total_chapters: u32,
}

/// A library entry as listed to the user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryEntry {
    pub title: String,
    pub author: String,
    pub progress: ProgressMirror,
}

/// A book in the local catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub page_count: Option<u32>,
}
