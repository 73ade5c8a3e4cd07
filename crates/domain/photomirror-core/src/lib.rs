use serde::{Deserialize, Serialize};

pub mod formats;
pub mod path_utils;
pub mod pending;

pub use pending::{OrphanBatches, PendingOrphans};

pub type Md5Digest = String;

/// Descriptor recorded for every path found under the mirror root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalEntry {
    /// Lowercase hex MD5 of the file's full content.
    ContentHash(Md5Digest),
    Directory,
}

impl LocalEntry {
    pub fn is_dir(&self) -> bool {
        matches!(self, LocalEntry::Directory)
    }

    pub fn content_hash(&self) -> Option<&str> {
        match self {
            LocalEntry::ContentHash(h) => Some(h.as_str()),
            LocalEntry::Directory => None,
        }
    }
}

/// Where an item lives in the remote hierarchy: category, optional
/// subcategory, album, file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HierarchyPosition {
    pub group: String,
    pub subgroup: Option<String>,
    pub collection: String,
    pub filename: String,
}

/// One album as enumerated from the remote catalogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Album {
    pub id: u64,
    pub key: String,
    pub title: String,
    pub category: String,
    pub subcategory: Option<String>,
    pub url: Option<String>,
}

impl Album {
    pub fn position_of(&self, filename: &str) -> HierarchyPosition {
        HierarchyPosition {
            group: self.category.clone(),
            subgroup: self.subcategory.clone(),
            collection: self.title.clone(),
            filename: filename.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteItem {
    pub id: u64,
    pub key: String,
    pub position: HierarchyPosition,
    pub checksum: Md5Digest,
    pub size: u64,
    pub url: String,
}

/// Outcome of comparing one remote item against the local index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemStatus {
    Unchanged,
    New,
    Changed,
}

impl ItemStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ItemStatus::Unchanged => "(unchanged)",
            ItemStatus::New => "(new file)",
            ItemStatus::Changed => "(file changed)",
        }
    }
}
