use crate::path_utils::MirrorPath;
use crate::LocalEntry;
use std::collections::BTreeMap;

/// Working set of local paths not yet claimed by a remote item.
///
/// Built once from the local scan, then only shrinks. Whatever is left after
/// the remote pass is exactly the set of orphans.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingOrphans {
    entries: BTreeMap<String, LocalEntry>,
}

/// Orphans split for deletion: files first, then directories deepest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrphanBatches {
    pub files: Vec<String>,
    pub dirs: Vec<String>,
}

impl PendingOrphans {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, rel_path: String, entry: LocalEntry) {
        self.entries.insert(rel_path, entry);
    }

    pub fn get(&self, rel_path: &str) -> Option<&LocalEntry> {
        self.entries.get(rel_path)
    }

    /// Mark `rel_path` and all of its ancestor directories as referenced by
    /// the remote catalogue. Returns what was recorded for `rel_path` itself.
    pub fn claim(&mut self, rel_path: &str) -> Option<LocalEntry> {
        let previous = self.entries.remove(rel_path);
        for ancestor in MirrorPath::ancestors(rel_path) {
            self.entries.remove(ancestor);
        }
        previous
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &LocalEntry)> {
        self.entries.iter()
    }

    pub fn into_batches(self) -> OrphanBatches {
        let mut batches = OrphanBatches::default();
        for (path, entry) in self.entries {
            match entry {
                LocalEntry::ContentHash(_) => batches.files.push(path),
                LocalEntry::Directory => batches.dirs.push(path),
            }
        }
        // Children before parents so each directory is empty when removed.
        batches
            .dirs
            .sort_by(|a, b| MirrorPath::depth(b).cmp(&MirrorPath::depth(a)).then(b.cmp(a)));
        batches
    }
}

impl FromIterator<(String, LocalEntry)> for PendingOrphans {
    fn from_iter<I: IntoIterator<Item = (String, LocalEntry)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
