use crate::HierarchyPosition;

/// A remote item whose hierarchy position cannot become a local path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("item has no filename")]
    MissingFilename,
    #[error("{field} name is empty")]
    EmptySegment { field: &'static str },
    #[error("{field} name {value:?} contains an unsafe path component")]
    UnsafeSegment { field: &'static str, value: String },
}

pub struct MirrorPath;

impl MirrorPath {
    /// Relative local path for a remote item: `group/[subgroup/]collection/filename`.
    ///
    /// Keys are always `/`-separated so they compare equal to the keys the
    /// local indexer produces on every platform.
    pub fn for_item(pos: &HierarchyPosition) -> Result<String, PathError> {
        if pos.filename.is_empty() {
            return Err(PathError::MissingFilename);
        }

        let mut segments: Vec<(&'static str, &str)> = vec![("group", pos.group.as_str())];
        if let Some(sub) = &pos.subgroup {
            segments.push(("subgroup", sub.as_str()));
        }
        segments.push(("collection", pos.collection.as_str()));
        segments.push(("filename", pos.filename.as_str()));

        for (field, value) in &segments {
            Self::verify_segment(field, value)?;
        }

        Ok(segments
            .iter()
            .map(|(_, v)| *v)
            .collect::<Vec<_>>()
            .join("/"))
    }

    /// A segment may contain `/` (nested album titles map to nested
    /// directories) but every component must survive a filesystem round trip
    /// unchanged and stay below the root.
    fn verify_segment(field: &'static str, value: &str) -> Result<(), PathError> {
        if value.is_empty() {
            return Err(PathError::EmptySegment { field });
        }
        let unsafe_component = value
            .split('/')
            .any(|c| c.is_empty() || c == "." || c == ".." || c.contains(['\\', '\0']));
        if unsafe_component {
            return Err(PathError::UnsafeSegment {
                field,
                value: value.to_string(),
            });
        }
        Ok(())
    }

    pub fn parent(path: &str) -> Option<&str> {
        path.rsplit_once('/').map(|(parent, _)| parent)
    }

    /// Every proper ancestor of `path`, nearest first. The root itself is not
    /// an ancestor.
    pub fn ancestors(path: &str) -> impl Iterator<Item = &str> {
        std::iter::successors(Self::parent(path), |p| Self::parent(p))
    }

    pub fn depth(path: &str) -> usize {
        path.matches('/').count()
    }
}
