use photomirror_core::path_utils::{MirrorPath, PathError};
use photomirror_core::HierarchyPosition;

fn position(group: &str, subgroup: Option<&str>, collection: &str, file: &str) -> HierarchyPosition {
    HierarchyPosition {
        group: group.to_string(),
        subgroup: subgroup.map(str::to_string),
        collection: collection.to_string(),
        filename: file.to_string(),
    }
}

#[test]
fn maps_without_subgroup() {
    let path = MirrorPath::for_item(&position("Nature", None, "Trees", "oak.jpg")).unwrap();
    assert_eq!(path, "Nature/Trees/oak.jpg");
}

#[test]
fn maps_with_subgroup() {
    let path =
        MirrorPath::for_item(&position("Travel", Some("Europe"), "Paris 2019", "IMG_0001.JPG"))
            .unwrap();
    assert_eq!(path, "Travel/Europe/Paris 2019/IMG_0001.JPG");
}

#[test]
fn mapping_is_deterministic() {
    let pos = position("Family", Some("Kids"), "Birthday", "cake.png");
    let a = MirrorPath::for_item(&pos).unwrap();
    let b = MirrorPath::for_item(&pos.clone()).unwrap();
    assert_eq!(a.as_bytes(), b.as_bytes());
}

#[test]
fn empty_filename_is_unmappable() {
    let err = MirrorPath::for_item(&position("Nature", None, "Trees", "")).unwrap_err();
    assert_eq!(err, PathError::MissingFilename);
}

#[test]
fn empty_group_or_collection_is_unmappable() {
    assert_eq!(
        MirrorPath::for_item(&position("", None, "Trees", "oak.jpg")).unwrap_err(),
        PathError::EmptySegment { field: "group" }
    );
    assert_eq!(
        MirrorPath::for_item(&position("Nature", Some(""), "Trees", "oak.jpg")).unwrap_err(),
        PathError::EmptySegment { field: "subgroup" }
    );
    assert_eq!(
        MirrorPath::for_item(&position("Nature", None, "", "oak.jpg")).unwrap_err(),
        PathError::EmptySegment { field: "collection" }
    );
}

#[test]
fn traversal_components_are_rejected() {
    let cases = [
        position("..", None, "Trees", "oak.jpg"),
        position("Nature", None, "Trees", "../../etc/passwd"),
        position("Nature", None, "/abs", "oak.jpg"),
        position("Nature", None, "Trees/", "oak.jpg"),
        position("Nature", Some("."), "Trees", "oak.jpg"),
        position("Nature", None, "Trees", "dir\\oak.jpg"),
    ];
    for pos in cases {
        assert!(
            matches!(
                MirrorPath::for_item(&pos),
                Err(PathError::UnsafeSegment { .. })
            ),
            "expected {pos:?} to be rejected"
        );
    }
}

#[test]
fn nested_album_titles_become_nested_directories() {
    let path = MirrorPath::for_item(&position("Sports", None, "2010/2011 Season", "goal.jpg"))
        .unwrap();
    assert_eq!(path, "Sports/2010/2011 Season/goal.jpg");
    let ancestors: Vec<&str> = MirrorPath::ancestors(&path).collect();
    assert_eq!(ancestors, vec!["Sports/2010/2011 Season", "Sports/2010", "Sports"]);
}
