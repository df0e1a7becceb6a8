use planter::{
    config,
    materialize::materialize,
    vfs::{Directory, VirtualNode},
};
use std::{collections::BTreeSet, fs, path::PathBuf};
use walkdir::WalkDir;

fn on_disk(base: &std::path::Path) -> BTreeSet<PathBuf> {
    WalkDir::new(base)
        .min_depth(1)
        .into_iter()
        .map(|entry| {
            entry
                .unwrap()
                .path()
                .strip_prefix(base)
                .unwrap()
                .to_path_buf()
        })
        .collect()
}

fn assert_matches_tree(base: &std::path::Path, tree: &Directory) {
    for (relative, node) in tree.walk() {
        let path = base.join(&relative);
        match node {
            VirtualNode::Directory(_) => assert!(path.is_dir(), "{} is not a dir", path.display()),
            VirtualNode::File(contents) => {
                assert_eq!(&fs::read(&path).unwrap(), contents.as_bytes())
            }
        }
    }

    let expected: BTreeSet<PathBuf> = tree.walk().into_iter().map(|(p, _)| p).collect();
    assert_eq!(on_disk(base), expected);
}

#[test]
fn builtin_tree_lands_exactly() {
    let base = tempfile::tempdir().unwrap();
    let tree = config::builtin_tree().unwrap();

    let report = materialize(base.path(), &tree).unwrap();

    assert_eq!(report.directories(), 7);
    assert_eq!(report.files(), 25);
    assert_matches_tree(base.path(), &tree);
}

#[test]
fn second_run_converges() {
    let base = tempfile::tempdir().unwrap();
    let tree = config::builtin_tree().unwrap();

    let first = materialize(base.path(), &tree).unwrap();
    let second = materialize(base.path(), &tree).unwrap();

    assert_eq!(first, second);
    assert_matches_tree(base.path(), &tree);
}

#[test]
fn contents_are_not_normalized() {
    let base = tempfile::tempdir().unwrap();
    let tree = Directory::from_entries([
        ("no-newline.txt", VirtualNode::file("abc")),
        ("crlf.txt", VirtualNode::file("line\r\nline\r\n")),
        ("unicode.txt", VirtualNode::file("café ☕\n")),
        ("empty.txt", VirtualNode::file("")),
    ])
    .unwrap();

    materialize(base.path(), &tree).unwrap();

    assert_matches_tree(base.path(), &tree);
    assert_eq!(fs::metadata(base.path().join("empty.txt")).unwrap().len(), 0);
}

#[test]
fn missing_base_is_not_created() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join("absent");
    let tree = Directory::from_entries([("a.txt", VirtualNode::file("hello"))]).unwrap();

    let error = materialize(&base, &tree).unwrap_err();

    assert_eq!(error.path, base.join("a.txt"));
    assert!(!base.exists());
}
