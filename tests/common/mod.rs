// Shared test fixtures for integration tests
// Functions here are used across different test files
#![allow(dead_code)]

use git2::{Repository, Signature};
use std::path::PathBuf;
use tempfile::TempDir;

/// Create a temporary git repository
pub fn create_test_repo() -> (TempDir, PathBuf, Repository) {
    let dir = TempDir::new().unwrap();
    let repo_path = dir.path().to_path_buf();
    let repo = Repository::init(&repo_path).unwrap();

    // Configure git user for commits
    let mut config = repo.config().unwrap();
    config.set_str("user.name", "Test User").unwrap();
    config.set_str("user.email", "test@example.com").unwrap();

    (dir, repo_path, repo)
}

pub fn signature() -> Signature<'static> {
    Signature::now("Test User", "test@example.com").unwrap()
}

/// Add files to the repository and create a commit on HEAD
pub fn add_commit(repo: &Repository, files: &[(&str, &[u8])], message: &str) -> git2::Oid {
    let sig = signature();

    let mut index = repo.index().unwrap();

    for (path, content) in files {
        // Write file to working directory
        let full_path = repo.workdir().unwrap().join(path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&full_path, content).unwrap();

        // Add to index
        index.add_path(std::path::Path::new(path)).unwrap();
    }

    index.write().unwrap();
    let tree_id = index.write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();

    // Get parent commit if exists
    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());

    if let Some(parent) = parent {
        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &[&parent])
            .unwrap()
    } else {
        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &[])
            .unwrap()
    }
}

/// Create a commit with an empty tree on HEAD
pub fn commit_empty_tree(repo: &Repository) -> git2::Oid {
    let sig = signature();
    let tree_id = repo.index().unwrap().write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();
    repo.commit(Some("HEAD"), &sig, &sig, "empty", &tree, &[])
        .unwrap()
}

/// Create a commit for an existing tree without moving any reference.
/// Useful for building merge shapes that no branch points at.
pub fn commit_tree(
    repo: &Repository,
    tree_id: git2::Oid,
    parents: &[git2::Oid],
    message: &str,
) -> git2::Oid {
    let sig = signature();
    let tree = repo.find_tree(tree_id).unwrap();
    let parents: Vec<git2::Commit> = parents
        .iter()
        .map(|oid| repo.find_commit(*oid).unwrap())
        .collect();
    let parent_refs: Vec<&git2::Commit> = parents.iter().collect();
    repo.commit(None, &sig, &sig, message, &tree, &parent_refs)
        .unwrap()
}

/// Create an annotated tag object pointing at `target`, without a ref.
pub fn annotated_tag(repo: &Repository, name: &str, target: git2::Oid) -> git2::Oid {
    let sig = signature();
    let object = repo.find_object(target, None).unwrap();
    repo.tag_annotation_create(name, &object, &sig, &format!("tag {name}"))
        .unwrap()
}

/// Chain of `len` annotated tags: the first points at `target`, each
/// following tag points at the previous one. Returns the outermost tag.
pub fn tag_chain(repo: &Repository, target: git2::Oid, len: usize) -> git2::Oid {
    let mut current = target;
    for i in 0..len {
        current = annotated_tag(repo, &format!("chain-{i}"), current);
    }
    current
}

/// Write a tree with the given entries. `entries` are
/// (name, oid, filemode) triples; use [`subtree`] for nested directories.
pub fn write_tree(repo: &Repository, entries: &[(&str, git2::Oid, i32)]) -> git2::Oid {
    let mut builder = repo.treebuilder(None).unwrap();
    for (name, oid, filemode) in entries {
        builder.insert(name, *oid, *filemode).unwrap();
    }
    builder.write().unwrap()
}

pub const MODE_BLOB: i32 = 0o100644;
pub const MODE_SYMLINK: i32 = 0o120000;
pub const MODE_SUBMODULE: i32 = 0o160000;
pub const MODE_TREE: i32 = 0o040000;
