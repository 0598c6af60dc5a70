//! End-to-end scenarios from the namespace's testable properties: the
//! single-threaded laws each operation must satisfy, and two concurrent
//! stress scenarios exercising the locking protocol itself.

use hfs_tree::{Tree, TreeError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::thread;
use std::time::Duration;

fn names(listing: &str) -> Vec<&str> {
    if listing.is_empty() {
        Vec::new()
    } else {
        listing.split(',').collect()
    }
}

#[test]
fn scenario_create_twice_then_list() {
    let tree: Tree = Tree::new();
    assert_eq!(tree.create("/a/"), Ok(()));
    assert_eq!(tree.create("/a/"), Err(TreeError::AlreadyExists));
    assert!(names(&tree.list("/").unwrap()).contains(&"a"));
}

#[test]
fn scenario_nested_remove_requires_empty_then_succeeds() {
    let tree: Tree = Tree::new();
    tree.create("/a/").unwrap();
    tree.create("/a/b/").unwrap();
    assert_eq!(tree.remove("/a/"), Err(TreeError::NotEmpty));
    assert_eq!(tree.remove("/a/b/"), Ok(()));
    assert_eq!(tree.remove("/a/"), Ok(()));
    assert!(!names(&tree.list("/").unwrap()).contains(&"a"));
}

#[test]
fn scenario_remove_after_multi_child_folder_emptied() {
    let tree: Tree = Tree::new();
    tree.create("/a/").unwrap();
    tree.create("/a/x/").unwrap();
    tree.create("/a/y/").unwrap();
    assert_eq!(tree.remove("/a/x/"), Ok(()));
    assert_eq!(tree.remove("/a/y/"), Ok(()));
    assert_eq!(tree.remove("/a/"), Ok(()));
    assert!(!names(&tree.list("/").unwrap()).contains(&"a"));
}

#[test]
fn scenario_move_between_siblings() {
    let tree: Tree = Tree::new();
    tree.create("/a/").unwrap();
    tree.create("/b/").unwrap();
    assert_eq!(tree.move_node("/a/", "/b/a/"), Ok(()));
    assert!(!names(&tree.list("/").unwrap()).contains(&"a"));
    assert!(names(&tree.list("/b/").unwrap()).contains(&"a"));
}

#[test]
fn scenario_move_into_own_descendant_leaves_tree_unchanged() {
    let tree: Tree = Tree::new();
    tree.create("/a/").unwrap();
    tree.create("/a/b/").unwrap();
    assert_eq!(
        tree.move_node("/a/", "/a/b/c/"),
        Err(TreeError::SourceIsAncestor)
    );
    assert!(names(&tree.list("/a/").unwrap()).contains(&"b"));
    assert_eq!(tree.list("/a/b/").unwrap(), "");
}

/// Scenario 5: many threads hammering a shared tree with random
/// operations must never deadlock and must leave the tree in a
/// structurally sound state (every name a `list` reports is itself
/// listable, with no torn reads observed mid-mutation).
#[test]
fn scenario_concurrent_random_operations_do_not_deadlock_or_corrupt() {
    const THREADS: usize = 16;
    const OPS_PER_THREAD: usize = 1000;

    let tree: Tree = Tree::new();
    // A handful of folders one level under root, each with room for two
    // children, gives plenty of overlapping-path contention (shared
    // parents, arbitrary LCA relations for `move`) without an unbounded
    // path space.
    let top: Vec<String> = ('a'..='d').map(|c| format!("/{}/", c)).collect();
    for path in &top {
        tree.create(path).unwrap();
    }
    let leaves: Vec<char> = ('e'..='h').collect();

    thread::scope(|scope| {
        for thread_index in 0..THREADS {
            let tree = &tree;
            let top = &top;
            let leaves = &leaves;
            scope.spawn(move || {
                let mut rng = StdRng::seed_from_u64(0xC0FFEE ^ thread_index as u64);
                for _ in 0..OPS_PER_THREAD {
                    let parent = &top[rng.gen_range(0..top.len())];
                    let leaf = leaves[rng.gen_range(0..leaves.len())];
                    let path = format!("{}{}/", parent, leaf);
                    match rng.gen_range(0..4) {
                        0 => {
                            let _ = tree.create(&path);
                        }
                        1 => {
                            let _ = tree.remove(&path);
                        }
                        2 => {
                            let other_parent = &top[rng.gen_range(0..top.len())];
                            let other_leaf = leaves[rng.gen_range(0..leaves.len())];
                            let target = format!("{}{}/", other_parent, other_leaf);
                            let _ = tree.move_node(&path, &target);
                        }
                        _ => {
                            let _ = tree.list(&path);
                        }
                    }
                }
            });
        }
    });

    // No deadlock: we got here. Now check structural soundness: every
    // name reported by listing a top-level folder must itself be
    // listable (its node exists and answers without blocking forever).
    for path in &top {
        let listing = tree.list(path).expect("top-level folders were never removed");
        for child in names(&listing) {
            let child_path = format!("{}{}/", path, child);
            assert!(
                tree.list(&child_path).is_some(),
                "child {:?} reported by list({:?}) does not itself exist",
                child_path,
                path
            );
        }
    }
}

/// Scenario 6: one thread repeatedly creates and removes a folder while
/// another repeatedly lists its parent. Neither thread should ever
/// observe a torn listing (a name for a node that turns out not to
/// exist), and both should finish promptly.
#[test]
fn scenario_create_remove_race_against_list() {
    let tree: Tree = Tree::new();
    tree.create("/x/").unwrap();

    thread::scope(|scope| {
        let tree_a = &tree;
        let writer = scope.spawn(move || {
            for _ in 0..500 {
                let _ = tree_a.create("/x/y/");
                let _ = tree_a.remove("/x/y/");
            }
        });

        let tree_b = &tree;
        let reader = scope.spawn(move || {
            for _ in 0..500 {
                if let Some(listing) = tree_b.list("/x/") {
                    for child in names(&listing) {
                        assert_eq!(child, "y", "unexpected child under /x/");
                    }
                }
                thread::sleep(Duration::from_micros(10));
            }
        });

        writer.join().unwrap();
        reader.join().unwrap();
    });
}
