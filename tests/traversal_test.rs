//! Tests for climb-up (pre-order subtree) and climb-down (root-ward) walks

use proptree::util::testing;
use proptree::{to_canonical_json, Node, NodeId, Tree, TreeError};
use rstest::{fixture, rstest};

fn id(n: u64) -> NodeId {
    NodeId::new(n)
}

fn select(node: &mut Node) {
    node.properties_mut()
        .try_insert("selected", true)
        .expect("'selected' is not reserved");
}

// 0
// ├── 1
// ├── 2
// └── 3
//     └── 4
//         └── 5
//             ├── 6
//             └── 7
#[fixture]
fn deep_tree() -> Tree {
    testing::init_test_setup();
    let mut tree = Tree::new();
    tree.add(NodeId::ROOT, ()).unwrap();
    tree.add(NodeId::ROOT, ()).unwrap();
    let mut current = tree.add(NodeId::ROOT, ()).unwrap();
    current = tree.add(current, ()).unwrap();
    current = tree.add(current, ()).unwrap();
    tree.add(current, ()).unwrap();
    tree.add(current, ()).unwrap();
    tree
}

// ============================================================
// Climb Up Tests
// ============================================================

#[rstest]
fn given_no_start_when_climbing_up_then_visits_whole_tree(mut deep_tree: Tree) {
    deep_tree.climb_up_from(None, select).unwrap();

    let expected = concat!(
        r#"{"id":0,"parentId":null,"children":["#,
        r#"{"id":1,"parentId":0,"children":[],"selected":true},"#,
        r#"{"id":2,"parentId":0,"children":[],"selected":true},"#,
        r#"{"id":3,"parentId":0,"children":["#,
        r#"{"id":4,"parentId":3,"children":["#,
        r#"{"id":5,"parentId":4,"children":["#,
        r#"{"id":6,"parentId":5,"children":[],"selected":true},"#,
        r#"{"id":7,"parentId":5,"children":[],"selected":true}],"#,
        r#""selected":true}],"selected":true}],"selected":true}],"selected":true}"#
    );
    assert_eq!(
        to_canonical_json(&deep_tree, NodeId::ROOT, false).unwrap(),
        expected
    );
}

#[rstest]
fn given_start_node_when_climbing_up_then_visits_only_its_subtree(mut deep_tree: Tree) {
    deep_tree.climb_up_from(Some(id(3)), select).unwrap();

    let expected = concat!(
        r#"{"id":0,"parentId":null,"children":["#,
        r#"{"id":1,"parentId":0,"children":[]},"#,
        r#"{"id":2,"parentId":0,"children":[]},"#,
        r#"{"id":3,"parentId":0,"children":["#,
        r#"{"id":4,"parentId":3,"children":["#,
        r#"{"id":5,"parentId":4,"children":["#,
        r#"{"id":6,"parentId":5,"children":[],"selected":true},"#,
        r#"{"id":7,"parentId":5,"children":[],"selected":true}],"#,
        r#""selected":true}],"selected":true}],"selected":true}]}"#
    );
    assert_eq!(
        to_canonical_json(&deep_tree, NodeId::ROOT, false).unwrap(),
        expected
    );
}

#[rstest]
#[case::whole_tree(None, vec![0, 1, 2, 3, 4, 5, 6, 7])]
#[case::subtree(Some(3), vec![3, 4, 5, 6, 7])]
#[case::inner(Some(5), vec![5, 6, 7])]
#[case::leaf(Some(6), vec![6])]
fn given_start_when_climbing_up_then_visits_pre_order(
    mut deep_tree: Tree,
    #[case] start: Option<u64>,
    #[case] expected: Vec<u64>,
) {
    let mut visited = Vec::new();
    deep_tree
        .climb_up_from(start.map(id), |node| visited.push(node.id().get()))
        .unwrap();
    assert_eq!(visited, expected);

    let iterated: Vec<u64> = match start {
        Some(n) => deep_tree.descendants(id(n)).unwrap().map(|n| n.id().get()).collect(),
        None => deep_tree.iter().map(|n| n.id().get()).collect(),
    };
    assert_eq!(iterated, expected);
}

#[rstest]
fn given_branching_tree_when_climbing_up_then_finishes_subtree_before_sibling() {
    let mut tree = Tree::new();
    let a = tree.add(NodeId::ROOT, ()).unwrap(); // 1
    let b = tree.add(NodeId::ROOT, ()).unwrap(); // 2
    let a1 = tree.add(a, ()).unwrap(); // 3
    tree.add(b, ()).unwrap(); // 4
    tree.add(a1, ()).unwrap(); // 5
    tree.add(a, ()).unwrap(); // 6

    let mut visited = Vec::new();
    tree.climb_up_from(None, |node| visited.push(node.id().get()))
        .unwrap();

    assert_eq!(visited, vec![0, 1, 3, 5, 6, 2, 4]);
}

#[rstest]
fn given_unknown_start_when_climbing_up_then_not_found_and_no_visit(mut deep_tree: Tree) {
    let mut calls = 0;
    let err = deep_tree
        .climb_up_from(Some(id(99)), |_| calls += 1)
        .unwrap_err();
    assert_eq!(err, TreeError::NotFound(id(99)));
    assert_eq!(calls, 0);
}

// ============================================================
// Climb Down Tests
// ============================================================

#[rstest]
fn given_chain_when_climbing_down_then_marks_path_to_root() {
    let mut tree = Tree::new();
    let mut current = tree.add(NodeId::ROOT, ()).unwrap();
    current = tree.add(current, ()).unwrap();
    tree.add(current, ()).unwrap();

    tree.climb_down_to_root(id(2), select).unwrap();

    let expected = concat!(
        r#"{"id":0,"parentId":null,"children":["#,
        r#"{"id":1,"parentId":0,"children":["#,
        r#"{"id":2,"parentId":1,"children":["#,
        r#"{"id":3,"parentId":2,"children":[]}],"#,
        r#""selected":true}],"selected":true}],"selected":true}"#
    );
    assert_eq!(to_canonical_json(&tree, NodeId::ROOT, false).unwrap(), expected);
}

#[rstest]
#[case::deep_leaf(7, vec![7, 5, 4, 3, 0])]
#[case::shallow_leaf(1, vec![1, 0])]
#[case::root(0, vec![0])]
fn given_start_when_climbing_down_then_ends_at_root_once(
    mut deep_tree: Tree,
    #[case] start: u64,
    #[case] expected: Vec<u64>,
) {
    let mut visited = Vec::new();
    deep_tree
        .climb_down_to_root(id(start), |node| visited.push(node.id().get()))
        .unwrap();
    assert_eq!(visited, expected);

    let iterated: Vec<u64> = deep_tree
        .ancestors(id(start))
        .unwrap()
        .map(|n| n.id().get())
        .collect();
    assert_eq!(iterated, expected);
}

#[rstest]
fn given_deleted_node_when_climbing_down_then_not_found(mut deep_tree: Tree) {
    deep_tree.del(id(4)).unwrap();
    assert_eq!(
        deep_tree.climb_down_to_root(id(6), |_| {}).unwrap_err(),
        TreeError::NotFound(id(6))
    );
    assert!(deep_tree.ancestors(id(6)).is_err());
}

#[rstest]
fn given_visitor_when_climbing_down_then_can_accumulate_properties(mut deep_tree: Tree) {
    deep_tree
        .set(NodeId::ROOT, serde_json::json!({"weight": 1}))
        .unwrap();
    deep_tree
        .set(id(3), serde_json::json!({"weight": 10}))
        .unwrap();

    let mut total = 0;
    deep_tree
        .climb_down_to_root(id(6), |node| {
            total += node.get("weight").and_then(|w| w.as_i64()).unwrap_or(0);
        })
        .unwrap();

    assert_eq!(total, 11);
}
