use super::{node_count, root_len};
use crate::mock::{coalesce, Mock};
use crate::{Error, FigTree};

fn contents<const ORDER: usize>(tree: &FigTree<u32, char, ORDER>) -> Vec<(u32, u32, char)> {
    coalesce(tree.iter())
}

#[test]
fn partial_overlap_on_the_right() {
    let mut tree: FigTree<u32, &str> = FigTree::new();
    tree.write(10, 20, "A").unwrap();
    tree.write(15, 25, "B").unwrap();
    tree.validate();

    assert_eq!(tree.lookup(12), Some(&"A"));
    assert_eq!(tree.lookup(18), Some(&"B"));
    assert_eq!(tree.lookup(22), Some(&"B"));
    assert_eq!(tree.lookup(5), None);
    assert_eq!(tree.lookup(26), None);
}

#[test]
fn disjoint_points_split_the_root_once() {
    let mut tree: FigTree<u32, u32, 5> = FigTree::new();

    for i in 0..10 {
        tree.write(i * 10, i * 10, i).unwrap();
    }
    assert_eq!(tree.height(), 0);
    assert_eq!(node_count(&tree), 1);

    // The 11th entry overflows the root: a new root with a single entry above two leaves
    tree.write(100, 100, 10).unwrap();
    tree.validate();
    assert_eq!(tree.height(), 1);
    assert_eq!(root_len(&tree), 1);
    assert_eq!(node_count(&tree), 3);

    // The 12th fits into the right leaf without another split
    tree.write(110, 110, 11).unwrap();
    tree.validate();
    assert_eq!(tree.height(), 1);
    assert_eq!(root_len(&tree), 1);
    assert_eq!(node_count(&tree), 3);

    for i in 0..12 {
        assert_eq!(tree.lookup(i * 10), Some(&i));
    }
    for i in (0..=120).filter(|i| i % 10 != 0) {
        assert_eq!(tree.lookup(i), None);
    }
}

#[test]
fn straddled_entry_keeps_both_sides() {
    let mut tree: FigTree<u32, &str> = FigTree::new();
    tree.write(0, 100, "X").unwrap();

    enable_debug!();
    tree.write(40, 60, "Y").unwrap();
    disable_debug!();
    tree.validate();

    assert_eq!(tree.lookup(20), Some(&"X"));
    assert_eq!(tree.lookup(39), Some(&"X"));
    assert_eq!(tree.lookup(40), Some(&"Y"));
    assert_eq!(tree.lookup(50), Some(&"Y"));
    assert_eq!(tree.lookup(60), Some(&"Y"));
    assert_eq!(tree.lookup(61), Some(&"X"));
    assert_eq!(tree.lookup(80), Some(&"X"));
    assert_eq!(tree.lookup(101), None);
}

#[test]
fn repeated_write_is_idempotent() {
    let mut tree: FigTree<u32, &str> = FigTree::new();
    tree.write(0, 100, "X").unwrap();
    tree.write(40, 60, "Y").unwrap();

    let before: Vec<_> = (0..=110).map(|i| tree.lookup(i).copied()).collect();
    let (height, nodes) = (tree.height(), node_count(&tree));

    tree.write(40, 60, "Y").unwrap();
    tree.validate();

    let after: Vec<_> = (0..=110).map(|i| tree.lookup(i).copied()).collect();
    assert_eq!(before, after);
    assert_eq!(tree.height(), height);
    assert_eq!(node_count(&tree), nodes);
}

#[test]
fn writes_touching_the_domain_edges() {
    let mut tree: FigTree<u8, char> = FigTree::new();
    tree.write(0, 255, 'a').unwrap();
    tree.write(0, 0, 'b').unwrap();
    tree.write(255, 255, 'c').unwrap();
    tree.validate();

    assert_eq!(tree.lookup(0), Some(&'b'));
    assert_eq!(tree.lookup(1), Some(&'a'));
    assert_eq!(tree.lookup(254), Some(&'a'));
    assert_eq!(tree.lookup(255), Some(&'c'));

    // Overwrite everything, with continuations on neither side
    tree.write(0, 255, 'd').unwrap();
    tree.validate();
    let all: Vec<_> = coalesce(tree.iter());
    assert_eq!(all, [(0, 255, 'd')]);
}

#[test]
fn writes_leave_other_indexes_alone() {
    let mut tree: FigTree<u32, char, 2> = FigTree::new();
    let mut mock: Mock<u32, char> = Mock::new(0, 999);

    let writes = [
        (100, 199, 'a'),
        (500, 599, 'b'),
        (150, 549, 'c'),
        (0, 9, 'd'),
        (990, 999, 'e'),
    ];
    for (start, end, value) in writes {
        tree.write(start, end, value).unwrap();
        mock.write(start, end, value);
        tree.validate();

        for i in 0..1000 {
            let context = format!("index {i} after writing {start}..={end}");
            assert_eq!(tree.lookup(i), mock.lookup(i), "{context}");
        }
    }
}

#[test]
fn cover_write_replaces_many_entries() {
    let mut tree: FigTree<u32, char, 2> = FigTree::new();
    for i in 0..40 {
        tree.write(i * 10, i * 10 + 4, 'a').unwrap();
    }
    assert!(tree.height() >= 2);

    // Spans entries at several levels, partially covering the first and last
    tree.write(52, 342, 'b').unwrap();
    tree.validate();

    assert_eq!(tree.lookup(50), Some(&'a'));
    assert_eq!(tree.lookup(51), Some(&'a'));
    assert_eq!(tree.lookup(52), Some(&'b'));
    assert_eq!(tree.lookup(200), Some(&'b'));
    assert_eq!(tree.lookup(342), Some(&'b'));
    assert_eq!(tree.lookup(343), Some(&'a'));
    assert_eq!(tree.lookup(344), Some(&'a'));
    assert_eq!(tree.lookup(345), None);
    assert_eq!(tree.lookup(355), None);

    // Write into the middle of the stale region, which forces pruning on the way down
    for i in 0..30 {
        tree.write(60 + i * 9, 62 + i * 9, 'c').unwrap();
        tree.validate();
    }

    let mut mock: Mock<u32, char> = Mock::new(0, 399);
    for i in 0..40 {
        mock.write(i * 10, i * 10 + 4, 'a');
    }
    mock.write(52, 342, 'b');
    for i in 0..30 {
        mock.write(60 + i * 9, 62 + i * 9, 'c');
    }
    assert_eq!(contents(&tree), mock.read(..));
}

#[test]
fn order_one_trees() {
    let mut tree: FigTree<u32, char, 1> = FigTree::new();
    let mut mock: Mock<u32, char> = Mock::new(0, 299);

    for i in (0..100).rev() {
        tree.write(i * 3, i * 3 + 1, 'a').unwrap();
        mock.write(i * 3, i * 3 + 1, 'a');
    }
    for i in 0..50 {
        let start = (i * 37) % 290;
        tree.write(start, start + 7, 'b').unwrap();
        mock.write(start, start + 7, 'b');
        tree.validate();
    }

    assert_eq!(contents(&tree), mock.read(..));
}

#[test]
fn read_clips_to_the_query() {
    let mut tree: FigTree<u32, char> = FigTree::new();
    tree.write(0, 9, 'a').unwrap();
    tree.write(20, 29, 'b').unwrap();
    tree.write(30, 39, 'b').unwrap();

    let items: Vec<_> = tree
        .read(5..=32)
        .unwrap()
        .map(|(r, v)| (r.to_range().unwrap(), *v))
        .collect();
    assert_eq!(items, [(5..=9, 'a'), (20..=29, 'b'), (30..=32, 'b')]);

    assert_eq!(tree.read(10..20).unwrap().count(), 0);
    assert_eq!(tree.read(5..5).unwrap().count(), 0);
    assert_eq!(coalesce(tree.read(..).unwrap()), [(0, 9, 'a'), (20, 39, 'b')]);
}

#[test]
fn invalid_writes_leave_the_tree_unchanged() {
    let mut tree = FigTree::<u16, char>::with_domain(100, 199).unwrap();
    tree.write(100, 150, 'a').unwrap();

    let (hi, lo) = (120, 110);
    assert!(matches!(tree.write(hi, lo, 'b'), Err(Error::InvertedRange { .. })));
    assert!(matches!(tree.write(99, 110, 'b'), Err(Error::OutOfDomain { .. })));
    assert!(matches!(tree.write(150, 200, 'b'), Err(Error::OutOfDomain { .. })));
    assert!(matches!(tree.read(hi..lo), Err(Error::InvertedRange { .. })));

    assert_eq!(coalesce(tree.iter()), [(100, 150, 'a')]);
    assert_eq!(tree.lookup(99), None);
    assert_eq!(tree.lookup(500), None);

    // Reads outside the domain are clipped instead
    assert_eq!(coalesce(tree.read(..).unwrap()), [(100, 150, 'a')]);
}

#[test]
fn invalid_domain() {
    let result = FigTree::<u8, ()>::with_domain(10, 9);
    assert!(matches!(result, Err(Error::EmptyDomain { .. })));

    let tree = FigTree::<u8, ()>::with_domain(10, 10).unwrap();
    assert_eq!(tree.domain().min(), 10);
    assert_eq!(tree.domain().max(), 10);
}

#[test]
fn clear_keeps_the_domain() {
    let mut tree = FigTree::<u32, char, 2>::with_domain(0, 999).unwrap();
    for i in 0..100 {
        tree.write(i * 5, i * 5 + 2, 'a').unwrap();
    }
    assert!(tree.height() > 0);

    tree.clear();
    assert!(tree.is_empty());
    assert_eq!(tree.height(), 0);
    assert_eq!(tree.lookup(10), None);
    assert_eq!(tree.domain().max(), 999);

    tree.write(0, 999, 'b').unwrap();
    assert_eq!(contents(&tree), [(0, 999, 'b')]);
}

#[test]
fn clones_are_independent() {
    let mut tree: FigTree<u32, char, 2> = FigTree::new();
    for i in 0..30 {
        tree.write(i * 4, i * 4 + 1, 'a').unwrap();
    }

    let mut copy = tree.clone();
    copy.write(0, 200, 'b').unwrap();
    copy.validate();

    assert_eq!(tree.lookup(0), Some(&'a'));
    assert_eq!(tree.lookup(2), None);
    assert_eq!(copy.lookup(2), Some(&'b'));
    assert_eq!(contents(&copy), [(0, 200, 'b')]);
}

#[test]
fn debug_lists_effective_entries() {
    let mut tree: FigTree<u8, char> = FigTree::new();
    tree.write(0, 10, 'a').unwrap();
    tree.write(5, 5, 'b').unwrap();

    let formatted = format!("{tree:?}");
    assert_eq!(
        formatted,
        "FigTree { domain: Domain { min: 0, max: 255 }, height: 0, \
         entries: {[0, 4]: 'a', [5, 5]: 'b', [6, 10]: 'a'} }"
    );
}
