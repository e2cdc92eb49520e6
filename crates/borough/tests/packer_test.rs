use borough::packer::{Packing, RectanglePacker};
use proptest::prelude::*;

fn pack(blocks: &[(&str, f64, f64)], spacing: f64) -> Packing {
    let mut packer = RectanglePacker::new(spacing);
    for &(name, w, h) in blocks {
        packer.add(name, w, h);
    }
    packer.fit()
}

/// Padded boxes: the visible rectangle grown by half the spacing on every side.
fn assert_no_overlap(packing: &Packing, spacing: f64) {
    let m = spacing / 2.0;
    let boxes: Vec<(f64, f64, f64, f64)> = packing
        .placements
        .iter()
        .map(|p| (p.x - m, p.y - m, p.x + p.width + m, p.y + p.height + m))
        .collect();

    for (i, a) in boxes.iter().enumerate() {
        assert!(a.0 >= 0.0 && a.1 >= 0.0, "box {i} starts outside: {a:?}");
        assert!(
            a.2 <= packing.width && a.3 <= packing.height,
            "box {i} ends outside {}x{}: {a:?}",
            packing.width,
            packing.height
        );
        for (j, b) in boxes.iter().enumerate().skip(i + 1) {
            let disjoint = a.2 <= b.0 || b.2 <= a.0 || a.3 <= b.1 || b.3 <= a.1;
            assert!(disjoint, "boxes {i} and {j} overlap: {a:?} {b:?}");
        }
    }
}

#[test]
fn empty_packer_yields_an_empty_container() {
    let packing = RectanglePacker::new(2.0).fit();
    assert_eq!(packing.width, 0.0);
    assert_eq!(packing.height, 0.0);
    assert!(packing.placements.is_empty());
}

#[test]
fn single_rectangle_sits_inside_its_padding() {
    let packing = pack(&[("x", 1.0, 1.0)], 2.0);
    assert_eq!((packing.width, packing.height), (3.0, 3.0));
    assert_eq!(packing.position_of("x"), Some((1.0, 1.0)));
}

#[test]
fn two_unit_squares_share_a_row() {
    let packing = pack(&[("p.A", 1.0, 1.0), ("p.B", 1.0, 1.0)], 2.0);
    assert_eq!((packing.width, packing.height), (6.0, 3.0));
    assert_eq!(packing.position_of("p.A"), Some((1.0, 1.0)));
    assert_eq!(packing.position_of("p.B"), Some((4.0, 1.0)));
}

#[test]
fn smaller_rectangle_goes_right_of_the_larger_one() {
    let packing = pack(&[("p.B", 1.0, 1.0), ("p.A", 2.0, 2.0)], 2.0);
    assert_eq!((packing.width, packing.height), (7.0, 4.0));
    assert_eq!(packing.position_of("p.A"), Some((1.0, 1.0)));
    assert_eq!(packing.position_of("p.B"), Some((5.0, 1.0)));
}

#[test]
fn placements_follow_descending_area_with_stable_ties() {
    let packing = pack(&[("a", 3.0, 1.0), ("b", 1.0, 3.0), ("c", 2.0, 2.0)], 0.0);

    let order: Vec<&str> = packing.placements.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(order, vec!["c", "a", "b"]);
    let indices: Vec<usize> = packing.placements.iter().map(|p| p.index).collect();
    assert_eq!(indices, vec![2, 0, 1]);

    assert_eq!((packing.width, packing.height), (5.0, 5.0));
    assert_eq!(packing.position_of("c"), Some((0.0, 0.0)));
    assert_eq!(packing.position_of("a"), Some((2.0, 0.0)));
    assert_eq!(packing.position_of("b"), Some((0.0, 2.0)));
    assert_no_overlap(&packing, 0.0);
}

#[test]
fn equal_squares_fill_a_grid() {
    let packing = pack(&[("a", 2.0, 2.0), ("b", 2.0, 2.0), ("c", 2.0, 2.0)], 0.0);
    assert_eq!((packing.width, packing.height), (4.0, 4.0));
    assert_eq!(packing.position_of("a"), Some((0.0, 0.0)));
    assert_eq!(packing.position_of("b"), Some((2.0, 0.0)));
    assert_eq!(packing.position_of("c"), Some((0.0, 2.0)));
}

#[test]
fn unit_squares_pack_nearly_square() {
    let expected = [
        (2usize, (2.0, 1.0)),
        (3, (2.0, 2.0)),
        (4, (2.0, 2.0)),
        (5, (3.0, 2.0)),
        (7, (3.0, 3.0)),
        (16, (4.0, 4.0)),
        (50, (8.0, 7.0)),
        (100, (10.0, 10.0)),
    ];
    for (n, size) in expected {
        let blocks: Vec<(String, f64, f64)> = (0..n).map(|i| (format!("r{i}"), 1.0, 1.0)).collect();
        let mut packer = RectanglePacker::new(0.0);
        for (name, w, h) in &blocks {
            packer.add(name.as_str(), *w, *h);
        }
        let packing = packer.fit();

        assert_eq!((packing.width, packing.height), size, "{n} unit squares");
        assert!(packing.width * packing.height <= 1.5 * n as f64);
        assert_no_overlap(&packing, 0.0);
    }
}

/// Sizes and spacing in half units, so every coordinate stays exactly representable.
fn half_units(range: std::ops::Range<u32>) -> impl Strategy<Value = f64> {
    range.prop_map(|n| f64::from(n) / 2.0)
}

fn blocks_strategy() -> impl Strategy<Value = (Vec<(f64, f64)>, f64)> {
    (
        prop::collection::vec((half_units(1..19), half_units(1..19)), 1..40),
        half_units(0..6),
    )
}

proptest! {
    #[test]
    fn mixed_sizes_never_overlap((blocks, spacing) in blocks_strategy()) {
        let mut packer = RectanglePacker::new(spacing);
        for (i, &(w, h)) in blocks.iter().enumerate() {
            packer.add(format!("b{i}"), w, h);
        }
        let packing = packer.fit();

        prop_assert_eq!(packing.placements.len(), blocks.len());
        assert_no_overlap(&packing, spacing);
    }
}

#[test]
fn packing_is_deterministic() {
    let mut packer = RectanglePacker::new(2.0);
    for i in 0..30 {
        packer.add(format!("n{i}"), (i % 5 + 1) as f64, (i % 3 + 1) as f64);
    }
    assert_eq!(packer.fit(), packer.fit());
}

#[test]
fn position_of_unknown_name_is_none() {
    let packing = pack(&[("a", 1.0, 1.0)], 0.0);
    assert_eq!(packing.position_of("b"), None);
}
