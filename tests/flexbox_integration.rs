//! Single-line flexbox behaviour: grow/shrink resolution, main-axis
//! alignment, auto margins, gaps, reversal and axis remapping.

use flexlayout::{
    Dimension, Direction, Edge, FlexDirection, JustifyContent, Node, Number, WritingMode,
};

macro_rules! assert_approx {
    ($left:expr, $right:expr) => {{
        let (left, right) = ($left, $right);
        assert!(
            (left - right).abs() < 0.01,
            "expected {} ~= {} (difference {})",
            left,
            right,
            left - right
        );
    }};
}

fn px(value: f32) -> Dimension {
    Dimension::Points(value)
}

fn sized(width: f32, height: f32) -> Node {
    let node = Node::new();
    node.set_width(px(width));
    node.set_height(px(height));
    node
}

fn layout(root: &Node, width: f32, height: f32) {
    root.calculate_layout(Number::Defined(width), Number::Defined(height));
}

#[test]
fn basic_row_with_grow() {
    let root = sized(300.0, 200.0);
    let a = Node::new();
    a.set_width(px(50.0));
    a.set_flex_grow(1.0).unwrap();
    let b = Node::new();
    b.set_width(px(50.0));
    b.set_flex_grow(2.0).unwrap();
    root.append_child(&a).unwrap();
    root.append_child(&b).unwrap();

    layout(&root, 300.0, 200.0);

    // 200 of free space split 1:2 on top of the 50pt bases
    assert_approx!(a.layout_left(), 0.0);
    assert_approx!(a.layout_width(), 116.6667);
    assert_approx!(a.layout_height(), 200.0);
    assert_approx!(b.layout_left(), 116.6667);
    assert_approx!(b.layout_width(), 183.3333);
    assert_approx!(b.layout_height(), 200.0);
}

#[test]
fn grow_fairness() {
    // resolved - base == (g_i / sum g) * remaining for unclamped items
    let root = sized(600.0, 100.0);
    let factors = [1.0_f32, 2.0, 3.0];
    let children: Vec<Node> = factors
        .iter()
        .map(|&g| {
            let child = Node::new();
            child.set_width(px(60.0));
            child.set_flex_grow(g).unwrap();
            root.append_child(&child).unwrap();
            child
        })
        .collect();

    layout(&root, 600.0, 100.0);

    let remaining = 600.0 - 3.0 * 60.0;
    let total: f32 = factors.iter().sum();
    for (child, g) in children.iter().zip(factors) {
        assert_approx!(child.layout_width() - 60.0, remaining * g / total);
    }
}

#[test]
fn space_between_with_padding() {
    let root = sized(300.0, 200.0);
    root.set_padding(Edge::All, px(10.0));
    root.set_justify_content(JustifyContent::SpaceBetween);
    let children: Vec<Node> = (0..3)
        .map(|_| {
            let child = sized(40.0, 40.0);
            root.append_child(&child).unwrap();
            child
        })
        .collect();

    layout(&root, 300.0, 200.0);

    let expected = [10.0, 130.0, 250.0];
    for (child, x) in children.iter().zip(expected) {
        assert_approx!(child.layout_left(), x);
        assert_approx!(child.layout_top(), 10.0);
        assert_approx!(child.layout_width(), 40.0);
        assert_approx!(child.layout_height(), 40.0);
    }
}

#[test]
fn order_reorders_visually_but_not_iteration() {
    let root = sized(300.0, 100.0);
    let a = sized(100.0, 50.0);
    a.set_order(2);
    let b = sized(100.0, 50.0);
    b.set_order(1);
    let c = sized(100.0, 50.0);
    c.set_order(0);
    root.append_child(&a).unwrap();
    root.append_child(&b).unwrap();
    root.append_child(&c).unwrap();

    layout(&root, 300.0, 100.0);

    assert_approx!(c.layout_left(), 0.0);
    assert_approx!(b.layout_left(), 100.0);
    assert_approx!(a.layout_left(), 200.0);

    // iteration still reflects insertion order
    assert_eq!(root.child(0).unwrap(), a);
    assert_eq!(root.child(1).unwrap(), b);
    assert_eq!(root.child(2).unwrap(), c);
}

#[test]
fn equal_order_preserves_insertion_order() {
    let root = sized(300.0, 100.0);
    let children: Vec<Node> = (0..3)
        .map(|_| {
            let child = sized(50.0, 50.0);
            root.append_child(&child).unwrap();
            child
        })
        .collect();

    layout(&root, 300.0, 100.0);

    for (index, child) in children.iter().enumerate() {
        assert_approx!(child.layout_left(), 50.0 * index as f32);
    }
}

#[test]
fn shrink_conserves_main_axis() {
    let root = sized(200.0, 100.0);
    let a = sized(120.0, 50.0);
    let b = sized(120.0, 50.0);
    root.append_child(&a).unwrap();
    root.append_child(&b).unwrap();

    layout(&root, 200.0, 100.0);

    // equal scaled shrink factors: both give up 20
    assert_approx!(a.layout_width(), 100.0);
    assert_approx!(b.layout_width(), 100.0);
    assert_approx!(b.layout_left(), 100.0);
    assert_approx!(a.layout_width() + b.layout_width(), 200.0);
}

#[test]
fn max_constraint_freezes_and_redistributes() {
    let root = sized(300.0, 100.0);
    let capped = Node::new();
    capped.set_width(px(0.0));
    capped.set_max_width(px(80.0));
    capped.set_flex_grow(1.0).unwrap();
    let free = Node::new();
    free.set_width(px(0.0));
    free.set_flex_grow(1.0).unwrap();
    root.append_child(&capped).unwrap();
    root.append_child(&free).unwrap();

    layout(&root, 300.0, 100.0);

    assert_approx!(capped.layout_width(), 80.0);
    assert_approx!(free.layout_width(), 220.0);
}

#[test]
fn content_minimum_stops_shrinking() {
    let root = sized(100.0, 50.0);
    let measured = Node::new();
    measured.set_measure_func(Some(Box::new(|_| flexlayout::Size {
        width: 80.0,
        height: 10.0,
    })));
    let plain = sized(80.0, 10.0);
    root.append_child(&measured).unwrap();
    root.append_child(&plain).unwrap();

    layout(&root, 100.0, 50.0);

    // the measured child's automatic minimum is its content width; the
    // sized child absorbs the whole deficit
    assert_approx!(measured.layout_width(), 80.0);
    assert_approx!(plain.layout_width(), 20.0);
}

#[test]
fn auto_margins_absorb_free_space() {
    let root = sized(300.0, 100.0);
    let a = sized(50.0, 50.0);
    a.set_margin(Edge::Left, Dimension::Auto);
    a.set_margin(Edge::Right, Dimension::Auto);
    let b = sized(50.0, 50.0);
    root.append_child(&a).unwrap();
    root.append_child(&b).unwrap();

    layout(&root, 300.0, 100.0);

    assert_approx!(a.layout_left(), 100.0);
    assert_approx!(b.layout_left(), 250.0);
}

#[test]
fn justify_content_distributions() {
    let cases: [(JustifyContent, [f32; 2]); 5] = [
        (JustifyContent::FlexEnd, [100.0, 200.0]),
        (JustifyContent::Center, [50.0, 150.0]),
        (JustifyContent::SpaceBetween, [0.0, 200.0]),
        (JustifyContent::SpaceAround, [25.0, 175.0]),
        (JustifyContent::SpaceEvenly, [33.3333, 166.6667]),
    ];
    for (justify, expected) in cases {
        let root = sized(300.0, 100.0);
        root.set_justify_content(justify);
        let a = sized(100.0, 50.0);
        let b = sized(100.0, 50.0);
        root.append_child(&a).unwrap();
        root.append_child(&b).unwrap();

        layout(&root, 300.0, 100.0);

        assert_approx!(a.layout_left(), expected[0]);
        assert_approx!(b.layout_left(), expected[1]);
    }
}

#[test]
fn main_axis_gap() {
    let root = sized(320.0, 100.0);
    root.set_column_gap(px(10.0));
    let children: Vec<Node> = (0..3)
        .map(|_| {
            let child = sized(100.0, 50.0);
            root.append_child(&child).unwrap();
            child
        })
        .collect();

    layout(&root, 320.0, 100.0);

    assert_approx!(children[0].layout_left(), 0.0);
    assert_approx!(children[1].layout_left(), 110.0);
    assert_approx!(children[2].layout_left(), 220.0);
}

#[test]
fn row_reverse_mirrors_positions() {
    let root = sized(300.0, 100.0);
    root.set_flex_direction(FlexDirection::RowReverse);
    let a = sized(100.0, 50.0);
    let b = sized(100.0, 50.0);
    root.append_child(&a).unwrap();
    root.append_child(&b).unwrap();

    layout(&root, 300.0, 100.0);

    assert_approx!(a.layout_left(), 200.0);
    assert_approx!(b.layout_left(), 100.0);
}

#[test]
fn rtl_reverses_rows() {
    let root = sized(300.0, 100.0);
    root.set_direction(Direction::Rtl);
    let a = sized(100.0, 50.0);
    let b = sized(100.0, 50.0);
    root.append_child(&a).unwrap();
    root.append_child(&b).unwrap();

    layout(&root, 300.0, 100.0);

    assert_approx!(a.layout_left(), 200.0);
    assert_approx!(b.layout_left(), 100.0);
}

#[test]
fn left_keyword_is_physical_in_rtl() {
    let root = sized(300.0, 100.0);
    root.set_direction(Direction::Rtl);
    root.set_justify_content(JustifyContent::Left);
    let a = sized(100.0, 50.0);
    let b = sized(100.0, 50.0);
    root.append_child(&a).unwrap();
    root.append_child(&b).unwrap();

    layout(&root, 300.0, 100.0);

    // packed against the physical left edge, still in RTL item order
    assert_approx!(b.layout_left(), 0.0);
    assert_approx!(a.layout_left(), 100.0);
}

#[test]
fn vertical_writing_mode_turns_rows() {
    let root = sized(100.0, 300.0);
    root.set_writing_mode(WritingMode::VerticalRl);
    let a = sized(100.0, 100.0);
    let b = sized(100.0, 100.0);
    root.append_child(&a).unwrap();
    root.append_child(&b).unwrap();

    layout(&root, 100.0, 300.0);

    // `row` flows along the inline axis, which is now vertical
    assert_approx!(a.layout_top(), 0.0);
    assert_approx!(b.layout_top(), 100.0);
    assert_approx!(b.layout_left(), 0.0);
}

#[test]
fn percentages_resolve_against_content_box() {
    let root = sized(200.0, 100.0);
    let child = Node::new();
    child.set_width(Dimension::Percent(50.0));
    child.set_height(Dimension::Percent(50.0));
    root.append_child(&child).unwrap();

    layout(&root, 200.0, 100.0);

    assert_approx!(child.layout_width(), 100.0);
    assert_approx!(child.layout_height(), 50.0);
}

#[test]
fn aspect_ratio_transfers_between_axes() {
    let root = sized(300.0, 200.0);
    root.set_align_items(flexlayout::AlignItems::FlexStart);
    let from_width = Node::new();
    from_width.set_width(px(100.0));
    from_width.set_aspect_ratio(Some(2.0)).unwrap();
    let from_height = Node::new();
    from_height.set_height(px(50.0));
    from_height.set_aspect_ratio(Some(2.0)).unwrap();
    root.append_child(&from_width).unwrap();
    root.append_child(&from_height).unwrap();

    layout(&root, 300.0, 200.0);

    assert_approx!(from_width.layout_height(), 50.0);
    assert_approx!(from_height.layout_width(), 100.0);
}

#[test]
fn safe_alignment_keeps_oversized_items_in_their_line() {
    let root = sized(300.0, 50.0);
    root.set_align_items(flexlayout::AlignItems::Center);
    let child = sized(100.0, 80.0);
    root.append_child(&child).unwrap();

    layout(&root, 300.0, 50.0);
    // unsafe centering (the default) overflows both edges
    assert_approx!(child.layout_top(), -15.0);

    root.set_align_items_safety(flexlayout::AlignSafety::Safe);
    layout(&root, 300.0, 50.0);
    assert_approx!(child.layout_top(), 0.0);
}

#[test]
fn align_self_safety_governs_self_aligned_items() {
    let root = sized(300.0, 50.0);
    let child = sized(100.0, 80.0);
    child.set_align_self(flexlayout::AlignSelf::FlexEnd);
    root.append_child(&child).unwrap();

    layout(&root, 300.0, 50.0);
    assert_approx!(child.layout_top(), -30.0);

    child.set_align_self_safety(flexlayout::AlignSafety::Safe);
    layout(&root, 300.0, 50.0);
    assert_approx!(child.layout_top(), 0.0);
}

#[test]
fn min_wins_over_max() {
    let root = sized(300.0, 100.0);
    let child = sized(50.0, 50.0);
    child.set_min_width(px(80.0));
    child.set_max_width(px(60.0));
    root.append_child(&child).unwrap();

    layout(&root, 300.0, 100.0);

    assert_approx!(child.layout_width(), 80.0);
}
