//! Baseline alignment within a line, baseline callbacks, and the
//! first/last baseline getters.

use flexlayout::{AlignItems, Dimension, FlexDirection, Node, Number, Size};

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

fn measured_leaf(width: f32, height: f32) -> Node {
    let node = Node::new();
    node.set_measure_func(Some(Box::new(move |_| Size { width, height })));
    node
}

fn layout(root: &Node, width: f32, height: f32) {
    root.calculate_layout(Number::Defined(width), Number::Defined(height));
}

#[test]
fn baselines_align_across_items() {
    let root = Node::new();
    root.set_width(Dimension::Points(300.0));
    root.set_height(Dimension::Points(60.0));
    root.set_align_items(AlignItems::Baseline);

    let small = measured_leaf(40.0, 12.0);
    small.set_baseline_func(Some(Box::new(|_, h| 0.8 * h)));
    let large = measured_leaf(60.0, 24.0);
    large.set_baseline_func(Some(Box::new(|_, h| 0.8 * h)));
    root.append_child(&small).unwrap();
    root.append_child(&large).unwrap();

    layout(&root, 300.0, 60.0);

    // the deepest baseline (0.8 * 24 = 19.2) anchors the line
    assert_approx!(small.layout_top(), 9.6);
    assert_approx!(large.layout_top(), 0.0);
    assert_approx!(small.layout_left(), 0.0);
    assert_approx!(large.layout_left(), 40.0);
    // measured sizes are untouched by baseline alignment
    assert_approx!(small.layout_width(), 40.0);
    assert_approx!(small.layout_height(), 12.0);
    assert_approx!(large.layout_height(), 24.0);
    // the container reports the line's baseline
    assert_approx!(root.first_baseline(), 19.2);
    assert_approx!(root.baseline(), 19.2);
}

#[test]
fn default_baseline_is_content_bottom() {
    let root = Node::new();
    root.set_width(Dimension::Points(300.0));
    root.set_height(Dimension::Points(60.0));
    root.set_align_items(AlignItems::Baseline);

    // no baseline callback: the baseline sits at the content-box bottom
    let plain = measured_leaf(40.0, 20.0);
    let scripted = measured_leaf(40.0, 10.0);
    scripted.set_baseline_func(Some(Box::new(|_, h| 0.5 * h)));
    root.append_child(&plain).unwrap();
    root.append_child(&scripted).unwrap();

    layout(&root, 300.0, 60.0);

    assert_approx!(plain.layout_top(), 0.0);
    assert_approx!(scripted.layout_top(), 15.0);
}

#[test]
fn margins_shift_the_baseline() {
    let root = Node::new();
    root.set_width(Dimension::Points(300.0));
    root.set_height(Dimension::Points(60.0));
    root.set_align_items(AlignItems::Baseline);

    let pushed = measured_leaf(40.0, 10.0);
    pushed.set_margin(flexlayout::Edge::Top, Dimension::Points(20.0));
    let plain = measured_leaf(40.0, 10.0);
    root.append_child(&pushed).unwrap();
    root.append_child(&plain).unwrap();

    layout(&root, 300.0, 60.0);

    // baselines from the margin-box top: 30 vs 10, so the plain item
    // drops by 20 to meet the pushed one
    assert_approx!(pushed.layout_top(), 20.0);
    assert_approx!(plain.layout_top(), 20.0);
}

#[test]
fn baseline_in_column_container_falls_back_to_start() {
    let root = Node::new();
    root.set_width(Dimension::Points(200.0));
    root.set_height(Dimension::Points(200.0));
    root.set_flex_direction(FlexDirection::Column);
    root.set_align_items(AlignItems::Baseline);

    let a = measured_leaf(50.0, 20.0);
    let b = measured_leaf(80.0, 20.0);
    root.append_child(&a).unwrap();
    root.append_child(&b).unwrap();

    layout(&root, 200.0, 200.0);

    assert_approx!(a.layout_left(), 0.0);
    assert_approx!(b.layout_left(), 0.0);
    assert_approx!(b.layout_top(), 20.0);
}

#[test]
fn baseline_getter_falls_back_to_content_bottom() {
    let leaf = Node::new();
    leaf.set_width(Dimension::Points(100.0));
    leaf.set_height(Dimension::Points(30.0));

    layout(&leaf, 100.0, 30.0);

    assert_approx!(leaf.first_baseline(), 30.0);
    assert_approx!(leaf.last_baseline(), 30.0);
}

#[test]
fn container_baseline_without_baseline_items() {
    let root = Node::new();
    root.set_width(Dimension::Points(300.0));
    root.set_height(Dimension::Points(100.0));
    root.set_align_items(AlignItems::FlexStart);

    let child = measured_leaf(40.0, 30.0);
    root.append_child(&child).unwrap();

    layout(&root, 300.0, 100.0);

    // falls back to the first item's content bottom
    assert_approx!(root.first_baseline(), 30.0);
}
