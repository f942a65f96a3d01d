//! The layout algorithm: intrinsic measurement, flex base sizing, line
//! partitioning, flexible-length resolution and positioning.
//!
//! Entry point is [`compute`], which resolves the root's own size and
//! then walks the tree top-down. All scratch state lives in per-call
//! `FlexItem`/`LineBox` vectors sized to the direct children of the
//! container being laid out.

use crate::geometry::{Rect, Size};
use crate::node::NodeRef;
use crate::number::{MinMax, Number, OrElse};
use crate::style::*;

use crate::number::Number::{Defined, Undefined};

/// Free-space convergence threshold for the flexible-length resolver.
const EPSILON: f32 = 1e-7;

/// Per-item scratch state for one container layout.
struct FlexItem {
    node: NodeRef,
    margin: Rect<f32>,
    main_start_auto: bool,
    main_end_auto: bool,
    cross_start_auto: bool,
    cross_end_auto: bool,
    grow: f32,
    shrink: f32,
    /// Flex base size, already clamped by the main-axis min/max.
    base: f32,
    min_main: Number,
    max_main: Number,
    min_cross: Number,
    max_cross: Number,
    /// Whether the cross size property resolved to a definite length.
    cross_prop_definite: bool,
    aspect_ratio: Number,
    target_main: f32,
    frozen: bool,
    hyp_cross: f32,
    cross_size: f32,
    cross_stretched: bool,
    main_pos: f32,
    cross_pos: f32,
    /// Baseline-aligned in a row container (the only case where
    /// baseline alignment participates).
    is_baseline: bool,
    /// Baseline distance from the margin-box cross-start edge.
    baseline: f32,
}

impl FlexItem {
    fn outer_main(&self, is_row: bool) -> f32 {
        self.target_main + self.margin.main(is_row)
    }

    fn outer_hyp_cross(&self, is_row: bool) -> f32 {
        self.hyp_cross + self.margin.cross(is_row)
    }
}

struct LineBox {
    items: Vec<usize>,
    cross_size: f32,
    cross_start: f32,
    max_baseline: f32,
    has_baseline_items: bool,
}

/// Lays out `root` and its whole subtree against the given parent size,
/// clearing the dirty flag of every node it resolves.
pub(crate) fn compute(root: &NodeRef, constraint: Size<Number>) {
    let (style, inherited_direction) = {
        let inner = root.borrow();
        let inherited = inner
            .parent
            .upgrade()
            .map(|parent| parent.borrow().layout.direction)
            .unwrap_or(Direction::Ltr);
        (inner.style.clone(), inherited)
    };

    let axes = style.flow_axes(inherited_direction);

    let mut width = style.size.width.resolve(constraint.width);
    let mut height = style.size.height.resolve(constraint.height);
    if let Defined(ratio) = style.aspect_ratio {
        match (width, height) {
            (Defined(w), Undefined) => height = Defined(w / ratio),
            (Undefined, Defined(h)) => width = Defined(h * ratio),
            _ => {}
        }
    }
    let definite = Size { width: width.is_defined(), height: height.is_defined() };

    // auto-sized roots fall back to their intrinsic size
    if width.is_undefined() || height.is_undefined() {
        let available = Size {
            width: constraint.width.or_else(f32::INFINITY),
            height: constraint.height.or_else(f32::INFINITY),
        };
        let content = intrinsic_size(root, available);
        width = width.or_else(Defined(content.width));
        height = height.or_else(Defined(content.height));
    }

    let width = clamp(
        width.or_zero(),
        style.min_size.width.resolve(constraint.width),
        style.max_size.width.resolve(constraint.width),
    );
    let height = clamp(
        height.or_zero(),
        style.min_size.height.resolve(constraint.height),
        style.max_size.height.resolve(constraint.height),
    );

    let (x, y) = relative_offset(&style, constraint.width, constraint.height);

    {
        let mut inner = root.borrow_mut();
        inner.layout.left = x;
        inner.layout.top = y;
        inner.layout.width = width;
        inner.layout.height = height;
        inner.layout.direction = axes.direction;
        inner.layout.first_baseline = None;
        inner.layout.last_baseline = None;
    }

    layout_children(root, constraint.width, definite);

    let mut inner = root.borrow_mut();
    inner.is_dirty = false;
    inner.last_constraint = Some(constraint);
}

/// Positions one resolved box and recurses into its children.
#[allow(clippy::too_many_arguments)]
fn layout_box(
    node: &NodeRef,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    definite: Size<bool>,
    inherited_direction: Direction,
    percent_basis: Size<Number>,
) {
    {
        let mut inner = node.borrow_mut();
        let direction = match inner.style.direction {
            Direction::Inherit => inherited_direction,
            used => used,
        };
        inner.layout.left = x;
        inner.layout.top = y;
        inner.layout.width = width.max(0.0);
        inner.layout.height = height.max(0.0);
        inner.layout.direction = direction;
        inner.layout.first_baseline = None;
        inner.layout.last_baseline = None;
    }

    layout_children(node, percent_basis.width, definite);

    let mut inner = node.borrow_mut();
    inner.is_dirty = false;
    inner.last_constraint = Some(percent_basis);
}

/// Lays out the children of a node whose own border box is already
/// resolved. `pb_basis` is the percentage basis for the node's own
/// padding and border (its parent's inline size).
fn layout_children(node: &NodeRef, pb_basis: Number, definite: Size<bool>) {
    let (style, children, border_box, used_direction) = {
        let inner = node.borrow();
        (
            inner.style.clone(),
            inner.children.clone(),
            Size { width: inner.layout.width, height: inner.layout.height },
            inner.layout.direction,
        )
    };
    if children.is_empty() {
        return;
    }

    let axes = style.flow_axes(used_direction);
    let is_row = axes.main_is_row;
    let is_wrap_reverse = style.flex_wrap == FlexWrap::WrapReverse;

    let padding = style.padding.map(|d| d.numeric(pb_basis));
    let border = style.border.map(|d| d.numeric(pb_basis));
    let pb = Rect {
        left: padding.left + border.left,
        right: padding.right + border.right,
        top: padding.top + border.top,
        bottom: padding.bottom + border.bottom,
    };

    let content = Size {
        width: (border_box.width - pb.horizontal()).max(0.0),
        height: (border_box.height - pb.vertical()).max(0.0),
    };
    let content_main = content.main(is_row);
    let content_cross = content.cross(is_row);
    let cross_definite = definite.cross(is_row);

    let inline_basis = if style.writing_mode.is_vertical() {
        Defined(content.height)
    } else {
        Defined(content.width)
    };
    let main_gap = style.main_gap(is_row).numeric(inline_basis);
    let cross_gap = style.cross_gap(is_row).numeric(inline_basis);

    let avail_main = Defined(content_main);
    let avail_cross = Defined(content_cross);

    // 9.1. ordering: stable sort on `order`, insertion order breaking ties
    let mut flow: Vec<NodeRef> = children
        .iter()
        .filter(|child| {
            let inner = child.borrow();
            inner.style.display != Display::None
                && inner.style.position_type != PositionType::Absolute
        })
        .cloned()
        .collect();
    flow.sort_by_key(|child| child.borrow().style.order);

    // 9.2. flex base and hypothetical sizes
    let mut items: Vec<FlexItem> = Vec::with_capacity(flow.len());
    for child in &flow {
        let child_style = child.borrow().style.clone();
        let content_size = intrinsic_size(child, content);

        let margin = child_style.margin.map(|d| d.numeric(inline_basis));
        let mut resolved_main = child_style.size.main(is_row).resolve(avail_main);
        let mut resolved_cross = child_style.size.cross(is_row).resolve(avail_cross);

        // aspect-ratio transfer: one definite axis determines the other
        if let Defined(ratio) = child_style.aspect_ratio {
            match (resolved_main, resolved_cross, is_row) {
                (Defined(main), Undefined, true) => resolved_cross = Defined(main / ratio),
                (Defined(main), Undefined, false) => resolved_cross = Defined(main * ratio),
                (Undefined, Defined(cross), true) => resolved_main = Defined(cross * ratio),
                (Undefined, Defined(cross), false) => resolved_main = Defined(cross / ratio),
                _ => {}
            }
        }

        let base = match child_style.flex_basis.resolve(avail_main) {
            Defined(basis) => basis,
            Undefined => match child_style.flex_basis {
                Dimension::Content => content_size.main(is_row),
                _ => resolved_main.or_else(content_size.main(is_row)),
            },
        };

        let max_main = child_style.max_size.main(is_row).resolve(avail_main);
        let min_main = match child_style.min_size.main(is_row) {
            // automatic minimum: the content-based lower bound, capped
            // by the definite main size and max
            Dimension::Auto => Defined(
                content_size.main(is_row).maybe_min(resolved_main).maybe_min(max_main),
            ),
            dim => dim.resolve(avail_main),
        };
        let min_cross = child_style.min_size.cross(is_row).resolve(avail_cross);
        let max_cross = child_style.max_size.cross(is_row).resolve(avail_cross);

        let base = clamp(base, min_main, max_main);
        let hyp_cross = clamp(
            resolved_cross.or_else(content_size.cross(is_row)),
            min_cross,
            max_cross,
        );

        items.push(FlexItem {
            node: child.clone(),
            main_start_auto: child_style.margin.main_start(is_row).is_auto(),
            main_end_auto: child_style.margin.main_end(is_row).is_auto(),
            cross_start_auto: child_style.margin.cross_start(is_row).is_auto(),
            cross_end_auto: child_style.margin.cross_end(is_row).is_auto(),
            margin,
            grow: child_style.flex_grow,
            shrink: child_style.flex_shrink,
            base,
            min_main,
            max_main,
            min_cross,
            max_cross,
            cross_prop_definite: resolved_cross.is_defined(),
            aspect_ratio: child_style.aspect_ratio,
            target_main: base,
            frozen: false,
            hyp_cross,
            cross_size: hyp_cross,
            cross_stretched: false,
            main_pos: 0.0,
            cross_pos: 0.0,
            is_baseline: false,
            baseline: 0.0,
        });
    }

    // 9.3. collect items into flex lines
    let mut lines: Vec<LineBox> = Vec::new();
    if style.flex_wrap == FlexWrap::NoWrap {
        lines.push(LineBox {
            items: (0..items.len()).collect(),
            cross_size: 0.0,
            cross_start: 0.0,
            max_baseline: 0.0,
            has_baseline_items: false,
        });
    } else {
        let mut line: Vec<usize> = Vec::new();
        let mut running = 0.0;
        for (index, item) in items.iter().enumerate() {
            let outer = item.base + item.margin.main(is_row);
            let added = if line.is_empty() { outer } else { outer + main_gap };
            if !line.is_empty() && running + added > content_main + EPSILON {
                lines.push(LineBox {
                    items: std::mem::take(&mut line),
                    cross_size: 0.0,
                    cross_start: 0.0,
                    max_baseline: 0.0,
                    has_baseline_items: false,
                });
                running = outer;
            } else {
                running += added;
            }
            line.push(index);
        }
        if !line.is_empty() {
            lines.push(LineBox {
                items: line,
                cross_size: 0.0,
                cross_start: 0.0,
                max_baseline: 0.0,
                has_baseline_items: false,
            });
        }
        if is_wrap_reverse {
            lines.reverse();
        }
    }
    if lines.is_empty() {
        lines.push(LineBox {
            items: Vec::new(),
            cross_size: 0.0,
            cross_start: 0.0,
            max_baseline: 0.0,
            has_baseline_items: false,
        });
    }

    // 9.7. resolve flexible lengths per line, freezing clamped items
    for line in &lines {
        let count = line.items.len();
        let gaps_total = main_gap * count.saturating_sub(1) as f32;
        for _ in 0..count {
            let used: f32 =
                line.items.iter().map(|&i| items[i].outer_main(is_row)).sum();
            let free_space = content_main - used - gaps_total;
            if free_space.abs() < EPSILON {
                break;
            }
            let growing = free_space > 0.0;

            let total_factor: f32 = line
                .items
                .iter()
                .filter(|&&i| !items[i].frozen)
                .map(|&i| {
                    if growing {
                        items[i].grow
                    } else {
                        items[i].shrink * items[i].base
                    }
                })
                .sum();
            if total_factor <= 0.0 {
                break;
            }

            let mut changed = false;
            for &i in &line.items {
                let item = &mut items[i];
                if item.frozen {
                    continue;
                }
                let factor =
                    if growing { item.grow } else { item.shrink * item.base };
                if factor <= 0.0 {
                    continue;
                }
                let next = item.target_main + free_space * (factor / total_factor);
                let clamped = clamp(next, item.min_main, item.max_main);
                if (clamped - next).abs() > EPSILON {
                    item.frozen = true;
                }
                if (clamped - item.target_main).abs() > EPSILON {
                    changed = true;
                }
                item.target_main = clamped;
            }
            if !changed {
                break;
            }
        }
    }

    // 9.4. line cross sizes, baselines included
    let single_line = lines.len() == 1;
    for line in &mut lines {
        let mut max_baseline = 0.0_f32;
        let mut has_baseline_items = false;
        for &i in &line.items {
            let align = {
                let child = items[i].node.borrow();
                child.style.align_self.resolve(style.align_items)
            };
            // baseline alignment is only meaningful when the cross axis
            // is the block axis; columns fall back to flex-start
            if align == AlignItems::Baseline && is_row {
                let (w, h) = item_box(&items[i], is_row);
                let from_border = item_baseline(&items[i].node, w, h);
                items[i].is_baseline = true;
                items[i].baseline = items[i].margin.cross_start(is_row) + from_border;
                max_baseline = max_baseline.max(items[i].baseline);
                has_baseline_items = true;
            }
        }
        line.max_baseline = max_baseline;
        line.has_baseline_items = has_baseline_items;

        if single_line && style.flex_wrap == FlexWrap::NoWrap && cross_definite {
            line.cross_size = content_cross;
        } else {
            let mut cross = 0.0_f32;
            for &i in &line.items {
                let item = &items[i];
                let candidate = if item.is_baseline {
                    max_baseline - item.baseline + item.outer_hyp_cross(is_row)
                } else {
                    item.outer_hyp_cross(is_row)
                };
                cross = cross.max(candidate);
            }
            line.cross_size = cross;
        }
    }

    // 9.6 (16). distribute lines per align-content
    let line_count = lines.len();
    let lines_total: f32 = lines.iter().map(|line| line.cross_size).sum::<f32>()
        + cross_gap * line_count.saturating_sub(1) as f32;
    let cross_free = content_cross - lines_total;
    let align_content = style.align_content.resolve(is_wrap_reverse);

    let (mut line_lead, line_spacing) = match align_content {
        AlignContent::FlexStart => (0.0, 0.0),
        AlignContent::FlexEnd => (cross_free, 0.0),
        AlignContent::Center => (cross_free / 2.0, 0.0),
        AlignContent::SpaceBetween => {
            if line_count > 1 {
                (0.0, cross_free / (line_count - 1) as f32)
            } else {
                (0.0, 0.0)
            }
        }
        AlignContent::SpaceAround => {
            (cross_free / line_count as f32 / 2.0, cross_free / line_count as f32)
        }
        AlignContent::SpaceEvenly => {
            (cross_free / (line_count + 1) as f32, cross_free / (line_count + 1) as f32)
        }
        AlignContent::Stretch => {
            if cross_free > 0.0 {
                let addition = cross_free / line_count as f32;
                for line in &mut lines {
                    line.cross_size += addition;
                }
            }
            (0.0, 0.0)
        }
        // L3 keywords were collapsed by `resolve`
        _ => (0.0, 0.0),
    };
    if style.align_content_safety == AlignSafety::Safe {
        line_lead = line_lead.max(0.0);
    }

    let mut cross_cursor = pb.cross_start(is_row) + line_lead;
    for line in &mut lines {
        line.cross_start = cross_cursor;
        cross_cursor += line.cross_size + line_spacing + cross_gap;
    }

    // 9.5 (12). main-axis alignment per line
    let justify = style.justify_content.resolve(axes);
    for line in &lines {
        let count = line.items.len();
        if count == 0 {
            continue;
        }
        let gaps_total = main_gap * (count - 1) as f32;
        let used: f32 = line.items.iter().map(|&i| items[i].outer_main(is_row)).sum();
        let free_space = content_main - used - gaps_total;

        let auto_margins: usize = line
            .items
            .iter()
            .map(|&i| items[i].main_start_auto as usize + items[i].main_end_auto as usize)
            .sum();

        let (lead, spacing, auto_margin) = if auto_margins > 0 {
            (0.0, 0.0, free_space.max(0.0) / auto_margins as f32)
        } else {
            let (lead, spacing) = match justify {
                JustifyContent::FlexStart => (0.0, 0.0),
                JustifyContent::FlexEnd => (free_space, 0.0),
                JustifyContent::Center => (free_space / 2.0, 0.0),
                JustifyContent::SpaceBetween => {
                    if count > 1 {
                        (0.0, free_space / (count - 1) as f32)
                    } else {
                        (0.0, 0.0)
                    }
                }
                JustifyContent::SpaceAround => {
                    (free_space / count as f32 / 2.0, free_space / count as f32)
                }
                JustifyContent::SpaceEvenly => {
                    (free_space / (count + 1) as f32, free_space / (count + 1) as f32)
                }
                _ => (0.0, 0.0),
            };
            (lead, spacing, 0.0)
        };

        let mut cursor = pb.main_start(is_row) + lead;
        for &i in &line.items {
            let item = &mut items[i];
            let start_margin = item.margin.main_start(is_row)
                + if item.main_start_auto { auto_margin } else { 0.0 };
            let end_margin = item.margin.main_end(is_row)
                + if item.main_end_auto { auto_margin } else { 0.0 };
            item.main_pos = cursor + start_margin;
            cursor += start_margin + item.target_main + end_margin + spacing + main_gap;
        }

        if axes.main_reversed {
            let content_start = pb.main_start(is_row);
            for &i in &line.items {
                let item = &mut items[i];
                item.main_pos =
                    content_start + content_main - (item.main_pos - content_start) - item.target_main;
            }
        }
    }

    // 9.6 (13/14). cross-axis sizing and alignment per item
    for line in &lines {
        for &i in &line.items {
            let item = &mut items[i];
            let (align, safety, cross_prop_auto) = {
                let child = item.node.borrow();
                (
                    child.style.align_self.resolve(style.align_items),
                    child.style.item_safety(&style),
                    !child.style.size.cross(is_row).is_defined(),
                )
            };
            let margins = item.margin.cross(is_row);
            let avail = line.cross_size - margins;

            if align == AlignItems::Stretch
                && cross_prop_auto
                && !item.cross_start_auto
                && !item.cross_end_auto
            {
                item.cross_size = clamp(avail.max(0.0), item.min_cross, item.max_cross);
                item.cross_stretched = true;
            } else {
                item.cross_size = item.hyp_cross;
            }

            // aspect-ratio re-transfer with the now-definite main size
            if !item.cross_prop_definite && !item.cross_stretched {
                if let Defined(ratio) = item.aspect_ratio {
                    let derived = if is_row {
                        item.target_main / ratio
                    } else {
                        item.target_main * ratio
                    };
                    item.cross_size = clamp(derived, item.min_cross, item.max_cross);
                }
            }

            let free = avail - item.cross_size;
            let start_margin = item.margin.cross_start(is_row);
            let end_margin = item.margin.cross_end(is_row);

            let mut pos = if item.cross_start_auto && item.cross_end_auto {
                line.cross_start + free.max(0.0) / 2.0
            } else if item.cross_start_auto {
                line.cross_start + free.max(0.0)
            } else if item.cross_end_auto {
                line.cross_start + start_margin
            } else {
                match align {
                    AlignItems::FlexStart => {
                        if is_wrap_reverse {
                            line.cross_start + line.cross_size - item.cross_size - end_margin
                        } else {
                            line.cross_start + start_margin
                        }
                    }
                    AlignItems::FlexEnd => {
                        if is_wrap_reverse {
                            line.cross_start + start_margin
                        } else {
                            line.cross_start + line.cross_size - item.cross_size - end_margin
                        }
                    }
                    AlignItems::Center => line.cross_start + start_margin + free / 2.0,
                    AlignItems::Baseline => {
                        if item.is_baseline {
                            line.cross_start + line.max_baseline - item.baseline + start_margin
                        } else if is_wrap_reverse {
                            line.cross_start + line.cross_size - item.cross_size - end_margin
                        } else {
                            line.cross_start + start_margin
                        }
                    }
                    AlignItems::Stretch => {
                        if is_wrap_reverse {
                            line.cross_start + line.cross_size - item.cross_size - end_margin
                        } else {
                            line.cross_start + start_margin
                        }
                    }
                    // L3 keywords were collapsed by `resolve`
                    _ => line.cross_start + start_margin,
                }
            };

            if safety == AlignSafety::Safe {
                pos = pos
                    .min(line.cross_start + line.cross_size - item.cross_size)
                    .max(line.cross_start);
            }
            item.cross_pos = pos;
        }
    }

    // final pass: place normal-flow children and recurse
    let content_w = Defined(content.width);
    let content_h = Defined(content.height);
    for item in &mut items {
        let (width, height) = item_box(item, is_row);
        let (mut x, mut y) = if is_row {
            (item.main_pos, item.cross_pos)
        } else {
            (item.cross_pos, item.main_pos)
        };

        let child_style = item.node.borrow().style.clone();
        if child_style.position_type == PositionType::Relative {
            let (dx, dy) = relative_offset(&child_style, content_w, content_h);
            x += dx;
            y += dy;
        }

        let child_definite = Size {
            width: if is_row { true } else { item.cross_prop_definite || item.cross_stretched },
            height: if is_row { item.cross_prop_definite || item.cross_stretched } else { true },
        };
        layout_box(
            &item.node,
            x,
            y,
            width,
            height,
            child_definite,
            axes.direction,
            Size { width: inline_basis, height: content_h },
        );
    }

    // container baselines: first line's first baseline, last line's last
    if is_row {
        let line_baseline = |line: &LineBox| -> Option<f32> {
            if line.has_baseline_items {
                return Some(line.cross_start + line.max_baseline);
            }
            let &first = line.items.first()?;
            let item = &items[first];
            let (w, h) = item_box(item, is_row);
            Some(item.cross_pos + item_baseline(&item.node, w, h))
        };
        let first = lines.first().and_then(&line_baseline);
        let last = lines.last().and_then(&line_baseline);
        let mut inner = node.borrow_mut();
        inner.layout.first_baseline = first;
        inner.layout.last_baseline = last;
    }

    // absolutely positioned children, in document order
    for child in &children {
        let is_absolute = {
            let inner = child.borrow();
            inner.style.display != Display::None
                && inner.style.position_type == PositionType::Absolute
        };
        if is_absolute {
            layout_absolute_child(child, &style, pb, content, axes.direction);
        }
    }

    // display:none subtrees collapse to zero
    for child in &children {
        let hidden = child.borrow().style.display == Display::None;
        if hidden {
            hidden_layout(child);
        }
    }
}

/// Absolute positioning: sizes from properties or opposing insets,
/// static-position fallback from `justify-self`/`align-self`,
/// everything resolved against the content box.
fn layout_absolute_child(
    child: &NodeRef,
    container: &Style,
    pb: Rect<f32>,
    content: Size<f32>,
    inherited_direction: Direction,
) {
    let style = child.borrow().style.clone();
    let cb_w = Defined(content.width);
    let cb_h = Defined(content.height);

    let left = style.position.left.resolve(cb_w);
    let right = style.position.right.resolve(cb_w);
    let top = style.position.top.resolve(cb_h);
    let bottom = style.position.bottom.resolve(cb_h);
    let margin = style.margin.map(|d| d.numeric(cb_w));

    let mut width = style.size.width.resolve(cb_w);
    let mut height = style.size.height.resolve(cb_h);
    if let Defined(ratio) = style.aspect_ratio {
        match (width, height) {
            (Defined(w), Undefined) => height = Defined(w / ratio),
            (Undefined, Defined(h)) => width = Defined(h * ratio),
            _ => {}
        }
    }
    if width.is_undefined() {
        if let (Defined(l), Defined(r)) = (left, right) {
            width = Defined(content.width - l - r - margin.horizontal());
        }
    }
    if height.is_undefined() {
        if let (Defined(t), Defined(b)) = (top, bottom) {
            height = Defined(content.height - t - b - margin.vertical());
        }
    }
    if width.is_undefined() || height.is_undefined() {
        let measured = intrinsic_size(child, content);
        width = width.or_else(Defined(measured.width));
        height = height.or_else(Defined(measured.height));
    }

    let width = clamp(
        width.or_zero(),
        style.min_size.width.resolve(cb_w),
        style.max_size.width.resolve(cb_w),
    );
    let height = clamp(
        height.or_zero(),
        style.min_size.height.resolve(cb_h),
        style.max_size.height.resolve(cb_h),
    );

    let content_left = pb.left;
    let content_top = pb.top;

    let x = if let Defined(l) = left {
        content_left + l + margin.left
    } else if let Defined(r) = right {
        content_left + content.width - width - r - margin.right
    } else {
        let justify = match style.justify_self {
            JustifySelf::Auto => container.justify_items,
            JustifySelf::Start | JustifySelf::Stretch => JustifyItems::Start,
            JustifySelf::Center => JustifyItems::Center,
            JustifySelf::End => JustifyItems::End,
        };
        match justify {
            JustifyItems::Start | JustifyItems::Stretch => content_left + margin.left,
            JustifyItems::Center => content_left + (content.width - width) / 2.0,
            JustifyItems::End => content_left + content.width - width - margin.right,
        }
    };

    let y = if let Defined(t) = top {
        content_top + t + margin.top
    } else if let Defined(b) = bottom {
        content_top + content.height - height - b - margin.bottom
    } else {
        match style.align_self.resolve(container.align_items) {
            AlignItems::FlexEnd => content_top + content.height - height - margin.bottom,
            AlignItems::Center => content_top + (content.height - height) / 2.0,
            // stretch and baseline degrade to the start edge
            _ => content_top + margin.top,
        }
    };

    layout_box(
        child,
        x,
        y,
        width,
        height,
        Size { width: true, height: true },
        inherited_direction,
        Size { width: cb_w, height: cb_h },
    );
}

/// Intrinsic (content-based) sizing, memoised per node. Containers
/// aggregate their children: `nowrap` sums the main axis and maxes the
/// cross axis, wrapping containers use the inverse as a deliberate
/// over-approximation resolved by the real line partition later.
pub(crate) fn intrinsic_size(node: &NodeRef, available: Size<f32>) -> Size<f32> {
    {
        let inner = node.borrow();
        if inner.intrinsic.is_valid() {
            return inner.intrinsic.size;
        }
    }

    let (style, children, has_measure) = {
        let inner = node.borrow();
        (inner.style.clone(), inner.children.clone(), inner.measure.is_some())
    };

    let padding = style.padding.map(|d| d.numeric(Undefined));
    let border = style.border.map(|d| d.numeric(Undefined));
    let pb_w = padding.horizontal() + border.horizontal();
    let pb_h = padding.vertical() + border.vertical();

    let content = if has_measure {
        let measured = {
            let inner = node.borrow();
            match inner.measure.as_ref() {
                Some(measure) => measure(available),
                None => Size::ZERO,
            }
        };
        sanitize_measured(measured)
    } else if !children.is_empty() {
        let axes = style.flow_axes(Direction::Ltr);
        let is_row = axes.main_is_row;
        let main_gap = style.main_gap(is_row).numeric(Undefined);
        let cross_gap = style.cross_gap(is_row).numeric(Undefined);

        let mut main_sum = 0.0_f32;
        let mut main_max = 0.0_f32;
        let mut cross_sum = 0.0_f32;
        let mut cross_max = 0.0_f32;
        let mut counted = 0usize;
        for child in &children {
            let skip = {
                let inner = child.borrow();
                inner.style.display == Display::None
                    || inner.style.position_type == PositionType::Absolute
            };
            if skip {
                continue;
            }
            let child_style = child.borrow().style.clone();
            let measured = intrinsic_size(child, available);
            let margin = child_style.margin.map(|d| d.numeric(Undefined));
            let outer = |axis_size: Dimension, fallback: f32, min: Dimension, max: Dimension| {
                let size = axis_size.resolve(Undefined).or_else(fallback);
                clamp(size, min.resolve(Undefined), max.resolve(Undefined))
            };
            let w = outer(
                child_style.size.width,
                measured.width,
                child_style.min_size.width,
                child_style.max_size.width,
            ) + margin.horizontal();
            let h = outer(
                child_style.size.height,
                measured.height,
                child_style.min_size.height,
                child_style.max_size.height,
            ) + margin.vertical();
            let (main, cross) = if is_row { (w, h) } else { (h, w) };
            main_sum += main;
            main_max = main_max.max(main);
            cross_sum += cross;
            cross_max = cross_max.max(cross);
            counted += 1;
        }
        let gaps = main_gap * counted.saturating_sub(1) as f32;
        let line_gaps = cross_gap * counted.saturating_sub(1) as f32;
        let (main, cross) = if style.flex_wrap == FlexWrap::NoWrap {
            (main_sum + gaps, cross_max)
        } else {
            (main_max, cross_sum + line_gaps)
        };
        if is_row {
            Size { width: main, height: cross }
        } else {
            Size { width: cross, height: main }
        }
    } else {
        Size::ZERO
    };

    let result = Size {
        width: (content.width + pb_w).max(0.0),
        height: (content.height + pb_h).max(0.0),
    };

    let mut inner = node.borrow_mut();
    inner.intrinsic.size = result;
    inner.intrinsic.has_width = true;
    inner.intrinsic.has_height = true;
    result
}

/// Measure callbacks must return finite, non-negative sizes; anything
/// else is clamped (and logged, since it usually means a broken callback).
fn sanitize_measured(measured: Size<f32>) -> Size<f32> {
    let fix = |v: f32| {
        if v.is_finite() {
            v.max(0.0)
        } else {
            0.0
        }
    };
    let fixed = Size { width: fix(measured.width), height: fix(measured.height) };
    if fixed != measured {
        log::warn!(
            "flexlayout: measure callback returned {:?}, clamped to {:?}",
            measured,
            fixed
        );
    }
    fixed
}

/// Baseline of one box, from the top of its border box: the baseline
/// callback when present (clamped into `[0, height]`), else the bottom
/// of the content box. The result lands in the node's baseline cache.
fn item_baseline(node: &NodeRef, width: f32, height: f32) -> f32 {
    let baseline = {
        let inner = node.borrow();
        match inner.baseline_fn.as_ref() {
            Some(callback) => {
                let raw = callback(width, height);
                let clamped = if raw.is_finite() { raw.clamp(0.0, height) } else { height };
                if clamped != raw {
                    log::warn!(
                        "flexlayout: baseline callback returned {}, clamped to {}",
                        raw,
                        clamped
                    );
                }
                clamped
            }
            None => default_baseline(&inner.style, height),
        }
    };
    let mut inner = node.borrow_mut();
    inner.baseline_cache.value = baseline;
    inner.baseline_cache.has = true;
    baseline
}

/// The fallback baseline: the bottom edge of the content box.
pub(crate) fn default_baseline(style: &Style, height: f32) -> f32 {
    let below = style.padding.bottom.numeric(Undefined) + style.border.bottom.numeric(Undefined);
    (height - below).clamp(0.0, height.max(0.0))
}

/// Post-positioning offset for `position: relative` boxes: `top` wins
/// over `bottom`, `left` over `right`; the box keeps its reserved space.
fn relative_offset(style: &Style, basis_w: Number, basis_h: Number) -> (f32, f32) {
    if style.position_type != PositionType::Relative {
        return (0.0, 0.0);
    }
    let x = match style.position.left.resolve(basis_w) {
        Defined(l) => l,
        Undefined => -style.position.right.numeric(basis_w),
    };
    let y = match style.position.top.resolve(basis_h) {
        Defined(t) => t,
        Undefined => -style.position.bottom.numeric(basis_h),
    };
    (x, y)
}

/// Zeroes the layout of a `display: none` subtree and marks it clean.
fn hidden_layout(node: &NodeRef) {
    let children = {
        let mut inner = node.borrow_mut();
        let direction = inner.layout.direction;
        inner.layout = crate::node::Layout { direction, ..Default::default() };
        inner.is_dirty = false;
        inner.last_constraint = None;
        inner.children.clone()
    };
    for child in &children {
        hidden_layout(child);
    }
}

fn item_box(item: &FlexItem, is_row: bool) -> (f32, f32) {
    if is_row {
        (item.target_main, item.cross_size)
    } else {
        (item.cross_size, item.target_main)
    }
}

/// min/max clamp with the CSS priority (min wins over max), floored at
/// zero.
fn clamp(value: f32, min: Number, max: Number) -> f32 {
    value.maybe_min(max).maybe_max(min).max(0.0)
}
