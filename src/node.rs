use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::algo;
use crate::error::Error;
use crate::geometry::{Rect, Size};
use crate::number::Number;
use crate::parse;
use crate::style::*;

/// Measures the content of a leaf node. Receives the available size
/// (`f32::INFINITY` on indefinite axes) and returns the content size.
/// Must not mutate the tree; outputs outside `[0, +inf)` are clamped.
pub type MeasureFunc = Box<dyn Fn(Size<f32>) -> Size<f32>>;

/// Reports the baseline of a node, as a distance from the top of its
/// border box, given its resolved width and height. Outputs are clamped
/// into `[0, height]`.
pub type BaselineFunc = Box<dyn Fn(f32, f32) -> f32>;

/// The computed output of one layout pass, relative to the parent's
/// border box.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Layout {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
    pub first_baseline: Option<f32>,
    pub last_baseline: Option<f32>,
    /// The inline direction this node was laid out with.
    pub direction: Direction,
}

impl Default for Layout {
    fn default() -> Layout {
        Layout {
            left: 0.0,
            top: 0.0,
            width: 0.0,
            height: 0.0,
            first_baseline: None,
            last_baseline: None,
            direction: Direction::Ltr,
        }
    }
}

/// Cached intrinsic (content-based) size. Valid only when both axis
/// bits are set; any dirtying clears the bits.
#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct IntrinsicCache {
    pub size: Size<f32>,
    pub has_width: bool,
    pub has_height: bool,
}

impl IntrinsicCache {
    pub(crate) fn is_valid(&self) -> bool {
        self.has_width && self.has_height
    }

    pub(crate) fn clear(&mut self) {
        self.has_width = false;
        self.has_height = false;
    }
}

#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct BaselineCache {
    pub value: f32,
    pub has: bool,
}

pub(crate) type NodeRef = Rc<RefCell<InternalNode>>;
pub(crate) type WeakNodeRef = Weak<RefCell<InternalNode>>;

pub(crate) struct InternalNode {
    pub style: Style,
    pub parent: WeakNodeRef,
    pub children: Vec<NodeRef>,
    pub measure: Option<MeasureFunc>,
    pub baseline_fn: Option<BaselineFunc>,
    pub layout: Layout,
    pub intrinsic: IntrinsicCache,
    pub baseline_cache: BaselineCache,
    pub is_dirty: bool,
    pub suspend_dirty: bool,
    /// The parent size the node was last resolved against, recorded so
    /// a clean re-layout with the same constraint can return early.
    pub last_constraint: Option<Size<Number>>,
}

impl InternalNode {
    fn with_style(style: Style) -> InternalNode {
        InternalNode {
            style,
            parent: Weak::new(),
            children: Vec::new(),
            measure: None,
            baseline_fn: None,
            layout: Layout::default(),
            intrinsic: IntrinsicCache::default(),
            baseline_cache: BaselineCache::default(),
            is_dirty: true,
            suspend_dirty: false,
            last_constraint: None,
        }
    }
}

/// Marks a node dirty and propagates to the root. Clears the intrinsic
/// and baseline caches on every node the walk touches; an already-dirty
/// node stops the walk because everything above it is dirty too.
pub(crate) fn mark_dirty(node: &NodeRef) {
    let parent = {
        let mut inner = node.borrow_mut();
        inner.intrinsic.clear();
        inner.baseline_cache = BaselineCache::default();
        inner.layout.first_baseline = None;
        inner.layout.last_baseline = None;
        if inner.is_dirty {
            return;
        }
        inner.is_dirty = true;
        inner.parent.upgrade()
    };
    if let Some(parent) = parent {
        mark_dirty(&parent);
    }
}

/// Invalidates the intrinsic-size caches up the ancestor chain without
/// toggling the dirty flag. Used when a measure callback changes: the
/// cached content sizes are stale, but an already-sized parent need not
/// relayout.
pub(crate) fn invalidate_intrinsic(node: &NodeRef) {
    let parent = {
        let mut inner = node.borrow_mut();
        inner.intrinsic.clear();
        inner.parent.upgrade()
    };
    if let Some(parent) = parent {
        invalidate_intrinsic(&parent);
    }
}

pub(crate) fn invalidate_baseline(node: &NodeRef) {
    let parent = {
        let mut inner = node.borrow_mut();
        inner.baseline_cache = BaselineCache::default();
        inner.parent.upgrade()
    };
    if let Some(parent) = parent {
        invalidate_baseline(&parent);
    }
}

macro_rules! style_setter {
    ($(#[$doc:meta])* $set:ident, $field:ident, $ty:ty) => {
        $(#[$doc])*
        pub fn $set(&self, value: $ty) {
            self.update_style(|style| {
                if style.$field == value {
                    false
                } else {
                    style.$field = value;
                    true
                }
            });
        }
    };
}

macro_rules! edge_setter {
    ($(#[$doc:meta])* $set:ident, $field:ident) => {
        $(#[$doc])*
        pub fn $set(&self, edge: Edge, value: Dimension) {
            self.update_style(|style| set_edge(&mut style.$field, edge, value));
        }
    };
}

fn set_edge(rect: &mut Rect<Dimension>, edge: Edge, value: Dimension) -> bool {
    let apply = |slot: &mut Dimension| {
        if *slot == value {
            false
        } else {
            *slot = value;
            true
        }
    };
    match edge {
        Edge::Left => apply(&mut rect.left),
        Edge::Top => apply(&mut rect.top),
        Edge::Right => apply(&mut rect.right),
        Edge::Bottom => apply(&mut rect.bottom),
        Edge::All => {
            // non-short-circuiting: all four sides must be written
            let l = apply(&mut rect.left);
            let t = apply(&mut rect.top);
            let r = apply(&mut rect.right);
            let b = apply(&mut rect.bottom);
            l | t | r | b
        }
    }
}

/// A handle to one box in the layout tree.
///
/// `Node` is a cheap clone (reference-counted); the node owns its
/// children and holds a non-owning back-reference to its parent. All
/// mutation goes through the setters so the dirty machinery sees it.
#[derive(Clone)]
pub struct Node {
    inner: NodeRef,
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node").field("inner", &(Rc::as_ptr(&self.inner) as usize)).finish()
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Node) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Default for Node {
    fn default() -> Node {
        Node::new()
    }
}

impl Node {
    pub fn new() -> Node {
        Node::with_style(Style::default())
    }

    pub fn with_style(style: Style) -> Node {
        Node { inner: Rc::new(RefCell::new(InternalNode::with_style(style))) }
    }

    /// Builds a node from `(key, value)` string pairs. Unknown keys and
    /// unparsable values are skipped; the dirty machinery is bypassed
    /// (a fresh node is dirty regardless).
    pub fn with_properties(properties: &[(&str, &str)]) -> Node {
        let node = Node::new();
        {
            let mut inner = node.inner.borrow_mut();
            inner.suspend_dirty = true;
        }
        for (key, value) in properties {
            let _ = node.set_property(key, value);
        }
        node.inner.borrow_mut().suspend_dirty = false;
        node
    }

    pub(crate) fn from_ref(inner: NodeRef) -> Node {
        Node { inner }
    }

    fn update_style<F>(&self, f: F)
    where
        F: FnOnce(&mut Style) -> bool,
    {
        let (changed, suspended) = {
            let mut inner = self.inner.borrow_mut();
            let changed = f(&mut inner.style);
            (changed, inner.suspend_dirty)
        };
        if changed && !suspended {
            mark_dirty(&self.inner);
        }
    }

    // ---- tree ----------------------------------------------------------

    /// Appends `child`, detaching it from any previous parent first.
    /// Fails with [`Error::TreeMisuse`] when the child is the receiver
    /// or one of its ancestors; neither tree is changed in that case.
    pub fn append_child(&self, child: &Node) -> Result<(), Error> {
        let mut cursor = Some(self.inner.clone());
        while let Some(node) = cursor {
            if Rc::ptr_eq(&node, &child.inner) {
                return Err(Error::TreeMisuse(
                    "appending a node to itself or to one of its descendants",
                ));
            }
            cursor = node.borrow().parent.upgrade();
        }

        if let Some(old_parent) = child.inner.borrow().parent.upgrade() {
            detach(&old_parent, &child.inner);
            mark_dirty(&old_parent);
        }
        {
            child.inner.borrow_mut().parent = Rc::downgrade(&self.inner);
            self.inner.borrow_mut().children.push(child.inner.clone());
        }
        mark_dirty(&self.inner);
        Ok(())
    }

    /// Removes `child` if it is one of the receiver's children.
    /// Returns whether anything was removed.
    pub fn remove_child(&self, child: &Node) -> bool {
        if detach(&self.inner, &child.inner) {
            child.inner.borrow_mut().parent = Weak::new();
            mark_dirty(&self.inner);
            true
        } else {
            false
        }
    }

    pub fn child_count(&self) -> usize {
        self.inner.borrow().children.len()
    }

    /// The `index`-th child in insertion order (`order` does not affect
    /// iteration, only the visual sequence).
    pub fn child(&self, index: usize) -> Option<Node> {
        self.inner.borrow().children.get(index).cloned().map(Node::from_ref)
    }

    pub fn parent(&self) -> Option<Node> {
        self.inner.borrow().parent.upgrade().map(Node::from_ref)
    }

    // ---- typed setters -------------------------------------------------

    style_setter!(set_flex_direction, flex_direction, FlexDirection);
    style_setter!(set_flex_wrap, flex_wrap, FlexWrap);
    style_setter!(set_display, display, Display);
    style_setter!(set_position_type, position_type, PositionType);
    style_setter!(set_direction, direction, Direction);
    style_setter!(set_writing_mode, writing_mode, WritingMode);
    style_setter!(set_justify_content, justify_content, JustifyContent);
    style_setter!(set_align_items, align_items, AlignItems);
    style_setter!(set_align_self, align_self, AlignSelf);
    style_setter!(set_align_content, align_content, AlignContent);
    style_setter!(set_justify_items, justify_items, JustifyItems);
    style_setter!(set_justify_self, justify_self, JustifySelf);
    style_setter!(set_align_items_safety, align_items_safety, AlignSafety);
    style_setter!(set_align_self_safety, align_self_safety, AlignSafety);
    style_setter!(set_align_content_safety, align_content_safety, AlignSafety);
    style_setter!(set_flex_basis, flex_basis, Dimension);
    style_setter!(set_row_gap, row_gap, Dimension);
    style_setter!(set_column_gap, column_gap, Dimension);
    style_setter!(
        /// Rounded to an integer by the string-keyed setter; the typed
        /// setter takes the integer directly.
        set_order, order, i32);

    edge_setter!(set_margin, margin);
    edge_setter!(set_padding, padding);
    edge_setter!(set_border, border);
    edge_setter!(
        /// Inset offsets (`top`/`right`/`bottom`/`left`).
        set_position, position);

    pub fn set_width(&self, value: Dimension) {
        self.update_style(|style| {
            if style.size.width == value {
                false
            } else {
                style.size.width = value;
                true
            }
        });
    }

    pub fn set_height(&self, value: Dimension) {
        self.update_style(|style| {
            if style.size.height == value {
                false
            } else {
                style.size.height = value;
                true
            }
        });
    }

    pub fn set_min_width(&self, value: Dimension) {
        self.update_style(|style| {
            if style.min_size.width == value {
                false
            } else {
                style.min_size.width = value;
                true
            }
        });
    }

    pub fn set_min_height(&self, value: Dimension) {
        self.update_style(|style| {
            if style.min_size.height == value {
                false
            } else {
                style.min_size.height = value;
                true
            }
        });
    }

    pub fn set_max_width(&self, value: Dimension) {
        self.update_style(|style| {
            if style.max_size.width == value {
                false
            } else {
                style.max_size.width = value;
                true
            }
        });
    }

    pub fn set_max_height(&self, value: Dimension) {
        self.update_style(|style| {
            if style.max_size.height == value {
                false
            } else {
                style.max_size.height = value;
                true
            }
        });
    }

    /// Sets both gaps at once (the `gap` shorthand).
    pub fn set_gap(&self, value: Dimension) {
        self.update_style(|style| {
            let changed = style.row_gap != value || style.column_gap != value;
            style.row_gap = value;
            style.column_gap = value;
            changed
        });
    }

    pub fn set_flex_grow(&self, value: f32) -> Result<(), Error> {
        if !value.is_finite() || value < 0.0 {
            return Err(Error::invalid("flex-grow", value.to_string()));
        }
        self.update_style(|style| {
            if style.flex_grow == value {
                false
            } else {
                style.flex_grow = value;
                true
            }
        });
        Ok(())
    }

    pub fn set_flex_shrink(&self, value: f32) -> Result<(), Error> {
        if !value.is_finite() || value < 0.0 {
            return Err(Error::invalid("flex-shrink", value.to_string()));
        }
        self.update_style(|style| {
            if style.flex_shrink == value {
                false
            } else {
                style.flex_shrink = value;
                true
            }
        });
        Ok(())
    }

    /// `None` clears the ratio; a defined ratio must be finite and
    /// positive (width / height).
    pub fn set_aspect_ratio(&self, value: Option<f32>) -> Result<(), Error> {
        let ratio = match value {
            None => Number::Undefined,
            Some(r) if r.is_finite() && r > 0.0 => Number::Defined(r),
            Some(r) => return Err(Error::invalid("aspect-ratio", r.to_string())),
        };
        self.update_style(|style| {
            if style.aspect_ratio == ratio {
                false
            } else {
                style.aspect_ratio = ratio;
                true
            }
        });
        Ok(())
    }

    // ---- callbacks -----------------------------------------------------

    /// Installs (or clears) the content-measurement callback. Only the
    /// intrinsic-size and baseline caches depend on it, so this
    /// invalidates those up the ancestor chain without dirtying.
    pub fn set_measure_func(&self, measure: Option<MeasureFunc>) {
        self.inner.borrow_mut().measure = measure;
        invalidate_intrinsic(&self.inner);
        invalidate_baseline(&self.inner);
    }

    pub fn set_baseline_func(&self, baseline: Option<BaselineFunc>) {
        self.inner.borrow_mut().baseline_fn = baseline;
        invalidate_baseline(&self.inner);
    }

    // ---- string-keyed mutation -----------------------------------------

    /// Sets one property from CSS-style strings. Keys are canonicalised
    /// (`flexDirection` == `flex-direction` == `flex_direction`).
    pub fn set_property(&self, key: &str, value: &str) -> Result<(), Error> {
        match parse::canonical_key(key).as_str() {
            "flexdirection" => self.set_flex_direction(parse::parse_flex_direction(value)?),
            "flexwrap" => self.set_flex_wrap(parse::parse_flex_wrap(value)?),
            "display" => self.set_display(parse::parse_display(value)?),
            "position" | "positiontype" => {
                self.set_position_type(parse::parse_position_type(value)?)
            }
            "direction" => self.set_direction(parse::parse_direction(value)?),
            "writingmode" => self.set_writing_mode(parse::parse_writing_mode(value)?),
            "justifycontent" => self.set_justify_content(parse::parse_justify_content(value)?),
            "alignitems" => self.set_align_items(parse::parse_align_items(value)?),
            "alignself" => self.set_align_self(parse::parse_align_self(value)?),
            "aligncontent" => self.set_align_content(parse::parse_align_content(value)?),
            "justifyitems" => self.set_justify_items(parse::parse_justify_items(value)?),
            "justifyself" => self.set_justify_self(parse::parse_justify_self(value)?),
            "alignitemssafety" => self.set_align_items_safety(parse::parse_align_safety(value)?),
            "alignselfsafety" => self.set_align_self_safety(parse::parse_align_safety(value)?),
            "aligncontentsafety" => {
                self.set_align_content_safety(parse::parse_align_safety(value)?)
            }
            "flexgrow" => self.set_flex_grow(parse::parse_flex_factor("flex-grow", value)?)?,
            "flexshrink" => {
                self.set_flex_shrink(parse::parse_flex_factor("flex-shrink", value)?)?
            }
            "flexbasis" => self.set_flex_basis(parse::parse_flex_basis(value)?),
            "order" => self.set_order(parse::parse_order(value)?),
            "aspectratio" => {
                let ratio = parse::parse_aspect_ratio(value)?;
                self.update_style(|style| {
                    if style.aspect_ratio == ratio {
                        false
                    } else {
                        style.aspect_ratio = ratio;
                        true
                    }
                });
            }
            "width" => self.set_width(parse::parse_dimension("width", value)?),
            "height" => self.set_height(parse::parse_dimension("height", value)?),
            "minwidth" => self.set_min_width(parse::parse_dimension("min-width", value)?),
            "minheight" => self.set_min_height(parse::parse_dimension("min-height", value)?),
            "maxwidth" => self.set_max_width(parse::parse_dimension("max-width", value)?),
            "maxheight" => self.set_max_height(parse::parse_dimension("max-height", value)?),
            "rowgap" => self.set_row_gap(parse::parse_dimension("row-gap", value)?),
            "columngap" => self.set_column_gap(parse::parse_dimension("column-gap", value)?),
            "gap" => self.set_gap(parse::parse_dimension("gap", value)?),
            "margin" => self.set_margin(Edge::All, parse::parse_dimension("margin", value)?),
            "margintop" => self.set_margin(Edge::Top, parse::parse_dimension("margin-top", value)?),
            "marginright" => {
                self.set_margin(Edge::Right, parse::parse_dimension("margin-right", value)?)
            }
            "marginbottom" => {
                self.set_margin(Edge::Bottom, parse::parse_dimension("margin-bottom", value)?)
            }
            "marginleft" => {
                self.set_margin(Edge::Left, parse::parse_dimension("margin-left", value)?)
            }
            "padding" => self.set_padding(Edge::All, parse::parse_dimension("padding", value)?),
            "paddingtop" => {
                self.set_padding(Edge::Top, parse::parse_dimension("padding-top", value)?)
            }
            "paddingright" => {
                self.set_padding(Edge::Right, parse::parse_dimension("padding-right", value)?)
            }
            "paddingbottom" => {
                self.set_padding(Edge::Bottom, parse::parse_dimension("padding-bottom", value)?)
            }
            "paddingleft" => {
                self.set_padding(Edge::Left, parse::parse_dimension("padding-left", value)?)
            }
            "border" => self.set_border(Edge::All, parse::parse_dimension("border", value)?),
            "bordertop" => {
                self.set_border(Edge::Top, parse::parse_dimension("border-top", value)?)
            }
            "borderright" => {
                self.set_border(Edge::Right, parse::parse_dimension("border-right", value)?)
            }
            "borderbottom" => {
                self.set_border(Edge::Bottom, parse::parse_dimension("border-bottom", value)?)
            }
            "borderleft" => {
                self.set_border(Edge::Left, parse::parse_dimension("border-left", value)?)
            }
            "top" => self.set_position(Edge::Top, parse::parse_dimension("top", value)?),
            "right" => self.set_position(Edge::Right, parse::parse_dimension("right", value)?),
            "bottom" => self.set_position(Edge::Bottom, parse::parse_dimension("bottom", value)?),
            "left" => self.set_position(Edge::Left, parse::parse_dimension("left", value)?),
            _ => return Err(Error::UnknownProperty(key.to_string())),
        }
        Ok(())
    }

    /// Applies `(key, value)` pairs in slice order inside one batch, so
    /// dirty propagation runs at most once. Stops at the first error;
    /// earlier keys stay applied.
    pub fn apply_style(&self, properties: &[(&str, &str)]) -> Result<(), Error> {
        let mut result = Ok(());
        self.batch(|node| {
            for (key, value) in properties {
                if let Err(err) = node.set_property(key, value) {
                    result = Err(err);
                    break;
                }
            }
        });
        result
    }

    /// Runs `f` with dirty propagation suspended, then propagates once.
    /// Nested batches propagate only when the outermost one ends.
    pub fn batch<F>(&self, f: F)
    where
        F: FnOnce(&Node),
    {
        let previous = {
            let mut inner = self.inner.borrow_mut();
            std::mem::replace(&mut inner.suspend_dirty, true)
        };
        f(self);
        self.inner.borrow_mut().suspend_dirty = previous;
        if !previous {
            mark_dirty(&self.inner);
        }
    }

    // ---- layout --------------------------------------------------------

    /// Resolves the layout of this node and its whole subtree against
    /// the given parent size. A clean tree with an unchanged constraint
    /// returns immediately.
    pub fn calculate_layout(&self, parent_width: Number, parent_height: Number) {
        let constraint = Size { width: parent_width, height: parent_height };
        {
            let inner = self.inner.borrow();
            if !inner.is_dirty && inner.last_constraint == Some(constraint) {
                return;
            }
        }
        log::trace!("flexlayout: computing layout for constraint {:?}", constraint);
        algo::compute(&self.inner, constraint);
    }

    pub fn mark_dirty(&self) {
        mark_dirty(&self.inner);
    }

    pub fn is_dirty(&self) -> bool {
        self.inner.borrow().is_dirty
    }

    // ---- getters -------------------------------------------------------

    pub fn style(&self) -> Style {
        self.inner.borrow().style.clone()
    }

    pub fn layout(&self) -> Layout {
        self.inner.borrow().layout
    }

    pub fn layout_left(&self) -> f32 {
        self.inner.borrow().layout.left
    }

    pub fn layout_top(&self) -> f32 {
        self.inner.borrow().layout.top
    }

    pub fn layout_width(&self) -> f32 {
        self.inner.borrow().layout.width
    }

    pub fn layout_height(&self) -> f32 {
        self.inner.borrow().layout.height
    }

    /// First baseline of the node's last layout, falling back to the
    /// bottom of its content box when no line produced one.
    pub fn first_baseline(&self) -> f32 {
        let inner = self.inner.borrow();
        inner
            .layout
            .first_baseline
            .unwrap_or_else(|| algo::default_baseline(&inner.style, inner.layout.height))
    }

    pub fn last_baseline(&self) -> f32 {
        let inner = self.inner.borrow();
        inner
            .layout
            .last_baseline
            .unwrap_or_else(|| algo::default_baseline(&inner.style, inner.layout.height))
    }

    pub fn baseline(&self) -> f32 {
        self.first_baseline()
    }
}

/// Removes `child` from `parent`'s child list (identity comparison).
fn detach(parent: &NodeRef, child: &NodeRef) -> bool {
    let mut inner = parent.borrow_mut();
    match inner.children.iter().position(|c| Rc::ptr_eq(c, child)) {
        Some(index) => {
            inner.children.remove(index);
            true
        }
        None => false,
    }
}
