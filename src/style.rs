use crate::geometry::{Rect, Size};
use crate::number::Number;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FlexDirection {
    Row,
    RowReverse,
    Column,
    ColumnReverse,
}

impl Default for FlexDirection {
    fn default() -> FlexDirection {
        FlexDirection::Row
    }
}

impl FlexDirection {
    pub(crate) fn is_row(self) -> bool {
        self == FlexDirection::Row || self == FlexDirection::RowReverse
    }

    pub(crate) fn is_reverse(self) -> bool {
        self == FlexDirection::RowReverse || self == FlexDirection::ColumnReverse
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FlexWrap {
    NoWrap,
    Wrap,
    WrapReverse,
}

impl Default for FlexWrap {
    fn default() -> FlexWrap {
        FlexWrap::NoWrap
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Display {
    Flex,
    None,
}

impl Default for Display {
    fn default() -> Display {
        Display::Flex
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PositionType {
    Static,
    Relative,
    Absolute,
}

impl Default for PositionType {
    fn default() -> PositionType {
        PositionType::Static
    }
}

/// Inline-axis direction. `Inherit` resolves to the parent's used
/// direction during layout, LTR at the root.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    Inherit,
    Ltr,
    Rtl,
}

impl Default for Direction {
    fn default() -> Direction {
        Direction::Inherit
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WritingMode {
    HorizontalTb,
    VerticalRl,
    VerticalLr,
}

impl Default for WritingMode {
    fn default() -> WritingMode {
        WritingMode::HorizontalTb
    }
}

impl WritingMode {
    pub(crate) fn is_vertical(self) -> bool {
        self != WritingMode::HorizontalTb
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum JustifyContent {
    FlexStart,
    FlexEnd,
    Center,
    SpaceBetween,
    SpaceAround,
    SpaceEvenly,
    // Box Alignment L3 keywords, resolved before positioning
    Start,
    End,
    Normal,
    Left,
    Right,
}

impl Default for JustifyContent {
    fn default() -> JustifyContent {
        JustifyContent::FlexStart
    }
}

impl JustifyContent {
    /// Collapses the L3 keywords onto the flex keywords. `left`/`right`
    /// are physical and only meaningful when the main axis is the
    /// inline axis.
    pub(crate) fn resolve(self, axes: FlowAxes) -> JustifyContent {
        use self::JustifyContent::*;
        match self {
            Start | Normal => FlexStart,
            End => FlexEnd,
            Left => {
                if axes.main_is_row && axes.direction == Direction::Rtl {
                    FlexEnd
                } else {
                    FlexStart
                }
            }
            Right => {
                if axes.main_is_row && axes.direction == Direction::Rtl {
                    FlexStart
                } else if axes.main_is_row {
                    FlexEnd
                } else {
                    FlexStart
                }
            }
            other => other,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AlignItems {
    FlexStart,
    FlexEnd,
    Center,
    Baseline,
    Stretch,
    Start,
    End,
    SelfStart,
    SelfEnd,
    Normal,
}

impl Default for AlignItems {
    fn default() -> AlignItems {
        AlignItems::Stretch
    }
}

impl AlignItems {
    pub(crate) fn resolve(self) -> AlignItems {
        use self::AlignItems::*;
        match self {
            Start | SelfStart => FlexStart,
            End | SelfEnd => FlexEnd,
            Normal => Stretch,
            other => other,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AlignSelf {
    Auto,
    FlexStart,
    FlexEnd,
    Center,
    Baseline,
    Stretch,
    Start,
    End,
    SelfStart,
    SelfEnd,
    Normal,
}

impl Default for AlignSelf {
    fn default() -> AlignSelf {
        AlignSelf::Auto
    }
}

impl AlignSelf {
    /// The effective per-item alignment: `auto` falls back to the
    /// container's `align_items`, then L3 keywords collapse onto the
    /// flex keywords.
    pub(crate) fn resolve(self, container_align_items: AlignItems) -> AlignItems {
        use self::AlignSelf::*;
        match self {
            Auto => container_align_items.resolve(),
            FlexStart | Start | SelfStart => AlignItems::FlexStart,
            FlexEnd | End | SelfEnd => AlignItems::FlexEnd,
            Center => AlignItems::Center,
            Baseline => AlignItems::Baseline,
            Stretch | Normal => AlignItems::Stretch,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AlignContent {
    FlexStart,
    FlexEnd,
    Center,
    Stretch,
    SpaceBetween,
    SpaceAround,
    SpaceEvenly,
    Start,
    End,
    Normal,
}

impl Default for AlignContent {
    fn default() -> AlignContent {
        AlignContent::Stretch
    }
}

impl AlignContent {
    /// Collapses L3 keywords, then swaps the start/end pair for
    /// `wrap-reverse` so lines still pack toward the visually reversed
    /// edge.
    pub(crate) fn resolve(self, wrap_reverse: bool) -> AlignContent {
        use self::AlignContent::*;
        let flex = match self {
            Start => FlexStart,
            End => FlexEnd,
            Normal => Stretch,
            other => other,
        };
        if wrap_reverse {
            match flex {
                FlexStart => FlexEnd,
                FlexEnd => FlexStart,
                other => other,
            }
        } else {
            flex
        }
    }
}

/// Static-position fallback for absolutely positioned children without
/// inline-axis insets.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum JustifyItems {
    Start,
    Center,
    End,
    Stretch,
}

impl Default for JustifyItems {
    fn default() -> JustifyItems {
        JustifyItems::Start
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum JustifySelf {
    Auto,
    Start,
    Center,
    End,
    Stretch,
}

impl Default for JustifySelf {
    fn default() -> JustifySelf {
        JustifySelf::Auto
    }
}

/// Overflow handling for alignments that would push an item outside its
/// line: `safe` clamps the start edge back into the line, `unsafe`
/// (the CSS initial behaviour) lets it overflow.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AlignSafety {
    Unsafe,
    Safe,
}

impl Default for AlignSafety {
    fn default() -> AlignSafety {
        AlignSafety::Unsafe
    }
}

/// Side selector for the margin/padding/border/inset setters.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Edge {
    Left,
    Top,
    Right,
    Bottom,
    All,
}

/// A typed length.
///
/// `resolve` implements unit resolution against a basis: points are
/// always definite, percentages only against a definite, non-negative
/// basis, everything else is indefinite.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Dimension {
    Undefined,
    Auto,
    /// Size to the measured content; valid for `flex_basis` only.
    Content,
    Points(f32),
    Percent(f32),
}

impl Default for Dimension {
    fn default() -> Dimension {
        Dimension::Undefined
    }
}

impl Dimension {
    pub(crate) fn resolve(self, basis: Number) -> Number {
        match self {
            Dimension::Points(points) => Number::Defined(points),
            Dimension::Percent(percent) => match basis {
                Number::Defined(b) if b.is_finite() && b >= 0.0 => {
                    Number::Defined(percent / 100.0 * b)
                }
                _ => Number::Undefined,
            },
            _ => Number::Undefined,
        }
    }

    /// Resolution that treats an indefinite result as zero.
    pub(crate) fn numeric(self, basis: Number) -> f32 {
        use crate::number::OrElse;
        self.resolve(basis).or_else(0.0)
    }

    pub(crate) fn is_defined(self) -> bool {
        matches!(self, Dimension::Points(_) | Dimension::Percent(_))
    }

    pub(crate) fn is_auto(self) -> bool {
        self == Dimension::Auto
    }
}

/// The resolved axis system of a flex container: which physical axis is
/// the main axis, whether it runs against the physical start edge, and
/// the used inline direction.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(crate) struct FlowAxes {
    pub main_is_row: bool,
    pub main_reversed: bool,
    pub direction: Direction,
}

/// The style inputs of one node. Mutations go through the `Node`
/// setters so the dirty machinery sees them; the struct itself is plain
/// data.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Style {
    pub display: Display,
    pub position_type: PositionType,
    pub direction: Direction,
    pub writing_mode: WritingMode,
    pub flex_direction: FlexDirection,
    pub flex_wrap: FlexWrap,
    pub justify_content: JustifyContent,
    pub align_items: AlignItems,
    pub align_self: AlignSelf,
    pub align_content: AlignContent,
    pub justify_items: JustifyItems,
    pub justify_self: JustifySelf,
    pub align_items_safety: AlignSafety,
    pub align_self_safety: AlignSafety,
    pub align_content_safety: AlignSafety,
    pub position: Rect<Dimension>,
    pub margin: Rect<Dimension>,
    pub padding: Rect<Dimension>,
    pub border: Rect<Dimension>,
    pub flex_grow: f32,
    pub flex_shrink: f32,
    pub flex_basis: Dimension,
    pub size: Size<Dimension>,
    pub min_size: Size<Dimension>,
    pub max_size: Size<Dimension>,
    pub row_gap: Dimension,
    pub column_gap: Dimension,
    pub order: i32,
    pub aspect_ratio: Number,
}

impl Default for Style {
    fn default() -> Style {
        Style {
            display: Default::default(),
            position_type: Default::default(),
            direction: Default::default(),
            writing_mode: Default::default(),
            flex_direction: Default::default(),
            flex_wrap: Default::default(),
            justify_content: Default::default(),
            align_items: Default::default(),
            align_self: Default::default(),
            align_content: Default::default(),
            justify_items: Default::default(),
            justify_self: Default::default(),
            align_items_safety: Default::default(),
            align_self_safety: Default::default(),
            align_content_safety: Default::default(),
            position: Default::default(),
            margin: Default::default(),
            padding: Default::default(),
            border: Default::default(),
            flex_grow: 0.0,
            flex_shrink: 1.0,
            flex_basis: Dimension::Auto,
            size: Default::default(),
            min_size: Size { width: Dimension::Auto, height: Dimension::Auto },
            max_size: Default::default(),
            row_gap: Dimension::Points(0.0),
            column_gap: Dimension::Points(0.0),
            order: 0,
            aspect_ratio: Number::Undefined,
        }
    }
}

impl Style {
    /// Resolves `flex_direction` + `writing_mode` + the inherited inline
    /// direction into the container's axis system. In a vertical writing
    /// mode the inline axis is vertical, so `row` flows down the page.
    /// The main axis is reversed for `row-reverse` in LTR, `row` in RTL,
    /// and `column-reverse`.
    pub(crate) fn flow_axes(&self, inherited_direction: Direction) -> FlowAxes {
        let direction = match self.direction {
            Direction::Inherit => inherited_direction,
            used => used,
        };
        let main_is_row = self.flex_direction.is_row() != self.writing_mode.is_vertical();
        let main_reversed = if self.flex_direction.is_row() {
            self.flex_direction.is_reverse() != (direction == Direction::Rtl)
        } else {
            self.flex_direction.is_reverse()
        };
        FlowAxes { main_is_row, main_reversed, direction }
    }

    /// The gap between adjacent items on the main axis.
    pub(crate) fn main_gap(&self, main_is_row: bool) -> Dimension {
        if main_is_row {
            self.column_gap
        } else {
            self.row_gap
        }
    }

    /// The gap between adjacent flex lines.
    pub(crate) fn cross_gap(&self, main_is_row: bool) -> Dimension {
        if main_is_row {
            self.row_gap
        } else {
            self.column_gap
        }
    }

    /// Effective safety for one item: `align_self_safety` wins when the
    /// item aligns itself, otherwise the container's `align_items_safety`.
    pub(crate) fn item_safety(&self, container: &Style) -> AlignSafety {
        if self.align_self == AlignSelf::Auto {
            container.align_items_safety
        } else {
            self.align_self_safety
        }
    }
}
