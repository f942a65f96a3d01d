//! A CSS flexbox layout solver.
//!
//! Given a tree of styled boxes and a viewport size, computes the final
//! position and size of every box per CSS Flexible Box Layout Level 1,
//! with the commonly-used parts of Box Alignment Level 3, aspect-ratio
//! and automatic-minimum sizing, and writing-mode awareness.
//!
//! The engine neither renders nor shapes text: leaf content sizes
//! arrive through a caller-supplied measure callback, and styles are
//! set through typed setters (or CSS-style string pairs).
//!
//! ```
//! use flexlayout::{Dimension, Edge, JustifyContent, Node, Number};
//!
//! let root = Node::new();
//! root.set_width(Dimension::Points(300.0));
//! root.set_height(Dimension::Points(200.0));
//! root.set_padding(Edge::All, Dimension::Points(10.0));
//! root.set_justify_content(JustifyContent::SpaceBetween);
//!
//! for _ in 0..3 {
//!     let child = Node::new();
//!     child.set_width(Dimension::Points(40.0));
//!     child.set_height(Dimension::Points(40.0));
//!     root.append_child(&child).unwrap();
//! }
//!
//! root.calculate_layout(Number::Defined(300.0), Number::Defined(200.0));
//! assert_eq!(root.child(1).unwrap().layout_left(), 130.0);
//! ```

mod algo;
mod error;
mod geometry;
mod node;
mod number;
mod parse;
mod style;

pub use error::Error;
pub use geometry::{Rect, Size};
pub use node::{BaselineFunc, Layout, MeasureFunc, Node};
pub use number::{MinMax, Number, OrElse, ToNumber};
pub use style::{
    AlignContent, AlignItems, AlignSafety, AlignSelf, Dimension, Direction, Display, Edge,
    FlexDirection, FlexWrap, JustifyContent, JustifyItems, JustifySelf, PositionType, Style,
    WritingMode,
};
