//! Core types for the layout tree

use std::fmt;

/// A 2D point in the coordinate system
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// The rectangle an element occupies, in root coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Frame {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a zero-sized frame at the origin
    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    /// Right edge x-coordinate
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge y-coordinate
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Center point of the frame
    pub fn center(&self) -> Point {
        Point {
            x: self.x + self.width / 2.0,
            y: self.y + self.height / 2.0,
        }
    }

    /// Check whether every edge of `other` lies within this frame (within `tolerance`)
    pub fn contains_frame(&self, other: &Frame, tolerance: f64) -> bool {
        other.x >= self.x - tolerance
            && other.y >= self.y - tolerance
            && other.right() <= self.right() + tolerance
            && other.bottom() <= self.bottom() + tolerance
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::zero()
    }
}

/// Handle to a view in a [`LayoutTree`](super::LayoutTree)
///
/// Handles are never reused, so a handle to a removed view stays invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(pub(crate) u32);

/// Handle to a layout guide in a [`LayoutTree`](super::LayoutTree)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GuideId(pub(crate) u32);

/// Anything that can participate in anchor constraints
///
/// Views render and may translate their frame into implicit constraints;
/// layout guides are invisible rectangles that never do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Item {
    View(ViewId),
    Guide(GuideId),
}

impl Item {
    /// The view handle, if this item is a view
    pub fn as_view(&self) -> Option<ViewId> {
        match self {
            Item::View(id) => Some(*id),
            Item::Guide(_) => None,
        }
    }
}

impl From<ViewId> for Item {
    fn from(id: ViewId) -> Self {
        Item::View(id)
    }
}

impl From<GuideId> for Item {
    fn from(id: GuideId) -> Self {
        Item::Guide(id)
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "view#{}", self.0)
    }
}

impl fmt::Display for GuideId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "guide#{}", self.0)
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Item::View(id) => fmt::Display::fmt(id, f),
            Item::Guide(id) => fmt::Display::fmt(id, f),
        }
    }
}
