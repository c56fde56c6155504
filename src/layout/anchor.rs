//! Axis-typed anchors and the relationships they produce
//!
//! An anchor names one edge, center line or dimension of an [`Item`]. Anchors are
//! typed by axis so that a horizontal anchor can only be related to another
//! horizontal anchor, a vertical one to a vertical one, and dimensions to
//! dimensions or constants. Mixing axes is a compile error rather than a
//! runtime check.

use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

use super::constraint::LayoutConstraint;
use super::types::{GuideId, Item, ViewId};

/// Errors from parsing anchor names and relation kinds
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnchorParseError {
    #[error("unknown relation '{0}' (expected ==, >= or <=)")]
    UnknownRelation(String),

    #[error("unknown anchor attribute '{0}'")]
    UnknownAttribute(String),
}

/// Which axis an attribute measures along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeAxis {
    Horizontal,
    Vertical,
    Dimension,
}

impl fmt::Display for AttributeAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AttributeAxis::Horizontal => "horizontal",
            AttributeAxis::Vertical => "vertical",
            AttributeAxis::Dimension => "dimension",
        };
        f.write_str(name)
    }
}

/// An anchorable attribute of an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    Left,
    Right,
    Top,
    Bottom,
    CenterX,
    CenterY,
    Width,
    Height,
}

impl Attribute {
    pub const ALL: [Attribute; 8] = [
        Attribute::Left,
        Attribute::Right,
        Attribute::Top,
        Attribute::Bottom,
        Attribute::CenterX,
        Attribute::CenterY,
        Attribute::Width,
        Attribute::Height,
    ];

    pub fn axis(&self) -> AttributeAxis {
        match self {
            Attribute::Left | Attribute::Right | Attribute::CenterX => AttributeAxis::Horizontal,
            Attribute::Top | Attribute::Bottom | Attribute::CenterY => AttributeAxis::Vertical,
            Attribute::Width | Attribute::Height => AttributeAxis::Dimension,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Attribute::Left => "left",
            Attribute::Right => "right",
            Attribute::Top => "top",
            Attribute::Bottom => "bottom",
            Attribute::CenterX => "center_x",
            Attribute::CenterY => "center_y",
            Attribute::Width => "width",
            Attribute::Height => "height",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Attribute {
    type Err = AnchorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Attribute::ALL
            .into_iter()
            .find(|attr| attr.name() == s)
            .ok_or_else(|| AnchorParseError::UnknownAttribute(s.to_string()))
    }
}

/// How the two sides of a relationship compare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    #[default]
    #[serde(alias = "==", alias = "eq")]
    Equal,
    #[serde(alias = ">=", alias = "ge")]
    GreaterOrEqual,
    #[serde(alias = "<=", alias = "le")]
    LessOrEqual,
}

impl Relation {
    pub fn symbol(&self) -> &'static str {
        match self {
            Relation::Equal => "==",
            Relation::GreaterOrEqual => ">=",
            Relation::LessOrEqual => "<=",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Relation {
    type Err = AnchorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "==" | "eq" | "equal" => Ok(Relation::Equal),
            ">=" | "ge" | "greater_or_equal" => Ok(Relation::GreaterOrEqual),
            "<=" | "le" | "less_or_equal" => Ok(Relation::LessOrEqual),
            other => Err(AnchorParseError::UnknownRelation(other.to_string())),
        }
    }
}

/// An untyped reference to one attribute of one item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnchorRef {
    pub item: Item,
    pub attribute: Attribute,
}

impl AnchorRef {
    pub fn new(item: impl Into<Item>, attribute: Attribute) -> Self {
        Self {
            item: item.into(),
            attribute,
        }
    }

    /// Narrow to a horizontal anchor, if the attribute is horizontal
    pub fn horizontal(self) -> Option<XAxisAnchor> {
        Anchor::narrow(self)
    }

    /// Narrow to a vertical anchor, if the attribute is vertical
    pub fn vertical(self) -> Option<YAxisAnchor> {
        Anchor::narrow(self)
    }

    /// Narrow to a dimension anchor, if the attribute is a width or height
    pub fn dimension(self) -> Option<DimensionAnchor> {
        (self.attribute.axis() == AttributeAxis::Dimension).then_some(DimensionAnchor(self))
    }
}

impl fmt::Display for AnchorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.item, self.attribute)
    }
}

mod private {
    pub trait Sealed {}
}

/// Marker trait for the two positional axes
pub trait Axis: private::Sealed + Copy + fmt::Debug + PartialEq {
    const AXIS: AttributeAxis;
}

/// Marker for anchors along the x axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Horizontal;

/// Marker for anchors along the y axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Vertical;

impl private::Sealed for Horizontal {}
impl private::Sealed for Vertical {}

impl Axis for Horizontal {
    const AXIS: AttributeAxis = AttributeAxis::Horizontal;
}

impl Axis for Vertical {
    const AXIS: AttributeAxis = AttributeAxis::Vertical;
}

/// A positional anchor on a single axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Anchor<A: Axis> {
    inner: AnchorRef,
    axis: PhantomData<A>,
}

/// Left, right and center-x anchors
pub type XAxisAnchor = Anchor<Horizontal>;

/// Top, bottom and center-y anchors
pub type YAxisAnchor = Anchor<Vertical>;

impl<A: Axis> Anchor<A> {
    fn narrow(anchor: AnchorRef) -> Option<Self> {
        (anchor.attribute.axis() == A::AXIS).then_some(Self {
            inner: anchor,
            axis: PhantomData,
        })
    }

    pub(crate) fn new_unchecked(item: Item, attribute: Attribute) -> Self {
        debug_assert_eq!(attribute.axis(), A::AXIS);
        Self {
            inner: AnchorRef::new(item, attribute),
            axis: PhantomData,
        }
    }

    pub fn anchor_ref(&self) -> AnchorRef {
        self.inner
    }

    pub fn item(&self) -> Item {
        self.inner.item
    }

    pub fn attribute(&self) -> Attribute {
        self.inner.attribute
    }

    /// `self == other + constant`
    pub fn equal_to(self, other: Anchor<A>, constant: f64) -> LayoutConstraint {
        self.relate(Relation::Equal, other, constant)
    }

    /// `self >= other + constant`
    pub fn greater_than_or_equal_to(self, other: Anchor<A>, constant: f64) -> LayoutConstraint {
        self.relate(Relation::GreaterOrEqual, other, constant)
    }

    /// `self <= other + constant`
    pub fn less_than_or_equal_to(self, other: Anchor<A>, constant: f64) -> LayoutConstraint {
        self.relate(Relation::LessOrEqual, other, constant)
    }

    fn relate(self, relation: Relation, other: Anchor<A>, constant: f64) -> LayoutConstraint {
        LayoutConstraint::new(self.inner, relation, Some(other.inner), 1.0, constant)
    }
}

impl<A: Axis> fmt::Display for Anchor<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

/// A width or height anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DimensionAnchor(AnchorRef);

impl DimensionAnchor {
    pub(crate) fn new_unchecked(item: Item, attribute: Attribute) -> Self {
        debug_assert_eq!(attribute.axis(), AttributeAxis::Dimension);
        Self(AnchorRef::new(item, attribute))
    }

    pub fn anchor_ref(&self) -> AnchorRef {
        self.0
    }

    pub fn item(&self) -> Item {
        self.0.item
    }

    pub fn attribute(&self) -> Attribute {
        self.0.attribute
    }

    /// `self == other * multiplier + constant`
    pub fn equal_to(self, other: DimensionAnchor, multiplier: f64, constant: f64) -> LayoutConstraint {
        self.relate(Relation::Equal, Some(other), multiplier, constant)
    }

    /// `self >= other * multiplier + constant`
    pub fn greater_than_or_equal_to(
        self,
        other: DimensionAnchor,
        multiplier: f64,
        constant: f64,
    ) -> LayoutConstraint {
        self.relate(Relation::GreaterOrEqual, Some(other), multiplier, constant)
    }

    /// `self <= other * multiplier + constant`
    pub fn less_than_or_equal_to(
        self,
        other: DimensionAnchor,
        multiplier: f64,
        constant: f64,
    ) -> LayoutConstraint {
        self.relate(Relation::LessOrEqual, Some(other), multiplier, constant)
    }

    /// `self == constant`
    pub fn equal_to_constant(self, constant: f64) -> LayoutConstraint {
        self.relate(Relation::Equal, None, 1.0, constant)
    }

    /// `self >= constant`
    pub fn greater_than_or_equal_to_constant(self, constant: f64) -> LayoutConstraint {
        self.relate(Relation::GreaterOrEqual, None, 1.0, constant)
    }

    /// `self <= constant`
    pub fn less_than_or_equal_to_constant(self, constant: f64) -> LayoutConstraint {
        self.relate(Relation::LessOrEqual, None, 1.0, constant)
    }

    fn relate(
        self,
        relation: Relation,
        other: Option<DimensionAnchor>,
        multiplier: f64,
        constant: f64,
    ) -> LayoutConstraint {
        LayoutConstraint::new(self.0, relation, other.map(|d| d.0), multiplier, constant)
    }
}

impl fmt::Display for DimensionAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// The anchor capability set shared by views and layout guides
pub trait Anchored {
    fn item(&self) -> Item;

    fn top_anchor(&self) -> YAxisAnchor {
        Anchor::new_unchecked(self.item(), Attribute::Top)
    }

    fn bottom_anchor(&self) -> YAxisAnchor {
        Anchor::new_unchecked(self.item(), Attribute::Bottom)
    }

    fn center_y_anchor(&self) -> YAxisAnchor {
        Anchor::new_unchecked(self.item(), Attribute::CenterY)
    }

    fn left_anchor(&self) -> XAxisAnchor {
        Anchor::new_unchecked(self.item(), Attribute::Left)
    }

    fn right_anchor(&self) -> XAxisAnchor {
        Anchor::new_unchecked(self.item(), Attribute::Right)
    }

    fn center_x_anchor(&self) -> XAxisAnchor {
        Anchor::new_unchecked(self.item(), Attribute::CenterX)
    }

    fn width_anchor(&self) -> DimensionAnchor {
        DimensionAnchor::new_unchecked(self.item(), Attribute::Width)
    }

    fn height_anchor(&self) -> DimensionAnchor {
        DimensionAnchor::new_unchecked(self.item(), Attribute::Height)
    }
}

impl Anchored for Item {
    fn item(&self) -> Item {
        *self
    }
}

impl Anchored for ViewId {
    fn item(&self) -> Item {
        Item::View(*self)
    }
}

impl Anchored for GuideId {
    fn item(&self) -> Item {
        Item::Guide(*self)
    }
}
