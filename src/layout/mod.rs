//! Anchor-based layout
//!
//! A [`LayoutTree`] holds views and layout guides. [`AnchorBuilder`] records
//! relationships between their anchors and activates them in one batch; a
//! layout pass then solves every frame with the Cassowary algorithm.

pub mod anchor;
pub mod builder;
pub mod config;
pub mod constraint;
pub mod error;
pub mod solver;
pub mod tree;
pub mod types;

pub use anchor::{
    Anchor, AnchorParseError, AnchorRef, Anchored, Attribute, AttributeAxis, DimensionAnchor,
    Horizontal, Relation, Vertical, XAxisAnchor, YAxisAnchor,
};
pub use builder::AnchorBuilder;
pub use config::LayoutConfig;
pub use constraint::{ConstraintId, LayoutConstraint};
pub use error::{LayoutError, SolverError};
pub use tree::LayoutTree;
pub use types::*;
