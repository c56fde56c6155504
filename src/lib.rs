//! Anchorage - fluent anchor constraints over a Cassowary layout tree
//!
//! Views and invisible layout guides live in a [`LayoutTree`]. An
//! [`AnchorBuilder`] records edge, center and dimension relationships for one
//! of them, and [`AnchorBuilder::activate`] turns the relationships of any
//! number of builders on in a single batch.
//!
//! # Example
//!
//! ```rust
//! use anchorage::layout::{AnchorBuilder, Anchored, Frame, LayoutTree, Relation};
//!
//! let mut tree = LayoutTree::new(Frame::new(0.0, 0.0, 375.0, 667.0));
//! let root = tree.root();
//! let button = tree.add_view(root, Frame::zero()).unwrap();
//!
//! let mut anchors = tree.anchor(button).unwrap();
//! anchors
//!     .center_x(root.center_x_anchor())
//!     .bottom_with(root.bottom_anchor(), 24.0, Relation::Equal)
//!     .width(120.0)
//!     .height(44.0);
//!
//! AnchorBuilder::activate(&mut tree, [&anchors]).unwrap();
//! tree.layout().unwrap();
//!
//! let frame = tree.frame(button).unwrap();
//! assert!((frame.bottom() - 643.0).abs() < 1e-6);
//! ```
//!
//! Scenes can also be described in TOML and laid out in one call, see
//! [`layout_scene`].

pub mod error;
pub mod layout;
pub mod scene;

pub use error::SceneError;
pub use layout::{AnchorBuilder, LayoutConfig, LayoutError, LayoutTree};
pub use scene::{Scene, SceneLayout};

/// Lay out a TOML scene with default configuration
///
/// Returns one `name x y width height` line per named element.
///
/// # Example
///
/// ```rust
/// use anchorage::layout_scene;
///
/// let output = layout_scene(r#"
///     [root]
///     width = 200
///     height = 100
///
///     [[views]]
///     name = "box"
///
///     [[anchors]]
///     item = "box"
///     rules = [
///         { edge = "center_x", to = "root.center_x" },
///         { edge = "center_y", to = "root.center_y" },
///         { edge = "width", constant = 50 },
///         { edge = "height", constant = 20 },
///     ]
/// "#).unwrap();
///
/// assert!(output.contains("box 75.0 40.0 50.0 20.0"));
/// ```
pub fn layout_scene(source: &str) -> Result<String, SceneError> {
    layout_scene_with_config(source, &LayoutConfig::default())
}

/// Lay out a TOML scene with custom configuration
pub fn layout_scene_with_config(source: &str, config: &LayoutConfig) -> Result<String, SceneError> {
    let scene = Scene::from_str(source)?;
    let layout = scene.build(config)?;
    Ok(layout.render(config.precision))
}
