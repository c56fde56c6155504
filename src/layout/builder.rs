//! Fluent builder for anchoring one item to others
//!
//! ```rust
//! use anchorage::layout::{AnchorBuilder, Anchored, Frame, LayoutTree, Relation};
//!
//! let mut tree = LayoutTree::new(Frame::new(0.0, 0.0, 320.0, 480.0));
//! let root = tree.root();
//! let header = tree.add_view(root, Frame::zero()).unwrap();
//!
//! let mut anchors = tree.anchor(header).unwrap();
//! anchors
//!     .top_with(root.top_anchor(), 8.0, Relation::Equal)
//!     .left_with(root.left_anchor(), 16.0, Relation::Equal)
//!     .right_with(root.right_anchor(), 16.0, Relation::Equal)
//!     .height(44.0);
//!
//! AnchorBuilder::activate(&mut tree, [&anchors]).unwrap();
//! tree.layout().unwrap();
//!
//! let frame = tree.frame(header).unwrap();
//! assert!((frame.width - 288.0).abs() < 1e-6);
//! ```

use super::anchor::{Anchor, Anchored, Axis, DimensionAnchor, Relation, XAxisAnchor, YAxisAnchor};
use super::constraint::LayoutConstraint;
use super::error::LayoutError;
use super::tree::LayoutTree;
use super::types::{GuideId, Item, ViewId};

/// Collects relationships for a single view or layout guide
///
/// Every edge and dimension method records exactly one relationship, in call
/// order. Nothing is active until [`AnchorBuilder::activate`] hands the
/// recorded relationships to the tree.
///
/// The short forms (`top`, `width_to`, `width`, ...) use no padding, a
/// constant of 0, a multiplier of 1 and [`Relation::Equal`]. The `_with`
/// variants take every parameter.
#[derive(Debug, Clone)]
pub struct AnchorBuilder {
    item: Item,
    constraints: Vec<LayoutConstraint>,
}

impl AnchorBuilder {
    /// Builder for a view
    ///
    /// The view stops translating its frame into implicit constraints, which
    /// would otherwise fight the anchors added here.
    pub fn for_view(tree: &mut LayoutTree, view: ViewId) -> Result<Self, LayoutError> {
        tree.set_translates_frame(view, false)?;
        Ok(Self::new(Item::View(view)))
    }

    /// Builder for a layout guide
    pub fn for_guide(guide: GuideId) -> Self {
        Self::new(Item::Guide(guide))
    }

    /// Builder for any item; views get the same treatment as [`Self::for_view`]
    pub fn for_item(tree: &mut LayoutTree, item: impl Into<Item>) -> Result<Self, LayoutError> {
        match item.into() {
            Item::View(view) => Self::for_view(tree, view),
            Item::Guide(guide) => {
                tree.guide_owner(guide)?;
                Ok(Self::for_guide(guide))
            }
        }
    }

    fn new(item: Item) -> Self {
        Self {
            item,
            constraints: Vec::new(),
        }
    }

    pub fn item(&self) -> Item {
        self.item
    }

    /// Relationships recorded so far, in call order
    pub fn constraints(&self) -> &[LayoutConstraint] {
        &self.constraints
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// `top == anchor`
    pub fn top(&mut self, anchor: YAxisAnchor) -> &mut Self {
        self.top_with(anchor, 0.0, Relation::Equal)
    }

    pub fn top_with(&mut self, anchor: YAxisAnchor, padding: f64, relation: Relation) -> &mut Self {
        self.layout_anchor(self.item.top_anchor(), anchor, relation, padding)
    }

    /// `bottom == anchor`
    pub fn bottom(&mut self, anchor: YAxisAnchor) -> &mut Self {
        self.bottom_with(anchor, 0.0, Relation::Equal)
    }

    /// A positive padding insets the bottom edge above `anchor`
    pub fn bottom_with(&mut self, anchor: YAxisAnchor, padding: f64, relation: Relation) -> &mut Self {
        self.layout_anchor(self.item.bottom_anchor(), anchor, relation, -padding)
    }

    /// `left == anchor`
    pub fn left(&mut self, anchor: XAxisAnchor) -> &mut Self {
        self.left_with(anchor, 0.0, Relation::Equal)
    }

    pub fn left_with(&mut self, anchor: XAxisAnchor, padding: f64, relation: Relation) -> &mut Self {
        self.layout_anchor(self.item.left_anchor(), anchor, relation, padding)
    }

    /// `right == anchor`
    pub fn right(&mut self, anchor: XAxisAnchor) -> &mut Self {
        self.right_with(anchor, 0.0, Relation::Equal)
    }

    /// A positive padding insets the right edge left of `anchor`
    pub fn right_with(&mut self, anchor: XAxisAnchor, padding: f64, relation: Relation) -> &mut Self {
        self.layout_anchor(self.item.right_anchor(), anchor, relation, -padding)
    }

    /// `center_x == anchor`
    pub fn center_x(&mut self, anchor: XAxisAnchor) -> &mut Self {
        self.center_x_with(anchor, 0.0, Relation::Equal)
    }

    pub fn center_x_with(
        &mut self,
        anchor: XAxisAnchor,
        padding: f64,
        relation: Relation,
    ) -> &mut Self {
        self.layout_anchor(self.item.center_x_anchor(), anchor, relation, padding)
    }

    /// `center_y == anchor`
    pub fn center_y(&mut self, anchor: YAxisAnchor) -> &mut Self {
        self.center_y_with(anchor, 0.0, Relation::Equal)
    }

    pub fn center_y_with(
        &mut self,
        anchor: YAxisAnchor,
        padding: f64,
        relation: Relation,
    ) -> &mut Self {
        self.layout_anchor(self.item.center_y_anchor(), anchor, relation, padding)
    }

    /// `width == anchor`
    pub fn width_to(&mut self, anchor: DimensionAnchor) -> &mut Self {
        self.width_to_with(anchor, 0.0, 1.0, Relation::Equal)
    }

    /// `width relation anchor * multiplier + constant`
    pub fn width_to_with(
        &mut self,
        anchor: DimensionAnchor,
        constant: f64,
        multiplier: f64,
        relation: Relation,
    ) -> &mut Self {
        self.layout_dimension(self.item.width_anchor(), Some(anchor), relation, constant, multiplier)
    }

    /// `width == constant`
    pub fn width(&mut self, constant: f64) -> &mut Self {
        self.width_with(constant, Relation::Equal)
    }

    pub fn width_with(&mut self, constant: f64, relation: Relation) -> &mut Self {
        self.layout_dimension(self.item.width_anchor(), None, relation, constant, 1.0)
    }

    /// `height == anchor`
    pub fn height_to(&mut self, anchor: DimensionAnchor) -> &mut Self {
        self.height_to_with(anchor, 0.0, 1.0, Relation::Equal)
    }

    /// `height relation anchor * multiplier + constant`
    pub fn height_to_with(
        &mut self,
        anchor: DimensionAnchor,
        constant: f64,
        multiplier: f64,
        relation: Relation,
    ) -> &mut Self {
        self.layout_dimension(self.item.height_anchor(), Some(anchor), relation, constant, multiplier)
    }

    /// `height == constant`
    pub fn height(&mut self, constant: f64) -> &mut Self {
        self.height_with(constant, Relation::Equal)
    }

    pub fn height_with(&mut self, constant: f64, relation: Relation) -> &mut Self {
        self.layout_dimension(self.item.height_anchor(), None, relation, constant, 1.0)
    }

    fn layout_anchor<A: Axis>(
        &mut self,
        anchor: Anchor<A>,
        to: Anchor<A>,
        relation: Relation,
        padding: f64,
    ) -> &mut Self {
        let constraint = match relation {
            Relation::Equal => anchor.equal_to(to, padding),
            Relation::GreaterOrEqual => anchor.greater_than_or_equal_to(to, padding),
            Relation::LessOrEqual => anchor.less_than_or_equal_to(to, padding),
        };
        self.constraints.push(constraint);
        self
    }

    fn layout_dimension(
        &mut self,
        dimension: DimensionAnchor,
        to: Option<DimensionAnchor>,
        relation: Relation,
        constant: f64,
        multiplier: f64,
    ) -> &mut Self {
        let constraint = match (relation, to) {
            (Relation::Equal, Some(to)) => dimension.equal_to(to, multiplier, constant),
            (Relation::Equal, None) => dimension.equal_to_constant(constant),
            (Relation::GreaterOrEqual, Some(to)) => {
                dimension.greater_than_or_equal_to(to, multiplier, constant)
            }
            (Relation::GreaterOrEqual, None) => dimension.greater_than_or_equal_to_constant(constant),
            (Relation::LessOrEqual, Some(to)) => dimension.less_than_or_equal_to(to, multiplier, constant),
            (Relation::LessOrEqual, None) => dimension.less_than_or_equal_to_constant(constant),
        };
        self.constraints.push(constraint);
        self
    }

    /// Activate the relationships of every builder as one batch
    ///
    /// Views among the participants stop translating their frame first. The
    /// batch is all or nothing: if any relationship cannot be activated, none
    /// of them are and every participant gets its previous frame-translation
    /// flag back.
    pub fn activate<'a>(
        tree: &mut LayoutTree,
        builders: impl IntoIterator<Item = &'a AnchorBuilder>,
    ) -> Result<(), LayoutError> {
        let builders: Vec<&AnchorBuilder> = builders.into_iter().collect();
        let mut previous: Vec<(ViewId, bool)> = Vec::new();
        for builder in &builders {
            if let Item::View(view) = builder.item {
                previous.push((view, tree.translates_frame(view)?));
            }
        }

        let mut batch = Vec::new();
        for builder in &builders {
            if let Item::View(view) = builder.item {
                tree.set_translates_frame(view, false)?;
            }
            batch.extend(builder.constraints.iter().cloned());
        }

        if let Err(e) = tree.activate(&batch) {
            for &(view, enabled) in previous.iter().rev() {
                tree.set_translates_frame(view, enabled)?;
            }
            return Err(e);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::anchor::Attribute;
    use crate::layout::types::Frame;

    fn tree_with_view() -> (LayoutTree, ViewId, ViewId) {
        let mut tree = LayoutTree::new(Frame::new(0.0, 0.0, 400.0, 300.0));
        let root = tree.root();
        let view = tree.add_view(root, Frame::zero()).unwrap();
        (tree, root, view)
    }

    #[test]
    fn test_for_view_disables_frame_translation() {
        let (mut tree, _, view) = tree_with_view();
        assert!(tree.translates_frame(view).unwrap());

        let builder = AnchorBuilder::for_view(&mut tree, view).unwrap();

        assert!(!tree.translates_frame(view).unwrap());
        assert_eq!(builder.item(), Item::View(view));
        assert!(builder.is_empty());
    }

    #[test]
    fn test_for_item_rejects_unknown_guide() {
        let (mut tree, _, _) = tree_with_view();
        let result = AnchorBuilder::for_item(&mut tree, GuideId(77));
        assert!(matches!(result, Err(LayoutError::UnknownGuide(GuideId(77)))));
    }

    #[test]
    fn test_short_forms_use_defaults() {
        let (mut tree, root, view) = tree_with_view();
        let mut builder = tree.anchor(view).unwrap();
        builder
            .top(root.top_anchor())
            .bottom(root.bottom_anchor())
            .left(root.left_anchor())
            .right(root.right_anchor())
            .center_x(root.center_x_anchor())
            .center_y(root.center_y_anchor())
            .width_to(root.width_anchor())
            .height_to(root.height_anchor())
            .width(40.0)
            .height(30.0);

        assert_eq!(builder.len(), 10);
        for constraint in builder.constraints() {
            assert_eq!(constraint.relation(), Relation::Equal);
            assert_eq!(constraint.multiplier(), 1.0);
        }
        let constants: Vec<f64> = builder.constraints().iter().map(|c| c.constant()).collect();
        assert_eq!(
            constants,
            vec![0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 40.0, 30.0]
        );
        assert_eq!(
            builder.constraints()[6].second(),
            Some(root.width_anchor().anchor_ref())
        );
        assert_eq!(builder.constraints()[8].second(), None);
    }

    #[test]
    fn test_far_edges_negate_padding() {
        let (mut tree, root, view) = tree_with_view();
        let mut builder = tree.anchor(view).unwrap();
        builder
            .top_with(root.top_anchor(), 5.0, Relation::Equal)
            .bottom_with(root.bottom_anchor(), 5.0, Relation::Equal)
            .left_with(root.left_anchor(), 7.0, Relation::Equal)
            .right_with(root.right_anchor(), 7.0, Relation::Equal)
            .center_x_with(root.center_x_anchor(), 3.0, Relation::Equal)
            .center_y_with(root.center_y_anchor(), -3.0, Relation::Equal);

        let constants: Vec<f64> = builder.constraints().iter().map(|c| c.constant()).collect();
        assert_eq!(constants, vec![5.0, -5.0, 7.0, -7.0, 3.0, -3.0]);
    }

    #[test]
    fn test_edges_pair_matching_attributes() {
        let (mut tree, root, view) = tree_with_view();
        let mut builder = tree.anchor(view).unwrap();
        builder
            .bottom_with(root.top_anchor(), 0.0, Relation::LessOrEqual)
            .center_x_with(root.left_anchor(), 0.0, Relation::GreaterOrEqual);

        let first = &builder.constraints()[0];
        assert_eq!(first.first().attribute, Attribute::Bottom);
        assert_eq!(first.second().map(|s| s.attribute), Some(Attribute::Top));
        assert_eq!(first.relation(), Relation::LessOrEqual);

        let second = &builder.constraints()[1];
        assert_eq!(second.first().attribute, Attribute::CenterX);
        assert_eq!(second.relation(), Relation::GreaterOrEqual);
    }

    #[test]
    fn test_absolute_dimensions_have_no_second_anchor() {
        let (mut tree, _, view) = tree_with_view();
        let mut builder = tree.anchor(view).unwrap();
        builder
            .width(100.0)
            .width_with(50.0, Relation::GreaterOrEqual)
            .height_with(200.0, Relation::LessOrEqual);

        for constraint in builder.constraints() {
            assert_eq!(constraint.second(), None);
        }
        let constants: Vec<f64> = builder.constraints().iter().map(|c| c.constant()).collect();
        assert_eq!(constants, vec![100.0, 50.0, 200.0]);
    }

    #[test]
    fn test_relative_dimension() {
        let (mut tree, root, view) = tree_with_view();
        let mut builder = tree.anchor(view).unwrap();
        builder.width_to_with(root.width_anchor(), 10.0, 0.5, Relation::LessOrEqual);

        let constraint = &builder.constraints()[0];
        assert_eq!(constraint.first(), view.width_anchor().anchor_ref());
        assert_eq!(constraint.second(), Some(root.width_anchor().anchor_ref()));
        assert_eq!(constraint.multiplier(), 0.5);
        assert_eq!(constraint.constant(), 10.0);
        assert_eq!(constraint.relation(), Relation::LessOrEqual);
    }

    #[test]
    fn test_nothing_active_before_batch() {
        let (mut tree, root, view) = tree_with_view();
        let mut builder = tree.anchor(view).unwrap();
        builder.top(root.top_anchor());

        assert!(!tree.is_active(&builder.constraints()[0]));
        AnchorBuilder::activate(&mut tree, [&builder]).unwrap();
        assert!(tree.is_active(&builder.constraints()[0]));
    }

    #[test]
    fn test_activate_reasserts_frame_translation_off() {
        let (mut tree, root, view) = tree_with_view();
        let mut builder = tree.anchor(view).unwrap();
        builder.width(10.0);
        tree.set_translates_frame(view, true).unwrap();

        AnchorBuilder::activate(&mut tree, [&builder]).unwrap();

        assert!(!tree.translates_frame(view).unwrap());
        assert!(tree.translates_frame(root).unwrap());
    }

    #[test]
    fn test_failed_activation_restores_frame_translation() {
        let (mut tree, root, view) = tree_with_view();
        let mut sizing = tree.anchor(view).unwrap();
        sizing.width(100.0);
        let mut conflicting = tree.anchor(view).unwrap();
        conflicting.width_with(10.0, Relation::LessOrEqual);
        tree.set_translates_frame(view, true).unwrap();

        let result = AnchorBuilder::activate(&mut tree, [&sizing, &conflicting]);

        assert!(matches!(result, Err(LayoutError::ConflictingConstraints { .. })));
        assert!(tree.translates_frame(view).unwrap());
        assert!(tree.translates_frame(root).unwrap());
        assert!(!tree.is_active(&sizing.constraints()[0]));
    }

    #[test]
    fn test_guide_builder_leaves_owner_flags_alone() {
        let (mut tree, root, _) = tree_with_view();
        let guide = tree.add_layout_guide(root).unwrap();
        let mut builder = AnchorBuilder::for_guide(guide);
        builder.left_with(root.left_anchor(), 10.0, Relation::Equal);

        AnchorBuilder::activate(&mut tree, [&builder]).unwrap();

        assert!(tree.translates_frame(root).unwrap());
        assert!(tree.is_active(&builder.constraints()[0]));
    }

    #[test]
    fn test_activate_with_removed_view_changes_nothing() {
        let (mut tree, root, view) = tree_with_view();
        let other = tree.add_view(root, Frame::zero()).unwrap();
        let mut first = tree.anchor(view).unwrap();
        first.width(10.0);
        let mut second = tree.anchor(other).unwrap();
        second.width(20.0);
        tree.remove_view(other).unwrap();

        let result = AnchorBuilder::activate(&mut tree, [&first, &second]);

        assert!(matches!(result, Err(LayoutError::UnknownView(_))));
        assert!(!tree.is_active(&first.constraints()[0]));
    }
}
