//! Integration tests for the anchor builder and batch activation.
//!
//! These check what the builder records and what a layout pass makes of it,
//! using only the public API.

use pretty_assertions::assert_eq;

use anchorage::layout::{
    AnchorBuilder, Anchored, Attribute, Frame, Item, LayoutError, LayoutTree, Relation, ViewId,
};

const TOLERANCE: f64 = 1e-6;

fn setup() -> (LayoutTree, ViewId) {
    let tree = LayoutTree::new(Frame::new(0.0, 0.0, 375.0, 667.0));
    let root = tree.root();
    (tree, root)
}

fn assert_frame(actual: Frame, expected: Frame) {
    let close = (actual.x - expected.x).abs() < TOLERANCE
        && (actual.y - expected.y).abs() < TOLERANCE
        && (actual.width - expected.width).abs() < TOLERANCE
        && (actual.height - expected.height).abs() < TOLERANCE;
    assert!(close, "expected {:?}, got {:?}", expected, actual);
}

#[test]
fn test_padding_sign_per_edge() {
    let (mut tree, root) = setup();
    let view = tree.add_view(root, Frame::zero()).unwrap();

    for padding in [-12.5, 0.0, 3.0, 40.0] {
        let mut builder = tree.anchor(view).unwrap();
        builder
            .top_with(root.top_anchor(), padding, Relation::Equal)
            .bottom_with(root.bottom_anchor(), padding, Relation::Equal)
            .left_with(root.left_anchor(), padding, Relation::Equal)
            .right_with(root.right_anchor(), padding, Relation::Equal)
            .center_x_with(root.center_x_anchor(), padding, Relation::Equal)
            .center_y_with(root.center_y_anchor(), padding, Relation::Equal);

        let applied: Vec<f64> = builder.constraints().iter().map(|c| c.constant()).collect();
        assert_eq!(
            applied,
            vec![padding, -padding, padding, -padding, padding, padding]
        );
    }
}

#[test]
fn test_records_one_relationship_per_call_in_order() {
    let (mut tree, root) = setup();
    let view = tree.add_view(root, Frame::zero()).unwrap();
    let mut builder = tree.anchor(view).unwrap();

    builder
        .height_with(10.0, Relation::GreaterOrEqual)
        .left(root.left_anchor())
        .width_to_with(root.width_anchor(), 0.0, 1.0, Relation::LessOrEqual)
        .top(root.top_anchor())
        // Same call twice is recorded twice
        .top(root.top_anchor());

    let attributes: Vec<Attribute> = builder
        .constraints()
        .iter()
        .map(|c| c.first().attribute)
        .collect();
    assert_eq!(
        attributes,
        vec![
            Attribute::Height,
            Attribute::Left,
            Attribute::Width,
            Attribute::Top,
            Attribute::Top,
        ]
    );
    assert_eq!(builder.len(), 5);
}

#[test]
fn test_absolute_width_for_every_relation() {
    let (mut tree, root) = setup();
    let view = tree.add_view(root, Frame::zero()).unwrap();

    for relation in [
        Relation::Equal,
        Relation::GreaterOrEqual,
        Relation::LessOrEqual,
    ] {
        let mut builder = tree.anchor(view).unwrap();
        builder.width_with(72.0, relation);

        let constraint = &builder.constraints()[0];
        assert_eq!(constraint.second(), None);
        assert_eq!(constraint.constant(), 72.0);
        assert_eq!(constraint.relation(), relation);
    }
}

#[test]
fn test_relative_width_solves_to_scaled_target() {
    let (mut tree, root) = setup();
    let view = tree.add_view(root, Frame::zero()).unwrap();
    let mut builder = tree.anchor(view).unwrap();
    builder
        .width_to_with(root.width_anchor(), 5.0, 0.4, Relation::Equal)
        .height_to_with(root.height_anchor(), -7.0, 0.1, Relation::Equal)
        .top(root.top_anchor())
        .left(root.left_anchor());

    AnchorBuilder::activate(&mut tree, [&builder]).unwrap();
    tree.layout().unwrap();

    let frame = tree.frame(view).unwrap();
    assert_frame(frame, Frame::new(0.0, 0.0, 375.0 * 0.4 + 5.0, 667.0 * 0.1 - 7.0));
}

#[test]
fn test_batch_activation_across_builders() {
    let (mut tree, root) = setup();
    let a = tree.add_view(root, Frame::zero()).unwrap();
    let b = tree.add_view(root, Frame::zero()).unwrap();
    let guide = tree.add_layout_guide(root).unwrap();

    let mut first = tree.anchor(a).unwrap();
    first
        .top(root.top_anchor())
        .left(root.left_anchor())
        .width(100.0)
        .height(50.0);

    let mut second = tree.anchor(b).unwrap();
    second
        .top_with(a.bottom_anchor(), 10.0, Relation::Equal)
        .left(a.left_anchor())
        .width_to(a.width_anchor())
        .height_to_with(a.height_anchor(), 0.0, 2.0, Relation::Equal);

    let mut third = AnchorBuilder::for_guide(guide);
    third
        .top(a.top_anchor())
        .bottom(b.bottom_anchor())
        .left(a.right_anchor())
        .right(root.right_anchor());

    // Something else turned translation back on in the meantime
    tree.set_translates_frame(b, true).unwrap();

    AnchorBuilder::activate(&mut tree, [&first, &second, &third]).unwrap();

    for builder in [&first, &second, &third] {
        for constraint in builder.constraints() {
            assert!(tree.is_active(constraint), "{} should be active", constraint);
        }
    }
    assert!(!tree.translates_frame(a).unwrap());
    assert!(!tree.translates_frame(b).unwrap());

    tree.layout().unwrap();
    assert_frame(tree.frame(a).unwrap(), Frame::new(0.0, 0.0, 100.0, 50.0));
    assert_frame(tree.frame(b).unwrap(), Frame::new(0.0, 60.0, 100.0, 100.0));
    assert_frame(tree.frame(guide).unwrap(), Frame::new(100.0, 0.0, 275.0, 160.0));
}

#[test]
fn test_batch_order_is_preserved() {
    let (mut tree, root) = setup();
    let a = tree.add_view(root, Frame::zero()).unwrap();
    let b = tree.add_view(root, Frame::zero()).unwrap();

    let mut second = tree.anchor(b).unwrap();
    second.width(2.0);
    let mut first = tree.anchor(a).unwrap();
    first.width(1.0).height(1.0);

    AnchorBuilder::activate(&mut tree, [&first, &second]).unwrap();

    let items: Vec<Item> = tree.active_constraints().map(|c| c.first().item).collect();
    // Active constraints are listed in creation order
    assert_eq!(items, vec![Item::View(b), Item::View(a), Item::View(a)]);
}

#[test]
fn test_unknown_relation_never_reaches_builder() {
    let (mut tree, root) = setup();
    let view = tree.add_view(root, Frame::zero()).unwrap();
    let mut builder = tree.anchor(view).unwrap();

    for raw in ["==", "!=", ">="] {
        if let Ok(relation) = raw.parse::<Relation>() {
            builder.top_with(root.top_anchor(), 0.0, relation);
        }
    }

    assert_eq!(builder.len(), 2);
}

#[test]
fn test_failed_batch_leaves_everything_inactive() {
    let (mut tree, root) = setup();
    let view = tree.add_view(root, Frame::zero()).unwrap();

    let mut sizing = tree.anchor(view).unwrap();
    sizing.width(100.0);
    let mut conflicting = tree.anchor(view).unwrap();
    conflicting.width_with(10.0, Relation::LessOrEqual);

    let result = AnchorBuilder::activate(&mut tree, [&sizing, &conflicting]);

    assert!(matches!(result, Err(LayoutError::ConflictingConstraints { .. })));
    assert_eq!(tree.active_constraints().count(), 0);
    // The builders already turned translation off, and that is what comes back
    assert!(!tree.translates_frame(view).unwrap());
}

#[test]
fn test_short_forms_lay_out_like_explicit_defaults() {
    let (mut tree, root) = setup();
    let short = tree.add_view(root, Frame::zero()).unwrap();
    let long = tree.add_view(root, Frame::zero()).unwrap();

    let mut first = tree.anchor(short).unwrap();
    first
        .center_x(root.center_x_anchor())
        .bottom(root.bottom_anchor())
        .width_to(root.width_anchor())
        .height(44.0);
    let mut second = tree.anchor(long).unwrap();
    second
        .center_x_with(root.center_x_anchor(), 0.0, Relation::Equal)
        .bottom_with(root.bottom_anchor(), 0.0, Relation::Equal)
        .width_to_with(root.width_anchor(), 0.0, 1.0, Relation::Equal)
        .height_with(44.0, Relation::Equal);

    AnchorBuilder::activate(&mut tree, [&first, &second]).unwrap();
    tree.layout().unwrap();

    let expected = Frame::new(0.0, 623.0, 375.0, 44.0);
    assert_frame(tree.frame(short).unwrap(), expected);
    assert_frame(tree.frame(long).unwrap(), expected);
}

#[test]
fn test_header_scenario() {
    let (mut tree, root) = setup();
    let element = tree.add_view(root, Frame::new(1.0, 2.0, 3.0, 4.0)).unwrap();

    let mut builder = tree.anchor(element).unwrap();
    builder
        .top_with(root.top_anchor(), 8.0, Relation::Equal)
        .width(100.0)
        .height(44.0);
    AnchorBuilder::activate(&mut tree, [&builder]).unwrap();

    let active: Vec<String> = tree
        .constraints_involving(element)
        .iter()
        .map(|c| c.to_string())
        .collect();
    assert_eq!(
        active,
        vec![
            format!("{}.top == {}.top + 8", element, root),
            format!("{}.width == 100", element),
            format!("{}.height == 44", element),
        ]
    );

    tree.layout().unwrap();
    let frame = tree.frame(element).unwrap();
    assert!((frame.y - 8.0).abs() < TOLERANCE);
    assert!((frame.width - 100.0).abs() < TOLERANCE);
    assert!((frame.height - 44.0).abs() < TOLERANCE);
}

#[test]
fn test_skipping_the_builder_conflicts_with_translated_frame() {
    let (mut tree, root) = setup();
    let view = tree.add_view(root, Frame::new(0.0, 0.0, 10.0, 10.0)).unwrap();

    // Relationships activated directly, without a builder, leave translation on
    tree.activate(&[
        view.top_anchor().equal_to(root.top_anchor(), 20.0),
        view.width_anchor().equal_to_constant(10.0),
    ])
    .unwrap();

    assert!(matches!(
        tree.layout(),
        Err(LayoutError::ConflictingConstraints { .. })
    ));
}

#[test]
fn test_removing_a_view_tears_down_its_relationships() {
    let (mut tree, root) = setup();
    let card = tree.add_view(root, Frame::zero()).unwrap();
    let label = tree.add_view(card, Frame::zero()).unwrap();

    let mut card_anchors = tree.anchor(card).unwrap();
    card_anchors
        .top(root.top_anchor())
        .left(root.left_anchor())
        .width(200.0)
        .height(100.0);
    let mut label_anchors = tree.anchor(label).unwrap();
    label_anchors
        .center_x(card.center_x_anchor())
        .center_y(card.center_y_anchor());
    AnchorBuilder::activate(&mut tree, [&card_anchors, &label_anchors]).unwrap();

    tree.remove_view(card).unwrap();

    assert_eq!(tree.active_constraints().count(), 0);
    assert!(matches!(
        AnchorBuilder::activate(&mut tree, [&label_anchors]),
        Err(LayoutError::UnknownView(_))
    ));
    tree.layout().unwrap();
}
