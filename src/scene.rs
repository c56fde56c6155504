//! TOML scene descriptions
//!
//! A scene declares views and layout guides, then groups anchor rules per
//! item. Each `[[anchors]]` block becomes one [`AnchorBuilder`]; all builders
//! are activated as a single batch before one layout pass.
//!
//! ```toml
//! [root]
//! width = 320
//! height = 480
//!
//! [[views]]
//! name = "header"
//!
//! [[anchors]]
//! item = "header"
//! rules = [
//!     { edge = "top", to = "root.top", padding = 8 },
//!     { edge = "left", to = "root.left" },
//!     { edge = "right", to = "root.right" },
//!     { edge = "height", constant = 44 },
//! ]
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use toml::Spanned;

use crate::error::SceneError;
use crate::layout::{
    AnchorBuilder, AnchorRef, Attribute, AttributeAxis, Frame, Item, LayoutConfig, LayoutTree,
    Relation, ViewId,
};

/// Name of the implicit root view
pub const ROOT: &str = "root";

/// A parsed scene file
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scene {
    pub root: Option<RootSpec>,
    #[serde(default)]
    pub views: Vec<ViewSpec>,
    #[serde(default)]
    pub guides: Vec<GuideSpec>,
    #[serde(default)]
    pub anchors: Vec<AnchorSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RootSpec {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct FrameSpec {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl From<&FrameSpec> for Frame {
    fn from(spec: &FrameSpec) -> Self {
        Frame::new(spec.x, spec.y, spec.width, spec.height)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ViewSpec {
    pub name: Spanned<String>,
    /// Parent view; the root when omitted
    pub parent: Option<Spanned<String>>,
    #[serde(default)]
    pub frame: FrameSpec,
    /// Override for the frame-translation flag. Anchored views turn it off
    /// regardless.
    pub translates_frame: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GuideSpec {
    pub name: Spanned<String>,
    /// Owning view; the root when omitted
    pub owner: Option<Spanned<String>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnchorSpec {
    pub item: Spanned<String>,
    #[serde(default)]
    pub rules: Vec<RuleSpec>,
}

/// One edge or dimension rule
///
/// Edge rules (`top`, `bottom`, `left`, `right`, `center_x`, `center_y`) need
/// `to` and take `padding`. Dimension rules (`width`, `height`) take an
/// optional `to` with `constant` and `multiplier`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleSpec {
    pub edge: Spanned<Attribute>,
    pub to: Option<Spanned<String>>,
    pub padding: Option<f64>,
    pub constant: Option<f64>,
    pub multiplier: Option<f64>,
    #[serde(default)]
    pub relation: Relation,
}

impl Scene {
    /// Load a scene from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, SceneError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load a scene from a TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, SceneError> {
        Ok(toml::from_str(content)?)
    }

    /// Create the tree, activate every anchor block as one batch and lay it out
    pub fn build(&self, config: &LayoutConfig) -> Result<SceneLayout, SceneError> {
        let (width, height) = self
            .root
            .as_ref()
            .map(|r| (r.width, r.height))
            .unwrap_or(config.root_size);
        let tree = LayoutTree::new(Frame::new(0.0, 0.0, width, height));
        let mut scene = SceneLayout {
            names: vec![(ROOT.to_string(), Item::View(tree.root()))],
            index: HashMap::from([(ROOT.to_string(), Item::View(tree.root()))]),
            tree,
        };

        for view in &self.views {
            let parent = match &view.parent {
                Some(parent) => scene.lookup_view(parent)?,
                None => scene.tree.root(),
            };
            let id = scene.tree.add_view(parent, Frame::from(&view.frame))?;
            if let Some(enabled) = view.translates_frame {
                scene.tree.set_translates_frame(id, enabled)?;
            }
            scene.declare(&view.name, Item::View(id))?;
        }

        for guide in &self.guides {
            let owner = match &guide.owner {
                Some(owner) => scene.lookup_view(owner)?,
                None => scene.tree.root(),
            };
            let id = scene.tree.add_layout_guide(owner)?;
            scene.declare(&guide.name, Item::Guide(id))?;
        }

        let mut builders = Vec::with_capacity(self.anchors.len());
        for block in &self.anchors {
            let item = scene.lookup(&block.item)?;
            if item == Item::View(scene.tree.root()) {
                return Err(SceneError::InvalidRule {
                    message: format!("'{}' cannot be anchored, size it with [root]", ROOT),
                    span: block.item.span(),
                });
            }
            let mut builder = AnchorBuilder::for_item(&mut scene.tree, item)?;
            for rule in &block.rules {
                scene.apply_rule(&mut builder, rule)?;
            }
            builders.push(builder);
        }

        AnchorBuilder::activate(&mut scene.tree, &builders)?;
        scene.tree.layout()?;
        Ok(scene)
    }
}

/// A scene after layout, with its names resolved to tree items
pub struct SceneLayout {
    tree: LayoutTree,
    /// Declaration order, root first
    names: Vec<(String, Item)>,
    index: HashMap<String, Item>,
}

impl SceneLayout {
    pub fn tree(&self) -> &LayoutTree {
        &self.tree
    }

    pub fn item(&self, name: &str) -> Option<Item> {
        self.index.get(name).copied()
    }

    pub fn frame(&self, name: &str) -> Option<Frame> {
        self.item(name).and_then(|item| self.tree.frame(item).ok())
    }

    /// Every named frame in declaration order
    pub fn frames(&self) -> Vec<(&str, Frame)> {
        self.names
            .iter()
            .filter_map(|(name, item)| Some((name.as_str(), self.tree.frame(*item).ok()?)))
            .collect()
    }

    /// One `name x y width height` line per named item
    pub fn render(&self, precision: usize) -> String {
        self.frames()
            .into_iter()
            .map(|(name, f)| {
                format!(
                    "{} {:.p$} {:.p$} {:.p$} {:.p$}",
                    name,
                    normalize(f.x),
                    normalize(f.y),
                    normalize(f.width),
                    normalize(f.height),
                    p = precision
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn declare(&mut self, name: &Spanned<String>, item: Item) -> Result<(), SceneError> {
        let key = name.get_ref();
        if self.index.contains_key(key) {
            return Err(SceneError::DuplicateName {
                name: key.clone(),
                span: name.span(),
            });
        }
        self.index.insert(key.clone(), item);
        self.names.push((key.clone(), item));
        Ok(())
    }

    fn lookup(&self, name: &Spanned<String>) -> Result<Item, SceneError> {
        self.index
            .get(name.get_ref())
            .copied()
            .ok_or_else(|| SceneError::UnknownName {
                name: name.get_ref().clone(),
                span: name.span(),
                suggestions: self.similar_names(name.get_ref()),
            })
    }

    fn lookup_view(&self, name: &Spanned<String>) -> Result<ViewId, SceneError> {
        self.lookup(name)?
            .as_view()
            .ok_or_else(|| SceneError::NotAView {
                name: name.get_ref().clone(),
                span: name.span(),
            })
    }

    fn similar_names(&self, name: &str) -> Vec<String> {
        let mut candidates: Vec<(usize, &str)> = self
            .names
            .iter()
            .map(|(candidate, _)| (edit_distance(name, candidate), candidate.as_str()))
            .filter(|&(distance, _)| distance <= 2)
            .collect();
        candidates.sort();
        candidates
            .into_iter()
            .map(|(_, candidate)| candidate.to_string())
            .collect()
    }

    /// Resolve `name.attribute`
    fn resolve_anchor(&self, anchor: &Spanned<String>) -> Result<AnchorRef, SceneError> {
        let text = anchor.get_ref();
        let invalid = |reason: String| SceneError::InvalidAnchor {
            anchor: text.clone(),
            reason,
            span: anchor.span(),
        };
        let (name, attribute) = text
            .rsplit_once('.')
            .ok_or_else(|| invalid("expected 'name.attribute'".to_string()))?;
        let attribute: Attribute = attribute.parse().map_err(|e| invalid(format!("{}", e)))?;
        let item = self
            .index
            .get(name)
            .copied()
            .ok_or_else(|| invalid(format!("unknown name '{}'", name)))?;
        Ok(AnchorRef::new(item, attribute))
    }

    fn apply_rule(&self, builder: &mut AnchorBuilder, rule: &RuleSpec) -> Result<(), SceneError> {
        let edge = *rule.edge.get_ref();
        let invalid = |message: &str| SceneError::InvalidRule {
            message: format!("'{}' {}", edge, message),
            span: rule.edge.span(),
        };
        let target = match &rule.to {
            Some(to) => Some((self.resolve_anchor(to)?, to)),
            None => None,
        };
        let mismatch = |target: AnchorRef, to: &Spanned<String>| SceneError::AxisMismatch {
            edge,
            expected: edge.axis(),
            target: to.get_ref().clone(),
            found: target.attribute.axis(),
            span: to.span(),
        };

        if edge.axis() == AttributeAxis::Dimension {
            if rule.padding.is_some() {
                return Err(invalid("rules take 'constant', not 'padding'"));
            }
            let constant = rule.constant.unwrap_or(0.0);
            match target {
                Some((target, to)) => {
                    let dimension = target.dimension().ok_or_else(|| mismatch(target, to))?;
                    let multiplier = rule.multiplier.unwrap_or(1.0);
                    match edge {
                        Attribute::Width => builder.width_to_with(dimension, constant, multiplier, rule.relation),
                        _ => builder.height_to_with(dimension, constant, multiplier, rule.relation),
                    };
                }
                None => {
                    if rule.multiplier.is_some() {
                        return Err(invalid("rules without 'to' cannot take a 'multiplier'"));
                    }
                    match edge {
                        Attribute::Width => builder.width_with(constant, rule.relation),
                        _ => builder.height_with(constant, rule.relation),
                    };
                }
            }
            return Ok(());
        }

        if rule.constant.is_some() || rule.multiplier.is_some() {
            return Err(invalid("rules take 'padding', not 'constant' or 'multiplier'"));
        }
        let (target, to) = target.ok_or(SceneError::MissingTarget {
            edge,
            span: rule.edge.span(),
        })?;
        let padding = rule.padding.unwrap_or(0.0);
        let relation = rule.relation;

        if edge.axis() == AttributeAxis::Vertical {
            let anchor = target.vertical().ok_or_else(|| mismatch(target, to))?;
            match edge {
                Attribute::Top => builder.top_with(anchor, padding, relation),
                Attribute::Bottom => builder.bottom_with(anchor, padding, relation),
                _ => builder.center_y_with(anchor, padding, relation),
            };
        } else {
            let anchor = target.horizontal().ok_or_else(|| mismatch(target, to))?;
            match edge {
                Attribute::Left => builder.left_with(anchor, padding, relation),
                Attribute::Right => builder.right_with(anchor, padding, relation),
                _ => builder.center_x_with(anchor, padding, relation),
            };
        }
        Ok(())
    }
}

fn normalize(value: f64) -> f64 {
    // Avoid printing "-0.0"
    if value == 0.0 {
        0.0
    } else {
        value
    }
}

/// Levenshtein distance between two names
fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.chars().enumerate() {
        let mut row = vec![i + 1; b.len() + 1];
        for (j, &cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            row[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(row[j] + 1);
        }
        prev = row;
    }
    prev[b.len()]
}
