//! Retained tree of views and layout guides
//!
//! The tree owns every participant and every active relationship. Builders and
//! anchors only hold handles into it. Activation is batched: a batch of
//! relationships either becomes active as a whole or not at all, and nothing is
//! solved until [`LayoutTree::layout`] runs a layout pass.

use std::collections::{BTreeMap, BTreeSet};

use kasuari::Constraint as KasuariConstraint;
use tracing::{debug, trace, warn};

use super::builder::AnchorBuilder;
use super::constraint::{ConstraintId, LayoutConstraint};
use super::error::{LayoutError, SolverError};
use super::solver::{ConstraintSolver, LayoutProperty, LayoutVariable};
use super::types::{Frame, GuideId, Item, ViewId};

#[derive(Debug)]
struct ViewNode {
    parent: Option<ViewId>,
    children: Vec<ViewId>,
    guides: Vec<GuideId>,
    frame: Frame,
    /// Whether the frame is turned into implicit required constraints on layout
    translates_frame: bool,
}

#[derive(Debug)]
struct GuideNode {
    owner: ViewId,
    frame: Frame,
}

struct ActiveConstraint {
    constraint: LayoutConstraint,
    handle: KasuariConstraint,
}

/// A tree of views and layout guides laid out by a constraint solver
pub struct LayoutTree {
    root: ViewId,
    next_id: u32,
    views: BTreeMap<ViewId, ViewNode>,
    guides: BTreeMap<GuideId, GuideNode>,
    /// Active relationships, in creation order
    active: BTreeMap<ConstraintId, ActiveConstraint>,
    solver: ConstraintSolver,
}

impl LayoutTree {
    /// Create a tree whose root view occupies `root_frame`
    ///
    /// The root keeps translating its frame into constraints, so it stays where
    /// it was put and everything else can be anchored to it.
    pub fn new(root_frame: Frame) -> Self {
        let root = ViewId(0);
        let mut views = BTreeMap::new();
        views.insert(
            root,
            ViewNode {
                parent: None,
                children: vec![],
                guides: vec![],
                frame: root_frame,
                translates_frame: true,
            },
        );
        Self {
            root,
            next_id: 1,
            views,
            guides: BTreeMap::new(),
            active: BTreeMap::new(),
            solver: ConstraintSolver::new(),
        }
    }

    pub fn root(&self) -> ViewId {
        self.root
    }

    fn next_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn view(&self, id: ViewId) -> Result<&ViewNode, LayoutError> {
        self.views.get(&id).ok_or(LayoutError::UnknownView(id))
    }

    fn view_mut(&mut self, id: ViewId) -> Result<&mut ViewNode, LayoutError> {
        self.views.get_mut(&id).ok_or(LayoutError::UnknownView(id))
    }

    /// Add a view under `parent`
    ///
    /// New views translate their frame into constraints until a builder is
    /// created for them or the flag is cleared explicitly.
    pub fn add_view(&mut self, parent: ViewId, frame: Frame) -> Result<ViewId, LayoutError> {
        self.view(parent)?;
        let id = ViewId(self.next_id());
        self.views.insert(
            id,
            ViewNode {
                parent: Some(parent),
                children: vec![],
                guides: vec![],
                frame,
                translates_frame: true,
            },
        );
        self.view_mut(parent)?.children.push(id);
        Ok(id)
    }

    /// Add an invisible layout guide owned by `owner`
    pub fn add_layout_guide(&mut self, owner: ViewId) -> Result<GuideId, LayoutError> {
        self.view(owner)?;
        let id = GuideId(self.next_id());
        self.guides.insert(
            id,
            GuideNode {
                owner,
                frame: Frame::zero(),
            },
        );
        self.view_mut(owner)?.guides.push(id);
        Ok(id)
    }

    /// Whether `item` is currently part of the tree
    pub fn contains(&self, item: Item) -> bool {
        match item {
            Item::View(id) => self.views.contains_key(&id),
            Item::Guide(id) => self.guides.contains_key(&id),
        }
    }

    pub fn parent(&self, view: ViewId) -> Result<Option<ViewId>, LayoutError> {
        Ok(self.view(view)?.parent)
    }

    pub fn children(&self, view: ViewId) -> Result<&[ViewId], LayoutError> {
        Ok(&self.view(view)?.children)
    }

    pub fn layout_guides(&self, view: ViewId) -> Result<&[GuideId], LayoutError> {
        Ok(&self.view(view)?.guides)
    }

    pub fn guide_owner(&self, guide: GuideId) -> Result<ViewId, LayoutError> {
        self.guides
            .get(&guide)
            .map(|g| g.owner)
            .ok_or(LayoutError::UnknownGuide(guide))
    }

    /// Frame of an item as of the last layout pass
    ///
    /// Views that translate their frame report the frame they were given.
    pub fn frame(&self, item: impl Into<Item>) -> Result<Frame, LayoutError> {
        match item.into() {
            Item::View(id) => Ok(self.view(id)?.frame),
            Item::Guide(id) => self
                .guides
                .get(&id)
                .map(|g| g.frame)
                .ok_or(LayoutError::UnknownGuide(id)),
        }
    }

    pub fn set_frame(&mut self, view: ViewId, frame: Frame) -> Result<(), LayoutError> {
        self.view_mut(view)?.frame = frame;
        Ok(())
    }

    pub fn translates_frame(&self, view: ViewId) -> Result<bool, LayoutError> {
        Ok(self.view(view)?.translates_frame)
    }

    pub fn set_translates_frame(&mut self, view: ViewId, enabled: bool) -> Result<(), LayoutError> {
        self.view_mut(view)?.translates_frame = enabled;
        Ok(())
    }

    /// Start an anchor builder for `view`
    pub fn anchor(&mut self, view: ViewId) -> Result<AnchorBuilder, LayoutError> {
        AnchorBuilder::for_view(self, view)
    }

    pub fn is_active(&self, constraint: &LayoutConstraint) -> bool {
        self.active.contains_key(&constraint.id())
    }

    /// Active relationships in creation order
    pub fn active_constraints(&self) -> impl Iterator<Item = &LayoutConstraint> {
        self.active.values().map(|a| &a.constraint)
    }

    /// Active relationships that refer to `item`
    pub fn constraints_involving(&self, item: impl Into<Item>) -> Vec<&LayoutConstraint> {
        let item = item.into();
        self.active_constraints()
            .filter(|c| c.involves(item))
            .collect()
    }

    /// Activate a batch of relationships
    ///
    /// Relationships that are already active are left alone. If any
    /// relationship in the batch refers to a missing item or cannot be
    /// satisfied, every relationship this call added is removed again and the
    /// error is returned.
    pub fn activate(&mut self, constraints: &[LayoutConstraint]) -> Result<(), LayoutError> {
        for constraint in constraints {
            if let Some(item) = constraint.items().find(|&item| !self.contains(item)) {
                return Err(LayoutError::unknown_item(item, constraint));
            }
        }

        let mut added = Vec::new();
        for constraint in constraints {
            if self.active.contains_key(&constraint.id()) {
                continue;
            }
            match self.solver.add_constraint(constraint) {
                Ok(handle) => {
                    trace!(%constraint, "activated");
                    self.active.insert(
                        constraint.id(),
                        ActiveConstraint {
                            constraint: constraint.clone(),
                            handle,
                        },
                    );
                    added.push(constraint.id());
                }
                Err(e) => {
                    debug!(%constraint, rolled_back = added.len(), "batch activation failed");
                    self.remove_active(&added);
                    return Err(into_layout_error(e));
                }
            }
        }

        debug!(
            requested = constraints.len(),
            added = added.len(),
            "activated constraint batch"
        );
        Ok(())
    }

    /// Deactivate relationships; ones that are not active are ignored
    pub fn deactivate(&mut self, constraints: &[LayoutConstraint]) -> Result<(), LayoutError> {
        for constraint in constraints {
            if let Some(active) = self.active.remove(&constraint.id()) {
                self.solver.remove_constraint(&active.handle)?;
                trace!(%constraint, "deactivated");
            }
        }
        Ok(())
    }

    fn remove_active(&mut self, ids: &[ConstraintId]) {
        for id in ids.iter().rev() {
            if let Some(active) = self.active.remove(id) {
                if let Err(e) = self.solver.remove_constraint(&active.handle) {
                    warn!(constraint = %active.constraint, error = %e, "failed to roll back constraint");
                }
            }
        }
    }

    /// Remove a view with its subviews and layout guides
    ///
    /// Every active relationship touching a removed item is deactivated.
    pub fn remove_view(&mut self, view: ViewId) -> Result<(), LayoutError> {
        if view == self.root {
            return Err(LayoutError::RootRemoval);
        }
        let parent = self.view(view)?.parent;

        let mut removed: BTreeSet<Item> = BTreeSet::new();
        let mut stack = vec![view];
        while let Some(id) = stack.pop() {
            let node = self.view(id)?;
            removed.insert(Item::View(id));
            removed.extend(node.guides.iter().map(|&g| Item::Guide(g)));
            stack.extend(node.children.iter().copied());
        }

        let doomed: Vec<ConstraintId> = self
            .active
            .iter()
            .filter(|(_, a)| a.constraint.items().any(|item| removed.contains(&item)))
            .map(|(&id, _)| id)
            .collect();
        self.remove_active(&doomed);

        for &item in &removed {
            match item {
                Item::View(id) => {
                    self.views.remove(&id);
                }
                Item::Guide(id) => {
                    self.guides.remove(&id);
                }
            }
            self.solver.forget(item);
        }
        if let Some(parent) = parent.and_then(|p| self.views.get_mut(&p)) {
            parent.children.retain(|&c| c != view);
        }

        debug!(
            %view,
            items = removed.len(),
            constraints = doomed.len(),
            "removed view"
        );
        Ok(())
    }

    /// Run a layout pass and update every frame
    ///
    /// Views that still translate their frame are pinned to it with implicit
    /// required constraints for the duration of the pass. If those disagree
    /// with active relationships the pass fails and no frame changes.
    pub fn layout(&mut self) -> Result<(), LayoutError> {
        let pinned: Vec<(ViewId, Frame)> = self
            .views
            .iter()
            .filter(|(_, node)| node.translates_frame)
            .map(|(&id, node)| (id, node.frame))
            .collect();

        let mut implicit = Vec::with_capacity(pinned.len() * 4);
        for &(view, frame) in &pinned {
            let values = [
                (LayoutProperty::X, frame.x),
                (LayoutProperty::Y, frame.y),
                (LayoutProperty::Width, frame.width),
                (LayoutProperty::Height, frame.height),
            ];
            for (property, value) in values {
                match self.solver.add_fixed(LayoutVariable::new(view, property), value) {
                    Ok(handle) => implicit.push(handle),
                    Err(e) => {
                        self.remove_implicit(&implicit);
                        return Err(self.implicit_conflict(view, e));
                    }
                }
            }
        }

        self.solver.refresh();
        self.remove_implicit(&implicit);

        let solved: Vec<ViewId> = self
            .views
            .iter()
            .filter(|(_, node)| !node.translates_frame)
            .map(|(&id, _)| id)
            .collect();
        for id in solved {
            let frame = self.solver.frame(Item::View(id));
            self.view_mut(id)?.frame = frame;
        }
        for (&id, guide) in self.guides.iter_mut() {
            guide.frame = self.solver.frame(Item::Guide(id));
        }

        debug!(
            views = self.views.len(),
            guides = self.guides.len(),
            constraints = self.active.len(),
            pinned = pinned.len(),
            "layout pass"
        );
        Ok(())
    }

    fn remove_implicit(&mut self, handles: &[KasuariConstraint]) {
        for handle in handles {
            if let Err(e) = self.solver.remove_constraint(handle) {
                warn!(error = %e, "failed to remove implicit frame constraint");
            }
        }
    }

    fn implicit_conflict(&self, view: ViewId, e: SolverError) -> LayoutError {
        match e {
            SolverError::Unsatisfiable { constraint, .. } => {
                let mut constraints = vec![constraint];
                constraints.extend(
                    self.constraints_involving(view)
                        .into_iter()
                        .map(|c| c.to_string()),
                );
                LayoutError::conflicting(
                    constraints,
                    format!(
                        "{} translates its frame into constraints that conflict with its anchors",
                        view
                    ),
                )
            }
            other => other.into(),
        }
    }
}

impl Default for LayoutTree {
    fn default() -> Self {
        Self::new(Frame::zero())
    }
}

fn into_layout_error(e: SolverError) -> LayoutError {
    match e {
        SolverError::Unsatisfiable { constraint, reason } => {
            LayoutError::conflicting(vec![constraint], reason)
        }
        other => other.into(),
    }
}
