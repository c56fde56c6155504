//! Constraint solver integration for layout computation
//!
//! This module wraps the kasuari Cassowary solver, translating anchor
//! relationships into solver constraints and reading solved frames back out.
//! Every item owns four base variables (x, y, width, height); the remaining
//! anchors are expressions over them.

use std::collections::HashMap;

use kasuari::{
    Constraint as KasuariConstraint, Expression, Solver as KasuariSolver, Strength,
    Variable as KasuariVariable, WeightedRelation::*,
};

use super::anchor::{AnchorRef, Attribute, Relation};
use super::constraint::LayoutConstraint;
use super::error::SolverError;
use super::types::{Frame, Item};

/// Base properties stored as solver variables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutProperty {
    X,
    Y,
    Width,
    Height,
}

impl LayoutProperty {
    pub fn all() -> &'static [LayoutProperty] {
        &[Self::X, Self::Y, Self::Width, Self::Height]
    }
}

/// A variable in the constraint system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayoutVariable {
    pub item: Item,
    pub property: LayoutProperty,
}

impl LayoutVariable {
    pub fn new(item: impl Into<Item>, property: LayoutProperty) -> Self {
        Self {
            item: item.into(),
            property,
        }
    }
}

/// Wrapper around kasuari solver
pub struct ConstraintSolver {
    solver: KasuariSolver,
    /// Maps our variables to kasuari variables
    variables: HashMap<LayoutVariable, KasuariVariable>,
    /// Last known value of every kasuari variable that has changed
    values: HashMap<KasuariVariable, f64>,
}

impl ConstraintSolver {
    pub fn new() -> Self {
        Self {
            solver: KasuariSolver::new(),
            variables: HashMap::new(),
            values: HashMap::new(),
        }
    }

    fn get_or_create_var(&mut self, var: LayoutVariable) -> KasuariVariable {
        *self
            .variables
            .entry(var)
            .or_insert_with(KasuariVariable::new)
    }

    /// Build the expression for an anchor
    ///
    /// Edges and center lines are derived from the base variables:
    /// right = x + width, bottom = y + height, center = origin + size / 2.
    fn expression(&mut self, anchor: AnchorRef) -> Expression {
        let item = anchor.item;
        let mut var = |property| self.get_or_create_var(LayoutVariable::new(item, property));
        match anchor.attribute {
            Attribute::Left => var(LayoutProperty::X).into(),
            Attribute::Top => var(LayoutProperty::Y).into(),
            Attribute::Width => var(LayoutProperty::Width).into(),
            Attribute::Height => var(LayoutProperty::Height).into(),
            Attribute::Right => {
                let x = var(LayoutProperty::X);
                let width = var(LayoutProperty::Width);
                x + width
            }
            Attribute::Bottom => {
                let y = var(LayoutProperty::Y);
                let height = var(LayoutProperty::Height);
                y + height
            }
            Attribute::CenterX => {
                let x = var(LayoutProperty::X);
                let width = var(LayoutProperty::Width);
                x + width * 0.5
            }
            Attribute::CenterY => {
                let y = var(LayoutProperty::Y);
                let height = var(LayoutProperty::Height);
                y + height * 0.5
            }
        }
    }

    /// Convert a kasuari error to a SolverError with context
    fn convert_kasuari_error(e: kasuari::AddConstraintError, constraint_desc: &str) -> SolverError {
        match e {
            kasuari::AddConstraintError::UnsatisfiableConstraint => SolverError::Unsatisfiable {
                constraint: constraint_desc.to_string(),
                reason: format!(
                    "cannot satisfy {}: conflicts with existing constraints",
                    constraint_desc
                ),
            },
            kasuari::AddConstraintError::DuplicateConstraint => {
                SolverError::Duplicate(constraint_desc.to_string())
            }
            kasuari::AddConstraintError::InternalSolverError(msg) => {
                SolverError::Internal(format!("{}: {}", constraint_desc, msg))
            }
        }
    }

    fn add(&mut self, constraint: KasuariConstraint, desc: &str) -> Result<KasuariConstraint, SolverError> {
        self.solver
            .add_constraint(constraint.clone())
            .map_err(|e| Self::convert_kasuari_error(e, desc))?;
        Ok(constraint)
    }

    /// Add a relationship as a required constraint
    ///
    /// Returns the kasuari handle needed to remove it again.
    pub fn add_constraint(
        &mut self,
        constraint: &LayoutConstraint,
    ) -> Result<KasuariConstraint, SolverError> {
        let lhs = self.expression(constraint.first());
        let rhs = match constraint.second() {
            Some(second) => {
                self.expression(second) * constraint.multiplier() + constraint.constant()
            }
            None => Expression::from_constant(constraint.constant()),
        };
        let kc = match constraint.relation() {
            Relation::Equal => lhs | EQ(Strength::REQUIRED) | rhs,
            Relation::GreaterOrEqual => lhs | GE(Strength::REQUIRED) | rhs,
            Relation::LessOrEqual => lhs | LE(Strength::REQUIRED) | rhs,
        };
        self.add(kc, &constraint.to_string())
    }

    /// Pin a base variable to a value
    pub fn add_fixed(
        &mut self,
        var: LayoutVariable,
        value: f64,
    ) -> Result<KasuariConstraint, SolverError> {
        let desc = format!("{}.{:?} = {}", var.item, var.property, value);
        let kvar = self.get_or_create_var(var);
        self.add(kvar | EQ(Strength::REQUIRED) | value, &desc)
    }

    pub fn remove_constraint(&mut self, constraint: &KasuariConstraint) -> Result<(), SolverError> {
        self.solver
            .remove_constraint(constraint)
            .map_err(|e| SolverError::Internal(format!("failed to remove constraint: {:?}", e)))
    }

    /// Pull changed values out of the solver
    pub fn refresh(&mut self) {
        for (kvar, value) in self.solver.fetch_changes() {
            self.values.insert(*kvar, *value);
        }
    }

    /// Current value of a variable (0 until the solver assigns one)
    pub fn value(&self, var: LayoutVariable) -> f64 {
        self.variables
            .get(&var)
            .and_then(|kvar| self.values.get(kvar))
            .copied()
            .unwrap_or(0.0)
    }

    /// Current frame of an item
    pub fn frame(&self, item: Item) -> Frame {
        Frame::new(
            self.value(LayoutVariable::new(item, LayoutProperty::X)),
            self.value(LayoutVariable::new(item, LayoutProperty::Y)),
            self.value(LayoutVariable::new(item, LayoutProperty::Width)),
            self.value(LayoutVariable::new(item, LayoutProperty::Height)),
        )
    }

    /// Drop the variables of an item whose constraints are all gone
    pub fn forget(&mut self, item: Item) {
        for &property in LayoutProperty::all() {
            if let Some(kvar) = self.variables.remove(&LayoutVariable::new(item, property)) {
                self.values.remove(&kvar);
            }
        }
    }
}

impl Default for ConstraintSolver {
    fn default() -> Self {
        Self::new()
    }
}
