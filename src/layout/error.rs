//! Error types for the layout tree and solver

use thiserror::Error;

use super::types::{GuideId, Item, ViewId};

/// Errors from the constraint solver
#[derive(Debug, Error)]
pub enum SolverError {
    #[error("unsatisfiable constraint: {reason}")]
    Unsatisfiable {
        constraint: String,
        reason: String,
    },

    #[error("duplicate constraint: {0}")]
    Duplicate(String),

    #[error("internal solver error: {0}")]
    Internal(String),
}

/// Errors that can occur while building or solving a layout
#[derive(Debug, Error)]
pub enum LayoutError {
    /// Handle to a view that was never created or has been removed
    #[error("unknown view {0}")]
    UnknownView(ViewId),

    /// Handle to a layout guide that was never created or has been removed
    #[error("unknown layout guide {0}")]
    UnknownGuide(GuideId),

    /// A relationship refers to an item that is not in the tree
    #[error("constraint '{constraint}' refers to {item}, which is not in the tree")]
    UnknownItem { item: Item, constraint: String },

    #[error("the root view cannot be removed")]
    RootRemoval,

    /// Relationships that cannot all be satisfied
    #[error("conflicting constraints: {reason}")]
    ConflictingConstraints {
        constraints: Vec<String>,
        reason: String,
    },

    /// Constraint solver error
    #[error("constraint solver error: {0}")]
    Solver(#[from] SolverError),
}

impl LayoutError {
    /// Create a conflicting constraints error
    pub fn conflicting(constraints: Vec<String>, reason: impl Into<String>) -> Self {
        Self::ConflictingConstraints {
            constraints,
            reason: reason.into(),
        }
    }

    /// Create an error for a relationship that touches a missing item
    pub fn unknown_item(item: Item, constraint: impl ToString) -> Self {
        Self::UnknownItem {
            item,
            constraint: constraint.to_string(),
        }
    }
}
