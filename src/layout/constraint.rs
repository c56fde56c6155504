//! Layout relationships between anchors

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use super::anchor::{AnchorRef, Relation};
use super::types::Item;

static NEXT_CONSTRAINT_ID: AtomicU64 = AtomicU64::new(0);

/// Identity of a relationship, shared by all of its clones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConstraintId(u64);

impl ConstraintId {
    fn next() -> Self {
        Self(NEXT_CONSTRAINT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A single relationship: `first relation second * multiplier + constant`
///
/// When `second` is `None` the relationship is against the constant alone.
/// Creating a relationship does not activate it; hand it to
/// [`LayoutTree::activate`](super::LayoutTree::activate) for that.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConstraint {
    id: ConstraintId,
    first: AnchorRef,
    relation: Relation,
    second: Option<AnchorRef>,
    multiplier: f64,
    constant: f64,
}

impl LayoutConstraint {
    pub(crate) fn new(
        first: AnchorRef,
        relation: Relation,
        second: Option<AnchorRef>,
        multiplier: f64,
        constant: f64,
    ) -> Self {
        Self {
            id: ConstraintId::next(),
            first,
            relation,
            second,
            multiplier,
            constant,
        }
    }

    pub fn id(&self) -> ConstraintId {
        self.id
    }

    pub fn first(&self) -> AnchorRef {
        self.first
    }

    pub fn relation(&self) -> Relation {
        self.relation
    }

    pub fn second(&self) -> Option<AnchorRef> {
        self.second
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    pub fn constant(&self) -> f64 {
        self.constant
    }

    /// Items this relationship refers to
    pub fn items(&self) -> impl Iterator<Item = Item> {
        std::iter::once(self.first.item).chain(self.second.map(|s| s.item))
    }

    /// Whether this relationship refers to `item` on either side
    pub fn involves(&self, item: Item) -> bool {
        self.items().any(|i| i == item)
    }
}

impl fmt::Display for LayoutConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ", self.first, self.relation)?;
        match self.second {
            None => write!(f, "{}", self.constant),
            Some(second) => {
                write!(f, "{}", second)?;
                if self.multiplier != 1.0 {
                    write!(f, " * {}", self.multiplier)?;
                }
                if self.constant > 0.0 {
                    write!(f, " + {}", self.constant)?;
                } else if self.constant < 0.0 {
                    write!(f, " - {}", -self.constant)?;
                }
                Ok(())
            }
        }
    }
}
