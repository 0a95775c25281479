use serde::{Deserialize, Serialize};

use vault_store::{CompareOp, Literal};
use vault_types::StateStatus;

/// Custom aggregate projections a criteria tree may request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AggregateFn {
    /// Count of matching rows.
    CountRows,
}

/// An immutable, composable filter tree over vault states.
///
/// Leaves constrain state-record fields, the consumption status, or a
/// (possibly abstract) category, or request a custom aggregate projection.
/// Composites combine children by AND/OR. Trees are built with the
/// constructors and the [`Criteria::and`] / [`Criteria::or`] combinators.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Criteria {
    /// Constrain the consumption status; `All` is a no-op filter.
    Status(StateStatus),
    /// Constrain a schema field by name. Names are validated at compile time.
    Field {
        field: String,
        op: CompareOp,
        value: Literal,
    },
    /// Constrain to a possibly-abstract category.
    Category(String),
    /// Request an aggregate projection instead of record rows.
    Aggregate(AggregateFn),
    And(Vec<Criteria>),
    Or(Vec<Criteria>),
}

impl Criteria {
    /// Match every state regardless of status.
    pub fn all() -> Self {
        Criteria::Status(StateStatus::All)
    }

    /// Match unconsumed states only.
    pub fn unconsumed() -> Self {
        Criteria::Status(StateStatus::Unconsumed)
    }

    /// Match consumed states only.
    pub fn consumed() -> Self {
        Criteria::Status(StateStatus::Consumed)
    }

    /// Constrain the given status.
    pub fn status(status: StateStatus) -> Self {
        Criteria::Status(status)
    }

    /// Constrain a schema field.
    pub fn field(field: impl Into<String>, op: CompareOp, value: Literal) -> Self {
        Criteria::Field {
            field: field.into(),
            op,
            value,
        }
    }

    /// Constrain to a category.
    pub fn category(name: impl Into<String>) -> Self {
        Criteria::Category(name.into())
    }

    /// Request a row-count aggregate.
    pub fn count() -> Self {
        Criteria::Aggregate(AggregateFn::CountRows)
    }

    /// Conjoin with another criteria tree, flattening nested ANDs.
    pub fn and(self, other: Criteria) -> Self {
        match self {
            Criteria::And(mut children) => {
                children.push(other);
                Criteria::And(children)
            }
            first => Criteria::And(vec![first, other]),
        }
    }

    /// Disjoin with another criteria tree, flattening nested ORs.
    pub fn or(self, other: Criteria) -> Self {
        match self {
            Criteria::Or(mut children) => {
                children.push(other);
                Criteria::Or(children)
            }
            first => Criteria::Or(vec![first, other]),
        }
    }
}
