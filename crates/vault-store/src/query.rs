use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use vault_types::{SortDirection, StateRecord, StateStatus, TxId};

/// The closed queryable schema of a state record.
///
/// Caller-facing criteria reference fields by name; [`Column::from_name`]
/// is the single place those names are resolved, so an unknown field is a
/// compile-time criteria error rather than a backend failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Column {
    TxId,
    OutputIndex,
    ContractType,
    Status,
    RecordedAt,
    ConsumedAt,
    NotaryName,
    LockId,
    LockUpdatedAt,
}

impl Column {
    /// Resolve a field name against the schema.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "txid" => Some(Column::TxId),
            "output_index" => Some(Column::OutputIndex),
            "contract_type" => Some(Column::ContractType),
            "status" => Some(Column::Status),
            "recorded_at" => Some(Column::RecordedAt),
            "consumed_at" => Some(Column::ConsumedAt),
            "notary_name" => Some(Column::NotaryName),
            "lock_id" => Some(Column::LockId),
            "lock_updated_at" => Some(Column::LockUpdatedAt),
            _ => None,
        }
    }

    /// The canonical field name.
    pub fn name(&self) -> &'static str {
        match self {
            Column::TxId => "txid",
            Column::OutputIndex => "output_index",
            Column::ContractType => "contract_type",
            Column::Status => "status",
            Column::RecordedAt => "recorded_at",
            Column::ConsumedAt => "consumed_at",
            Column::NotaryName => "notary_name",
            Column::LockId => "lock_id",
            Column::LockUpdatedAt => "lock_updated_at",
        }
    }

    /// Extract this column's value from a record. `None` means NULL.
    pub fn value_of(&self, record: &StateRecord) -> Option<Literal> {
        match self {
            Column::TxId => Some(Literal::TxId(record.state_ref.txid)),
            Column::OutputIndex => Some(Literal::Int(record.state_ref.index as i64)),
            Column::ContractType => Some(Literal::Str(record.contract_type.clone())),
            Column::Status => Some(Literal::Status(record.status)),
            Column::RecordedAt => Some(Literal::Time(record.recorded_at)),
            Column::ConsumedAt => record.consumed_at.map(Literal::Time),
            Column::NotaryName => Some(Literal::Str(record.notary.name.clone())),
            Column::LockId => record.lock_id.map(Literal::Uuid),
            Column::LockUpdatedAt => record.lock_updated_at.map(Literal::Time),
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A typed constant a predicate compares a column against.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Literal {
    Str(String),
    Int(i64),
    Time(DateTime<Utc>),
    Status(StateStatus),
    Uuid(Uuid),
    TxId(TxId),
}

impl Literal {
    /// Order two literals of the same kind. Cross-kind comparison has no
    /// ordering (SQL-style: the comparison evaluates to false).
    fn partial_cmp_same_kind(&self, other: &Literal) -> Option<Ordering> {
        match (self, other) {
            (Literal::Str(a), Literal::Str(b)) => Some(a.cmp(b)),
            (Literal::Int(a), Literal::Int(b)) => Some(a.cmp(b)),
            (Literal::Time(a), Literal::Time(b)) => Some(a.cmp(b)),
            (Literal::Uuid(a), Literal::Uuid(b)) => Some(a.cmp(b)),
            (Literal::TxId(a), Literal::TxId(b)) => Some(a.cmp(b)),
            // Statuses are comparable for equality only.
            (Literal::Status(a), Literal::Status(b)) if a == b => Some(Ordering::Equal),
            _ => None,
        }
    }
}

/// Comparison operator for field predicates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompareOp {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

/// Backend-neutral filter tree over state records.
///
/// Evaluation is total: comparing against a NULL column value or a literal
/// of a different kind evaluates to false rather than erroring.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Predicate {
    /// Matches every record.
    True,
    /// Matches nothing (e.g. a category that resolves to zero types).
    False,
    Compare {
        column: Column,
        op: CompareOp,
        value: Literal,
    },
    InSet {
        column: Column,
        values: Vec<Literal>,
    },
    IsNull(Column),
    NotNull(Column),
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
}

impl Predicate {
    /// Equality shorthand.
    pub fn eq(column: Column, value: Literal) -> Self {
        Predicate::Compare {
            column,
            op: CompareOp::Eq,
            value,
        }
    }

    /// Returns `true` if the record satisfies this predicate.
    pub fn matches(&self, record: &StateRecord) -> bool {
        match self {
            Predicate::True => true,
            Predicate::False => false,
            Predicate::Compare { column, op, value } => {
                let actual = match column.value_of(record) {
                    Some(v) => v,
                    None => return false,
                };
                match op {
                    CompareOp::Eq => actual == *value,
                    CompareOp::NotEq => actual != *value,
                    CompareOp::Lt => {
                        matches!(actual.partial_cmp_same_kind(value), Some(Ordering::Less))
                    }
                    CompareOp::LtEq => matches!(
                        actual.partial_cmp_same_kind(value),
                        Some(Ordering::Less | Ordering::Equal)
                    ),
                    CompareOp::Gt => {
                        matches!(actual.partial_cmp_same_kind(value), Some(Ordering::Greater))
                    }
                    CompareOp::GtEq => matches!(
                        actual.partial_cmp_same_kind(value),
                        Some(Ordering::Greater | Ordering::Equal)
                    ),
                }
            }
            Predicate::InSet { column, values } => match column.value_of(record) {
                Some(actual) => values.contains(&actual),
                None => false,
            },
            Predicate::IsNull(column) => column.value_of(record).is_none(),
            Predicate::NotNull(column) => column.value_of(record).is_some(),
            Predicate::And(children) => children.iter().all(|c| c.matches(record)),
            Predicate::Or(children) => children.iter().any(|c| c.matches(record)),
        }
    }
}

/// Statically tagged row shape of one projected result.
///
/// The compiler tags every projection, so the executor partitions result
/// rows on the tag and never inspects runtime types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Projection {
    /// Full state records.
    Records,
    /// Scalar row count over the predicate's matches.
    CountRows,
}

/// One ordering entry of a native query.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    pub column: Column,
    pub direction: SortDirection,
}

impl OrderBy {
    pub fn new(column: Column, direction: SortDirection) -> Self {
        Self { column, direction }
    }

    /// Order two records by this entry. NULLs sort last in ascending order.
    pub fn compare(&self, a: &StateRecord, b: &StateRecord) -> Ordering {
        let va = self.column.value_of(a);
        let vb = self.column.value_of(b);
        let ord = match (va, vb) {
            (Some(x), Some(y)) => x.partial_cmp_same_kind(&y).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        match self.direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    }
}

/// A compiled query in the form the storage collaborator accepts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeQuery {
    /// Tagged projection list; never empty for a well-formed query.
    pub projections: Vec<Projection>,
    pub predicate: Predicate,
    /// Ordering entries in tie-break precedence order.
    pub order_by: Vec<OrderBy>,
    /// Row offset applied to record-shaped results.
    pub offset: usize,
    /// Row limit applied to record-shaped results; `None` means unbounded.
    pub limit: Option<usize>,
}

impl NativeQuery {
    /// Returns `true` if the query projects any record-shaped rows.
    pub fn projects_records(&self) -> bool {
        self.projections.contains(&Projection::Records)
    }

    /// Derive the count-only variant of this query: same predicate, no
    /// ordering, no paging, a single scalar count projection.
    pub fn count_variant(&self) -> NativeQuery {
        NativeQuery {
            projections: vec![Projection::CountRows],
            predicate: self.predicate.clone(),
            order_by: Vec::new(),
            offset: 0,
            limit: None,
        }
    }
}

/// An auxiliary scalar produced by a non-record projection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScalarValue {
    Count(u64),
}

/// One result row, tagged by shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum QueryRow {
    Record(StateRecord),
    Scalar(ScalarValue),
}
