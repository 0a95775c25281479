use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::trace;

use vault_registry::Resolution;
use vault_store::{Column, Literal, NativeQuery, OrderBy, Predicate, Projection};
use vault_types::{Sort, StateStatus, ROOT_CATEGORY};

use crate::criteria::{AggregateFn, Criteria};
use crate::error::{CriteriaError, CriteriaResult};

/// The result of lowering a criteria tree: everything the executor needs to
/// build native queries, plus the resolved concrete-type set the feed
/// composer filters live updates with.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledQuery {
    /// Tagged projection list; never empty.
    pub projections: Vec<Projection>,
    pub predicate: Predicate,
    /// Ordering entries in tie-break precedence order.
    pub order_by: Vec<OrderBy>,
    /// Concrete state types the compiled predicate can match. Empty when the
    /// query is unsatisfiable.
    pub state_types: BTreeSet<String>,
}

impl CompiledQuery {
    /// Returns `true` if the query projects no record rows.
    ///
    /// Aggregate-only queries never paginate.
    pub fn is_aggregate_only(&self) -> bool {
        !self.projections.contains(&Projection::Records)
    }

    /// Build the native query for a given paging window.
    pub fn to_native(&self, offset: usize, limit: Option<usize>) -> NativeQuery {
        NativeQuery {
            projections: self.projections.clone(),
            predicate: self.predicate.clone(),
            order_by: self.order_by.clone(),
            offset,
            limit,
        }
    }
}

/// Compile a criteria tree against a target category.
///
/// The target category and any `Category` leaves are expanded through the
/// per-call [`Resolution`] into concrete-type filters; a category resolving
/// to zero concrete types compiles to an unsatisfiable predicate, not an
/// error. Sort entries are lowered in supplied order.
pub fn compile(
    criteria: &Criteria,
    sort: &Sort,
    target_category: &str,
    resolution: &Resolution,
) -> CriteriaResult<CompiledQuery> {
    let mut lowering = Lowering::default();
    let criteria_predicate = lowering.lower(criteria, resolution, false)?;

    let state_types = resolution.expand(target_category);
    let target_predicate = if target_category == ROOT_CATEGORY {
        Predicate::True
    } else {
        type_filter(&state_types)
    };

    let predicate = and_of(vec![target_predicate, criteria_predicate]);

    let mut projections = Vec::new();
    if !lowering.aggregate_only() {
        projections.push(Projection::Records);
    }
    for aggregate in &lowering.aggregates {
        match aggregate {
            AggregateFn::CountRows => projections.push(Projection::CountRows),
        }
    }

    let mut order_by = Vec::with_capacity(sort.columns.len());
    for column in &sort.columns {
        let resolved = Column::from_name(&column.field)
            .ok_or_else(|| CriteriaError::UnknownField(column.field.clone()))?;
        order_by.push(OrderBy::new(resolved, column.direction));
    }

    trace!(
        target = target_category,
        types = state_types.len(),
        projections = projections.len(),
        "criteria compiled"
    );

    Ok(CompiledQuery {
        projections,
        predicate,
        order_by,
        state_types,
    })
}

#[derive(Default)]
struct Lowering {
    aggregates: Vec<AggregateFn>,
    plain_leaves: usize,
}

impl Lowering {
    /// A query is aggregate-only when it requests aggregates and constrains
    /// nothing else.
    fn aggregate_only(&self) -> bool {
        !self.aggregates.is_empty() && self.plain_leaves == 0
    }

    fn lower(
        &mut self,
        criteria: &Criteria,
        resolution: &Resolution,
        in_disjunction: bool,
    ) -> CriteriaResult<Predicate> {
        match criteria {
            Criteria::Status(StateStatus::All) => {
                self.plain_leaves += 1;
                Ok(Predicate::True)
            }
            Criteria::Status(status) => {
                self.plain_leaves += 1;
                Ok(Predicate::eq(Column::Status, Literal::Status(*status)))
            }
            Criteria::Field { field, op, value } => {
                self.plain_leaves += 1;
                let column = Column::from_name(field)
                    .ok_or_else(|| CriteriaError::UnknownField(field.clone()))?;
                Ok(Predicate::Compare {
                    column,
                    op: *op,
                    value: value.clone(),
                })
            }
            Criteria::Category(name) => {
                self.plain_leaves += 1;
                Ok(type_filter(&resolution.expand(name)))
            }
            Criteria::Aggregate(aggregate) => {
                if in_disjunction {
                    return Err(CriteriaError::AggregateInDisjunction);
                }
                self.aggregates.push(*aggregate);
                Ok(Predicate::True)
            }
            Criteria::And(children) => {
                let lowered = children
                    .iter()
                    .map(|c| self.lower(c, resolution, in_disjunction))
                    .collect::<CriteriaResult<Vec<_>>>()?;
                Ok(and_of(lowered))
            }
            Criteria::Or(children) => {
                let lowered = children
                    .iter()
                    .map(|c| self.lower(c, resolution, true))
                    .collect::<CriteriaResult<Vec<_>>>()?;
                Ok(or_of(lowered))
            }
        }
    }
}

/// Concrete-type membership filter; empty set is unsatisfiable.
fn type_filter(types: &BTreeSet<String>) -> Predicate {
    if types.is_empty() {
        return Predicate::False;
    }
    Predicate::InSet {
        column: Column::ContractType,
        values: types.iter().cloned().map(Literal::Str).collect(),
    }
}

/// Short-circuit-safe conjunction: drops `True`, collapses on `False`.
fn and_of(children: Vec<Predicate>) -> Predicate {
    let mut out = Vec::new();
    for child in children {
        match child {
            Predicate::True => {}
            Predicate::False => return Predicate::False,
            Predicate::And(inner) => out.extend(inner),
            other => out.push(other),
        }
    }
    match out.len() {
        0 => Predicate::True,
        1 => out.remove(0),
        _ => Predicate::And(out),
    }
}

/// Short-circuit-safe disjunction: drops `False`, collapses on `True`.
fn or_of(children: Vec<Predicate>) -> Predicate {
    let mut out = Vec::new();
    for child in children {
        match child {
            Predicate::False => {}
            Predicate::True => return Predicate::True,
            Predicate::Or(inner) => out.extend(inner),
            other => out.push(other),
        }
    }
    match out.len() {
        0 => Predicate::False,
        1 => out.remove(0),
        _ => Predicate::Or(out),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use vault_registry::{resolve, StaticDescriptorSource};
    use vault_store::CompareOp;
    use vault_types::{Notary, SerializedState, SortDirection, StateRecord, StateRef, TxId};

    fn resolution() -> Resolution {
        let source = StaticDescriptorSource::new()
            .with_type("com.example.Cash", &["FungibleAsset"])
            .with_type("com.example.Tokens", &["FungibleAsset"])
            .with_type("com.example.Deed", &["NonFungibleAsset"])
            .with_type("FungibleAsset", &[ROOT_CATEGORY])
            .with_type("NonFungibleAsset", &[ROOT_CATEGORY]);
        resolve(
            &source,
            &[
                "com.example.Cash".to_string(),
                "com.example.Tokens".to_string(),
                "com.example.Deed".to_string(),
            ],
        )
    }

    fn record(contract_type: &str, index: u32) -> StateRecord {
        StateRecord::new_unconsumed(
            StateRef::new(TxId::from_bytes(contract_type.as_bytes()), index),
            SerializedState::from_bytes(vec![]),
            contract_type,
            Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap(),
            Notary::new("notary-a", [1u8; 32]),
        )
    }

    #[test]
    fn abstract_category_expands_to_type_filter() {
        let compiled = compile(
            &Criteria::unconsumed(),
            &Sort::none(),
            "FungibleAsset",
            &resolution(),
        )
        .unwrap();

        assert!(compiled.predicate.matches(&record("com.example.Cash", 0)));
        assert!(compiled.predicate.matches(&record("com.example.Tokens", 0)));
        assert!(!compiled.predicate.matches(&record("com.example.Deed", 0)));
        assert_eq!(
            compiled.state_types,
            ["com.example.Cash", "com.example.Tokens"]
                .into_iter()
                .map(String::from)
                .collect()
        );
    }

    #[test]
    fn root_category_matches_all_types() {
        let compiled = compile(
            &Criteria::all(),
            &Sort::none(),
            ROOT_CATEGORY,
            &resolution(),
        )
        .unwrap();
        assert_eq!(compiled.predicate, Predicate::True);
        assert_eq!(compiled.state_types.len(), 3);
    }

    #[test]
    fn unresolvable_category_is_unsatisfiable_not_an_error() {
        let compiled = compile(
            &Criteria::unconsumed(),
            &Sort::none(),
            "NoSuchCategory",
            &resolution(),
        )
        .unwrap();
        assert_eq!(compiled.predicate, Predicate::False);
        assert!(compiled.state_types.is_empty());
    }

    #[test]
    fn concrete_target_category_matches_itself() {
        let compiled = compile(
            &Criteria::all(),
            &Sort::none(),
            "com.example.Deed",
            &resolution(),
        )
        .unwrap();
        assert!(compiled.predicate.matches(&record("com.example.Deed", 0)));
        assert!(!compiled.predicate.matches(&record("com.example.Cash", 0)));
    }

    #[test]
    fn unknown_field_is_a_compile_error() {
        let err = compile(
            &Criteria::field("no_such_field", CompareOp::Eq, Literal::Int(1)),
            &Sort::none(),
            ROOT_CATEGORY,
            &resolution(),
        )
        .unwrap_err();
        assert_eq!(err, CriteriaError::UnknownField("no_such_field".into()));
    }

    #[test]
    fn unknown_sort_field_is_a_compile_error() {
        let err = compile(
            &Criteria::all(),
            &Sort::by("bogus", SortDirection::Ascending),
            ROOT_CATEGORY,
            &resolution(),
        )
        .unwrap_err();
        assert_eq!(err, CriteriaError::UnknownField("bogus".into()));
    }

    #[test]
    fn sort_order_preserves_precedence() {
        let sort = Sort::by("recorded_at", SortDirection::Descending)
            .then_by("output_index", SortDirection::Ascending);
        let compiled = compile(&Criteria::all(), &sort, ROOT_CATEGORY, &resolution()).unwrap();
        assert_eq!(
            compiled.order_by,
            vec![
                OrderBy::new(Column::RecordedAt, SortDirection::Descending),
                OrderBy::new(Column::OutputIndex, SortDirection::Ascending),
            ]
        );
    }

    #[test]
    fn aggregate_only_query_has_no_record_projection() {
        let compiled = compile(
            &Criteria::count(),
            &Sort::none(),
            ROOT_CATEGORY,
            &resolution(),
        )
        .unwrap();
        assert_eq!(compiled.projections, vec![Projection::CountRows]);
        assert!(compiled.is_aggregate_only());
    }

    #[test]
    fn mixed_query_projects_records_then_aggregates() {
        let compiled = compile(
            &Criteria::unconsumed().and(Criteria::count()),
            &Sort::none(),
            ROOT_CATEGORY,
            &resolution(),
        )
        .unwrap();
        assert_eq!(
            compiled.projections,
            vec![Projection::Records, Projection::CountRows]
        );
        assert!(!compiled.is_aggregate_only());
    }

    #[test]
    fn aggregate_inside_or_is_rejected() {
        let err = compile(
            &Criteria::unconsumed().or(Criteria::count()),
            &Sort::none(),
            ROOT_CATEGORY,
            &resolution(),
        )
        .unwrap_err();
        assert_eq!(err, CriteriaError::AggregateInDisjunction);
    }

    #[test]
    fn and_or_lowering_simplifies_noise() {
        // `All` status leaves lower to True and vanish from the conjunction.
        let compiled = compile(
            &Criteria::all().and(Criteria::unconsumed()),
            &Sort::none(),
            ROOT_CATEGORY,
            &resolution(),
        )
        .unwrap();
        assert_eq!(
            compiled.predicate,
            Predicate::eq(Column::Status, Literal::Status(StateStatus::Unconsumed))
        );
    }

    #[test]
    fn disjunction_of_categories_matches_union() {
        let criteria = Criteria::category("FungibleAsset").or(Criteria::category("NonFungibleAsset"));
        let compiled =
            compile(&criteria, &Sort::none(), ROOT_CATEGORY, &resolution()).unwrap();

        for t in ["com.example.Cash", "com.example.Tokens", "com.example.Deed"] {
            assert!(compiled.predicate.matches(&record(t, 0)), "{t} should match");
        }
        assert!(!compiled.predicate.matches(&record("com.example.Other", 0)));
    }

    #[test]
    fn compiled_projection_list_is_never_empty() {
        let compiled = compile(
            &Criteria::all(),
            &Sort::none(),
            ROOT_CATEGORY,
            &resolution(),
        )
        .unwrap();
        assert!(!compiled.projections.is_empty());
    }
}
