use serde::{Deserialize, Serialize};

/// Result-size bound applied when no explicit paging is supplied.
///
/// This single constant serves both as the implicit page size and as the
/// fail-fast threshold for unpaged queries; the two are deliberately not
/// independent knobs.
pub const DEFAULT_PAGE_SIZE: usize = 200;

/// Largest page size an explicit page specification may request.
pub const MAX_PAGE_SIZE: usize = u32::MAX as usize;

/// Explicit pagination request: 1-based page number plus page size.
///
/// Validation (`page_number >= 1`, `1 <= page_size <= MAX_PAGE_SIZE`) is
/// performed by the query executor, so an invalid specification is reported
/// as a query error rather than a construction panic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSpecification {
    /// 1-based page number.
    pub page_number: usize,
    /// Number of records per page.
    pub page_size: usize,
}

impl PageSpecification {
    pub fn new(page_number: usize, page_size: usize) -> Self {
        Self {
            page_number,
            page_size,
        }
    }

    /// Row offset of the first record on this page.
    pub fn offset(&self) -> usize {
        (self.page_number.saturating_sub(1)).saturating_mul(self.page_size)
    }
}

impl Default for PageSpecification {
    fn default() -> Self {
        Self {
            page_number: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Sort direction for one column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// One sort entry: a schema field name plus direction.
///
/// Field names are validated against the compiled schema by the criteria
/// compiler, not here.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortColumn {
    pub field: String,
    pub direction: SortDirection,
}

impl SortColumn {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }
}

/// Ordered list of sort columns; insertion order defines tie-break precedence.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub columns: Vec<SortColumn>,
}

impl Sort {
    /// A sort with no columns (storage order).
    pub fn none() -> Self {
        Self::default()
    }

    /// Sort by a single field.
    pub fn by(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            columns: vec![SortColumn::new(field, direction)],
        }
    }

    /// Append a lower-precedence sort column.
    pub fn then_by(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.columns.push(SortColumn::new(field, direction));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
