//! Clause builders: turn a [`Mapping`] into a SQL fragment plus positional parameters.
//!
//! Placeholders are numbered while the fragment is built, so a SET clause and
//! a WHERE clause can be composed without renumbering strings afterwards:
//!
//! ```ignore
//! let set = build_set_clause(&update, 1)?;
//! let filter = build_where_clause_from(&filter, set.next_index())?;
//! let sql = format!("UPDATE t SET {} WHERE {}", set.sql, filter.sql);
//! let params = [set.params, filter.params].concat();
//! ```
//!
//! Column names come from the entity's column enum and are the only text
//! spliced into the fragment; values always travel as parameters.

use crate::column::{Column, ColumnKind};
use crate::error::{DbError, DbResult};
use crate::mapping::Mapping;
use crate::value::Value;

/// A generated SQL fragment and the parameters its placeholders refer to.
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    pub sql: String,
    pub params: Vec<Value>,
    start_index: usize,
}

impl Clause {
    /// Index of the first placeholder in this clause.
    pub fn start_index(&self) -> usize {
        self.start_index
    }

    /// Index the next clause should start numbering from.
    pub fn next_index(&self) -> usize {
        self.start_index + self.params.len()
    }

    pub fn param_count(&self) -> usize {
        self.params.len()
    }
}

/// Column list, placeholder list and parameters for an INSERT.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertParts {
    pub columns: Vec<&'static str>,
    pub placeholders: Vec<String>,
    pub params: Vec<Value>,
}

impl InsertParts {
    /// `col1, col2, ...`
    pub fn columns_sql(&self) -> String {
        self.columns.join(", ")
    }

    /// `$1, $2, ...`
    pub fn placeholders_sql(&self) -> String {
        self.placeholders.join(", ")
    }
}

/// `col1 = $1 AND col2 = $2 ...`, numbered from 1.
pub fn build_where_clause<C: Column>(filter: &Mapping<C>) -> DbResult<Clause> {
    build_where_clause_from(filter, 1)
}

/// `col1 = $N AND col2 = $N+1 ...`
pub fn build_where_clause_from<C: Column>(
    filter: &Mapping<C>,
    start_index: usize,
) -> DbResult<Clause> {
    numbered(filter, start_index, " AND ", "build_where_clause", |_| "=")
}

/// `col1 = $N, col2 = $N+1, ...`
pub fn build_set_clause<C: Column>(update: &Mapping<C>, start_index: usize) -> DbResult<Clause> {
    numbered(update, start_index, ", ", "build_set_clause", |_| "=")
}

/// Case-insensitive search: text columns compare with `ILIKE`, every other column with `=`.
///
/// The value is passed through as-is, so callers that want substring matches
/// supply their own `%` wildcards.
pub fn build_search_clause<C: Column>(
    filter: &Mapping<C>,
    start_index: usize,
) -> DbResult<Clause> {
    numbered(filter, start_index, " AND ", "build_search_clause", |column| {
        if column.kind() == ColumnKind::Text { "ILIKE" } else { "=" }
    })
}

/// Columns, placeholders (`$1..$N`) and values for `INSERT INTO t (...) VALUES (...)`.
pub fn build_insert<C: Column>(row: &Mapping<C>) -> DbResult<InsertParts> {
    if row.is_empty() {
        return Err(DbError::empty_mapping("build_insert"));
    }
    let mut parts = InsertParts {
        columns: Vec::with_capacity(row.len()),
        placeholders: Vec::with_capacity(row.len()),
        params: Vec::with_capacity(row.len()),
    };
    for (idx, (column, value)) in row.iter().enumerate() {
        parts.columns.push(column.name());
        parts.placeholders.push(format!("${}", idx + 1));
        parts.params.push(value.clone());
    }
    Ok(parts)
}

fn numbered<C: Column>(
    mapping: &Mapping<C>,
    start_index: usize,
    separator: &str,
    op: &'static str,
    operator: impl Fn(C) -> &'static str,
) -> DbResult<Clause> {
    if mapping.is_empty() {
        return Err(DbError::empty_mapping(op));
    }
    if start_index == 0 {
        return Err(DbError::validation(format!(
            "{op}: placeholder indices start at 1"
        )));
    }

    let mut parts = Vec::with_capacity(mapping.len());
    let mut params = Vec::with_capacity(mapping.len());
    for (offset, (column, value)) in mapping.iter().enumerate() {
        parts.push(format!(
            "{} {} ${}",
            column.name(),
            operator(column),
            start_index + offset
        ));
        params.push(value.clone());
    }

    Ok(Clause {
        sql: parts.join(separator),
        params,
        start_index,
    })
}
