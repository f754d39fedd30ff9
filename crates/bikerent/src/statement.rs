//! Whole statements composed from clauses.
//!
//! Every function here is pure: it returns a [`Statement`] ready to be handed
//! to a [`GenericClient`](crate::GenericClient), it never touches the database.

use crate::clause::{
    build_insert, build_search_clause, build_set_clause, build_where_clause,
    build_where_clause_from,
};
use crate::column::{Column, Entity, KeyedEntity};
use crate::error::DbResult;
use crate::mapping::Mapping;
use crate::value::Value;
use std::fmt;
use tokio_postgres::types::ToSql;

/// Statement category, used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StatementKind::Select => "SELECT",
            StatementKind::Insert => "INSERT",
            StatementKind::Update => "UPDATE",
            StatementKind::Delete => "DELETE",
        };
        f.write_str(s)
    }
}

/// SQL text plus the positional parameters it expects, in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub kind: StatementKind,
    pub sql: String,
    pub params: Vec<Value>,
}

impl Statement {
    fn new(kind: StatementKind, sql: String, params: Vec<Value>) -> Self {
        Self { kind, sql, params }
    }

    /// Get parameter references for tokio-postgres.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params.iter().map(|v| v as &(dyn ToSql + Sync)).collect()
    }
}

/// `SELECT * FROM t`
pub fn select_all<E: Entity>() -> Statement {
    Statement::new(
        StatementKind::Select,
        format!("SELECT * FROM {}", E::TABLE),
        Vec::new(),
    )
}

/// `SELECT * FROM t WHERE c1 = $1 AND ...`
pub fn select_where<E: Entity>(filter: &Mapping<E::Column>) -> DbResult<Statement> {
    let clause = build_where_clause(filter)?;
    Ok(Statement::new(
        StatementKind::Select,
        format!("SELECT * FROM {} WHERE {}", E::TABLE, clause.sql),
        clause.params,
    ))
}

/// `SELECT * FROM t WHERE c1 ILIKE $1 AND c2 = $2 ...`
pub fn search_text<E: Entity>(filter: &Mapping<E::Column>) -> DbResult<Statement> {
    let clause = build_search_clause(filter, 1)?;
    Ok(Statement::new(
        StatementKind::Select,
        format!("SELECT * FROM {} WHERE {}", E::TABLE, clause.sql),
        clause.params,
    ))
}

/// `SELECT * FROM t WHERE pk = $1`
pub fn select_by_id<E: KeyedEntity>(id: impl Into<Value>) -> Statement {
    Statement::new(
        StatementKind::Select,
        format!(
            "SELECT * FROM {} WHERE {} = $1",
            E::TABLE,
            E::PRIMARY_KEY.name()
        ),
        vec![id.into()],
    )
}

/// `INSERT INTO t (c1, ...) VALUES ($1, ...) RETURNING *`
pub fn insert<E: Entity>(row: &Mapping<E::Column>) -> DbResult<Statement> {
    let parts = build_insert(row)?;
    Ok(Statement::new(
        StatementKind::Insert,
        format!(
            "INSERT INTO {} ({}) VALUES ({}) RETURNING *",
            E::TABLE,
            parts.columns_sql(),
            parts.placeholders_sql()
        ),
        parts.params,
    ))
}

/// `UPDATE t SET ... WHERE ... RETURNING *`
///
/// SET placeholders are numbered `1..=N`, WHERE placeholders continue at
/// `N + 1`, and the parameter list is the update values followed by the
/// filter values.
pub fn update_where<E: Entity>(
    update: &Mapping<E::Column>,
    filter: &Mapping<E::Column>,
) -> DbResult<Statement> {
    let set = build_set_clause(update, 1)?;
    let filter = build_where_clause_from(filter, set.next_index())?;
    let sql = format!(
        "UPDATE {} SET {} WHERE {} RETURNING *",
        E::TABLE,
        set.sql,
        filter.sql
    );
    Ok(Statement::new(
        StatementKind::Update,
        sql,
        [set.params, filter.params].concat(),
    ))
}

/// `UPDATE t SET ... WHERE pk = $N+1 RETURNING *`
pub fn update_by_id<E: KeyedEntity>(
    update: &Mapping<E::Column>,
    id: impl Into<Value>,
) -> DbResult<Statement> {
    let filter = Mapping::new().with(E::PRIMARY_KEY, id);
    update_where::<E>(update, &filter)
}

/// `DELETE FROM t WHERE ... RETURNING *`
pub fn delete_where<E: Entity>(filter: &Mapping<E::Column>) -> DbResult<Statement> {
    let clause = build_where_clause(filter)?;
    Ok(Statement::new(
        StatementKind::Delete,
        format!("DELETE FROM {} WHERE {} RETURNING *", E::TABLE, clause.sql),
        clause.params,
    ))
}

/// `DELETE FROM t WHERE pk = $1 RETURNING *`
pub fn delete_by_id<E: KeyedEntity>(id: impl Into<Value>) -> Statement {
    Statement::new(
        StatementKind::Delete,
        format!(
            "DELETE FROM {} WHERE {} = $1 RETURNING *",
            E::TABLE,
            E::PRIMARY_KEY.name()
        ),
        vec![id.into()],
    )
}

/// `DELETE FROM t RETURNING *`
///
/// Matches every row. [`delete_where`] never degrades to this form.
pub fn delete_all<E: Entity>() -> Statement {
    Statement::new(
        StatementKind::Delete,
        format!("DELETE FROM {} RETURNING *", E::TABLE),
        Vec::new(),
    )
}

#[cfg(test)]
mod tests;
