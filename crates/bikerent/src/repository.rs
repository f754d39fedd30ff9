//! Generic CRUD service shared by every entity.
//!
//! A [`Repository`] holds no connection of its own: each method borrows a
//! [`GenericClient`] for the one statement it runs, so the same repository
//! works with a pooled connection, a plain client, or inside a transaction.
//!
//! ```ignore
//! use bikerent::{Mapping, Repository};
//! use bikerent::schema::{UserColumn, Users};
//!
//! let users = Repository::<Users>::new();
//! let update = Mapping::new().with(UserColumn::Phone, "11999998888");
//! let filter = Mapping::new().with(UserColumn::Email, "a@x.com");
//! let rows = users.update_where(&client, &filter, &update).await?;
//! ```

use crate::client::GenericClient;
use crate::column::{Column, Entity, KeyedEntity};
use crate::error::{DbError, DbResult};
use crate::mapping::Mapping;
use crate::statement::{self, Statement};
use crate::value::Value;
use std::fmt;
use std::marker::PhantomData;
use tokio_postgres::Row;

/// CRUD operations over entity `E`.
pub struct Repository<E: Entity> {
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> Default for Repository<E> {
    fn default() -> Self {
        Self {
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> Clone for Repository<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E: Entity> Copy for Repository<E> {}

impl<E: Entity> fmt::Debug for Repository<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Repository")
            .field("table", &E::TABLE)
            .finish()
    }
}

impl<E: Entity> Repository<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// All rows of the table.
    pub async fn list(&self, conn: &impl GenericClient) -> DbResult<Vec<Row>> {
        self.run(conn, "list", statement::select_all::<E>()).await
    }

    /// Rows matching every pair in `filter` by equality.
    pub async fn search(
        &self,
        conn: &impl GenericClient,
        filter: &Mapping<E::Column>,
    ) -> DbResult<Vec<Row>> {
        let stmt = statement::select_where::<E>(filter)?;
        self.run(conn, "search", stmt).await
    }

    /// [`Repository::search`] with a filter decoded from a request body.
    pub async fn search_json(
        &self,
        conn: &impl GenericClient,
        body: &serde_json::Value,
    ) -> DbResult<Vec<Row>> {
        let filter = Mapping::from_json_value::<E>(body)?;
        self.search(conn, &filter).await
    }

    /// Case-insensitive search: text values match with `ILIKE`.
    pub async fn search_text(
        &self,
        conn: &impl GenericClient,
        filter: &Mapping<E::Column>,
    ) -> DbResult<Vec<Row>> {
        let stmt = statement::search_text::<E>(filter)?;
        self.run(conn, "search_text", stmt).await
    }

    /// Insert `row` and return the stored row.
    pub async fn insert(
        &self,
        conn: &impl GenericClient,
        row: &Mapping<E::Column>,
    ) -> DbResult<Row> {
        let stmt = statement::insert::<E>(row)?;
        let rows = self.run(conn, "insert", stmt).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| DbError::not_found(format!("INSERT INTO {} returned no row", E::TABLE)))
    }

    /// Update every row matching `filter`; returns the updated rows.
    pub async fn update_where(
        &self,
        conn: &impl GenericClient,
        filter: &Mapping<E::Column>,
        update: &Mapping<E::Column>,
    ) -> DbResult<Vec<Row>> {
        let stmt = statement::update_where::<E>(update, filter)?;
        self.run(conn, "update_where", stmt).await
    }

    /// [`Repository::update_where`] with both mappings decoded from request bodies.
    pub async fn update_where_json(
        &self,
        conn: &impl GenericClient,
        filter: &serde_json::Value,
        update: &serde_json::Value,
    ) -> DbResult<Vec<Row>> {
        let filter = Mapping::from_json_value::<E>(filter)?;
        let update = Mapping::from_json_value::<E>(update)?;
        self.update_where(conn, &filter, &update).await
    }

    /// Delete every row matching `filter`; returns the deleted rows.
    pub async fn delete_where(
        &self,
        conn: &impl GenericClient,
        filter: &Mapping<E::Column>,
    ) -> DbResult<Vec<Row>> {
        let stmt = statement::delete_where::<E>(filter)?;
        self.run(conn, "delete_where", stmt).await
    }

    /// [`Repository::delete_where`] with a filter decoded from a request body.
    pub async fn delete_where_json(
        &self,
        conn: &impl GenericClient,
        body: &serde_json::Value,
    ) -> DbResult<Vec<Row>> {
        let filter = Mapping::from_json_value::<E>(body)?;
        self.delete_where(conn, &filter).await
    }

    /// Delete every row of the table; returns the deleted rows.
    pub async fn delete_all(&self, conn: &impl GenericClient) -> DbResult<Vec<Row>> {
        self.run(conn, "delete_all", statement::delete_all::<E>())
            .await
    }

    async fn run(
        &self,
        conn: &impl GenericClient,
        op: &'static str,
        stmt: Statement,
    ) -> DbResult<Vec<Row>> {
        tracing::debug!(
            target: "bikerent.sql",
            table = E::TABLE,
            op,
            kind = %stmt.kind,
            param_count = stmt.params.len(),
            sql = %stmt.sql,
            "executing statement"
        );

        let result = conn.query(&stmt.sql, &stmt.params_ref()).await;
        match &result {
            Ok(rows) => tracing::trace!(
                target: "bikerent.sql",
                table = E::TABLE,
                op,
                rows = rows.len(),
                "statement finished"
            ),
            Err(e) => tracing::debug!(
                target: "bikerent.sql",
                table = E::TABLE,
                op,
                error = %e,
                "statement failed"
            ),
        }
        result
    }
}

/// By-id operations, available on entities with a single-column primary key.
impl<E: KeyedEntity> Repository<E> {
    /// The row with primary key `id`, or `DbError::NotFound`.
    pub async fn get(&self, conn: &impl GenericClient, id: impl Into<Value>) -> DbResult<Row> {
        let id = id.into();
        let rows = self
            .run(conn, "get", statement::select_by_id::<E>(id.clone()))
            .await?;
        rows.into_iter().next().ok_or_else(|| {
            DbError::not_found(format!(
                "{} with {} = {}",
                E::TABLE,
                E::PRIMARY_KEY.name(),
                id
            ))
        })
    }

    /// Update the row with primary key `id`; returns the updated rows.
    pub async fn update(
        &self,
        conn: &impl GenericClient,
        id: impl Into<Value>,
        update: &Mapping<E::Column>,
    ) -> DbResult<Vec<Row>> {
        let stmt = statement::update_by_id::<E>(update, id)?;
        self.run(conn, "update", stmt).await
    }

    /// Delete the row with primary key `id`; returns the deleted rows.
    pub async fn delete(
        &self,
        conn: &impl GenericClient,
        id: impl Into<Value>,
    ) -> DbResult<Vec<Row>> {
        self.run(conn, "delete", statement::delete_by_id::<E>(id))
            .await
    }
}
