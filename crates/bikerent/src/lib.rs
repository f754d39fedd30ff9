//! # bikerent
//!
//! Data access for the bike-rental platform: typed column allow-lists, a
//! dynamic-filter query builder, and a generic CRUD repository per entity.
//!
//! ## Features
//!
//! - **Typed filters**: a filter or update is a [`Mapping`] of entity columns to
//!   scalar [`Value`]s; request bodies are checked against the allow-list by
//!   [`Mapping::from_json`]
//! - **Positional parameters**: clause builders number `$1..$N` as they go, and
//!   a SET clause composes with a trailing WHERE clause without renumbering
//! - **Safe defaults**: an empty filter is an error, never a bare `WHERE`
//! - **Transaction-friendly**: repositories take any [`GenericClient`]
//!
//! ## Query Builder
//!
//! ```ignore
//! use bikerent::clause::{build_set_clause, build_where_clause_from};
//! use bikerent::schema::UserColumn;
//! use bikerent::Mapping;
//!
//! let update = Mapping::new().with(UserColumn::Name, "Bob");
//! let filter = Mapping::new().with(UserColumn::UserId, 5);
//!
//! let set = build_set_clause(&update, 1)?;                       // "name = $1"
//! let filter = build_where_clause_from(&filter, set.next_index())?; // "user_id = $2"
//! ```

pub mod clause;
pub mod client;
pub mod column;
pub mod config;
pub mod error;
pub mod mapping;
pub mod repository;
pub mod schema;
pub mod statement;
pub mod value;

pub use clause::{
    Clause, InsertParts, build_insert, build_search_clause, build_set_clause,
    build_where_clause, build_where_clause_from,
};
pub use client::GenericClient;
pub use column::{Column, ColumnKind, Entity, KeyedEntity};
pub use config::DatabaseConfig;
pub use error::{DbError, DbResult};
pub use mapping::Mapping;
pub use repository::Repository;
pub use statement::{Statement, StatementKind};
pub use value::Value;

#[cfg(feature = "pool")]
pub mod pool;

#[cfg(feature = "pool")]
pub use pool::{create_pool, create_pool_with_tls};
