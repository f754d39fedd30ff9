//! Ordered column → value mappings.

use crate::column::{Column, Entity};
use crate::error::{DbError, DbResult};
use crate::value::Value;

/// An ordered sequence of `(column, value)` pairs supplied by a caller.
///
/// Iteration order is insertion order and determines placeholder numbering.
/// Setting a column that is already present replaces its value and keeps its
/// original position.
#[derive(Debug, Clone, PartialEq)]
pub struct Mapping<C: Column> {
    pairs: Vec<(C, Value)>,
}

impl<C: Column> Default for Mapping<C> {
    fn default() -> Self {
        Self { pairs: Vec::new() }
    }
}

impl<C: Column> Mapping<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`Mapping::set`].
    pub fn with(mut self, column: C, value: impl Into<Value>) -> Self {
        self.set(column, value);
        self
    }

    /// Assign `value` to `column`.
    pub fn set(&mut self, column: C, value: impl Into<Value>) -> &mut Self {
        let value = value.into();
        match self.pairs.iter_mut().find(|(c, _)| *c == column) {
            Some((_, slot)) => *slot = value,
            None => self.pairs.push((column, value)),
        }
        self
    }

    pub fn get(&self, column: C) -> Option<&Value> {
        self.pairs
            .iter()
            .find(|(c, _)| *c == column)
            .map(|(_, v)| v)
    }

    pub fn remove(&mut self, column: C) -> Option<Value> {
        let idx = self.pairs.iter().position(|(c, _)| *c == column)?;
        Some(self.pairs.remove(idx).1)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (C, &Value)> + '_ {
        self.pairs.iter().map(|(c, v)| (*c, v))
    }

    pub fn columns(&self) -> impl Iterator<Item = C> + '_ {
        self.pairs.iter().map(|(c, _)| *c)
    }

    /// Values in mapping order.
    pub fn values(&self) -> Vec<Value> {
        self.pairs.iter().map(|(_, v)| v.clone()).collect()
    }

    /// Build a mapping from a decoded request body.
    ///
    /// Every key must resolve to a column of `E` and every value must be a
    /// scalar that fits that column's kind.
    pub fn from_json<E>(object: &serde_json::Map<String, serde_json::Value>) -> DbResult<Self>
    where
        E: Entity<Column = C>,
    {
        let mut mapping = Self::new();
        for (key, raw) in object {
            let column = C::from_name(key).ok_or_else(|| DbError::UnknownColumn {
                table: E::TABLE,
                column: key.clone(),
            })?;
            let value = Value::from_json(raw)
                .ok_or_else(|| DbError::invalid_value(key, "expected a scalar value"))?
                .coerce_to(column.kind());
            value
                .check_kind(column.kind())
                .map_err(|message| DbError::invalid_value(key, message))?;
            mapping.set(column, value);
        }
        Ok(mapping)
    }

    /// Like [`Mapping::from_json`], but accepts any JSON value and requires an object.
    pub fn from_json_value<E>(value: &serde_json::Value) -> DbResult<Self>
    where
        E: Entity<Column = C>,
    {
        match value {
            serde_json::Value::Object(object) => Self::from_json::<E>(object),
            other => Err(DbError::validation(format!(
                "expected a JSON object for {}, got {}",
                E::TABLE,
                other
            ))),
        }
    }
}

impl<C: Column, V: Into<Value>> FromIterator<(C, V)> for Mapping<C> {
    fn from_iter<I: IntoIterator<Item = (C, V)>>(iter: I) -> Self {
        let mut mapping = Self::new();
        for (c, v) in iter {
            mapping.set(c, v);
        }
        mapping
    }
}
