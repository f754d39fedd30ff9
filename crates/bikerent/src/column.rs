//! Column allow-lists.
//!
//! Every entity gets a column enum; only its variants can ever be spliced into
//! SQL text. Field names that arrive from a request body are resolved through
//! [`Column::from_name`] and anything not on the list is rejected before a
//! clause is built.

use std::fmt;

/// Shape of the values a column stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Decimal,
    Text,
    Boolean,
    Date,
    Time,
    Timestamp,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ColumnKind::Integer => "integer",
            ColumnKind::Decimal => "decimal",
            ColumnKind::Text => "text",
            ColumnKind::Boolean => "boolean",
            ColumnKind::Date => "date",
            ColumnKind::Time => "time",
            ColumnKind::Timestamp => "timestamp",
        };
        f.write_str(s)
    }
}

/// A column on an entity's allow-list.
pub trait Column: Copy + Eq + fmt::Debug + Send + Sync + 'static {
    /// Every column of the entity, in declaration order.
    const ALL: &'static [Self];

    /// SQL identifier of the column.
    fn name(self) -> &'static str;

    fn kind(self) -> ColumnKind;

    /// Resolve a field name. Matching is exact.
    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.name() == name)
    }
}

/// A table descriptor tying a table name, its key and its column enum together.
pub trait Entity: Send + Sync + 'static {
    type Column: Column;

    const TABLE: &'static str;

    /// Columns that identify a row, one for a plain primary key, more for a composite key.
    const KEY: &'static [Self::Column];
}

/// An entity identified by a single primary-key column.
///
/// Only these entities support the by-id operations; rows of a composite-key
/// table are addressed with a filter naming every key column.
pub trait KeyedEntity: Entity {
    const PRIMARY_KEY: Self::Column;
}

/// Returns true when `name` is a plain lowercase SQL identifier (`[a-z_][a-z0-9_]*`).
pub fn is_plain_ident(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

/// Declare an entity marker type and its column enum.
///
/// ```ignore
/// entity! {
///     /// Registered users.
///     pub struct Users => "Users", primary_key = UserId;
///     pub enum UserColumn {
///         UserId = "user_id": Integer,
///         Email = "email": Text,
///     }
/// }
///
/// entity! {
///     pub struct UsersRole => "UsersRole", composite_key = (UserId, BikeRackId);
///     pub enum UsersRoleColumn { ... }
/// }
/// ```
#[macro_export]
macro_rules! entity {
    (
        @declare
        $(#[$meta:meta])*
        $vis:vis struct $entity:ident => $table:literal, key = ($($key:ident),+);
        $cvis:vis enum $column:ident {
            $($variant:ident = $name:literal : $kind:ident),+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default)]
        $vis struct $entity;

        #[doc = concat!("Columns of the `", $table, "` table.")]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $cvis enum $column {
            $($variant),+
        }

        impl $crate::column::Column for $column {
            const ALL: &'static [Self] = &[$($column::$variant),+];

            fn name(self) -> &'static str {
                match self {
                    $($column::$variant => $name),+
                }
            }

            fn kind(self) -> $crate::column::ColumnKind {
                match self {
                    $($column::$variant => $crate::column::ColumnKind::$kind),+
                }
            }
        }

        impl ::std::fmt::Display for $column {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::column::Column::name(*self))
            }
        }

        impl $crate::column::Entity for $entity {
            type Column = $column;
            const TABLE: &'static str = $table;
            const KEY: &'static [$column] = &[$($column::$key),+];
        }
    };

    (
        $(#[$meta:meta])*
        $vis:vis struct $entity:ident => $table:literal, primary_key = $pk:ident;
        $cvis:vis enum $column:ident {
            $($variant:ident = $name:literal : $kind:ident),+ $(,)?
        }
    ) => {
        $crate::entity! {
            @declare
            $(#[$meta])*
            $vis struct $entity => $table, key = ($pk);
            $cvis enum $column { $($variant = $name : $kind),+ }
        }

        impl $crate::column::KeyedEntity for $entity {
            const PRIMARY_KEY: $column = $column::$pk;
        }
    };

    (
        $(#[$meta:meta])*
        $vis:vis struct $entity:ident => $table:literal, composite_key = ($($key:ident),+ $(,)?);
        $cvis:vis enum $column:ident {
            $($variant:ident = $name:literal : $kind:ident),+ $(,)?
        }
    ) => {
        $crate::entity! {
            @declare
            $(#[$meta])*
            $vis struct $entity => $table, key = ($($key),+);
            $cvis enum $column { $($variant = $name : $kind),+ }
        }
    };
}
