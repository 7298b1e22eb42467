use thiserror::Error;

use crate::derive::DbType;

/// Errors raised while validating a model or deriving its relational schema.
///
/// Every variant is fatal to the current run; no partial schema is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeriveError {
    #[error("{entity}.{attribute}: naming override has no column name at index {index}")]
    MissingNamingParameter {
        entity: String,
        attribute: String,
        index: usize,
    },

    #[error("{entity}: column `{column}` is introduced as both `{first}` and `{second}`")]
    ColumnNameConflict {
        entity: String,
        column: String,
        first: String,
        second: String,
    },

    #[error("{entity}: column `{column}` is introduced with types {first} and {second}")]
    ColumnTypeConflict {
        entity: String,
        column: String,
        first: DbType,
        second: DbType,
    },

    #[error("{entity}: member `{name}` is defined more than once, add a naming override")]
    DuplicateMember { entity: String, name: String },

    #[error("{entity}: primary key never terminates ({})", .path.join(" -> "))]
    CyclicPrimaryKey { entity: String, path: Vec<String> },

    #[error(
        "{entity}.{attribute}: second reference to `{target}` needs a naming override"
    )]
    AmbiguousReference {
        entity: String,
        attribute: String,
        target: String,
    },

    #[error("{entity}.{attribute}: referenced entity `{target}` has no primary key")]
    MissingPrimaryKey {
        entity: String,
        attribute: String,
        target: String,
    },

    #[error("{entity}.{attribute}: unknown entity `{target}`")]
    UnknownEntity {
        entity: String,
        attribute: String,
        target: String,
    },

    #[error("{entity}.{attribute}: unknown enum `{target}`")]
    UnknownEnum {
        entity: String,
        attribute: String,
        target: String,
    },
}

pub type Result<T, E = DeriveError> = std::result::Result<T, E>;
