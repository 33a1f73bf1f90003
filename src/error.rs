//! Error types for quill.

use smol_str::SmolStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A table or column was created with an empty name.
    #[error("identifier must not be empty")]
    EmptyIdentifier,

    #[error("column `{column}` belongs to table `{owner}`, not `{table}`")]
    ForeignColumn {
        column: SmolStr,
        owner: SmolStr,
        table: SmolStr,
    },

    #[error("{statement} requires at least one {what}")]
    Empty {
        statement: &'static str,
        what: &'static str,
    },

    #[error("insert lists {columns} columns but its select produces {values}")]
    ColumnCountMismatch { columns: usize, values: usize },

    /// The identifier cannot be quoted safely with the dialect's quote character.
    #[error("identifier `{ident}` contains the quote character `{quote}`")]
    UnquotableIdentifier { ident: SmolStr, quote: char },

    #[error("table `{0}` is not in scope for this statement")]
    UnresolvedTable(SmolStr),

    #[error("result column {0} is not part of this select")]
    UnresolvedResult(usize),

    #[error("delete criteria reference {count} distinct tables, only the deleted table is allowed")]
    DeleteSpansTables { count: usize },

    #[error("raw sql has {placeholders} placeholders but {binds} bound values")]
    RawBindCount { placeholders: usize, binds: usize },

    #[error("float literal {0} is not finite")]
    NonFiniteLiteral(f64),

    #[error("expected at most one row, got {0}")]
    TooManyRows(usize),

    #[cfg(any(feature = "postgres", feature = "mysql", feature = "sqlite"))]
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Error {
    pub(crate) fn empty(statement: &'static str, what: &'static str) -> Self {
        Self::Empty { statement, what }
    }
}

/// Result type alias for quill operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::empty("update", "assignment");
        assert_eq!(err.to_string(), "update requires at least one assignment");

        let err = Error::UnquotableIdentifier {
            ident: SmolStr::new_static("we\"ird"),
            quote: '"',
        };
        assert_eq!(
            err.to_string(),
            "identifier `we\"ird` contains the quote character `\"`"
        );
    }
}
