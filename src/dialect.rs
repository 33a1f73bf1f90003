/// How bound parameters are spelled in the rendered text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    /// `?` for every parameter.
    Anonymous,
    /// `$1`, `$2`, ...
    Dollar,
    /// `?1`, `?2`, ...
    NumberedQuestion,
}

/// Spelling of `IS [NOT] DISTINCT FROM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistinctSyntax {
    /// `a IS DISTINCT FROM b`
    Standard,
    /// `NOT (a <=> b)`
    NullSafeEquals,
    /// `a IS NOT b`
    Is,
}

/// Spelling of an insert without any column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyInsert {
    /// `INSERT INTO t DEFAULT VALUES`
    DefaultValues,
    /// `INSERT INTO t () VALUES ()`
    EmptyValues,
}

/// How a table reference is followed by its alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableAlias {
    /// `employee e`
    Space,
    /// `employee AS e`, required by SQLite's `UPDATE`.
    As,
}

/// How a delete names its table and qualifies its columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteStyle {
    /// `DELETE FROM employee e WHERE e.age > ?`
    Alias,
    /// `DELETE FROM employee WHERE employee.age > ?`
    TableName,
    /// `DELETE FROM employee WHERE age > ?`
    Bare,
}

/// The per-database syntax table consumed while rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialect {
    pub table_quote: Option<char>,
    pub alias_quote: Option<char>,
    pub column_quote: Option<char>,
    pub result_quote: Option<char>,
    pub placeholder: Placeholder,
    pub distinct: DistinctSyntax,
    pub empty_insert: EmptyInsert,
    pub delete_style: DeleteStyle,
    pub table_alias: TableAlias,
}

impl Dialect {
    /// Unquoted identifiers and anonymous placeholders.
    pub const STANDARD: Dialect = Dialect {
        table_quote: None,
        alias_quote: None,
        column_quote: None,
        result_quote: None,
        placeholder: Placeholder::Anonymous,
        distinct: DistinctSyntax::Standard,
        empty_insert: EmptyInsert::DefaultValues,
        delete_style: DeleteStyle::Alias,
        table_alias: TableAlias::Space,
    };

    pub const POSTGRES: Dialect = Dialect {
        table_quote: Some('"'),
        alias_quote: None,
        column_quote: Some('"'),
        result_quote: Some('"'),
        placeholder: Placeholder::Dollar,
        distinct: DistinctSyntax::Standard,
        empty_insert: EmptyInsert::DefaultValues,
        delete_style: DeleteStyle::Alias,
        table_alias: TableAlias::Space,
    };

    pub const MYSQL: Dialect = Dialect {
        table_quote: Some('`'),
        alias_quote: None,
        column_quote: Some('`'),
        result_quote: Some('`'),
        placeholder: Placeholder::Anonymous,
        distinct: DistinctSyntax::NullSafeEquals,
        empty_insert: EmptyInsert::EmptyValues,
        delete_style: DeleteStyle::TableName,
        table_alias: TableAlias::Space,
    };

    pub const SQLITE: Dialect = Dialect {
        table_quote: Some('"'),
        alias_quote: None,
        column_quote: Some('"'),
        result_quote: Some('"'),
        placeholder: Placeholder::NumberedQuestion,
        distinct: DistinctSyntax::Is,
        empty_insert: EmptyInsert::DefaultValues,
        delete_style: DeleteStyle::Bare,
        table_alias: TableAlias::As,
    };
}

impl Default for Dialect {
    fn default() -> Self {
        Self::STANDARD
    }
}

pub trait HasDialect {
    const DIALECT: Dialect;
}

pub struct Standard;

impl HasDialect for Standard {
    const DIALECT: Dialect = Dialect::STANDARD;
}

pub struct Postgres;

impl HasDialect for Postgres {
    const DIALECT: Dialect = Dialect::POSTGRES;
}

pub struct MySql;

impl HasDialect for MySql {
    const DIALECT: Dialect = Dialect::MYSQL;
}

pub struct Sqlite;

impl HasDialect for Sqlite {
    const DIALECT: Dialect = Dialect::SQLITE;
}

#[cfg(feature = "postgres")]
impl HasDialect for sqlx::Postgres {
    const DIALECT: Dialect = Dialect::POSTGRES;
}

#[cfg(feature = "mysql")]
impl HasDialect for sqlx::MySql {
    const DIALECT: Dialect = Dialect::MYSQL;
}

#[cfg(feature = "sqlite")]
impl HasDialect for sqlx::Sqlite {
    const DIALECT: Dialect = Dialect::SQLITE;
}
