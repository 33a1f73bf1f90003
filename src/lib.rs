//! Composable SQL statements rendered to formatted text plus positional
//! parameters.
//!
//! Statements are built from [`Table`] references and expression trees, then
//! compiled in two passes: every node first reports the tables it mentions,
//! aliases are assigned, and only then is any text written.
//!
//! ```
//! use quill::{Select, Standard, Table};
//!
//! let employee = Table::new("employee")?.reference();
//! let mut select = Select::new();
//! select.column(employee.column("name")?);
//! select.where_lt(employee.column("age")?, 30);
//!
//! let compiled = select.compile::<Standard>()?;
//! assert_eq!(
//!     "SELECT\n    e.name\nFROM\n    employee e\nWHERE\n    e.age < ?",
//!     compiled.sql()
//! );
//! # Ok::<(), quill::Error>(())
//! ```

mod alias;
mod bind;
mod builder;
mod col;
mod delete;
mod dialect;
#[cfg(any(feature = "postgres", feature = "mysql", feature = "sqlite"))]
mod driver;
mod error;
mod expr;
mod ident;
mod insert;
mod literal;
mod paginate;
mod raw;
mod refs;
mod table;
mod update;
mod writer;

pub use alias::{AliasCandidates, AliasPolicy, AliasRegistry, Alphabet, alphabetic, alphabetic_index};
pub use bind::{Array, Bind, Binds, IntoBind, IntoBinds};
pub use builder::Select;
pub use col::{Column, ColumnRef, ResultColumn};
pub use delete::Delete;
pub use dialect::{
    DeleteStyle, Dialect, DistinctSyntax, EmptyInsert, HasDialect, MySql, Placeholder, Postgres,
    Sqlite, Standard, TableAlias,
};
pub use error::{Error, Result};
pub use expr::{
    Expr, IntoExpr,
    between::BetweenOperator,
    binary::Comparison,
    cast::Cast,
    cond::{Conditions, Criteria},
    fncall::{FnCall, func},
    order::Ordering,
    unary::NullCheck,
};
pub use ident::{Ident, IntoIdent};
pub use insert::Insert;
pub use literal::{Date, IntoLiteral, Literal, Time};
pub use paginate::Paginator;
pub use raw::Raw;
pub use table::{Table, TableRef};
pub use update::Update;
pub use writer::{Compiled, Compiler};

/// A bound parameter.
pub fn param<T: IntoBind>(value: T) -> Expr {
    Expr::param(value)
}

/// A value written into the statement text.
pub fn lit<T: IntoLiteral>(value: T) -> Expr {
    Expr::lit(value)
}

pub fn raw<T: Into<smol_str::SmolStr>>(value: T) -> Raw {
    Raw::new(value)
}

pub fn raw_static(value: &'static str) -> Raw {
    Raw::new_static(value)
}

#[cfg(test)]
pub(crate) mod tests {
    use indexmap::IndexSet;

    use crate::{
        alias::AliasPolicy,
        dialect::Dialect,
        error::Result,
        refs::CollectRefs,
        writer::{FormatContext, FormatWriter, OutputBuffer, Qualify, Scope},
    };

    /// Renders a node with nothing in scope.
    pub(crate) fn format_writer<W>(writer: &W, dialect: Dialect) -> Result<String>
    where
        W: FormatWriter + ?Sized,
    {
        let mut buffer = OutputBuffer::new();
        let root = Scope::root();
        let mut context = FormatContext::new(&mut buffer, &dialect, AliasPolicy::default(), &root);
        writer.format_writer(&mut context)?;
        Ok(buffer.render().to_owned())
    }

    /// Renders a node with every table it mentions aliased, the way a select
    /// would.
    pub(crate) fn format_aliased<W>(writer: &W, dialect: Dialect) -> Result<String>
    where
        W: FormatWriter + CollectRefs + ?Sized,
    {
        let mut tables = IndexSet::new();
        writer.collect_table_refs(&mut tables);

        let mut buffer = OutputBuffer::new();
        let root = Scope::root();
        let mut context = FormatContext::new(&mut buffer, &dialect, AliasPolicy::default(), &root);
        let aliases = context.assign_aliases(&tables, &IndexSet::new());
        context.nested(aliases, Qualify::Alias, |context| writer.format_writer(context))?;
        Ok(buffer.render().to_owned())
    }
}
