use std::{
    fmt,
    hash::{Hash, Hasher},
    sync::{Arc, Weak},
};

use crate::{
    error::{Error, Result},
    expr::Expr,
    ident::Ident,
    table::{TableInner, TableRef},
};

#[derive(Debug)]
struct ColumnInner {
    table: Weak<TableInner>,
    table_name: Ident,
    name: Ident,
}

/// A column of a [`crate::Table`], cached by its owner.
#[derive(Clone)]
pub struct Column {
    inner: Arc<ColumnInner>,
}

impl Column {
    pub(crate) fn new(table: &Arc<TableInner>, name: Ident) -> Self {
        Self {
            inner: Arc::new(ColumnInner {
                table: Arc::downgrade(table),
                table_name: table.name.clone(),
                name,
            }),
        }
    }

    pub fn name(&self) -> &str {
        self.inner.name.as_str()
    }

    pub fn table_name(&self) -> &str {
        self.inner.table_name.as_str()
    }

    pub(crate) fn is_owned_by(&self, table: &Arc<TableInner>) -> bool {
        std::ptr::eq(self.inner.table.as_ptr(), Arc::as_ptr(table))
    }
}

impl PartialEq for Column {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Column {}

impl Hash for Column {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.inner).hash(state);
    }
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Column({}.{})", self.table_name(), self.name())
    }
}

/// A column read through a specific [`TableRef`].
///
/// Two column references are equal when they pair the same table reference
/// with the same column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnRef {
    table_ref: TableRef,
    column: Column,
}

impl ColumnRef {
    pub(crate) fn new(table_ref: TableRef, column: Column) -> Result<Self> {
        if !table_ref.table().owns(&column) {
            return Err(Error::ForeignColumn {
                column: column.inner.name.to_smol(),
                owner: column.inner.table_name.to_smol(),
                table: table_ref.table().inner.name.to_smol(),
            });
        }
        Ok(Self::new_unchecked(table_ref, column))
    }

    pub(crate) fn new_unchecked(table_ref: TableRef, column: Column) -> Self {
        Self { table_ref, column }
    }

    pub fn table_ref(&self) -> &TableRef {
        &self.table_ref
    }

    pub fn column(&self) -> &Column {
        &self.column
    }

    pub fn name(&self) -> &str {
        self.column.name()
    }
}

#[derive(Debug)]
struct ResultInner {
    expr: Expr,
    index: usize,
}

/// An entry of a select list.
///
/// The 1-based `index` is fixed when the column is added and is the position
/// a driver reads the value back from.
#[derive(Clone)]
pub struct ResultColumn {
    inner: Arc<ResultInner>,
}

impl ResultColumn {
    pub(crate) fn new(expr: Expr, index: usize) -> Self {
        Self {
            inner: Arc::new(ResultInner { expr, index }),
        }
    }

    pub fn index(&self) -> usize {
        self.inner.index
    }

    pub fn expr(&self) -> &Expr {
        &self.inner.expr
    }

    pub(crate) fn alias_hint(&self) -> Option<&str> {
        self.inner.expr.name_hint()
    }

    /// Decodes this column from a row returned for the compiled select.
    #[cfg(any(feature = "postgres", feature = "mysql", feature = "sqlite"))]
    pub fn get<'r, R, T>(&self, row: &'r R) -> std::result::Result<T, sqlx::Error>
    where
        R: sqlx::Row,
        usize: sqlx::ColumnIndex<R>,
        T: sqlx::Decode<'r, R::Database> + sqlx::Type<R::Database>,
    {
        row.try_get(self.index() - 1)
    }
}

impl PartialEq for ResultColumn {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for ResultColumn {}

impl Hash for ResultColumn {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.inner).hash(state);
    }
}

impl fmt::Debug for ResultColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultColumn")
            .field("index", &self.inner.index)
            .field("expr", &self.inner.expr)
            .finish()
    }
}
