use std::{
    fmt,
    hash::{Hash, Hasher},
    sync::{Arc, PoisonError, RwLock},
};

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::{
    col::{Column, ColumnRef},
    error::Result,
    ident::{Ident, IntoIdent},
};

#[derive(Debug)]
pub(crate) struct TableInner {
    pub(crate) name: Ident,
    columns: RwLock<IndexMap<SmolStr, Column>>,
}

/// A named relation.
///
/// Cloning a `Table` is cheap and keeps its identity: every clone shares the
/// same column cache, so `table.column("id")` returns the same `Column` no
/// matter which clone asks or from which thread.
#[derive(Clone)]
pub struct Table {
    pub(crate) inner: Arc<TableInner>,
}

impl Table {
    pub fn new<T: IntoIdent>(name: T) -> Result<Self> {
        Ok(Self {
            inner: Arc::new(TableInner {
                name: name.into_ident()?,
                columns: RwLock::new(IndexMap::new()),
            }),
        })
    }

    pub fn name(&self) -> &str {
        self.inner.name.as_str()
    }

    /// Returns the cached column with this name, creating it on first use.
    pub fn column<T: IntoIdent>(&self, name: T) -> Result<Column> {
        let name = name.into_ident()?;
        let key = name.to_smol();
        {
            let columns = self.inner.columns.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(column) = columns.get(&key) {
                return Ok(column.clone());
            }
        }
        // another thread may have won the race between the two locks
        let mut columns = self.inner.columns.write().unwrap_or_else(PoisonError::into_inner);
        let column = columns
            .entry(key)
            .or_insert_with(|| Column::new(&self.inner, name))
            .clone();
        Ok(column)
    }

    /// Every column materialized so far, in creation order.
    pub fn columns(&self) -> Vec<Column> {
        let columns = self.inner.columns.read().unwrap_or_else(PoisonError::into_inner);
        columns.values().cloned().collect()
    }

    /// A new usage site of this table, aliased independently of any other.
    pub fn reference(&self) -> TableRef {
        TableRef {
            inner: Arc::new(TableRefInner {
                table: self.clone(),
            }),
        }
    }

    pub(crate) fn owns(&self, column: &Column) -> bool {
        column.is_owned_by(&self.inner)
    }
}

impl PartialEq for Table {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Table {}

impl Hash for Table {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.inner).hash(state);
    }
}

impl fmt::Debug for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Table").field(&self.inner.name.as_str()).finish()
    }
}

#[derive(Debug)]
pub(crate) struct TableRefInner {
    table: Table,
}

/// One usage of a [`Table`] inside a statement.
#[derive(Clone)]
pub struct TableRef {
    inner: Arc<TableRefInner>,
}

impl TableRef {
    pub fn table(&self) -> &Table {
        &self.inner.table
    }

    pub fn name(&self) -> &str {
        self.inner.table.name()
    }

    /// The column `name` of the underlying table, read through this reference.
    pub fn column<T: IntoIdent>(&self, name: T) -> Result<ColumnRef> {
        let column = self.inner.table.column(name)?;
        Ok(ColumnRef::new_unchecked(self.clone(), column))
    }

    /// Reads an existing column through this reference, failing if the
    /// column belongs to another table.
    pub fn col(&self, column: &Column) -> Result<ColumnRef> {
        ColumnRef::new(self.clone(), column.clone())
    }

    /// `alias.*`
    pub fn all(&self) -> crate::Expr {
        crate::Expr::Wildcard(Some(self.clone()))
    }
}

impl PartialEq for TableRef {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for TableRef {}

impl Hash for TableRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.inner).hash(state);
    }
}

impl fmt::Debug for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableRef")
            .field("table", &self.name())
            .field("id", &Arc::as_ptr(&self.inner))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use crate::error::Error;

    use super::*;

    #[test]
    fn test_column_identity_is_cached() {
        let employee = Table::new("employee").unwrap();
        let a = employee.column("name").unwrap();
        let b = employee.clone().column(String::from("name")).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, employee.column("age").unwrap());
        assert_eq!(2, employee.columns().len());
    }

    #[test]
    fn test_empty_names_fail() {
        assert!(matches!(Table::new(""), Err(Error::EmptyIdentifier)));
        let employee = Table::new("employee").unwrap();
        assert!(matches!(employee.column(""), Err(Error::EmptyIdentifier)));
    }

    #[test]
    fn test_references_are_distinct() {
        let employee = Table::new("employee").unwrap();
        let a = employee.reference();
        let b = employee.reference();
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
        assert_eq!(a.table(), b.table());
        assert_eq!(a.column("name").unwrap(), a.column("name").unwrap());
        assert_ne!(a.column("name").unwrap(), b.column("name").unwrap());
    }

    #[test]
    fn test_foreign_column_fails() {
        let employee = Table::new("employee").unwrap();
        let department = Table::new("department").unwrap();
        let name = department.column("name").unwrap();
        let err = employee.reference().col(&name).unwrap_err();
        assert_eq!(
            "column `name` belongs to table `department`, not `employee`",
            err.to_string()
        );
    }

    #[test]
    fn test_concurrent_first_use_agrees() {
        let employee = Table::new("employee").unwrap();
        let columns: Vec<Column> = thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| employee.column("salary").unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert!(columns.windows(2).all(|pair| pair[0] == pair[1]));
        assert_eq!(1, employee.columns().len());
    }
}
