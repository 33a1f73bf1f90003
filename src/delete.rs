use indexmap::IndexSet;

use crate::{
    dialect::DeleteStyle,
    error::{Error, Result},
    expr::cond::{Conditions, Criteria},
    refs::CollectRefs,
    table::TableRef,
    writer::{FormatContext, FormatWriter, Qualify, impl_compile},
};

/// A DELETE from a single table reference.
///
/// The criteria may only mention the deleted reference; anything else fails
/// with [`Error::DeleteSpansTables`] instead of producing a multi-table
/// delete.
#[derive(Debug, Clone)]
pub struct Delete {
    target: TableRef,
    maybe_where: Conditions,
}

impl Delete {
    pub fn from(target: &TableRef) -> Self {
        Self {
            target: target.clone(),
            maybe_where: Conditions::new(),
        }
    }

    pub fn and_where(&mut self, criteria: Criteria) -> &mut Self {
        self.maybe_where.and(criteria);
        self
    }

    pub fn or_where(&mut self, criteria: Criteria) -> &mut Self {
        self.maybe_where.or(criteria);
        self
    }
}

impl FormatWriter for Delete {
    fn format_writer(&self, context: &mut FormatContext<'_>) -> Result<()> {
        let mut tables = IndexSet::new();
        tables.insert(self.target.clone());
        self.maybe_where.collect_table_refs(&mut tables);
        if tables.len() > 1 {
            return Err(Error::DeleteSpansTables {
                count: tables.len(),
            });
        }

        let qualify = match context.dialect.delete_style {
            DeleteStyle::Alias => Qualify::Alias,
            DeleteStyle::TableName => Qualify::TableName,
            DeleteStyle::Bare => Qualify::Bare,
        };
        let aliases = context.assign_aliases(&tables, &IndexSet::new());

        context.nested(aliases, qualify, |context| {
            context.write_clause("DELETE FROM", |context| context.write_table_ref(&self.target))?;
            if let Some(criteria) = self.maybe_where.criteria() {
                context.write_clause("WHERE", |context| criteria.format_writer(context))?;
            }
            Ok(())
        })
    }
}

impl_compile!(Delete, "delete");

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{Bind, Compiler, Dialect, MySql, Select, Sqlite, Standard, Table};

    use super::*;

    fn adults(target: &TableRef) -> Delete {
        let mut delete = Delete::from(target);
        delete.and_where(Criteria::gte(target.column("age").unwrap(), 18_i32));
        delete
    }

    #[test]
    fn test_delete_styles() {
        let employee = Table::new("employee").unwrap().reference();
        let delete = adults(&employee);
        assert_eq!(
            "DELETE FROM\n    employee e\nWHERE\n    e.age >= ?",
            delete.to_sql::<Standard>().unwrap()
        );
        assert_eq!(
            "DELETE FROM\n    `employee`\nWHERE\n    `employee`.`age` >= ?",
            delete.to_sql::<MySql>().unwrap()
        );
        let compiled = delete.compile::<Sqlite>().unwrap();
        assert_eq!("DELETE FROM\n    \"employee\"\nWHERE\n    \"age\" >= ?1", compiled.sql());
        assert_eq!(&[Bind::I32(18)], compiled.binds().as_slice());
    }

    #[test]
    fn test_delete_everything() {
        let employee = Table::new("employee").unwrap().reference();
        let compiled = Delete::from(&employee)
            .compile_with(&Compiler::new(Dialect::STANDARD))
            .unwrap();
        assert_eq!("DELETE FROM\n    employee e", compiled.sql());
        assert!(compiled.binds().is_empty());
    }

    #[test]
    fn test_delete_spanning_tables_fails() {
        let employee = Table::new("employee").unwrap().reference();
        let department = Table::new("department").unwrap().reference();
        let mut delete = Delete::from(&employee);
        delete.and_where(Criteria::eq(
            employee.column("department_id").unwrap(),
            department.column("id").unwrap(),
        ));
        let err = delete.compile::<Standard>().unwrap_err();
        assert!(matches!(err, Error::DeleteSpansTables { count: 2 }));
    }

    #[test]
    fn test_subquery_tables_are_not_counted() {
        let employee = Table::new("employee").unwrap().reference();
        let department = Table::new("department").unwrap().reference();
        let mut closed = Select::new();
        closed.column(department.column("id").unwrap());
        closed.where_eq(department.column("closed").unwrap(), true);

        let mut delete = Delete::from(&employee);
        delete.and_where(Criteria::in_select(employee.column("department_id").unwrap(), closed));
        assert_eq!(
            "DELETE FROM\n    employee e\nWHERE\n    e.department_id IN (\n        SELECT\n            d.id\n        FROM\n            department d\n        WHERE\n            d.closed = ?\n    )",
            delete.to_sql::<Standard>().unwrap()
        );
    }

    #[test]
    fn test_bare_target_in_correlated_subquery() {
        let employee = Table::new("employee").unwrap().reference();
        let payslip = Table::new("payslip").unwrap().reference();
        let mut paid = Select::new();
        paid.column(payslip.column("id").unwrap());
        paid.where_eq(payslip.column("employee_id").unwrap(), employee.column("id").unwrap());

        let mut delete = Delete::from(&employee);
        delete.and_where(Criteria::not_exists(paid));
        let compiled = delete.compile::<Sqlite>().unwrap();
        assert_eq!(
            "DELETE FROM\n    \"employee\"\nWHERE\n    NOT EXISTS (\n        SELECT\n            p.\"id\"\n        FROM\n            \"payslip\" AS p\n        WHERE\n            p.\"employee_id\" = \"employee\".\"id\"\n    )",
            compiled.sql()
        );
        assert!(compiled.binds().is_empty());
    }
}
