use indexmap::IndexSet;

use crate::{
    builder::Select,
    error::Result,
    refs::CollectRefs,
    table::TableRef,
    writer::{FormatContext, FormatWriter},
};

use super::{Expr, sub};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InOperator {
    In,
    NotIn,
}

impl FormatWriter for InOperator {
    fn format_writer(&self, context: &mut FormatContext<'_>) -> Result<()> {
        context.write(match self {
            InOperator::In => "IN",
            InOperator::NotIn => "NOT IN",
        });
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub enum InSource {
    List(Vec<Expr>),
    Select(Box<Select>),
}

#[derive(Debug, Clone)]
pub struct InCondition {
    pub(crate) operator: InOperator,
    pub(crate) lhs: Expr,
    pub(crate) rhs: InSource,
}

impl FormatWriter for InCondition {
    fn format_writer(&self, context: &mut FormatContext<'_>) -> Result<()> {
        if let InSource::List(values) = &self.rhs {
            // nothing can match an empty list, so every row passes NOT IN
            if values.is_empty() {
                context.write(match self.operator {
                    InOperator::In => "0 = 1",
                    InOperator::NotIn => "1 = 1",
                });
                return Ok(());
            }
        }

        self.lhs.format_writer(context)?;
        context.write(" ");
        self.operator.format_writer(context)?;
        context.write(" ");
        match &self.rhs {
            InSource::List(values) => {
                context.write("(");
                for (index, value) in values.iter().enumerate() {
                    if index > 0 {
                        context.write(", ");
                    }
                    value.format_writer(context)?;
                }
                context.write(")");
                Ok(())
            }
            InSource::Select(select) => sub::write_subquery(context, select),
        }
    }
}

impl CollectRefs for InCondition {
    fn collect_table_refs(&self, refs: &mut IndexSet<TableRef>) {
        self.lhs.collect_table_refs(refs);
        if let InSource::List(values) = &self.rhs {
            values.collect_table_refs(refs);
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{Criteria, Dialect, Select, Table, tests::format_aliased};

    #[test]
    fn test_in_list() {
        let employee = Table::new("employee").unwrap().reference();
        let id = employee.column("id").unwrap();
        let criteria = Criteria::is_in(&id, [1_i32, 2, 3]);
        assert_eq!(
            "e.\"id\" IN ($1, $2, $3)",
            format_aliased(&criteria, Dialect::POSTGRES).unwrap()
        );
        let criteria = Criteria::not_in(&id, [4_i32]);
        assert_eq!("e.id NOT IN (?)", format_aliased(&criteria, Dialect::STANDARD).unwrap());
    }

    #[test]
    fn test_empty_list_is_constant() {
        let employee = Table::new("employee").unwrap().reference();
        let id = employee.column("id").unwrap();
        let criteria = Criteria::is_in(&id, Vec::<i32>::new());
        assert_eq!("0 = 1", format_aliased(&criteria, Dialect::STANDARD).unwrap());
        let criteria = Criteria::not_in(&id, Vec::<i32>::new());
        assert_eq!("1 = 1", format_aliased(&criteria, Dialect::STANDARD).unwrap());
    }

    #[test]
    fn test_in_select() {
        let employee = Table::new("employee").unwrap().reference();
        let department = Table::new("department").unwrap().reference();
        let mut select = Select::new();
        select.column(department.column("id").unwrap());
        select.where_eq(department.column("active").unwrap(), true);

        let criteria = Criteria::in_select(employee.column("department_id").unwrap(), select);
        assert_eq!(
            "e.department_id IN (\n    SELECT\n        d.id\n    FROM\n        department d\n    WHERE\n        d.active = ?\n)",
            format_aliased(&criteria, Dialect::STANDARD).unwrap()
        );
    }
}
