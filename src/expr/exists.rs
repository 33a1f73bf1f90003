use crate::{
    builder::Select,
    error::Result,
    writer::{FormatContext, FormatWriter},
};

use super::sub;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExistsOperator {
    Exists,
    NotExists,
}

impl FormatWriter for ExistsOperator {
    fn format_writer(&self, context: &mut FormatContext<'_>) -> Result<()> {
        context.write(match self {
            ExistsOperator::Exists => "EXISTS",
            ExistsOperator::NotExists => "NOT EXISTS",
        });
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ExistsCondition {
    pub(crate) operator: ExistsOperator,
    pub(crate) subquery: Box<Select>,
}

impl FormatWriter for ExistsCondition {
    fn format_writer(&self, context: &mut FormatContext<'_>) -> Result<()> {
        self.operator.format_writer(context)?;
        context.write(" ");
        sub::write_subquery(context, &self.subquery)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{Criteria, Dialect, Select, Table, tests::format_aliased};

    #[test]
    fn test_correlated_exists() {
        let employee = Table::new("employee").unwrap().reference();
        let payslip = Table::new("payslip").unwrap().reference();
        let mut select = Select::new();
        select.column(payslip.column("id").unwrap());
        select.where_eq(
            payslip.column("employee_id").unwrap(),
            employee.column("id").unwrap(),
        );

        let criteria = Criteria::and([
            Criteria::eq(employee.column("active").unwrap(), true),
            Criteria::not_exists(select),
        ]);
        assert_eq!(
            "e.active = ?\nAND NOT EXISTS (\n    SELECT\n        p.id\n    FROM\n        payslip p\n    WHERE\n        p.employee_id = e.id\n)",
            format_aliased(&criteria, Dialect::STANDARD).unwrap()
        );
    }
}
