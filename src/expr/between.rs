use indexmap::IndexSet;
use quill_derive::BetweenOperator;

use crate::{
    error::Result,
    refs::CollectRefs,
    table::TableRef,
    writer::{FormatContext, FormatWriter},
};

use super::Expr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, BetweenOperator)]
pub enum BetweenOperator {
    Between,
    NotBetween,
}

impl FormatWriter for BetweenOperator {
    fn format_writer(&self, context: &mut FormatContext<'_>) -> Result<()> {
        context.write(match self {
            BetweenOperator::Between => "BETWEEN",
            BetweenOperator::NotBetween => "NOT BETWEEN",
        });
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct BetweenCondition {
    pub(crate) expr: Expr,
    pub(crate) operator: BetweenOperator,
    pub(crate) low: Expr,
    pub(crate) high: Expr,
}

impl FormatWriter for BetweenCondition {
    fn format_writer(&self, context: &mut FormatContext<'_>) -> Result<()> {
        self.expr.format_writer(context)?;
        context.write(" ");
        self.operator.format_writer(context)?;
        context.write(" ");
        self.low.format_writer(context)?;
        context.write(" AND ");
        self.high.format_writer(context)
    }
}

impl CollectRefs for BetweenCondition {
    fn collect_table_refs(&self, refs: &mut IndexSet<TableRef>) {
        self.expr.collect_table_refs(refs);
        self.low.collect_table_refs(refs);
        self.high.collect_table_refs(refs);
    }
}

#[cfg(test)]
mod tests {
    use crate::{Bind, Criteria, Dialect, Table, tests::format_aliased};

    #[test]
    fn test_between() {
        let employee = Table::new("employee").unwrap().reference();
        let age = employee.column("age").unwrap();
        let criteria = Criteria::between(&age, 18_i32, 65_i32);
        assert_eq!(
            "e.\"age\" BETWEEN $1 AND $2",
            format_aliased(&criteria, Dialect::POSTGRES).unwrap()
        );
        let criteria = Criteria::not_between(&age, 18_i32, Bind::Null);
        assert_eq!(
            "e.age NOT BETWEEN ? AND ?",
            format_aliased(&criteria, Dialect::STANDARD).unwrap()
        );
    }
}
