use indexmap::IndexSet;
use quill_derive::BinaryOperator;

use crate::{
    error::Result,
    refs::CollectRefs,
    table::TableRef,
    writer::{FormatContext, FormatWriter},
};

use super::Expr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, BinaryOperator)]
pub enum Comparison {
    Eq,
    NotEq,
    Lt,
    Lte,
    Gt,
    Gte,
    Like,
}

impl FormatWriter for Comparison {
    fn format_writer(&self, context: &mut FormatContext<'_>) -> Result<()> {
        context.write(match self {
            Comparison::Eq => "=",
            Comparison::NotEq => "<>",
            Comparison::Lt => "<",
            Comparison::Lte => "<=",
            Comparison::Gt => ">",
            Comparison::Gte => ">=",
            Comparison::Like => "LIKE",
        });
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct CompareCondition {
    pub(crate) lhs: Expr,
    pub(crate) operator: Comparison,
    pub(crate) rhs: Expr,
}

impl FormatWriter for CompareCondition {
    fn format_writer(&self, context: &mut FormatContext<'_>) -> Result<()> {
        self.lhs.format_writer(context)?;
        context.write(" ");
        self.operator.format_writer(context)?;
        context.write(" ");
        self.rhs.format_writer(context)
    }
}

impl CollectRefs for CompareCondition {
    fn collect_table_refs(&self, refs: &mut IndexSet<TableRef>) {
        self.lhs.collect_table_refs(refs);
        self.rhs.collect_table_refs(refs);
    }
}

#[cfg(test)]
mod tests {
    use crate::{Criteria, Dialect, Table, tests::format_aliased};

    #[test]
    fn test_generated_constructors() {
        let employee = Table::new("employee").unwrap().reference();
        let age = employee.column("age").unwrap();
        let name = employee.column("name").unwrap();
        let cases = [
            (Criteria::eq(&age, 1_i32), "e.age = ?"),
            (Criteria::not_eq(&age, 1_i32), "e.age <> ?"),
            (Criteria::lt(&age, 1_i32), "e.age < ?"),
            (Criteria::lte(&age, 1_i32), "e.age <= ?"),
            (Criteria::gt(&age, 1_i32), "e.age > ?"),
            (Criteria::gte(&age, 1_i32), "e.age >= ?"),
            (Criteria::like(&name, "a%"), "e.name LIKE ?"),
        ];
        for (criteria, expected) in cases {
            assert_eq!(expected, format_aliased(&criteria, Dialect::STANDARD).unwrap());
        }
    }
}
