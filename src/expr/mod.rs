use indexmap::IndexSet;
use smol_str::SmolStr;

use crate::{
    bind::{Bind, IntoBind},
    builder::Select,
    col::ColumnRef,
    error::Result,
    literal::{IntoLiteral, Literal},
    raw::Raw,
    refs::CollectRefs,
    table::TableRef,
    writer::{FormatContext, FormatWriter},
};

pub mod between;
pub mod binary;
pub mod cast;
pub mod cond;
pub mod distinct;
pub mod exists;
pub mod fncall;
pub mod group;
pub mod r#in;
pub mod order;
pub mod sub;
pub mod unary;

use cast::Cast;
use cond::Criteria;
use fncall::FnCall;

/// A scalar expression.
#[derive(Debug, Clone)]
pub enum Expr {
    Column(ColumnRef),
    Literal(Literal),
    Param(Bind),
    Function(FnCall),
    Cast(Cast),
    Raw(Raw),
    /// `*`, or `alias.*` for one table reference.
    Wildcard(Option<TableRef>),
    Subquery(Box<Select>),
    Criteria(Box<Criteria>),
}

impl Expr {
    pub fn param<T: IntoBind>(value: T) -> Self {
        Self::Param(value.into_bind())
    }

    pub fn lit<T: IntoLiteral>(value: T) -> Self {
        Self::Literal(value.into_literal())
    }

    pub fn cast<T: Into<SmolStr>>(self, ty: T) -> Self {
        Self::Cast(Cast {
            expr: Box::new(self),
            ty: ty.into(),
        })
    }

    /// Name an alias for this expression is derived from.
    pub(crate) fn name_hint(&self) -> Option<&str> {
        match self {
            Expr::Column(column) => Some(column.name()),
            Expr::Function(call) => Some(call.name()),
            Expr::Cast(cast) => cast.expr.name_hint(),
            _ => None,
        }
    }
}

impl FormatWriter for Expr {
    fn format_writer(&self, context: &mut FormatContext<'_>) -> Result<()> {
        match self {
            Expr::Column(column) => {
                context.write_qualifier(column.table_ref())?;
                context.write_column_name(column.name())
            }
            Expr::Literal(literal) => literal.format_writer(context),
            Expr::Param(bind) => {
                context.write_bind(bind.clone());
                Ok(())
            }
            Expr::Function(call) => call.format_writer(context),
            Expr::Cast(cast) => cast.format_writer(context),
            Expr::Raw(raw) => raw.format_writer(context),
            Expr::Wildcard(None) => {
                context.write("*");
                Ok(())
            }
            Expr::Wildcard(Some(table_ref)) => {
                context.write_qualifier(table_ref)?;
                context.write("*");
                Ok(())
            }
            Expr::Subquery(select) => sub::write_subquery(context, select),
            Expr::Criteria(criteria) => criteria.format_operand(context),
        }
    }
}

impl CollectRefs for Expr {
    fn collect_table_refs(&self, refs: &mut IndexSet<TableRef>) {
        match self {
            Expr::Column(column) => {
                refs.insert(column.table_ref().clone());
            }
            Expr::Function(call) => call.collect_table_refs(refs),
            Expr::Cast(cast) => cast.collect_table_refs(refs),
            Expr::Raw(raw) => raw.collect_table_refs(refs),
            Expr::Wildcard(table_ref) => table_ref.collect_table_refs(refs),
            Expr::Criteria(criteria) => criteria.collect_table_refs(refs),
            // own scope
            Expr::Subquery(_) => {}
            Expr::Literal(_) | Expr::Param(_) => {}
        }
    }
}

pub trait IntoExpr {
    fn into_expr(self) -> Expr;
}

impl<T: IntoBind> IntoExpr for T {
    fn into_expr(self) -> Expr {
        Expr::Param(self.into_bind())
    }
}

impl IntoExpr for Expr {
    fn into_expr(self) -> Expr {
        self
    }
}

impl IntoExpr for &ColumnRef {
    fn into_expr(self) -> Expr {
        Expr::Column(self.clone())
    }
}

impl From<&ColumnRef> for Expr {
    fn from(value: &ColumnRef) -> Self {
        value.into_expr()
    }
}

macro_rules! into_expr {
    ($($ty:ty => $value:ident => $build:expr),+ $(,)?) => {
        $(
            impl IntoExpr for $ty {
                fn into_expr(self) -> Expr {
                    let $value = self;
                    $build
                }
            }

            impl From<$ty> for Expr {
                fn from(value: $ty) -> Self {
                    value.into_expr()
                }
            }
        )+
    };
}

into_expr! {
    ColumnRef => column => Expr::Column(column),
    Literal => literal => Expr::Literal(literal),
    Raw => raw => Expr::Raw(raw),
    FnCall => call => Expr::Function(call),
    Cast => cast => Expr::Cast(cast),
    Select => select => Expr::Subquery(Box::new(select)),
    Criteria => criteria => Expr::Criteria(Box::new(criteria)),
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{Dialect, Select, Table, tests::format_aliased};

    use super::*;

    #[test]
    fn test_leaves() {
        let employee = Table::new("employee").unwrap().reference();
        let cases = [
            (Expr::from(employee.column("name").unwrap()), "e.`name`"),
            (employee.all(), "e.*"),
            (Expr::Wildcard(None), "*"),
            (Expr::lit("o'neil"), "'o''neil'"),
            (Expr::param(3_i64), "?"),
            (Expr::from(Raw::new_static("now()")), "now()"),
        ];
        for (expr, expected) in cases {
            assert_eq!(expected, format_aliased(&expr, Dialect::MYSQL).unwrap());
        }
    }

    #[test]
    fn test_name_hints() {
        let employee = Table::new("employee").unwrap().reference();
        let name = Expr::from(employee.column("name").unwrap());
        assert_eq!(Some("name"), name.name_hint());
        assert_eq!(Some("name"), name.clone().cast("TEXT").name_hint());
        assert_eq!(None, Expr::param(1_i32).name_hint());
    }

    #[test]
    fn test_scalar_subquery() {
        let employee = Table::new("employee").unwrap();
        let outer = employee.reference();
        let inner = employee.reference();

        let mut select = Select::new();
        select.column(crate::func::max(inner.column("salary").unwrap()));
        select.where_eq(
            inner.column("department_id").unwrap(),
            outer.column("department_id").unwrap(),
        );

        let criteria = Criteria::eq(outer.column("salary").unwrap(), select);
        assert_eq!(
            "e.salary = (\n    SELECT\n        MAX(em.salary)\n    FROM\n        employee em\n    WHERE\n        em.department_id = e.department_id\n)",
            format_aliased(&criteria, Dialect::STANDARD).unwrap()
        );
    }

    #[test]
    fn test_criteria_operands_are_parenthesized() {
        let employee = Table::new("employee").unwrap().reference();
        let age = employee.column("age").unwrap();

        let adult = Expr::from(Criteria::eq(Criteria::gt(&age, 18_i32), true));
        assert_eq!("(e.age > ?) = ?", format_aliased(&adult, Dialect::STANDARD).unwrap());

        let either = Expr::from(Criteria::distinct_from(
            Criteria::or([Criteria::lt(&age, 18_i32), Criteria::gt(&age, 65_i32)]),
            !Criteria::is_null(&age),
        ));
        assert_eq!(
            "(\n    e.age < ?\n    OR e.age > ?\n) IS DISTINCT FROM (NOT (e.age IS NULL))",
            format_aliased(&either, Dialect::STANDARD).unwrap()
        );

        let mut select = Select::new();
        select.column(Criteria::gte(&age, 18_i32));
        select.column(crate::func::coalesce([Expr::from(Criteria::is_null(&age))]));
        assert_eq!(
            "SELECT\n    (e.age >= ?),\n    COALESCE((e.age IS NULL))\nFROM\n    employee e",
            select.to_sql::<crate::Standard>().unwrap()
        );
    }
}
