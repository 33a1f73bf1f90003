use indexmap::IndexSet;
use smol_str::SmolStr;

use crate::{
    error::Result,
    refs::CollectRefs,
    table::TableRef,
    writer::{FormatContext, FormatWriter},
};

use super::{Expr, IntoExpr};

/// `NAME(arg, ...)`; the name is written as given.
#[derive(Debug, Clone)]
pub struct FnCall {
    name: SmolStr,
    distinct: bool,
    args: Vec<Expr>,
}

impl FnCall {
    pub fn new<N, I>(name: N, args: I) -> Self
    where
        N: Into<SmolStr>,
        I: IntoIterator,
        I::Item: IntoExpr,
    {
        Self {
            name: name.into(),
            distinct: false,
            args: args.into_iter().map(IntoExpr::into_expr).collect(),
        }
    }

    /// `NAME(DISTINCT arg, ...)`
    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl FormatWriter for FnCall {
    fn format_writer(&self, context: &mut FormatContext<'_>) -> Result<()> {
        context.write(&self.name);
        context.write("(");
        if self.distinct {
            context.write("DISTINCT ");
        }
        for (index, arg) in self.args.iter().enumerate() {
            if index > 0 {
                context.write(", ");
            }
            arg.format_writer(context)?;
        }
        context.write(")");
        Ok(())
    }
}

impl CollectRefs for FnCall {
    fn collect_table_refs(&self, refs: &mut IndexSet<TableRef>) {
        self.args.collect_table_refs(refs);
    }
}

/// Common aggregate and scalar functions.
pub mod func {
    use super::{Expr, FnCall, IntoExpr};

    pub fn count<E: IntoExpr>(expr: E) -> FnCall {
        FnCall::new("COUNT", [expr])
    }

    /// `COUNT(*)`
    pub fn count_all() -> FnCall {
        FnCall::new("COUNT", [Expr::Wildcard(None)])
    }

    pub fn sum<E: IntoExpr>(expr: E) -> FnCall {
        FnCall::new("SUM", [expr])
    }

    pub fn avg<E: IntoExpr>(expr: E) -> FnCall {
        FnCall::new("AVG", [expr])
    }

    pub fn min<E: IntoExpr>(expr: E) -> FnCall {
        FnCall::new("MIN", [expr])
    }

    pub fn max<E: IntoExpr>(expr: E) -> FnCall {
        FnCall::new("MAX", [expr])
    }

    pub fn lower<E: IntoExpr>(expr: E) -> FnCall {
        FnCall::new("LOWER", [expr])
    }

    pub fn upper<E: IntoExpr>(expr: E) -> FnCall {
        FnCall::new("UPPER", [expr])
    }

    pub fn coalesce<I>(args: I) -> FnCall
    where
        I: IntoIterator,
        I::Item: IntoExpr,
    {
        FnCall::new("COALESCE", args)
    }
}

#[cfg(test)]
mod tests {
    use crate::{Dialect, Expr, Table, tests::format_aliased};

    use super::*;

    #[test]
    fn test_function_calls() {
        let employee = Table::new("employee").unwrap().reference();
        let salary = employee.column("salary").unwrap();

        let expr = Expr::from(func::sum(&salary));
        assert_eq!("SUM(e.salary)", format_aliased(&expr, Dialect::STANDARD).unwrap());

        let expr = Expr::from(func::count(&salary).distinct());
        assert_eq!("COUNT(DISTINCT e.salary)", format_aliased(&expr, Dialect::STANDARD).unwrap());

        let expr = Expr::from(func::count_all());
        assert_eq!("COUNT(*)", format_aliased(&expr, Dialect::STANDARD).unwrap());

        let expr = Expr::from(func::coalesce([Expr::from(&salary), Expr::param(0_i32)]));
        assert_eq!(
            "COALESCE(e.\"salary\", $1)",
            format_aliased(&expr, Dialect::POSTGRES).unwrap()
        );
    }
}
