use indexmap::IndexSet;
use smol_str::SmolStr;

use crate::{
    error::Result,
    refs::CollectRefs,
    table::TableRef,
    writer::{FormatContext, FormatWriter},
};

use super::Expr;

/// `CAST(expr AS type)`
#[derive(Debug, Clone)]
pub struct Cast {
    pub(crate) expr: Box<Expr>,
    pub(crate) ty: SmolStr,
}

impl FormatWriter for Cast {
    fn format_writer(&self, context: &mut FormatContext<'_>) -> Result<()> {
        context.write("CAST(");
        self.expr.format_writer(context)?;
        context.write(" AS ");
        context.write(&self.ty);
        context.write(")");
        Ok(())
    }
}

impl CollectRefs for Cast {
    fn collect_table_refs(&self, refs: &mut IndexSet<TableRef>) {
        self.expr.collect_table_refs(refs);
    }
}

#[cfg(test)]
mod tests {
    use crate::{Dialect, Expr, Table, tests::format_aliased};

    #[test]
    fn test_cast() {
        let employee = Table::new("employee").unwrap().reference();
        let expr = Expr::from(employee.column("age").unwrap()).cast("TEXT");
        assert_eq!("CAST(e.age AS TEXT)", format_aliased(&expr, Dialect::STANDARD).unwrap());
    }
}
