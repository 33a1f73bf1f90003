use indexmap::IndexSet;
use quill_derive::UnaryOperator;

use crate::{
    error::Result,
    refs::CollectRefs,
    table::TableRef,
    writer::{FormatContext, FormatWriter},
};

use super::Expr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, UnaryOperator)]
pub enum NullCheck {
    Null,
    NotNull,
}

impl FormatWriter for NullCheck {
    fn format_writer(&self, context: &mut FormatContext<'_>) -> Result<()> {
        context.write(match self {
            NullCheck::Null => "IS NULL",
            NullCheck::NotNull => "IS NOT NULL",
        });
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct UnaryCondition {
    pub(crate) expr: Expr,
    pub(crate) operator: NullCheck,
}

impl FormatWriter for UnaryCondition {
    fn format_writer(&self, context: &mut FormatContext<'_>) -> Result<()> {
        self.expr.format_writer(context)?;
        context.write(" ");
        self.operator.format_writer(context)
    }
}

impl CollectRefs for UnaryCondition {
    fn collect_table_refs(&self, refs: &mut IndexSet<TableRef>) {
        self.expr.collect_table_refs(refs);
    }
}
