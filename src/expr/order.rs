use indexmap::IndexSet;

use crate::{
    col::ResultColumn,
    error::{Error, Result},
    refs::CollectRefs,
    table::TableRef,
    writer::{FormatContext, FormatWriter},
};

use super::Expr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ordering {
    #[default]
    Asc,
    Desc,
}

impl FormatWriter for Ordering {
    fn format_writer(&self, context: &mut FormatContext<'_>) -> Result<()> {
        context.write(match self {
            Ordering::Asc => "ASC",
            Ordering::Desc => "DESC",
        });
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub enum OrderTarget {
    Expr(Expr),
    /// A select list entry, referenced by its alias.
    Result(ResultColumn),
}

#[derive(Debug, Clone)]
pub struct OrderExpr {
    pub(crate) target: OrderTarget,
    pub(crate) ordering: Ordering,
}

impl FormatWriter for OrderExpr {
    fn format_writer(&self, context: &mut FormatContext<'_>) -> Result<()> {
        match &self.target {
            OrderTarget::Expr(expr) => expr.format_writer(context)?,
            OrderTarget::Result(result) => {
                let Some(alias) = context.result_alias(result) else {
                    return Err(Error::UnresolvedResult(result.index()));
                };
                context.write_result_alias(&alias)?;
            }
        }
        context.write(" ");
        self.ordering.format_writer(context)
    }
}

impl CollectRefs for OrderExpr {
    fn collect_table_refs(&self, refs: &mut IndexSet<TableRef>) {
        if let OrderTarget::Expr(expr) = &self.target {
            expr.collect_table_refs(refs);
        }
    }

    fn collect_result_refs(&self, refs: &mut IndexSet<ResultColumn>) {
        if let OrderTarget::Result(result) = &self.target {
            refs.insert(result.clone());
        }
    }
}
