use indexmap::IndexSet;

use crate::{
    dialect::DistinctSyntax,
    error::Result,
    refs::CollectRefs,
    table::TableRef,
    writer::{FormatContext, FormatWriter},
};

use super::Expr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistinctOperator {
    Distinct,
    NotDistinct,
}

/// Null-safe inequality, spelled the way the dialect supports it.
#[derive(Debug, Clone)]
pub struct DistinctCondition {
    pub(crate) lhs: Expr,
    pub(crate) operator: DistinctOperator,
    pub(crate) rhs: Expr,
}

impl FormatWriter for DistinctCondition {
    fn format_writer(&self, context: &mut FormatContext<'_>) -> Result<()> {
        let distinct = self.operator == DistinctOperator::Distinct;
        match context.dialect.distinct {
            DistinctSyntax::Standard => {
                self.lhs.format_writer(context)?;
                context.write(if distinct {
                    " IS DISTINCT FROM "
                } else {
                    " IS NOT DISTINCT FROM "
                });
                self.rhs.format_writer(context)
            }
            DistinctSyntax::NullSafeEquals => {
                if distinct {
                    context.write("NOT (");
                }
                self.lhs.format_writer(context)?;
                context.write(" <=> ");
                self.rhs.format_writer(context)?;
                if distinct {
                    context.write(")");
                }
                Ok(())
            }
            DistinctSyntax::Is => {
                self.lhs.format_writer(context)?;
                context.write(if distinct { " IS NOT " } else { " IS " });
                self.rhs.format_writer(context)
            }
        }
    }
}

impl CollectRefs for DistinctCondition {
    fn collect_table_refs(&self, refs: &mut IndexSet<TableRef>) {
        self.lhs.collect_table_refs(refs);
        self.rhs.collect_table_refs(refs);
    }
}
