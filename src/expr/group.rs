use indexmap::IndexSet;

use crate::{
    col::ResultColumn,
    error::Result,
    refs::CollectRefs,
    table::TableRef,
    writer::{FormatContext, FormatWriter},
};

use super::cond::Criteria;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conjunction {
    And,
    Or,
}

impl Conjunction {
    fn keyword(self) -> &'static str {
        match self {
            Conjunction::And => "AND ",
            Conjunction::Or => "OR ",
        }
    }

    /// What an empty group evaluates to.
    fn identity(self) -> &'static str {
        match self {
            Conjunction::And => "1 = 1",
            Conjunction::Or => "0 = 1",
        }
    }
}

/// An AND / OR over any number of criteria.
#[derive(Debug, Clone)]
pub struct GroupCondition {
    pub(crate) conjunction: Conjunction,
    pub(crate) items: Vec<Criteria>,
}

impl GroupCondition {
    pub(crate) fn new(conjunction: Conjunction, items: Vec<Criteria>) -> Self {
        Self { conjunction, items }
    }

    /// True when rendering needs parentheses inside another boolean context.
    pub(crate) fn is_compound(&self) -> bool {
        self.items.len() > 1
    }
}

impl FormatWriter for GroupCondition {
    fn format_writer(&self, context: &mut FormatContext<'_>) -> Result<()> {
        match self.items.as_slice() {
            [] => {
                context.write(self.conjunction.identity());
                Ok(())
            }
            [single] => single.format_writer(context),
            items => {
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        context.write_line();
                        context.write(self.conjunction.keyword());
                    }
                    item.format_nested(context)?;
                }
                Ok(())
            }
        }
    }
}

impl CollectRefs for GroupCondition {
    fn collect_table_refs(&self, refs: &mut IndexSet<TableRef>) {
        self.items.collect_table_refs(refs);
    }

    fn collect_result_refs(&self, refs: &mut IndexSet<ResultColumn>) {
        self.items.collect_result_refs(refs);
    }
}
