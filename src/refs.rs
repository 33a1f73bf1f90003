use indexmap::IndexSet;

use crate::{col::ResultColumn, table::TableRef};

/// First phase of compilation: every node reports the table references and
/// result columns it mentions before any alias is handed out.
///
/// Sets keep first-appearance order, which is the order aliases are assigned
/// in. Nested selects are their own scope and are not descended into.
pub(crate) trait CollectRefs {
    fn collect_table_refs(&self, refs: &mut IndexSet<TableRef>);

    fn collect_result_refs(&self, _refs: &mut IndexSet<ResultColumn>) {}
}

impl<T: CollectRefs> CollectRefs for [T] {
    fn collect_table_refs(&self, refs: &mut IndexSet<TableRef>) {
        for item in self {
            item.collect_table_refs(refs);
        }
    }

    fn collect_result_refs(&self, refs: &mut IndexSet<ResultColumn>) {
        for item in self {
            item.collect_result_refs(refs);
        }
    }
}

impl<T: CollectRefs> CollectRefs for Option<T> {
    fn collect_table_refs(&self, refs: &mut IndexSet<TableRef>) {
        if let Some(item) = self {
            item.collect_table_refs(refs);
        }
    }

    fn collect_result_refs(&self, refs: &mut IndexSet<ResultColumn>) {
        if let Some(item) = self {
            item.collect_result_refs(refs);
        }
    }
}

impl CollectRefs for TableRef {
    fn collect_table_refs(&self, refs: &mut IndexSet<TableRef>) {
        refs.insert(self.clone());
    }
}
