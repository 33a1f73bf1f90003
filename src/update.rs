use indexmap::IndexSet;

use crate::{
    col::Column,
    error::{Error, Result},
    expr::{
        Expr, IntoExpr,
        cond::{Conditions, Criteria},
    },
    ident::IntoIdent,
    refs::CollectRefs,
    table::TableRef,
    writer::{FormatContext, FormatWriter, Qualify, impl_compile},
};

/// An UPDATE of one table reference.
///
/// Other tables mentioned by the assignments or the criteria are listed in
/// a FROM clause.
#[derive(Debug, Clone)]
pub struct Update {
    target: TableRef,
    assignments: Vec<(Column, Expr)>,
    maybe_where: Conditions,
}

impl Update {
    pub fn table(target: &TableRef) -> Self {
        Self {
            target: target.clone(),
            assignments: Vec::new(),
            maybe_where: Conditions::new(),
        }
    }

    /// `column = value`, replacing an earlier assignment of the same column.
    pub fn set<V: IntoExpr>(&mut self, column: &Column, value: V) -> Result<&mut Self> {
        let table = self.target.table();
        if !table.owns(column) {
            return Err(Error::ForeignColumn {
                column: column.name().into(),
                owner: column.table_name().into(),
                table: table.name().into(),
            });
        }
        let value = value.into_expr();
        match self.assignments.iter_mut().find(|(existing, _)| existing == column) {
            Some((_, previous)) => *previous = value,
            None => self.assignments.push((column.clone(), value)),
        }
        Ok(self)
    }

    pub fn set_named<N: IntoIdent, V: IntoExpr>(&mut self, name: N, value: V) -> Result<&mut Self> {
        let column = self.target.table().column(name)?;
        self.set(&column, value)
    }

    pub fn and_where(&mut self, criteria: Criteria) -> &mut Self {
        self.maybe_where.and(criteria);
        self
    }

    pub fn or_where(&mut self, criteria: Criteria) -> &mut Self {
        self.maybe_where.or(criteria);
        self
    }
}

impl FormatWriter for Update {
    fn format_writer(&self, context: &mut FormatContext<'_>) -> Result<()> {
        if self.assignments.is_empty() {
            return Err(Error::empty("update", "assignment"));
        }

        let mut tables = IndexSet::new();
        tables.insert(self.target.clone());
        for (_, value) in &self.assignments {
            value.collect_table_refs(&mut tables);
        }
        self.maybe_where.collect_table_refs(&mut tables);
        tables.retain(|table_ref| !context.in_scope(table_ref));

        let aliases = context.assign_aliases(&tables, &IndexSet::new());
        let others: Vec<TableRef> = tables
            .into_iter()
            .filter(|table_ref| *table_ref != self.target)
            .collect();

        context.nested(aliases, Qualify::Alias, |context| {
            context.write_clause("UPDATE", |context| context.write_table_ref(&self.target))?;
            context.write_clause("SET", |context| {
                context.write_list(&self.assignments, |context, (column, value)| {
                    context.write_column_name(column.name())?;
                    context.write(" = ");
                    value.format_writer(context)
                })
            })?;

            if !others.is_empty() {
                context.write_clause("FROM", |context| {
                    context.write_list(&others, |context, table_ref| {
                        context.write_table_ref(table_ref)
                    })
                })?;
            }

            if let Some(criteria) = self.maybe_where.criteria() {
                context.write_clause("WHERE", |context| criteria.format_writer(context))?;
            }
            Ok(())
        })
    }
}

impl_compile!(Update, "update");
