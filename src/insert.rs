use crate::{
    builder::Select,
    col::Column,
    dialect::EmptyInsert,
    error::{Error, Result},
    expr::{Expr, IntoExpr},
    ident::IntoIdent,
    table::Table,
    writer::{FormatContext, FormatWriter, impl_compile},
};

#[derive(Debug, Clone)]
enum InsertSource {
    Values(Vec<Expr>),
    Select(Box<Select>),
    DefaultValues,
}

/// A single-row INSERT.
///
/// Values are rendered without any table in scope: a column reference as a
/// value fails with [`Error::UnresolvedTable`], a nested select works.
#[derive(Debug, Clone)]
pub struct Insert {
    table: Table,
    columns: Vec<Column>,
    source: InsertSource,
}

impl Insert {
    pub fn insert_into(table: &Table) -> Self {
        Self {
            table: table.clone(),
            columns: Vec::new(),
            source: InsertSource::Values(Vec::new()),
        }
    }

    fn check_owner(&self, column: &Column) -> Result<()> {
        if self.table.owns(column) {
            return Ok(());
        }
        Err(Error::ForeignColumn {
            column: column.name().into(),
            owner: column.table_name().into(),
            table: self.table.name().into(),
        })
    }

    /// Sets the value of `column`, replacing an earlier one.
    pub fn value<V: IntoExpr>(&mut self, column: &Column, value: V) -> Result<&mut Self> {
        self.check_owner(column)?;
        if !matches!(self.source, InsertSource::Values(_)) {
            self.columns.clear();
            self.source = InsertSource::Values(Vec::new());
        }
        if let InsertSource::Values(values) = &mut self.source {
            match self.columns.iter().position(|existing| existing == column) {
                Some(index) => values[index] = value.into_expr(),
                None => {
                    self.columns.push(column.clone());
                    values.push(value.into_expr());
                }
            }
        }
        Ok(self)
    }

    /// [`Insert::value`] for the column of the target table called `name`.
    pub fn set<N: IntoIdent, V: IntoExpr>(&mut self, name: N, value: V) -> Result<&mut Self> {
        let column = self.table.column(name)?;
        self.value(&column, value)
    }

    /// `INSERT INTO t (columns) SELECT ...`; the select must produce one value
    /// per column.
    pub fn select<'c, C, F>(&mut self, columns: C, select: F) -> Result<&mut Self>
    where
        C: IntoIterator<Item = &'c Column>,
        F: FnOnce(&mut Select),
    {
        let columns: Vec<Column> = columns.into_iter().cloned().collect();
        for column in &columns {
            self.check_owner(column)?;
        }
        let mut builder = Select::new();
        select(&mut builder);
        self.columns = columns;
        self.source = InsertSource::Select(Box::new(builder));
        Ok(self)
    }

    /// Inserts a row of defaults; without this an insert with no value fails.
    pub fn default_values(&mut self) -> &mut Self {
        self.columns.clear();
        self.source = InsertSource::DefaultValues;
        self
    }

    fn write_columns(&self, context: &mut FormatContext<'_>) -> Result<()> {
        write_parenthesized(context, &self.columns, |context, column| {
            context.write_column_name(column.name())
        })
    }
}

/// `(a)` inline for one item, an indented block for more.
fn write_parenthesized<T, F>(context: &mut FormatContext<'_>, items: &[T], mut f: F) -> Result<()>
where
    F: FnMut(&mut FormatContext<'_>, &T) -> Result<()>,
{
    if let [single] = items {
        context.write("(");
        f(context, single)?;
        context.write(")");
        return Ok(());
    }
    context.write_block(|context| context.write_list(items, |context, item| f(context, item)))
}

impl FormatWriter for Insert {
    fn format_writer(&self, context: &mut FormatContext<'_>) -> Result<()> {
        match &self.source {
            InsertSource::Values(values) if values.is_empty() => {
                return Err(Error::empty("insert", "value"));
            }
            InsertSource::Select(select) if select.columns().len() != self.columns.len() => {
                return Err(Error::ColumnCountMismatch {
                    columns: self.columns.len(),
                    values: select.columns().len(),
                });
            }
            _ => {}
        }

        context.write("INSERT INTO ");
        context.write_table_name(self.table.name())?;
        match &self.source {
            InsertSource::Values(values) => {
                context.write(" ");
                self.write_columns(context)?;
                context.write_line();
                context.write("VALUES ");
                write_parenthesized(context, values, |context, value| value.format_writer(context))
            }
            InsertSource::Select(select) => {
                context.write(" ");
                self.write_columns(context)?;
                select.format_writer(context)
            }
            InsertSource::DefaultValues => {
                context.write(match context.dialect.empty_insert {
                    EmptyInsert::DefaultValues => " DEFAULT VALUES",
                    EmptyInsert::EmptyValues => " () VALUES ()",
                });
                Ok(())
            }
        }
    }
}

impl_compile!(Insert, "insert");
