use indexmap::IndexSet;

use crate::{
    col::ResultColumn,
    error::{Error, Result},
    expr::{
        Expr, IntoExpr,
        cond::{Conditions, Criteria},
        order::{OrderExpr, OrderTarget, Ordering},
    },
    paginate::Paginator,
    raw::Raw,
    refs::CollectRefs,
    table::TableRef,
    writer::{FormatContext, FormatWriter, Qualify, impl_compile},
};

/// A SELECT statement.
///
/// FROM is inferred: every table reference mentioned anywhere in the
/// statement is listed once, in order of first appearance, unless an
/// enclosing statement already binds it.
#[derive(Debug, Default, Clone)]
pub struct Select {
    distinct: bool,
    columns: Vec<ResultColumn>,
    from: Vec<TableRef>,
    maybe_where: Conditions,
    group_by: Vec<Expr>,
    having: Conditions,
    order: Vec<OrderExpr>,
    paginator: Paginator,
}

impl Select {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn distinct(&mut self) -> &mut Self {
        self.distinct = true;
        self
    }

    /// Adds a select list entry and returns its handle. The handle's index is
    /// its 1-based position and never changes.
    pub fn column<E: IntoExpr>(&mut self, expr: E) -> ResultColumn {
        let result = ResultColumn::new(expr.into_expr(), self.columns.len() + 1);
        self.columns.push(result.clone());
        result
    }

    pub fn columns(&self) -> &[ResultColumn] {
        &self.columns
    }

    /// Lists a table reference even if nothing else mentions it.
    pub fn from(&mut self, table_ref: &TableRef) -> &mut Self {
        if !self.from.contains(table_ref) {
            self.from.push(table_ref.clone());
        }
        self
    }

    pub fn and_where(&mut self, criteria: Criteria) -> &mut Self {
        self.maybe_where.and(criteria);
        self
    }

    pub fn or_where(&mut self, criteria: Criteria) -> &mut Self {
        self.maybe_where.or(criteria);
        self
    }

    /// ANDs a parenthesized group built by `closure`.
    pub fn where_group<F>(&mut self, closure: F) -> &mut Self
    where
        F: FnOnce(&mut Conditions),
    {
        let mut inner = Conditions::new();
        closure(&mut inner);
        if let Some(criteria) = inner.into_criteria() {
            self.maybe_where.and(criteria);
        }
        self
    }

    pub fn or_where_group<F>(&mut self, closure: F) -> &mut Self
    where
        F: FnOnce(&mut Conditions),
    {
        let mut inner = Conditions::new();
        closure(&mut inner);
        if let Some(criteria) = inner.into_criteria() {
            self.maybe_where.or(criteria);
        }
        self
    }

    pub fn where_in<E, I>(&mut self, expr: E, values: I) -> &mut Self
    where
        E: IntoExpr,
        I: IntoIterator,
        I::Item: IntoExpr,
    {
        self.and_where(Criteria::is_in(expr, values))
    }

    pub fn where_not_in<E, I>(&mut self, expr: E, values: I) -> &mut Self
    where
        E: IntoExpr,
        I: IntoIterator,
        I::Item: IntoExpr,
    {
        self.and_where(Criteria::not_in(expr, values))
    }

    pub fn where_exists(&mut self, select: Select) -> &mut Self {
        self.and_where(Criteria::exists(select))
    }

    pub fn where_not_exists(&mut self, select: Select) -> &mut Self {
        self.and_where(Criteria::not_exists(select))
    }

    pub fn where_raw(&mut self, raw: Raw) -> &mut Self {
        self.and_where(Criteria::Raw(raw))
    }

    pub fn group_by<E: IntoExpr>(&mut self, expr: E) -> &mut Self {
        self.group_by.push(expr.into_expr());
        self
    }

    pub fn having(&mut self, criteria: Criteria) -> &mut Self {
        self.having.and(criteria);
        self
    }

    pub fn or_having(&mut self, criteria: Criteria) -> &mut Self {
        self.having.or(criteria);
        self
    }

    pub fn order_by<E: IntoExpr>(&mut self, expr: E, ordering: Ordering) -> &mut Self {
        self.order.push(OrderExpr {
            target: OrderTarget::Expr(expr.into_expr()),
            ordering,
        });
        self
    }

    /// Orders by a select list entry through its alias.
    pub fn order_by_result(&mut self, result: &ResultColumn, ordering: Ordering) -> &mut Self {
        self.order.push(OrderExpr {
            target: OrderTarget::Result(result.clone()),
            ordering,
        });
        self
    }

    pub fn limit(&mut self, limit: usize) -> &mut Self {
        self.paginator.limit(limit);
        self
    }

    pub fn offset(&mut self, offset: usize) -> &mut Self {
        self.paginator.offset(offset);
        self
    }

    pub fn paginate(&mut self, page: usize, per_page: usize) -> &mut Self {
        self.paginator.paginate(page, per_page);
        self
    }

    fn collect_tables(&self) -> IndexSet<TableRef> {
        let mut tables = IndexSet::new();
        for column in &self.columns {
            column.expr().collect_table_refs(&mut tables);
        }
        self.from.collect_table_refs(&mut tables);
        self.maybe_where.collect_table_refs(&mut tables);
        self.group_by.collect_table_refs(&mut tables);
        self.having.collect_table_refs(&mut tables);
        self.order.collect_table_refs(&mut tables);
        tables
    }

    fn collect_results(&self) -> Result<IndexSet<ResultColumn>> {
        let mut results = IndexSet::new();
        self.order.collect_result_refs(&mut results);
        if let Some(foreign) = results.iter().find(|result| !self.columns.contains(result)) {
            return Err(Error::UnresolvedResult(foreign.index()));
        }
        Ok(results)
    }

    fn write_column(context: &mut FormatContext<'_>, column: &ResultColumn) -> Result<()> {
        column.expr().format_writer(context)?;
        if let Some(alias) = context.result_alias(column) {
            context.write(" AS ");
            context.write_result_alias(&alias)?;
        }
        Ok(())
    }
}

impl FormatWriter for Select {
    fn format_writer(&self, context: &mut FormatContext<'_>) -> Result<()> {
        if self.columns.is_empty() {
            return Err(Error::empty("select", "result column"));
        }

        let mut tables = self.collect_tables();
        tables.retain(|table_ref| !context.in_scope(table_ref));
        let results = self.collect_results()?;
        let aliases = context.assign_aliases(&tables, &results);
        let tables: Vec<TableRef> = tables.into_iter().collect();

        context.nested(aliases, Qualify::Alias, |context| {
            let keyword = if self.distinct { "SELECT DISTINCT" } else { "SELECT" };
            context.write_clause(keyword, |context| {
                context.write_list(&self.columns, |context, column| {
                    Self::write_column(context, column)
                })
            })?;

            if !tables.is_empty() {
                context.write_clause("FROM", |context| {
                    context.write_list(&tables, |context, table_ref| {
                        context.write_table_ref(table_ref)
                    })
                })?;
            }

            if let Some(criteria) = self.maybe_where.criteria() {
                context.write_clause("WHERE", |context| criteria.format_writer(context))?;
            }

            if !self.group_by.is_empty() {
                context.write_clause("GROUP BY", |context| {
                    context.write_list(&self.group_by, |context, expr| expr.format_writer(context))
                })?;
            }

            if let Some(criteria) = self.having.criteria() {
                context.write_clause("HAVING", |context| criteria.format_writer(context))?;
            }

            if !self.order.is_empty() {
                context.write_clause("ORDER BY", |context| {
                    context.write_list(&self.order, |context, order| order.format_writer(context))
                })?;
            }

            self.paginator.format_writer(context)
        })
    }
}

impl_compile!(Select, "select");

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{Bind, Dialect, Expr, MySql, Postgres, Standard, Table, func, raw};

    use super::*;

    #[test]
    fn test_select_where() {
        let employee = Table::new("employee").unwrap().reference();
        let mut select = Select::new();
        select.column(employee.column("name").unwrap());
        select.where_lt(employee.column("age").unwrap(), 30_i32);

        let compiled = select.compile::<Standard>().unwrap();
        assert_eq!(
            "SELECT\n    e.name\nFROM\n    employee e\nWHERE\n    e.age < ?",
            compiled.sql()
        );
        assert_eq!(&[Bind::I32(30)], compiled.binds().as_slice());
    }

    #[test]
    fn test_where_only_table_is_listed_once() {
        let employee = Table::new("employee").unwrap().reference();
        let department = Table::new("department").unwrap().reference();
        let mut select = Select::new();
        select.column(employee.column("name").unwrap());
        select.where_eq(
            employee.column("department_id").unwrap(),
            department.column("id").unwrap(),
        );
        select.where_eq(department.column("name").unwrap(), "sales");

        assert_eq!(
            "SELECT\n    e.name\nFROM\n    employee e,\n    department d\nWHERE\n    e.department_id = d.id\n    AND d.name = ?",
            select.to_sql::<Standard>().unwrap()
        );
    }

    #[test]
    fn test_self_join_gets_distinct_aliases() {
        let employee = Table::new("employee").unwrap();
        let worker = employee.reference();
        let manager = employee.reference();
        let mut select = Select::new();
        select.column(worker.column("name").unwrap());
        select.column(manager.column("name").unwrap());
        select.where_eq(worker.column("manager_id").unwrap(), manager.column("id").unwrap());

        assert_eq!(
            "SELECT\n    e.\"name\",\n    em.\"name\"\nFROM\n    \"employee\" e,\n    \"employee\" em\nWHERE\n    e.\"manager_id\" = em.\"id\"",
            select.to_sql::<Postgres>().unwrap()
        );
    }

    #[test]
    fn test_full_clause_order() {
        let employee = Table::new("employee").unwrap().reference();
        let department_id = employee.column("department_id").unwrap();
        let mut select = Select::new();
        select.distinct();
        select.column(&department_id);
        let total = select.column(func::count_all());
        select
            .where_not_null(&department_id)
            .group_by(&department_id)
            .having(Criteria::gt(func::count_all(), 5_i32))
            .order_by_result(&total, Ordering::Desc)
            .order_by(&department_id, Ordering::Asc)
            .limit(10);

        assert_eq!(
            "SELECT DISTINCT\n    e.department_id,\n    COUNT(*) AS c\nFROM\n    employee e\nWHERE\n    e.department_id IS NOT NULL\nGROUP BY\n    e.department_id\nHAVING\n    COUNT(*) > ?\nORDER BY\n    c DESC,\n    e.department_id ASC\nLIMIT\n    10",
            select.to_sql::<Standard>().unwrap()
        );
    }

    #[test]
    fn test_result_alias_is_quoted() {
        let employee = Table::new("employee").unwrap().reference();
        let mut select = Select::new();
        let name = select.column(employee.column("name").unwrap());
        select.order_by_result(&name, Ordering::Asc).paginate(2, 25);

        assert_eq!(
            "SELECT\n    e.`name` AS `n`\nFROM\n    `employee` e\nORDER BY\n    `n` ASC\nLIMIT\n    25\nOFFSET\n    25",
            select.to_sql::<MySql>().unwrap()
        );
    }

    #[test]
    fn test_explicit_from() {
        let employee = Table::new("employee").unwrap().reference();
        let mut select = Select::new();
        select.column(func::count_all());
        select.from(&employee).from(&employee);
        assert_eq!(
            "SELECT\n    COUNT(*)\nFROM\n    employee e",
            select.to_sql::<Standard>().unwrap()
        );
    }

    #[test]
    fn test_no_table_select() {
        let mut select = Select::new();
        select.column(Expr::lit(1_i32));
        assert_eq!("SELECT\n    1", select.to_sql::<Standard>().unwrap());
    }

    #[test]
    fn test_empty_select_fails() {
        let err = Select::new().compile::<Standard>().unwrap_err();
        assert_eq!("select requires at least one result column", err.to_string());
    }

    #[test]
    fn test_foreign_result_fails() {
        let employee = Table::new("employee").unwrap().reference();
        let mut other = Select::new();
        let foreign = other.column(employee.column("id").unwrap());
        other.column(employee.column("name").unwrap());

        let mut select = Select::new();
        select.column(employee.column("id").unwrap());
        select.order_by_result(&foreign, Ordering::Asc);
        let err = select.compile::<Standard>().unwrap_err();
        assert!(matches!(err, Error::UnresolvedResult(1)));
    }

    #[test]
    fn test_result_index_is_stable() {
        let employee = Table::new("employee").unwrap().reference();
        let mut select = Select::new();
        let first = select.column(employee.column("id").unwrap());
        let second = select.column(employee.column("name").unwrap());
        select.order_by_result(&second, Ordering::Asc);
        select.compile::<Standard>().unwrap();
        select.column(employee.column("age").unwrap());

        assert_eq!(1, first.index());
        assert_eq!(2, second.index());
        assert_eq!(3, select.columns()[2].index());
    }

    #[test]
    fn test_parameters_follow_text_order() {
        let employee = Table::new("employee").unwrap().reference();
        let mut select = Select::new();
        select.column(Expr::param("label"));
        select.column(employee.column("name").unwrap());
        select.where_raw(raw("e.age > ?").bind(18_i32));
        select.where_group(|group| {
            group
                .or(Criteria::eq(employee.column("name").unwrap(), "ann"))
                .or(Criteria::eq(employee.column("name").unwrap(), "bob"));
        });

        let compiled = select.compile_with(&crate::Compiler::new(Dialect::POSTGRES)).unwrap();
        assert_eq!(
            "SELECT\n    $1,\n    e.\"name\"\nFROM\n    \"employee\" e\nWHERE\n    e.age > $2\n    AND (\n        e.\"name\" = $3\n        OR e.\"name\" = $4\n    )",
            compiled.sql()
        );
        assert_eq!(
            &[
                Bind::StaticString("label"),
                Bind::I32(18),
                Bind::StaticString("ann"),
                Bind::StaticString("bob"),
            ],
            compiled.binds().as_slice()
        );
    }

    #[test]
    fn test_compile_is_repeatable() {
        let employee = Table::new("employee").unwrap().reference();
        let mut select = Select::new();
        select.column(employee.column("name").unwrap());
        select.where_in(employee.column("id").unwrap(), [1_i32, 2]);
        let first = select.compile::<Standard>().unwrap();
        let second = select.compile::<Standard>().unwrap();
        assert_eq!(first, second);
    }
}
