use indexmap::IndexSet;

use crate::{
    builder::Select,
    col::ResultColumn,
    error::Result,
    raw::Raw,
    refs::CollectRefs,
    table::TableRef,
    writer::{FormatContext, FormatWriter},
};

use super::{
    IntoExpr,
    between::{BetweenCondition, BetweenOperator},
    binary::{CompareCondition, Comparison},
    distinct::{DistinctCondition, DistinctOperator},
    exists::{ExistsCondition, ExistsOperator},
    group::{Conjunction, GroupCondition},
    r#in::{InCondition, InOperator, InSource},
    unary::{NullCheck, UnaryCondition},
};

/// A boolean condition usable in WHERE, HAVING or as an expression.
///
/// Comparison constructors (`Criteria::eq`, `Criteria::lt`, ...), the null
/// checks and `between` are generated from their operator enums.
#[derive(Debug, Clone)]
pub enum Criteria {
    Compare(CompareCondition),
    Between(BetweenCondition),
    In(InCondition),
    Unary(UnaryCondition),
    Distinct(DistinctCondition),
    Group(GroupCondition),
    Not(Box<Criteria>),
    Exists(ExistsCondition),
    Raw(Raw),
}

impl Criteria {
    pub fn compare<L, R>(lhs: L, operator: Comparison, rhs: R) -> Self
    where
        L: IntoExpr,
        R: IntoExpr,
    {
        Self::Compare(CompareCondition {
            lhs: lhs.into_expr(),
            operator,
            rhs: rhs.into_expr(),
        })
    }

    pub fn unary<E: IntoExpr>(expr: E, operator: NullCheck) -> Self {
        Self::Unary(UnaryCondition {
            expr: expr.into_expr(),
            operator,
        })
    }

    pub fn range<E, L, H>(expr: E, operator: BetweenOperator, low: L, high: H) -> Self
    where
        E: IntoExpr,
        L: IntoExpr,
        H: IntoExpr,
    {
        Self::Between(BetweenCondition {
            expr: expr.into_expr(),
            operator,
            low: low.into_expr(),
            high: high.into_expr(),
        })
    }

    pub fn and<I: IntoIterator<Item = Criteria>>(items: I) -> Self {
        Self::Group(GroupCondition::new(Conjunction::And, items.into_iter().collect()))
    }

    pub fn or<I: IntoIterator<Item = Criteria>>(items: I) -> Self {
        Self::Group(GroupCondition::new(Conjunction::Or, items.into_iter().collect()))
    }

    pub fn negate(self) -> Self {
        Self::Not(Box::new(self))
    }

    fn in_list<E, I>(expr: E, operator: InOperator, values: I) -> Self
    where
        E: IntoExpr,
        I: IntoIterator,
        I::Item: IntoExpr,
    {
        Self::In(InCondition {
            operator,
            lhs: expr.into_expr(),
            rhs: InSource::List(values.into_iter().map(IntoExpr::into_expr).collect()),
        })
    }

    /// `expr IN (...)`; an empty list never matches.
    pub fn is_in<E, I>(expr: E, values: I) -> Self
    where
        E: IntoExpr,
        I: IntoIterator,
        I::Item: IntoExpr,
    {
        Self::in_list(expr, InOperator::In, values)
    }

    /// `expr NOT IN (...)`; an empty list always matches.
    pub fn not_in<E, I>(expr: E, values: I) -> Self
    where
        E: IntoExpr,
        I: IntoIterator,
        I::Item: IntoExpr,
    {
        Self::in_list(expr, InOperator::NotIn, values)
    }

    pub fn in_select<E: IntoExpr>(expr: E, select: Select) -> Self {
        Self::In(InCondition {
            operator: InOperator::In,
            lhs: expr.into_expr(),
            rhs: InSource::Select(Box::new(select)),
        })
    }

    pub fn not_in_select<E: IntoExpr>(expr: E, select: Select) -> Self {
        Self::In(InCondition {
            operator: InOperator::NotIn,
            lhs: expr.into_expr(),
            rhs: InSource::Select(Box::new(select)),
        })
    }

    pub fn exists(select: Select) -> Self {
        Self::Exists(ExistsCondition {
            operator: ExistsOperator::Exists,
            subquery: Box::new(select),
        })
    }

    pub fn not_exists(select: Select) -> Self {
        Self::Exists(ExistsCondition {
            operator: ExistsOperator::NotExists,
            subquery: Box::new(select),
        })
    }

    pub fn distinct_from<L: IntoExpr, R: IntoExpr>(lhs: L, rhs: R) -> Self {
        Self::Distinct(DistinctCondition {
            lhs: lhs.into_expr(),
            operator: DistinctOperator::Distinct,
            rhs: rhs.into_expr(),
        })
    }

    pub fn not_distinct_from<L: IntoExpr, R: IntoExpr>(lhs: L, rhs: R) -> Self {
        Self::Distinct(DistinctCondition {
            lhs: lhs.into_expr(),
            operator: DistinctOperator::NotDistinct,
            rhs: rhs.into_expr(),
        })
    }

    pub fn raw(raw: Raw) -> Self {
        Self::Raw(raw)
    }

    /// Skips groups of a single item, they render as that item.
    fn unwrap_single(&self) -> &Criteria {
        let mut current = self;
        while let Criteria::Group(group) = current {
            match group.items.as_slice() {
                [single] => current = single,
                _ => break,
            }
        }
        current
    }

    /// Renders inside another boolean context: compound groups get parentheses.
    pub(crate) fn format_nested(&self, context: &mut FormatContext<'_>) -> Result<()> {
        match self.unwrap_single() {
            Criteria::Group(group) if group.is_compound() => {
                context.write_block(|context| group.format_writer(context))
            }
            other => other.format_writer(context),
        }
    }

    /// Renders as an operand of a scalar expression, always parenthesized.
    pub(crate) fn format_operand(&self, context: &mut FormatContext<'_>) -> Result<()> {
        match self.unwrap_single() {
            Criteria::Group(group) if group.is_compound() => {
                context.write_block(|context| group.format_writer(context))
            }
            other => {
                context.write("(");
                other.format_writer(context)?;
                context.write(")");
                Ok(())
            }
        }
    }
}

impl std::ops::Not for Criteria {
    type Output = Criteria;

    fn not(self) -> Self::Output {
        self.negate()
    }
}

impl FormatWriter for Criteria {
    fn format_writer(&self, context: &mut FormatContext<'_>) -> Result<()> {
        match self {
            Criteria::Compare(compare) => compare.format_writer(context),
            Criteria::Between(between) => between.format_writer(context),
            Criteria::In(r#in) => r#in.format_writer(context),
            Criteria::Unary(unary) => unary.format_writer(context),
            Criteria::Distinct(distinct) => distinct.format_writer(context),
            Criteria::Group(group) => group.format_writer(context),
            Criteria::Not(inner) => {
                context.write("NOT ");
                inner.format_operand(context)
            }
            Criteria::Exists(exists) => exists.format_writer(context),
            Criteria::Raw(raw) => raw.format_writer(context),
        }
    }
}

impl CollectRefs for Criteria {
    fn collect_table_refs(&self, refs: &mut IndexSet<TableRef>) {
        match self {
            Criteria::Compare(compare) => compare.collect_table_refs(refs),
            Criteria::Between(between) => between.collect_table_refs(refs),
            Criteria::In(r#in) => r#in.collect_table_refs(refs),
            Criteria::Unary(unary) => unary.collect_table_refs(refs),
            Criteria::Distinct(distinct) => distinct.collect_table_refs(refs),
            Criteria::Group(group) => group.collect_table_refs(refs),
            Criteria::Not(inner) => inner.collect_table_refs(refs),
            // own scope
            Criteria::Exists(_) => {}
            Criteria::Raw(raw) => raw.collect_table_refs(refs),
        }
    }

    fn collect_result_refs(&self, refs: &mut IndexSet<ResultColumn>) {
        match self {
            Criteria::Group(group) => group.collect_result_refs(refs),
            Criteria::Not(inner) => inner.collect_result_refs(refs),
            _ => {}
        }
    }
}

/// WHERE / HAVING accumulator.
///
/// `and` after `or` wraps what came before, so `a OR b` followed by `and(c)`
/// is `(a OR b) AND c`, the way the calls read.
#[derive(Debug, Default, Clone)]
pub struct Conditions(Option<Criteria>);

impl Conditions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    pub fn and(&mut self, criteria: Criteria) -> &mut Self {
        self.push(Conjunction::And, criteria);
        self
    }

    pub fn or(&mut self, criteria: Criteria) -> &mut Self {
        self.push(Conjunction::Or, criteria);
        self
    }

    fn push(&mut self, conjunction: Conjunction, criteria: Criteria) {
        self.0 = Some(match self.0.take() {
            None => criteria,
            Some(Criteria::Group(mut group)) if group.conjunction == conjunction => {
                group.items.push(criteria);
                Criteria::Group(group)
            }
            Some(previous) => {
                Criteria::Group(GroupCondition::new(conjunction, vec![previous, criteria]))
            }
        });
    }

    pub fn into_criteria(self) -> Option<Criteria> {
        self.0
    }

    pub(crate) fn criteria(&self) -> Option<&Criteria> {
        self.0.as_ref()
    }
}

impl CollectRefs for Conditions {
    fn collect_table_refs(&self, refs: &mut IndexSet<TableRef>) {
        self.0.collect_table_refs(refs);
    }

    fn collect_result_refs(&self, refs: &mut IndexSet<ResultColumn>) {
        self.0.collect_result_refs(refs);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{Dialect, Table, raw, tests::format_aliased};

    use super::*;

    #[test]
    fn test_not() {
        let employee = Table::new("employee").unwrap().reference();
        let age = employee.column("age").unwrap();
        let criteria = !Criteria::lt(&age, 18_i32);
        assert_eq!("NOT (e.age < ?)", format_aliased(&criteria, Dialect::STANDARD).unwrap());

        let criteria = Criteria::or([Criteria::lt(&age, 18_i32), Criteria::gt(&age, 65_i32)]).negate();
        assert_eq!(
            "NOT (\n    e.age < ?\n    OR e.age > ?\n)",
            format_aliased(&criteria, Dialect::STANDARD).unwrap()
        );
    }

    #[test]
    fn test_conditions_follow_call_order() {
        let employee = Table::new("employee").unwrap().reference();
        let age = employee.column("age").unwrap();
        let mut conditions = Conditions::new();
        assert!(conditions.is_empty());
        conditions
            .and(Criteria::gt(&age, 18_i32))
            .and(Criteria::lt(&age, 65_i32))
            .or(Criteria::is_null(&age));
        let criteria = conditions.into_criteria().unwrap();
        assert_eq!(
            "(\n    e.age > ?\n    AND e.age < ?\n)\nOR e.age IS NULL",
            format_aliased(&criteria, Dialect::STANDARD).unwrap()
        );
    }

    #[test]
    fn test_raw_criteria_binds_in_order() {
        let employee = Table::new("employee").unwrap().reference();
        let criteria = Criteria::and([
            Criteria::eq(employee.column("id").unwrap(), 1_i32),
            Criteria::raw(raw("lower(name) = ?").bind("ann")),
        ]);
        assert_eq!(
            "e.\"id\" = $1\nAND lower(name) = $2",
            format_aliased(&criteria, Dialect::POSTGRES).unwrap()
        );
    }
}
