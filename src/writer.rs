use indexmap::IndexSet;
use smol_str::SmolStr;

use crate::{
    alias::{AliasPolicy, AliasRegistry, Aliases},
    bind::{Bind, Binds},
    col::ResultColumn,
    dialect::{Dialect, HasDialect, Placeholder, TableAlias},
    error::{Error, Result},
    table::TableRef,
};

const INDENT: &str = "    ";

/// Text and parameters of one statement, nested statements included.
#[derive(Debug, Default)]
pub(crate) struct OutputBuffer {
    text: String,
    binds: Binds,
    depth: usize,
    pending_line: bool,
}

impl OutputBuffer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn write(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if self.pending_line {
            self.pending_line = false;
            if !self.text.is_empty() {
                self.text.push('\n');
            }
            for _ in 0..self.depth {
                self.text.push_str(INDENT);
            }
        }
        self.text.push_str(text);
    }

    /// The break is only written once more text follows.
    pub(crate) fn write_line(&mut self) {
        self.pending_line = true;
    }

    pub(crate) fn indent(&mut self) {
        self.depth += 1;
    }

    pub(crate) fn unindent(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Returns the 1-based position of the parameter.
    pub(crate) fn add_bind(&mut self, bind: Bind) -> usize {
        self.binds.push(bind);
        self.binds.len()
    }

    #[cfg(test)]
    pub(crate) fn render(&self) -> &str {
        &self.text
    }

    pub(crate) fn finish(self) -> Compiled {
        Compiled {
            sql: self.text,
            binds: self.binds,
        }
    }
}

/// Rendered SQL plus its parameters in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct Compiled {
    pub(crate) sql: String,
    pub(crate) binds: Binds,
}

impl Compiled {
    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn binds(&self) -> &Binds {
        &self.binds
    }

    pub fn into_parts(self) -> (String, Binds) {
        (self.sql, self.binds)
    }
}

/// How column references of a scope are qualified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Qualify {
    Alias,
    TableName,
    Bare,
}

/// Alias assignments visible to one statement, chained to its parent.
#[derive(Debug)]
pub(crate) struct Scope<'p> {
    aliases: Aliases,
    qualify: Qualify,
    parent: Option<&'p Scope<'p>>,
}

impl Scope<'_> {
    pub(crate) fn root() -> Scope<'static> {
        Scope {
            aliases: Aliases::default(),
            qualify: Qualify::Alias,
            parent: None,
        }
    }

    /// Bare columns only resolve to the innermost FROM, so a bare entry of an
    /// enclosing scope is qualified by its table name.
    fn find(&self, table_ref: &TableRef) -> Option<(&SmolStr, Qualify)> {
        if let Some(alias) = self.aliases.tables.get(table_ref) {
            return Some((alias, self.qualify));
        }
        let (alias, qualify) = self.parent?.find(table_ref)?;
        match qualify {
            Qualify::Bare => Some((alias, Qualify::TableName)),
            qualify => Some((alias, qualify)),
        }
    }

    fn visible_aliases(&self) -> Vec<SmolStr> {
        let mut names = Vec::new();
        let mut scope = Some(self);
        while let Some(current) = scope {
            names.extend(current.aliases.tables.values().cloned());
            names.extend(current.aliases.results.values().cloned());
            scope = current.parent;
        }
        names
    }
}

pub(crate) trait FormatWriter {
    fn format_writer(&self, context: &mut FormatContext<'_>) -> Result<()>;
}

/// Compiler context: the shared buffer, the dialect and the current scope.
pub(crate) struct FormatContext<'a> {
    buffer: &'a mut OutputBuffer,
    pub(crate) dialect: &'a Dialect,
    policy: AliasPolicy,
    scope: &'a Scope<'a>,
}

impl<'a> FormatContext<'a> {
    pub(crate) fn new(
        buffer: &'a mut OutputBuffer,
        dialect: &'a Dialect,
        policy: AliasPolicy,
        scope: &'a Scope<'a>,
    ) -> Self {
        Self {
            buffer,
            dialect,
            policy,
            scope,
        }
    }

    pub(crate) fn write(&mut self, text: &str) {
        self.buffer.write(text);
    }

    pub(crate) fn write_line(&mut self) {
        self.buffer.write_line();
    }

    pub(crate) fn indent(&mut self) {
        self.buffer.indent();
    }

    pub(crate) fn unindent(&mut self) {
        self.buffer.unindent();
    }

    pub(crate) fn write_display<T: std::fmt::Display>(&mut self, value: T) {
        self.buffer.write(&value.to_string());
    }

    fn write_quoted(&mut self, ident: &str, quote: Option<char>) -> Result<()> {
        let Some(quote) = quote else {
            self.buffer.write(ident);
            return Ok(());
        };
        if ident.contains(quote) {
            return Err(Error::UnquotableIdentifier {
                ident: SmolStr::new(ident),
                quote,
            });
        }
        let mut quoted = String::with_capacity(ident.len() + 2);
        quoted.push(quote);
        quoted.push_str(ident);
        quoted.push(quote);
        self.buffer.write(&quoted);
        Ok(())
    }

    pub(crate) fn write_table_name(&mut self, name: &str) -> Result<()> {
        self.write_quoted(name, self.dialect.table_quote)
    }

    pub(crate) fn write_table_alias(&mut self, alias: &str) -> Result<()> {
        self.write_quoted(alias, self.dialect.alias_quote)
    }

    pub(crate) fn write_column_name(&mut self, name: &str) -> Result<()> {
        self.write_quoted(name, self.dialect.column_quote)
    }

    pub(crate) fn write_result_alias(&mut self, alias: &str) -> Result<()> {
        self.write_quoted(alias, self.dialect.result_quote)
    }

    /// Writes the placeholder token and records the value behind it.
    pub(crate) fn write_bind(&mut self, bind: Bind) {
        let position = self.buffer.add_bind(bind);
        match self.dialect.placeholder {
            Placeholder::Anonymous => self.buffer.write("?"),
            Placeholder::Dollar => self.write_display(format_args!("${position}")),
            Placeholder::NumberedQuestion => self.write_display(format_args!("?{position}")),
        }
    }

    /// `employee e` (or `employee AS e`) in alias scopes, `employee` otherwise.
    pub(crate) fn write_table_ref(&mut self, table_ref: &TableRef) -> Result<()> {
        self.write_table_name(table_ref.name())?;
        if let Some((alias, Qualify::Alias)) = self.scope.find(table_ref) {
            let alias = alias.clone();
            self.buffer.write(match self.dialect.table_alias {
                TableAlias::Space => " ",
                TableAlias::As => " AS ",
            });
            self.write_table_alias(&alias)?;
        }
        Ok(())
    }

    /// Writes the `qualifier.` in front of a column of `table_ref`.
    pub(crate) fn write_qualifier(&mut self, table_ref: &TableRef) -> Result<()> {
        let Some((alias, qualify)) = self.scope.find(table_ref) else {
            return Err(Error::UnresolvedTable(SmolStr::new(table_ref.name())));
        };
        match qualify {
            Qualify::Alias => {
                let alias = alias.clone();
                self.write_table_alias(&alias)?;
                self.buffer.write(".");
            }
            Qualify::TableName => {
                self.write_table_name(table_ref.name())?;
                self.buffer.write(".");
            }
            Qualify::Bare => {}
        }
        Ok(())
    }

    pub(crate) fn in_scope(&self, table_ref: &TableRef) -> bool {
        self.scope.find(table_ref).is_some()
    }

    /// Alias of a result column of the current statement, if ordering asked for one.
    pub(crate) fn result_alias(&self, result: &ResultColumn) -> Option<SmolStr> {
        self.scope.aliases.results.get(result).cloned()
    }

    /// Assigns aliases for a statement nested in the current scope, never
    /// reusing a name visible from here.
    pub(crate) fn assign_aliases(
        &self,
        tables: &IndexSet<TableRef>,
        results: &IndexSet<ResultColumn>,
    ) -> Aliases {
        let mut registry = AliasRegistry::new(self.policy);
        registry.reserve(self.scope.visible_aliases());
        Aliases::assign(&mut registry, tables, results)
    }

    /// Runs `f` inside a child scope writing to the same buffer.
    pub(crate) fn nested<F>(&mut self, aliases: Aliases, qualify: Qualify, f: F) -> Result<()>
    where
        F: FnOnce(&mut FormatContext<'_>) -> Result<()>,
    {
        let scope = Scope {
            aliases,
            qualify,
            parent: Some(self.scope),
        };
        let mut child = FormatContext {
            buffer: &mut *self.buffer,
            dialect: self.dialect,
            policy: self.policy,
            scope: &scope,
        };
        f(&mut child)
    }

    /// Writes `items` one per line, separated by `,`.
    pub(crate) fn write_list<T, F>(&mut self, items: &[T], mut f: F) -> Result<()>
    where
        F: FnMut(&mut Self, &T) -> Result<()>,
    {
        for (index, item) in items.iter().enumerate() {
            if index > 0 {
                self.write(",");
                self.write_line();
            }
            f(self, item)?;
        }
        Ok(())
    }

    /// `KEYWORD` on its own line followed by an indented body.
    pub(crate) fn write_clause<F>(&mut self, keyword: &str, f: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        self.write_line();
        self.write(keyword);
        self.indent();
        self.write_line();
        let result = f(self);
        self.unindent();
        result
    }

    /// `(` + indented block + `)` used for nested statements and groups.
    pub(crate) fn write_block<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        self.write("(");
        self.indent();
        self.write_line();
        let result = f(self);
        self.unindent();
        self.write_line();
        self.write(")");
        result
    }
}

/// Compilation settings: the dialect to render and the alias policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct Compiler {
    dialect: Dialect,
    policy: AliasPolicy,
}

impl Compiler {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            policy: AliasPolicy::default(),
        }
    }

    pub fn for_dialect<D: HasDialect>() -> Self {
        Self::new(D::DIALECT)
    }

    pub fn alias_policy(mut self, policy: AliasPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    pub(crate) fn compile<S>(&self, kind: &'static str, statement: &S) -> Result<Compiled>
    where
        S: FormatWriter + ?Sized,
    {
        let mut buffer = OutputBuffer::new();
        let root = Scope::root();
        let mut context = FormatContext::new(&mut buffer, &self.dialect, self.policy, &root);
        statement.format_writer(&mut context)?;
        let compiled = buffer.finish();
        tracing::debug!(statement = kind, binds = compiled.binds.len(), "compiled statement");
        tracing::trace!(sql = %compiled.sql);
        Ok(compiled)
    }
}

macro_rules! impl_compile {
    ($ty:ty, $kind:literal) => {
        impl $ty {
            /// Compiles for the dialect of `Database`.
            pub fn compile<Database: $crate::HasDialect>(&self) -> $crate::Result<$crate::Compiled> {
                $crate::Compiler::for_dialect::<Database>().compile($kind, self)
            }

            pub fn compile_with(&self, compiler: &$crate::Compiler) -> $crate::Result<$crate::Compiled> {
                compiler.compile($kind, self)
            }

            pub fn to_sql<Database: $crate::HasDialect>(&self) -> $crate::Result<String> {
                self.compile::<Database>().map(|compiled| compiled.sql)
            }
        }
    };
}

pub(crate) use impl_compile;

#[cfg(test)]
mod tests {
    use crate::Table;

    use super::*;

    #[test]
    fn test_deferred_line_never_trails() {
        let mut buffer = OutputBuffer::new();
        buffer.write("SELECT");
        buffer.indent();
        buffer.write_line();
        buffer.write("a,");
        buffer.write_line();
        buffer.write("b");
        buffer.unindent();
        buffer.write_line();
        buffer.write_line();
        assert_eq!("SELECT\n    a,\n    b", buffer.render());
        buffer.write("FROM");
        assert_eq!("SELECT\n    a,\n    b\nFROM", buffer.render());
    }

    #[test]
    fn test_leading_line_is_dropped() {
        let mut buffer = OutputBuffer::new();
        buffer.write_line();
        buffer.write("");
        buffer.write("DELETE");
        assert_eq!("DELETE", buffer.render());
    }

    #[test]
    fn test_binds_are_numbered() {
        let mut buffer = OutputBuffer::new();
        assert_eq!(1, buffer.add_bind(Bind::I32(1)));
        assert_eq!(2, buffer.add_bind(Bind::Null));
        let compiled = buffer.finish();
        assert_eq!(2, compiled.binds().len());
    }

    #[test]
    fn test_placeholders_per_dialect() {
        for (dialect, expected) in [
            (Dialect::STANDARD, "? ?"),
            (Dialect::POSTGRES, "$1 $2"),
            (Dialect::SQLITE, "?1 ?2"),
        ] {
            let mut buffer = OutputBuffer::new();
            let root = Scope::root();
            let mut context = FormatContext::new(&mut buffer, &dialect, AliasPolicy::default(), &root);
            context.write_bind(Bind::I32(1));
            context.write(" ");
            context.write_bind(Bind::I32(2));
            assert_eq!(expected, buffer.render());
        }
    }

    #[test]
    fn test_quote_character_fails() {
        let mut buffer = OutputBuffer::new();
        let root = Scope::root();
        let mut context =
            FormatContext::new(&mut buffer, &Dialect::POSTGRES, AliasPolicy::default(), &root);
        context.write_table_name("plain").unwrap();
        let err = context.write_column_name("we\"ird").unwrap_err();
        assert!(matches!(err, Error::UnquotableIdentifier { quote: '"', .. }));
        assert_eq!("\"plain\"", buffer.render());
    }

    #[test]
    fn test_unscoped_table_fails() {
        let employee = Table::new("employee").unwrap();
        let mut buffer = OutputBuffer::new();
        let root = Scope::root();
        let mut context =
            FormatContext::new(&mut buffer, &Dialect::STANDARD, AliasPolicy::default(), &root);
        let err = context.write_qualifier(&employee.reference()).unwrap_err();
        assert_eq!("table `employee` is not in scope for this statement", err.to_string());
    }
}
