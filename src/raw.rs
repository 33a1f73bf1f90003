use indexmap::IndexSet;
use smol_str::SmolStr;

use crate::{
    bind::{Binds, IntoBind, IntoBinds},
    error::{Error, Result},
    refs::CollectRefs,
    table::TableRef,
    writer::{FormatContext, FormatWriter},
};

/// Verbatim SQL with `?` markers for its own bound values.
///
/// Each marker outside of string literals and quoted identifiers is rewritten
/// to the dialect placeholder. `??`, `?|` and `?&` are left alone so json
/// operators survive.
#[derive(Debug, Clone, PartialEq)]
pub struct Raw {
    sql: SmolStr,
    binds: Binds,
}

impl Raw {
    pub fn new<T>(value: T) -> Self
    where
        T: Into<SmolStr>,
    {
        Self {
            sql: value.into(),
            binds: Binds::None,
        }
    }

    pub fn new_static(value: &'static str) -> Self {
        Self::new(SmolStr::new_static(value))
    }

    pub fn bind<T: IntoBind>(mut self, value: T) -> Self {
        self.binds.push(value.into_bind());
        self
    }

    pub fn binds<T: IntoBinds>(mut self, values: T) -> Self {
        self.binds.append(values.into_binds());
        self
    }

    pub fn as_str(&self) -> &str {
        &self.sql
    }
}

/// Byte offsets of the placeholder markers in `sql`.
fn placeholders(sql: &str) -> Vec<usize> {
    enum State {
        Normal,
        Quoted(char),
    }

    let mut state = State::Normal;
    let mut positions = Vec::new();
    let mut chars = sql.char_indices().peekable();
    while let Some((index, char)) = chars.next() {
        match state {
            State::Normal => match char {
                '\'' | '"' | '`' => state = State::Quoted(char),
                '?' => match chars.peek() {
                    Some(&(_, '?' | '|' | '&')) => {
                        chars.next();
                    }
                    _ => positions.push(index),
                },
                _ => {}
            },
            State::Quoted(quote) => {
                if char == quote {
                    // a doubled quote is escaped and stays inside
                    if matches!(chars.peek(), Some(&(_, next)) if next == quote) {
                        chars.next();
                    } else {
                        state = State::Normal;
                    }
                }
            }
        }
    }
    positions
}

impl FormatWriter for Raw {
    fn format_writer(&self, context: &mut FormatContext<'_>) -> Result<()> {
        let sql = self.sql.as_str();
        let positions = placeholders(sql);
        if positions.len() != self.binds.len() {
            return Err(Error::RawBindCount {
                placeholders: positions.len(),
                binds: self.binds.len(),
            });
        }

        let mut span_start = 0;
        for (position, bind) in positions.into_iter().zip(self.binds.iter()) {
            context.write(&sql[span_start..position]);
            context.write_bind(bind.clone());
            span_start = position + 1;
        }
        context.write(&sql[span_start..]);
        Ok(())
    }
}

impl CollectRefs for Raw {
    fn collect_table_refs(&self, _refs: &mut IndexSet<TableRef>) {}
}

#[cfg(test)]
mod tests {
    use crate::{bind::Bind, dialect::Dialect, tests::format_writer};

    use super::*;

    #[test]
    fn test_raw_str() {
        let raw = format_writer(&Raw::new_static("'te?st'"), Dialect::POSTGRES).unwrap();
        assert_eq!("'te?st'", raw);
    }

    #[test]
    fn test_raw_double_quote() {
        let raw = format_writer(&Raw::new_static("'te''? st'"), Dialect::POSTGRES).unwrap();
        assert_eq!("'te''? st'", raw);
    }

    #[test]
    fn test_raw_bind() {
        let value = Raw::new_static("'test' = ?").bind(1_i32);
        assert_eq!("'test' = $1", format_writer(&value, Dialect::POSTGRES).unwrap());
        assert_eq!("'test' = ?", format_writer(&value, Dialect::MYSQL).unwrap());
        assert_eq!("'test' = ?1", format_writer(&value, Dialect::SQLITE).unwrap());
    }

    #[test]
    fn test_raw_ident() {
        let value = Raw::new_static("\"te? ? \"\"st\" = ?").bind("x");
        let raw = format_writer(&value, Dialect::POSTGRES).unwrap();
        assert_eq!("\"te? ? \"\"st\" = $1", raw);
    }

    #[test]
    fn test_placeholder_double() {
        let raw = format_writer(&Raw::new_static("data ?? 'a' AND data ?| b"), Dialect::POSTGRES).unwrap();
        assert_eq!("data ?? 'a' AND data ?| b", raw);
    }

    #[test]
    fn test_bind_count_mismatch() {
        let value = Raw::new_static("a = ? AND b = ?").bind(1_i32);
        let err = format_writer(&value, Dialect::STANDARD).unwrap_err();
        assert!(matches!(err, Error::RawBindCount { placeholders: 2, binds: 1 }));
    }

    #[test]
    fn test_binds_keep_order() {
        let value = Raw::new_static("coalesce(?, ?)").binds([Bind::I32(1), Bind::Null]);
        assert_eq!(2, value.binds.len());
        assert_eq!(Some(&Bind::Null), value.binds.iter().nth(1));
    }
}
