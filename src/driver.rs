//! Hand-off of compiled statements to sqlx.

use sqlx::{Arguments, Database, Executor, IntoArguments, error::BoxDynError};

use crate::{
    bind::{Bind, Binds},
    error::{Error, Result},
    writer::Compiled,
};

/// Hands binds to `add` in order and returns how many were accepted.
///
/// Stops at the first failure so later values never shift placeholders; the
/// driver then reports the short argument list.
fn add_all<F>(binds: Binds, mut add: F) -> usize
where
    F: FnMut(Bind) -> std::result::Result<(), BoxDynError>,
{
    let mut added = 0;
    for bind in binds {
        if let Err(error) = add(bind) {
            tracing::error!(%error, position = added + 1, "failed to encode bound value");
            break;
        }
        added += 1;
    }
    added
}

macro_rules! impl_into_arguments {
    ($feature:literal, $db:ty) => {
        #[cfg(feature = $feature)]
        impl<'q> IntoArguments<'q, $db> for Binds {
            fn into_arguments(self) -> <$db as Database>::Arguments<'q> {
                let mut arguments = <$db as Database>::Arguments::<'q>::default();
                add_all(self, |bind| match bind {
                    Bind::Null => arguments.add(None::<String>),
                    Bind::String(value) => arguments.add(value),
                    Bind::StaticString(value) => arguments.add(value),
                    Bind::Bool(value) => arguments.add(value),
                    Bind::F32(value) => arguments.add(value),
                    Bind::F64(value) => arguments.add(value),
                    Bind::I16(value) => arguments.add(value),
                    Bind::I32(value) => arguments.add(value),
                    Bind::I64(value) => arguments.add(value),
                    #[cfg(feature = "chrono")]
                    Bind::ChronoDate(value) => arguments.add(value),
                    #[cfg(feature = "chrono")]
                    Bind::ChronoTime(value) => arguments.add(value),
                    #[cfg(feature = "chrono")]
                    Bind::ChronoDateTime(value) => arguments.add(value),
                    #[cfg(feature = "chrono")]
                    Bind::ChronoUtc(value) => arguments.add(value),
                    #[cfg(feature = "time")]
                    Bind::Date(value) => arguments.add(value),
                    #[cfg(feature = "time")]
                    Bind::Time(value) => arguments.add(value),
                    #[cfg(feature = "time")]
                    Bind::PrimitiveDateTime(value) => arguments.add(value),
                    #[cfg(feature = "time")]
                    Bind::OffsetDateTime(value) => arguments.add(value),
                    #[cfg(feature = "uuid")]
                    Bind::Uuid(value) => arguments.add(value),
                    #[cfg(feature = "json")]
                    Bind::Json(value) => arguments.add(value),
                });
                arguments
            }
        }
    };
}

impl_into_arguments!("postgres", sqlx::Postgres);
impl_into_arguments!("mysql", sqlx::MySql);
impl_into_arguments!("sqlite", sqlx::Sqlite);

impl Compiled {
    /// Runs the statement and returns the driver's summary of it.
    pub async fn execute<'c, DB, E>(self, executor: E) -> Result<DB::QueryResult>
    where
        DB: Database,
        E: Executor<'c, Database = DB>,
        Binds: for<'q> IntoArguments<'q, DB>,
    {
        let Compiled { sql, binds } = self;
        let outcome = sqlx::query_with(&sql, binds).execute(executor).await?;
        Ok(outcome)
    }

    /// Maps every returned row with `mapper`.
    pub async fn fetch_all<'c, DB, E, T, F>(self, executor: E, mut mapper: F) -> Result<Vec<T>>
    where
        DB: Database,
        E: Executor<'c, Database = DB>,
        Binds: for<'q> IntoArguments<'q, DB>,
        F: FnMut(&DB::Row) -> std::result::Result<T, sqlx::Error>,
    {
        let Compiled { sql, binds } = self;
        let rows = sqlx::query_with(&sql, binds).fetch_all(executor).await?;
        let values = rows
            .iter()
            .map(&mut mapper)
            .collect::<std::result::Result<Vec<T>, sqlx::Error>>()?;
        Ok(values)
    }

    /// At most one row; more fails with [`Error::TooManyRows`].
    pub async fn fetch_optional<'c, DB, E, T, F>(self, executor: E, mapper: F) -> Result<Option<T>>
    where
        DB: Database,
        E: Executor<'c, Database = DB>,
        Binds: for<'q> IntoArguments<'q, DB>,
        F: FnMut(&DB::Row) -> std::result::Result<T, sqlx::Error>,
    {
        let mut values = self.fetch_all(executor, mapper).await?;
        if values.len() > 1 {
            return Err(Error::TooManyRows(values.len()));
        }
        Ok(values.pop())
    }

    /// Exactly one row; none fails with `sqlx::Error::RowNotFound`.
    pub async fn fetch_one<'c, DB, E, T, F>(self, executor: E, mapper: F) -> Result<T>
    where
        DB: Database,
        E: Executor<'c, Database = DB>,
        Binds: for<'q> IntoArguments<'q, DB>,
        F: FnMut(&DB::Row) -> std::result::Result<T, sqlx::Error>,
    {
        self.fetch_optional(executor, mapper)
            .await?
            .ok_or(Error::Database(sqlx::Error::RowNotFound))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::IntoBinds;

    use super::*;

    #[test]
    fn test_encoding_stops_at_first_failure() {
        let mut seen = Vec::new();
        let added = add_all([1_i32, 2, 3].into_binds(), |bind| {
            if bind == Bind::I32(2) {
                return Err("unsupported".into());
            }
            seen.push(bind);
            Ok(())
        });
        assert_eq!(1, added);
        assert_eq!(vec![Bind::I32(1)], seen);
    }
}
