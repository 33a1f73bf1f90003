use smol_str::SmolStr;

use crate::{
    error::{Error, Result},
    writer::{FormatContext, FormatWriter},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Date {
    pub year: i32,
    pub month: u8,
    pub day: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Time {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub nanosecond: u32,
}

/// A value spelled out in the statement text.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(SmolStr),
    Date(Date),
    Time(Time),
    Timestamp(Date, Time),
}

impl Literal {
    pub fn date(year: i32, month: u8, day: u8) -> Self {
        Self::Date(Date { year, month, day })
    }

    pub fn time(hour: u8, minute: u8, second: u8) -> Self {
        Self::Time(Time {
            hour,
            minute,
            second,
            nanosecond: 0,
        })
    }

    pub fn timestamp(date: Date, time: Time) -> Self {
        Self::Timestamp(date, time)
    }
}

fn format_date(date: &Date) -> String {
    if date.year < 0 {
        format!("-{:04}-{:02}-{:02}", -(date.year as i64), date.month, date.day)
    } else {
        format!("{:04}-{:02}-{:02}", date.year, date.month, date.day)
    }
}

fn format_time(time: &Time) -> String {
    let mut text = format!("{:02}:{:02}:{:02}", time.hour, time.minute, time.second);
    if time.nanosecond > 0 {
        let fraction = format!("{:09}", time.nanosecond);
        text.push('.');
        text.push_str(fraction.trim_end_matches('0'));
    }
    text
}

fn write_string(context: &mut FormatContext<'_>, value: &str) {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for char in value.chars() {
        if char == '\'' {
            quoted.push('\'');
        }
        quoted.push(char);
    }
    quoted.push('\'');
    context.write(&quoted);
}

impl FormatWriter for Literal {
    fn format_writer(&self, context: &mut FormatContext<'_>) -> Result<()> {
        match self {
            Literal::Null => context.write("NULL"),
            Literal::Bool(true) => context.write("TRUE"),
            Literal::Bool(false) => context.write("FALSE"),
            Literal::Int(value) => context.write_display(value),
            Literal::Float(value) => {
                if !value.is_finite() {
                    return Err(Error::NonFiniteLiteral(*value));
                }
                // Display never uses exponents or locale separators
                context.write_display(value);
            }
            Literal::String(value) => write_string(context, value),
            Literal::Date(date) => {
                context.write("DATE ");
                write_string(context, &format_date(date));
            }
            Literal::Time(time) => {
                context.write("TIME ");
                write_string(context, &format_time(time));
            }
            Literal::Timestamp(date, time) => {
                context.write("TIMESTAMP ");
                let text = format!("{} {}", format_date(date), format_time(time));
                write_string(context, &text);
            }
        }
        Ok(())
    }
}

pub trait IntoLiteral {
    fn into_literal(self) -> Literal;
}

impl IntoLiteral for Literal {
    fn into_literal(self) -> Literal {
        self
    }
}

impl<T: IntoLiteral> IntoLiteral for Option<T> {
    fn into_literal(self) -> Literal {
        self.map_or(Literal::Null, IntoLiteral::into_literal)
    }
}

/// Widened through its shortest decimal form, so `0.1_f32` stays `0.1`.
impl IntoLiteral for f32 {
    fn into_literal(self) -> Literal {
        Literal::Float(self.to_string().parse().unwrap_or(f64::NAN))
    }
}

macro_rules! into_literal {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(
            impl IntoLiteral for $ty {
                fn into_literal(self) -> Literal {
                    Literal::$variant(self.into())
                }
            }
        )+
    };
}

into_literal! {
    bool => Bool,
    i8 => Int,
    i16 => Int,
    i32 => Int,
    i64 => Int,
    u8 => Int,
    u16 => Int,
    u32 => Int,
    f64 => Float,
    &str => String,
    String => String,
    &String => String,
    SmolStr => String,
    Date => Date,
    Time => Time,
}

#[cfg(feature = "chrono")]
mod chrono_literals {
    use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

    use super::*;

    fn date(value: NaiveDate) -> Date {
        Date {
            year: value.year(),
            month: value.month() as u8,
            day: value.day() as u8,
        }
    }

    fn time(value: NaiveTime) -> Time {
        Time {
            hour: value.hour() as u8,
            minute: value.minute() as u8,
            second: value.second() as u8,
            nanosecond: value.nanosecond(),
        }
    }

    impl IntoLiteral for NaiveDate {
        fn into_literal(self) -> Literal {
            Literal::Date(date(self))
        }
    }

    impl IntoLiteral for NaiveTime {
        fn into_literal(self) -> Literal {
            Literal::Time(time(self))
        }
    }

    impl IntoLiteral for NaiveDateTime {
        fn into_literal(self) -> Literal {
            Literal::Timestamp(date(self.date()), time(self.time()))
        }
    }
}

#[cfg(feature = "time")]
mod time_literals {
    use super::*;

    fn date(value: time::Date) -> Date {
        Date {
            year: value.year(),
            month: u8::from(value.month()),
            day: value.day(),
        }
    }

    fn time(value: time::Time) -> Time {
        Time {
            hour: value.hour(),
            minute: value.minute(),
            second: value.second(),
            nanosecond: value.nanosecond(),
        }
    }

    impl IntoLiteral for time::Date {
        fn into_literal(self) -> Literal {
            Literal::Date(date(self))
        }
    }

    impl IntoLiteral for time::Time {
        fn into_literal(self) -> Literal {
            Literal::Time(time(self))
        }
    }

    impl IntoLiteral for time::PrimitiveDateTime {
        fn into_literal(self) -> Literal {
            Literal::Timestamp(date(self.date()), time(self.time()))
        }
    }
}
