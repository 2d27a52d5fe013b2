//! SQL names and data type definitions.

use core::fmt;

use serde::Serialize;

use super::display::write_ident;
use super::Expr;
use crate::lexer::Span;

/// A possibly qualified name (`users`, `public.users`, `t.col`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ObjectName(pub Vec<String>);

impl ObjectName {
    /// Creates an unqualified name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(vec![name.into()])
    }

    /// Returns the last component.
    #[must_use]
    pub fn base(&self) -> &str {
        self.0.last().map_or("", String::as_str)
    }

    /// Returns the qualifying components (everything but the last).
    #[must_use]
    pub fn qualifier(&self) -> &[String] {
        match self.0.split_last() {
            Some((_, rest)) => rest,
            None => &[],
        }
    }
}

impl fmt::Display for ObjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, part) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write_ident(f, part)?;
        }
        Ok(())
    }
}

/// SQL data types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DataType {
    // Integer types
    /// Small integer (2 bytes).
    Smallint,
    /// Integer (4 bytes).
    Integer,
    /// Big integer (8 bytes).
    Bigint,

    // Floating point
    /// Real (4-byte float).
    Real,
    /// Double precision (8-byte float).
    DoublePrecision,
    /// Decimal with precision and scale.
    Decimal {
        /// Total number of digits.
        precision: Option<u16>,
        /// Number of digits after decimal point.
        scale: Option<u16>,
    },
    /// Numeric (alias for Decimal).
    Numeric {
        /// Total number of digits.
        precision: Option<u16>,
        /// Number of digits after decimal point.
        scale: Option<u16>,
    },

    // String types
    /// Fixed-length character string.
    Char(Option<u32>),
    /// Variable-length character string.
    Varchar(Option<u32>),
    /// Text (variable length, no limit).
    Text,

    /// Binary string.
    Bytea,

    /// Fixed-length bit string.
    Bit(Option<u32>),
    /// Variable-length bit string.
    VarBit(Option<u32>),

    // Date/time types
    /// Date.
    Date,
    /// Time of day.
    Time {
        /// `WITH TIME ZONE`
        with_time_zone: bool,
    },
    /// Timestamp.
    Timestamp {
        /// `WITH TIME ZONE`
        with_time_zone: bool,
    },
    /// Interval, optionally restricted to some fields (`INTERVAL DAY TO SECOND`).
    Interval(Option<IntervalFields>),

    // Boolean
    /// Boolean.
    Boolean,

    /// JSON text.
    Json,
    /// Binary JSON.
    Jsonb,
    /// UUID.
    Uuid,

    /// `element[]`
    Array(Box<DataType>),

    /// Any other (possibly schema-qualified) type name.
    Custom(ObjectName),
}

impl DataType {
    /// Maps a built-in type name spelled as an identifier (`text`, `int4`, ...).
    #[must_use]
    pub fn from_type_name(name: &str) -> Option<Self> {
        let data_type = match name {
            "int2" => Self::Smallint,
            "int4" => Self::Integer,
            "int8" => Self::Bigint,
            "float4" => Self::Real,
            "float8" => Self::DoublePrecision,
            "bool" => Self::Boolean,
            "text" => Self::Text,
            "bytea" => Self::Bytea,
            "varbit" => Self::VarBit(None),
            "date" => Self::Date,
            "timestamptz" => Self::Timestamp {
                with_time_zone: true,
            },
            "timetz" => Self::Time {
                with_time_zone: true,
            },
            "json" => Self::Json,
            "jsonb" => Self::Jsonb,
            "uuid" => Self::Uuid,
            _ => return None,
        };
        Some(data_type)
    }

    /// Returns the SQL representation of the data type.
    #[must_use]
    pub fn to_sql(&self) -> String {
        match self {
            Self::Smallint => String::from("SMALLINT"),
            Self::Integer => String::from("INTEGER"),
            Self::Bigint => String::from("BIGINT"),
            Self::Real => String::from("REAL"),
            Self::DoublePrecision => String::from("DOUBLE PRECISION"),
            Self::Decimal { precision, scale } => match (precision, scale) {
                (Some(p), Some(s)) => format!("DECIMAL({p}, {s})"),
                (Some(p), None) => format!("DECIMAL({p})"),
                _ => String::from("DECIMAL"),
            },
            Self::Numeric { precision, scale } => match (precision, scale) {
                (Some(p), Some(s)) => format!("NUMERIC({p}, {s})"),
                (Some(p), None) => format!("NUMERIC({p})"),
                _ => String::from("NUMERIC"),
            },
            Self::Char(len) => match len {
                Some(n) => format!("CHAR({n})"),
                None => String::from("CHAR"),
            },
            Self::Varchar(len) => match len {
                Some(n) => format!("VARCHAR({n})"),
                None => String::from("VARCHAR"),
            },
            Self::Text => String::from("TEXT"),
            Self::Bytea => String::from("BYTEA"),
            Self::Bit(len) => match len {
                Some(n) => format!("BIT({n})"),
                None => String::from("BIT"),
            },
            Self::VarBit(len) => match len {
                Some(n) => format!("BIT VARYING({n})"),
                None => String::from("BIT VARYING"),
            },
            Self::Date => String::from("DATE"),
            Self::Time { with_time_zone } => {
                if *with_time_zone {
                    String::from("TIME WITH TIME ZONE")
                } else {
                    String::from("TIME")
                }
            }
            Self::Timestamp { with_time_zone } => {
                if *with_time_zone {
                    String::from("TIMESTAMP WITH TIME ZONE")
                } else {
                    String::from("TIMESTAMP")
                }
            }
            Self::Interval(None) => String::from("INTERVAL"),
            Self::Interval(Some(fields)) => format!("INTERVAL {}", fields.as_str()),
            Self::Boolean => String::from("BOOLEAN"),
            Self::Json => String::from("JSON"),
            Self::Jsonb => String::from("JSONB"),
            Self::Uuid => String::from("UUID"),
            Self::Array(element) => format!("{}[]", element.to_sql()),
            Self::Custom(name) => name.to_string(),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}

/// The field restriction of an interval type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum IntervalFields {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    YearToMonth,
    DayToHour,
    DayToMinute,
    DayToSecond,
    HourToMinute,
    HourToSecond,
    MinuteToSecond,
}

impl IntervalFields {
    /// Returns the SQL spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Year => "YEAR",
            Self::Month => "MONTH",
            Self::Day => "DAY",
            Self::Hour => "HOUR",
            Self::Minute => "MINUTE",
            Self::Second => "SECOND",
            Self::YearToMonth => "YEAR TO MONTH",
            Self::DayToHour => "DAY TO HOUR",
            Self::DayToMinute => "DAY TO MINUTE",
            Self::DayToSecond => "DAY TO SECOND",
            Self::HourToMinute => "HOUR TO MINUTE",
            Self::HourToSecond => "HOUR TO SECOND",
            Self::MinuteToSecond => "MINUTE TO SECOND",
        }
    }

    /// Combines `from TO to`, or returns `None` for a range PostgreSQL rejects.
    #[must_use]
    pub const fn range(from: Self, to: Self) -> Option<Self> {
        let fields = match (from, to) {
            (Self::Year, Self::Month) => Self::YearToMonth,
            (Self::Day, Self::Hour) => Self::DayToHour,
            (Self::Day, Self::Minute) => Self::DayToMinute,
            (Self::Day, Self::Second) => Self::DayToSecond,
            (Self::Hour, Self::Minute) => Self::HourToMinute,
            (Self::Hour, Self::Second) => Self::HourToSecond,
            (Self::Minute, Self::Second) => Self::MinuteToSecond,
            _ => return None,
        };
        Some(fields)
    }
}

/// A column constraint in CREATE TABLE.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ColumnConstraint {
    /// `NOT NULL`
    NotNull,
    /// `NULL`
    Null,
    /// `PRIMARY KEY`
    PrimaryKey,
    /// `UNIQUE`
    Unique,
    /// `DEFAULT expr`
    Default(Expr),
    /// `REFERENCES table [(column)]`
    References {
        /// Referenced table.
        table: ObjectName,
        /// Referenced column.
        column: Option<String>,
    },
}

/// A column definition for CREATE TABLE.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnDef {
    /// Column name.
    pub name: String,
    /// Data type.
    pub data_type: DataType,
    /// Constraints, in source order.
    pub constraints: Vec<ColumnConstraint>,
    /// Source span.
    pub span: Span,
}

impl ColumnDef {
    /// Creates a new column definition without constraints.
    #[must_use]
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            constraints: vec![],
            span: Span::default(),
        }
    }

    /// Returns false when the column is declared NOT NULL or PRIMARY KEY.
    #[must_use]
    pub fn is_nullable(&self) -> bool {
        !self
            .constraints
            .iter()
            .any(|c| matches!(c, ColumnConstraint::NotNull | ColumnConstraint::PrimaryKey))
    }

    /// Returns the DEFAULT expression, if any.
    #[must_use]
    pub fn default_value(&self) -> Option<&Expr> {
        self.constraints.iter().find_map(|c| match c {
            ColumnConstraint::Default(expr) => Some(expr),
            _ => None,
        })
    }
}
