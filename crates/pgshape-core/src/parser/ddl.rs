//! CREATE TABLE, DROP TABLE and type names.

use super::error::ParseError;
use super::parser::Parser;
use crate::ast::{
    ColumnConstraint, ColumnDef, CreateTableStatement, DataType, DropBehavior, DropTableStatement,
    IntervalFields,
};
use crate::lexer::{Keyword, KeywordCategory, TokenKind};

impl Parser<'_> {
    /// Parses `CREATE [TEMP] TABLE [IF NOT EXISTS] name (column, ...)`.
    pub(super) fn parse_create_table(&mut self) -> Result<CreateTableStatement, ParseError> {
        let start = self.expect_keyword(Keyword::Create)?.span.start;
        let temporary =
            self.eat_keyword(Keyword::Temp)? || self.eat_keyword(Keyword::Temporary)?;
        self.expect_keyword(Keyword::Table)?;

        let if_not_exists = if self.eat_keyword(Keyword::If)? {
            self.expect_keyword(Keyword::Not)?;
            self.expect_keyword(Keyword::Exists)?;
            true
        } else {
            false
        };

        let name = self.parse_object_name("table name")?;

        self.expect(&TokenKind::LeftParen)?;
        let mut columns = vec![];
        loop {
            columns.push(self.parse_column_def()?);
            if !self.eat(&TokenKind::Comma)? {
                break;
            }
        }
        self.expect(&TokenKind::RightParen)?;

        Ok(CreateTableStatement {
            temporary,
            if_not_exists,
            name,
            columns,
            span: self.span_from(start),
        })
    }

    fn parse_column_def(&mut self) -> Result<ColumnDef, ParseError> {
        let start = self.current.span.start;
        let name = self.parse_identifier("column name")?;
        let data_type = self.parse_data_type()?;

        let mut constraints = vec![];
        loop {
            let constraint = match self.current.as_keyword() {
                Some(Keyword::Not) => {
                    self.advance()?;
                    self.expect_keyword(Keyword::Null)?;
                    ColumnConstraint::NotNull
                }
                Some(Keyword::Null) => {
                    self.advance()?;
                    ColumnConstraint::Null
                }
                Some(Keyword::Primary) => {
                    self.advance()?;
                    self.expect_keyword(Keyword::Key)?;
                    ColumnConstraint::PrimaryKey
                }
                Some(Keyword::Unique) => {
                    self.advance()?;
                    ColumnConstraint::Unique
                }
                Some(Keyword::Default) => {
                    self.advance()?;
                    ColumnConstraint::Default(self.parse_expr()?)
                }
                Some(Keyword::References) => {
                    self.advance()?;
                    let table = self.parse_object_name("table name")?;
                    let column = if self.eat(&TokenKind::LeftParen)? {
                        let column = self.parse_identifier("column name")?;
                        self.expect(&TokenKind::RightParen)?;
                        Some(column)
                    } else {
                        None
                    };
                    ColumnConstraint::References { table, column }
                }
                _ => break,
            };
            constraints.push(constraint);
        }

        Ok(ColumnDef {
            name,
            data_type,
            constraints,
            span: self.span_from(start),
        })
    }

    /// Parses `DROP TABLE [IF EXISTS] name, ... [CASCADE | RESTRICT]`.
    pub(super) fn parse_drop_table(&mut self) -> Result<DropTableStatement, ParseError> {
        let start = self.expect_keyword(Keyword::Drop)?.span.start;
        self.expect_keyword(Keyword::Table)?;

        let if_exists = if self.eat_keyword(Keyword::If)? {
            self.expect_keyword(Keyword::Exists)?;
            true
        } else {
            false
        };

        let mut names = vec![];
        loop {
            names.push(self.parse_object_name("table name")?);
            if !self.eat(&TokenKind::Comma)? {
                break;
            }
        }

        let behavior = if self.eat_keyword(Keyword::Cascade)? {
            Some(DropBehavior::Cascade)
        } else if self.eat_keyword(Keyword::Restrict)? {
            Some(DropBehavior::Restrict)
        } else {
            None
        };

        Ok(DropTableStatement {
            if_exists,
            names,
            behavior,
            span: self.span_from(start),
        })
    }

    /// Parses a type name with any `[]` suffixes.
    pub(super) fn parse_data_type(&mut self) -> Result<DataType, ParseError> {
        let mut data_type = self.parse_base_type()?;
        let mut dimensions = 0;
        while self.eat(&TokenKind::LeftBracket)? {
            self.enter()?;
            dimensions += 1;
            // Declared array bounds are not enforced
            if matches!(self.current.kind, TokenKind::Integer(_)) {
                self.advance()?;
            }
            self.expect(&TokenKind::RightBracket)?;
            data_type = DataType::Array(Box::new(data_type));
        }
        for _ in 0..dimensions {
            self.leave();
        }
        Ok(data_type)
    }

    fn parse_base_type(&mut self) -> Result<DataType, ParseError> {
        let keyword = match &self.current.kind {
            TokenKind::Keyword(kw) => *kw,
            TokenKind::Identifier(_) | TokenKind::QuotedIdentifier(_) => {
                return self.parse_named_type();
            }
            _ => return Err(self.unexpected("type name")),
        };

        let data_type = match keyword {
            Keyword::Smallint => DataType::Smallint,
            Keyword::Int | Keyword::Integer => DataType::Integer,
            Keyword::Bigint => DataType::Bigint,
            Keyword::Real => DataType::Real,
            Keyword::Boolean => DataType::Boolean,
            Keyword::Interval => {
                self.advance()?;
                return Ok(DataType::Interval(self.parse_interval_fields()?));
            }
            Keyword::Bit => {
                self.advance()?;
                let varying = self.eat_keyword(Keyword::Varying)?;
                let length = self.parse_type_modifier()?;
                return Ok(if varying {
                    DataType::VarBit(length)
                } else {
                    DataType::Bit(length)
                });
            }
            Keyword::Double if self.peek_keyword(Keyword::Precision)? => {
                self.advance()?;
                DataType::DoublePrecision
            }
            Keyword::Float => {
                self.advance()?;
                return match self.parse_type_modifier()? {
                    Some(p) if p <= 24 => Ok(DataType::Real),
                    _ => Ok(DataType::DoublePrecision),
                };
            }
            Keyword::Decimal | Keyword::Numeric => {
                self.advance()?;
                let (precision, scale) = self.parse_precision_scale()?;
                return Ok(if keyword == Keyword::Decimal {
                    DataType::Decimal { precision, scale }
                } else {
                    DataType::Numeric { precision, scale }
                });
            }
            Keyword::Char | Keyword::Character => {
                self.advance()?;
                let varying = self.eat_keyword(Keyword::Varying)?;
                let length = self.parse_type_modifier()?;
                return Ok(if varying {
                    DataType::Varchar(length)
                } else {
                    DataType::Char(length)
                });
            }
            Keyword::Varchar => {
                self.advance()?;
                return Ok(DataType::Varchar(self.parse_type_modifier()?));
            }
            Keyword::Time | Keyword::Timestamp => {
                self.advance()?;
                // Fractional-second precision is accepted and dropped
                self.parse_type_modifier()?;
                let with_time_zone = self.parse_time_zone()?;
                return Ok(if keyword == Keyword::Time {
                    DataType::Time { with_time_zone }
                } else {
                    DataType::Timestamp { with_time_zone }
                });
            }
            kw if kw.category() == KeywordCategory::Unreserved => {
                return self.parse_named_type();
            }
            _ => return Err(self.unexpected("type name")),
        };
        self.advance()?;
        Ok(data_type)
    }

    /// Parses the optional field restriction after `INTERVAL` or after an
    /// interval literal. A seconds precision (`SECOND(3)`) is accepted and
    /// dropped.
    pub(super) fn parse_interval_fields(&mut self) -> Result<Option<IntervalFields>, ParseError> {
        let Some(from) = self.interval_field() else {
            return Ok(None);
        };
        self.advance()?;
        let fields = if self.eat_keyword(Keyword::To)? {
            let Some(fields) = self
                .interval_field()
                .and_then(|to| IntervalFields::range(from, to))
            else {
                return Err(self.unexpected("interval field"));
            };
            self.advance()?;
            fields
        } else {
            from
        };
        if matches!(
            fields,
            IntervalFields::Second
                | IntervalFields::DayToSecond
                | IntervalFields::HourToSecond
                | IntervalFields::MinuteToSecond
        ) {
            self.parse_type_modifier()?;
        }
        Ok(Some(fields))
    }

    fn interval_field(&self) -> Option<IntervalFields> {
        let field = match self.current.as_keyword()? {
            Keyword::Year => IntervalFields::Year,
            Keyword::Month => IntervalFields::Month,
            Keyword::Day => IntervalFields::Day,
            Keyword::Hour => IntervalFields::Hour,
            Keyword::Minute => IntervalFields::Minute,
            Keyword::Second => IntervalFields::Second,
            _ => return None,
        };
        Some(field)
    }

    /// Parses a type spelled as a (possibly qualified) name.
    fn parse_named_type(&mut self) -> Result<DataType, ParseError> {
        let name = self.parse_object_name("type name")?;
        let builtin = match name.0.as_slice() {
            [single] => DataType::from_type_name(single),
            _ => None,
        };
        Ok(builtin.unwrap_or(DataType::Custom(name)))
    }

    /// Parses an optional `(n)` type modifier.
    fn parse_type_modifier(&mut self) -> Result<Option<u32>, ParseError> {
        if !self.eat(&TokenKind::LeftParen)? {
            return Ok(None);
        }
        let value = self.parse_modifier_value()?;
        self.expect(&TokenKind::RightParen)?;
        Ok(Some(value))
    }

    /// Parses an optional `(precision [, scale])`.
    fn parse_precision_scale(&mut self) -> Result<(Option<u16>, Option<u16>), ParseError> {
        if !self.eat(&TokenKind::LeftParen)? {
            return Ok((None, None));
        }
        let precision = self.parse_small_modifier()?;
        let scale = if self.eat(&TokenKind::Comma)? {
            Some(self.parse_small_modifier()?)
        } else {
            None
        };
        self.expect(&TokenKind::RightParen)?;
        Ok((Some(precision), scale))
    }

    fn parse_small_modifier(&mut self) -> Result<u16, ParseError> {
        let value = self.parse_modifier_value()?;
        u16::try_from(value).map_err(|_| self.syntax_at_previous())
    }

    fn parse_modifier_value(&mut self) -> Result<u32, ParseError> {
        match self.current.kind {
            TokenKind::Integer(n) => {
                self.advance()?;
                u32::try_from(n).map_err(|_| self.syntax_at_previous())
            }
            _ => Err(self.unexpected("integer")),
        }
    }

    /// Parses an optional `WITH TIME ZONE` / `WITHOUT TIME ZONE`.
    fn parse_time_zone(&mut self) -> Result<bool, ParseError> {
        let with_time_zone = if self.check_keyword(Keyword::With)
            && self.peek_keyword(Keyword::Time)?
        {
            true
        } else if self.check_keyword(Keyword::Without) {
            false
        } else {
            return Ok(false);
        };
        self.advance()?;
        self.expect_keyword(Keyword::Time)?;
        self.expect_keyword(Keyword::Zone)?;
        Ok(with_time_zone)
    }
}
