use tracing::debug;

use crate::error::{Error, Result};
use crate::sql::{
    parser::{
        ast::{AggregateFunction, ColumnRef, Condition, Operator, Projection, Statement},
        clause::{Keyword, split_keyword, split_list, strip_prefix_ignore_case},
    },
    schema::Column,
    types::{DataType, Value},
};

pub mod ast;
mod clause;

/// Statement shape picked by the dispatcher
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QueryKind {
    CreateTable,
    Insert,
    Join,
    SelectWhere,
    SelectDistinct,
    SelectAll,
    Aggregate,
    SelectColumns,
    DropTable,
    Delete,
    Update,
    Unsupported,
}

impl QueryKind {
    /// Classifies a trimmed statement by keyword prefix and substring checks.
    ///
    /// The checks run in a fixed order and the first hit wins, because the
    /// shapes overlap (an aggregate also starts with SELECT). A comma together
    /// with WHERE anywhere in the text is always taken for a join, even when
    /// the comma sits inside a string literal.
    pub fn classify(query: &str) -> Self {
        let upper = query.to_ascii_uppercase();
        let has_where = upper.contains("WHERE");

        if upper.starts_with("CREATE TABLE") {
            QueryKind::CreateTable
        } else if upper.starts_with("INSERT INTO") {
            QueryKind::Insert
        } else if upper.contains(',') && has_where {
            QueryKind::Join
        } else if upper.starts_with("SELECT * FROM") && has_where {
            QueryKind::SelectWhere
        } else if upper.starts_with("SELECT DISTINCT") {
            QueryKind::SelectDistinct
        } else if upper.starts_with("SELECT * FROM") {
            QueryKind::SelectAll
        } else if upper.starts_with("SELECT")
            && ["MAX", "MIN", "SUM", "AVG"].iter().any(|f| upper.contains(f))
        {
            QueryKind::Aggregate
        } else if upper.starts_with("SELECT") {
            QueryKind::SelectColumns
        } else if upper.starts_with("DROP TABLE") {
            QueryKind::DropTable
        } else if upper.starts_with("DELETE FROM") {
            QueryKind::Delete
        } else if upper.starts_with("UPDATE") {
            QueryKind::Update
        } else {
            QueryKind::Unsupported
        }
    }

    /// Keyword prefix the clause parser skips before reading the rest
    fn prefix(&self) -> &'static str {
        match self {
            QueryKind::CreateTable => "CREATE TABLE",
            QueryKind::Insert => "INSERT INTO",
            QueryKind::Join | QueryKind::SelectWhere | QueryKind::SelectAll => "SELECT * FROM",
            QueryKind::SelectDistinct => "SELECT DISTINCT",
            QueryKind::Aggregate | QueryKind::SelectColumns => "SELECT",
            QueryKind::DropTable => "DROP TABLE",
            QueryKind::Delete => "DELETE FROM",
            QueryKind::Update => "UPDATE",
            QueryKind::Unsupported => "",
        }
    }
}

/// Statement parser - classifies the text, then parses the clauses of that shape
pub struct Parser<'a> {
    input: &'a str,
}

impl<'a> Parser<'a> {
    /// Creates a parser over one statement; surrounding whitespace and
    /// trailing semicolons are ignored.
    pub fn new(input: &'a str) -> Self {
        Parser {
            input: input.trim().trim_end_matches(';').trim_end(),
        }
    }

    /// Parses the input statement into an AST
    pub fn parse(&self) -> Result<Statement> {
        let kind = QueryKind::classify(self.input);
        debug!(?kind, query = self.input, "classified statement");

        if kind == QueryKind::Unsupported {
            return Err(Error::UnsupportedQuery);
        }
        let rest = strip_prefix_ignore_case(self.input, kind.prefix()).ok_or_else(|| {
            Error::MalformedClause(format!(
                "Invalid {:?} query: expected it to start with {}",
                kind,
                kind.prefix()
            ))
        })?;

        match kind {
            QueryKind::CreateTable => self.parse_create_table(rest),
            QueryKind::DropTable => Ok(Statement::DropTable {
                name: parse_table_name(rest)?,
            }),
            QueryKind::Insert => self.parse_insert(rest),
            QueryKind::Update => self.parse_update(rest),
            QueryKind::Delete => self.parse_delete(rest),
            QueryKind::SelectAll => Ok(Statement::Select {
                table_name: parse_table_name(rest)?,
                projection: Projection::All,
                distinct: false,
                filter: None,
            }),
            QueryKind::SelectWhere => self.parse_select_where(rest),
            QueryKind::SelectDistinct => self.parse_select_columns(rest, true),
            QueryKind::SelectColumns => self.parse_select_columns(rest, false),
            QueryKind::Aggregate => self.parse_aggregate(rest),
            QueryKind::Join => self.parse_join(rest),
            QueryKind::Unsupported => Err(Error::UnsupportedQuery),
        }
    }

    /// `name ( col [TYPE] [NOT NULL], ... )`
    fn parse_create_table(&self, rest: &str) -> Result<Statement> {
        let (name, defs) = rest.split_once('(').ok_or_else(|| {
            Error::MalformedClause("Invalid CREATE TABLE syntax: missing '('".into())
        })?;
        let name = parse_table_name(name)?;
        let defs = defs.trim_end().strip_suffix(')').ok_or_else(|| {
            Error::MalformedClause("Invalid CREATE TABLE syntax: missing ')'".into())
        })?;

        let mut columns = Vec::new();
        for def in split_list(defs) {
            let mut parts = def.split_whitespace();
            let col_name = parts.next().ok_or_else(|| {
                Error::MalformedClause(format!("Empty column definition in table '{}'", name))
            })?;
            let datatype = parts.next().map_or(DataType::Text, DataType::from_name);
            let nullable = !def.to_ascii_uppercase().contains("NOT NULL");
            columns.push(Column {
                name: col_name.to_string(),
                datatype,
                nullable,
            });
        }
        Ok(Statement::CreateTable { name, columns })
    }

    /// `name VALUES ( v1, v2, ... )`
    fn parse_insert(&self, rest: &str) -> Result<Statement> {
        let (table_name, values) = split_keyword(rest, Keyword::Values)
            .ok_or_else(|| Error::MalformedClause("Invalid INSERT syntax: missing VALUES".into()))?;
        let values = values
            .strip_prefix('(')
            .and_then(|v| v.strip_suffix(')'))
            .ok_or_else(|| {
                Error::MalformedClause("Invalid INSERT syntax: VALUES must be wrapped in ( )".into())
            })?;

        Ok(Statement::Insert {
            table_name: parse_table_name(table_name)?,
            values: split_list(values).into_iter().map(Value::from_literal).collect(),
        })
    }

    /// `name SET col = value WHERE condition`
    fn parse_update(&self, rest: &str) -> Result<Statement> {
        let invalid = || Error::MalformedClause("Invalid UPDATE syntax.".into());
        let (table_name, rest) = split_keyword(rest, Keyword::Set).ok_or_else(invalid)?;
        let (assignment, condition) = split_keyword(rest, Keyword::Where).ok_or_else(invalid)?;
        let (column, value) = assignment.split_once('=').ok_or_else(invalid)?;
        let column = column.trim();
        if column.is_empty() {
            return Err(invalid());
        }

        Ok(Statement::Update {
            table_name: parse_table_name(table_name)?,
            column: column.to_string(),
            value: Value::from_literal(value),
            condition: parse_condition(condition)?,
        })
    }

    /// `name WHERE condition`; a DELETE without WHERE is refused outright
    fn parse_delete(&self, rest: &str) -> Result<Statement> {
        let (table_name, condition) = split_keyword(rest, Keyword::Where).ok_or_else(|| {
            Error::MalformedClause("DELETE without WHERE not supported.".into())
        })?;
        Ok(Statement::Delete {
            table_name: parse_table_name(table_name)?,
            condition: parse_condition(condition)?,
        })
    }

    /// `name WHERE condition` after `SELECT * FROM`
    fn parse_select_where(&self, rest: &str) -> Result<Statement> {
        let (table_name, condition) = split_keyword(rest, Keyword::Where)
            .ok_or_else(|| Error::MalformedClause("Missing WHERE clause.".into()))?;
        Ok(Statement::Select {
            table_name: parse_table_name(table_name)?,
            projection: Projection::All,
            distinct: false,
            filter: Some(parse_condition(condition)?),
        })
    }

    /// `col1, col2 FROM name`, with or without a leading DISTINCT
    fn parse_select_columns(&self, rest: &str, distinct: bool) -> Result<Statement> {
        let (columns, table_name) = split_keyword(rest, Keyword::From).ok_or_else(|| {
            Error::MalformedClause(if distinct {
                "Missing FROM clause in DISTINCT query.".into()
            } else {
                "Invalid SELECT query: missing FROM".into()
            })
        })?;

        let columns = split_list(columns);
        if columns.iter().any(|c| c.is_empty()) {
            return Err(Error::MalformedClause(
                "Invalid SELECT query: empty column name".into(),
            ));
        }
        Ok(Statement::Select {
            table_name: parse_table_name(table_name)?,
            projection: Projection::Columns(columns.into_iter().map(String::from).collect()),
            distinct,
            filter: None,
        })
    }

    /// `FUNC(col) FROM name`
    fn parse_aggregate(&self, rest: &str) -> Result<Statement> {
        let (call, table_name) = split_keyword(rest, Keyword::From)
            .ok_or_else(|| Error::MalformedClause("Invalid aggregate query.".into()))?;
        let (func, column) = call
            .split_once('(')
            .and_then(|(func, tail)| Some((func.trim(), tail.split_once(')')?.0.trim())))
            .ok_or_else(|| {
                Error::MalformedClause("Invalid aggregate query: expected FUNC(column)".into())
            })?;

        let function = AggregateFunction::from_name(func)
            .ok_or_else(|| Error::UnknownAggregateFunction(func.to_uppercase()))?;
        if column.is_empty() {
            return Err(Error::MalformedClause(
                "Invalid aggregate query: missing column".into(),
            ));
        }
        Ok(Statement::Aggregate {
            table_name: parse_table_name(table_name)?,
            function,
            column: column.to_string(),
        })
    }

    /// `t1, t2 WHERE t1.col = t2.col` after `SELECT * FROM`
    fn parse_join(&self, rest: &str) -> Result<Statement> {
        let (tables, condition) = split_keyword(rest, Keyword::Where)
            .ok_or_else(|| Error::MalformedClause("Invalid JOIN query: missing WHERE".into()))?;
        let (left, right) = match split_list(tables).as_slice() {
            [left, right] => (parse_table_name(left)?, parse_table_name(right)?),
            _ => {
                return Err(Error::MalformedClause(
                    "Invalid JOIN query: expected exactly two tables".into(),
                ));
            }
        };

        let invalid = || Error::MalformedClause("Invalid JOIN condition.".into());
        let (lhs, operator, rhs) = split_condition(condition).ok_or_else(invalid)?;
        if operator != Operator::Equal {
            return Err(invalid());
        }
        let lhs = parse_column_ref(lhs).ok_or_else(invalid)?;
        let rhs = parse_column_ref(rhs).ok_or_else(invalid)?;

        // Either side of the condition may name either table
        let on = if lhs.table == left && rhs.table == right {
            (lhs, rhs)
        } else if lhs.table == right && rhs.table == left {
            (rhs, lhs)
        } else {
            return Err(Error::MalformedClause(format!(
                "JOIN condition must compare a column of '{}' with a column of '{}'",
                left, right
            )));
        };
        Ok(Statement::Join { left, right, on })
    }
}

/// A table name is a single non-empty token
fn parse_table_name(input: &str) -> Result<String> {
    let name = input.trim();
    if name.is_empty() {
        return Err(Error::MalformedClause("Missing table name.".into()));
    }
    if name.contains(char::is_whitespace) {
        return Err(Error::MalformedClause(format!(
            "Unexpected input after table name: '{}'",
            name
        )));
    }
    Ok(name.to_string())
}

fn parse_column_ref(input: &str) -> Option<ColumnRef> {
    let (table, column) = input.trim().split_once('.')?;
    let (table, column) = (table.trim(), column.trim());
    if table.is_empty() || column.is_empty() || column.contains('.') {
        return None;
    }
    Some(ColumnRef {
        table: table.to_string(),
        column: column.to_string(),
    })
}

/// Locates the operator of a condition and splits the text around it.
///
/// Operators are tried in [`Operator::SEARCH_ORDER`]; the first one present
/// anywhere in the clause is used, split at its first occurrence.
fn split_condition(input: &str) -> Option<(&str, Operator, &str)> {
    let operator = Operator::SEARCH_ORDER
        .into_iter()
        .find(|op| input.contains(op.symbol()))?;
    let (lhs, rhs) = input.split_once(operator.symbol())?;
    Some((lhs.trim(), operator, rhs.trim()))
}

/// `column op literal`, with the literal coerced like any INSERT value
fn parse_condition(input: &str) -> Result<Condition> {
    let invalid = || Error::MalformedClause("Invalid WHERE condition.".into());
    let (column, operator, value) = split_condition(input).ok_or_else(invalid)?;
    if column.is_empty() {
        return Err(invalid());
    }
    Ok(Condition {
        column: column.to_string(),
        operator,
        value: Value::from_literal(value),
    })
}
