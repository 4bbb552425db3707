use std::cmp::Ordering;

use crate::sql::{schema::Column, types::Value};

/// Parsed statement, one per supported command shape
#[derive(Debug, PartialEq)]
pub enum Statement {
    CreateTable {
        name: String,
        columns: Vec<Column>,
    },
    DropTable {
        name: String,
    },
    Insert {
        table_name: String,
        values: Vec<Value>,
    },
    /// UPDATE with exactly one assignment and one condition
    Update {
        table_name: String,
        column: String,
        value: Value,
        condition: Condition,
    },
    /// DELETE always carries a condition; unconditional deletes are rejected while parsing
    Delete {
        table_name: String,
        condition: Condition,
    },
    /// SELECT *, SELECT * ... WHERE, SELECT cols and SELECT DISTINCT cols
    Select {
        table_name: String,
        projection: Projection,
        distinct: bool,
        filter: Option<Condition>,
    },
    /// SELECT FUNC(column) FROM table
    Aggregate {
        table_name: String,
        function: AggregateFunction,
        column: String,
    },
    /// SELECT * FROM left, right WHERE left.a = right.b
    ///
    /// `on.0` always refers to `left` and `on.1` to `right`.
    Join {
        left: String,
        right: String,
        on: (ColumnRef, ColumnRef),
    },
}

#[derive(Debug, PartialEq)]
pub enum Projection {
    All,
    /// Requested columns in order, duplicates kept
    Columns(Vec<String>),
}

/// Qualified `table.column` reference
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnRef {
    pub table: String,
    pub column: String,
}

/// Single-column, single-operator predicate: `column op literal`
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub column: String,
    pub operator: Operator,
    pub value: Value,
}

impl Condition {
    /// Evaluates the predicate against the value stored in the condition's column
    pub fn matches(&self, value: &Value) -> bool {
        self.operator.apply(value, &self.value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operator {
    Equal,
    NotEqual,
    Greater,
    Less,
    GreaterEqual,
    LessEqual,
}

impl Operator {
    /// Search order when locating the operator inside a clause.
    ///
    /// Two-character operators come first so `>=` is never read as `>`.
    pub const SEARCH_ORDER: [Operator; 6] = [
        Operator::GreaterEqual,
        Operator::LessEqual,
        Operator::NotEqual,
        Operator::Equal,
        Operator::Greater,
        Operator::Less,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Equal => "=",
            Operator::NotEqual => "!=",
            Operator::Greater => ">",
            Operator::Less => "<",
            Operator::GreaterEqual => ">=",
            Operator::LessEqual => "<=",
        }
    }

    /// Compares `left op right`.
    ///
    /// Pairs without an ordering (text against a number, anything against
    /// Null) never satisfy `<`, `>`, `<=` or `>=`. For `=` and `!=` such
    /// pairs are simply unequal.
    pub fn apply(&self, left: &Value, right: &Value) -> bool {
        match self {
            Operator::Equal => left.equals(right),
            Operator::NotEqual => !left.equals(right),
            Operator::Greater => left.compare(right) == Some(Ordering::Greater),
            Operator::Less => left.compare(right) == Some(Ordering::Less),
            Operator::GreaterEqual => matches!(
                left.compare(right),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            Operator::LessEqual => matches!(
                left.compare(right),
                Some(Ordering::Less | Ordering::Equal)
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AggregateFunction {
    Max,
    Min,
    Sum,
    Avg,
}

impl AggregateFunction {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name.to_uppercase().as_ref() {
            "MAX" => AggregateFunction::Max,
            "MIN" => AggregateFunction::Min,
            "SUM" => AggregateFunction::Sum,
            "AVG" => AggregateFunction::Avg,
            _ => return None,
        })
    }
}
