use std::fmt::Display;

use crate::{
    error::Result,
    sql::{
        engine::Engine,
        executor::{
            agg::Aggregate,
            join::NestedLoopJoin,
            mutation::{Delete, Insert, Update},
            query::{Distinct, Projection, Scan},
            schema::{CreateTable, DropTable},
        },
        parser::ast::{self, Statement},
        schema::Table,
        types::{Row, Value},
    },
};

mod agg;
mod join;
mod mutation;
mod query;
mod schema;

/// SQL executor trait
pub trait Executor<E: Engine> {
    fn execute(self: Box<Self>, engine: &mut E) -> Result<ResultSet>;
}

/// Builds an executor tree from a parsed statement
///
/// The `'static` bound is required for trait object usage in recursive executor building.
impl<E: Engine + 'static> dyn Executor<E> {
    pub fn build(stmt: Statement) -> Box<dyn Executor<E>> {
        match stmt {
            Statement::CreateTable { name, columns } => CreateTable::new(Table { name, columns }),
            Statement::DropTable { name } => DropTable::new(name),
            Statement::Insert { table_name, values } => Insert::new(table_name, values),
            Statement::Update {
                table_name,
                column,
                value,
                condition,
            } => Update::new(table_name, column, value, condition),
            Statement::Delete {
                table_name,
                condition,
            } => Delete::new(table_name, condition),
            Statement::Select {
                table_name,
                projection,
                distinct,
                filter,
            } => {
                let mut node: Box<dyn Executor<E>> = Scan::new(table_name.clone(), filter);
                if let ast::Projection::Columns(columns) = projection {
                    node = Projection::new(node, table_name, columns);
                }
                if distinct {
                    node = Distinct::new(node);
                }
                node
            }
            Statement::Aggregate {
                table_name,
                function,
                column,
            } => Aggregate::new(Scan::new(table_name.clone(), None), table_name, function, column),
            Statement::Join { left, right, on } => NestedLoopJoin::new(
                Scan::new(left.clone(), None),
                Scan::new(right.clone(), None),
                on,
            ),
        }
    }
}

/// Execution result set
#[derive(Debug, PartialEq)]
pub enum ResultSet {
    CreateTable { table_name: String, columns: Vec<String> },
    DropTable { table_name: String },
    Insert { table_name: String, count: usize },
    Update { table_name: String, count: usize },
    Delete { table_name: String, count: usize },
    Scan { columns: Vec<String>, rows: Vec<Row> },
    /// Join output; headers are qualified as `table.column`
    Join { columns: Vec<String>, rows: Vec<Row> },
    Aggregate { value: Value },
}

impl ResultSet {
    /// Number of rows in a scan or join result, zero for anything else
    pub fn row_count(&self) -> usize {
        match self {
            ResultSet::Scan { rows, .. } | ResultSet::Join { rows, .. } => rows.len(),
            _ => 0,
        }
    }
}

/// Header line, a dashed separator of `width` dashes per column, then one line per row
fn write_rows(
    f: &mut std::fmt::Formatter<'_>,
    columns: &[String],
    rows: &[Row],
    width: usize,
) -> std::fmt::Result {
    write!(f, "{}\n{}", columns.join(" | "), "-".repeat(columns.len() * width))?;
    for row in rows {
        let line = row.iter().map(|v| v.to_string()).collect::<Vec<_>>();
        write!(f, "\n{}", line.join(" | "))?;
    }
    Ok(())
}

impl Display for ResultSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResultSet::CreateTable {
                table_name,
                columns,
            } => write!(
                f,
                "Table '{}' created with columns [{}]",
                table_name,
                columns.join(", ")
            ),
            ResultSet::DropTable { table_name } => write!(f, "Table '{}' dropped.", table_name),
            ResultSet::Insert { table_name, count } => {
                write!(f, "{} row inserted into '{}'", count, table_name)
            }
            ResultSet::Update { table_name, count } => {
                write!(f, "{} row(s) updated in '{}'", count, table_name)
            }
            ResultSet::Delete { table_name, count } => {
                write!(f, "{} row(s) deleted from '{}'", count, table_name)
            }
            ResultSet::Scan { columns, rows } => write_rows(f, columns, rows, 10),
            ResultSet::Join { columns, rows } => write_rows(f, columns, rows, 17),
            ResultSet::Aggregate { value } => write!(f, "{}", value),
        }
    }
}
