use crate::{
    error::{Error, Result},
    sql::{engine::Engine, parser::ast::ColumnRef},
};

use super::{Executor, ResultSet};

/// Nested Loop Join executor - equi-join of two tables on one column each
///
/// Every (left, right) pair is checked; matching pairs are emitted as the
/// left row followed by the right row, in left-major order.
pub struct NestedLoopJoin<E: Engine> {
    left: Box<dyn Executor<E>>,
    right: Box<dyn Executor<E>>,
    /// `on.0` names a column of the left table, `on.1` one of the right table
    on: (ColumnRef, ColumnRef),
}

impl<E: Engine> NestedLoopJoin<E> {
    pub fn new(
        left: Box<dyn Executor<E>>,
        right: Box<dyn Executor<E>>,
        on: (ColumnRef, ColumnRef),
    ) -> Box<Self> {
        Box::new(Self { left, right, on })
    }
}

fn column_position(columns: &[String], col: &ColumnRef) -> Result<usize> {
    columns
        .iter()
        .position(|c| *c == col.column)
        .ok_or_else(|| Error::UnknownColumn {
            table: col.table.clone(),
            column: col.column.clone(),
        })
}

impl<E: Engine> Executor<E> for NestedLoopJoin<E> {
    fn execute(self: Box<Self>, engine: &mut E) -> Result<ResultSet> {
        // Execute left side first
        let (lcols, lrows) = match self.left.execute(engine)? {
            ResultSet::Scan { columns, rows } => (columns, rows),
            _ => return Err(Error::Internal("Unexpected result set".into())),
        };
        let (rcols, rrows) = match self.right.execute(engine)? {
            ResultSet::Scan { columns, rows } => (columns, rows),
            _ => return Err(Error::Internal("Unexpected result set".into())),
        };

        let (lref, rref) = &self.on;
        let lpos = column_position(&lcols, lref)?;
        let rpos = column_position(&rcols, rref)?;

        // Qualified headers keep same-named columns apart
        let columns = lcols
            .iter()
            .map(|c| format!("{}.{}", lref.table, c))
            .chain(rcols.iter().map(|c| format!("{}.{}", rref.table, c)))
            .collect();

        let mut rows = Vec::new();
        for lrow in &lrows {
            for rrow in &rrows {
                if lrow[lpos].equals(&rrow[rpos]) {
                    let mut row = lrow.clone();
                    row.extend(rrow.iter().cloned());
                    rows.push(row);
                }
            }
        }
        Ok(ResultSet::Join { columns, rows })
    }
}
