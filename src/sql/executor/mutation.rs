use crate::{
    error::Result,
    sql::{
        engine::Engine,
        executor::ResultSet,
        parser::ast::Condition,
        types::{Row, Value},
    },
};

use super::Executor;

/// INSERT executor
pub struct Insert {
    table_name: String,
    values: Row,
}

impl Insert {
    pub fn new(table_name: String, values: Row) -> Box<Self> {
        Box::new(Self { table_name, values })
    }
}

impl<E: Engine> Executor<E> for Insert {
    fn execute(self: Box<Self>, engine: &mut E) -> Result<ResultSet> {
        // The engine validates the whole row before anything is written
        engine.create_row(&self.table_name, self.values)?;
        Ok(ResultSet::Insert {
            table_name: self.table_name,
            count: 1,
        })
    }
}

/// UPDATE executor
///
/// Assigned values are written as given: the column's type and NOT NULL
/// flag are not checked again.
pub struct Update {
    table_name: String,
    column: String,
    value: Value,
    condition: Condition,
}

impl Update {
    pub fn new(table_name: String, column: String, value: Value, condition: Condition) -> Box<Self> {
        Box::new(Self {
            table_name,
            column,
            value,
            condition,
        })
    }
}

impl<E: Engine> Executor<E> for Update {
    fn execute(self: Box<Self>, engine: &mut E) -> Result<ResultSet> {
        let table = engine.must_get_table(&self.table_name)?;
        let set_idx = table.get_col_index(&self.column)?;
        let cond_idx = table.get_col_index(&self.condition.column)?;

        let mut count = 0;
        for (id, mut row) in engine.scan_table(&self.table_name)? {
            if self.condition.matches(&row[cond_idx]) {
                row[set_idx] = self.value.clone();
                engine.update_row(&self.table_name, id, row)?;
                count += 1;
            }
        }
        Ok(ResultSet::Update {
            table_name: self.table_name,
            count,
        })
    }
}

/// DELETE executor
pub struct Delete {
    table_name: String,
    condition: Condition,
}

impl Delete {
    pub fn new(table_name: String, condition: Condition) -> Box<Self> {
        Box::new(Self {
            table_name,
            condition,
        })
    }
}

impl<E: Engine> Executor<E> for Delete {
    fn execute(self: Box<Self>, engine: &mut E) -> Result<ResultSet> {
        let table = engine.must_get_table(&self.table_name)?;
        let cond_idx = table.get_col_index(&self.condition.column)?;

        let mut count = 0;
        for (id, row) in engine.scan_table(&self.table_name)? {
            if self.condition.matches(&row[cond_idx]) {
                engine.delete_row(&self.table_name, id)?;
                count += 1;
            }
        }
        Ok(ResultSet::Delete {
            table_name: self.table_name,
            count,
        })
    }
}
