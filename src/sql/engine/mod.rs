use tracing::{debug, warn};

use crate::error::{Error, Result};

use super::{
    executor::{Executor, ResultSet},
    parser::Parser,
    schema::Table,
    types::Row,
};

pub mod kv;

/// Position of a row inside its table, increasing in insertion order
pub type RowId = u64;

/// SQL engine trait (the table store)
///
/// The store is the single mutable root of the system. It is owned by a
/// [`Session`] and lent to one executor at a time, so no locking is involved.
pub trait Engine {
    // DDL operations
    /// Registers a table, silently replacing any table of the same name
    fn create_table(&mut self, table: Table) -> Result<()>;
    /// Removes a table and all of its rows; returns false if it did not exist
    fn drop_table(&mut self, table_name: &str) -> Result<bool>;
    fn get_table(&self, table_name: &str) -> Result<Option<Table>>;
    /// Returns table info, returns error if table doesn't exist
    fn must_get_table(&self, table_name: &str) -> Result<Table> {
        self.get_table(table_name)?
            .ok_or_else(|| Error::UnknownTable(table_name.to_string()))
    }

    // DML operations
    /// Validates the row against the schema and appends it
    fn create_row(&mut self, table_name: &str, row: Row) -> Result<()>;
    /// Overwrites a stored row as is, without re-validating it
    fn update_row(&mut self, table_name: &str, id: RowId, row: Row) -> Result<()>;
    fn delete_row(&mut self, table_name: &str, id: RowId) -> Result<()>;
    /// All rows of a table in insertion order
    fn scan_table(&self, table_name: &str) -> Result<Vec<(RowId, Row)>>;

    fn session(self) -> Session<Self>
    where
        Self: Sized,
    {
        Session { engine: self }
    }
}

/// SQL session for executing statements one at a time
pub struct Session<E: Engine> {
    engine: E,
}

impl<E: Engine + 'static> Session<E> {
    /// Executes a single statement
    pub fn execute(&mut self, sql: &str) -> Result<ResultSet> {
        let stmt = Parser::new(sql).parse()?;
        let result = <dyn Executor<E>>::build(stmt).execute(&mut self.engine)?;
        debug!(%result, "statement executed");
        Ok(result)
    }

    /// Executes a statement and renders either its result or its error.
    ///
    /// Nothing a statement does wrong escapes this call; the store is left
    /// as the failed statement found it and the next one can run.
    pub fn run(&mut self, sql: &str) -> String {
        match self.execute(sql) {
            Ok(result) => result.to_string(),
            Err(err) => {
                warn!(%err, query = sql, "statement rejected");
                err.to_string()
            }
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }
}

#[cfg(test)]
mod tests {
    use super::{Engine, Session, kv::KVEngine};
    use crate::{
        error::{Error, Result},
        sql::{
            executor::ResultSet,
            types::{DataType, Value},
        },
        storage::{engine::Engine as StorageEngine, memory::MemoryEngine},
    };

    fn session() -> Session<KVEngine<MemoryEngine>> {
        KVEngine::new(MemoryEngine::new()).session()
    }

    /// Every raw key/value pair held by the store
    fn snapshot(s: &Session<KVEngine<MemoryEngine>>) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        s.engine().kv.scan(..).collect()
    }

    #[test]
    fn test_scenario() -> Result<()> {
        let mut s = session();
        s.execute("CREATE TABLE t (id INT, name TEXT)")?;
        s.execute("INSERT INTO t VALUES (1,'a')")?;
        s.execute("INSERT INTO t VALUES (2,'b')")?;
        assert_eq!(
            s.execute("SELECT MAX(id) FROM t")?,
            ResultSet::Aggregate {
                value: Value::Integer(2)
            }
        );
        assert_eq!(s.run("DELETE FROM t WHERE id = 1"), "1 row(s) deleted from 't'");
        assert_eq!(s.execute("SELECT * FROM t")?.row_count(), 1);
        Ok(())
    }

    #[test]
    fn test_inserted_rows_match_declared_types() -> Result<()> {
        let mut s = session();
        s.execute("CREATE TABLE t (i INT, f FLOAT, s TEXT)")?;
        for n in 0..25 {
            s.execute(&format!("INSERT INTO t VALUES ({}, {}.5, 'r{}')", n, n, n))?;
        }
        s.execute("INSERT INTO t VALUES (7, 3, 'int into float')")?;

        let table = s.engine().must_get_table("t")?;
        let rows = s.engine().scan_table("t")?;
        assert_eq!(rows.len(), 26);
        for (_, row) in rows {
            for (col, value) in table.columns.iter().zip(&row) {
                assert!(col.datatype.accepts(value), "{:?} in {}", value, col.name);
            }
        }
        Ok(())
    }

    #[test]
    fn test_rejected_statements_leave_store_unchanged() -> Result<()> {
        let mut s = session();
        s.execute("CREATE TABLE t (id INT NOT NULL, name TEXT)")?;
        s.execute("INSERT INTO t VALUES (1, 'a')")?;
        let before = snapshot(&s)?;

        assert_eq!(s.run("FOO BAR"), "Unsupported query.");
        assert_eq!(
            s.run("INSERT INTO t VALUES (NULL, 'b')"),
            "NOT NULL constraint violated for column 'id'"
        );
        assert_eq!(
            s.execute("INSERT INTO t VALUES ('x', 'b')"),
            Err(Error::TypeMismatch {
                column: "id".to_string(),
                expected: DataType::Integer,
                got: "TEXT",
            })
        );
        assert_eq!(s.run("DELETE FROM t"), "DELETE without WHERE not supported.");
        assert_eq!(snapshot(&s)?, before);
        Ok(())
    }

    #[test]
    fn test_update_touches_only_matching_rows() -> Result<()> {
        let mut s = session();
        s.execute("CREATE TABLE t (id INT, name TEXT)")?;
        for n in 1..=6 {
            s.execute(&format!("INSERT INTO t VALUES ({}, 'n{}')", n, n))?;
        }
        let before = s.engine().scan_table("t")?;

        assert_eq!(s.run("UPDATE t SET name = 'big' WHERE id > 4"), "2 row(s) updated in 't'");
        for ((_, old), (_, new)) in before.iter().zip(s.engine().scan_table("t")?) {
            if old[0].compare(&Value::Integer(4)) == Some(std::cmp::Ordering::Greater) {
                assert_eq!(new, vec![old[0].clone(), Value::Text("big".into())]);
            } else {
                assert_eq!(&new, old);
            }
        }
        Ok(())
    }

    #[test]
    fn test_deleted_rows_no_longer_match() -> Result<()> {
        let mut s = session();
        s.execute("CREATE TABLE t (id INT, name TEXT)")?;
        for n in 1..=10 {
            s.execute(&format!("INSERT INTO t VALUES ({}, 'n{}')", n, n % 3))?;
        }
        for filter in ["name = 'n1'", "id >= 8", "id != 2"] {
            s.execute(&format!("DELETE FROM t WHERE {}", filter))?;
            assert_eq!(
                s.execute(&format!("SELECT * FROM t WHERE {}", filter))?.row_count(),
                0
            );
        }
        assert_eq!(s.execute("SELECT * FROM t")?.row_count(), 1);
        Ok(())
    }
}
