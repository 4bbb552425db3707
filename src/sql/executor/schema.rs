use crate::{
    error::{Error, Result},
    sql::{engine::Engine, executor::Executor, schema::Table},
};

use super::ResultSet;

/// CREATE TABLE executor
pub struct CreateTable {
    schema: Table,
}

impl CreateTable {
    pub fn new(schema: Table) -> Box<Self> {
        Box::new(Self { schema })
    }
}

impl<E: Engine> Executor<E> for CreateTable {
    fn execute(self: Box<Self>, engine: &mut E) -> Result<ResultSet> {
        let table_name = self.schema.name.clone();
        let columns = self.schema.column_names();
        engine.create_table(self.schema)?;
        Ok(ResultSet::CreateTable {
            table_name,
            columns,
        })
    }
}

/// DROP TABLE executor
pub struct DropTable {
    table_name: String,
}

impl DropTable {
    pub fn new(table_name: String) -> Box<Self> {
        Box::new(Self { table_name })
    }
}

impl<E: Engine> Executor<E> for DropTable {
    fn execute(self: Box<Self>, engine: &mut E) -> Result<ResultSet> {
        if !engine.drop_table(&self.table_name)? {
            return Err(Error::UnknownTable(self.table_name));
        }
        Ok(ResultSet::DropTable {
            table_name: self.table_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        error::{Error, Result},
        sql::{executor::{ResultSet, tests::session}, types::Value},
    };

    #[test]
    fn test_create_table() -> Result<()> {
        let mut s = session();
        assert_eq!(
            s.execute("CREATE TABLE t (id INT NOT NULL, name TEXT);")?,
            ResultSet::CreateTable {
                table_name: "t".to_string(),
                columns: vec!["id".to_string(), "name".to_string()],
            }
        );
        Ok(())
    }

    #[test]
    fn test_create_table_overwrites() -> Result<()> {
        let mut s = session();
        s.execute("CREATE TABLE t (id INT)")?;
        s.execute("INSERT INTO t VALUES (1)")?;

        s.execute("CREATE TABLE t (name TEXT, score FLOAT)")?;
        assert_eq!(
            s.execute("SELECT * FROM t")?,
            ResultSet::Scan {
                columns: vec!["name".to_string(), "score".to_string()],
                rows: vec![],
            }
        );
        s.execute("INSERT INTO t VALUES ('x', 2)")?;
        assert_eq!(
            s.execute("SELECT * FROM t")?,
            ResultSet::Scan {
                columns: vec!["name".to_string(), "score".to_string()],
                rows: vec![vec![Value::Text("x".into()), Value::Integer(2)]],
            }
        );
        Ok(())
    }

    #[test]
    fn test_drop_table() -> Result<()> {
        let mut s = session();
        s.execute("CREATE TABLE t (id INT)")?;
        s.execute("INSERT INTO t VALUES (1)")?;

        assert_eq!(
            s.execute("DROP TABLE t;")?,
            ResultSet::DropTable {
                table_name: "t".to_string()
            }
        );
        assert_eq!(
            s.execute("SELECT * FROM t"),
            Err(Error::UnknownTable("t".to_string()))
        );
        assert_eq!(
            s.execute("DROP TABLE t"),
            Err(Error::UnknownTable("t".to_string()))
        );

        // Recreated under the same name it starts empty
        s.execute("CREATE TABLE t (id INT)")?;
        assert_eq!(s.execute("SELECT * FROM t")?.row_count(), 0);
        Ok(())
    }
}
