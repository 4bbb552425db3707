use std::collections::HashSet;

use crate::{
    error::{Error, Result},
    sql::{
        engine::Engine,
        executor::ResultSet,
        parser::ast::Condition,
        types::{Row, Value},
    },
};

use super::Executor;

/// Table scan executor (SELECT), optionally filtered by one condition
pub struct Scan {
    table_name: String,
    filter: Option<Condition>,
}

impl Scan {
    pub fn new(table_name: String, filter: Option<Condition>) -> Box<Self> {
        Box::new(Self { table_name, filter })
    }
}

impl<E: Engine> Executor<E> for Scan {
    fn execute(self: Box<Self>, engine: &mut E) -> Result<ResultSet> {
        let table = engine.must_get_table(&self.table_name)?;
        // Resolve the filter column up front so an unknown column fails even on an empty table
        let filter = match self.filter {
            Some(cond) => Some((table.get_col_index(&cond.column)?, cond)),
            None => None,
        };

        let rows = engine
            .scan_table(&self.table_name)?
            .into_iter()
            .map(|(_, row)| row)
            .filter(|row| match &filter {
                Some((pos, cond)) => cond.matches(&row[*pos]),
                None => true,
            })
            .collect();
        Ok(ResultSet::Scan {
            columns: table.column_names(),
            rows,
        })
    }
}

/// Projection executor - picks the requested columns in the requested order
pub struct Projection<E: Engine> {
    source: Box<dyn Executor<E>>,
    table_name: String,
    columns: Vec<String>,
}

impl<E: Engine> Projection<E> {
    pub fn new(source: Box<dyn Executor<E>>, table_name: String, columns: Vec<String>) -> Box<Self> {
        Box::new(Self {
            source,
            table_name,
            columns,
        })
    }
}

impl<E: Engine> Executor<E> for Projection<E> {
    fn execute(self: Box<Self>, engine: &mut E) -> Result<ResultSet> {
        match self.source.execute(engine)? {
            ResultSet::Scan { columns, rows } => {
                let positions = self
                    .columns
                    .iter()
                    .map(|name| {
                        columns
                            .iter()
                            .position(|c| c == name)
                            .ok_or_else(|| Error::UnknownColumn {
                                table: self.table_name.clone(),
                                column: name.clone(),
                            })
                    })
                    .collect::<Result<Vec<_>>>()?;

                let rows = rows
                    .into_iter()
                    .map(|row| positions.iter().map(|&i| row[i].clone()).collect())
                    .collect();
                Ok(ResultSet::Scan {
                    columns: self.columns,
                    rows,
                })
            }
            _ => Err(Error::Internal("Unexpected result set".into())),
        }
    }
}

/// DISTINCT executor - keeps the first occurrence of every row, in order
pub struct Distinct<E: Engine> {
    source: Box<dyn Executor<E>>,
}

impl<E: Engine> Distinct<E> {
    pub fn new(source: Box<dyn Executor<E>>) -> Box<Self> {
        Box::new(Self { source })
    }
}

impl<E: Engine> Executor<E> for Distinct<E> {
    fn execute(self: Box<Self>, engine: &mut E) -> Result<ResultSet> {
        match self.source.execute(engine)? {
            ResultSet::Scan { columns, rows } => {
                let mut seen = HashSet::new();
                let mut distinct = Vec::new();
                for row in rows {
                    if seen.insert(distinct_key(&row)?) {
                        distinct.push(row);
                    }
                }
                Ok(ResultSet::Scan {
                    columns,
                    rows: distinct,
                })
            }
            _ => Err(Error::Internal("Unexpected result set".into())),
        }
    }
}

/// Hashable identity of a row for DISTINCT.
///
/// Floats are not hashable, so rows are keyed by their encoded form. Integral
/// floats are encoded as the integer they equal first, so `2` and `2.0`
/// collapse exactly when `=` would call them equal.
fn distinct_key(row: &Row) -> Result<Vec<u8>> {
    let (min, max) = (i64::MIN as f64, -(i64::MIN as f64));
    let canonical = row
        .iter()
        .map(|v| match v {
            Value::Float(f) if f.fract() == 0.0 && *f >= min && *f < max => {
                Value::Integer(*f as i64)
            }
            v => v.clone(),
        })
        .collect::<Row>();
    Ok(bincode::serialize(&canonical)?)
}

#[cfg(test)]
mod tests {
    use crate::{
        error::{Error, Result},
        sql::{
            engine::{Session, kv::KVEngine},
            executor::{ResultSet, tests::session},
            types::Value,
        },
        storage::memory::MemoryEngine,
    };

    fn people() -> Result<Session<KVEngine<MemoryEngine>>> {
        let mut s = session();
        s.execute("CREATE TABLE people (id INT, name TEXT, city TEXT)")?;
        s.execute("INSERT INTO people VALUES (1, 'ann', 'oslo')")?;
        s.execute("INSERT INTO people VALUES (2, 'bob', 'rome')")?;
        s.execute("INSERT INTO people VALUES (3, 'cid', 'oslo')")?;
        s.execute("INSERT INTO people VALUES (4, 'ann', 'oslo')")?;
        Ok(s)
    }

    fn text(v: &str) -> Value {
        Value::Text(v.to_string())
    }

    #[test]
    fn test_select_all() -> Result<()> {
        let mut s = people()?;
        match s.execute("SELECT * FROM people")? {
            ResultSet::Scan { columns, rows } => {
                assert_eq!(columns, vec!["id", "name", "city"]);
                assert_eq!(rows.len(), 4);
                assert_eq!(rows[3], vec![Value::Integer(4), text("ann"), text("oslo")]);
            }
            result => panic!("unexpected result {:?}", result),
        }
        assert_eq!(
            s.execute("SELECT * FROM nobody"),
            Err(Error::UnknownTable("nobody".to_string()))
        );
        Ok(())
    }

    #[test]
    fn test_select_where() -> Result<()> {
        let mut s = people()?;
        assert_eq!(
            s.execute("SELECT * FROM people WHERE city = 'oslo'")?,
            ResultSet::Scan {
                columns: vec!["id".into(), "name".into(), "city".into()],
                rows: vec![
                    vec![Value::Integer(1), text("ann"), text("oslo")],
                    vec![Value::Integer(3), text("cid"), text("oslo")],
                    vec![Value::Integer(4), text("ann"), text("oslo")],
                ],
            }
        );
        assert_eq!(
            s.execute("SELECT * FROM people WHERE id <= 2")?.row_count(),
            2
        );
        assert_eq!(
            s.execute("SELECT * FROM people WHERE age > 2"),
            Err(Error::UnknownColumn {
                table: "people".to_string(),
                column: "age".to_string()
            })
        );
        Ok(())
    }

    #[test]
    fn test_select_where_unknown_column_on_empty_table() -> Result<()> {
        let mut s = session();
        s.execute("CREATE TABLE t (id INT)")?;
        assert_eq!(
            s.execute("SELECT * FROM t WHERE nope = 1"),
            Err(Error::UnknownColumn {
                table: "t".to_string(),
                column: "nope".to_string()
            })
        );
        Ok(())
    }

    #[test]
    fn test_select_columns() -> Result<()> {
        let mut s = people()?;
        assert_eq!(
            s.execute("SELECT city, id, city FROM people")?,
            ResultSet::Scan {
                columns: vec!["city".into(), "id".into(), "city".into()],
                rows: vec![
                    vec![text("oslo"), Value::Integer(1), text("oslo")],
                    vec![text("rome"), Value::Integer(2), text("rome")],
                    vec![text("oslo"), Value::Integer(3), text("oslo")],
                    vec![text("oslo"), Value::Integer(4), text("oslo")],
                ],
            }
        );
        assert_eq!(
            s.execute("SELECT id, Name FROM people"),
            Err(Error::UnknownColumn {
                table: "people".to_string(),
                column: "Name".to_string()
            })
        );
        Ok(())
    }

    #[test]
    fn test_select_distinct() -> Result<()> {
        let mut s = people()?;
        assert_eq!(
            s.execute("SELECT DISTINCT city FROM people")?,
            ResultSet::Scan {
                columns: vec!["city".into()],
                rows: vec![vec![text("oslo")], vec![text("rome")]],
            }
        );
        assert_eq!(
            s.execute("SELECT DISTINCT name, city FROM people")?,
            ResultSet::Scan {
                columns: vec!["name".into(), "city".into()],
                rows: vec![
                    vec![text("ann"), text("oslo")],
                    vec![text("bob"), text("rome")],
                    vec![text("cid"), text("oslo")],
                ],
            }
        );
        Ok(())
    }

    #[test]
    fn test_select_distinct_never_repeats() -> Result<()> {
        let mut s = session();
        s.execute("CREATE TABLE t (v FLOAT, tag TEXT)")?;
        for (v, tag) in [("1.5", "a"), ("2", "b"), ("1.5", "a"), ("0.25", "a"), ("2", "b")] {
            s.execute(&format!("INSERT INTO t VALUES ({}, '{}')", v, tag))?;
        }
        s.execute("INSERT INTO t VALUES (0.25, 'a')")?;
        s.execute("UPDATE t SET tag = NULL WHERE v = 0.25")?;
        let total = s.execute("SELECT * FROM t")?.row_count();

        match s.execute("SELECT DISTINCT v, tag FROM t")? {
            ResultSet::Scan { rows, .. } => {
                assert!(rows.len() <= total);
                assert_eq!(
                    rows,
                    vec![
                        vec![Value::Float(1.5), text("a")],
                        vec![Value::Integer(2), text("b")],
                        vec![Value::Float(0.25), Value::Null],
                    ]
                );
            }
            result => panic!("unexpected result {:?}", result),
        }
        Ok(())
    }

    #[test]
    fn test_select_distinct_integral_float_equals_integer() -> Result<()> {
        let mut s = session();
        s.execute("CREATE TABLE t (v FLOAT)")?;
        for v in ["2", "2.0", "3.0", "3", "2.5"] {
            s.execute(&format!("INSERT INTO t VALUES ({})", v))?;
        }
        assert_eq!(s.execute("SELECT * FROM t WHERE v = 2")?.row_count(), 2);

        // The first occurrence is kept with its own type
        assert_eq!(
            s.execute("SELECT DISTINCT v FROM t")?,
            ResultSet::Scan {
                columns: vec!["v".into()],
                rows: vec![
                    vec![Value::Integer(2)],
                    vec![Value::Float(3.0)],
                    vec![Value::Float(2.5)],
                ],
            }
        );
        Ok(())
    }
}
