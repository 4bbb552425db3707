use std::cmp::Ordering;

use crate::{
    error::{Error, Result},
    sql::{engine::Engine, parser::ast::AggregateFunction, types::Value},
};

use super::{Executor, ResultSet};

/// Aggregate executor - computes MAX, MIN, SUM or AVG over one column
///
/// Only numeric values take part; text and nulls in the column are skipped.
pub struct Aggregate<E: Engine> {
    source: Box<dyn Executor<E>>,
    table_name: String,
    function: AggregateFunction,
    column: String,
}

impl<E: Engine> Aggregate<E> {
    pub fn new(
        source: Box<dyn Executor<E>>,
        table_name: String,
        function: AggregateFunction,
        column: String,
    ) -> Box<Self> {
        Box::new(Self {
            source,
            table_name,
            function,
            column,
        })
    }
}

impl<E: Engine> Executor<E> for Aggregate<E> {
    fn execute(self: Box<Self>, engine: &mut E) -> Result<ResultSet> {
        if let ResultSet::Scan { columns, rows } = self.source.execute(engine)? {
            let pos = columns
                .iter()
                .position(|c| *c == self.column)
                .ok_or_else(|| Error::UnknownColumn {
                    table: self.table_name.clone(),
                    column: self.column.clone(),
                })?;

            let values = rows
                .iter()
                .map(|row| &row[pos])
                .filter(|v| v.is_numeric())
                .collect::<Vec<_>>();
            if values.is_empty() {
                return Err(Error::NoNumericData);
            }

            let value = <dyn Calculator>::build(self.function).calc(&values);
            return Ok(ResultSet::Aggregate { value });
        }
        Err(Error::Internal("Unexpected result set".into()))
    }
}

/// Trait for aggregate function calculations over a non-empty list of numbers
pub trait Calculator {
    fn calc(&self, values: &[&Value]) -> Value;
}

impl dyn Calculator {
    /// Runtime dispatch to the calculator of an aggregate function
    pub fn build(function: AggregateFunction) -> Box<dyn Calculator> {
        match function {
            AggregateFunction::Max => Box::new(Max),
            AggregateFunction::Min => Box::new(Min),
            AggregateFunction::Sum => Box::new(Sum),
            AggregateFunction::Avg => Box::new(Avg),
        }
    }
}

/// Picks the first value that no later value beats in `wanted` direction
fn extreme(values: &[&Value], wanted: Ordering) -> Value {
    let mut best = values[0];
    for &v in &values[1..] {
        if v.compare(best) == Some(wanted) {
            best = v;
        }
    }
    best.clone()
}

/// MAX - largest value, keeping its original type
pub struct Max;

impl Calculator for Max {
    fn calc(&self, values: &[&Value]) -> Value {
        extreme(values, Ordering::Greater)
    }
}

/// MIN - smallest value, keeping its original type
pub struct Min;

impl Calculator for Min {
    fn calc(&self, values: &[&Value]) -> Value {
        extreme(values, Ordering::Less)
    }
}

/// SUM - integer while every input is an integer and the total fits, float otherwise
pub struct Sum;

impl Calculator for Sum {
    fn calc(&self, values: &[&Value]) -> Value {
        let mut int_sum = Some(0i64);
        let mut float_sum = 0.0;
        for v in values {
            match v {
                Value::Integer(i) => {
                    int_sum = int_sum.and_then(|s| s.checked_add(*i));
                    float_sum += *i as f64;
                }
                Value::Float(f) => {
                    int_sum = None;
                    float_sum += f;
                }
                _ => {}
            }
        }
        match int_sum {
            Some(s) => Value::Integer(s),
            None => Value::Float(float_sum),
        }
    }
}

/// AVG - always a float
pub struct Avg;

impl Calculator for Avg {
    fn calc(&self, values: &[&Value]) -> Value {
        // AVG = SUM / COUNT
        let total = values
            .iter()
            .map(|v| match v {
                Value::Integer(i) => *i as f64,
                Value::Float(f) => *f,
                _ => 0.0,
            })
            .sum::<f64>();
        Value::Float(total / values.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        error::{Error, Result},
        sql::{
            executor::{ResultSet, tests::session},
            types::Value,
        },
    };

    fn aggregate(value: Value) -> ResultSet {
        ResultSet::Aggregate { value }
    }

    #[test]
    fn test_aggregates() -> Result<()> {
        let mut s = session();
        s.execute("CREATE TABLE t (id INT, price FLOAT, name TEXT)")?;
        s.execute("INSERT INTO t VALUES (1, 2.5, 'a')")?;
        s.execute("INSERT INTO t VALUES (2, 4, 'b')")?;
        s.execute("INSERT INTO t VALUES (3, 1, 'c')")?;
        // UPDATE skips validation, which is the only way a NULL gets stored
        s.execute("UPDATE t SET price = NULL WHERE id = 3")?;

        assert_eq!(s.execute("SELECT MAX(id) FROM t")?, aggregate(Value::Integer(3)));
        assert_eq!(s.execute("SELECT min(id) FROM t")?, aggregate(Value::Integer(1)));
        assert_eq!(s.execute("SELECT SUM(id) FROM t")?, aggregate(Value::Integer(6)));
        assert_eq!(s.execute("SELECT AVG(id) FROM t")?, aggregate(Value::Float(2.0)));

        // Nulls are skipped, mixed numbers keep their own type for MAX and MIN
        assert_eq!(s.execute("SELECT MAX(price) FROM t")?, aggregate(Value::Integer(4)));
        assert_eq!(s.execute("SELECT MIN(price) FROM t")?, aggregate(Value::Float(2.5)));
        assert_eq!(s.execute("SELECT SUM(price) FROM t")?, aggregate(Value::Float(6.5)));
        assert_eq!(s.execute("SELECT AVG(price) FROM t")?, aggregate(Value::Float(3.25)));
        Ok(())
    }

    #[test]
    fn test_aggregate_no_numeric_data() -> Result<()> {
        let mut s = session();
        s.execute("CREATE TABLE t (id INT, name TEXT)")?;
        assert_eq!(s.execute("SELECT MAX(id) FROM t"), Err(Error::NoNumericData));

        s.execute("INSERT INTO t VALUES (1, 'a')")?;
        assert_eq!(s.execute("SELECT SUM(name) FROM t"), Err(Error::NoNumericData));
        Ok(())
    }

    #[test]
    fn test_aggregate_errors() -> Result<()> {
        let mut s = session();
        s.execute("CREATE TABLE t (id INT)")?;
        assert_eq!(
            s.execute("SELECT MAX(nope) FROM t"),
            Err(Error::UnknownColumn {
                table: "t".to_string(),
                column: "nope".to_string()
            })
        );
        assert_eq!(
            s.execute("SELECT MAX(id) FROM u"),
            Err(Error::UnknownTable("u".to_string()))
        );
        assert_eq!(
            s.execute("SELECT MAXIMUM(id) FROM t"),
            Err(Error::UnknownAggregateFunction("MAXIMUM".to_string()))
        );
        Ok(())
    }

    #[test]
    fn test_sum_overflow_falls_back_to_float() -> Result<()> {
        let mut s = session();
        s.execute("CREATE TABLE t (id INT)")?;
        s.execute(&format!("INSERT INTO t VALUES ({})", i64::MAX))?;
        s.execute("INSERT INTO t VALUES (1)")?;
        assert_eq!(
            s.execute("SELECT SUM(id) FROM t")?,
            aggregate(Value::Float(i64::MAX as f64 + 1.0))
        );
        Ok(())
    }
}
