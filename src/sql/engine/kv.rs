use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    sql::{schema::Table, types::Row},
    storage::engine::Engine as StorageEngine,
};

use super::{Engine, RowId};

/// Key-value store backed SQL engine
///
/// Schemas, rows and row-id sequences are bincode-encoded into a byte-level
/// storage engine.
pub struct KVEngine<E: StorageEngine> {
    pub kv: E,
}

impl<E: StorageEngine> KVEngine<E> {
    pub fn new(engine: E) -> Self {
        Self { kv: engine }
    }

    /// Hands out the next row id of a table and advances its sequence
    fn next_row_id(&mut self, table_name: &str) -> Result<RowId> {
        let key = bincode::serialize(&Key::NextRowId(table_name.to_string()))?;
        let id = match self.kv.get(&key)? {
            Some(value) => bincode::deserialize(&value)?,
            None => 0,
        };
        self.kv.set(key, bincode::serialize(&(id + 1))?)?;
        Ok(id)
    }

    fn row_key(table_name: &str, id: RowId) -> Result<Vec<u8>> {
        Ok(bincode::serialize(&Key::Row(
            table_name.to_string(),
            id.to_be_bytes(),
        ))?)
    }
}

impl<E: StorageEngine> Engine for KVEngine<E> {
    fn create_table(&mut self, table: Table) -> Result<()> {
        // Table must have at least one column
        if table.columns.is_empty() {
            return Err(Error::MalformedClause(format!(
                "table {} has no columns",
                table.name
            )));
        }

        // An existing table of the same name is replaced along with its rows
        self.drop_table(&table.name)?;

        // Store table schema: key = table name, value = serialized table schema
        let key = Key::Table(table.name.clone());
        let value = bincode::serialize(&table)?;
        self.kv.set(bincode::serialize(&key)?, value)?;

        Ok(())
    }

    fn drop_table(&mut self, table_name: &str) -> Result<bool> {
        if self.get_table(table_name)?.is_none() {
            return Ok(false);
        }

        let prefix = bincode::serialize(&KeyPrefix::Row(table_name.to_string()))?;
        let keys = self
            .kv
            .scan_prefix(prefix)
            .map(|r| r.map(|(key, _)| key))
            .collect::<Result<Vec<_>>>()?;
        for key in keys {
            self.kv.delete(&key)?;
        }
        self.kv
            .delete(&bincode::serialize(&Key::NextRowId(table_name.to_string()))?)?;
        self.kv
            .delete(&bincode::serialize(&Key::Table(table_name.to_string()))?)?;
        Ok(true)
    }

    fn get_table(&self, table_name: &str) -> Result<Option<Table>> {
        let key = Key::Table(table_name.to_string());
        Ok(self
            .kv
            .get(&bincode::serialize(&key)?)?
            .map(|v| bincode::deserialize(&v))
            .transpose()?)
    }

    fn create_row(&mut self, table_name: &str, row: Row) -> Result<()> {
        let table = self.must_get_table(table_name)?;

        // Validate row length, nullability and types against the schema
        table.validate_row(&row)?;

        let id = self.next_row_id(table_name)?;
        self.kv
            .set(Self::row_key(table_name, id)?, bincode::serialize(&row)?)?;

        Ok(())
    }

    fn update_row(&mut self, table_name: &str, id: RowId, row: Row) -> Result<()> {
        self.kv
            .set(Self::row_key(table_name, id)?, bincode::serialize(&row)?)
    }

    fn delete_row(&mut self, table_name: &str, id: RowId) -> Result<()> {
        self.kv.delete(&Self::row_key(table_name, id)?)
    }

    fn scan_table(&self, table_name: &str) -> Result<Vec<(RowId, Row)>> {
        // Use prefix scan to find all rows in the table
        let prefix = bincode::serialize(&KeyPrefix::Row(table_name.to_string()))?;

        let mut rows = Vec::new();
        for result in self.kv.scan_prefix(prefix) {
            let (key, value) = result?;
            let id = match bincode::deserialize(&key)? {
                Key::Row(_, id) => RowId::from_be_bytes(id),
                key => return Err(Error::Internal(format!("unexpected key {:?}", key))),
            };
            rows.push((id, bincode::deserialize(&value)?));
        }
        Ok(rows)
    }
}

/// Key types for KV storage operations
///
/// Row ids are stored big-endian so that byte order equals insertion order.
#[derive(Debug, Serialize, Deserialize)]
enum Key {
    Table(String),
    Row(String, [u8; 8]),
    NextRowId(String),
}

/// Key prefix types for prefix scanning
///
/// In bincode, enums are serialized as [variant_index][variant_data...].
/// Variant indices start from 0 in definition order, so `KeyPrefix::Row`
/// must stay at the same index as `Key::Row`.
#[derive(Debug, Serialize, Deserialize)]
enum KeyPrefix {
    #[allow(dead_code)]
    Table,
    Row(String),
}
