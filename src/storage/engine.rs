use std::ops::{Bound, RangeBounds};

use crate::error::Result;

/// Abstract storage engine interface (byte-level operations)
///
/// Different from sql::engine::Engine which operates on tables.
pub trait Engine {
    type EngineIterator<'a>: EngineIterator
    where
        Self: 'a;

    fn set(&mut self, key: Vec<u8>, value: Vec<u8>) -> Result<()>;
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>>;
    fn delete(&mut self, key: &[u8]) -> Result<()>;
    fn scan(&self, range: impl RangeBounds<Vec<u8>>) -> Self::EngineIterator<'_>;

    /// Prefix scan using lexicographic ordering
    ///
    /// Converts the prefix to a range by incrementing its last byte, e.g. "apple"
    /// becomes ["apple", "applf"). Trailing 0xff bytes are dropped first; a prefix
    /// made only of 0xff bytes has no upper bound.
    fn scan_prefix(&self, prefix: Vec<u8>) -> Self::EngineIterator<'_> {
        let start = Bound::Included(prefix.clone());
        let mut upper = prefix;
        while upper.last() == Some(&0xff) {
            upper.pop();
        }
        let end = match upper.last_mut() {
            Some(last) => {
                *last += 1;
                Bound::Excluded(upper)
            }
            None => Bound::Unbounded,
        };
        self.scan((start, end))
    }
}

/// Storage engine iterator trait (supports reverse traversal)
pub trait EngineIterator: DoubleEndedIterator<Item = Result<(Vec<u8>, Vec<u8>)>> {}
