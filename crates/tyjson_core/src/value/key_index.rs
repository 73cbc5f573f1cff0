use tyjson_utils::hash::HashTable;

use crate::value::{TypedValue, same_value, value_hash};

/// Hash index over the keys of an insertion-ordered entry list.
///
/// Each slot stores the key hash and the entry position. Identity-compared
/// keys have no hash and are never indexed.
#[derive(Clone, Default)]
pub(crate) struct KeyIndex {
    table: HashTable<(u64, usize)>,
}

impl KeyIndex {
    #[inline]
    pub const fn new() -> Self {
        Self {
            table: HashTable::new(),
        }
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            table: HashTable::with_capacity(capacity),
        }
    }

    /// Finds the position of `key`, `key_at` reads the key of an entry.
    pub fn find<'a>(&self, key: &TypedValue, key_at: impl Fn(usize) -> &'a TypedValue) -> Option<usize> {
        let hash = value_hash(key)?;
        self.table
            .find(hash, |&(h, index)| h == hash && same_value(key_at(index), key))
            .map(|&(_, index)| index)
    }

    /// Records a new entry at `index`.
    pub fn insert(&mut self, key: &TypedValue, index: usize) {
        if let Some(hash) = value_hash(key) {
            self.table.insert_unique(hash, (hash, index), |&(h, _)| h);
        }
    }

    /// Re-indexes every key after positions shifted.
    pub fn rebuild<'a>(&mut self, keys: impl Iterator<Item = &'a TypedValue>) {
        self.table.clear();
        for (index, key) in keys.enumerate() {
            self.insert(key, index);
        }
    }
}
