//! Index-addressable sequence whose values are computed on demand.

/// Keys paired with values resolved lazily through `extract`.
///
/// Each index is resolved at most once; later reads return the cached value.
/// A failed extraction leaves the index unresolved, so a later read of the
/// same index calls `extract` again.
pub struct LazyKeyedSequence<K, V, F> {
    keys: Vec<K>,
    values: Vec<Option<V>>,
    extract: F,
}

impl<K, V, E, F> LazyKeyedSequence<K, V, F>
where
    F: FnMut(&K) -> Result<V, E>,
{
    pub fn new(keys: Vec<K>, extract: F) -> Self {
        let values = std::iter::repeat_with(|| None).take(keys.len()).collect();
        Self {
            keys,
            values,
            extract,
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn key(&self, index: usize) -> &K {
        &self.keys[index]
    }

    /// Appends an unresolved key.
    pub fn push(&mut self, key: K) {
        self.keys.push(key);
        self.values.push(None);
    }

    pub fn is_resolved(&self, index: usize) -> bool {
        self.values[index].is_some()
    }

    /// Returns the value at `index`, extracting it on first access.
    ///
    /// Panics if `index >= len()`, like slice indexing.
    pub fn get(&mut self, index: usize) -> Result<&V, E> {
        let slot = &mut self.values[index];
        let value = match slot.take() {
            Some(value) => value,
            None => (self.extract)(&self.keys[index])?,
        };
        Ok(&*slot.insert(value))
    }

    pub fn into_keys(self) -> Vec<K> {
        self.keys
    }
}
