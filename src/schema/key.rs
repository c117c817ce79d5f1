//! Typed handles to schema values

use std::fmt;
use std::marker::PhantomData;

/// Handle to a value entry, returned by [`Builder::define`](super::Builder::define)
///
/// A key is an index into the entry table of the schema it was defined on,
/// tagged with that schema's id. It stays valid for every [`Config`](crate::Config)
/// built from the same builder and is rejected by any other.
pub struct Key<T> {
    pub(crate) schema_id: u64,
    pub(crate) index: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Key<T> {
    pub(crate) fn new(schema_id: u64, index: usize) -> Self {
        Self {
            schema_id,
            index,
            _marker: PhantomData,
        }
    }

    /// Position of the entry in declaration order
    pub fn index(&self) -> usize {
        self.index
    }
}

impl<T> Clone for Key<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Key<T> {}

impl<T> PartialEq for Key<T> {
    fn eq(&self, other: &Self) -> bool {
        self.schema_id == other.schema_id && self.index == other.index
    }
}

impl<T> Eq for Key<T> {}

impl<T> fmt::Debug for Key<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Key")
            .field("schema_id", &self.schema_id)
            .field("index", &self.index)
            .field("type", &std::any::type_name::<T>())
            .finish()
    }
}
