use std::borrow::Borrow;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::{Error, Result};

/// Number of buckets of a directory created with [`KeyedDirectory::new`].
pub const DEFAULT_CAPACITY: usize = 16;

/// Fill ratio at which the bucket array doubles.
pub const LOAD_FACTOR: f64 = 0.75;

/// Keys accepted by a [`KeyedDirectory`].
///
/// A key that reports itself as blank is rejected on insertion.
pub trait DirectoryKey: Hash + Eq {
    fn is_blank(&self) -> bool;
}

impl DirectoryKey for String {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

impl DirectoryKey for &str {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

impl DirectoryKey for u64 {
    fn is_blank(&self) -> bool {
        false
    }
}

#[derive(Debug)]
struct Entry<K, V> {
    key: K,
    value: V,
    next: Option<Box<Entry<K, V>>>,
}

/// Hash table with separate chaining, used for the airport directory and the
/// adjacency lists of the flight graph.
///
/// Every bucket is a singly linked chain. New keys are prepended, so a chain
/// lists its entries most-recently-inserted first. The bucket array doubles
/// whenever `size >= capacity * LOAD_FACTOR` at the start of a [`put`](Self::put),
/// i.e. before the insert that would overfill it.
#[derive(Debug)]
pub struct KeyedDirectory<K, V> {
    buckets: Vec<Option<Box<Entry<K, V>>>>,
    size: usize,
    capacity: usize,
}

/// Observability snapshot of a [`KeyedDirectory`]. Not used for correctness.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryStatistics {
    pub size: usize,
    pub capacity: usize,
    pub load_factor: f64,
    pub non_empty_buckets: usize,
    pub max_chain_length: usize,
    pub avg_chain_length: f64,
}

impl fmt::Display for DirectoryStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Hash Table Statistics:")?;
        writeln!(f, "  Size: {}", self.size)?;
        writeln!(f, "  Capacity: {}", self.capacity)?;
        writeln!(f, "  Load Factor: {:.3}", self.load_factor)?;
        writeln!(f, "  Non-empty Buckets: {}", self.non_empty_buckets)?;
        writeln!(f, "  Max Chain Length: {}", self.max_chain_length)?;
        write!(f, "  Avg Chain Length: {:.2}", self.avg_chain_length)
    }
}

impl<K: DirectoryKey, V> Default for KeyedDirectory<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: DirectoryKey, V> KeyedDirectory<K, V> {
    pub fn new() -> Self {
        Self { buckets: Self::empty_buckets(DEFAULT_CAPACITY), size: 0, capacity: DEFAULT_CAPACITY }
    }

    /// Creates a directory with `capacity` buckets.
    ///
    /// # Returns
    /// `Error::InvalidArgument` if `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::invalid_argument("Initial capacity must be positive"));
        }

        Ok(Self { buckets: Self::empty_buckets(capacity), size: 0, capacity })
    }

    fn empty_buckets(capacity: usize) -> Vec<Option<Box<Entry<K, V>>>> {
        std::iter::repeat_with(|| None).take(capacity).collect()
    }

    fn bucket_index<Q>(&self, key: &Q) -> usize
    where
        Q: Hash + ?Sized,
    {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        (hasher.finish() % self.capacity as u64) as usize
    }

    /// Inserts `value` under `key`, overwriting the value of an existing equal key.
    ///
    /// # Returns
    /// `Error::InvalidArgument` for a blank key; nothing is stored in that case.
    pub fn put(&mut self, key: K, value: V) -> Result<()> {
        if key.is_blank() {
            return Err(Error::invalid_argument("Key cannot be empty"));
        }

        if self.size as f64 >= self.capacity as f64 * LOAD_FACTOR {
            self.resize();
        }

        let index = self.bucket_index(&key);

        let mut cursor = self.buckets[index].as_deref_mut();
        while let Some(entry) = cursor {
            if entry.key == key {
                entry.value = value;
                return Ok(());
            }
            cursor = entry.next.as_deref_mut();
        }

        let next = self.buckets[index].take();
        self.buckets[index] = Some(Box::new(Entry { key, value, next }));
        self.size += 1;

        Ok(())
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = self.bucket_index(key);

        let mut cursor = self.buckets[index].as_deref();
        while let Some(entry) = cursor {
            if entry.key.borrow() == key {
                return Some(&entry.value);
            }
            cursor = entry.next.as_deref();
        }

        None
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = self.bucket_index(key);

        let mut cursor = self.buckets[index].as_deref_mut();
        while let Some(entry) = cursor {
            if entry.key.borrow() == key {
                return Some(&mut entry.value);
            }
            cursor = entry.next.as_deref_mut();
        }

        None
    }

    /// Removes `key` and returns its value. Absent keys are a no-op.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = self.bucket_index(key);

        let mut link = &mut self.buckets[index];
        while link.as_ref().is_some_and(|entry| entry.key.borrow() != key) {
            link = &mut link.as_mut()?.next;
        }

        let mut removed = link.take()?;
        *link = removed.next.take();
        self.size -= 1;

        Some(removed.value)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get(key).is_some()
    }

    /// Rehashes every entry into a bucket array of twice the capacity.
    fn resize(&mut self) {
        self.capacity *= 2;
        let old_buckets = std::mem::replace(&mut self.buckets, Self::empty_buckets(self.capacity));

        for mut link in old_buckets {
            while let Some(mut entry) = link {
                link = entry.next.take();
                let index = self.bucket_index(&entry.key);
                entry.next = self.buckets[index].take();
                self.buckets[index] = Some(entry);
            }
        }

        log::debug!("KeyedDirectory resized to {} buckets ({} entries).", self.capacity, self.size);
    }

    fn entries(&self) -> impl Iterator<Item = &Entry<K, V>> {
        self.buckets.iter().flat_map(|bucket| {
            let mut cursor = bucket.as_deref();
            std::iter::from_fn(move || {
                let entry = cursor?;
                cursor = entry.next.as_deref();
                Some(entry)
            })
        })
    }

    /// Snapshot of all keys in bucket order.
    pub fn key_set(&self) -> Vec<K>
    where
        K: Clone,
    {
        self.entries().map(|entry| entry.key.clone()).collect()
    }

    /// Snapshot of all values in bucket order.
    pub fn values(&self) -> Vec<V>
    where
        V: Clone,
    {
        self.entries().map(|entry| entry.value.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries().map(|entry| (&entry.key, &entry.value))
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn load_factor(&self) -> f64 {
        self.size as f64 / self.capacity as f64
    }

    /// Drops every entry but keeps the current capacity.
    pub fn clear(&mut self) {
        self.buckets = Self::empty_buckets(self.capacity);
        self.size = 0;
    }

    pub fn statistics(&self) -> DirectoryStatistics {
        let mut non_empty_buckets = 0;
        let mut max_chain_length = 0;
        let mut total_chain_length = 0;

        for bucket in &self.buckets {
            let mut chain_length = 0;
            let mut cursor = bucket.as_deref();
            while let Some(entry) = cursor {
                chain_length += 1;
                cursor = entry.next.as_deref();
            }

            if chain_length > 0 {
                non_empty_buckets += 1;
                max_chain_length = max_chain_length.max(chain_length);
                total_chain_length += chain_length;
            }
        }

        let avg_chain_length = if non_empty_buckets > 0 { total_chain_length as f64 / non_empty_buckets as f64 } else { 0.0 };

        DirectoryStatistics {
            size: self.size,
            capacity: self.capacity,
            load_factor: self.load_factor(),
            non_empty_buckets,
            max_chain_length,
            avg_chain_length,
        }
    }
}

impl<K, V> Drop for KeyedDirectory<K, V> {
    fn drop(&mut self) {
        // Unlink chains iteratively so long chains cannot overflow the stack.
        for bucket in self.buckets.iter_mut() {
            let mut link = bucket.take();
            while let Some(mut entry) = link {
                link = entry.next.take();
            }
        }
    }
}
