//! Iterable helpers: asserting a single distinct value and grouping by a derived key.

use crate::error::{Error, Result};
use indexmap::IndexMap;
use std::hash::Hash;

/// Return the single distinct value produced by `iterable`.
///
/// The first item is the reference value. Every remaining item must compare
/// equal to it; on success the input is fully drained.
///
/// # Errors
///
/// - [`Error::EmptyInput`] when the iterable yields nothing
/// - [`Error::InconsistentValues`] at the first item that differs from the
///   reference; consumption stops at that item
///
/// # Example
///
/// ```
/// use commonkit::iter::the;
///
/// assert_eq!(the(vec![3, 3, 3]).unwrap(), 3);
/// assert!(the(Vec::<u8>::new()).is_err());
/// assert!(the([1, 2]).is_err());
/// ```
pub fn the<I>(iterable: I) -> Result<I::Item>
where
    I: IntoIterator,
    I::Item: PartialEq,
{
    let mut it = iterable.into_iter();
    let first = it.next().ok_or(Error::EmptyInput)?;

    for (offset, item) in it.enumerate() {
        if item != first {
            return Err(Error::InconsistentValues { index: offset + 1 });
        }
    }

    Ok(first)
}

/// Partition `iterable` into buckets keyed by `key(&item)`.
///
/// Keys appear in first-seen order and every bucket keeps the encounter order
/// of its items. A bucket exists only once an item maps to its key.
///
/// ```
/// use commonkit::iter::group_by_key;
///
/// let groups = group_by_key(["apple", "avocado", "banana", "apricot"], |s| s.as_bytes()[0]);
/// let keys: Vec<_> = groups.keys().copied().collect();
/// assert_eq!(keys, vec![b'a', b'b']);
/// assert_eq!(groups[&b'a'], vec!["apple", "avocado", "apricot"]);
/// ```
pub fn group_by_key<I, K, F>(iterable: I, mut key: F) -> IndexMap<K, Vec<I::Item>>
where
    I: IntoIterator,
    K: Hash + Eq,
    F: FnMut(&I::Item) -> K,
{
    let mut groups: IndexMap<K, Vec<I::Item>> = IndexMap::new();
    for item in iterable {
        groups.entry(key(&item)).or_default().push(item);
    }
    groups
}
