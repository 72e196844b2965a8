//! Turn lazily produced sequences into materialized containers.
//!
//! Algorithms often read best as iterator pipelines while callers want a
//! concrete container. These wrappers drain the iterator at call time, so any
//! laziness of the wrapped function is lost.

/// Wrap `f` so that its iterator result is collected into a `Vec`.
///
/// ```
/// use commonkit::listify::listify;
///
/// let squares = listify(|n: u32| (1..=n).map(|i| i * i));
/// assert_eq!(squares(3), vec![1, 4, 9]);
/// ```
pub fn listify<A, I, F>(f: F) -> impl Fn(A) -> Vec<I::Item>
where
    F: Fn(A) -> I,
    I: IntoIterator,
{
    listify_into::<Vec<I::Item>, A, I, F>(f)
}

/// Wrap `f` so that its iterator result is collected into any `C: FromIterator`.
pub fn listify_into<C, A, I, F>(f: F) -> impl Fn(A) -> C
where
    F: Fn(A) -> I,
    I: IntoIterator,
    C: FromIterator<I::Item>,
{
    listify_with(f, |items: I| items.into_iter().collect())
}

/// Wrap `f` so that its result is handed to `wrapper`, a container constructor.
pub fn listify_with<A, I, C, F, W>(f: F, wrapper: W) -> impl Fn(A) -> C
where
    F: Fn(A) -> I,
    W: Fn(I) -> C,
{
    move |args| wrapper(f(args))
}

/// Rewrite function definitions whose bodies produce iterators.
///
/// Without options the body is collected into the declared return type. With
/// `wrapper = expr =>` the body is passed to the given constructor instead.
///
/// ```
/// use commonkit::listify;
/// use std::collections::BTreeMap;
///
/// listify! {
///     fn evens(limit: u32) -> Vec<u32> {
///         (0..limit).filter(|n| n % 2 == 0)
///     }
/// }
///
/// listify! {
///     wrapper = |it: std::vec::IntoIter<(char, usize)>| it.rev().collect::<BTreeMap<_, _>>() =>
///     fn positions(word: &str) -> BTreeMap<char, usize> {
///         word.chars().enumerate().map(|(i, c)| (c, i)).collect::<Vec<_>>().into_iter()
///     }
/// }
///
/// assert_eq!(evens(7), vec![0, 2, 4, 6]);
/// assert_eq!(positions("aba")[&'a'], 0);
/// ```
#[macro_export]
macro_rules! listify {
    (
        wrapper = $wrapper:expr =>
        $(#[$meta:meta])*
        $vis:vis fn $name:ident($($arg:ident : $arg_ty:ty),* $(,)?) -> $ret:ty $body:block
    ) => {
        $(#[$meta])*
        $vis fn $name($($arg: $arg_ty),*) -> $ret {
            ($wrapper)($body)
        }
    };
    ($(
        $(#[$meta:meta])*
        $vis:vis fn $name:ident($($arg:ident : $arg_ty:ty),* $(,)?) -> $ret:ty $body:block
    )*) => {
        $(
            $(#[$meta])*
            $vis fn $name($($arg: $arg_ty),*) -> $ret {
                ::core::iter::Iterator::collect::<$ret>(::core::iter::IntoIterator::into_iter($body))
            }
        )*
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeSet, HashMap};

    fn countdown(from: u8) -> impl Iterator<Item = u8> {
        (0..=from).rev()
    }

    #[test]
    fn test_listify_materializes_vec() {
        let wrapped = listify(countdown);
        assert_eq!(wrapped(3), vec![3, 2, 1, 0]);
    }

    #[test]
    fn test_listify_into_mapping() {
        let wrapped = listify_into::<HashMap<_, _>, _, _, _>(|words: Vec<&'static str>| {
            words.into_iter().map(|w| (w, w.len()))
        });
        let lengths = wrapped(vec!["a", "abc"]);
        assert_eq!(lengths["abc"], 3);
        assert_eq!(lengths.len(), 2);
    }

    #[test]
    fn test_listify_with_custom_wrapper() {
        let distinct = listify_with(
            |(a, b): (u32, u32)| [a, b, a, b].into_iter(),
            |it: std::array::IntoIter<u32, 4>| it.collect::<BTreeSet<_>>(),
        );
        assert_eq!(distinct((2, 1)).into_iter().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_listify_forces_evaluation_at_call() {
        use std::cell::Cell;

        let produced = Cell::new(0);
        let counter = &produced;
        let wrapped = listify(move |n: usize| {
            (0..n).map(move |i| {
                counter.set(counter.get() + 1);
                i
            })
        });
        let out = wrapped(5);
        assert_eq!(produced.get(), 5);
        assert_eq!(out.len(), 5);
    }

    listify! {
        fn letters(word: &str) -> Vec<char> {
            word.chars().filter(|c| c.is_alphabetic())
        }

        fn pairs(n: usize, m: usize,) -> Vec<(usize, usize)> {
            (0..n).flat_map(move |i| (0..m).map(move |j| (i, j)))
        }
    }

    listify! {
        wrapper = |it: std::ops::Range<u32>| it.sum::<u32>() =>
        fn total(limit: u32) -> u32 {
            0..limit
        }
    }

    #[test]
    fn test_macro_direct_form() {
        assert_eq!(letters("a1b2"), vec!['a', 'b']);
        assert_eq!(pairs(2, 2), vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
    }

    #[test]
    fn test_macro_wrapper_form() {
        assert_eq!(total(5), 10);
    }
}
