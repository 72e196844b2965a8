//! Per-instance cached properties.
//!
//! A [`CProperty`] is a single-slot cache owned by the instance it belongs to.
//! The value is computed on first access and kept for the lifetime of the
//! owner. The cell is `!Sync`: population is single-threaded by construction.

use once_cell::unsync::OnceCell;
use std::fmt;

/// Capacity-1 cache for a computed attribute of one instance.
pub struct CProperty<T> {
    cell: OnceCell<T>,
}

impl<T> CProperty<T> {
    pub const fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    /// Return the cached value, computing it with `compute` on first access.
    pub fn get_or_init<F>(&self, compute: F) -> &T
    where
        F: FnOnce() -> T,
    {
        self.cell.get_or_init(compute)
    }

    /// Return the cached value if it has been computed.
    pub fn get(&self) -> Option<&T> {
        self.cell.get()
    }

    pub fn is_computed(&self) -> bool {
        self.cell.get().is_some()
    }

    pub fn into_inner(self) -> Option<T> {
        self.cell.into_inner()
    }
}

impl<T> Default for CProperty<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for CProperty<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cell.get() {
            Some(value) => f.debug_tuple("CProperty").field(value).finish(),
            None => f.write_str("CProperty(<uncomputed>)"),
        }
    }
}

/// Define accessor methods backed by [`CProperty`] fields of the same name.
///
/// ```
/// use commonkit::cproperty;
/// use commonkit::cproperty::CProperty;
///
/// struct Circle {
///     radius: f64,
///     area: CProperty<f64>,
/// }
///
/// impl Circle {
///     cproperty! {
///         /// Area, computed once.
///         pub fn area(&self) -> f64 {
///             std::f64::consts::PI * self.radius * self.radius
///         }
///     }
/// }
///
/// let c = Circle { radius: 2.0, area: CProperty::new() };
/// assert_eq!(c.area(), c.area());
/// ```
#[macro_export]
macro_rules! cproperty {
    ($(
        $(#[$meta:meta])*
        $vis:vis fn $name:ident(&$self:ident) -> $ty:ty $body:block
    )*) => {
        $(
            $(#[$meta])*
            $vis fn $name(&$self) -> &$ty {
                $self.$name.get_or_init(|| $body)
            }
        )*
    };
}
