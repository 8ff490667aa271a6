//! Small `Copy` values shared between interrupt and main-loop context.

use core::cell::Cell;

use critical_section::Mutex;

/// A `Copy` value read and written whole inside a critical section.
///
/// Suitable for a `static`: `new` is `const` and every access takes `&self`.
pub struct SharedCell<T: Copy> {
    inner: Mutex<Cell<T>>,
}

impl<T: Copy> SharedCell<T> {
    /// Create a cell holding `value`.
    pub const fn new(value: T) -> Self {
        Self {
            inner: Mutex::new(Cell::new(value)),
        }
    }

    /// Copy the current value out.
    #[inline]
    pub fn load(&self) -> T {
        critical_section::with(|cs| self.inner.borrow(cs).get())
    }

    /// Replace the current value.
    #[inline]
    pub fn store(&self, value: T) {
        critical_section::with(|cs| self.inner.borrow(cs).set(value))
    }

    /// Replace the current value, returning the previous one.
    #[inline]
    pub fn swap(&self, value: T) -> T {
        critical_section::with(|cs| self.inner.borrow(cs).replace(value))
    }
}

impl<T: Copy + Default> Default for SharedCell<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_store_swap() {
        static CELL: SharedCell<(u16, u32)> = SharedCell::new((0, 0));

        CELL.store((12, 34));
        assert_eq!(CELL.load(), (12, 34));
        assert_eq!(CELL.swap((1, 2)), (12, 34));
        assert_eq!(CELL.load(), (1, 2));
    }
}
