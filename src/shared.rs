//! Sharing the driver between mainline code and interrupt handlers
//!
//! [`Trx`] needs `&mut self` for everything, but with the [`NonBlocking`]
//! strategy, the SPI transfer-complete interrupt has to reach it too.
//! [`SharedTrx`] is a `static`-friendly cell that hands out exclusive access
//! from inside a critical section.
//!
//! ``` rust
//! # use at86rf2xx::SharedTrx;
//! static COUNTER: SharedTrx<u32> = SharedTrx::new();
//!
//! COUNTER.put(0);
//! COUNTER.with(|counter| *counter += 1);
//! assert_eq!(COUNTER.take(), Some(1));
//! ```
//!
//! [`Trx`]: ../hl/struct.Trx.html
//! [`NonBlocking`]: ../hl/struct.NonBlocking.html

use core::cell::RefCell;

use critical_section::Mutex;

/// A driver instance that can be stored in a `static`
pub struct SharedTrx<T>(Mutex<RefCell<Option<T>>>);

impl<T> SharedTrx<T> {
    /// Create an empty cell
    pub const fn new() -> Self {
        SharedTrx(Mutex::new(RefCell::new(None)))
    }

    /// Store `value`, returning the previous one, if any
    pub fn put(&self, value: T) -> Option<T> {
        critical_section::with(|cs| self.0.borrow(cs).replace(Some(value)))
    }

    /// Remove the stored value
    pub fn take(&self) -> Option<T> {
        critical_section::with(|cs| self.0.borrow(cs).take())
    }

    /// Run `f` with exclusive access to the stored value
    ///
    /// Returns `None` without calling `f` if the cell is empty, or if it is
    /// already being accessed further up the stack.
    pub fn with<F, R>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&mut T) -> R,
    {
        critical_section::with(|cs| {
            let mut slot = self.0.borrow(cs).try_borrow_mut().ok()?;
            slot.as_mut().map(f)
        })
    }
}

impl<T> Default for SharedTrx<T> {
    fn default() -> Self {
        SharedTrx::new()
    }
}
