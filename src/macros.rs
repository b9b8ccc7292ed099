//! Logging shims
//!
//! Forward to `defmt` when the `defmt` feature is enabled, and compile to
//! nothing otherwise. The arguments are still borrowed in the disabled case, so
//! they don't turn into unused variables.

macro_rules! trace {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {
        #[cfg(feature = "defmt")]
        defmt::trace!($fmt $(, $arg)*);
        #[cfg(not(feature = "defmt"))]
        {
            $( let _ = &$arg; )*
        }
    };
}

macro_rules! debug {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {
        #[cfg(feature = "defmt")]
        defmt::debug!($fmt $(, $arg)*);
        #[cfg(not(feature = "defmt"))]
        {
            $( let _ = &$arg; )*
        }
    };
}
