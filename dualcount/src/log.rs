//! Logging shims that forward to `defmt` when the `defmt-03` feature is on.
//!
//! With the feature off the arguments are still evaluated by reference so
//! that no "unused variable" warnings appear at call sites.

#![allow(unused_macros)]

macro_rules! trace {
    ($s:literal $(, $x:expr)* $(,)?) => {{
        #[cfg(feature = "defmt-03")]
        ::defmt::trace!($s $(, $x)*);
        #[cfg(not(feature = "defmt-03"))]
        let _ = ($( &$x, )*);
    }};
}

macro_rules! error {
    ($s:literal $(, $x:expr)* $(,)?) => {{
        #[cfg(feature = "defmt-03")]
        ::defmt::error!($s $(, $x)*);
        #[cfg(not(feature = "defmt-03"))]
        let _ = ($( &$x, )*);
    }};
}

macro_rules! debug {
    ($s:literal $(, $x:expr)* $(,)?) => {{
        #[cfg(feature = "defmt-03")]
        ::defmt::debug!($s $(, $x)*);
        #[cfg(not(feature = "defmt-03"))]
        let _ = ($( &$x, )*);
    }};
}
