// src/debug/printers.rs

//! Error and warning print macros.
//!
//! The `e_` macros always print to stderr, prefixed with the program name
//! so they stand apart from the printed log on a shared terminal. The `de_`
//! macros print only in debug and test builds.

/// Prefix of every message printed to stderr.
pub const STDERR_PREFIX: &str = "vlp: ";

/// `e`println! an `err`or
#[macro_export]
macro_rules! e_err {
    (
        $($args:tt)*
    ) => {
        {
            eprint!("{}ERROR: ", $crate::debug::printers::STDERR_PREFIX);
            eprintln!($($args)*)
        }
    }
}
pub use e_err;

/// `e`println! a `w`a`rn`ing
#[macro_export]
macro_rules! e_wrn {
    (
        $($args:tt)*
    ) => {
        {
            eprint!("{}WARNING: ", $crate::debug::printers::STDERR_PREFIX);
            eprintln!($($args)*)
        }
    }
}
pub use e_wrn;

/// `d`ebug `e`println! an `err`or
#[macro_export]
macro_rules! de_err {
    (
        $($args:tt)*
    ) => {
        {
            #[cfg(any(debug_assertions, test))]
            $crate::e_err!($($args)*);
        }
    }
}
pub use de_err;

/// `d`ebug `e`println! a `w`a`rn`ing
#[macro_export]
macro_rules! de_wrn {
    (
        $($args:tt)*
    ) => {
        {
            #[cfg(any(debug_assertions, test))]
            $crate::e_wrn!($($args)*);
        }
    }
}
pub use de_wrn;
