//! Thread-safety bounds.
//!
//! By default every shared type is `Send + Sync`. With the `not-send`
//! feature the same names resolve to single-threaded equivalents
//! (`Rc`, `RefCell`, unsync `OnceCell`, non-`Send` futures).

#[cfg(not(feature = "not-send"))]
mod send;

#[cfg(not(feature = "not-send"))]
pub use send::*;

#[cfg(feature = "not-send")]
mod not_send;

#[cfg(feature = "not-send")]
pub use not_send::*;
