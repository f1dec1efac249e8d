//! Generates the first N prime numbers.
//!
//! The same two generators are reachable from Python (the `CPrimes` extension
//! module, behind the `python` feature), from any C-ABI host through [`ffi`],
//! and over HTTP through [`api`].

pub mod api;
pub mod config;
pub mod error;
pub mod ffi;
pub mod primes;
#[cfg(feature = "python")]
mod python;

pub use error::PrimeError;
pub use primes::{
    compare_methods, generate, generate_sieve, Comparison, Method, MethodTiming, Sieve,
};

/// Exported to hosts as `__version__`.
pub const VERSION: &str = "1.1";

/// Exported to hosts as `string`.
pub const GREETING: &str = "Hello my old friend.";
