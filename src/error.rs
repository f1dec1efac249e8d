use std::collections::TryReserveError;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrimeError {
    #[error("Cannot allocate storage for {requested} primes: {source}")]
    Allocation {
        requested: usize,
        source: TryReserveError,
    },

    #[error("Requested {requested} primes but at most {max} are served")]
    LimitExceeded { requested: usize, max: usize },

    #[error("Requested {requested} trials but at most {max} are run")]
    TrialLimitExceeded { requested: u32, max: u32 },

    #[error("{first} and {second} disagree on the first {count} primes")]
    Disagreement {
        first: &'static str,
        second: &'static str,
        count: usize,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
