use std::collections::HashMap;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::error::PrimeError;

/// Returns the first `n` primes.
///
/// Every odd candidate from 3 upwards is divided by each prime found so far;
/// the divisor list is not cut off at the square root of the candidate.
pub fn generate(n: usize) -> Result<Vec<u64>, PrimeError> {
    let mut primes = reserve(n)?;
    if n == 0 {
        return Ok(primes);
    }

    primes.push(2);
    // Bumped before the first test, so 3 is checked first.
    let mut candidate: u64 = 1;
    while primes.len() < n {
        candidate += 2;
        if primes.iter().all(|divisor| candidate % divisor != 0) {
            primes.push(candidate);
        }
    }

    Ok(primes)
}

/// Returns the first `n` items of [`Sieve`]. Same output as [`generate`].
pub fn generate_sieve(n: usize) -> Result<Vec<u64>, PrimeError> {
    let mut primes = reserve(n)?;
    primes.extend(Sieve::new().take(n));
    Ok(primes)
}

fn reserve(n: usize) -> Result<Vec<u64>, PrimeError> {
    let mut primes = Vec::new();
    primes
        .try_reserve_exact(n)
        .map_err(|source| PrimeError::Allocation {
            requested: n,
            source,
        })?;
    Ok(primes)
}

const SEED: [u64; 4] = [2, 3, 5, 7];

/// Unbounded incremental sieve over the odd numbers.
///
/// `composites` maps the next odd composite that is known to be coming up to
/// its step (twice the prime that produced it). Multiples of a base prime only
/// enter the map once the scan reaches its square, and base primes come from
/// a nested sieve created the first time one is needed.
#[derive(Debug)]
pub struct Sieve {
    seeded: usize,
    candidate: u64,
    composites: HashMap<u64, u64>,
    base: Option<Box<Sieve>>,
    base_prime: u64,
    square: u64,
}

impl Sieve {
    pub fn new() -> Self {
        Self {
            seeded: 0,
            candidate: 9,
            composites: HashMap::new(),
            base: None,
            base_prime: 3,
            square: 9,
        }
    }

    fn next_prime(&mut self) -> u64 {
        if let Some(&prime) = SEED.get(self.seeded) {
            self.seeded += 1;
            return prime;
        }

        loop {
            let candidate = self.candidate;
            self.candidate += 2;

            let step = match self.composites.remove(&candidate) {
                Some(step) => step,
                None if candidate < self.square => return candidate,
                None => {
                    // candidate == base_prime², the first odd multiple worth tracking
                    let step = 2 * self.base_prime;
                    self.advance_base();
                    step
                }
            };

            let mut multiple = candidate + step;
            while self.composites.contains_key(&multiple) {
                multiple += step;
            }
            self.composites.insert(multiple, step);
        }
    }

    fn advance_base(&mut self) {
        let base = self.base.get_or_insert_with(|| {
            let mut base = Sieve::new();
            // 2 is never a base prime and 3 is already in use.
            base.next_prime();
            base.next_prime();
            Box::new(base)
        });
        self.base_prime = base.next_prime();
        self.square = self.base_prime * self.base_prime;
    }
}

impl Default for Sieve {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for Sieve {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        Some(self.next_prime())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Method {
    #[default]
    #[serde(rename = "trial")]
    TrialDivision,
    #[serde(rename = "sieve")]
    Sieve,
}

impl Method {
    pub const ALL: [Method; 2] = [Method::TrialDivision, Method::Sieve];

    pub fn generate(self, n: usize) -> Result<Vec<u64>, PrimeError> {
        match self {
            Method::TrialDivision => generate(n),
            Method::Sieve => generate_sieve(n),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Method::TrialDivision => "Trial division",
            Method::Sieve => "Incremental sieve",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MethodTiming {
    pub method: Method,
    pub label: &'static str,
    pub seconds: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Comparison {
    pub count: usize,
    /// Trials actually run per method, never below one.
    pub trials: u32,
    pub results: Vec<MethodTiming>,
}

/// Times `trials` runs of every [`Method`] for the first `count` primes.
///
/// Fails with [`PrimeError::Disagreement`] if any method's answer differs
/// from the first method's.
pub fn compare_methods(count: usize, trials: u32) -> Result<Comparison, PrimeError> {
    let trials = trials.max(1);
    let mut reference: Option<(Method, Vec<u64>)> = None;
    let mut timings = Vec::with_capacity(Method::ALL.len());

    for method in Method::ALL {
        let started = Instant::now();
        let mut answer = Vec::new();
        for _ in 0..trials {
            answer = method.generate(count)?;
        }
        let seconds = started.elapsed().as_secs_f64();

        match &reference {
            Some((first, expected)) if *expected != answer => {
                return Err(PrimeError::Disagreement {
                    first: first.label(),
                    second: method.label(),
                    count,
                });
            }
            Some(_) => {}
            None => reference = Some((method, answer)),
        }

        timings.push(MethodTiming {
            method,
            label: method.label(),
            seconds,
        });
    }

    Ok(Comparison {
        count,
        trials,
        results: timings,
    })
}
