use num_bigint::BigUint;

use crate::control::SearchControl;
use crate::error::{ProblemError, SolveResult};
use crate::generators::{mersenne_number, pattern_number, repunit};
use crate::primality::{PrimalityOracle, WitnessSource};
use crate::results::{
    GoldbachResult, IntervalDensityResult, MersenneHit, PatternPrimeResult, PerfectNumberResult,
    RepunitHit,
};

/// Default number of primes collected by the interval-density search.
pub const DEFAULT_INTERVAL_PRIMES: usize = 4;

/// Closed parameter range `[low, high]`, walked in ascending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchRange {
    pub low: u32,
    pub high: u32,
}

impl SearchRange {
    pub fn new(low: u32, high: u32) -> Self {
        SearchRange { low, high }
    }
}

/// First `n` in the range whose pattern number `12..n..21` is prime.
///
/// Exhausting the range is not an error: the result is the explicit
/// "not found" shape.
///
/// # Arguments
///
/// * `oracle` - Primality oracle; seed it for reproducible answers
/// * `range` - `[n_lower, n_upper]`, walked upwards; `n_lower` must be at least 1
/// * `control` - Cancellation flag and deadline, checked before every candidate
///
/// # Returns
///
/// A `PatternPrimeResult` with `n` and the decimal pattern number on a hit,
/// or all-`None` with `is_prime: false` when the range holds none.
///
/// # Examples
///
/// ```
/// use prime_problems::{find_pattern_prime, PrimalityConfig, PrimalityOracle, SearchControl, SearchRange};
///
/// let mut oracle = PrimalityOracle::seeded(PrimalityConfig::default(), 42);
/// let control = SearchControl::unbounded();
///
/// // 1, 121, 12321, ... 12345678987654321 are all squares of repunits
/// let result = find_pattern_prime(&mut oracle, SearchRange::new(1, 9), &control).unwrap();
/// assert!(!result.is_prime);
/// assert_eq!(result.n, None);
/// ```
pub fn find_pattern_prime<W: WitnessSource>(
    oracle: &mut PrimalityOracle<W>,
    range: SearchRange,
    control: &SearchControl,
) -> SolveResult<PatternPrimeResult> {
    if range.low == 0 {
        return Err(ProblemError::invalid("n_lower must be at least 1"));
    }

    let mut tested = 0u64;
    for n in range.low..=range.high {
        control.checkpoint(tested)?;
        let candidate = pattern_number(n);
        tested += 1;

        if oracle.try_is_prime(&candidate)? {
            tracing::info!(n, tested, "pattern prime found");
            return Ok(PatternPrimeResult::found(n, &candidate));
        }
    }

    tracing::info!(tested, "no pattern prime in range");
    Ok(PatternPrimeResult::not_found())
}

/// Every `N` in the range with both `N` and the repunit `R_N` prime.
pub fn find_repunit_primes<W: WitnessSource>(
    oracle: &mut PrimalityOracle<W>,
    range: SearchRange,
    control: &SearchControl,
) -> SolveResult<Vec<RepunitHit>> {
    let mut hits = Vec::new();
    let mut tested = 0u64;

    for n in range.low..=range.high {
        control.checkpoint(tested)?;
        tested += 1;
        if !oracle.try_is_prime_u64(u64::from(n))? {
            continue;
        }

        let candidate = repunit(n);
        if oracle.try_is_prime(&candidate)? {
            tracing::debug!(n, "repunit prime found");
            hits.push(RepunitHit {
                n,
                repunit: candidate.to_string(),
            });
        }
    }

    tracing::info!(tested, found = hits.len(), "repunit search complete");
    Ok(hits)
}

/// Every odd prime `p` in the range with `2^p - 1` prime.
///
/// An even lower bound is moved up to the next odd number, so `p = 2` is
/// never reported.
pub fn find_mersenne_primes<W: WitnessSource>(
    oracle: &mut PrimalityOracle<W>,
    range: SearchRange,
    control: &SearchControl,
) -> SolveResult<Vec<MersenneHit>> {
    let mut hits = Vec::new();
    let mut tested = 0u64;
    let start = u64::from(range.low) | 1;

    for p in (start..=u64::from(range.high)).step_by(2) {
        control.checkpoint(tested)?;
        tested += 1;
        if !oracle.try_is_prime_u64(p)? {
            continue;
        }

        // p <= u32::MAX since it came from the range
        let p = p as u32;
        let candidate = mersenne_number(p);
        if oracle.try_is_prime(&candidate)? {
            tracing::debug!(p, "mersenne prime found");
            hits.push(MersenneHit {
                p,
                mersenne_prime: candidate.to_string(),
            });
        }
    }

    tracing::info!(tested, found = hits.len(), "mersenne search complete");
    Ok(hits)
}

/// The first `max_primes` primes strictly between `p1^2` and `p2^2`.
///
/// Fewer are returned when the interval runs out first, including an empty
/// list for `p1 >= p2`.
pub fn find_interval_primes<W: WitnessSource>(
    oracle: &mut PrimalityOracle<W>,
    p1: u64,
    p2: u64,
    max_primes: usize,
    control: &SearchControl,
) -> SolveResult<IntervalDensityResult> {
    if max_primes == 0 {
        return Err(ProblemError::invalid("max_primes must be at least 1"));
    }

    let lower = BigUint::from(p1) * p1;
    let upper = BigUint::from(p2) * p2;
    let mut primes_found = Vec::new();
    let mut tested = 0u64;
    let mut candidate = &lower + 1u32;

    while candidate < upper && primes_found.len() < max_primes {
        control.checkpoint(tested)?;
        tested += 1;
        if oracle.try_is_prime(&candidate)? {
            primes_found.push(candidate.to_string());
        }
        candidate += 1u32;
    }

    tracing::info!(tested, found = primes_found.len(), "interval search complete");
    Ok(IntervalDensityResult {
        interval: (lower.to_string(), upper.to_string()),
        primes_found,
    })
}

/// The first pair `(i, n - i)` of primes, ascending in `i`, summing to `even_n`.
pub fn find_goldbach_pair<W: WitnessSource>(
    oracle: &mut PrimalityOracle<W>,
    even_n: u64,
    control: &SearchControl,
) -> SolveResult<GoldbachResult> {
    if even_n % 2 != 0 || even_n <= 2 {
        return Err(ProblemError::invalid("Input must be even > 2"));
    }

    let mut tested = 0u64;
    for i in 2..even_n {
        control.checkpoint(tested)?;
        tested += 1;
        if oracle.try_is_prime_u64(i)? && oracle.try_is_prime_u64(even_n - i)? {
            tracing::info!(n = even_n, low = i, high = even_n - i, "goldbach pair found");
            return Ok(GoldbachResult {
                n: even_n,
                pair: Some((i, even_n - i)),
            });
        }
    }

    tracing::warn!(n = even_n, "no goldbach pair found");
    Ok(GoldbachResult {
        n: even_n,
        pair: None,
    })
}

/// The even perfect number `2^(p-1) * (2^p - 1)`, when `2^p - 1` is prime.
pub fn perfect_number<W: WitnessSource>(
    oracle: &mut PrimalityOracle<W>,
    p: u32,
) -> SolveResult<PerfectNumberResult> {
    if p == 0 {
        return Err(ProblemError::invalid("p must be at least 1"));
    }

    let mersenne = mersenne_number(p);
    let perfect_number = if oracle.try_is_prime(&mersenne)? {
        Some((mersenne << (p - 1)).to_string())
    } else {
        None
    };

    Ok(PerfectNumberResult { p, perfect_number })
}
