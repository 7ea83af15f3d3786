//! Palindromic prime search with explicit digit-tier escalation.
//!
//! Candidates are walked tier by tier: every palindrome of `d` digits in
//! ascending order, then `d + 1` digits, and so on. The walk always stops at
//! `max_digits`, so a request can never run forever.

use crate::control::SearchControl;
use crate::error::{ProblemError, SolveResult};
use crate::generators::PalindromeTier;
use crate::primality::{PrimalityOracle, WitnessSource};
use crate::results::PalindromicPrimeResult;

pub const DEFAULT_MAX_DIGITS: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PalindromeSearchConfig {
    pub min_digits: usize,
    pub max_digits: usize,
    pub max_candidates: Option<u64>,
    /// Even tiers above two digits hold only multiples of 11.
    pub skip_even_tiers: bool,
}

impl PalindromeSearchConfig {
    pub fn new(min_digits: usize, max_digits: usize) -> Self {
        PalindromeSearchConfig {
            min_digits,
            max_digits,
            max_candidates: None,
            skip_even_tiers: true,
        }
    }

    pub fn validate(&self) -> SolveResult<()> {
        if self.min_digits < 2 {
            return Err(ProblemError::invalid("Number of digits must be at least 2"));
        }
        if self.max_digits < self.min_digits {
            return Err(ProblemError::invalid(format!(
                "max_digits ({}) must not be below min_digits ({})",
                self.max_digits, self.min_digits
            )));
        }
        Ok(())
    }
}

enum SearchState {
    SearchingTier(PalindromeTier),
    EscalateTier { digits: usize },
    BoundedFailure,
}

/// Smallest palindromic prime with at least `min_digits` digits, looking no
/// further than `max_digits`.
///
/// # Arguments
///
/// * `oracle` - Primality oracle used for every candidate
/// * `config` - PalindromeSearchConfig containing:
///   - `min_digits`: First tier searched (at least 2)
///   - `max_digits`: Last tier searched before giving up
///   - `max_candidates`: Optional cap on candidates tested
///   - `skip_even_tiers`: Pass over even digit counts above 2
/// * `control` - Cancellation flag and deadline, checked before every candidate
///
/// # Returns
///
/// The prime and its digit count, or `BoundExceeded`,
/// `CandidateBudgetExceeded` or `Cancelled` when the search stops early.
///
/// # Examples
///
/// ```
/// use prime_problems::{
///     find_palindromic_prime, PalindromeSearchConfig, PrimalityConfig, PrimalityOracle,
///     SearchControl,
/// };
///
/// let mut oracle = PrimalityOracle::seeded(PrimalityConfig::default(), 42);
/// let config = PalindromeSearchConfig::new(5, 9);
///
/// let result = find_palindromic_prime(&mut oracle, &config, &SearchControl::unbounded()).unwrap();
/// assert_eq!(result.palindromic_prime, "10301");
/// assert_eq!(result.digits, 5);
/// ```
pub fn find_palindromic_prime<W: WitnessSource>(
    oracle: &mut PrimalityOracle<W>,
    config: &PalindromeSearchConfig,
    control: &SearchControl,
) -> SolveResult<PalindromicPrimeResult> {
    config.validate()?;

    let mut tested = 0u64;
    let mut state = SearchState::EscalateTier {
        digits: config.min_digits,
    };

    loop {
        state = match state {
            SearchState::EscalateTier { digits } => {
                if digits > config.max_digits {
                    SearchState::BoundedFailure
                } else if config.skip_even_tiers && digits > 2 && digits % 2 == 0 {
                    tracing::debug!(digits, "skipping even tier");
                    SearchState::EscalateTier { digits: digits + 1 }
                } else {
                    tracing::debug!(digits, tested, "searching palindrome tier");
                    SearchState::SearchingTier(PalindromeTier::new(digits).skip_composite_ends())
                }
            }
            SearchState::SearchingTier(mut tier) => match tier.next() {
                None => {
                    tracing::debug!(
                        digits = tier.digits(),
                        candidates = tier.generated_count(),
                        "tier exhausted"
                    );
                    SearchState::EscalateTier {
                        digits: tier.digits() + 1,
                    }
                }
                Some(candidate) => {
                    control.checkpoint(tested)?;
                    if let Some(max_candidates) = config.max_candidates {
                        if tested >= max_candidates {
                            tracing::warn!(max_candidates, "palindrome candidate budget spent");
                            return Err(ProblemError::CandidateBudgetExceeded { max_candidates });
                        }
                    }
                    tested += 1;

                    if oracle.try_is_prime(&candidate)? {
                        let palindromic_prime = candidate.to_string();
                        tracing::info!(digits = tier.digits(), tested, "palindromic prime found");
                        return Ok(PalindromicPrimeResult {
                            digits: palindromic_prime.len(),
                            palindromic_prime,
                        });
                    }
                    SearchState::SearchingTier(tier)
                }
            },
            SearchState::BoundedFailure => {
                tracing::warn!(max_digits = config.max_digits, tested, "palindrome digit ceiling reached");
                return Err(ProblemError::BoundExceeded {
                    max_digits: config.max_digits,
                    tested,
                });
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primality::PrimalityConfig;

    fn search(config: PalindromeSearchConfig) -> SolveResult<PalindromicPrimeResult> {
        let mut oracle = PrimalityOracle::seeded(PrimalityConfig::default(), 5);
        find_palindromic_prime(&mut oracle, &config, &SearchControl::unbounded())
    }

    #[test]
    fn test_smallest_palindromic_primes_by_digits() {
        assert_eq!(search(PalindromeSearchConfig::new(2, 10)).unwrap().palindromic_prime, "11");
        assert_eq!(search(PalindromeSearchConfig::new(3, 10)).unwrap().palindromic_prime, "101");

        let five = search(PalindromeSearchConfig::new(4, 10)).unwrap();
        assert_eq!(five.palindromic_prime, "10301");
        assert_eq!(five.digits, 5);

        assert_eq!(search(PalindromeSearchConfig::new(7, 10)).unwrap().palindromic_prime, "1003001");
    }

    #[test]
    fn test_rejects_fewer_than_two_digits() {
        let result = search(PalindromeSearchConfig::new(1, 10));
        assert!(matches!(result, Err(ProblemError::InvalidInput(_))));
    }

    #[test]
    fn test_digit_ceiling_is_bounded_failure() {
        for skip_even_tiers in [true, false] {
            let config = PalindromeSearchConfig {
                skip_even_tiers,
                ..PalindromeSearchConfig::new(4, 4)
            };
            assert!(matches!(search(config), Err(ProblemError::BoundExceeded { max_digits: 4, .. })));
        }
    }

    #[test]
    fn test_candidate_budget() {
        let config = PalindromeSearchConfig {
            max_candidates: Some(5),
            skip_even_tiers: false,
            ..PalindromeSearchConfig::new(4, 6)
        };
        assert!(matches!(
            search(config),
            Err(ProblemError::CandidateBudgetExceeded { max_candidates: 5 })
        ));
    }

    #[test]
    fn test_cancellation_stops_search() {
        let mut oracle = PrimalityOracle::seeded(PrimalityConfig::default(), 5);
        let control = SearchControl::unbounded();
        control.cancel();
        let result = find_palindromic_prime(&mut oracle, &PalindromeSearchConfig::new(2, 10), &control);
        assert!(matches!(result, Err(ProblemError::Cancelled { .. })));
    }
}
