//! Result shapes, one per query.
//!
//! Integers that can outgrow a machine word are carried as decimal strings so
//! they survive JSON encoding without precision loss.

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::error::ProblemError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternPrimeResult {
    pub n: Option<u32>,
    pub pattern_number: Option<String>,
    pub is_prime: bool,
}

impl PatternPrimeResult {
    pub fn found(n: u32, pattern_number: &BigUint) -> Self {
        PatternPrimeResult {
            n: Some(n),
            pattern_number: Some(pattern_number.to_string()),
            is_prime: true,
        }
    }

    pub fn not_found() -> Self {
        PatternPrimeResult {
            n: None,
            pattern_number: None,
            is_prime: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepunitHit {
    #[serde(rename = "N")]
    pub n: u32,
    pub repunit: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MersenneHit {
    pub p: u32,
    pub mersenne_prime: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalDensityResult {
    /// Exclusive bounds `(p1^2, p2^2)`.
    pub interval: (String, String),
    pub primes_found: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PalindromicPrimeResult {
    pub palindromic_prime: String,
    pub digits: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoldbachResult {
    pub n: u64,
    pub pair: Option<(u64, u64)>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerfectNumberResult {
    pub p: u32,
    pub perfect_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ProblemResult {
    PatternPrime(PatternPrimeResult),
    RepunitPrimes(Vec<RepunitHit>),
    MersennePrimes(Vec<MersenneHit>),
    IntervalDensity(IntervalDensityResult),
    PalindromicPrime(PalindromicPrimeResult),
    Goldbach(GoldbachResult),
    PerfectNumber(PerfectNumberResult),
    Primality { n: String, is_prime: bool },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub error: String,
}

impl From<&ProblemError> for ErrorReport {
    fn from(err: &ProblemError) -> Self {
        ErrorReport {
            error: err.to_string(),
        }
    }
}

/// What a request produced: its result, or the structured `{"error": ...}` shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Solved(ProblemResult),
    Failed(ErrorReport),
}

impl From<Result<ProblemResult, ProblemError>> for Response {
    fn from(result: Result<ProblemResult, ProblemError>) -> Self {
        match result {
            Ok(solved) => Response::Solved(solved),
            Err(err) => Response::Failed(ErrorReport::from(&err)),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub generated_at: String,
    pub elapsed_secs: f64,
    pub responses: Vec<Response>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_repunit_hit_uses_capital_n() {
        let hit = RepunitHit {
            n: 2,
            repunit: "11".to_string(),
        };
        assert_eq!(serde_json::to_value(&hit).unwrap(), json!({"N": 2, "repunit": "11"}));
    }

    #[test]
    fn test_results_serialize_in_their_own_shape() {
        let goldbach = ProblemResult::Goldbach(GoldbachResult {
            n: 20,
            pair: Some((3, 17)),
        });
        assert_eq!(
            serde_json::to_value(&goldbach).unwrap(),
            json!({"n": 20, "pair": [3, 17]})
        );

        let none = ProblemResult::PatternPrime(PatternPrimeResult::not_found());
        assert_eq!(
            serde_json::to_value(&none).unwrap(),
            json!({"n": null, "pattern_number": null, "is_prime": false})
        );

        let empty = ProblemResult::MersennePrimes(Vec::new());
        assert_eq!(serde_json::to_value(&empty).unwrap(), json!([]));
    }

    #[test]
    fn test_error_response_shape() {
        let response = Response::from(Err(ProblemError::invalid("Input must be even > 2")));
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"error": "Input must be even > 2"})
        );
    }
}
