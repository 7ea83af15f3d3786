use num_bigint::BigUint;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::config::SolverConfig;
use crate::control::SearchControl;
use crate::error::{ProblemError, SolveResult};
use crate::palindromic::{find_palindromic_prime, PalindromeSearchConfig};
use crate::primality::PrimalityOracle;
use crate::results::{BatchReport, ProblemResult, Response};
use crate::search::{
    find_goldbach_pair, find_interval_primes, find_mersenne_primes, find_pattern_prime,
    find_repunit_primes, perfect_number, SearchRange, DEFAULT_INTERVAL_PRIMES,
};

/// One query, tagged by `"problem"` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "problem", rename_all = "snake_case")]
pub enum ProblemRequest {
    PatternPrime {
        #[serde(default = "default_pattern_lower")]
        n_lower: u32,
        #[serde(default = "default_pattern_upper")]
        n_upper: u32,
    },
    RepunitPrimes {
        #[serde(rename = "N_lower", default = "default_repunit_lower")]
        n_lower: u32,
        #[serde(rename = "N_upper", default = "default_repunit_upper")]
        n_upper: u32,
    },
    MersennePrimes {
        #[serde(default = "default_mersenne_lower")]
        p_lower: u32,
        #[serde(default = "default_mersenne_upper")]
        p_upper: u32,
    },
    IntervalDensity {
        p1: u64,
        p2: u64,
        #[serde(default = "default_interval_primes")]
        max_primes: usize,
    },
    PalindromicPrime {
        #[serde(default = "default_min_digits")]
        min_digits: usize,
        /// Overrides the solver's digit ceiling for this request.
        #[serde(default)]
        max_digits: Option<usize>,
    },
    Goldbach {
        #[serde(default = "default_even_n")]
        even_n: u64,
    },
    PerfectNumber {
        #[serde(default = "default_perfect_p")]
        p: u32,
    },
    IsPrime {
        n: String,
    },
}

fn default_pattern_lower() -> u32 {
    1000
}

fn default_pattern_upper() -> u32 {
    3000
}

fn default_repunit_lower() -> u32 {
    2
}

fn default_repunit_upper() -> u32 {
    1040
}

fn default_mersenne_lower() -> u32 {
    2201
}

fn default_mersenne_upper() -> u32 {
    2299
}

fn default_interval_primes() -> usize {
    DEFAULT_INTERVAL_PRIMES
}

fn default_min_digits() -> usize {
    10
}

fn default_even_n() -> u64 {
    20
}

fn default_perfect_p() -> u32 {
    5
}

impl ProblemRequest {
    pub fn name(&self) -> &'static str {
        match self {
            ProblemRequest::PatternPrime { .. } => "pattern_prime",
            ProblemRequest::RepunitPrimes { .. } => "repunit_primes",
            ProblemRequest::MersennePrimes { .. } => "mersenne_primes",
            ProblemRequest::IntervalDensity { .. } => "interval_density",
            ProblemRequest::PalindromicPrime { .. } => "palindromic_prime",
            ProblemRequest::Goldbach { .. } => "goldbach",
            ProblemRequest::PerfectNumber { .. } => "perfect_number",
            ProblemRequest::IsPrime { .. } => "is_prime",
        }
    }
}

/// Runs requests on a dedicated worker pool.
///
/// Every request gets its own oracle and its own [`SearchControl`], so a long
/// search never holds anything another request needs.
pub struct Solver {
    config: SolverConfig,
    pool: rayon::ThreadPool,
}

impl Solver {
    pub fn new(config: SolverConfig) -> SolveResult<Self> {
        config.validate()?;

        let threads = config.threads.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        });
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("solver-{}", i))
            .build()
            .map_err(|e| ProblemError::ThreadPool(e.to_string()))?;

        tracing::debug!(threads, seed = ?config.seed, "solver pool ready");
        Ok(Solver { config, pool })
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Solve one request on the pool, honouring the configured timeout.
    pub fn solve(&self, request: &ProblemRequest) -> SolveResult<ProblemResult> {
        self.pool.install(|| self.solve_with_control(request, &self.control()))
    }

    /// Solve all requests concurrently; responses keep the request order.
    pub fn solve_batch(&self, requests: &[ProblemRequest]) -> BatchReport {
        let start = Instant::now();
        let responses: Vec<Response> = self.pool.install(|| {
            requests
                .par_iter()
                .map(|request| Response::from(self.solve_with_control(request, &self.control())))
                .collect()
        });

        BatchReport {
            generated_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            elapsed_secs: start.elapsed().as_secs_f64(),
            responses,
        }
    }

    /// Solve on the calling thread under a caller-owned control.
    pub fn solve_with_control(
        &self,
        request: &ProblemRequest,
        control: &SearchControl,
    ) -> SolveResult<ProblemResult> {
        let span = tracing::info_span!("solve", problem = request.name());
        let _guard = span.enter();
        let start = Instant::now();
        let mut oracle = self.oracle();

        let result = match request {
            ProblemRequest::PatternPrime { n_lower, n_upper } => {
                find_pattern_prime(&mut oracle, SearchRange::new(*n_lower, *n_upper), control)
                    .map(ProblemResult::PatternPrime)
            }
            ProblemRequest::RepunitPrimes { n_lower, n_upper } => {
                find_repunit_primes(&mut oracle, SearchRange::new(*n_lower, *n_upper), control)
                    .map(ProblemResult::RepunitPrimes)
            }
            ProblemRequest::MersennePrimes { p_lower, p_upper } => {
                find_mersenne_primes(&mut oracle, SearchRange::new(*p_lower, *p_upper), control)
                    .map(ProblemResult::MersennePrimes)
            }
            ProblemRequest::IntervalDensity { p1, p2, max_primes } => {
                find_interval_primes(&mut oracle, *p1, *p2, *max_primes, control)
                    .map(ProblemResult::IntervalDensity)
            }
            ProblemRequest::PalindromicPrime {
                min_digits,
                max_digits,
            } => {
                let search = PalindromeSearchConfig {
                    min_digits: *min_digits,
                    max_digits: max_digits.unwrap_or(self.config.max_palindrome_digits),
                    max_candidates: self.config.max_palindrome_candidates,
                    skip_even_tiers: true,
                };
                find_palindromic_prime(&mut oracle, &search, control)
                    .map(ProblemResult::PalindromicPrime)
            }
            ProblemRequest::Goldbach { even_n } => {
                find_goldbach_pair(&mut oracle, *even_n, control).map(ProblemResult::Goldbach)
            }
            ProblemRequest::PerfectNumber { p } => {
                perfect_number(&mut oracle, *p).map(ProblemResult::PerfectNumber)
            }
            ProblemRequest::IsPrime { n } => {
                let value: BigUint = n
                    .trim()
                    .parse()
                    .map_err(|_| ProblemError::invalid(format!("Invalid number '{}'", n)))?;
                Ok(ProblemResult::Primality {
                    is_prime: oracle.try_is_prime(&value)?,
                    n: value.to_string(),
                })
            }
        };

        match &result {
            Ok(_) => tracing::info!(elapsed_secs = start.elapsed().as_secs_f64(), "solved"),
            Err(e) => tracing::warn!(error = %e, "request failed"),
        }
        result
    }

    fn oracle(&self) -> PrimalityOracle {
        match self.config.seed {
            Some(seed) => PrimalityOracle::seeded(self.config.primality.clone(), seed),
            None => PrimalityOracle::from_entropy(self.config.primality.clone()),
        }
    }

    fn control(&self) -> SearchControl {
        match self.config.timeout() {
            Some(timeout) => SearchControl::with_timeout(timeout),
            None => SearchControl::unbounded(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primality::{PrimalityConfig, PrimalityMode};
    use serde_json::json;

    fn solver() -> Solver {
        Solver::new(SolverConfig {
            seed: Some(1),
            threads: Some(2),
            ..SolverConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_request_defaults() {
        let request: ProblemRequest = serde_json::from_value(json!({"problem": "pattern_prime"})).unwrap();
        assert_eq!(
            request,
            ProblemRequest::PatternPrime {
                n_lower: 1000,
                n_upper: 3000
            }
        );

        let request: ProblemRequest =
            serde_json::from_value(json!({"problem": "repunit_primes", "N_upper": 50})).unwrap();
        assert_eq!(
            request,
            ProblemRequest::RepunitPrimes {
                n_lower: 2,
                n_upper: 50
            }
        );
    }

    #[test]
    fn test_solve_goldbach() {
        let result = solver().solve(&ProblemRequest::Goldbach { even_n: 20 }).unwrap();
        assert_eq!(serde_json::to_value(&result).unwrap(), json!({"n": 20, "pair": [3, 17]}));
    }

    #[test]
    fn test_is_prime_request() {
        let solver = solver();
        let result = solver
            .solve(&ProblemRequest::IsPrime {
                n: "2305843009213693951".to_string(),
            })
            .unwrap();
        assert_eq!(
            result,
            ProblemResult::Primality {
                n: "2305843009213693951".to_string(),
                is_prime: true
            }
        );

        let bad = solver.solve(&ProblemRequest::IsPrime { n: "12x".to_string() });
        assert!(matches!(bad, Err(ProblemError::InvalidInput(_))));
    }

    #[test]
    fn test_batch_keeps_order_and_reports_errors() {
        let requests = vec![
            ProblemRequest::Goldbach { even_n: 3 },
            ProblemRequest::IntervalDensity {
                p1: 2,
                p2: 5,
                max_primes: 4,
            },
            ProblemRequest::PalindromicPrime {
                min_digits: 1,
                max_digits: None,
            },
        ];
        let report = solver().solve_batch(&requests);
        let values: Vec<serde_json::Value> = report
            .responses
            .iter()
            .map(|r| serde_json::to_value(r).unwrap())
            .collect();

        assert_eq!(values[0], json!({"error": "Input must be even > 2"}));
        assert_eq!(
            values[1],
            json!({"interval": ["4", "25"], "primes_found": ["5", "7", "11", "13"]})
        );
        assert_eq!(values[2], json!({"error": "Number of digits must be at least 2"}));
    }

    #[test]
    fn test_trial_division_mode_returns_instead_of_hanging() {
        let solver = Solver::new(SolverConfig {
            primality: PrimalityConfig {
                mode: PrimalityMode::TrialDivision,
                ..PrimalityConfig::default()
            },
            seed: Some(1),
            timeout_secs: Some(1),
            threads: Some(1),
            ..SolverConfig::default()
        })
        .unwrap();

        let mersenne_89 = solver.solve(&ProblemRequest::IsPrime {
            n: "618970019642690137449562111".to_string(),
        });
        assert!(matches!(mersenne_89, Err(ProblemError::InvalidInput(_))));

        let palindrome = solver.solve(&ProblemRequest::PalindromicPrime {
            min_digits: 31,
            max_digits: None,
        });
        assert!(matches!(palindrome, Err(ProblemError::InvalidInput(_))));

        let small = solver
            .solve(&ProblemRequest::PalindromicPrime {
                min_digits: 3,
                max_digits: None,
            })
            .unwrap();
        assert_eq!(serde_json::to_value(&small).unwrap()["palindromic_prime"], "101");
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = SolverConfig {
            threads: Some(0),
            ..SolverConfig::default()
        };
        assert!(Solver::new(config).is_err());
    }
}
