use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::{ProblemError, SolveResult};
use crate::palindromic::DEFAULT_MAX_DIGITS;
use crate::primality::PrimalityConfig;

/// Settings shared by every request a [`crate::Solver`] handles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverConfig {
    #[serde(default)]
    pub primality: PrimalityConfig,
    /// Seeds every request's witness stream; `None` draws from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_max_palindrome_digits")]
    pub max_palindrome_digits: usize,
    #[serde(default)]
    pub max_palindrome_candidates: Option<u64>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// Worker threads; `None` uses every available core.
    #[serde(default)]
    pub threads: Option<usize>,
}

fn default_max_palindrome_digits() -> usize {
    DEFAULT_MAX_DIGITS
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            primality: PrimalityConfig::default(),
            seed: None,
            max_palindrome_digits: DEFAULT_MAX_DIGITS,
            max_palindrome_candidates: None,
            timeout_secs: None,
            threads: None,
        }
    }
}

impl SolverConfig {
    pub fn load_from_file(path: &Path) -> SolveResult<Self> {
        let config: SolverConfig = crate::io_utils::load_json(path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &Path) -> SolveResult<()> {
        crate::io_utils::save_json(self, path)
    }

    pub fn validate(&self) -> SolveResult<()> {
        if self.primality.rounds == 0 {
            return Err(ProblemError::Config("primality.rounds must be at least 1".into()));
        }
        if self.threads == Some(0) {
            return Err(ProblemError::Config("threads must be at least 1".into()));
        }
        if self.max_palindrome_digits < 2 {
            return Err(ProblemError::Config(
                "max_palindrome_digits must be at least 2".into(),
            ));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
