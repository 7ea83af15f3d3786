use num_bigint::{BigUint, RandBigInt};
use num_traits::{One, ToPrimitive, Zero};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{ProblemError, SolveResult};

/// Numbers below this are decided by trial division in `Auto` mode.
pub const DEFAULT_TRIAL_DIVISION_LIMIT: u64 = 1_000_000_000_000;

/// Miller-Rabin rounds; false-positive probability is at most 4^-rounds.
pub const DEFAULT_ROUNDS: u32 = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimalityMode {
    /// Trial division below `trial_division_limit`, Miller-Rabin above it.
    #[default]
    Auto,
    /// Always trial division. Exact, but only practical for small inputs.
    TrialDivision,
    /// Always Miller-Rabin, whatever the magnitude.
    MillerRabin,
}

impl std::str::FromStr for PrimalityMode {
    type Err = ProblemError;

    /// Accepts the config-file names (`trial_division`) as well as dashed
    /// and short forms (`trial-division`, `trial`, `mr`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "auto" => Ok(PrimalityMode::Auto),
            "trial" | "trial_division" => Ok(PrimalityMode::TrialDivision),
            "mr" | "miller_rabin" => Ok(PrimalityMode::MillerRabin),
            other => Err(ProblemError::Config(format!("unknown primality mode '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimalityConfig {
    #[serde(default)]
    pub mode: PrimalityMode,
    #[serde(default = "default_trial_division_limit")]
    pub trial_division_limit: u64,
    #[serde(default = "default_rounds")]
    pub rounds: u32,
}

fn default_trial_division_limit() -> u64 {
    DEFAULT_TRIAL_DIVISION_LIMIT
}

fn default_rounds() -> u32 {
    DEFAULT_ROUNDS
}

impl Default for PrimalityConfig {
    fn default() -> Self {
        PrimalityConfig {
            mode: PrimalityMode::Auto,
            trial_division_limit: DEFAULT_TRIAL_DIVISION_LIMIT,
            rounds: DEFAULT_ROUNDS,
        }
    }
}

/// Supplies the bases used by the Miller-Rabin rounds.
pub trait WitnessSource {
    /// Next witness for the odd candidate `n >= 5`, in `[2, n - 2]`.
    fn next_witness(&mut self, n: &BigUint) -> BigUint;
}

/// Uniformly random witnesses drawn from any `rand` generator.
#[derive(Debug, Clone)]
pub struct RandomWitnesses<R: Rng> {
    rng: R,
}

impl<R: Rng> RandomWitnesses<R> {
    pub fn new(rng: R) -> Self {
        RandomWitnesses { rng }
    }
}

impl RandomWitnesses<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        RandomWitnesses::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        RandomWitnesses::new(StdRng::from_entropy())
    }
}

impl<R: Rng> WitnessSource for RandomWitnesses<R> {
    fn next_witness(&mut self, n: &BigUint) -> BigUint {
        let low = BigUint::from(2u32);
        let high = n - 1u32;
        self.rng.gen_biguint_range(&low, &high)
    }
}

/// A pinned, cycling witness sequence.
///
/// Values outside `[2, n - 2]` are folded back into that range, so the same
/// sequence can be reused against candidates of any size.
#[derive(Debug, Clone)]
pub struct FixedWitnesses {
    witnesses: Vec<BigUint>,
    position: usize,
}

impl FixedWitnesses {
    pub fn new<I, T>(witnesses: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<BigUint>,
    {
        let mut witnesses: Vec<BigUint> = witnesses.into_iter().map(Into::into).collect();
        if witnesses.is_empty() {
            witnesses.push(BigUint::from(2u32));
        }
        FixedWitnesses {
            witnesses,
            position: 0,
        }
    }
}

impl WitnessSource for FixedWitnesses {
    fn next_witness(&mut self, n: &BigUint) -> BigUint {
        let raw = &self.witnesses[self.position % self.witnesses.len()];
        self.position += 1;

        let two = BigUint::from(2u32);
        if raw >= &two && raw <= &(n - 2u32) {
            raw.clone()
        } else {
            two + raw % (n - 3u32)
        }
    }
}

/// Decides primality, choosing trial division or Miller-Rabin per its config.
///
/// Each search invocation owns its oracle, so the witness stream is never
/// shared between concurrent requests.
#[derive(Debug, Clone)]
pub struct PrimalityOracle<W: WitnessSource = RandomWitnesses<StdRng>> {
    config: PrimalityConfig,
    witnesses: W,
}

impl PrimalityOracle<RandomWitnesses<StdRng>> {
    pub fn seeded(config: PrimalityConfig, seed: u64) -> Self {
        PrimalityOracle::new(config, RandomWitnesses::seeded(seed))
    }

    pub fn from_entropy(config: PrimalityConfig) -> Self {
        PrimalityOracle::new(config, RandomWitnesses::from_entropy())
    }
}

impl<W: WitnessSource> PrimalityOracle<W> {
    pub fn new(config: PrimalityConfig, witnesses: W) -> Self {
        PrimalityOracle { config, witnesses }
    }

    pub fn config(&self) -> &PrimalityConfig {
        &self.config
    }

    pub fn is_prime(&mut self, n: &BigUint) -> bool {
        if let Some(small) = n.to_u64() {
            if small < 2 {
                return false;
            }
            if small == 2 || small == 3 {
                return true;
            }
        }
        if !n.bit(0) {
            return false;
        }

        match self.config.mode {
            PrimalityMode::TrialDivision => trial_division(n),
            PrimalityMode::MillerRabin => self.miller_rabin(n),
            PrimalityMode::Auto => {
                if n < &BigUint::from(self.config.trial_division_limit) {
                    trial_division(n)
                } else {
                    self.miller_rabin(n)
                }
            }
        }
    }

    pub fn is_prime_u64(&mut self, n: u64) -> bool {
        self.is_prime(&BigUint::from(n))
    }

    /// Like [`is_prime`](Self::is_prime), but refuses candidates at or above
    /// `trial_division_limit` in `TrialDivision` mode, where a single division
    /// loop could outlive any timeout. Searches go through this.
    pub fn try_is_prime(&mut self, n: &BigUint) -> SolveResult<bool> {
        if self.config.mode == PrimalityMode::TrialDivision
            && n >= &BigUint::from(self.config.trial_division_limit)
        {
            return Err(ProblemError::invalid(format!(
                "{}-digit candidate is beyond the trial division limit {}; use auto or miller_rabin mode",
                n.to_string().len(),
                self.config.trial_division_limit
            )));
        }
        Ok(self.is_prime(n))
    }

    pub fn try_is_prime_u64(&mut self, n: u64) -> SolveResult<bool> {
        self.try_is_prime(&BigUint::from(n))
    }

    /// Strong probable-prime test over `rounds` witnesses. `n` is odd and `>= 5`.
    fn miller_rabin(&mut self, n: &BigUint) -> bool {
        let n_minus_one = n - 1u32;
        let r = n_minus_one.trailing_zeros().unwrap_or(0);
        let d = &n_minus_one >> r;

        'rounds: for _ in 0..self.config.rounds {
            let a = self.witnesses.next_witness(n);
            let mut x = a.modpow(&d, n);
            if x.is_one() || x == n_minus_one {
                continue;
            }
            for _ in 1..r {
                x = (&x * &x) % n;
                if x == n_minus_one {
                    continue 'rounds;
                }
            }
            tracing::trace!(digits = n.bits(), "miller-rabin found a composite witness");
            return false;
        }
        true
    }
}

/// Exhaustive odd-divisor trial division up to the square root. `n` is odd and `>= 5`.
fn trial_division(n: &BigUint) -> bool {
    match n.to_u64() {
        Some(small) => trial_division_u64(small),
        None => {
            let limit = n.sqrt();
            let mut divisor = BigUint::from(3u32);
            while divisor <= limit {
                if (n % &divisor).is_zero() {
                    return false;
                }
                divisor += 2u32;
            }
            true
        }
    }
}

fn trial_division_u64(n: u64) -> bool {
    let mut divisor = 3u64;
    while divisor <= n / divisor {
        if n % divisor == 0 {
            return false;
        }
        divisor += 2;
    }
    true
}
