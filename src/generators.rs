use num_bigint::BigUint;
use num_traits::{One, ToPrimitive};

use crate::error::{ProblemError, SolveResult};

/// Concatenation of `1, 2, ..., n` followed by `n-1, ..., 1`, read as one decimal number.
///
/// `pattern_number(3)` is `12321`; multi-digit terms are written out in full,
/// so `pattern_number(11)` starts `1234567891011` and ends `10987654321`.
pub fn pattern_number(n: u32) -> BigUint {
    let mut digits = String::new();
    for i in 1..=n {
        digits.push_str(&i.to_string());
    }
    for i in (1..n).rev() {
        digits.push_str(&i.to_string());
    }
    // Only ASCII digits were pushed; the empty string (n = 0) maps to zero.
    BigUint::parse_bytes(digits.as_bytes(), 10).unwrap_or_default()
}

/// `(10^n - 1) / 9`, the number written with `n` ones.
pub fn repunit(n: u32) -> BigUint {
    (BigUint::from(10u32).pow(n) - BigUint::one()) / 9u32
}

/// `2^p - 1`
pub fn mersenne_number(p: u32) -> BigUint {
    (BigUint::one() << p) - 1u32
}

/// Build a palindrome from the decimal digits of its first half.
///
/// With `odd_length` the last digit of `half` is the centre and is not repeated:
/// `"123"` gives `12321`, while the even form of `"12"` gives `1221`.
pub fn palindrome_from_half(half: &str, odd_length: bool) -> SolveResult<BigUint> {
    if half.is_empty() || !half.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ProblemError::invalid(format!(
            "palindrome half must be decimal digits, got '{}'",
            half
        )));
    }
    if half.len() > 1 && half.starts_with('0') {
        return Err(ProblemError::invalid(format!(
            "palindrome half must not start with 0, got '{}'",
            half
        )));
    }

    let digits: Vec<u8> = half.bytes().map(|b| b - b'0').collect();
    from_digits(&mirror(&digits, odd_length))
        .ok_or_else(|| ProblemError::invalid(format!("cannot mirror '{}'", half)))
}

fn mirror(half: &[u8], odd_length: bool) -> Vec<u8> {
    let mirrored = if odd_length {
        half.len().saturating_sub(1)
    } else {
        half.len()
    };
    let mut digits = Vec::with_capacity(half.len() + mirrored);
    digits.extend_from_slice(half);
    digits.extend(half[..mirrored].iter().rev());
    digits
}

fn from_digits(digits: &[u8]) -> Option<BigUint> {
    BigUint::from_radix_be(digits, 10)
}

/// Every palindrome with exactly `digits` decimal digits, in ascending order.
///
/// A tier is enumerated through its half: `ceil(digits / 2)` leading digits,
/// running from `10^(h-1)` up to `10^h - 1`.
#[derive(Debug, Clone)]
pub struct PalindromeTier {
    digits: usize,
    half: BigUint,
    end: BigUint,
    unit: BigUint,
    skip_composite_ends: bool,
    generated_count: u64,
}

impl PalindromeTier {
    pub fn new(digits: usize) -> Self {
        let digits = digits.max(1);
        let half_len = (digits + 1) / 2;
        let unit = BigUint::from(10u32).pow(half_len as u32 - 1);
        let end = &unit * 10u32;

        PalindromeTier {
            digits,
            half: unit.clone(),
            end,
            unit,
            skip_composite_ends: false,
            generated_count: 0,
        }
    }

    /// Jump over halves whose leading digit is even or 5.
    ///
    /// Such a palindrome ends in that digit and cannot be prime once it has
    /// two or more digits. One-digit tiers are left untouched.
    pub fn skip_composite_ends(mut self) -> Self {
        self.skip_composite_ends = self.digits >= 2;
        self
    }

    pub fn digits(&self) -> usize {
        self.digits
    }

    pub fn is_odd_length(&self) -> bool {
        self.digits % 2 == 1
    }

    pub fn generated_count(&self) -> u64 {
        self.generated_count
    }

    fn leading_digit(&self) -> u32 {
        let lead = &self.half / &self.unit;
        lead.to_u32().unwrap_or(0)
    }

    fn advance_past_composite_ends(&mut self) {
        while self.half < self.end {
            match self.leading_digit() {
                1 | 3 | 7 | 9 => return,
                lead => self.half = &self.unit * (lead + 1),
            }
        }
    }
}

impl Iterator for PalindromeTier {
    type Item = BigUint;

    fn next(&mut self) -> Option<BigUint> {
        if self.skip_composite_ends {
            self.advance_past_composite_ends();
        }
        if self.half >= self.end {
            return None;
        }

        let half_digits = self.half.to_radix_be(10);
        let candidate = from_digits(&mirror(&half_digits, self.is_odd_length()))?;
        self.half += 1u32;
        self.generated_count += 1;
        Some(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_number() {
        assert_eq!(pattern_number(1), BigUint::from(1u32));
        assert_eq!(pattern_number(3), BigUint::from(12321u32));
        assert_eq!(pattern_number(9), BigUint::from(12345678987654321u64));
        assert_eq!(
            pattern_number(11).to_string(),
            "123456789101110987654321"
        );
    }

    #[test]
    fn test_repunit() {
        assert_eq!(repunit(1), BigUint::from(1u32));
        assert_eq!(repunit(3), BigUint::from(111u32));
        assert_eq!(repunit(19).to_string(), "1".repeat(19));
    }

    #[test]
    fn test_mersenne_number() {
        assert_eq!(mersenne_number(2), BigUint::from(3u32));
        assert_eq!(mersenne_number(7), BigUint::from(127u32));
    }

    #[test]
    fn test_palindrome_from_half() {
        assert_eq!(palindrome_from_half("12", false).unwrap(), BigUint::from(1221u32));
        assert_eq!(palindrome_from_half("123", true).unwrap(), BigUint::from(12321u32));
        assert_eq!(palindrome_from_half("7", true).unwrap(), BigUint::from(7u32));
        assert_eq!(palindrome_from_half("7", false).unwrap(), BigUint::from(77u32));
    }

    #[test]
    fn test_palindrome_from_half_rejects_bad_input() {
        assert!(palindrome_from_half("", false).is_err());
        assert!(palindrome_from_half("1a", false).is_err());
        assert!(palindrome_from_half("012", true).is_err());
    }

    #[test]
    fn test_tier_enumerates_in_order() {
        let three: Vec<BigUint> = PalindromeTier::new(3).collect();
        assert_eq!(three.len(), 90);
        assert_eq!(three[0], BigUint::from(101u32));
        assert_eq!(three[1], BigUint::from(111u32));
        assert_eq!(three[89], BigUint::from(999u32));
        assert!(three.windows(2).all(|w| w[0] < w[1]));

        let two: Vec<BigUint> = PalindromeTier::new(2).collect();
        assert_eq!(two.first(), Some(&BigUint::from(11u32)));
        assert_eq!(two.last(), Some(&BigUint::from(99u32)));
    }

    #[test]
    fn test_tier_skips_composite_ends() {
        let tier = PalindromeTier::new(3).skip_composite_ends();
        let kept: Vec<BigUint> = tier.collect();
        assert_eq!(kept.len(), 40);
        assert_eq!(kept[10], BigUint::from(303u32));
        for p in &kept {
            let last = p.to_string().pop().unwrap();
            assert!(matches!(last, '1' | '3' | '7' | '9'));
        }

        // one-digit tiers keep 2 and 5
        assert_eq!(PalindromeTier::new(1).skip_composite_ends().count(), 9);
    }
}
