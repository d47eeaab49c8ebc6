//! Percentage scoring and performance tiers.
//!
//! | range  | tier         | passing |
//! |--------|--------------|---------|
//! | 0-49   | not passing  | no      |
//! | 50-69  | practitioner | yes     |
//! | 70-79  | advanced     | yes     |
//! | 80-100 | expert       | yes     |

use serde::{Deserialize, Serialize};

use crate::error::GradeError;

/// Lowest passing percentage.
pub const PASSING_THRESHOLD: u8 = 50;

/// Lowest aggregate percentage that earns the certificate.
pub const CERTIFICATE_THRESHOLD: u8 = 75;

/// Modules scored below this are listed for remediation in the final report.
pub const REMEDIATION_THRESHOLD: u8 = 60;

/// Ordered from worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    NotPassing,
    Practitioner,
    Advanced,
    Expert,
}

impl Tier {
    pub fn label(self) -> &'static str {
        match self {
            Tier::NotPassing => "not passing",
            Tier::Practitioner => "practitioner",
            Tier::Advanced => "advanced",
            Tier::Expert => "expert",
        }
    }

    pub fn advisory(self) -> &'static str {
        match self {
            Tier::NotPassing => {
                "The current level needs urgent attention. Revisit the standards and \
                 practise applying them."
            }
            Tier::Practitioner => {
                "A solid start, but deepen your understanding of the specialised topics \
                 to reach the higher levels."
            }
            Tier::Advanced => {
                "Great performance! You have a strong knowledge base; a little more focus \
                 will take you to expert level."
            }
            Tier::Expert => {
                "Outstanding performance showing deep mastery of the standards. \
                 Congratulations."
            }
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Grade {
    pub percentage: u8,
    pub tier: Tier,
    pub is_passing: bool,
    pub advisory: &'static str,
}

/// Map a percentage to its tier. Values above 100 grade as expert.
pub fn grade(percentage: u8) -> Grade {
    let tier = match percentage {
        0..=49 => Tier::NotPassing,
        50..=69 => Tier::Practitioner,
        70..=79 => Tier::Advanced,
        _ => Tier::Expert,
    };
    Grade {
        percentage,
        tier,
        is_passing: percentage >= PASSING_THRESHOLD,
        advisory: tier.advisory(),
    }
}

/// `round(correct / total * 100)`, halves rounding up, capped at 100.
///
/// # Errors
///
/// Returns `GradeError::DegenerateModule` if `total` is zero.
pub fn percentage(correct: u32, total: u32) -> Result<u8, GradeError> {
    if total == 0 {
        return Err(GradeError::DegenerateModule);
    }
    let correct = u64::from(correct.min(total));
    let total = u64::from(total);
    let pct = (correct * 200 + total) / (total * 2);
    Ok(u8::try_from(pct.min(100)).unwrap_or(100))
}

/// Whether an aggregate percentage earns the certificate.
pub fn is_certificate_eligible(percentage: u8) -> bool {
    percentage >= CERTIFICATE_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn tier_boundaries_are_exact() {
        assert_eq!(grade(0).tier, Tier::NotPassing);
        assert_eq!(grade(49).tier, Tier::NotPassing);
        assert_eq!(grade(50).tier, Tier::Practitioner);
        assert_eq!(grade(69).tier, Tier::Practitioner);
        assert_eq!(grade(70).tier, Tier::Advanced);
        assert_eq!(grade(79).tier, Tier::Advanced);
        assert_eq!(grade(80).tier, Tier::Expert);
        assert_eq!(grade(100).tier, Tier::Expert);
    }

    #[test]
    fn passing_starts_at_fifty() {
        assert!(!grade(49).is_passing);
        assert!(grade(50).is_passing);
        assert_eq!(grade(49).tier.label(), "not passing");
    }

    #[test]
    fn percentage_rounds_half_up() {
        assert_eq!(percentage(2, 3), Ok(67));
        assert_eq!(percentage(1, 3), Ok(33));
        assert_eq!(percentage(1, 8), Ok(13)); // 12.5
        assert_eq!(percentage(20, 20), Ok(100));
        assert_eq!(percentage(0, 20), Ok(0));
    }

    #[test]
    fn zero_total_fails_fast() {
        assert_eq!(percentage(0, 0), Err(GradeError::DegenerateModule));
    }

    #[test]
    fn certificate_is_stricter_than_passing() {
        assert!(grade(74).is_passing);
        assert!(!is_certificate_eligible(74));
        assert!(is_certificate_eligible(75));
    }

    proptest! {
        #[test]
        fn grade_is_monotonic(a in 0u8..=100, b in 0u8..=100) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(grade(lo).tier <= grade(hi).tier);
        }

        #[test]
        fn percentage_stays_in_range(correct in 0u32..500, total in 1u32..500) {
            let pct = percentage(correct, total).unwrap();
            prop_assert!(pct <= 100);
        }
    }
}
