//! Field validation that collects every violation instead of stopping at the first.

use crate::domain::Decimal;
use rust_decimal::Decimal as RustDecimal;

/// Upper bound for reps, sets and set numbers (a 32-bit int column).
pub const MAX_COUNT: i64 = i32::MAX as i64;

/// Largest weight a `decimal(10,2)` column holds: 99,999,999.99.
pub fn max_weight() -> Decimal {
    Decimal::new(RustDecimal::new(9_999_999_999, 2))
}

/// Accumulates human-readable violations for one request body.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Violations(Vec<String>);

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Into<String>) {
        self.0.push(message.into());
    }

    /// Require a non-blank string no longer than `max` characters.
    pub fn required(&mut self, field: &str, value: &str, max: usize) {
        if value.trim().is_empty() {
            self.push(format!("{} is required", field));
        } else {
            self.max_len(field, value, max);
        }
    }

    pub fn max_len(&mut self, field: &str, value: &str, max: usize) {
        if value.chars().count() > max {
            self.push(format!("{} must be at most {} characters", field, max));
        }
    }

    pub fn optional_max_len(&mut self, field: &str, value: Option<&str>, max: usize) {
        if let Some(v) = value {
            self.max_len(field, v, max);
        }
    }

    /// Require `min <= value <= MAX_COUNT`.
    pub fn count(&mut self, field: &str, value: i64, min: i64) {
        if value < min {
            self.push(format!("{} must be at least {}", field, min));
        } else if value > MAX_COUNT {
            self.push(format!("{} must be at most {}", field, MAX_COUNT));
        }
    }

    /// Require `0 <= value <= max_weight()`.
    pub fn weight(&mut self, field: &str, value: Decimal) {
        let max = max_weight();
        if value.is_negative() {
            self.push(format!("{} must be a positive number", field));
        } else if value > max {
            self.push(format!("{} must be at most {}", field, max));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn messages(&self) -> &[String] {
        &self.0
    }

    /// `Ok(())` when nothing was recorded, otherwise the collected messages.
    pub fn into_result(self) -> Result<(), Vec<String>> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_all_violations() {
        let mut v = Violations::new();
        v.required("FirstName", "  ", 50);
        v.count("Reps", 0, 1);
        v.weight("Weight", Decimal::from(-5));
        assert_eq!(v.messages().len(), 3);
        assert_eq!(v.messages()[0], "FirstName is required");
        assert_eq!(v.messages()[1], "Reps must be at least 1");
        assert!(v.into_result().is_err());
    }

    #[test]
    fn upper_bounds_on_counts_and_weight() {
        let mut v = Violations::new();
        v.count("Sets", MAX_COUNT, 1);
        v.weight("Weight", max_weight());
        assert!(v.is_empty());

        v.count("Reps", MAX_COUNT + 1, 1);
        v.weight("Weight", Decimal::from(100_000_000));
        assert_eq!(
            v.into_result().unwrap_err(),
            vec![
                "Reps must be at most 2147483647".to_string(),
                "Weight must be at most 99999999.99".to_string(),
            ]
        );
    }

    #[test]
    fn length_limit_counts_chars() {
        let mut v = Violations::new();
        v.required("Position", "Point Guard", 20);
        v.optional_max_len("Notes", None, 5);
        assert!(v.is_empty());

        v.required("Position", &"x".repeat(21), 20);
        assert_eq!(
            v.into_result().unwrap_err(),
            vec!["Position must be at most 20 characters".to_string()]
        );
    }
}
