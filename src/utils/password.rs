// src/utils/password.rs

//! Password rules for registration.
//!
//! Two independent policies exist: the baseline identity policy and a
//! stricter house policy. A password must satisfy both.

use std::borrow::Cow;

use validator::ValidationError;

/// A single unmet password requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordRule {
    TooShort,
    RequiresUpper,
    RequiresLower,
    RequiresDigit,
    RequiresNonAlphanumeric,
    RequiresTwoUpper,
    RequiresThreeDigits,
    RequiresThreeSymbols,
}

impl PasswordRule {
    pub fn code(&self) -> &'static str {
        match self {
            PasswordRule::TooShort => "PasswordTooShort",
            PasswordRule::RequiresUpper => "PasswordRequiresUpper",
            PasswordRule::RequiresLower => "PasswordRequiresLower",
            PasswordRule::RequiresDigit => "PasswordRequiresDigit",
            PasswordRule::RequiresNonAlphanumeric => "PasswordRequiresNonAlphanumeric",
            PasswordRule::RequiresTwoUpper => "PasswordRequiresTwoUpper",
            PasswordRule::RequiresThreeDigits => "PasswordRequiresThreeDigits",
            PasswordRule::RequiresThreeSymbols => "PasswordRequiresThreeSymbols",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            PasswordRule::TooShort => "Password must be at least 8 characters.",
            PasswordRule::RequiresUpper => "Password must contain an uppercase letter.",
            PasswordRule::RequiresLower => "Password must contain a lowercase letter.",
            PasswordRule::RequiresDigit => "Password must contain a digit.",
            PasswordRule::RequiresNonAlphanumeric => {
                "Password must contain a non-alphanumeric character."
            }
            PasswordRule::RequiresTwoUpper => "Password must contain at least 2 uppercase letters.",
            PasswordRule::RequiresThreeDigits => "Password must contain at least 3 digits.",
            PasswordRule::RequiresThreeSymbols => {
                "Password must contain at least 3 special characters."
            }
        }
    }
}

pub const MIN_PASSWORD_LEN: usize = 8;

struct CharCounts {
    len: usize,
    upper: usize,
    lower: usize,
    digit: usize,
    symbol: usize,
}

fn count(password: &str) -> CharCounts {
    password.chars().fold(
        CharCounts {
            len: 0,
            upper: 0,
            lower: 0,
            digit: 0,
            symbol: 0,
        },
        |mut c, ch| {
            c.len += 1;
            if ch.is_uppercase() {
                c.upper += 1;
            } else if ch.is_lowercase() {
                c.lower += 1;
            }
            if ch.is_ascii_digit() {
                c.digit += 1;
            } else if !ch.is_alphanumeric() {
                c.symbol += 1;
            }
            c
        },
    )
}

/// Baseline identity policy: length >= 8 with at least one upper, lower,
/// digit and non-alphanumeric character.
pub fn identity_policy_violations(password: &str) -> Vec<PasswordRule> {
    let c = count(password);
    let mut violations = Vec::new();
    if c.len < MIN_PASSWORD_LEN {
        violations.push(PasswordRule::TooShort);
    }
    if c.upper < 1 {
        violations.push(PasswordRule::RequiresUpper);
    }
    if c.lower < 1 {
        violations.push(PasswordRule::RequiresLower);
    }
    if c.digit < 1 {
        violations.push(PasswordRule::RequiresDigit);
    }
    if c.symbol < 1 {
        violations.push(PasswordRule::RequiresNonAlphanumeric);
    }
    violations
}

/// House policy: at least 2 uppercase letters, 3 digits and 3 symbols.
pub fn strict_policy_violations(password: &str) -> Vec<PasswordRule> {
    let c = count(password);
    let mut violations = Vec::new();
    if c.upper < 2 {
        violations.push(PasswordRule::RequiresTwoUpper);
    }
    if c.digit < 3 {
        violations.push(PasswordRule::RequiresThreeDigits);
    }
    if c.symbol < 3 {
        violations.push(PasswordRule::RequiresThreeSymbols);
    }
    violations
}

/// Every rule from both policies that `password` breaks.
pub fn password_violations(password: &str) -> Vec<PasswordRule> {
    let mut violations = identity_policy_violations(password);
    violations.extend(strict_policy_violations(password));
    violations
}

/// `validator` hook applying both policies.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    let violations = password_violations(password);
    let Some(first) = violations.first() else {
        return Ok(());
    };

    let message = violations
        .iter()
        .map(|rule| rule.description())
        .collect::<Vec<_>>()
        .join(" ");

    Err(ValidationError::new(first.code()).with_message(Cow::Owned(message)))
}
