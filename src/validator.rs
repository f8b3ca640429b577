use crate::{
    clock::{Clock, SystemClock},
    config::CsrfConfig,
    mac::MacProvider,
    token::{canonical_salt, Token},
    Error,
};
use chrono::Duration;
use std::fmt;
use subtle::ConstantTimeEq;
use tracing::debug;

/// Outcome of checking a token pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValidationResult {
    Ok,
    TokenMissing,
    SaltMismatch,
    TokenMismatch,
    TokenTamperedWith,
    TokenExpired,
}

impl ValidationResult {
    pub fn is_ok(self) -> bool {
        self == ValidationResult::Ok
    }

    /// Turns a rejection into [`Error::Rejected`].
    pub fn into_result(self) -> crate::Result<()> {
        match self {
            ValidationResult::Ok => Ok(()),
            rejected => Err(Error::Rejected(rejected)),
        }
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ValidationResult::Ok => "ok",
            ValidationResult::TokenMissing => "xsrf token missing",
            ValidationResult::SaltMismatch => "xsrf salt mismatch",
            ValidationResult::TokenMismatch => "xsrf token mismatch",
            ValidationResult::TokenTamperedWith => "xsrf token tampered with",
            ValidationResult::TokenExpired => "xsrf token expired",
        })
    }
}

/// Decides whether a form token and a cookie token prove knowledge of one
/// unexpired, untampered, correctly salted token.
///
/// Holds no mutable state; share it freely between threads.
#[derive(Clone, Debug)]
pub struct Validator<M, C = SystemClock> {
    provider: M,
    clock: C,
}

impl<M: MacProvider> Validator<M> {
    pub fn new(provider: M) -> Self {
        Self::with_clock(provider, SystemClock)
    }
}

impl<M: MacProvider, C: Clock> Validator<M, C> {
    pub fn with_clock(provider: M, clock: C) -> Self {
        Self { provider, clock }
    }

    /// Checks a token pair.
    ///
    /// `token_one` usually comes from the form or query string and
    /// `token_two` from the cookie. `salt` is the value given at issuance.
    /// Without a `validity_period` tokens never expire.
    pub fn validate(
        &self,
        token_one: Option<&Token>,
        token_two: Option<&Token>,
        salt: Option<&str>,
        validity_period: Option<Duration>,
    ) -> ValidationResult {
        let result = self.check(token_one, token_two, salt, validity_period);
        if !result.is_ok() {
            debug!(%result, "rejected xsrf token pair");
        }
        result
    }

    /// Like [`Validator::validate`], with the validity period taken from
    /// `config`.
    pub fn validate_with(
        &self,
        token_one: Option<&Token>,
        token_two: Option<&Token>,
        salt: Option<&str>,
        config: &CsrfConfig,
    ) -> ValidationResult {
        self.validate(token_one, token_two, salt, config.validity_period)
    }

    fn check(
        &self,
        token_one: Option<&Token>,
        token_two: Option<&Token>,
        salt: Option<&str>,
        validity_period: Option<Duration>,
    ) -> ValidationResult {
        let (Some(one), Some(two)) = (token_one, token_two) else {
            return ValidationResult::TokenMissing;
        };

        if one.salt() != canonical_salt(salt) {
            return ValidationResult::SaltMismatch;
        }

        if !one.matches(two) {
            return ValidationResult::TokenMismatch;
        }

        if one.random_bytes().is_empty() {
            debug!("token carries no random bytes");
            return ValidationResult::TokenTamperedWith;
        }

        let expected = one.expected_hmac(&self.provider);
        if !bool::from(expected.ct_eq(one.hmac())) {
            debug!("recomputed mac differs");
            return ValidationResult::TokenTamperedWith;
        }

        if let Some(period) = validity_period {
            let expired = match one.created_date().checked_add_signed(period) {
                Some(expiry) => self.clock.now() > expiry,
                // Out of range: past the end of time, or before its start.
                None => period < Duration::zero(),
            };
            if expired {
                return ValidationResult::TokenExpired;
            }
        }

        ValidationResult::Ok
    }
}
