//! A library to provide paired-token Cross-site request forgery protection.
//!
//! Getting this right can be tricky, and this library aims to provide the
//! primitives to be able to do this without making it too easy to get it
//! wrong. Remember though, this needs to be coupled with the HTTP layer
//! correctly as well in order to ensure it provide protection.
//!
//! # Usage
//!
//! - A [`TokenIssuer`] issues a signed [`Token`]. Send one copy to the client
//!   in a cookie and embed the other in your HTML form (or have JavaScript
//!   send it in a header).
//! - A token can be bound to a particular form or action with a salt.
//! - On the next state-changing request, decode both copies and hand them to
//!   [`Validator::validate`]. Anything but [`ValidationResult::Ok`] should be
//!   rejected.
//!
//! ```
//! use chrono::Duration;
//! use xsrf_pair::{
//!     CsrfConfig, HmacSha256Provider, Token, TokenIssuer, ValidationResult, Validator,
//! };
//!
//! let provider = HmacSha256Provider::new(b"server secret").unwrap();
//! let config = CsrfConfig::new().validity_period(Duration::hours(1));
//! let issuer = TokenIssuer::new(&provider, config.clone());
//! let validator = Validator::new(&provider);
//!
//! let issued = issuer.issue(Some("checkout"));
//! let cookie = issued.to_string();
//! let form = issued.to_string();
//!
//! let from_form: Token = form.parse().unwrap();
//! let from_cookie: Token = cookie.parse().unwrap();
//! let result =
//!     validator.validate_with(Some(&from_form), Some(&from_cookie), Some("checkout"), &config);
//! assert_eq!(result, ValidationResult::Ok);
//! ```
//!
//! # Notes
//! - [`rand`](https://docs.rs/rand) is used to generate cryptographically
//!   secure tokens.
//! - Each token carries an HMAC-SHA256 over its random bytes, creation time
//!   and salt, so a pair of identical forged tokens is still caught.
//! - [`subtle`](https://docs.rs/subtle) is used to protect against timing
//!   attacks.
//! - Rejections are logged through [`tracing`](https://docs.rs/tracing) at
//!   `debug` level. Token contents are never logged.

pub mod clock;
pub mod config;
mod encoding;
pub mod issuer;
pub mod mac;
pub mod token;
pub mod validator;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::CsrfConfig;
pub use issuer::TokenIssuer;
pub use mac::{HmacSha256Provider, MacProvider};
pub use token::{Token, UnsignedToken};
pub use validator::{ValidationResult, Validator};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid xsrf token")]
    InvalidToken,
    #[error("invalid xsrf secret key")]
    InvalidKey,
    #[error("{0}")]
    Rejected(ValidationResult),
}

pub type Result<T> = std::result::Result<T, Error>;
