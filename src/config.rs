use chrono::Duration;

/// Default number of random bytes per token.
pub const DEFAULT_TOKEN_LENGTH: usize = 32;

/// Settings shared by the issuer and the validator.
#[derive(Clone, Debug)]
pub struct CsrfConfig {
    /// Number of random bytes in each issued token.
    /// Default: 32
    pub token_length: usize,

    /// Maximum age of a token. `None` disables the expiry check.
    /// Default: None
    pub validity_period: Option<Duration>,
}

impl Default for CsrfConfig {
    fn default() -> Self {
        Self {
            token_length: DEFAULT_TOKEN_LENGTH,
            validity_period: None,
        }
    }
}

impl CsrfConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of random bytes per token.
    ///
    /// # Panics
    ///
    /// If `length` is zero.
    pub fn token_length(mut self, length: usize) -> Self {
        assert!(length > 0, "xsrf token length must be at least one byte");
        self.token_length = length;
        self
    }

    /// Set the maximum token age.
    pub fn validity_period(mut self, period: Duration) -> Self {
        self.validity_period = Some(period);
        self
    }
}
