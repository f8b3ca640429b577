use crate::{
    clock::{Clock, SystemClock},
    config::CsrfConfig,
    mac::MacProvider,
    token::{Token, UnsignedToken},
};
use rand::{thread_rng, RngCore};
use tracing::trace;

/// Issues fresh signed tokens.
#[derive(Clone, Debug)]
pub struct TokenIssuer<M, C = SystemClock> {
    provider: M,
    clock: C,
    config: CsrfConfig,
}

impl<M: MacProvider> TokenIssuer<M> {
    pub fn new(provider: M, config: CsrfConfig) -> Self {
        Self::with_clock(provider, SystemClock, config)
    }
}

impl<M: MacProvider, C: Clock> TokenIssuer<M, C> {
    pub fn with_clock(provider: M, clock: C, config: CsrfConfig) -> Self {
        Self {
            provider,
            clock,
            config,
        }
    }

    pub fn config(&self) -> &CsrfConfig {
        &self.config
    }

    /// Issues a token bound to `salt`.
    pub fn issue(&self, salt: Option<&str>) -> Token {
        let mut random_bytes = vec![0; self.config.token_length];
        thread_rng().fill_bytes(&mut random_bytes);
        let created_date = self.clock.now();
        trace!(%created_date, salted = salt.is_some(), "issuing xsrf token");
        UnsignedToken::new(random_bytes, created_date, salt.map(String::from)).sign(&self.provider)
    }
}

#[cfg(test)]
mod tests {
    use super::TokenIssuer;
    use crate::{clock::FixedClock, config::CsrfConfig, mac::HmacSha256Provider};
    use chrono::{DateTime, Timelike};

    fn issuer(config: CsrfConfig) -> TokenIssuer<HmacSha256Provider, FixedClock> {
        let now = DateTime::from_timestamp(1_700_000_000, 123_456_789).unwrap();
        TokenIssuer::with_clock(
            HmacSha256Provider::new(b"issuer tests").unwrap(),
            FixedClock(now),
            config,
        )
    }

    #[test]
    fn uses_configured_length() {
        let token = issuer(CsrfConfig::new().token_length(16)).issue(None);
        assert_eq!(token.random_bytes().len(), 16);
        assert_eq!(token.hmac().len(), 32);
    }

    #[test]
    fn keeps_full_clock_precision() {
        let token = issuer(CsrfConfig::new()).issue(None);
        assert_eq!(token.created_date().nanosecond(), 123_456_789);
        let decoded: crate::Token = token.to_string().parse().unwrap();
        assert!(token.matches(&decoded));
    }

    #[test]
    fn tokens_are_distinct() {
        let issuer = issuer(CsrfConfig::new());
        let a = issuer.issue(Some("form"));
        let b = issuer.issue(Some("form"));
        assert!(!a.matches(&b));
        assert_eq!(a.salt(), "form");
    }
}
