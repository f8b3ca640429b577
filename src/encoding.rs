//! Text form of a [`Token`] for cookies, hidden form fields and headers.
//!
//! `<random>.<secs>.<nanos>.<salt>.<hmac>`: the random bytes, UTF-8 salt and
//! MAC are base64 (URL-safe alphabet, unpadded). `secs` is the creation time
//! in signed decimal seconds since the Unix epoch and `nanos` the decimal
//! nanoseconds within that second. An empty salt segment decodes to no salt.
use crate::{token::Token, Error};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::DateTime;
use std::{fmt, str::FromStr};

const SEPARATOR: char = '.';

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{SEPARATOR}{}{SEPARATOR}{}{SEPARATOR}{}{SEPARATOR}{}",
            URL_SAFE_NO_PAD.encode(self.random_bytes()),
            self.created_date().timestamp(),
            self.created_date().timestamp_subsec_nanos(),
            URL_SAFE_NO_PAD.encode(self.salt()),
            URL_SAFE_NO_PAD.encode(self.hmac()),
        )
    }
}

impl FromStr for Token {
    type Err = Error;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        let mut parts = value.split(SEPARATOR);
        let (Some(random), Some(secs), Some(nanos), Some(salt), Some(hmac), None) = (
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
        ) else {
            return Err(Error::InvalidToken);
        };

        let random_bytes = decode(random)?;
        let secs = secs.parse::<i64>().map_err(|_| Error::InvalidToken)?;
        let nanos = nanos.parse::<u32>().map_err(|_| Error::InvalidToken)?;
        let created_date = DateTime::from_timestamp(secs, nanos)
            .filter(|date| date.timestamp_subsec_nanos() == nanos)
            .ok_or(Error::InvalidToken)?;
        let salt = String::from_utf8(decode(salt)?).map_err(|_| Error::InvalidToken)?;
        let salt = (!salt.is_empty()).then_some(salt);
        let hmac = decode(hmac)?;

        Ok(Token::from_parts(random_bytes, created_date, salt, hmac))
    }
}

fn decode(segment: &str) -> crate::Result<Vec<u8>> {
    URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|_| Error::InvalidToken)
}

#[cfg(test)]
mod tests {
    use crate::{
        clock::FixedClock,
        config::CsrfConfig,
        issuer::TokenIssuer,
        mac::HmacSha256Provider,
        token::{Token, UnsignedToken},
        validator::{ValidationResult, Validator},
        Error,
    };
    use chrono::DateTime;

    fn issue(salt: Option<&str>) -> Token {
        let now = DateTime::from_timestamp(1_700_000_000, 987_654_321).unwrap();
        TokenIssuer::with_clock(
            HmacSha256Provider::new(b"encoding tests").unwrap(),
            FixedClock(now),
            CsrfConfig::new(),
        )
        .issue(salt)
    }

    #[test]
    fn token_to_from_string() {
        let original = issue(Some("checkout.form"));
        let s = original.to_string();
        assert_eq!(s.split('.').count(), 5);
        let decoded: Token = s.parse().unwrap();
        assert!(original.matches(&decoded));
        assert_eq!(decoded.salt(), "checkout.form");
    }

    #[test]
    fn unsalted_round_trip() {
        let original = issue(None);
        let s = original.to_string();
        assert!(s.contains(".."));
        let decoded: Token = s.parse().unwrap();
        assert!(original.matches(&decoded));
    }

    #[test]
    fn encoded_form_is_cookie_safe() {
        let s = issue(Some("a b;c=d,e")).to_string();
        assert!(!s.contains(|c: char| c == ';' || c == ',' || c == '=' || c.is_whitespace()));
    }

    #[test]
    fn nanosecond_dates_survive() {
        let provider = HmacSha256Provider::new(b"encoding tests").unwrap();
        let created = DateTime::from_timestamp(1_700_000_000, 123_456_789).unwrap();
        let issued = UnsignedToken::new(vec![9; 32], created, None).sign(&provider);
        let decoded: Token = issued.to_string().parse().unwrap();
        assert!(issued.matches(&decoded));
        assert_eq!(decoded.created_date(), created);
        assert_eq!(
            Validator::with_clock(&provider, FixedClock(created)).validate(
                Some(&decoded),
                Some(&issued),
                None,
                None
            ),
            ValidationResult::Ok
        );
    }

    #[test]
    fn pre_epoch_dates_survive() {
        let created = DateTime::from_timestamp(-2, 999_998_500).unwrap();
        let token = Token::from_parts(vec![1, 2, 3], created, None, vec![4, 5]);
        let decoded: Token = token.to_string().parse().unwrap();
        assert!(token.matches(&decoded));
    }

    #[test]
    fn malformed_input_is_rejected() {
        for input in [
            "",
            "a.b.c",
            "AQ.1..AQ",
            "AQ.1.0.x.AQ.extra",
            "!!.1.0..AQ",
            "AQ.not-a-number.0..AQ",
            "AQ.1.-5..AQ",
            "AQ.1.4294967296..AQ",
            "AQ.1.0.__8.AQ",
            "AQ.99999999999999999999.0..AQ",
        ] {
            assert!(
                matches!(input.parse::<Token>(), Err(Error::InvalidToken)),
                "{input:?} should not decode"
            );
        }
    }
}
