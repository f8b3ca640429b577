use crate::mac::MacProvider;
use chrono::{DateTime, Utc};
use std::hash::{Hash, Hasher};
use subtle::ConstantTimeEq;

/// A token that has not been signed yet.
///
/// Drafts can't be compared or encoded. The only way forward is
/// [`UnsignedToken::sign`], which yields an immutable [`Token`].
pub struct UnsignedToken {
    random_bytes: Vec<u8>,
    created_date: DateTime<Utc>,
    salt: Option<String>,
}

impl UnsignedToken {
    /// `random_bytes` must come from a cryptographically secure source.
    pub fn new(
        random_bytes: Vec<u8>,
        created_date: DateTime<Utc>,
        salt: Option<String>,
    ) -> UnsignedToken {
        UnsignedToken {
            random_bytes,
            created_date,
            salt,
        }
    }

    /// Computes the MAC over the draft's fields and seals it.
    ///
    /// # Panics
    ///
    /// If the random bytes are empty. That is a bug in the issuing code, not
    /// something an attacker can reach.
    pub fn sign<M: MacProvider>(self, provider: &M) -> Token {
        assert!(
            !self.random_bytes.is_empty(),
            "cannot sign a token without random bytes"
        );
        let hmac = provider.compute(&mac_input(
            &self.random_bytes,
            self.created_date,
            canonical_salt(self.salt.as_deref()),
        ));
        Token {
            random_bytes: self.random_bytes,
            created_date: self.created_date,
            salt: self.salt,
            hmac,
        }
    }
}

/// A signed CSRF token.
#[derive(Clone)]
pub struct Token {
    random_bytes: Vec<u8>,
    created_date: DateTime<Utc>,
    salt: Option<String>,
    hmac: Vec<u8>,
}

impl Token {
    /// Reassembles a token decoded from a cookie, form field or header.
    ///
    /// Nothing is checked here; hand the result to the validator.
    pub fn from_parts(
        random_bytes: Vec<u8>,
        created_date: DateTime<Utc>,
        salt: Option<String>,
        hmac: Vec<u8>,
    ) -> Token {
        Token {
            random_bytes,
            created_date,
            salt,
            hmac,
        }
    }

    pub fn random_bytes(&self) -> &[u8] {
        &self.random_bytes
    }

    pub fn created_date(&self) -> DateTime<Utc> {
        self.created_date
    }

    /// The salt, with an absent salt reported as `""`.
    pub fn salt(&self) -> &str {
        canonical_salt(self.salt.as_deref())
    }

    pub fn hmac(&self) -> &[u8] {
        &self.hmac
    }

    /// Field-wise equality.
    ///
    /// All four fields are compared every time, and byte sequences are
    /// compared in constant time, so the position of the first difference is
    /// not observable.
    pub fn matches(&self, other: &Token) -> bool {
        let random = self.random_bytes.ct_eq(&other.random_bytes);
        let created = self
            .created_date
            .timestamp()
            .ct_eq(&other.created_date.timestamp())
            & self
                .created_date
                .timestamp_subsec_nanos()
                .ct_eq(&other.created_date.timestamp_subsec_nanos());
        let salt = self.salt().as_bytes().ct_eq(other.salt().as_bytes());
        let hmac = self.hmac.ct_eq(&other.hmac);
        (random & created & salt & hmac).into()
    }

    /// Recomputes the MAC over this token's fields.
    pub(crate) fn expected_hmac<M: MacProvider>(&self, provider: &M) -> Vec<u8> {
        provider.compute(&mac_input(
            &self.random_bytes,
            self.created_date,
            self.salt(),
        ))
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.matches(other)
    }
}

impl Eq for Token {}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.random_bytes.hash(state);
        self.created_date.hash(state);
        self.salt().hash(state);
        self.hmac.hash(state);
    }
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Token")
            .field("random_bytes", &"***")
            .field("created_date", &self.created_date)
            .field("salt", &self.salt())
            .field("hmac", &"***")
            .finish()
    }
}

/// `None` and `Some("")` are the same salt.
pub fn canonical_salt(salt: Option<&str>) -> &str {
    salt.unwrap_or_default()
}

/// The exact bytes fed to the MAC provider.
///
/// Layout: big-endian `u64` length of the random bytes, the random bytes,
/// big-endian `i64` seconds since the Unix epoch, big-endian `u32`
/// nanoseconds within that second, the UTF-8 salt.
///
/// The whole of `created_date` goes in, so the MAC covers exactly what
/// [`Token::matches`] compares.
pub(crate) fn mac_input(
    random_bytes: &[u8],
    created_date: DateTime<Utc>,
    salt: &str,
) -> Vec<u8> {
    let mut buf = Vec::with_capacity(8 + random_bytes.len() + 8 + 4 + salt.len());
    buf.extend_from_slice(&(random_bytes.len() as u64).to_be_bytes());
    buf.extend_from_slice(random_bytes);
    buf.extend_from_slice(&created_date.timestamp().to_be_bytes());
    buf.extend_from_slice(&created_date.timestamp_subsec_nanos().to_be_bytes());
    buf.extend_from_slice(salt.as_bytes());
    buf
}
