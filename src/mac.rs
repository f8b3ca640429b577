//! Keyed MAC capability used to sign and re-check tokens.
use crate::{Error, Result};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::sync::Arc;

type HmacSha256 = Hmac<Sha256>;

/// Computes a message authentication code over token data.
///
/// Implementations hold the server secret themselves and must be
/// deterministic: the same input under the same key always yields the same
/// output, otherwise every issued token would fail validation.
pub trait MacProvider: Send + Sync {
    fn compute(&self, data: &[u8]) -> Vec<u8>;
}

impl<M: MacProvider + ?Sized> MacProvider for &M {
    fn compute(&self, data: &[u8]) -> Vec<u8> {
        (**self).compute(data)
    }
}

impl<M: MacProvider + ?Sized> MacProvider for Arc<M> {
    fn compute(&self, data: &[u8]) -> Vec<u8> {
        (**self).compute(data)
    }
}

/// HMAC-SHA256 keyed with the server secret.
#[derive(Clone)]
pub struct HmacSha256Provider {
    mac: HmacSha256,
}

impl HmacSha256Provider {
    /// Builds a provider from the server secret. An empty secret is refused.
    pub fn new(key: &[u8]) -> Result<Self> {
        if key.is_empty() {
            return Err(Error::InvalidKey);
        }
        let mac = HmacSha256::new_from_slice(key).map_err(|_| Error::InvalidKey)?;
        Ok(Self { mac })
    }
}

impl std::fmt::Debug for HmacSha256Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HmacSha256Provider").finish_non_exhaustive()
    }
}

impl MacProvider for HmacSha256Provider {
    fn compute(&self, data: &[u8]) -> Vec<u8> {
        let mut mac = self.mac.clone();
        mac.update(data);
        mac.finalize().into_bytes().to_vec()
    }
}
