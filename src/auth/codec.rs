// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HS256 codec for session tokens.
//!
//! The codec only checks structure and signature. Expiry is deliberately
//! left to the caller so it can be compared against the instant of
//! verification (see `middleware::renew_session`).

use std::fmt;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::claims::TokenClaim;

/// Signing algorithm for every token this service issues or accepts.
pub const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;

/// Token codec errors.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The token parsed but its signature does not match the secret
    #[error("token signature is invalid")]
    SignatureInvalid,

    /// Malformed token, unsupported algorithm, bad claim payload, ...
    #[error("token could not be decoded: {0}")]
    Decode(#[source] jsonwebtoken::errors::Error),

    /// Signing the claim failed
    #[error("token could not be signed: {0}")]
    Encode(#[source] jsonwebtoken::errors::Error),
}

/// Encoder/decoder bound to one shared secret.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.leeway = 0;
        validation.validate_exp = false;
        validation.validate_aud = false;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Sign `claim` into a compact token string.
    pub fn encode(&self, claim: &TokenClaim) -> Result<String, CodecError> {
        jsonwebtoken::encode(&Header::new(SIGNING_ALGORITHM), claim, &self.encoding_key)
            .map_err(CodecError::Encode)
    }

    /// Verify the signature of `token` and return its claim.
    pub fn decode(&self, token: &str) -> Result<TokenClaim, CodecError> {
        jsonwebtoken::decode::<TokenClaim>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => CodecError::SignatureInvalid,
                _ => CodecError::Decode(e),
            })
    }
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &SIGNING_ALGORITHM)
            .finish_non_exhaustive()
    }
}

/// Sign `claim` with `secret`.
pub fn encode(claim: &TokenClaim, secret: &[u8]) -> Result<String, CodecError> {
    TokenCodec::new(secret).encode(claim)
}

/// Decode and verify `token` with `secret`.
pub fn decode(token: &str, secret: &[u8]) -> Result<TokenClaim, CodecError> {
    TokenCodec::new(secret).decode(token)
}
