//! Signed, typed, self-expiring tokens.
//!
//! Tokens are compact HS256 JWS strings: `header.claims.signature`, each
//! segment unpadded base64url. One secret signs both token kinds, so the kind
//! is part of the signed claims (`"type": "verification" | "auth"`) and is
//! decoded into [`TokenPayload`], never compared as a loose string.

mod error;

pub use error::Error;

use base64ct::{Base64UrlUnpadded, Encoding};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretSlice};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use time::OffsetDateTime;

type HmacSha256 = Hmac<Sha256>;

const ALG: &str = "HS256";
const TYP: &str = "JWT";

/// Verification links and auth cookies both live for a day.
pub const DEFAULT_TOKEN_TTL_SECONDS: i64 = 24 * 60 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Verification,
    Auth,
}

/// What a token vouches for. The serde tag is the kind discriminator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TokenPayload {
    Verification {
        email: String,
    },
    Auth {
        #[serde(rename = "userId")]
        user_id: String,
    },
}

impl TokenPayload {
    #[must_use]
    pub fn kind(&self) -> TokenKind {
        match self {
            Self::Verification { .. } => TokenKind::Verification,
            Self::Auth { .. } => TokenKind::Auth,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    #[serde(flatten)]
    pub payload: TokenPayload,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Serialize, Deserialize)]
struct TokenHeader {
    alg: String,
    #[serde(default)]
    typ: String,
}

impl TokenHeader {
    fn hs256() -> Self {
        Self {
            alg: ALG.to_string(),
            typ: TYP.to_string(),
        }
    }
}

/// Issues and verifies tokens with a single HMAC secret.
pub struct TokenCodec {
    secret: SecretSlice<u8>,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec").finish_non_exhaustive()
    }
}

impl TokenCodec {
    /// # Errors
    ///
    /// Returns [`Error::EmptySecret`] if `secret` is empty.
    pub fn new(secret: &[u8]) -> Result<Self, Error> {
        if secret.is_empty() {
            return Err(Error::EmptySecret);
        }
        Ok(Self {
            secret: SecretSlice::from(secret.to_vec()),
        })
    }

    /// Sign `payload` with an expiry `ttl_seconds` from now.
    ///
    /// # Errors
    ///
    /// Returns an error if the ttl is not positive or the claims cannot be encoded.
    pub fn issue(&self, payload: TokenPayload, ttl_seconds: i64) -> Result<String, Error> {
        self.issue_at(payload, now_unix_seconds(), ttl_seconds)
    }

    /// Sign `payload` as if the current time were `now_unix_seconds`.
    ///
    /// # Errors
    ///
    /// Returns an error if the ttl is not positive or the claims cannot be encoded.
    pub fn issue_at(
        &self,
        payload: TokenPayload,
        now_unix_seconds: i64,
        ttl_seconds: i64,
    ) -> Result<String, Error> {
        if ttl_seconds <= 0 {
            return Err(Error::InvalidTtl);
        }
        let exp = now_unix_seconds
            .checked_add(ttl_seconds)
            .ok_or(Error::InvalidTtl)?;
        let claims = Claims {
            payload,
            iat: now_unix_seconds,
            exp,
        };

        let header_b64 = b64e_json(&TokenHeader::hs256())?;
        let claims_b64 = b64e_json(&claims)?;
        let signing_input = format!("{header_b64}.{claims_b64}");

        let mut mac = self.mac()?;
        mac.update(signing_input.as_bytes());
        let signature = mac.finalize().into_bytes();
        let signature_b64 = Base64UrlUnpadded::encode_string(&signature);

        Ok(format!("{signing_input}.{signature_b64}"))
    }

    /// Verify a token against the current time and return its claims.
    ///
    /// # Errors
    ///
    /// See [`TokenCodec::verify_at`].
    pub fn verify(&self, token: &str) -> Result<Claims, Error> {
        self.verify_at(token, now_unix_seconds())
    }

    /// Verify a token as if the current time were `now_unix_seconds`.
    ///
    /// The signature is checked (in constant time) before the claims are
    /// decoded, so nothing from an unauthenticated payload is trusted.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - [`Error::Malformed`] if the token does not decode or names another algorithm,
    /// - [`Error::InvalidSignature`] if the HMAC does not match,
    /// - [`Error::Expired`] if `exp` is at or before `now_unix_seconds`.
    pub fn verify_at(&self, token: &str, now_unix_seconds: i64) -> Result<Claims, Error> {
        let mut parts = token.split('.');
        let header_b64 = parts.next().ok_or(Error::Malformed)?;
        let claims_b64 = parts.next().ok_or(Error::Malformed)?;
        let signature_b64 = parts.next().ok_or(Error::Malformed)?;
        if parts.next().is_some() {
            return Err(Error::Malformed);
        }

        let header: TokenHeader = b64d_json(header_b64)?;
        if header.alg != ALG {
            return Err(Error::Malformed);
        }

        let signature =
            Base64UrlUnpadded::decode_vec(signature_b64).map_err(|_| Error::Malformed)?;
        let mut mac = self.mac()?;
        mac.update(header_b64.as_bytes());
        mac.update(b".");
        mac.update(claims_b64.as_bytes());
        mac.verify_slice(&signature).map_err(|_| Error::InvalidSignature)?;

        let claims: Claims = b64d_json(claims_b64)?;
        if claims.exp <= now_unix_seconds {
            return Err(Error::Expired);
        }

        Ok(claims)
    }

    fn mac(&self) -> Result<HmacSha256, Error> {
        HmacSha256::new_from_slice(self.secret.expose_secret()).map_err(|_| Error::EmptySecret)
    }
}

/// Current wall-clock time in Unix seconds.
pub fn now_unix_seconds() -> i64 {
    OffsetDateTime::now_utc().unix_timestamp()
}

fn b64e_json<T: Serialize>(value: &T) -> Result<String, Error> {
    let json = serde_json::to_vec(value)?;
    Ok(Base64UrlUnpadded::encode_string(&json))
}

fn b64d_json<T: for<'de> Deserialize<'de>>(segment: &str) -> Result<T, Error> {
    let bytes = Base64UrlUnpadded::decode_vec(segment).map_err(|_| Error::Malformed)?;
    serde_json::from_slice(&bytes).map_err(|_| Error::Malformed)
}
