//! # contest-auth
//!
//! Email-verification signup and session issuance for the contest platform.
//!
//! ## Flow
//!
//! 1. `POST /api/v1/user/signup` validates the email, rejects addresses that
//!    already belong to a user, and mails a signed verification link.
//! 2. `GET /api/v1/user/verify-email?token=...` checks the link token, creates
//!    the user on the first click (or finds it on later clicks) and sets a
//!    session cookie carrying a signed auth token.
//!
//! Tokens are stateless HS256 JWS strings. Both token kinds share one signing
//! secret, so the kind lives inside the signed claims and every consumer
//! matches on it.
//!
//! The user store and the mail transport sit behind traits (`store::UserStore`,
//! `email::EmailSender`) and are injected into the handlers through
//! `AuthState`, which keeps the flow testable without Postgres or SMTP.

pub mod api;
pub mod cli;
pub mod email;
pub mod store;
pub mod token;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
