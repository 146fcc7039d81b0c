//! Route handlers for the contest auth API.

pub mod auth;
pub mod health;
