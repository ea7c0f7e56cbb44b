//! Identity token handling.
//!
//! - [`jwt`] -- verification of identity-provider access tokens (and minting
//!   them for local development and tests).

pub mod jwt;
