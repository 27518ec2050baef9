//! # auth-adapters
//!
//! `IdentityVerifier` implementations. The JWT verifier is compiled with the
//! `auth-jwt` feature.

#[cfg(feature = "auth-jwt")]
pub mod jwt;

#[cfg(feature = "auth-jwt")]
pub use jwt::{Claims, JwtIdentityVerifier, TokenError, TokenIssuer};
