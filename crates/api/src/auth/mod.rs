//! Bearer-token authentication.
//!
//! Tokens are issued by the platform's auth service; this server only
//! validates them.

pub mod jwt;
