//! Rate limiting as a pluggable policy.
//!
//! The deployed behavior is "always allow" — there is no real limiter here,
//! and the trait exists so that fact is visible at the type level instead of
//! being buried in a stub check. A Redis- or token-bucket-backed policy can
//! be dropped in without touching the server loop.

use crate::request::Request;

/// Decides whether a request may proceed. A denial becomes a `429` envelope
/// before the dispatcher is reached.
pub trait RateLimitPolicy: Send + Sync {
    fn allow(&self, req: &Request) -> bool;
}

/// The default policy: permits everything.
pub struct AllowAll;

impl RateLimitPolicy for AllowAll {
    fn allow(&self, _req: &Request) -> bool {
        true
    }
}
