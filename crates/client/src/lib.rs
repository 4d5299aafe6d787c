//! Explicit API client seam with composable middleware and the single-use
//! idempotency-token protocol.
//!
//! There is no global singleton client here: a [`Transport`] is an explicit
//! object handed to whatever needs the network, and cross-cutting concerns
//! (auth-header injection, request tracing) are wrapper transports stacked at
//! construction time:
//!
//! ```ignore
//! let transport = Arc::new(Trace::new(AuthHeader::bearer(
//!     HttpTransport::new("https://api.example.com/")?,
//!     token_source,
//! )));
//! ```
//!
//! Non-idempotent writes go through [`NonceIssuer`]: obtain a single-use
//! [`NonceToken`], attach it, and it is spent at dispatch time whatever the
//! outcome.
//!
//! ## Cargo features
//!
//! * `http` (default): reqwest-backed [`HttpTransport`].

#![warn(missing_docs)]

mod middleware;
mod nonce;
mod transport;

#[cfg(feature = "http")]
mod http;

pub use middleware::{AuthHeader, AuthTokenSource, Trace};
pub use nonce::{NONCE_HEADER, NonceIssuer, NonceToken};
pub use transport::{ApiRequest, Method, RawResponse, Transport};

#[cfg(feature = "http")]
pub use http::HttpTransport;
