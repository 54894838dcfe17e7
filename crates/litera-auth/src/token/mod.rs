//! Signed bearer token issuance and verification.

pub mod claims;
pub mod codec;

pub use claims::Claims;
pub use codec::{SignedToken, TokenCodec};
