//! Principal extractor — pulls the gate-attached identity out of request
//! extensions.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use litera_auth::principal::Principal;

/// The principal established by the gate, if any.
///
/// Never rejects; handlers pass the inner option to the access policy, which
/// is the single place that decides between 401 and 403.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<Principal>);

impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(parts.extensions.get::<Principal>().cloned()))
    }
}
