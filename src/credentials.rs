//! Credential resolution for the currently executing tool call.
//!
//! The interceptor binds the credential to the inbound HTTP request;
//! depending on where the transport surfaces that request, the credential can
//! show up in the call context directly, inside the forwarded request parts,
//! or only as raw headers. Resolution is an ordered list of independent
//! lookup strategies, each swallowing its own failure, so one missing
//! capability never prevents trying the next.

use axum::http::{request::Parts, HeaderMap};
use rmcp::model::Extensions;

use crate::auth::{credential_from_headers, ApiCredential};

/// Recover the caller credential for the current tool call, if any.
///
/// First non-empty hit wins: the typed credential bound to the call context
/// is the single source of truth and always beats a raw header re-parse.
/// Absence is a normal outcome, not an error.
pub fn resolve_credential(extensions: &Extensions) -> Option<ApiCredential> {
    from_context(extensions)
        .or_else(|| from_request_parts(extensions))
        .or_else(|| from_transport_headers(extensions))
        .filter(|c| !c.as_str().is_empty())
}

/// Typed credential bound directly to the call context.
fn from_context(extensions: &Extensions) -> Option<ApiCredential> {
    extensions.get::<ApiCredential>().cloned()
}

/// Typed credential riding inside the forwarded HTTP request parts.
fn from_request_parts(extensions: &Extensions) -> Option<ApiCredential> {
    extensions
        .get::<Parts>()
        .and_then(|parts| parts.extensions.get::<ApiCredential>())
        .cloned()
}

/// Re-parse the transport headers with the interceptor's rules.
fn from_transport_headers(extensions: &Extensions) -> Option<ApiCredential> {
    let headers = extensions
        .get::<HeaderMap>()
        .or_else(|| extensions.get::<Parts>().map(|parts| &parts.headers))?;
    credential_from_headers(headers)
}
