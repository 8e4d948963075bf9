//! HTTP method/path to domain action/resource normalization

use serde::{Deserialize, Serialize};

use crate::error::{AuthzError, Result};
use crate::pattern::ResourceId;
use crate::types::Action;

/// Maps an HTTP method onto a domain action, case-insensitively.
///
/// `GET` reads, `POST`/`PUT`/`PATCH` write, `DELETE` deletes. Anything else
/// fails with `UnsupportedMethod` naming the method as given.
pub fn map_action(method: &str) -> Result<Action> {
    match method.to_ascii_uppercase().as_str() {
        "GET" => Ok(Action::Read),
        "POST" | "PUT" | "PATCH" => Ok(Action::Write),
        "DELETE" => Ok(Action::Delete),
        _ => Err(AuthzError::UnsupportedMethod(method.to_string())),
    }
}

/// Maps a request path onto a canonical resource identifier.
///
/// Strips leading slashes, then any query string, then trailing slashes.
/// The root path and the empty string map to the global identifier `*`.
/// Fails with `InvalidResource` when an inner segment is empty, as in
/// `/wallets//w1`.
///
/// ```
/// use warden_authz::normalize::map_resource;
///
/// assert_eq!(map_resource("/wallets/w1/?page=2").unwrap().as_str(), "wallets/w1");
/// assert!(map_resource("/").unwrap().is_global());
/// ```
pub fn map_resource(path: &str) -> Result<ResourceId> {
    let path = path.trim_start_matches('/');
    let path = path.split_once('?').map_or(path, |(before, _)| before);
    ResourceId::new(path.trim_end_matches('/'))
}

/// A request expressed in domain vocabulary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedRequest {
    pub action: Action,
    pub resource: ResourceId,
}

/// Normalizes an HTTP method/path pair
pub fn normalize(method: &str, path: &str) -> Result<NormalizedRequest> {
    Ok(NormalizedRequest {
        action: map_action(method)?,
        resource: map_resource(path)?,
    })
}
