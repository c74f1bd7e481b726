//! Path resolution: URL path → logical service name + forwarded sub-path.

use crate::config::RoutingConfig;
use crate::error::GatewayError;

/// The routing decision for one request, derived once and immutable after.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteCandidate {
    /// The path exactly as the client sent it (kept for logging).
    pub raw_path: String,
    /// First path component after the API prefix.
    pub service_segment: String,
    /// Registry name the directory is queried with.
    pub registry_name: String,
    /// Path forwarded to the resolved endpoint.
    pub forward_path: String,
}

/// Resolve a raw request path into a route candidate.
///
/// Fails with `MalformedPath` when the path does not start with the API
/// prefix or the service segment is empty; no directory lookup happens in
/// either case.
///
/// Two URL conventions are supported at once, which is a compatibility shim
/// and not accidental duplication. The contract is: the leading segment is
/// stripped from the forwarded path iff the alias table mapped it to a
/// different registry name, or the segment carries a configured legacy
/// suffix (e.g. `auth-service`). Otherwise the full original path is
/// forwarded unchanged.
pub fn resolve_path(path: &str, config: &RoutingConfig) -> Result<RouteCandidate, GatewayError> {
    let prefix = config.api_prefix.as_str();
    let Some(rest) = path.strip_prefix(prefix) else {
        return Err(GatewayError::MalformedPath(path.to_string()));
    };

    let (segment, remainder) = match rest.split_once('/') {
        Some((segment, remainder)) => (segment, Some(remainder)),
        None => (rest, None),
    };
    if segment.is_empty() {
        return Err(GatewayError::MalformedPath(path.to_string()));
    }

    let registry_name = config
        .service_aliases
        .get(segment)
        .cloned()
        .unwrap_or_else(|| segment.to_string());

    let aliased = registry_name != segment;
    let legacy = config
        .legacy_suffixes
        .iter()
        .any(|suffix| segment.ends_with(suffix.as_str()));

    let forward_path = if aliased || legacy {
        match remainder {
            Some(remainder) if !remainder.is_empty() => format!("{prefix}{remainder}"),
            _ => prefix.trim_end_matches('/').to_string(),
        }
    } else {
        path.to_string()
    };

    Ok(RouteCandidate {
        raw_path: path.to_string(),
        service_segment: segment.to_string(),
        registry_name,
        forward_path,
    })
}
