use http::{
    header::{CONNECTION, CONTENT_TYPE, UPGRADE},
    HeaderMap, HeaderName, HeaderValue, Method,
};
use mediatype::{names, MediaType, Name};
use tracing::trace;

use crate::error::AdapterError;

pub const APPLICATION_JSON: &str = "application/json";

pub static APPLICATION_JSON_HEADER_VALUE: HeaderValue = HeaderValue::from_static(APPLICATION_JSON);

const GRAPHQL: Name = Name::new_unchecked("graphql");
const WEBSOCKET: &str = "websocket";
const UPGRADE_TOKEN: &str = "upgrade";

/// Media types accepted on POST bodies without a `query` query-string parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestContentType {
    /// `application/json`: a `{query, operationName, variables}` document.
    Json,
    /// `application/graphql`: the body is the query text.
    GraphQL,
}

impl RequestContentType {
    fn from_media_type(media_type: &MediaType) -> Option<Self> {
        if media_type.ty != names::APPLICATION || media_type.suffix.is_some() {
            return None;
        }

        if media_type.subty == names::JSON {
            Some(RequestContentType::Json)
        } else if media_type.subty == GRAPHQL {
            Some(RequestContentType::GraphQL)
        } else {
            None
        }
    }

    /// Reads and classifies the `Content-Type` header. Parameters such as `charset` are
    /// ignored and names compare case-insensitively.
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, AdapterError> {
        let raw = match headers.get(CONTENT_TYPE) {
            Some(value) => value
                .to_str()
                .map_err(|_| {
                    AdapterError::InvalidContentTypeHeader(
                        String::from_utf8_lossy(value.as_bytes()).into_owned(),
                    )
                })?,
            None => return Err(AdapterError::InvalidContentTypeHeader(String::new())),
        };

        let media_type = MediaType::parse(raw).map_err(|err| {
            trace!("failed to parse Content-Type header '{}': {}", raw, err);
            AdapterError::InvalidContentTypeHeader(raw.to_string())
        })?;

        RequestContentType::from_media_type(&media_type).ok_or(AdapterError::UnsupportedMediaType)
    }
}

/// Whether the request is a WebSocket handshake: a GET carrying `Connection: upgrade` and
/// `Upgrade: websocket`. Those are left to other handlers.
pub fn is_websocket_upgrade(method: &Method, headers: &HeaderMap) -> bool {
    *method == Method::GET
        && header_has_token(headers, CONNECTION, UPGRADE_TOKEN)
        && header_has_token(headers, UPGRADE, WEBSOCKET)
}

fn header_has_token(headers: &HeaderMap, name: HeaderName, token: &str) -> bool {
    headers
        .get_all(name)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .any(|item| item.trim().eq_ignore_ascii_case(token))
}

/// Segment-wise, case-insensitive prefix match: `/graphql` matches `/graphql` and
/// `/graphql/anything`, but not `/graphqlx`.
pub fn path_matches_endpoint(path: &str, endpoint: &str) -> bool {
    let endpoint = endpoint.trim_end_matches('/');
    if endpoint.is_empty() {
        return true;
    }

    match path.get(..endpoint.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(endpoint) => {
            let rest = &path[endpoint.len()..];
            rest.is_empty() || rest.starts_with('/')
        }
        _ => false,
    }
}
