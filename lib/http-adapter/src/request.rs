use http::{request::Parts, Method};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{trace, warn};
use url::form_urlencoded;

use crate::{error::AdapterError, header::RequestContentType};

const QUERY_KEY: &str = "query";
const VARIABLES_KEY: &str = "variables";
const OPERATION_NAME_KEY: &str = "operationName";

/// The triple needed to execute one GraphQL operation.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GraphQLRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<Map<String, Value>>,
}

impl GraphQLRequest {
    pub fn from_query(query: impl Into<String>) -> Self {
        GraphQLRequest {
            query: Some(query.into()),
            ..Default::default()
        }
    }

    /// Reads `query`, `variables` and `operationName` from a URL query string. Key names
    /// compare case-insensitively and the first occurrence of a repeated key wins. An empty
    /// `variables` value counts as absent.
    pub fn from_query_string(query_string: &str) -> Result<Self, AdapterError> {
        let mut query: Option<String> = None;
        let mut variables: Option<String> = None;
        let mut operation_name: Option<String> = None;

        for (key, value) in form_urlencoded::parse(query_string.as_bytes()) {
            let slot = if key.eq_ignore_ascii_case(QUERY_KEY) {
                &mut query
            } else if key.eq_ignore_ascii_case(VARIABLES_KEY) {
                &mut variables
            } else if key.eq_ignore_ascii_case(OPERATION_NAME_KEY) {
                &mut operation_name
            } else {
                continue;
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }

        let variables = match variables.as_deref() {
            Some(raw) if !raw.is_empty() => Some(
                sonic_rs::from_str::<Map<String, Value>>(raw).map_err(|err| {
                    warn!("Failed to parse variables from query string: {}", err);
                    AdapterError::FailedToParseVariables(err)
                })?,
            ),
            _ => None,
        };

        Ok(GraphQLRequest {
            query,
            operation_name,
            variables,
        })
    }

    /// Decodes an `application/json` request body.
    pub fn from_json_slice(body: &[u8]) -> Result<Self, AdapterError> {
        sonic_rs::from_slice::<GraphQLRequest>(body).map_err(|err| {
            warn!("Failed to parse body: {}", err);
            AdapterError::FailedToParseBody(err)
        })
    }
}

fn query_string_has_query_param(query_string: &str) -> bool {
    form_urlencoded::parse(query_string.as_bytes())
        .any(|(key, _)| key.eq_ignore_ascii_case(QUERY_KEY))
}

/// Where the GraphQL request lives in an incoming HTTP request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestShape<'req> {
    /// GET, or POST carrying a `query` query-string parameter.
    QueryString(&'req str),
    /// POST with an `application/json` body.
    Json,
    /// POST with an `application/graphql` body.
    GraphQL,
    /// Any other method. Nothing is extracted.
    Empty,
}

impl<'req> RequestShape<'req> {
    pub fn detect(parts: &'req Parts) -> Result<Self, AdapterError> {
        let query_string = parts.uri.query().unwrap_or_default();

        let shape = match parts.method {
            Method::GET => RequestShape::QueryString(query_string),
            Method::POST if query_string_has_query_param(query_string) => {
                RequestShape::QueryString(query_string)
            }
            Method::POST => match RequestContentType::from_headers(&parts.headers)? {
                RequestContentType::Json => RequestShape::Json,
                RequestContentType::GraphQL => RequestShape::GraphQL,
            },
            _ => RequestShape::Empty,
        };

        trace!("detected request shape {:?} for {} request", shape, parts.method);

        Ok(shape)
    }
}
