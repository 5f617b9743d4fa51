use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Output of a single GraphQL operation, as produced by a [`crate::GraphQLExecutor`].
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct ExecutionResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<GraphQLError>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Map<String, Value>>,
}

impl ExecutionResult {
    pub fn from_data(data: Value) -> Self {
        ExecutionResult {
            data: Some(data),
            ..Default::default()
        }
    }

    pub fn from_error(error: impl Into<GraphQLError>) -> Self {
        ExecutionResult {
            errors: Some(vec![error.into()]),
            ..Default::default()
        }
    }

    /// `true` when the result carries at least one GraphQL error.
    pub fn has_errors(&self) -> bool {
        self.errors.as_ref().is_some_and(|errors| !errors.is_empty())
    }

    /// Sets `extensions[key]`, creating the extensions map if needed.
    pub fn insert_extension(&mut self, key: impl Into<String>, value: Value) {
        self.extensions
            .get_or_insert_with(Map::new)
            .insert(key.into(), value);
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GraphQLError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locations: Option<Vec<GraphQLErrorLocation>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<GraphQLErrorPathSegment>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Map<String, Value>>,
}

impl From<String> for GraphQLError {
    fn from(message: String) -> Self {
        GraphQLError {
            message,
            locations: None,
            path: None,
            extensions: None,
        }
    }
}

impl From<&str> for GraphQLError {
    fn from(message: &str) -> Self {
        message.to_string().into()
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct GraphQLErrorLocation {
    pub line: usize,
    pub column: usize,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum GraphQLErrorPathSegment {
    Index(usize),
    String(String),
}
