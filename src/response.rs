//! The request/response envelope (spec.md §6): `{ data, errors }`, and the
//! wire shape of a single error.

use serde::{ser::SerializeStruct, Serialize, Serializer};

use crate::{
    error::GraphQLError,
    executor::{PathSegment, RecordedError},
    value::Value,
};

/// One error in a response's `errors` array (spec.md §6/§7).
///
/// Carries no `locations` — this engine consumes an already-parsed AST
/// (spec.md §1 Non-goals: parsing is out of scope) and has no source text
/// to point into.
#[derive(Clone, Debug, PartialEq)]
pub struct ResponseError {
    /// Human-readable message.
    pub message: String,
    /// Root-to-leaf path of the field that produced this error, empty for
    /// request-level errors raised before execution began.
    pub path: Vec<PathSegment>,
}

impl ResponseError {
    /// A request-level error: no path, since no field was ever entered.
    fn request_level(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: Vec::new(),
        }
    }
}

impl From<RecordedError> for ResponseError {
    fn from(e: RecordedError) -> Self {
        Self {
            message: e.error.message().to_owned(),
            path: e.path,
        }
    }
}

impl From<GraphQLError> for ResponseError {
    fn from(e: GraphQLError) -> Self {
        Self::request_level(e.to_string())
    }
}

impl Serialize for ResponseError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Error", 2)?;
        state.serialize_field("message", &self.message)?;
        if !self.path.is_empty() {
            state.serialize_field("path", &self.path)?;
        } else {
            state.skip_field("path")?;
        }
        state.end()
    }
}

impl Serialize for PathSegment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Field(name) => serializer.serialize_str(name),
            Self::Index(i) => serializer.serialize_u64(*i as u64),
        }
    }
}

/// The top-level response (spec.md §6): `data` is present (possibly `null`)
/// whenever execution began, and absent entirely when a request-level error
/// aborted before any field was resolved.
#[derive(Clone, Debug, PartialEq)]
pub struct Response {
    /// The resolved `data`, if execution was attempted.
    pub data: Option<Value>,
    /// Accumulated errors, in the order they were recorded.
    pub errors: Vec<ResponseError>,
}

impl Response {
    /// A response for a request that aborted before execution began
    /// (spec.md §7 "request-level" errors): no `data` key at all.
    pub fn request_error(error: GraphQLError) -> Self {
        Self {
            data: None,
            errors: vec![error.into()],
        }
    }

    /// A response for a request that executed to completion (successfully
    /// or with field-level errors along the way).
    pub fn executed(data: Value, errors: Vec<RecordedError>) -> Self {
        Self {
            data: Some(data),
            errors: errors.into_iter().map(ResponseError::from).collect(),
        }
    }
}

impl Serialize for Response {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Response", 2)?;
        match &self.data {
            Some(data) => state.serialize_field("data", data)?,
            None => state.skip_field("data")?,
        }
        if !self.errors.is_empty() {
            state.serialize_field("errors", &self.errors)?;
        } else {
            state.skip_field("errors")?;
        }
        state.end()
    }
}
