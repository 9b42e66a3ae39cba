//! The three error tiers of spec.md §7: construction-time (C1), request-level
//! (C3) and field-level (C4).

use std::fmt;

use crate::{name::Name, value::Value};

/// Construction-time error: the type registry (C1) could not be built.
#[derive(Clone, Debug, Eq, PartialEq, derive_more::Display, derive_more::Error)]
pub enum SchemaError {
    /// Two distinct type definitions share a name.
    #[display("duplicate type name: {_0}")]
    DuplicateName(#[error(not(source))] Name),
}

/// Request-level error produced by variable/argument coercion (C3, spec.md §4.3).
///
/// Coercion is all-or-nothing: any single failure aborts the whole call.
#[derive(Clone, Debug, Eq, PartialEq, derive_more::Display, derive_more::Error)]
pub enum CoercionError {
    /// A non-null variable or input field had no value and no default.
    #[display("missing required value for \"{name}\"")]
    MissingRequired {
        /// Name of the missing variable or input field.
        name: Name,
    },

    /// A scalar did not accept the shape of the raw value it was given.
    #[display("value of scalar type \"{expected}\" expected, found incompatible value")]
    ScalarMismatch {
        /// Scalar type name (`Int`, `Float`, `String`, `Boolean`, `ID`).
        expected: Name,
    },

    /// An object literal carried a key not declared on the input object type.
    #[display("unknown field \"{field}\" for input object \"{type_name}\"")]
    UnknownField {
        /// Name of the input object type.
        type_name: Name,
        /// The undeclared key found in the raw value.
        field: String,
    },

    /// A raw value's shape did not match the expected type at all.
    #[display("value of type \"{expected}\" expected, found incompatible value")]
    TypeMismatch {
        /// The expected type, rendered as text (e.g. `[Int!]!`).
        expected: String,
    },

    /// An explicit `null` (or a resolver-yielded `Null`-producing coercion)
    /// was found where a `NonNull` type requires a value.
    #[display("value of non-null type \"{type_name}\" must not be null")]
    NonNullViolation {
        /// The non-null type, rendered as text (e.g. `Int!`).
        type_name: String,
    },
}

/// Field-level error (C4, spec.md §4.4.6): one per originating point, value
/// becomes `Null` and propagates per the NonNull rules.
///
/// A human-readable message plus an optional structured `extensions`
/// payload. Converts from anything `Display` so resolver bodies can use `?`
/// with ordinary Rust error types.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldError {
    message: String,
    extensions: Value,
}

impl FieldError {
    /// Constructs a [`FieldError`] with no extensions.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            extensions: Value::Null,
        }
    }

    /// Constructs a [`FieldError`] carrying additional structured data.
    pub fn with_extensions(message: impl Into<String>, extensions: Value) -> Self {
        Self {
            message: message.into(),
            extensions,
        }
    }

    /// The error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The `extensions` payload, if any (`Value::Null` when absent).
    pub fn extensions(&self) -> &Value {
        &self.extensions
    }
}

impl<T: fmt::Display> From<T> for FieldError {
    fn from(e: T) -> Self {
        Self::new(e.to_string())
    }
}

/// Top-level error that aborts execution before any field is resolved
/// (spec.md §6/§7: `data` is absent from the response).
#[derive(Clone, Debug, Eq, PartialEq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum GraphQLError {
    /// Variable coercion (spec.md §4.3.1) failed.
    #[display("error coercing variables: {_0}")]
    VariableCoercion(CoercionError),

    /// The requested operation name does not exist in the document, or the
    /// document contains multiple operations and none/an ambiguous one was
    /// named.
    #[display("{_0}")]
    UnknownOperation(#[error(not(source))] String),

    /// A `mutation` was requested against a schema with no mutation root
    /// type (spec.md §3: `Schema.mutation` is optional).
    #[display("schema does not define a mutation type")]
    NoMutationType,
}
