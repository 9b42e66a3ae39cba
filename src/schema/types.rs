//! Input/Output Type (spec.md §3) — the typed representation of schema
//! entities shared by the type registry (C1) and the variable coercer (C3).

use std::{fmt, sync::Arc};

use indexmap::IndexMap;

use crate::{name::Name, resolver::Resolver, value::Value};

/// The five built-in scalars (spec.md §3 "ScalarType").
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ScalarKind {
    /// `Int`: a signed 32-bit integer.
    Int,
    /// `Float`: an IEEE-754 double.
    Float,
    /// `String`: a Unicode string.
    String,
    /// `Boolean`.
    Boolean,
    /// `ID`: serialized as a string; accepts strings and integers as input.
    Id,
}

impl ScalarKind {
    /// The scalar's name, as it appears in the type registry and in error
    /// messages.
    pub fn name(self) -> &'static str {
        match self {
            Self::Int => "Int",
            Self::Float => "Float",
            Self::String => "String",
            Self::Boolean => "Boolean",
            Self::Id => "ID",
        }
    }
}

/// `ScalarType { name, description }` (spec.md §3).
#[derive(Clone, Debug)]
pub struct ScalarType {
    /// Which of the five built-ins this is.
    pub kind: ScalarKind,
    /// Human-readable description, if any.
    pub description: Option<String>,
}

impl ScalarType {
    /// Constructs a [`ScalarType`] with no description.
    pub fn new(kind: ScalarKind) -> Self {
        Self {
            kind,
            description: None,
        }
    }

    /// The scalar's name.
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }
}

/// Whether an enum member/field is deprecated, with an optional reason
/// (SPEC_FULL.md ambient-stack note: carried as metadata, never inspected by
/// execution — introspection is out of scope per spec.md §1).
#[derive(Clone, Debug, Eq, PartialEq, Default)]
pub enum DeprecationStatus {
    /// Not deprecated.
    #[default]
    Current,
    /// Deprecated, with an optional human-readable reason.
    Deprecated(Option<String>),
}

/// One member of an [`EnumType`].
#[derive(Clone, Debug)]
pub struct EnumValue {
    /// The member's name, as it appears in queries and variables.
    pub name: Name,
    /// Human-readable description, if any.
    pub description: Option<String>,
    /// Deprecation metadata.
    pub deprecation: DeprecationStatus,
}

/// `EnumType { name, description, members }` (spec.md §3).
#[derive(Clone, Debug)]
pub struct EnumType {
    /// The type's name.
    pub name: Name,
    /// Human-readable description, if any.
    pub description: Option<String>,
    /// Declared members, in declaration order.
    pub values: IndexMap<Name, EnumValue>,
}

impl EnumType {
    /// Whether `member` is a declared value of this enum.
    pub fn contains(&self, member: &str) -> bool {
        self.values.contains_key(member)
    }
}

/// `InputField { type, defaultValue }` (spec.md §3).
#[derive(Clone, Debug)]
pub struct InputField {
    /// The field's declared type.
    pub input_type: InputType,
    /// The default literal, if any, used when the field/variable is absent.
    pub default_value: Option<Value>,
    /// Human-readable description, if any.
    pub description: Option<String>,
}

impl InputField {
    /// Constructs a required [`InputField`] with no default and no description.
    pub fn new(input_type: InputType) -> Self {
        Self {
            input_type,
            default_value: None,
            description: None,
        }
    }

    /// Sets this field's default value.
    pub fn with_default(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }
}

/// `InputObjectType { name, description, fields }` (spec.md §3).
#[derive(Clone, Debug)]
pub struct InputObjectType {
    /// The type's name.
    pub name: Name,
    /// Human-readable description, if any.
    pub description: Option<String>,
    /// Declared fields, in declaration order.
    pub fields: IndexMap<Name, InputField>,
}

/// Recursive tagged union of input types (spec.md §3 "Input Type").
#[derive(Clone, Debug)]
pub enum InputType {
    /// A built-in scalar.
    Scalar(Arc<ScalarType>),
    /// A declared enum.
    Enum(Arc<EnumType>),
    /// A declared input object.
    InputObject(Arc<InputObjectType>),
    /// `[T]`.
    List(Box<InputType>),
    /// `T!`. Invariant (spec.md §3): cannot wrap another `NonNull`.
    NonNull(Box<InputType>),
}

impl InputType {
    /// Wraps this type in `NonNull`.
    ///
    /// # Panics
    /// If `self` is already `NonNull` (spec.md §3: "cannot wrap another NonNull").
    pub fn non_null(self) -> Self {
        assert!(
            !matches!(self, Self::NonNull(_)),
            "NonNull cannot wrap another NonNull"
        );
        Self::NonNull(Box::new(self))
    }

    /// Wraps this type in `List`.
    pub fn list(self) -> Self {
        Self::List(Box::new(self))
    }

    /// Whether this type is `NonNull`.
    pub fn is_non_null(&self) -> bool {
        matches!(self, Self::NonNull(_))
    }

    /// The innermost named type, unwrapping any `List`/`NonNull` layers.
    pub fn innermost_name(&self) -> &str {
        match self {
            Self::Scalar(s) => s.name(),
            Self::Enum(e) => e.name.as_str(),
            Self::InputObject(o) => o.name.as_str(),
            Self::List(t) | Self::NonNull(t) => t.innermost_name(),
        }
    }
}

impl fmt::Display for InputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(s) => write!(f, "{}", s.name()),
            Self::Enum(e) => write!(f, "{}", e.name),
            Self::InputObject(o) => write!(f, "{}", o.name),
            Self::List(t) => write!(f, "[{t}]"),
            Self::NonNull(t) => write!(f, "{t}!"),
        }
    }
}

impl<Ctx> fmt::Display for OutputType<Ctx> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(s) => write!(f, "{}", s.name()),
            Self::Enum(e) => write!(f, "{}", e.name),
            Self::Object(o) => write!(f, "{}", o.name),
            Self::List(t) => write!(f, "[{t}]"),
            Self::NonNull(t) => write!(f, "{t}!"),
        }
    }
}

/// Coerced argument values handed to a resolver (spec.md §4.3.2 output,
/// SPEC_FULL.md "`Arguments` convenience accessor").
#[derive(Clone, Debug, Default)]
pub struct ArgumentValues {
    values: IndexMap<Name, Value>,
}

impl ArgumentValues {
    /// Wraps an already-coerced map of argument values.
    pub fn new(values: IndexMap<Name, Value>) -> Self {
        Self { values }
    }

    /// Looks up an argument's coerced value by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Looks up an argument as an `i32`, if present and an `Int`.
    pub fn get_i32(&self, name: &str) -> Option<i32> {
        self.get(name).and_then(Value::as_int)
    }

    /// Looks up an argument as an `f64`, if present and a `Float`.
    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_float)
    }

    /// Looks up an argument as a `&str`, if present and a `String`/`Enum`.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    /// Looks up an argument as a `bool`, if present and a `Boolean`.
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_bool)
    }
}

/// `OutputField { type, arguments, resolve }` (spec.md §3).
pub struct OutputField<Ctx> {
    /// The field's declared return type.
    pub output_type: OutputType<Ctx>,
    /// Declared arguments, in declaration order.
    pub arguments: IndexMap<Name, InputField>,
    /// Deprecation metadata.
    pub deprecation: DeprecationStatus,
    /// Human-readable description, if any.
    pub description: Option<String>,
    /// This field's resolver.
    pub resolve: Box<dyn Resolver<Ctx>>,
}

/// `ObjectType { name, description, fields }` (spec.md §3).
pub struct ObjectType<Ctx> {
    /// The type's name.
    pub name: Name,
    /// Human-readable description, if any.
    pub description: Option<String>,
    /// Declared fields, in declaration order. Does not include the implicit
    /// `__typename` meta-field (SPEC_FULL.md); that is synthesized by the
    /// executor for every object type.
    pub fields: IndexMap<Name, OutputField<Ctx>>,
}

/// Recursive tagged union of output types (spec.md §3 "Output Type").
pub enum OutputType<Ctx> {
    /// A built-in scalar.
    Scalar(Arc<ScalarType>),
    /// A declared enum.
    Enum(Arc<EnumType>),
    /// A declared object type.
    Object(Arc<ObjectType<Ctx>>),
    /// `[T]`.
    List(Box<OutputType<Ctx>>),
    /// `T!`.
    NonNull(Box<OutputType<Ctx>>),
}

impl<Ctx> Clone for OutputType<Ctx> {
    fn clone(&self) -> Self {
        match self {
            Self::Scalar(s) => Self::Scalar(Arc::clone(s)),
            Self::Enum(e) => Self::Enum(Arc::clone(e)),
            Self::Object(o) => Self::Object(Arc::clone(o)),
            Self::List(t) => Self::List(t.clone()),
            Self::NonNull(t) => Self::NonNull(t.clone()),
        }
    }
}

impl<Ctx> OutputType<Ctx> {
    /// Wraps this type in `NonNull`.
    ///
    /// # Panics
    /// If `self` is already `NonNull`.
    pub fn non_null(self) -> Self {
        assert!(
            !matches!(self, Self::NonNull(_)),
            "NonNull cannot wrap another NonNull"
        );
        Self::NonNull(Box::new(self))
    }

    /// Wraps this type in `List`.
    pub fn list(self) -> Self {
        Self::List(Box::new(self))
    }

    /// Whether this type is `NonNull`.
    pub fn is_non_null(&self) -> bool {
        matches!(self, Self::NonNull(_))
    }

    /// The innermost named type, unwrapping any `List`/`NonNull` layers.
    pub fn innermost_name(&self) -> &str {
        match self {
            Self::Scalar(s) => s.name(),
            Self::Enum(e) => e.name.as_str(),
            Self::Object(o) => o.name.as_str(),
            Self::List(t) | Self::NonNull(t) => t.innermost_name(),
        }
    }
}
