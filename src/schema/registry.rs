//! The Type Registry (C1, spec.md §4.1).

use std::sync::{Arc, OnceLock};

use indexmap::IndexMap;

use crate::{
    error::SchemaError,
    name::Name,
    schema::types::{InputType, OutputType, ScalarKind, ScalarType},
};

macro_rules! builtin_scalar {
    ($fn_name:ident, $kind:expr) => {
        /// Shared instance of this built-in scalar, so schema authors that
        /// reuse it don't trip the duplicate-name check in [`build_registry`].
        pub fn $fn_name() -> Arc<ScalarType> {
            static CELL: OnceLock<Arc<ScalarType>> = OnceLock::new();
            Arc::clone(CELL.get_or_init(|| Arc::new(ScalarType::new($kind))))
        }
    };
}

builtin_scalar!(int_scalar, ScalarKind::Int);
builtin_scalar!(float_scalar, ScalarKind::Float);
builtin_scalar!(string_scalar, ScalarKind::String);
builtin_scalar!(boolean_scalar, ScalarKind::Boolean);
builtin_scalar!(id_scalar, ScalarKind::Id);

/// One entry of the type registry: any schema entity, regardless of whether
/// it was reached via the input-type graph or the output-type graph (they
/// share one namespace, spec.md §3 "Schema").
#[derive(Clone)]
enum RegisteredType<Ctx> {
    Scalar(Arc<ScalarType>),
    Enum(Arc<crate::schema::types::EnumType>),
    InputObject(Arc<crate::schema::types::InputObjectType>),
    Object(Arc<crate::schema::types::ObjectType<Ctx>>),
}

impl<Ctx> RegisteredType<Ctx> {
    /// Identity comparison: the same underlying `Arc` allocation.
    fn same_definition_as(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Scalar(a), Self::Scalar(b)) => Arc::ptr_eq(a, b),
            (Self::Enum(a), Self::Enum(b)) => Arc::ptr_eq(a, b),
            (Self::InputObject(a), Self::InputObject(b)) => Arc::ptr_eq(a, b),
            (Self::Object(a), Self::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// The immutable `Map<Name, Type>` derived from a schema's roots (C1, spec.md §4.1).
pub struct TypeRegistry<Ctx> {
    types: IndexMap<Name, RegisteredType<Ctx>>,
}

impl<Ctx> TypeRegistry<Ctx> {
    /// Whether a type with this name was reached from the roots.
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Number of distinct types in the registry.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

struct Builder<Ctx> {
    types: IndexMap<Name, RegisteredType<Ctx>>,
}

impl<Ctx> Builder<Ctx> {
    fn insert(&mut self, name: Name, entry: RegisteredType<Ctx>) -> Result<bool, SchemaError> {
        match self.types.get(&name) {
            Some(existing) if existing.same_definition_as(&entry) => Ok(false),
            Some(_) => Err(SchemaError::DuplicateName(name)),
            None => {
                self.types.insert(name, entry);
                Ok(true)
            }
        }
    }

    fn visit_input_type(&mut self, ty: &InputType) -> Result<(), SchemaError> {
        match ty {
            InputType::List(inner) | InputType::NonNull(inner) => self.visit_input_type(inner),
            InputType::Scalar(s) => {
                let name = Name::new(s.name()).expect("built-in scalar names are valid");
                self.insert(name, RegisteredType::Scalar(Arc::clone(s)))?;
                Ok(())
            }
            InputType::Enum(e) => {
                let fresh = self.insert(e.name.clone(), RegisteredType::Enum(Arc::clone(e)))?;
                let _ = fresh; // enums have no nested types to recurse into
                Ok(())
            }
            InputType::InputObject(o) => {
                let fresh =
                    self.insert(o.name.clone(), RegisteredType::InputObject(Arc::clone(o)))?;
                if fresh {
                    for field in o.fields.values() {
                        self.visit_input_type(&field.input_type)?;
                    }
                }
                Ok(())
            }
        }
    }

    fn visit_output_type(&mut self, ty: &OutputType<Ctx>) -> Result<(), SchemaError> {
        match ty {
            OutputType::List(inner) | OutputType::NonNull(inner) => self.visit_output_type(inner),
            OutputType::Scalar(s) => {
                let name = Name::new(s.name()).expect("built-in scalar names are valid");
                self.insert(name, RegisteredType::Scalar(Arc::clone(s)))?;
                Ok(())
            }
            OutputType::Enum(e) => {
                self.insert(e.name.clone(), RegisteredType::Enum(Arc::clone(e)))?;
                Ok(())
            }
            OutputType::Object(o) => {
                let fresh = self.insert(o.name.clone(), RegisteredType::Object(Arc::clone(o)))?;
                if fresh {
                    for field in o.fields.values() {
                        self.visit_output_type(&field.output_type)?;
                        for arg in field.arguments.values() {
                            self.visit_input_type(&arg.input_type)?;
                        }
                    }
                }
                Ok(())
            }
        }
    }
}

/// Builds the type registry from a schema's roots (spec.md §4.1):
/// depth-first, visiting object-field return types, object-field argument
/// types, and input-object field types; revisiting a known name is a no-op.
///
/// Fails with [`SchemaError::DuplicateName`] if two distinct type
/// definitions claim the same name.
pub fn build_registry<Ctx>(
    query: &Arc<crate::schema::types::ObjectType<Ctx>>,
    mutation: Option<&Arc<crate::schema::types::ObjectType<Ctx>>>,
) -> Result<TypeRegistry<Ctx>, SchemaError> {
    let mut builder = Builder {
        types: IndexMap::new(),
    };
    builder.visit_output_type(&OutputType::Object(Arc::clone(query)))?;
    if let Some(mutation) = mutation {
        builder.visit_output_type(&OutputType::Object(Arc::clone(mutation)))?;
    }
    Ok(TypeRegistry {
        types: builder.types,
    })
}
