//! `Schema` (spec.md §3): `{ query, mutation }`, plus the derived,
//! ready-to-execute bundle of schema + type registry.

use std::sync::Arc;

use crate::{
    error::SchemaError,
    schema::{
        registry::{build_registry, TypeRegistry},
        types::ObjectType,
    },
};

/// `Schema { query: ObjectType, mutation: Optional<ObjectType> }` (spec.md §3).
pub struct Schema<Ctx> {
    /// The query root object type.
    pub query: Arc<ObjectType<Ctx>>,
    /// The mutation root object type, if this schema supports mutations.
    pub mutation: Option<Arc<ObjectType<Ctx>>>,
}

impl<Ctx> Schema<Ctx> {
    /// Constructs a new schema from its root types.
    pub fn new(query: Arc<ObjectType<Ctx>>, mutation: Option<Arc<ObjectType<Ctx>>>) -> Self {
        Self { query, mutation }
    }
}

/// A [`Schema`] together with its derived [`TypeRegistry`] (C1), immutable
/// and safe to share across requests (spec.md §4.1 "Contract").
pub struct ExecutableSchema<Ctx> {
    /// The root query/mutation types.
    pub schema: Schema<Ctx>,
    /// The transitive closure of types reachable from the roots.
    pub registry: TypeRegistry<Ctx>,
}

impl<Ctx> ExecutableSchema<Ctx> {
    /// Builds the type registry from `schema`'s roots and bundles the two
    /// together. Fails per spec.md §4.1 if two distinct type definitions
    /// share a name.
    pub fn build(schema: Schema<Ctx>) -> Result<Self, SchemaError> {
        let registry = build_registry(&schema.query, schema.mutation.as_ref())?;
        Ok(Self { schema, registry })
    }
}
