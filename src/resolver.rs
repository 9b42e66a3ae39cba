//! The `Resolver` capability (spec.md §3 "Resolver", §5 effect polymorphism).
//!
//! A resolver is "a capability that, given `(parent value, arguments,
//! context)`, returns an output value (possibly asynchronously) or signals
//! failure". Rather than branching the executor on a sync/async policy enum,
//! every resolver produces a boxed future: a purely synchronous resolver
//! just returns one that is immediately ready, and the executor's join logic
//! (§5) treats both uniformly while still preserving response-map order.
//!
//! The `parent` value is the already-resolved value of the enclosing field
//! (`Value::Null` at the query/mutation root); object-typed fields return a
//! `Value::Object` that becomes the `parent` for their own sub-selection,
//! so a tree of resolvers never needs a parallel tree of Rust types to
//! thread typed parent data through (spec.md §4.4.3 "Selection resolution
//! is recursive in the value, not in the Rust type").

use std::{future::Future, pin::Pin};

use crate::{error::FieldError, schema::types::ArgumentValues, value::Value};

/// The result of resolving a single field: either its value or a field-level
/// error (spec.md §4.4.6).
pub type FieldResult = Result<Value, FieldError>;

/// A resolver's future, borrowing from the call for its lifetime.
pub type FieldFuture<'a> = Pin<Box<dyn Future<Output = FieldResult> + Send + 'a>>;

/// A field's resolution capability (spec.md §3 "Resolver").
///
/// Implemented for synchronous closures via [`sync_fn`] and for
/// already-async ones via [`async_fn`]; schema authors normally construct
/// an `OutputField` with one of those rather than implementing this trait
/// directly.
pub trait Resolver<Ctx>: Send + Sync {
    /// Resolves this field's value given its parent's resolved value, its
    /// coerced arguments, and the request context.
    fn resolve<'a>(&'a self, parent: &'a Value, args: &'a ArgumentValues, ctx: &'a Ctx) -> FieldFuture<'a>;
}

struct SyncResolver<F>(F);

impl<Ctx, F> Resolver<Ctx> for SyncResolver<F>
where
    F: Fn(&Value, &ArgumentValues, &Ctx) -> FieldResult + Send + Sync,
{
    fn resolve<'a>(&'a self, parent: &'a Value, args: &'a ArgumentValues, ctx: &'a Ctx) -> FieldFuture<'a> {
        Box::pin(std::future::ready((self.0)(parent, args, ctx)))
    }
}

struct AsyncResolver<F>(F);

impl<Ctx, F, Fut> Resolver<Ctx> for AsyncResolver<F>
where
    F: Fn(&Value, &ArgumentValues, &Ctx) -> Fut + Send + Sync,
    Fut: Future<Output = FieldResult> + Send,
{
    fn resolve<'a>(&'a self, parent: &'a Value, args: &'a ArgumentValues, ctx: &'a Ctx) -> FieldFuture<'a> {
        Box::pin((self.0)(parent, args, ctx))
    }
}

/// Wraps a synchronous closure as a [`Resolver`] (spec.md §5 policy 1).
pub fn sync_fn<Ctx, F>(f: F) -> Box<dyn Resolver<Ctx>>
where
    Ctx: 'static,
    F: Fn(&Value, &ArgumentValues, &Ctx) -> FieldResult + Send + Sync + 'static,
{
    Box::new(SyncResolver(f))
}

/// Wraps an async closure (returning a `Future<Output = FieldResult>`) as a
/// [`Resolver`] (spec.md §5 policy 2).
pub fn async_fn<Ctx, F, Fut>(f: F) -> Box<dyn Resolver<Ctx>>
where
    Ctx: 'static,
    F: Fn(&Value, &ArgumentValues, &Ctx) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = FieldResult> + Send + 'static,
{
    Box::new(AsyncResolver(f))
}
