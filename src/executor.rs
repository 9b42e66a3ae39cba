//! The Selection Resolver (C4, spec.md §4.4): field collection, per-field
//! execution, and `NonNull`-driven null propagation.
//!
//! Field collection and value completion recurse into each other (a field's
//! completed value may itself carry a sub-selection set), so both are
//! written as boxed, explicitly recursive async functions rather than plain
//! `async fn`s, since stable Rust cannot express an `async fn` that calls
//! itself (or a sibling) indirectly without erasing its future's type.

use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
};

use futures::future::{join_all, BoxFuture, FutureExt};
use indexmap::IndexMap;
use tracing::Instrument;

use crate::{
    ast::{FieldSelection, FragmentTable, OperationType, Selection, SelectionSet},
    directives::is_selected,
    error::{CoercionError, FieldError},
    name::Name,
    schema::types::{ArgumentValues, ObjectType, OutputType, ScalarKind},
    value::{ResponseMap, Value},
    variables::coerce_argument_values,
};

/// One step of a field's response path (spec.md §4.4.6 "path").
#[derive(Clone, Debug, PartialEq)]
pub enum PathSegment {
    /// A field's response name.
    Field(String),
    /// An index into a list.
    Index(usize),
}

/// An immutable, shared linked list of [`PathSegment`]s, cheap to clone and
/// extend across `.await` points (spec.md §4.4.6). `Arc`-based rather than
/// borrowed, so a path survives being captured by a boxed `'static`-free but
/// `Send` resolver future.
#[derive(Clone, Debug, Default)]
pub struct FieldPath(Option<Arc<PathNode>>);

#[derive(Debug)]
struct PathNode {
    segment: PathSegment,
    parent: FieldPath,
}

impl FieldPath {
    /// The empty path, at the root of the response.
    pub fn root() -> Self {
        Self(None)
    }

    fn push(&self, segment: PathSegment) -> Self {
        Self(Some(Arc::new(PathNode {
            segment,
            parent: self.clone(),
        })))
    }

    fn child_field(&self, name: &str) -> Self {
        self.push(PathSegment::Field(name.to_owned()))
    }

    fn child_index(&self, index: usize) -> Self {
        self.push(PathSegment::Index(index))
    }

    /// Renders the path root-to-leaf, for the response envelope (spec.md §6).
    pub fn segments(&self) -> Vec<PathSegment> {
        let mut out = Vec::new();
        let mut cur = self.0.as_ref();
        while let Some(node) = cur {
            out.push(node.segment.clone());
            cur = node.parent.0.as_ref();
        }
        out.reverse();
        out
    }
}

/// A field-level error, tagged with the path at which it occurred
/// (spec.md §4.4.6, §7).
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedError {
    /// Root-to-leaf path of the field that produced this error.
    pub path: Vec<PathSegment>,
    /// The error itself.
    pub error: FieldError,
}

/// Result of completing one field's value against its declared type.
/// `Err(())` means a `NonNull` type resolved to null and must bubble to the
/// nearest nullable ancestor — the whole enclosing object, list, or
/// response (spec.md §4.4.5 "Null propagation").
type Completion = Result<Value, ()>;

/// Drives C4 for a single operation: field collection, argument coercion,
/// resolver invocation, and null propagation, accumulating field-level
/// errors as it goes (spec.md §4.4).
pub struct Executor<'a, Ctx> {
    fragments: &'a FragmentTable,
    variables: &'a IndexMap<Name, Value>,
    ctx: &'a Ctx,
    errors: Mutex<Vec<RecordedError>>,
}

impl<'a, Ctx> Executor<'a, Ctx>
where
    Ctx: Sync,
{
    /// Constructs an executor for one operation's variables and context.
    pub fn new(fragments: &'a FragmentTable, variables: &'a IndexMap<Name, Value>, ctx: &'a Ctx) -> Self {
        Self {
            fragments,
            variables,
            ctx,
            errors: Mutex::new(Vec::new()),
        }
    }

    /// Executes `selection_set` against `root_type`, returning the top-level
    /// `data` value (`Value::Null` if a root `NonNull` field failed) and any
    /// field-level errors accumulated along the way, in the order recorded
    /// (spec.md §6).
    pub async fn execute_operation(
        self,
        root_type: &ObjectType<Ctx>,
        selection_set: &SelectionSet,
        op_type: OperationType,
    ) -> (Value, Vec<RecordedError>) {
        let value = self
            .execute_selection_set(root_type, selection_set, FieldPath::root(), op_type, &Value::Null)
            .await
            .unwrap_or(Value::Null);
        let errors = self
            .errors
            .into_inner()
            .expect("resolvers never panic while holding this lock");
        (value, errors)
    }

    fn record_error(&self, path: &FieldPath, error: FieldError) {
        tracing::warn!(message = error.message(), "field error recorded");
        self.errors
            .lock()
            .expect("resolvers never panic while holding this lock")
            .push(RecordedError {
                path: path.segments(),
                error,
            });
    }

    /// Collects and executes one selection set against `object_type`,
    /// assembling a `ResponseMap`. Mutation root selection sets run
    /// their immediate fields strictly in order (spec.md §5); everything
    /// else — including mutation fields' own sub-selections — runs
    /// concurrently.
    ///
    /// Returns `Err(())` if any field's own declared type is `NonNull` and
    /// it resolved to null: per spec.md §4.4.5, that nulls this entire
    /// object, which the caller must itself treat as this level's
    /// completed value turning null.
    fn execute_selection_set<'f>(
        &'f self,
        object_type: &'f ObjectType<Ctx>,
        selection_set: &'f SelectionSet,
        path: FieldPath,
        op_type: OperationType,
        parent: &'f Value,
    ) -> BoxFuture<'f, Completion> {
        async move {
            let mut grouped: IndexMap<String, Vec<FieldSelection>> = IndexMap::new();
            let mut visited = HashSet::new();
            if let Err(e) = collect_fields(
                object_type.name.as_str(),
                selection_set,
                self.fragments,
                self.variables,
                &mut visited,
                &mut grouped,
            ) {
                self.record_error(&path, FieldError::new(e.to_string()));
                return Ok(Value::Null);
            }

            let completions: Vec<(String, Completion)> = match op_type {
                OperationType::Mutation => {
                    let mut out = Vec::with_capacity(grouped.len());
                    for (response_name, selections) in &grouped {
                        let completion = self
                            .execute_field(object_type, response_name, selections, &path, parent)
                            .await;
                        out.push((response_name.clone(), completion));
                    }
                    out
                }
                OperationType::Query => {
                    let response_names: Vec<String> = grouped.keys().cloned().collect();
                    let futures_iter = grouped.iter().map(|(response_name, selections)| {
                        self.execute_field(object_type, response_name, selections, &path, parent)
                    });
                    let results = join_all(futures_iter).await;
                    response_names.into_iter().zip(results).collect()
                }
            };

            let mut out = ResponseMap::with_capacity(completions.len());
            for (response_name, completion) in completions {
                match completion {
                    Ok(value) => {
                        out.insert(response_name, value);
                    }
                    Err(()) => return Err(()),
                }
            }
            Ok(Value::ResponseMap(out))
        }
        .boxed()
    }

    fn execute_field<'f>(
        &'f self,
        parent_type: &'f ObjectType<Ctx>,
        response_name: &'f str,
        selections: &'f [FieldSelection],
        path: &'f FieldPath,
        parent_value: &'f Value,
    ) -> BoxFuture<'f, Completion> {
        async move {
            let first = &selections[0];
            let field_path = path.child_field(response_name);

            if first.name.as_str() == "__typename" {
                return Ok(Value::String(parent_type.name.to_string()));
            }

            let Some(field_def) = parent_type.fields.get(first.name.as_str()) else {
                self.record_error(
                    &field_path,
                    FieldError::new(format!("field {} not resolved.", first.name)),
                );
                return Ok(Value::Null);
            };

            let args = match coerce_argument_values(&field_def.arguments, &first.arguments, self.variables) {
                Ok(values) => ArgumentValues::new(values),
                Err(e) => {
                    self.record_error(&field_path, FieldError::new(e.to_string()));
                    return self.null_or_violation(&field_def.output_type);
                }
            };

            let resolved = field_def.resolve.resolve(parent_value, &args, self.ctx).await;
            let raw_value = match resolved {
                Ok(v) => v,
                Err(e) => {
                    self.record_error(&field_path, e);
                    return self.null_or_violation(&field_def.output_type);
                }
            };

            let merged_selection_set: SelectionSet =
                selections.iter().flat_map(|s| s.selection_set.clone()).collect();

            self.complete_value(&field_def.output_type, raw_value, &field_path, &merged_selection_set)
                .await
        }
        .instrument(tracing::trace_span!("field", parent = %parent_type.name, response_name))
        .boxed()
    }

    fn null_or_violation(&self, output_type: &OutputType<Ctx>) -> Completion {
        if output_type.is_non_null() {
            Err(())
        } else {
            Ok(Value::Null)
        }
    }

    /// Completes a resolver's raw value against its declared output type
    /// (spec.md §4.4.5). Every arm other than `NonNull` always returns
    /// `Ok`; `NonNull` is the sole source of `Err(())`, produced when its
    /// inner completion is itself null.
    fn complete_value<'f>(
        &'f self,
        output_type: &'f OutputType<Ctx>,
        value: Value,
        path: &'f FieldPath,
        selection_set: &'f SelectionSet,
    ) -> BoxFuture<'f, Completion> {
        async move {
            if let OutputType::NonNull(inner) = output_type {
                return match self.complete_value(inner, value, path, selection_set).await {
                    Ok(Value::Null) | Err(()) => Err(()),
                    Ok(v) => Ok(v),
                };
            }

            if value.is_null() {
                return Ok(Value::Null);
            }

            match output_type {
                OutputType::NonNull(_) => unreachable!("handled above"),
                OutputType::Enum(_) => Ok(value),
                OutputType::Scalar(scalar) => Ok(canonicalize_scalar(scalar.kind, value)),
                OutputType::List(inner) => {
                    let Value::List(items) = value else {
                        self.record_error(
                            path,
                            FieldError::new("resolver produced a non-list value for a list field"),
                        );
                        return Ok(Value::Null);
                    };
                    let mut out = Vec::with_capacity(items.len());
                    let mut violated = false;
                    for (i, item) in items.into_iter().enumerate() {
                        let item_path = path.child_index(i);
                        match self.complete_value(inner, item, &item_path, selection_set).await {
                            Ok(v) => out.push(v),
                            Err(()) => {
                                violated = true;
                                break;
                            }
                        }
                    }
                    if violated {
                        Ok(Value::Null)
                    } else {
                        Ok(Value::List(out))
                    }
                }
                OutputType::Object(object_type) => {
                    let result = self
                        .execute_selection_set(object_type, selection_set, path.clone(), OperationType::Query, &value)
                        .await;
                    Ok(result.unwrap_or(Value::Null))
                }
            }
        }
        .boxed()
    }
}

/// Canonicalizes a resolver-returned scalar value the same way variable
/// coercion does (spec.md §4.3.2 widening rules, §9 Open Question on `ID`):
/// an `ID` resolved as an integer is rendered as its decimal string, so
/// `ID` is always a string on the wire regardless of how a resolver chose
/// to produce it.
fn canonicalize_scalar(kind: ScalarKind, value: Value) -> Value {
    match (kind, value) {
        (ScalarKind::Id, Value::Int(i)) => Value::String(i.to_string()),
        (_, value) => value,
    }
}

/// `CollectFields` (spec.md §4.4.2): expands inline fragments and fragment
/// spreads whose type condition matches `parent_type_name` (abstract types
/// are out of scope, per DESIGN.md's Open Question decision, so this is a
/// plain name match rather than a possible-types check), applies `@skip`/
/// `@include` gating, and groups selections by response name in first-seen
/// order, merging same-response-name field selections' sub-selection sets.
///
/// `visited_fragments` is shared across the whole call tree for one
/// selection set (not cloned per branch), so a fragment spread that forms a
/// cycle — directly or through another fragment — is silently dropped
/// rather than expanded again.
fn collect_fields(
    parent_type_name: &str,
    selection_set: &SelectionSet,
    fragments: &FragmentTable,
    variables: &IndexMap<Name, Value>,
    visited_fragments: &mut HashSet<Name>,
    grouped: &mut IndexMap<String, Vec<FieldSelection>>,
) -> Result<(), CoercionError> {
    for selection in selection_set {
        match selection {
            Selection::Field(field) => {
                if !is_selected(&field.directives, variables)? {
                    continue;
                }
                grouped
                    .entry(field.response_name().to_owned())
                    .or_default()
                    .push(field.clone());
            }
            Selection::InlineFragment(frag) => {
                if !is_selected(&frag.directives, variables)? {
                    continue;
                }
                let applies = match &frag.type_condition {
                    Some(condition) => condition.as_str() == parent_type_name,
                    None => true,
                };
                if applies {
                    collect_fields(
                        parent_type_name,
                        &frag.selection_set,
                        fragments,
                        variables,
                        visited_fragments,
                        grouped,
                    )?;
                }
            }
            Selection::FragmentSpread(spread) => {
                if !is_selected(&spread.directives, variables)? {
                    continue;
                }
                if !visited_fragments.insert(spread.name.clone()) {
                    continue;
                }
                if let Some(def) = fragments.get(&spread.name) {
                    if def.type_condition.as_str() == parent_type_name {
                        collect_fields(
                            parent_type_name,
                            &def.selection_set,
                            fragments,
                            variables,
                            visited_fragments,
                            grouped,
                        )?;
                    }
                }
            }
        }
    }
    Ok(())
}
