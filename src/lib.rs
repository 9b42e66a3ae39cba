//! A standalone execution engine for a typed GraphQL server: variable
//! coercion (C3), selection-set resolution (C4), and the schema type graph
//! that both share (C1/C2).
//!
//! This crate does not parse GraphQL source text or validate a document
//! against a schema (spec.md §1 Non-goals) — it consumes an already-parsed
//! [`ast::Operation`] plus a [`ast::FragmentTable`], as a query planner or
//! gateway would hand off after its own parse/validate stage.

pub mod ast;
pub mod directives;
pub mod error;
pub mod executor;
pub mod name;
pub mod resolver;
pub mod response;
pub mod schema;
pub mod variables;
pub mod value;

use ast::{FragmentTable, Operation, OperationType};
use error::GraphQLError;
use executor::Executor;
use response::Response;
use schema::model::ExecutableSchema;
use tracing::instrument;

/// Executes one operation against a schema (spec.md §2's end-to-end data
/// flow): coerces its variables (C3), then resolves its selection set (C4),
/// producing a [`Response`] ready for wire serialization.
///
/// Variable coercion failures and an unsupported `mutation` request abort
/// before any field is resolved, per spec.md §7's request-level error tier;
/// field-level errors (§4.4.6) are instead collected alongside a possibly
/// partial, possibly null `data`.
#[instrument(skip_all, fields(operation = ?operation.operation_type))]
pub async fn execute<Ctx: Sync>(
    schema: &ExecutableSchema<Ctx>,
    operation: &Operation,
    fragments: &FragmentTable,
    raw_variables: &serde_json::Map<String, serde_json::Value>,
    ctx: &Ctx,
) -> Response {
    let variables = match variables::coerce_variable_values(&operation.variable_definitions, raw_variables) {
        Ok(variables) => variables,
        Err(e) => {
            tracing::warn!(error = %e, "variable coercion failed");
            return Response::request_error(GraphQLError::VariableCoercion(e));
        }
    };

    let root_type = match operation.operation_type {
        OperationType::Query => &schema.schema.query,
        OperationType::Mutation => match schema.schema.mutation.as_ref() {
            Some(mutation) => mutation,
            None => return Response::request_error(GraphQLError::NoMutationType),
        },
    };

    let executor = Executor::new(fragments, &variables, ctx);
    let (data, errors) = executor
        .execute_operation(root_type, &operation.selection_set, operation.operation_type)
        .await;

    if !errors.is_empty() {
        tracing::debug!(count = errors.len(), "field errors recorded during execution");
    }
    Response::executed(data, errors)
}
