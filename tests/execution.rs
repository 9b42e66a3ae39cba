//! End-to-end tests of the execution engine: builds small schemas by hand
//! (no derive macros — this engine is schema-data-driven, spec.md §9) and
//! drives them through [`graphql_engine::execute`].

use std::sync::{Arc, Mutex};

use graphql_engine::{
    ast::{
        Directive, FieldSelection, FragmentDefinition, FragmentSpread, FragmentTable, InlineFragment,
        InputLiteral, Operation, OperationType, Selection, SelectionSet,
    },
    name::Name,
    resolver::sync_fn,
    schema::{
        model::{ExecutableSchema, Schema},
        registry::{boolean_scalar, id_scalar, string_scalar},
        types::{DeprecationStatus, ObjectType, OutputField, OutputType},
    },
    value::{Object, Value},
};
use indexmap::IndexMap;
use pretty_assertions::assert_eq;

fn name(s: &str) -> Name {
    Name::new(s).unwrap()
}

fn field<Ctx: 'static>(
    output_type: OutputType<Ctx>,
    resolve: Box<dyn graphql_engine::resolver::Resolver<Ctx>>,
) -> OutputField<Ctx> {
    OutputField {
        output_type,
        arguments: IndexMap::new(),
        deprecation: DeprecationStatus::default(),
        description: None,
        resolve,
    }
}

fn field_selection(field_name: &str, selection_set: SelectionSet) -> Selection {
    Selection::Field(FieldSelection {
        alias: None,
        name: name(field_name),
        arguments: Vec::new(),
        directives: Vec::new(),
        selection_set,
    })
}

fn query_operation(selection_set: SelectionSet, op_type: OperationType) -> Operation {
    Operation {
        operation_type: op_type,
        variable_definitions: IndexMap::new(),
        selection_set,
    }
}

/// A `Query { greeting: String!, user: User, items: [String!]! }` schema,
/// with `User { id: ID!, name: String }`, used by several tests below.
fn sample_schema() -> ExecutableSchema<()> {
    let mut user_fields = IndexMap::new();
    user_fields.insert(
        name("id"),
        field(
            OutputType::Scalar(id_scalar()).non_null(),
            sync_fn(|parent, _args, _ctx| {
                Ok(parent
                    .as_object()
                    .and_then(|o| o.get("id"))
                    .cloned()
                    .unwrap_or(Value::Null))
            }),
        ),
    );
    user_fields.insert(
        name("name"),
        field(
            OutputType::Scalar(string_scalar()),
            sync_fn(|parent, _args, _ctx| {
                Ok(parent
                    .as_object()
                    .and_then(|o| o.get("name"))
                    .cloned()
                    .unwrap_or(Value::Null))
            }),
        ),
    );
    let user_type = Arc::new(ObjectType {
        name: name("User"),
        description: None,
        fields: user_fields,
    });

    let mut query_fields = IndexMap::new();
    query_fields.insert(
        name("greeting"),
        field(
            OutputType::Scalar(string_scalar()).non_null(),
            sync_fn(|_parent, _args, _ctx| Ok(Value::String("hello".to_owned()))),
        ),
    );
    query_fields.insert(
        name("user"),
        field(
            OutputType::Object(Arc::clone(&user_type)),
            sync_fn(|_parent, _args, _ctx| {
                let mut obj = Object::with_capacity(2);
                obj.insert("id", Value::Int(42));
                obj.insert("name", Value::String("Ada".to_owned()));
                Ok(Value::Object(obj))
            }),
        ),
    );
    query_fields.insert(
        name("items"),
        field(
            OutputType::Scalar(string_scalar()).non_null().list().non_null(),
            sync_fn(|_parent, _args, _ctx| {
                Ok(Value::List(vec![
                    Value::String("a".to_owned()),
                    Value::String("b".to_owned()),
                ]))
            }),
        ),
    );
    query_fields.insert(
        name("willFail"),
        field(
            OutputType::Scalar(string_scalar()).non_null(),
            sync_fn(|_parent, _args, _ctx| Err("boom".into())),
        ),
    );

    let query_type = Arc::new(ObjectType {
        name: name("Query"),
        description: None,
        fields: query_fields,
    });

    ExecutableSchema::build(Schema::new(query_type, None)).unwrap()
}

#[tokio::test]
async fn resolves_scalar_and_nested_object_fields() {
    let schema = sample_schema();
    let selection_set = vec![
        field_selection("greeting", Vec::new()),
        field_selection("user", vec![field_selection("id", Vec::new()), field_selection("name", Vec::new())]),
    ];
    let operation = query_operation(selection_set, OperationType::Query);
    let fragments = FragmentTable::new();

    let response = graphql_engine::execute(&schema, &operation, &fragments, &serde_json::Map::new(), &()).await;

    assert!(response.errors.is_empty());
    let data = response.data.unwrap();
    let obj = data.as_response_map().unwrap();
    assert_eq!(obj.get("greeting"), Some(&Value::String("hello".to_owned())));
    let user = obj.get("user").unwrap().as_response_map().unwrap();
    assert_eq!(user.get("id"), Some(&Value::String("42".to_owned())));
    assert_eq!(user.get("name"), Some(&Value::String("Ada".to_owned())));
}

#[tokio::test]
async fn list_of_non_null_strings_resolves_in_order() {
    let schema = sample_schema();
    let operation = query_operation(vec![field_selection("items", Vec::new())], OperationType::Query);
    let fragments = FragmentTable::new();

    let response = graphql_engine::execute(&schema, &operation, &fragments, &serde_json::Map::new(), &()).await;

    assert!(response.errors.is_empty());
    let data = response.data.unwrap();
    let items = data.as_response_map().unwrap().get("items").unwrap().as_list().unwrap();
    assert_eq!(
        items.to_vec(),
        vec![Value::String("a".to_owned()), Value::String("b".to_owned())]
    );
}

#[tokio::test]
async fn field_error_on_non_null_field_nulls_entire_response() {
    let schema = sample_schema();
    let operation = query_operation(
        vec![field_selection("greeting", Vec::new()), field_selection("willFail", Vec::new())],
        OperationType::Query,
    );
    let fragments = FragmentTable::new();

    let response = graphql_engine::execute(&schema, &operation, &fragments, &serde_json::Map::new(), &()).await;

    assert_eq!(response.data, Some(Value::Null));
    assert_eq!(response.errors.len(), 1);
    assert_eq!(response.errors[0].message, "boom");
}

#[tokio::test]
async fn skip_directive_removes_selection() {
    let schema = sample_schema();
    let operation = query_operation(
        vec![Selection::Field(FieldSelection {
            alias: None,
            name: name("greeting"),
            arguments: Vec::new(),
            directives: vec![Directive::Skip(InputLiteral::Value(Value::Boolean(true)))],
            selection_set: Vec::new(),
        })],
        OperationType::Query,
    );
    let fragments = FragmentTable::new();

    let response = graphql_engine::execute(&schema, &operation, &fragments, &serde_json::Map::new(), &()).await;

    assert!(response.errors.is_empty());
    let data = response.data.unwrap();
    assert!(data.as_response_map().unwrap().is_empty());
}

#[tokio::test]
async fn named_fragment_spread_merges_into_parent_selection() {
    let schema = sample_schema();
    let mut fragments = FragmentTable::new();
    fragments.insert(
        name("UserFields"),
        FragmentDefinition {
            name: name("UserFields"),
            type_condition: name("User"),
            selection_set: vec![field_selection("id", Vec::new())],
        },
    );
    let operation = query_operation(
        vec![field_selection(
            "user",
            vec![
                field_selection("name", Vec::new()),
                Selection::FragmentSpread(FragmentSpread {
                    name: name("UserFields"),
                    directives: Vec::new(),
                }),
            ],
        )],
        OperationType::Query,
    );

    let response = graphql_engine::execute(&schema, &operation, &fragments, &serde_json::Map::new(), &()).await;

    assert!(response.errors.is_empty());
    let data = response.data.unwrap();
    let user = data.as_response_map().unwrap().get("user").unwrap().as_response_map().unwrap();
    assert_eq!(user.get("name"), Some(&Value::String("Ada".to_owned())));
    assert_eq!(user.get("id"), Some(&Value::String("42".to_owned())));
}

#[tokio::test]
async fn recursive_fragment_spread_is_dropped_without_error() {
    let schema = sample_schema();
    let mut fragments = FragmentTable::new();
    fragments.insert(
        name("Cyclic"),
        FragmentDefinition {
            name: name("Cyclic"),
            type_condition: name("Query"),
            selection_set: vec![Selection::FragmentSpread(FragmentSpread {
                name: name("Cyclic"),
                directives: Vec::new(),
            })],
        },
    );
    let operation = query_operation(
        vec![Selection::FragmentSpread(FragmentSpread {
            name: name("Cyclic"),
            directives: Vec::new(),
        })],
        OperationType::Query,
    );

    let response = graphql_engine::execute(&schema, &operation, &fragments, &serde_json::Map::new(), &()).await;

    assert!(response.errors.is_empty());
    assert!(response.data.unwrap().as_response_map().unwrap().is_empty());
}

#[tokio::test]
async fn inline_fragment_type_condition_must_match_concrete_type() {
    let schema = sample_schema();
    let operation = query_operation(
        vec![field_selection(
            "user",
            vec![
                Selection::InlineFragment(InlineFragment {
                    type_condition: Some(name("User")),
                    directives: Vec::new(),
                    selection_set: vec![field_selection("name", Vec::new())],
                }),
                Selection::InlineFragment(InlineFragment {
                    type_condition: Some(name("SomeOtherType")),
                    directives: Vec::new(),
                    selection_set: vec![field_selection("id", Vec::new())],
                }),
            ],
        )],
        OperationType::Query,
    );
    let fragments = FragmentTable::new();

    let response = graphql_engine::execute(&schema, &operation, &fragments, &serde_json::Map::new(), &()).await;

    assert!(response.errors.is_empty());
    let data = response.data.unwrap();
    let user = data.as_response_map().unwrap().get("user").unwrap().as_response_map().unwrap();
    assert_eq!(user.get("name"), Some(&Value::String("Ada".to_owned())));
    assert_eq!(user.get("id"), None);
}

/// A context that records the order in which mutation root fields resolve.
struct OrderingCtx {
    order: Mutex<Vec<&'static str>>,
}

#[tokio::test]
async fn mutation_root_fields_execute_serially_in_order() {
    let mut mutation_fields = IndexMap::new();
    mutation_fields.insert(
        name("first"),
        field(
            OutputType::Scalar(boolean_scalar()).non_null(),
            sync_fn(|_parent, _args, ctx: &OrderingCtx| {
                ctx.order.lock().unwrap().push("first");
                Ok(Value::Boolean(true))
            }),
        ),
    );
    mutation_fields.insert(
        name("second"),
        field(
            OutputType::Scalar(boolean_scalar()).non_null(),
            sync_fn(|_parent, _args, ctx: &OrderingCtx| {
                ctx.order.lock().unwrap().push("second");
                Ok(Value::Boolean(true))
            }),
        ),
    );
    let mutation_type = Arc::new(ObjectType {
        name: name("Mutation"),
        description: None,
        fields: mutation_fields,
    });
    let query_type: Arc<ObjectType<OrderingCtx>> = Arc::new(ObjectType {
        name: name("Query"),
        description: None,
        fields: IndexMap::new(),
    });
    let schema = ExecutableSchema::build(Schema::new(query_type, Some(mutation_type))).unwrap();

    let operation = query_operation(
        vec![field_selection("first", Vec::new()), field_selection("second", Vec::new())],
        OperationType::Mutation,
    );
    let fragments = FragmentTable::new();
    let ctx = OrderingCtx { order: Mutex::new(Vec::new()) };

    let response = graphql_engine::execute(&schema, &operation, &fragments, &serde_json::Map::new(), &ctx).await;

    assert!(response.errors.is_empty());
    assert_eq!(*ctx.order.lock().unwrap(), vec!["first", "second"]);
}

#[tokio::test]
async fn response_map_preserves_source_order_on_the_wire() {
    let schema = sample_schema();
    let selection_set = vec![
        field_selection("user", vec![field_selection("name", Vec::new()), field_selection("id", Vec::new())]),
        field_selection("greeting", Vec::new()),
    ];
    let operation = query_operation(selection_set, OperationType::Query);
    let fragments = FragmentTable::new();

    let response = graphql_engine::execute(&schema, &operation, &fragments, &serde_json::Map::new(), &()).await;

    assert!(response.errors.is_empty());
    // `serde_json::to_string` writes keys in the order `Serialize` visits
    // them, unlike routing through `serde_json::Value` (a `BTreeMap` absent
    // the `preserve_order` feature) — this is what actually exercises
    // `ResponseMap`'s insertion-ordered `Serialize` impl.
    let json = serde_json::to_string(&response).unwrap();
    let user_pos = json.find("\"user\"").unwrap();
    let greeting_pos = json.find("\"greeting\"").unwrap();
    assert!(user_pos < greeting_pos, "expected \"user\" before \"greeting\" in {json}");

    let name_pos = json.find("\"name\"").unwrap();
    let id_pos = json.find("\"id\"").unwrap();
    assert!(name_pos < id_pos, "expected \"name\" before \"id\" in {json}");
}

#[tokio::test]
async fn missing_field_produces_canonical_error_message() {
    let schema = sample_schema();
    let operation = query_operation(vec![field_selection("nonexistent", Vec::new())], OperationType::Query);
    let fragments = FragmentTable::new();

    let response = graphql_engine::execute(&schema, &operation, &fragments, &serde_json::Map::new(), &()).await;

    assert_eq!(response.errors.len(), 1);
    assert_eq!(response.errors[0].message, "field nonexistent not resolved.");
    let data = response.data.unwrap();
    assert_eq!(data.as_response_map().unwrap().get("nonexistent"), Some(&Value::Null));
}

#[test]
fn explicit_null_for_non_null_variable_fails() {
    use graphql_engine::{error::CoercionError, schema::types::InputType, variables::coerce_variable_value};

    let ty = InputType::Scalar(string_scalar()).non_null();
    let err = coerce_variable_value(&ty, &serde_json::Value::Null).unwrap_err();
    assert!(matches!(err, CoercionError::NonNullViolation { .. }));
}
