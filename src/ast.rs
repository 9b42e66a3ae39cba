//! The selection-set AST consumed from the (external, out-of-scope) parser,
//! and the fragment-definition table supplied alongside an operation
//! (spec.md §3 "Selection Set").

use indexmap::IndexMap;

use crate::{name::Name, value::Value};

/// An already-internal input-value literal from the query document, with
/// variable references left unresolved (spec.md §4.3.2 consumes these).
#[derive(Clone, Debug, PartialEq)]
pub enum InputLiteral {
    /// A literal value, already in the engine's internal representation.
    Value(Value),
    /// A reference to a declared variable, resolved via the substitution map
    /// at argument-coercion time.
    Variable(Name),
    /// A list whose elements may themselves reference variables.
    List(Vec<InputLiteral>),
    /// An object literal whose field values may reference variables.
    Object(IndexMap<Name, InputLiteral>),
}

/// A `@skip`/`@include` directive application (spec.md §6).
#[derive(Clone, Debug, PartialEq)]
pub enum Directive {
    /// `@skip(if: ...)`.
    Skip(InputLiteral),
    /// `@include(if: ...)`.
    Include(InputLiteral),
    /// Any other directive: ignored by the executor (pass-through, per spec.md §6).
    Other {
        /// Directive name.
        name: Name,
    },
}

/// A field selection: `alias: name(arguments) { selectionSet }`.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldSelection {
    /// Alias, if the query author supplied one.
    pub alias: Option<Name>,
    /// The field's name on the parent object type (never the alias).
    pub name: Name,
    /// Argument literals, in source order.
    pub arguments: Vec<(Name, InputLiteral)>,
    /// Directives applied to this selection.
    pub directives: Vec<Directive>,
    /// Sub-selection set, if the field's type is composite.
    pub selection_set: SelectionSet,
}

impl FieldSelection {
    /// The response name: the alias if present, else the field name
    /// (spec.md Glossary "Response name").
    pub fn response_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

/// An anonymous fragment embedded in a selection set.
#[derive(Clone, Debug, PartialEq)]
pub struct InlineFragment {
    /// The type this fragment is gated on; `None` applies unconditionally.
    pub type_condition: Option<Name>,
    /// Directives applied to this selection.
    pub directives: Vec<Directive>,
    /// The fragment's selection set.
    pub selection_set: SelectionSet,
}

/// A reference to a named fragment definition.
#[derive(Clone, Debug, PartialEq)]
pub struct FragmentSpread {
    /// The name of the referenced [`FragmentDefinition`].
    pub name: Name,
    /// Directives applied to this selection.
    pub directives: Vec<Directive>,
}

/// One entry in a [`SelectionSet`] (spec.md §3).
#[derive(Clone, Debug, PartialEq)]
pub enum Selection {
    /// A field selection.
    Field(FieldSelection),
    /// An inline fragment.
    InlineFragment(InlineFragment),
    /// A named fragment spread.
    FragmentSpread(FragmentSpread),
}

/// An ordered sequence of selections under a common parent type.
pub type SelectionSet = Vec<Selection>;

/// A named fragment definition, looked up by name during field collection
/// (spec.md §3 "A `FragmentDefinition` ... table (by name)").
#[derive(Clone, Debug, PartialEq)]
pub struct FragmentDefinition {
    /// The fragment's name, as referenced by [`FragmentSpread::name`].
    pub name: Name,
    /// The concrete object type this fragment is gated on.
    pub type_condition: Name,
    /// The fragment's selection set.
    pub selection_set: SelectionSet,
}

/// Table of fragment definitions supplied alongside an operation, keyed by name.
pub type FragmentTable = IndexMap<Name, FragmentDefinition>;

/// A declared variable of an operation (spec.md §4.3.1).
#[derive(Clone, Debug, PartialEq)]
pub struct VariableDefinition {
    /// The variable's declared input type.
    pub var_type: crate::schema::types::InputType,
    /// The default literal, if declared in the document.
    pub default_value: Option<Value>,
}

/// The operation kind (spec.md §3, `query`/`mutation`; subscriptions are
/// out of scope per spec.md §1).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OperationType {
    /// A `query` operation: sibling root fields may run concurrently (spec.md §5).
    Query,
    /// A `mutation` operation: top-level fields run strictly sequentially (spec.md §5).
    Mutation,
}

/// A single operation to execute, already selected from the document by the
/// (out-of-scope) top-level driver.
#[derive(Clone, Debug, PartialEq)]
pub struct Operation {
    /// `Query` or `Mutation`.
    pub operation_type: OperationType,
    /// The operation's declared variables, by name, in declaration order.
    pub variable_definitions: IndexMap<Name, VariableDefinition>,
    /// The operation's root selection set.
    pub selection_set: SelectionSet,
}
