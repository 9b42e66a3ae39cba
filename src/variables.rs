//! The Variable Coercer (C3, spec.md §4.3).

use indexmap::IndexMap;
use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::{
    ast::{InputLiteral, VariableDefinition},
    error::CoercionError,
    name::Name,
    schema::types::{InputField, InputType, ScalarKind},
    value::{Object, Value},
};

/// `coerceVariableValues` (spec.md §4.3.1): coerces a request's raw
/// (JSON-like) variable values against their declared types, applying
/// defaults and nullability rules.
pub fn coerce_variable_values(
    declared: &IndexMap<Name, VariableDefinition>,
    raw_values: &JsonMap<String, JsonValue>,
) -> Result<IndexMap<Name, Value>, CoercionError> {
    let mut out = IndexMap::with_capacity(declared.len());
    for (name, def) in declared {
        let value = match raw_values.get(name.as_str()) {
            Some(raw) => coerce_variable_value(&def.var_type, raw)?,
            None => match &def.default_value {
                Some(default) => default.clone(),
                None if def.var_type.is_non_null() => {
                    return Err(CoercionError::MissingRequired { name: name.clone() })
                }
                None => Value::Null,
            },
        };
        out.insert(name.clone(), value);
    }
    Ok(out)
}

/// `coerceVariableValue(type, raw)` (spec.md §4.3.1).
pub fn coerce_variable_value(ty: &InputType, raw: &JsonValue) -> Result<Value, CoercionError> {
    if let InputType::NonNull(inner) = ty {
        let coerced = coerce_variable_value(inner, raw)?;
        return if coerced.is_null() {
            Err(CoercionError::NonNullViolation {
                type_name: ty.to_string(),
            })
        } else {
            Ok(coerced)
        };
    }

    if raw.is_null() {
        return Ok(Value::Null);
    }

    match ty {
        InputType::NonNull(_) => unreachable!("handled above"),
        InputType::List(inner) => match raw.as_array() {
            Some(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(coerce_variable_value(inner, item)?);
                }
                Ok(Value::List(out))
            }
            None => Ok(Value::List(vec![coerce_variable_value(inner, raw)?])),
        },
        InputType::Scalar(scalar) => coerce_scalar_value(scalar.kind, raw),
        InputType::Enum(_) => match raw.as_str() {
            Some(s) => Ok(Value::Enum(s.to_owned())),
            None => Err(CoercionError::TypeMismatch {
                expected: ty.to_string(),
            }),
        },
        InputType::InputObject(obj) => match raw.as_object() {
            Some(raw_obj) => {
                for key in raw_obj.keys() {
                    if !obj.fields.contains_key(key.as_str()) {
                        return Err(CoercionError::UnknownField {
                            type_name: obj.name.clone(),
                            field: key.clone(),
                        });
                    }
                }
                let mut out = Object::with_capacity(obj.fields.len());
                for (field_name, field) in &obj.fields {
                    let value = coerce_input_field(field_name, field, raw_obj.get(field_name.as_str()))?;
                    out.insert(field_name.to_string(), value);
                }
                Ok(Value::Object(out))
            }
            None => Err(CoercionError::TypeMismatch {
                expected: ty.to_string(),
            }),
        },
    }
}

fn coerce_input_field(
    name: &Name,
    field: &InputField,
    raw: Option<&JsonValue>,
) -> Result<Value, CoercionError> {
    match raw {
        Some(raw) => coerce_variable_value(&field.input_type, raw),
        None => match &field.default_value {
            Some(default) => Ok(default.clone()),
            None if field.input_type.is_non_null() => {
                Err(CoercionError::MissingRequired { name: name.clone() })
            }
            None => Ok(Value::Null),
        },
    }
}

fn coerce_scalar_value(kind: ScalarKind, raw: &JsonValue) -> Result<Value, CoercionError> {
    let mismatch = || CoercionError::ScalarMismatch {
        expected: Name::new(kind.name()).expect("built-in scalar names are valid"),
    };

    match kind {
        ScalarKind::Boolean => raw.as_bool().map(Value::Boolean).ok_or_else(mismatch),
        ScalarKind::String => raw.as_str().map(|s| Value::String(s.to_owned())).ok_or_else(mismatch),
        ScalarKind::Id => {
            if let Some(s) = raw.as_str() {
                Ok(Value::String(s.to_owned()))
            } else if let Some(i) = raw.as_i64() {
                Ok(Value::String(i.to_string()))
            } else if let Some(u) = raw.as_u64() {
                Ok(Value::String(u.to_string()))
            } else {
                Err(mismatch())
            }
        }
        ScalarKind::Int => {
            let n = raw.as_f64().ok_or_else(mismatch)?;
            if n.fract() != 0.0 {
                return Err(mismatch());
            }
            if n < i32::MIN as f64 || n > i32::MAX as f64 {
                return Err(mismatch());
            }
            Ok(Value::Int(n as i32))
        }
        ScalarKind::Float => raw.as_f64().map(Value::Float).ok_or_else(mismatch),
    }
}

/// `coerceArgumentValues` (spec.md §4.3.2): operates on already-internal
/// [`InputLiteral`]s from the query AST, resolving variable references via
/// `variables` first. Applies the same scalar/enum/object/list rules as
/// [`coerce_variable_value`], plus int→float widening and int→ID
/// stringification (spec.md §4.3.2, applied to variables too per
/// SPEC_FULL.md's "Scalar coercion widening rules").
pub fn coerce_argument_values(
    declared: &IndexMap<Name, InputField>,
    arg_literals: &[(Name, InputLiteral)],
    variables: &IndexMap<Name, Value>,
) -> Result<IndexMap<Name, Value>, CoercionError> {
    let mut out = IndexMap::with_capacity(declared.len());
    for (name, field) in declared {
        let literal = arg_literals.iter().find(|(n, _)| n == name).map(|(_, v)| v);
        let value = match literal {
            Some(literal) => coerce_literal(&field.input_type, literal, variables)?,
            None => match &field.default_value {
                Some(default) => default.clone(),
                None if field.input_type.is_non_null() => {
                    return Err(CoercionError::MissingRequired { name: name.clone() })
                }
                None => Value::Null,
            },
        };
        out.insert(name.clone(), value);
    }
    Ok(out)
}

fn coerce_literal(
    ty: &InputType,
    literal: &InputLiteral,
    variables: &IndexMap<Name, Value>,
) -> Result<Value, CoercionError> {
    let literal = resolve_variables(literal, variables);
    coerce_internal_value(ty, &literal)
}

/// Resolves `$variable` references inside a literal to their substituted
/// constant value, leaving everything else untouched. Exposed crate-wide for
/// directive-condition evaluation (spec.md §6), which needs the resolved
/// value but not full type coercion.
pub(crate) fn resolve_literal(literal: &InputLiteral, variables: &IndexMap<Name, Value>) -> Value {
    resolve_variables(literal, variables)
}

fn resolve_variables(literal: &InputLiteral, variables: &IndexMap<Name, Value>) -> Value {
    match literal {
        InputLiteral::Value(v) => v.clone(),
        InputLiteral::Variable(name) => variables.get(name).cloned().unwrap_or(Value::Null),
        InputLiteral::List(items) => {
            Value::List(items.iter().map(|i| resolve_variables(i, variables)).collect())
        }
        InputLiteral::Object(fields) => {
            let mut obj = Object::with_capacity(fields.len());
            for (k, v) in fields {
                obj.insert(k.to_string(), resolve_variables(v, variables));
            }
            Value::Object(obj)
        }
    }
}

/// Coerces an already-internal [`Value`] (variables substituted) against an
/// [`InputType`], applying the same widening rules as variable coercion plus
/// int→float and int→ID (spec.md §4.3.2).
fn coerce_internal_value(ty: &InputType, value: &Value) -> Result<Value, CoercionError> {
    if let InputType::NonNull(inner) = ty {
        let coerced = coerce_internal_value(inner, value)?;
        return if coerced.is_null() {
            Err(CoercionError::NonNullViolation {
                type_name: ty.to_string(),
            })
        } else {
            Ok(coerced)
        };
    }

    if value.is_null() {
        return Ok(Value::Null);
    }

    match ty {
        InputType::NonNull(_) => unreachable!("handled above"),
        InputType::List(inner) => match value {
            Value::List(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(coerce_internal_value(inner, item)?);
                }
                Ok(Value::List(out))
            }
            other => Ok(Value::List(vec![coerce_internal_value(inner, other)?])),
        },
        InputType::Scalar(scalar) => coerce_internal_scalar(scalar.kind, value),
        InputType::Enum(_) => match value {
            Value::Enum(s) => Ok(Value::Enum(s.clone())),
            Value::String(s) => Ok(Value::Enum(s.clone())),
            _ => Err(CoercionError::TypeMismatch {
                expected: ty.to_string(),
            }),
        },
        InputType::InputObject(obj) => match value {
            Value::Object(raw_obj) => {
                for (key, _) in raw_obj {
                    if !obj.fields.contains_key(key.as_str()) {
                        return Err(CoercionError::UnknownField {
                            type_name: obj.name.clone(),
                            field: key.clone(),
                        });
                    }
                }
                let mut out = Object::with_capacity(obj.fields.len());
                for (field_name, field) in &obj.fields {
                    let inner = raw_obj.get(field_name.as_str());
                    let coerced = match inner {
                        Some(v) => coerce_internal_value(&field.input_type, v)?,
                        None => match &field.default_value {
                            Some(default) => default.clone(),
                            None if field.input_type.is_non_null() => {
                                return Err(CoercionError::MissingRequired {
                                    name: field_name.clone(),
                                })
                            }
                            None => Value::Null,
                        },
                    };
                    out.insert(field_name.to_string(), coerced);
                }
                Ok(Value::Object(out))
            }
            _ => Err(CoercionError::TypeMismatch {
                expected: ty.to_string(),
            }),
        },
    }
}

fn coerce_internal_scalar(kind: ScalarKind, value: &Value) -> Result<Value, CoercionError> {
    let mismatch = || CoercionError::ScalarMismatch {
        expected: Name::new(kind.name()).expect("built-in scalar names are valid"),
    };

    match (kind, value) {
        (ScalarKind::Boolean, Value::Boolean(b)) => Ok(Value::Boolean(*b)),
        (ScalarKind::String, Value::String(s)) => Ok(Value::String(s.clone())),
        (ScalarKind::Id, Value::String(s)) => Ok(Value::String(s.clone())),
        (ScalarKind::Id, Value::Int(i)) => Ok(Value::String(i.to_string())),
        (ScalarKind::Int, Value::Int(i)) => Ok(Value::Int(*i)),
        (ScalarKind::Float, Value::Float(f)) => Ok(Value::Float(*f)),
        (ScalarKind::Float, Value::Int(i)) => Ok(Value::Float(f64::from(*i))),
        _ => Err(mismatch()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::registry::{boolean_scalar, id_scalar, int_scalar, string_scalar};
    use serde_json::json;

    fn declared(name: &str, ty: InputType, default: Option<Value>) -> IndexMap<Name, VariableDefinition> {
        let mut m = IndexMap::new();
        m.insert(
            Name::new(name).unwrap(),
            VariableDefinition {
                var_type: ty,
                default_value: default,
            },
        );
        m
    }

    #[test]
    fn missing_non_null_variable_fails() {
        let declared = declared("id", InputType::Scalar(string_scalar()).non_null(), None);
        let raw = JsonMap::new();
        let err = coerce_variable_values(&declared, &raw).unwrap_err();
        assert!(matches!(err, CoercionError::MissingRequired { .. }));
    }

    #[test]
    fn missing_nullable_variable_becomes_null() {
        let declared = declared("id", InputType::Scalar(string_scalar()), None);
        let raw = JsonMap::new();
        let result = coerce_variable_values(&declared, &raw).unwrap();
        assert_eq!(result.get("id"), Some(&Value::Null));
    }

    #[test]
    fn default_value_used_when_absent() {
        let declared = declared(
            "limit",
            InputType::Scalar(int_scalar()),
            Some(Value::Int(10)),
        );
        let raw = JsonMap::new();
        let result = coerce_variable_values(&declared, &raw).unwrap();
        assert_eq!(result.get("limit"), Some(&Value::Int(10)));
    }

    #[test]
    fn int_overflow_fails() {
        let ty = InputType::Scalar(int_scalar());
        let err = coerce_variable_value(&ty, &json!(1e20)).unwrap_err();
        assert!(matches!(err, CoercionError::ScalarMismatch { .. }));
    }

    #[test]
    fn int_fraction_fails() {
        let ty = InputType::Scalar(int_scalar());
        let err = coerce_variable_value(&ty, &json!(1.5)).unwrap_err();
        assert!(matches!(err, CoercionError::ScalarMismatch { .. }));
    }

    #[test]
    fn id_accepts_integer_and_stringifies() {
        let ty = InputType::Scalar(id_scalar());
        let value = coerce_variable_value(&ty, &json!(42)).unwrap();
        assert_eq!(value, Value::String("42".to_owned()));
    }

    #[test]
    fn scalar_list_singleton_wrapping() {
        let ty = InputType::Scalar(boolean_scalar()).list();
        let value = coerce_variable_value(&ty, &json!(true)).unwrap();
        assert_eq!(value, Value::List(vec![Value::Boolean(true)]));
    }

    #[test]
    fn array_elements_are_coerced_in_order() {
        let ty = InputType::Scalar(int_scalar()).list();
        let value = coerce_variable_value(&ty, &json!([1, 2, 3])).unwrap();
        assert_eq!(
            value,
            Value::List(vec![Value::Int(1), Value::Int(2), Value::Int(3)])
        );
    }

    #[test]
    fn explicit_null_in_non_null_list_element_fails() {
        let ty = InputType::Scalar(int_scalar()).non_null().list();
        let err = coerce_variable_value(&ty, &json!([1, null])).unwrap_err();
        assert!(matches!(err, CoercionError::NonNullViolation { .. }));
    }
}
