//! `@skip`/`@include` directive evaluation (spec.md §6, §4.4.2 "Directive
//! gating").

use indexmap::IndexMap;

use crate::{
    ast::{Directive, InputLiteral},
    error::CoercionError,
    name::Name,
    value::Value,
    variables::resolve_literal,
};

/// Whether a selection carrying these directives should be visited
/// (spec.md §4.4.2): `@skip(if: true)` removes it, `@include(if: false)`
/// removes it; a selection with neither (or the condition false/true
/// respectively) is kept. Evaluated before field collection so skipped
/// selections never contribute to the response map.
pub fn is_selected(
    directives: &[Directive],
    variables: &IndexMap<Name, Value>,
) -> Result<bool, CoercionError> {
    for directive in directives {
        match directive {
            Directive::Skip(cond) => {
                if eval_bool_arg(cond, variables)? {
                    return Ok(false);
                }
            }
            Directive::Include(cond) => {
                if !eval_bool_arg(cond, variables)? {
                    return Ok(false);
                }
            }
            Directive::Other { .. } => {}
        }
    }
    Ok(true)
}

fn eval_bool_arg(literal: &InputLiteral, variables: &IndexMap<Name, Value>) -> Result<bool, CoercionError> {
    let value = resolve_literal(literal, variables);
    value.as_bool().ok_or_else(|| CoercionError::TypeMismatch {
        expected: "Boolean".to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_directives_keeps_selection() {
        let vars = IndexMap::new();
        assert!(is_selected(&[], &vars).unwrap());
    }

    #[test]
    fn skip_true_removes_selection() {
        let vars = IndexMap::new();
        let directives = vec![Directive::Skip(InputLiteral::Value(Value::Boolean(true)))];
        assert!(!is_selected(&directives, &vars).unwrap());
    }

    #[test]
    fn include_false_removes_selection() {
        let vars = IndexMap::new();
        let directives = vec![Directive::Include(InputLiteral::Value(Value::Boolean(false)))];
        assert!(!is_selected(&directives, &vars).unwrap());
    }

    #[test]
    fn skip_reads_variable_condition() {
        let mut vars = IndexMap::new();
        vars.insert(Name::new("cond").unwrap(), Value::Boolean(true));
        let directives = vec![Directive::Skip(InputLiteral::Variable(Name::new("cond").unwrap()))];
        assert!(!is_selected(&directives, &vars).unwrap());
    }
}
