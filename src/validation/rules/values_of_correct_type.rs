use std::fmt;

use fnv::FnvHashSet;

use crate::{
    ast::Type,
    document::{DocumentPartType, PartId, PartKind, QueryDocument, SuppliedValueKind},
    parser::ScalarValueType,
    schema::{
        meta::{MetaType, ScalarLiteral},
        model::SchemaType,
    },
    validation::{DocumentValidationContext, RuleScope, RuleStep},
};

/// Supplied values must be coercible to the type expected at their
/// position.
///
/// Lists and input objects are checked one level at a time: their items and
/// fields are supplied values of their own. Default values of variables are
/// checked as a whole when visiting their operation, the fields of their
/// input objects included.
#[derive(Clone, Copy, Debug, Default)]
pub struct ValuesOfCorrectType;

pub fn factory() -> ValuesOfCorrectType {
    ValuesOfCorrectType
}

impl RuleStep for ValuesOfCorrectType {
    fn rule_number(&self) -> &'static str {
        "5.6.1"
    }

    fn rule_anchor(&self) -> &'static str {
        "sec-Values-of-Correct-Type"
    }

    fn applies_to(&self) -> &'static [RuleScope] {
        &[
            RuleScope::Part(DocumentPartType::SuppliedValue),
            RuleScope::Part(DocumentPartType::Operation),
        ]
    }

    fn execute(&self, ctx: &mut DocumentValidationContext<'_, '_>) -> bool {
        let Some(id) = ctx.active_part() else {
            return true;
        };
        let document = ctx.document();
        let errors = match document.part(id).kind {
            PartKind::Operation { .. } => default_value_errors(document, id),
            _ => value_error(document, id).map(|e| vec![e]).unwrap_or_default(),
        };

        let passed = errors.is_empty();
        for (part, message) in errors {
            ctx.report_error(self.reference(), part, message);
        }
        passed
    }
}

/// Checks a single value against the type expected at its position.
fn value_error(document: &QueryDocument<'_>, id: PartId) -> Option<(PartId, String)> {
    let part = document.part(id);
    let (PartKind::SuppliedValue { kind, text }, Some(expected)) =
        (&part.kind, &part.type_expression)
    else {
        return None;
    };
    if is_valid_literal(document.schema(), *kind, text, expected) {
        return None;
    }

    let message = match document.parent(id).map(|p| &document.part(p).kind) {
        Some(PartKind::InputArgument { name, .. }) => argument_error_message(name, expected),
        Some(PartKind::InputObjectField { name, .. }) => field_error_message(name, expected),
        _ => list_item_error_message(expected),
    };
    Some((id, message))
}

/// Checks the default values of all the variables of an operation.
fn default_value_errors(document: &QueryDocument<'_>, operation: PartId) -> Vec<(PartId, String)> {
    let Some(variables) = document.variables(operation) else {
        return vec![];
    };

    let mut errors = vec![];
    for var in variables.iter() {
        let (Some(default), Some(var_type)) = (var.default_value, &var.type_expression) else {
            continue;
        };

        let mut is_valid = true;
        for id in document.descendants(default) {
            let part = document.part(id);
            match (&part.kind, &part.type_expression) {
                (
                    PartKind::SuppliedValue {
                        kind: SuppliedValueKind::Variable,
                        text,
                    },
                    _,
                ) => errors.push((id, variable_in_default_error_message(text))),
                (PartKind::SuppliedValue { kind, text }, Some(expected)) => {
                    is_valid &= is_valid_literal(document.schema(), *kind, text, expected)
                        && (*kind != SuppliedValueKind::Complex
                            || has_valid_input_fields(document, id));
                }
                _ => {}
            }
        }
        if !is_valid {
            errors.push((default, default_error_message(var.name, var_type)));
        }
    }
    errors
}

/// Checks that a complex value supplies only known input fields, each at
/// most once, and every required one.
fn has_valid_input_fields(document: &QueryDocument<'_>, id: PartId) -> bool {
    let Some(input_type @ MetaType::InputObject(_)) = document.part(id).graph_type else {
        return true;
    };

    let mut provided = FnvHashSet::default();
    for &child in document.children(id) {
        if let PartKind::InputObjectField { name, field } = document.part(child).kind {
            if field.is_none() || !provided.insert(name) {
                return false;
            }
        }
    }
    input_type
        .input_fields()
        .iter()
        .all(|f| !f.is_required() || provided.contains(f.name.as_str()))
}

/// Checks whether a literal of the provided `kind` may be coerced to the
/// `expected` type.
///
/// Literals of types unknown to the schema are always valid.
fn is_valid_literal(schema: &SchemaType, kind: SuppliedValueKind, text: &str, expected: &Type) -> bool {
    match kind {
        SuppliedValueKind::Variable => true,
        SuppliedValueKind::Null => !expected.is_non_null(),
        SuppliedValueKind::List => expected.is_list(),
        _ => match expected.list_inner() {
            // A single item is coerced into a list of one.
            Some(inner) => is_valid_literal(schema, kind, text, inner),
            None => match schema.concrete_type_by_name(expected.innermost_name()) {
                Some(meta @ MetaType::Scalar(_)) => {
                    scalar_literal(kind, text).is_some_and(|l| meta.accepts_literal(l))
                }
                Some(meta @ MetaType::Enum(_)) => {
                    kind == SuppliedValueKind::Enum && meta.has_enum_value(text)
                }
                Some(MetaType::InputObject(_)) => kind == SuppliedValueKind::Complex,
                Some(_) | None => true,
            },
        },
    }
}

fn scalar_literal(kind: SuppliedValueKind, text: &str) -> Option<ScalarLiteral<'_>> {
    match kind {
        SuppliedValueKind::Scalar(ScalarValueType::Int) => Some(ScalarLiteral::Int(text)),
        SuppliedValueKind::Scalar(ScalarValueType::Float) => Some(ScalarLiteral::Float(text)),
        SuppliedValueKind::Scalar(ScalarValueType::String) => {
            Some(ScalarLiteral::String(unquote(text)))
        }
        SuppliedValueKind::Boolean => Some(ScalarLiteral::Boolean(text == "true")),
        SuppliedValueKind::Enum => Some(ScalarLiteral::Enum(text)),
        _ => None,
    }
}

fn unquote(text: &str) -> &str {
    text.strip_prefix(r#"""""#)
        .and_then(|s| s.strip_suffix(r#"""""#))
        .or_else(|| text.strip_prefix('"').and_then(|s| s.strip_suffix('"')))
        .unwrap_or(text)
}

fn argument_error_message(arg_name: impl fmt::Display, type_name: impl fmt::Display) -> String {
    format!(r#"Invalid value for argument "{arg_name}", expected type "{type_name}""#)
}

fn field_error_message(field_name: impl fmt::Display, type_name: impl fmt::Display) -> String {
    format!(r#"Invalid value for input field "{field_name}", expected type "{type_name}""#)
}

fn list_item_error_message(type_name: impl fmt::Display) -> String {
    format!(r#"Invalid list item value, expected type "{type_name}""#)
}

fn default_error_message(var_name: impl fmt::Display, type_name: impl fmt::Display) -> String {
    format!(r#"Invalid default value for variable "${var_name}", expected type "{type_name}""#)
}

fn variable_in_default_error_message(var_name: impl fmt::Display) -> String {
    format!(r#"Variable "${var_name}" cannot be used in a default value"#)
}

#[cfg(test)]
mod tests {
    use super::{
        argument_error_message, default_error_message, factory, field_error_message,
        list_item_error_message, unquote, variable_in_default_error_message,
    };

    use crate::validation::{expect_fails_rule, expect_passes_rule};

    #[test]
    fn strips_quotes() {
        assert_eq!(unquote(r#""abc""#), "abc");
        assert_eq!(unquote(r#""""a "b" c""""#), r#"a "b" c"#);
        assert_eq!(unquote(r#""""#), "");
    }

    #[test]
    fn good_scalar_values() {
        expect_passes_rule(
            factory,
            r#"
          {
            complicatedArgs {
              intArgField(intArg: 2)
              booleanArgField(booleanArg: true)
              stringArgField(stringArg: "foo")
              floatArgField(floatArg: 1.1)
              intToFloat: floatArgField(floatArg: 1)
              intToId: idArgField(idArg: 1)
              stringToId: idArgField(idArg: "someIdString")
              blockString: stringArgField(stringArg: """multi
                line""")
            }
          }
        "#,
        );
    }

    #[test]
    fn good_enum_and_null_values() {
        expect_passes_rule(
            factory,
            r#"
          {
            dog {
              doesKnowCommand(dogCommand: SIT)
            }
            complicatedArgs {
              enumArgField(enumArg: BROWN)
              intArgField(intArg: null)
            }
          }
        "#,
        );
    }

    #[test]
    fn invalid_scalar_values() {
        expect_fails_rule(
            factory,
            r#"
          {
            complicatedArgs {
              intArgField(intArg: "3")
              bigInt: intArgField(intArg: 829384293849283498239482938)
              stringArgField(stringArg: 1)
              booleanArgField(booleanArg: 2)
              floatArgField(floatArg: "1.0")
              idArgField(idArg: 1.0)
              badEnum: intArgField(intArg: FOO)
            }
          }
        "#,
            &[
                argument_error_message("intArg", "Int").as_str(),
                argument_error_message("intArg", "Int").as_str(),
                argument_error_message("stringArg", "String").as_str(),
                argument_error_message("booleanArg", "Boolean").as_str(),
                argument_error_message("floatArg", "Float").as_str(),
                argument_error_message("idArg", "ID").as_str(),
                argument_error_message("intArg", "Int").as_str(),
            ],
        );
    }

    #[test]
    fn invalid_enum_values() {
        expect_fails_rule(
            factory,
            r#"
          {
            dog {
              doesKnowCommand(dogCommand: "SIT")
              lower: doesKnowCommand(dogCommand: sit)
              unknown: doesKnowCommand(dogCommand: JUGGLE)
              bool: doesKnowCommand(dogCommand: true)
            }
          }
        "#,
            &[
                argument_error_message("dogCommand", "DogCommand").as_str(),
                argument_error_message("dogCommand", "DogCommand").as_str(),
                argument_error_message("dogCommand", "DogCommand").as_str(),
                argument_error_message("dogCommand", "DogCommand").as_str(),
            ],
        );
    }

    #[test]
    fn null_into_non_null() {
        expect_fails_rule(
            factory,
            r#"
          {
            complicatedArgs {
              nonNullIntArgField(nonNullIntArg: null)
            }
          }
        "#,
            &[argument_error_message("nonNullIntArg", "Int!").as_str()],
        );
    }

    #[test]
    fn good_list_values() {
        expect_passes_rule(
            factory,
            r#"
          {
            complicatedArgs {
              stringListArgField(stringListArg: ["one", null, "two"])
              empty: stringListArgField(stringListArg: [])
              single: stringListArgField(stringListArg: "one")
              nonNullStringListArgField(nonNullStringListArg: ["one"])
            }
          }
        "#,
        );
    }

    #[test]
    fn invalid_list_values() {
        expect_fails_rule(
            factory,
            r#"
          {
            complicatedArgs {
              stringListArgField(stringListArg: ["one", 2])
              single: stringListArgField(stringListArg: 1)
              nonNullStringListArgField(nonNullStringListArg: ["one", null])
              notAList: intArgField(intArg: [1])
            }
          }
        "#,
            &[
                list_item_error_message("String").as_str(),
                argument_error_message("stringListArg", "[String]").as_str(),
                list_item_error_message("String!").as_str(),
                argument_error_message("intArg", "Int").as_str(),
            ],
        );
    }

    #[test]
    fn good_input_object_values() {
        expect_passes_rule(
            factory,
            r#"
          {
            complicatedArgs {
              complexArgField(complexArg: {
                requiredField: true,
                intField: 4,
                stringListField: ["one", "two"],
              })
            }
          }
        "#,
        );
    }

    #[test]
    fn invalid_input_object_values() {
        expect_fails_rule(
            factory,
            r#"
          {
            complicatedArgs {
              complexArgField(complexArg: {
                requiredField: "true",
                stringListField: [1],
              })
              notAnObject: complexArgField(complexArg: 1)
            }
          }
        "#,
            &[
                field_error_message("requiredField", "Boolean!").as_str(),
                list_item_error_message("String").as_str(),
                argument_error_message("complexArg", "ComplexInput").as_str(),
            ],
        );
    }

    #[test]
    fn directive_arguments() {
        expect_fails_rule(
            factory,
            r#"
          {
            dog @include(if: "yes") {
              name @skip(if: false)
            }
          }
        "#,
            &[argument_error_message("if", "Boolean!").as_str()],
        );
    }

    #[test]
    fn variables_are_not_checked_here() {
        expect_passes_rule(
            factory,
            r#"
          query Q($a: String) {
            complicatedArgs {
              intArgField(intArg: $a)
            }
          }
        "#,
        );
    }

    #[test]
    fn good_default_values() {
        expect_passes_rule(
            factory,
            r#"
          query Q(
            $a: Int = 1,
            $b: String = "ok",
            $c: ComplexInput = { requiredField: true, intField: 3 },
            $d: [String] = ["one"],
            $e: Int! = 2,
          ) {
            dog { name }
          }
        "#,
        );
    }

    #[test]
    fn invalid_default_values() {
        expect_fails_rule(
            factory,
            r#"
          query Q(
            $a: Int = "one",
            $b: ComplexInput = { requiredField: 1 },
            $c: [String] = [1],
            $d: Int! = null,
            $e: Int = $a,
          ) {
            dog { name }
          }
        "#,
            &[
                default_error_message("a", "Int").as_str(),
                default_error_message("b", "ComplexInput").as_str(),
                default_error_message("c", "[String]").as_str(),
                default_error_message("d", "Int!").as_str(),
                variable_in_default_error_message("a").as_str(),
            ],
        );
    }

    #[test]
    fn invalid_input_object_default_fields() {
        expect_fails_rule(
            factory,
            r#"
          query Q(
            $missing: ComplexInput = { intField: 3 },
            $unknown: ComplexInput = { requiredField: true, bogus: 3 },
            $twice: ComplexInput = { requiredField: true, requiredField: false },
            $nested: [ComplexInput] = [{ requiredField: true }, { stringField: "x" }],
          ) {
            dog { name }
          }
        "#,
            &[
                default_error_message("missing", "ComplexInput").as_str(),
                default_error_message("unknown", "ComplexInput").as_str(),
                default_error_message("twice", "ComplexInput").as_str(),
                default_error_message("nested", "[ComplexInput]").as_str(),
            ],
        );
    }
}
