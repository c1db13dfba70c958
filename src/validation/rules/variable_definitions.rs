use std::fmt;

use crate::{
    ast::Type,
    document::{DocumentPartType, PartId, PartKind, QueryDocument, SuppliedValueKind},
    parser::SourceLocation,
    validation::{DocumentValidationContext, RuleReference, RuleScope, RuleStep},
};

/// Variables of an operation must be uniquely declared with input types,
/// and used consistently with their declarations.
///
/// Usages are searched in the operation and in all the fragments it spreads,
/// transitively. Each clause reports errors under its own number.
#[derive(Clone, Copy, Debug, Default)]
pub struct VariableDefinitions;

pub fn factory() -> VariableDefinitions {
    VariableDefinitions
}

fn uniqueness() -> RuleReference {
    RuleReference::new("5.8.1", "sec-Variable-Uniqueness")
}

fn input_types() -> RuleReference {
    RuleReference::new("5.8.2", "sec-Variables-Are-Input-Types")
}

fn uses_defined() -> RuleReference {
    RuleReference::new("5.8.3", "sec-All-Variable-Uses-Defined")
}

fn all_used() -> RuleReference {
    RuleReference::new("5.8.4", "sec-All-Variables-Used")
}

fn usages_allowed() -> RuleReference {
    RuleReference::new("5.8.5", "sec-All-Variable-Usages-are-Allowed")
}

/// Error found while checking an operation.
enum Finding<'a> {
    Declaration {
        rule: RuleReference,
        location: SourceLocation,
        variable: &'a str,
        message: String,
    },
    Usage {
        rule: RuleReference,
        part: PartId,
        message: String,
    },
}

impl RuleStep for VariableDefinitions {
    fn rule_number(&self) -> &'static str {
        "5.8"
    }

    fn rule_anchor(&self) -> &'static str {
        "sec-Validation.Variables"
    }

    fn applies_to(&self) -> &'static [RuleScope] {
        &[RuleScope::Part(DocumentPartType::Operation)]
    }

    fn execute(&self, ctx: &mut DocumentValidationContext<'_, '_>) -> bool {
        let Some(op) = ctx.active_part() else {
            return true;
        };

        let document = ctx.document();
        let Some(variables) = document.variables(op) else {
            return true;
        };
        let op_name = match document.part(op).kind {
            PartKind::Operation { name, .. } => name,
            _ => None,
        };
        let mut findings = vec![];

        for dup in variables.duplicates() {
            findings.push(Finding::Declaration {
                rule: uniqueness(),
                location: dup.location,
                variable: dup.name,
                message: duplicate_error_message(dup.name),
            });
        }

        for var in variables.iter() {
            let Some(var_type) = &var.type_expression else {
                continue;
            };
            let message = match var.graph_type {
                None => unknown_type_error_message(var_type.innermost_name()),
                Some(t) if !t.is_input() => non_input_type_error_message(var.name, var_type),
                Some(_) => continue,
            };
            findings.push(Finding::Declaration {
                rule: input_types(),
                location: var.location,
                variable: var.name,
                message,
            });
        }

        let usages = variable_usages(document, op);
        for &(part, name) in &usages {
            if !variables.contains(name) {
                findings.push(Finding::Usage {
                    rule: uses_defined(),
                    part,
                    message: undefined_error_message(name, op_name),
                });
            }
        }

        if let Some(variables) = ctx.document_mut().variables_mut(op) {
            variables.clear_references();
            for &(_, name) in &usages {
                variables.mark_as_referenced(name);
            }
        }

        let document = ctx.document();
        let Some(variables) = document.variables(op) else {
            return true;
        };
        for var in variables.unreferenced() {
            findings.push(Finding::Declaration {
                rule: all_used(),
                location: var.location,
                variable: var.name,
                message: unused_error_message(var.name, op_name),
            });
        }

        for &(part, name) in &usages {
            let Some(var) = variables.get(name) else {
                continue;
            };
            let (Some(var_type), Some(location_type)) =
                (&var.type_expression, &document.part(part).type_expression)
            else {
                continue;
            };
            let has_var_default = var
                .default_value
                .is_some_and(|d| document.part(d).value_kind() != Some(SuppliedValueKind::Null));
            let has_location_default = has_location_default(document, part);

            if !is_usage_allowed(var_type, location_type, has_var_default || has_location_default) {
                findings.push(Finding::Usage {
                    rule: usages_allowed(),
                    part,
                    message: position_error_message(name, var_type, location_type),
                });
            }
        }

        let passed = findings.is_empty();
        for finding in findings {
            match finding {
                Finding::Declaration {
                    rule,
                    location,
                    variable,
                    message,
                } => ctx.report_variable_error(rule, op, location, variable, message),
                Finding::Usage {
                    rule,
                    part,
                    message,
                } => ctx.report_error(rule, part, message),
            }
        }
        passed
    }
}

/// Collects the variable values used by the provided operation, and by the
/// fragments it spreads, in document order.
fn variable_usages<'a>(document: &QueryDocument<'a>, op: PartId) -> Vec<(PartId, &'a str)> {
    std::iter::once(op)
        .chain(document.reachable_fragments(op))
        .flat_map(|root| document.descendants(root))
        .filter_map(|id| match document.part(id).kind {
            PartKind::SuppliedValue {
                kind: SuppliedValueKind::Variable,
                text,
            } => Some((id, text)),
            _ => None,
        })
        .collect()
}

/// Checks whether the argument or input field a value is supplied to has a
/// default value.
fn has_location_default(document: &QueryDocument<'_>, value: PartId) -> bool {
    document
        .parent(value)
        .is_some_and(|p| match document.part(p).kind {
            PartKind::InputArgument {
                argument: Some(a), ..
            }
            | PartKind::InputObjectField { field: Some(a), .. } => a.default_value.is_some(),
            _ => false,
        })
}

/// Checks whether a variable of the `var_type` may be used where a value of
/// the `location_type` is expected.
///
/// A nullable variable may be used in a non-null position only if either
/// side provides a non-null default value.
fn is_usage_allowed(var_type: &Type, location_type: &Type, has_default: bool) -> bool {
    if location_type.is_non_null() && !var_type.is_non_null() {
        has_default && are_types_compatible(var_type, &location_type.nullable())
    } else {
        are_types_compatible(var_type, location_type)
    }
}

fn are_types_compatible(var_type: &Type, location_type: &Type) -> bool {
    if location_type.is_non_null() {
        var_type.is_non_null()
            && are_types_compatible(&var_type.nullable(), &location_type.nullable())
    } else if var_type.is_non_null() {
        are_types_compatible(&var_type.nullable(), location_type)
    } else {
        match (var_type.list_inner(), location_type.list_inner()) {
            (Some(var_inner), Some(location_inner)) => {
                are_types_compatible(var_inner, location_inner)
            }
            (None, None) => var_type.name() == location_type.name(),
            _ => false,
        }
    }
}

fn duplicate_error_message(var_name: impl fmt::Display) -> String {
    format!(r#"There can only be one variable named "${var_name}""#)
}

fn unknown_type_error_message(type_name: impl fmt::Display) -> String {
    format!(r#"Unknown type "{type_name}""#)
}

fn non_input_type_error_message(var_name: impl fmt::Display, type_name: impl fmt::Display) -> String {
    format!(r#"Variable "${var_name}" cannot be non-input type "{type_name}""#)
}

fn undefined_error_message(var_name: impl fmt::Display, op_name: Option<&str>) -> String {
    if let Some(op_name) = op_name {
        format!(r#"Variable "${var_name}" is not defined by operation "{op_name}""#)
    } else {
        format!(r#"Variable "${var_name}" is not defined"#)
    }
}

fn unused_error_message(var_name: impl fmt::Display, op_name: Option<&str>) -> String {
    if let Some(op_name) = op_name {
        format!(r#"Variable "${var_name}" is not used by operation "{op_name}""#)
    } else {
        format!(r#"Variable "${var_name}" is not used"#)
    }
}

fn position_error_message(
    var_name: impl fmt::Display,
    var_type: impl fmt::Display,
    expected_type: impl fmt::Display,
) -> String {
    format!(
        "Variable \"${var_name}\" of type \"{var_type}\" used in position expecting type \
         \"{expected_type}\"",
    )
}
