use std::fmt;

use crate::{
    ast::Type,
    document::{DocumentPartType, PartKind},
    schema::meta::Argument,
    validation::{DocumentValidationContext, RuleScope, RuleStep},
};

/// Required arguments of fields and directives must be supplied.
///
/// Arguments supplied with a `null` value are checked by
/// [`ValuesOfCorrectType`](super::ValuesOfCorrectType).
#[derive(Clone, Copy, Debug, Default)]
pub struct ProvidedRequiredArguments;

pub fn factory() -> ProvidedRequiredArguments {
    ProvidedRequiredArguments
}

impl RuleStep for ProvidedRequiredArguments {
    fn rule_number(&self) -> &'static str {
        "5.4.2.1"
    }

    fn rule_anchor(&self) -> &'static str {
        "sec-Required-Arguments"
    }

    fn applies_to(&self) -> &'static [RuleScope] {
        &[
            RuleScope::Part(DocumentPartType::Field),
            RuleScope::Part(DocumentPartType::Directive),
        ]
    }

    fn execute(&self, ctx: &mut DocumentValidationContext<'_, '_>) -> bool {
        let Some(id) = ctx.active_part() else {
            return true;
        };
        let document = ctx.document();
        let (owner, meta_args, is_field): (&str, &[Argument], bool) =
            match document.part(id).kind {
                PartKind::Field {
                    name,
                    field: Some(f),
                    ..
                } => (name, &f.arguments, true),
                PartKind::Directive {
                    name,
                    directive: Some(d),
                    ..
                } => (name, &d.arguments, false),
                _ => return true,
            };
        let provided = document
            .children(id)
            .iter()
            .filter_map(|&c| match document.part(c).kind {
                PartKind::InputArgument { name, .. } => Some(name),
                _ => None,
            })
            .collect::<Vec<_>>();

        let messages = meta_args
            .iter()
            .filter(|a| a.is_required() && !provided.contains(&a.name.as_str()))
            .map(|a| {
                if is_field {
                    field_error_message(owner, &a.name, &a.arg_type)
                } else {
                    directive_error_message(owner, &a.name, &a.arg_type)
                }
            })
            .collect::<Vec<_>>();

        let passed = messages.is_empty();
        for message in messages {
            ctx.report_error(self.reference(), id, message);
        }
        passed
    }
}

fn field_error_message(
    field_name: impl fmt::Display,
    arg_name: impl fmt::Display,
    type_name: &Type,
) -> String {
    format!(
        r#"Field "{field_name}" argument "{arg_name}" of type "{type_name}" is required but not provided"#,
    )
}

fn directive_error_message(
    directive_name: impl fmt::Display,
    arg_name: impl fmt::Display,
    type_name: &Type,
) -> String {
    format!(
        r#"Directive "@{directive_name}" argument "{arg_name}" of type "{type_name}" is required but not provided"#,
    )
}
