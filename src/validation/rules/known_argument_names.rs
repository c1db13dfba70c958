use std::fmt;

use crate::{
    document::{DocumentPartType, PartId, PartKind, QueryDocument},
    schema::meta::MetaType,
    validation::{DocumentValidationContext, RuleScope, RuleStep},
};

use super::parent_type;

/// Supplied arguments must be defined by their field or directive.
#[derive(Clone, Copy, Debug, Default)]
pub struct KnownArgumentNames;

pub fn factory() -> KnownArgumentNames {
    KnownArgumentNames
}

/// What an argument is supplied to.
enum ArgumentOwner<'a> {
    Field {
        name: &'a str,
        parent_type: Option<&'a MetaType>,
    },
    Directive {
        name: &'a str,
    },
}

fn argument_owner<'a>(document: &QueryDocument<'a>, id: PartId) -> Option<ArgumentOwner<'a>> {
    let owner = document.parent(id)?;
    match document.part(owner).kind {
        PartKind::Field {
            name,
            field: Some(_),
            ..
        } => Some(ArgumentOwner::Field {
            name,
            parent_type: parent_type(document, owner),
        }),
        PartKind::Directive {
            name,
            directive: Some(_),
            ..
        } => Some(ArgumentOwner::Directive { name }),
        _ => None,
    }
}

impl RuleStep for KnownArgumentNames {
    fn rule_number(&self) -> &'static str {
        "5.4.1"
    }

    fn rule_anchor(&self) -> &'static str {
        "sec-Argument-Names"
    }

    fn applies_to(&self) -> &'static [RuleScope] {
        &[RuleScope::Part(DocumentPartType::InputArgument)]
    }

    fn should_execute(&self, ctx: &DocumentValidationContext<'_, '_>) -> bool {
        ctx.active_part()
            .is_some_and(|id| argument_owner(ctx.document(), id).is_some())
    }

    fn execute(&self, ctx: &mut DocumentValidationContext<'_, '_>) -> bool {
        let Some(id) = ctx.active_part() else {
            return true;
        };
        let document = ctx.document();
        let PartKind::InputArgument {
            name,
            argument: None,
        } = document.part(id).kind
        else {
            return true;
        };

        let message = match argument_owner(document, id) {
            Some(ArgumentOwner::Field {
                name: field,
                parent_type,
            }) => field_error_message(name, field, parent_type.map_or("", MetaType::name)),
            Some(ArgumentOwner::Directive { name: directive }) => {
                directive_error_message(name, directive)
            }
            None => return true,
        };
        ctx.report_error(self.reference(), id, message);
        false
    }
}

fn field_error_message(
    arg_name: impl fmt::Display,
    field_name: impl fmt::Display,
    type_name: impl fmt::Display,
) -> String {
    format!(
        r#"Unknown argument "{arg_name}" on field "{field_name}" of type "{type_name}""#,
    )
}

fn directive_error_message(
    arg_name: impl fmt::Display,
    directive_name: impl fmt::Display,
) -> String {
    format!(r#"Unknown argument "{arg_name}" on directive "@{directive_name}""#)
}
