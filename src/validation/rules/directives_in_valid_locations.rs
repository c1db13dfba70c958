use std::fmt;

use crate::{
    document::{DocumentPartType, PartKind},
    validation::{DocumentValidationContext, RuleScope, RuleStep},
};

/// Directives must only be applied at locations they're defined for.
#[derive(Clone, Copy, Debug, Default)]
pub struct DirectivesInValidLocations;

pub fn factory() -> DirectivesInValidLocations {
    DirectivesInValidLocations
}

impl RuleStep for DirectivesInValidLocations {
    fn rule_number(&self) -> &'static str {
        "5.7.2"
    }

    fn rule_anchor(&self) -> &'static str {
        "sec-Directives-Are-In-Valid-Locations"
    }

    fn applies_to(&self) -> &'static [RuleScope] {
        &[RuleScope::Part(DocumentPartType::Directive)]
    }

    fn execute(&self, ctx: &mut DocumentValidationContext<'_, '_>) -> bool {
        let Some(id) = ctx.active_part() else {
            return true;
        };
        let PartKind::Directive {
            name,
            directive: Some(directive),
            location,
        } = ctx.document().part(id).kind
        else {
            return true;
        };
        if directive.locations.contains(&location) {
            return true;
        }

        ctx.report_error(self.reference(), id, error_message(name, location));
        false
    }
}

fn error_message(directive_name: impl fmt::Display, location: impl fmt::Display) -> String {
    format!(r#"Directive "@{directive_name}" may not be used on {location}"#)
}

#[cfg(test)]
mod tests {
    use super::{error_message, factory};

    use crate::{
        schema::model::DirectiveLocation,
        validation::{expect_fails_rule, expect_passes_rule},
    };

    #[test]
    fn with_well_placed_directives() {
        expect_passes_rule(
            factory,
            r#"
          query Foo($var: Boolean @onVariable) @onQuery {
            name @include(if: $var)
            ...Frag @include(if: true) @onFragmentSpread
            ... @onInlineFragment { name }
            skippedField @skip(if: true)
          }

          mutation Bar @onMutation {
            someField
          }

          fragment Frag on QueryRoot @onFragmentDefinition {
            dog { name @onField }
          }
        "#,
        );
    }

    #[test]
    fn unknown_directives_are_ignored() {
        expect_passes_rule(factory, "{ dog @unknown { name } }");
    }

    #[test]
    fn with_misplaced_directives() {
        expect_fails_rule(
            factory,
            r#"
          query Foo @include(if: true) {
            name @onQuery
            ...Frag @onQuery
          }

          mutation Bar @onQuery {
            someField
          }
        "#,
            &[
                error_message("include", DirectiveLocation::Query).as_str(),
                error_message("onQuery", DirectiveLocation::Field).as_str(),
                error_message("onQuery", DirectiveLocation::FragmentSpread).as_str(),
                error_message("onQuery", DirectiveLocation::Mutation).as_str(),
            ],
        );
    }

    #[test]
    fn with_misplaced_variable_directive() {
        expect_fails_rule(
            factory,
            r#"
          query Foo($var: Boolean @onField) {
            name
          }
        "#,
            &[error_message("onField", DirectiveLocation::VariableDefinition).as_str()],
        );
    }

    #[test]
    fn with_misplaced_fragment_directives() {
        expect_fails_rule(
            factory,
            r#"
          fragment Frag on Dog @onFragmentSpread {
            ... on Dog @onFragmentDefinition { name }
          }
        "#,
            &[
                error_message("onFragmentSpread", DirectiveLocation::FragmentDefinition).as_str(),
                error_message("onFragmentDefinition", DirectiveLocation::InlineFragment).as_str(),
            ],
        );
    }
}
