//! Validation clauses, one per module.

mod directives_in_valid_locations;
mod executable_definitions;
mod fields_on_correct_type;
mod fragments_on_composite_types;
mod known_argument_names;
mod known_directives;
mod known_fragment_names;
mod known_input_field_names;
mod known_type_names;
mod lone_anonymous_operation;
mod no_fragment_cycles;
mod no_unused_fragments;
mod possible_fragment_spreads;
mod provided_required_arguments;
mod required_input_fields;
mod scalar_leafs;
mod single_field_subscriptions;
mod supported_operation_types;
mod unique_argument_names;
mod unique_directives_per_location;
mod unique_fragment_names;
mod unique_input_field_names;
mod unique_operation_names;
mod values_of_correct_type;
mod variable_definitions;

use crate::{
    document::{PartId, QueryDocument},
    schema::meta::MetaType,
    validation::RuleStep,
};

pub use self::{
    directives_in_valid_locations::DirectivesInValidLocations,
    executable_definitions::ExecutableDefinitions, fields_on_correct_type::FieldsOnCorrectType,
    fragments_on_composite_types::FragmentsOnCompositeTypes,
    known_argument_names::KnownArgumentNames, known_directives::KnownDirectives,
    known_fragment_names::KnownFragmentNames, known_input_field_names::KnownInputFieldNames,
    known_type_names::KnownTypeNames, lone_anonymous_operation::LoneAnonymousOperation,
    no_fragment_cycles::NoFragmentCycles, no_unused_fragments::NoUnusedFragments,
    possible_fragment_spreads::PossibleFragmentSpreads,
    provided_required_arguments::ProvidedRequiredArguments,
    required_input_fields::RequiredInputFields, scalar_leafs::ScalarLeafs,
    single_field_subscriptions::SingleFieldSubscriptions,
    supported_operation_types::SupportedOperationTypes,
    unique_argument_names::UniqueArgumentNames,
    unique_directives_per_location::UniqueDirectivesPerLocation,
    unique_fragment_names::UniqueFragmentNames, unique_input_field_names::UniqueInputFieldNames,
    unique_operation_names::UniqueOperationNames, values_of_correct_type::ValuesOfCorrectType,
    variable_definitions::VariableDefinitions,
};

/// Every validation rule, in clause order.
pub fn all_rules() -> Vec<Box<dyn RuleStep>> {
    vec![
        Box::new(executable_definitions::factory()),
        Box::new(supported_operation_types::factory()),
        Box::new(unique_operation_names::factory()),
        Box::new(lone_anonymous_operation::factory()),
        Box::new(single_field_subscriptions::factory()),
        Box::new(fields_on_correct_type::factory()),
        Box::new(scalar_leafs::factory()),
        Box::new(known_argument_names::factory()),
        Box::new(unique_argument_names::factory()),
        Box::new(provided_required_arguments::factory()),
        Box::new(unique_fragment_names::factory()),
        Box::new(known_type_names::factory()),
        Box::new(fragments_on_composite_types::factory()),
        Box::new(no_unused_fragments::factory()),
        Box::new(known_fragment_names::factory()),
        Box::new(no_fragment_cycles::factory()),
        Box::new(possible_fragment_spreads::factory()),
        Box::new(values_of_correct_type::factory()),
        Box::new(known_input_field_names::factory()),
        Box::new(unique_input_field_names::factory()),
        Box::new(required_input_fields::factory()),
        Box::new(known_directives::factory()),
        Box::new(directives_in_valid_locations::factory()),
        Box::new(unique_directives_per_location::factory()),
        Box::new(variable_definitions::factory()),
    ]
}

/// Graph type of the part owning the one with the provided `id`.
fn parent_type<'a>(document: &QueryDocument<'a>, id: PartId) -> Option<&'a MetaType> {
    document
        .parent(id)
        .and_then(|p| document.part(p).graph_type)
}

/// Checks whether a sibling placed before the part with the provided `id`
/// has the same `key`.
fn has_earlier_sibling<K: PartialEq>(
    document: &QueryDocument<'_>,
    id: PartId,
    key: impl Fn(PartId) -> Option<K>,
) -> bool {
    let Some(own) = key(id) else {
        return false;
    };
    let Some(parent) = document.parent(id) else {
        return false;
    };
    document
        .children(parent)
        .iter()
        .take_while(|&&c| c != id)
        .any(|&c| key(c).as_ref() == Some(&own))
}
