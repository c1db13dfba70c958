use pretty_assertions::assert_eq;

use crate::{
    ast::Type,
    document::construct_document,
    parser::parse_document_source,
    schema::{
        meta::{
            Argument, EnumMeta, EnumValue, Field, InputObjectMeta, InterfaceMeta, ObjectMeta,
            UnionMeta,
        },
        model::{DirectiveLocation, DirectiveType, SchemaType},
    },
    validation::{RuleError, RuleStep, validate_document_with_rules},
};

fn named_field(name: &str) -> Field {
    Field::new(name, Type::named("String"))
        .argument(Argument::new("surname", Type::named("Boolean")))
}

fn string_field_with_args(name: &str, args: &[Argument]) -> Field {
    args.iter()
        .cloned()
        .fold(Field::new(name, Type::named("String")), Field::argument)
}

/// Schema most of the validation tests run against.
pub(crate) fn test_schema() -> SchemaType {
    SchemaType::new("QueryRoot")
        .mutation("MutationRoot")
        .subscription("SubscriptionRoot")
        .register(InterfaceMeta::new("Being", &[named_field("name")]).into_meta())
        .register(InterfaceMeta::new("Pet", &[named_field("name")]).into_meta())
        .register(
            InterfaceMeta::new("Canine", &[named_field("name")])
                .interfaces(&[Type::named("Being")])
                .into_meta(),
        )
        .register(
            EnumMeta::new(
                "DogCommand",
                &[
                    EnumValue::new("SIT"),
                    EnumValue::new("HEEL"),
                    EnumValue::new("DOWN"),
                ],
            )
            .into_meta(),
        )
        .register(
            ObjectMeta::new(
                "Dog",
                &[
                    named_field("name"),
                    Field::new("nickname", Type::named("String")),
                    Field::new("barkVolume", Type::named("Int")),
                    Field::new("barks", Type::named("Boolean")),
                    Field::new("doesKnowCommand", Type::named("Boolean"))
                        .argument(Argument::new("dogCommand", Type::named("DogCommand"))),
                    Field::new("isHousetrained", Type::named("Boolean")).argument(
                        Argument::new("atOtherHomes", Type::named("Boolean")).default_value("true"),
                    ),
                    Field::new("isAtLocation", Type::named("Boolean"))
                        .argument(Argument::new("x", Type::named("Int")))
                        .argument(Argument::new("y", Type::named("Int"))),
                ],
            )
            .interfaces(&[
                Type::named("Being"),
                Type::named("Pet"),
                Type::named("Canine"),
            ])
            .into_meta(),
        )
        .register(
            EnumMeta::new(
                "FurColor",
                &[
                    EnumValue::new("BROWN"),
                    EnumValue::new("BLACK"),
                    EnumValue::new("TAN"),
                    EnumValue::new("SPOTTED"),
                ],
            )
            .into_meta(),
        )
        .register(
            ObjectMeta::new(
                "Cat",
                &[
                    named_field("name"),
                    Field::new("nickname", Type::named("String")),
                    Field::new("meows", Type::named("Boolean")),
                    Field::new("meowVolume", Type::named("Int")),
                    Field::new("furColor", Type::named("FurColor")),
                ],
            )
            .interfaces(&[Type::named("Being"), Type::named("Pet")])
            .into_meta(),
        )
        .register(UnionMeta::new("CatOrDog", &[Type::named("Cat"), Type::named("Dog")]).into_meta())
        .register(InterfaceMeta::new("Intelligent", &[Field::new("iq", Type::named("Int"))]).into_meta())
        .register(
            ObjectMeta::new(
                "Human",
                &[
                    named_field("name"),
                    Field::new("pets", Type::list(Type::named("Pet"))),
                    Field::new("relatives", Type::list(Type::non_null_named("Human"))),
                    Field::new("iq", Type::named("Int")),
                ],
            )
            .interfaces(&[Type::named("Being"), Type::named("Intelligent")])
            .into_meta(),
        )
        .register(
            ObjectMeta::new(
                "Alien",
                &[
                    named_field("name"),
                    Field::new("iq", Type::named("Int")),
                    Field::new("numEyes", Type::named("Int")),
                ],
            )
            .interfaces(&[Type::named("Being"), Type::named("Intelligent")])
            .into_meta(),
        )
        .register(UnionMeta::new("DogOrHuman", &[Type::named("Dog"), Type::named("Human")]).into_meta())
        .register(
            UnionMeta::new("HumanOrAlien", &[Type::named("Human"), Type::named("Alien")]).into_meta(),
        )
        .register(
            InputObjectMeta::new(
                "ComplexInput",
                &[
                    Argument::new("requiredField", Type::non_null_named("Boolean")),
                    Argument::new("intField", Type::named("Int")),
                    Argument::new("stringField", Type::named("String")),
                    Argument::new("booleanField", Type::named("Boolean")),
                    Argument::new("stringListField", Type::list(Type::named("String"))),
                ],
            )
            .into_meta(),
        )
        .register(
            ObjectMeta::new(
                "ComplicatedArgs",
                &[
                    string_field_with_args("intArgField", &[Argument::new("intArg", Type::named("Int"))]),
                    string_field_with_args(
                        "nonNullIntArgField",
                        &[Argument::new("nonNullIntArg", Type::non_null_named("Int"))],
                    ),
                    string_field_with_args(
                        "nonNullIntArgFieldWithDefault",
                        &[Argument::new("nonNullIntArg", Type::non_null_named("Int"))
                            .default_value("3")],
                    ),
                    string_field_with_args(
                        "stringArgField",
                        &[Argument::new("stringArg", Type::named("String"))],
                    ),
                    string_field_with_args(
                        "booleanArgField",
                        &[Argument::new("booleanArg", Type::named("Boolean"))],
                    ),
                    string_field_with_args(
                        "enumArgField",
                        &[Argument::new("enumArg", Type::named("FurColor"))],
                    ),
                    string_field_with_args(
                        "floatArgField",
                        &[Argument::new("floatArg", Type::named("Float"))],
                    ),
                    string_field_with_args("idArgField", &[Argument::new("idArg", Type::named("ID"))]),
                    string_field_with_args(
                        "stringListArgField",
                        &[Argument::new("stringListArg", Type::list(Type::named("String")))],
                    ),
                    string_field_with_args(
                        "nonNullStringListArgField",
                        &[Argument::new(
                            "nonNullStringListArg",
                            Type::list(Type::non_null_named("String")).non_null(),
                        )],
                    ),
                    string_field_with_args(
                        "complexArgField",
                        &[Argument::new("complexArg", Type::named("ComplexInput"))],
                    ),
                    string_field_with_args(
                        "multipleReqs",
                        &[
                            Argument::new("req1", Type::non_null_named("Int")),
                            Argument::new("req2", Type::non_null_named("Int")),
                        ],
                    ),
                    string_field_with_args(
                        "multipleOpts",
                        &[
                            Argument::new("opt1", Type::named("Int")).default_value("0"),
                            Argument::new("opt2", Type::named("Int")).default_value("0"),
                        ],
                    ),
                    string_field_with_args(
                        "multipleOptAndReq",
                        &[
                            Argument::new("req1", Type::non_null_named("Int")),
                            Argument::new("req2", Type::non_null_named("Int")),
                            Argument::new("opt1", Type::named("Int")).default_value("0"),
                            Argument::new("opt2", Type::named("Int")).default_value("0"),
                        ],
                    ),
                ],
            )
            .into_meta(),
        )
        .register(
            ObjectMeta::new(
                "QueryRoot",
                &[
                    Field::new("human", Type::named("Human"))
                        .argument(Argument::new("id", Type::named("ID"))),
                    Field::new("alien", Type::named("Alien")),
                    Field::new("dog", Type::named("Dog")),
                    Field::new("cat", Type::named("Cat")),
                    Field::new("pet", Type::named("Pet")),
                    Field::new("catOrDog", Type::named("CatOrDog")),
                    Field::new("dogOrHuman", Type::named("DogOrHuman")),
                    Field::new("humanOrAlien", Type::named("HumanOrAlien")),
                    Field::new("complicatedArgs", Type::named("ComplicatedArgs")),
                ],
            )
            .into_meta(),
        )
        .register(
            InputObjectMeta::new(
                "TestInput",
                &[
                    Argument::new("id", Type::non_null_named("Int")),
                    Argument::new("name", Type::non_null_named("String")),
                ],
            )
            .into_meta(),
        )
        .register(
            ObjectMeta::new(
                "MutationRoot",
                &[Field::new("testInput", Type::non_null_named("Int")).argument(
                    Argument::new("input", Type::named("TestInput"))
                        .default_value("{id: 423, name: \"foo\"}"),
                )],
            )
            .into_meta(),
        )
        .register(
            ObjectMeta::new(
                "SubscriptionRoot",
                &[
                    Field::new("newDog", Type::named("Dog")),
                    Field::new("newCat", Type::named("Cat")),
                ],
            )
            .into_meta(),
        )
        .directive(DirectiveType::new("onQuery", &[DirectiveLocation::Query], &[]))
        .directive(DirectiveType::new("onMutation", &[DirectiveLocation::Mutation], &[]))
        .directive(DirectiveType::new("onField", &[DirectiveLocation::Field], &[]))
        .directive(DirectiveType::new(
            "onFragmentDefinition",
            &[DirectiveLocation::FragmentDefinition],
            &[],
        ))
        .directive(DirectiveType::new(
            "onFragmentSpread",
            &[DirectiveLocation::FragmentSpread],
            &[],
        ))
        .directive(DirectiveType::new(
            "onInlineFragment",
            &[DirectiveLocation::InlineFragment],
            &[],
        ))
        .directive(DirectiveType::new(
            "onVariable",
            &[DirectiveLocation::VariableDefinition],
            &[],
        ))
        .directive(
            DirectiveType::new(
                "tag",
                &[DirectiveLocation::Field, DirectiveLocation::VariableDefinition],
                &[Argument::new("name", Type::non_null_named("String"))],
            )
            .repeatable(),
        )
        .build()
        .unwrap_or_else(|e| panic!("Invalid test schema: {e}"))
}

pub(crate) fn validate<R, F>(schema: &SchemaType, factory: F, q: &str) -> Vec<RuleError>
where
    R: RuleStep + 'static,
    F: FnOnce() -> R,
{
    let tree = parse_document_source(q)
        .unwrap_or_else(|e| panic!("Parse error on input {q:#?}: {e}"));
    let mut document = construct_document(schema, q, &tree);
    tree.release();

    validate_document_with_rules(&mut document, &[Box::new(factory())])
}

pub(crate) fn expect_passes_rule<R, F>(factory: F, q: &str)
where
    R: RuleStep + 'static,
    F: FnOnce() -> R,
{
    expect_passes_rule_with_schema(&test_schema(), factory, q);
}

pub(crate) fn expect_passes_rule_with_schema<R, F>(schema: &SchemaType, factory: F, q: &str)
where
    R: RuleStep + 'static,
    F: FnOnce() -> R,
{
    let errs = validate(schema, factory, q);

    if !errs.is_empty() {
        print_errors(&errs);
        panic!("Expected rule to pass, but errors found");
    }
}

/// Checks that the rule fails with exactly the `expected_messages`, in order.
pub(crate) fn expect_fails_rule<R, F>(
    factory: F,
    q: &str,
    expected_messages: &[&str],
) -> Vec<RuleError>
where
    R: RuleStep + 'static,
    F: FnOnce() -> R,
{
    expect_fails_rule_with_schema(&test_schema(), factory, q, expected_messages)
}

pub(crate) fn expect_fails_rule_with_schema<R, F>(
    schema: &SchemaType,
    factory: F,
    q: &str,
    expected_messages: &[&str],
) -> Vec<RuleError>
where
    R: RuleStep + 'static,
    F: FnOnce() -> R,
{
    let errs = validate(schema, factory, q);

    if errs.is_empty() {
        panic!("Expected rule to fail, but no errors were found");
    }
    let messages = errs.iter().map(RuleError::message).collect::<Vec<_>>();
    if messages != expected_messages {
        print_errors(&errs);
    }
    assert_eq!(messages, expected_messages);

    errs
}

fn print_errors(errs: &[RuleError]) {
    for err in errs {
        let p = err.location();
        println!(
            "[{:>3},{:>3},{:>3}]  {}  ({})",
            p.index(),
            p.line(),
            p.column(),
            err.message(),
            err.origin().path(),
        );
    }
}
