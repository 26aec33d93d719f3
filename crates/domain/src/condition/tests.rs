use std::collections::BTreeMap;

use fieldgate_core::{GroupId, UserId};
use proptest::prelude::*;
use serde_json::{Value, json};

use super::parser::MAX_DEPTH;
use super::{Condition, EvaluationError, FactSource, Operand};

struct TestFacts {
    facts: BTreeMap<String, Value>,
    memberships: Vec<(UserId, GroupId)>,
}

impl TestFacts {
    fn new(facts: Value) -> Self {
        let facts = match facts {
            Value::Object(map) => map.into_iter().collect(),
            _ => BTreeMap::new(),
        };

        Self {
            facts,
            memberships: Vec::new(),
        }
    }

    fn with_membership(mut self, user_id: i64, group_id: i64) -> Self {
        self.memberships
            .push((UserId::new(user_id), GroupId::new(group_id)));
        self
    }
}

impl FactSource for TestFacts {
    fn fact(&self, name: &str) -> Option<&Value> {
        self.facts.get(name)
    }

    fn is_member(&self, user_id: UserId, group_id: GroupId) -> bool {
        self.memberships.contains(&(user_id, group_id))
    }
}

fn evaluate(source: &str, facts: &TestFacts) -> Result<bool, EvaluationError> {
    match Condition::parse(source) {
        Ok(condition) => condition.evaluate(facts),
        Err(error) => panic!("condition '{source}' failed to parse: {error}"),
    }
}

#[test]
fn always_is_true_without_facts() {
    let facts = TestFacts::new(json!({}));
    assert_eq!(evaluate("always()", &facts), Ok(true));
}

#[test]
fn equals_resolves_dotted_paths() {
    let facts = TestFacts::new(json!({"self": {"id": 5}, "user": {"id": "5"}}));
    assert_eq!(evaluate("equals(self.id, user.id)", &facts), Ok(true));

    let facts = TestFacts::new(json!({"self": {"id": 5}, "user": {"id": 6}}));
    assert_eq!(evaluate("equals(self.id, user.id)", &facts), Ok(false));
}

#[test]
fn in_checks_list_membership() {
    let facts = TestFacts::new(json!({"property": "locale"}));
    assert_eq!(
        evaluate(r#"in(property, ["email", "locale"])"#, &facts),
        Ok(true)
    );
    assert_eq!(evaluate("in(property, ['email'])", &facts), Ok(false));
}

#[test]
fn in_rejects_non_list_haystack() {
    let facts = TestFacts::new(json!({"property": "locale"}));
    assert_eq!(
        evaluate("in(property, property)", &facts),
        Err(EvaluationError::NotAList("property".to_owned()))
    );
}

#[test]
fn in_group_uses_membership_lookup() {
    let facts = TestFacts::new(json!({"user": {"id": 12}})).with_membership(12, 4);
    assert_eq!(evaluate("in_group(user.id, 4)", &facts), Ok(true));
    assert_eq!(evaluate("in_group(user.id, 2)", &facts), Ok(false));
    assert_eq!(evaluate("!in_group(user.id,2)", &facts), Ok(true));
}

#[test]
fn conjunction_requires_both_sides() {
    let facts = TestFacts::new(json!({
        "self": {"id": 5},
        "user": {"id": 5},
        "property": "password"
    }));

    assert_eq!(
        evaluate(
            r#"equals(self.id, user.id) && in(property, ["email","locale"])"#,
            &facts
        ),
        Ok(false)
    );
    assert_eq!(
        evaluate(
            r#"equals(self.id, user.id)&&in(property,["email","locale","password"])"#,
            &facts
        ),
        Ok(true)
    );
}

#[test]
fn conjunction_short_circuits_before_unknown_facts() {
    let facts = TestFacts::new(json!({"property": "theme"}));
    assert_eq!(
        evaluate("in(property, []) && equals(missing.id, 1)", &facts),
        Ok(false)
    );
}

#[test]
fn unknown_fact_is_an_evaluation_error() {
    let facts = TestFacts::new(json!({"self": {"id": 1}}));
    assert_eq!(
        evaluate("equals(self.id, user.id)", &facts),
        Err(EvaluationError::UnknownFact("user.id".to_owned()))
    );
    assert!(evaluate("!equals(self.missing, 1)", &facts).is_err());
}

#[test]
fn parentheses_group_sub_expressions() {
    let facts = TestFacts::new(json!({"property": "icon"}));
    assert_eq!(
        evaluate("!(in(property, ['theme']) && always())", &facts),
        Ok(true)
    );
}

#[test]
fn parser_builds_expected_tree() {
    let parsed = Condition::parse("!in_group(user.id, 2) && always()");
    let Ok(Condition::And(left, right)) = parsed else {
        panic!("expected a conjunction");
    };

    assert_eq!(*right, Condition::Always);
    let Condition::Not(inner) = *left else {
        panic!("expected a negation");
    };
    let Condition::InGroup(Operand::Path(path), Operand::Literal(group)) = *inner else {
        panic!("expected in_group with a path and a literal");
    };
    assert_eq!(path.segments(), ["user".to_owned(), "id".to_owned()]);
    assert_eq!(group, json!(2));
}

#[test]
fn parser_rejects_malformed_conditions() {
    for source in [
        "",
        "always(",
        "always() &",
        "always() always()",
        "unknown_fn()",
        "equals(self.id)",
        "in(property, [\"email\"",
        "equals('open, 1)",
        "self.id",
        "equals(self., 1)",
        "equals(1, 2) || always()",
    ] {
        assert!(
            Condition::parse(source).is_err(),
            "'{source}' should not parse"
        );
    }
}

#[test]
fn parse_error_reports_offset() {
    let error = Condition::parse("always() && nope()").err();
    assert_eq!(error.map(|error| error.position), Some(12));
}

#[test]
fn numeric_literals_and_array_indexes_resolve() {
    let facts = TestFacts::new(json!({"user": {"groups": [2, 4]}}));
    assert_eq!(evaluate("equals(user.groups.1, 4)", &facts), Ok(true));
    assert_eq!(evaluate("in(-1.5, [1, -1.5])", &facts), Ok(true));
}

#[test]
fn deeply_nested_conditions_are_rejected_without_recursing() {
    let negations = format!("{}always()", "!".repeat(100_000));
    let parentheses = format!("{}always(){}", "(".repeat(100_000), ")".repeat(100_000));
    let lists = format!("in(1, {}1{})", "[".repeat(100_000), "]".repeat(100_000));
    let conjunction = vec!["always()"; 100_000].join(" && ");

    for source in [negations, parentheses, lists, conjunction] {
        let error = Condition::parse(source.as_str()).err();
        assert_eq!(
            error.map(|error| error.message),
            Some("condition nested too deeply".to_owned())
        );
    }
}

#[test]
fn nesting_up_to_the_limit_still_parses() {
    let facts = TestFacts::new(json!({}));
    let even_negations = format!("{}always()", "!".repeat(MAX_DEPTH));
    let conjunction = vec!["always()"; MAX_DEPTH + 1].join(" && ");

    assert_eq!(evaluate(even_negations.as_str(), &facts), Ok(true));
    assert_eq!(evaluate(conjunction.as_str(), &facts), Ok(true));
    assert!(Condition::parse(format!("!{even_negations}").as_str()).is_err());
}

proptest! {
    #[test]
    fn evaluation_is_deterministic(id in 0_i64..50, other in 0_i64..50, property in "[a-z]{1,8}") {
        let facts = TestFacts::new(json!({
            "self": {"id": id},
            "user": {"id": other},
            "property": property,
        }))
        .with_membership(other, 2);

        let source = r#"equals(self.id, user.id) && in(property, ["email", "locale"]) && !in_group(user.id, 2)"#;
        let first = evaluate(source, &facts);
        let second = evaluate(source, &facts);
        prop_assert_eq!(first, second);
    }
}
