//! Generated queries: every backend agrees, and preparation is idempotent.

use std::sync::OnceLock;

use eql_tests::prelude::*;
use proptest::prelude::*;

const CONDITIONS: &[&str] = &[
    "number > 1",
    "number <= 2",
    "number != 2",
    "number in (1, 3)",
    "status = BROKE",
    "status != BROKE",
    "status is null",
    "status not in (IN_BUSINESS)",
    "status in (BROKE, null)",
    "created > '2024-03-01'",
    "created < now()",
    "createdBy = currentUser()",
    "createdBy is not null",
    "createdBy = ''",
    "group.name = 'Group One'",
    "group is null",
    "group.name like 'Group%'",
    "representatives contains 'john'",
    "representatives not contains 'joe'",
    "representatives contains (null, 'peter')",
    "representatives is empty",
    "representatives[].name = 'PETER'",
    r"representatives[].name = 'Joe \' Surname'",
    "revenue > 100",
    "founded in ('1999-12-31', '2024-06-15')",
    "listed = true",
    "tags contains 'export'",
    "offices[].city = 'Paris'",
    r"representatives[].name like '%\%%'",
    "representatives[].searchText contains 'eir'",
    "id ilike 'T%'",
    "id not like '%e'",
    "id contains 'o'",
];

const ORDERS: &[&str] = &[
    "",
    " order by id asc",
    " order by status asc",
    " order by number desc",
    " order by group.name desc",
    " order by createdBy asc, id desc",
];

fn world() -> &'static World {
    static WORLD: OnceLock<World> = OnceLock::new();
    WORLD.get_or_init(|| World::new().unwrap())
}

fn query_text() -> impl Strategy<Value = String> {
    (
        prop::collection::vec((prop::sample::select(CONDITIONS), any::<bool>()), 1..4),
        prop::sample::select(ORDERS),
    )
        .prop_map(|(conditions, order)| {
            let mut text = String::new();
            for (i, (condition, and)) in conditions.iter().enumerate() {
                if i > 0 {
                    text.push_str(if *and { " and " } else { " or " });
                }
                text.push('(');
                text.push_str(condition);
                text.push(')');
            }
            text.push_str(order);
            text
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_backends_agree(text in query_text()) {
        let world = world();
        let query = world.prepare(&text, &default_context()).unwrap();
        let expected = world.ids(Backend::Collection, &query).unwrap();
        for backend in [Backend::Predicate, Backend::Criteria] {
            let actual = world.ids(backend, &query).unwrap();
            prop_assert_eq!(&actual, &expected, "{} on {:?}", text, backend);
        }
    }

    #[test]
    fn test_preparation_is_idempotent(text in query_text()) {
        let world = world();
        let context = default_context();
        let query = world.prepare(&text, &context).unwrap();
        let again = world.preparer().prepare("Company", &query, &context).unwrap();
        prop_assert_eq!(again, query);
    }
}
