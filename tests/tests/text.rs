//! Pattern matching, escaping and property translators.

use eql_tests::prelude::*;

mod patterns {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("patterns")
            .query("id like 't%'", |e| e.ids(["two", "three"]))
            .query("id like 'T%'", |e| e.none())
            .query("id ilike 'T%'", |e| e.ids(["two", "three"]))
            .query("id not ilike 'T%'", |e| e.ids(["one"]))
            .query("id like '_wo'", |e| e.ids(["two"]))
            .query("id not like '%o'", |e| e.ids(["one", "three"]))
            .query("id contains 'w'", |e| e.ids(["two"]))
            .query("id not contains 'e'", |e| e.ids(["two"]))
            .query("createdBy like '%'", |e| e.ids(["one", "two"]))
            .query("createdBy not like 'a%'", |e| e.ids(["two"]))
    }

    #[test]
    fn test_like_and_ilike() {
        scenario().run().unwrap();
    }
}

mod escaping {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("escaping")
            .query(r"representatives[].name like '%\%%'", |e| e.ids(["one"]))
            .query(r"representatives[].name like 'Wei\%rdo'", |e| e.ids(["one"]))
            .query("representatives[].name = 'wei%rdo'", |e| e.ids(["one"]))
            .query("representatives[].name = 'we%'", |e| e.none())
            .query("representatives[].name contains '%'", |e| e.ids(["one"]))
    }

    #[test]
    fn test_wildcards_in_values_are_literal() {
        scenario().run().unwrap();
    }
}

mod quotes {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("quotes")
            .query(r"representatives[].name = 'Joe \' Surname'", |e| e.ids(["one"]))
            .query(r#"representatives[].name = "Joe ' Surname""#, |e| e.ids(["one"]))
            .query(r"representatives[].name like 'joe \' %'", |e| e.ids(["one"]))
            .query(r"representatives[].name contains '\''", |e| e.ids(["one"]))
            .query(r"representatives[].id = 'Joe \' Surname'", |e| e.none())
            .query(r"createdBy in ('admin', 'o\'brien')", |e| e.ids(["one"]))
    }

    #[test]
    fn test_quoted_values_match_literally() {
        scenario().run().unwrap();
    }
}

mod translators {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("translators")
            .query("representatives[].name = 'JOHN'", |e| e.ids(["one", "two"]))
            .query("representatives[].name like 'jo%'", |e| e.ids(["one", "two"]))
            .query("representatives[].name not like 'jo%'", |e| e.ids(["one", "two"]))
            .query("representatives[].searchText contains 'PET'", |e| e.ids(["two"]))
            .query("representatives[].searchText contains 'eird'", |e| e.ids(["one"]))
            .query("representatives[].searchText = 'joe'", |e| e.ids(["two"]))
    }

    #[test]
    fn test_ignore_case_and_expanded_properties() {
        scenario().run().unwrap();
    }
}
