//! Scalar conditions, null handling and functions on every backend.

use chrono::NaiveDate;
use eql_tests::prelude::*;

mod comparisons {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("comparisons")
            .query("", |e| e.ids(["one", "two", "three"]))
            .query("number > 1", |e| e.ids(["two", "three"]))
            .query("number >= 2 and number < 3", |e| e.ids(["two"]))
            .query("number = '2'", |e| e.ids(["two"]))
            .query("number != 2", |e| e.ids(["one", "three"]))
            .query("number <> 2 and number <= 1", |e| e.ids(["one"]))
            .query("(number = 1 or number = 3) and status is not null", |e| e.ids(["one"]))
            .query("number = 1 or number = 2 and status = BROKE", |e| e.ids(["one"]))
            .query("number > 5", |e| e.none())
    }

    #[test]
    fn test_comparisons() {
        scenario().run().unwrap();
    }
}

mod membership {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("membership")
            .query("id in ('one', 'two')", |e| e.ids(["one", "two"]))
            .query("id in 'three'", |e| e.ids(["three"]))
            .query("id not in ('one')", |e| e.ids(["two", "three"]))
            .query("number in (1, 3)", |e| e.ids(["one", "three"]))
            .query("status in (BROKE, IN_BUSINESS)", |e| e.ids(["one", "two"]))
    }

    #[test]
    fn test_in_and_not_in() {
        scenario().run().unwrap();
    }
}

mod typed_properties {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("typed_properties")
            .query("revenue > 100", |e| e.ids(["two"]))
            .query("revenue <= 1.5", |e| e.ids(["one"]))
            .query("revenue = 250", |e| e.ids(["two"]))
            .query("revenue != 1.5", |e| e.ids(["two"]))
            .query("revenue in (1.5, 250)", |e| e.ids(["one", "two"]))
            .query("revenue in ('250.0')", |e| e.ids(["two"]))
            .query("revenue is null", |e| e.ids(["three"]))
            .query("founded < '2000-01-01'", |e| e.ids(["one"]))
            .query("founded >= '2024-06-15'", |e| e.ids(["two"]))
            .query("founded in ('1999-12-31', '2024-06-15')", |e| e.ids(["one", "two"]))
            .query("founded not in ('1999-12-31')", |e| e.ids(["two"]))
            .query("founded < today()", |e| e.ids(["one", "two"]))
            .query("listed = true", |e| e.ids(["two"]))
            .query("listed = false", |e| e.ids(["one", "three"]))
            .query("listed != true", |e| e.ids(["one", "three"]))
            .query("listed in (true) and revenue > 1", |e| e.ids(["two"]))
    }

    #[test]
    fn test_float_date_and_bool_properties() {
        scenario().run().unwrap();
    }
}

mod element_collections {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("element_collections")
            .query("tags contains 'export'", |e| e.ids(["one"]))
            .query("tags contains ('retail', 'export')", |e| e.ids(["one", "two"]))
            .query("tags not contains 'export'", |e| e.ids(["two", "three"]))
            .query("tags is empty", |e| e.ids(["three"]))
            .query("tags is not empty", |e| e.ids(["one", "two"]))
    }

    #[test]
    fn test_collections_of_values() {
        scenario().run().unwrap();
    }
}

mod nulls {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("nulls")
            .query("status = BROKE", |e| e.ids(["one"]))
            .query("status != BROKE", |e| e.ids(["two"]))
            .query("status not in (BROKE)", |e| e.ids(["two"]))
            .query("status in (BROKE, null)", |e| e.ids(["one", "three"]))
            .query("status not in (null, BROKE)", |e| e.ids(["two"]))
            .query("status not in (null)", |e| e.ids(["one", "two"]))
            .query("status is null", |e| e.ids(["three"]))
            .query("status is empty", |e| e.ids(["three"]))
            .query("status is not empty", |e| e.ids(["one", "two"]))
            .query("status = null", |e| e.ids(["three"]))
            .query("status != NULL", |e| e.ids(["one", "two"]))
            .query("createdBy = ''", |e| e.ids(["three"]))
            .query("createdBy != ''", |e| e.ids(["one", "two"]))
    }

    #[test]
    fn test_nulls_never_match_comparisons() {
        scenario().run().unwrap();
    }
}

mod functions {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("functions")
            .query("created > '2024-03-01'", |e| e.ids(["two", "three"]))
            .query("created < '2024-06-15 12:30:00'", |e| e.ids(["one"]))
            .query("created < now()", |e| e.ids(["one", "two"]))
            .query("created >= today()", |e| e.ids(["three"]))
            .query("createdBy = currentUser()", |e| e.ids(["two"]))
            .query("createdBy != currentUser()", |e| e.ids(["one"]))
            .context(default_context().with_principal("admin"))
            .query("createdBy = currentUser()", |e| e.ids(["one"]))
            .context(QueryContext::new(default_context().now))
            .query("createdBy = currentUser()", |e| e.error(ErrorKind::FunctionResolution))
    }

    #[test]
    fn test_functions_resolve_from_context() {
        scenario().run().unwrap();
    }
}

mod sub_second_now {
    use super::*;

    /// Half a second after company `one` was created.
    fn context() -> QueryContext {
        let now = NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|d| d.and_hms_milli_opt(10, 0, 0, 500))
            .unwrap();
        QueryContext::new(now)
    }

    pub fn scenario() -> Scenario {
        Scenario::new("sub_second_now")
            .context(context())
            .query("created = now()", |e| e.none())
            .query("created < now()", |e| e.ids(["one"]))
            .query("created <= now()", |e| e.ids(["one"]))
            .query("created >= now()", |e| e.ids(["two", "three"]))
            .query("created > '2024-01-01 10:00:00.25'", |e| e.ids(["two", "three"]))
            .query("created = '2024-01-01 10:00:00.000'", |e| e.ids(["one"]))
    }

    #[test]
    fn test_now_keeps_fractional_seconds() {
        scenario().run().unwrap();
    }
}
