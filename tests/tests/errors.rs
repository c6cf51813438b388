//! Queries rejected at parse or preparation time.

use eql_tests::prelude::*;

mod parse_errors {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("parse_errors")
            .query("number = ", |e| e.error(ErrorKind::Parse))
            .query("order by id", |e| e.error(ErrorKind::Parse))
            .query("id is nothing", |e| e.error(ErrorKind::Parse))
            .query("id in ()", |e| e.error(ErrorKind::Parse))
            .query("(number = 1", |e| e.error(ErrorKind::Parse))
            .query("number = 1 number = 2", |e| e.error(ErrorKind::Parse))
    }

    #[test]
    fn test_parse_errors() {
        scenario().run().unwrap();
    }
}

mod resolution_errors {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("resolution_errors")
            .query("nothing = 1", |e| e.error(ErrorKind::UnknownProperty))
            .query("group.nothing = 1", |e| e.error(ErrorKind::UnknownProperty))
            .query("representatives.name = 'x'", |e| e.error(ErrorKind::InvalidPath))
            .query("group[].name = 'x'", |e| e.error(ErrorKind::InvalidPath))
            .query("number.value = 1", |e| e.error(ErrorKind::InvalidPath))
    }

    #[test]
    fn test_unresolvable_paths() {
        scenario().run().unwrap();
    }
}

mod type_errors {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("type_errors")
            .query("number = 'abc'", |e| e.error(ErrorKind::TypeCoercion))
            .query("status = RICH", |e| e.error(ErrorKind::TypeCoercion))
            .query("created > 'yesterday'", |e| e.error(ErrorKind::TypeCoercion))
            .query("number = (1, 2)", |e| e.error(ErrorKind::Parse))
            .query(r"id like 'abc\\'", |e| e.error(ErrorKind::TypeCoercion))
            .query("number like 1", |e| e.error(ErrorKind::InvalidOperator))
            .query("representatives > 'john'", |e| e.error(ErrorKind::InvalidOperator))
            .query("status like 'B%'", |e| e.error(ErrorKind::TypeCoercion))
    }

    #[test]
    fn test_operands_and_operators_are_checked() {
        scenario().run().unwrap();
    }
}

mod sort_errors {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("sort_errors")
            .query("order by representatives asc", |e| e.error(ErrorKind::UnsortableProperty))
            .query("order by representatives[].name asc", |e| e.error(ErrorKind::UnsortableProperty))
            .query("order by nothing desc", |e| e.error(ErrorKind::UnknownProperty))
    }

    #[test]
    fn test_unsortable_properties() {
        scenario().run().unwrap();
    }
}
