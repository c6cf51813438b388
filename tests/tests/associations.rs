//! Paths through single- and multi-valued associations, and associated queries.

use eql_core::Value;
use eql_tests::prelude::*;
use pretty_assertions::assert_eq;

mod single_valued {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("single_valued")
            .query("group.name = 'Group One'", |e| e.ids(["one", "two"]))
            .query("group = 'g1'", |e| e.ids(["one", "two"]))
            .query("group = 'g2'", |e| e.none())
            .query("group is null", |e| e.ids(["three"]))
            .query("group is not null and number > 1", |e| e.ids(["two"]))
            .query("group.name != 'Group One'", |e| e.none())
            .query("group.name like 'Group%' or number = 3", |e| e.ids(["one", "two", "three"]))
    }

    #[test]
    fn test_single_valued_paths() {
        scenario().run().unwrap();
    }
}

mod collections {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("collections")
            .query("representatives contains 'john'", |e| e.ids(["one", "two"]))
            .query("representatives contains ('joe', 'peter')", |e| e.ids(["two"]))
            .query("representatives contains ('joe', 'weirdo')", |e| e.ids(["one", "two"]))
            .query("representatives not contains 'joe'", |e| e.ids(["one", "three"]))
            .query("representatives not contains ('john', 'weirdo')", |e| e.ids(["three"]))
            .query("representatives contains (null, 'joe')", |e| e.ids(["two", "three"]))
            .query("representatives is empty", |e| e.ids(["three"]))
            .query("representatives is null", |e| e.ids(["three"]))
            .query("representatives is not empty", |e| e.ids(["one", "two"]))
    }

    #[test]
    fn test_collection_operators() {
        scenario().run().unwrap();
    }
}

mod multi_valued_paths {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("multi_valued_paths")
            .query("representatives[].id = 'weirdo'", |e| e.ids(["one"]))
            .query("representatives[].name = 'Peter'", |e| e.ids(["two"]))
            .query("representatives[].name != 'John'", |e| e.ids(["one", "two"]))
            .query("representatives[].id in ('joe', 'weirdo')", |e| e.ids(["one", "two"]))
            .query("representatives[].id = 'john' and group.name = 'Group One'", |e| e.ids(["one", "two"]))
    }

    #[test]
    fn test_any_element_matches() {
        scenario().run().unwrap();
    }
}

mod one_to_many {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("one_to_many")
            .query("offices contains 'o3'", |e| e.ids(["two"]))
            .query("offices not contains 'o1'", |e| e.ids(["two", "three"]))
            .query("offices is empty", |e| e.ids(["three"]))
            .query("offices[].city = 'Paris'", |e| e.ids(["one", "two"]))
            .query("offices[].city in ('Berlin', 'Rome')", |e| e.ids(["one"]))
            .query("offices[].city = 'Paris' and listed = true", |e| e.ids(["two"]))
    }

    #[test]
    fn test_associations_owned_by_the_target() {
        scenario().run().unwrap();
    }
}

#[test]
fn test_associated_through_single_valued_reference() {
    let world = World::new().unwrap();
    let context = default_context();
    let all = world.prepare("order by id asc", &context).unwrap();
    let later = world.prepare("number > 1", &context).unwrap();

    for backend in Backend::ALL {
        let page = world
            .associated(backend, "group", "g1", &all, PageRequest::unpaged())
            .unwrap();
        assert_eq!(page.content, vec!["one", "two"], "{:?}", backend);

        let page = world
            .associated(backend, "group", Value::reference("Group", "g1"), &later, PageRequest::unpaged())
            .unwrap();
        assert_eq!(page.content, vec!["two"], "{:?}", backend);

        let page = world
            .associated(backend, "group", "g2", &all, PageRequest::unpaged())
            .unwrap();
        assert!(page.content.is_empty(), "{:?}", backend);
    }
}

#[test]
fn test_associated_through_collection() {
    let world = World::new().unwrap();
    let all = world.prepare("order by id desc", &default_context()).unwrap();

    for backend in Backend::ALL {
        let page = world
            .associated(backend, "representatives", "john", &all, PageRequest::of(0, 1))
            .unwrap();
        assert_eq!(page.content, vec!["two"], "{:?}", backend);
        assert_eq!(page.total_elements, 2, "{:?}", backend);
        assert_eq!(page.total_pages(), 2, "{:?}", backend);

        let page = world
            .associated(backend, "representatives", "peter", &all, PageRequest::unpaged())
            .unwrap();
        assert_eq!(page.content, vec!["two"], "{:?}", backend);
    }
}

#[test]
fn test_associated_requires_association() {
    let world = World::new().unwrap();
    let all = world.prepare("", &default_context()).unwrap();
    assert!(world
        .associated(Backend::Collection, "number", 1, &all, PageRequest::unpaged())
        .is_err());
    assert!(world
        .associated(Backend::Collection, "group.name", "x", &all, PageRequest::unpaged())
        .is_err());
}
