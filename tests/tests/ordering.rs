//! Sorting and paging.

use eql_tests::prelude::*;
use pretty_assertions::assert_eq;

mod sorting {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("sorting")
            .query("order by id desc", |e| e.ordered(["two", "three", "one"]))
            .query("order by id asc", |e| e.ordered(["one", "three", "two"]))
            .query("order by number desc", |e| e.ordered(["three", "two", "one"]))
            .query("order by status asc", |e| e.ordered(["three", "one", "two"]))
            .query("order by status desc", |e| e.ordered(["two", "one", "three"]))
            .query("order by group.name desc, number desc", |e| e.ordered(["two", "one", "three"]))
            .query("order by group.name asc, id desc", |e| e.ordered(["three", "two", "one"]))
            .query("order by group.name asc", |e| e.ordered(["three", "one", "two"]))
            .query("number > 1 order by created desc", |e| e.ordered(["three", "two"]))
            .query("representatives contains 'john' order by createdBy ASC", |e| e.ordered(["one", "two"]))
            .query("order by revenue desc", |e| e.ordered(["two", "one", "three"]))
            .query("order by founded asc", |e| e.ordered(["three", "one", "two"]))
            .query("order by listed desc, number asc", |e| e.ordered(["two", "one", "three"]))
    }

    #[test]
    fn test_order_by() {
        scenario().run().unwrap();
    }
}

#[test]
fn test_paging() {
    let world = World::new().unwrap();
    let query = world.prepare("order by number asc", &default_context()).unwrap();

    for backend in Backend::ALL {
        let first = world.page(backend, &query, PageRequest::of(0, 2)).unwrap();
        assert_eq!(first.content, vec!["one", "two"], "{:?}", backend);
        assert_eq!(first.total_elements, 3, "{:?}", backend);
        assert_eq!(first.total_pages(), 2, "{:?}", backend);
        assert!(!first.is_last(), "{:?}", backend);

        let second = world.page(backend, &query, PageRequest::of(1, 2)).unwrap();
        assert_eq!(second.content, vec!["three"], "{:?}", backend);
        assert_eq!(second.number, 1, "{:?}", backend);
        assert!(second.is_last(), "{:?}", backend);

        let beyond = world.page(backend, &query, PageRequest::of(5, 2)).unwrap();
        assert!(beyond.content.is_empty(), "{:?}", backend);
        assert_eq!(beyond.total_elements, 3, "{:?}", backend);
    }
}

#[test]
fn test_paging_filtered() {
    let world = World::new().unwrap();
    let query = world
        .prepare("status is not null order by id desc", &default_context())
        .unwrap();

    for backend in Backend::ALL {
        let page = world.page(backend, &query, PageRequest::of(0, 1)).unwrap();
        assert_eq!(page.content, vec!["two"], "{:?}", backend);
        assert_eq!(page.total_elements, 2, "{:?}", backend);
    }
}
