//! Integration tests for finder conditions
//!
//! Each equivalent condition form must select the same row as a lookup by
//! primary key.

mod common;

use common::{fixture, FIRST_POST_BODY, FIRST_POST_TITLE};
use rowkeeper::{Condition, Error, Operand, Order, Value};
use std::collections::HashMap;

#[test]
fn test_conditions_with_simple_array() {
    let fx = fixture();
    let p1 = fx.posts.find_by_id(1).one(&fx.db).unwrap();

    let p = fx
        .posts
        .find()
        .filter(Condition::positional("title = ?", [FIRST_POST_TITLE]))
        .one(&fx.db)
        .unwrap();
    assert_eq!(p1, p);

    let p = fx
        .posts
        .find()
        .filter(Condition::positional(
            "title = ? OR title = ?",
            ["NOT FOUND TITLE", FIRST_POST_TITLE],
        ))
        .one(&fx.db)
        .unwrap();
    assert_eq!(p1, p);
}

#[test]
fn test_conditions_with_bind_parameters() {
    let fx = fixture();
    let p1 = fx.posts.find_by_id(1).one(&fx.db).unwrap();
    let title: String = p1.get_as("title").unwrap();

    // trailing pairs
    let p = fx
        .posts
        .find()
        .filter(Condition::named(
            "title = :title OR title = :title2",
            [("title2", "NOT FOUND TITLE"), ("title", title.as_str())],
        ))
        .one(&fx.db)
        .unwrap();
    assert_eq!(p1, p);

    // single mapping
    let mut binds = HashMap::new();
    binds.insert("title2", "NOT FOUND TITLE".to_string());
    binds.insert("title", title.clone());
    let p = fx
        .posts
        .find()
        .filter(Condition::named("title = :title OR title = :title2", binds))
        .one(&fx.db)
        .unwrap();
    assert_eq!(p1, p);
}

#[test]
fn test_conditions_with_repeated_name() {
    let fx = fixture();
    let p = fx
        .posts
        .find()
        .filter(Condition::named(
            "title = :needle OR body = :needle",
            [("needle", FIRST_POST_BODY)],
        ))
        .one(&fx.db)
        .unwrap();
    assert_eq!(p.get_as::<i64>("id").unwrap(), 1);
}

#[test]
fn test_conditions_with_unbound_name() {
    let fx = fixture();
    let err = fx
        .posts
        .find()
        .filter(Condition::named("title = :title", [("other", "x")]))
        .one(&fx.db)
        .unwrap_err();
    assert!(matches!(err, Error::UnboundParameter { ref name } if name == "title"));
}

#[test]
fn test_conditions_with_assoc_array() {
    let fx = fixture();
    let p1 = fx.posts.find_by_id(1).one(&fx.db).unwrap();

    let p = fx
        .posts
        .find()
        .filter(Condition::columns([("title", FIRST_POST_TITLE)]))
        .one(&fx.db)
        .unwrap();
    assert_eq!(p1, p);

    let p = fx
        .posts
        .find()
        .filter(Condition::columns([
            ("title", FIRST_POST_TITLE),
            ("body", FIRST_POST_BODY),
        ]))
        .one(&fx.db)
        .unwrap();
    assert_eq!(p1, p);

    let miss = fx
        .posts
        .find()
        .filter(Condition::columns([
            ("title", FIRST_POST_TITLE.to_string()),
            ("body", format!("{FIRST_POST_BODY}baser")),
        ]))
        .first(&fx.db)
        .unwrap();
    assert!(miss.is_none());

    let p = fx
        .posts
        .find()
        .filter(Condition::columns([(
            "id",
            Operand::list([1i64, 999_238_812_838]),
        )]))
        .one(&fx.db)
        .unwrap();
    assert_eq!(p1, p);
}

#[test]
fn test_assoc_condition_with_unknown_column() {
    let fx = fixture();
    let err = fx
        .posts
        .find()
        .filter(Condition::columns([("author", "nobody")]))
        .all(&fx.db)
        .unwrap_err();
    assert!(matches!(err, Error::AttributeNotFound { .. }));
}

#[test]
fn test_empty_in_list_matches_nothing() {
    let fx = fixture();
    let rows = fx
        .posts
        .find()
        .filter(Condition::columns([("id", Operand::list(Vec::<i64>::new()))]))
        .all(&fx.db)
        .unwrap();
    assert!(rows.is_empty());
}

#[test]
fn test_find_by_id_with_extra_condition() {
    let fx = fixture();
    let hit = fx
        .posts
        .find_by_id(1)
        .filter(Condition::positional("title = ?", [FIRST_POST_TITLE]))
        .first(&fx.db)
        .unwrap();
    assert!(hit.is_some());

    let miss = fx
        .posts
        .find_by_id(2)
        .filter(Condition::positional("title = ?", [FIRST_POST_TITLE]))
        .first(&fx.db)
        .unwrap();
    assert!(miss.is_none());
}

#[test]
fn test_order_limit_offset() {
    let fx = fixture();
    let ids: Vec<i64> = fx
        .comments
        .find()
        .order_by("id", Order::Desc)
        .limit(2)
        .offset(1)
        .all(&fx.db)
        .unwrap()
        .iter()
        .map(|c| c.get_as("id").unwrap())
        .collect();
    assert_eq!(ids, vec![2, 1]);

    let all = fx.comments.find().all(&fx.db).unwrap();
    assert_eq!(all.len(), 3);
    assert!(all.iter().all(|c| !c.is_new_record() && !c.is_modified()));

    let first = fx.comments.find().order_by("id", Order::Asc).first(&fx.db).unwrap().unwrap();
    assert_eq!(first.get("body").unwrap(), Some(&Value::from("first!")));
}
