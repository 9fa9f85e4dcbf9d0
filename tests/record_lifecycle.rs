//! Integration tests for record construction, persistence and destruction
//!
//! These tests run against an in-memory SQLite database seeded by
//! `common::fixture()`.

mod common;

use common::{count, fixture, FIRST_POST_BODY, FIRST_POST_TITLE};
use rowkeeper::{Condition, Error, Record, Value};
use std::sync::Arc;

#[test]
fn test_constructor_reads_back_supplied_values() {
    let fx = fixture();
    let post = Record::new(&fx.posts, [("id", 1)]).unwrap();
    assert_eq!(post.get_as::<i64>("id").unwrap(), 1);
    assert!(!post.is_modified());
    assert!(post.is_new_record());
}

#[test]
fn test_constructor_rejects_unknown_attribute() {
    let fx = fixture();
    let err = Record::new(&fx.posts, [("this_does_not_exist", 1)]).unwrap_err();
    assert!(matches!(err, Error::AttributeNotFound { .. }));
}

#[test]
fn test_constructing_many_records_retains_no_shared_state() {
    let fx = fixture();
    for _ in 0..5 {
        Record::blank(&fx.comments);
    }
    let baseline = Arc::strong_count(&fx.comments);
    for _ in 0..400 {
        let comment = Record::new(&fx.comments, [("body", "x")]).unwrap();
        drop(comment);
    }
    assert_eq!(Arc::strong_count(&fx.comments), baseline);
}

#[test]
fn test_found_record_is_not_modified() {
    let fx = fixture();
    let post = fx.posts.find().one(&fx.db).unwrap();
    assert!(!post.is_modified());
    assert!(!post.is_new_record());
}

#[test]
fn test_simple_insert_via_save() {
    let fx = fixture();
    let mut post = Record::new(&fx.posts, [("title", "Some Title"), ("body", "Lot o' text")]).unwrap();
    assert!(post.is_new_record());

    post.save(&fx.db).unwrap();
    assert!(!post.is_new_record());

    let id: i64 = post.get_as("id").unwrap();
    let found = fx.posts.find_by_id(id).one(&fx.db).unwrap();
    assert_eq!(found, post);
    assert_eq!(found.get_as::<String>("title").unwrap(), "Some Title");
    assert_eq!(found.get_as::<String>("body").unwrap(), "Lot o' text");

    post.destroy(&fx.db).unwrap();
}

#[test]
fn test_insert_with_null_column_round_trips() {
    let fx = fixture();
    let mut post = Record::new(&fx.posts, [("body", "Lot o' text")]).unwrap();
    post.save(&fx.db).unwrap();
    let id: i64 = post.get_as("id").unwrap();

    let by_id = fx.posts.find_by_id(id).one(&fx.db).unwrap();
    assert_eq!(by_id, post);
    assert_eq!(by_id.get_as::<Option<String>>("title").unwrap(), None);

    let by_condition = fx
        .posts
        .find_by_id(id)
        .filter(Condition::positional("title is null", Vec::<Value>::new()))
        .one(&fx.db)
        .unwrap();
    assert_eq!(by_condition, post);
}

#[test]
fn test_frozen_after_destroy() {
    let fx = fixture();
    let mut post = Record::new(&fx.posts, [("body", "Lot o' text")]).unwrap();
    post.save(&fx.db).unwrap();
    assert!(!post.is_frozen());

    post.destroy(&fx.db).unwrap();
    assert!(post.is_frozen());

    let err = post.set("title", "Foo bar").unwrap_err();
    assert!(matches!(err, Error::ObjectFrozen { .. }));
}

#[test]
fn test_destroyed_record_is_not_found() {
    let fx = fixture();
    let mut post = fx.posts.find_by_id(2).one(&fx.db).unwrap();
    post.destroy(&fx.db).unwrap();

    let err = fx.posts.find_by_id(2).one(&fx.db).unwrap_err();
    assert!(matches!(err, Error::RecordNotFound { ref table } if table == "posts"));
    assert!(fx.posts.find_by_id(2).first(&fx.db).unwrap().is_none());
}

#[test]
fn test_update_attributes_persists_and_clears_modified() {
    let fx = fixture();
    let mut slug = fx.slugs.find().one(&fx.db).unwrap();
    assert_ne!(slug.get_as::<String>("slug").unwrap(), "foobar");
    assert_ne!(slug.get_as::<i64>("post_id").unwrap(), 2);
    assert!(!slug.is_modified());

    slug.update_attributes(
        &fx.db,
        [("slug", Value::from("foobar")), ("post_id", Value::from(2))],
    )
    .unwrap();

    assert_eq!(slug.get_as::<String>("slug").unwrap(), "foobar");
    assert_eq!(slug.get_as::<i64>("post_id").unwrap(), 2);
    assert!(!slug.is_modified());

    let reloaded = fx.slugs.find_by_id(1).one(&fx.db).unwrap();
    assert_eq!(reloaded, slug);
}

#[test]
fn test_find_all_with_no_match_is_empty() {
    let fx = fixture();
    let none = fx
        .comments
        .find()
        .filter(Condition::positional("post_id = ?", [12345]))
        .all(&fx.db)
        .unwrap();
    assert!(none.is_empty());
    assert_eq!(count(&fx.db, "SELECT id FROM comments"), 3);
}

#[test]
fn test_fixture_first_post() {
    let fx = fixture();
    let post = fx.posts.find_by_id(1).one(&fx.db).unwrap();
    assert_eq!(post.get_as::<String>("title").unwrap(), FIRST_POST_TITLE);
    assert_eq!(post.get_as::<String>("body").unwrap(), FIRST_POST_BODY);
    assert_eq!(post.to_json()["title"], FIRST_POST_TITLE);
}
