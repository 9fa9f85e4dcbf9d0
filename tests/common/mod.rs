//! Shared fixtures: an in-memory database seeded with posts, comments and slugs.

#![allow(dead_code)]

use rowkeeper::{Entity, Executor, HookError, HookPoint, Metadata, Record, RecordBehavior, SqliteExecutor};
use std::sync::Arc;

pub const FIRST_POST_TITLE: &str = "First Post";
pub const FIRST_POST_BODY: &str = "First post body";

pub struct Fixture {
    pub db: SqliteExecutor,
    pub posts: Arc<Entity>,
    pub comments: Arc<Entity>,
    pub slugs: Arc<Entity>,
}

fn setup_test_schema(db: &SqliteExecutor) {
    db.execute_batch(
        r#"
        CREATE TABLE posts (
            id INTEGER PRIMARY KEY,
            title TEXT,
            body TEXT
        );
        CREATE TABLE comments (
            id INTEGER PRIMARY KEY,
            post_id INTEGER NOT NULL,
            body TEXT
        );
        CREATE TABLE slugs (
            id INTEGER PRIMARY KEY,
            post_id INTEGER NOT NULL,
            slug TEXT NOT NULL
        );

        INSERT INTO posts (id, title, body) VALUES
            (1, 'First Post', 'First post body'),
            (2, 'Second Post', 'Second post body');
        INSERT INTO comments (post_id, body) VALUES
            (1, 'first!'),
            (1, 'agreed'),
            (2, 'on the second post');
        INSERT INTO slugs (id, post_id, slug) VALUES
            (1, 1, 'first-post');
        "#,
    )
    .expect("schema should load");
}

pub fn post_metadata() -> Metadata {
    Metadata::new("posts", ["id", "title", "body"], "id").expect("valid posts metadata")
}

pub fn comment_metadata() -> Metadata {
    Metadata::new("comments", ["id", "post_id", "body"], "id").expect("valid comments metadata")
}

pub fn slug_metadata() -> Metadata {
    Metadata::new("slugs", ["id", "post_id", "slug"], "id").expect("valid slugs metadata")
}

/// Appends `-success` to the slug when it names the running hook; fails
/// `after_destroy` outright when asked to.
pub struct SlugBehavior;

impl SlugBehavior {
    fn mark(record: &mut Record, point: HookPoint) -> Result<(), HookError> {
        let slug: String = record.get_as("slug")?;
        if slug == point.as_str() {
            record.set("slug", format!("{slug}-success"))?;
        }
        Ok(())
    }
}

impl RecordBehavior for SlugBehavior {
    fn before_save(&self, record: &mut Record, _db: &dyn Executor) -> Result<(), HookError> {
        Self::mark(record, HookPoint::BeforeSave)
    }

    fn before_create(&self, record: &mut Record, _db: &dyn Executor) -> Result<(), HookError> {
        Self::mark(record, HookPoint::BeforeCreate)
    }

    fn before_update(&self, record: &mut Record, _db: &dyn Executor) -> Result<(), HookError> {
        Self::mark(record, HookPoint::BeforeUpdate)
    }

    fn after_create(&self, record: &mut Record, _db: &dyn Executor) -> Result<(), HookError> {
        Self::mark(record, HookPoint::AfterCreate)
    }

    fn after_update(&self, record: &mut Record, _db: &dyn Executor) -> Result<(), HookError> {
        Self::mark(record, HookPoint::AfterUpdate)
    }

    fn after_save(&self, record: &mut Record, _db: &dyn Executor) -> Result<(), HookError> {
        Self::mark(record, HookPoint::AfterSave)
    }

    fn before_destroy(&self, record: &mut Record, _db: &dyn Executor) -> Result<(), HookError> {
        Self::mark(record, HookPoint::BeforeDestroy)
    }

    fn after_destroy(&self, record: &mut Record, _db: &dyn Executor) -> Result<(), HookError> {
        let slug: String = record.get_as("slug")?;
        if slug == HookPoint::AfterDestroy.as_str() {
            return Err(HookError::new("after_destroy"));
        }
        Ok(())
    }
}

pub fn fixture() -> Fixture {
    let db = SqliteExecutor::open_in_memory().expect("in-memory database");
    setup_test_schema(&db);

    let posts = Entity::builder(post_metadata())
        .dependent(&comment_metadata(), "post_id")
        .build()
        .expect("posts entity");
    let comments = Entity::plain(comment_metadata());
    let slugs = Entity::builder(slug_metadata())
        .behavior(SlugBehavior)
        .build()
        .expect("slugs entity");

    Fixture {
        db,
        posts,
        comments,
        slugs,
    }
}

pub fn count(db: &SqliteExecutor, sql: &str) -> usize {
    db.query_all(sql, &[]).expect("count query").len()
}
