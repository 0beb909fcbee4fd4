//! Database schema
//!
//! `desc` is an SQL keyword, so it is always quoted. Post ids use
//! AUTOINCREMENT so a removed post's id (and its retained images) is never
//! handed to a new post.

pub const CREATE_TABLES: &str = r#"
CREATE TABLE posts (
    id INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
    title TEXT,
    "desc" TEXT,
    date_added DATE,
    src BLOB
);
CREATE TABLE config (
    option TEXT,
    value TEXT
);
CREATE TABLE images (
    id INTEGER NOT NULL PRIMARY KEY,
    post_id INTEGER,
    image_name TEXT,
    image BLOB
);
"#;

pub const SEED_CONFIG: &str =
    "INSERT INTO config (option, value) VALUES ('rootfolder', ?1), ('hosturl', ?2)";

pub const SELECT_CONFIG: &str = "SELECT value FROM config WHERE option = ?1";

pub const INSERT_POST: &str =
    r#"INSERT INTO posts (title, "desc", date_added, src) VALUES (?1, ?2, ?3, ?4)"#;

pub const SELECT_POSTS: &str = r#"SELECT id, title, "desc", date_added, src FROM posts"#;

pub const UPDATE_POST: &str =
    r#"UPDATE posts SET title = ?1, "desc" = ?2, src = ?3 WHERE id = ?4"#;

pub const DELETE_POST: &str = "DELETE FROM posts WHERE id = ?1";

pub const INSERT_IMAGE: &str =
    "INSERT INTO images (post_id, image_name, image) VALUES (?1, ?2, ?3)";

pub const SELECT_IMAGES: &str =
    "SELECT image_name, image FROM images WHERE post_id = ?1 ORDER BY id";
