//! Content store - posts, images and site options in a SQLite database

mod error;
mod filter;
mod schema;


pub use error::{Result, StoreError};
pub use filter::PostFilter;

use rusqlite::{params, params_from_iter, Connection, OpenFlags, OptionalExtension};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{SiteConfig, DEFAULT_ROOT_FOLDER};
use crate::content::{is_image_name, Image, Post, IMAGE_DIR};
use crate::helpers;

/// Database file name inside the base directory
pub const DATABASE_FILE: &str = "blog.db";

/// A single open connection to the blog database
pub struct Store {
    conn: Connection,
    path: PathBuf,
    config: SiteConfig,
}

impl Store {
    /// Whether a database exists in `dir`
    pub fn exists<P: AsRef<Path>>(dir: P) -> bool {
        dir.as_ref().join(DATABASE_FILE).exists()
    }

    /// Open the database in `dir` and read the site options
    ///
    /// Fails if the database does not exist or has no `rootfolder` option.
    /// A missing `hosturl` leaves the host URL empty.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let path = dir.as_ref().join(DATABASE_FILE);
        if !path.exists() {
            return Err(StoreError::NotFound(path));
        }

        let conn = Connection::open_with_flags(
            &path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;

        let root_folder = read_option(&conn, "rootfolder")?
            .ok_or(StoreError::MissingConfig("rootfolder"))?;
        let host_url = read_option(&conn, "hosturl")?.unwrap_or_default();

        tracing::debug!("Opened blog database at {:?}", path);

        Ok(Self {
            conn,
            path,
            config: SiteConfig::new(host_url, root_folder),
        })
    }

    /// Create a new database in `dir`, seeded with the default root folder
    /// and `host_url`
    ///
    /// If the schema cannot be set up, the half-created file is removed so
    /// the next run can try again.
    pub fn create<P: AsRef<Path>>(dir: P, host_url: &str) -> Result<Self> {
        Self::create_with_schema(dir.as_ref(), host_url, schema::CREATE_TABLES)
    }

    fn create_with_schema(dir: &Path, host_url: &str, tables: &str) -> Result<Self> {
        let path = dir.join(DATABASE_FILE);
        if path.exists() {
            return Err(StoreError::AlreadyExists(path));
        }
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)?;
        }

        let conn = match init_database(&path, host_url, tables) {
            Ok(conn) => conn,
            Err(e) => {
                if let Err(remove_err) = fs::remove_file(&path) {
                    if remove_err.kind() != std::io::ErrorKind::NotFound {
                        tracing::warn!("Could not remove {:?}: {}", path, remove_err);
                    }
                }
                return Err(e);
            }
        };

        tracing::info!("Created blog database at {:?}", path);

        Ok(Self {
            conn,
            path,
            config: SiteConfig::new(host_url, DEFAULT_ROOT_FOLDER),
        })
    }

    /// Site options read when the store was opened
    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Path of the database file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Insert a post, stamping it with today's date
    ///
    /// Any date already on the post is overwritten. Returns the post with
    /// its new id.
    pub fn add_post(&self, mut post: Post) -> Result<Post> {
        post.date = helpers::today();

        self.conn.execute(
            schema::INSERT_POST,
            params![post.title, post.desc, post.date, post.src()],
        )?;
        post.id = self.conn.last_insert_rowid();

        tracing::debug!("Inserted post {} ({:?})", post.id, post.title);
        Ok(post)
    }

    /// Store the images a post references, read relative to its source
    /// directory
    ///
    /// Images that cannot be read are logged and skipped. Returns how many
    /// were stored.
    pub fn add_images(&self, post: &Post, images: &[String]) -> Result<usize> {
        if images.is_empty() {
            return Ok(0);
        }
        if !post.is_saved() {
            return Err(StoreError::Unsaved);
        }

        let loc = post.loc().unwrap_or_else(|| Path::new(""));
        let mut stored = 0;
        for name in images {
            if !is_image_name(name) {
                tracing::warn!("Image path {:?} leaves the image directory, skipping", name);
                continue;
            }
            let raw = match fs::read(loc.join(name)) {
                Ok(raw) => raw,
                Err(e) => {
                    tracing::warn!("Could not access {}, skipping (error: {})", name, e);
                    continue;
                }
            };
            self.conn
                .execute(schema::INSERT_IMAGE, params![post.id, name, raw])?;
            stored += 1;
        }

        tracing::debug!("Stored {} image(s) for post {}", stored, post.id);
        Ok(stored)
    }

    /// All images stored for a post, in insertion order
    pub fn read_images(&self, post: &Post) -> Result<Vec<Image>> {
        let mut stmt = self.conn.prepare(schema::SELECT_IMAGES)?;
        let images = stmt
            .query_map(params![post.id], |row| {
                Ok(Image {
                    name: row.get::<_, Option<String>>(0)?.unwrap_or_default(),
                    raw: row.get::<_, Option<Vec<u8>>>(1)?.unwrap_or_default(),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(images)
    }

    /// List posts matching `filter`, newest (highest id) first
    ///
    /// `limit == 0` returns every match. Dates come back as `YYYY-MM-DD`.
    pub fn get_posts(&self, filter: &PostFilter, limit: usize) -> Result<Vec<Post>> {
        let mut sql = String::from(schema::SELECT_POSTS);
        let mut values = Vec::new();

        if let Some((predicate, value)) = filter.predicate() {
            sql.push_str(" WHERE ");
            sql.push_str(predicate);
            values.push(value);
        }
        sql.push_str(" ORDER BY id DESC");
        if limit > 0 {
            sql.push_str(" LIMIT ?");
            values.push(rusqlite::types::Value::Integer(limit as i64));
        }
        tracing::debug!("{}", sql);

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(values.iter()), |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                    row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                    row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                    row.get::<_, Option<Vec<u8>>>(4)?.unwrap_or_default(),
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, title, desc, stored_date, src)| {
                let date = helpers::display_date(&stored_date)
                    .ok_or_else(|| StoreError::InvalidDate {
                        id,
                        value: stored_date.clone(),
                    })?;
                Ok(Post::hydrate(id, title, desc, date, src))
            })
            .collect()
    }

    /// Overwrite title, description and source of an existing post
    ///
    /// The date and the stored images are left alone. Returns whether a
    /// post with that id existed.
    pub fn update_post(&self, post: &Post) -> Result<bool> {
        let changed = self.conn.execute(
            schema::UPDATE_POST,
            params![post.title, post.desc, post.src(), post.id],
        )?;
        Ok(changed > 0)
    }

    /// Delete a post row by id
    ///
    /// Images stored for the post are kept. Returns whether a post with that
    /// id existed.
    pub fn remove_post(&self, post: &Post) -> Result<bool> {
        let changed = self.conn.execute(schema::DELETE_POST, params![post.id])?;
        Ok(changed > 0)
    }
}

/// Write images into `<dir>/img/`
///
/// Unlike reading images from a source directory, any write failure here
/// aborts. Names that would land outside `img/` are logged and skipped.
pub fn write_images(images: &[Image], dir: &Path) -> Result<()> {
    if images.is_empty() {
        return Ok(());
    }

    let image_dir = dir.join(IMAGE_DIR);
    fs::create_dir_all(&image_dir).map_err(|source| StoreError::ImageWrite {
        path: image_dir.clone(),
        source,
    })?;

    for image in images {
        if !is_image_name(&image.name) {
            tracing::warn!(
                "Image path {:?} leaves the image directory, skipping",
                image.name
            );
            continue;
        }
        let path = image_dir.join(&image.name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| StoreError::ImageWrite {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&path, &image.raw).map_err(|source| StoreError::ImageWrite {
            path: path.clone(),
            source,
        })?;
        tracing::debug!("Wrote image: {:?}", path);
    }

    Ok(())
}

fn init_database(path: &Path, host_url: &str, tables: &str) -> Result<Connection> {
    let mut conn = Connection::open(path)?;
    let tx = conn.transaction()?;
    tx.execute_batch(tables)?;
    tx.execute(schema::SEED_CONFIG, params![DEFAULT_ROOT_FOLDER, host_url])?;
    tx.commit()?;
    Ok(conn)
}

fn read_option(conn: &Connection, option: &str) -> Result<Option<String>> {
    let value = conn
        .query_row(schema::SELECT_CONFIG, params![option], |row| {
            row.get::<_, Option<String>>(0)
        })
        .optional()?;
    Ok(value.flatten())
}
