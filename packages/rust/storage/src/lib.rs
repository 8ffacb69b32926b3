//! libSQL storage layer for generated websites and pages.
//!
//! The [`Storage`] struct wraps a local libSQL database holding website
//! records and their generated pages. The publisher in `pageforge-core`
//! is the sole writer; reads are open to the embedding application.

mod migrations;

use std::path::Path;

use chrono::Utc;
use libsql::{Connection, Database, params};

use pageforge_shared::{PageForgeError, PageRecord, Result, WebsiteRecord};

/// Primary storage handle wrapping a libSQL database.
pub struct Storage {
    #[allow(dead_code)]
    db: Database,
    conn: Connection,
}

impl Storage {
    /// Open or create a database at `path`, applying pending migrations.
    pub async fn open(path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| PageForgeError::io(parent, e))?;
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| PageForgeError::Storage(e.to_string()))?;

        let conn = db
            .connect()
            .map_err(|e| PageForgeError::Storage(e.to_string()))?;

        let storage = Self { db, conn };
        storage.run_migrations().await?;
        Ok(storage)
    }

    /// Run pending schema migrations.
    async fn run_migrations(&self) -> Result<()> {
        let current_version = self.get_schema_version().await;

        for migration in migrations::all_migrations() {
            if migration.version > current_version {
                tracing::info!(
                    version = migration.version,
                    description = migration.description,
                    "applying migration"
                );
                self.conn
                    .execute_batch(migration.sql)
                    .await
                    .map_err(|e| {
                        PageForgeError::Storage(format!(
                            "migration v{} failed: {e}",
                            migration.version
                        ))
                    })?;
            }
        }
        Ok(())
    }

    /// Get the current schema version, or 0 if no migrations have been applied.
    async fn get_schema_version(&self) -> u32 {
        let result = self
            .conn
            .query("SELECT MAX(version) FROM schema_migrations", params![])
            .await;

        match result {
            Ok(mut rows) => {
                if let Ok(Some(row)) = rows.next().await {
                    row.get::<u32>(0).unwrap_or(0)
                } else {
                    0
                }
            }
            Err(_) => 0, // Table doesn't exist yet
        }
    }

    // -----------------------------------------------------------------------
    // Website operations
    // -----------------------------------------------------------------------

    /// Insert a new website record with an empty page list.
    pub async fn insert_website(
        &self,
        id: &str,
        user_id: &str,
        name: &str,
        status: &str,
    ) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        self.conn
            .execute(
                "INSERT INTO websites (id, user_id, name, status, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![id, user_id, name, status, now.as_str(), now.as_str()],
            )
            .await
            .map_err(|e| PageForgeError::Storage(e.to_string()))?;
        Ok(())
    }

    /// Get a website scoped by owning user.
    pub async fn get_website(&self, user_id: &str, id: &str) -> Result<Option<WebsiteRecord>> {
        let mut rows = self
            .conn
            .query(
                "SELECT id, user_id, name, status, pages_json, created_at, updated_at
                 FROM websites WHERE user_id = ?1 AND id = ?2",
                params![user_id, id],
            )
            .await
            .map_err(|e| PageForgeError::Storage(e.to_string()))?;

        match rows.next().await {
            Ok(Some(row)) => Ok(Some(row_to_website(&row)?)),
            Ok(None) => Ok(None),
            Err(e) => Err(PageForgeError::Storage(e.to_string())),
        }
    }

    /// Set a website's page-title list and status, scoped by owning user.
    pub async fn update_website_pages(
        &self,
        user_id: &str,
        website_id: &str,
        pages: &[String],
        status: &str,
    ) -> Result<()> {
        let pages_json = serde_json::to_string(pages)
            .map_err(|e| PageForgeError::Storage(format!("page list encoding failed: {e}")))?;
        let now = Utc::now().to_rfc3339();

        let affected = self
            .conn
            .execute(
                "UPDATE websites SET pages_json = ?1, status = ?2, updated_at = ?3
                 WHERE user_id = ?4 AND id = ?5",
                params![
                    pages_json.as_str(),
                    status,
                    now.as_str(),
                    user_id,
                    website_id
                ],
            )
            .await
            .map_err(|e| PageForgeError::Storage(e.to_string()))?;

        if affected == 0 {
            return Err(PageForgeError::Storage(format!(
                "website {website_id} not found for user {user_id}"
            )));
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Page operations
    // -----------------------------------------------------------------------

    /// Bulk-insert page rows in a single transaction.
    pub async fn insert_pages(&self, pages: &[PageRecord]) -> Result<()> {
        if pages.is_empty() {
            return Ok(());
        }

        let tx = self
            .conn
            .transaction()
            .await
            .map_err(|e| PageForgeError::Storage(e.to_string()))?;

        for page in pages {
            tx.execute(
                "INSERT INTO pages (id, user_id, website_id, title, content, content_hash, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    page.id.as_str(),
                    page.user_id.as_str(),
                    page.website_id.as_str(),
                    page.title.as_str(),
                    page.content.as_str(),
                    page.content_hash.as_str(),
                    page.created_at.to_rfc3339(),
                ],
            )
            .await
            .map_err(|e| PageForgeError::Storage(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| PageForgeError::Storage(e.to_string()))?;

        tracing::debug!(count = pages.len(), "pages inserted");
        Ok(())
    }

    /// List a website's pages in insertion order.
    pub async fn list_pages_by_website(
        &self,
        user_id: &str,
        website_id: &str,
    ) -> Result<Vec<PageRecord>> {
        let mut rows = self
            .conn
            .query(
                "SELECT id, user_id, website_id, title, content, content_hash, created_at
                 FROM pages WHERE user_id = ?1 AND website_id = ?2 ORDER BY rowid",
                params![user_id, website_id],
            )
            .await
            .map_err(|e| PageForgeError::Storage(e.to_string()))?;

        let mut results = Vec::new();
        while let Ok(Some(row)) = rows.next().await {
            results.push(row_to_page_record(&row)?);
        }
        Ok(results)
    }
}

/// Convert a database row to a [`WebsiteRecord`].
fn row_to_website(row: &libsql::Row) -> Result<WebsiteRecord> {
    let pages_json: String = row
        .get(4)
        .map_err(|e| PageForgeError::Storage(e.to_string()))?;
    let pages: Vec<String> = serde_json::from_str(&pages_json)
        .map_err(|e| PageForgeError::Storage(format!("invalid pages_json: {e}")))?;

    Ok(WebsiteRecord {
        id: row
            .get::<String>(0)
            .map_err(|e| PageForgeError::Storage(e.to_string()))?,
        user_id: row
            .get::<String>(1)
            .map_err(|e| PageForgeError::Storage(e.to_string()))?,
        name: row
            .get::<String>(2)
            .map_err(|e| PageForgeError::Storage(e.to_string()))?,
        status: row
            .get::<String>(3)
            .map_err(|e| PageForgeError::Storage(e.to_string()))?,
        pages,
        created_at: parse_timestamp(row, 5)?,
        updated_at: parse_timestamp(row, 6)?,
    })
}

/// Convert a database row to a [`PageRecord`].
fn row_to_page_record(row: &libsql::Row) -> Result<PageRecord> {
    Ok(PageRecord {
        id: row
            .get::<String>(0)
            .map_err(|e| PageForgeError::Storage(e.to_string()))?,
        user_id: row
            .get::<String>(1)
            .map_err(|e| PageForgeError::Storage(e.to_string()))?,
        website_id: row
            .get::<String>(2)
            .map_err(|e| PageForgeError::Storage(e.to_string()))?,
        title: row
            .get::<String>(3)
            .map_err(|e| PageForgeError::Storage(e.to_string()))?,
        content: row
            .get::<String>(4)
            .map_err(|e| PageForgeError::Storage(e.to_string()))?,
        content_hash: row
            .get::<String>(5)
            .map_err(|e| PageForgeError::Storage(e.to_string()))?,
        created_at: parse_timestamp(row, 6)?,
    })
}

/// Parse an RFC 3339 timestamp column.
fn parse_timestamp(row: &libsql::Row, idx: i32) -> Result<chrono::DateTime<chrono::Utc>> {
    let s: String = row
        .get(idx)
        .map_err(|e| PageForgeError::Storage(e.to_string()))?;
    chrono::DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&chrono::Utc))
        .map_err(|e| PageForgeError::Storage(format!("invalid date: {e}")))
}
