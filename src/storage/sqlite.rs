use std::path::Path;
use rusqlite::{Connection, OptionalExtension};
use anyhow::{Result, Context};
use crate::models::{LicenseAssignment, LicenseCountRow};
use crate::storage::migrations::apply_migrations;
use crate::storage::LicenseStore;

pub struct Database {
    connection: Connection,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("connection", &"<SQLite Connection>")
            .finish()
    }
}

impl Database {
    pub fn new(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create database directory: {}", parent.display()))?;
        }

        let connection = Connection::open(path)
            .with_context(|| format!("Failed to open database at: {}", path.display()))?;

        connection.execute_batch("
            PRAGMA foreign_keys = ON;
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = memory;
        ").context("Failed to configure SQLite pragmas")?;

        let db = Database { connection };
        db.init_schema()?;

        Ok(db)
    }

    pub fn in_memory() -> Result<Self> {
        let connection = Connection::open_in_memory()
            .context("Failed to open in-memory database")?;
        let db = Database { connection };
        db.init_schema()?;
        Ok(db)
    }

    pub fn init_schema(&self) -> Result<()> {
        apply_migrations(&self.connection)
            .context("Failed to apply database migrations")
    }
}

impl LicenseStore for Database {
    fn read_all(&self) -> Result<Vec<LicenseAssignment>> {
        let mut stmt = self.connection.prepare(
            "SELECT user_email, license_type FROM license_assignments ORDER BY id"
        ).context("Failed to prepare assignment query")?;

        let rows = stmt.query_map([], |row| {
            Ok(LicenseAssignment {
                user_email: row.get(0)?,
                license_type: row.get(1)?,
            })
        }).context("Failed to execute assignment query")?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row.context("Failed to parse assignment row")?);
        }

        Ok(results)
    }

    fn write_all(&mut self, rows: &[LicenseAssignment]) -> Result<()> {
        let now = chrono::Utc::now().to_rfc3339();
        let tx = self.connection.transaction()
            .context("Failed to start assignment transaction")?;

        tx.execute("DELETE FROM license_assignments", [])
            .context("Failed to clear license assignments")?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO license_assignments (user_email, license_type, synced_at) VALUES (?1, ?2, ?3)"
            ).context("Failed to prepare assignment insert")?;
            for row in rows {
                stmt.execute(rusqlite::params![row.user_email, row.license_type, now])
                    .context("Failed to insert license assignment")?;
            }
        }

        tx.commit().context("Failed to commit license assignments")
    }

    fn read_summary(&self) -> Result<Vec<LicenseCountRow>> {
        let mut stmt = self.connection.prepare(
            "SELECT license_type, license_count FROM license_summary ORDER BY rowid"
        ).context("Failed to prepare summary query")?;

        let rows = stmt.query_map([], |row| {
            Ok(LicenseCountRow {
                license_type: row.get(0)?,
                remaining_count: row.get(1)?,
            })
        }).context("Failed to execute summary query")?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row.context("Failed to parse summary row")?);
        }

        Ok(results)
    }

    fn write_summary(&mut self, rows: &[LicenseCountRow]) -> Result<()> {
        let now = chrono::Utc::now().to_rfc3339();
        let tx = self.connection.transaction()
            .context("Failed to start summary transaction")?;

        tx.execute("DELETE FROM license_summary", [])
            .context("Failed to clear license summary")?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO license_summary (license_type, license_count, synced_at) VALUES (?1, ?2, ?3)"
            ).context("Failed to prepare summary insert")?;
            for row in rows {
                stmt.execute(rusqlite::params![row.license_type, row.remaining_count, now])
                    .context("Failed to insert summary row")?;
            }
        }

        tx.commit().context("Failed to commit license summary")
    }

    fn last_synced_at(&self) -> Result<Option<String>> {
        let synced_at = self.connection.query_row(
            "SELECT MAX(synced_at) FROM license_summary",
            [],
            |row| row.get::<_, Option<String>>(0)
        ).optional()
        .context("Failed to read last sync time")?;

        Ok(synced_at.flatten())
    }
}
