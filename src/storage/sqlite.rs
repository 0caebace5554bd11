//! SQLite store for the location and job-function hierarchies.

use std::path::Path;

use rusqlite::{params, Connection, Row};
use serde::Serialize;
use tracing::info;

use crate::error::Result;
use crate::hierarchy::{HierarchyData, JobFunctionNode, JobTitle, LocationNode};
use crate::storage::migrations;

pub struct Database {
    conn: Connection,
    schema_version: u32,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("schema_version", &self.schema_version)
            .finish_non_exhaustive()
    }
}

/// Row counts per hierarchy table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HierarchyCounts {
    pub locations: u64,
    pub job_functions: u64,
    pub job_titles: u64,
}

/// One entry of the import log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportRecord {
    pub id: i64,
    pub source: String,
    pub counts: HierarchyCounts,
    pub imported_at: String,
}

impl Database {
    /// Open database at the given path
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        Self::configure_pragmas(&conn)?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        let schema_version = migrations::run_migrations(&conn)?;
        Ok(Self {
            conn,
            schema_version,
        })
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Current schema version after migrations.
    pub fn schema_version(&self) -> u32 {
        self.schema_version
    }

    /// Replace every hierarchy row with `data` in one transaction.
    ///
    /// The caller is expected to have validated `data` (see
    /// [`HierarchyData::into_hierarchies`]); the store itself only enforces
    /// key uniqueness and title -> function references.
    pub fn replace_hierarchy(&mut self, data: &HierarchyData, source: &str) -> Result<ImportRecord> {
        let tx = self.conn.transaction()?;
        tx.execute_batch(
            "DELETE FROM job_titles;
             DELETE FROM job_functions;
             DELETE FROM locations;",
        )?;

        {
            let mut stmt = tx.prepare(
                "INSERT INTO locations (id, parent_id, country_code, product_count)
                 VALUES (?, ?, ?, ?)",
            )?;
            for location in &data.locations {
                stmt.execute(params![
                    location.id,
                    location.parent_id,
                    location.country_code,
                    i64::try_from(location.product_count).unwrap_or(i64::MAX),
                ])?;
            }

            let mut stmt =
                tx.prepare("INSERT INTO job_functions (id, parent_id) VALUES (?, ?)")?;
            for function in &data.job_functions {
                stmt.execute(params![function.id, function.parent_id])?;
            }

            let mut stmt =
                tx.prepare("INSERT INTO job_titles (id, job_function_id) VALUES (?, ?)")?;
            for title in &data.job_titles {
                stmt.execute(params![title.id, title.job_function_id])?;
            }
        }

        tx.execute(
            "INSERT INTO hierarchy_imports (source, locations, job_functions, job_titles)
             VALUES (?, ?, ?, ?)",
            params![
                source,
                data.locations.len() as i64,
                data.job_functions.len() as i64,
                data.job_titles.len() as i64,
            ],
        )?;
        let import_id = tx.last_insert_rowid();
        tx.commit()?;

        info!(
            source,
            locations = data.locations.len(),
            job_functions = data.job_functions.len(),
            job_titles = data.job_titles.len(),
            "Imported hierarchy"
        );

        self.get_import(import_id)
    }

    pub fn load_locations(&self) -> Result<Vec<LocationNode>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, parent_id, country_code, product_count FROM locations ORDER BY id",
        )?;
        let rows = stmt.query_map([], location_from_row)?;
        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(results)
    }

    pub fn load_job_functions(&self) -> Result<Vec<JobFunctionNode>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, parent_id FROM job_functions ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok(JobFunctionNode {
                id: row.get(0)?,
                parent_id: row.get(1)?,
            })
        })?;
        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(results)
    }

    pub fn load_job_titles(&self) -> Result<Vec<JobTitle>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, job_function_id FROM job_titles ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok(JobTitle {
                id: row.get(0)?,
                job_function_id: row.get(1)?,
            })
        })?;
        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(results)
    }

    /// Read every hierarchy row back.
    pub fn load_hierarchy(&self) -> Result<HierarchyData> {
        Ok(HierarchyData {
            locations: self.load_locations()?,
            job_functions: self.load_job_functions()?,
            job_titles: self.load_job_titles()?,
        })
    }

    pub fn counts(&self) -> Result<HierarchyCounts> {
        let count = |table: &str| -> Result<u64> {
            let count: i64 = self.conn.query_row(
                &format!("SELECT COUNT(*) FROM {table}"),
                [],
                |row| row.get(0),
            )?;
            Ok(count.max(0) as u64)
        };
        Ok(HierarchyCounts {
            locations: count("locations")?,
            job_functions: count("job_functions")?,
            job_titles: count("job_titles")?,
        })
    }

    pub fn last_import(&self) -> Result<Option<ImportRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, source, locations, job_functions, job_titles, imported_at
             FROM hierarchy_imports ORDER BY id DESC LIMIT 1",
        )?;
        let mut rows = stmt.query([])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(import_from_row(row)?));
        }
        Ok(None)
    }

    fn get_import(&self, id: i64) -> Result<ImportRecord> {
        let record = self.conn.query_row(
            "SELECT id, source, locations, job_functions, job_titles, imported_at
             FROM hierarchy_imports WHERE id = ?",
            [id],
            import_from_row,
        )?;
        Ok(record)
    }

    fn configure_pragmas(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA temp_store = MEMORY;
             PRAGMA foreign_keys = ON;",
        )?;
        Ok(())
    }
}

fn location_from_row(row: &Row<'_>) -> rusqlite::Result<LocationNode> {
    let product_count: i64 = row.get(3)?;
    Ok(LocationNode {
        id: row.get(0)?,
        parent_id: row.get(1)?,
        country_code: row.get(2)?,
        product_count: product_count.max(0) as u64,
    })
}

fn import_from_row(row: &Row<'_>) -> rusqlite::Result<ImportRecord> {
    let locations: i64 = row.get(2)?;
    let job_functions: i64 = row.get(3)?;
    let job_titles: i64 = row.get(4)?;
    Ok(ImportRecord {
        id: row.get(0)?,
        source: row.get(1)?,
        counts: HierarchyCounts {
            locations: locations.max(0) as u64,
            job_functions: job_functions.max(0) as u64,
            job_titles: job_titles.max(0) as u64,
        },
        imported_at: row.get(5)?,
    })
}
