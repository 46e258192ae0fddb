//! SQLite persistence: schema creation, bulk load, and author lookup.
//!
//! The load model is a destructive full refresh: both tables are dropped
//! and recreated before every load, and publications and authors are loaded
//! from the same normalized batch inside one transaction, so every author
//! row references an existing publication.

use rusqlite::Connection;
use std::path::Path;
use thiserror::Error;

use crate::models::{AuthorRow, ParsedRecord};

/// Store error types
#[derive(Debug, Error)]
pub enum StoreError {
    /// Both name fields were empty on an author query
    #[error("A first or last name must be submitted")]
    BlankAuthorQuery,

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

/// One (author, publication) pair returned by an author query.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthorHit {
    pub pmid: i64,
    pub abstract_text: String,
    pub title: String,
    pub pub_date: String,
    pub aid: i64,
    pub full_name: String,
}

/// Handle on the publications database.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open (or create) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Ok(Self {
            conn: Connection::open(path)?,
        })
    }

    /// Open an in-memory database.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    /// Drop and recreate both tables and the author index.
    pub fn create_tables(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            "DROP TABLE IF EXISTS publications;
             CREATE TABLE publications
                 (PMID INTEGER, Abstract TEXT, Title TEXT, Pub_Date TEXT,
                 PRIMARY KEY (PMID));
             DROP TABLE IF EXISTS authors;
             CREATE TABLE authors
                 (AID INTEGER, PMID INTEGER, Full_Name TEXT, Last_Name TEXT, First_Name TEXT,
                 PRIMARY KEY (AID));
             CREATE INDEX idx_author_pmid ON authors (PMID);",
        )?;
        tracing::debug!("created tables");
        Ok(())
    }

    /// Bulk-append a normalized batch into both tables.
    ///
    /// Runs in a single transaction, so a failure mid-load leaves the
    /// previously created empty tables rather than a partial load.
    pub fn load(
        &mut self,
        records: &[ParsedRecord],
        authors: &[AuthorRow],
    ) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        {
            let mut insert_pub = tx.prepare(
                "INSERT INTO publications (PMID, Pub_Date, Abstract, Title)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for record in records {
                insert_pub.execute((
                    record.pmid,
                    &record.pub_date,
                    &record.abstract_text,
                    &record.title,
                ))?;
            }

            let mut insert_author = tx.prepare(
                "INSERT INTO authors (AID, PMID, Full_Name, Last_Name, First_Name)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for author in authors {
                insert_author.execute((
                    author.aid,
                    author.pmid,
                    &author.full_name,
                    &author.last_name,
                    &author.first_name,
                ))?;
            }
        }
        tx.commit()?;

        tracing::info!(
            publications = records.len(),
            authors = authors.len(),
            "loaded tables"
        );
        Ok(())
    }

    /// Prefix-match authors by name parts, joined to their publications.
    ///
    /// Either name may be empty, broadening the match to every author
    /// sharing the other part (logged as a warning); both empty is an
    /// error. Matching is case-insensitive per SQLite's default `LIKE`.
    /// Row order is the store's natural join order.
    pub fn author_query(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> Result<Vec<AuthorHit>, StoreError> {
        if first_name.is_empty() && last_name.is_empty() {
            return Err(StoreError::BlankAuthorQuery);
        }
        if first_name.is_empty() {
            tracing::warn!("searching all authors with last name {}", last_name);
        } else if last_name.is_empty() {
            tracing::warn!("searching all authors with first name {}", first_name);
        }

        let mut stmt = self.conn.prepare(
            "SELECT pubs.PMID, pubs.Abstract, pubs.Title,
                    pubs.Pub_Date, auth.AID, auth.Full_Name
             FROM publications pubs INNER JOIN authors auth ON auth.PMID = pubs.PMID
             WHERE Last_Name LIKE ?1 AND First_Name LIKE ?2",
        )?;

        let rows = stmt.query_map(
            (format!("{}%", last_name), format!("{}%", first_name)),
            |row| {
                Ok(AuthorHit {
                    pmid: row.get(0)?,
                    abstract_text: row.get(1)?,
                    title: row.get(2)?,
                    pub_date: row.get(3)?,
                    aid: row.get(4)?,
                    full_name: row.get(5)?,
                })
            },
        )?;

        rows.collect::<Result<Vec<_>, _>>().map_err(StoreError::from)
    }
}
