//! Append-only storage for finished analyses
//!
//! Stores never update or delete a record. Ids are assigned on append,
//! starting at 1, and reads come back newest first.

use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::types::AnalysisResult;

/// A result waiting to be appended
#[derive(Debug, Clone)]
pub struct NewAnalysis {
    pub result: AnalysisResult,
    pub created_at: DateTime<Utc>,
}

impl NewAnalysis {
    pub fn now(result: AnalysisResult) -> Self {
        Self {
            result,
            created_at: Utc::now(),
        }
    }
}

/// A persisted analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredAnalysis {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub result: AnalysisResult,
}

/// Storage collaborator used by the analyzer and the HTTP surfaces
pub trait AnalysisStore: Send + Sync {
    /// Append a record and return it with its assigned id
    fn append(&self, record: NewAnalysis) -> Result<StoredAnalysis, StorageError>;

    /// Up to `limit` records, newest first
    fn list_recent(&self, limit: usize) -> Result<Vec<StoredAnalysis>, StorageError>;

    /// Newest record whose URL is exactly `url`
    fn find_latest_by_url(&self, url: &str) -> Result<Option<StoredAnalysis>, StorageError>;
}

/// In-process ordered append log
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<Vec<StoredAnalysis>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().map(|records| records.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AnalysisStore for MemoryStore {
    fn append(&self, record: NewAnalysis) -> Result<StoredAnalysis, StorageError> {
        let mut records = self.records.write().map_err(|_| StorageError::Poisoned)?;
        let stored = StoredAnalysis {
            id: records.len() as i64 + 1,
            created_at: record.created_at,
            result: record.result,
        };
        records.push(stored.clone());
        Ok(stored)
    }

    fn list_recent(&self, limit: usize) -> Result<Vec<StoredAnalysis>, StorageError> {
        let records = self.records.read().map_err(|_| StorageError::Poisoned)?;
        let mut recent: Vec<StoredAnalysis> = records.iter().cloned().collect();
        recent.sort_by(|a, b| newest_first(a, b));
        recent.truncate(limit);
        Ok(recent)
    }

    fn find_latest_by_url(&self, url: &str) -> Result<Option<StoredAnalysis>, StorageError> {
        let records = self.records.read().map_err(|_| StorageError::Poisoned)?;
        Ok(records
            .iter()
            .filter(|record| record.result.url == url)
            .min_by(|a, b| newest_first(a, b))
            .cloned())
    }
}

fn newest_first(a: &StoredAnalysis, b: &StoredAnalysis) -> std::cmp::Ordering {
    b.created_at
        .cmp(&a.created_at)
        .then_with(|| b.id.cmp(&a.id))
}

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;

#[cfg(feature = "sqlite")]
mod sqlite {
    use std::path::Path;
    use std::sync::Mutex;

    use chrono::{DateTime, SecondsFormat, Utc};
    use rusqlite::{Connection, OptionalExtension, Row, params};
    use tracing::info;

    use super::{AnalysisStore, NewAnalysis, StoredAnalysis};
    use crate::error::StorageError;
    use crate::types::AnalysisResult;

    const SCHEMA: &str = "
        CREATE TABLE IF NOT EXISTS analyses (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            url         TEXT NOT NULL,
            domain      TEXT NOT NULL,
            title       TEXT NOT NULL,
            score       INTEGER NOT NULL,
            payload     TEXT NOT NULL,
            created_at  TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_analyses_created_at ON analyses(created_at);
        CREATE INDEX IF NOT EXISTS idx_analyses_url ON analyses(url);
    ";

    /// SQLite table of analyses, indexed on creation time
    pub struct SqliteStore {
        conn: Mutex<Connection>,
    }

    impl SqliteStore {
        pub fn open(path: &Path) -> Result<Self, StorageError> {
            let conn = Connection::open(path)?;
            conn.execute_batch("PRAGMA journal_mode = WAL; PRAGMA synchronous = NORMAL;")?;
            info!(path = %path.display(), "opened analysis database");
            Self::with_connection(conn)
        }

        pub fn open_in_memory() -> Result<Self, StorageError> {
            Self::with_connection(Connection::open_in_memory()?)
        }

        fn with_connection(conn: Connection) -> Result<Self, StorageError> {
            conn.execute_batch(SCHEMA)?;
            Ok(Self {
                conn: Mutex::new(conn),
            })
        }
    }

    impl AnalysisStore for SqliteStore {
        fn append(&self, record: NewAnalysis) -> Result<StoredAnalysis, StorageError> {
            let payload = serde_json::to_string(&record.result)?;
            let conn = self.conn.lock().map_err(|_| StorageError::Poisoned)?;
            conn.execute(
                "INSERT INTO analyses (url, domain, title, score, payload, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    record.result.url,
                    record.result.domain,
                    record.result.title,
                    record.result.score,
                    payload,
                    format_timestamp(&record.created_at),
                ],
            )?;

            Ok(StoredAnalysis {
                id: conn.last_insert_rowid(),
                created_at: record.created_at,
                result: record.result,
            })
        }

        fn list_recent(&self, limit: usize) -> Result<Vec<StoredAnalysis>, StorageError> {
            let conn = self.conn.lock().map_err(|_| StorageError::Poisoned)?;
            let mut stmt = conn.prepare(
                "SELECT id, payload, created_at FROM analyses
                 ORDER BY created_at DESC, id DESC
                 LIMIT ?1",
            )?;

            let rows = stmt
                .query_map(params![limit as i64], raw_row)?
                .collect::<Result<Vec<_>, _>>()?;

            rows.into_iter().map(decode).collect()
        }

        fn find_latest_by_url(&self, url: &str) -> Result<Option<StoredAnalysis>, StorageError> {
            let conn = self.conn.lock().map_err(|_| StorageError::Poisoned)?;
            let row = conn
                .query_row(
                    "SELECT id, payload, created_at FROM analyses
                     WHERE url = ?1
                     ORDER BY created_at DESC, id DESC
                     LIMIT 1",
                    params![url],
                    raw_row,
                )
                .optional()?;

            row.map(decode).transpose()
        }
    }

    type RawRow = (i64, String, String);

    fn raw_row(row: &Row<'_>) -> rusqlite::Result<RawRow> {
        Ok((row.get(0)?, row.get(1)?, row.get(2)?))
    }

    fn decode((id, payload, created_at): RawRow) -> Result<StoredAnalysis, StorageError> {
        let result: AnalysisResult = serde_json::from_str(&payload)?;
        let created_at = DateTime::parse_from_rfc3339(&created_at)?.with_timezone(&Utc);
        Ok(StoredAnalysis {
            id,
            created_at,
            result,
        })
    }

    /// Fixed-width RFC 3339 so lexical order in SQLite matches time order
    fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
        timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ScoreCategory;
    use chrono::TimeZone;

    fn sample(url: &str) -> AnalysisResult {
        AnalysisResult {
            url: url.to_string(),
            title: "Title".to_string(),
            description: String::new(),
            domain: "example.com".to_string(),
            score: 42,
            score_category: ScoreCategory {
                good: 5,
                improvements: 5,
                issues: 2,
            },
            meta_tags: Vec::new(),
            open_graph_tags: Vec::new(),
            twitter_card_tags: Vec::new(),
            recommendations: Vec::new(),
            image_url: String::new(),
        }
    }

    fn at(url: &str, seconds: i64) -> NewAnalysis {
        NewAnalysis {
            result: sample(url),
            created_at: Utc.timestamp_opt(1_700_000_000 + seconds, 0).unwrap(),
        }
    }

    fn exercise_store(store: &dyn AnalysisStore) {
        let first = store.append(at("https://a.example/", 0)).unwrap();
        let second = store.append(at("https://b.example/", 10)).unwrap();
        let third = store.append(at("https://a.example/", 5)).unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(third.id, 3);

        let recent = store.list_recent(10).unwrap();
        let ids: Vec<i64> = recent.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);

        let limited = store.list_recent(2).unwrap();
        assert_eq!(limited.len(), 2);
        assert_eq!(limited[0].id, 2);

        assert!(store.list_recent(0).unwrap().is_empty());

        let latest = store.find_latest_by_url("https://a.example/").unwrap().unwrap();
        assert_eq!(latest.id, 3);
        assert_eq!(latest.result, sample("https://a.example/"));
        assert!(store.find_latest_by_url("https://c.example/").unwrap().is_none());
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::new();
        assert!(store.is_empty());
        exercise_store(&store);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_memory_store_same_timestamp_orders_by_id() {
        let store = MemoryStore::new();
        store.append(at("https://a.example/", 0)).unwrap();
        store.append(at("https://b.example/", 0)).unwrap();

        let recent = store.list_recent(5).unwrap();
        assert_eq!(recent[0].result.url, "https://b.example/");
    }

    #[test]
    fn test_stored_analysis_serializes_flat() {
        let store = MemoryStore::new();
        let stored = store.append(at("https://a.example/", 0)).unwrap();
        let json = serde_json::to_value(&stored).unwrap();

        assert_eq!(json["id"], 1);
        assert_eq!(json["url"], "https://a.example/");
        assert_eq!(json["scoreCategory"]["good"], 5);
        assert!(json["createdAt"].is_string());
    }

    #[cfg(feature = "sqlite")]
    #[test]
    fn test_sqlite_store_in_memory() {
        let store = SqliteStore::open_in_memory().unwrap();
        exercise_store(&store);
    }

    #[cfg(feature = "sqlite")]
    #[test]
    fn test_sqlite_store_persists_across_reopen() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("analyses.db");

        {
            let store = SqliteStore::open(&path).unwrap();
            store.append(at("https://a.example/", 0)).unwrap();
        }

        let reopened = SqliteStore::open(&path).unwrap();
        let recent = reopened.list_recent(5).unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].result.url, "https://a.example/");

        let next = reopened.append(at("https://b.example/", 1)).unwrap();
        assert_eq!(next.id, 2);
    }
}
