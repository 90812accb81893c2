//! Credence Storage Layer
//!
//! Implements the `ClaimStore` trait on SQLite.
//!
//! # Architecture
//!
//! - `claims` holds one row per claim plus its belief state
//! - `verdicts` is the append-only audit trail of reviewer judgments
//! - Every mutation runs inside an `IMMEDIATE` transaction, so concurrent
//!   writers (threads or processes) are serialized by SQLite's write lock
//!
//! # Examples
//!
//! ```no_run
//! use credence_store::SqliteStore;
//! use credence_domain::traits::ClaimStore;
//!
//! let store = SqliteStore::in_memory().unwrap();
//! let id = store.create("boiling", "Water boils at 100°C at sea level", "physics.txt").unwrap();
//! let claim = store.promote(id).unwrap();
//! assert!(claim.is_current_winner());
//! ```

#![warn(missing_docs)]

use credence_domain::traits::ClaimStore;
use credence_domain::{
    Claim, ClaimId, ClaimStatus, ExclusivePromotion, StatusFilter, VerdictEntry, VerdictId,
    VerdictValue,
};
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tracing::debug;

/// How long a writer waits on another process's lock before giving up
const BUSY_TIMEOUT_SECS: u64 = 5;

const CLAIM_COLUMNS: &str =
    "claim_id, line_id, claim_text, source_ref, belief_score, status, created_at";

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error (storage unavailable or transaction failed)
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Claim not found
    #[error("Claim not found: {0}")]
    NotFound(ClaimId),

    /// The store cannot be used any more
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// A row held a value the domain does not recognise
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl StoreError {
    /// Whether this error means a referenced claim does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

/// SQLite-based implementation of ClaimStore
///
/// The connection sits behind a mutex, so one store can be shared between
/// threads (typically in an `Arc`). Separate processes opening the same file
/// are serialized by SQLite itself.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) a store at `path`
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use credence_store::SqliteStore;
    ///
    /// let store = SqliteStore::new("knowledge.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        Self::from_connection(Connection::open(path)?)
    }

    /// Open an in-memory store (useful for testing)
    pub fn in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.busy_timeout(Duration::from_secs(BUSY_TIMEOUT_SECS))?;
        conn.execute_batch(include_str!("schema.sql"))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Unavailable("connection lock poisoned".to_string()))
    }

    fn now_millis() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }

    /// Map a `claims` row selected with [`CLAIM_COLUMNS`]
    fn row_to_claim(row: &Row<'_>) -> rusqlite::Result<Claim> {
        let status_str: String = row.get(5)?;
        let status = status_str.parse::<ClaimStatus>().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, Box::new(e))
        })?;

        Ok(Claim {
            id: ClaimId::from_value(row.get(0)?),
            line_id: row.get(1)?,
            claim_text: row.get(2)?,
            source_ref: row.get(3)?,
            belief_score: row.get(4)?,
            status,
            created_at: row.get::<_, i64>(6)? as u64,
        })
    }

    fn fetch_claim(conn: &Connection, id: ClaimId) -> Result<Option<Claim>, StoreError> {
        let claim = conn
            .query_row(
                &format!("SELECT {} FROM claims WHERE claim_id = ?1", CLAIM_COLUMNS),
                params![id.value()],
                Self::row_to_claim,
            )
            .optional()?;
        Ok(claim)
    }

    fn insert_claim(
        conn: &Connection,
        line_id: &str,
        claim_text: &str,
        source_ref: &str,
    ) -> Result<ClaimId, StoreError> {
        conn.execute(
            "INSERT INTO claims (line_id, claim_text, source_ref, belief_score, status, created_at)
             VALUES (?1, ?2, ?3, 0, 'unreviewed', ?4)",
            params![line_id, claim_text, source_ref, Self::now_millis() as i64],
        )?;
        Ok(ClaimId::from_value(conn.last_insert_rowid()))
    }

    /// Set status and shift the score of one claim. Returns false if no row matched.
    fn apply_step(
        conn: &Connection,
        id: ClaimId,
        status: ClaimStatus,
        delta: i64,
    ) -> Result<bool, StoreError> {
        let changed = conn.execute(
            "UPDATE claims SET status = ?1, belief_score = belief_score + ?2 WHERE claim_id = ?3",
            params![status.as_str(), delta, id.value()],
        )?;
        Ok(changed > 0)
    }

    /// Run a single-claim transition in its own transaction
    fn transition(&self, id: ClaimId, status: ClaimStatus, delta: i64) -> Result<Claim, StoreError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        if !Self::apply_step(&tx, id, status, delta)? {
            return Err(StoreError::NotFound(id));
        }
        let claim = Self::fetch_claim(&tx, id)?.ok_or(StoreError::NotFound(id))?;
        tx.commit()?;

        debug!("Claim {} -> {} (score {})", id, status, claim.belief_score);
        Ok(claim)
    }
}

impl ClaimStore for SqliteStore {
    type Error = StoreError;

    fn create(&self, line_id: &str, claim_text: &str, source_ref: &str) -> Result<ClaimId, Self::Error> {
        let conn = self.lock()?;
        let id = Self::insert_claim(&conn, line_id, claim_text, source_ref)?;

        debug!("Created claim {} on line '{}'", id, line_id);
        Ok(id)
    }

    fn create_many(
        &self,
        line_id: &str,
        claim_texts: &[String],
        source_ref: &str,
    ) -> Result<Vec<ClaimId>, Self::Error> {
        let mut conn = self.lock()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let ids = claim_texts
            .iter()
            .map(|text| Self::insert_claim(&tx, line_id, text, source_ref))
            .collect::<Result<Vec<_>, _>>()?;
        tx.commit()?;

        debug!("Created {} claim(s) on line '{}'", ids.len(), line_id);
        Ok(ids)
    }

    fn get_claim(&self, id: ClaimId) -> Result<Option<Claim>, Self::Error> {
        let conn = self.lock()?;
        Self::fetch_claim(&conn, id)
    }

    fn promote(&self, id: ClaimId) -> Result<Claim, Self::Error> {
        self.transition(id, ClaimStatus::Promoted, 1)
    }

    fn demote(&self, id: ClaimId) -> Result<Claim, Self::Error> {
        self.transition(id, ClaimStatus::Demoted, -1)
    }

    fn promote_exclusive(&self, id: ClaimId) -> Result<ExclusivePromotion, Self::Error> {
        let mut conn = self.lock()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let line_id: String = tx
            .query_row(
                "SELECT line_id FROM claims WHERE claim_id = ?1",
                params![id.value()],
                |row| row.get(0),
            )
            .optional()?
            .ok_or(StoreError::NotFound(id))?;

        let siblings = {
            let mut stmt = tx.prepare(
                "SELECT claim_id FROM claims WHERE line_id = ?1 AND claim_id != ?2 ORDER BY claim_id",
            )?;
            let ids = stmt
                .query_map(params![line_id, id.value()], |row| {
                    row.get::<_, i64>(0).map(ClaimId::from_value)
                })?
                .collect::<Result<Vec<_>, _>>()?;
            ids
        };

        for sibling in &siblings {
            if !Self::apply_step(&tx, *sibling, ClaimStatus::Demoted, -1)? {
                return Err(StoreError::NotFound(*sibling));
            }
        }
        if !Self::apply_step(&tx, id, ClaimStatus::Promoted, 1)? {
            return Err(StoreError::NotFound(id));
        }

        let promoted = Self::fetch_claim(&tx, id)?.ok_or(StoreError::NotFound(id))?;
        tx.commit()?;

        debug!(
            "Claim {} promoted on line '{}', {} sibling(s) demoted",
            id,
            line_id,
            siblings.len()
        );
        Ok(ExclusivePromotion {
            promoted,
            demoted: siblings,
        })
    }

    fn record_verdict(&self, id: ClaimId, verdict: VerdictValue) -> Result<VerdictId, Self::Error> {
        let mut conn = self.lock()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        // Existence is checked explicitly rather than left to the foreign key.
        let exists: bool = tx
            .query_row(
                "SELECT 1 FROM claims WHERE claim_id = ?1",
                params![id.value()],
                |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false);
        if !exists {
            return Err(StoreError::NotFound(id));
        }

        tx.execute(
            "INSERT INTO verdicts (claim_id, verdict, timestamp) VALUES (?1, ?2, ?3)",
            params![id.value(), verdict.as_str(), Self::now_millis() as i64],
        )?;
        let verdict_id = VerdictId::from_value(tx.last_insert_rowid());
        tx.commit()?;

        debug!("Verdict {} '{}' logged for claim {}", verdict_id, verdict, id);
        Ok(verdict_id)
    }

    fn get_by_status(&self, filter: StatusFilter) -> Result<Vec<Claim>, Self::Error> {
        let conn = self.lock()?;

        let claims = match filter.status() {
            Some(status) => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM claims WHERE status = ?1 ORDER BY claim_id",
                    CLAIM_COLUMNS
                ))?;
                let rows = stmt
                    .query_map(params![status.as_str()], Self::row_to_claim)?
                    .collect::<Result<Vec<_>, _>>()?;
                rows
            }
            None => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM claims ORDER BY claim_id",
                    CLAIM_COLUMNS
                ))?;
                let rows = stmt
                    .query_map([], Self::row_to_claim)?
                    .collect::<Result<Vec<_>, _>>()?;
                rows
            }
        };

        Ok(claims)
    }

    fn get_verdict_history(&self, line_id: &str) -> Result<Vec<VerdictEntry>, Self::Error> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT v.verdict_id, v.claim_id, c.claim_text, v.verdict, v.timestamp
             FROM verdicts v
             JOIN claims c ON v.claim_id = c.claim_id
             WHERE c.line_id = ?1
             ORDER BY v.timestamp ASC, v.verdict_id ASC",
        )?;

        let history = stmt
            .query_map(params![line_id], |row| {
                let verdict_str: String = row.get(3)?;
                let verdict = verdict_str.parse::<VerdictValue>().map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(
                        3,
                        rusqlite::types::Type::Text,
                        Box::new(StoreError::InvalidData(e)),
                    )
                })?;

                Ok(VerdictEntry {
                    verdict_id: VerdictId::from_value(row.get(0)?),
                    claim_id: ClaimId::from_value(row.get(1)?),
                    claim_text: row.get(2)?,
                    verdict,
                    timestamp: row.get::<_, i64>(4)? as u64,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(history)
    }

    fn get_line_id(&self, id: ClaimId) -> Result<String, Self::Error> {
        let conn = self.lock()?;
        conn.query_row(
            "SELECT line_id FROM claims WHERE claim_id = ?1",
            params![id.value()],
            |row| row.get(0),
        )
        .optional()?
        .ok_or(StoreError::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_claim_defaults() {
        let store = SqliteStore::in_memory().unwrap();
        let id = store.create("line", "A claim", "doc.txt").unwrap();

        let claim = store.get_claim(id).unwrap().unwrap();
        assert_eq!(claim.status, ClaimStatus::Unreviewed);
        assert_eq!(claim.belief_score, 0);
        assert!(!claim.is_current_winner());
        assert!(claim.created_at > 0);
    }

    #[test]
    fn test_generated_winner_column_tracks_status() {
        let store = SqliteStore::in_memory().unwrap();
        let id = store.create("line", "A claim", "doc.txt").unwrap();
        store.promote(id).unwrap();

        let conn = store.lock().unwrap();
        let winner: i64 = conn
            .query_row(
                "SELECT current_winner FROM claims WHERE claim_id = ?1",
                params![id.value()],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(winner, 1);
    }

    #[test]
    fn test_winner_column_cannot_be_written() {
        let store = SqliteStore::in_memory().unwrap();
        let id = store.create("line", "A claim", "doc.txt").unwrap();

        let conn = store.lock().unwrap();
        let result = conn.execute(
            "UPDATE claims SET current_winner = 1 WHERE claim_id = ?1",
            params![id.value()],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_failed_transition_leaves_no_trace() {
        let store = SqliteStore::in_memory().unwrap();
        let result = store.promote(ClaimId::from_value(99));
        assert!(matches!(result, Err(StoreError::NotFound(_))));
        assert!(store.get_by_status(StatusFilter::All).unwrap().is_empty());
    }

    #[test]
    fn test_create_many_assigns_ids_in_order() {
        let store = SqliteStore::in_memory().unwrap();
        let texts = vec!["First".to_string(), "Second".to_string()];

        let ids = store.create_many("line", &texts, "doc.txt").unwrap();

        assert_eq!(ids.len(), 2);
        assert!(ids[0] < ids[1]);
        assert_eq!(store.get_claim(ids[1]).unwrap().unwrap().claim_text, "Second");
        assert!(store.create_many("line", &[], "doc.txt").unwrap().is_empty());
    }

    #[test]
    fn test_create_many_is_all_or_nothing() {
        let store = SqliteStore::in_memory().unwrap();
        store
            .lock()
            .unwrap()
            .execute_batch(
                "CREATE TRIGGER reject_claim BEFORE INSERT ON claims
                 WHEN NEW.claim_text = 'rejected'
                 BEGIN SELECT RAISE(ABORT, 'claim rejected'); END;",
            )
            .unwrap();

        let texts = vec![
            "Kept until the batch fails".to_string(),
            "rejected".to_string(),
            "Never reached".to_string(),
        ];
        let result = store.create_many("line", &texts, "doc.txt");

        assert!(matches!(result, Err(StoreError::Database(_))));
        assert!(store.get_by_status(StatusFilter::All).unwrap().is_empty());
    }

    #[test]
    fn test_is_not_found() {
        assert!(StoreError::NotFound(ClaimId::from_value(1)).is_not_found());
        assert!(!StoreError::Unavailable("x".into()).is_not_found());
    }
}
