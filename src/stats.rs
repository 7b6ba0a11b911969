use crate::error::Result;
use crate::language::{Difficulty, Language};
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::Serialize;
use std::path::Path;
use uuid::Uuid;

/// A person taking typing tests. Anonymous, identified by a UUID.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: String,
    pub created_at: DateTime<Utc>,
}

/// One completed typing test
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestResultRecord {
    pub id: i64,
    pub user_id: String,
    pub chars_per_minute: f64,
    pub accuracy: f64,
    pub time_seconds: f64,
    pub language: Language,
    pub difficulty: Difficulty,
    pub created_at: DateTime<Utc>,
}

/// Validated input for [`StatsDb::record_result`]
#[derive(Debug, Clone, PartialEq)]
pub struct NewTestResult {
    pub user_id: String,
    pub chars_per_minute: f64,
    pub accuracy: f64,
    pub time_seconds: f64,
    pub language: Language,
    pub difficulty: Difficulty,
    /// Defaults to the insertion time
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BestPerformance {
    pub time: Option<f64>,
    pub accuracy: Option<f64>,
    pub chars_per_minute: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LastResult {
    pub time: Option<f64>,
    pub accuracy: Option<f64>,
    pub chars_per_minute: Option<f64>,
    pub language: Option<Language>,
    pub difficulty: Option<Difficulty>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AverageStatistics {
    pub time: Option<f64>,
    pub accuracy: Option<f64>,
    pub chars_per_minute: Option<f64>,
    pub total_tests: i64,
}

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY,
        created_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS test_results (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        chars_per_minute REAL NOT NULL,
        accuracy REAL NOT NULL,
        time_seconds REAL NOT NULL,
        language TEXT NOT NULL,
        difficulty TEXT NOT NULL,
        created_at TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS ix_test_results_user_created
        ON test_results(user_id, created_at);

    CREATE INDEX IF NOT EXISTS ix_test_results_language_difficulty
        ON test_results(language, difficulty);
"#;

const RESULT_COLUMNS: &str =
    "id, user_id, chars_per_minute, accuracy, time_seconds, language, difficulty, created_at";

/// Database manager for users and their test results
#[derive(Debug)]
pub struct StatsDb {
    conn: Connection,
}

impl StatsDb {
    /// Open (creating if needed) the database file and its tables
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| crate::error::TypetestError::from_io(parent.to_path_buf(), e))?;
        }
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", true)?;
        conn.execute_batch(SCHEMA)?;
        Ok(StatsDb { conn })
    }

    /// Cheap liveness check used by the health endpoint
    pub fn ping(&self) -> Result<()> {
        self.conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
        Ok(())
    }

    pub fn create_user(&self) -> Result<User> {
        let user = User {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now().trunc_subsecs(6),
        };
        self.conn.execute(
            "INSERT INTO users (id, created_at) VALUES (?1, ?2)",
            params![user.id, encode_timestamp(&user.created_at)],
        )?;
        Ok(user)
    }

    pub fn get_user(&self, user_id: &str) -> Result<Option<User>> {
        let user = self
            .conn
            .query_row(
                "SELECT id, created_at FROM users WHERE id = ?1",
                [user_id],
                |row| {
                    Ok(User {
                        id: row.get(0)?,
                        created_at: decode_timestamp(row, 1)?,
                    })
                },
            )
            .optional()?;
        Ok(user)
    }

    /// Existing user for `user_id`, or a freshly created one when the id is
    /// absent, blank or unknown
    pub fn resolve_user(&self, user_id: Option<&str>) -> Result<User> {
        if let Some(id) = user_id.map(str::trim).filter(|id| !id.is_empty()) {
            if let Some(user) = self.get_user(id)? {
                return Ok(user);
            }
            tracing::info!(user_id = id, "unknown user id, creating a new user");
        }
        self.create_user()
    }

    /// Delete a user together with all of their results
    pub fn delete_user(&self, user_id: &str) -> Result<bool> {
        let deleted = self.conn.execute("DELETE FROM users WHERE id = ?1", [user_id])?;
        Ok(deleted > 0)
    }

    pub fn record_result(&self, result: &NewTestResult) -> Result<TestResultRecord> {
        let created_at = result.created_at.unwrap_or_else(Utc::now).trunc_subsecs(6);
        self.conn.execute(
            r#"
            INSERT INTO test_results
            (user_id, chars_per_minute, accuracy, time_seconds, language, difficulty, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                result.user_id,
                result.chars_per_minute,
                result.accuracy,
                result.time_seconds,
                result.language.to_string(),
                result.difficulty.to_string(),
                encode_timestamp(&created_at),
            ],
        )?;

        Ok(TestResultRecord {
            id: self.conn.last_insert_rowid(),
            user_id: result.user_id.clone(),
            chars_per_minute: result.chars_per_minute,
            accuracy: result.accuracy,
            time_seconds: result.time_seconds,
            language: result.language,
            difficulty: result.difficulty,
            created_at,
        })
    }

    pub fn get_result(&self, result_id: i64) -> Result<Option<TestResultRecord>> {
        let sql = format!("SELECT {RESULT_COLUMNS} FROM test_results WHERE id = ?1");
        let record = self
            .conn
            .query_row(&sql, [result_id], record_from_row)
            .optional()?;
        Ok(record)
    }

    pub fn delete_result(&self, result_id: i64) -> Result<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM test_results WHERE id = ?1", [result_id])?;
        Ok(deleted > 0)
    }

    /// Returns the number of removed results
    pub fn delete_results_for_user(&self, user_id: &str) -> Result<usize> {
        let deleted = self
            .conn
            .execute("DELETE FROM test_results WHERE user_id = ?1", [user_id])?;
        Ok(deleted)
    }

    /// All results of a user, oldest first
    pub fn results_for_user(&self, user_id: &str) -> Result<Vec<TestResultRecord>> {
        let sql = format!(
            "SELECT {RESULT_COLUMNS} FROM test_results WHERE user_id = ?1 ORDER BY created_at ASC, id ASC"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let records = stmt
            .query_map([user_id], record_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }

    /// Results across all users, optionally narrowed by language and/or difficulty
    pub fn filtered_results(
        &self,
        language: Option<Language>,
        difficulty: Option<Difficulty>,
    ) -> Result<Vec<TestResultRecord>> {
        let sql = format!(
            r#"
            SELECT {RESULT_COLUMNS} FROM test_results
            WHERE (?1 IS NULL OR language = ?1) AND (?2 IS NULL OR difficulty = ?2)
            ORDER BY created_at ASC, id ASC
            "#
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let records = stmt
            .query_map(
                params![
                    language.map(|l| l.to_string()),
                    difficulty.map(|d| d.to_string())
                ],
                record_from_row,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }

    pub fn last_result(&self, user_id: &str) -> Result<Option<LastResult>> {
        let sql = format!(
            "SELECT {RESULT_COLUMNS} FROM test_results WHERE user_id = ?1 ORDER BY created_at DESC, id DESC LIMIT 1"
        );
        let last = self
            .conn
            .query_row(&sql, [user_id], record_from_row)
            .optional()?
            .map(|record| LastResult {
                time: Some(record.time_seconds),
                accuracy: Some(record.accuracy),
                chars_per_minute: Some(record.chars_per_minute),
                language: Some(record.language),
                difficulty: Some(record.difficulty),
            });
        Ok(last)
    }

    /// Lowest time, highest accuracy and highest speed of a user
    pub fn best_performance(&self, user_id: &str) -> Result<BestPerformance> {
        let best = self.conn.query_row(
            r#"
            SELECT MIN(time_seconds), MAX(accuracy), MAX(chars_per_minute)
            FROM test_results
            WHERE user_id = ?1
            "#,
            [user_id],
            |row| {
                Ok(BestPerformance {
                    time: row.get(0)?,
                    accuracy: row.get(1)?,
                    chars_per_minute: row.get(2)?,
                })
            },
        )?;
        Ok(best)
    }

    pub fn average_statistics(&self, user_id: &str) -> Result<AverageStatistics> {
        let averages = self.conn.query_row(
            r#"
            SELECT AVG(time_seconds), AVG(accuracy), AVG(chars_per_minute), COUNT(id)
            FROM test_results
            WHERE user_id = ?1
            "#,
            [user_id],
            |row| {
                Ok(AverageStatistics {
                    time: row.get(0)?,
                    accuracy: row.get(1)?,
                    chars_per_minute: row.get(2)?,
                    total_tests: row.get(3)?,
                })
            },
        )?;
        Ok(averages)
    }
}

// Fixed-width UTC timestamps sort lexicographically in chronological order.
fn encode_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn decode_timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| conversion_error(idx, e))
}

fn conversion_error<E>(idx: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(err))
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<TestResultRecord> {
    let language: String = row.get(5)?;
    let difficulty: String = row.get(6)?;
    Ok(TestResultRecord {
        id: row.get(0)?,
        user_id: row.get(1)?,
        chars_per_minute: row.get(2)?,
        accuracy: row.get(3)?,
        time_seconds: row.get(4)?,
        language: language.parse::<Language>().map_err(|e| conversion_error(5, e))?,
        difficulty: difficulty.parse::<Difficulty>().map_err(|e| conversion_error(6, e))?,
        created_at: decode_timestamp(row, 7)?,
    })
}
