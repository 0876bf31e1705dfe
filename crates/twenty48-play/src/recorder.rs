use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OptionalExtension};

use crate::actor::GameResult;

/// Minimal session recorder that writes `metadata.db` with `runs` and
/// `session` tables.
///
/// Schema:
/// - runs(id INTEGER PRIMARY KEY, seed BIGINT, moves INT, score INT, highest_tile INT, won INT)
/// - session(meta_key TEXT PRIMARY KEY, meta_value TEXT)
pub struct SessionRecorder {
    session_dir: PathBuf,
    conn: Connection,
}

impl SessionRecorder {
    /// Create or open a session at `dir`, ensure schema exists.
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self, rusqlite::Error> {
        let session_dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&session_dir)
            .map_err(|_e| rusqlite::Error::ExecuteReturnedResults)?;
        let db_path = session_dir.join("metadata.db");
        let conn = Connection::open(db_path)?;
        conn.pragma_update(None, "journal_mode", &"WAL")?;
        conn.pragma_update(None, "synchronous", &"NORMAL")?;
        // Create schema if missing
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS runs (
                id INTEGER PRIMARY KEY,
                seed BIGINT NOT NULL,
                moves INT NOT NULL,
                score INT NOT NULL,
                highest_tile INT NOT NULL,
                won INT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS session (
                meta_key TEXT PRIMARY KEY,
                meta_value TEXT NOT NULL
            );
            "#,
        )?;
        Ok(Self { session_dir, conn })
    }

    /// Insert or update a run summary row.
    pub fn upsert_run(&mut self, r: &GameResult) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT INTO runs (id, seed, moves, score, highest_tile, won) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(id) DO UPDATE SET seed=excluded.seed, moves=excluded.moves, score=excluded.score, highest_tile=excluded.highest_tile, won=excluded.won",
            params![
                r.game_id as i64,
                r.seed as i64,
                r.moves as i64,
                r.score as i64,
                r.highest_tile as i64,
                r.won as i64
            ],
        )?;
        Ok(())
    }

    /// Set a session meta value by key (stored as TEXT; put JSON if needed).
    pub fn set_meta<K: AsRef<str>, V: AsRef<str>>(
        &mut self,
        key: K,
        value: V,
    ) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT INTO session (meta_key, meta_value) VALUES (?1, ?2)
             ON CONFLICT(meta_key) DO UPDATE SET meta_value=excluded.meta_value",
            params![key.as_ref(), value.as_ref()],
        )?;
        Ok(())
    }

    /// Optional helper to read back a meta value in tests/tools.
    pub fn get_meta<K: AsRef<str>>(&self, key: K) -> Result<Option<String>, rusqlite::Error> {
        self.conn
            .query_row(
                "SELECT meta_value FROM session WHERE meta_key = ?1",
                params![key.as_ref()],
                |row| row.get::<_, String>(0),
            )
            .optional()
    }

    /// Optional helper to fetch a run back.
    pub fn get_run(&self, id: u32) -> Result<Option<GameResult>, rusqlite::Error> {
        self.conn
            .query_row(
                "SELECT id, seed, moves, score, highest_tile, won FROM runs WHERE id = ?1",
                params![id as i64],
                |row| {
                    Ok(GameResult {
                        game_id: row.get::<_, i64>(0)? as u32,
                        seed: row.get::<_, i64>(1)? as u64,
                        moves: row.get::<_, i64>(2)? as u64,
                        score: row.get::<_, i64>(3)? as u64,
                        highest_tile: row.get::<_, i64>(4)? as u64,
                        won: row.get::<_, i64>(5)? != 0,
                    })
                },
            )
            .optional()
    }

    /// Absolute path to the session directory.
    pub fn session_dir(&self) -> &Path {
        &self.session_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn basic_session_roundtrip() {
        let td = tempdir().unwrap();
        let path = td.path().join("session");
        let mut rec = SessionRecorder::new(&path).expect("open session");
        assert!(rec.session_dir().exists());
        // Set some meta
        rec.set_meta("base_seed", "42").unwrap();
        rec.set_meta("strategy", "Greedy").unwrap();
        // Upsert two runs
        rec.upsert_run(&GameResult {
            game_id: 1,
            seed: 42,
            moves: 180,
            score: 2156,
            highest_tile: 256,
            won: false,
        })
        .unwrap();
        rec.upsert_run(&GameResult {
            game_id: 2,
            seed: 43,
            moves: 940,
            score: 20304,
            highest_tile: 2048,
            won: true,
        })
        .unwrap();
        // Update one run
        rec.upsert_run(&GameResult {
            game_id: 1,
            seed: 42,
            moves: 200,
            score: 2400,
            highest_tile: 256,
            won: false,
        })
        .unwrap();

        // Read back
        let seed = rec.get_meta("base_seed").unwrap();
        assert_eq!(seed.as_deref(), Some("42"));
        let r1 = rec.get_run(1).unwrap().expect("run 1");
        assert_eq!(r1.moves, 200);
        assert_eq!(r1.score, 2400);
        let r2 = rec.get_run(2).unwrap().expect("run 2");
        assert_eq!(r2.highest_tile, 2048);
        assert!(r2.won);
        assert!(rec.get_run(3).unwrap().is_none());
    }
}
