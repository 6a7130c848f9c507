#![forbid(unsafe_code)]

mod migrations;
pub(crate) mod seed;

use crate::store::StoreError;
use rusqlite::{Connection, OptionalExtension, params};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Identity of one persisted store: its snapshot row name and the schema
/// version the running code writes.
#[derive(Clone, Copy, Debug)]
pub struct StoreDef {
    pub name: &'static str,
    pub version: i64,
}

/// The fixed set of persisted stores and their current versions. Migrations
/// in `migrations::chain_for` must end exactly at these numbers.
pub mod stores {
    use super::StoreDef;

    pub const USERS: StoreDef = StoreDef {
        name: "users",
        version: 1,
    };
    pub const REQUIREMENTS: StoreDef = StoreDef {
        name: "requirements",
        version: 1,
    };
    pub const CONTROLS: StoreDef = StoreDef {
        name: "controls",
        version: 3,
    };
    pub const ASSESSMENTS: StoreDef = StoreDef {
        name: "assessments",
        version: 2,
    };
    pub const ARTIFACTS: StoreDef = StoreDef {
        name: "artifacts",
        version: 2,
    };
    pub const FINDINGS: StoreDef = StoreDef {
        name: "findings",
        version: 2,
    };
}

#[derive(Clone, Debug)]
pub struct Snapshot {
    pub version: i64,
    pub payload: Value,
}

/// One versioned JSON payload per store, stored in sqlite. Every save
/// replaces the store's whole row inside a transaction, so a crash mid-write
/// never corrupts earlier state: last successful snapshot wins.
#[derive(Debug)]
pub struct SnapshotStore {
    conn: Connection,
    storage_dir: PathBuf,
}

impl SnapshotStore {
    pub fn open(storage_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let storage_dir = storage_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&storage_dir)?;

        let db_path = storage_dir.join("tracker.db");
        let conn = Connection::open(db_path)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        conn.execute_batch(
            r#"
            PRAGMA journal_mode=WAL;
            PRAGMA synchronous=NORMAL;

            CREATE TABLE IF NOT EXISTS snapshots (
              store TEXT PRIMARY KEY,
              version INTEGER NOT NULL,
              payload TEXT NOT NULL,
              updated_at_ms INTEGER NOT NULL
            );
            "#,
        )?;

        Ok(Self { conn, storage_dir })
    }

    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    pub fn load(&self, store: &str) -> Result<Option<Snapshot>, StoreError> {
        let row = self
            .conn
            .query_row(
                "SELECT version, payload FROM snapshots WHERE store=?1",
                params![store],
                |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?;

        match row {
            Some((version, payload)) => {
                let payload: Value = serde_json::from_str(&payload)?;
                Ok(Some(Snapshot { version, payload }))
            }
            None => Ok(None),
        }
    }

    pub fn save(
        &mut self,
        store: &str,
        version: i64,
        payload: &Value,
        now_ms: i64,
    ) -> Result<(), StoreError> {
        let text = serde_json::to_string(payload)?;
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO snapshots(store, version, payload, updated_at_ms) VALUES (?1, ?2, ?3, ?4) \
             ON CONFLICT(store) DO UPDATE SET version=excluded.version, payload=excluded.payload, \
             updated_at_ms=excluded.updated_at_ms",
            params![store, version, text, now_ms],
        )?;
        tx.commit()?;
        Ok(())
    }

    /// Load one store's payload at the code's expected version. A newer
    /// persisted version is rejected fail-closed; an older one is run
    /// through the ordered migration chain and the migrated payload is
    /// persisted before it is returned. A migration error leaves the prior
    /// payload untouched.
    pub fn load_migrated(
        &mut self,
        def: StoreDef,
        now_ms: i64,
    ) -> Result<Option<Value>, StoreError> {
        let Some(snapshot) = self.load(def.name)? else {
            return Ok(None);
        };

        if snapshot.version > def.version {
            return Err(StoreError::SnapshotVersionAhead {
                store: def.name,
                persisted: snapshot.version,
                supported: def.version,
            });
        }

        if snapshot.version == def.version {
            return Ok(Some(snapshot.payload));
        }

        let mut payload = snapshot.payload;
        for step in migrations::chain_for(def.name) {
            if step.to_version <= snapshot.version || step.to_version > def.version {
                continue;
            }
            (step.apply)(&mut payload).map_err(|message| StoreError::Migration {
                store: def.name,
                to_version: step.to_version,
                message,
            })?;
        }

        self.save(def.name, def.version, &payload, now_ms)?;
        Ok(Some(payload))
    }
}
