use rusqlite::{Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

/// Slot names for the persisted collections and selection filters. These are
/// the stable storage keys; renaming one orphans existing workspaces.
pub const SLOT_LESSONS: &str = "aulas";
pub const SLOT_ATTENDANCE: &str = "frequencias";
pub const SLOT_GRADES: &str = "notas";
pub const SLOT_PLANS: &str = "planejamentos";
pub const SLOT_SCHEDULE: &str = "gradeHoraria";
pub const SLOT_CALENDAR: &str = "calendario";
pub const SLOT_SELECTED_CLASS: &str = "turmaSelecionada";
pub const SLOT_SELECTED_SUBJECT: &str = "disciplinaSelecionada";
pub const SLOT_SELECTED_MONTH: &str = "mesAnoFrequencia";
pub const SLOT_SELECTED_BIMESTER: &str = "bimestreSelecionado";

pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(workspace: &Path) -> anyhow::Result<Store> {
        std::fs::create_dir_all(workspace)?;
        let db_path = workspace.join("diario.sqlite3");
        let conn = Connection::open(db_path)?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS slots(
                name TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )?;
        Ok(Store { conn })
    }

    /// Read a slot, substituting `default` when the slot has never been
    /// written. A missing slot does NOT create a row; only an explicit write
    /// persists anything. A payload that no longer deserializes falls back to
    /// the default and the corrupted row is overwritten so the next read is
    /// clean. Neither case surfaces an error to the caller.
    pub fn read_slot<T, F>(&self, name: &str, default: F) -> anyhow::Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> T,
    {
        let raw: Option<String> = self
            .conn
            .query_row("SELECT value FROM slots WHERE name = ?", [name], |r| {
                r.get(0)
            })
            .optional()?;

        let Some(raw) = raw else {
            return Ok(default());
        };

        match serde_json::from_str::<T>(&raw) {
            Ok(v) => Ok(v),
            Err(_) => {
                let v = default();
                self.write_slot(name, &v)?;
                Ok(v)
            }
        }
    }

    /// Replace a slot's value. The row is written in a single statement, so
    /// readers see either the old payload or the new one, never a mix.
    pub fn write_slot<T: Serialize>(&self, name: &str, value: &T) -> anyhow::Result<()> {
        let raw = serde_json::to_string(value)?;
        self.conn.execute(
            "INSERT INTO slots(name, value) VALUES(?, ?)
             ON CONFLICT(name) DO UPDATE SET value = excluded.value",
            (name, &raw),
        )?;
        Ok(())
    }

    /// Read-modify-write a slot and return the stored result.
    pub fn update_slot<T, F, U>(&self, name: &str, default: F, f: U) -> anyhow::Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> T,
        U: FnOnce(T) -> T,
    {
        let current = self.read_slot(name, default)?;
        let next = f(current);
        self.write_slot(name, &next)?;
        Ok(next)
    }

    #[cfg(test)]
    fn slot_row_count(&self, name: &str) -> usize {
        self.conn
            .query_row(
                "SELECT COUNT(*) FROM slots WHERE name = ?",
                [name],
                |r| r.get::<_, i64>(0),
            )
            .unwrap_or(0) as usize
    }

    #[cfg(test)]
    fn write_raw(&self, name: &str, raw: &str) {
        self.conn
            .execute(
                "INSERT INTO slots(name, value) VALUES(?, ?)
                 ON CONFLICT(name) DO UPDATE SET value = excluded.value",
                (name, raw),
            )
            .unwrap();
    }
}
