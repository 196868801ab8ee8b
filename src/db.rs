use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::Connection;

use crate::record::Record;

pub fn connect(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path).with_context(|| format!("opening {}", path.display()))?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS runs (
            id           INTEGER PRIMARY KEY,
            url          TEXT NOT NULL,
            fetched_at   TEXT NOT NULL,
            record_count INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_runs_url ON runs(url);

        CREATE TABLE IF NOT EXISTS records (
            id        INTEGER PRIMARY KEY,
            run_id    INTEGER NOT NULL REFERENCES runs(id),
            position  INTEGER NOT NULL,
            type      TEXT NOT NULL CHECK(type IN ('link','heading')),
            tag       TEXT NOT NULL,
            text      TEXT NOT NULL,
            href      TEXT NOT NULL,
            UNIQUE(run_id, position)
        );
        CREATE INDEX IF NOT EXISTS idx_records_run ON records(run_id);
        ",
    )?;
    Ok(())
}

/// Store one page's records as a new run. Returns the run id.
pub fn save_run(
    conn: &Connection,
    url: &str,
    fetched_at: DateTime<Utc>,
    records: &[Record],
) -> Result<i64> {
    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "INSERT INTO runs (url, fetched_at, record_count) VALUES (?1, ?2, ?3)",
        rusqlite::params![url, fetched_at.to_rfc3339(), records.len() as i64],
    )?;
    let run_id = tx.last_insert_rowid();
    {
        let mut stmt = tx.prepare(
            "INSERT INTO records (run_id, position, type, tag, text, href)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )?;
        for (i, r) in records.iter().enumerate() {
            stmt.execute(rusqlite::params![
                run_id,
                i as i64,
                r.kind.as_str(),
                r.tag,
                r.text,
                r.href,
            ])?;
        }
    }
    tx.commit()?;
    Ok(run_id)
}

/// Records of one run, in document order.
#[cfg(test)]
pub fn fetch_records(conn: &Connection, run_id: i64) -> Result<Vec<Record>> {
    let mut stmt = conn.prepare(
        "SELECT type, tag, text, href FROM records WHERE run_id = ?1 ORDER BY position",
    )?;
    let rows = stmt
        .query_map([run_id], |row| {
            let kind: String = row.get(0)?;
            Ok(Record {
                kind: if kind == "link" {
                    crate::record::RecordKind::Link
                } else {
                    crate::record::RecordKind::Heading
                },
                tag: row.get(1)?,
                text: row.get(2)?,
                href: row.get(3)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}
