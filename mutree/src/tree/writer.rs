//! Append-only writer for the persisted event-record table.
//!
//! One row goes into `events` and one into `event_ids` per processed event,
//! in lockstep, inside a single transaction. Sequence-valued fields are
//! stored as JSON text columns; scalars map to native columns. Row order is
//! append order.

use mucore::data::event::{EventId, EventRecord};
use rusqlite::{params, Connection};
use std::error::Error;
use std::path::Path;

pub struct TreeWriter {
    pub connection: Connection,
}

impl TreeWriter {
    /// Open (or create) the table file and ensure the schema exists.
    pub fn create<P: AsRef<Path>>(path: P) -> rusqlite::Result<Self> {
        let connection = Connection::open(path)?;
        Self::with_connection(connection)
    }

    /// In-memory variant for tests.
    pub fn create_in_memory() -> rusqlite::Result<Self> {
        let connection = Connection::open_in_memory()?;
        Self::with_connection(connection)
    }

    fn with_connection(connection: Connection) -> rusqlite::Result<Self> {
        connection.execute_batch(
            "CREATE TABLE IF NOT EXISTS events (
                run_number INTEGER NOT NULL,
                luminosity_block_number INTEGER NOT NULL,
                event_number INTEGER NOT NULL,
                primary_vertex TEXT NOT NULL,
                cov_primary_vertex TEXT NOT NULL,
                n_vtx INTEGER NOT NULL,
                pf_met REAL NOT NULL,
                pf_ch_met REAL NOT NULL,
                calo_met REAL NOT NULL,
                triggers TEXT NOT NULL,
                hlt_objects TEXT NOT NULL,
                gen_infos TEXT NOT NULL,
                gen_particles TEXT NOT NULL,
                muons TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS event_ids (
                run_number INTEGER NOT NULL,
                luminosity_block_number INTEGER NOT NULL,
                event_number INTEGER NOT NULL
            );",
        )?;
        Ok(TreeWriter { connection })
    }

    /// Append one event: one row per table, both or neither.
    pub fn append(
        &mut self,
        record: &EventRecord,
        event_id: &EventId,
    ) -> Result<(), Box<dyn Error>> {
        let tx = self.connection.transaction()?;

        tx.execute(
            "INSERT INTO events (
                run_number, luminosity_block_number, event_number,
                primary_vertex, cov_primary_vertex, n_vtx,
                pf_met, pf_ch_met, calo_met,
                triggers, hlt_objects, gen_infos, gen_particles, muons
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
            params![
                record.run_number,
                record.luminosity_block_number,
                record.event_number as i64,
                serde_json::to_string(&record.primary_vertex)?,
                serde_json::to_string(&record.cov_primary_vertex)?,
                record.n_vtx,
                record.mets.pf_met,
                record.mets.pf_ch_met,
                record.mets.calo_met,
                serde_json::to_string(&record.hlt.triggers)?,
                serde_json::to_string(&record.hlt.objects)?,
                serde_json::to_string(&record.gen_infos)?,
                serde_json::to_string(&record.gen_particles)?,
                serde_json::to_string(&record.muons)?,
            ],
        )?;

        tx.execute(
            "INSERT INTO event_ids (run_number, luminosity_block_number, event_number)
             VALUES (?1, ?2, ?3)",
            params![
                event_id.run_number,
                event_id.luminosity_block_number,
                event_id.event_number as i64,
            ],
        )?;

        tx.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::generator::EventGenerator;
    use mucore::builder::assemble::{build_record, ProducerConfig};
    use rayon::prelude::*;

    #[test]
    fn test_append_writes_both_tables_in_lockstep() {
        let cfg = ProducerConfig::default();
        let events = EventGenerator::new(1).events(3);

        let mut writer = TreeWriter::create_in_memory().unwrap();
        for inputs in &events {
            let (record, event_id) = build_record(&cfg, inputs);
            writer.append(&record, &event_id).unwrap();
        }

        let count = |table: &str| -> i64 {
            writer
                .connection
                .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
                    row.get(0)
                })
                .unwrap()
        };
        assert_eq!(count("events"), 3);
        assert_eq!(count("event_ids"), 3);
    }

    #[test]
    fn test_parallel_build_matches_sequential() {
        let cfg = ProducerConfig::default();
        let events = EventGenerator::new(9).events(20);

        let sequential: Vec<_> = events.iter().map(|e| build_record(&cfg, e)).collect();
        let parallel: Vec<_> = events.par_iter().map(|e| build_record(&cfg, e)).collect();

        assert_eq!(sequential, parallel);
    }
}
