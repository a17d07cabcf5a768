//! Reader for persisted event-record tables.
//!
//! Decodes the JSON sequence columns back into record values. Rows come back
//! in append order.

use mucore::data::event::{EventId, EventRecord, HltSummary, MetRecord};
use rusqlite::Connection;
use std::error::Error;
use std::path::Path;

pub struct TreeReader {
    pub connection: Connection,
}

fn decode_json<T: serde::de::DeserializeOwned>(
    column: usize,
    text: String,
) -> rusqlite::Result<T> {
    serde_json::from_str(&text).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(e))
    })
}

impl TreeReader {
    pub fn new<P: AsRef<Path>>(path: P) -> rusqlite::Result<Self> {
        let connection = Connection::open(path)?;
        Ok(TreeReader { connection })
    }

    /// Read every event record, in append order.
    pub fn read_event_records(&self) -> Result<Vec<EventRecord>, Box<dyn Error>> {
        let mut stmt = self.connection.prepare(
            "SELECT run_number, luminosity_block_number, event_number,
                    primary_vertex, cov_primary_vertex, n_vtx,
                    pf_met, pf_ch_met, calo_met,
                    triggers, hlt_objects, gen_infos, gen_particles, muons
             FROM events ORDER BY rowid",
        )?;

        let rows: Result<Vec<EventRecord>, _> = stmt
            .query_map([], |row| {
                let event_number: i64 = row.get(2)?;
                Ok(EventRecord {
                    run_number: row.get(0)?,
                    luminosity_block_number: row.get(1)?,
                    event_number: event_number as u64,
                    primary_vertex: decode_json(3, row.get(3)?)?,
                    cov_primary_vertex: decode_json(4, row.get(4)?)?,
                    n_vtx: row.get(5)?,
                    mets: MetRecord {
                        pf_met: row.get(6)?,
                        pf_ch_met: row.get(7)?,
                        calo_met: row.get(8)?,
                    },
                    hlt: HltSummary {
                        triggers: decode_json(9, row.get(9)?)?,
                        objects: decode_json(10, row.get(10)?)?,
                    },
                    gen_infos: decode_json(11, row.get(11)?)?,
                    gen_particles: decode_json(12, row.get(12)?)?,
                    muons: decode_json(13, row.get(13)?)?,
                })
            })?
            .collect();

        Ok(rows?)
    }

    /// Read the per-event identity rows, in append order.
    pub fn read_event_ids(&self) -> Result<Vec<EventId>, Box<dyn Error>> {
        let mut stmt = self.connection.prepare(
            "SELECT run_number, luminosity_block_number, event_number
             FROM event_ids ORDER BY rowid",
        )?;

        let rows: Result<Vec<EventId>, _> = stmt
            .query_map([], |row| {
                let event_number: i64 = row.get(2)?;
                Ok(EventId {
                    run_number: row.get(0)?,
                    luminosity_block_number: row.get(1)?,
                    event_number: event_number as u64,
                })
            })?
            .collect();

        Ok(rows?)
    }
}
