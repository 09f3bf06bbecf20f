//! CSV incident loader with pre-run validation.
//!
//! Record format: `t,x,y,etype,priority_s,id` where `t` is the arrival
//! timestamp in seconds, `priority_s` is the allowed response window, and
//! `etype` is one of fire, medical, police, disaster. The deadline is
//! derived as `t + priority_s`.
//!
//! Malformed records are fatal configuration errors surfaced before the
//! simulation starts, never during the event loop.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::config::{ConfigError, SimulationConfig};
use crate::model::{Incident, IncidentKind, Point, incident::sort_for_dispatch};

/// One raw CSV record.
#[derive(Debug, Deserialize)]
struct IncidentRecord {
    t: f64,
    x: f64,
    y: f64,
    etype: String,
    priority_s: f64,
    id: u32,
}

/// Loads and validates incidents from a CSV file, sorted by arrival time.
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read or any record is
/// malformed (unknown type, negative time, non-positive response window,
/// coordinates outside the grid).
pub fn load_incidents(path: &Path, sim: &SimulationConfig) -> Result<Vec<Incident>, ConfigError> {
    let file = File::open(path).map_err(|e| ConfigError {
        field: "incidents".to_string(),
        message: format!("cannot read \"{}\": {e}", path.display()),
    })?;
    incidents_from_reader(file, sim)
}

/// Loads and validates incidents from any reader.
///
/// # Errors
///
/// Same conditions as [`load_incidents`].
pub fn incidents_from_reader<R: Read>(
    reader: R,
    sim: &SimulationConfig,
) -> Result<Vec<Incident>, ConfigError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut incidents = Vec::new();

    for (row, result) in rdr.deserialize::<IncidentRecord>().enumerate() {
        let record = result.map_err(|e| ConfigError {
            field: format!("incidents[{row}]"),
            message: e.to_string(),
        })?;
        incidents.push(incident_from_record(&record, row, sim)?);
    }

    sort_for_dispatch(&mut incidents);
    Ok(incidents)
}

fn incident_from_record(
    record: &IncidentRecord,
    row: usize,
    sim: &SimulationConfig,
) -> Result<Incident, ConfigError> {
    let kind = record
        .etype
        .parse::<IncidentKind>()
        .map_err(|e| ConfigError {
            field: format!("incidents[{row}].etype"),
            message: e,
        })?;
    if !record.t.is_finite() || record.t < 0.0 {
        return Err(ConfigError {
            field: format!("incidents[{row}].t"),
            message: format!("arrival time must be finite and >= 0, got {}", record.t),
        });
    }
    if !record.priority_s.is_finite() || record.priority_s <= 0.0 {
        return Err(ConfigError {
            field: format!("incidents[{row}].priority_s"),
            message: format!(
                "response window must be finite and > 0, got {}",
                record.priority_s
            ),
        });
    }
    if !(0.0..sim.grid_size).contains(&record.x) {
        return Err(ConfigError {
            field: format!("incidents[{row}].x"),
            message: format!("coordinate {} outside grid [0, {})", record.x, sim.grid_size),
        });
    }
    if !(0.0..sim.grid_size).contains(&record.y) {
        return Err(ConfigError {
            field: format!("incidents[{row}].y"),
            message: format!("coordinate {} outside grid [0, {})", record.y, sim.grid_size),
        });
    }
    let location = Point::new(record.x, record.y);

    let priority_weight = if kind == IncidentKind::Disaster {
        sim.disaster_multiplier
    } else {
        1.0
    };

    Ok(Incident {
        id: record.id,
        kind,
        location,
        arrival_time: record.t,
        deadline: record.t + record.priority_s,
        priority_weight,
    })
}
