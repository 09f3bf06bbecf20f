//! CSV export of the per-incident outcome log.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::sim::engine::{IncidentOutcome, Outcome};

/// Column header for the outcome CSV.
const HEADER: &str = "id,t,kind,outcome,unit,response_time_s,travel_distance,slack_s,points";

/// Exports the outcome log to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(outcomes: &[IncidentOutcome], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(outcomes, buf)
}

/// Writes the outcome log as CSV to any writer.
///
/// One row per incident in processing order; failed incidents leave the
/// unit and timing columns empty. Deterministic for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(outcomes: &[IncidentOutcome], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(','))?;

    for o in outcomes {
        match o.outcome {
            Outcome::Served {
                unit_id,
                travel_time,
                travel_distance,
                slack_s,
                points,
                ..
            } => {
                wtr.write_record(&[
                    o.incident_id.to_string(),
                    format!("{:.2}", o.time),
                    o.kind.to_string(),
                    "served".to_string(),
                    unit_id.to_string(),
                    format!("{travel_time:.2}"),
                    format!("{travel_distance:.2}"),
                    format!("{slack_s:.2}"),
                    format!("{points:.4}"),
                ])?;
            }
            Outcome::Failed { penalty } => {
                wtr.write_record(&[
                    o.incident_id.to_string(),
                    format!("{:.2}", o.time),
                    o.kind.to_string(),
                    "failed".to_string(),
                    String::new(),
                    String::new(),
                    String::new(),
                    String::new(),
                    format!("{penalty:.4}"),
                ])?;
            }
        }
    }

    wtr.flush()?;
    Ok(())
}
