//! Plain-text and GeoJSON renderers for command output.

use std::io::{self, Write};

use crate::domain::{LandslideId, QueryResult, Record, Session, records_to_feature_collection};

const RECORD_HEADER: [&str; 8] = [
    "landslideID",
    "latitude",
    "longitude",
    "lsType",
    "lsSource",
    "impact",
    "wea13_id",
    "wea13_type",
];

/// Write the signed-in identity.
pub fn write_identity(out: &mut impl Write, session: &Session) -> io::Result<()> {
    let user = session.user();
    writeln!(out, "{} <{}> (id {})", user.display_name(), user.email(), user.id())
}

/// Write a query result as a tab-separated table, preceded by its summary.
pub fn write_table(out: &mut impl Write, result: &QueryResult) -> io::Result<()> {
    if let Some(summary) = result.summary() {
        writeln!(out, "{summary}")?;
    }
    let records = result.records();
    if records.is_empty() {
        return Ok(());
    }
    writeln!(out, "{}", RECORD_HEADER.join("\t"))?;
    for record in records {
        write_row(out, record)?;
    }
    writeln!(out, "{} record(s)", records.len())
}

fn write_row(out: &mut impl Write, record: &Record) -> io::Result<()> {
    writeln!(
        out,
        "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
        record.landslide_id,
        record.latitude,
        record.longitude,
        record.ls_type,
        record.ls_source,
        record.impact,
        record.wea13_id.as_deref().unwrap_or("-"),
        record.wea13_type.as_deref().unwrap_or("-"),
    )
}

/// Write the records of `result` as a pretty-printed GeoJSON document.
pub fn write_geojson(out: &mut impl Write, result: &QueryResult) -> io::Result<()> {
    let collection = records_to_feature_collection(result.records());
    serde_json::to_writer_pretty(&mut *out, &collection).map_err(io::Error::other)?;
    writeln!(out)
}

/// Write the identifier the next report would use.
pub fn write_next_id(out: &mut impl Write, id: &LandslideId) -> io::Result<()> {
    writeln!(out, "Next landslide ID: {id}")
}
