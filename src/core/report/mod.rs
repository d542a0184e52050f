//! # Report Module
//!
//! Writes the CSV audit log of everything the classifiers found.
//!
//! One record per (kind, key, path) triple for every group with at least
//! two members - including the canonical file, so the log shows the full
//! membership of each group, not just what a sweep would move.

use crate::core::grouper::DuplicateMap;
use crate::error::ReportError;
use std::io::Write;
use std::path::Path;

/// Default name of the audit log, written next to where the tool runs
pub const DEFAULT_LOG_NAME: &str = "duplicates_log.csv";

/// Render the duplicate maps as CSV.
///
/// Columns: `Tipo,Hash/Nome,Caminho` - classification kind, the group key
/// (a digest or fingerprint hex, or a basename), and the member path.
pub fn write_log<W: Write>(maps: &[&DuplicateMap], mut writer: W) -> std::io::Result<()> {
    writeln!(writer, "Tipo,Hash/Nome,Caminho")?;

    for map in maps {
        for group in map.actionable_groups() {
            for path in &group.paths {
                writeln!(writer, "{},{},{}", map.kind, group.key, path.display())?;
            }
        }
    }

    Ok(())
}

/// Write the audit log to a file path
pub fn write_log_file(maps: &[&DuplicateMap], path: &Path) -> Result<(), ReportError> {
    let render = || -> std::io::Result<()> {
        let file = std::fs::File::create(path)?;
        let mut writer = std::io::BufWriter::new(file);
        write_log(maps, &mut writer)?;
        writer.flush()
    };

    render().map_err(|source| ReportError::WriteLog {
        path: path.to_path_buf(),
        source,
    })
}
