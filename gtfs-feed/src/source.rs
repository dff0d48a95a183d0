//! Reading static GTFS tables from a directory of `.txt` files.

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Trim};
use tracing::debug;

use crate::schedule::{Row, TableName, TableSet};

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed CSV in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Read every known table present in `dir`.
///
/// Files that do not exist are left out of the table set, so the loader
/// can report required ones as missing.
pub fn read_dir(dir: impl AsRef<Path>) -> Result<TableSet, SourceError> {
    let dir = dir.as_ref();
    let mut tables = TableSet::new();

    for table in TableName::ALL {
        let path = dir.join(table.file_name());
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(%table, path = %path.display(), "table not present");
                continue;
            }
            Err(source) => return Err(SourceError::Io { path, source }),
        };

        let rows = read_table(file).map_err(|source| SourceError::Csv {
            path: path.clone(),
            source,
        })?;
        debug!(%table, rows = rows.len(), "read table");
        tables.insert(table, rows);
    }

    Ok(tables)
}

/// Tokenize one CSV table into rows keyed by header.
///
/// Header names are trimmed and a leading byte order mark is dropped.
/// Records may be shorter or longer than the header: missing trailing
/// columns read as absent and extra fields are ignored.
pub fn read_table<R: Read>(reader: R) -> Result<Vec<Row>, csv::Error> {
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        rows.push(
            headers
                .iter()
                .map(String::as_str)
                .zip(record.iter())
                .collect(),
        );
    }
    Ok(rows)
}
