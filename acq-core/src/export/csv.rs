use crate::assemble::RecoveredTable;
use crate::error::Result;
use std::borrow::Cow;
use std::io::{BufWriter, Write};

pub const INDEX_COLUMN: &str = "sample_index";
pub const TIME_COLUMN: &str = "time_seconds";

fn quote(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// Write the table as comma-separated text: a header row, then one row per
/// record in column order (index, time, channels).
pub fn write_csv(table: &RecoveredTable, w: impl Write) -> Result<()> {
    let mut w = BufWriter::new(w);
    write!(w, "{INDEX_COLUMN},{TIME_COLUMN}")?;
    for name in table.names() {
        write!(w, ",{}", quote(name))?;
    }
    w.write_all(b"\n")?;

    for row in table.rows() {
        write!(w, "{},{}", row.index(), row.time())?;
        for v in row.values() {
            write!(w, ",{v}")?;
        }
        w.write_all(b"\n")?;
    }
    w.flush()?;
    Ok(())
}
