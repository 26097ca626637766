//! CSV export of a derived transaction view.
//!
//! RFC 4180 output via the `csv` crate: fields containing commas, quotes
//! or newlines are quoted and embedded quotes doubled. The column order
//! matches the dashboard export button: `Title,Amount,Date,Category,Type`.

use crate::error::Result;
use crate::models::Transaction;
use std::fs::File;
use std::io::Write;
use std::path::Path;

pub const CSV_HEADER: [&str; 5] = ["Title", "Amount", "Date", "Category", "Type"];

/// Write the header plus one row per transaction, in the order given.
/// Callers pass the filtered + sorted view; zero transactions yields
/// exactly the header row.
pub fn write_csv<W: Write>(transactions: &[Transaction], writer: W) -> Result<()> {
    let mut w = csv::Writer::from_writer(writer);
    w.write_record(CSV_HEADER)?;
    for t in transactions {
        let amount = t.amount.to_string();
        w.write_record([
            t.title.as_str(),
            amount.as_str(),
            t.date.as_str(),
            t.category.as_str(),
            t.kind.as_str(),
        ])?;
    }
    w.flush()?;
    Ok(())
}

/// Render the export as an in-memory string.
pub fn to_csv_string(transactions: &[Transaction]) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(transactions, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Write the export to a file path.
pub fn write_csv_path<P: AsRef<Path>>(transactions: &[Transaction], path: P) -> Result<()> {
    let file = File::create(path)?;
    write_csv(transactions, file)
}
