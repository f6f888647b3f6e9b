use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use super::model::{DeputyTable, Metric};

pub const EXPORT_FILE_NAME: &str = "deputados_filtrados.csv";

/// Canonical export header, in column order.
pub fn deputy_header() -> [&'static str; 6] {
    [
        "nome_deputado",
        "partido",
        "uf",
        Metric::Followers.column(),
        Metric::Likes.column(),
        Metric::Views.column(),
    ]
}

/// Write the header and the selected `rows` of `table` as comma-separated
/// UTF-8. The header is written even when `rows` is empty.
pub fn write_deputies_csv<W: Write>(
    writer: W,
    table: &DeputyTable,
    rows: &[usize],
) -> Result<(), csv::Error> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(deputy_header())?;
    for &i in rows {
        wtr.serialize(&table.rows[i])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn to_csv_bytes(table: &DeputyTable, rows: &[usize]) -> Result<Vec<u8>, csv::Error> {
    let mut buf = Vec::new();
    write_deputies_csv(&mut buf, table, rows)?;
    Ok(buf)
}

/// Export straight to a file picked by the user.
pub fn save_deputies_csv(path: &Path, table: &DeputyTable, rows: &[usize]) -> Result<()> {
    let bytes = to_csv_bytes(table, rows).context("encoding CSV")?;
    std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))?;
    log::info!("Exported {} deputies to {}", rows.len(), path.display());
    Ok(())
}
