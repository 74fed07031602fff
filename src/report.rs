//! CSV export of calculator schedules

use csv::Writer;
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use crate::error::{CalcError, Result};
use crate::request::CalculatorResponse;

/// Serialize flat rows with a header line; returns the number of rows written
pub fn write_rows<W: Write, T: Serialize>(writer: W, rows: &[T]) -> Result<usize> {
    let mut csv_writer = Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer
        .flush()
        .map_err(|e| CalcError::io("<csv output>", e))?;
    Ok(rows.len())
}

/// Write the per-period table of a result
///
/// Calculators without a schedule write their single result row.
pub fn write_schedule<W: Write>(writer: W, response: &CalculatorResponse) -> Result<usize> {
    match response {
        CalculatorResponse::Amortization(r) => write_rows(writer, &r.schedule),
        CalculatorResponse::Loan(r) => write_rows(writer, &r.schedule),
        CalculatorResponse::CompoundInterest(r) => write_rows(writer, &r.schedule),
        CalculatorResponse::FutureValue(r) => write_rows(writer, &r.schedule),
        CalculatorResponse::PresentValue(r) => write_rows(writer, std::slice::from_ref(r)),
        CalculatorResponse::Annuity(r) => write_rows(writer, &r.schedule),
        CalculatorResponse::Ira(r) => write_rows(writer, &r.schedule),
        CalculatorResponse::Payback(r) => write_rows(writer, &r.schedule),
        CalculatorResponse::Budget(r) => write_rows(writer, &r.categories),
        CalculatorResponse::Margin(r) => write_rows(writer, std::slice::from_ref(r)),
    }
}

/// Write a result's schedule to `path`, creating parent directories
pub fn write_schedule_to_path<P: AsRef<Path>>(path: P, response: &CalculatorResponse) -> Result<usize> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| CalcError::io(parent, e))?;
    }
    let file = File::create(path).map_err(|e| CalcError::io(path, e))?;
    let rows = write_schedule(file, response)?;
    log::debug!("wrote {} rows to {}", rows, path.display());
    Ok(rows)
}
