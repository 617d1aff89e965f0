//! CSV export for the yearly cash-flow table and the monthly breakdown.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::projection::{MonthRecord, Payback, ProjectionResult, YearRecord};

/// Column header for the yearly cash-flow export.
const YEARS_HEADER: &str = "year,output_factor,production_kwh,saving,rebate,\
                            total_benefit,cumulative_benefit,paid_back";

/// Column header for the monthly breakdown export.
const MONTHLY_HEADER: &str = "month,insolation,daily_kwh,monthly_kwh,saving";

/// Exports the yearly cash-flow table of `result` to a CSV file.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_years_csv(result: &ProjectionResult, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_years_csv(&result.years, result.payback, buf)
}

/// Writes yearly records as CSV to any writer.
///
/// `paid_back` is `true` from the payback year onward.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_years_csv(years: &[YearRecord], payback: Payback, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(YEARS_HEADER.split(',').map(str::trim))?;

    for r in years {
        let paid_back = payback.year().is_some_and(|y| r.year >= y);
        wtr.write_record(&[
            r.year.to_string(),
            format!("{:.6}", r.output_factor),
            format!("{:.3}", r.production_kwh),
            format!("{:.2}", r.saving),
            format!("{:.2}", r.rebate),
            format!("{:.2}", r.total_benefit),
            format!("{:.2}", r.cumulative_benefit),
            paid_back.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Exports the monthly breakdown of `result` to a CSV file.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_monthly_csv(result: &ProjectionResult, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_monthly_csv(&result.monthly, buf)
}

/// Writes monthly records as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_monthly_csv(months: &[MonthRecord], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(MONTHLY_HEADER.split(','))?;

    for m in months {
        wtr.write_record(&[
            m.name.to_string(),
            format!("{:.2}", m.insolation),
            format!("{:.2}", m.daily_kwh),
            format!("{:.2}", m.monthly_kwh),
            format!("{:.2}", m.saving),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
