//! Load calculator requests from JSON and payback cash flows from CSV

use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use std::fs;
use std::io::Read;
use std::path::Path;

use crate::error::{CalcError, Result};
use crate::payback::CashFlowSeries;
use crate::request::CalculatorRequest;

/// Raw CSV row of a cash-flow file
///
/// `period` is optional; when present it must count up from 1.
#[derive(Debug, Deserialize)]
struct CashFlowCsvRow {
    #[serde(default)]
    period: Option<u32>,
    #[serde(alias = "amount", alias = "inflow")]
    cash_flow: f64,
}

/// Load a tagged request from a JSON file
pub fn load_request<P: AsRef<Path>>(path: P) -> Result<CalculatorRequest> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| CalcError::io(path, e))?;
    let request = serde_json::from_str(&text)?;
    log::debug!("loaded request from {}", path.display());
    Ok(request)
}

/// Load a tagged request from any reader (e.g., stdin)
pub fn load_request_from_reader<R: Read>(reader: R) -> Result<CalculatorRequest> {
    Ok(serde_json::from_reader(reader)?)
}

/// Load per-period inflows from a CSV file with a `cash_flow` column
pub fn load_cash_flows<P: AsRef<Path>>(path: P) -> Result<CashFlowSeries> {
    let path = path.as_ref();
    let file = fs::File::open(path).map_err(|e| CalcError::io(path, e))?;
    load_cash_flows_from_reader(file, path)
}

/// Load per-period inflows from any reader; `source` names it in errors
pub fn load_cash_flows_from_reader<R: Read>(reader: R, source: &Path) -> Result<CashFlowSeries> {
    let mut csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let mut flows = Vec::new();

    for (index, result) in csv_reader.deserialize().enumerate() {
        let row: CashFlowCsvRow = result?;
        let expected = index as u32 + 1;
        if let Some(period) = row.period {
            if period != expected {
                return Err(CalcError::CashFlowRow {
                    path: source.to_path_buf(),
                    row: index + 1,
                    message: format!("expected period {expected}, found {period}"),
                });
            }
        }
        if !row.cash_flow.is_finite() {
            return Err(CalcError::CashFlowRow {
                path: source.to_path_buf(),
                row: index + 1,
                message: "cash flow must be a finite number".to_string(),
            });
        }
        flows.push(row.cash_flow);
    }

    if flows.is_empty() {
        return Err(CalcError::EmptyCashFlows {
            path: source.to_path_buf(),
        });
    }

    log::debug!("loaded {} cash flows from {}", flows.len(), source.display());
    Ok(CashFlowSeries::Uneven(flows))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> &'static Path {
        Path::new("flows.csv")
    }

    #[test]
    fn test_load_with_periods() {
        let data = "period,cash_flow\n1, 30000\n2,40000\n3,50000\n";
        let series = load_cash_flows_from_reader(data.as_bytes(), source()).unwrap();
        assert_eq!(series, CashFlowSeries::Uneven(vec![30_000.0, 40_000.0, 50_000.0]));
    }

    #[test]
    fn test_load_amount_column_without_periods() {
        let data = "amount\n100.5\n-20\n";
        let series = load_cash_flows_from_reader(data.as_bytes(), source()).unwrap();
        assert_eq!(series.flows(), vec![100.5, -20.0]);
    }

    #[test]
    fn test_out_of_order_period_rejected() {
        let data = "period,cash_flow\n1,10\n3,10\n";
        let err = load_cash_flows_from_reader(data.as_bytes(), source()).unwrap_err();
        assert!(matches!(err, CalcError::CashFlowRow { row: 2, .. }));
        assert_eq!(
            err.to_string(),
            "cash-flow file flows.csv row 2: expected period 2, found 3"
        );
    }

    #[test]
    fn test_empty_and_malformed_files() {
        let empty = load_cash_flows_from_reader("cash_flow\n".as_bytes(), source());
        assert!(matches!(empty, Err(CalcError::EmptyCashFlows { .. })));

        let malformed = load_cash_flows_from_reader("cash_flow\nabc\n".as_bytes(), source());
        assert!(matches!(malformed, Err(CalcError::Csv(_))));
    }

    #[test]
    fn test_request_from_reader() {
        let json = r#"{ "calculator": "future_value", "present_value": 1000, "periods": 5 }"#;
        let request = load_request_from_reader(json.as_bytes()).unwrap();
        assert_eq!(request.name(), "future_value");

        let bad = load_request_from_reader(r#"{ "calculator": "lottery" }"#.as_bytes());
        assert!(matches!(bad, Err(CalcError::Json(_))));
    }

    #[test]
    fn test_missing_file() {
        let err = load_request("definitely/not/here.json").unwrap_err();
        assert!(matches!(err, CalcError::Io { .. }));
    }
}
