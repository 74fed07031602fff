//! AWS Lambda handler for evaluating calculator requests
//!
//! Accepts a tagged JSON request, e.g.
//! `{ "calculator": "loan", "amount": 250000, "annual_rate": 6.5, "term_years": 30 }`,
//! and returns `{ "result": { ... } }` or `{ "errors": [ ... ] }` when the inputs
//! fail validation.
//!
//! A `"rates"` array turns the request into a rate sweep and returns one
//! headline figure per rate instead.

use fincalc::scenario::SweepPoint;
use fincalc::{CalculatorOutcome, CalculatorRequest, ScenarioRunner};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct LambdaRequest {
    #[serde(flatten)]
    pub request: CalculatorRequest,

    /// Annual rates in percent to sweep the request across
    #[serde(default)]
    pub rates: Option<Vec<f64>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum LambdaResponse {
    Single(CalculatorOutcome),
    Sweep {
        calculator: &'static str,
        points: Vec<SweepPoint>,
        execution_time_ms: u64,
    },
}

async fn handler(event: LambdaEvent<LambdaRequest>) -> Result<LambdaResponse, Error> {
    let start = std::time::Instant::now();
    let LambdaRequest { request, rates } = event.payload;
    log::info!("{} request {}", request.name(), event.context.request_id);

    let Some(rates) = rates else {
        return Ok(LambdaResponse::Single(request.evaluate()));
    };

    let calculator = request.name();
    let points = ScenarioRunner::new(request)
        .sweep(&rates)
        .ok_or_else(|| format!("{calculator} has no annual rate to sweep"))?;

    Ok(LambdaResponse::Sweep {
        calculator,
        points,
        execution_time_ms: start.elapsed().as_millis() as u64,
    })
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}
