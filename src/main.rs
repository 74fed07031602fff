//! fincalc CLI
//!
//! Command-line interface for running any calculator, either from flags or from
//! a tagged JSON request file.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::PathBuf;

use fincalc::budget::{BudgetCategory, BudgetInputs, ExpenseItem, IncomeItem};
use fincalc::loader::{load_cash_flows, load_request};
use fincalc::loan::{
    AmortizationInputs, ExtraPayments, LoanInputs, LoanKind, OneTimeExtra, RecurringExtra,
};
use fincalc::margin::MarginInputs;
use fincalc::payback::{CashFlowSeries, PaybackInputs};
use fincalc::report::{write_schedule, write_schedule_to_path};
use fincalc::savings::{
    AnnuityInputs, CompoundInterestInputs, FutureValueInputs, IraAccountType, IraInputs,
    PresentValueInputs,
};
use fincalc::{
    CalculatorOutcome, CalculatorRequest, CompoundFrequency, Frequency, Settings, Timing,
};

#[derive(Debug, Parser)]
#[command(name = "fincalc", version, about = "Loan, savings, payback and budget calculators")]
struct Cli {
    /// Print the full outcome as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Write the result's schedule to this CSV file
    #[arg(long, global = true, value_name = "PATH")]
    csv: Option<PathBuf>,

    /// Schedule rows to print after the summary
    #[arg(long, global = true, value_name = "ROWS")]
    preview: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Evaluate a tagged JSON request file
    Run {
        request: PathBuf,
    },
    /// Amortization schedule with optional extra payments
    Amortization(AmortizationArgs),
    /// Level payment for a loan
    Loan(LoanArgs),
    /// Compound growth with recurring contributions
    CompoundInterest(CompoundArgs),
    /// Future value of a lump sum plus payments
    FutureValue(FutureValueArgs),
    /// Present value of a future amount plus payments
    PresentValue(PresentValueArgs),
    /// Payout that draws a balance down to zero
    Annuity(AnnuityArgs),
    /// Traditional or Roth IRA growth to retirement
    Ira(IraArgs),
    /// Payback period, NPV, ROI and IRR
    Payback(PaybackArgs),
    /// Monthly budget against the 50/30/20 rule
    Budget(BudgetArgs),
    /// Gross margin and markup from two known quantities
    Margin(MarginArgs),
}

#[derive(Debug, Args)]
struct AmortizationArgs {
    #[arg(long, default_value_t = 200_000.0)]
    amount: f64,
    /// Annual rate in percent
    #[arg(long, default_value_t = 6.0)]
    rate: f64,
    #[arg(long, default_value_t = 30)]
    years: u32,
    #[arg(long, default_value_t = 0)]
    months: u32,
    /// First payment date (YYYY-MM-DD)
    #[arg(long)]
    start: Option<NaiveDate>,
    #[arg(long)]
    extra_monthly: Option<f64>,
    #[arg(long)]
    extra_yearly: Option<f64>,
    /// Payment number of the first yearly extra [default: 12, or the last payment of shorter loans]
    #[arg(long, requires = "extra_yearly")]
    extra_yearly_start: Option<u32>,
    /// One-time extra payment as PERIOD=AMOUNT; repeatable
    #[arg(long = "one-time", value_parser = parse_one_time)]
    one_time: Vec<OneTimeExtra>,
}

#[derive(Debug, Args)]
struct LoanArgs {
    #[arg(long, default_value_t = 100_000.0)]
    amount: f64,
    #[arg(long, default_value_t = 6.0)]
    rate: f64,
    #[arg(long, default_value_t = 10)]
    years: u32,
    #[arg(long, default_value_t = 0)]
    months: u32,
    #[arg(long, default_value = "monthly", value_parser = parse_enum::<Frequency>)]
    frequency: Frequency,
    #[arg(long, default_value = "monthly", value_parser = parse_enum::<CompoundFrequency>)]
    compounding: CompoundFrequency,
    /// Single repayment at maturity instead of level payments
    #[arg(long)]
    deferred: bool,
    #[arg(long)]
    start: Option<NaiveDate>,
}

#[derive(Debug, Args)]
struct CompoundArgs {
    #[arg(long, default_value_t = 10_000.0)]
    principal: f64,
    #[arg(long, default_value_t = 5.0)]
    rate: f64,
    #[arg(long, default_value_t = 10)]
    years: u32,
    #[arg(long, default_value_t = 0)]
    months: u32,
    #[arg(long, default_value = "monthly", value_parser = parse_enum::<CompoundFrequency>)]
    compounding: CompoundFrequency,
    #[arg(long, default_value_t = 0.0)]
    contribution: f64,
    #[arg(long, default_value = "monthly", value_parser = parse_enum::<Frequency>)]
    contribution_frequency: Frequency,
    #[arg(long, default_value = "end", value_parser = parse_enum::<Timing>)]
    timing: Timing,
    /// Yearly percentage increase of the contribution
    #[arg(long, default_value_t = 0.0)]
    increase: f64,
}

#[derive(Debug, Args)]
struct FutureValueArgs {
    #[arg(long, default_value_t = 10_000.0)]
    present_value: f64,
    #[arg(long, default_value_t = 0.0)]
    payment: f64,
    #[arg(long, default_value_t = 6.0)]
    rate: f64,
    #[arg(long, default_value_t = 10)]
    periods: u32,
    #[arg(long, default_value = "annually", value_parser = parse_enum::<Frequency>)]
    frequency: Frequency,
    #[arg(long, default_value = "annually", value_parser = parse_enum::<CompoundFrequency>)]
    compounding: CompoundFrequency,
    #[arg(long, default_value = "end", value_parser = parse_enum::<Timing>)]
    timing: Timing,
}

#[derive(Debug, Args)]
struct PresentValueArgs {
    #[arg(long, default_value_t = 10_000.0)]
    future_value: f64,
    #[arg(long, default_value_t = 0.0)]
    payment: f64,
    #[arg(long, default_value_t = 6.0)]
    rate: f64,
    #[arg(long, default_value_t = 10)]
    periods: u32,
    #[arg(long, default_value = "annually", value_parser = parse_enum::<Frequency>)]
    frequency: Frequency,
    #[arg(long, default_value = "annually", value_parser = parse_enum::<CompoundFrequency>)]
    compounding: CompoundFrequency,
    #[arg(long, default_value = "end", value_parser = parse_enum::<Timing>)]
    timing: Timing,
}

#[derive(Debug, Args)]
struct AnnuityArgs {
    #[arg(long, default_value_t = 500_000.0)]
    principal: f64,
    #[arg(long, default_value_t = 5.0)]
    rate: f64,
    #[arg(long, default_value_t = 20)]
    years: u32,
    #[arg(long, default_value_t = 0)]
    months: u32,
    #[arg(long, default_value = "monthly", value_parser = parse_enum::<Frequency>)]
    frequency: Frequency,
    #[arg(long, default_value = "monthly", value_parser = parse_enum::<CompoundFrequency>)]
    compounding: CompoundFrequency,
    #[arg(long, default_value = "end", value_parser = parse_enum::<Timing>)]
    timing: Timing,
}

#[derive(Debug, Args)]
struct IraArgs {
    #[arg(long, default_value_t = 0.0)]
    balance: f64,
    #[arg(long, default_value_t = 7_000.0)]
    contribution: f64,
    #[arg(long, default_value_t = 30)]
    age: u32,
    #[arg(long, default_value_t = 65)]
    retirement_age: u32,
    #[arg(long, default_value_t = 7.0)]
    rate: f64,
    #[arg(long, default_value_t = 22.0)]
    current_tax: f64,
    #[arg(long, default_value_t = 15.0)]
    retirement_tax: f64,
    #[arg(long, default_value_t = 3.0)]
    inflation: f64,
    #[arg(long)]
    roth: bool,
}

#[derive(Debug, Args)]
struct PaybackArgs {
    #[arg(long)]
    investment: f64,
    /// Comma-separated inflows, one per period
    #[arg(long, value_delimiter = ',', conflicts_with = "flows_csv")]
    flows: Vec<f64>,
    /// CSV file with a cash_flow column
    #[arg(long)]
    flows_csv: Option<PathBuf>,
    /// Annual discount rate in percent
    #[arg(long, default_value_t = 10.0)]
    rate: f64,
    #[arg(long, default_value = "annually", value_parser = parse_enum::<Frequency>)]
    frequency: Frequency,
}

#[derive(Debug, Args)]
struct BudgetArgs {
    /// Monthly take-home income
    #[arg(long)]
    income: f64,
    /// Monthly spending on needs
    #[arg(long, default_value_t = 0.0)]
    needs: f64,
    #[arg(long, default_value_t = 0.0)]
    wants: f64,
    #[arg(long, default_value_t = 0.0)]
    savings: f64,
}

#[derive(Debug, Args)]
struct MarginArgs {
    #[arg(long)]
    cost: Option<f64>,
    #[arg(long)]
    revenue: Option<f64>,
    /// Margin in percent of revenue
    #[arg(long)]
    margin: Option<f64>,
}

/// Parse a snake_case enum name through its serde representation
fn parse_enum<T: DeserializeOwned>(s: &str) -> Result<T, String> {
    let name = s.trim().to_ascii_lowercase().replace('-', "_");
    serde_json::from_value(Value::String(name)).map_err(|e| e.to_string())
}

fn parse_one_time(s: &str) -> Result<OneTimeExtra, String> {
    let (period, amount) = s
        .split_once('=')
        .ok_or_else(|| format!("expected PERIOD=AMOUNT, got {s:?}"))?;
    Ok(OneTimeExtra {
        period: period.trim().parse().map_err(|e| format!("bad period: {e}"))?,
        amount: amount.trim().parse().map_err(|e| format!("bad amount: {e}"))?,
    })
}

fn monthly_expense(name: &str, amount: f64, category: BudgetCategory) -> ExpenseItem {
    ExpenseItem {
        name: name.to_string(),
        amount,
        frequency: Frequency::Monthly,
        category,
    }
}

fn build_request(command: Command) -> Result<CalculatorRequest> {
    let request = match command {
        Command::Run { request } => load_request(&request)
            .with_context(|| format!("loading request {}", request.display()))?,
        Command::Amortization(a) => {
            let yearly_start = a.extra_yearly_start.unwrap_or_else(|| {
                Frequency::Monthly.periods_in(a.years, a.months).clamp(1, 12)
            });
            CalculatorRequest::Amortization(AmortizationInputs {
                loan_amount: a.amount,
                annual_rate: a.rate,
                term_years: a.years,
                term_months: a.months,
                start_date: a.start,
                extra_payments: ExtraPayments {
                    monthly: a.extra_monthly.map(|amount| RecurringExtra {
                        amount,
                        start_period: 1,
                    }),
                    yearly: a.extra_yearly.map(|amount| RecurringExtra {
                        amount,
                        start_period: yearly_start,
                    }),
                    one_time: a.one_time,
                },
            })
        }
        Command::Loan(a) => CalculatorRequest::Loan(LoanInputs {
            amount: a.amount,
            annual_rate: a.rate,
            term_years: a.years,
            term_months: a.months,
            payment_frequency: a.frequency,
            compound_frequency: a.compounding,
            kind: if a.deferred {
                LoanKind::Deferred
            } else {
                LoanKind::Amortized
            },
            start_date: a.start,
        }),
        Command::CompoundInterest(a) => CalculatorRequest::CompoundInterest(CompoundInterestInputs {
            principal: a.principal,
            annual_rate: a.rate,
            years: a.years,
            months: a.months,
            compound_frequency: a.compounding,
            contribution: a.contribution,
            contribution_frequency: a.contribution_frequency,
            contribution_timing: a.timing,
            annual_contribution_increase: a.increase,
        }),
        Command::FutureValue(a) => CalculatorRequest::FutureValue(FutureValueInputs {
            present_value: a.present_value,
            payment: a.payment,
            annual_rate: a.rate,
            compound_frequency: a.compounding,
            payment_frequency: a.frequency,
            periods: a.periods,
            timing: a.timing,
        }),
        Command::PresentValue(a) => CalculatorRequest::PresentValue(PresentValueInputs {
            future_value: a.future_value,
            payment: a.payment,
            annual_rate: a.rate,
            compound_frequency: a.compounding,
            payment_frequency: a.frequency,
            periods: a.periods,
            timing: a.timing,
        }),
        Command::Annuity(a) => CalculatorRequest::Annuity(AnnuityInputs {
            principal: a.principal,
            annual_rate: a.rate,
            years: a.years,
            months: a.months,
            payout_frequency: a.frequency,
            compound_frequency: a.compounding,
            timing: a.timing,
        }),
        Command::Ira(a) => CalculatorRequest::Ira(IraInputs {
            current_balance: a.balance,
            annual_contribution: a.contribution,
            current_age: a.age,
            retirement_age: a.retirement_age,
            expected_return: a.rate,
            current_tax_rate: a.current_tax,
            retirement_tax_rate: a.retirement_tax,
            inflation_rate: a.inflation,
            account_type: if a.roth {
                IraAccountType::Roth
            } else {
                IraAccountType::Traditional
            },
            ..Default::default()
        }),
        Command::Payback(a) => {
            let cash_flows = match &a.flows_csv {
                Some(path) => load_cash_flows(path)
                    .with_context(|| format!("loading cash flows {}", path.display()))?,
                None => CashFlowSeries::Uneven(a.flows),
            };
            CalculatorRequest::Payback(PaybackInputs {
                initial_investment: a.investment,
                cash_flows,
                discount_rate: a.rate,
                frequency: a.frequency,
            })
        }
        Command::Budget(a) => CalculatorRequest::Budget(BudgetInputs {
            incomes: vec![IncomeItem {
                name: "Income".to_string(),
                amount: a.income,
                frequency: Frequency::Monthly,
            }],
            expenses: vec![
                monthly_expense("Needs", a.needs, BudgetCategory::Needs),
                monthly_expense("Wants", a.wants, BudgetCategory::Wants),
                monthly_expense("Savings", a.savings, BudgetCategory::Savings),
            ],
        }),
        Command::Margin(a) => CalculatorRequest::Margin(match (a.cost, a.revenue, a.margin) {
            (Some(cost), Some(revenue), None) => MarginInputs::CostAndRevenue { cost, revenue },
            (Some(cost), None, Some(margin)) => MarginInputs::CostAndMargin { cost, margin },
            (None, Some(revenue), Some(margin)) => MarginInputs::RevenueAndMargin { revenue, margin },
            _ => bail!("margin needs exactly two of --cost, --revenue and --margin"),
        }),
    };
    Ok(request)
}

/// Print scalar fields of the result, then the first schedule rows
fn print_summary(name: &str, outcome: &CalculatorOutcome, preview_rows: usize) -> Result<()> {
    let Some(result) = &outcome.result else {
        return Ok(());
    };

    println!("{name} results");
    println!("{}", "=".repeat(name.len() + 8));

    if let Value::Object(fields) = serde_json::to_value(result)? {
        for (key, value) in &fields {
            match value {
                Value::Number(n) => match n.as_f64() {
                    Some(x) if n.is_f64() => println!("  {key:<32} {x:>16.2}"),
                    _ => println!("  {key:<32} {n:>16}"),
                },
                Value::String(s) if key != "calculator" => println!("  {key:<32} {s:>16}"),
                Value::Null => println!("  {key:<32} {:>16}", "-"),
                _ => {}
            }
        }
    }

    if preview_rows > 0 {
        let mut buffer = Vec::new();
        let rows = write_schedule(&mut buffer, result)?;
        let text = String::from_utf8(buffer)?;
        println!();
        for line in text.lines().take(preview_rows + 1) {
            println!("  {line}");
        }
        if rows > preview_rows {
            println!("  ... ({} more rows)", rows - preview_rows);
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let settings = Settings::from_env();
    let json_output = cli.json || settings.json;
    let preview_rows = cli.preview.unwrap_or(settings.preview_rows);

    let request = build_request(cli.command)?;
    let outcome = request.evaluate();

    if json_output {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        for error in &outcome.errors {
            eprintln!("error: {error}");
        }
        print_summary(request.name(), &outcome, preview_rows)?;
    }

    if let (Some(path), Some(result)) = (&cli.csv, &outcome.result) {
        let path = settings.output_path(path);
        let rows = write_schedule_to_path(&path, result)
            .with_context(|| format!("writing {}", path.display()))?;
        if !json_output {
            println!("\nFull schedule ({rows} rows) written to: {}", path.display());
        }
    }

    if !outcome.is_valid() {
        bail!("{} request failed validation", request.name());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amortization_request(args: &[&str]) -> AmortizationInputs {
        let mut argv = vec!["fincalc", "amortization"];
        argv.extend_from_slice(args);
        let cli = Cli::try_parse_from(argv).unwrap();
        match build_request(cli.command).unwrap() {
            CalculatorRequest::Amortization(inputs) => inputs,
            other => panic!("unexpected request {}", other.name()),
        }
    }

    #[test]
    fn test_yearly_extra_fits_short_terms() {
        let short = amortization_request(&["--years", "0", "--months", "6", "--extra-yearly", "500"]);
        assert_eq!(short.extra_payments.yearly.map(|extra| extra.start_period), Some(6));
        assert!(CalculatorRequest::Amortization(short).validate().is_empty());

        let long = amortization_request(&["--extra-yearly", "500"]);
        assert_eq!(long.extra_payments.yearly.map(|extra| extra.start_period), Some(12));

        let explicit = amortization_request(&["--extra-yearly", "500", "--extra-yearly-start", "24"]);
        assert_eq!(explicit.extra_payments.yearly.map(|extra| extra.start_period), Some(24));
    }
}
