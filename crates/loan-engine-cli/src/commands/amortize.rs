use std::time::Instant;

use clap::Args;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use loan_engine_core::schedule::{compute_schedule, level_payment};
use loan_engine_core::summary::derive_summary;
use loan_engine_core::types::{with_metadata, LoanTerms, PaymentFrequency};

use crate::input;

/// Arguments for the level payment calculation
#[derive(Args)]
pub struct PaymentArgs {
    /// Amount borrowed
    #[arg(long, allow_hyphen_values = true)]
    pub principal: Option<Decimal>,

    /// Annual interest rate as a decimal (e.g. 0.06 for 6%)
    #[arg(long, alias = "rate", allow_hyphen_values = true)]
    pub annual_rate: Option<Decimal>,

    /// Term length in months
    #[arg(long)]
    pub term_months: Option<u32>,

    /// Payment frequency
    #[arg(long, default_value = "monthly", value_parser = parse_frequency)]
    pub frequency: PaymentFrequency,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the full amortization schedule
#[derive(Args)]
pub struct ScheduleArgs {
    /// Amount borrowed
    #[arg(long, allow_hyphen_values = true)]
    pub principal: Option<Decimal>,

    /// Annual interest rate as a decimal (e.g. 0.06 for 6%)
    #[arg(long, alias = "rate", allow_hyphen_values = true)]
    pub annual_rate: Option<Decimal>,

    /// Term length in months
    #[arg(long)]
    pub term_months: Option<u32>,

    /// Payment frequency
    #[arg(long, default_value = "monthly", value_parser = parse_frequency)]
    pub frequency: PaymentFrequency,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the month summary
#[derive(Args)]
pub struct SummaryArgs {
    /// Amount borrowed
    #[arg(long, allow_hyphen_values = true)]
    pub principal: Option<Decimal>,

    /// Annual interest rate as a decimal (e.g. 0.06 for 6%)
    #[arg(long, alias = "rate", allow_hyphen_values = true)]
    pub annual_rate: Option<Decimal>,

    /// Term length in months
    #[arg(long)]
    pub term_months: Option<u32>,

    /// Payment frequency
    #[arg(long, default_value = "monthly", value_parser = parse_frequency)]
    pub frequency: PaymentFrequency,

    /// Month to summarize, 1-based (comes from the JSON payload when --input
    /// or stdin is used)
    #[arg(long)]
    pub month: Option<u32>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Result of the payment command.
#[derive(Debug, Serialize)]
struct PaymentResult {
    level_payment: Decimal,
    total_paid: Decimal,
    total_interest: Decimal,
    periods_per_year: u32,
}

/// File/stdin payload for the summary command.
#[derive(Debug, Deserialize)]
struct SummaryRequest {
    #[serde(flatten)]
    terms: LoanTerms,
    month: u32,
}

pub fn run_payment(args: PaymentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let terms: LoanTerms = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        LoanTerms {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            annual_rate: args
                .annual_rate
                .ok_or("--annual-rate is required (or provide --input)")?,
            term_months: args
                .term_months
                .ok_or("--term-months is required (or provide --input)")?,
            frequency: args.frequency,
        }
    };

    let start = Instant::now();
    let warnings = terms_warnings(&terms);

    let payment = level_payment(&terms)?;
    let schedule = compute_schedule(&terms)?;
    let total_paid: Decimal = schedule.iter().map(|e| e.payment).sum();
    let total_interest: Decimal = schedule.iter().map(|e| e.interest).sum();

    let result = PaymentResult {
        level_payment: payment,
        total_paid,
        total_interest,
        periods_per_year: terms.frequency.periods_per_year(),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let output = with_metadata(
        "Level-payment amortization (annuity formula, half-even rounding)",
        &terms,
        warnings,
        elapsed,
        result,
    );
    Ok(serde_json::to_value(output)?)
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let terms: LoanTerms = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        LoanTerms {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            annual_rate: args
                .annual_rate
                .ok_or("--annual-rate is required (or provide --input)")?,
            term_months: args
                .term_months
                .ok_or("--term-months is required (or provide --input)")?,
            frequency: args.frequency,
        }
    };

    let start = Instant::now();
    let warnings = terms_warnings(&terms);

    let schedule = compute_schedule(&terms)?;

    let elapsed = start.elapsed().as_micros() as u64;
    let output = with_metadata(
        "Level-payment amortization schedule; the final payment absorbs the rounding residual",
        &terms,
        warnings,
        elapsed,
        schedule,
    );
    Ok(serde_json::to_value(output)?)
}

pub fn run_summary(args: SummaryArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request: SummaryRequest = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        SummaryRequest {
            terms: LoanTerms {
                principal: args
                    .principal
                    .ok_or("--principal is required (or provide --input)")?,
                annual_rate: args
                    .annual_rate
                    .ok_or("--annual-rate is required (or provide --input)")?,
                term_months: args
                    .term_months
                    .ok_or("--term-months is required (or provide --input)")?,
                frequency: args.frequency,
            },
            month: args.month.ok_or("--month is required (or provide --input)")?,
        }
    };

    let start = Instant::now();
    let warnings = terms_warnings(&request.terms);

    let schedule = compute_schedule(&request.terms)?;
    let summary = derive_summary(&schedule, request.month)?;

    let elapsed = start.elapsed().as_micros() as u64;
    let output = with_metadata(
        "Cumulative position derived from the amortization schedule",
        &request.terms,
        warnings,
        elapsed,
        summary,
    );
    Ok(serde_json::to_value(output)?)
}

fn terms_warnings(terms: &LoanTerms) -> Vec<String> {
    let mut warnings = Vec::new();
    if terms.annual_rate.is_zero() {
        warnings.push("Zero annual rate; payments are a straight division of principal".to_string());
    }
    warnings
}

fn parse_frequency(value: &str) -> Result<PaymentFrequency, String> {
    match value.to_ascii_lowercase().as_str() {
        "daily" => Ok(PaymentFrequency::Daily),
        "biweekly" => Ok(PaymentFrequency::Biweekly),
        "weekly" => Ok(PaymentFrequency::Weekly),
        "semimonthly" => Ok(PaymentFrequency::Semimonthly),
        "monthly" => Ok(PaymentFrequency::Monthly),
        "quarterly" => Ok(PaymentFrequency::Quarterly),
        "semiyearly" => Ok(PaymentFrequency::Semiyearly),
        "yearly" => Ok(PaymentFrequency::Yearly),
        other => Err(format!(
            "unknown frequency '{other}' (expected daily, biweekly, weekly, semimonthly, \
             monthly, quarterly, semiyearly, or yearly)"
        )),
    }
}
