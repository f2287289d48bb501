use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = Decimal;

/// Identifier for a registered user. Generated by the directory; never reused.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier for a loan record. Generated by the directory; never reused.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct LoanId(pub u64);

impl fmt::Display for LoanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How often payments fall due. Frequency changes the periodic rate divisor
/// only; a schedule always has one entry per month of the term.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentFrequency {
    Daily,
    Biweekly,
    Weekly,
    Semimonthly,
    #[default]
    Monthly,
    Quarterly,
    Semiyearly,
    Yearly,
}

impl PaymentFrequency {
    /// Payment periods per year.
    pub fn periods_per_year(&self) -> u32 {
        match self {
            PaymentFrequency::Daily => 365,
            PaymentFrequency::Biweekly => 104,
            PaymentFrequency::Weekly => 52,
            PaymentFrequency::Semimonthly => 24,
            PaymentFrequency::Monthly => 12,
            PaymentFrequency::Quarterly => 4,
            PaymentFrequency::Semiyearly => 2,
            PaymentFrequency::Yearly => 1,
        }
    }
}

/// Attributes for registering a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    /// Must be unique across the directory.
    pub email: String,
    /// Display attribute; inactive users keep their loans and grants.
    pub is_active: bool,
}

/// A registered user. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub is_active: bool,
}

/// Contract terms, fixed at origination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanTerms {
    /// Amount borrowed. Must be positive.
    pub principal: Money,
    /// Annual interest rate as a decimal (0.06 = 6%). Zero is a valid rate.
    pub annual_rate: Rate,
    /// Term length in months. Must be at least 1.
    pub term_months: u32,
    /// Payment frequency; monthly when omitted.
    #[serde(default)]
    pub frequency: PaymentFrequency,
}

/// A loan record. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    pub id: LoanId,
    /// Exactly one owner; sharing never transfers ownership.
    pub owner: UserId,
    pub terms: LoanTerms,
    pub originated_on: NaiveDate,
}

/// One row of an amortization schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// Month index, starting at 1.
    pub month: u32,
    /// Payment due this month. Equals the level payment except in the final
    /// month, which absorbs the accumulated rounding residual.
    pub payment: Money,
    /// Interest portion of the payment.
    pub interest: Money,
    /// Principal portion of the payment.
    pub principal: Money,
    /// Balance outstanding after this payment.
    pub remaining_balance: Money,
}

/// Point-in-time view of a schedule. Derived on demand, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthSummary {
    pub month: u32,
    /// Interest paid in months 1 through `month`.
    pub cumulative_interest: Money,
    /// Principal repaid in months 1 through `month`.
    pub cumulative_principal: Money,
    /// Balance outstanding after the target month's payment.
    pub remaining_balance: Money,
    /// The target month's schedule row.
    pub entry: ScheduleEntry,
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
