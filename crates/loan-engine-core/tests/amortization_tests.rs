use loan_engine_core::schedule::{compute_schedule, level_payment};
use loan_engine_core::summary::derive_summary;
use loan_engine_core::{LoanEngineError, LoanTerms, PaymentFrequency};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Amortization tests — schedule shape and summary derivation
// ===========================================================================

fn monthly_terms(principal: Decimal, annual_rate: Decimal, term_months: u32) -> LoanTerms {
    LoanTerms {
        principal,
        annual_rate,
        term_months,
        frequency: PaymentFrequency::Monthly,
    }
}

#[test]
fn test_thirty_year_mortgage_structure() {
    // 300k at 6.5% over 360 months
    let terms = monthly_terms(dec!(300_000), dec!(0.065), 360);
    let schedule = compute_schedule(&terms).unwrap();

    assert_eq!(schedule.len(), 360);

    // Month 1 interest: 300k * 0.065 / 12 = 1625.00
    assert_eq!(schedule[0].interest, dec!(1625.00));

    // Every month but the last pays the level payment
    let payment = level_payment(&terms).unwrap();
    for entry in &schedule[..359] {
        assert_eq!(entry.payment, payment, "month {}", entry.month);
    }

    // The residual lands in the final month and the balance closes at zero
    let last = &schedule[359];
    assert_eq!(last.remaining_balance, Decimal::ZERO);
    assert_eq!(last.payment, last.interest + last.principal);

    // Principal portions telescope back to the principal exactly
    let repaid: Decimal = schedule.iter().map(|e| e.principal).sum();
    assert_eq!(repaid, dec!(300_000));

    // Months are numbered 1..=360 in order
    for (i, entry) in schedule.iter().enumerate() {
        assert_eq!(entry.month as usize, i + 1);
    }
}

#[test]
fn test_worked_example_summary_flow() {
    // 12k at 6% over 12 months, summarized at three points
    let schedule = compute_schedule(&monthly_terms(dec!(12000), dec!(0.06), 12)).unwrap();

    let first = derive_summary(&schedule, 1).unwrap();
    assert_eq!(first.cumulative_interest, dec!(60.00));
    assert_eq!(first.cumulative_principal, dec!(972.80));
    assert_eq!(first.remaining_balance, dec!(11027.20));
    assert_eq!(first.entry.payment, dec!(1032.80));

    let mid = derive_summary(&schedule, 6).unwrap();
    assert_eq!(mid.cumulative_interest, dec!(286.56));
    assert_eq!(mid.cumulative_principal, dec!(5910.24));
    assert_eq!(mid.remaining_balance, dec!(6089.76));

    let last = derive_summary(&schedule, 12).unwrap();
    assert_eq!(last.cumulative_interest, dec!(393.58));
    assert_eq!(last.cumulative_principal, dec!(12000));
    assert_eq!(last.remaining_balance, Decimal::ZERO);

    // Cumulative figures reconcile with the level payment stream:
    // eleven level payments plus the adjusted final payment
    let total_paid: Decimal = schedule.iter().map(|e| e.payment).sum();
    assert_eq!(
        total_paid,
        last.cumulative_interest + last.cumulative_principal
    );
    assert_eq!(total_paid, dec!(1032.80) * dec!(11) + dec!(1032.78));
}

#[test]
fn test_single_month_loan() {
    // One period wraps the whole loan: principal plus one month of interest
    let schedule = compute_schedule(&monthly_terms(dec!(150_000), dec!(0.10), 1)).unwrap();

    assert_eq!(schedule.len(), 1);
    assert_eq!(schedule[0].payment, dec!(151_250.00));
    assert_eq!(schedule[0].interest, dec!(1250.00));
    assert_eq!(schedule[0].principal, dec!(150_000));
    assert_eq!(schedule[0].remaining_balance, Decimal::ZERO);
}

#[test]
fn test_frequency_divisor_parity() {
    // The same nominal terms at different frequencies only change the
    // periodic rate, never the number of schedule entries
    let semimonthly = LoanTerms {
        principal: dec!(100_000),
        annual_rate: dec!(0.07),
        term_months: 12,
        frequency: PaymentFrequency::Semimonthly,
    };
    assert_eq!(level_payment(&semimonthly).unwrap(), dec!(8492.16));
    assert_eq!(compute_schedule(&semimonthly).unwrap().len(), 12);

    let yearly = LoanTerms {
        frequency: PaymentFrequency::Yearly,
        ..semimonthly.clone()
    };
    let schedule = compute_schedule(&yearly).unwrap();
    assert_eq!(schedule.len(), 12);
    // Yearly divisor leaves the full 7% on the opening balance
    assert_eq!(schedule[0].interest, dec!(7000.00));
}

#[test]
fn test_terms_deserialize_with_monthly_default() {
    let terms: LoanTerms = serde_json::from_str(
        r#"{"principal": "9500.50", "annual_rate": "0.045", "term_months": 24}"#,
    )
    .unwrap();

    assert_eq!(terms.principal, dec!(9500.50));
    assert_eq!(terms.annual_rate, dec!(0.045));
    assert_eq!(terms.term_months, 24);
    assert_eq!(terms.frequency, PaymentFrequency::Monthly);

    let schedule = compute_schedule(&terms).unwrap();
    assert_eq!(schedule.len(), 24);
}

#[test]
fn test_invalid_terms_rejected() {
    let err = compute_schedule(&monthly_terms(dec!(0), dec!(0.06), 12)).unwrap_err();
    match err {
        LoanEngineError::InvalidLoanTerms { field, .. } => assert_eq!(field, "principal"),
        other => panic!("Expected InvalidLoanTerms, got {:?}", other),
    }

    let err = derive_summary(
        &compute_schedule(&monthly_terms(dec!(1000), dec!(0.05), 6)).unwrap(),
        7,
    )
    .unwrap_err();
    assert_eq!(
        err,
        LoanEngineError::MonthOutOfRange {
            month: 7,
            term_months: 6
        }
    );
}
