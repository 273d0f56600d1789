//! Date-driven pricing scenarios through the public facade.

use approx::assert_abs_diff_eq;
use chrono::{Days, NaiveDate};
use eqlattice::instruments::{ExerciseStyle, OptionType};
use eqlattice::methods::DividendTreatment;
use eqlattice::{binomial_greeks, binomial_price, BinomialConfig, BinomialRequest};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
}

fn day(offset: u64) -> NaiveDate {
    today().checked_add_days(Days::new(offset)).unwrap()
}

/// Spot 100, σ 50%, 90 days, 5% flat, a 20.0 dividend on day 20.
fn ninety_day_call(
    strike: f64,
    exercise: ExerciseStyle,
    treatment: DividendTreatment,
    smoothing: bool,
) -> BinomialRequest {
    BinomialRequest {
        exercise,
        option_type: OptionType::Call,
        spot: 100.0,
        strike,
        vol: 0.5,
        today: today(),
        expiry: day(90),
        zero_dates: vec![day(0), day(90)],
        zero_rates: vec![0.05, 0.05],
        dividend_dates: vec![day(20)],
        dividend_amounts: vec![20.0],
        config: BinomialConfig::default()
            .with_grid_steps(120)
            .with_treatment(treatment)
            .with_smoothing(smoothing),
    }
}

#[test]
fn proportional_smoothed_american_calls() {
    let price = |k| {
        binomial_price(&ninety_day_call(
            k,
            ExerciseStyle::American,
            DividendTreatment::Proportional,
            true,
        ))
        .unwrap()
    };
    assert_abs_diff_eq!(price(50.0), 50.133_383_4, epsilon = 1e-6);
    assert_abs_diff_eq!(price(100.0), 5.259_306_5, epsilon = 1e-6);
    assert_abs_diff_eq!(price(150.0), 0.055_679_8, epsilon = 1e-6);
}

#[test]
fn additive_dividend_calls() {
    let price = |k, exercise, smoothing| {
        binomial_price(&ninety_day_call(k, exercise, DividendTreatment::Additive, smoothing))
            .unwrap()
    };
    assert_abs_diff_eq!(price(150.0, ExerciseStyle::American, false), 0.055_303_3, epsilon = 1e-6);
    assert_abs_diff_eq!(price(150.0, ExerciseStyle::American, true), 0.055_521_9, epsilon = 1e-6);
    assert_abs_diff_eq!(price(100.0, ExerciseStyle::European, false), 2.426_070_3, epsilon = 1e-6);
    assert_abs_diff_eq!(price(100.0, ExerciseStyle::American, true), 4.344_996_3, epsilon = 1e-6);
}

#[test]
fn early_exercise_premium_before_a_large_dividend() {
    let am = binomial_price(&ninety_day_call(
        100.0,
        ExerciseStyle::American,
        DividendTreatment::Proportional,
        true,
    ))
    .unwrap();
    let eu = binomial_price(&ninety_day_call(
        100.0,
        ExerciseStyle::European,
        DividendTreatment::Proportional,
        true,
    ))
    .unwrap();
    assert_abs_diff_eq!(eu, 2.434_109_914_123_68, epsilon = 1e-8);
    assert!(am > eu + 2.0);
}

/// One year, pillars on day 73 and day 365, 5.0 dividends on days 0, 182,
/// 365 and 438 (only the middle two are inside the option's life).
fn one_year(option_type: OptionType) -> BinomialRequest {
    BinomialRequest {
        exercise: ExerciseStyle::American,
        option_type,
        spot: 100.0,
        strike: 100.0,
        vol: 0.5,
        today: today(),
        expiry: day(365),
        zero_dates: vec![day(73), day(365)],
        zero_rates: vec![0.05, 0.05],
        dividend_dates: vec![day(0), day(182), day(365), day(438)],
        dividend_amounts: vec![5.0; 4],
        config: BinomialConfig::default()
            .with_grid_steps(120)
            .with_treatment(DividendTreatment::Proportional)
            .with_smoothing(false),
    }
}

#[test]
fn one_year_american_prices() {
    assert_abs_diff_eq!(binomial_price(&one_year(OptionType::Call)).unwrap(), 19.195_92, epsilon = 1e-5);
    assert_abs_diff_eq!(binomial_price(&one_year(OptionType::Put)).unwrap(), 20.794_27, epsilon = 1e-5);
}

#[test]
fn one_year_american_greeks() {
    let call = binomial_greeks(&one_year(OptionType::Call)).unwrap();
    assert_abs_diff_eq!(call.delta, 0.595_914_872_908_666_3, epsilon = 1e-6);
    assert_abs_diff_eq!(call.gamma, 0.008_296_891_524_957_871, epsilon = 1e-6);
    assert_abs_diff_eq!(call.vega, 0.366_132_965_630_747_26, epsilon = 1e-7);
    assert_abs_diff_eq!(call.theta, -0.029_972_357_914_100_91, epsilon = 1e-7);

    let put = binomial_greeks(&one_year(OptionType::Put)).unwrap().to_array();
    assert_abs_diff_eq!(put[0], -0.399_417_612_188_487_6, epsilon = 1e-6);
    assert_abs_diff_eq!(put[1], 0.007_149_124_258_878_46, epsilon = 1e-6);
    assert_abs_diff_eq!(put[2], 0.353_111_077_170_403_6, epsilon = 1e-7);
    assert_abs_diff_eq!(put[3], -0.015_503_813_421_815_948, epsilon = 1e-7);
}

#[test]
fn zero_grid_steps_select_the_default() {
    let mut req = ninety_day_call(100.0, ExerciseStyle::American, DividendTreatment::Additive, true);
    let twenty = binomial_price(&BinomialRequest {
        config: req.config.with_grid_steps(20),
        ..req.clone()
    })
    .unwrap();
    req.config = req.config.with_grid_steps(0);
    assert_eq!(binomial_price(&req).unwrap(), twenty);
}

#[test]
fn bad_inputs_are_rejected() {
    let mut req = ninety_day_call(100.0, ExerciseStyle::American, DividendTreatment::Additive, true);
    req.zero_rates.pop();
    assert!(binomial_price(&req).is_err());

    let mut req = ninety_day_call(100.0, ExerciseStyle::American, DividendTreatment::Additive, true);
    req.spot = -1.0;
    assert!(binomial_price(&req).is_err());

    let mut req = ninety_day_call(100.0, ExerciseStyle::American, DividendTreatment::Additive, true);
    req.strike = 0.0;
    assert!(binomial_price(&req).is_err());

    let mut req = ninety_day_call(100.0, ExerciseStyle::American, DividendTreatment::Additive, true);
    req.dividend_amounts = vec![150.0];
    assert!(matches!(
        binomial_price(&req),
        Err(eqlattice::Error::InvalidLatticeInput(_))
    ));
}
