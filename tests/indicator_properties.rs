mod fixtures;

use approx::assert_abs_diff_eq;
use fixtures::{assert_within, closes, sample_candles, sample_prices, wave_candles};
use indicator_engine::indicators::momentum::{
    calculate_cci, calculate_macd, calculate_mfi, calculate_rsi, calculate_stochastic, calculate_williams_r,
};
use indicator_engine::indicators::support_resistance::{calculate_fibonacci, calculate_support_resistance};
use indicator_engine::indicators::trend::{
    calculate_adx, calculate_ema, calculate_parabolic_sar, calculate_sma, calculate_vwap,
};
use indicator_engine::indicators::volatility::{calculate_atr, calculate_bollinger_bands};
use indicator_engine::indicators::volume::calculate_obv;
use indicator_engine::{CandleData, IndicatorError};

#[test]
fn windowed_lengths_follow_lookback() {
    let data = CandleData::from_candles(&wave_candles(60));
    let n = data.len();

    for period in [1, 5, 14, 20] {
        assert_eq!(calculate_sma(&data.close, period).unwrap().len(), n - period + 1);
        assert_eq!(calculate_ema(&data.close, period).unwrap().len(), n - period + 1);
        assert_eq!(
            calculate_williams_r(&data.high, &data.low, &data.close, period).unwrap().len(),
            n - period + 1
        );
        assert_eq!(
            calculate_cci(&data.high, &data.low, &data.close, period).unwrap().len(),
            n - period + 1
        );
        assert_eq!(calculate_rsi(&data.close, period).unwrap().len(), n - period);
        assert_eq!(calculate_atr(&data.high, &data.low, &data.close, period).unwrap().len(), n - period);
    }
}

#[test]
fn full_length_indicators() {
    let candles = sample_candles();
    let data = CandleData::from_candles(&candles);

    assert_eq!(calculate_vwap(&candles).unwrap().len(), candles.len());
    assert_eq!(calculate_obv(&data.close, &data.volume).unwrap().len(), candles.len());
    assert_eq!(
        calculate_parabolic_sar(&data.high, &data.low, 0.02, 0.2).unwrap().len(),
        candles.len()
    );
}

#[test]
fn oscillators_stay_in_range() {
    let data = CandleData::from_candles(&wave_candles(120));

    assert_within(&calculate_rsi(&data.close, 14).unwrap().values, 0.0, 100.0, "RSI");
    assert_within(
        &calculate_williams_r(&data.high, &data.low, &data.close, 14).unwrap().values,
        -100.0,
        0.0,
        "Williams %R",
    );
    assert_within(
        &calculate_mfi(&data.high, &data.low, &data.close, &data.volume, 14).unwrap().values,
        0.0,
        100.0,
        "MFI",
    );

    let stochastic = calculate_stochastic(&data.high, &data.low, &data.close, 14, 3).unwrap();
    assert_within(&stochastic.k_percent, 0.0, 100.0, "%K");
    assert_within(&stochastic.d_percent, 0.0, 100.0, "%D");

    let adx = calculate_adx(&data.high, &data.low, &data.close, 14).unwrap();
    assert_within(&adx.adx, 0.0, 100.0, "ADX");
    assert_within(&adx.plus_di, 0.0, 100.0, "+DI");
    assert_within(&adx.minus_di, 0.0, 100.0, "-DI");
}

#[test]
fn bollinger_bands_are_ordered() {
    let bands = calculate_bollinger_bands(&sample_prices(), 5, 2.0).unwrap();

    assert_eq!(bands.offset, 4);
    for i in 0..bands.middle_band.len() {
        assert!(bands.upper_band[i] >= bands.middle_band[i]);
        assert!(bands.middle_band[i] >= bands.lower_band[i]);
    }
}

#[test]
fn macd_histogram_is_line_minus_signal() {
    let prices = closes(&wave_candles(80));
    let macd = calculate_macd(&prices, 12, 26, 9).unwrap();

    assert_eq!(macd.offset, 26 + 9 - 2);
    assert_eq!(macd.macd_line.len(), prices.len() - macd.offset);
    for i in 0..macd.histogram.len() {
        assert_abs_diff_eq!(macd.histogram[i], macd.macd_line[i] - macd.signal_line[i], epsilon = 1e-12);
    }
}

#[test]
fn ema_follows_recursion() {
    let prices = sample_prices();
    let ema = calculate_ema(&prices, 5).unwrap();
    let multiplier = 2.0 / 6.0;

    for i in 1..ema.len() {
        let expected = (prices[ema.input_index(i)] - ema.values[i - 1]) * multiplier + ema.values[i - 1];
        assert_abs_diff_eq!(ema.values[i], expected, epsilon = 1e-9);
    }
}

#[test]
fn sample_price_reference_values() {
    let sma = calculate_sma(&sample_prices(), 5).unwrap();
    assert_abs_diff_eq!(sma.values[0], 102.2, epsilon = 1e-12);

    let rising: Vec<f64> = (1..=30).map(f64::from).collect();
    assert!(calculate_rsi(&rising, 14).unwrap().values.iter().all(|&rsi| rsi == 100.0));

    let obv = calculate_obv(&[100.0, 102.0, 101.0], &[1000.0, 1200.0, 1100.0]).unwrap();
    assert_eq!(obv.values, vec![1000.0, 2200.0, 1100.0]);

    let fib = calculate_fibonacci(120.0, 100.0);
    assert_eq!(fib.level_0, 120.0);
    assert_eq!(fib.level_500, 110.0);
    assert_eq!(fib.level_100, 100.0);
}

#[test]
fn rising_sample_candles() {
    let candles = sample_candles();
    let data = CandleData::from_candles(&candles);

    // Every true range is 3 on this data
    let atr = calculate_atr(&data.high, &data.low, &data.close, 14).unwrap();
    assert_eq!(atr.values.len(), 1);
    assert_abs_diff_eq!(atr.values[0], 3.0, epsilon = 1e-12);

    // Typical price never falls, so the money ratio falls back to 100
    let mfi = calculate_mfi(&data.high, &data.low, &data.close, &data.volume, 14).unwrap();
    assert_abs_diff_eq!(mfi.values[0], 100.0 - 100.0 / 101.0, epsilon = 1e-9);

    let obv = calculate_obv(&data.close, &data.volume).unwrap();
    assert_eq!(obv.last(), Some(23_000.0));

    let adx = calculate_adx(&data.high, &data.low, &data.close, 5).unwrap();
    assert!(adx.minus_di.iter().all(|&di| di == 0.0));
    assert!(adx.plus_di.iter().all(|&di| di > 0.0));
    for value in &adx.adx {
        assert_abs_diff_eq!(*value, 100.0, epsilon = 1e-9);
    }

    let sar = calculate_parabolic_sar(&data.high, &data.low, 0.02, 0.2).unwrap();
    for (i, value) in sar.values.iter().enumerate() {
        assert!(*value <= data.low[i], "SAR above the low at bar {i}");
    }
}

#[test]
fn insufficient_history_is_explicit() {
    let short = [100.0, 102.0];

    for result in [calculate_sma(&short, 5), calculate_ema(&short, 5), calculate_rsi(&short, 14)] {
        assert!(matches!(result, Err(IndicatorError::InsufficientData { available: 2, .. })));
    }

    let data = CandleData::from_candles(&sample_candles());
    assert!(matches!(
        calculate_stochastic(&data.high, &data.low, &data.close, 14, 3),
        Err(IndicatorError::InsufficientData { required: 16, available: 15, .. })
    ));
    assert!(matches!(
        calculate_cci(&data.high, &data.low, &data.close, 20),
        Err(IndicatorError::InsufficientData { required: 20, .. })
    ));
}

#[test]
fn values_align_with_candles() {
    let candles = wave_candles(40);
    let sma = calculate_sma(&closes(&candles), 10).unwrap();

    let paired: Vec<_> = sma.zip_inputs(&candles).collect();
    assert_eq!(paired.len(), sma.len());

    let (first_candle, first_value) = paired[0];
    let window: f64 = candles[..10].iter().map(|c| c.close).sum::<f64>() / 10.0;
    assert_eq!(first_candle, &candles[9]);
    assert_abs_diff_eq!(first_value, window, epsilon = 1e-9);
}

#[test]
fn obv_moves_with_close() {
    let data = CandleData::from_candles(&wave_candles(50));
    let obv = calculate_obv(&data.close, &data.volume).unwrap();

    for i in 1..obv.len() {
        let step = obv.values[i] - obv.values[i - 1];
        let change = data.close[i] - data.close[i - 1];
        if change == 0.0 {
            assert_eq!(step, 0.0);
        } else {
            assert_eq!(step.signum(), change.signum(), "bar {i}");
        }
    }
}

#[test]
fn oversized_periods_are_invalid() {
    let data = CandleData::from_candles(&sample_candles());
    let huge = usize::MAX / 2 + 1;

    let results = [
        calculate_rsi(&data.close, usize::MAX).map(|_| ()),
        calculate_macd(&data.close, 1, usize::MAX, 2).map(|_| ()),
        calculate_stochastic(&data.high, &data.low, &data.close, usize::MAX, 3).map(|_| ()),
        calculate_mfi(&data.high, &data.low, &data.close, &data.volume, usize::MAX).map(|_| ()),
        calculate_atr(&data.high, &data.low, &data.close, usize::MAX).map(|_| ()),
        calculate_adx(&data.high, &data.low, &data.close, huge).map(|_| ()),
        calculate_support_resistance(&data.high, &data.low, huge).map(|_| ()),
    ];

    for result in results {
        assert!(
            matches!(result, Err(IndicatorError::InvalidParameter { .. })),
            "unexpected result: {result:?}"
        );
    }
}
