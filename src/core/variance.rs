//! Variance classification - turns one shift's stock readings into the derived
//! figures stored on a fuel entry.
//!
//! Everything here is pure: no database access and no failure modes. Readings are
//! validated by the submission pipeline before they get here.

use crate::entities::Severity;

/// `|variance|` at or above this is classified [`Severity::High`].
pub const HIGH_VARIANCE_THRESHOLD: f64 = 50.0;

/// `|variance|` above this is classified [`Severity::Medium`].
pub const MEDIUM_VARIANCE_THRESHOLD: f64 = 15.0;

/// `|variance|` above this sets the fraud flag.
pub const FRAUD_VARIANCE_THRESHOLD: f64 = 100.0;

/// Raw readings for one shift, in litres and price per litre.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Readings {
    /// Tank stock at the start of the shift
    pub opening_stock: f64,
    /// Tank stock at the end of the shift
    pub closing_stock: f64,
    /// Litres sold during the shift
    pub sold_litres: f64,
    /// Selling price per litre
    pub price_per_litre: f64,
}

impl Readings {
    /// Builds readings from optional inputs, coercing missing or non-finite values to zero.
    #[must_use]
    pub fn from_optional(
        opening_stock: Option<f64>,
        closing_stock: Option<f64>,
        sold_litres: Option<f64>,
        price_per_litre: Option<f64>,
    ) -> Self {
        Self {
            opening_stock: coerce(opening_stock),
            closing_stock: coerce(closing_stock),
            sold_litres: coerce(sold_litres),
            price_per_litre: coerce(price_per_litre),
        }
    }
}

fn coerce(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// Derived figures for one set of readings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VarianceReport {
    /// `opening_stock - sold_litres`
    pub expected_closing_stock: f64,
    /// `closing_stock - expected_closing_stock`; negative means stock went missing
    pub variance: f64,
    /// `sold_litres * price_per_litre`
    pub revenue: f64,
    /// Classification of `|variance|`
    pub severity: Severity,
    /// `|variance|` exceeds [`FRAUD_VARIANCE_THRESHOLD`]
    pub fraud_flag: bool,
}

/// Classifies the magnitude of a variance.
///
/// Monotonic in `|variance|`: a larger absolute variance never yields a lower severity.
#[must_use]
pub fn classify_severity(variance: f64) -> Severity {
    let magnitude = variance.abs();
    if magnitude >= HIGH_VARIANCE_THRESHOLD {
        Severity::High
    } else if magnitude > MEDIUM_VARIANCE_THRESHOLD {
        Severity::Medium
    } else {
        Severity::Low
    }
}

/// Whether a variance is large enough to be treated as suspected fraud.
#[must_use]
pub fn is_fraud_suspected(variance: f64) -> bool {
    variance.abs() > FRAUD_VARIANCE_THRESHOLD
}

/// Computes expected closing stock, variance, revenue, severity and fraud flag.
#[must_use]
pub fn analyze(readings: &Readings) -> VarianceReport {
    let expected_closing_stock = readings.opening_stock - readings.sold_litres;
    let variance = readings.closing_stock - expected_closing_stock;
    let revenue = readings.sold_litres * readings.price_per_litre;

    VarianceReport {
        expected_closing_stock,
        variance,
        revenue,
        severity: classify_severity(variance),
        fraud_flag: is_fraud_suspected(variance),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;

    fn readings(opening: f64, closing: f64, sold: f64, price: f64) -> Readings {
        Readings {
            opening_stock: opening,
            closing_stock: closing,
            sold_litres: sold,
            price_per_litre: price,
        }
    }

    #[test]
    fn test_small_shortfall_is_low() {
        let report = analyze(&readings(1000.0, 940.0, 50.0, 2.5));
        assert_eq!(report.expected_closing_stock, 950.0);
        assert_eq!(report.variance, -10.0);
        assert_eq!(report.revenue, 125.0);
        assert_eq!(report.severity, Severity::Low);
        assert!(!report.fraud_flag);
    }

    #[test]
    fn test_fifty_litre_shortfall_is_high_without_fraud() {
        let report = analyze(&readings(1000.0, 900.0, 50.0, 0.0));
        assert_eq!(report.expected_closing_stock, 950.0);
        assert_eq!(report.variance, -50.0);
        assert_eq!(report.severity, Severity::High);
        assert!(!report.fraud_flag);
    }

    #[test]
    fn test_large_variance_sets_fraud_flag() {
        let report = analyze(&readings(1000.0, 830.0, 50.0, 1.0));
        assert_eq!(report.variance, -120.0);
        assert_eq!(report.severity, Severity::High);
        assert!(report.fraud_flag);

        // Surplus stock is just as suspicious as a shortfall
        let surplus = analyze(&readings(1000.0, 1070.0, 50.0, 1.0));
        assert_eq!(surplus.variance, 120.0);
        assert!(surplus.fraud_flag);
    }

    #[test]
    fn test_threshold_boundaries() {
        assert_eq!(classify_severity(15.0), Severity::Low);
        assert_eq!(classify_severity(-15.0), Severity::Low);
        assert_eq!(classify_severity(15.01), Severity::Medium);
        assert_eq!(classify_severity(49.99), Severity::Medium);
        assert_eq!(classify_severity(50.0), Severity::High);
        assert_eq!(classify_severity(-50.5), Severity::High);
        assert!(!is_fraud_suspected(100.0));
        assert!(is_fraud_suspected(-100.5));
    }

    #[test]
    fn test_severity_is_monotonic_in_magnitude() {
        let mut previous = Severity::Low;
        for step in 0..=400 {
            let magnitude = f64::from(step) * 0.5;
            let severity = classify_severity(magnitude);
            assert!(severity >= previous, "severity dropped at {magnitude}");
            assert_eq!(classify_severity(-magnitude), severity);
            previous = severity;
        }
        assert_eq!(previous, Severity::High);
    }

    #[test]
    fn test_identities_hold_for_varied_readings() {
        let cases = [
            (0.0, 0.0, 0.0, 0.0),
            (5000.0, 4200.5, 790.25, 3.1),
            (120.0, 10.0, 200.0, 2.0),
            (800.0, 900.0, 0.0, 1.75),
        ];
        for (opening, closing, sold, price) in cases {
            let report = analyze(&readings(opening, closing, sold, price));
            assert_eq!(report.variance, closing - (opening - sold));
            assert_eq!(report.revenue, sold * price);
            assert_eq!(report.severity, classify_severity(report.variance));
        }
    }

    #[test]
    fn test_missing_inputs_coerce_to_zero() {
        let readings = Readings::from_optional(Some(500.0), None, Some(f64::NAN), Some(2.0));
        assert_eq!(readings.closing_stock, 0.0);
        assert_eq!(readings.sold_litres, 0.0);

        let report = analyze(&readings);
        assert_eq!(report.expected_closing_stock, 500.0);
        assert_eq!(report.variance, -500.0);
        assert_eq!(report.revenue, 0.0);
        assert!(report.fraud_flag);
    }
}
