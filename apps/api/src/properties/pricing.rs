/// Price per square foot rounded to two decimals; zero when the area is zero.
pub fn price_per_sqft(price: f64, plot_area: f64) -> f64 {
    if plot_area == 0.0 {
        return 0.0;
    }
    round2(price / plot_area)
}

/// Approximate registration amount: `price × charges% / 100`, zero for a zero price.
pub fn registration_amount(price: f64, registration_charges: f64) -> f64 {
    if price == 0.0 {
        return 0.0;
    }
    price * registration_charges / 100.0
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_area_is_zero() {
        assert_eq!(price_per_sqft(4_500_000.0, 0.0), 0.0);
    }

    #[test]
    fn test_rounds_to_two_decimals() {
        assert_eq!(price_per_sqft(1_000_000.0, 3.0), 333333.33);
        assert_eq!(price_per_sqft(4_500_000.0, 1200.0), 3750.0);
        assert_eq!(price_per_sqft(10.0, 6.0), 1.67);
    }

    #[test]
    fn test_positive_areas_match_rounded_quotient() {
        for (price, area) in [(999.0, 7.0), (1.0, 0.3), (2_750_000.0, 1450.5)] {
            let expected = ((price / area) * 100.0_f64).round() / 100.0;
            assert_eq!(price_per_sqft(price, area), expected);
        }
    }

    #[test]
    fn test_registration_amount() {
        assert_eq!(registration_amount(4_500_000.0, 7.0), 315_000.0);
        assert_eq!(registration_amount(0.0, 7.0), 0.0);
        assert_eq!(registration_amount(1_000_000.0, 0.0), 0.0);
    }
}
