//! Price calculation in integer cents.

/// Court booking price: hourly rate prorated by minutes, rounded half-up.
pub fn court_booking_price(price_per_hour_cents: i64, minutes: i64) -> i64 {
    prorate(price_per_hour_cents, minutes, 60)
}

/// Package stay price. The package price covers `duration_nights`; longer or
/// shorter stays are prorated per night, rounded half-up.
pub fn package_stay_price(price_cents: i64, duration_nights: i32, nights: i64) -> i64 {
    if duration_nights <= 0 {
        return price_cents;
    }
    prorate(price_cents, nights, duration_nights as i64)
}

fn prorate(amount: i64, units: i64, per: i64) -> i64 {
    let numerator = amount.saturating_mul(units);
    numerator.saturating_add(per / 2) / per
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_court_price_whole_hours() {
        assert_eq!(court_booking_price(4000, 60), 4000);
        assert_eq!(court_booking_price(4000, 120), 8000);
        assert_eq!(court_booking_price(4000, 90), 6000);
    }

    #[test]
    fn test_court_price_rounds_half_up() {
        // 1001 * 30 / 60 = 500.5
        assert_eq!(court_booking_price(1001, 30), 501);
        // 1000 * 20 / 60 = 333.33
        assert_eq!(court_booking_price(1000, 20), 333);
        assert_eq!(court_booking_price(0, 90), 0);
    }

    #[test]
    fn test_package_price() {
        assert_eq!(package_stay_price(30000, 3, 3), 30000);
        assert_eq!(package_stay_price(30000, 3, 4), 40000);
        assert_eq!(package_stay_price(10000, 3, 1), 3333);
        assert_eq!(package_stay_price(10000, 0, 5), 10000);
    }
}
