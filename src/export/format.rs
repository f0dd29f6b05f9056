use rust_decimal::Decimal;

/// Whole seconds as `HH:MM:SS`. Hours keep counting past 24.
pub fn format_duration(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

pub fn format_duration_ms(total_ms: u64) -> String {
    format_duration(total_ms / 1000)
}

/// Fraction of the table's seated time that belongs to one seat.
/// `None` when nobody at the table has been seated yet.
pub fn occupancy_share(seat_active_ms: u64, table_active_ms: u64) -> Option<f64> {
    if table_active_ms == 0 {
        return None;
    }
    Some(seat_active_ms as f64 / table_active_ms as f64)
}

/// Share as a one-decimal percentage, empty when undefined or zero.
pub fn format_share(share: Option<f64>) -> String {
    match share {
        Some(value) if value > 0.0 => format!("{:.1}%", value * 100.0),
        _ => String::new(),
    }
}

/// Buy-in totals without a trailing `.0` for whole amounts.
pub fn format_amount(amount: Decimal) -> String {
    let amount = amount.normalize();
    if amount.fract().is_zero() {
        amount.trunc().to_string()
    } else {
        format!("{:.2}", amount.round_dp(2))
    }
}
