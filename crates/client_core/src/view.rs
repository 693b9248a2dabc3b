//! Read-only projections of `LifecycleState` for whatever renders it.

use crate::controller::LifecycleState;

#[derive(Debug, Clone, PartialEq)]
pub enum ResultView {
    Error(String),
    Empty,
    Predicted { price: f64, display: String },
}

impl ResultView {
    pub fn from_state(state: &LifecycleState) -> Self {
        if let Some(message) = state.error_message() {
            return ResultView::Error(message.to_string());
        }
        match state.prediction() {
            Some(prediction) => ResultView::Predicted {
                price: prediction.predicted_price,
                display: format_usd(prediction.predicted_price),
            },
            None => ResultView::Empty,
        }
    }
}

pub fn submit_label(in_flight: bool) -> &'static str {
    if in_flight {
        "Predicting..."
    } else {
        "Predict Price"
    }
}

/// en-US currency rendering with at most two fraction digits, trailing zeros
/// dropped: `250000.0` -> `$250,000`, `1234.5` -> `$1,234.5`.
pub fn format_usd(amount: f64) -> String {
    let scaled = (amount.abs() * 100.0).round();
    if !scaled.is_finite() || scaled >= u128::MAX as f64 {
        return format!("${amount}");
    }

    let cents = scaled as u128;
    let whole = cents / 100;
    let fraction = cents % 100;
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };

    let fraction = match fraction {
        0 => String::new(),
        f if f % 10 == 0 => format!(".{}", f / 10),
        f => format!(".{f:02}"),
    };
    format!("{sign}${}{fraction}", group_thousands(whole))
}

fn group_thousands(value: u128) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_whole_dollars_with_grouping() {
        assert_eq!(format_usd(250000.0), "$250,000");
        assert_eq!(format_usd(0.0), "$0");
        assert_eq!(format_usd(999.0), "$999");
        assert_eq!(format_usd(1000.0), "$1,000");
        assert_eq!(format_usd(1234567.0), "$1,234,567");
    }

    #[test]
    fn keeps_up_to_two_fraction_digits() {
        assert_eq!(format_usd(1234.5), "$1,234.5");
        assert_eq!(format_usd(206855.82), "$206,855.82");
        assert_eq!(format_usd(99.99), "$99.99");
        assert_eq!(format_usd(-1500.25), "-$1,500.25");
    }

    #[test]
    fn out_of_range_amounts_fall_back_to_plain_rendering() {
        assert_eq!(format_usd(1e40), format!("${}", 1e40));
        assert_eq!(format_usd(f64::INFINITY), "$inf");
    }

    #[test]
    fn submit_label_tracks_in_flight() {
        assert_eq!(submit_label(true), "Predicting...");
        assert_eq!(submit_label(false), "Predict Price");
    }

    #[test]
    fn empty_state_renders_prompt() {
        assert_eq!(
            ResultView::from_state(&LifecycleState::default()),
            ResultView::Empty
        );
    }
}
