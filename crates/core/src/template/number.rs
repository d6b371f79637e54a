//! Custom numeric format runs made of `0`, `#` and `.`.
//!
//! `0` is a required digit, `#` an optional digit and `.` the decimal point.
//! The leftmost `0` before the point sets the minimum number of integer
//! digits, the rightmost `0` after it the minimum number of fraction digits,
//! and the total number of fraction placeholders the rounding precision.
//! Rounding is half away from zero.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberFormat {
    integer_min: usize,
    fraction_min: usize,
    fraction_max: usize,
    points: usize,
}

impl NumberFormat {
    pub fn parse(run: &str) -> Self {
        let (integer, fraction) = match run.find('.') {
            Some(idx) => (&run[..idx], &run[idx + 1..]),
            None => (run, ""),
        };
        // Extra points inside the fraction carry no meaning of their own.
        let fraction: String = fraction.chars().filter(|c| *c != '.').collect();

        let integer_min = integer
            .find('0')
            .map(|first| integer.len() - first)
            .unwrap_or(0);
        let fraction_min = fraction.rfind('0').map(|last| last + 1).unwrap_or(0);

        NumberFormat {
            integer_min,
            fraction_min,
            fraction_max: fraction.len(),
            points: run.matches('.').count(),
        }
    }

    /// Number of decimal points in the source run.
    pub fn points(&self) -> usize {
        self.points
    }

    /// Fraction digits the run rounds to.
    pub fn fraction_digits(&self) -> usize {
        self.fraction_max
    }

    /// The magnitude of `value` as this run will print it.
    pub fn rounded(&self, value: f64) -> f64 {
        round_half_away(value.abs(), self.fraction_max)
    }

    pub fn format(&self, value: f64) -> String {
        let rounded = self.rounded(value);
        let text = format!("{:.*}", self.fraction_max, rounded);

        let (integer, fraction) = match text.split_once('.') {
            Some((i, f)) => (i, f),
            None => (text.as_str(), ""),
        };

        let mut fraction = fraction.to_string();
        while fraction.len() > self.fraction_min && fraction.ends_with('0') {
            fraction.pop();
        }

        let integer = if integer == "0" && self.integer_min == 0 {
            String::new()
        } else if integer.len() < self.integer_min {
            format!("{}{}", "0".repeat(self.integer_min - integer.len()), integer)
        } else {
            integer.to_string()
        };

        let mut out = String::new();
        if value < 0.0 && rounded != 0.0 {
            out.push('-');
        }
        out.push_str(&integer);
        if !fraction.is_empty() {
            out.push('.');
            out.push_str(&fraction);
        }
        out
    }
}

fn round_half_away(value: f64, digits: usize) -> f64 {
    if digits > 15 {
        return value;
    }
    let scale = 10f64.powi(digits as i32);
    let scaled = (value * scale).round() / scale;
    if scaled.is_finite() {
        scaled
    } else {
        value
    }
}
