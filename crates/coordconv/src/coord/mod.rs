pub mod batch;
pub mod convert;
pub mod fields;

use crate::prelude::eprintln;
use colored::Colorize;
use coordconv_core::{Conversion, Notation};

/// Echo what a conversion did, for `--verbose`.
pub fn print_diagnostics(input: &str, conversion: &Conversion) {
    eprintln!(
        "{} {} {} {}: {}",
        "Converting".green(),
        conversion.from.to_string().cyan(),
        "->".bright_black(),
        conversion.to.to_string().cyan(),
        input
    );
    eprintln!(
        "{}: {}",
        "Canonical".green(),
        conversion.coordinate.to_string().bright_white()
    );
}

/// Context attached to every failed conversion.
pub fn conversion_context(input: &str, from: Notation, to: Notation) -> String {
    format!("Failed to convert '{input}' from {from} to {to}")
}
