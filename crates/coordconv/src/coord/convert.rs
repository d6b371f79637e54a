use crate::prelude::{println, *};
use coordconv_core::{Conversion, GridPrecision, Notation};

#[derive(Debug, clap::Args, Clone)]
pub struct ConvertOptions {
    /// Coordinate text (e.g., "40.446N 79.982W" or "18TWL8081740194")
    pub input: String,

    /// Notation of the input: dd, ddm, dms, mgrs, usng, utm, gars
    #[arg(short, long, env = "COORDCONV_FROM")]
    pub from: Notation,

    /// Notation to convert to
    #[arg(short, long, env = "COORDCONV_TO")]
    pub to: Notation,

    /// Format template for the output (default depends on --to)
    #[arg(long, env = "COORDCONV_TEMPLATE")]
    pub template: Option<String>,

    /// Grid precision for MGRS/USNG output: 1m, 10m, 100m, 1km, 10km, 100km or 0-5 digits
    #[arg(short, long, env = "COORDCONV_PRECISION", default_value = "1m")]
    pub precision: GridPrecision,

    /// Reject templates with dangling selectors or malformed numeric fields
    #[arg(long)]
    pub strict_template: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl ConvertOptions {
    pub fn core_options(&self) -> coordconv_core::ConvertOptions {
        coordconv_core::ConvertOptions {
            template: self.template.clone(),
            precision: self.precision,
            strict_template: self.strict_template,
        }
    }
}

pub fn run(options: ConvertOptions, global: crate::Global) -> Result<()> {
    let conversion = convert_data(&options.input, options.from, options.to, &options.core_options())?;

    if global.verbose {
        super::print_diagnostics(&options.input, &conversion);
    }

    if options.json {
        println!("{}", serde_json::to_string_pretty(&conversion)?);
    } else {
        println!("{}", conversion.text);
    }

    Ok(())
}

/// Runs a single conversion, attaching the input and notations to any failure.
pub fn convert_data(
    input: &str,
    from: Notation,
    to: Notation,
    options: &coordconv_core::ConvertOptions,
) -> Result<Conversion> {
    log::debug!("convert {from} -> {to}: {input:?}");

    coordconv_core::convert_with(input, from, to, options)
        .map_err(Error::from)
        .wrap_err_with(|| super::conversion_context(input, from, to))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Debug, clap::Parser)]
    struct Cli {
        #[command(flatten)]
        options: ConvertOptions,
    }

    fn parse(args: &[&str]) -> ConvertOptions {
        Cli::try_parse_from(std::iter::once("convert").chain(args.iter().copied()))
            .unwrap()
            .options
    }

    #[test]
    fn test_flags_map_to_core_options() {
        let options = parse(&[
            "0 0",
            "--from",
            "dd",
            "--to",
            "MGRS",
            "--precision",
            "100m",
            "--template",
            "ZS X000",
            "--strict-template",
        ]);
        assert_eq!(options.from, Notation::Dd);
        assert_eq!(options.to, Notation::Mgrs);

        let core = options.core_options();
        assert_eq!(core.precision, GridPrecision::HundredMetre);
        assert_eq!(core.template.as_deref(), Some("ZS X000"));
        assert!(core.strict_template);
    }

    #[test]
    fn test_precision_defaults_to_one_metre() {
        let options = parse(&["0 0", "-f", "dd", "-t", "usng"]);
        assert_eq!(options.precision, GridPrecision::Metre);
        assert_eq!(options.template, None);
    }

    #[test]
    fn test_unknown_notation_is_rejected() {
        let result = Cli::try_parse_from(["convert", "0 0", "--from", "wgs", "--to", "dd"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_convert_data() {
        let options = parse(&["0 0", "--from", "dd", "--to", "usng"]);
        let conversion = convert_data(
            &options.input,
            options.from,
            options.to,
            &options.core_options(),
        )
        .unwrap();
        assert_eq!(conversion.text, "31N AA 66021 00000");
    }

    #[test]
    fn test_convert_data_error_has_context() {
        let error = convert_data(
            "91N 10E",
            Notation::Dd,
            Notation::Utm,
            &coordconv_core::ConvertOptions::default(),
        )
        .unwrap_err();
        let message = format!("{error:#}");
        assert!(message.contains("Failed to convert '91N 10E' from DD to UTM"));
        assert!(message.contains("latitude out of range"));
    }
}
