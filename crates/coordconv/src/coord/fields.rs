use crate::prelude::{eprintln, println, *};
use coordconv_core::convert::{fields, from_canonical, parse, to_canonical};
use coordconv_core::{Coordinate, GridPrecision, NamedField, Notation};
use serde::Serialize;

#[derive(Debug, clap::Args, Clone)]
pub struct FieldsOptions {
    /// Coordinate text
    pub input: String,

    /// Notation of the input
    #[arg(short, long, env = "COORDCONV_FROM")]
    pub from: Notation,

    /// Show the fields of the coordinate converted to this notation instead
    #[arg(short, long)]
    pub to: Option<Notation>,

    /// Grid precision when converting to MGRS/USNG
    #[arg(short, long, env = "COORDCONV_PRECISION", default_value = "1m")]
    pub precision: GridPrecision,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
pub struct FieldsOutput {
    pub notation: Notation,
    pub coordinate: Coordinate,
    pub fields: Vec<NamedField>,
}

pub fn run(options: FieldsOptions, global: crate::Global) -> Result<()> {
    let output = fields_data(&options.input, options.from, options.to, options.precision)?;

    if global.verbose {
        eprintln!("Canonical: {}", output.coordinate);
    }

    if options.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        let mut table = new_table();
        for field in &output.fields {
            table.add_row(prettytable::row![field.name, field.value]);
        }
        table.printstd();
    }

    Ok(())
}

/// Fields of `input`, or of its conversion when `to` is given.
pub fn fields_data(
    input: &str,
    from: Notation,
    to: Option<Notation>,
    precision: GridPrecision,
) -> Result<FieldsOutput> {
    let target = to.unwrap_or(from);
    log::debug!("fields {from} -> {target}: {input:?}");

    let resolve = || -> std::result::Result<FieldsOutput, coordconv_core::ConversionError> {
        let mut value = parse(input, from)?;
        let coordinate = to_canonical(&value)?;
        if to.is_some() {
            value = from_canonical(coordinate, target, precision)?;
        }
        Ok(FieldsOutput {
            notation: target,
            coordinate,
            fields: fields(&value),
        })
    };

    resolve()
        .map_err(Error::from)
        .wrap_err_with(|| super::conversion_context(input, from, target))
}
