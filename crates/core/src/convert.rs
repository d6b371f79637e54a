//! Conversion façade: parse in one notation, render in another.
//!
//! Every conversion goes through the canonical [`Coordinate`]:
//!
//! ```text
//! text ── parse(from) ──▶ NotationValue ── to_canonical ──▶ Coordinate
//!                                                              │
//! text ◀── render(template) ── NotationValue ◀── from_canonical(to)
//! ```

use log::trace;
use serde::Serialize;

use crate::coordinate::Coordinate;
use crate::error::{ConversionError, ParseError, TemplateError};
use crate::fields::NamedField;
use crate::mgrs::GridPrecision;
use crate::notation::Notation;
use crate::template::Template;
use crate::value::NotationValue;
use crate::{dd, ddm, dms, gars, mgrs, utm};

/// Parse `text` as a coordinate written in `notation`.
pub fn parse(text: &str, notation: Notation) -> Result<NotationValue, ParseError> {
    let value = match notation {
        Notation::Dd => NotationValue::Dd(dd::parse(text)?),
        Notation::Ddm => NotationValue::Ddm(ddm::parse(text)?),
        Notation::Dms => NotationValue::Dms(dms::parse(text)?),
        Notation::Mgrs => NotationValue::Mgrs(mgrs::parse(text, notation)?),
        Notation::Usng => NotationValue::Usng(mgrs::parse(text, notation)?),
        Notation::Utm => NotationValue::Utm(utm::parse(text)?),
        Notation::Gars => NotationValue::Gars(gars::parse(text)?),
    };
    Ok(value)
}

pub fn to_canonical(value: &NotationValue) -> Result<Coordinate, ConversionError> {
    let coordinate = match value {
        NotationValue::Dd(c) => *c,
        NotationValue::Ddm(v) => ddm::to_canonical(v)?,
        NotationValue::Dms(v) => dms::to_canonical(v)?,
        NotationValue::Mgrs(r) => mgrs::to_canonical(r, Notation::Mgrs)?,
        NotationValue::Usng(r) => mgrs::to_canonical(r, Notation::Usng)?,
        NotationValue::Utm(v) => utm::to_canonical(v)?,
        NotationValue::Gars(v) => gars::to_canonical(v)?,
    };
    Ok(coordinate)
}

/// Express a canonical coordinate in `notation`. `precision` only applies to
/// MGRS and USNG.
pub fn from_canonical(
    coordinate: Coordinate,
    notation: Notation,
    precision: GridPrecision,
) -> Result<NotationValue, ConversionError> {
    let value = match notation {
        Notation::Dd => NotationValue::Dd(coordinate),
        Notation::Ddm => NotationValue::Ddm(ddm::from_canonical(coordinate)),
        Notation::Dms => NotationValue::Dms(dms::from_canonical(coordinate)),
        Notation::Mgrs => {
            NotationValue::Mgrs(mgrs::from_canonical(coordinate, precision, notation)?)
        }
        Notation::Usng => {
            NotationValue::Usng(mgrs::from_canonical(coordinate, precision, notation)?)
        }
        Notation::Utm => NotationValue::Utm(utm::from_canonical(coordinate)?),
        Notation::Gars => NotationValue::Gars(gars::from_canonical(coordinate)),
    };
    Ok(value)
}

/// Render with a lenient template; a blank template means the value's default.
pub fn render(value: &NotationValue, template: &str) -> String {
    if template.trim().is_empty() {
        return value.render(&Template::compile(&value.default_template(), value.selectors()));
    }
    value.render(&Template::compile(template, value.selectors()))
}

pub fn render_strict(value: &NotationValue, template: &str) -> Result<String, TemplateError> {
    if template.trim().is_empty() {
        return Ok(render(value, template));
    }
    Ok(value.render(&Template::compile_strict(template, value.selectors())?))
}

/// Named fields of a value, in display order.
pub fn fields(value: &NotationValue) -> Vec<NamedField> {
    match value {
        NotationValue::Dd(c) => dd::fields(c),
        NotationValue::Ddm(v) => ddm::fields(v),
        NotationValue::Dms(v) => dms::fields(v),
        NotationValue::Mgrs(r) | NotationValue::Usng(r) => mgrs::fields(r),
        NotationValue::Utm(v) => utm::fields(v),
        NotationValue::Gars(v) => gars::fields(v),
    }
}

/// Convert `input` from one notation to another. Grid output uses 1 m
/// precision.
pub fn convert(
    input: &str,
    from: Notation,
    to: Notation,
    template: &str,
) -> Result<String, ConversionError> {
    let options = ConvertOptions {
        template: Some(template.to_string()),
        ..ConvertOptions::default()
    };
    Ok(convert_with(input, from, to, &options)?.text)
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConvertOptions {
    /// `None` or a blank string selects the target's default template.
    pub template: Option<String>,
    pub precision: GridPrecision,
    /// Reject templates with dangling selectors or malformed numeric runs.
    pub strict_template: bool,
}

/// Everything a conversion produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conversion {
    pub from: Notation,
    pub to: Notation,
    pub coordinate: Coordinate,
    pub text: String,
    pub fields: Vec<NamedField>,
}

pub fn convert_with(
    input: &str,
    from: Notation,
    to: Notation,
    options: &ConvertOptions,
) -> Result<Conversion, ConversionError> {
    trace!("Converting {from} -> {to}: '{input}'");

    let source = parse(input, from)?;
    let coordinate = to_canonical(&source)?;
    trace!("Canonical coordinate: {coordinate}");

    let target = from_canonical(coordinate, to, options.precision)?;
    let template = options.template.as_deref().unwrap_or_default();
    let text = if options.strict_template {
        render_strict(&target, template)?
    } else {
        render(&target, template)
    };

    Ok(Conversion {
        from,
        to,
        coordinate,
        text,
        fields: fields(&target),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::fields::{self, FieldName};

    #[test]
    fn test_parse_dd_scenario() {
        let value = parse("40.446N 79.982W", Notation::Dd).unwrap();
        let c = to_canonical(&value).unwrap();
        assert_eq!(c.latitude(), 40.446);
        assert_eq!(c.longitude(), -79.982);
    }

    #[test]
    fn test_render_magnitudes_scenario() {
        let value = NotationValue::Dd(Coordinate::new(40.446, -79.982).unwrap());
        assert_eq!(
            render(&value, "x = X0.0000 y = Y0.0000"),
            "x = 79.9820 y = 40.4460"
        );
    }

    #[test]
    fn test_convert_dd_to_dd_default_template() {
        let text = convert("70.49N40.32W", Notation::Dd, Notation::Dd, "").unwrap();
        assert_eq!(text, "x = -40.3200 y = 70.4900");
    }

    #[test]
    fn test_convert_empty_input() {
        let error = convert("", Notation::Dd, Notation::Mgrs, "").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::GrammarMismatch);
    }

    #[test]
    fn test_ddm_round_trip_scenario() {
        let text = convert("40.446 -79.982", Notation::Dd, Notation::Ddm, "").unwrap();
        let back = parse(&text, Notation::Ddm).unwrap();
        let c = to_canonical(&back).unwrap();
        assert!((c.latitude() - 40.446).abs() < 1e-6);
        assert!((c.longitude() + 79.982).abs() < 1e-6);
    }

    #[test]
    fn test_sexagesimal_output_carries_rounding() {
        let text = convert("40.9999999 -79.982", Notation::Dd, Notation::Ddm, "").unwrap();
        assert_eq!(text, "41°0.0'N 79°58.92'W");
        assert!(parse(&text, Notation::Ddm).is_ok());

        let text = convert("40.99999999 -79.982", Notation::Dd, Notation::Dms, "").unwrap();
        assert_eq!(text, "41°0'0.0\"N 79°58'55.2\"W");
        assert!(parse(&text, Notation::Dms).is_ok());

        let conversion = convert_with(
            "40.9999999 -79.982",
            Notation::Dd,
            Notation::Ddm,
            &ConvertOptions::default(),
        )
        .unwrap();
        assert_eq!(fields::get(&conversion.fields, FieldName::Lat), Some("41°0.0'N"));
    }

    #[test]
    fn test_convert_to_every_notation() {
        for to in Notation::ALL {
            // The DD default template is not itself a DD literal.
            let template = if to == Notation::Dd { "Y-0.000000 X-0.000000" } else { "" };
            let text = convert("38.8895N 77.0353W", Notation::Dd, to, template).unwrap();
            assert!(!text.is_empty(), "{to}");
            let back = to_canonical(&parse(&text, to).unwrap()).unwrap();
            assert!((back.latitude() - 38.8895).abs() < 0.05, "{to}: {text}");
            assert!((back.longitude() + 77.0353).abs() < 0.05, "{to}: {text}");
        }
    }

    #[test]
    fn test_convert_grid_output() {
        assert_eq!(
            convert("0 0", Notation::Dd, Notation::Mgrs, "").unwrap(),
            "31NAA6602100000"
        );
        assert_eq!(
            convert("0 0", Notation::Dd, Notation::Usng, "").unwrap(),
            "31N AA 66021 00000"
        );
        assert_eq!(
            convert("0 0", Notation::Dd, Notation::Utm, "").unwrap(),
            "31N 166021 0"
        );
        assert_eq!(
            convert("0 0", Notation::Dd, Notation::Gars, "").unwrap(),
            "361HN37"
        );
    }

    #[test]
    fn test_convert_between_grids() {
        let usng = convert("31NAA6602100000", Notation::Mgrs, Notation::Usng, "").unwrap();
        assert_eq!(usng, "31N AA 66021 00000");
    }

    #[test]
    fn test_convert_with_precision_and_fields() {
        let options = ConvertOptions {
            precision: GridPrecision::HundredMetre,
            ..ConvertOptions::default()
        };
        let conversion = convert_with("0 0", Notation::Dd, Notation::Mgrs, &options).unwrap();
        assert_eq!(conversion.text, "31NAA660000");
        assert_eq!(fields::get(&conversion.fields, FieldName::Gzd), Some("31N"));
        assert_eq!(
            fields::get(&conversion.fields, FieldName::Easting),
            Some("660")
        );
        assert_eq!(conversion.coordinate, Coordinate::new(0.0, 0.0).unwrap());
    }

    #[test]
    fn test_polar_target_is_domain_error() {
        let error = convert("85N 10E", Notation::Dd, Notation::Mgrs, "").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::ConversionDomainError);
        // GARS covers the poles.
        assert!(convert("85N 10E", Notation::Dd, Notation::Gars, "").is_ok());
    }

    #[test]
    fn test_strict_template() {
        let options = ConvertOptions {
            template: Some("Y0.00 X".to_string()),
            strict_template: true,
            ..ConvertOptions::default()
        };
        let error = convert_with("40 -79", Notation::Dd, Notation::Dd, &options).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidTemplate);

        let lenient = ConvertOptions {
            strict_template: false,
            ..options
        };
        let conversion = convert_with("40 -79", Notation::Dd, Notation::Dd, &lenient).unwrap();
        assert_eq!(conversion.text, "40.00 ");
    }

    #[test]
    fn test_errors_carry_kind() {
        let cases = [
            ("91N, 10E", Notation::Dd, ErrorKind::OutOfRange),
            ("40.4.4N 10E", Notation::Dd, ErrorKind::MalformedNumber),
            ("40N 10E junk", Notation::Dd, ErrorKind::GrammarMismatch),
            ("18SUJ234", Notation::Mgrs, ErrorKind::GrammarMismatch),
            ("17X 500000 0", Notation::Utm, ErrorKind::GrammarMismatch),
        ];
        for (input, from, kind) in cases {
            let error = convert(input, from, Notation::Dd, "").unwrap_err();
            assert_eq!(error.kind(), kind, "{input}");
        }
    }

    #[test]
    fn test_fields_per_notation() {
        let value = from_canonical(
            Coordinate::new(0.0, 0.0).unwrap(),
            Notation::Utm,
            GridPrecision::default(),
        )
        .unwrap();
        let names: Vec<_> = fields(&value).into_iter().map(|f| f.name).collect();
        assert_eq!(
            names,
            vec![FieldName::Zone, FieldName::Easting, FieldName::Northing]
        );
    }

    #[test]
    fn test_value_serializes_with_notation_tag() {
        let value = parse("361HN37", Notation::Gars).unwrap();
        let json = serde_json::to_value(&value).unwrap();
        assert_eq!(json["notation"], "gars");
        assert_eq!(json["value"]["quadrant"], 3);
    }
}
