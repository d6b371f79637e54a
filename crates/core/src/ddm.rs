//! Degrees and decimal minutes.

use std::borrow::Cow;
use std::sync::LazyLock;

use serde::Serialize;

use crate::coordinate::{Axis, Coordinate};
use crate::error::ParseError;
use crate::fields::{FieldName, NamedField};
use crate::grammar::{Grammar, GrammarMatch};
use crate::notation::Notation;
use crate::template::{FieldSource, NumberFormat, Scalar, Selector, Sign, Template};

pub const DEFAULT_TEMPLATE: &str = "A0°B0.0###'N X0°Y0.0###'E";
const LATITUDE_TEMPLATE: &str = "A0°B0.0###'N";
const LONGITUDE_TEMPLATE: &str = "X0°Y0.0###'E";

pub const SELECTORS: &[(char, Selector)] = &[
    ('A', Selector::Scalar(0)),
    ('B', Selector::Scalar(1)),
    ('X', Selector::Scalar(2)),
    ('Y', Selector::Scalar(3)),
    ('N', Selector::Hemisphere(Axis::Latitude)),
    ('S', Selector::Hemisphere(Axis::Latitude)),
    ('E', Selector::Hemisphere(Axis::Longitude)),
    ('W', Selector::Hemisphere(Axis::Longitude)),
    ('+', Selector::Plus),
    ('-', Selector::Minus),
];

static GRAMMAR: LazyLock<Grammar> = LazyLock::new(|| {
    Grammar::new(
        Notation::Ddm,
        concat!(
            r"^(?P<lat_pre>[NS])?\s*(?P<lat_sign>[-+])?(?P<lat_deg>[0-9.]+)(?:\s*[°*Dd:]\s*|\s+)",
            r"(?P<lat_min>[0-9.]+)(?:\s*['′])?\s*(?P<lat_post>[NS])?",
            r"[,;\s]*",
            r"(?P<lon_pre>[EW])?\s*(?P<lon_sign>[-+])?(?P<lon_deg>[0-9.]+)(?:\s*[°*Dd:]\s*|\s+)",
            r"(?P<lon_min>[0-9.]+)(?:\s*['′])?\s*(?P<lon_post>[EW])?",
        ),
    )
});

/// One axis in degrees and decimal minutes. The hemisphere lives in
/// `negative`, so zero degrees south is representable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DegreesMinutes {
    pub negative: bool,
    pub degrees: u32,
    pub minutes: f64,
}

impl DegreesMinutes {
    pub fn from_degrees(value: f64) -> Self {
        let magnitude = value.abs();
        let mut degrees = magnitude.floor();
        let mut minutes = (magnitude - degrees) * 60.0;
        if minutes >= 60.0 {
            degrees += 1.0;
            minutes = 0.0;
        }

        DegreesMinutes {
            negative: value < 0.0,
            degrees: degrees as u32,
            minutes,
        }
    }

    pub fn to_degrees(&self) -> f64 {
        let magnitude = f64::from(self.degrees) + self.minutes / 60.0;
        if self.negative {
            -magnitude
        } else {
            magnitude
        }
    }

    /// Degrees carrying the hemisphere as their sign. Zero is unsigned; use
    /// `negative` to tell `0°S` from `0°N`.
    pub fn signed_degrees(&self) -> i32 {
        let degrees = self.degrees as i32;
        if self.negative {
            -degrees
        } else {
            degrees
        }
    }

    fn sign(&self) -> Sign {
        axis_sign(self.negative, self.to_degrees())
    }

    /// Carry minutes that `format` would print as 60 into the degrees.
    fn carried(&self, format: Option<&NumberFormat>) -> Self {
        match format {
            Some(format) if format.rounded(self.minutes) >= 60.0 => DegreesMinutes {
                negative: self.negative,
                degrees: self.degrees + 1,
                minutes: 0.0,
            },
            _ => *self,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DdmValue {
    pub latitude: DegreesMinutes,
    pub longitude: DegreesMinutes,
}

impl DdmValue {
    /// The value as `template` prints it, with rounded-up minutes carried so
    /// that no axis reads 60'.
    pub fn carried(&self, template: &Template) -> DdmValue {
        DdmValue {
            latitude: self.latitude.carried(template.format_for(1)),
            longitude: self.longitude.carried(template.format_for(3)),
        }
    }
}

pub fn render(value: &DdmValue, template: &Template) -> String {
    template.render(&value.carried(template))
}

pub fn parse(text: &str) -> Result<DdmValue, ParseError> {
    let m = GRAMMAR.match_full(text)?;

    let latitude = DegreesMinutes {
        negative: negative(&m, Axis::Latitude, "lat_sign", "lat_pre", "lat_post")?,
        degrees: m.whole("lat_deg", "latitude degrees")?,
        minutes: m.number("lat_min", "latitude minutes")?,
    };
    let longitude = DegreesMinutes {
        negative: negative(&m, Axis::Longitude, "lon_sign", "lon_pre", "lon_post")?,
        degrees: m.whole("lon_deg", "longitude degrees")?,
        minutes: m.number("lon_min", "longitude minutes")?,
    };

    check_axis(Axis::Latitude, &latitude)?;
    check_axis(Axis::Longitude, &longitude)?;

    Ok(DdmValue {
        latitude,
        longitude,
    })
}

fn check_axis(axis: Axis, value: &DegreesMinutes) -> Result<(), ParseError> {
    check_degrees(axis, value.degrees)?;
    check_sexagesimal("minutes", value.minutes)?;
    check_total(axis, value.to_degrees())
}

pub(crate) fn check_degrees(axis: Axis, degrees: u32) -> Result<(), ParseError> {
    if f64::from(degrees) > axis.limit() {
        return Err(ParseError::out_of_range(axis.name(), degrees));
    }
    Ok(())
}

pub(crate) fn check_sexagesimal(field: &'static str, value: f64) -> Result<(), ParseError> {
    if !(0.0..60.0).contains(&value) {
        return Err(ParseError::out_of_range(field, value));
    }
    Ok(())
}

pub(crate) fn check_total(axis: Axis, degrees: f64) -> Result<(), ParseError> {
    if degrees.abs() > axis.limit() {
        return Err(ParseError::out_of_range(axis.name(), degrees));
    }
    Ok(())
}

/// An axis is negative when its degrees carry a minus sign or its
/// hemisphere letter is S/W.
pub(crate) fn negative(
    m: &GrammarMatch<'_>,
    axis: Axis,
    sign: &str,
    before: &str,
    after: &str,
) -> Result<bool, ParseError> {
    let (_, negative_letter) = axis.hemispheres();
    let hemisphere = m.hemisphere(before, after)?;
    Ok(m.text(sign) == Some("-") || hemisphere == Some(negative_letter))
}

pub(crate) fn axis_sign(negative: bool, degrees: f64) -> Sign {
    if negative {
        Sign::Negative
    } else if degrees > 0.0 {
        Sign::Positive
    } else {
        Sign::Zero
    }
}

pub(crate) fn hemisphere_letter(axis: Axis, sign: Sign) -> char {
    let (positive, negative) = axis.hemispheres();
    if sign == Sign::Positive {
        positive
    } else {
        negative
    }
}

pub fn to_canonical(value: &DdmValue) -> Result<Coordinate, ParseError> {
    Coordinate::new(value.latitude.to_degrees(), value.longitude.to_degrees())
}

pub fn from_canonical(coordinate: Coordinate) -> DdmValue {
    DdmValue {
        latitude: DegreesMinutes::from_degrees(coordinate.latitude()),
        longitude: DegreesMinutes::from_degrees(coordinate.longitude()),
    }
}

pub fn fields(value: &DdmValue) -> Vec<NamedField> {
    vec![
        NamedField::new(
            FieldName::Lat,
            render(value, &Template::compile(LATITUDE_TEMPLATE, SELECTORS)),
        ),
        NamedField::new(
            FieldName::Lon,
            render(value, &Template::compile(LONGITUDE_TEMPLATE, SELECTORS)),
        ),
    ]
}

impl FieldSource for DdmValue {
    fn scalar(&self, slot: usize) -> Option<Scalar> {
        let (part, field) = match slot {
            0 => (&self.latitude, f64::from(self.latitude.degrees)),
            1 => (&self.latitude, self.latitude.minutes),
            2 => (&self.longitude, f64::from(self.longitude.degrees)),
            3 => (&self.longitude, self.longitude.minutes),
            _ => return None,
        };
        Some(Scalar::new(field, part.sign()))
    }

    fn text(&self, _slot: usize) -> Option<Cow<'_, str>> {
        None
    }

    fn hemisphere(&self, axis: Axis) -> Option<char> {
        let sign = match axis {
            Axis::Latitude => self.latitude.sign(),
            Axis::Longitude => self.longitude.sign(),
        };
        Some(hemisphere_letter(axis, sign))
    }

    fn leading(&self) -> Option<Scalar> {
        self.scalar(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(value: &DdmValue, template: &str) -> String {
        super::render(value, &Template::compile(template, SELECTORS))
    }

    #[test]
    fn test_parse_symbols() {
        let v = parse("40°26.76'N 79°58.92'W").unwrap();
        assert!(!v.latitude.negative);
        assert_eq!(v.latitude.degrees, 40);
        assert_eq!(v.latitude.minutes, 26.76);
        assert!(v.longitude.negative);
        assert_eq!(v.longitude.signed_degrees(), -79);
        assert_eq!(v.longitude.minutes, 58.92);
    }

    #[test]
    fn test_parse_plain_and_prefixed() {
        let a = parse("40 26.76 -79 58.92").unwrap();
        let b = parse("N40 26.76, W79 58.92").unwrap();
        let c = parse("40:26.76N;79:58.92W").unwrap();
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn test_zero_degrees_keeps_hemisphere() {
        let v = parse("0 30S 0 15W").unwrap();
        assert!(v.latitude.negative);
        assert_eq!(v.latitude.signed_degrees(), 0);
        let c = to_canonical(&v).unwrap();
        assert_eq!(c.latitude(), -0.5);
        assert_eq!(c.longitude(), -0.25);

        let v = parse("-0 30 0 15").unwrap();
        assert_eq!(to_canonical(&v).unwrap().latitude(), -0.5);
    }

    #[test]
    fn test_parse_rejects_fractional_degrees() {
        assert!(matches!(
            parse("40.5 26.76N 79 58.92W"),
            Err(ParseError::MalformedNumber { field: "latitude degrees", .. })
        ));
    }

    #[test]
    fn test_parse_range() {
        assert!(matches!(
            parse("40 60.0N 79 58.92W"),
            Err(ParseError::OutOfRange { field: "minutes", .. })
        ));
        assert!(matches!(
            parse("90 0.5N 79 58.92W"),
            Err(ParseError::OutOfRange { field: "latitude", .. })
        ));
        assert!(matches!(
            parse("40 0N 181 0E"),
            Err(ParseError::OutOfRange { field: "longitude", .. })
        ));
    }

    #[test]
    fn test_parse_trailing_garbage() {
        assert!(matches!(
            parse("40 26.76N 79 58.92W?"),
            Err(ParseError::GrammarMismatch { .. })
        ));
    }

    #[test]
    fn test_round_trip_is_within_tolerance() {
        let c = Coordinate::new(40.446, -79.982).unwrap();
        let back = to_canonical(&from_canonical(c)).unwrap();
        assert!((back.latitude() - 40.446).abs() < 1e-6);
        assert!((back.longitude() + 79.982).abs() < 1e-6);
    }

    #[test]
    fn test_default_template() {
        let c = Coordinate::new(40.446, -79.982).unwrap();
        let v = from_canonical(c);
        assert_eq!(render(&v, DEFAULT_TEMPLATE), "40°26.76'N 79°58.92'W");
    }

    #[test]
    fn test_minutes_rounding_up_carry_into_degrees() {
        let v = from_canonical(Coordinate::new(40.9999999, -79.982).unwrap());
        let text = render(&v, DEFAULT_TEMPLATE);
        assert_eq!(text, "41°0.0'N 79°58.92'W");
        assert!(parse(&text).is_ok());

        let v = from_canonical(Coordinate::new(-12.995, 0.0).unwrap());
        assert_eq!(render(&v, "A0°B0'S"), "13°0'S");
        assert_eq!(render(&v, "A0°B0.00'S"), "12°59.70'S");
    }

    #[test]
    fn test_sign_template_on_zero_degrees() {
        let v = parse("0 30S 10 0E").unwrap();
        assert_eq!(render(&v, "-A0 B0.0"), "-0 30.0");
        assert_eq!(render(&v, "X+0"), "+10");
        assert_eq!(render(&v, "+X0"), "10");
        assert_eq!(render(&v, "A0°B0'N"), "0°30'S");
    }

    #[test]
    fn test_fields_split_axes() {
        let v = from_canonical(Coordinate::new(40.446, -79.982).unwrap());
        let f = fields(&v);
        assert_eq!(f[0].value, "40°26.76'N");
        assert_eq!(f[1].value, "79°58.92'W");
    }
}
