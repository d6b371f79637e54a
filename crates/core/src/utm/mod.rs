//! Universal Transverse Mercator.
//!
//! Zones are 6° wide starting at 180°W, with the usual exceptions over
//! southern Norway (32V) and Svalbard (31X/33X/35X/37X). Northings in the
//! southern hemisphere carry a false northing of 10 000 km.

pub mod projection;

use std::borrow::Cow;
use std::fmt;
use std::sync::LazyLock;

use serde::Serialize;

use crate::coordinate::{Axis, Coordinate};
use crate::error::{ConversionError, ParseError};
use crate::fields::{FieldName, NamedField};
use crate::grammar::Grammar;
use crate::notation::Notation;
use crate::template::{FieldSource, NumberFormat, Scalar, Selector};

pub const DEFAULT_TEMPLATE: &str = "Z#H X0 Y0";

pub const SELECTORS: &[(char, Selector)] = &[
    ('Z', Selector::Scalar(0)),
    ('X', Selector::Scalar(1)),
    ('Y', Selector::Scalar(2)),
    ('H', Selector::Hemisphere(Axis::Latitude)),
    ('+', Selector::Plus),
    ('-', Selector::Minus),
];

pub const MIN_LATITUDE: f64 = -80.0;
pub const MAX_LATITUDE: f64 = 84.0;

const FALSE_EASTING: f64 = 500_000.0;
const FALSE_NORTHING: f64 = 10_000_000.0;
const MIN_EASTING: f64 = 100_000.0;
const MAX_EASTING: f64 = 900_000.0;

static GRAMMAR: LazyLock<Grammar> = LazyLock::new(|| {
    Grammar::new(
        Notation::Utm,
        r"^(?P<zone>[0-9]+)\s*(?P<hemisphere>[NnSs])[\s,;]+(?P<easting>[-+0-9.]+)\s*[mM]?[\s,;]+(?P<northing>[-+0-9.]+)\s*[mM]?",
    )
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Hemisphere {
    #[serde(rename = "N")]
    North,
    #[serde(rename = "S")]
    South,
}

impl Hemisphere {
    pub fn letter(&self) -> char {
        match self {
            Hemisphere::North => 'N',
            Hemisphere::South => 'S',
        }
    }
}

impl fmt::Display for Hemisphere {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UtmValue {
    pub zone: u8,
    pub hemisphere: Hemisphere,
    pub easting: f64,
    pub northing: f64,
}

/// The zone containing a point, honouring the Norway and Svalbard exceptions.
pub fn zone_for(latitude: f64, longitude: f64) -> u8 {
    let zone = (((longitude + 180.0) / 6.0).floor() as i64 + 1).clamp(1, 60) as u8;

    if (56.0..64.0).contains(&latitude) && (3.0..12.0).contains(&longitude) {
        return 32;
    }

    if (72.0..=MAX_LATITUDE).contains(&latitude) {
        match longitude {
            lon if (0.0..9.0).contains(&lon) => return 31,
            lon if (9.0..21.0).contains(&lon) => return 33,
            lon if (21.0..33.0).contains(&lon) => return 35,
            lon if (33.0..42.0).contains(&lon) => return 37,
            _ => {}
        }
    }

    zone
}

pub fn central_meridian(zone: u8) -> f64 {
    f64::from(zone) * 6.0 - 183.0
}

/// Parse `17N 589081 4477616`; metre suffixes and commas are accepted.
pub fn parse(text: &str) -> Result<UtmValue, ParseError> {
    let m = GRAMMAR.match_full(text)?;

    let zone = m.whole("zone", "zone")?;
    if !(1..=60).contains(&zone) {
        return Err(ParseError::out_of_range("zone", zone));
    }

    let hemisphere = match m.letter("hemisphere") {
        Some('S') => Hemisphere::South,
        Some('N') => Hemisphere::North,
        _ => return Err(m.mismatch()),
    };

    let easting = m.number("easting", "easting")?;
    if !(MIN_EASTING..=MAX_EASTING).contains(&easting) {
        return Err(ParseError::out_of_range("easting", easting));
    }

    let northing = m.number("northing", "northing")?;
    if !(0.0..=FALSE_NORTHING).contains(&northing) {
        return Err(ParseError::out_of_range("northing", northing));
    }

    Ok(UtmValue {
        zone: zone as u8,
        hemisphere,
        easting,
        northing,
    })
}

pub fn to_canonical(value: &UtmValue) -> Result<Coordinate, ConversionError> {
    let x = value.easting - FALSE_EASTING;
    let y = match value.hemisphere {
        Hemisphere::North => value.northing,
        Hemisphere::South => value.northing - FALSE_NORTHING,
    };

    let (latitude, mut longitude) = projection::inverse(x, y, central_meridian(value.zone));
    if longitude > 180.0 {
        longitude -= 360.0;
    } else if longitude < -180.0 {
        longitude += 360.0;
    }

    Coordinate::new(latitude, longitude)
        .map_err(|e| ConversionError::domain(Notation::Utm, e.to_string()))
}

pub fn from_canonical(coordinate: Coordinate) -> Result<UtmValue, ConversionError> {
    check_latitude(Notation::Utm, coordinate.latitude())?;
    Ok(project(coordinate))
}

/// Reject latitudes the UTM grid does not cover.
pub(crate) fn check_latitude(notation: Notation, latitude: f64) -> Result<(), ConversionError> {
    if !(MIN_LATITUDE..=MAX_LATITUDE).contains(&latitude) {
        return Err(ConversionError::domain(
            notation,
            format!("latitude {latitude} is outside the UTM grid (80°S to 84°N)"),
        ));
    }
    Ok(())
}

/// Project without the latitude check; callers validate the domain first.
pub(crate) fn project(coordinate: Coordinate) -> UtmValue {
    let latitude = coordinate.latitude();
    let longitude = coordinate.longitude();
    let zone = zone_for(latitude, longitude);
    let (x, y) = projection::forward(latitude, longitude, central_meridian(zone));

    let (hemisphere, northing) = if latitude < 0.0 {
        (Hemisphere::South, y + FALSE_NORTHING)
    } else {
        (Hemisphere::North, y)
    };

    UtmValue {
        zone,
        hemisphere,
        easting: x + FALSE_EASTING,
        northing,
    }
}

pub fn fields(value: &UtmValue) -> Vec<NamedField> {
    let metres = NumberFormat::parse("0");
    vec![
        NamedField::new(
            FieldName::Zone,
            format!("{}{}", value.zone, value.hemisphere),
        ),
        NamedField::new(FieldName::Easting, metres.format(value.easting)),
        NamedField::new(FieldName::Northing, metres.format(value.northing)),
    ]
}

impl FieldSource for UtmValue {
    fn scalar(&self, slot: usize) -> Option<Scalar> {
        match slot {
            0 => Some(Scalar::signed(f64::from(self.zone))),
            1 => Some(Scalar::signed(self.easting)),
            2 => Some(Scalar::signed(self.northing)),
            _ => None,
        }
    }

    fn text(&self, _slot: usize) -> Option<Cow<'_, str>> {
        None
    }

    fn hemisphere(&self, axis: Axis) -> Option<char> {
        match axis {
            Axis::Latitude => Some(self.hemisphere.letter()),
            Axis::Longitude => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::Template;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    #[test]
    fn test_zone_for_regular_zones() {
        assert_eq!(zone_for(0.0, -180.0), 1);
        assert_eq!(zone_for(0.0, 0.0), 31);
        assert_eq!(zone_for(40.446, -79.982), 17);
        assert_eq!(zone_for(0.0, 180.0), 60);
    }

    #[test]
    fn test_zone_for_norway_and_svalbard() {
        assert_eq!(zone_for(60.0, 5.0), 32);
        assert_eq!(zone_for(55.9, 5.0), 31);
        assert_eq!(zone_for(78.0, 15.0), 33);
        assert_eq!(zone_for(78.0, 8.9), 31);
        assert_eq!(zone_for(78.0, 40.0), 37);
        assert_eq!(zone_for(71.9, 15.0), 33);
    }

    #[test]
    fn test_from_canonical_equator() {
        let v = from_canonical(coord(0.0, 0.0)).unwrap();
        assert_eq!(v.zone, 31);
        assert_eq!(v.hemisphere, Hemisphere::North);
        assert!((v.easting - 166_021.443).abs() < 0.01);
        assert!(v.northing.abs() < 1e-6);
    }

    #[test]
    fn test_from_canonical_southern_false_northing() {
        let v = from_canonical(coord(-33.8688, 151.2093)).unwrap();
        assert_eq!(v.zone, 56);
        assert_eq!(v.hemisphere, Hemisphere::South);
        assert!(v.northing > 6_000_000.0 && v.northing < 6_300_000.0);
    }

    #[test]
    fn test_from_canonical_rejects_polar_latitudes() {
        for lat in [84.5, -80.5, 90.0] {
            assert!(matches!(
                from_canonical(coord(lat, 0.0)),
                Err(ConversionError::Domain {
                    notation: Notation::Utm,
                    ..
                })
            ));
        }
        assert!(from_canonical(coord(84.0, 0.0)).is_ok());
        assert!(from_canonical(coord(-80.0, 0.0)).is_ok());
    }

    #[test]
    fn test_round_trip_within_a_millimetre() {
        for &(lat, lon) in &[(40.446, -79.982), (-33.8688, 151.2093), (60.0, 5.0), (-0.5, 179.9)] {
            let c = coord(lat, lon);
            let back = to_canonical(&from_canonical(c).unwrap()).unwrap();
            assert!((back.latitude() - lat).abs() < 1e-8);
            assert!((back.longitude() - lon).abs() < 1e-8);
        }
    }

    #[test]
    fn test_parse_accepts_separators() {
        let a = parse("17N 589081 4477616").unwrap();
        let b = parse("17n, 589081m, 4477616m").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.zone, 17);
        assert_eq!(a.easting, 589_081.0);
        assert_eq!(a.northing, 4_477_616.0);
    }

    #[test]
    fn test_parse_ranges() {
        assert!(matches!(
            parse("0N 500000 0"),
            Err(ParseError::OutOfRange { field: "zone", .. })
        ));
        assert!(matches!(
            parse("61N 500000 0"),
            Err(ParseError::OutOfRange { field: "zone", .. })
        ));
        assert!(matches!(
            parse("17N 50000 4477616"),
            Err(ParseError::OutOfRange { field: "easting", .. })
        ));
        assert!(matches!(
            parse("17S 500000 10000001"),
            Err(ParseError::OutOfRange { field: "northing", .. })
        ));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            parse("17Q 589081 4477616"),
            Err(ParseError::GrammarMismatch { .. })
        ));
        assert!(matches!(
            parse("17N 589081 4477616 x"),
            Err(ParseError::GrammarMismatch { .. })
        ));
        assert!(matches!(
            parse("17N 589.0.81 4477616"),
            Err(ParseError::MalformedNumber { field: "easting", .. })
        ));
    }

    #[test]
    fn test_default_template_and_fields() {
        let v = from_canonical(coord(0.0, 0.0)).unwrap();
        let text = Template::compile(DEFAULT_TEMPLATE, SELECTORS).render(&v);
        assert_eq!(text, "31N 166021 0");

        let f = fields(&v);
        assert_eq!(f[0], NamedField::new(FieldName::Zone, "31N"));
        assert_eq!(f[1], NamedField::new(FieldName::Easting, "166021"));
        assert_eq!(f[2], NamedField::new(FieldName::Northing, "0"));
    }
}
