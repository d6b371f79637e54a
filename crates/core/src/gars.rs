//! Global Area Reference System.
//!
//! A GARS cell is written as a three digit longitude band (`001`-`720`, 30'
//! wide from 180°W), two latitude band letters (`AA`-`QZ`, 30' tall from
//! 90°S), a 15' quadrant (`1`-`4`) and a 5' keypad digit (`1`-`9`).
//! Decoding yields the centre of the 5' cell.

use std::borrow::Cow;
use std::sync::LazyLock;

use serde::Serialize;

use crate::coordinate::{Axis, Coordinate};
use crate::error::{ConversionError, ParseError};
use crate::fields::{FieldName, NamedField};
use crate::grammar::Grammar;
use crate::notation::Notation;
use crate::template::{FieldSource, Scalar, Selector};

pub const DEFAULT_TEMPLATE: &str = "X000YQK";

pub const SELECTORS: &[(char, Selector)] = &[
    ('X', Selector::Scalar(0)),
    ('Y', Selector::Text(0)),
    ('Q', Selector::Text(1)),
    ('K', Selector::Text(2)),
];

const LETTERS: &str = "ABCDEFGHJKLMNPQRSTUVWXYZ";
const LONGITUDE_BANDS: u32 = 720;
const LATITUDE_BANDS: u32 = 360;

// Minutes in a band, a quadrant and a key cell.
const BAND: f64 = 30.0;
const QUADRANT: f64 = 15.0;
const KEY: f64 = 5.0;

static GRAMMAR: LazyLock<Grammar> = LazyLock::new(|| {
    Grammar::new(
        Notation::Gars,
        r"^(?P<lon>[0-9]{3})\s*(?P<lat>[A-Za-z]{2})\s*(?P<quadrant>[0-9])?\s*(?P<key>[0-9])?",
    )
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GarsValue {
    /// 1-based longitude band.
    pub longitude_band: u32,
    /// 0-based latitude band; written as two letters.
    pub latitude_band: u32,
    /// 1 NW, 2 NE, 3 SW, 4 SE.
    pub quadrant: u8,
    /// Keypad digit, 1 at the north-west corner.
    pub key: u8,
}

impl GarsValue {
    pub fn latitude_letters(&self) -> String {
        let letters = LETTERS.as_bytes();
        let first = letters[(self.latitude_band / 24) as usize] as char;
        let second = letters[(self.latitude_band % 24) as usize] as char;
        format!("{first}{second}")
    }
}

fn latitude_band(letters: &str) -> Option<u32> {
    let mut chars = letters.chars().map(|c| c.to_ascii_uppercase());
    let first = LETTERS.find(chars.next()?)?;
    let second = LETTERS.find(chars.next()?)?;
    Some((first * 24 + second) as u32)
}

/// Parse `006AG39`; the quadrant and key may be omitted, defaulting to the
/// first cell of the enclosing area.
pub fn parse(text: &str) -> Result<GarsValue, ParseError> {
    let m = GRAMMAR.match_full(text)?;

    let longitude_band = m.whole("lon", "longitude band")?;
    if !(1..=LONGITUDE_BANDS).contains(&longitude_band) {
        return Err(ParseError::out_of_range("longitude band", longitude_band));
    }

    let letters = m.text("lat").unwrap_or_default();
    let latitude_band = latitude_band(letters)
        .filter(|band| *band < LATITUDE_BANDS)
        .ok_or_else(|| ParseError::out_of_range("latitude band", letters.to_ascii_uppercase()))?;

    let quadrant = match m.text("quadrant") {
        Some(_) => m.whole("quadrant", "quadrant")?,
        None => 1,
    };
    if !(1..=4).contains(&quadrant) {
        return Err(ParseError::out_of_range("quadrant", quadrant));
    }

    let key = match m.text("key") {
        Some(_) => m.whole("key", "key")?,
        None => 1,
    };
    if !(1..=9).contains(&key) {
        return Err(ParseError::out_of_range("key", key));
    }

    Ok(GarsValue {
        longitude_band,
        latitude_band,
        quadrant: quadrant as u8,
        key: key as u8,
    })
}

pub fn to_canonical(value: &GarsValue) -> Result<Coordinate, ConversionError> {
    let quadrant = u32::from(value.quadrant.saturating_sub(1));
    let key = u32::from(value.key.saturating_sub(1));

    // Column and row counted from the west and from the north.
    let east = f64::from(quadrant % 2) * QUADRANT + f64::from(key % 3) * KEY;
    let south = f64::from(quadrant / 2) * QUADRANT + f64::from(key / 3) * KEY;

    let west = f64::from(value.longitude_band.saturating_sub(1)) * BAND;
    let north = f64::from(value.latitude_band + 1) * BAND;

    let longitude = -180.0 + (west + east + KEY / 2.0) / 60.0;
    let latitude = -90.0 + (north - south - KEY / 2.0) / 60.0;

    Coordinate::new(latitude, longitude)
        .map_err(|e| ConversionError::domain(Notation::Gars, e.to_string()))
}

/// The 5' cell containing a coordinate. The north pole and the antimeridian
/// fall into the last cell rather than past it.
pub fn from_canonical(coordinate: Coordinate) -> GarsValue {
    let max_lon = f64::from(LONGITUDE_BANDS) * BAND - KEY;
    let max_lat = f64::from(LATITUDE_BANDS) * BAND - KEY;
    let lon_minutes = ((coordinate.longitude() + 180.0) * 60.0).min(max_lon);
    let lat_minutes = ((coordinate.latitude() + 90.0) * 60.0).min(max_lat);

    let longitude_band = (lon_minutes / BAND).floor() as u32;
    let latitude_band = (lat_minutes / BAND).floor() as u32;

    let lon_in_band = lon_minutes - f64::from(longitude_band) * BAND;
    let lat_in_band = lat_minutes - f64::from(latitude_band) * BAND;

    let east = u32::from(lon_in_band >= QUADRANT);
    let north = u32::from(lat_in_band >= QUADRANT);
    let quadrant = if north == 1 { 1 + east } else { 3 + east };

    let column = (((lon_in_band % QUADRANT) / KEY).floor() as u32).min(2);
    let row_from_south = (((lat_in_band % QUADRANT) / KEY).floor() as u32).min(2);
    let key = (2 - row_from_south) * 3 + column + 1;

    GarsValue {
        longitude_band: longitude_band + 1,
        latitude_band,
        quadrant: quadrant as u8,
        key: key as u8,
    }
}

pub fn fields(value: &GarsValue) -> Vec<NamedField> {
    vec![
        NamedField::new(FieldName::Lon, format!("{:03}", value.longitude_band)),
        NamedField::new(FieldName::Lat, value.latitude_letters()),
        NamedField::new(FieldName::Quadrant, value.quadrant.to_string()),
        NamedField::new(FieldName::Key, value.key.to_string()),
    ]
}

impl FieldSource for GarsValue {
    fn scalar(&self, slot: usize) -> Option<Scalar> {
        (slot == 0).then(|| Scalar::signed(f64::from(self.longitude_band)))
    }

    fn text(&self, slot: usize) -> Option<Cow<'_, str>> {
        match slot {
            0 => Some(Cow::Owned(self.latitude_letters())),
            1 => Some(Cow::Owned(self.quadrant.to_string())),
            2 => Some(Cow::Owned(self.key.to_string())),
            _ => None,
        }
    }

    fn hemisphere(&self, _axis: Axis) -> Option<char> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::Template;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    fn render(value: &GarsValue) -> String {
        Template::compile(DEFAULT_TEMPLATE, SELECTORS).render(value)
    }

    #[test]
    fn test_origin_cell() {
        let v = from_canonical(coord(0.0, 0.0));
        assert_eq!(render(&v), "361HN37");
    }

    #[test]
    fn test_decode_returns_cell_centre() {
        let v = parse("006AG39").unwrap();
        assert_eq!(v.longitude_band, 6);
        assert_eq!(v.latitude_band, 6);
        let c = to_canonical(&v).unwrap();
        assert!((c.latitude() - (-87.0 + 2.5 / 60.0)).abs() < 1e-9);
        assert!((c.longitude() - (-177.5 + 12.5 / 60.0)).abs() < 1e-9);
        assert_eq!(render(&from_canonical(c)), "006AG39");
    }

    #[test]
    fn test_quadrants_and_keys() {
        // One 30' band split into its four quadrants, sampled at key 5.
        let base_lat = 10.0;
        let base_lon = 20.0;
        let cases = [
            (base_lat + 0.4, base_lon + 0.1, 1, 5),
            (base_lat + 0.4, base_lon + 0.35, 2, 5),
            (base_lat + 0.15, base_lon + 0.1, 3, 5),
            (base_lat + 0.15, base_lon + 0.35, 4, 5),
        ];
        for (lat, lon, quadrant, key) in cases {
            let v = from_canonical(coord(lat, lon));
            assert_eq!((v.quadrant, v.key), (quadrant, key), "{lat}, {lon}");
        }

        // Keypad corners inside quadrant 1.
        assert_eq!(from_canonical(coord(10.49, 20.01)).key, 1);
        assert_eq!(from_canonical(coord(10.49, 20.24)).key, 3);
        assert_eq!(from_canonical(coord(10.26, 20.01)).key, 7);
        assert_eq!(from_canonical(coord(10.26, 20.24)).key, 9);
    }

    #[test]
    fn test_edges_clamp_to_last_cell() {
        let v = from_canonical(coord(90.0, 180.0));
        assert_eq!(render(&v), "720QZ23");
        let v = from_canonical(coord(-90.0, -180.0));
        assert_eq!(render(&v), "001AA37");
    }

    #[test]
    fn test_parse_is_case_insensitive_and_allows_spaces() {
        assert_eq!(parse("006ag39").unwrap(), parse("006 AG 3 9").unwrap());
    }

    #[test]
    fn test_parse_optional_quadrant_and_key() {
        let v = parse("361HN").unwrap();
        assert_eq!((v.quadrant, v.key), (1, 1));
        let v = parse("361HN4").unwrap();
        assert_eq!((v.quadrant, v.key), (4, 1));
    }

    #[test]
    fn test_parse_ranges() {
        assert!(matches!(
            parse("000AA11"),
            Err(ParseError::OutOfRange { field: "longitude band", .. })
        ));
        assert!(matches!(
            parse("721AA11"),
            Err(ParseError::OutOfRange { field: "longitude band", .. })
        ));
        assert!(matches!(
            parse("001RA11"),
            Err(ParseError::OutOfRange { field: "latitude band", .. })
        ));
        assert!(matches!(
            parse("001AI11"),
            Err(ParseError::OutOfRange { field: "latitude band", .. })
        ));
        assert!(matches!(
            parse("001AA51"),
            Err(ParseError::OutOfRange { field: "quadrant", .. })
        ));
        assert!(matches!(
            parse("001AA10"),
            Err(ParseError::OutOfRange { field: "key", .. })
        ));
        assert!(matches!(
            parse("001AA111"),
            Err(ParseError::GrammarMismatch { .. })
        ));
    }

    #[test]
    fn test_fields() {
        let v = parse("006AG39").unwrap();
        let f = fields(&v);
        assert_eq!(f[0], NamedField::new(FieldName::Lon, "006"));
        assert_eq!(f[1], NamedField::new(FieldName::Lat, "AG"));
        assert_eq!(f[2], NamedField::new(FieldName::Quadrant, "3"));
        assert_eq!(f[3], NamedField::new(FieldName::Key, "9"));
    }
}
