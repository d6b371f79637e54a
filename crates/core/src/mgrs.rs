//! Military Grid Reference System and U.S. National Grid.
//!
//! Both notations share one grid: a UTM zone, an 8° latitude band letter, a
//! two-letter 100 km square identifier and an even number of easting and
//! northing digits. USNG differs only in how it is written, with spaces
//! between the parts. A reference names the south-west corner of its cell.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use serde::Serialize;

use crate::coordinate::{Axis, Coordinate};
use crate::error::{ConversionError, ParseError};
use crate::fields::{FieldName, NamedField};
use crate::grammar::Grammar;
use crate::notation::Notation;
use crate::template::{FieldSource, Scalar, Selector};
use crate::utm::{self, Hemisphere, UtmValue};

pub const SELECTORS: &[(char, Selector)] = &[
    ('Z', Selector::Text(0)),
    ('S', Selector::Text(1)),
    ('X', Selector::Scalar(0)),
    ('Y', Selector::Scalar(1)),
];

const BANDS: &str = "CDEFGHJKLMNPQRSTUVWX";
/// Shortest length of a degree of latitude, in metres.
const METRES_PER_DEGREE: f64 = 110_574.0;
const BAND_SLACK: f64 = 0.1;
const COLUMN_SETS: [&str; 3] = ["ABCDEFGH", "JKLMNPQR", "STUVWXYZ"];
const ROWS: &str = "ABCDEFGHJKLMNPQRSTUV";

// Lowest northing reached inside each band, indexed like `BANDS`.
const BAND_MIN_NORTHING: [f64; 20] = [
    1_100_000.0,
    2_000_000.0,
    2_800_000.0,
    3_700_000.0,
    4_600_000.0,
    5_500_000.0,
    6_400_000.0,
    7_300_000.0,
    8_200_000.0,
    9_100_000.0,
    0.0,
    800_000.0,
    1_700_000.0,
    2_600_000.0,
    3_500_000.0,
    4_400_000.0,
    5_300_000.0,
    6_200_000.0,
    7_000_000.0,
    7_900_000.0,
];

const SQUARE: f64 = 100_000.0;
const ROW_CYCLE: f64 = 2_000_000.0;

static GRAMMAR: LazyLock<Grammar> = LazyLock::new(|| {
    Grammar::new(
        Notation::Mgrs,
        r"^(?P<zone>[0-9]{1,2})\s*(?P<band>[A-Za-z])\s*(?P<square>[A-Za-z]{2})\s*(?P<easting>[0-9]*)\s*(?P<northing>[0-9]*)",
    )
});

/// Digits per axis, from 0 (100 km) to 5 (1 m).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum GridPrecision {
    #[serde(rename = "100km")]
    HundredKilometre,
    #[serde(rename = "10km")]
    TenKilometre,
    #[serde(rename = "1km")]
    Kilometre,
    #[serde(rename = "100m")]
    HundredMetre,
    #[serde(rename = "10m")]
    TenMetre,
    #[default]
    #[serde(rename = "1m")]
    Metre,
}

impl GridPrecision {
    pub const ALL: [GridPrecision; 6] = [
        GridPrecision::HundredKilometre,
        GridPrecision::TenKilometre,
        GridPrecision::Kilometre,
        GridPrecision::HundredMetre,
        GridPrecision::TenMetre,
        GridPrecision::Metre,
    ];

    pub fn from_digits(digits: usize) -> Option<Self> {
        Self::ALL.get(digits).copied()
    }

    pub fn digits(&self) -> usize {
        *self as usize
    }

    /// Size of one cell in metres.
    pub fn cell(&self) -> f64 {
        10f64.powi(5 - self.digits() as i32)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GridPrecision::HundredKilometre => "100km",
            GridPrecision::TenKilometre => "10km",
            GridPrecision::Kilometre => "1km",
            GridPrecision::HundredMetre => "100m",
            GridPrecision::TenMetre => "10m",
            GridPrecision::Metre => "1m",
        }
    }
}

impl fmt::Display for GridPrecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GridPrecision {
    type Err = String;

    /// Accepts a cell size (`10m`, `1km`) or a digit count (`0`..`5`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        if let Ok(digits) = s.parse::<usize>() {
            return GridPrecision::from_digits(digits)
                .ok_or_else(|| format!("Precision must be between 0 and 5 digits, got {digits}"));
        }
        GridPrecision::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| {
                format!("Unknown precision '{s}'. Use 1m, 10m, 100m, 1km, 10km, 100km or 0-5")
            })
    }
}

/// A grid reference shared by MGRS and USNG. `easting` and `northing` are
/// metres inside the 100 km square, already truncated to `precision`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridReference {
    pub zone: u8,
    pub band: char,
    pub square: [char; 2],
    pub easting: u32,
    pub northing: u32,
    pub precision: GridPrecision,
}

impl GridReference {
    /// Grid zone designation, e.g. `18T`.
    pub fn gzd(&self) -> String {
        format!("{}{}", self.zone, self.band)
    }

    pub fn square_id(&self) -> String {
        self.square.iter().collect()
    }

    /// Easting digits at the reference's precision.
    pub fn easting_digits(&self) -> String {
        self.digits(self.easting)
    }

    pub fn northing_digits(&self) -> String {
        self.digits(self.northing)
    }

    fn digits(&self, metres: u32) -> String {
        let n = self.precision.digits();
        if n == 0 {
            return String::new();
        }
        let value = metres / self.precision.cell() as u32;
        format!("{value:0n$}")
    }
}

/// Compact MGRS form: `18TWL8081740194` at 1 m.
pub fn mgrs_template(precision: GridPrecision) -> String {
    let zeros = "0".repeat(precision.digits());
    format!("ZSX{zeros}Y{zeros}")
}

/// Spaced USNG form: `18T WL 80817 40194` at 1 m.
pub fn usng_template(precision: GridPrecision) -> String {
    if precision.digits() == 0 {
        return "Z S".to_string();
    }
    let zeros = "0".repeat(precision.digits());
    format!("Z S X{zeros} Y{zeros}")
}

fn column_set(zone: u8) -> &'static str {
    COLUMN_SETS[(usize::from(zone) + 2) % 3]
}

fn row_offset(zone: u8) -> usize {
    if zone % 2 == 0 {
        5
    } else {
        0
    }
}

fn band_for(latitude: f64) -> char {
    let index = (((latitude + 80.0) / 8.0).floor() as usize).min(BANDS.len() - 1);
    BANDS.as_bytes()[index] as char
}

/// Parse a compact or spaced grid reference. `notation` only labels errors.
pub fn parse(text: &str, notation: Notation) -> Result<GridReference, ParseError> {
    let m = GRAMMAR
        .match_full(text)
        .map_err(|_| ParseError::mismatch(notation, text.trim()))?;

    let zone = m.whole("zone", "zone")?;
    if !(1..=60).contains(&zone) {
        return Err(ParseError::out_of_range("zone", zone));
    }
    let zone = zone as u8;

    let band = m.letter("band").unwrap_or_default();
    if !BANDS.contains(band) {
        return Err(ParseError::out_of_range("band", band));
    }

    let square: Vec<char> = m
        .text("square")
        .unwrap_or_default()
        .chars()
        .map(|c| c.to_ascii_uppercase())
        .collect();
    let square = [square[0], square[1]];
    if !column_set(zone).contains(square[0]) {
        return Err(ParseError::out_of_range("square column", square[0]));
    }
    if !ROWS.contains(square[1]) {
        return Err(ParseError::out_of_range("square row", square[1]));
    }

    let (easting, northing) = match (m.text("easting"), m.text("northing")) {
        (None, None) => ("", ""),
        (Some(both), None) if both.len() % 2 == 0 => both.split_at(both.len() / 2),
        (Some(e), Some(n)) if e.len() == n.len() => (e, n),
        _ => return Err(ParseError::mismatch(notation, text.trim())),
    };

    let precision = GridPrecision::from_digits(easting.len())
        .ok_or_else(|| ParseError::mismatch(notation, text.trim()))?;
    let cell = precision.cell() as u32;

    Ok(GridReference {
        zone,
        band,
        square,
        easting: grid_digits("easting", easting)? * cell,
        northing: grid_digits("northing", northing)? * cell,
        precision,
    })
}

fn grid_digits(field: &'static str, text: &str) -> Result<u32, ParseError> {
    if text.is_empty() {
        return Ok(0);
    }
    text.parse::<u32>()
        .map_err(|_| ParseError::malformed(field, text))
}

pub fn to_canonical(
    reference: &GridReference,
    notation: Notation,
) -> Result<Coordinate, ConversionError> {
    let zone = reference.zone;
    let band = BANDS
        .find(reference.band)
        .ok_or_else(|| ConversionError::domain(notation, "unknown latitude band"))?;
    let column = column_set(zone)
        .find(reference.square[0])
        .ok_or_else(|| ConversionError::domain(notation, "square column not in zone"))?;
    let row = ROWS
        .find(reference.square[1])
        .ok_or_else(|| ConversionError::domain(notation, "unknown square row"))?;

    let easting = (column + 1) as f64 * SQUARE + f64::from(reference.easting);

    let row = (row + ROWS.len() - row_offset(zone)) % ROWS.len();
    let mut northing = row as f64 * SQUARE + f64::from(reference.northing);
    while northing < BAND_MIN_NORTHING[band] {
        northing += ROW_CYCLE;
    }

    let hemisphere = if reference.band < 'N' {
        Hemisphere::South
    } else {
        Hemisphere::North
    };

    let coordinate = utm::to_canonical(&UtmValue {
        zone,
        hemisphere,
        easting,
        northing,
    })
    .map_err(|e| ConversionError::domain(notation, e.to_string()))?;

    check_band(reference, band, coordinate.latitude())?;
    Ok(coordinate)
}

/// Latitude span of a band. X is 12° tall.
fn band_bounds(band: usize) -> (f64, f64) {
    let south = -80.0 + 8.0 * band as f64;
    let north = if band == BANDS.len() - 1 {
        utm::MAX_LATITUDE
    } else {
        south + 8.0
    };
    (south, north)
}

/// The decoded south-west corner must lie in the band the reference names.
/// A cell may start south of its band by up to its own height, and grid
/// convergence moves the corner by a little more.
fn check_band(
    reference: &GridReference,
    band: usize,
    latitude: f64,
) -> Result<(), ConversionError> {
    let (south, north) = band_bounds(band);
    let cell = reference.precision.cell() / METRES_PER_DEGREE;
    if latitude < south - cell - BAND_SLACK || latitude > north + BAND_SLACK {
        return Err(ParseError::out_of_range(
            "latitude band",
            format!("{} does not contain latitude {latitude:.4}", reference.band),
        )
        .into());
    }
    Ok(())
}

pub fn from_canonical(
    coordinate: Coordinate,
    precision: GridPrecision,
    notation: Notation,
) -> Result<GridReference, ConversionError> {
    utm::check_latitude(notation, coordinate.latitude())?;
    let utm = utm::project(coordinate);

    let columns = column_set(utm.zone).as_bytes();
    let column = ((utm.easting / SQUARE).floor() as usize)
        .checked_sub(1)
        .filter(|c| *c < columns.len())
        .ok_or_else(|| {
            ConversionError::domain(notation, format!("easting {} outside the zone", utm.easting))
        })?;

    let row = ((utm.northing / SQUARE).floor() as usize + row_offset(utm.zone)) % ROWS.len();

    // A micrometre of slack keeps a decoded cell corner inside its own cell.
    let cell = precision.cell();
    let truncate = |metres: f64| {
        let digits = ((metres % SQUARE + 1e-6) / cell)
            .floor()
            .min(SQUARE / cell - 1.0);
        (digits * cell) as u32
    };

    Ok(GridReference {
        zone: utm.zone,
        band: band_for(coordinate.latitude()),
        square: [columns[column] as char, ROWS.as_bytes()[row] as char],
        easting: truncate(utm.easting),
        northing: truncate(utm.northing),
        precision,
    })
}

pub fn fields(reference: &GridReference) -> Vec<NamedField> {
    vec![
        NamedField::new(FieldName::Gzd, reference.gzd()),
        NamedField::new(FieldName::GridSquare, reference.square_id()),
        NamedField::new(FieldName::Easting, reference.easting_digits()),
        NamedField::new(FieldName::Northing, reference.northing_digits()),
    ]
}

impl FieldSource for GridReference {
    fn scalar(&self, slot: usize) -> Option<Scalar> {
        let cell = self.precision.cell();
        match slot {
            0 => Some(Scalar::signed((f64::from(self.easting) / cell).floor())),
            1 => Some(Scalar::signed((f64::from(self.northing) / cell).floor())),
            _ => None,
        }
    }

    fn text(&self, slot: usize) -> Option<Cow<'_, str>> {
        match slot {
            0 => Some(Cow::Owned(self.gzd())),
            1 => Some(Cow::Owned(self.square_id())),
            _ => None,
        }
    }

    fn hemisphere(&self, _axis: Axis) -> Option<char> {
        None
    }
}
