//! Decimal degrees.

use std::borrow::Cow;
use std::sync::LazyLock;

use crate::coordinate::{Axis, Coordinate};
use crate::error::ParseError;
use crate::fields::{FieldName, NamedField};
use crate::grammar::{Grammar, GrammarMatch};
use crate::notation::Notation;
use crate::template::{FieldSource, Scalar, Selector};

pub const DEFAULT_TEMPLATE: &str = "x = X-0.0000 y = Y-0.0000";

pub const SELECTORS: &[(char, Selector)] = &[
    ('Y', Selector::Scalar(0)),
    ('X', Selector::Scalar(1)),
    ('N', Selector::Hemisphere(Axis::Latitude)),
    ('S', Selector::Hemisphere(Axis::Latitude)),
    ('E', Selector::Hemisphere(Axis::Longitude)),
    ('W', Selector::Hemisphere(Axis::Longitude)),
    ('+', Selector::Plus),
    ('-', Selector::Minus),
];

static PAIR: LazyLock<Grammar> = LazyLock::new(|| {
    Grammar::new(
        Notation::Dd,
        r"^\+*(?P<lat_pre>[NS])?(?P<lat>[-+0-9.]*)[Dd*°\s,]*(?P<lat_post>[NS])?[+,;:\s]*(?P<lon_pre>[EW])?(?P<lon>[-+0-9.]*)[Dd*°\s]*(?P<lon_post>[EW])?",
    )
});

static LATITUDE: LazyLock<Grammar> = LazyLock::new(|| {
    Grammar::new(
        Notation::Dd,
        r"^\+*(?P<pre>[NS])?\s*(?P<value>[-+0-9.]*)[Dd*°\s]*(?P<post>[NS])?",
    )
});

static LONGITUDE: LazyLock<Grammar> = LazyLock::new(|| {
    Grammar::new(
        Notation::Dd,
        r"^\+*(?P<pre>[EW])?\s*(?P<value>[-+0-9.]*)[Dd*°\s]*(?P<post>[EW])?",
    )
});

/// Parse a latitude/longitude pair such as `40.446N 79.982W`, `N40.446 W79.982`
/// or `40.446, -79.982`.
pub fn parse(text: &str) -> Result<Coordinate, ParseError> {
    let m = PAIR.match_full(text)?;
    let latitude = axis_value(&m, Axis::Latitude, "lat", "lat_pre", "lat_post")?;
    let longitude = axis_value(&m, Axis::Longitude, "lon", "lon_pre", "lon_post")?;
    Coordinate::new(latitude, longitude)
}

/// Parse a latitude on its own: `40S`, `S40` and `-40` are the same value.
pub fn parse_latitude(text: &str) -> Result<f64, ParseError> {
    let m = LATITUDE.match_full(text)?;
    axis_value(&m, Axis::Latitude, "value", "pre", "post")
}

pub fn parse_longitude(text: &str) -> Result<f64, ParseError> {
    let m = LONGITUDE.match_full(text)?;
    axis_value(&m, Axis::Longitude, "value", "pre", "post")
}

fn axis_value(
    m: &GrammarMatch<'_>,
    axis: Axis,
    group: &str,
    before: &str,
    after: &str,
) -> Result<f64, ParseError> {
    let value = m.number(group, axis.name())?;
    let hemisphere = m.hemisphere(before, after)?;

    let (_, negative) = axis.hemispheres();
    let value = if hemisphere == Some(negative) {
        -value.abs()
    } else {
        value
    };

    if value.abs() > axis.limit() {
        return Err(ParseError::out_of_range(axis.name(), value));
    }
    Ok(value)
}

pub fn fields(coordinate: &Coordinate) -> Vec<NamedField> {
    vec![
        NamedField::new(FieldName::Lat, coordinate.latitude().to_string()),
        NamedField::new(FieldName::Lon, coordinate.longitude().to_string()),
    ]
}

impl FieldSource for Coordinate {
    fn scalar(&self, slot: usize) -> Option<Scalar> {
        match slot {
            0 => Some(Scalar::signed(self.latitude())),
            1 => Some(Scalar::signed(self.longitude())),
            _ => None,
        }
    }

    fn text(&self, _slot: usize) -> Option<Cow<'_, str>> {
        None
    }

    fn hemisphere(&self, axis: Axis) -> Option<char> {
        let value = match axis {
            Axis::Latitude => self.latitude(),
            Axis::Longitude => self.longitude(),
        };
        let (positive, negative) = axis.hemispheres();
        Some(if value > 0.0 { positive } else { negative })
    }

    fn leading(&self) -> Option<Scalar> {
        self.scalar(0)
    }
}
