//! Degrees, minutes and seconds.

use std::borrow::Cow;
use std::sync::LazyLock;

use serde::Serialize;

use crate::coordinate::{Axis, Coordinate};
use crate::ddm::{axis_sign, check_degrees, check_sexagesimal, check_total, hemisphere_letter, negative};
use crate::error::ParseError;
use crate::fields::{FieldName, NamedField};
use crate::grammar::Grammar;
use crate::notation::Notation;
use crate::template::{FieldSource, NumberFormat, Scalar, Selector, Sign, Template};

pub const DEFAULT_TEMPLATE: &str = "A0°B0'C0.0##\"N X0°Y0'Z0.0##\"E";
const LATITUDE_TEMPLATE: &str = "A0°B0'C0.0##\"N";
const LONGITUDE_TEMPLATE: &str = "X0°Y0'Z0.0##\"E";

pub const SELECTORS: &[(char, Selector)] = &[
    ('A', Selector::Scalar(0)),
    ('B', Selector::Scalar(1)),
    ('C', Selector::Scalar(2)),
    ('X', Selector::Scalar(3)),
    ('Y', Selector::Scalar(4)),
    ('Z', Selector::Scalar(5)),
    ('N', Selector::Hemisphere(Axis::Latitude)),
    ('S', Selector::Hemisphere(Axis::Latitude)),
    ('E', Selector::Hemisphere(Axis::Longitude)),
    ('W', Selector::Hemisphere(Axis::Longitude)),
    ('+', Selector::Plus),
    ('-', Selector::Minus),
];

static GRAMMAR: LazyLock<Grammar> = LazyLock::new(|| {
    Grammar::new(
        Notation::Dms,
        concat!(
            r"^(?P<lat_pre>[NS])?\s*(?P<lat_sign>[-+])?(?P<lat_deg>[0-9.]+)(?:\s*[°*Dd:]\s*|\s+)",
            r"(?P<lat_min>[0-9.]+)(?:\s*['′:]\s*|\s+)",
            r#"(?P<lat_sec>[0-9.]+)(?:\s*(?:''|"|″))?\s*(?P<lat_post>[NS])?"#,
            r"[,;\s]*",
            r"(?P<lon_pre>[EW])?\s*(?P<lon_sign>[-+])?(?P<lon_deg>[0-9.]+)(?:\s*[°*Dd:]\s*|\s+)",
            r"(?P<lon_min>[0-9.]+)(?:\s*['′:]\s*|\s+)",
            r#"(?P<lon_sec>[0-9.]+)(?:\s*(?:''|"|″))?\s*(?P<lon_post>[EW])?"#,
        ),
    )
});

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DegreesMinutesSeconds {
    pub negative: bool,
    pub degrees: u32,
    pub minutes: u32,
    pub seconds: f64,
}

impl DegreesMinutesSeconds {
    pub fn from_degrees(value: f64) -> Self {
        let magnitude = value.abs();
        let mut degrees = magnitude.floor();
        let total_minutes = (magnitude - degrees) * 60.0;
        let mut minutes = total_minutes.floor();
        let mut seconds = (total_minutes - minutes) * 60.0;

        if seconds >= 60.0 {
            minutes += 1.0;
            seconds = 0.0;
        }
        if minutes >= 60.0 {
            degrees += 1.0;
            minutes = 0.0;
        }

        DegreesMinutesSeconds {
            negative: value < 0.0,
            degrees: degrees as u32,
            minutes: minutes as u32,
            seconds,
        }
    }

    pub fn to_degrees(&self) -> f64 {
        let magnitude =
            f64::from(self.degrees) + f64::from(self.minutes) / 60.0 + self.seconds / 3600.0;
        if self.negative {
            -magnitude
        } else {
            magnitude
        }
    }

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

    /// Carry seconds that `format` would print as 60 into the minutes, and a
    /// full 60' into the degrees.
    fn carried(&self, format: Option<&NumberFormat>) -> Self {
        let mut carried = *self;
        if matches!(format, Some(format) if format.rounded(self.seconds) >= 60.0) {
            carried.seconds = 0.0;
            carried.minutes += 1;
        }
        if carried.minutes >= 60 {
            carried.minutes -= 60;
            carried.degrees += 1;
        }
        carried
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DmsValue {
    pub latitude: DegreesMinutesSeconds,
    pub longitude: DegreesMinutesSeconds,
}

impl DmsValue {
    /// The value as `template` prints it, with rounded-up seconds carried so
    /// that no axis reads 60" or 60'.
    pub fn carried(&self, template: &Template) -> DmsValue {
        DmsValue {
            latitude: self.latitude.carried(template.format_for(2)),
            longitude: self.longitude.carried(template.format_for(5)),
        }
    }
}

pub fn render(value: &DmsValue, template: &Template) -> String {
    template.render(&value.carried(template))
}

pub fn parse(text: &str) -> Result<DmsValue, ParseError> {
    let m = GRAMMAR.match_full(text)?;

    let latitude = DegreesMinutesSeconds {
        negative: negative(&m, Axis::Latitude, "lat_sign", "lat_pre", "lat_post")?,
        degrees: m.whole("lat_deg", "latitude degrees")?,
        minutes: m.whole("lat_min", "latitude minutes")?,
        seconds: m.number("lat_sec", "latitude seconds")?,
    };
    let longitude = DegreesMinutesSeconds {
        negative: negative(&m, Axis::Longitude, "lon_sign", "lon_pre", "lon_post")?,
        degrees: m.whole("lon_deg", "longitude degrees")?,
        minutes: m.whole("lon_min", "longitude minutes")?,
        seconds: m.number("lon_sec", "longitude seconds")?,
    };

    check_axis(Axis::Latitude, &latitude)?;
    check_axis(Axis::Longitude, &longitude)?;

    Ok(DmsValue {
        latitude,
        longitude,
    })
}

fn check_axis(axis: Axis, value: &DegreesMinutesSeconds) -> Result<(), ParseError> {
    check_degrees(axis, value.degrees)?;
    check_sexagesimal("minutes", f64::from(value.minutes))?;
    check_sexagesimal("seconds", value.seconds)?;
    check_total(axis, value.to_degrees())
}

pub fn to_canonical(value: &DmsValue) -> Result<Coordinate, ParseError> {
    Coordinate::new(value.latitude.to_degrees(), value.longitude.to_degrees())
}

pub fn from_canonical(coordinate: Coordinate) -> DmsValue {
    DmsValue {
        latitude: DegreesMinutesSeconds::from_degrees(coordinate.latitude()),
        longitude: DegreesMinutesSeconds::from_degrees(coordinate.longitude()),
    }
}

pub fn fields(value: &DmsValue) -> Vec<NamedField> {
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

impl FieldSource for DmsValue {
    fn scalar(&self, slot: usize) -> Option<Scalar> {
        let (part, field) = match slot {
            0 => (&self.latitude, f64::from(self.latitude.degrees)),
            1 => (&self.latitude, f64::from(self.latitude.minutes)),
            2 => (&self.latitude, self.latitude.seconds),
            3 => (&self.longitude, f64::from(self.longitude.degrees)),
            4 => (&self.longitude, f64::from(self.longitude.minutes)),
            5 => (&self.longitude, self.longitude.seconds),
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
