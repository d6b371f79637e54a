use std::fmt;

use serde::Serialize;

/// Stable names for the structured fields of a notation value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FieldName {
    #[serde(rename = "Lat")]
    Lat,
    #[serde(rename = "Lon")]
    Lon,
    #[serde(rename = "GZD")]
    Gzd,
    #[serde(rename = "Grid Sq")]
    GridSquare,
    Easting,
    Northing,
    Zone,
    Quadrant,
    Key,
}

impl FieldName {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldName::Lat => "Lat",
            FieldName::Lon => "Lon",
            FieldName::Gzd => "GZD",
            FieldName::GridSquare => "Grid Sq",
            FieldName::Easting => "Easting",
            FieldName::Northing => "Northing",
            FieldName::Zone => "Zone",
            FieldName::Quadrant => "Quadrant",
            FieldName::Key => "Key",
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedField {
    pub name: FieldName,
    pub value: String,
}

impl NamedField {
    pub fn new(name: FieldName, value: impl Into<String>) -> Self {
        NamedField {
            name,
            value: value.into(),
        }
    }
}

/// Look up a field by name in an extracted field list.
pub fn get(fields: &[NamedField], name: FieldName) -> Option<&str> {
    fields
        .iter()
        .find(|field| field.name == name)
        .map(|field| field.value.as_str())
}
