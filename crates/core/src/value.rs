use std::borrow::Cow;

use serde::Serialize;

use crate::coordinate::{Axis, Coordinate};
use crate::ddm::DdmValue;
use crate::dms::DmsValue;
use crate::gars::GarsValue;
use crate::mgrs::{self, GridReference};
use crate::notation::Notation;
use crate::template::{FieldSource, Scalar, Selector, Template};
use crate::utm::UtmValue;
use crate::{dd, ddm, dms, gars, utm};

/// A coordinate in the native fields of one notation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "notation", content = "value", rename_all = "lowercase")]
pub enum NotationValue {
    Dd(Coordinate),
    Ddm(DdmValue),
    Dms(DmsValue),
    Mgrs(GridReference),
    Usng(GridReference),
    Utm(UtmValue),
    Gars(GarsValue),
}

impl NotationValue {
    pub fn notation(&self) -> Notation {
        match self {
            NotationValue::Dd(_) => Notation::Dd,
            NotationValue::Ddm(_) => Notation::Ddm,
            NotationValue::Dms(_) => Notation::Dms,
            NotationValue::Mgrs(_) => Notation::Mgrs,
            NotationValue::Usng(_) => Notation::Usng,
            NotationValue::Utm(_) => Notation::Utm,
            NotationValue::Gars(_) => Notation::Gars,
        }
    }

    pub fn selectors(&self) -> &'static [(char, Selector)] {
        match self {
            NotationValue::Dd(_) => dd::SELECTORS,
            NotationValue::Ddm(_) => ddm::SELECTORS,
            NotationValue::Dms(_) => dms::SELECTORS,
            NotationValue::Mgrs(_) | NotationValue::Usng(_) => mgrs::SELECTORS,
            NotationValue::Utm(_) => utm::SELECTORS,
            NotationValue::Gars(_) => gars::SELECTORS,
        }
    }

    /// The template used when a caller supplies none. Grid notations size
    /// their digit runs to the reference's precision.
    pub fn default_template(&self) -> Cow<'static, str> {
        match self {
            NotationValue::Dd(_) => Cow::Borrowed(dd::DEFAULT_TEMPLATE),
            NotationValue::Ddm(_) => Cow::Borrowed(ddm::DEFAULT_TEMPLATE),
            NotationValue::Dms(_) => Cow::Borrowed(dms::DEFAULT_TEMPLATE),
            NotationValue::Mgrs(r) => Cow::Owned(mgrs::mgrs_template(r.precision)),
            NotationValue::Usng(r) => Cow::Owned(mgrs::usng_template(r.precision)),
            NotationValue::Utm(_) => Cow::Borrowed(utm::DEFAULT_TEMPLATE),
            NotationValue::Gars(_) => Cow::Borrowed(gars::DEFAULT_TEMPLATE),
        }
    }

    /// Render with a compiled template. Sexagesimal values are carried first
    /// so rounding never prints 60 minutes or seconds.
    pub fn render(&self, template: &Template) -> String {
        match self {
            NotationValue::Ddm(v) => ddm::render(v, template),
            NotationValue::Dms(v) => dms::render(v, template),
            _ => template.render(self),
        }
    }

    fn source(&self) -> &dyn FieldSource {
        match self {
            NotationValue::Dd(v) => v,
            NotationValue::Ddm(v) => v,
            NotationValue::Dms(v) => v,
            NotationValue::Mgrs(v) | NotationValue::Usng(v) => v,
            NotationValue::Utm(v) => v,
            NotationValue::Gars(v) => v,
        }
    }
}

impl FieldSource for NotationValue {
    fn scalar(&self, slot: usize) -> Option<Scalar> {
        self.source().scalar(slot)
    }

    fn text(&self, slot: usize) -> Option<Cow<'_, str>> {
        self.source().text(slot)
    }

    fn hemisphere(&self, axis: Axis) -> Option<char> {
        self.source().hemisphere(axis)
    }

    fn leading(&self) -> Option<Scalar> {
        self.source().leading()
    }
}
