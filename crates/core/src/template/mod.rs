//! Format template compiler and interpreter.
//!
//! A template is scanned left to right. Selector characters bind the numeric
//! placeholder run that follows them to one of the value's scalars; every
//! notation supplies its own `(char, Selector)` table so a single interpreter
//! serves all of them.
//!
//! ```
//! use coordconv_core::template::{FieldSource, Scalar, Selector, Template};
//! use coordconv_core::coordinate::Axis;
//! use std::borrow::Cow;
//!
//! struct Pair(f64, f64);
//!
//! impl FieldSource for Pair {
//!     fn scalar(&self, slot: usize) -> Option<Scalar> {
//!         [self.0, self.1].get(slot).copied().map(Scalar::signed)
//!     }
//!     fn text(&self, _slot: usize) -> Option<Cow<'_, str>> {
//!         None
//!     }
//!     fn hemisphere(&self, _axis: Axis) -> Option<char> {
//!         None
//!     }
//! }
//!
//! const TABLE: &[(char, Selector)] = &[('Y', Selector::Scalar(0)), ('X', Selector::Scalar(1))];
//! let template = Template::compile("Y0.0, X0.0", TABLE);
//! assert_eq!(template.render(&Pair(40.446, -79.982)), "40.4, 80.0");
//! ```

pub mod number;

use std::borrow::Cow;

use crate::coordinate::Axis;
use crate::error::TemplateError;

pub use number::NumberFormat;

/// What a template character means for a given notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector {
    /// Select a numeric scalar; the following placeholder run formats its magnitude.
    Scalar(usize),
    /// Emit a text field verbatim.
    Text(usize),
    /// Emit the positive or negative hemisphere letter of an axis.
    Hemisphere(Axis),
    /// Emit `+` when the current scalar is strictly positive.
    Plus,
    /// Emit `-` when the current scalar is strictly negative.
    Minus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    Negative,
    Zero,
    Positive,
}

/// A numeric field as seen by the interpreter: a magnitude and the sign that
/// `+`/`-` directives report for it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scalar {
    pub magnitude: f64,
    pub sign: Sign,
}

impl Scalar {
    pub fn new(magnitude: f64, sign: Sign) -> Self {
        Scalar {
            magnitude: magnitude.abs(),
            sign,
        }
    }

    pub fn signed(value: f64) -> Self {
        let sign = if value > 0.0 {
            Sign::Positive
        } else if value < 0.0 {
            Sign::Negative
        } else {
            Sign::Zero
        };
        Scalar::new(value, sign)
    }
}

/// The fields a notation value exposes to templates.
pub trait FieldSource {
    fn scalar(&self, slot: usize) -> Option<Scalar>;

    fn text(&self, slot: usize) -> Option<Cow<'_, str>>;

    fn hemisphere(&self, axis: Axis) -> Option<char>;

    /// Scalar that sign directives use before anything is selected.
    fn leading(&self) -> Option<Scalar> {
        None
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Op {
    Literal(char),
    Number { slot: usize, format: NumberFormat },
    Text(usize),
    Hemisphere(Axis),
    Plus(Option<usize>),
    Minus(Option<usize>),
}

/// A compiled template; rendering it holds no state between calls.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    ops: Vec<Op>,
}

impl Template {
    /// Compile leniently: anything the interpreter cannot bind passes through
    /// or is dropped, never rejected.
    pub fn compile(text: &str, selectors: &[(char, Selector)]) -> Self {
        match compile(text, selectors, false) {
            Ok(template) => template,
            Err(_) => unreachable!("lenient compilation never fails"),
        }
    }

    /// Compile and reject scalar selectors without a numeric run and runs
    /// with more than one decimal point.
    pub fn compile_strict(
        text: &str,
        selectors: &[(char, Selector)],
    ) -> Result<Self, TemplateError> {
        compile(text, selectors, true)
    }

    /// The coarsest numeric run bound to `slot`, if the template prints it.
    pub fn format_for(&self, slot: usize) -> Option<&NumberFormat> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Number { slot: s, format } if *s == slot => Some(format),
                _ => None,
            })
            .min_by_key(|format| format.fraction_digits())
    }

    pub fn render(&self, fields: &dyn FieldSource) -> String {
        let mut out = String::new();
        let current = |slot: Option<usize>| match slot {
            Some(slot) => fields.scalar(slot),
            None => fields.leading(),
        };

        for op in &self.ops {
            match op {
                Op::Literal(c) => out.push(*c),
                Op::Number { slot, format } => {
                    if let Some(scalar) = fields.scalar(*slot) {
                        out.push_str(&format.format(scalar.magnitude));
                    }
                }
                Op::Text(slot) => {
                    if let Some(text) = fields.text(*slot) {
                        out.push_str(&text);
                    }
                }
                Op::Hemisphere(axis) => {
                    if let Some(letter) = fields.hemisphere(*axis) {
                        out.push(letter);
                    }
                }
                Op::Plus(slot) => {
                    if matches!(current(*slot), Some(s) if s.sign == Sign::Positive) {
                        out.push('+');
                    }
                }
                Op::Minus(slot) => {
                    if matches!(current(*slot), Some(s) if s.sign == Sign::Negative) {
                        out.push('-');
                    }
                }
            }
        }

        out
    }
}

fn is_placeholder(c: char) -> bool {
    matches!(c, '#' | '0' | '.')
}

fn compile(
    text: &str,
    selectors: &[(char, Selector)],
    strict: bool,
) -> Result<Template, TemplateError> {
    let lookup = |c: char| {
        selectors
            .iter()
            .find(|(ch, _)| *ch == c)
            .map(|(_, selector)| *selector)
    };
    let dangling = |position: usize| TemplateError {
        position,
        reason: "selector is not followed by a numeric field".to_string(),
    };

    let mut ops = Vec::new();
    let mut selected: Option<(usize, usize)> = None; // (slot, position)
    let mut awaiting = false;
    let mut run: Option<(usize, String)> = None; // (position, placeholders)

    for (position, c) in text.chars().enumerate() {
        let placeholder = is_placeholder(c);

        if awaiting && placeholder {
            run = Some((position, String::new()));
            awaiting = false;
        }

        if let Some((start, mut placeholders)) = run.take() {
            if placeholder {
                placeholders.push(c);
                run = Some((start, placeholders));
                continue;
            }
            ops.push(close_run(selected, start, &placeholders, strict)?);
        }

        match lookup(c) {
            Some(Selector::Scalar(slot)) => {
                if strict && awaiting {
                    return Err(dangling(selected.map(|(_, p)| p).unwrap_or(position)));
                }
                selected = Some((slot, position));
                awaiting = true;
            }
            Some(Selector::Text(slot)) => ops.push(Op::Text(slot)),
            Some(Selector::Hemisphere(axis)) => ops.push(Op::Hemisphere(axis)),
            Some(Selector::Plus) => ops.push(Op::Plus(selected.map(|(slot, _)| slot))),
            Some(Selector::Minus) => ops.push(Op::Minus(selected.map(|(slot, _)| slot))),
            None => ops.push(Op::Literal(c)),
        }
    }

    // A run still open at the end of the template is closed, not an error.
    if let Some((start, placeholders)) = run.take() {
        ops.push(close_run(selected, start, &placeholders, strict)?);
    }

    if strict && awaiting {
        let position = selected.map(|(_, p)| p).unwrap_or_default();
        return Err(dangling(position));
    }

    Ok(Template { ops })
}

fn close_run(
    selected: Option<(usize, usize)>,
    start: usize,
    placeholders: &str,
    strict: bool,
) -> Result<Op, TemplateError> {
    let format = NumberFormat::parse(placeholders);
    if strict && format.points() > 1 {
        return Err(TemplateError {
            position: start,
            reason: format!("numeric field '{placeholders}' has more than one decimal point"),
        });
    }

    // A run only opens after a scalar selector armed it.
    let slot = selected.map(|(slot, _)| slot).unwrap_or_default();
    Ok(Op::Number { slot, format })
}
