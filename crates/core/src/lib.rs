//! Core library for coordconv
//!
//! This crate implements the **Functional Core** of the coordconv application,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! The coordconv project uses a two-crate architecture to enforce separation of concerns:
//!
//! - **`coordconv_core`** (this crate): Pure parsing, conversion and formatting with zero I/O
//! - **`coordconv`**: the CLI and MCP server (the Imperative Shell)
//!
//! ## Functional Core Principles
//!
//! All functions in this crate adhere to these principles:
//!
//! - **Pure functions**: Same input always produces the same output
//! - **No side effects**: No I/O operations, no external state mutations
//! - **Deterministic**: Behavior is predictable and reproducible
//! - **Testable**: Can be tested with simple fixture data, no mocking required
//!
//! The only shared state is the set of compiled grammar regexes, which are
//! built once on first use and never mutated.
//!
//! # Module Organization
//!
//! - [`coordinate`], [`notation`]: the canonical coordinate and the notation tags
//! - [`grammar`]: full-length regex matching shared by every parser
//! - [`dd`], [`ddm`], [`dms`]: geographic notations
//! - [`utm`], [`mgrs`]: projected grids (MGRS and USNG share [`mgrs`])
//! - [`gars`]: the Global Area Reference System
//! - [`template`]: the format template compiler and interpreter
//! - [`value`], [`convert`]: the notation value enum and the conversion façade
//!
//! Each notation module contains:
//!
//! - **A grammar**: the textual forms the parser accepts
//! - **A converter pair**: `to_canonical` and `from_canonical`
//! - **A selector table**: which template characters bind which fields
//! - **Comprehensive tests**: Unit tests using fixture data (no mocking)
//!
//! # Example Usage
//!
//! ```rust
//! use coordconv_core::{convert, Notation};
//!
//! let mgrs = convert("0 0", Notation::Dd, Notation::Mgrs, "").unwrap();
//! assert_eq!(mgrs, "31NAA6602100000");
//!
//! let text = convert("40.446N 79.982W", Notation::Dd, Notation::Dd, "x = X0.0000 y = Y0.0000")
//!     .unwrap();
//! assert_eq!(text, "x = 79.9820 y = 40.4460");
//! ```

pub mod convert;
pub mod coordinate;
pub mod dd;
pub mod ddm;
pub mod dms;
pub mod error;
pub mod fields;
pub mod gars;
pub mod grammar;
pub mod mgrs;
pub mod notation;
pub mod template;
pub mod utm;
pub mod value;

pub use convert::{convert, convert_with, Conversion, ConvertOptions};
pub use coordinate::{Axis, Coordinate};
pub use error::{ConversionError, ErrorKind, ParseError, TemplateError};
pub use fields::{FieldName, NamedField};
pub use mgrs::{GridPrecision, GridReference};
pub use notation::Notation;
pub use value::NotationValue;
