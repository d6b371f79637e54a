use crate::prelude::{eprintln, *};
use coordconv_core::{GridPrecision, Notation};
use serde::{Deserialize, Serialize};

use super::{CallToolResult, Content, JsonRpcError};

fn parse_arguments<T: for<'de> Deserialize<'de>>(
    arguments: Option<serde_json::Value>,
) -> Result<T, JsonRpcError> {
    serde_json::from_value(arguments.unwrap_or(serde_json::Value::Null))
        .map_err(JsonRpcError::invalid_params)
}

fn parse_notation(text: &str) -> Result<Notation, JsonRpcError> {
    text.parse().map_err(JsonRpcError::invalid_params)
}

fn parse_precision(text: Option<&str>) -> Result<GridPrecision, JsonRpcError> {
    text.map_or(Ok(GridPrecision::default()), |text| {
        text.parse().map_err(JsonRpcError::invalid_params)
    })
}

/// Wraps the outcome of a tool run. Conversion failures are reported to the
/// client as a tool error, not a protocol error.
fn tool_result<T: Serialize>(outcome: Result<T>) -> Result<serde_json::Value, JsonRpcError> {
    let result = match outcome {
        Ok(data) => CallToolResult {
            content: vec![Content::Text {
                text: serde_json::to_string_pretty(&data).map_err(|e| JsonRpcError {
                    code: -32603,
                    message: format!("Serialization error: {e}"),
                    data: None,
                })?,
            }],
            is_error: None,
        },
        Err(error) => CallToolResult {
            content: vec![Content::Text {
                text: format!("{error:#}"),
            }],
            is_error: Some(true),
        },
    };

    serde_json::to_value(result).map_err(JsonRpcError::internal)
}

pub fn handle_convert(
    arguments: Option<serde_json::Value>,
    global: &crate::Global,
) -> Result<serde_json::Value, JsonRpcError> {
    #[derive(Deserialize)]
    struct ConvertArgs {
        input: String,
        from: String,
        to: String,
        template: Option<String>,
        precision: Option<String>,
    }

    let args: ConvertArgs = parse_arguments(arguments)?;
    let from = parse_notation(&args.from)?;
    let to = parse_notation(&args.to)?;
    let options = coordconv_core::ConvertOptions {
        template: args.template,
        precision: parse_precision(args.precision.as_deref())?,
        strict_template: false,
    };

    if global.verbose {
        eprintln!(
            "Calling coord_convert: input={:?}, from={from}, to={to}, precision={}",
            args.input, options.precision
        );
    }

    tool_result(crate::coord::convert::convert_data(
        &args.input,
        from,
        to,
        &options,
    ))
}

pub fn handle_fields(
    arguments: Option<serde_json::Value>,
    global: &crate::Global,
) -> Result<serde_json::Value, JsonRpcError> {
    #[derive(Deserialize)]
    struct FieldsArgs {
        input: String,
        from: String,
        to: Option<String>,
        precision: Option<String>,
    }

    let args: FieldsArgs = parse_arguments(arguments)?;
    let from = parse_notation(&args.from)?;
    let to = args.to.as_deref().map(parse_notation).transpose()?;
    let precision = parse_precision(args.precision.as_deref())?;

    if global.verbose {
        eprintln!(
            "Calling coord_fields: input={:?}, from={from}, to={to:?}",
            args.input
        );
    }

    tool_result(crate::coord::fields::fields_data(
        &args.input,
        from,
        to,
        precision,
    ))
}
