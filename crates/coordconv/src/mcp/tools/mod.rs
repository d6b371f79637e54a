mod coord;

use serde::{Deserialize, Serialize};

// Re-export types needed by tool handlers
pub use super::{JsonRpcError, Tool};

// MCP Protocol types for tools
#[derive(Debug, Serialize)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct ServerCapabilities {
    pub tools: Option<ToolsCapability>,
}

#[derive(Debug, Serialize)]
pub struct ToolsCapability {}

#[derive(Debug, Serialize)]
pub struct InitializeResult {
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,
    pub capabilities: ServerCapabilities,
    #[serde(rename = "serverInfo")]
    pub server_info: ServerInfo,
}

#[derive(Debug, Serialize)]
pub struct ToolsList {
    pub tools: Vec<Tool>,
}

#[derive(Debug, Deserialize)]
pub struct CallToolParams {
    pub name: String,
    pub arguments: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct CallToolResult {
    pub content: Vec<Content>,
    #[serde(rename = "isError", skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum Content {
    #[serde(rename = "text")]
    Text { text: String },
}

pub fn handle_initialize() -> Result<serde_json::Value, JsonRpcError> {
    let result = InitializeResult {
        protocol_version: "2024-11-05".to_string(),
        capabilities: ServerCapabilities {
            tools: Some(ToolsCapability {}),
        },
        server_info: ServerInfo {
            name: "coordconv".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
    };

    serde_json::to_value(result).map_err(JsonRpcError::internal)
}

pub fn handle_tools_list() -> Result<serde_json::Value, JsonRpcError> {
    let notations = serde_json::json!(["dd", "ddm", "dms", "mgrs", "usng", "utm", "gars"]);
    let tools = vec![
        Tool {
            name: "coord_convert".to_string(),
            description: "Convert a geographic coordinate between notations: DD (decimal degrees), DDM (degrees decimal minutes), DMS (degrees minutes seconds), MGRS, USNG, UTM and GARS. Returns the formatted text, the canonical latitude/longitude and the structured fields of the result.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "input": {
                        "type": "string",
                        "description": "Coordinate text (e.g., '40.446N 79.982W', '18SUJ2348706483', '006AG39')"
                    },
                    "from": {
                        "type": "string",
                        "enum": notations,
                        "description": "Notation of the input"
                    },
                    "to": {
                        "type": "string",
                        "enum": notations,
                        "description": "Notation to convert to"
                    },
                    "template": {
                        "type": "string",
                        "description": "Output format template (e.g., 'Y0.000N X0.000E' for DD). Defaults to the target notation's standard format."
                    },
                    "precision": {
                        "type": "string",
                        "description": "Grid precision for MGRS/USNG output: 1m, 10m, 100m, 1km, 10km or 100km (default: 1m)"
                    }
                },
                "required": ["input", "from", "to"]
            }),
        },
        Tool {
            name: "coord_fields".to_string(),
            description: "Break a coordinate into its named fields (e.g., GZD, Grid Sq, Easting, Northing for MGRS; Lat/Lon for DD). Optionally convert to another notation first.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "input": {
                        "type": "string",
                        "description": "Coordinate text"
                    },
                    "from": {
                        "type": "string",
                        "enum": notations,
                        "description": "Notation of the input"
                    },
                    "to": {
                        "type": "string",
                        "enum": notations,
                        "description": "Convert to this notation before extracting fields (optional)"
                    },
                    "precision": {
                        "type": "string",
                        "description": "Grid precision when converting to MGRS/USNG (default: 1m)"
                    }
                },
                "required": ["input", "from"]
            }),
        },
    ];

    serde_json::to_value(ToolsList { tools }).map_err(JsonRpcError::internal)
}

pub fn handle_tools_call(
    params: Option<serde_json::Value>,
    global: &crate::Global,
) -> Result<serde_json::Value, JsonRpcError> {
    let params: CallToolParams = serde_json::from_value(params.unwrap_or(serde_json::Value::Null))
        .map_err(|e| JsonRpcError {
            code: -32602,
            message: format!("Invalid params: {e}"),
            data: None,
        })?;

    match params.name.as_str() {
        "coord_convert" => coord::handle_convert(params.arguments, global),
        "coord_fields" => coord::handle_fields(params.arguments, global),
        _ => Err(JsonRpcError {
            code: -32602,
            message: format!("Unknown tool: {}", params.name),
            data: None,
        }),
    }
}
