//! MCP tools registered on the server and helper functions for the router.

pub mod calculator;
pub mod envelope;
pub mod geocode;
pub mod greet;
pub mod image;
pub mod schema;
pub mod time;
pub mod weather;

use rmcp::handler::server::router::tool::ToolRouter;
use serde::Serialize;

pub use calculator::{CalculatorRequest, Operator, CALCULATOR_TOOL_ID};
pub use geocode::{GeocodeRequest, GEOCODE_TOOL_ID};
pub use greet::{GreetRequest, Language, GREET_TOOL_ID};
pub use image::{ImageRequest, IMAGE_TOOL_ID};
pub use time::{TimeRequest, TIME_TOOL_ID};
pub use weather::{WeatherRequest, WEATHER_TOOL_ID};

pub type ServerToolRouter<S> = ToolRouter<S>;

/// Helper for building a tool router.
pub fn build_router<S>(builder: impl FnOnce() -> ServerToolRouter<S>) -> ServerToolRouter<S>
where
    S: Send + Sync + 'static,
{
    builder()
}

/// Name and description of a registered tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ToolSummary {
    pub name: &'static str,
    pub description: &'static str,
}

/// Tool catalog published by the `server-info` resource.
///
/// Keep in sync with the `#[tool]` attributes in `server::runtime::tool_registry`.
pub const TOOL_CATALOG: &[ToolSummary] = &[
    ToolSummary {
        name: GREET_TOOL_ID,
        description: "Greet someone by name in Korean or English",
    },
    ToolSummary {
        name: CALCULATOR_TOOL_ID,
        description: "Apply +, -, * or / to two numbers",
    },
    ToolSummary {
        name: TIME_TOOL_ID,
        description: "Show the current date and time in an IANA timezone",
    },
    ToolSummary {
        name: GEOCODE_TOOL_ID,
        description: "Look up the coordinates of an address",
    },
    ToolSummary {
        name: WEATHER_TOOL_ID,
        description: "Show current weather and a daily forecast for coordinates",
    },
    ToolSummary {
        name: IMAGE_TOOL_ID,
        description: "Generate an image from a text prompt",
    },
];
