//! Tool registry for the vox gateway
//!
//! Tools are a closed set of named capabilities. Each takes a single string
//! argument and reports success or failure through [`ToolResult`] — a tool
//! body never lets an error escape to the router.

mod arxiv;
mod calculate;
mod weather;

pub use arxiv::ArxivSearchTool;
pub use calculate::Calculator;
pub use weather::WeatherTool;

use async_trait::async_trait;
use serde::Serialize;

/// Alias table: alternative/misremembered tool names the model may emit,
/// mapped to canonical registry names. Applied once before dispatch.
const ALIASES: &[(&str, &str)] = &[
    ("recent_papers", "search_arxiv"),
    ("search_papers", "search_arxiv"),
    ("find_papers", "search_arxiv"),
    ("arxiv_search", "search_arxiv"),
];

/// Resolve a model-supplied tool name through the alias table.
///
/// Unmapped names pass through unchanged.
#[must_use]
pub fn resolve_alias(name: &str) -> &str {
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == name)
        .map_or(name, |(_, canonical)| *canonical)
}

/// The closed set of dispatchable tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolName {
    /// Evaluate a symbolic arithmetic expression
    Calculate,
    /// Current weather conditions for a location
    GetWeather,
    /// arXiv literature search
    SearchArxiv,
}

impl ToolName {
    /// Canonical wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Calculate => "calculate",
            Self::GetWeather => "get_weather",
            Self::SearchArxiv => "search_arxiv",
        }
    }

    /// Parse a canonical name. Aliases must already be resolved; any name
    /// outside the set is the caller's "unknown function" error path.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "calculate" => Some(Self::Calculate),
            "get_weather" => Some(Self::GetWeather),
            "search_arxiv" => Some(Self::SearchArxiv),
            _ => None,
        }
    }

    /// The primary argument key each tool reads from a call's `arguments`.
    #[must_use]
    pub const fn argument_key(self) -> &'static str {
        match self {
            Self::Calculate => "expression",
            Self::GetWeather => "location",
            Self::SearchArxiv => "query",
        }
    }
}

impl std::fmt::Display for ToolName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of executing a tool.
///
/// `content` carries the human-readable answer on success and a descriptive
/// error message on failure; it is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolResult {
    /// Whether the tool succeeded
    pub ok: bool,
    /// Answer text or error description
    pub content: String,
}

impl ToolResult {
    /// Successful result with answer text.
    #[must_use]
    pub fn success(content: impl Into<String>) -> Self {
        Self {
            ok: true,
            content: content.into(),
        }
    }

    /// Failed result with an error description.
    #[must_use]
    pub fn failure(content: impl Into<String>) -> Self {
        Self {
            ok: false,
            content: content.into(),
        }
    }
}

/// Static registry entry advertised to the language model.
///
/// One-way interface: specs feed the system prompt and the `/tools` endpoint
/// but are not enforced at dispatch time — tools default missing arguments
/// defensively instead.
#[derive(Debug, Clone, Serialize)]
pub struct ToolSpec {
    /// Canonical tool name
    pub name: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// Argument name → type
    pub arguments: &'static [(&'static str, &'static str)],
    /// Required argument names
    pub required: &'static [&'static str],
}

/// The fixed capability set, defined once at process start.
#[must_use]
pub const fn tool_specs() -> &'static [ToolSpec] {
    &[
        ToolSpec {
            name: "search_arxiv",
            description: "Search arXiv for a topic and return a short snippet.",
            arguments: &[("query", "string")],
            required: &["query"],
        },
        ToolSpec {
            name: "calculate",
            description: "Evaluate a mathematical expression using standard math syntax.",
            arguments: &[("expression", "string")],
            required: &["expression"],
        },
        ToolSpec {
            name: "get_weather",
            description: "Get the current weather for a given city/location.",
            arguments: &[("location", "string")],
            required: &[],
        },
    ]
}

/// Render the capability set as the JSON object handed to the model:
/// `{"<name>": {"description": ..., "arguments": {...}, "required": [...]}}`.
#[must_use]
pub fn specs_json() -> serde_json::Value {
    let mut specs = serde_json::Map::new();
    for spec in tool_specs() {
        let mut arguments = serde_json::Map::new();
        for (arg, ty) in spec.arguments {
            arguments.insert((*arg).to_string(), serde_json::Value::String((*ty).to_string()));
        }
        specs.insert(
            spec.name.to_string(),
            serde_json::json!({
                "description": spec.description,
                "arguments": arguments,
                "required": spec.required,
            }),
        );
    }
    serde_json::Value::Object(specs)
}

/// Dispatch seam between the router and tool implementations.
///
/// Implementations must never panic by contract; all failure modes are
/// reported through `ToolResult`. The router keeps a catch-all anyway.
#[async_trait]
pub trait ToolDispatch: Send + Sync {
    /// Execute a tool with its single string argument.
    async fn execute(&self, tool: ToolName, argument: &str) -> ToolResult;
}

/// Production tool set holding the three built-in tools.
pub struct ToolSet {
    calculator: Calculator,
    weather: WeatherTool,
    arxiv: ArxivSearchTool,
}

impl ToolSet {
    /// Build the tool set.
    ///
    /// `default_location` is the weather fallback when a call carries no
    /// location.
    #[must_use]
    pub fn new(default_location: String) -> Self {
        Self {
            calculator: Calculator::new(),
            weather: WeatherTool::new(default_location),
            arxiv: ArxivSearchTool::new(),
        }
    }
}

#[async_trait]
impl ToolDispatch for ToolSet {
    async fn execute(&self, tool: ToolName, argument: &str) -> ToolResult {
        match tool {
            ToolName::Calculate => self.calculator.evaluate(argument),
            ToolName::GetWeather => self.weather.current(argument).await,
            ToolName::SearchArxiv => self.arxiv.search(argument).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_resolve_to_search_arxiv() {
        assert_eq!(resolve_alias("recent_papers"), "search_arxiv");
        assert_eq!(resolve_alias("search_papers"), "search_arxiv");
        assert_eq!(resolve_alias("find_papers"), "search_arxiv");
        assert_eq!(resolve_alias("arxiv_search"), "search_arxiv");
    }

    #[test]
    fn unmapped_names_pass_through() {
        assert_eq!(resolve_alias("calculate"), "calculate");
        assert_eq!(resolve_alias("no_such_tool"), "no_such_tool");
    }

    #[test]
    fn tool_name_round_trip() {
        for tool in [ToolName::Calculate, ToolName::GetWeather, ToolName::SearchArxiv] {
            assert_eq!(ToolName::parse(tool.as_str()), Some(tool));
        }
        assert_eq!(ToolName::parse("recent_papers"), None);
    }

    #[test]
    fn specs_json_shape() {
        let specs = specs_json();
        assert!(specs["calculate"]["description"].is_string());
        assert_eq!(specs["calculate"]["arguments"]["expression"], "string");
        assert_eq!(specs["get_weather"]["required"].as_array().unwrap().len(), 0);
        assert_eq!(specs["search_arxiv"]["required"][0], "query");
    }
}
