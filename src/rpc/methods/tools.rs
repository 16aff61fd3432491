use serde_json::{Map, Value, json};

use crate::{
    protocol::ErrorShape,
    rpc::methods::{
        LIST_DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, SEARCH_DEFAULT_PAGE_SIZE, parse_optional_params,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParamKind {
    String,
    Integer,
}

impl ParamKind {
    fn label(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
        }
    }
}

#[derive(Debug)]
struct ParamSpec {
    name: &'static str,
    kind: ParamKind,
    description: &'static str,
    required: bool,
    default: Option<u32>,
}

#[derive(Debug)]
struct ToolSpec {
    name: &'static str,
    description: &'static str,
    params: &'static [ParamSpec],
}

const fn game_name(description: &'static str) -> ParamSpec {
    ParamSpec {
        name: "game_name",
        kind: ParamKind::String,
        description,
        required: true,
        default: None,
    }
}

const fn page_size(description: &'static str, default: u32) -> ParamSpec {
    ParamSpec {
        name: "page_size",
        kind: ParamKind::Integer,
        description,
        required: false,
        default: Some(default),
    }
}

const TOOLS: &[ToolSpec] = &[
    ToolSpec {
        name: "rawg_search",
        description: "Search for games by name in the RAWG database",
        params: &[
            ParamSpec {
                name: "query",
                kind: ParamKind::String,
                description: "Name of the game to search",
                required: true,
                default: None,
            },
            page_size(
                "Number of results to return (max 20)",
                SEARCH_DEFAULT_PAGE_SIZE,
            ),
        ],
    },
    ToolSpec {
        name: "rawg_popular",
        description: "Retrieve a list of popular games",
        params: &[page_size(
            "Number of games to retrieve (max 20)",
            LIST_DEFAULT_PAGE_SIZE,
        )],
    },
    ToolSpec {
        name: "rawg_by_genre",
        description: "Search games filtered by a specific genre",
        params: &[
            ParamSpec {
                name: "genre",
                kind: ParamKind::String,
                description: "Game genre (e.g., action, rpg, strategy, shooter)",
                required: true,
                default: None,
            },
            page_size(
                "Number of games to return (max 20)",
                LIST_DEFAULT_PAGE_SIZE,
            ),
        ],
    },
    ToolSpec {
        name: "rawg_by_platform",
        description: "Search games filtered by a specific platform",
        params: &[
            ParamSpec {
                name: "platform",
                kind: ParamKind::String,
                description: "Platform name (e.g., pc, playstation-5, xbox-series-x, nintendo-switch)",
                required: true,
                default: None,
            },
            page_size(
                "Number of games to return (max 20)",
                LIST_DEFAULT_PAGE_SIZE,
            ),
        ],
    },
    ToolSpec {
        name: "rawg_game_details",
        description: "Get detailed information about a specific game",
        params: &[game_name("Exact name of the game")],
    },
    ToolSpec {
        name: "rawg_game_stores",
        description: "Retrieve stores where a specific game can be purchased",
        params: &[game_name("Name of the game")],
    },
    ToolSpec {
        name: "rawg_game_dlcs",
        description: "Retrieve DLCs or expansions for a specific game",
        params: &[
            game_name("Base game name"),
            page_size(
                "Number of DLCs to return (max 20)",
                LIST_DEFAULT_PAGE_SIZE,
            ),
        ],
    },
];

pub fn handle_list(params: Option<&Value>) -> Result<Value, ErrorShape> {
    let _: Map<String, Value> = parse_optional_params("list_tools", params)?;

    let tools = TOOLS.iter().map(tool_schema).collect::<Vec<_>>();
    Ok(json!({
        "status": "ok",
        "tools": tools,
    }))
}

fn tool_schema(tool: &ToolSpec) -> Value {
    let mut properties = Map::new();
    for param in tool.params {
        let mut property = json!({
            "type": param.kind.label(),
            "description": param.description,
        });
        if let Some(default) = param.default {
            property["default"] = json!(default);
        }
        if param.kind == ParamKind::Integer {
            property["minimum"] = json!(1);
            property["maximum"] = json!(MAX_PAGE_SIZE);
        }
        properties.insert(param.name.to_owned(), property);
    }

    let required = tool
        .params
        .iter()
        .filter(|param| param.required)
        .map(|param| param.name)
        .collect::<Vec<_>>();

    let mut parameters = json!({
        "type": "object",
        "properties": properties,
    });
    if !required.is_empty() {
        parameters["required"] = json!(required);
    }

    json!({
        "type": "function",
        "function": {
            "name": tool.name,
            "description": tool.description,
            "parameters": parameters,
        }
    })
}
