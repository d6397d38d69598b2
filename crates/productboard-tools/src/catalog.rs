//! Static catalog of Productboard endpoints exposed as tools.
//!
//! Every tool is one [`EndpointDescriptor`]: HTTP method, path template, the arguments it accepts
//! and where each argument goes on the wire. The runtime never special-cases a tool by name; the
//! few endpoint-specific body layouts are expressed through [`BodyShape`].

use reqwest::Method;
use serde::Serialize;
use serde_json::{Value, json};

pub const HEALTH_CHECK_TOOL: &str = "health_check";
pub const SERVER_NAME: &str = "Productboard MCP Server";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
}

impl HttpMethod {
    #[must_use]
    pub fn to_reqwest(self) -> Method {
        match self {
            Self::Get => Method::GET,
            Self::Post => Method::POST,
            Self::Put => Method::PUT,
            Self::Patch => Method::PATCH,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamLocation {
    /// Substituted into the `{wire_name}` placeholder of the path template.
    Path,
    Query,
    Body,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    String,
    Integer,
    Object,
    StringArray,
    /// Any JSON value.
    Any,
}

impl ParamKind {
    fn schema(self) -> Value {
        match self {
            Self::String => json!({ "type": "string" }),
            Self::Integer => json!({ "type": "integer" }),
            Self::Object => json!({ "type": "object" }),
            Self::StringArray => json!({ "type": "array", "items": { "type": "string" } }),
            Self::Any => json!({}),
        }
    }
}

/// How the body-located arguments of a tool become the request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyShape {
    /// No request body.
    Empty,
    /// A JSON object keyed by wire name (possibly `{}`).
    Fields,
    /// The single body argument is sent as-is, not wrapped in an object.
    Raw,
    /// `{"data": {"events": [...], "notification": {"url": ..., "version": ...}}}`.
    Subscription,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    /// Argument name as exposed to the tool caller.
    pub name: &'static str,
    /// Name used on the wire (query key, body key or path placeholder).
    pub wire_name: &'static str,
    pub location: ParamLocation,
    pub required: bool,
    pub kind: ParamKind,
    /// Advertised in the input schema only; never injected into requests.
    pub default: Option<i64>,
    pub description: &'static str,
}

impl ParamSpec {
    const fn new(
        name: &'static str,
        location: ParamLocation,
        kind: ParamKind,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            wire_name: name,
            location,
            required: false,
            kind,
            default: None,
            description,
        }
    }

    const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    const fn wire(mut self, wire_name: &'static str) -> Self {
        self.wire_name = wire_name;
        self
    }

    const fn default(mut self, value: i64) -> Self {
        self.default = Some(value);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointDescriptor {
    pub name: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub method: HttpMethod,
    pub path: &'static str,
    pub params: &'static [ParamSpec],
    pub body: BodyShape,
    /// Argument echoed in the invocation log line.
    pub log_subject: Option<&'static str>,
}

impl EndpointDescriptor {
    /// JSON schema for the tool arguments.
    #[must_use]
    pub fn input_schema(&self) -> Value {
        let mut properties = json!({});
        let mut required: Vec<&str> = Vec::new();

        for param in self.params {
            let mut prop_schema = param.kind.schema();
            prop_schema["description"] = json!(param.description);
            if let Some(default) = param.default {
                prop_schema["default"] = json!(default);
            }

            properties[param.name] = prop_schema;

            if param.required {
                required.push(param.name);
            }
        }

        let mut schema = json!({
            "type": "object",
            "properties": properties,
        });

        if !required.is_empty() {
            schema["required"] = json!(required);
        }

        schema
    }

    #[must_use]
    pub fn param(&self, name: &str) -> Option<&'static ParamSpec> {
        self.params.iter().find(|p| p.name == name)
    }
}

use BodyShape::{Empty, Fields, Raw, Subscription};
use HttpMethod::{Get, Patch, Post, Put};
use ParamKind::{Any, Integer, Object, StringArray};
use ParamLocation::{Body, Path, Query};

const CREATE_NOTE_PARAMS: &[ParamSpec] = &[
    ParamSpec::new("title", Body, ParamKind::String, "Title of the note.").required(),
    ParamSpec::new(
        "content",
        Body,
        ParamKind::String,
        "Content of the note (HTML allowed).",
    )
    .required(),
    ParamSpec::new("display_url", Body, ParamKind::String, "Optional display URL."),
    ParamSpec::new("user", Body, Object, "Optional user info."),
    ParamSpec::new("company", Body, Object, "Optional company info."),
    ParamSpec::new("source", Body, Object, "Optional source info."),
    ParamSpec::new("owner", Body, Object, "Optional owner info."),
    ParamSpec::new("tags", Body, StringArray, "Optional list of tags."),
];

const LIST_NOTES_PARAMS: &[ParamSpec] = &[
    ParamSpec::new("last", Query, ParamKind::String, "Filter for last note id."),
    ParamSpec::new(
        "created_from",
        Query,
        ParamKind::String,
        "Filter for creation start date.",
    )
    .wire("createdFrom"),
    ParamSpec::new(
        "created_to",
        Query,
        ParamKind::String,
        "Filter for creation end date.",
    )
    .wire("createdTo"),
    ParamSpec::new("page_limit", Query, Integer, "Number of items per page.")
        .wire("pageLimit")
        .default(50),
    ParamSpec::new(
        "page_cursor",
        Query,
        ParamKind::String,
        "Cursor for pagination.",
    )
    .wire("pageCursor"),
];

const CREATE_COMPANY_PARAMS: &[ParamSpec] = &[
    ParamSpec::new("name", Body, ParamKind::String, "Name of the company.").required(),
    ParamSpec::new("domain", Body, ParamKind::String, "Domain of the company."),
];

const LIST_COMPANIES_PARAMS: &[ParamSpec] = &[
    ParamSpec::new("limit", Query, Integer, "Maximum number of companies.").default(20),
    ParamSpec::new("offset", Query, Integer, "Offset for pagination.").default(0),
];

const CREATE_FEATURE_PARAMS: &[ParamSpec] = &[
    ParamSpec::new("name", Body, ParamKind::String, "Name of the feature.").required(),
    ParamSpec::new(
        "description",
        Body,
        ParamKind::String,
        "Description of the feature.",
    ),
    ParamSpec::new("parent", Body, Object, "Parent feature info with id."),
    ParamSpec::new("type", Body, ParamKind::String, "Type of the feature."),
];

const LIST_FEATURES_PARAMS: &[ParamSpec] = &[
    ParamSpec::new("limit", Query, Integer, "Number of features to return.").default(10),
    ParamSpec::new("offset", Query, Integer, "Offset for pagination.").default(0),
    ParamSpec::new(
        "status_name",
        Query,
        ParamKind::String,
        "Filter features by status name.",
    )
    .wire("status.name"),
];

const UPDATE_FEATURE_PARAMS: &[ParamSpec] = &[
    ParamSpec::new(
        "feature_id",
        Path,
        ParamKind::String,
        "ID of the feature to update.",
    )
    .wire("id")
    .required(),
    ParamSpec::new("name", Body, ParamKind::String, "New name of the feature."),
    ParamSpec::new("description", Body, ParamKind::String, "New description."),
    ParamSpec::new(
        "status",
        Body,
        Object,
        "Object with key 'id' for the new status.",
    ),
    ParamSpec::new(
        "parent",
        Body,
        Object,
        "Object with key 'id' for the parent feature.",
    ),
];

const LIST_CUSTOM_FIELDS_PARAMS: &[ParamSpec] = &[ParamSpec::new(
    "field_type",
    Query,
    ParamKind::String,
    "Type of custom fields (e.g., text, number).",
)
.wire("type")
.required()];

const SET_CUSTOM_FIELD_VALUE_PARAMS: &[ParamSpec] = &[
    ParamSpec::new(
        "custom_field_id",
        Query,
        ParamKind::String,
        "ID of the custom field.",
    )
    .wire("customField.id")
    .required(),
    ParamSpec::new(
        "hierarchy_entity_id",
        Query,
        ParamKind::String,
        "ID of the hierarchy entity.",
    )
    .wire("hierarchyEntity.id")
    .required(),
    ParamSpec::new(
        "value",
        Body,
        Any,
        "The value to set (can be string, number, list, or object).",
    )
    .required(),
];

const LIST_RELEASES_PARAMS: &[ParamSpec] = &[
    ParamSpec::new(
        "release_group_id",
        Query,
        ParamKind::String,
        "Filter by release group ID.",
    )
    .wire("releaseGroup.id"),
    ParamSpec::new("limit", Query, Integer, "Maximum number of releases.").default(10),
    ParamSpec::new("offset", Query, Integer, "Offset for pagination.").default(0),
];

const CREATE_SUBSCRIPTION_PARAMS: &[ParamSpec] = &[
    ParamSpec::new("events", Body, StringArray, "List of events to subscribe to.").required(),
    ParamSpec::new(
        "notification_url",
        Body,
        ParamKind::String,
        "URL that receives webhook notifications.",
    )
    .wire("url")
    .required(),
    ParamSpec::new(
        "notification_version",
        Body,
        Integer,
        "Version of the notification protocol.",
    )
    .wire("version")
    .required(),
];

const LIST_COMPONENTS_PARAMS: &[ParamSpec] = &[
    ParamSpec::new("limit", Query, Integer, "Maximum number of components.").default(10),
    ParamSpec::new("offset", Query, Integer, "Offset for pagination.").default(0),
];

static ENDPOINTS: &[EndpointDescriptor] = &[
    EndpointDescriptor {
        name: "create_note",
        title: "Create note",
        description: "Creates a new note in Productboard.",
        method: Post,
        path: "/notes",
        params: CREATE_NOTE_PARAMS,
        body: Fields,
        log_subject: Some("title"),
    },
    EndpointDescriptor {
        name: "list_notes",
        title: "List notes",
        description: "Retrieves a paginated list of all notes.",
        method: Get,
        path: "/notes",
        params: LIST_NOTES_PARAMS,
        body: Empty,
        log_subject: None,
    },
    EndpointDescriptor {
        name: "create_company",
        title: "Create company",
        description: "Creates a new company.",
        method: Post,
        path: "/companies",
        params: CREATE_COMPANY_PARAMS,
        body: Fields,
        log_subject: Some("name"),
    },
    EndpointDescriptor {
        name: "list_companies",
        title: "List companies",
        description: "Retrieves a list of all companies.",
        method: Get,
        path: "/companies",
        params: LIST_COMPANIES_PARAMS,
        body: Empty,
        log_subject: None,
    },
    EndpointDescriptor {
        name: "create_feature",
        title: "Create feature",
        description: "Creates a new feature.",
        method: Post,
        path: "/features",
        params: CREATE_FEATURE_PARAMS,
        body: Fields,
        log_subject: Some("name"),
    },
    EndpointDescriptor {
        name: "list_features",
        title: "List features",
        description: "Retrieves a list of all features.",
        method: Get,
        path: "/features",
        params: LIST_FEATURES_PARAMS,
        body: Empty,
        log_subject: None,
    },
    EndpointDescriptor {
        name: "update_feature",
        title: "Update feature",
        description: "Updates an existing feature. Only the supplied fields are changed.",
        method: Patch,
        path: "/features/{id}",
        params: UPDATE_FEATURE_PARAMS,
        body: Fields,
        log_subject: Some("feature_id"),
    },
    EndpointDescriptor {
        name: "list_custom_fields",
        title: "List custom fields",
        description: "Returns definitions of all custom fields.",
        method: Get,
        path: "/hierarchy-entities/custom-fields",
        params: LIST_CUSTOM_FIELDS_PARAMS,
        body: Empty,
        log_subject: Some("field_type"),
    },
    EndpointDescriptor {
        name: "set_custom_field_value",
        title: "Set custom field value",
        description: "Sets a custom field value on a hierarchy entity.",
        method: Put,
        path: "/hierarchy-entities/custom-fields-values/value",
        params: SET_CUSTOM_FIELD_VALUE_PARAMS,
        body: Raw,
        log_subject: Some("custom_field_id"),
    },
    EndpointDescriptor {
        name: "list_releases",
        title: "List releases",
        description: "Retrieves a list of all releases.",
        method: Get,
        path: "/releases",
        params: LIST_RELEASES_PARAMS,
        body: Empty,
        log_subject: None,
    },
    EndpointDescriptor {
        name: "create_subscription",
        title: "Create webhook subscription",
        description: "Creates a new webhook subscription.",
        method: Post,
        path: "/webhooks",
        params: CREATE_SUBSCRIPTION_PARAMS,
        body: Subscription,
        log_subject: Some("notification_url"),
    },
    EndpointDescriptor {
        name: "list_components",
        title: "List components",
        description: "Retrieves a list of all components.",
        method: Get,
        path: "/components",
        params: LIST_COMPONENTS_PARAMS,
        body: Empty,
        log_subject: None,
    },
];

/// All endpoint-backed tools, in registration order.
#[must_use]
pub fn endpoints() -> &'static [EndpointDescriptor] {
    ENDPOINTS
}

#[must_use]
pub fn find(name: &str) -> Option<&'static EndpointDescriptor> {
    ENDPOINTS.iter().find(|e| e.name == name)
}

#[must_use]
pub fn tool_names() -> Vec<&'static str> {
    ENDPOINTS.iter().map(|e| e.name).collect()
}

/// Result of the `health_check` tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub server: &'static str,
    pub tools: Vec<&'static str>,
}

impl HealthReport {
    #[must_use]
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

#[must_use]
pub fn health_report() -> HealthReport {
    HealthReport {
        status: "healthy",
        server: SERVER_NAME,
        tools: tool_names(),
    }
}

#[must_use]
pub fn health_check_description() -> &'static str {
    "Health check endpoint. Returns server status and list of available tools."
}
