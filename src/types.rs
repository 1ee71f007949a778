use crate::constants;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Content types served by the site, one CMS database each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Rooms,
    Plans,
    Journal,
    Stories,
    Experiences,
    Cuisines,
    Dishes,
    Chefs,
    Banners,
}

impl Collection {
    pub const ALL: [Collection; 9] = [
        Collection::Rooms,
        Collection::Plans,
        Collection::Journal,
        Collection::Stories,
        Collection::Experiences,
        Collection::Cuisines,
        Collection::Dishes,
        Collection::Chefs,
        Collection::Banners,
    ];

    /// Types reachable through the `/data?type=` endpoint. Banners are only
    /// surfaced through the status report.
    pub const QUERYABLE: [Collection; 8] = [
        Collection::Rooms,
        Collection::Plans,
        Collection::Journal,
        Collection::Stories,
        Collection::Experiences,
        Collection::Cuisines,
        Collection::Dishes,
        Collection::Chefs,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Collection::Rooms => "rooms",
            Collection::Plans => "plans",
            Collection::Journal => "journal",
            Collection::Stories => "stories",
            Collection::Experiences => "experiences",
            Collection::Cuisines => "cuisines",
            Collection::Dishes => "dishes",
            Collection::Chefs => "chefs",
            Collection::Banners => "banners",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Collection::Rooms => "Rooms",
            Collection::Plans => "Plans",
            Collection::Journal => "Journal posts",
            Collection::Stories => "Brand stories",
            Collection::Experiences => "Experiences",
            Collection::Cuisines => "Cuisines",
            Collection::Dishes => "Signature dishes",
            Collection::Chefs => "Chef team",
            Collection::Banners => "Home banners",
        }
    }

    /// Environment variable holding this type's data-source id.
    pub fn env_var(&self) -> &'static str {
        match self {
            Collection::Rooms => constants::ROOMS_DB_ENV,
            Collection::Plans => constants::PLANS_DB_ENV,
            Collection::Journal => constants::JOURNAL_DB_ENV,
            Collection::Stories => constants::STORIES_DB_ENV,
            Collection::Experiences => constants::EXPERIENCES_DB_ENV,
            Collection::Cuisines => constants::CUISINES_DB_ENV,
            Collection::Dishes => constants::DISHES_DB_ENV,
            Collection::Chefs => constants::CHEFS_DB_ENV,
            Collection::Banners => constants::BANNERS_DB_ENV,
        }
    }

    /// Resolve a `/data?type=` discriminator.
    pub fn from_query_key(key: &str) -> Option<Collection> {
        Self::QUERYABLE.into_iter().find(|c| c.key() == key)
    }

    /// Comma-separated list of valid `/data?type=` discriminators.
    pub fn queryable_keys() -> String {
        Self::QUERYABLE
            .iter()
            .map(|c| c.key())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One CMS page: an id plus its raw property bag keyed by property name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: String,
    #[serde(default)]
    pub properties: HashMap<String, serde_json::Value>,
}

impl Page {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            properties: HashMap::new(),
        }
    }

    pub fn with_property(mut self, name: impl Into<String>, value: serde_json::Value) -> Self {
        self.properties.insert(name.into(), value);
        self
    }
}

/// Condition part of a database filter, serialized as `{"rich_text": {"equals": ..}}` etc.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    RichText { equals: String },
    Checkbox { equals: bool },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub property: String,
    #[serde(flatten)]
    pub condition: Condition,
}

impl Filter {
    pub fn text_equals(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            condition: Condition::RichText { equals: value.into() },
        }
    }

    pub fn checkbox_equals(property: impl Into<String>, value: bool) -> Self {
        Self {
            property: property.into(),
            condition: Condition::Checkbox { equals: value },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sort {
    pub property: String,
    pub direction: SortDirection,
}

impl Sort {
    pub fn ascending(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            direction: SortDirection::Descending,
        }
    }
}

/// Body of a "query collection" request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Filter>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sorts: Vec<Sort>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

impl QueryRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sorted_by(mut self, sort: Sort) -> Self {
        self.sorts.push(sort);
        self
    }

    pub fn filtered_by(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn limit(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Same query with the filter dropped.
    pub fn without_filter(&self) -> Self {
        Self {
            filter: None,
            ..self.clone()
        }
    }
}

/// Response envelope of a "query collection" call. Only the first page is read.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub results: Vec<Page>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// Error body returned by the CMS on non-2xx responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}
