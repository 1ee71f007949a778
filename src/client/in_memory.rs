use super::CmsClient;
use crate::error::{CmsError, Result, VALIDATION_ERROR_CODE};
use crate::normalize::{extract, PropertyKind};
use crate::types::{Condition, Filter, Page, QueryRequest};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, PoisonError};
use tracing::debug;

/// A query the in-memory source has received.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedQuery {
    pub data_source_id: String,
    pub query: QueryRequest,
}

/// In-memory CMS for development and testing.
///
/// Pages are returned in insertion order: filters and page size are applied,
/// sorts are not. A filter naming a property that no stored page carries is
/// rejected with a `validation_error`, the way the real API rejects unknown
/// schema properties.
#[derive(Debug, Default)]
pub struct InMemoryCms {
    pages: HashMap<String, Vec<Page>>,
    failures: HashMap<String, (u16, String, String)>,
    queries: Mutex<Vec<RecordedQuery>>,
}

impl InMemoryCms {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pages(mut self, data_source_id: impl Into<String>, pages: Vec<Page>) -> Self {
        self.pages.entry(data_source_id.into()).or_default().extend(pages);
        self
    }

    /// Make every query against `data_source_id` fail with the given API error.
    pub fn failing(
        mut self,
        data_source_id: impl Into<String>,
        status: u16,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        self.failures
            .insert(data_source_id.into(), (status, code.into(), message.into()));
        self
    }

    /// Load a fixture file mapping data-source ids to arrays of raw pages.
    pub fn from_fixture(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let pages: HashMap<String, Vec<Page>> = serde_json::from_str(&content)?;
        Ok(Self {
            pages,
            ..Self::default()
        })
    }

    pub fn queries(&self) -> Vec<RecordedQuery> {
        self.queries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn query_count(&self) -> usize {
        self.queries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn record(&self, data_source_id: &str, query: &QueryRequest) {
        self.queries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedQuery {
                data_source_id: data_source_id.to_string(),
                query: query.clone(),
            });
    }
}

fn page_matches(page: &Page, filter: &Filter) -> bool {
    let raw = page.properties.get(&filter.property);
    match &filter.condition {
        Condition::RichText { equals } => {
            extract(PropertyKind::RichText, raw).into_string() == *equals
        }
        Condition::Checkbox { equals } => extract(PropertyKind::Checkbox, raw).into_bool() == *equals,
    }
}

#[async_trait]
impl CmsClient for InMemoryCms {
    async fn query_collection(&self, data_source_id: &str, query: &QueryRequest) -> Result<Vec<Page>> {
        self.record(data_source_id, query);

        if let Some((status, code, message)) = self.failures.get(data_source_id) {
            return Err(CmsError::api(*status, code.clone(), message.clone()));
        }

        let pages = self.pages.get(data_source_id).ok_or_else(|| {
            CmsError::api(
                404,
                "object_not_found",
                format!("Could not find database with ID: {}", data_source_id),
            )
        })?;

        if let Some(filter) = &query.filter {
            let known = pages.iter().any(|p| p.properties.contains_key(&filter.property));
            if !known && !pages.is_empty() {
                return Err(CmsError::api(
                    400,
                    VALIDATION_ERROR_CODE,
                    format!("Could not find property with name or id: {}", filter.property),
                ));
            }
        }

        let limit = query.page_size.map(|n| n as usize).unwrap_or(usize::MAX);
        let results: Vec<Page> = pages
            .iter()
            .filter(|page| query.filter.as_ref().map_or(true, |f| page_matches(page, f)))
            .take(limit)
            .cloned()
            .collect();

        debug!(data_source_id, count = results.len(), "In-memory query served");
        Ok(results)
    }
}
