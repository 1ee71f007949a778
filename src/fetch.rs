//! Collection fetchers.
//!
//! Every content type goes through [`ContentService::fetch_outcome`]: resolve the
//! data-source id, run the type's query, map each page, re-assert ordering.
//! Callers of the public list methods never see an error; an unconfigured
//! type, an empty source and a failed query all come back as an empty `Vec`.
//! The typed [`FetchOutcome`] keeps those cases apart for the status report.

use crate::client::CmsClient;
use crate::config::DataSources;
use crate::error::Result;
use crate::models::{Banner, Chef, Cuisine, Dish, Experience, JournalPost, Plan, Record, Room, Story};
use crate::types::{Collection, Page};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionStatus {
    Ok,
    Unconfigured,
    Error,
}

/// Result of fetching one collection.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome<T> {
    /// No data-source id configured; no query was sent.
    Unconfigured,
    Loaded(Vec<T>),
    /// The source failed; the message is what was logged.
    Failed(String),
}

impl<T> FetchOutcome<T> {
    pub fn status(&self) -> CollectionStatus {
        match self {
            FetchOutcome::Unconfigured => CollectionStatus::Unconfigured,
            FetchOutcome::Loaded(_) => CollectionStatus::Ok,
            FetchOutcome::Failed(_) => CollectionStatus::Error,
        }
    }

    pub fn records(&self) -> &[T] {
        match self {
            FetchOutcome::Loaded(records) => records,
            _ => &[],
        }
    }

    pub fn len(&self) -> usize {
        self.records().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records().is_empty()
    }

    pub fn into_records(self) -> Vec<T> {
        match self {
            FetchOutcome::Loaded(records) => records,
            _ => Vec::new(),
        }
    }
}

/// Records of one content type, for callers that pick the type at runtime.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CollectionData {
    Rooms(Vec<Room>),
    Plans(Vec<Plan>),
    Journal(Vec<JournalPost>),
    Stories(Vec<Story>),
    Experiences(Vec<Experience>),
    Cuisines(Vec<Cuisine>),
    Dishes(Vec<Dish>),
    Chefs(Vec<Chef>),
    Banners(Vec<Banner>),
}

impl CollectionData {
    pub fn len(&self) -> usize {
        match self {
            CollectionData::Rooms(r) => r.len(),
            CollectionData::Plans(r) => r.len(),
            CollectionData::Journal(r) => r.len(),
            CollectionData::Stories(r) => r.len(),
            CollectionData::Experiences(r) => r.len(),
            CollectionData::Cuisines(r) => r.len(),
            CollectionData::Dishes(r) => r.len(),
            CollectionData::Chefs(r) => r.len(),
            CollectionData::Banners(r) => r.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Read access to all site content. Cheap to clone; the client and the
/// data-source table are shared.
#[derive(Clone)]
pub struct ContentService {
    client: Arc<dyn CmsClient>,
    sources: Arc<dyn DataSources>,
}

impl ContentService {
    pub fn new(client: Arc<dyn CmsClient>, sources: Arc<dyn DataSources>) -> Self {
        Self { client, sources }
    }

    pub(crate) fn client(&self) -> &dyn CmsClient {
        self.client.as_ref()
    }

    pub(crate) fn data_source_id(&self, collection: Collection) -> Option<String> {
        self.sources.data_source_id(collection)
    }

    /// Fetch one collection, keeping track of why it may be empty.
    pub async fn fetch_outcome<T: Record>(&self) -> FetchOutcome<T> {
        let collection = T::COLLECTION;
        let Some(data_source_id) = self.data_source_id(collection) else {
            debug!(%collection, env_var = collection.env_var(), "Data source not configured, skipping");
            return FetchOutcome::Unconfigured;
        };

        match self.query_pages::<T>(&data_source_id).await {
            Ok(pages) => {
                let mut records: Vec<T> = pages.iter().map(T::from_page).collect();
                T::order(&mut records);
                info!(%collection, count = records.len(), "Fetched collection");
                FetchOutcome::Loaded(records)
            }
            Err(e) => {
                error!(%collection, error = %e, "Error fetching collection");
                FetchOutcome::Failed(e.to_string())
            }
        }
    }

    async fn query_pages<T: Record>(&self, data_source_id: &str) -> Result<Vec<Page>> {
        let query = T::query();
        match self.client.query_collection(data_source_id, &query).await {
            Err(e) if T::OPTIONAL_FILTER && query.filter.is_some() && e.is_validation_error() => {
                warn!(
                    collection = %T::COLLECTION,
                    error = %e,
                    "Filter property missing from schema, retrying without filter"
                );
                self.client
                    .query_collection(data_source_id, &query.without_filter())
                    .await
            }
            result => result,
        }
    }

    /// Fetch one collection as a plain list; errors become an empty list.
    pub async fn fetch_collection<T: Record>(&self) -> Vec<T> {
        self.fetch_outcome::<T>().await.into_records()
    }

    pub async fn rooms(&self) -> Vec<Room> {
        self.fetch_collection().await
    }

    pub async fn plans(&self) -> Vec<Plan> {
        self.fetch_collection().await
    }

    /// Newest first.
    pub async fn journal_posts(&self) -> Vec<JournalPost> {
        self.fetch_collection().await
    }

    pub async fn stories(&self) -> Vec<Story> {
        self.fetch_collection().await
    }

    /// Alphabetical by name.
    pub async fn experiences(&self) -> Vec<Experience> {
        self.fetch_collection().await
    }

    pub async fn cuisines(&self) -> Vec<Cuisine> {
        self.fetch_collection().await
    }

    pub async fn dishes(&self) -> Vec<Dish> {
        self.fetch_collection().await
    }

    pub async fn chefs(&self) -> Vec<Chef> {
        self.fetch_collection().await
    }

    /// Published banners by ascending `Order`. Against a schema without a
    /// `Published` property every banner is returned.
    pub async fn banners(&self) -> Vec<Banner> {
        self.fetch_collection().await
    }

    pub async fn fetch(&self, collection: Collection) -> CollectionData {
        match collection {
            Collection::Rooms => CollectionData::Rooms(self.rooms().await),
            Collection::Plans => CollectionData::Plans(self.plans().await),
            Collection::Journal => CollectionData::Journal(self.journal_posts().await),
            Collection::Stories => CollectionData::Stories(self.stories().await),
            Collection::Experiences => CollectionData::Experiences(self.experiences().await),
            Collection::Cuisines => CollectionData::Cuisines(self.cuisines().await),
            Collection::Dishes => CollectionData::Dishes(self.dishes().await),
            Collection::Chefs => CollectionData::Chefs(self.chefs().await),
            Collection::Banners => CollectionData::Banners(self.banners().await),
        }
    }
}
