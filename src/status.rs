//! Aggregate connectivity check across every content collection.

use crate::fetch::{CollectionStatus, ContentService, FetchOutcome};
use crate::models::{Banner, Chef, Cuisine, Dish, Experience, JournalPost, Plan, Record, Room, Story};
use crate::types::Collection;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use tokio::task::{JoinError, JoinHandle};
use tracing::{error, info};

/// Every collection as fetched during one check.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StatusData {
    pub rooms: Vec<Room>,
    pub plans: Vec<Plan>,
    pub posts: Vec<JournalPost>,
    pub stories: Vec<Story>,
    pub experiences: Vec<Experience>,
    pub cuisines: Vec<Cuisine>,
    pub dishes: Vec<Dish>,
    pub chefs: Vec<Chef>,
    pub banners: Vec<Banner>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CoreCounts {
    pub rooms: usize,
    pub plans: usize,
    pub posts: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BrandCounts {
    pub stories: usize,
    pub experiences: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DiningCounts {
    pub cuisines: usize,
    pub dishes: usize,
    pub chefs: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HomeCounts {
    pub banners: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusStats {
    pub total_records: usize,
    pub databases: usize,
    pub counts: BTreeMap<Collection, usize>,
    /// Why each collection holds what it holds: loaded, unconfigured, or failed.
    pub sources: BTreeMap<Collection, CollectionStatus>,
    pub core_data: CoreCounts,
    pub brand_data: BrandCounts,
    pub dining_data: DiningCounts,
    pub home_data: HomeCounts,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<StatusData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<StatusStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StatusReport {
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            stats: None,
            error: Some(error.into()),
        }
    }

    /// Compact per-group listing for the status page.
    pub fn summary(&self) -> Value {
        let Some(data) = &self.data else {
            return Value::Null;
        };
        json!({
            "core": {
                "rooms": data.rooms.iter().map(|r| json!({ "name": r.name, "price": r.price, "slug": r.slug })).collect::<Vec<_>>(),
                "plans": data.plans.iter().map(|p| json!({ "name": p.name, "price": p.price, "duration": p.duration })).collect::<Vec<_>>(),
                "posts": data.posts.iter().map(|p| json!({ "title": p.title, "publishDate": p.publish_date })).collect::<Vec<_>>()
            },
            "brand": {
                "stories": data.stories.iter().map(|s| json!({ "title": s.title, "chapter": s.chapter })).collect::<Vec<_>>(),
                "experiences": data.experiences.iter().map(|e| json!({
                    "name": e.name,
                    "icon": e.icon,
                    "duration": e.duration,
                    "season": e.season
                })).collect::<Vec<_>>()
            },
            "dining": {
                "cuisines": data.cuisines.iter().map(|c| json!({ "name": c.name, "style": c.style })).collect::<Vec<_>>(),
                "dishes": data.dishes.iter().map(|d| json!({ "name": d.name, "price": d.price, "status": d.status })).collect::<Vec<_>>(),
                "chefs": data.chefs.iter().map(|c| json!({ "name": c.name, "experience": c.experience })).collect::<Vec<_>>()
            },
            "home": {
                "banners": data.banners.iter().map(|b| json!({ "title": b.title, "order": b.order })).collect::<Vec<_>>()
            }
        })
    }
}

struct Outcomes {
    rooms: FetchOutcome<Room>,
    plans: FetchOutcome<Plan>,
    posts: FetchOutcome<JournalPost>,
    stories: FetchOutcome<Story>,
    experiences: FetchOutcome<Experience>,
    cuisines: FetchOutcome<Cuisine>,
    dishes: FetchOutcome<Dish>,
    chefs: FetchOutcome<Chef>,
    banners: FetchOutcome<Banner>,
}

impl Outcomes {
    fn into_report(self) -> StatusReport {
        let mut counts = BTreeMap::new();
        let mut sources = BTreeMap::new();
        let mut note = |collection: Collection, len: usize, status: CollectionStatus| {
            counts.insert(collection, len);
            sources.insert(collection, status);
        };
        note(Collection::Rooms, self.rooms.len(), self.rooms.status());
        note(Collection::Plans, self.plans.len(), self.plans.status());
        note(Collection::Journal, self.posts.len(), self.posts.status());
        note(Collection::Stories, self.stories.len(), self.stories.status());
        note(Collection::Experiences, self.experiences.len(), self.experiences.status());
        note(Collection::Cuisines, self.cuisines.len(), self.cuisines.status());
        note(Collection::Dishes, self.dishes.len(), self.dishes.status());
        note(Collection::Chefs, self.chefs.len(), self.chefs.status());
        note(Collection::Banners, self.banners.len(), self.banners.status());

        let stats = StatusStats {
            total_records: counts.values().sum(),
            databases: Collection::ALL.len(),
            core_data: CoreCounts {
                rooms: self.rooms.len(),
                plans: self.plans.len(),
                posts: self.posts.len(),
            },
            brand_data: BrandCounts {
                stories: self.stories.len(),
                experiences: self.experiences.len(),
            },
            dining_data: DiningCounts {
                cuisines: self.cuisines.len(),
                dishes: self.dishes.len(),
                chefs: self.chefs.len(),
            },
            home_data: HomeCounts {
                banners: self.banners.len(),
            },
            counts,
            sources,
        };

        StatusReport {
            success: true,
            data: Some(StatusData {
                rooms: self.rooms.into_records(),
                plans: self.plans.into_records(),
                posts: self.posts.into_records(),
                stories: self.stories.into_records(),
                experiences: self.experiences.into_records(),
                cuisines: self.cuisines.into_records(),
                dishes: self.dishes.into_records(),
                chefs: self.chefs.into_records(),
                banners: self.banners.into_records(),
            }),
            stats: Some(stats),
            error: None,
        }
    }
}

impl ContentService {
    fn spawn_fetch<T: Record>(&self) -> JoinHandle<FetchOutcome<T>> {
        let service = self.clone();
        tokio::spawn(async move { service.fetch_outcome::<T>().await })
    }

    /// Fetch every collection concurrently and report counts.
    ///
    /// Fetchers absorb their own source errors, so `success` is false only
    /// when a fetch task itself dies (a panic). Siblings always run to
    /// completion.
    pub async fn check_connectivity(&self) -> StatusReport {
        let (rooms, plans, posts, stories, experiences, cuisines, dishes, chefs, banners) = tokio::join!(
            self.spawn_fetch::<Room>(),
            self.spawn_fetch::<Plan>(),
            self.spawn_fetch::<JournalPost>(),
            self.spawn_fetch::<Story>(),
            self.spawn_fetch::<Experience>(),
            self.spawn_fetch::<Cuisine>(),
            self.spawn_fetch::<Dish>(),
            self.spawn_fetch::<Chef>(),
            self.spawn_fetch::<Banner>(),
        );

        let outcomes = (|| -> Result<Outcomes, JoinError> {
            Ok(Outcomes {
                rooms: rooms?,
                plans: plans?,
                posts: posts?,
                stories: stories?,
                experiences: experiences?,
                cuisines: cuisines?,
                dishes: dishes?,
                chefs: chefs?,
                banners: banners?,
            })
        })();

        match outcomes {
            Ok(outcomes) => {
                let report = outcomes.into_report();
                if let Some(stats) = &report.stats {
                    info!(total_records = stats.total_records, "Connectivity check completed");
                }
                report
            }
            Err(e) => {
                error!(error = %e, "Connectivity check aborted");
                StatusReport::failed(format!("Connectivity check aborted: {}", e))
            }
        }
    }
}
