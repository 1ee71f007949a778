pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod fetch;
pub mod logging;
pub mod lookup;
pub mod models;
pub mod normalize;
pub mod server;
pub mod status;
pub mod types;

pub use client::{CmsClient, InMemoryCms, NotionClient};
pub use config::{Config, DataSources, EnvDataSources, StaticDataSources};
pub use error::{CmsError, Result};
pub use fetch::{CollectionData, CollectionStatus, ContentService, FetchOutcome};
pub use models::{Banner, Chef, Cuisine, Dish, Experience, JournalPost, Plan, Record, Room, Story};
pub use status::StatusReport;
pub use types::{Collection, Page, QueryRequest};
