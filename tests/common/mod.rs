#![allow(dead_code)]

use serde_json::{json, Value};
use stay_content::client::{CmsClient, InMemoryCms};
use stay_content::config::{DataSources, StaticDataSources};
use stay_content::{ContentService, Page};
use std::sync::Arc;

pub fn title(text: &str) -> Value {
    json!({ "id": "title", "type": "title", "title": [{ "type": "text", "text": { "content": text }, "plain_text": text }] })
}

pub fn rich(text: &str) -> Value {
    json!({ "type": "rich_text", "rich_text": [{ "type": "text", "text": { "content": text }, "plain_text": text }] })
}

pub fn number(n: f64) -> Value {
    json!({ "type": "number", "number": n })
}

pub fn checkbox(b: bool) -> Value {
    json!({ "type": "checkbox", "checkbox": b })
}

pub fn date(start: &str) -> Value {
    json!({ "type": "date", "date": { "start": start, "end": null } })
}

pub fn room(id: &str, name: &str, slug: &str, price: f64) -> Page {
    Page::new(id)
        .with_property("Name", title(name))
        .with_property("Slug", rich(slug))
        .with_property("Price", number(price))
}

pub fn post(id: &str, heading: &str, published: &str) -> Page {
    Page::new(id)
        .with_property("Title", title(heading))
        .with_property("Publish_Date", date(published))
}

pub fn experience(id: &str, name: &str) -> Page {
    Page::new(id).with_property("Name", title(name))
}

pub fn banner(id: &str, heading: &str, order: f64, published: bool) -> Page {
    Page::new(id)
        .with_property("Title", title(heading))
        .with_property("Order", number(order))
        .with_property("Published", checkbox(published))
}

/// Banner page from a deployment whose schema has no `Published` column.
pub fn legacy_banner(id: &str, heading: &str, order: f64) -> Page {
    Page::new(id)
        .with_property("Title", title(heading))
        .with_property("Order", number(order))
}

pub fn service(cms: Arc<InMemoryCms>, sources: StaticDataSources) -> ContentService {
    let client: Arc<dyn CmsClient> = cms;
    let sources: Arc<dyn DataSources> = Arc::new(sources);
    ContentService::new(client, sources)
}
