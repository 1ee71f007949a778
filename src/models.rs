use crate::constants::{DEFAULT_DISH_STATUS, DEFAULT_EXPERIENCE_ICON};
use crate::normalize::{FileRef, Properties};
use crate::types::{Collection, Filter, Page, QueryRequest, Sort};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

/// A flat content record built from one CMS page.
pub trait Record: Serialize + Send + Sized + 'static {
    /// The CMS database this record type is read from.
    const COLLECTION: Collection;

    /// Map a raw page through the schema normalizer.
    fn from_page(page: &Page) -> Self;

    /// Query sent to the source for a full listing.
    fn query() -> QueryRequest {
        QueryRequest::new()
    }

    /// Whether the listing filter may be missing from a deployment's schema.
    /// When set, a `validation_error` on the filtered query is retried once
    /// without the filter.
    const OPTIONAL_FILTER: bool = false;

    /// Re-assert the collection's ordering locally. Must be a stable sort.
    fn order(_records: &mut [Self]) {}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub subtitle: String,
    pub description: String,
    pub price: f64,
    pub capacity: f64,
    pub size: f64,
    pub amenities: Vec<String>,
    pub gallery: Vec<FileRef>,
    pub status: String,
    pub featured: bool,
}

impl Record for Room {
    const COLLECTION: Collection = Collection::Rooms;

    fn from_page(page: &Page) -> Self {
        let props = Properties::new(&page.properties);
        Self {
            id: page.id.clone(),
            name: props.title("Name"),
            slug: props.text("Slug"),
            subtitle: props.text("Subtitle"),
            description: props.text("Description"),
            price: props.number("Price"),
            capacity: props.number("Capacity"),
            size: props.number("Size"),
            amenities: props.multi_select("Amenities"),
            gallery: props.files("Gallery"),
            status: props.select("Status"),
            featured: props.checkbox("Featured"),
        }
    }
}

impl Room {
    /// Query for the single room carrying `slug`.
    pub fn slug_query(slug: &str) -> QueryRequest {
        QueryRequest::new()
            .filtered_by(Filter::text_equals("Slug", slug))
            .limit(1)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub duration: f64,
    pub description: String,
    pub includes: String,
    pub popular: bool,
    pub images: Vec<FileRef>,
}

impl Record for Plan {
    const COLLECTION: Collection = Collection::Plans;

    fn from_page(page: &Page) -> Self {
        let props = Properties::new(&page.properties);
        Self {
            id: page.id.clone(),
            name: props.title("Name"),
            price: props.number("Price"),
            duration: props.number("Duration"),
            description: props.text("Description"),
            includes: props.text("Includes"),
            popular: props.checkbox("Popular"),
            images: props.files("Images"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalPost {
    pub id: String,
    pub title: String,
    pub content: String,
    pub cover_image: Option<FileRef>,
    pub publish_date: String,
    pub tags: Vec<String>,
    pub featured: bool,
    pub status: String,
}

impl Record for JournalPost {
    const COLLECTION: Collection = Collection::Journal;

    fn from_page(page: &Page) -> Self {
        let props = Properties::new(&page.properties);
        Self {
            id: page.id.clone(),
            title: props.title("Title"),
            content: props.text("Content"),
            cover_image: props.first_file("Cover_Image"),
            publish_date: props.date("Publish_Date"),
            tags: props.multi_select("Tags"),
            featured: props.checkbox("Featured"),
            status: props.select("Status"),
        }
    }

    fn query() -> QueryRequest {
        QueryRequest::new().sorted_by(Sort::descending("Publish_Date"))
    }

    // Undated or unparseable posts sink to the end
    fn order(records: &mut [Self]) {
        records.sort_by_cached_key(|post| {
            let published = post.published_at();
            (published.is_none(), Reverse(published))
        });
    }
}

impl JournalPost {
    /// Publish instant, from either a full RFC 3339 datetime with offset or a
    /// bare `YYYY-MM-DD` date (taken as midnight UTC).
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.publish_date.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
        Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    pub id: String,
    pub title: String,
    pub content: String,
    pub quote: String,
    pub before_image: Option<FileRef>,
    pub after_image: Option<FileRef>,
    pub chapter: String,
    pub status: String,
}

impl Record for Story {
    const COLLECTION: Collection = Collection::Stories;

    fn from_page(page: &Page) -> Self {
        let props = Properties::new(&page.properties);
        Self {
            id: page.id.clone(),
            title: props.title("Title"),
            content: props.text("Content"),
            quote: props.text("Quote"),
            before_image: props.first_file("Before_Image"),
            after_image: props.first_file("After_Image"),
            chapter: props.select("Chapter"),
            status: props.select("Status"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub description: String,
    pub details: String,
    pub duration: f64,
    pub max_guests: f64,
    pub season: Vec<String>,
    pub time_slots: String,
    pub cover_image: Option<FileRef>,
    pub category: String,
}

impl Record for Experience {
    const COLLECTION: Collection = Collection::Experiences;

    fn from_page(page: &Page) -> Self {
        let props = Properties::new(&page.properties);
        let icon = props.text("Icon");
        Self {
            id: page.id.clone(),
            name: props.title("Name"),
            icon: if icon.is_empty() {
                DEFAULT_EXPERIENCE_ICON.to_string()
            } else {
                icon
            },
            description: props.text("Description"),
            details: props.text("Details"),
            duration: props.number("Duration"),
            max_guests: props.number("Max_Guests"),
            season: props.multi_select("Season"),
            time_slots: props.text("Time_Slots"),
            cover_image: props.first_file("Cover_Image"),
            category: props.select("Category"),
        }
    }

    fn query() -> QueryRequest {
        QueryRequest::new().sorted_by(Sort::ascending("Name"))
    }

    fn order(records: &mut [Self]) {
        records.sort_by(|a, b| a.name.cmp(&b.name));
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cuisine {
    pub id: String,
    pub name: String,
    pub description: String,
    pub cover_image: Option<FileRef>,
    pub style: String,
    pub operating_hours: String,
    pub chef: Option<String>,
    pub dishes: Vec<String>,
}

impl Record for Cuisine {
    const COLLECTION: Collection = Collection::Cuisines;

    fn from_page(page: &Page) -> Self {
        let props = Properties::new(&page.properties);
        Self {
            id: page.id.clone(),
            name: props.title("Name"),
            description: props.text("Description"),
            cover_image: props.first_file("Cover_Image"),
            style: props.select("Style"),
            operating_hours: props.text("Operating_Hours"),
            chef: props.relation("Chef"),
            dishes: props.relations("Dishes"),
        }
    }

    fn query() -> QueryRequest {
        QueryRequest::new().sorted_by(Sort::ascending("Name"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dish {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub description: String,
    pub image_gallery: Vec<FileRef>,
    pub status: String,
    pub spicy_level: String,
    pub tags: Vec<String>,
    pub cuisine: Option<String>,
}

impl Record for Dish {
    const COLLECTION: Collection = Collection::Dishes;

    fn from_page(page: &Page) -> Self {
        let props = Properties::new(&page.properties);
        let status = props.select("Status");
        Self {
            id: page.id.clone(),
            name: props.title("Name"),
            price: props.number("Price"),
            description: props.text("Description"),
            image_gallery: props.files("Image_Gallery"),
            status: if status.is_empty() {
                DEFAULT_DISH_STATUS.to_string()
            } else {
                status
            },
            spicy_level: props.select("Spicy_Level"),
            tags: props.multi_select("Tags"),
            cuisine: props.relation("Cuisine"),
        }
    }

    fn query() -> QueryRequest {
        QueryRequest::new().sorted_by(Sort::ascending("Name"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chef {
    pub id: String,
    pub name: String,
    pub bio: String,
    pub photo: Option<FileRef>,
    pub specialties: String,
    /// Years of experience.
    pub experience: f64,
}

impl Record for Chef {
    const COLLECTION: Collection = Collection::Chefs;

    fn from_page(page: &Page) -> Self {
        let props = Properties::new(&page.properties);
        Self {
            id: page.id.clone(),
            name: props.title("Name"),
            bio: props.text("Bio"),
            photo: props.first_file("Photo"),
            specialties: props.text("Specialties"),
            experience: props.number("Experience"),
        }
    }

    fn query() -> QueryRequest {
        QueryRequest::new().sorted_by(Sort::ascending("Name"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Banner {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub button_text: String,
    pub button_link: String,
    pub image: Option<FileRef>,
    pub published: bool,
    pub order: f64,
}

impl Banner {
    pub const PUBLISHED_PROPERTY: &'static str = "Published";
}

impl Record for Banner {
    const COLLECTION: Collection = Collection::Banners;
    const OPTIONAL_FILTER: bool = true;

    fn from_page(page: &Page) -> Self {
        let props = Properties::new(&page.properties);
        Self {
            id: page.id.clone(),
            title: props.title("Title"),
            subtitle: props.text("Subtitle"),
            button_text: props.text("Button_Text"),
            button_link: props.text("Button_Link"),
            image: props.first_file("Image"),
            published: props.checkbox(Self::PUBLISHED_PROPERTY),
            order: props.number("Order"),
        }
    }

    /// Published banners only. Deployments without a `Published` property
    /// reject this filter; the fetcher then retries without it.
    fn query() -> QueryRequest {
        QueryRequest::new()
            .sorted_by(Sort::ascending("Order"))
            .filtered_by(Filter::checkbox_equals(Self::PUBLISHED_PROPERTY, true))
    }

    fn order(records: &mut [Self]) {
        records.sort_by(|a, b| a.order.total_cmp(&b.order));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn title(text: &str) -> serde_json::Value {
        json!({ "type": "title", "title": [{ "text": { "content": text }, "plain_text": text }] })
    }

    fn rich(text: &str) -> serde_json::Value {
        json!({ "type": "rich_text", "rich_text": [{ "text": { "content": text }, "plain_text": text }] })
    }

    #[test]
    fn maps_a_complete_room() {
        let page = Page::new("room-1")
            .with_property("Name", title("Ocean View Suite"))
            .with_property("Slug", rich("ocean-view"))
            .with_property("Subtitle", rich("Wake up to the tide"))
            .with_property("Description", rich("A corner suite facing the bay."))
            .with_property("Price", json!({ "number": 1280 }))
            .with_property("Capacity", json!({ "number": 2 }))
            .with_property("Size", json!({ "number": 45.5 }))
            .with_property("Amenities", json!({ "multi_select": [{ "name": "Bathtub" }, { "name": "Balcony" }] }))
            .with_property("Gallery", json!({ "files": [{ "type": "external", "name": "a", "external": { "url": "https://img.example/a.jpg" } }] }))
            .with_property("Status", json!({ "select": { "name": "Available" } }))
            .with_property("Featured", json!({ "checkbox": true }));

        let room = Room::from_page(&page);
        assert_eq!(room.id, "room-1");
        assert_eq!(room.name, "Ocean View Suite");
        assert_eq!(room.slug, "ocean-view");
        assert_eq!(room.price, 1280.0);
        assert_eq!(room.capacity, 2.0);
        assert_eq!(room.size, 45.5);
        assert_eq!(room.amenities, vec!["Bathtub", "Balcony"]);
        assert_eq!(room.gallery.len(), 1);
        assert_eq!(room.status, "Available");
        assert!(room.featured);
    }

    #[test]
    fn empty_page_maps_to_defaults() {
        let room = Room::from_page(&Page::new("bare"));
        assert_eq!(room.name, "");
        assert_eq!(room.price, 0.0);
        assert!(room.amenities.is_empty());
        assert!(!room.featured);

        let post = JournalPost::from_page(&Page::new("bare"));
        assert_eq!(post.cover_image, None);
        assert_eq!(post.publish_date, "");
    }

    #[test]
    fn experience_icon_defaults_to_sparkle() {
        let exp = Experience::from_page(&Page::new("e1").with_property("Name", title("Tea ceremony")));
        assert_eq!(exp.icon, DEFAULT_EXPERIENCE_ICON);

        let exp = Experience::from_page(&Page::new("e2").with_property("Icon", rich("🍵")));
        assert_eq!(exp.icon, "🍵");
    }

    #[test]
    fn dish_status_defaults_to_currently_served() {
        let dish = Dish::from_page(&Page::new("d1"));
        assert_eq!(dish.status, DEFAULT_DISH_STATUS);
        assert_eq!(dish.cuisine, None);

        let dish = Dish::from_page(
            &Page::new("d2")
                .with_property("Status", json!({ "select": { "name": "Seasonal" } }))
                .with_property("Cuisine", json!({ "relation": [{ "id": "c1" }, { "id": "c2" }] })),
        );
        assert_eq!(dish.status, "Seasonal");
        assert_eq!(dish.cuisine.as_deref(), Some("c1"));
    }

    #[test]
    fn cuisine_takes_first_chef_and_all_dishes() {
        let cuisine = Cuisine::from_page(
            &Page::new("c1")
                .with_property("Chef", json!({ "relation": [{ "id": "chef-1" }] }))
                .with_property("Dishes", json!({ "relation": [{ "id": "d1" }, { "id": "d2" }] })),
        );
        assert_eq!(cuisine.chef.as_deref(), Some("chef-1"));
        assert_eq!(cuisine.dishes, vec!["d1", "d2"]);
    }

    #[test]
    fn records_serialize_with_camel_case_keys() {
        let post = JournalPost::from_page(&Page::new("p1").with_property("Publish_Date", json!({ "date": { "start": "2024-03-01" } })));
        let value = serde_json::to_value(&post).unwrap();
        assert_eq!(value["publishDate"], "2024-03-01");
        assert!(value["coverImage"].is_null());
    }

    #[test]
    fn journal_orders_newest_first() {
        let mut posts: Vec<JournalPost> = ["2024-01-05", "", "2024-03-01", "2023-12-31"]
            .iter()
            .enumerate()
            .map(|(i, date)| {
                JournalPost::from_page(
                    &Page::new(format!("p{i}")).with_property("Publish_Date", json!({ "date": { "start": date } })),
                )
            })
            .collect();

        JournalPost::order(&mut posts);
        let dates: Vec<&str> = posts.iter().map(|p| p.publish_date.as_str()).collect();
        assert_eq!(dates, vec!["2024-03-01", "2024-01-05", "2023-12-31", ""]);
    }

    #[test]
    fn journal_orders_by_instant_across_offsets() {
        let mut posts: Vec<JournalPost> = [
            ("a", "2024-03-02T01:00:00.000+08:00"),
            ("b", "2024-03-01T20:00:00.000Z"),
            ("c", "not a date"),
            ("d", "2024-03-01"),
        ]
        .iter()
        .map(|(id, date)| {
            JournalPost::from_page(&Page::new(*id).with_property("Publish_Date", json!({ "date": { "start": date } })))
        })
        .collect();

        JournalPost::order(&mut posts);
        let ids: Vec<&str> = posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "d", "c"]);
        assert_eq!(posts[3].published_at(), None);
    }

    #[test]
    fn maps_a_complete_plan() {
        let plan = Plan::from_page(
            &Page::new("plan-1")
                .with_property("Name", title("Two-night escape"))
                .with_property("Price", json!({ "number": 2399.5 }))
                .with_property("Duration", json!({ "number": 2 }))
                .with_property("Description", rich("Slow mornings by the sea."))
                .with_property("Includes", rich("Breakfast, spa credit"))
                .with_property("Popular", json!({ "checkbox": true }))
                .with_property("Images", json!({ "files": [
                    { "type": "external", "name": "a", "external": { "url": "https://img.example/a.jpg" } },
                    { "type": "file", "name": "b", "file": { "url": "https://files.example/b.jpg", "expiry_time": "2024-05-01T00:00:00.000Z" } }
                ] })),
        );

        assert_eq!(plan.id, "plan-1");
        assert_eq!(plan.name, "Two-night escape");
        assert_eq!(plan.price, 2399.5);
        assert_eq!(plan.duration, 2.0);
        assert_eq!(plan.description, "Slow mornings by the sea.");
        assert_eq!(plan.includes, "Breakfast, spa credit");
        assert!(plan.popular);
        let urls: Vec<&str> = plan.images.iter().map(FileRef::url).collect();
        assert_eq!(urls, vec!["https://img.example/a.jpg", "https://files.example/b.jpg"]);
    }

    #[test]
    fn maps_a_complete_story() {
        let story = Story::from_page(
            &Page::new("story-1")
                .with_property("Title", title("Rebuilding the old granary"))
                .with_property("Content", rich("It took two winters."))
                .with_property("Quote", rich("Keep the beams."))
                .with_property("Before_Image", json!({ "files": [{ "type": "external", "name": "before", "external": { "url": "https://img.example/before.jpg" } }] }))
                .with_property("After_Image", json!({ "files": [{ "type": "external", "name": "after", "external": { "url": "https://img.example/after.jpg" } }] }))
                .with_property("Chapter", json!({ "select": { "name": "Origins" } }))
                .with_property("Status", json!({ "select": { "name": "Published" } })),
        );

        assert_eq!(story.title, "Rebuilding the old granary");
        assert_eq!(story.content, "It took two winters.");
        assert_eq!(story.quote, "Keep the beams.");
        assert_eq!(story.before_image.as_ref().map(FileRef::url), Some("https://img.example/before.jpg"));
        assert_eq!(story.after_image.as_ref().map(FileRef::url), Some("https://img.example/after.jpg"));
        assert_eq!(story.chapter, "Origins");
        assert_eq!(story.status, "Published");
    }

    #[test]
    fn maps_a_complete_chef() {
        let chef = Chef::from_page(
            &Page::new("chef-1")
                .with_property("Name", title("Lin Wei"))
                .with_property("Bio", rich("Trained in Hangzhou."))
                .with_property("Photo", json!({ "files": [{ "type": "external", "name": "lin", "external": { "url": "https://img.example/lin.jpg" } }] }))
                .with_property("Specialties", rich("River fish, tea-smoked duck"))
                .with_property("Experience", json!({ "number": 12.5 })),
        );

        assert_eq!(chef.name, "Lin Wei");
        assert_eq!(chef.bio, "Trained in Hangzhou.");
        assert_eq!(chef.photo.as_ref().map(FileRef::name), Some("lin"));
        assert_eq!(chef.specialties, "River fish, tea-smoked duck");
        assert_eq!(chef.experience, 12.5);
    }

    #[test]
    fn numeric_fields_keep_the_source_value() {
        let room = Room::from_page(&Page::new("r1").with_property("Capacity", json!({ "number": 2.5 })));
        assert_eq!(room.capacity, 2.5);

        let exp = Experience::from_page(&Page::new("e1").with_property("Max_Guests", json!({ "number": -1 })));
        assert_eq!(exp.max_guests, -1.0);
    }

    #[test]
    fn banner_query_filters_published_and_sorts_by_order() {
        let query = Banner::query();
        assert_eq!(query.filter, Some(Filter::checkbox_equals("Published", true)));
        assert_eq!(query.sorts, vec![Sort::ascending("Order")]);
    }
}
