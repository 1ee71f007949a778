//! Schema normalizer: turns raw CMS property objects into plain Rust values.
//!
//! Every extraction goes through [`extract`], a single dispatch over the
//! declared [`PropertyKind`]. Extraction never fails; absent or malformed
//! input yields the kind's default (`""`, `0`, `false`, or an empty list).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    Title,
    RichText,
    Select,
    MultiSelect,
    Number,
    Checkbox,
    Date,
    Files,
    Relation,
}

/// A file attached to a page, either linked from elsewhere or uploaded to the CMS.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FileRef {
    External {
        name: String,
        url: String,
    },
    Hosted {
        name: String,
        url: String,
        #[serde(rename = "expiryTime", skip_serializing_if = "Option::is_none")]
        expiry_time: Option<String>,
    },
}

impl FileRef {
    pub fn url(&self) -> &str {
        match self {
            FileRef::External { url, .. } | FileRef::Hosted { url, .. } => url,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            FileRef::External { name, .. } | FileRef::Hosted { name, .. } => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Text(String),
    Select(String),
    MultiSelect(Vec<String>),
    Number(f64),
    Checkbox(bool),
    Date(String),
    Files(Vec<FileRef>),
    Relation(Vec<String>),
}

impl PropertyValue {
    pub fn into_string(self) -> String {
        match self {
            PropertyValue::Text(s) | PropertyValue::Select(s) | PropertyValue::Date(s) => s,
            _ => String::new(),
        }
    }

    pub fn into_names(self) -> Vec<String> {
        match self {
            PropertyValue::MultiSelect(names) | PropertyValue::Relation(names) => names,
            _ => Vec::new(),
        }
    }

    pub fn into_number(self) -> f64 {
        match self {
            PropertyValue::Number(n) => n,
            _ => 0.0,
        }
    }

    pub fn into_bool(self) -> bool {
        matches!(self, PropertyValue::Checkbox(true))
    }

    pub fn into_files(self) -> Vec<FileRef> {
        match self {
            PropertyValue::Files(files) => files,
            _ => Vec::new(),
        }
    }
}

static ABSENT: Value = Value::Null;

/// Extract the value of one raw property according to its declared kind.
pub fn extract(kind: PropertyKind, raw: Option<&Value>) -> PropertyValue {
    let raw = raw.unwrap_or(&ABSENT);
    match kind {
        PropertyKind::Title => PropertyValue::Text(text_of(raw, &["title", "rich_text"])),
        PropertyKind::RichText => PropertyValue::Text(text_of(raw, &["rich_text", "title"])),
        PropertyKind::Select => PropertyValue::Select(str_at(raw, "/select/name")),
        PropertyKind::MultiSelect => PropertyValue::MultiSelect(
            array_at(raw, "multi_select")
                .filter_map(|option| option.get("name").and_then(Value::as_str))
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect(),
        ),
        PropertyKind::Number => {
            PropertyValue::Number(raw.get("number").and_then(Value::as_f64).unwrap_or(0.0))
        }
        PropertyKind::Checkbox => {
            PropertyValue::Checkbox(raw.get("checkbox").and_then(Value::as_bool).unwrap_or(false))
        }
        PropertyKind::Date => PropertyValue::Date(str_at(raw, "/date/start")),
        PropertyKind::Files => {
            PropertyValue::Files(array_at(raw, "files").filter_map(file_ref).collect())
        }
        PropertyKind::Relation => PropertyValue::Relation(
            array_at(raw, "relation")
                .filter_map(|rel| rel.get("id").and_then(Value::as_str))
                .filter(|id| !id.is_empty())
                .map(str::to_string)
                .collect(),
        ),
    }
}

// First element's text content, else its plain text; tries each array key in turn.
fn text_of(raw: &Value, keys: &[&str]) -> String {
    keys.iter()
        .filter_map(|key| raw.get(*key).and_then(Value::as_array).and_then(|a| a.first()))
        .find_map(|first| {
            [first.pointer("/text/content"), first.get("plain_text")]
                .into_iter()
                .flatten()
                .filter_map(Value::as_str)
                .find(|s| !s.is_empty())
        })
        .unwrap_or_default()
        .to_string()
}

fn str_at(raw: &Value, pointer: &str) -> String {
    raw.pointer(pointer)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn array_at<'a>(raw: &'a Value, key: &str) -> impl Iterator<Item = &'a Value> {
    raw.get(key)
        .and_then(Value::as_array)
        .map(|items| items.iter())
        .into_iter()
        .flatten()
}

fn file_ref(file: &Value) -> Option<FileRef> {
    let name = file
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let kind = file.get("type").and_then(Value::as_str).unwrap_or_else(|| {
        if file.get("file").is_some() {
            "file"
        } else {
            "external"
        }
    });

    match kind {
        "file" => {
            let url = file.pointer("/file/url").and_then(Value::as_str)?;
            if url.is_empty() {
                return None;
            }
            Some(FileRef::Hosted {
                name,
                url: url.to_string(),
                expiry_time: file
                    .pointer("/file/expiry_time")
                    .and_then(Value::as_str)
                    .map(str::to_string),
            })
        }
        "external" => {
            let url = file.pointer("/external/url").and_then(Value::as_str)?;
            if url.is_empty() {
                return None;
            }
            Some(FileRef::External {
                name,
                url: url.to_string(),
            })
        }
        _ => None,
    }
}

/// Typed read access to a page's property bag.
#[derive(Debug, Clone, Copy)]
pub struct Properties<'a> {
    bag: &'a HashMap<String, Value>,
}

impl<'a> Properties<'a> {
    pub fn new(bag: &'a HashMap<String, Value>) -> Self {
        Self { bag }
    }

    pub fn get(&self, name: &str, kind: PropertyKind) -> PropertyValue {
        extract(kind, self.bag.get(name))
    }

    pub fn title(&self, name: &str) -> String {
        self.get(name, PropertyKind::Title).into_string()
    }

    pub fn text(&self, name: &str) -> String {
        self.get(name, PropertyKind::RichText).into_string()
    }

    pub fn select(&self, name: &str) -> String {
        self.get(name, PropertyKind::Select).into_string()
    }

    pub fn multi_select(&self, name: &str) -> Vec<String> {
        self.get(name, PropertyKind::MultiSelect).into_names()
    }

    pub fn number(&self, name: &str) -> f64 {
        self.get(name, PropertyKind::Number).into_number()
    }

    pub fn checkbox(&self, name: &str) -> bool {
        self.get(name, PropertyKind::Checkbox).into_bool()
    }

    pub fn date(&self, name: &str) -> String {
        self.get(name, PropertyKind::Date).into_string()
    }

    pub fn files(&self, name: &str) -> Vec<FileRef> {
        self.get(name, PropertyKind::Files).into_files()
    }

    pub fn first_file(&self, name: &str) -> Option<FileRef> {
        self.files(name).into_iter().next()
    }

    pub fn relations(&self, name: &str) -> Vec<String> {
        self.get(name, PropertyKind::Relation).into_names()
    }

    pub fn relation(&self, name: &str) -> Option<String> {
        self.relations(name).into_iter().next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_prefers_content_then_plain_text() {
        let raw = json!({ "rich_text": [{ "text": { "content": "Sea breeze" }, "plain_text": "ignored" }] });
        assert_eq!(extract(PropertyKind::RichText, Some(&raw)), PropertyValue::Text("Sea breeze".into()));

        let raw = json!({ "title": [{ "plain_text": "Garden Suite" }] });
        assert_eq!(extract(PropertyKind::Title, Some(&raw)), PropertyValue::Text("Garden Suite".into()));

        // only the first fragment counts
        let raw = json!({ "rich_text": [{ "plain_text": "One" }, { "plain_text": "Two" }] });
        assert_eq!(extract(PropertyKind::RichText, Some(&raw)).into_string(), "One");
    }

    #[test]
    fn text_reads_either_array() {
        let raw = json!({ "title": [{ "text": { "content": "Lobby" } }] });
        assert_eq!(extract(PropertyKind::RichText, Some(&raw)).into_string(), "Lobby");
    }

    #[test]
    fn absent_or_malformed_values_fall_back_to_defaults() {
        let junk = json!({ "unexpected": 42 });
        let null = Value::Null;
        for raw in [None, Some(&null), Some(&junk)] {
            assert_eq!(extract(PropertyKind::Title, raw), PropertyValue::Text(String::new()));
            assert_eq!(extract(PropertyKind::Select, raw), PropertyValue::Select(String::new()));
            assert_eq!(extract(PropertyKind::MultiSelect, raw), PropertyValue::MultiSelect(vec![]));
            assert_eq!(extract(PropertyKind::Number, raw), PropertyValue::Number(0.0));
            assert_eq!(extract(PropertyKind::Checkbox, raw), PropertyValue::Checkbox(false));
            assert_eq!(extract(PropertyKind::Date, raw), PropertyValue::Date(String::new()));
            assert_eq!(extract(PropertyKind::Files, raw), PropertyValue::Files(vec![]));
            assert_eq!(extract(PropertyKind::Relation, raw), PropertyValue::Relation(vec![]));
        }

        let wrong_shapes = json!({ "number": "12", "checkbox": "yes", "select": null, "date": { "start": null } });
        assert_eq!(extract(PropertyKind::Number, Some(&wrong_shapes)).into_number(), 0.0);
        assert!(!extract(PropertyKind::Checkbox, Some(&wrong_shapes)).into_bool());
        assert_eq!(extract(PropertyKind::Select, Some(&wrong_shapes)).into_string(), "");
        assert_eq!(extract(PropertyKind::Date, Some(&wrong_shapes)).into_string(), "");
    }

    #[test]
    fn multi_select_keeps_order_and_drops_empty_names() {
        let raw = json!({ "multi_select": [{ "name": "Spa" }, { "name": "" }, { "id": "x" }, { "name": "Wifi" }] });
        assert_eq!(
            extract(PropertyKind::MultiSelect, Some(&raw)),
            PropertyValue::MultiSelect(vec!["Spa".into(), "Wifi".into()])
        );
    }

    #[test]
    fn scalar_kinds_extract_their_values() {
        let raw = json!({
            "select": { "name": "Available" },
            "number": 1280.5,
            "checkbox": true,
            "date": { "start": "2024-05-01", "end": null }
        });
        assert_eq!(extract(PropertyKind::Select, Some(&raw)).into_string(), "Available");
        assert_eq!(extract(PropertyKind::Number, Some(&raw)).into_number(), 1280.5);
        assert!(extract(PropertyKind::Checkbox, Some(&raw)).into_bool());
        assert_eq!(extract(PropertyKind::Date, Some(&raw)).into_string(), "2024-05-01");
    }

    #[test]
    fn files_map_to_external_or_hosted() {
        let raw = json!({ "files": [
            { "type": "external", "name": "cover.jpg", "external": { "url": "https://img.example/cover.jpg" } },
            { "type": "file", "name": "lobby.png", "file": { "url": "https://s3.example/lobby.png", "expiry_time": "2024-01-01T00:00:00.000Z" } },
            { "type": "file", "name": "broken.png", "file": {} },
            { "type": "external", "name": "blank", "external": { "url": "" } }
        ]});

        let files = extract(PropertyKind::Files, Some(&raw)).into_files();
        assert_eq!(files.len(), 2);
        assert_eq!(
            files[0],
            FileRef::External { name: "cover.jpg".into(), url: "https://img.example/cover.jpg".into() }
        );
        assert!(matches!(&files[1], FileRef::Hosted { expiry_time: Some(_), .. }));
        assert_eq!(files[1].url(), "https://s3.example/lobby.png");

        let serialized = serde_json::to_value(&files[0]).unwrap();
        assert_eq!(serialized["kind"], "external");
        assert_eq!(serialized["url"], "https://img.example/cover.jpg");
    }

    #[test]
    fn relations_and_single_relation() {
        let mut bag = HashMap::new();
        bag.insert("Dishes".to_string(), json!({ "relation": [{ "id": "d1" }, { "id": "d2" }] }));
        bag.insert("Chef".to_string(), json!({ "relation": [] }));
        let props = Properties::new(&bag);

        assert_eq!(props.relations("Dishes"), vec!["d1", "d2"]);
        assert_eq!(props.relation("Dishes").as_deref(), Some("d1"));
        assert_eq!(props.relation("Chef"), None);
        assert_eq!(props.relation("Missing"), None);
    }

    #[test]
    fn number_keeps_fractions_and_sign() {
        let mut bag = HashMap::new();
        bag.insert("Capacity".to_string(), json!({ "number": 2.5 }));
        bag.insert("Size".to_string(), json!({ "number": -2 }));
        let props = Properties::new(&bag);

        assert_eq!(props.number("Capacity"), 2.5);
        assert_eq!(props.number("Size"), -2.0);
        assert_eq!(props.number("Missing"), 0.0);
    }
}
