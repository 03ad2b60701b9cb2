// ABOUTME: Serde data models for Notion API responses
// ABOUTME: Tolerant parsing: missing or malformed payloads fall back to empty values

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// One styled run of text. Only the plain-text projection is kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RichText {
    #[serde(default)]
    pub plain_text: String,
}

impl RichText {
    pub fn new(text: impl Into<String>) -> Self {
        RichText {
            plain_text: text.into(),
        }
    }
}

/// One page of a cursor-paginated listing.
#[derive(Debug, Clone, Deserialize)]
pub struct Paginated<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

impl<T> Paginated<T> {
    /// Cursor to request next, or `None` once the listing is exhausted.
    pub fn continuation(&self) -> Option<&str> {
        if self.has_more {
            self.next_cursor.as_deref()
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Page {
    pub id: String,
    #[serde(default, deserialize_with = "lenient_properties")]
    pub properties: HashMap<String, PropertyValue>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropertyValue {
    Title {
        #[serde(default)]
        title: Vec<RichText>,
    },
    RichText {
        #[serde(default)]
        rich_text: Vec<RichText>,
    },
    Date {
        #[serde(default)]
        date: Option<DateValue>,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DateValue {
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
}

// A property the schema doesn't match becomes `Other` instead of failing the page.
fn lenient_properties<'de, D>(deserializer: D) -> Result<HashMap<String, PropertyValue>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: HashMap<String, Value> = HashMap::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(name, value)| {
            let prop = serde_json::from_value(value).unwrap_or(PropertyValue::Other);
            (name, prop)
        })
        .collect())
}


/// One content node of a page body. Children are not stored inline.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawBlock")]
pub struct Block {
    pub id: String,
    pub has_children: bool,
    pub kind: BlockKind,
}

impl Block {
    pub fn new(id: impl Into<String>, kind: BlockKind) -> Self {
        Block {
            id: id.into(),
            has_children: false,
            kind,
        }
    }

    pub fn with_children(mut self) -> Self {
        self.has_children = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BlockKind {
    Heading { level: u8, text: Vec<RichText> },
    Paragraph(Vec<RichText>),
    BulletedListItem(Vec<RichText>),
    NumberedListItem(Vec<RichText>),
    ToDo { text: Vec<RichText>, checked: bool },
    Quote(Vec<RichText>),
    Callout(Vec<RichText>),
    Divider,
    Code { language: String, text: Vec<RichText> },
    Image { source: ImageSource, caption: Vec<RichText> },
    Toggle(Vec<RichText>),
    /// Any kind this exporter doesn't render; carries the raw type tag.
    Unsupported(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    External(Option<String>),
    Hosted(Option<String>),
}

#[derive(Deserialize)]
struct RawBlock {
    #[serde(default)]
    id: String,
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    has_children: bool,
    #[serde(flatten)]
    payloads: serde_json::Map<String, Value>,
}

// Union of the payload fields used by the rendered kinds.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Payload {
    rich_text: Vec<RichText>,
    checked: bool,
    language: Option<String>,
    caption: Vec<RichText>,
    #[serde(rename = "type")]
    source: Option<String>,
    external: Option<FileRef>,
    file: Option<FileRef>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileRef {
    url: Option<String>,
}

impl From<RawBlock> for Block {
    fn from(mut raw: RawBlock) -> Self {
        let payload: Payload = raw
            .payloads
            .remove(&raw.kind)
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or_default();

        let kind = match raw.kind.as_str() {
            "heading_1" => BlockKind::Heading {
                level: 1,
                text: payload.rich_text,
            },
            "heading_2" => BlockKind::Heading {
                level: 2,
                text: payload.rich_text,
            },
            "heading_3" => BlockKind::Heading {
                level: 3,
                text: payload.rich_text,
            },
            "paragraph" => BlockKind::Paragraph(payload.rich_text),
            "bulleted_list_item" => BlockKind::BulletedListItem(payload.rich_text),
            "numbered_list_item" => BlockKind::NumberedListItem(payload.rich_text),
            "to_do" => BlockKind::ToDo {
                text: payload.rich_text,
                checked: payload.checked,
            },
            "quote" => BlockKind::Quote(payload.rich_text),
            "callout" => BlockKind::Callout(payload.rich_text),
            "divider" => BlockKind::Divider,
            "code" => BlockKind::Code {
                language: payload.language.unwrap_or_default(),
                text: payload.rich_text,
            },
            "image" => {
                let source = if payload.source.as_deref() == Some("external") {
                    ImageSource::External(payload.external.and_then(|f| f.url))
                } else {
                    ImageSource::Hosted(payload.file.and_then(|f| f.url))
                };
                BlockKind::Image {
                    source,
                    caption: payload.caption,
                }
            }
            "toggle" => BlockKind::Toggle(payload.rich_text),
            other => BlockKind::Unsupported(other.to_string()),
        };

        Block {
            id: raw.id,
            has_children: raw.has_children,
            kind,
        }
    }
}
