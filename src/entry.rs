// ABOUTME: Resolves a Notion page into diary entry metadata
// ABOUTME: Title, normalized date, file name, anchor, and fallback body text

use crate::config::ExportConfig;
use crate::convert::plain_text;
use crate::model::{Page, PropertyValue};
use crate::util::{normalize_date, slugify_or};

pub const UNTITLED: &str = "untitled";
pub const UNKNOWN_DATE: &str = "unknown";

#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub page_id: String,
    pub title: String,
    pub date: String,
    /// Text of the first non-empty fallback property, used when the page has no blocks.
    pub fallback_body: Option<String>,
}

impl Entry {
    pub fn resolve(page: &Page, config: &ExportConfig) -> Self {
        let title = match page.properties.get(&config.title_property) {
            Some(PropertyValue::Title { title }) => plain_text(title),
            _ => String::new(),
        };
        let title = if title.is_empty() {
            tracing::warn!(page_id = %page.id, "page has no title, using \"{}\"", UNTITLED);
            UNTITLED.to_string()
        } else {
            title
        };

        let date = match page.properties.get(&config.date_property) {
            Some(PropertyValue::Date {
                date: Some(value),
            }) => value.start.as_deref().map(normalize_date),
            _ => None,
        }
        .unwrap_or_else(|| UNKNOWN_DATE.to_string());

        let fallback_body = config.fallback_properties.iter().find_map(|name| {
            match page.properties.get(name) {
                Some(PropertyValue::RichText { rich_text }) if !rich_text.is_empty() => {
                    Some(plain_text(rich_text)).filter(|text| !text.is_empty())
                }
                _ => None,
            }
        });

        Entry {
            page_id: page.id.clone(),
            title,
            date,
            fallback_body,
        }
    }

    /// `{date}_{slug}.md`, slug falling back to `note`.
    pub fn file_name(&self) -> String {
        format!("{}_{}.md", self.date, slugify_or(&self.title, "note"))
    }

    /// Link target for this entry's section in the combined file.
    pub fn anchor(&self) -> String {
        anchor_for(&self.date, &self.title)
    }

    /// `{date} {title}`, used for the index line and section heading.
    pub fn label(&self) -> String {
        format!("{} {}", self.date, self.title)
    }
}

pub fn anchor_for(date: &str, title: &str) -> String {
    slugify_or(&format!("{}-{}", date, title), "entry")
}
