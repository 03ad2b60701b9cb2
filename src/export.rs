// ABOUTME: Export orchestration: query, sort, render, and write diary entries
// ABOUTME: Produces one file per entry plus a combined file with an index

use crate::api::{DocumentSource, PageQuery, TitleFilter};
use crate::config::ExportConfig;
use crate::convert::{render_blocks, render_entry};
use crate::entry::Entry;
use crate::fetch::{collect_pages, fetch_tree};
use crate::storage::OutputSink;
use crate::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use indicatif::{ProgressBar, ProgressStyle};

pub const NO_CONTENT: &str = "_(no content)_\n";
pub const INDEX_ANCHOR: &str = "index";

#[derive(Debug, Clone, PartialEq)]
pub struct ExportSummary {
    pub entries: usize,
    /// Per-entry file names in write order.
    pub files: Vec<String>,
    pub combined: String,
}

/// Combined Markdown: header, index, then one anchored section per entry.
pub struct CombinedDocument {
    buf: String,
}

impl CombinedDocument {
    pub fn new(title: &str, generated_at: &DateTime<Utc>, entries: &[Entry]) -> Self {
        let mut buf = format!(
            "# {}\n\n> Generated: {}\n\n---\n\n<a id=\"{}\"></a>\n\n## Index\n\n",
            title,
            generated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            INDEX_ANCHOR
        );
        for entry in entries {
            buf.push_str(&format!("- [{}](#{})\n", entry.label(), entry.anchor()));
        }
        buf.push_str("\n---\n\n");
        CombinedDocument { buf }
    }

    pub fn push_section(&mut self, entry: &Entry, body: &str) {
        self.buf.push_str(&format!(
            "\n<a id=\"{}\"></a>\n\n## {}\n\n{}\n[↥ Back to index](#{})\n\n---\n",
            entry.anchor(),
            entry.label(),
            body,
            INDEX_ANCHOR
        ));
    }

    pub fn finish(self) -> String {
        self.buf
    }
}

pub struct Exporter<'a, S: DocumentSource + ?Sized> {
    source: &'a S,
    database_id: String,
    config: ExportConfig,
    show_progress: bool,
}

impl<'a, S: DocumentSource + ?Sized> Exporter<'a, S> {
    pub fn new(source: &'a S, database_id: impl Into<String>, config: ExportConfig) -> Self {
        Exporter {
            source,
            database_id: database_id.into(),
            config,
            show_progress: false,
        }
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn query(&self) -> PageQuery {
        PageQuery {
            database_id: self.database_id.clone(),
            title_filter: self.config.filter.as_ref().map(|contains| TitleFilter {
                property: self.config.title_property.clone(),
                contains: contains.clone(),
            }),
        }
    }

    /// All matching entries, oldest first. Ties keep query order.
    pub fn list_entries(&self) -> Result<Vec<Entry>> {
        let pages = collect_pages(self.source, &self.query())?;
        let mut entries: Vec<Entry> = pages
            .iter()
            .map(|page| Entry::resolve(page, &self.config))
            .collect();
        entries.sort_by(|a, b| a.date.cmp(&b.date));
        Ok(entries)
    }

    /// Markdown body for one entry: its blocks, else the fallback text, else a placeholder.
    pub fn render_body(&self, entry: &Entry) -> Result<String> {
        let blocks =
            fetch_tree(self.source, &entry.page_id).map_err(|e| e.for_page(&entry.page_id))?;

        if !blocks.is_empty() {
            return Ok(render_blocks(&blocks));
        }

        Ok(match &entry.fallback_body {
            Some(text) => format!("{}\n\n", text),
            None => NO_CONTENT.to_string(),
        })
    }

    /// Per-entry Markdown for a single page, fetched by id.
    pub fn render_page(&self, page_id: &str) -> Result<(Entry, String)> {
        let page = self.source.retrieve_page(page_id)?;
        let entry = Entry::resolve(&page, &self.config);
        let body = self.render_body(&entry)?;
        let markdown = render_entry(&entry.title, &entry.date, &body);
        Ok((entry, markdown))
    }

    /// Writes every entry file, then the combined file in a single final write.
    pub fn export(
        &self,
        sink: &mut dyn OutputSink,
        generated_at: DateTime<Utc>,
    ) -> Result<ExportSummary> {
        tracing::info!(
            database_id = %self.database_id,
            filter = ?self.config.filter,
            "querying database"
        );
        let entries = self.list_entries()?;
        tracing::info!(count = entries.len(), "pages to export");

        let mut combined = CombinedDocument::new(&self.config.combined_title, &generated_at, &entries);
        let mut files = Vec::with_capacity(entries.len());

        let pb = if self.show_progress {
            ProgressBar::new(entries.len() as u64)
        } else {
            ProgressBar::hidden()
        };
        if let Ok(style) = ProgressStyle::default_bar().template("[{bar:40}] {pos}/{len} entries") {
            pb.set_style(style.progress_chars("##-"));
        }

        for entry in &entries {
            let body = self.render_body(entry)?;

            let file_name = entry.file_name();
            sink.write(&file_name, &render_entry(&entry.title, &entry.date, &body))?;
            tracing::debug!(file = %file_name, page_id = %entry.page_id, "wrote entry");

            combined.push_section(entry, &body);
            files.push(file_name);
            pb.inc(1);
        }

        sink.write(&self.config.combined_file, &combined.finish())?;
        pb.finish_and_clear();

        tracing::info!(
            entries = entries.len(),
            combined = %self.config.combined_file,
            "export complete"
        );

        Ok(ExportSummary {
            entries: entries.len(),
            files,
            combined: self.config.combined_file.clone(),
        })
    }
}
