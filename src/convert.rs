// ABOUTME: Converts Notion blocks and rich text to Markdown
// ABOUTME: One arm per block kind, unsupported kinds leave a visible comment

use crate::model::{Block, BlockKind, ImageSource, RichText};

pub fn plain_text(spans: &[RichText]) -> String {
    spans.iter().map(|span| span.plain_text.as_str()).collect()
}

/// Markdown for a single block. Never fails; empty payloads render empty slots.
pub fn block_to_markdown(block: &Block) -> String {
    match &block.kind {
        BlockKind::Heading { level, text } => {
            let hashes = "#".repeat(usize::from((*level).clamp(1, 3)));
            format!("{} {}\n\n", hashes, plain_text(text))
        }
        BlockKind::Paragraph(text) => format!("{}\n\n", plain_text(text)),
        BlockKind::BulletedListItem(text) => format!("- {}\n", plain_text(text)),
        // Renderers renumber lists, so every item is written as `1.`
        BlockKind::NumberedListItem(text) => format!("1. {}\n", plain_text(text)),
        BlockKind::ToDo { text, checked } => {
            let mark = if *checked { 'x' } else { ' ' };
            format!("- [{}] {}\n", mark, plain_text(text))
        }
        BlockKind::Quote(text) => format!("> {}\n\n", plain_text(text)),
        BlockKind::Callout(text) => format!("> 💡 {}\n\n", plain_text(text)),
        BlockKind::Divider => "\n---\n\n".to_string(),
        BlockKind::Code { language, text } => {
            let code: String = text.iter().map(|span| span.plain_text.as_str()).collect();
            format!("\n```{}\n{}\n```\n\n", language, code)
        }
        BlockKind::Image { source, caption } => {
            let url = match source {
                ImageSource::External(url) | ImageSource::Hosted(url) => {
                    url.as_deref().unwrap_or_default()
                }
            };
            let caption = plain_text(caption);
            let alt = if caption.is_empty() { "image" } else { caption.as_str() };
            format!("![{}]({})\n\n", alt, url)
        }
        // Children follow as flattened siblings, not inside the container
        BlockKind::Toggle(text) => format!(
            "<details><summary>{}</summary>\n\n</details>\n\n",
            plain_text(text)
        ),
        BlockKind::Unsupported(kind) => format!("<!-- unsupported block: {} -->\n", kind),
    }
}

pub fn render_blocks(blocks: &[Block]) -> String {
    blocks.iter().map(block_to_markdown).collect()
}

/// Per-entry file contents: title heading, date line, then the body.
pub fn render_entry(title: &str, date: &str, body: &str) -> String {
    format!("# {}\n\n- Date: {}\n\n{}", title, date, body)
}
