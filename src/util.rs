// ABOUTME: Utility functions for slugging and date normalization
// ABOUTME: Provides consistent filename and anchor generation

pub fn slugify(text: &str) -> String {
    slug::slugify(text)
}

/// Slug of `text`, or `fallback` when nothing slug-safe remains.
pub fn slugify_or(text: &str, fallback: &str) -> String {
    let slug = slugify(text);
    if slug.is_empty() {
        fallback.to_string()
    } else {
        slug
    }
}


/// Makes a date string filesystem-safe by replacing every `:` with `-`.
pub fn normalize_date(start: &str) -> String {
    start.replace(':', "-")
}
