use std::collections::HashSet;

const FALLBACK_SLUG: &str = "section";

/// Lower-case, trim, drop everything but `[a-z0-9]`, whitespace and `-`, then
/// turn each whitespace run into a single `-`.
pub fn slug_base(text: &str) -> String {
    let lowered = text.to_lowercase();
    let kept: String = lowered
        .trim()
        .chars()
        .filter(|ch| {
            ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch.is_whitespace() || *ch == '-'
        })
        .collect();

    let mut slug = String::with_capacity(kept.len());
    let mut in_space = false;
    for ch in kept.chars() {
        if ch.is_whitespace() {
            if !in_space {
                slug.push('-');
            }
            in_space = true;
        } else {
            slug.push(ch);
            in_space = false;
        }
    }
    slug
}

/// Ids already used on the current page.
#[derive(Debug, Default, Clone)]
pub struct SlugRegistry {
    seen: HashSet<String>,
}

impl SlugRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an id that exists in the page. Returns false if it was known.
    pub fn register(&mut self, id: &str) -> bool {
        self.seen.insert(id.to_string())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.seen.contains(id)
    }

    /// Derive a fresh id from heading text, suffixing `-2`, `-3`, ... on
    /// collision.
    pub fn assign(&mut self, text: &str) -> String {
        let base = slug_base(text);
        let base = if base.is_empty() { FALLBACK_SLUG.to_string() } else { base };

        let mut slug = base.clone();
        let mut counter = 1;
        while self.seen.contains(&slug) {
            counter += 1;
            slug = format!("{base}-{counter}");
        }
        self.seen.insert(slug.clone());
        slug
    }
}
