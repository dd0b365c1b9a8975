/// A heading found in the page content, after its id has been settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingEntry {
    /// 2 through 6.
    pub level: u8,
    pub id: String,
    pub text: String,
}

impl HeadingEntry {
    /// Heading level for a tag name like `h3`, limited to `h2`..`h6`.
    pub fn level_of(tag: &str) -> Option<u8> {
        match tag.to_ascii_lowercase().as_str() {
            "h2" => Some(2),
            "h3" => Some(3),
            "h4" => Some(4),
            "h5" => Some(5),
            "h6" => Some(6),
            _ => None,
        }
    }
}
