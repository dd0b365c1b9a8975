use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

/// One page of the tutorial in reading order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Chapter {
    pub slug: String,
    pub file: String,
    pub title: String,
}

impl Chapter {
    fn new(slug: &str, title: &str) -> Self {
        Self {
            slug: slug.to_string(),
            file: format!("{slug}.html"),
            title: title.to_string(),
        }
    }
}

/// Glyphs used by the navigation bar and drawer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Icons {
    pub menu: String,
    pub home: String,
    pub contents: String,
    pub prev: String,
    pub next: String,
    pub top: String,
    pub outline: String,
}

impl Default for Icons {
    fn default() -> Self {
        Self {
            menu: "≡".to_string(),
            home: "⌂".to_string(),
            contents: "≣".to_string(),
            prev: "←".to_string(),
            next: "→".to_string(),
            top: "↑".to_string(),
            outline: "▸".to_string(),
        }
    }
}

#[derive(Deserialize)]
struct ChapterFile {
    chapters: Vec<Chapter>,
    #[serde(default)]
    icons: Icons,
}

/// Ordered, immutable chapter list handed to the navigation builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterTable {
    chapters: Vec<Chapter>,
    icons: Icons,
}

impl ChapterTable {
    pub fn new(chapters: Vec<Chapter>, icons: Icons) -> Result<Self, ConfigError> {
        if chapters.is_empty() {
            return Err(ConfigError::EmptyChapterTable);
        }
        let mut seen = HashSet::new();
        for chapter in &chapters {
            if !seen.insert(chapter.slug.as_str()) {
                return Err(ConfigError::DuplicateSlug(chapter.slug.clone()));
            }
        }
        Ok(Self { chapters, icons })
    }

    /// The chapter list compiled into the binary.
    pub fn builtin() -> Self {
        let chapters = [
            ("index", "Contents"),
            ("001-cover", "Cover"),
            ("003-introduction", "Introduction"),
            ("004-installation", "Installation"),
            ("006-how-the-internet-works", "How the Internet works"),
            ("007-introduction-to-command-line", "Introduction to command line"),
            ("008-python-installation", "Python installation"),
            ("009-code-editor", "Code editor"),
            ("010-introduction-to-python", "Introduction to Python"),
            ("011-what-is-django", "What is Django?"),
            ("012-django-installation", "Django installation"),
            ("013-your-first-django-project", "Your first Django project!"),
            ("014-django-models", "Django models"),
            ("015-django-admin", "Django admin"),
            ("016-deploy", "Deploy!"),
            ("017-django-urls", "Django URLs"),
            ("018-django-views-time-to-create", "Django views – time to create!"),
            ("019-introduction-to-html", "Introduction to HTML"),
            ("020-django-orm-querysets", "Django ORM (Querysets)"),
            ("021-dynamic-data-in-templates", "Dynamic data in templates"),
            ("022-django-templates", "Django templates"),
            ("023-css-make-it-pretty", "CSS – make it pretty"),
            ("024-template-extending", "Template extending"),
            ("025-extend-your-application", "Extend your application"),
            ("026-django-forms", "Django Forms"),
            ("027-what-s-next", "What's next?"),
        ]
        .into_iter()
        .map(|(slug, title)| Chapter::new(slug, title))
        .collect();

        Self {
            chapters,
            icons: Icons::default(),
        }
    }

    /// Parse a table from TOML:
    ///
    /// ```toml
    /// [[chapters]]
    /// slug = "index"
    /// file = "index.html"
    /// title = "Contents"
    /// ```
    pub fn from_toml_str(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let parsed: ChapterFile = toml::from_str(content).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })?;
        Self::new(parsed.chapters, parsed.icons)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content, path)
    }

    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    pub fn icons(&self) -> &Icons {
        &self.icons
    }

    pub fn position(&self, slug: &str) -> Option<usize> {
        self.chapters.iter().position(|chapter| chapter.slug == slug)
    }
}

impl Default for ChapterTable {
    fn default() -> Self {
        Self::builtin()
    }
}
