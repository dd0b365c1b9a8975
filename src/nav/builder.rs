use crate::dom::{Element, Node};
use crate::models::{Chapter, ChapterTable};

/// Page-independent link targets for the navigation bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavOptions {
    pub home_href: String,
    pub contents_href: String,
    /// Slug of the contents page, whose contents link is disabled.
    pub contents_slug: String,
}

impl Default for NavOptions {
    fn default() -> Self {
        Self {
            home_href: "../index.html".to_string(),
            contents_href: "index.html".to_string(),
            contents_slug: "index".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Home,
    Contents,
    Previous,
    Next,
}

impl LinkKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Contents => "Contents",
            Self::Previous => "Previous",
            Self::Next => "Next",
        }
    }

    pub fn class(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Contents => "contents",
            Self::Previous => "previous",
            Self::Next => "next",
        }
    }
}

/// A shortcut link; `href` is `None` when the link is disabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub kind: LinkKind,
    pub icon: String,
    pub href: Option<String>,
}

impl NavLink {
    pub fn is_disabled(&self) -> bool {
        self.href.is_none()
    }
}

/// Navigation for one chapter page.
#[derive(Debug, Clone)]
pub struct NavModel<'a> {
    table: &'a ChapterTable,
    pub current: &'a Chapter,
    pub previous: Option<&'a Chapter>,
    pub next: Option<&'a Chapter>,
    pub is_contents_page: bool,
    pub links: [NavLink; 4],
}

impl<'a> NavModel<'a> {
    /// Look up `slug` in the table. An unknown slug yields `None`.
    pub fn build(table: &'a ChapterTable, slug: &str, options: &NavOptions) -> Option<Self> {
        let index = table.position(slug)?;
        let chapters = table.chapters();
        let current = &chapters[index];
        let previous = index.checked_sub(1).and_then(|i| chapters.get(i));
        let next = chapters.get(index + 1);
        let is_contents_page = current.slug == options.contents_slug;
        let icons = table.icons();

        let links = [
            NavLink {
                kind: LinkKind::Home,
                icon: icons.home.clone(),
                href: Some(options.home_href.clone()),
            },
            NavLink {
                kind: LinkKind::Contents,
                icon: icons.contents.clone(),
                href: (!is_contents_page).then(|| options.contents_href.clone()),
            },
            NavLink {
                kind: LinkKind::Previous,
                icon: icons.prev.clone(),
                href: previous.map(|chapter| chapter.file.clone()),
            },
            NavLink {
                kind: LinkKind::Next,
                icon: icons.next.clone(),
                href: next.map(|chapter| chapter.file.clone()),
            },
        ];

        Some(Self {
            table,
            current,
            previous,
            next,
            is_contents_page,
            links,
        })
    }

    pub fn link(&self, kind: LinkKind) -> &NavLink {
        &self.links[kind as usize]
    }

    pub fn drawer_id(&self) -> String {
        format!("nav-panel-{}", self.current.slug)
    }
}

fn icon(glyph: &str) -> Element {
    Element::new("span")
        .class("icon")
        .attr("aria-hidden", "true")
        .text(glyph)
}

fn bar_link(link: &NavLink) -> Element {
    let class = format!("nav-link {}", link.kind.class());
    let children = [icon(&link.icon), Element::new("span").class("label").text(link.kind.label())];
    match &link.href {
        Some(href) => Element::new("a")
            .class(&class)
            .attr("href", href.as_str())
            .children(children),
        None => Element::new("span")
            .class(&format!("nav-link disabled {}", link.kind.class()))
            .attr("aria-disabled", "true")
            .children(children),
    }
}

/// The always-visible bar: menu toggle plus the four shortcut links.
pub fn render_bar(model: &NavModel<'_>) -> Element {
    let drawer_id = model.drawer_id();
    let icons = model.table.icons();

    let toggle = Element::new("button")
        .class("nav-toggle")
        .attr("type", "button")
        .attr("aria-expanded", "false")
        .attr("aria-controls", drawer_id.as_str())
        .attr("data-target", drawer_id.as_str())
        .attr("aria-label", "Toggle menu")
        .child(icon(&icons.menu))
        .child(Element::new("span").class("label").text("Menu"));

    let links = Element::new("div")
        .class("nav-links")
        .children(model.links.iter().map(bar_link));

    Element::new("nav")
        .class("book-nav")
        .attr("data-chapter", model.current.slug.as_str())
        .child(toggle)
        .child(links)
}

struct DrawerItem<'a> {
    href: Option<&'a str>,
    label: &'a str,
    icon: Option<&'a str>,
}

fn drawer_group(title: &str, items: &[DrawerItem<'_>], current_file: &str) -> Element {
    let entries = items.iter().map(|item| {
        let mut children: Vec<Node> = Vec::with_capacity(2);
        if let Some(glyph) = item.icon {
            children.push(icon(glyph).into());
        }
        children.push(item.label.into());

        let link = match item.href {
            None => Element::new("span")
                .class("nav-panel__link disabled")
                .attr("aria-disabled", "true")
                .children(children),
            Some(href) => {
                let class = if href == current_file {
                    "nav-panel__link is-active"
                } else {
                    "nav-panel__link"
                };
                Element::new("a").class(class).attr("href", href).children(children)
            }
        };
        Element::new("li").child(link)
    });

    Element::new("div")
        .class("nav-panel__group")
        .child(Element::new("h3").class("nav-panel__title").text(title))
        .child(Element::new("ul").class("nav-panel__list").children(entries))
}

/// The slide-out drawer: labelled shortcuts and the full chapter list.
pub fn render_drawer(model: &NavModel<'_>) -> Element {
    let current_file = model.current.file.as_str();

    let shortcuts: Vec<DrawerItem<'_>> = model
        .links
        .iter()
        .filter(|link| match link.kind {
            LinkKind::Previous | LinkKind::Next => !link.is_disabled(),
            LinkKind::Home | LinkKind::Contents => true,
        })
        .map(|link| DrawerItem {
            href: link.href.as_deref(),
            label: link.kind.label(),
            icon: Some(link.icon.as_str()),
        })
        .collect();

    let chapters: Vec<DrawerItem<'_>> = model
        .table
        .chapters()
        .iter()
        .map(|chapter| DrawerItem {
            href: Some(chapter.file.as_str()),
            label: chapter.title.as_str(),
            icon: None,
        })
        .collect();

    Element::new("div")
        .class("nav-panel")
        .attr("id", model.drawer_id())
        .attr("aria-hidden", "true")
        .child(drawer_group("Shortcuts", &shortcuts, current_file))
        .child(drawer_group("Chapters", &chapters, current_file))
}
