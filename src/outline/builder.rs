use crate::dom::{has_class, is_tag, Document, Element};
use crate::models::HeadingEntry;

use super::slug::SlugRegistry;

/// One entry of the page outline with the headings nested beneath it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineNode {
    pub level: u8,
    pub id: String,
    pub text: String,
    pub children: Vec<OutlineNode>,
}

/// Find the `h2`..`h6` headings of the main content in document order,
/// giving every heading without an id a unique one.
///
/// Every id already present in the document is registered first, so
/// generated ids never collide with authored ones. Headings with blank text
/// are skipped. Returns an empty list when the page has no `main`.
pub fn collect_headings(document: &mut Document, registry: &mut SlugRegistry) -> Vec<HeadingEntry> {
    register_existing_ids(&document.root, registry);

    let Some(main) = document.find_mut(is_tag("main")) else {
        return Vec::new();
    };
    let has_page = main.find(has_class("page")).is_some();
    let content = if has_page {
        match main.find_mut(has_class("page")) {
            Some(page) => page,
            None => return Vec::new(),
        }
    } else {
        main
    };

    let mut entries = Vec::new();
    content.walk_mut(&mut |element: &mut Element| {
        let Some(level) = HeadingEntry::level_of(&element.tag) else {
            return;
        };
        let text = element.text_content();
        let text = text.trim();
        if text.is_empty() {
            return;
        }

        let existing = element.id().map(str::to_string);
        let id = match existing {
            Some(id) => id,
            None => {
                let id = registry.assign(text);
                element.set_attr("id", id.as_str());
                id
            }
        };
        entries.push(HeadingEntry {
            level,
            id,
            text: text.to_string(),
        });
    });
    entries
}

fn register_existing_ids(element: &Element, registry: &mut SlugRegistry) {
    if let Some(id) = element.id() {
        registry.register(id);
    }
    for child in element.child_elements() {
        register_existing_ids(child, registry);
    }
}

/// Nest headings by level.
///
/// A heading deeper than the open one becomes its child; an equal or
/// shallower heading closes open entries until a shallower parent is found.
pub fn build_outline(headings: &[HeadingEntry]) -> Vec<OutlineNode> {
    let mut roots = Vec::new();
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); headings.len()];
    // (level, heading index); the seed entry stands for the page itself.
    let mut stack: Vec<(u8, Option<usize>)> = vec![(1, None)];

    for (index, heading) in headings.iter().enumerate() {
        while stack.len() > 1 && stack.last().is_some_and(|(level, _)| heading.level <= *level) {
            stack.pop();
        }
        match stack.last().and_then(|(_, parent)| *parent) {
            Some(parent) => children[parent].push(index),
            None => roots.push(index),
        }
        stack.push((heading.level, Some(index)));
    }

    roots
        .into_iter()
        .map(|index| assemble(index, headings, &children))
        .collect()
}

fn assemble(index: usize, headings: &[HeadingEntry], children: &[Vec<usize>]) -> OutlineNode {
    let heading = &headings[index];
    OutlineNode {
        level: heading.level,
        id: heading.id.clone(),
        text: heading.text.clone(),
        children: children[index]
            .iter()
            .map(|&child| assemble(child, headings, children))
            .collect(),
    }
}

fn render_items(nodes: &[OutlineNode], list: Element) -> Element {
    list.children(nodes.iter().map(|node| {
        let mut item = Element::new("li")
            .class(&format!("toc-level toc-level-{}", node.level))
            .child(
                Element::new("a")
                    .attr("href", format!("#{}", node.id))
                    .text(node.text.as_str()),
            );
        if !node.children.is_empty() {
            item = item.child(render_items(
                &node.children,
                Element::new("ul").class("page-toc__sublist"),
            ));
        }
        item
    }))
}

/// The collapsible outline panel. Starts collapsed.
pub fn render_outline(nodes: &[OutlineNode], panel_id: &str, glyph: &str) -> Element {
    let toggle = Element::new("button")
        .class("page-toc__toggle")
        .attr("type", "button")
        .attr("aria-expanded", "false")
        .attr("aria-controls", panel_id)
        .attr("aria-label", "Toggle page outline")
        .child(
            Element::new("span")
                .class("icon")
                .attr("aria-hidden", "true")
                .text(glyph),
        )
        .child(Element::new("span").class("label").text("On this page"));

    let panel = Element::new("div")
        .class("page-toc__panel")
        .attr("id", panel_id)
        .child(render_items(nodes, Element::new("ul").class("page-toc__list")));

    Element::new("aside").class("page-toc").child(toggle).child(panel)
}

/// Expanded/collapsed state of the outline panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutlineToggle {
    pub expanded: bool,
}

impl OutlineToggle {
    pub fn toggle(&mut self) -> bool {
        self.expanded = !self.expanded;
        self.expanded
    }

    /// Reflect the state on a rendered `aside.page-toc`.
    pub fn apply(&self, outline: &mut Element) {
        outline.toggle_class("open", self.expanded);
        if let Some(button) = outline.find_mut(has_class("page-toc__toggle")) {
            button.set_attr("aria-expanded", if self.expanded { "true" } else { "false" });
        }
    }
}
