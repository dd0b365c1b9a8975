//! Static enhancement of a tutorial page.
//!
//! Attaches the navigation bar and drawer, the back-to-top control, the page
//! outline and the first screen of every chapter quiz. Each step quietly does
//! nothing when the page lacks the markup it hangs off.

use std::path::Path;

use futures_util::future::join_all;
use tracing::{debug, error, info};

use crate::config::Config;
use crate::data::{resolve_location, BankLoader, BankSource, LocationSource};
use crate::dom::{has_class, is_tag, tag_with_class, Document, Element, Node};
use crate::models::ChapterTable;
use crate::nav::{render_bar, render_drawer, BackToTop, NavModel};
use crate::outline::{build_outline, collect_headings, render_outline, SlugRegistry};
use crate::quiz::{view, Effect, QuizEvent, QuizMachine, Screen};

/// Everything `enhance` needs besides the page itself.
pub struct PageContext<'a, S = LocationSource> {
    pub config: &'a Config,
    pub chapters: &'a ChapterTable,
    pub loader: &'a BankLoader<S>,
    /// Directory of the page file, used to resolve a relative bank location.
    pub page_dir: Option<&'a Path>,
}

/// The first screen a quiz container ended up on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizReport {
    pub section_id: String,
    pub screen: Screen,
}

/// What was attached to a page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnhanceReport {
    pub nav: bool,
    pub back_to_top: bool,
    /// Number of headings listed in the outline; zero when none was added.
    pub outline_entries: usize,
    pub quizzes: Vec<QuizReport>,
}

pub async fn enhance<S: BankSource>(
    document: &mut Document,
    ctx: &PageContext<'_, S>,
) -> EnhanceReport {
    let chapter = document
        .body()
        .and_then(|body| body.data("chapter"))
        .filter(|slug| !slug.is_empty())
        .map(str::to_string);

    let report = EnhanceReport {
        nav: attach_nav(document, chapter.as_deref(), ctx),
        back_to_top: attach_back_to_top(document, ctx),
        outline_entries: attach_outline(document, chapter.as_deref(), ctx),
        quizzes: attach_quizzes(document, ctx).await,
    };
    info!(
        chapter = chapter.as_deref().unwrap_or("-"),
        nav = report.nav,
        outline = report.outline_entries,
        quizzes = report.quizzes.len(),
        "enhanced page"
    );
    report
}

fn attach_nav<S>(document: &mut Document, chapter: Option<&str>, ctx: &PageContext<'_, S>) -> bool {
    let Some(slug) = chapter else {
        return false;
    };
    let header = tag_with_class("header", "book-header");
    if document.find(header).is_none() || document.find(is_tag("main")).is_none() {
        return false;
    }
    if document.find(is_rendered_nav).is_some() {
        debug!(slug, "navigation already present");
        return false;
    }
    let options = ctx.config.nav_options();
    let Some(model) = NavModel::build(ctx.chapters, slug, &options) else {
        debug!(slug, "chapter not in table, skipping navigation");
        return false;
    };

    let nodes: Vec<Node> = vec![render_bar(&model).into(), render_drawer(&model).into()];
    document.root.insert_after(header, nodes)
}

/// A bar from an earlier run carries `data-chapter`; a static `nav.book-nav`
/// written by the page generator does not.
fn is_rendered_nav(element: &Element) -> bool {
    element.tag == "nav" && element.has_class("book-nav") && element.data("chapter").is_some()
}

fn attach_back_to_top<S>(document: &mut Document, ctx: &PageContext<'_, S>) -> bool {
    let Some(body) = document.body_mut() else {
        return false;
    };
    let control = BackToTop::new(ctx.config.back_to_top_threshold);
    control.attach(body, &ctx.chapters.icons().top)
}

fn attach_outline<S>(
    document: &mut Document,
    chapter: Option<&str>,
    ctx: &PageContext<'_, S>,
) -> usize {
    if chapter == Some(ctx.config.contents_slug.as_str()) {
        return 0;
    }
    let has_outline = document
        .find(is_tag("main"))
        .is_some_and(|main| main.find(tag_with_class("aside", "page-toc")).is_some());
    if has_outline {
        debug!("outline already present");
        return 0;
    }

    let mut registry = SlugRegistry::new();
    let headings = collect_headings(document, &mut registry);
    if headings.is_empty() {
        return 0;
    }

    let panel_id = format!("page-toc-{}", chapter.unwrap_or("page"));
    let outline = render_outline(
        &build_outline(&headings),
        &panel_id,
        &ctx.chapters.icons().outline,
    );
    let Some(main) = document.find_mut(is_tag("main")) else {
        return 0;
    };
    main.insert_before_child(has_class("page"), outline);
    headings.len()
}

fn is_quiz_container(element: &Element) -> bool {
    element.has_class("chapter-quiz") && element.data("section-id").is_some_and(|id| !id.is_empty())
}

async fn attach_quizzes<S: BankSource>(
    document: &mut Document,
    ctx: &PageContext<'_, S>,
) -> Vec<QuizReport> {
    let section_ids: Vec<String> = document
        .root
        .find_all(is_quiz_container)
        .into_iter()
        .filter_map(|container| container.data("section-id"))
        .map(str::to_string)
        .collect();
    if section_ids.is_empty() {
        return Vec::new();
    }

    let location = resolve_location(ctx.page_dir, &ctx.config.bank_location);
    let results = join_all(section_ids.iter().map(|_| ctx.loader.load(&location))).await;

    let mut reports = Vec::with_capacity(section_ids.len());
    let mut rendered = Vec::with_capacity(section_ids.len());
    for (section_id, result) in section_ids.into_iter().zip(results) {
        let mut machine = QuizMachine::new(section_id.as_str());
        for effect in machine.dispatch(QuizEvent::Loaded(result)) {
            match effect {
                Effect::LogError(message) => error!(section_id = %section_id, "{message}"),
                other => debug!(section_id = %section_id, effect = ?other, "quiz effect"),
            }
        }
        rendered.push(view::render(machine.state(), false));
        reports.push(QuizReport {
            screen: machine.state().screen(),
            section_id,
        });
    }

    let mut rendered = rendered.into_iter();
    let mut mount = |container: &mut Element| {
        if !is_quiz_container(container) {
            return;
        }
        let Some(children) = rendered.next() else {
            return;
        };
        if let Some(app) = container.find_mut(has_class("chapter-quiz__app")) {
            app.replace_children(children);
        }
    };
    if is_quiz_container(&document.root) {
        mount(&mut document.root);
    }
    document.root.walk_mut(&mut mount);
    reports
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::error::LoadError;

    const BANK: &str = r#"{
        "sections": [
            {
                "id": "intro",
                "title": "Introduction",
                "questions": [
                    { "prompt": "Pick b", "options": ["a", "b"], "answerIndex": 1 }
                ]
            },
            { "id": "empty", "questions": [] }
        ]
    }"#;

    struct StaticSource {
        body: Option<&'static str>,
        calls: AtomicUsize,
    }

    impl StaticSource {
        fn new(body: Option<&'static str>) -> Self {
            Self {
                body,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl BankSource for StaticSource {
        async fn fetch(&self, location: &str) -> Result<String, LoadError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.body {
                Some(body) => Ok(body.to_string()),
                None => Err(LoadError::Status {
                    location: location.to_string(),
                    status: 404,
                }),
            }
        }
    }

    fn page(chapter: &str, main: &str) -> Document {
        Document::parse(&format!(
            concat!(
                r#"<html><body data-chapter="{chapter}">"#,
                r#"<header class="book-header"><h1>Book</h1></header>"#,
                "<main>{main}</main></body></html>",
            ),
            chapter = chapter,
            main = main,
        ))
        .unwrap()
    }

    async fn run(document: &mut Document, source: StaticSource) -> (EnhanceReport, usize) {
        let config = Config::default();
        let chapters = ChapterTable::builtin();
        let loader = BankLoader::with_source(source);
        let ctx = PageContext {
            config: &config,
            chapters: &chapters,
            loader: &loader,
            page_dir: None,
        };
        let report = enhance(document, &ctx).await;
        let calls = loader_calls(&loader);
        (report, calls)
    }

    fn loader_calls(loader: &BankLoader<StaticSource>) -> usize {
        loader.source().calls.load(Ordering::SeqCst)
    }

    #[tokio::test]
    async fn attaches_nav_after_header() {
        let mut document = page("016-deploy", r#"<div class="page"><h2>Deploy</h2></div>"#);
        let (report, _) = run(&mut document, StaticSource::new(Some(BANK))).await;

        assert!(report.nav);
        let body = document.body().unwrap();
        let tags: Vec<_> = body
            .child_elements()
            .map(|el| format!("{}.{}", el.tag, el.get_attr("class").unwrap_or("")))
            .collect();
        assert_eq!(
            tags,
            [
                "header.book-header",
                "nav.book-nav",
                "div.nav-panel",
                "main.",
                "button.back-to-top"
            ]
        );
    }

    #[tokio::test]
    async fn outline_goes_before_page_content() {
        let mut document = page(
            "016-deploy",
            r#"<div class="page"><h2>Setup</h2><h3>Details</h3><h2 id="setup">Again</h2></div>"#,
        );
        let (report, _) = run(&mut document, StaticSource::new(Some(BANK))).await;

        assert_eq!(report.outline_entries, 3);
        let main = document.find(is_tag("main")).unwrap();
        let first = main.child_elements().next().unwrap();
        assert!(first.has_class("page-toc"));
        assert_eq!(
            first.find(has_class("page-toc__panel")).unwrap().id(),
            Some("page-toc-016-deploy")
        );
        let hrefs: Vec<_> = first
            .find_all(is_tag("a"))
            .into_iter()
            .filter_map(|a| a.get_attr("href"))
            .collect();
        assert_eq!(hrefs, ["#setup-2", "#details", "#setup"]);
    }

    #[tokio::test]
    async fn enhancing_twice_adds_nothing() {
        let mut document = page(
            "016-deploy",
            concat!(
                r#"<div class="page"><h2>Deploy</h2>"#,
                r#"<div class="chapter-quiz" data-section-id="intro">"#,
                r#"<div class="chapter-quiz__app"></div></div></div>"#,
            ),
        );
        let (first, _) = run(&mut document, StaticSource::new(Some(BANK))).await;
        assert!(first.nav);
        assert_eq!(first.outline_entries, 1);

        let mut again = Document::parse(&document.to_html()).unwrap();
        let (second, _) = run(&mut again, StaticSource::new(Some(BANK))).await;

        assert!(!second.nav);
        assert!(!second.back_to_top);
        assert_eq!(second.outline_entries, 0);
        assert_eq!(second.quizzes.len(), 1);
        for class in ["book-nav", "nav-panel", "page-toc", "back-to-top", "chapter-quiz__card"] {
            let count = again.root.find_all(has_class(class)).len();
            assert_eq!(count, 1, "{class}");
        }
    }

    #[tokio::test]
    async fn static_book_nav_does_not_block_navigation() {
        let mut document = page(
            "016-deploy",
            r#"<nav class="book-nav"><a href="index.html">Contents</a></nav><h2>Deploy</h2>"#,
        );
        let (report, _) = run(&mut document, StaticSource::new(Some(BANK))).await;

        assert!(report.nav);
        assert_eq!(document.root.find_all(has_class("book-nav")).len(), 2);
        assert!(document.find(is_rendered_nav).is_some());
    }

    #[tokio::test]
    async fn contents_page_has_no_outline() {
        let mut document = page("index", "<h2>Contents</h2>");
        let (report, _) = run(&mut document, StaticSource::new(Some(BANK))).await;

        assert!(report.nav);
        assert_eq!(report.outline_entries, 0);
        assert!(document.find(has_class("page-toc")).is_none());
    }

    #[tokio::test]
    async fn bare_page_gets_only_back_to_top() {
        let mut document = Document::parse("<html><body><p>Hello</p></body></html>").unwrap();
        let (report, calls) = run(&mut document, StaticSource::new(Some(BANK))).await;

        assert_eq!(
            report,
            EnhanceReport {
                back_to_top: true,
                ..EnhanceReport::default()
            }
        );
        assert_eq!(calls, 0);
    }

    #[tokio::test]
    async fn quizzes_share_one_load() {
        let mut document = page(
            "016-deploy",
            concat!(
                r#"<div class="chapter-quiz" data-section-id="intro">"#,
                r#"<div class="chapter-quiz__app"></div></div>"#,
                r#"<div class="chapter-quiz" data-section-id="empty">"#,
                r#"<div class="chapter-quiz__app"></div></div>"#,
                r#"<div class="chapter-quiz" data-section-id="missing"></div>"#,
            ),
        );
        let (report, calls) = run(&mut document, StaticSource::new(Some(BANK))).await;

        assert_eq!(calls, 1);
        let screens: Vec<_> = report.quizzes.iter().map(|q| q.screen).collect();
        assert_eq!(
            screens,
            [
                Screen::Intro,
                Screen::Error(crate::quiz::QuizFailure::NoQuestions),
                Screen::Error(crate::quiz::QuizFailure::NoQuestions)
            ]
        );

        let apps = document.root.find_all(has_class("chapter-quiz__app"));
        assert!(apps[0].find(has_class("chapter-quiz__button")).is_some());
        assert_eq!(
            apps[1].text_content(),
            "No quiz questions available yet for this chapter."
        );
    }

    #[tokio::test]
    async fn load_failure_shows_error_in_every_quiz() {
        let mut document = page(
            "016-deploy",
            concat!(
                r#"<div class="chapter-quiz" data-section-id="a">"#,
                r#"<div class="chapter-quiz__app"></div></div>"#,
                r#"<div class="chapter-quiz" data-section-id="b">"#,
                r#"<div class="chapter-quiz__app"></div></div>"#,
            ),
        );
        let (report, calls) = run(&mut document, StaticSource::new(None)).await;

        assert_eq!(calls, 1);
        assert_eq!(report.quizzes.len(), 2);
        for app in document.root.find_all(has_class("chapter-quiz__app")) {
            assert_eq!(
                app.text_content(),
                "We could not load the quiz questions. Please refresh and try again."
            );
        }
    }
}
