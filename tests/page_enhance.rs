use tutorial_widgets::dom::{has_class, is_tag, Document};
use tutorial_widgets::page::{enhance, PageContext};
use tutorial_widgets::quiz::Screen;
use tutorial_widgets::{BankLoader, ChapterTable, Config, LoadState};

const PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Django Forms</title>
</head>
<body data-chapter="026-django-forms">
  <header class="book-header"><a href="index.html">Django Girls Tutorial</a></header>
  <main>
    <div class="page">
      <h1>Django Forms</h1>
      <h2>Forms</h2>
      <h3>Link to a page with the form</h3>
      <h2>Save the form</h2>
      <h2>Form validation</h2>
      <h3>Edit form</h3>
      <div class="chapter-quiz" data-section-id="django-forms">
        <div class="chapter-quiz__app"><p>Quiz loads here.</p></div>
      </div>
    </div>
  </main>
</body>
</html>
"#;

const BANK: &str = r#"{"sections":[{"id":"django-forms","title":"Django Forms","questions":[
  {"prompt":"Which class do model forms extend?",
   "options":["forms.ModelForm","forms.Form"],"answerIndex":0}
]}]}"#;

#[tokio::test]
async fn enhances_a_chapter_page_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("questions.json"), BANK).unwrap();

    let config = Config {
        bank_location: "questions.json".to_string(),
        ..Config::default()
    };
    let chapters = ChapterTable::builtin();
    let loader = BankLoader::new();
    let ctx = PageContext {
        config: &config,
        chapters: &chapters,
        loader: &loader,
        page_dir: Some(dir.path()),
    };

    let mut document = Document::parse(PAGE).unwrap();
    let report = enhance(&mut document, &ctx).await;

    assert!(report.nav);
    assert!(report.back_to_top);
    assert_eq!(report.outline_entries, 5);
    assert_eq!(report.quizzes.len(), 1);
    assert_eq!(report.quizzes[0].screen, Screen::Intro);
    let bank_location = dir.path().join("questions.json").to_string_lossy().into_owned();
    assert!(loader.state(&bank_location).is_loaded());

    let nav = document.find(is_tag("nav")).unwrap();
    let previous = nav.find(has_class("previous")).unwrap();
    assert_eq!(previous.get_attr("href"), Some("025-extend-your-application.html"));
    assert_eq!(
        nav.find(has_class("next")).unwrap().get_attr("href"),
        Some("027-what-s-next.html")
    );

    let outline = document.find(has_class("page-toc")).unwrap();
    let top_level: Vec<_> = outline
        .find(has_class("page-toc__list"))
        .unwrap()
        .child_elements()
        .map(|item| item.find(is_tag("a")).unwrap().text_content())
        .collect();
    assert_eq!(top_level, ["Forms", "Save the form", "Form validation"]);

    let html = document.to_html();
    assert!(html.starts_with("<!DOCTYPE html>\n<html"));
    assert!(html.contains(r#"<h2 id="forms">Forms</h2>"#));
    assert!(html.contains(r#"<meta charset="utf-8" />"#));
    assert!(html.contains("Ready for a quick check-in?"));
    assert!(!html.contains("Quiz loads here."));

    let reparsed = Document::parse(&html).unwrap();
    assert_eq!(reparsed.root.find_all(has_class("book-nav")).len(), 1);
}

#[tokio::test]
async fn missing_bank_renders_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        bank_location: "missing/questions.json".to_string(),
        ..Config::default()
    };
    let chapters = ChapterTable::builtin();
    let loader = BankLoader::new();
    let ctx = PageContext {
        config: &config,
        chapters: &chapters,
        loader: &loader,
        page_dir: Some(dir.path()),
    };

    let mut document = Document::parse(PAGE).unwrap();
    let report = enhance(&mut document, &ctx).await;

    assert_eq!(report.quizzes.len(), 1);
    let app = document.find(has_class("chapter-quiz__app")).unwrap();
    assert_eq!(
        app.text_content(),
        "We could not load the quiz questions. Please refresh and try again."
    );
    let location = dir
        .path()
        .join("missing/questions.json")
        .to_string_lossy()
        .into_owned();
    assert!(matches!(loader.state(&location), LoadState::Failed(_)));
}
