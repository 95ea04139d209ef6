//! End-to-end renders of small archives built in temporary directories.
//!
//! Media goes through a local recording fetcher so nothing touches the network.

use coursepress::atom::UNKNOWN_ATOM_MESSAGE;
use coursepress::classify::CourseType;
use coursepress::media::{MediaError, MediaFetcher, MediaRequest, local_href};
use coursepress::render::{RenderError, RenderOptions, RenderReport, RenderSummary, render_with_fetcher};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;

// =========================================================================
// Fixtures
// =========================================================================

/// Writes the URL as the file body; URLs containing `fail_on` return 404.
struct RecordingFetcher {
    fail_on: Option<String>,
    fetched: Mutex<Vec<String>>,
}

impl RecordingFetcher {
    fn new() -> Self {
        Self {
            fail_on: None,
            fetched: Mutex::new(Vec::new()),
        }
    }

    fn failing_on(pattern: &str) -> Self {
        Self {
            fail_on: Some(pattern.to_string()),
            ..Self::new()
        }
    }
}

impl MediaFetcher for RecordingFetcher {
    fn fetch(&self, request: &MediaRequest<'_>) -> Result<String, MediaError> {
        self.fetched.lock().unwrap().push(request.url.to_string());
        let fails = self
            .fail_on
            .as_deref()
            .is_some_and(|pattern| request.url.contains(pattern));
        if fails {
            return Err(MediaError::Status {
                url: request.url.to_string(),
                status: 404,
            });
        }
        let dir = request.lesson_dir.join(request.subdir);
        fs::create_dir_all(&dir)?;
        fs::write(dir.join(request.file_name), request.url)?;
        Ok(local_href(request.subdir, request.file_name))
    }
}

fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn concept(title: &str, atoms: &[&str]) -> String {
    format!(
        r#"{{"title":{},"atoms":[{}]}}"#,
        serde_json::to_string(title).unwrap(),
        atoms.join(",")
    )
}

fn text(body: &str) -> String {
    format!(
        r#"{{"semantic_type":"TextAtom","text":{}}}"#,
        serde_json::to_string(body).unwrap()
    )
}

fn target_dir(tmp: &TempDir, name: &str) -> PathBuf {
    let target = tmp.path().join(name);
    fs::create_dir(&target).unwrap();
    target
}

fn rendered(report: RenderReport) -> RenderSummary {
    match report {
        RenderReport::Rendered(summary) => summary,
        RenderReport::Skipped { source } => panic!("unexpected skip of {}", source.display()),
    }
}

/// Relative path → bytes for every file below `root`, sorted by path.
fn snapshot(root: &Path) -> Vec<(String, Vec<u8>)> {
    let mut files = Vec::new();
    collect(root, root, &mut files);
    files.sort();
    files
}

fn collect(root: &Path, dir: &Path, files: &mut Vec<(String, Vec<u8>)>) {
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            collect(root, &path, files);
        } else {
            let rel = path.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/");
            files.push((rel, fs::read(&path).unwrap()));
        }
    }
}

fn nanodegree(root: &Path) {
    write(root, "data.json", r#"{"title":"Data Analyst","semantic_type":"Degree"}"#);
    for part in ["Part 10", "Part 2"] {
        write(
            root,
            &format!("{part}/Module 1/Lesson 1/data.json"),
            &format!(
                r#"{{"title":"Lesson","concepts":[{}]}}"#,
                concept(&format!("{part} intro"), &[&text("hello")])
            ),
        );
    }
}

// =========================================================================
// Tests
// =========================================================================

#[test]
fn course_lesson_pages_land_under_archive_name() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("course");
    write(&source, "data.json", r#"{"title":"A Course"}"#);
    write(&source, "Lesson A/c1.json", &concept("Welcome", &[&text("Hi **there**")]));
    write(&source, "Lesson A/c2.json", &concept("Next Steps", &[&text("More")]));
    let target = target_dir(&tmp, "out");

    let summary = rendered(
        render_with_fetcher(&source, &target, &RenderOptions::default(), &RecordingFetcher::new())
            .unwrap(),
    );
    assert_eq!(summary.course_type, CourseType::Course);

    let page = fs::read_to_string(target.join("course/Lesson A/00. Welcome.html")).unwrap();
    assert!(page.contains("<strong>there</strong>"));
    assert!(page.contains("../assets/css/style.css"));
    assert!(page.contains("01.%20Next%20Steps.html"));
    assert!(target.join("course/Lesson A/01. Next Steps.html").exists());
}

#[test]
fn nanodegree_parts_in_natural_order() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("nd");
    nanodegree(&source);
    let target = target_dir(&tmp, "out");

    let summary = rendered(
        render_with_fetcher(&source, &target, &RenderOptions::default(), &RecordingFetcher::new())
            .unwrap(),
    );
    assert_eq!(summary.course_type, CourseType::Nanodegree);
    let lessons: Vec<String> = summary
        .walk
        .pages
        .iter()
        .map(|p| p.parent().unwrap().file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(lessons, vec!["Part 2-Module 1-Lesson 1", "Part 10-Module 1-Lesson 1"]);

    let index = fs::read_to_string(target.join("nd/index.html")).unwrap();
    let p2 = index.find("Part 2-Module 1-Lesson 1").unwrap();
    let p10 = index.find("Part 10-Module 1-Lesson 1").unwrap();
    assert!(p2 < p10);
}

#[test]
fn concept_prefixes_are_zero_padded_in_order() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("course");
    write(&source, "data.json", r#"{"title":"Many"}"#);
    for i in 0..12 {
        write(
            &source,
            &format!("Lesson/c{i}.json"),
            &concept(&format!("Concept {i}"), &[&text("x")]),
        );
    }
    let target = target_dir(&tmp, "out");

    render_with_fetcher(&source, &target, &RenderOptions::default(), &RecordingFetcher::new())
        .unwrap();
    let lesson = target.join("course/Lesson");
    assert!(lesson.join("03. Concept 3.html").exists());
    assert!(lesson.join("10. Concept 10.html").exists());
    assert!(lesson.join("11. Concept 11.html").exists());
    assert!(!lesson.join("12. Concept 12.html").exists());
}

#[test]
fn rendering_twice_produces_identical_trees() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("nd");
    nanodegree(&source);
    write(
        &source,
        "Part 2/Module 1/Lesson 1/data.json",
        &format!(
            r#"{{"title":"Lesson","concepts":[{}]}}"#,
            concept(
                "Pictures",
                &[r#"{"semantic_type":"ImageAtom","url":"//cdn.example.com/a/diagram.png","alt":"d"}"#]
            )
        ),
    );

    let first = target_dir(&tmp, "first");
    let second = target_dir(&tmp, "second");
    for target in [&first, &second] {
        render_with_fetcher(&source, target, &RenderOptions::default(), &RecordingFetcher::new())
            .unwrap();
    }
    let a = snapshot(&first);
    assert!(!a.is_empty());
    assert_eq!(a, snapshot(&second));
}

#[test]
fn unknown_atom_renders_placeholder_and_page_continues() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("course");
    write(&source, "data.json", r#"{"title":"Course"}"#);
    write(
        &source,
        "Lesson/c1.json",
        &concept(
            "Mixed",
            &[r#"{"semantic_type":"FutureAtom","hologram":true}"#, &text("after the unknown")],
        ),
    );
    let target = target_dir(&tmp, "out");

    render_with_fetcher(&source, &target, &RenderOptions::default(), &RecordingFetcher::new())
        .unwrap();
    let page = fs::read_to_string(target.join("course/Lesson/00. Mixed.html")).unwrap();
    let placeholder = page.find(UNKNOWN_ATOM_MESSAGE).unwrap();
    let after = page.find("after the unknown").unwrap();
    assert!(placeholder < after);
}

#[test]
fn failed_video_download_stops_render_and_keeps_earlier_pages() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("course");
    write(&source, "data.json", r#"{"title":"Course"}"#);
    write(&source, "Lesson/c1.json", &concept("Before", &[&text("ok")]));
    write(
        &source,
        "Lesson/c2.json",
        &concept(
            "Broken",
            &[r#"{"semantic_type":"VideoAtom","title":"Clip","video":{"transcodings":{"uri_720p_mp4":"https://cdn.example.com/broken.mp4"}}}"#],
        ),
    );
    write(&source, "Lesson/c3.json", &concept("After", &[&text("never")]));
    let target = target_dir(&tmp, "out");

    let fetcher = RecordingFetcher::failing_on("broken");
    let err = render_with_fetcher(&source, &target, &RenderOptions::default(), &fetcher)
        .unwrap_err();
    assert!(matches!(err, RenderError::Walk(_)));
    assert!(!err.is_precondition());

    let lesson = target.join("course/Lesson");
    assert!(lesson.join("00. Before.html").exists());
    assert!(!lesson.join("01. Broken.html").exists());
    assert!(!lesson.join("02. After.html").exists());
}

#[test]
fn preconditions_write_nothing() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("course");
    write(&source, "data.json", r#"{"title":"Course"}"#);
    write(&source, "Lesson/c1.json", &concept("Only", &[&text("x")]));
    let before = snapshot(tmp.path());

    let err = render_with_fetcher(&source, &source, &RenderOptions::default(), &RecordingFetcher::new())
        .unwrap_err();
    assert!(matches!(err, RenderError::SameSourceAndTarget(_)));

    let missing = tmp.path().join("nope");
    let err = render_with_fetcher(&source, &missing, &RenderOptions::default(), &RecordingFetcher::new())
        .unwrap_err();
    assert!(matches!(err, RenderError::TargetMissing(_)));

    assert_eq!(snapshot(tmp.path()), before);
}

#[test]
fn media_links_remotely_when_downloads_disabled() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("course");
    write(&source, "data.json", r#"{"title":"Course"}"#);
    write(
        &source,
        "Lesson/c1.json",
        &concept(
            "Pic",
            &[r#"{"semantic_type":"ImageAtom","url":"//cdn.example.com/pic.png"}"#],
        ),
    );
    let target = target_dir(&tmp, "out");

    let mut options = RenderOptions::default();
    options.config.media.download = false;
    let fetcher = coursepress::media::fetcher_for(&options.config.media).unwrap();
    render_with_fetcher(&source, &target, &options, fetcher.as_ref()).unwrap();

    let page = fs::read_to_string(target.join("course/Lesson/00. Pic.html")).unwrap();
    assert!(page.contains("https://cdn.example.com/pic.png"));
    assert!(!target.join("course/Lesson/img").exists());
}
