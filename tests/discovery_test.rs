//! Source discovery and output naming.

use std::fs;
use std::path::{Path, PathBuf};

use proptest::prelude::*;

use mailsmith::{BuildTask, TemplateEngine, TemplateOptions, content_files, is_partial};

fn touch(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, "<p>x</p>").unwrap();
    path
}

#[test]
fn test_discovery_skips_partials_and_other_files() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "welcome.html");
    touch(dir.path(), "_layout.html");
    touch(dir.path(), "notes.txt");
    touch(dir.path(), "style.css");
    touch(dir.path(), "orders/receipt.HTML");
    touch(dir.path(), "orders/_row.html");
    fs::create_dir_all(dir.path().join("folder.html")).unwrap();

    let found: Vec<PathBuf> = content_files(dir.path()).collect();

    assert_eq!(
        found,
        vec![
            dir.path().join("orders/receipt.HTML"),
            dir.path().join("welcome.html"),
        ]
    );
}

#[test]
fn test_discovery_is_restartable() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "a.html");
    touch(dir.path(), "b.html");

    let first: Vec<_> = content_files(dir.path()).collect();
    touch(dir.path(), "c.html");
    let second: Vec<_> = content_files(dir.path()).collect();

    assert_eq!(first.len(), 2);
    assert_eq!(second.len(), 3);
}

#[test]
fn test_task_builds_discovered_pages() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("src");
    fs::create_dir(&src).unwrap();
    fs::write(
        src.join("_layout.html"),
        r#"<main data-render-section="body"></main>"#,
    )
    .unwrap();
    fs::write(src.join("hello.html"), r#"<meta resource="_layout.html"><p>Hello</p>"#).unwrap();
    let out = dir.path().join("out");

    let written = BuildTask::new(&out)
        .with_sources(content_files(&src))
        .execute()
        .unwrap();

    assert_eq!(written, vec![out.join("hello.html")]);
    assert_eq!(fs::read_to_string(&written[0]).unwrap(), "<p>Hello</p>");
}

fn file_stem() -> impl Strategy<Value = String> {
    "_?[a-z][a-z0-9-]{0,8}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn discovery_never_returns_partials(stems in prop::collection::vec(file_stem(), 1..8)) {
        let dir = tempfile::tempdir().unwrap();
        for stem in &stems {
            touch(dir.path(), &format!("{stem}.html"));
        }

        let found: Vec<PathBuf> = content_files(dir.path()).collect();
        let expected = stems
            .iter()
            .filter(|s| !s.starts_with('_'))
            .collect::<std::collections::BTreeSet<_>>()
            .len();

        prop_assert_eq!(found.len(), expected);
        for path in &found {
            prop_assert!(!is_partial(path));
        }
    }

    #[test]
    fn output_path_keeps_file_name(
        dirs in prop::collection::vec("[a-z]{1,6}", 0..4),
        stem in "[a-z][a-z0-9]{0,8}",
    ) {
        let mut source = PathBuf::from("templates");
        source.extend(&dirs);
        source.push(format!("{stem}.html"));

        let engine = TemplateEngine::new(TemplateOptions::new("out"));
        let output = engine.output_path(&source).unwrap();

        prop_assert_eq!(output, Path::new("out").join(format!("{stem}.html")));
    }
}
