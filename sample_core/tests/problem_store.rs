use std::{
    cell::Cell,
    fs,
    rc::Rc,
};

use sample_core::{
    error::{Error, Result},
    problem::{Problem, Sample},
    remote::ProblemSource,
    store::ProblemStore,
};

const PAGE: &str = r#"
<html><body>
<span id="problem_title">Square</span>
<table id="problem-info">
  <tbody><tr><td>1 초</td><td>256 KB</td></tr></tbody>
</table>
<pre id="sample-input-1">3
</pre>
<pre id="sample-output-1">9
</pre>
</body></html>
"#;

/// Serves a fixed page and counts how often it was asked.
struct FakeSource {
    page: Option<&'static str>,
    hits: Rc<Cell<usize>>,
}

impl ProblemSource for FakeSource {
    fn get_name(&self) -> String {
        "fake".into()
    }

    fn fetch(&self, id: u32) -> Result<String> {
        self.hits.set(self.hits.get() + 1);
        match self.page {
            Some(page) => Ok(page.to_string()),
            None => Err(self.make_error(id, "offline")),
        }
    }
}

fn store(dir: &std::path::Path, page: Option<&'static str>) -> (ProblemStore, Rc<Cell<usize>>) {
    let hits = Rc::new(Cell::new(0));
    let source = FakeSource {
        page,
        hits: hits.clone(),
    };
    (ProblemStore::new(dir, Box::new(source)), hits)
}

#[test]
fn fetch_once_then_offline() -> Result<()> {
    let dir = tempfile::tempdir()?;

    let (online, hits) = store(dir.path(), Some(PAGE));
    let fetched = online.get_or_fetch(1000)?;
    assert_eq!(hits.get(), 1);
    assert_eq!(
        fetched,
        Problem {
            title: "Square".into(),
            id: 1000,
            time_limit: 1.0,
            memory_limit: 262144.0,
            samples: vec![Sample {
                input: "3".into(),
                output: "9".into(),
            }],
        }
    );
    assert!(dir.path().join("1000.json").is_file());

    let (offline, hits) = store(dir.path(), None);
    assert_eq!(offline.get_or_fetch(1000)?, fetched);
    assert_eq!(hits.get(), 0);
    Ok(())
}

#[test]
fn unreachable_source_is_acquisition_error() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let (offline, _) = store(dir.path(), None);

    assert!(matches!(
        offline.get_or_fetch(1000),
        Err(Error::Acquisition { id: 1000, .. })
    ));
    assert!(!dir.path().join("1000.json").exists());
    Ok(())
}

#[test]
fn invalid_page_is_not_cached() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let (online, _) = store(dir.path(), Some("<html><body>404</body></html>"));

    assert!(matches!(online.get_or_fetch(1000), Err(Error::Validation(_))));
    assert!(!dir.path().join("1000.json").exists());
    Ok(())
}

#[test]
fn corrupted_record_is_reported() -> Result<()> {
    let dir = tempfile::tempdir()?;
    fs::write(dir.path().join("1000.json"), "{not json")?;
    let (online, hits) = store(dir.path(), Some(PAGE));

    assert!(matches!(online.get_or_fetch(1000), Err(Error::Cache(_))));
    assert_eq!(hits.get(), 0);
    Ok(())
}

#[test]
fn clean_removes_records_only() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let (online, _) = store(dir.path(), Some(PAGE));
    online.get_or_fetch(1000)?;
    online.get_or_fetch(1001)?;
    fs::write(dir.path().join("notes.txt"), "keep me")?;

    let removed = online.clean()?;
    assert_eq!(
        removed,
        vec![dir.path().join("1000.json"), dir.path().join("1001.json")]
    );
    assert!(dir.path().join("notes.txt").exists());
    assert!(online.clean()?.is_empty());
    Ok(())
}

#[test]
fn clean_missing_cache_dir() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let (store, _) = store(&dir.path().join("absent"), None);
    assert!(store.clean()?.is_empty());
    Ok(())
}
