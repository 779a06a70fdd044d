use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use log::info;

use crate::{error::Result, extract::extract, problem::Problem, remote::ProblemSource};

/// Problems cached on disk as `<cache_dir>/<id>.json`, fetched once from `source` on a miss.
pub struct ProblemStore {
    cache_dir: PathBuf,
    source: Box<dyn ProblemSource>,
}

impl ProblemStore {
    pub fn new(cache_dir: impl Into<PathBuf>, source: Box<dyn ProblemSource>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            source,
        }
    }

    pub fn record_path(&self, id: u32) -> PathBuf {
        self.cache_dir.join(format!("{}.json", id))
    }

    pub fn get_or_fetch(&self, id: u32) -> Result<Problem> {
        if let Some(problem) = self.load(id)? {
            info!("problem {} loaded from cache", id);
            return Ok(problem);
        }

        info!("problem {} is not cached", id);
        let document = self.source.fetch(id)?;
        let problem = extract(id, &document)?;
        self.save(&problem)?;

        Ok(problem)
    }

    pub fn load(&self, id: u32) -> Result<Option<Problem>> {
        let content = match fs::read_to_string(self.record_path(id)) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        Ok(Some(Problem::from_string(&content)?))
    }

    pub fn save(&self, problem: &Problem) -> Result<()> {
        fs::create_dir_all(&self.cache_dir)?;
        fs::write(self.record_path(problem.id), problem.to_record()?)?;
        Ok(())
    }

    /// Remove every cached record, returning what was removed.
    pub fn clean(&self) -> Result<Vec<PathBuf>> {
        clean_dir(&self.cache_dir)
    }
}

pub fn clean_dir(cache_dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = match fs::read_dir(cache_dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(err.into()),
    };

    let mut removed = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.is_file() && path.extension().map_or(false, |ext| ext == "json") {
            fs::remove_file(&path)?;
            removed.push(path);
        }
    }
    removed.sort();

    Ok(removed)
}
