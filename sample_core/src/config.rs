use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::error::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JudgeConfig {
    #[serde(rename = "cacheDir")]
    pub cache_dir: PathBuf,
    /// `{id}` is replaced by the problem id.
    #[serde(rename = "urlTemplate")]
    pub url_template: String,
    #[serde(rename = "userAgent")]
    pub user_agent: String,
    /// seconds
    #[serde(rename = "requestTimeout")]
    pub request_timeout: u64,
    pub python: String,
    pub cxx: String,
    #[serde(rename = "cxxStandard")]
    pub cxx_standard: String,
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from("_problems"),
            url_template: "https://www.acmicpc.net/problem/{id}".into(),
            user_agent: "Mozilla/5.0".into(),
            request_timeout: 10,
            python: "pypy3".into(),
            cxx: "g++".into(),
            cxx_standard: "c++20".into(),
        }
    }
}

impl JudgeConfig {
    pub fn from_string(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_string(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn serialize() {
        let s = serde_yaml::to_string(&JudgeConfig::default()).unwrap();
        assert!(s.contains("cacheDir: _problems"));
        assert!(s.contains("cxxStandard:"));
    }

    #[test]
    fn partial_config_keeps_defaults() -> Result<()> {
        let config = JudgeConfig::from_string("python: python3\ncacheDir: /tmp/cache\n")?;
        assert_eq!(config.python, "python3");
        assert_eq!(config.cache_dir, PathBuf::from("/tmp/cache"));
        assert_eq!(config.cxx, "g++");
        assert_eq!(config.request_timeout, 10);
        Ok(())
    }

    #[test]
    fn unknown_key_is_rejected() {
        assert!(matches!(
            JudgeConfig::from_string("pyhton: python3\n"),
            Err(Error::Config(_))
        ));
    }
}
