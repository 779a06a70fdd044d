use std::time::Duration;

use log::info;
use reqwest::blocking::Client;

use crate::{
    config::JudgeConfig,
    error::{Error, Result},
};

/// Where problem statements come from when the cache misses.
pub trait ProblemSource {
    fn get_name(&self) -> String;
    fn fetch(&self, id: u32) -> Result<String>;

    fn make_error(&self, id: u32, msg: &str) -> Error {
        Error::Acquisition {
            id,
            msg: format!("{}: {}", self.get_name(), msg),
        }
    }
}

pub struct HttpSource {
    url_template: String,
    client: Client,
}

impl HttpSource {
    pub fn new(config: &JudgeConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.request_timeout))
            .build()
            .map_err(|err| Error::Environment(format!("failed to build http client: {}", err)))?;

        Ok(Self {
            url_template: config.url_template.clone(),
            client,
        })
    }

    pub fn url_of(&self, id: u32) -> String {
        self.url_template.replace("{id}", &id.to_string())
    }
}

impl ProblemSource for HttpSource {
    fn get_name(&self) -> String {
        "http".into()
    }

    fn fetch(&self, id: u32) -> Result<String> {
        let url = self.url_of(id);
        info!("fetching problem {} from {}", id, url);

        let res = self
            .client
            .get(&url)
            .send()
            .map_err(|err| self.make_error(id, &err.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            return Err(self.make_error(id, &format!("{} answered {}", url, status)));
        }

        let text = res
            .text()
            .map_err(|err| self.make_error(id, &err.to_string()))?;
        if text.trim().is_empty() {
            return Err(self.make_error(id, "empty document"));
        }

        Ok(text)
    }
}
