use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use config::{Config, Environment};
use serde::Deserialize;

const ENV_PREFIX: &str = "SCRAPER";

pub const DEFAULT_OUTPUT: &str = "scraped_content.csv";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub output: PathBuf,
    pub timeout_secs: u64,
    pub user_agent: String,
    /// SQLite file for run history; off unless set.
    pub db: Option<PathBuf>,
}

impl Settings {
    /// Defaults, overridden by `SCRAPER_*` environment variables.
    pub fn load() -> Result<Self> {
        Self::load_from(Environment::with_prefix(ENV_PREFIX))
    }

    fn load_from(env: Environment) -> Result<Self> {
        let settings = Config::builder()
            .set_default("output", DEFAULT_OUTPUT)?
            .set_default("timeout_secs", DEFAULT_TIMEOUT_SECS as i64)?
            .set_default("user_agent", DEFAULT_USER_AGENT)?
            .add_source(env)
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let mut map = config::Map::new();
        for (k, v) in vars {
            map.insert(k.to_string(), v.to_string());
        }
        Environment::with_prefix(ENV_PREFIX).source(Some(map))
    }

    #[test]
    fn defaults() {
        let s = Settings::load_from(env(&[])).unwrap();
        assert_eq!(s.output, PathBuf::from("scraped_content.csv"));
        assert_eq!(s.timeout(), Duration::from_secs(10));
        assert_eq!(s.user_agent, "Mozilla/5.0");
        assert!(s.db.is_none());
    }

    #[test]
    fn environment_overrides() {
        let s = Settings::load_from(env(&[
            ("SCRAPER_TIMEOUT_SECS", "3"),
            ("SCRAPER_OUTPUT", "out/links.csv"),
            ("SCRAPER_DB", "runs.sqlite"),
        ]))
        .unwrap();
        assert_eq!(s.timeout_secs, 3);
        assert_eq!(s.output, PathBuf::from("out/links.csv"));
        assert_eq!(s.db, Some(PathBuf::from("runs.sqlite")));
        assert_eq!(s.user_agent, DEFAULT_USER_AGENT);
    }

    #[test]
    fn bad_timeout_is_error() {
        assert!(Settings::load_from(env(&[("SCRAPER_TIMEOUT_SECS", "soon")])).is_err());
    }
}
