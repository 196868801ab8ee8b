mod db;
mod error;
mod export;
mod fetch;
mod parser;
mod record;
mod settings;
mod url_check;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};
use url::Url;

use error::ScrapeError;
use fetch::Fetcher;
use settings::Settings;

const PROMPT: &str = "Enter your link or website: ";

#[derive(Parser)]
#[command(
    name = "page_scraper",
    about = "Save the links and headings of one web page as CSV"
)]
struct Cli {
    /// Page to scrape (prompted for when omitted)
    #[arg(short, long)]
    url: Option<String>,
    /// CSV output path [default: scraped_content.csv]
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Request timeout in seconds [default: 10]
    #[arg(short, long)]
    timeout: Option<u64>,
    /// User-Agent header sent with the request
    #[arg(long)]
    user_agent: Option<String>,
    /// Also append the run to this SQLite database
    #[arg(long)]
    db: Option<PathBuf>,
}

impl Cli {
    /// Flags win over environment and defaults.
    fn apply(&self, settings: &mut Settings) {
        if let Some(output) = &self.output {
            settings.output = output.clone();
        }
        if let Some(secs) = self.timeout {
            settings.timeout_secs = secs;
        }
        if let Some(ua) = &self.user_agent {
            settings.user_agent = ua.clone();
        }
        if let Some(db) = &self.db {
            settings.db = Some(db.clone());
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let mut settings = Settings::load()?;
    cli.apply(&mut settings);
    debug!(?settings, "Settings loaded");

    let fetcher = Fetcher::new(settings.timeout(), &settings.user_agent)?;

    let input = match &cli.url {
        Some(url) => url.clone(),
        None => prompt(PROMPT)?,
    };
    run(&input, &settings, &fetcher).await?;
    Ok(())
}

/// Scrape one page into the configured outputs. Returns the number of saved
/// records, or `None` when the run stopped before anything was written.
async fn run(input: &str, settings: &Settings, fetcher: &Fetcher) -> anyhow::Result<Option<usize>> {
    let input = input.trim();
    if input.is_empty() {
        println!("No URL provided.");
        return Ok(None);
    }

    let (url, html) = match fetch_page(input, fetcher).await {
        Ok(page) => page,
        Err(e) => {
            println!("Failed to fetch URL: {}", e);
            return Ok(None);
        }
    };
    let fetched_at = Utc::now();

    let records = parser::extract_records(&html);
    export::save_csv(&settings.output, &records)?;

    if let Some(path) = &settings.db {
        let conn = db::connect(path)?;
        db::init_schema(&conn)?;
        let run_id = db::save_run(&conn, url.as_str(), fetched_at, &records)
            .with_context(|| format!("saving run to {}", path.display()))?;
        info!(run_id, db = %path.display(), "Saved run");
    }

    println!(
        "Saved {} items to {}",
        records.len(),
        settings.output.display()
    );
    Ok(Some(records.len()))
}

/// Validate and download one page.
async fn fetch_page(raw: &str, fetcher: &Fetcher) -> Result<(Url, String), ScrapeError> {
    let url = url_check::validate_url(raw)?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(format!("Fetching {}", url));
    pb.enable_steady_tick(Duration::from_millis(100));

    let result = fetcher.fetch_html(&url).await;
    pb.finish_and_clear();

    Ok((url, result?))
}

fn prompt(message: &str) -> anyhow::Result<String> {
    print!("{}", message);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("reading URL from stdin")?;
    Ok(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::testing::{local_fetcher, serve_once};

    fn base() -> Settings {
        Settings {
            output: PathBuf::from("scraped_content.csv"),
            timeout_secs: 10,
            user_agent: "Mozilla/5.0".into(),
            db: None,
        }
    }

    fn in_dir(dir: &tempfile::TempDir) -> Settings {
        Settings {
            output: dir.path().join("scraped_content.csv"),
            ..base()
        }
    }

    fn fetcher() -> Fetcher {
        local_fetcher(Duration::from_secs(5))
    }

    #[test]
    fn flags_override_settings() {
        let cli = Cli::parse_from([
            "page_scraper",
            "--url",
            "https://example.com",
            "-o",
            "out.csv",
            "-t",
            "3",
            "--db",
            "runs.sqlite",
        ]);
        let mut settings = base();
        cli.apply(&mut settings);
        assert_eq!(cli.url.as_deref(), Some("https://example.com"));
        assert_eq!(settings.output, PathBuf::from("out.csv"));
        assert_eq!(settings.timeout_secs, 3);
        assert_eq!(settings.user_agent, "Mozilla/5.0");
        assert_eq!(settings.db, Some(PathBuf::from("runs.sqlite")));
    }

    #[test]
    fn no_flags_keep_settings() {
        let cli = Cli::parse_from(["page_scraper"]);
        let mut settings = base();
        cli.apply(&mut settings);
        assert!(cli.url.is_none());
        assert_eq!(settings.output, PathBuf::from("scraped_content.csv"));
        assert!(settings.db.is_none());
    }

    #[tokio::test]
    async fn invalid_url_is_not_fetched() {
        let err = fetch_page("example.com", &fetcher()).await.unwrap_err();
        assert!(matches!(err, ScrapeError::InvalidUrl));
    }

    #[tokio::test]
    async fn empty_input_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let settings = in_dir(&dir);
        assert_eq!(run("   \n", &settings, &fetcher()).await.unwrap(), None);
        assert!(!settings.output.exists());
    }

    #[tokio::test]
    async fn invalid_url_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let settings = in_dir(&dir);
        assert_eq!(run("example.com", &settings, &fetcher()).await.unwrap(), None);
        assert!(!settings.output.exists());
    }

    #[tokio::test]
    async fn http_error_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let settings = in_dir(&dir);
        let url = serve_once("404 Not Found", b"<h1>Missing</h1>".to_vec()).await;
        assert_eq!(run(url.as_str(), &settings, &fetcher()).await.unwrap(), None);
        assert!(!settings.output.exists());
    }

    #[tokio::test]
    async fn page_is_saved_as_csv() {
        let dir = tempfile::tempdir().unwrap();
        let settings = in_dir(&dir);
        let body = br#"<h1>Hello</h1><script>x('<a href="/ad">Ad</a>')</script><a href="https://x.com">Click  here</a>"#;
        let url = serve_once("200 OK", body.to_vec()).await;

        assert_eq!(run(url.as_str(), &settings, &fetcher()).await.unwrap(), Some(2));
        let csv = std::fs::read_to_string(&settings.output).unwrap();
        assert_eq!(
            csv,
            "type,tag,text,href\r\nheading,h1,Hello,\r\nlink,a,Click here,https://x.com\r\n"
        );
    }

    #[tokio::test]
    async fn page_is_saved_to_db_too() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            db: Some(dir.path().join("runs.sqlite")),
            ..in_dir(&dir)
        };
        let url = serve_once("200 OK", b"<h2>Stored</h2>".to_vec()).await;

        assert_eq!(run(url.as_str(), &settings, &fetcher()).await.unwrap(), Some(1));
        let conn = db::connect(settings.db.as_ref().unwrap()).unwrap();
        let stored: String = conn
            .query_row("SELECT text FROM records", [], |r| r.get(0))
            .unwrap();
        assert_eq!(stored, "Stored");
    }
}
