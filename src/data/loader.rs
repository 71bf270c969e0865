//! Fetches the club's data document, preferring the local cache.
//!
//! ```text
//! load_tables()
//!   │
//!   ├─> read raw cache ──ok──> parse ──> Tables
//!   │        │
//!   │      miss (absent or unparseable)
//!   │        │
//!   └─> fetch URL ──> parse ──> write body verbatim to cache ──> Tables
//!            │
//!          error: fatal, returned to the caller
//! ```
//!
//! [`refresh_tables`] takes only the second branch. The cache is overwritten
//! once a fetched body has parsed, so a failed refresh leaves it untouched.

use super::model::SourceDocument;
use super::tables::Tables;
use crate::config::SourceConfig;
use crate::error::{Result, ResultExt as _, StatsError};
use log::{info, warn};
use std::path::Path;

/// Something that can produce the raw document body for a URL.
pub trait Fetcher {
    fn fetch(&self, url: &str) -> Result<String>;
}

/// Plain blocking HTTP GET.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String> {
        info!("Fetching Badger data from {url}");
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| StatsError::Fetch(format!("GET {url}: {e}")))?
            .error_for_status()
            .map_err(|e| StatsError::Fetch(format!("GET {url}: {e}")))?;
        let body = response.text()?;
        info!("Fetched {} bytes", body.len());
        Ok(body)
    }
}

pub fn parse_document(body: &str) -> Result<SourceDocument> {
    Ok(serde_json::from_str(body)?)
}

/// Reads the raw cache. Any failure is reported as a cache miss.
pub fn read_raw_cache(path: &Path) -> Result<SourceDocument> {
    let body =
        std::fs::read_to_string(path).map_err(|e| StatsError::cache_miss(path, e))?;
    parse_document(&body).map_err(|e| StatsError::cache_miss(path, e))
}

pub fn write_raw_cache(path: &Path, body: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, body)
        .with_context(|| format!("Failed to write raw cache {}", path.display()))
}

/// Cache first, network second. A failed fetch is returned as-is.
pub fn load_document(source: &SourceConfig, fetcher: &dyn Fetcher) -> Result<SourceDocument> {
    let path = source.raw_cache_path();
    match read_raw_cache(&path) {
        Ok(doc) => {
            info!(
                "Using local {} - run `badger-stats refresh` to pick up updated stats",
                path.display()
            );
            Ok(doc)
        }
        Err(miss) if miss.is_cache_miss() => {
            info!("Couldn't use local Badger data ({miss}) - loading from website");
            fetch_document(source, fetcher)
        }
        Err(fatal) => Err(fatal),
    }
}

/// Downloads and parses the document, then replaces the raw cache with it.
pub fn fetch_document(source: &SourceConfig, fetcher: &dyn Fetcher) -> Result<SourceDocument> {
    let body = fetcher.fetch(&source.url)?;
    let doc = parse_document(&body).context("Website returned an unexpected document")?;
    // The data is already in hand; a failed write only costs a refetch next run.
    if let Err(e) = write_raw_cache(&source.raw_cache_path(), &body) {
        warn!("{e}");
    }
    Ok(doc)
}

/// Loads the document and indexes every collection by identifier.
pub fn load_tables(source: &SourceConfig, fetcher: &dyn Fetcher) -> Result<Tables> {
    let tables = Tables::from(load_document(source, fetcher)?);
    for (name, rows) in tables.row_counts() {
        log::debug!("{name}: {rows} rows");
    }
    Ok(tables)
}

/// Like [`load_tables`] but always goes to the website.
pub fn refresh_tables(source: &SourceConfig, fetcher: &dyn Fetcher) -> Result<Tables> {
    Ok(Tables::from(fetch_document(source, fetcher)?))
}

#[cfg(test)]
mod tests {
    #![expect(clippy::unwrap_used, clippy::indexing_slicing)]
    use super::*;
    use crate::data::model::FormatId;
    use pretty_assertions::assert_eq;
    use std::cell::Cell;

    const BODY: &str = r#"{"created": {
        "players": [{"id": 1, "slug": "test-player"}],
        "games": [{"id": 2, "formatID": 1, "oppositionID": 5}]
    }}"#;

    const NEWER_BODY: &str = r#"{"created": {
        "players": [{"id": 1, "slug": "test-player"}, {"id": 3, "slug": "rookie"}],
        "games": [{"id": 2, "formatID": 1, "oppositionID": 5, "captainID": "TBC"}]
    }}"#;

    struct StubFetcher {
        body: Option<&'static str>,
        calls: Cell<usize>,
    }

    impl StubFetcher {
        fn serving(body: &'static str) -> Self {
            Self {
                body: Some(body),
                calls: Cell::new(0),
            }
        }

        fn offline() -> Self {
            Self {
                body: None,
                calls: Cell::new(0),
            }
        }
    }

    impl Fetcher for StubFetcher {
        fn fetch(&self, url: &str) -> Result<String> {
            self.calls.set(self.calls.get() + 1);
            self.body
                .map(str::to_owned)
                .ok_or_else(|| StatsError::Fetch(format!("GET {url}: connection refused")))
        }
    }

    fn source_in(dir: &Path) -> SourceConfig {
        SourceConfig {
            cache_dir: dir.to_path_buf(),
            ..SourceConfig::default()
        }
    }

    #[test]
    fn test_fetch_on_miss_writes_body_verbatim() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let source = source_in(dir.path());
        let fetcher = StubFetcher::serving(BODY);

        let tables = load_tables(&source, &fetcher)?;
        assert_eq!(fetcher.calls.get(), 1);
        assert_eq!(tables.players.len(), 1);
        assert_eq!(std::fs::read_to_string(source.raw_cache_path())?, BODY);
        Ok(())
    }

    #[test]
    fn test_cache_hit_skips_network() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let source = source_in(dir.path());
        write_raw_cache(&source.raw_cache_path(), BODY)?;
        let fetcher = StubFetcher::offline();

        let tables = load_tables(&source, &fetcher)?;
        assert_eq!(fetcher.calls.get(), 0);
        assert_eq!(tables.games.len(), 1);
        Ok(())
    }

    #[test]
    fn test_cache_round_trip_reproduces_tables() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let source = source_in(dir.path());

        let fetched = load_tables(&source, &StubFetcher::serving(BODY))?;
        let cached = load_tables(&source, &StubFetcher::offline())?;
        assert_eq!(cached, fetched);
        Ok(())
    }

    #[test]
    fn test_corrupt_cache_falls_back_to_fetch() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let source = source_in(dir.path());
        std::fs::write(source.raw_cache_path(), "{ not json")?;
        let fetcher = StubFetcher::serving(BODY);

        let tables = load_tables(&source, &fetcher)?;
        assert_eq!(fetcher.calls.get(), 1);
        assert_eq!(tables.players.len(), 1);
        Ok(())
    }

    #[test]
    fn test_miss_and_failed_fetch_is_fatal() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let source = source_in(dir.path());

        let err = load_tables(&source, &StubFetcher::offline()).unwrap_err();
        assert!(matches!(err, StatsError::Fetch(_)));
        assert!(!source.raw_cache_path().exists());
        Ok(())
    }

    #[test]
    fn test_unexpected_body_is_not_cached() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let source = source_in(dir.path());

        let result = load_tables(&source, &StubFetcher::serving("<html>maintenance</html>"));
        assert!(result.is_err());
        assert!(!source.raw_cache_path().exists());
        Ok(())
    }

    #[test]
    fn test_placeholder_cells_do_not_fail_the_document() -> Result<()> {
        let doc = parse_document(NEWER_BODY)?;
        let game = &doc.created.games[0];
        assert_eq!(game.captain_id, None);
        assert_eq!(game.format_id, Some(FormatId(1)));
        assert_eq!(doc.created.players.len(), 2);
        Ok(())
    }

    #[test]
    fn test_refresh_replaces_cache_after_fetch() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let source = source_in(dir.path());
        write_raw_cache(&source.raw_cache_path(), BODY)?;
        let fetcher = StubFetcher::serving(NEWER_BODY);

        let tables = refresh_tables(&source, &fetcher)?;
        assert_eq!(fetcher.calls.get(), 1);
        assert_eq!(tables.players.len(), 2);
        assert_eq!(std::fs::read_to_string(source.raw_cache_path())?, NEWER_BODY);
        Ok(())
    }

    #[test]
    fn test_failed_refresh_keeps_cache() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let source = source_in(dir.path());
        write_raw_cache(&source.raw_cache_path(), BODY)?;

        let err = refresh_tables(&source, &StubFetcher::offline()).unwrap_err();
        assert!(matches!(err, StatsError::Fetch(_)));
        assert_eq!(std::fs::read_to_string(source.raw_cache_path())?, BODY);

        let result = refresh_tables(&source, &StubFetcher::serving("<html>maintenance</html>"));
        assert!(result.is_err());
        assert_eq!(std::fs::read_to_string(source.raw_cache_path())?, BODY);
        Ok(())
    }
}
