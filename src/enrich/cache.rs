use super::{QuizFrames, enrich};
use crate::config::{QuizConfig, SourceConfig};
use crate::data::{Fetcher, load_tables, refresh_tables};
use crate::error::{Result, ResultExt as _, StatsError};
use log::info;
use polars::prelude::*;
use std::path::Path;

fn save_df(df: &mut DataFrame, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    ParquetWriter::new(file)
        .finish(df)
        .with_context(|| format!("Failed to write Parquet file {}", path.display()))?;
    Ok(())
}

fn load_df(path: &Path) -> Result<DataFrame> {
    let file = std::fs::File::open(path).map_err(|e| StatsError::cache_miss(path, e))?;
    ParquetReader::new(file)
        .finish()
        .map_err(|e| StatsError::cache_miss(path, e))
}

pub fn save_frames(frames: &mut QuizFrames, source: &SourceConfig) -> Result<()> {
    save_df(&mut frames.batting, &source.batting_cache_path())?;
    save_df(&mut frames.bowling, &source.bowling_cache_path())?;
    info!(
        "Saved enriched frames to {} and {}",
        source.batting_cache_path().display(),
        source.bowling_cache_path().display()
    );
    Ok(())
}

/// Reads both enriched caches; either one missing is a cache miss.
pub fn load_cached_frames(source: &SourceConfig) -> Result<QuizFrames> {
    Ok(QuizFrames {
        batting: load_df(&source.batting_cache_path())?,
        bowling: load_df(&source.bowling_cache_path())?,
    })
}

/// The enriched frames, from cache when possible.
///
/// On a cache miss the raw tables are loaded (which may hit the network),
/// enriched and written back. Only a total failure to obtain the raw data
/// is returned as an error.
pub fn quiz_frames(config: &QuizConfig, fetcher: &dyn Fetcher) -> Result<QuizFrames> {
    match load_cached_frames(&config.source) {
        Ok(frames) => {
            info!("Using cached enriched frames");
            Ok(frames)
        }
        Err(miss) if miss.is_cache_miss() => {
            info!("Couldn't use cached frames ({miss}) - loading might take a minute");
            rebuild_frames(config, fetcher)
        }
        Err(fatal) => Err(fatal),
    }
}

/// Enriches from the raw data and refreshes the enriched caches.
pub fn rebuild_frames(config: &QuizConfig, fetcher: &dyn Fetcher) -> Result<QuizFrames> {
    let tables = load_tables(&config.source, fetcher).context("Couldn't get data")?;
    let mut frames = enrich(&tables, &config.enrichment)?;
    save_frames(&mut frames, &config.source)?;
    Ok(frames)
}

/// Downloads the document again and replaces all three caches.
///
/// Nothing on disk changes until the new document has been fetched and
/// parsed, so a failed refresh keeps the previous data.
pub fn refresh_frames(config: &QuizConfig, fetcher: &dyn Fetcher) -> Result<QuizFrames> {
    let tables = refresh_tables(&config.source, fetcher).context("Couldn't refresh data")?;
    let mut frames = enrich(&tables, &config.enrichment)?;
    save_frames(&mut frames, &config.source)?;
    Ok(frames)
}
