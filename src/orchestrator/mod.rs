//! Pipeline orchestration
//!
//! This module wires the stages of one run together:
//! - Building the HTTP client, page source, extractor and resolver from the configuration
//! - Driving the lazy catalog crawl and resolving entries one at a time
//! - Pacing requests and honoring cancellation
//! - Writing the playlist (always) and the optional failure report

mod runner;

pub use crate::output::RunSummary;
pub use runner::Orchestrator;

use crate::config::Config;
use crate::extractor::build_extractor;
use crate::output::write_markdown_report;
use crate::playlist::{PlaylistBuilder, PlaylistOptions};
use crate::source::{Fetcher, HttpPageSource};
use crate::PipelineError;
use std::path::Path;
use tokio_util::sync::CancellationToken;

/// Runs one complete harvest
///
/// The HTTP client is created here and dropped when the run ends. The playlist file is
/// written even when the first catalog page fails (it then holds only the header), after
/// which the error is returned.
///
/// # Example
///
/// ```no_run
/// use stream_harvest::config::load_config;
/// use stream_harvest::run_pipeline;
/// use std::path::Path;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("harvest.toml"))?;
/// let summary = run_pipeline(config, CancellationToken::new()).await?;
/// println!("{} streams", summary.streams);
/// # Ok(())
/// # }
/// ```
pub async fn run_pipeline(
    config: Config,
    cancel: CancellationToken,
) -> Result<RunSummary, PipelineError> {
    let fetcher = Fetcher::from_config(&config.http)?;
    let source = HttpPageSource::from_config(&config, fetcher.clone());
    let extractor = build_extractor(&config)?;
    let orchestrator = Orchestrator::from_config(&config, fetcher)?.with_cancellation(cancel);

    tracing::info!(
        "Harvesting '{}' with the {} extractor",
        config.source.name,
        extractor.name()
    );

    let mut builder = PlaylistBuilder::new(PlaylistOptions::from(&config.playlist));
    let result = orchestrator
        .run(&source, extractor.as_ref(), &mut builder)
        .await;

    let playlist_path = Path::new(&config.playlist.path);
    builder.write_to(playlist_path)?;
    tracing::info!(
        "Wrote {} playlist records to {}",
        builder.len(),
        playlist_path.display()
    );

    let summary = result?;

    if let Some(report_path) = &config.playlist.report_path {
        write_markdown_report(&summary, Path::new(report_path))?;
        tracing::info!("Wrote run report to {}", report_path);
    }

    Ok(summary)
}
