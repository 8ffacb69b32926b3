//! End-to-end generation pipeline: drive the model, then publish.

use std::time::{Duration, Instant};

use tracing::{info, instrument};

use pageforge_client::ChatProvider;
use pageforge_shared::{ChatMessage, Result};
use pageforge_storage::Storage;

use crate::continuation::run_continuation;
use crate::publisher::publish_pages;

/// One website-generation request.
#[derive(Debug, Clone)]
pub struct GenerationJob {
    pub user_id: String,
    pub website_id: String,
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

/// Summary of a completed generation run.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    /// Number of pages stored.
    pub page_count: usize,
    /// Page titles in document order.
    pub page_names: Vec<String>,
    /// Length of the full generated document, in bytes.
    pub response_len: usize,
    /// Wall-clock time for the whole run.
    pub elapsed: Duration,
}

/// Generate a website's pages and persist them.
///
/// Runs the continuation loop against `provider`, then parses and stores
/// the resulting document through `storage`. The website row for
/// `job.website_id` must already exist.
#[instrument(skip_all, fields(user_id = %job.user_id, website_id = %job.website_id, model = %job.model))]
pub async fn generate_and_publish(
    provider: &dyn ChatProvider,
    storage: &Storage,
    job: &GenerationJob,
) -> Result<GenerationResult> {
    let started = Instant::now();

    let document =
        run_continuation(provider, &job.messages, &job.model, &job.website_id).await?;
    publish_pages(storage, &job.user_id, &job.website_id, &document).await?;

    let page_names = match storage.get_website(&job.user_id, &job.website_id).await? {
        Some(site) => site.pages,
        None => Vec::new(),
    };

    let result = GenerationResult {
        page_count: page_names.len(),
        page_names,
        response_len: document.len(),
        elapsed: started.elapsed(),
    };

    info!(
        pages = result.page_count,
        response_len = result.response_len,
        elapsed_ms = result.elapsed.as_millis() as u64,
        "generation complete"
    );
    Ok(result)
}
