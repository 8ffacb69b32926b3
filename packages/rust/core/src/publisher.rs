//! Persists a generated document as page rows and marks the website done.

use tracing::{info, instrument};

use pageforge_markdown::parse_sections;
use pageforge_shared::{PageForgeError, PageRecord, Result, STATUS_COMPLETED};
use pageforge_storage::Storage;

/// Prefix for all publish failures; the original storage error follows it.
const PUBLISH_FAILURE: &str = "failed to save generated pages";

/// Parse `document` into page sections, bulk-insert them as page rows, and
/// update the website's page list and status for `user_id`/`website_id`.
///
/// A document with no parseable sections still completes the website, with
/// an empty page list. Returns `true` on success so callers mirroring a
/// boolean success flag can forward it directly.
#[instrument(skip(storage, document), fields(user_id = %user_id, website_id = %website_id))]
pub async fn publish_pages(
    storage: &Storage,
    user_id: &str,
    website_id: &str,
    document: &str,
) -> Result<bool> {
    let sections = parse_sections(document);
    let records: Vec<PageRecord> = sections
        .iter()
        .map(|section| PageRecord::new(user_id, website_id, section))
        .collect();
    let titles: Vec<String> = sections.iter().map(|s| s.name.clone()).collect();

    let outcome = async {
        storage.insert_pages(&records).await?;
        storage
            .update_website_pages(user_id, website_id, &titles, STATUS_COMPLETED)
            .await
    }
    .await;

    match outcome {
        Ok(()) => {
            info!(pages = records.len(), "pages published");
            Ok(true)
        }
        Err(e) => Err(PageForgeError::Storage(format!("{PUBLISH_FAILURE}: {e}"))),
    }
}
