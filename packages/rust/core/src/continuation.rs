//! Continuation loop for chat-completion responses.
//!
//! Models truncate long generations. The driver keeps requesting
//! continuations of the truncated response, stitching the chunks into one
//! logical document, until a completion marker appears in the accumulated
//! text or the round cap is hit.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{error, info, instrument, warn};

use pageforge_client::{ChatProvider, extract_text};
use pageforge_shared::{ChatMessage, PageForgeError, Result};

/// Hard cap on continuation rounds per invocation.
pub const MAX_ROUNDS: usize = 10;

/// Instruction sent with every continuation round.
const CONTINUATION_PROMPT: &str =
    "Please continue your previous response exactly where you left off. \
     Maintain the same format and structure. \
     If you've completed your response, end with '# Response Completed'.";

/// Phrases that signal the generation is fully done, matched
/// case-insensitively anywhere in the accumulated text. Each tolerates
/// optional surrounding '#' characters and flexible spacing.
static COMPLETION_MARKERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?im)(?:#+\s*)?all\s+files\s+completed(?:\s*#+)?",
        r"(?im)(?:#+\s*)?response\s+completed(?:\s*#+)?",
        r"(?im)(?:#+\s*)?end\s+of\s+response(?:\s*#+)?",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("valid regex"))
    .collect()
});

/// Leading ```` ```html ```` opener on a continuation chunk.
static HTML_FENCE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^```html\s*\n").expect("valid regex"));

/// Leading bare fence on a continuation chunk.
static BARE_FENCE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^```\s*\n").expect("valid regex"));

/// Drive the continuation loop until a completion marker appears or the
/// round cap is reached.
///
/// `website_id` is a correlation identifier used only for logging and
/// error context. The initial messages are snapshotted up front so
/// in-flight rounds never observe caller-side mutation.
///
/// Returns the best-effort concatenation of all successfully extracted,
/// non-empty chunks in round order, with duplicate opening fences removed
/// between chunks. Hitting the cap is not an error; a per-round failure
/// on the final permitted round is.
#[instrument(skip(provider, initial_messages), fields(website_id = %website_id, model = %model))]
pub async fn run_continuation(
    provider: &dyn ChatProvider,
    initial_messages: &[ChatMessage],
    model: &str,
    website_id: &str,
) -> Result<String> {
    if initial_messages.is_empty() {
        return Err(PageForgeError::validation(
            "initial messages must not be empty",
        ));
    }

    let snapshot: Vec<ChatMessage> = initial_messages.to_vec();
    let mut accumulated = String::new();
    let mut round: usize = 0;

    info!(turns = snapshot.len(), "starting continuation loop");

    while round < MAX_ROUNDS {
        let chunk =
            match request_round(provider, &snapshot, &accumulated, round, model, website_id).await
            {
                Ok(text) => text,
                Err(e) if round == MAX_ROUNDS - 1 => {
                    error!(round, error = %e, "fatal error in continuation loop");
                    return Err(PageForgeError::Generation(format!(
                        "generation failed for {website_id}: {e}"
                    )));
                }
                Err(e) => {
                    error!(round, error = %e, "continuation round failed, retrying");
                    continue;
                }
            };

        // Transient no-op: retry the same round, nothing appended.
        if chunk.trim().is_empty() {
            warn!(round, "empty response, retrying round");
            continue;
        }

        let cleaned = if round > 0 {
            strip_leading_fence(&chunk)
        } else {
            &chunk
        };
        accumulated.push_str(cleaned);

        if has_completion_marker(&accumulated) {
            info!(
                rounds = round + 1,
                response_len = accumulated.len(),
                "completion marker found"
            );
            return Ok(accumulated);
        }

        round += 1;
    }

    warn!(
        max_rounds = MAX_ROUNDS,
        response_len = accumulated.len(),
        "round cap reached without completion marker"
    );
    Ok(accumulated)
}

/// Perform one request/response exchange and extract its text.
async fn request_round(
    provider: &dyn ChatProvider,
    snapshot: &[ChatMessage],
    accumulated: &str,
    round: usize,
    model: &str,
    website_id: &str,
) -> Result<String> {
    let completion = if round == 0 {
        provider.send(snapshot, model, website_id).await?
    } else {
        info!(round, "requesting continuation");
        let mut working = snapshot.to_vec();
        working.push(ChatMessage::assistant(accumulated));
        working.push(ChatMessage::user(CONTINUATION_PROMPT));
        provider.send(&working, model, website_id).await?
    };

    extract_text(&completion, model)
}

/// Remove one leading fence opener from a continuation chunk, preferring
/// the ```` ```html ```` form. Avoids duplicate fence markers when
/// concatenating chunks.
fn strip_leading_fence(chunk: &str) -> &str {
    if let Some(m) = HTML_FENCE_PREFIX.find(chunk) {
        &chunk[m.end()..]
    } else if let Some(m) = BARE_FENCE_PREFIX.find(chunk) {
        &chunk[m.end()..]
    } else {
        chunk
    }
}

/// Check the full accumulated text for any completion marker.
fn has_completion_marker(text: &str) -> bool {
    COMPLETION_MARKERS.iter().any(|marker| marker.is_match(text))
}
