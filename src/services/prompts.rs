//! Fixed prompt templates sent to the model.

pub use crate::domain::models::{RANKING_PREAMBLE, SYNTHESIS_PREAMBLE};

use crate::domain::models::{sample::char_prefix, SampleSet};

/// Marker appended to every truncated text shown to the model.
pub const ELLIPSIS: &str = "...";

/// Build the ranking prompt for the judge.
///
/// Every sample is shown as `Response <i+1>: <first preview_chars chars>...`,
/// numbered from 1, followed by a request for a single number in `1..=N`.
pub fn build_ranking_prompt(samples: &SampleSet, preview_chars: usize) -> String {
    let mut prompt = format!("{RANKING_PREAMBLE}\n\n");

    for (i, sample) in samples.iter().enumerate() {
        prompt.push_str(&format!(
            "Response {}: {}{}\n\n",
            i + 1,
            sample.preview(preview_chars),
            ELLIPSIS
        ));
    }

    prompt.push_str(&format!(
        "Reply with ONLY the best response number (1-{}):",
        samples.len()
    ));
    prompt
}

/// Build the reverse-prompt request for the chosen sample.
///
/// The sample is cut to `max_chars` characters; the ellipsis is added only
/// when something was actually cut.
pub fn build_synthesis_prompt(best_sample: &str, max_chars: usize) -> String {
    let excerpt = truncate_with_ellipsis(best_sample, max_chars);
    format!(
        "{SYNTHESIS_PREAMBLE}\n\n\"{excerpt}\"\n\nReply with ONLY the optimized prompt, nothing else."
    )
}

/// Cut `text` to `max_chars` characters, appending `...` only if it was longer.
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    let prefix = char_prefix(text, max_chars);
    if prefix.len() < text.len() {
        format!("{prefix}{ELLIPSIS}")
    } else {
        text.to_string()
    }
}
