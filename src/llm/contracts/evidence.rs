//! Evidence rendering
//!
//! Converts loaded case evidence into deterministic prompt sections.

use crate::inspector::PriorAttempt;

/// Fence `content` as a code block
pub fn fenced(content: &str) -> String {
    format!("```\n{}\n```\n", content)
}

/// One labelled block per rerun: stack trace, then its error line
///
/// Error lines are index-aligned with the stack traces; a trace without an
/// aligned error line is rendered alone.
pub fn render_reruns(stacktraces: &[String], error_lines: &[String]) -> String {
    let mut output = String::new();
    for (index, stacktrace) in stacktraces.iter().enumerate() {
        output.push_str(&format!(
            "Below is the error message in run #{}:\n",
            index + 1
        ));
        output.push_str(&fenced(stacktrace));
        if let Some(error_line) = error_lines.get(index) {
            output.push_str("And the error occurs at this line:\n");
            output.push_str(&fenced(error_line));
        }
    }
    output
}

/// Feedback paragraph about the previous run's attempt
pub fn render_prior_attempt(prior: &PriorAttempt) -> String {
    format!(
        "In your previous attempt, you suggested: `{}`, but after applying the corresponding \
         patch: \n{}, the test is still non-idempotent.\n",
        prior.agent_response,
        fenced(&prior.patch)
    )
}
