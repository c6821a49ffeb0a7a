//! Prompt contracts: fixed templates plus case evidence
//!
//! Every prompt is a single user message. Section order:
//! 1. problem statement and canonical example
//! 2. test name and body
//! 3. previous attempt (only when one exists)
//! 4. stack traces with their error lines, per rerun
//! 5. source context (fix mode)
//! 6. mode instruction, then the caller's extra text as the final suffix

mod evidence;
mod prompts;

pub use evidence::{fenced, render_prior_attempt, render_reruns};
pub use prompts::{
    compilable_patch_instruction, explore_instruction, fix_instruction, problem_statement,
    source_context_preamble, source_unavailable_preamble,
};

use crate::inspector::{Evidence, PriorAttempt, SourceContext};
use crate::llm::types::Mode;

/// Build the repair prompt for one case
///
/// `extra_prompt` is appended verbatim as the very last text so it can
/// override earlier instructions (e.g. "Do not add comments").
pub fn build_repair_prompt(
    test_name: &str,
    evidence: &Evidence,
    prior: Option<&PriorAttempt>,
    mode: Mode,
    extra_prompt: &str,
) -> String {
    let mut prompt = problem_statement(test_name);
    prompt.push_str(&fenced(&evidence.test_body));

    if let Some(prior) = prior {
        prompt.push_str(&render_prior_attempt(prior));
    }

    prompt.push_str(&render_reruns(&evidence.stacktraces, &evidence.error_lines));

    match mode {
        Mode::DecideRelevantSourceCode => {
            prompt.push_str(explore_instruction());
        }
        Mode::Fix => {
            match &evidence.source {
                SourceContext::Available(code) => {
                    prompt.push_str(source_context_preamble());
                    prompt.push_str(&fenced(code));
                }
                SourceContext::Unavailable => {
                    prompt.push_str(source_unavailable_preamble());
                }
                SourceContext::NotRequested => {}
            }
            prompt.push_str(&fix_instruction(test_name));
        }
    }

    prompt.push_str(extra_prompt);
    prompt
}

/// Build the whole-class rewrite prompt for a previously generated patch
pub fn build_compilable_patch_prompt(class_name: &str, class_source: &str, patch: &str) -> String {
    compilable_patch_instruction(class_name, class_source, patch)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evidence() -> Evidence {
        Evidence {
            test_body: "void testBar(){ assertEquals(w,0); w=1; }".to_string(),
            source: SourceContext::NotRequested,
            stacktraces: vec!["AssertionError at line 1".to_string()],
            error_lines: vec!["assertEquals(w,0);".to_string()],
        }
    }

    #[test]
    fn test_sections_in_order() {
        let prompt = build_repair_prompt("testBar", &evidence(), None, Mode::Fix, "");
        let statement = prompt.find("non-idempotent test `testBar`").unwrap();
        let body = prompt.find("void testBar()").unwrap();
        let trace = prompt.find("AssertionError at line 1").unwrap();
        let instruction = prompt.find("Please directly fix").unwrap();
        assert!(statement < body && body < trace && trace < instruction);
    }

    #[test]
    fn test_prior_attempt_paragraph() {
        let without = build_repair_prompt("testBar", &evidence(), None, Mode::Fix, "");
        assert!(!without.contains("In your previous attempt"));

        let prior = PriorAttempt {
            agent_response: "Directly Fixable".to_string(),
            patch: "w = 0;".to_string(),
        };
        let with = build_repair_prompt("testBar", &evidence(), Some(&prior), Mode::Fix, "");
        assert_eq!(with.matches("In your previous attempt").count(), 1);
        assert!(with.contains("you suggested: `Directly Fixable`"));
        assert!(with.contains("still non-idempotent"));
    }

    #[test]
    fn test_extra_prompt_is_strict_suffix_in_both_modes() {
        let extra = " Do not add comments.";
        for mode in [Mode::Fix, Mode::DecideRelevantSourceCode] {
            let prompt = build_repair_prompt("testBar", &evidence(), None, mode, extra);
            assert!(prompt.ends_with(extra));
            assert_eq!(prompt.matches(extra).count(), 1);
            assert!(prompt.len() > extra.len());
        }
    }

    #[test]
    fn test_source_context_phrasing() {
        let mut with_source = evidence();
        with_source.source = SourceContext::Available("class W { static int w; }".to_string());
        let prompt = build_repair_prompt("testBar", &with_source, None, Mode::Fix, "");
        let source = prompt.find("class W { static int w; }").unwrap();
        assert!(prompt.contains(source_context_preamble()));
        assert!(source < prompt.find("Please directly fix").unwrap());

        let mut unavailable = evidence();
        unavailable.source = SourceContext::Unavailable;
        let prompt = build_repair_prompt("testBar", &unavailable, None, Mode::Fix, "");
        assert!(prompt.contains("Use all information above - Please directly fix"));
    }

    #[test]
    fn test_explore_mode_has_no_fix_instruction() {
        let prompt = build_repair_prompt(
            "testBar",
            &evidence(),
            None,
            Mode::DecideRelevantSourceCode,
            "",
        );
        assert!(prompt.contains("Find Relevant File"));
        assert!(!prompt.contains("Please directly fix"));
    }

    #[test]
    fn test_compilable_patch_prompt_embeds_inputs() {
        let prompt = build_compilable_patch_prompt("FooTest", "class FooTest {}", "w = 0;");
        assert!(prompt.contains("original test class FooTest"));
        assert!(prompt.contains("class FooTest {}"));
        assert!(prompt.contains("w = 0;"));
        assert!(prompt.contains("```java"));
    }
}
