//! Fixed prompt texts
//!
//! The wording is the contract with the model. Downstream tooling parses
//! the exploration answers against the five action shapes below, so those
//! strings must stay stable.

/// Problem statement and canonical example, up to the test name
pub fn problem_statement(test_name: &str) -> String {
    format!(
        "I have a non-idempotent test that always passes in the first run but fails in all \
         repeated runs in the same JVM. In other words, the test has side effects and \
         \u{201c}self-pollutes\u{201d} the state shared among test runs, so only the first run \
         succeeds. An example of a non-idempotent test is \
         `void t1() {{ assertEquals(w, 0); w = 1; }}`, and a fix is to reset `w` to `0`. \
         Now here's the actual non-idempotent test `{}` that I have:\n",
        test_name
    )
}

/// Exploration closing instruction (five-way closed choice)
pub fn explore_instruction() -> &'static str {
    "Based on the knowledge above, please decide: \n\
     If the test code contains enough information for a fix (i.e., a fix is possible without \
     'assuming' the existence / functionality of any methods), please just answer \
     `Directly Fixable` in your response; \n\
     Otherwise, if you would like to explore the code for one specific custom method / \
     constructor appearing in the test code, please just answer \
     `Find Method Code: {className.methodName}` (e.g., `Find Method Code: {MyNIOClass.reset}`) \
     in your response; \n\
     If you would like to explore the code for a specific custom class relevant to the test \
     code, please just answer `Find Class Code: {className}` (e.g., \
     `Find Class Code: {MyNIOClass}`) in your response; \n\
     If want to explore all methods with names similar to a hypothesized name in any possibly \
     relevant classes, please just answer `Find Hypothesized Method: {possibleMethodName}` \
     (e.g., `Find Hypothesized Method: {resetDataSet}`) in your response; \n\
     If you generally need source code from more possibly relevant source files before you \
     can make a decision, please just answer `Find Relevant File`. \n\
     In general, please just answer one of `Directly Fixable`, \
     `Find Method Code: {className.methodName}`, `Find Class Code: {className}`, \
     `Find Hypothesized Method: {possibleMethodName}`, or `Find Relevant File`. \
     Do not include any other text in your response."
}

/// Fix closing instruction
pub fn fix_instruction(test_name: &str) -> String {
    format!(
        "Please directly fix the non-idempotent test `{}`, and answer with only Java code of \
         the fixed test. Do not include any explanation. Make sure you add import statements \
         when needed.",
        test_name
    )
}

/// Framing for collected source code
pub fn source_context_preamble() -> &'static str {
    "Below is part of the main code relevant to the test class - it may contain methods to \
     clean up polluted states:"
}

/// Replaces the source block when no source code was collected
pub fn source_unavailable_preamble() -> &'static str {
    "Use all information above - "
}

/// Instruction for turning a patch into a whole compilable test class
pub fn compilable_patch_instruction(class_name: &str, class_source: &str, patch: &str) -> String {
    format!(
        "Given the code for the original test class {class_name}: \n\n```\n{class_source}\n```, \
         generate an updated version of the class code that addresses changes in the following \
         patch you suggested earlier:\n\n```\n{patch}\n```\
         Existing classes, fields and methods, if not covered by the patch, shall be included \
         directly without changes. Please ensure you leave all code not to be changed by the \
         patch as-is. Please do not remove or omit existing code. \
         Notice that the patch only deals with one test, so your generated class shall only \
         change that method and/or the relevant helper method (if they're changed as per the \
         patch). \
         Also, please ensure including all package declaration and import statements in the \
         original test class. Do not change or remove other tests. Include all tests not changed \
         as well - it shall contain all tests in the original code. \
         Your code shall be directly compilable when substituting the original test file as a \
         whole. Once again, remember to directly apply the changes suggested by the patch and do \
         NOT make unnecessary changes, and do not omit unchanged code. \
         Wrap your patched test class code in a Java code block starting with '```java' and \
         ending with '```'"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explore_instruction_lists_all_actions() {
        let text = explore_instruction();
        for action in [
            "`Directly Fixable`",
            "`Find Method Code: {className.methodName}`",
            "`Find Class Code: {className}`",
            "`Find Hypothesized Method: {possibleMethodName}`",
            "`Find Relevant File`",
        ] {
            assert!(text.contains(action), "missing action {action}");
        }
        assert!(text.ends_with("Do not include any other text in your response."));
    }

    #[test]
    fn test_problem_statement_names_test() {
        let text = problem_statement("testBar");
        assert!(text.contains("`testBar`"));
        assert!(text.contains("`void t1() { assertEquals(w, 0); w = 1; }`"));
    }
}
