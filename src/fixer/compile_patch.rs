//! Compilable patch follow-up
//!
//! Turns a method-level `patch.txt` into a whole replacement test class
//! that compiles when dropped over the original file.

use crate::fixer::{FixerError, Result};
use crate::inspector::ResultKind;
use crate::llm::adapters::LlmAdapter;
use crate::llm::contracts::build_compilable_patch_prompt;
use crate::llm::types::{CompletionRequest, ModelFamily, Task};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const COMPILE_PATCH_MAX_TOKENS: u32 = 1024;

const JAVA_FENCE: &str = "```java";
const FENCE: &str = "```";

/// Inputs of one compile-patch invocation
#[derive(Debug, Clone, PartialEq)]
pub struct CompilePatchOptions {
    /// Holds `patch.txt` and receives `<ClassName>.java`
    pub working_dir: PathBuf,
    pub class_name: String,
    /// Original test class; relative paths resolve against `working_dir`
    pub java_file: PathBuf,
    pub model: ModelFamily,
}

/// Text between the first ```` ```java ```` and the next ```` ``` ````, trimmed
pub fn extract_java_block(response: &str) -> Option<&str> {
    let start = response.find(JAVA_FENCE)? + JAVA_FENCE.len();
    let end = response[start..].find(FENCE)? + start;
    Some(response[start..end].trim())
}

/// Ask the backend for the full patched class and write `<ClassName>.java`
pub fn generate_compilable_patch<A>(options: &CompilePatchOptions, adapter: &A) -> Result<PathBuf>
where
    A: LlmAdapter + ?Sized,
{
    let patch_path = options.working_dir.join(ResultKind::Patch.file_name());
    if !patch_path.is_file() {
        return Err(FixerError::MissingPatch(patch_path));
    }
    let patch = read(&patch_path)?;

    let java_path = if options.java_file.is_absolute() {
        options.java_file.clone()
    } else {
        options.working_dir.join(&options.java_file)
    };
    if !java_path.is_file() {
        return Err(FixerError::JavaFileNotFound(options.java_file.clone()));
    }
    let class_source = read(&java_path)?;

    let request = CompletionRequest {
        prompt: build_compilable_patch_prompt(&options.class_name, &class_source, &patch),
        max_tokens: COMPILE_PATCH_MAX_TOKENS,
        temperature: options.model.temperature(Task::CompilablePatch),
    };
    debug!(class = %options.class_name, provider = adapter.provider_name(), "requesting compilable patch");

    let response = adapter.generate(&request)?;
    println!("{}", response.trim());

    let content = match extract_java_block(&response) {
        Some(code) => code,
        None => {
            println!("No Java content found.");
            ""
        }
    };

    let output_path = options.working_dir.join(format!("{}.java", options.class_name));
    std::fs::write(&output_path, content).map_err(|source| FixerError::Io {
        path: output_path.clone(),
        source,
    })?;
    info!(path = %output_path.display(), "compilable patch written");
    println!("compilable_patch file created: {}", output_path.display());
    Ok(output_path)
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| FixerError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::adapters::stub::StubAdapter;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_extract_java_block() {
        let response = "Here you go:\n```java\npackage a;\nclass T {}\n```\nDone.";
        assert_eq!(extract_java_block(response), Some("package a;\nclass T {}"));
    }

    #[test]
    fn test_extract_java_block_first_block_only() {
        let response = "```java\nclass A {}\n```\n```java\nclass B {}\n```";
        assert_eq!(extract_java_block(response), Some("class A {}"));
    }

    #[test]
    fn test_extract_java_block_absent() {
        assert_eq!(extract_java_block("class T {}"), None);
        assert_eq!(extract_java_block("```java\nclass T {}"), None);
        assert_eq!(extract_java_block("```\nclass T {}\n```"), None);
    }

    fn options(dir: &Path, model: ModelFamily) -> CompilePatchOptions {
        CompilePatchOptions {
            working_dir: dir.to_path_buf(),
            class_name: "FooTest".to_string(),
            java_file: PathBuf::from("src/FooTest.java"),
            model,
        }
    }

    #[test]
    fn test_writes_class_file() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("patch.txt"), "w = 0;").unwrap();
        fs::create_dir(temp.path().join("src")).unwrap();
        fs::write(temp.path().join("src/FooTest.java"), "class FooTest {}").unwrap();

        let adapter = StubAdapter::with_response("```java\nclass FooTest { int w = 0; }\n```".to_string());
        let path = generate_compilable_patch(&options(temp.path(), ModelFamily::DeepSeek), &adapter).unwrap();

        assert_eq!(path, temp.path().join("FooTest.java"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "class FooTest { int w = 0; }");

        let requests = adapter.requests();
        assert_eq!(requests[0].max_tokens, COMPILE_PATCH_MAX_TOKENS);
        assert_eq!(requests[0].temperature, 0.2);
        assert!(requests[0].prompt.contains("w = 0;"));
    }

    #[test]
    fn test_no_java_block_writes_empty_file() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("patch.txt"), "w = 0;").unwrap();
        fs::create_dir(temp.path().join("src")).unwrap();
        fs::write(temp.path().join("src/FooTest.java"), "class FooTest {}").unwrap();

        let adapter = StubAdapter::with_response("sorry".to_string());
        let path = generate_compilable_patch(&options(temp.path(), ModelFamily::Qwen), &adapter).unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "");
    }

    #[test]
    fn test_missing_java_file_writes_nothing() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("patch.txt"), "w = 0;").unwrap();

        let adapter = StubAdapter::new();
        let err = generate_compilable_patch(&options(temp.path(), ModelFamily::Gpt4), &adapter).unwrap_err();

        assert!(matches!(err, FixerError::JavaFileNotFound(_)));
        assert_eq!(err.to_string(), "Java file not found at src/FooTest.java");
        assert!(!temp.path().join("FooTest.java").exists());
        assert!(adapter.requests().is_empty());
    }

    #[test]
    fn test_missing_patch_is_error() {
        let temp = TempDir::new().unwrap();
        let err = generate_compilable_patch(&options(temp.path(), ModelFamily::Gpt4), &StubAdapter::new())
            .unwrap_err();
        assert!(matches!(err, FixerError::MissingPatch(_)));
    }
}
