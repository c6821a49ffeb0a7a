//! CLI argument parsing
//!
//! Grammar:
//! ```text
//! nio-fixer <model> <mode> [api_key] [-max_tokens=<n>] [-timestamp=<run>]
//!           [-extra_prompt=<text>] [-config=<path>] [--verbose]
//! nio-fixer compile-patch <ClassName> <java_file> <model> [api_key] [-config=<path>] [--verbose]
//! nio-fixer --help | --version
//! ```
//!
//! The API key is a positional argument, present only for hosted models.

use crate::cli::{Error, Result};
use crate::fixer::DEFAULT_MAX_TOKENS;
use crate::llm::types::{Mode, ModelFamily};

/// Parsed CLI arguments
#[derive(Debug, Clone, PartialEq)]
pub struct Args {
    /// Command to run (None with --help / --version)
    pub command: Option<Command>,

    /// Lower the log level to debug
    pub verbose: bool,

    /// Show version and exit
    pub show_version: bool,

    /// Show help and exit
    pub show_help: bool,
}

/// CLI commands
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Fix or explore every candidate test of a run
    Fix {
        model: ModelFamily,
        mode: Mode,
        api_key: Option<String>,
        max_tokens: u32,
        timestamp: Option<String>,
        extra_prompt: String,
        config: Option<String>,
    },

    /// Rewrite a whole test class around `patch.txt`
    CompilePatch {
        class_name: String,
        java_file: String,
        model: ModelFamily,
        api_key: Option<String>,
        config: Option<String>,
    },
}

/// `-name=value` options
#[derive(Debug, Default)]
struct Options {
    max_tokens: Option<u32>,
    timestamp: Option<String>,
    extra_prompt: Option<String>,
    config: Option<String>,
}

/// Parse CLI arguments from std::env::args()
pub fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Args> {
    let mut iter = args.into_iter();
    let _program = iter.next(); // Skip program name

    let mut args_out = Args {
        command: None,
        verbose: false,
        show_version: false,
        show_help: false,
    };

    let mut positional = Vec::new();
    let mut options = Options::default();

    // First pass: collect flags, options and positional args
    for arg in iter {
        match arg.as_str() {
            "--version" => args_out.show_version = true,
            "--help" | "-h" => args_out.show_help = true,
            "--verbose" => args_out.verbose = true,
            arg if arg.starts_with("--") => {
                return Err(Error::InvalidArgs(format!("Unknown option: {}", arg)));
            }
            arg if arg.starts_with('-') && arg.contains('=') => parse_option(arg, &mut options)?,
            other => positional.push(other.to_string()),
        }
    }

    if args_out.show_help || args_out.show_version {
        return Ok(args_out);
    }

    // Second pass: command from positional args
    args_out.command = Some(match positional.first().map(String::as_str) {
        None => {
            return Err(Error::MissingArgument(
                "Please specify the model and the mode (explore or fix)".to_string(),
            ))
        }
        Some("compile-patch") => parse_compile_patch(&positional[1..], options)?,
        Some(_) => parse_fix(&positional, options)?,
    });

    Ok(args_out)
}

fn parse_option(arg: &str, options: &mut Options) -> Result<()> {
    let (name, value) = arg
        .split_once('=')
        .ok_or_else(|| Error::InvalidArgs(format!("Malformed option: {}", arg)))?;
    match name {
        "-max_tokens" => {
            let max_tokens = value.parse::<u32>().map_err(|_| {
                Error::InvalidArgs(format!("-max_tokens expects a positive integer, got '{}'", value))
            })?;
            if max_tokens == 0 {
                return Err(Error::InvalidArgs("-max_tokens must be at least 1".to_string()));
            }
            options.max_tokens = Some(max_tokens);
        }
        "-timestamp" => options.timestamp = Some(value.to_string()),
        "-extra_prompt" => options.extra_prompt = Some(value.to_string()),
        "-config" => options.config = Some(value.to_string()),
        other => return Err(Error::InvalidArgs(format!("Unknown option: {}", other))),
    }
    Ok(())
}

fn parse_model(name: &str) -> Result<ModelFamily> {
    name.parse().map_err(Error::UnsupportedModel)
}

/// `<model> <mode> [api_key]`
fn parse_fix(positional: &[String], options: Options) -> Result<Command> {
    let model = parse_model(&positional[0])?;
    let expected = if model.requires_api_key() { 3 } else { 2 };

    if positional.len() < expected {
        let what = if model.requires_api_key() {
            "Please specify the mode (explore or fix) and your API key"
        } else {
            "Please specify the mode (explore or fix)"
        };
        return Err(Error::MissingArgument(what.to_string()));
    }
    if positional.len() > expected {
        return Err(Error::InvalidArgs("Too many parameters".to_string()));
    }

    let mode = positional[1].parse::<Mode>().map_err(Error::InvalidMode)?;

    Ok(Command::Fix {
        model,
        mode,
        api_key: positional.get(2).cloned(),
        max_tokens: options.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
        timestamp: options.timestamp,
        extra_prompt: options.extra_prompt.unwrap_or_default(),
        config: options.config,
    })
}

/// `<ClassName> <java_file> <model> [api_key]`
fn parse_compile_patch(positional: &[String], options: Options) -> Result<Command> {
    if positional.len() < 3 {
        return Err(Error::MissingArgument(
            "Usage: nio-fixer compile-patch <ClassName> <java_file> <model> [api_key]".to_string(),
        ));
    }
    let model = parse_model(&positional[2])?;
    let expected = if model.requires_api_key() { 4 } else { 3 };

    if positional.len() < expected {
        return Err(Error::MissingArgument("Please specify your API key".to_string()));
    }
    if positional.len() > expected {
        return Err(Error::InvalidArgs("Too many parameters".to_string()));
    }
    if options.max_tokens.is_some() || options.timestamp.is_some() || options.extra_prompt.is_some() {
        return Err(Error::InvalidArgs(
            "compile-patch only accepts -config=<path>".to_string(),
        ));
    }

    Ok(Command::CompilePatch {
        class_name: positional[0].clone(),
        java_file: positional[1].clone(),
        model,
        api_key: positional.get(3).cloned(),
        config: options.config,
    })
}
