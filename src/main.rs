//! nio-fixer CLI
//!
//! `nio-fixer <model> <mode> [api_key] [options]` fixes or explores every
//! candidate test of the latest detection run;
//! `nio-fixer compile-patch ...` turns a patch into a full test class.

use nio_fixer::cli::{init_logging, parse_args, run_cli_mode, EXIT_FAILURE};

fn main() {
    // Parse CLI arguments
    let args: Vec<String> = std::env::args().collect();

    let parsed = match parse_args(args) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Run 'nio-fixer --help' for usage.");
            std::process::exit(EXIT_FAILURE);
        }
    };

    // Handle --version flag
    if parsed.show_version {
        println!("nio-fixer v{}", env!("CARGO_PKG_VERSION"));
        return;
    }

    // Handle --help flag
    if parsed.show_help {
        print_help();
        return;
    }

    init_logging(parsed.verbose);
    let exit_code = run_cli_mode(parsed);
    std::process::exit(exit_code);
}

/// Print help message
fn print_help() {
    println!("nio-fixer v{} - LLM-assisted repair of non-idempotent tests", env!("CARGO_PKG_VERSION"));
    println!();
    println!("USAGE:");
    println!("    nio-fixer <model> <mode> [api_key] [options]");
    println!("    nio-fixer compile-patch <ClassName> <java_file> <model> [api_key] [-config=<path>]");
    println!();
    println!("MODELS:");
    println!("    GPT4, GPT3.5  Hosted chat completion (api_key required, env:NAME accepted)");
    println!("    DeepSeek      deepseek-coder-33b-instruct, local weights");
    println!("    Qwen          Qwen2.5-Coder-32B-Instruct, local weights");
    println!();
    println!("MODES:");
    println!("    fix                          Write the fixed test to patch.txt");
    println!("    decide_relevant_source_code  Pick the next exploration step (alias: explore)");
    println!();
    println!("OPTIONS:");
    println!("    -max_tokens=<n>       Token cap per response (default: 1000)");
    println!("    -timestamp=<run>      Run directory to process (default: latest)");
    println!("    -extra_prompt=<text>  Text appended to every prompt");
    println!("    -config=<path>        Config file (default: .NIOInspector/fixer.toml)");
    println!("    --verbose             Debug logging on stderr (RUST_LOG overrides)");
    println!("    --version             Show version information");
    println!("    --help                Show this help message");
}
