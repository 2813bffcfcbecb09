//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `quillpost_core` linkage with a deterministic ping.
//! - Offer quick local sanitize/preview checks on stdin input.
//!
//! Usage: `quillpost_cli [ping|sanitize|preview [max_chars]]`.

use quillpost_core::{sanitize, truncate, CoreLimits, SanitizationPolicy};
use std::io::Read;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        None | Some("ping") => {
            println!("quillpost_core ping={}", quillpost_core::ping());
            println!("quillpost_core version={}", quillpost_core::core_version());
            ExitCode::SUCCESS
        }
        Some("sanitize") => with_stdin(|input| sanitize(input, SanitizationPolicy::article())),
        Some("preview") => {
            let max_chars = match args.get(1).map(|raw| raw.parse::<usize>()) {
                None => CoreLimits::default().preview_chars,
                Some(Ok(value)) => value,
                Some(Err(err)) => {
                    eprintln!("invalid max_chars: {err}");
                    return ExitCode::from(2);
                }
            };
            with_stdin(|input| truncate(input, max_chars))
        }
        Some(other) => {
            eprintln!("unknown command `{other}`; expected ping|sanitize|preview");
            ExitCode::from(2)
        }
    }
}

fn with_stdin(run: impl FnOnce(&str) -> String) -> ExitCode {
    let mut input = String::new();
    if let Err(err) = std::io::stdin().read_to_string(&mut input) {
        eprintln!("failed to read stdin: {err}");
        return ExitCode::FAILURE;
    }
    println!("{}", run(&input));
    ExitCode::SUCCESS
}
