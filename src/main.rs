// SPDX-FileCopyrightText: 2026 Tessera contributors
// SPDX-License-Identifier: MIT

//! Tessera CLI entrypoint.
//!
//! Runs the TUI: a login view backed by the credential endpoint and the
//! selectable board. `--demo` skips the network and the on-disk session
//! store entirely.

use std::error::Error;

use tessera::auth::Verifier;
use tessera::store::SessionStore;

const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:3000";

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [--session <dir>] [--server <url>]\n  {program} --demo\n\nThe session store lives in <dir> (default: the current working directory).\n--server points at the user directory queried on sign-in (default {DEFAULT_SERVER_URL}).\n--demo uses built-in accounts (ada@example.com / mosaic) and keeps the session\nin memory; it cannot be combined with --session or --server."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    demo: bool,
    session_dir: Option<String>,
    server_url: Option<String>,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--demo" => {
                if options.demo {
                    return Err(());
                }
                options.demo = true;
            }
            "--session" => {
                if options.session_dir.is_some() {
                    return Err(());
                }
                options.session_dir = Some(args.next().ok_or(())?);
            }
            "--server" => {
                if options.server_url.is_some() {
                    return Err(());
                }
                options.server_url = Some(args.next().ok_or(())?);
            }
            _ => return Err(()),
        }
    }

    if options.demo && (options.session_dir.is_some() || options.server_url.is_some()) {
        return Err(());
    }

    Ok(options)
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "tessera".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        let (store, verifier) = if options.demo {
            (SessionStore::ephemeral(), Verifier::demo())
        } else {
            let dir = options.session_dir.unwrap_or_else(|| ".".to_owned());
            let url = options.server_url.unwrap_or_else(|| DEFAULT_SERVER_URL.to_owned());
            (SessionStore::open(dir), Verifier::remote(url)?)
        };

        tessera::tui::run(store, verifier)
    })();

    if let Err(err) = result {
        eprintln!("tessera: {err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_options, CliOptions};

    fn parse(args: &[&str]) -> Result<CliOptions, ()> {
        parse_options(args.iter().map(|arg| (*arg).to_owned()))
    }

    #[test]
    fn no_arguments_means_defaults() {
        assert_eq!(parse(&[]), Ok(CliOptions::default()));
    }

    #[test]
    fn session_and_server_take_values() {
        assert_eq!(
            parse(&["--session", "/tmp/s", "--server", "http://localhost:4000"]),
            Ok(CliOptions {
                demo: false,
                session_dir: Some("/tmp/s".to_owned()),
                server_url: Some("http://localhost:4000".to_owned()),
            })
        );
    }

    #[test]
    fn demo_cannot_be_combined_with_other_flags() {
        assert!(parse(&["--demo", "--server", "http://localhost:4000"]).is_err());
        assert!(parse(&["--demo", "--session", "/tmp/s"]).is_err());
    }

    #[test]
    fn duplicate_and_unknown_flags_are_rejected() {
        assert!(parse(&["--session", "a", "--session", "b"]).is_err());
        assert!(parse(&["--demo", "--demo"]).is_err());
        assert!(parse(&["--wat"]).is_err());
    }

    #[test]
    fn flags_missing_their_value_are_rejected() {
        assert!(parse(&["--session"]).is_err());
        assert!(parse(&["--server"]).is_err());
    }
}
