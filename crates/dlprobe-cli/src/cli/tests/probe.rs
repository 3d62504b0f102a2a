//! Tests for the probe subcommand.

use super::parse;
use crate::cli::{Cli, CliCommand};
use clap::Parser;

#[test]
fn cli_parse_probe() {
    match parse(&["dlprobe", "probe", "https://example.com/file.iso"]) {
        CliCommand::Probe {
            url,
            existing_length,
            checksum,
            json,
        } => {
            assert_eq!(url, "https://example.com/file.iso");
            assert!(existing_length.is_none());
            assert!(checksum.is_none());
            assert!(!json);
        }
        _ => panic!("expected Probe"),
    }
}

#[test]
fn cli_parse_probe_with_baseline() {
    match parse(&[
        "dlprobe",
        "probe",
        "https://example.com/x",
        "--existing-length",
        "500",
        "--checksum",
        "abc==",
        "--json",
    ]) {
        CliCommand::Probe {
            existing_length,
            checksum,
            json,
            ..
        } => {
            assert_eq!(existing_length, Some(500));
            assert_eq!(checksum.as_deref(), Some("abc=="));
            assert!(json);
        }
        _ => panic!("expected Probe with baseline"),
    }
}

#[test]
fn cli_parse_probe_requires_url() {
    assert!(Cli::try_parse_from(["dlprobe", "probe"]).is_err());
}
