//! Tests for response interpretation.

use crate::error::ProbeErrorKind;
use crate::transport::{RawResponse, ResponseHeaders};

use super::{interpret, InterpretContext, Interpretation, ResponseFacts};

fn response(status: u32, headers: &[(&str, &str)]) -> RawResponse {
    RawResponse {
        status,
        reported_length: -1,
        headers: headers.iter().copied().collect::<ResponseHeaders>(),
    }
}

fn ctx(existing_length: Option<i64>) -> InterpretContext<'static> {
    InterpretContext {
        existing_length,
        existing_checksum_hint: None,
        disposition_file_key: "filename",
    }
}

fn expect_complete(i: Interpretation) -> ResponseFacts {
    match i {
        Interpretation::Complete(facts) => facts,
        other => panic!("expected complete, got {:?}", other),
    }
}

#[test]
fn partial_content_supports_resume() {
    let r = response(206, &[("Content-Length", "1000"), ("Content-Range", "bytes 0-999/1000")]);
    let facts = expect_complete(interpret(&r, &ctx(Some(1000))));
    assert_eq!(facts.status_code, 206);
    assert_eq!(facts.content_length, 1000);
    assert!(facts.supports_range_resume);
    assert!(!facts.is_chunk_encoded);
    assert!(!facts.is_new_task);
}

#[test]
fn ok_means_range_ignored() {
    let r = response(200, &[("Content-Length", "4096")]);
    let facts = expect_complete(interpret(&r, &ctx(Some(4096))));
    assert_eq!(facts.content_length, 4096);
    assert!(!facts.supports_range_resume);
}

#[test]
fn content_range_only_resolves_total() {
    let r = response(206, &[("Content-Range", "bytes 0-999/1000")]);
    let facts = expect_complete(interpret(&r, &ctx(None)));
    assert_eq!(facts.content_length, 1000);
    assert!(facts.supports_range_resume);
}

#[test]
fn changed_length_is_new_task() {
    let r = response(206, &[("Content-Length", "1000")]);
    assert!(expect_complete(interpret(&r, &ctx(Some(500)))).is_new_task);
    assert!(!expect_complete(interpret(&r, &ctx(Some(1000)))).is_new_task);
    assert!(expect_complete(interpret(&r, &ctx(None))).is_new_task);
}

#[test]
fn unresolved_length_fails_retryable() {
    for status in [200, 206] {
        let r = response(status, &[("Content-Type", "application/octet-stream")]);
        match interpret(&r, &ctx(None)) {
            Interpretation::Fail(kind @ ProbeErrorKind::UnresolvedLength { .. }) => {
                assert!(kind.needs_retry());
            }
            other => panic!("expected unresolved length, got {:?}", other),
        }
    }
}

#[test]
fn chunked_without_length_completes() {
    let r = response(200, &[("Transfer-Encoding", "chunked")]);
    let facts = expect_complete(interpret(&r, &ctx(Some(2048))));
    assert!(facts.is_chunk_encoded);
    assert_eq!(facts.content_length, -1);
    assert!(facts.is_new_task);
    assert!(!facts.supports_range_resume);
}

#[test]
fn chunked_partial_without_length_does_not_claim_resume() {
    let r = response(206, &[("Transfer-Encoding", "chunked")]);
    let facts = expect_complete(interpret(&r, &ctx(None)));
    assert_eq!(facts.content_length, -1);
    assert!(!facts.supports_range_resume);
}

#[test]
fn transfer_encoding_match_is_exact() {
    for value in ["Chunked", "gzip, chunked", "chunked "] {
        let mut headers = ResponseHeaders::new();
        headers.insert("Transfer-Encoding", value);
        let r = RawResponse {
            status: 200,
            reported_length: -1,
            headers,
        };
        // The header parser trims, but a value set directly keeps its spacing.
        match interpret(&r, &ctx(None)) {
            Interpretation::Fail(ProbeErrorKind::UnresolvedLength { status: 200 }) => {}
            other => panic!("{:?} must not count as chunked: {:?}", value, other),
        }
    }
}

#[test]
fn checksum_adopted_only_when_unknown() {
    let r = response(206, &[("Content-Length", "10"), ("Content-MD5", "Q2hlY2sgSW50ZWdyaXR5IQ==")]);
    let facts = expect_complete(interpret(&r, &ctx(None)));
    assert_eq!(facts.checksum_hint.as_deref(), Some("Q2hlY2sgSW50ZWdyaXR5IQ=="));

    let known = InterpretContext {
        existing_checksum_hint: Some("already-known"),
        ..ctx(None)
    };
    assert_eq!(expect_complete(interpret(&r, &known)).checksum_hint, None);

    let no_md5 = response(206, &[("Content-Length", "10")]);
    assert_eq!(expect_complete(interpret(&no_md5, &ctx(None))).checksum_hint, None);
}

#[test]
fn disposition_stored_and_filename_extracted() {
    let r = response(
        200,
        &[
            ("Content-Length", "10"),
            ("Content-Disposition", "attachment; filename=%E6%8A%A5%E5%91%8A.pdf"),
        ],
    );
    let facts = expect_complete(interpret(&r, &ctx(None)));
    assert_eq!(facts.server_file_name.as_deref(), Some("报告.pdf"));
    assert_eq!(
        facts
            .disposition_raw
            .as_deref()
            .and_then(super::decode_disposition)
            .as_deref(),
        Some("attachment; filename=%E6%8A%A5%E5%91%8A.pdf")
    );
}

#[test]
fn disposition_without_key_keeps_raw_only() {
    let r = response(200, &[("Content-Length", "10"), ("Content-Disposition", "inline")]);
    let facts = expect_complete(interpret(&r, &ctx(None)));
    assert!(facts.disposition_raw.is_some());
    assert!(facts.server_file_name.is_none());
}

#[test]
fn not_found_is_fatal() {
    match interpret(&response(404, &[]), &ctx(None)) {
        Interpretation::Fail(kind @ ProbeErrorKind::NotFound) => assert!(!kind.needs_retry()),
        other => panic!("expected not found, got {:?}", other),
    }
}

#[test]
fn redirect_captures_location_and_cookie() {
    for status in [301, 302, 303] {
        let r = response(
            status,
            &[
                ("Location", "http://mirror.example.com/file.iso"),
                ("Set-Cookie", "session=abc123; Path=/; HttpOnly"),
                ("Set-Cookie", "lang=en"),
            ],
        );
        match interpret(&r, &ctx(None)) {
            Interpretation::Redirect(hop) => {
                assert_eq!(hop.status_code, status);
                assert_eq!(hop.location.as_deref(), Some("http://mirror.example.com/file.iso"));
                assert_eq!(hop.cookie.as_deref(), Some("session=abc123; lang=en"));
            }
            other => panic!("expected redirect, got {:?}", other),
        }
    }
}

#[test]
fn redirect_without_location_still_a_redirect() {
    match interpret(&response(302, &[]), &ctx(None)) {
        Interpretation::Redirect(hop) => {
            assert!(hop.location.is_none());
            assert!(hop.cookie.is_none());
        }
        other => panic!("expected redirect, got {:?}", other),
    }
}

#[test]
fn other_status_is_retryable_and_names_code() {
    for status in [307, 416, 500, 503] {
        match interpret(&response(status, &[]), &ctx(None)) {
            Interpretation::Fail(kind @ ProbeErrorKind::UnexpectedStatus(_)) => {
                assert!(kind.needs_retry());
                assert!(kind.to_string().contains(&status.to_string()));
            }
            other => panic!("expected unexpected status, got {:?}", other),
        }
    }
}
