//! Integration tests for distverify-core.
//!
//! These tests run whole verification workflows against real trees and
//! archives in temporary directories.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use distverify_core::ChecksumAlgorithm;
use distverify_core::ManifestEntry;
use distverify_core::NoopObserver;
use distverify_core::OutcomeEntry;
use distverify_core::OutcomeStatus;
use distverify_core::ReconciliationResult;
use distverify_core::ReportFormat;
use distverify_core::Variables;
use distverify_core::VerifyConfig;
use distverify_core::VerifyError;
use distverify_core::VerifyObserver;
use distverify_core::generate_whitelist;
use distverify_core::manifest::parse_manifest;
use distverify_core::reconcile;
use distverify_core::test_utils::create_test_tar_gz;
use distverify_core::test_utils::create_test_zip;
use distverify_core::test_utils::write_tree;
use distverify_core::verify_distribution;
use distverify_core::verify_distribution_with_observer;
use distverify_core::write_report;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const EMPTY_MD5: &str = "d41d8cd98f00b204e9800998ecf8427e";
const HELLO_MD5: &str = "5d41402abc4b2a76b9719d911017c592";

fn run(root: &Path, entries: &[ManifestEntry]) -> ReconciliationResult {
    reconcile(root, entries, &ChecksumAlgorithm::Md5, &mut NoopObserver).unwrap()
}

fn statuses(result: &ReconciliationResult) -> Vec<(&str, OutcomeStatus)> {
    result
        .outcomes()
        .iter()
        .map(|o| (o.path.as_str(), o.status))
        .collect()
}

#[derive(Default)]
struct Recorder {
    unresolved: Vec<String>,
    outcomes: usize,
    completed: bool,
}

impl VerifyObserver for Recorder {
    fn on_unresolved_variable(&mut self, _template: &str, name: &str) {
        self.unresolved.push(name.to_string());
    }

    fn on_outcome(&mut self, _outcome: &OutcomeEntry) {
        self.outcomes += 1;
    }

    fn on_complete(&mut self, _result: &ReconciliationResult) {
        self.completed = true;
    }
}

#[test]
fn test_scenario_matching_file_is_valid() {
    let temp = TempDir::new().unwrap();
    write_tree(temp.path(), &[("a.txt", "")]);

    let result = run(temp.path(), &[ManifestEntry::new("/a.txt", Some(EMPTY_MD5))]);

    assert!(result.is_valid());
    assert_eq!(statuses(&result), vec![("/a.txt", OutcomeStatus::Match)]);
}

#[test]
fn test_scenario_missing_file() {
    let temp = TempDir::new().unwrap();

    let result = run(temp.path(), &[ManifestEntry::new("/a.txt", Some("X"))]);

    assert!(!result.is_valid());
    assert_eq!(statuses(&result), vec![("/a.txt", OutcomeStatus::Missing)]);
    assert_eq!(result.outcomes()[0].detail, "Defined file not found");
}

#[test]
fn test_scenario_undeclared_file() {
    let temp = TempDir::new().unwrap();
    write_tree(temp.path(), &[("b.txt", "hello")]);

    let result = run(temp.path(), &[]);

    assert!(!result.is_valid());
    let outcome = &result.outcomes()[0];
    assert_eq!(outcome.path, "/b.txt");
    assert_eq!(outcome.status, OutcomeStatus::Undeclared);
    assert_eq!(outcome.checksum.as_deref(), Some(HELLO_MD5));
    assert_eq!(outcome.detail, "File is not defined in whitelist");
}

#[test]
fn test_scenario_checksum_mismatch() {
    let temp = TempDir::new().unwrap();
    write_tree(temp.path(), &[("c.txt", "hello")]);

    let result = run(temp.path(), &[ManifestEntry::new("/c.txt", Some("Y"))]);

    assert!(!result.is_valid());
    let outcome = &result.outcomes()[0];
    assert_eq!(outcome.status, OutcomeStatus::ChecksumMismatch);
    assert_eq!(outcome.checksum.as_deref(), Some("Y"));
    assert!(outcome.detail.contains(HELLO_MD5));
}

#[test]
fn test_scenario_variable_path() {
    let temp = TempDir::new().unwrap();
    write_tree(temp.path(), &[("release.txt", "")]);
    let mut vars = Variables::new();
    vars.insert("v".into(), "release".into());

    let xml = format!(r#"<whitelist><entry path="/${{v}}.txt" md5="{EMPTY_MD5}"/></whitelist>"#);
    let entries = parse_manifest(&xml, &vars, &mut NoopObserver).unwrap();
    let result = run(temp.path(), &entries);

    assert!(result.is_valid());
    assert_eq!(statuses(&result), vec![("/release.txt", OutcomeStatus::Match)]);
}

#[test]
fn test_unresolved_variable_becomes_missing() {
    let temp = TempDir::new().unwrap();
    write_tree(temp.path(), &[("release.txt", "")]);

    let mut recorder = Recorder::default();
    let xml = r#"<whitelist><entry path="/${v}.txt"/></whitelist>"#;
    let entries = parse_manifest(xml, &Variables::new(), &mut recorder).unwrap();
    let result = reconcile(temp.path(), &entries, &ChecksumAlgorithm::Md5, &mut recorder).unwrap();

    assert_eq!(recorder.unresolved, vec!["v".to_string()]);
    assert_eq!(
        statuses(&result),
        vec![
            ("/${v}.txt", OutcomeStatus::Missing),
            ("/release.txt", OutcomeStatus::Undeclared),
        ]
    );
}

#[test]
fn test_complete_diagnostic_in_one_run() {
    let temp = TempDir::new().unwrap();
    write_tree(
        temp.path(),
        &[
            ("ok.txt", ""),
            ("bad.txt", "hello"),
            ("lib/extra.jar", "x"),
            ("z-extra.txt", "z"),
        ],
    );
    let entries = vec![
        ManifestEntry::new("/ok.txt", Some(EMPTY_MD5)),
        ManifestEntry::new("/gone.txt", None::<String>),
        ManifestEntry::new("/bad.txt", Some(EMPTY_MD5)),
    ];

    let mut recorder = Recorder::default();
    let result = reconcile(temp.path(), &entries, &ChecksumAlgorithm::Md5, &mut recorder).unwrap();

    assert_eq!(
        statuses(&result),
        vec![
            ("/ok.txt", OutcomeStatus::Match),
            ("/gone.txt", OutcomeStatus::Missing),
            ("/bad.txt", OutcomeStatus::ChecksumMismatch),
            ("/lib/extra.jar", OutcomeStatus::Undeclared),
            ("/z-extra.txt", OutcomeStatus::Undeclared),
        ]
    );
    assert_eq!(recorder.outcomes, 5);
    assert!(recorder.completed);
    assert_eq!(result.failure_count(), 4);
}

#[test]
fn test_every_entry_yields_one_outcome() {
    let temp = TempDir::new().unwrap();
    write_tree(temp.path(), &[("a.txt", ""), ("b.txt", ""), ("c.txt", "")]);
    let entries = vec![
        ManifestEntry::new("/a.txt", None::<String>),
        ManifestEntry::new("b.txt", None::<String>),
        ManifestEntry::new("/missing.txt", None::<String>),
    ];

    let result = run(temp.path(), &entries);

    assert_eq!(result.len(), entries.len() + 1);
    assert_eq!(result.count(OutcomeStatus::Undeclared), 1);
    assert_eq!(result.outcomes()[3].path, "/c.txt");
}

#[test]
fn test_reconcile_is_idempotent() {
    let temp = TempDir::new().unwrap();
    write_tree(temp.path(), &[("a.txt", "a"), ("d/b.txt", "b"), ("d/e/c.txt", "c")]);
    let entries = vec![ManifestEntry::new("/d/b.txt", Some("nope"))];

    let first = run(temp.path(), &entries);
    let second = run(temp.path(), &entries);

    assert_eq!(first, second);
}

#[test]
fn test_empty_manifest_and_tree() {
    let temp = TempDir::new().unwrap();
    let result = run(temp.path(), &[]);
    assert!(result.is_valid());
    assert!(result.is_empty());
}

#[test]
fn test_verify_zip_distribution() {
    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("app-1.0.zip");
    fs::write(
        &archive,
        create_test_zip(vec![
            ("bin/", b""),
            ("bin/app.sh", b"hello"),
            ("lib/app-1.0.jar", b""),
        ]),
    )
    .unwrap();
    let whitelist = temp.path().join("whitelist.xml");
    fs::write(
        &whitelist,
        format!(
            r#"<?xml version="1.0"?>
<whitelist>
    <entry path="/bin/app.sh" md5="{HELLO_MD5}"/>
    <entry path="/lib/app-${{project.version}}.jar" md5="{EMPTY_MD5}"/>
</whitelist>"#
        ),
    )
    .unwrap();

    let config = VerifyConfig::default()
        .with_work_dir(temp.path().join("work"))
        .with_variable("project.version", "1.0");
    let result = verify_distribution(&archive, &whitelist, &config).unwrap();

    assert!(result.is_valid(), "{:?}", result.outcomes());
    assert_eq!(result.len(), 2);
}

#[test]
fn test_verify_tar_gz_with_stale_unpack_directory() {
    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("app.tar.gz");
    fs::write(&archive, create_test_tar_gz(vec![("a.txt", b"")])).unwrap();
    let whitelist = temp.path().join("whitelist.xml");
    fs::write(&whitelist, r#"<whitelist><entry path="/a.txt"/></whitelist>"#).unwrap();

    let stale = temp.path().join("app.tar.gz-unzipped/stale.txt");
    fs::create_dir_all(stale.parent().unwrap()).unwrap();
    fs::write(&stale, "old").unwrap();

    let mut recorder = Recorder::default();
    let result =
        verify_distribution_with_observer(&archive, &whitelist, &VerifyConfig::default(), &mut recorder)
            .unwrap();

    assert!(result.is_valid());
    assert!(recorder.completed);
}

#[test]
fn test_verify_reports_undeclared_archive_content() {
    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("app.war");
    fs::write(
        &archive,
        create_test_zip(vec![("WEB-INF/web.xml", b""), ("debug.log", b"x")]),
    )
    .unwrap();
    let whitelist = temp.path().join("whitelist.xml");
    fs::write(&whitelist, r#"<whitelist><entry path="/WEB-INF/web.xml"/></whitelist>"#).unwrap();

    let result = verify_distribution(&archive, &whitelist, &VerifyConfig::default()).unwrap();

    assert!(!result.is_valid());
    let failures: Vec<&str> = result.failures().map(|o| o.path.as_str()).collect();
    assert_eq!(failures, vec!["/debug.log"]);
}

#[test]
fn test_verify_invalid_whitelist_is_error() {
    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("app.zip");
    fs::write(&archive, create_test_zip(vec![("a.txt", b"")])).unwrap();
    let whitelist = temp.path().join("whitelist.xml");
    fs::write(&whitelist, r#"<whitelist><entry md5="x"/></whitelist>"#).unwrap();

    let result = verify_distribution(&archive, &whitelist, &VerifyConfig::default());

    assert!(matches!(result, Err(VerifyError::InvalidManifest { .. })));
}

#[test]
fn test_unsupported_archive_format() {
    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("app.rar");
    fs::write(&archive, b"rar").unwrap();
    let whitelist = temp.path().join("whitelist.xml");
    fs::write(&whitelist, "<whitelist/>").unwrap();

    let result = verify_distribution(&archive, &whitelist, &VerifyConfig::default());

    assert!(matches!(result, Err(VerifyError::UnsupportedFormat { .. })));
}

#[test]
fn test_generated_whitelist_verifies_its_source() {
    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("app.zip");
    fs::write(
        &archive,
        create_test_zip(vec![("a.txt", b"a"), ("lib/b.jar", b"b"), ("lib/c/d.txt", b"d")]),
    )
    .unwrap();
    let template = temp.path().join("whitelist.tmpl.xml");

    let config = VerifyConfig::default().with_work_dir(temp.path().join("work"));
    let generated = generate_whitelist(&archive, &template, &config).unwrap();
    assert_eq!(generated.entries, 3);

    let result = verify_distribution(&archive, &template, &config).unwrap();
    assert!(result.is_valid());
    assert_eq!(result.count(OutcomeStatus::Match), 3);
}

#[test]
fn test_sha256_whitelist_roundtrip() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("dist");
    write_tree(&source, &[("a.txt", "a")]);
    let template = temp.path().join("whitelist.tmpl.xml");
    let config = VerifyConfig::default().with_algorithm(ChecksumAlgorithm::Sha256);

    generate_whitelist(&source, &template, &config).unwrap();
    let xml = fs::read_to_string(&template).unwrap();
    assert!(xml.contains(r#"sha256="ca978112ca1bbdcafac231b39a23dc4da786eff8147c4e72b9807785afee48bb""#));

    let entries = parse_manifest(&xml, &Variables::new(), &mut NoopObserver).unwrap();
    let result = reconcile(&source, &entries, &ChecksumAlgorithm::Sha256, &mut NoopObserver).unwrap();
    assert!(result.is_valid());
}

#[test]
fn test_reports_written_for_invalid_result() {
    let temp = TempDir::new().unwrap();
    write_tree(temp.path().join("tree").as_path(), &[("extra.txt", "")]);
    let result = run(
        &temp.path().join("tree"),
        &[ManifestEntry::new("/a.txt", Some("X"))],
    );

    let xml_path = temp.path().join("reports/report.xml");
    let junit_path = temp.path().join("reports/junit.xml");
    write_report(&result, ReportFormat::Xml, &xml_path).unwrap();
    write_report(&result, ReportFormat::JUnit, &junit_path).unwrap();

    let xml = fs::read_to_string(xml_path).unwrap();
    assert!(xml.contains(r#"<entry path="/a.txt" checksum="X">"#));
    assert!(xml.contains(r#"<entry path="/extra.txt" checksum="d41d8cd98f00b204e9800998ecf8427e">"#));

    let junit = fs::read_to_string(junit_path).unwrap();
    assert!(junit.contains(r#"tests="2" failures="2""#));
    assert!(junit.contains(r#"type="UNDECLARED""#));
}
