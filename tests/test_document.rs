
use fixtures::*;

use oval_syschar::{
    Datatype, DeserializationError, MessageLevel, ParseStats, ParserSettings, Subtype,
    SysCharDocument, SysCharError, SysCharStatus,
};
use pretty_assertions::assert_eq;

#[test]
fn test_parses_unix_sample() {
    ensure_env_logger_initialized();

    let document = SysCharDocument::from_path(unix_sample(), &ParserSettings::default()).unwrap();

    assert_eq!(
        document.stats,
        ParseStats {
            parsed: 5,
            skipped: 1,
            failed: 0
        }
    );

    let ids: Vec<_> = document.model.items().map(|item| item.id()).collect();
    assert_eq!(ids, vec!["item1", "2", "3", "4", "5"]);
    assert!(document.model.items().all(|item| item.is_valid()));
}

#[test]
fn test_file_item_without_status_exists() {
    let document = SysCharDocument::from_path(unix_sample(), &ParserSettings::default()).unwrap();
    let item = document.model.item("item1").unwrap();

    assert_eq!(item.subtype(), Subtype::UnixFile);
    assert_eq!(item.status(), SysCharStatus::Exists);
    assert_eq!(item.message(), None);
    assert_eq!(item.entries().len(), 1);
    assert_eq!(item.entries()[0].name, "filepath");
    assert_eq!(item.entries()[0].value, "/etc/passwd");
}

#[test]
fn test_entries_keep_document_order_and_attributes() {
    let document = SysCharDocument::from_path(unix_sample(), &ParserSettings::default()).unwrap();

    let process = document.model.item("2").unwrap();
    assert_eq!(process.status(), SysCharStatus::Error);
    assert_eq!(process.message(), Some("/proc/1/environ is not readable"));
    assert_eq!(process.message_level(), MessageLevel::Warning);
    assert_eq!(
        process
            .entries()
            .iter()
            .map(|e| (e.name.as_str(), e.datatype))
            .collect::<Vec<_>>(),
        vec![
            ("command", Datatype::String),
            ("pid", Datatype::Int),
            ("ppid", Datatype::Int),
        ]
    );

    let rpm = document.model.item("3").unwrap();
    assert_eq!(rpm.subtype(), Subtype::LinuxRpmInfo);
    assert_eq!(rpm.entries()[2].status, SysCharStatus::DoesNotExist);
    assert_eq!(rpm.entries()[3].datatype, Datatype::EvrString);

    let content = document.model.item("4").unwrap();
    assert!(content.entries()[1].mask);
}

#[test]
fn test_repeated_id_merges_into_one_item() {
    let document =
        SysCharDocument::from_path(windows_sample(), &ParserSettings::default()).unwrap();

    assert_eq!(document.stats.parsed, 4);
    assert_eq!(document.model.len(), 3);

    let item = document.model.item("101").unwrap();
    // The second element carries no status, so it resets to the default.
    assert_eq!(item.status(), SysCharStatus::Exists);
    assert_eq!(item.message(), Some("access denied"));
    assert_eq!(item.message_level(), MessageLevel::Error);
    assert_eq!(
        item.entries()
            .iter()
            .map(|e| e.name.as_str())
            .collect::<Vec<_>>(),
        vec!["hive", "key"]
    );
}

#[test]
fn test_invalid_items_are_parsed_but_reported_invalid() {
    let settings = ParserSettings::new().validate_items(true);
    let document = SysCharDocument::from_path(sample_with_invalid_items(), &settings).unwrap();

    assert_eq!(document.model.len(), 2);
    assert!(!document.model.item("1").unwrap().is_valid());
    assert!(document.model.item("2").unwrap().is_valid());
}

#[test]
fn test_locked_after_parse_rejects_writes() {
    let settings = ParserSettings::new().lock_after_parse(true);
    let mut document = SysCharDocument::from_path(unix_sample(), &settings).unwrap();

    let (item, lock) = document.model.item_mut("item1").unwrap();
    let err = item.set_status(lock, SysCharStatus::Error).unwrap_err();

    assert!(matches!(err, SysCharError::ModelLocked { .. }));
    assert_eq!(
        document.model.item("item1").unwrap().status(),
        SysCharStatus::Exists
    );
}

#[test]
fn test_missing_file_is_reported() {
    let err = SysCharDocument::from_path(
        samples_dir().join("does-not-exist.xml"),
        &ParserSettings::default(),
    )
    .unwrap_err();

    assert!(matches!(err, SysCharError::FailedToOpenFile { .. }));
}

#[test]
fn test_malformed_xml_is_an_error() {
    let err = SysCharDocument::parse_str(
        "<oval_system_characteristics><system_data></oval_system_characteristics>",
        &ParserSettings::default(),
    )
    .unwrap_err();

    assert!(matches!(
        err,
        SysCharError::Deserialization(DeserializationError::MalformedXml(_))
    ));
}
