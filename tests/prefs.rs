//! End-to-end tests against real files

use std::path::PathBuf;

use prefs::{Document, Prefs, PrefsDirs, PrefsError, Source, Value};
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

#[test]
fn test_get_by_attributes_and_keys() {
    let prefs = Prefs::load(fixture("foo.prefs")).unwrap();
    assert_eq!(prefs.source(), Source::Native);

    assert_eq!(prefs.attr("foo"), Some(&Value::from("FOO")));
    assert_eq!(prefs.attr("bar"), Some(&Value::from("BAR")));
    assert_eq!(prefs.attr("spam"), Some(&Value::Float(1234.0)));

    assert_eq!(prefs.item("foo"), Some(&Value::from("FOO")));
    assert_eq!(prefs.item("spam").and_then(Value::as_f64), Some(1234.0));
}

#[test]
fn test_set_by_attributes_and_keys() {
    let mut prefs = Prefs::load(fixture("foo.prefs")).unwrap();

    prefs.set_attr("testbyprop", "TESTING").unwrap();
    assert_eq!(prefs.attr("testbyprop"), Some(&Value::from("TESTING")));

    prefs.insert("testbykey", "KEYADDED").unwrap();
    assert_eq!(prefs.item("testbykey"), Some(&Value::from("KEYADDED")));
}

#[test]
fn test_legacy_import() {
    let prefs = Prefs::load(fixture("xml.prefs")).unwrap();
    assert!(prefs.is_legacy());

    assert_eq!(prefs.attr("name"), Some(&Value::from("test")));
    assert_eq!(prefs.get_str("geometry.type"), Some("QRect"));
    assert_eq!(prefs.get_i64("version"), Some(2));
    assert_eq!(prefs.get_f64("scale"), Some(1.5));
    assert_eq!(prefs.get_bool("visible"), Some(true));
    assert_eq!(prefs.get_i64("geometry.width"), Some(640));
    assert_eq!(prefs.get_str("recent.file.path"), Some("/tmp/a.txt"));
}

#[test]
fn test_legacy_converts_to_native_on_save() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("converted.prefs");

    let legacy = Prefs::load(fixture("xml.prefs")).unwrap();
    legacy.save_to(&out).unwrap();

    let converted = Prefs::load(&out).unwrap();
    assert_eq!(converted.source(), Source::Native);
    assert_eq!(converted, legacy);
}

#[test]
fn test_save_new_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("save.prefs");
    assert!(!path.exists());

    let mut prefs = Prefs::load(&path).unwrap();
    assert_eq!(prefs.source(), Source::Missing);
    prefs.set_attr("foo", "TEST").unwrap();
    prefs.save().unwrap();

    let loaded = Prefs::load(&path).unwrap();
    assert_eq!(loaded.attr("foo"), Some(&Value::from("TEST")));
}

#[test]
fn test_save_to_other_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("saved.prefs");

    let prefs = Prefs::load(fixture("foo.prefs")).unwrap();
    prefs.save_to(&path).unwrap();
    assert!(path.exists());
    assert_eq!(prefs.path(), Some(fixture("foo.prefs").as_path()));

    let reloaded = Prefs::load(&path).unwrap();
    assert_eq!(reloaded.get_str("foo"), Some("FOO"));
}

#[test]
fn test_round_trip_is_equal() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("copy.prefs");

    let original = Prefs::load(fixture("foo.prefs")).unwrap();
    original.save_to(&path).unwrap();
    let copy = Prefs::load(&path).unwrap();

    assert_eq!(original, copy);
    assert_eq!(original.to_string(), original.to_string());
}

#[test]
fn test_rich_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rich.prefs");

    let original = Prefs::load(fixture("rich.prefs")).unwrap();
    assert_eq!(original.source(), Source::Native);

    assert_eq!(original.item("missing"), Some(&Value::Null));
    assert_eq!(original.get("window.count"), Some(&Value::Int(3)));
    assert_eq!(original.get("window.geometry.width"), Some(&Value::Int(640)));
    assert_eq!(original.get("window.geometry.height"), Some(&Value::Float(480.0)));
    assert_eq!(original.get_bool("window.visible"), Some(false));
    assert!(original.get_doc("empty").unwrap().is_empty());
    assert_eq!(original.get_str("text"), Some("é\n\"quoted\"\ttab"));
    assert_eq!(original.get_f64("huge"), Some(1e20));
    let negzero = original.get_f64("negzero").unwrap();
    assert!(negzero == 0.0 && negzero.is_sign_negative());

    let recent = original.item("recent").and_then(Value::as_list).unwrap();
    assert_eq!(recent.len(), 6);
    assert_eq!(recent[1], Value::Int(2));
    assert_eq!(recent[4], Value::Null);
    assert_eq!(recent[5], Value::List(vec![Value::from("nested")]));

    // Integers past i64 are kept as the nearest float, not rejected
    assert_eq!(original.get_i64("big"), None);
    assert_eq!(original.get_f64("big"), Some(18446744073709551615.0));

    original.save_to(&path).unwrap();
    let copy = Prefs::load(&path).unwrap();
    assert_eq!(original, copy);
    assert_eq!(copy.get("big"), Some(&Value::Float(1.8446744073709552e19)));
    assert_eq!(copy.get("window.geometry.width"), Some(&Value::Int(640)));
    assert!(copy.get_f64("negzero").unwrap().is_sign_negative());

    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("\"big\": 1.8446744073709552e19"));
    assert!(written.contains("\"missing\": null"));
}

#[test]
fn test_empty_keys_in_native_file_are_dropped() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty-keys.prefs");
    std::fs::write(&path, r#"{"": 1, "a": {"": 2, "b": 3}}"#).unwrap();

    let prefs = Prefs::load(&path).unwrap();
    assert!(!prefs.contains_key(""));
    assert!(!prefs.get_doc("a").unwrap().contains_key(""));
    assert_eq!(prefs.get_i64("a.b"), Some(3));

    prefs.save().unwrap();
    let written = std::fs::read_to_string(&path).unwrap();
    assert!(!written.contains("\"\""));
}

#[test]
fn test_nested_autovivification() {
    let mut prefs = Prefs::new();
    prefs
        .child("foo")
        .unwrap()
        .child("bar")
        .unwrap()
        .insert("spam", "Hello")
        .unwrap();

    assert_eq!(prefs.get_str("foo.bar.spam"), Some("Hello"));
    let bar = prefs.get_doc("foo.bar").unwrap();
    assert_eq!(bar.len(), 1);
    assert!(bar.contains_key("spam"));
}

#[test]
fn test_missing_file_uses_defaults() {
    let prefs = Prefs::load("/nonexistent/path.pref").unwrap();
    let default = Value::from(42);
    for key in ["foo", "bar", "nested.key"] {
        assert_eq!(prefs.item_or(key, &default), &default);
        assert_eq!(prefs.get_or(key, &default), &default);
    }
}

#[test]
fn test_save_into_missing_directory_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("no-such-dir").join("prefs.pref");

    let prefs = Prefs::from_document(Document::new().with("a", 1));
    let err = prefs.save_to(&path).unwrap_err();
    assert!(matches!(err, PrefsError::Write { .. }));
    assert!(!path.exists());
}

#[test]
fn test_corrupt_file_is_loud() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("corrupt.prefs");
    std::fs::write(&path, "{\"foo\": <broken").unwrap();

    let err = Prefs::load(&path).unwrap_err();
    assert!(err.is_parse_error());
    assert_eq!(err.path(), Some(path.as_path()));
}

#[test]
fn test_reserved_keys_stay_in_memory() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("reserved.prefs");

    let mut prefs = Prefs::load(&path).unwrap();
    prefs.insert("_session", 7).unwrap();
    prefs.insert("visible", 1).unwrap();
    assert_eq!(prefs.item("_session"), Some(&Value::Int(7)));
    assert!(prefs.attr("_session").is_none());
    prefs.save().unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(!content.contains("_session"));
    let reloaded = Prefs::load(&path).unwrap();
    assert!(reloaded.item("_session").is_none());
    assert_eq!(reloaded.get_i64("visible"), Some(1));
}

#[test]
fn test_reload_discards_changes() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("reload.prefs");
    std::fs::write(&path, "{\"count\": 1}").unwrap();

    let mut prefs = Prefs::load(&path).unwrap();
    prefs.set("count", 2).unwrap();
    prefs.reload().unwrap();
    assert_eq!(prefs.get_i64("count"), Some(1));
}

#[test]
fn test_dirs_from_env() {
    std::env::set_var(prefs::core::locations::LOCAL_ENV, "/opt/studio/{core}/prefs");
    let dirs = PrefsDirs::from_env();
    std::env::remove_var(prefs::core::locations::LOCAL_ENV);

    assert_eq!(
        dirs.resolve(Some("comp"), false).unwrap(),
        PathBuf::from("/opt/studio/comp/prefs")
    );
}
