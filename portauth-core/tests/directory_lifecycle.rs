//! Integration tests for credential directory operations.
//!
//! These tests verify the end-to-end behavior of the directory:
//! - Adding and reading back port and default records
//! - Default-record inheritance
//! - Guarding the default record against deletion while in use
//! - Persistence through a file-backed store
//! - Error handling for corrupt records

use portauth_core::{
    AuthError, CredentialDirectory, ErrorKind, FileStore, KeyValueStore, MemoryStore,
};
use tempfile::TempDir;

/// Helper to create a loaded, empty in-memory directory.
fn memory_directory() -> CredentialDirectory<MemoryStore> {
    let mut dir = CredentialDirectory::new(MemoryStore::new());
    dir.load().unwrap();
    dir
}

/// Helper to create a loaded directory over a file in a temporary directory.
fn file_directory() -> (CredentialDirectory<FileStore>, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let store = FileStore::new(temp_dir.path().join("auth.json"));
    let mut dir = CredentialDirectory::new(store);
    dir.load().unwrap();
    (dir, temp_dir)
}

#[test]
fn test_unpaired_username_and_password_rejected_on_any_port() {
    let mut dir = memory_directory();
    dir.add_credential_set(0, "127.0.0.1", "root", "rootpw").unwrap();

    for port in [0, 1, 3306, 65535] {
        for (user, pass) in [("monuser", ""), ("", "monpw")] {
            let err = dir.add_credential_set(port, "host", user, pass).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidArgument, "port {port}");
        }
    }
}

#[test]
fn test_round_trip_without_inheritance() {
    let mut dir = memory_directory();

    for port in [0, 3306, 3307] {
        dir.add_credential_set(port, "db.example.com", "monuser", "s3cr3t pw")
            .unwrap();
        let entry = dir.get_entry(port).unwrap();

        assert_eq!(entry.port, port);
        assert_eq!(entry.binding, "db.example.com");
        assert_eq!(entry.username, "monuser");
        assert_eq!(entry.password.expose(), "s3cr3t pw");
    }
}

#[test]
fn test_omitted_fields_inherited_from_default() {
    let mut dir = memory_directory();
    dir.add_credential_set(0, "127.0.0.1", "root", "rootpw").unwrap();

    dir.add_credential_set(3306, "", "", "").unwrap();
    dir.add_credential_set(3307, "10.0.0.7", "", "").unwrap();
    dir.add_credential_set(3308, "", "monuser", "monpw").unwrap();

    let entry = dir.get_entry(3306).unwrap();
    assert_eq!(entry.binding, "127.0.0.1");
    assert_eq!(entry.username, "root");
    assert_eq!(entry.password.expose(), "rootpw");

    let entry = dir.get_entry(3307).unwrap();
    assert_eq!(entry.binding, "10.0.0.7");
    assert_eq!(entry.username, "root");

    let entry = dir.get_entry(3308).unwrap();
    assert_eq!(entry.binding, "127.0.0.1");
    assert_eq!(entry.username, "monuser");
    assert_eq!(entry.password.expose(), "monpw");
}

#[test]
fn test_default_entry_is_not_merged() {
    let mut dir = memory_directory();
    dir.add_credential_set(0, "127.0.0.1", "", "").unwrap();

    let entry = dir.get_entry(0).unwrap();
    assert_eq!(entry.binding, "127.0.0.1");
    assert!(entry.username.is_empty());
    assert!(entry.password.is_empty());
}

#[test]
fn test_missing_values_after_inheritance() {
    let mut dir = CredentialDirectory::new(MemoryStore::with_data([("3306", "host, , ")]));
    dir.load().unwrap();

    let err = dir.get_entry(3306).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidAuthentication);
    assert!(err.to_string().contains("missing values for port 3306"));
    assert!(err.to_string().contains("default password: empty"));
}

#[test]
fn test_corrupt_record_is_never_misparsed() {
    let mut dir = CredentialDirectory::new(MemoryStore::with_data([
        ("0", "127.0.0.1, , "),
        ("3306", "host, user"),
        ("3307", "host, user, cHc=, extra"),
    ]));
    dir.load().unwrap();

    for port in [3306, 3307] {
        let err = dir.get_entry(port).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidAuthentication);
        assert!(err.to_string().contains(&format!("invalid value for port {port}")));
    }

    let err = dir.delete_credential_set(0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidAuthentication);
}

#[test]
fn test_delete_default_blocked_while_in_use() {
    let mut dir = memory_directory();
    dir.add_credential_set(0, "127.0.0.1", "", "").unwrap();
    dir.add_credential_set(5, "", "monuser", "monpw").unwrap();

    let default_before = dir.store().get("0").map(String::from);
    let port_before = dir.store().get("5").map(String::from);

    let err = dir.delete_credential_set(0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidAuthentication);
    assert!(err.to_string().contains("default record is required for port 5"));

    assert_eq!(dir.store().get("0").map(String::from), default_before);
    assert_eq!(dir.store().get("5").map(String::from), port_before);
    assert_eq!(dir.default_entry().binding, "127.0.0.1");
    assert_eq!(dir.get_entry(5).unwrap().binding, "127.0.0.1");
}

#[test]
fn test_delete_default_allowed_when_unused() {
    let mut dir = memory_directory();
    dir.add_credential_set(0, "127.0.0.1", "", "").unwrap();
    dir.add_credential_set(5, "10.0.0.5", "monuser", "monpw").unwrap();

    dir.delete_credential_set(0).unwrap();

    assert!(!dir.store().contains_key("0"));
    assert!(dir.default_entry().is_empty());
    assert_eq!(dir.get_entry(5).unwrap().binding, "10.0.0.5");

    // With the default gone, nothing can be inherited any more.
    let err = dir.add_credential_set(6, "", "monuser", "monpw").unwrap_err();
    assert!(err.to_string().contains("no binding host specified"));
}

#[test]
fn test_delete_port_record() {
    let mut dir = memory_directory();
    dir.add_credential_set(3306, "h", "u", "p").unwrap();

    dir.delete_credential_set(3306).unwrap();
    assert!(matches!(
        dir.get_entry(3306),
        Err(AuthError::PortNotFound { port: 3306 })
    ));

    let err = dir.delete_credential_set(3306).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[test]
fn test_port_list_only_numeric_non_default_keys() {
    let dir = CredentialDirectory::new(MemoryStore::with_data([
        ("0", "127.0.0.1, , "),
        ("8080", "h, u, cHc="),
        ("AutoUpdate", "true"),
        ("foo", "bar"),
    ]));

    assert_eq!(dir.port_list(), vec![8080]);
}

#[test]
fn test_entries_resolves_every_port() {
    let mut dir = memory_directory();
    dir.add_credential_set(0, "127.0.0.1", "root", "rootpw").unwrap();
    dir.add_credential_set(3307, "", "", "").unwrap();
    dir.add_credential_set(3306, "db", "monuser", "monpw").unwrap();

    let entries = dir.entries().unwrap();
    let ports: Vec<u32> = entries.iter().map(|e| e.port).collect();
    assert_eq!(ports, vec![3306, 3307]);
    assert_eq!(entries[1].username, "root");
}

#[test]
fn test_automatic_updates_flag() {
    let mut dir = memory_directory();
    assert!(dir.automatic_updates());

    dir.allow_automatic_updates(false);
    assert!(!dir.automatic_updates());
    assert!(dir.port_list().is_empty());
}

#[test]
fn test_persistence_across_reload() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("auth.json");

    {
        let mut dir = CredentialDirectory::new(FileStore::new(&path));
        dir.load().unwrap();
        dir.add_credential_set(0, "127.0.0.1", "root", "rootpw").unwrap();
        dir.add_credential_set(3306, "", "monuser", "monpw").unwrap();
        dir.allow_automatic_updates(false);
        dir.save().unwrap();
    }

    {
        let mut dir = CredentialDirectory::new(FileStore::new(&path));
        dir.load().unwrap();

        assert_eq!(dir.default_entry().username, "root");
        assert!(!dir.automatic_updates());

        let entry = dir.get_entry(3306).unwrap();
        assert_eq!(entry.binding, "127.0.0.1");
        assert_eq!(entry.username, "monuser");
        assert_eq!(entry.password.expose(), "monpw");
    }
}

#[test]
fn test_password_not_stored_in_plaintext() {
    let (mut dir, _temp) = file_directory();
    dir.add_credential_set(3306, "h", "u", "plaintext-pw").unwrap();
    dir.save().unwrap();

    let contents = std::fs::read_to_string(dir.store().path()).unwrap();
    assert!(contents.contains("\"3306\""));
    assert!(!contents.contains("plaintext-pw"));
}

#[test]
fn test_unsaved_changes_not_persisted() {
    let (mut dir, _temp) = file_directory();
    dir.add_credential_set(3306, "h", "u", "p").unwrap();
    dir.save().unwrap();
    dir.add_credential_set(3307, "h", "u", "p").unwrap();

    dir.load().unwrap();
    assert_eq!(dir.port_list(), vec![3306]);
}

#[test]
fn test_load_propagates_malformed_file() {
    let (dir, _temp) = file_directory();
    let path = dir.store().path().to_path_buf();
    std::fs::write(&path, "{ not json").unwrap();

    let mut dir = CredentialDirectory::new(FileStore::new(&path));
    let err = dir.load().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Store);
}
