//! Loading documents and mappings, exporting back to TOML

use super::test_utils::{sample_config, SAMPLE_DEFAULTS};
use cyra::{CyraError, FlatKey, KeyPath};
use std::collections::HashMap;

#[test]
fn test_export_defaults() {
    let (mut config, _) = sample_config();
    assert_eq!(config.export_document().unwrap(), SAMPLE_DEFAULTS);
}

#[test]
fn test_export_is_idempotent() {
    let (mut config, keys) = sample_config();
    config.load_document("msg = \"x\" # mine\n").unwrap();
    config.set(&keys.port, 1500).unwrap();

    let first = config.export_document().unwrap();
    let second = config.export_document().unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_load_export_keeps_user_content() {
    let text = r#"
msg = "Okay? Okay." # Are we ok?

[DATABASE] # SQL Database settings
password = "very_secret_password"
"#;
    let expected = r#"
msg = "Okay? Okay." # Are we ok?
msg2 = "Bye bye, World" # Cyra says goodbye

[DATABASE] # SQL Database settings
password = "very_secret_password"
server = "192.168.1.1" # DB server address
port = 1443 # SQL port (default: 1443)
username = "admin" # Credentials
enable = true # DB connection enabled
"#;
    let (mut config, keys) = sample_config();
    config.load_document(text).unwrap();

    assert_eq!(config.get(&keys.msg).unwrap(), "Okay? Okay.");
    assert_eq!(config.get(&keys.password).unwrap(), "very_secret_password");
    assert!(config.has_missing_entries());

    config.load_document(text).unwrap();
    assert_eq!(config.export_document().unwrap(), expected);
}

#[test]
fn test_export_after_assignments() {
    let expected = r#"
msg = "Okay? Okay." # Hello, I am here
msg2 = "Bye bye, World" # Cyra says goodbye

[DATABASE] # SQL Database settings
server = "192.168.1.1" # DB server address
port = 1443 # SQL port (default: 1443)
username = "admin" # Credentials
password = "very_secret_password"
enable = false # DB connection enabled
"#;
    let (mut config, keys) = sample_config();
    config
        .load_document("\nmsg = \"I am Cyra\" # Hello, I am here\n")
        .unwrap();

    config.set(&keys.msg, "Okay? Okay.".to_string()).unwrap();
    config
        .set(&keys.password, "very_secret_password".to_string())
        .unwrap();
    config.set(&keys.enable, false).unwrap();
    assert!(config.is_modified());

    assert_eq!(config.export_document().unwrap(), expected);
}

#[test]
fn test_unknown_keys_survive_export() {
    let text = "# my settings\nextra = [1, 2] # not in the schema\n\n[OTHER]\nkey = \"value\"\n";
    let (mut config, _) = sample_config();
    config.load_document(text).unwrap();

    let exported = config.export_document().unwrap();
    assert!(exported.starts_with("# my settings\nextra = [1, 2] # not in the schema\n"));
    assert!(exported.contains("[OTHER]\nkey = \"value\"\n"));
    assert!(exported.contains("[DATABASE] # SQL Database settings\n"));
}

#[test]
fn test_string_in_document_coerces_to_integer() {
    let (mut config, keys) = sample_config();
    config
        .load_document("[DATABASE]\nport = \"1234\"\n")
        .unwrap();
    assert_eq!(config.get(&keys.port).unwrap(), 1234);

    let err = config
        .load_document("[DATABASE]\nport = \"twelve\"\n")
        .unwrap_err();
    assert!(matches!(err, CyraError::Coercion { .. }));
}

#[test]
fn test_load_mapping() {
    let (mut config, keys) = sample_config();
    let source: toml::Table = r#"
msg = "Okay? Okay."

[DATABASE]
password = "very_secret_password"
"#
    .parse()
    .unwrap();

    config.load_mapping(&source).unwrap();
    assert_eq!(config.get(&keys.msg).unwrap(), "Okay? Okay.");
    assert_eq!(config.get(&keys.password).unwrap(), "very_secret_password");
    assert_eq!(config.get(&keys.username).unwrap(), "admin");
}

#[test]
fn test_load_flat_mapping() {
    let (mut config, keys) = sample_config();
    let mut source = HashMap::new();
    source.insert(
        FlatKey::from("msg".parse::<KeyPath>().unwrap()),
        toml::Value::from("Okay? Okay."),
    );
    source.insert(
        FlatKey::from("DATABASE.password"),
        toml::Value::from("very_secret_password"),
    );

    config.load_flat_mapping(&source).unwrap();
    assert_eq!(config.get(&keys.msg).unwrap(), "Okay? Okay.");
    assert_eq!(config.get(&keys.password).unwrap(), "very_secret_password");
    assert!(!config.has_missing_entries());
}

#[test]
fn test_to_mapping_reflects_current_values() {
    let (mut config, keys) = sample_config();
    config.set(&keys.server, "10.1.1.1".to_string()).unwrap();

    let mapping = config.to_mapping().unwrap();
    let db = mapping["DATABASE"].as_table().unwrap();
    assert_eq!(db["server"].as_str(), Some("10.1.1.1"));
    assert_eq!(mapping["msg2"].as_str(), Some("Bye bye, World"));
}
