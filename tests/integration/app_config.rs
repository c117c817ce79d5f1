//! Behaviour of a full application schema: nested sections, arrays,
//! dictionaries, validators and environment overrides

use cyra::{Builder, Config, CyraError, Key};

struct AppKeys {
    port: Key<i64>,
    mode: Key<String>,
    alpha_users: Key<Vec<String>>,
    beta_priority: Key<i64>,
    dict: Key<toml::Table>,
}

fn app_config() -> (Config, AppKeys) {
    let mut builder = Builder::new();
    builder
        .comment("Cyra says hello")
        .define("msg", "Hello World".to_string())
        .unwrap();

    builder.comment("SQL Database settings").push("DATABASE").unwrap();
    let port = builder
        .comment("SQL port (default: 1443)")
        .define("port", 1443_i64)
        .unwrap();
    let mode = builder
        .define_validated("mode", "fallback".to_string(), |m: &String| m != "forbidden")
        .unwrap();
    builder.pop_one().unwrap();

    builder.comment("Servers to be monitored").push("SERVERS").unwrap();
    builder.push("alpha").unwrap();
    let alpha_users = builder
        .comment("Users to be handled")
        .define("users", vec!["ThetaDev".to_string(), "Cyra".to_string()])
        .unwrap();
    builder.pop_one().unwrap();
    builder.push("beta").unwrap();
    let beta_priority = builder
        .comment("Server priority")
        .define("priority", 2_i64)
        .unwrap();
    builder.pop(2).unwrap();

    let dict: toml::Table = r#"
key1 = "V1"
key3 = 3

[keyA]
keyA1 = "VA1"
keyA2 = true

[keyB]
keyB1 = "VB1"
keyB2 = ["VB2a", "VB2b"]
"#
    .parse()
    .unwrap();
    let dict = builder
        .comment("Arbitrary dictionary")
        .define("DICT", dict)
        .unwrap();

    (
        builder.build(),
        AppKeys {
            port,
            mode,
            alpha_users,
            beta_priority,
            dict,
        },
    )
}

#[test]
fn test_scenario_partial_document() {
    let (mut config, keys) = app_config();
    config.load_document("msg = \"I am Cyra\"\n").unwrap();

    let exported = config.export_document().unwrap();
    assert!(exported.starts_with("msg = \"I am Cyra\"\n"));
    assert!(exported.contains("[DATABASE] # SQL Database settings\nport = 1443 # SQL port (default: 1443)\n"));
    assert_eq!(config.get(&keys.port).unwrap(), 1443);
}

#[test]
fn test_validator_reverts_to_default() {
    let (mut config, keys) = app_config();
    config.set(&keys.mode, "strict".to_string()).unwrap();
    assert_eq!(config.get(&keys.mode).unwrap(), "strict");

    config.set(&keys.mode, "forbidden".to_string()).unwrap();
    assert_eq!(config.get(&keys.mode).unwrap(), "fallback");

    config
        .load_document("[DATABASE]\nmode = \"forbidden\"\n")
        .unwrap();
    assert_eq!(config.get(&keys.mode).unwrap(), "fallback");
}

#[test]
fn test_nested_sections_and_tables_export() {
    let (mut config, _) = app_config();
    let exported = config.export_document().unwrap();

    assert!(exported.contains("[SERVERS] # Servers to be monitored\n"));
    assert!(exported.contains("[SERVERS.alpha]\nusers = [\"ThetaDev\", \"Cyra\"] # Users to be handled\n"));
    assert!(exported.contains("[SERVERS.beta]\npriority = 2 # Server priority\n"));
    assert!(exported.contains("[DICT] # Arbitrary dictionary\nkey1 = \"V1\"\nkey3 = 3\n"));
    assert!(exported.contains("[DICT.keyB]\nkeyB1 = \"VB1\"\nkeyB2 = [\"VB2a\", \"VB2b\"]\n"));

    let positions: Vec<usize> = ["[DATABASE]", "[SERVERS]", "[SERVERS.alpha]", "[SERVERS.beta]", "[DICT]"]
        .iter()
        .map(|header| exported.find(header).unwrap())
        .collect();
    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));

    let (mut reloaded, keys) = app_config();
    reloaded.load_document(&exported).unwrap();
    assert!(!reloaded.has_missing_entries());
    assert_eq!(reloaded.get(&keys.dict).unwrap()["keyA"]["keyA2"].as_bool(), Some(true));
}

#[test]
fn test_arrays_and_tables_keep_their_kind() {
    let (mut config, keys) = app_config();
    config
        .load_document("[SERVERS.alpha]\nusers = [\"Clary\"]\n")
        .unwrap();
    assert_eq!(config.get(&keys.alpha_users).unwrap(), vec!["Clary".to_string()]);

    let err = config
        .load_document("[SERVERS.alpha]\nusers = \"Clary\"\n")
        .unwrap_err();
    assert!(matches!(err, CyraError::Coercion { expected: "array", .. }));

    let err = config
        .load_document("DICT = 5\n")
        .unwrap_err();
    assert!(matches!(err, CyraError::Coercion { expected: "table", .. }));
}

#[test]
fn test_dictionary_replaced_from_inline_table() {
    let (mut config, keys) = app_config();
    config.load_document("DICT = { only = \"one\" }\n").unwrap();

    let dict = config.get(&keys.dict).unwrap();
    assert_eq!(dict.len(), 1);
    assert_eq!(dict["only"].as_str(), Some("one"));

    let exported = config.export_document().unwrap();
    assert!(exported.starts_with("DICT = { only = \"one\" }\n"));
}

#[test]
fn test_environment_overrides() {
    let (mut config, keys) = app_config();
    std::env::set_var("CYRATEST_SERVERS__BETA__PRIORITY", "7");
    std::env::set_var("CYRATEST_DATABASE__PORT", "9000");

    let applied = config.load_env("cyratest").unwrap();
    std::env::remove_var("CYRATEST_SERVERS__BETA__PRIORITY");
    std::env::remove_var("CYRATEST_DATABASE__PORT");

    assert_eq!(applied, 2);
    assert_eq!(config.get(&keys.beta_priority).unwrap(), 7);
    assert_eq!(config.get(&keys.port).unwrap(), 9000);
    assert!(config.is_modified());
}

#[test]
fn test_configs_from_one_builder_are_independent() {
    let mut builder = Builder::new();
    let port = builder.define("port", 1443_i64).unwrap();

    let mut first = builder.build();
    let mut second = builder.build();
    first.set(&port, 1).unwrap();
    second.load_document("port = 2\n").unwrap();

    assert_eq!(first.get(&port).unwrap(), 1);
    assert_eq!(second.get(&port).unwrap(), 2);
    assert_eq!(builder.build().get(&port).unwrap(), 1443);
}

#[test]
fn test_duplicate_paths_are_rejected() {
    let mut builder = Builder::new();
    builder.push("DATABASE").unwrap();
    builder.define("port", 1_i64).unwrap();
    builder.pop_one().unwrap();

    builder.push("DATABASE").unwrap();
    assert!(matches!(
        builder.define("port", 2_i64),
        Err(CyraError::InvalidArgument(_))
    ));
    assert!(matches!(builder.push("port"), Err(CyraError::InvalidArgument(_))));
}
