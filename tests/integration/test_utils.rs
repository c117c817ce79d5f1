//! Shared test schema and file helpers

use cyra::{Builder, Config, Key};
use std::path::PathBuf;
use tempfile::TempDir;

/// Handles to the values of [`sample_config`]
pub struct SampleKeys {
    pub msg: Key<String>,
    pub server: Key<String>,
    pub port: Key<i64>,
    pub username: Key<String>,
    pub password: Key<String>,
    pub enable: Key<bool>,
    pub msg2: Key<String>,
}

pub fn declare_sample(builder: &mut Builder) -> SampleKeys {
    builder.docstring("DSTRING: Begin");
    let msg = builder
        .comment("Cyra says hello")
        .define("msg", "Hello World".to_string())
        .unwrap();

    builder
        .docstring("DSTRING: Database settings")
        .comment("SQL Database settings")
        .push("DATABASE")
        .unwrap();
    let server = builder
        .comment("DB server address")
        .define("server", "192.168.1.1".to_string())
        .unwrap();
    let port = builder
        .comment("SQL port (default: 1443)")
        .define("port", 1443_i64)
        .unwrap();
    let username = builder
        .comment("Credentials")
        .define("username", "admin".to_string())
        .unwrap();
    let password = builder
        .define("password", "my_secret_password".to_string())
        .unwrap();
    let enable = builder
        .comment("DB connection enabled")
        .define("enable", true)
        .unwrap();
    builder.pop_one().unwrap();

    let msg2 = builder
        .docstring("DSTRING: Goodbye")
        .comment("Cyra says goodbye")
        .define("msg2", "Bye bye, World".to_string())
        .unwrap();

    SampleKeys {
        msg,
        server,
        port,
        username,
        password,
        enable,
        msg2,
    }
}

/// Fresh config over the sample schema
pub fn sample_config() -> (Config, SampleKeys) {
    let mut builder = Builder::new();
    let keys = declare_sample(&mut builder);
    (builder.build(), keys)
}

/// Export of the sample schema with all defaults
pub const SAMPLE_DEFAULTS: &str = r#"msg = "Hello World" # Cyra says hello
msg2 = "Bye bye, World" # Cyra says goodbye

[DATABASE] # SQL Database settings
server = "192.168.1.1" # DB server address
port = 1443 # SQL port (default: 1443)
username = "admin" # Credentials
password = "my_secret_password"
enable = true # DB connection enabled
"#;

/// Temporary directory with a config file path inside it
pub fn temp_config_path() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("testcfg.toml");
    (dir, path)
}
