use std::fs::{self, File};
use std::io::Write;

use remotepad::config::PadConfig;
use schemars::schema_for;

const SCHEMA_DIR: &str = "./rootfs/usr/share/remotepad/schema";

fn main() {
    let config_schema = schema_for!(PadConfig);
    fs::create_dir_all(SCHEMA_DIR).expect("Failed to create schema directory");
    let mut file =
        File::create(format!("{SCHEMA_DIR}/config.json")).expect("Failed to create schema file");
    write!(
        file,
        "{}",
        serde_json::to_string_pretty(&config_schema).expect("Failed to serialize schema")
    )
    .expect("Failed to write schema");
}
