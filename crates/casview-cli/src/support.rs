use crate::config::CasviewConfig;
use casview_kernel::ProtocolVersion;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

pub fn parse_protocol_or_exit(protocol: &str) -> ProtocolVersion {
    protocol.parse().unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    })
}

pub fn load_config_or_exit(explicit: Option<&str>) -> (CasviewConfig, Option<PathBuf>) {
    CasviewConfig::resolve(explicit).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    })
}

pub fn read_json_file_or_exit<T>(path: &str, label: &str) -> T
where
    T: serde::de::DeserializeOwned,
{
    let bytes = fs::read(path).unwrap_or_else(|e| {
        eprintln!("error: failed to read {label} at {}: {e}", path);
        std::process::exit(1);
    });
    serde_json::from_slice::<T>(&bytes).unwrap_or_else(|e| {
        eprintln!("error: failed to parse {label} JSON at {}: {e}", path);
        std::process::exit(1);
    })
}

pub fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string_pretty(value).expect("json serialization")
    );
}

pub fn config_source_label(source: &Option<PathBuf>) -> String {
    source
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(defaults)".to_string())
}
