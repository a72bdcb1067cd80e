//! CLI command implementations
//!
//! Each command loads the configuration, opens the index over the data
//! directory, and returns the response payload. `run_command` writes it.

use std::fs;
use std::path::Path;

use serde_json::{json, Value};

use super::args::Command;
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::{read_json, read_stdin_bytes, write_error, write_response};
use crate::index::Index;
use crate::mapping::simple_mapping;
use crate::observability::{log_event_with_fields, Event, Logger};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command and write its response
pub fn run_command(cmd: Command) -> CliResult<()> {
    let result = match cmd {
        Command::Init { config } => init(&config),
        Command::PutMapping {
            config,
            type_name,
            file,
            fields,
        } => mapping_source(file.as_deref(), &fields)
            .and_then(|source| put_mapping(&config, &type_name, &source)),
        Command::GetMapping { config, type_name } => get_mapping(&config, &type_name),
        Command::Index {
            config,
            type_name,
            id,
        } => read_stdin_bytes().and_then(|source| index(&config, &type_name, id.as_deref(), source)),
    };

    match result {
        Ok(data) => write_response(data),
        Err(e) => {
            write_error(e.code_str(), e.message())?;
            Err(e)
        }
    }
}

/// Initialize a new data directory
///
/// Creates `<data_dir>/metadata/mappings`. Refuses an already initialized
/// directory.
pub fn init(config_path: &Path) -> CliResult<Value> {
    let config = load_config(config_path)?;
    let data_dir = config.data_path();

    if is_initialized(data_dir) {
        return Err(CliError::already_initialized());
    }

    let dir = mappings_dir(data_dir);
    fs::create_dir_all(&dir).map_err(|e| {
        CliError::config_error(format!("Failed to create directory {:?}: {}", dir, e))
    })?;

    Ok(json!({"initialized": true}))
}

/// Merge a partial mapping into a type and return the resulting mapping
pub fn put_mapping(config_path: &Path, type_name: &str, source: &Value) -> CliResult<Value> {
    let mut index = open_index(config_path)?;
    index.put_mapping(type_name, source)?;
    Ok(index.get_mapping(type_name)?)
}

/// Return a type's mapping source
pub fn get_mapping(config_path: &Path, type_name: &str) -> CliResult<Value> {
    let index = open_index(config_path)?;
    Ok(index.get_mapping(type_name)?)
}

/// Run one document through the write path.
///
/// Documents are not kept between invocations; the response reports what
/// the write path recorded.
pub fn index(
    config_path: &Path,
    type_name: &str,
    id: Option<&str>,
    source: Vec<u8>,
) -> CliResult<Value> {
    let mut index = open_index(config_path)?;
    let response = index.index_document(type_name, id, source)?;
    Ok(serde_json::to_value(response)?)
}

/// Picks the mapping source: --file, --field pairs, or stdin
fn mapping_source(file: Option<&Path>, fields: &[String]) -> CliResult<Value> {
    if let Some(path) = file {
        let content = fs::read(path)
            .map_err(|e| CliError::io_error(format!("Failed to read {:?}: {}", path, e)))?;
        return Ok(serde_json::from_slice(&content)?);
    }
    if !fields.is_empty() {
        return Ok(simple_mapping(fields)?);
    }
    read_json()
}

fn load_config(config_path: &Path) -> CliResult<Config> {
    let config = Config::load(config_path)?;
    Logger::set_min_severity(config.severity()?);
    log_event_with_fields(
        Event::ConfigLoaded,
        &[("data_dir", config.data_dir.as_str()), ("index", config.index_name.as_str())],
    );
    Ok(config)
}

fn open_index(config_path: &Path) -> CliResult<Index> {
    let config = load_config(config_path)?;
    let data_dir = config.data_path();

    if !is_initialized(data_dir) {
        return Err(CliError::not_initialized());
    }

    Ok(Index::open(config.index_name.clone(), data_dir)?)
}

fn mappings_dir(data_dir: &Path) -> std::path::PathBuf {
    data_dir.join("metadata").join("mappings")
}

fn is_initialized(data_dir: &Path) -> bool {
    mappings_dir(data_dir).exists()
}

#[cfg(test)]
mod tests {
    use super::super::errors::CliErrorCode;
    use super::*;
    use tempfile::TempDir;

    fn create_config(temp_dir: &TempDir) -> std::path::PathBuf {
        let config_path = temp_dir.path().join("sizemap.json");
        let data_dir = temp_dir.path().join("data");

        let config = json!({
            "data_dir": data_dir.to_string_lossy(),
            "log_severity": "error"
        });

        fs::write(&config_path, config.to_string()).unwrap();
        config_path
    }

    fn initialized() -> (TempDir, std::path::PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_config(&temp_dir);
        init(&config_path).unwrap();
        (temp_dir, config_path)
    }

    #[test]
    fn test_init_creates_directories() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_config(&temp_dir);

        assert_eq!(init(&config_path).unwrap(), json!({"initialized": true}));
        assert!(temp_dir.path().join("data").join("metadata").join("mappings").exists());
    }

    #[test]
    fn test_init_refuses_reinit() {
        let (_tmp, config_path) = initialized();
        let result = init(&config_path);
        assert_eq!(result.unwrap_err().code(), &CliErrorCode::AlreadyInitialized);
    }

    #[test]
    fn test_commands_require_init() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_config(&temp_dir);

        let result = get_mapping(&config_path, "mytype");
        assert_eq!(result.unwrap_err().code(), &CliErrorCode::NotInitialized);
    }

    #[test]
    fn test_mapping_persists_across_invocations() {
        let (_tmp, config_path) = initialized();

        put_mapping(&config_path, "mytype", &json!({"_size": {"enabled": true}})).unwrap();
        put_mapping(
            &config_path,
            "mytype",
            &json!({"properties": {"otherField": {"type": "string"}}}),
        )
        .unwrap();

        let mapping = get_mapping(&config_path, "mytype").unwrap();
        assert_eq!(mapping["mytype"]["_size"], json!({"enabled": true}));
        assert_eq!(mapping["mytype"]["properties"]["otherField"]["type"], "string");
    }

    #[test]
    fn test_malformed_mapping_code() {
        let (_tmp, config_path) = initialized();
        let err = put_mapping(&config_path, "mytype", &json!({"_size": {"enabled": "on"}})).unwrap_err();
        assert_eq!(err.code_str(), "MAPPING_MALFORMED");
    }

    #[test]
    fn test_shorthand_source() {
        let fields = vec!["_size".to_string(), "enabled=true".to_string()];
        let source = mapping_source(None, &fields).unwrap();
        assert_eq!(source, json!({"_size": {"enabled": true}}));
    }

    #[test]
    fn test_file_source() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("mapping.json");
        fs::write(&path, r#"{"_size": {"enabled": false}}"#).unwrap();

        let source = mapping_source(Some(&path), &[]).unwrap();
        assert_eq!(source, json!({"_size": {"enabled": false}}));
    }

    #[test]
    fn test_index_reports_size() {
        let (_tmp, config_path) = initialized();
        put_mapping(&config_path, "type", &json!({"_size": {"enabled": true}})).unwrap();

        let response = index(&config_path, "type", Some("1"), br#"{"f":10}"#.to_vec()).unwrap();
        assert_eq!(response["_size"], 9);
        assert_eq!(response["_id"], "1");
    }

    #[test]
    fn test_index_without_size() {
        let (_tmp, config_path) = initialized();
        let response = index(&config_path, "plain", Some("1"), br#"{"f":10}"#.to_vec()).unwrap();
        assert!(response.get("_size").is_none());
    }
}
