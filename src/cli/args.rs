//! CLI argument definitions using clap
//!
//! Commands:
//! - sizemap init --config <path>
//! - sizemap put-mapping --config <path> --type <type> [--file <path>] [--field <name> <props>]...
//! - sizemap get-mapping --config <path> --type <type>
//! - sizemap index --config <path> --type <type> [--id <id>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// sizemap - Type mappings with an optional _size metadata field
#[derive(Parser, Debug)]
#[command(name = "sizemap")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Initialize a new data directory
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./sizemap.json")]
        config: PathBuf,
    },

    /// Merge a partial mapping into a type's mapping
    ///
    /// The mapping source is read from --file, built from --field pairs, or
    /// read as JSON from stdin.
    PutMapping {
        /// Path to configuration file
        #[arg(long, default_value = "./sizemap.json")]
        config: PathBuf,

        /// Document type
        #[arg(long = "type")]
        type_name: String,

        /// File holding the mapping source
        #[arg(long, conflicts_with = "fields")]
        file: Option<PathBuf>,

        /// Shorthand field definition, e.g. `--field _size enabled=true`
        #[arg(long = "field", num_args = 2, value_names = ["NAME", "PROPS"])]
        fields: Vec<String>,
    },

    /// Print a type's mapping
    GetMapping {
        /// Path to configuration file
        #[arg(long, default_value = "./sizemap.json")]
        config: PathBuf,

        /// Document type
        #[arg(long = "type")]
        type_name: String,
    },

    /// Run a document source from stdin through the write path and print
    /// the result, including `_size` when the type enables it
    Index {
        /// Path to configuration file
        #[arg(long, default_value = "./sizemap.json")]
        config: PathBuf,

        /// Document type
        #[arg(long = "type")]
        type_name: String,

        /// Document id (generated when omitted)
        #[arg(long)]
        id: Option<String>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_put_mapping_fields() {
        let cli = Cli::try_parse_from([
            "sizemap",
            "put-mapping",
            "--type",
            "mytype",
            "--field",
            "_size",
            "enabled=true",
            "--field",
            "otherField",
            "type=string",
        ])
        .unwrap();

        match cli.command {
            Command::PutMapping {
                type_name,
                fields,
                file,
                ..
            } => {
                assert_eq!(type_name, "mytype");
                assert_eq!(fields, vec!["_size", "enabled=true", "otherField", "type=string"]);
                assert!(file.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_file_conflicts_with_fields() {
        let result = Cli::try_parse_from([
            "sizemap",
            "put-mapping",
            "--type",
            "t",
            "--file",
            "m.json",
            "--field",
            "_size",
            "enabled=true",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_default_config_path() {
        let cli = Cli::try_parse_from(["sizemap", "get-mapping", "--type", "t"]).unwrap();
        match cli.command {
            Command::GetMapping { config, .. } => assert_eq!(config, PathBuf::from("./sizemap.json")),
            other => panic!("unexpected command {:?}", other),
        }
    }
}
