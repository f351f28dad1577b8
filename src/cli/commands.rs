//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - list/show/find: browse the catalog
//! - lint/normalize: check and repair catalog files
//! - prepare: resolve a tool call into a URL

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use toolcat::tools::ToolKind;

/// Toolcat - catalog of tool descriptors for agent orchestration
#[derive(Parser, Debug)]
#[command(name = "toolcat")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Extra catalog file, directory or glob (repeatable, before the subcommand)
    #[arg(long = "catalog")]
    pub catalogs: Vec<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List tools in the catalog
    List {
        /// Show only tools of this type (Monarch, KEGG, TCGA)
        #[arg(short = 't', long = "type")]
        tool_type: Option<String>,

        /// Show only tools carrying this label
        #[arg(short, long)]
        label: Option<String>,

        /// Show only tools of this kind (api, meta)
        #[arg(short, long, value_parser = parse_kind)]
        kind: Option<ToolKind>,
    },

    /// Show one tool descriptor
    Show {
        /// Tool name
        name: String,

        /// Print the raw JSON record
        #[arg(short, long)]
        json: bool,
    },

    /// Search tool names, descriptions and labels
    Find {
        /// Case-insensitive keyword
        keyword: String,
    },

    /// Check catalog files for structural problems
    Lint {
        /// Files to lint (defaults to the loaded catalog)
        files: Vec<PathBuf>,

        /// Treat warnings as failures
        #[arg(short, long)]
        strict: bool,
    },

    /// Rewrite a catalog file with schema fixes applied
    Normalize {
        /// Catalog file to normalize
        file: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Resolve a tool call into a request URL without sending it
    Prepare {
        /// Tool name
        name: String,

        /// Call arguments as a JSON object
        #[arg(short, long, default_value = "{}")]
        args: String,
    },
}

fn parse_kind(s: &str) -> Result<ToolKind, String> {
    ToolKind::from_str(s).ok_or_else(|| format!("unknown tool kind '{}', expected api or meta", s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parse_no_args() {
        let cli = Cli::try_parse_from(["toolcat"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
        assert!(cli.config.is_none());
        assert!(cli.catalogs.is_empty());
    }

    #[test]
    fn test_cli_verbose_flag() {
        let cli = Cli::try_parse_from(["toolcat", "-v"]).unwrap();
        assert!(cli.is_verbose());
    }

    #[test]
    fn test_cli_config_option() {
        let cli = Cli::try_parse_from(["toolcat", "-c", "/path/to/toolcat.yml"]).unwrap();
        assert_eq!(cli.config.as_ref(), Some(&PathBuf::from("/path/to/toolcat.yml")));
    }

    #[test]
    fn test_cli_repeated_catalogs() {
        let cli = Cli::try_parse_from(["toolcat", "--catalog", "a.json", "--catalog", "dir", "list"]).unwrap();
        assert_eq!(cli.catalogs, vec![PathBuf::from("a.json"), PathBuf::from("dir")]);
        assert!(matches!(cli.command, Some(Commands::List { .. })));
    }

    #[test]
    fn test_cli_catalog_after_subcommand_rejected() {
        let result = Cli::try_parse_from(["toolcat", "--catalog", "a.json", "list", "--catalog", "dir"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_list_command() {
        let cli = Cli::try_parse_from(["toolcat", "list"]).unwrap();
        match cli.command {
            Some(Commands::List { tool_type, label, kind }) => {
                assert!(tool_type.is_none());
                assert!(label.is_none());
                assert!(kind.is_none());
            }
            _ => panic!("Expected list command"),
        }
    }

    #[test]
    fn test_list_with_filters() {
        let cli = Cli::try_parse_from(["toolcat", "list", "-t", "KEGG", "-l", "pathway", "--kind", "api"]).unwrap();
        match cli.command {
            Some(Commands::List { tool_type, label, kind }) => {
                assert_eq!(tool_type, Some("KEGG".to_string()));
                assert_eq!(label, Some("pathway".to_string()));
                assert_eq!(kind, Some(ToolKind::Api));
            }
            _ => panic!("Expected list command"),
        }
    }

    #[test]
    fn test_list_kind_parsing() {
        let cli = Cli::try_parse_from(["toolcat", "list", "-k", "META"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::List { kind: Some(ToolKind::Meta), .. })));

        assert!(Cli::try_parse_from(["toolcat", "list", "--kind", "remote"]).is_err());
    }

    #[test]
    fn test_show_command() {
        let cli = Cli::try_parse_from(["toolcat", "show", "Finish", "--json"]).unwrap();
        match cli.command {
            Some(Commands::Show { name, json }) => {
                assert_eq!(name, "Finish");
                assert!(json);
            }
            _ => panic!("Expected show command"),
        }
    }

    #[test]
    fn test_find_command() {
        let cli = Cli::try_parse_from(["toolcat", "find", "phenotype"]).unwrap();
        match cli.command {
            Some(Commands::Find { keyword }) => assert_eq!(keyword, "phenotype"),
            _ => panic!("Expected find command"),
        }
    }

    #[test]
    fn test_lint_command() {
        let cli = Cli::try_parse_from(["toolcat", "lint", "a.json", "b.json", "--strict"]).unwrap();
        match cli.command {
            Some(Commands::Lint { files, strict }) => {
                assert_eq!(files.len(), 2);
                assert!(strict);
            }
            _ => panic!("Expected lint command"),
        }
    }

    #[test]
    fn test_lint_no_files() {
        let cli = Cli::try_parse_from(["toolcat", "lint"]).unwrap();
        match cli.command {
            Some(Commands::Lint { files, strict }) => {
                assert!(files.is_empty());
                assert!(!strict);
            }
            _ => panic!("Expected lint command"),
        }
    }

    #[test]
    fn test_normalize_command() {
        let cli = Cli::try_parse_from(["toolcat", "normalize", "tools.json", "-o", "fixed.json"]).unwrap();
        match cli.command {
            Some(Commands::Normalize { file, output }) => {
                assert_eq!(file, PathBuf::from("tools.json"));
                assert_eq!(output, Some(PathBuf::from("fixed.json")));
            }
            _ => panic!("Expected normalize command"),
        }
    }

    #[test]
    fn test_prepare_command() {
        let cli = Cli::try_parse_from([
            "toolcat",
            "prepare",
            "get_phenotype_by_HPO_ID",
            "--args",
            r#"{"id": "HP:0001250"}"#,
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Prepare { name, args }) => {
                assert_eq!(name, "get_phenotype_by_HPO_ID");
                assert_eq!(args, r#"{"id": "HP:0001250"}"#);
            }
            _ => panic!("Expected prepare command"),
        }
    }

    #[test]
    fn test_prepare_default_args() {
        let cli = Cli::try_parse_from(["toolcat", "prepare", "kegg_list"]).unwrap();
        match cli.command {
            Some(Commands::Prepare { args, .. }) => assert_eq!(args, "{}"),
            _ => panic!("Expected prepare command"),
        }
    }

    #[test]
    fn test_help_works() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_version_flag() {
        let result = Cli::try_parse_from(["toolcat", "--version"]);
        // Version flag causes early exit with error (expected)
        assert!(result.is_err());
    }
}
