use std::path::PathBuf;

use clap::{ArgGroup, Parser};

use crate::nav_stack::split_path;
use crate::provider::SchemaSource;

#[derive(Debug, Parser)]
#[command(name = "graphql-docs-tui")]
#[command(about = "Browse a GraphQL schema from its introspection result", long_about = None)]
#[command(group(ArgGroup::new("source").required(true).args(["schema_file", "schema_command"])))]
pub struct Cli {
    /// Introspection JSON file, `{"data":{"__schema":…}}` or `{"__schema":…}`.
    #[arg(long, value_name = "PATH")]
    pub schema_file: Option<PathBuf>,

    /// Shell command whose stdout is introspection JSON; rerun on every refetch.
    #[arg(long, value_name = "SHELL")]
    pub schema_command: Option<String>,

    #[arg(long, value_name = "PATH", default_value = "theme.toml")]
    pub theme: PathBuf,

    /// Dotted path to open once the schema loads, e.g. `Query.user.id`.
    #[arg(long, value_name = "PATH")]
    pub open: Option<String>,

    /// Write logs here; the TUI owns the terminal so nothing is logged without it.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    #[arg(short, long)]
    pub verbose: bool,

    /// Load and validate the schema, print a JSON summary and exit.
    #[arg(long)]
    pub check: bool,
}

impl Cli {
    /// `None` only when constructed without clap's required `source` group.
    pub fn source(&self) -> Option<SchemaSource> {
        match (&self.schema_file, &self.schema_command) {
            (Some(path), _) => Some(SchemaSource::File(path.clone())),
            (None, Some(command)) => Some(SchemaSource::Command(command.clone())),
            (None, None) => None,
        }
    }

    pub fn open_segments(&self) -> Vec<&str> {
        self.open.as_deref().map(split_path).unwrap_or_default()
    }
}
