//! Command-line interface argument parsing and definitions
//!
//! This module defines the CLI structure using clap's derive API.

use clap::{Parser, Subcommand, ValueEnum};
use std::io::IsTerminal;
use std::path::PathBuf;

/// oln - command-line client for the Outline knowledge base
///
/// Browse, search and edit documents and collections of an Outline
/// workspace from the terminal.
#[derive(Parser, Debug)]
#[command(
    name = "oln",
    version,
    author,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "OLN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format for results [default: human, or the config file's choice]
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Outline API key (overrides OUTLINE_API_KEY and the config file)
    #[arg(short = 'k', long, global = true)]
    pub api_key: Option<String>,

    /// Outline API URL (overrides OUTLINE_API_URL and the config file)
    #[arg(short = 'u', long, global = true)]
    pub api_url: Option<String>,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Work with documents
    #[command(visible_alias = "documents")]
    Docs(DocsArgs),

    /// Work with collections
    #[command(visible_alias = "cols")]
    Collections(CollectionsArgs),

    /// Inspect and test authentication
    Auth(AuthArgs),

    /// Manage the configuration file
    Config(ConfigArgs),

    /// Generate shell completions for the specified shell
    Completions(CompletionsArgs),
}

#[derive(Parser, Debug)]
pub struct DocsArgs {
    #[command(subcommand)]
    pub action: DocsAction,
}

#[derive(Subcommand, Debug)]
pub enum DocsAction {
    /// List documents
    #[command(visible_alias = "ls")]
    List(DocsListArgs),

    /// Full-text search
    Search(DocsSearchArgs),

    /// Show a document
    #[command(visible_alias = "get")]
    Info(IdArgs),

    /// Create a document
    Create(DocsCreateArgs),

    /// Update a document
    Update(DocsUpdateArgs),

    /// Delete a document
    #[command(visible_alias = "rm")]
    Delete(DocsDeleteArgs),

    /// Export a document
    Export(DocsExportArgs),

    /// Archive a document
    Archive(IdArgs),

    /// Restore an archived document
    Unarchive(IdArgs),
}

/// A single resource id
#[derive(Parser, Debug)]
pub struct IdArgs {
    /// Resource id or url id
    pub id: String,
}

#[derive(Parser, Debug)]
pub struct DocsListArgs {
    /// Only documents in this collection
    #[arg(long)]
    pub collection: Option<String>,

    /// Maximum number of documents
    #[arg(short, long, default_value = "25")]
    pub limit: u32,

    /// Sort field
    #[arg(short, long, value_enum)]
    pub sort: Option<SortField>,

    /// Sort descending
    #[arg(long)]
    pub desc: bool,

    /// Fetch every page instead of the first one
    #[arg(short, long)]
    pub all: bool,
}

#[derive(Parser, Debug)]
pub struct DocsSearchArgs {
    /// Search query
    pub query: String,

    /// Restrict to one collection
    #[arg(long)]
    pub collection: Option<String>,

    /// Maximum number of results
    #[arg(short, long, default_value = "25")]
    pub limit: u32,

    /// Include archived documents
    #[arg(long)]
    pub include_archived: bool,

    /// Include drafts
    #[arg(long)]
    pub include_drafts: bool,
}

#[derive(Parser, Debug)]
pub struct DocsCreateArgs {
    /// Document title
    #[arg(short, long)]
    pub title: String,

    /// Target collection id [default: the configured default collection]
    #[arg(long)]
    pub collection: Option<String>,

    /// Parent document id
    #[arg(short, long)]
    pub parent: Option<String>,

    /// Markdown body
    #[arg(long, conflicts_with = "file")]
    pub text: Option<String>,

    /// Read the markdown body from a file
    #[arg(short, long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Publish immediately instead of creating a draft
    #[arg(long)]
    pub publish: bool,
}

#[derive(Parser, Debug)]
pub struct DocsUpdateArgs {
    /// Document id
    pub id: String,

    /// New title
    #[arg(short, long)]
    pub title: Option<String>,

    /// New markdown body
    #[arg(long, conflicts_with = "file")]
    pub text: Option<String>,

    /// Read the new markdown body from a file
    #[arg(short, long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Append the body instead of replacing it
    #[arg(long)]
    pub append: bool,

    /// Publish a draft
    #[arg(long)]
    pub publish: bool,
}

#[derive(Parser, Debug)]
pub struct DocsDeleteArgs {
    /// Document id
    pub id: String,

    /// Delete permanently instead of moving to trash
    #[arg(long)]
    pub permanent: bool,
}

#[derive(Parser, Debug)]
pub struct DocsExportArgs {
    /// Document id
    pub id: String,

    /// Export format
    #[arg(short, long, value_enum, default_value = "markdown")]
    pub format: ExportFormat,

    /// Write the export to a file instead of stdout
    #[arg(long = "save-to", value_name = "PATH")]
    pub save_to: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct CollectionsArgs {
    #[command(subcommand)]
    pub action: CollectionsAction,
}

#[derive(Subcommand, Debug)]
pub enum CollectionsAction {
    /// List collections
    #[command(visible_alias = "ls")]
    List(CollectionsListArgs),

    /// Show a collection
    #[command(visible_alias = "get")]
    Info(IdArgs),

    /// Show the document tree of a collection
    Documents(IdArgs),

    /// Create a collection
    Create(CollectionsCreateArgs),

    /// Delete a collection and all of its documents
    #[command(visible_alias = "rm")]
    Delete(IdArgs),

    /// Start an export of a collection
    Export(CollectionsExportArgs),
}

#[derive(Parser, Debug)]
pub struct CollectionsListArgs {
    /// Maximum number of collections
    #[arg(short, long, default_value = "25")]
    pub limit: u32,

    /// Fetch every page instead of the first one
    #[arg(short, long)]
    pub all: bool,
}

#[derive(Parser, Debug)]
pub struct CollectionsCreateArgs {
    /// Collection name
    #[arg(short, long)]
    pub name: String,

    /// Description
    #[arg(short, long)]
    pub description: Option<String>,

    /// Hex color, e.g. #4E5C6E
    #[arg(long)]
    pub color: Option<String>,

    /// Only members can see the collection
    #[arg(long)]
    pub private: bool,
}

#[derive(Parser, Debug)]
pub struct CollectionsExportArgs {
    /// Collection id
    pub id: String,

    /// Export format
    #[arg(short, long, value_enum, default_value = "markdown")]
    pub format: CollectionExportFormat,
}

#[derive(Parser, Debug)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub action: AuthAction,
}

#[derive(Subcommand, Debug)]
pub enum AuthAction {
    /// Show the user and team behind the API key
    Info,

    /// Check that the API is reachable with the configured key
    Test,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration management actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration values
    Show,

    /// Set a configuration value
    Set(ConfigSetArgs),

    /// Remove the configuration file
    Clear,

    /// Print the configuration file path
    Path,
}

/// Arguments for config set
#[derive(Parser, Debug)]
pub struct ConfigSetArgs {
    /// Configuration key
    #[arg(value_enum)]
    pub key: ConfigKey,

    /// Configuration value
    pub value: String,
}

/// Keys accepted by `config set`
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ConfigKey {
    /// API key
    ApiKey,
    /// API base URL
    ApiUrl,
    /// Default collection for new documents
    DefaultCollection,
    /// Default output format
    Output,
}

/// Arguments for generating shell completions
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable formatted output
    Human,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Pretty-printed JSON output
    JsonPretty,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum SortField {
    Title,
    Updated,
    Created,
    Published,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Markdown,
    Html,
    Pdf,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum CollectionExportFormat {
    Markdown,
    Json,
}

/// Supported shells for completion generation
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective verbosity level (considering quiet flag)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Check if colored output should be used
    pub fn use_color(&self) -> bool {
        !self.no_color && std::io::stdout().is_terminal()
    }
}

impl From<SortField> for outline_core::DocumentSort {
    fn from(field: SortField) -> Self {
        match field {
            SortField::Title => outline_core::DocumentSort::Title,
            SortField::Updated => outline_core::DocumentSort::UpdatedAt,
            SortField::Created => outline_core::DocumentSort::CreatedAt,
            SortField::Published => outline_core::DocumentSort::PublishedAt,
        }
    }
}

impl From<ExportFormat> for outline_core::ExportFormat {
    fn from(format: ExportFormat) -> Self {
        match format {
            ExportFormat::Markdown => outline_core::ExportFormat::Markdown,
            ExportFormat::Html => outline_core::ExportFormat::Html,
            ExportFormat::Pdf => outline_core::ExportFormat::Pdf,
        }
    }
}

impl From<CollectionExportFormat> for outline_core::CollectionExportFormat {
    fn from(format: CollectionExportFormat) -> Self {
        match format {
            CollectionExportFormat::Markdown => outline_core::CollectionExportFormat::OutlineMarkdown,
            CollectionExportFormat::Json => outline_core::CollectionExportFormat::Json,
        }
    }
}

impl Shell {
    /// Convert to clap_complete shell type
    pub fn to_clap_shell(self) -> clap_complete::Shell {
        match self {
            Shell::Bash => clap_complete::Shell::Bash,
            Shell::Zsh => clap_complete::Shell::Zsh,
            Shell::Fish => clap_complete::Shell::Fish,
            Shell::PowerShell => clap_complete::Shell::PowerShell,
            Shell::Elvish => clap_complete::Shell::Elvish,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_level() {
        let cli = Cli::parse_from(["oln", "-vv", "auth", "test"]);
        assert_eq!(cli.verbosity_level(), 2);

        let cli = Cli::parse_from(["oln", "--quiet", "auth", "test"]);
        assert_eq!(cli.verbosity_level(), 0);
    }

    #[test]
    fn test_docs_list_flags() {
        let cli = Cli::parse_from([
            "oln", "-o", "json", "docs", "list", "--collection", "col-1", "--sort", "updated", "--all",
        ]);
        assert_eq!(cli.output, Some(OutputFormat::Json));
        match cli.command {
            Commands::Docs(DocsArgs {
                action: DocsAction::List(args),
            }) => {
                assert_eq!(args.collection.as_deref(), Some("col-1"));
                assert_eq!(args.sort, Some(SortField::Updated));
                assert!(args.all);
                assert_eq!(args.limit, 25);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_credentials() {
        let cli = Cli::parse_from([
            "oln", "docs", "info", "doc-1", "-k", "secret", "-u", "https://wiki.example.com/api",
        ]);
        assert_eq!(cli.api_key.as_deref(), Some("secret"));
        assert_eq!(cli.api_url.as_deref(), Some("https://wiki.example.com/api"));
    }

    #[test]
    fn test_text_and_file_conflict() {
        let result = Cli::try_parse_from([
            "oln", "docs", "create", "--title", "T", "--collection", "c", "--text", "x", "--file", "a.md",
        ]);
        assert!(result.is_err());
    }
}
