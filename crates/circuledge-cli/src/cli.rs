use clap::{Parser, Subcommand, ValueEnum};
use circuledge_core::store::SortKey;

#[derive(Parser)]
#[command(name = "circuledge")]
#[command(about = "Edit shared notes with revision-checked saves")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Server base URL (falls back to CIRCULEDGE_SERVER_URL)
    #[arg(long, global = true, value_name = "URL")]
    pub server: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List notes
    List {
        /// Number of notes to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
        /// Number of matching notes to skip
        #[arg(long, default_value = "0")]
        offset: usize,
        /// Only notes in this channel path
        #[arg(long, value_name = "PATH")]
        channel: Option<String>,
        /// Tag pattern (case-insensitive regex); repeat to match any of several
        #[arg(long)]
        tag: Vec<String>,
        /// Title pattern (case-insensitive regex)
        #[arg(long)]
        title: Option<String>,
        /// Body pattern (case-insensitive regex)
        #[arg(long)]
        body: Option<String>,
        /// Sort order
        #[arg(long, value_enum, default_value_t = SortArg::DateDesc)]
        sort: SortArg,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a note with its revision
    Show {
        /// Note ID or unique ID prefix
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a new note
    #[command(alias = "add")]
    New {
        /// Initial content; read from stdin when piped
        content: Vec<String>,
    },
    /// Edit a note in $EDITOR and save it against its revision
    Edit {
        /// Note ID or unique ID prefix
        id: String,
    },
    /// Delete a note
    Delete {
        /// Note ID or unique ID prefix
        id: String,
    },
    /// Recently read notes, most recent first
    History {
        /// Number of notes to show
        #[arg(short, long)]
        limit: Option<usize>,
        /// Number of entries to skip
        #[arg(long, default_value = "0")]
        offset: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List channels
    Channels {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show or change user settings
    Settings {
        /// Channel path new notes are created in
        #[arg(long, value_name = "PATH")]
        default_channel: Option<String>,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum SortArg {
    DateDesc,
    DateAsc,
    TitleAsc,
    TitleDesc,
}

impl From<SortArg> for SortKey {
    fn from(sort: SortArg) -> Self {
        match sort {
            SortArg::DateDesc => Self::DateDesc,
            SortArg::DateAsc => Self::DateAsc,
            SortArg::TitleAsc => Self::TitleAsc,
            SortArg::TitleDesc => Self::TitleDesc,
        }
    }
}
