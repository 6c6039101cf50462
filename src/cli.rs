use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "sessed",
    about = "Line-oriented file viewer and editor whose state persists across invocations"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(
        long,
        global = true,
        env = "SESSED_STATE_DIR",
        help = "Directory holding the session and source index"
    )]
    pub state_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Open a file and summarise its top-level definitions")]
    Open {
        #[arg(required = true, num_args = 1.., help = "File to open")]
        path: Vec<String>,
    },
    #[command(about = "Close the open file")]
    Close,
    #[command(about = "Show the session state")]
    Status,
    #[command(about = "Show a window of lines (e.g. 10, 30-45)")]
    List {
        #[arg(num_args = 0.., help = "Line or line range, 1-based and inclusive (default: 1)")]
        range: Vec<String>,
    },
    #[command(about = "Search the open file with a regular expression")]
    Search {
        #[arg(
            required = true,
            num_args = 1..,
            allow_hyphen_values = true,
            help = "Regular expression; multiple words are joined with spaces"
        )]
        pattern: Vec<String>,
    },
    #[command(about = "Continue from the last displayed lines")]
    Scroll {
        #[arg(default_value = "down", help = "Direction to scroll")]
        direction: Direction,
    },
    #[command(about = "Select a line range for the next rewrite")]
    Select {
        #[arg(required = true, num_args = 1.., help = "Line range, 1-based and inclusive")]
        range: Vec<String>,
    },
    #[command(about = "Replace the selected lines with standard input")]
    Rewrite,
    #[command(about = "Replace a line range with standard input in one step")]
    Edit {
        #[arg(required = true, num_args = 1.., help = "Line range, 1-based and inclusive")]
        range: Vec<String>,
    },
    #[command(about = "Create a new file from standard input")]
    Create {
        #[arg(required = true, num_args = 1.., help = "File to create")]
        path: Vec<String>,
    },
    #[command(name = "find-def", about = "Look up a function in the source index")]
    FindDef {
        #[arg(help = "Function name")]
        name: String,
    },
    #[command(name = "find-class", about = "Look up a class or type in the source index")]
    FindClass {
        #[arg(help = "Class or type name")]
        name: String,
    },
    #[command(about = "Build the source index")]
    Init {
        #[arg(help = "Source root (default: enclosing git repository or cwd)")]
        path: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Direction {
    Up,
    #[default]
    Down,
}
