//! CLI interface using clap.
//!
//! Provides command-line arguments and subcommands for the tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::application::{MoveDirection, OutputFormat};

/// Site Content - manage the editable content of the marketing site.
#[derive(Parser, Debug)]
#[command(name = "site-content")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging (use multiple times for more verbosity).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Output format: markdown, json, or table.
    #[arg(short, long, default_value = "markdown")]
    pub format: String,

    /// Configuration file (defaults to ~/.site-content/config.toml).
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the current site document.
    Show,

    /// Check the about section against the recommended limits.
    Validate,

    /// Start an editor session.
    Login {
        /// Editor username.
        #[arg(short, long)]
        username: String,

        /// Editor password.
        #[arg(short, long)]
        password: String,
    },

    /// End the editor session.
    Logout,

    /// Show session, theme and storage status.
    Status,

    /// Export the document as JSON (requires a session).
    Export {
        /// Output file path (defaults to the fixed export filename).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Replace the document with a JSON file (requires a session).
    Import {
        /// JSON file to import.
        file: PathBuf,

        /// Skip the confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },

    /// Edit one field of the document (requires a session).
    Edit {
        #[command(subcommand)]
        op: EditOp,
    },

    /// Show or change the theme preference.
    Theme {
        /// New theme; omit to show the current one.
        #[arg(value_enum)]
        mode: Option<ThemeArg>,
    },

    /// Validate contact form fields and show the contact link.
    Contact {
        #[arg(long, default_value = "")]
        first_name: String,

        #[arg(long, default_value = "")]
        last_name: String,

        #[arg(long, default_value = "")]
        email: String,

        #[arg(long, default_value = "")]
        message: String,

        /// Form trap field; left empty by real visitors.
        #[arg(long, default_value = "", hide = true)]
        empresa: String,
    },

    /// Show the storage and configuration paths being used.
    Paths,

    /// Write a commented default configuration file.
    InitConfig,
}

/// Theme argument.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThemeArg {
    Light,
    Dark,
    Toggle,
}

/// Direction argument for reordering.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DirectionArg {
    Up,
    Down,
}

impl From<DirectionArg> for MoveDirection {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Up => Self::Up,
            DirectionArg::Down => Self::Down,
        }
    }
}

/// Field-level edit operations.
#[derive(Subcommand, Debug)]
pub enum EditOp {
    /// Set the logo from an image file, or clear it.
    Logo {
        /// Image file to embed.
        #[arg(conflicts_with = "clear", required_unless_present = "clear")]
        file: Option<PathBuf>,

        #[arg(long)]
        clear: bool,
    },

    /// Set the fixed part of the hero title.
    HeroTitle { text: String },

    /// Set the rotating hero words (comma-separated).
    FlipWords { words: String },

    /// Set the hero subtitle.
    Subtitle { text: String },

    /// Set the hero bullets (one per line).
    HeroBullets { lines: String },

    /// Set the about title.
    AboutTitle { text: String },

    /// Set the about text (separate paragraphs with a blank line).
    AboutText { text: String },

    /// Set the about image from a file, or clear it.
    AboutImage {
        #[arg(conflicts_with = "clear", required_unless_present = "clear")]
        file: Option<PathBuf>,

        #[arg(long)]
        clear: bool,
    },

    /// Append an about bullet.
    AddBullet,

    /// Replace the text of an about bullet.
    SetBullet { index: usize, text: String },

    /// Remove an about bullet.
    RemoveBullet { index: usize },

    /// Move an about bullet up or down.
    MoveBullet {
        index: usize,
        #[arg(value_enum)]
        direction: DirectionArg,
    },

    /// Append a service.
    AddService,

    /// Change a service.
    SetService {
        index: usize,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        desc: Option<String>,
    },

    /// Remove a service.
    RemoveService { index: usize },

    /// Append a testimonial.
    AddTestimonial,

    /// Change a testimonial.
    SetTestimonial {
        index: usize,
        #[arg(long)]
        quote: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        role: Option<String>,
    },

    /// Set a testimonial image from a file, or clear it.
    TestimonialImage {
        index: usize,
        #[arg(conflicts_with = "clear", required_unless_present = "clear")]
        file: Option<PathBuf>,

        #[arg(long)]
        clear: bool,
    },

    /// Remove a testimonial.
    RemoveTestimonial { index: usize },
}

impl Cli {
    /// Parse the output format argument.
    pub fn output_format(&self) -> Result<OutputFormat, String> {
        self.format.parse()
    }
}
