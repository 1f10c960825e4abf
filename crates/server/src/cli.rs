//! Command-line interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Chat with PDF documents: upload PDFs, then ask questions about them.
#[derive(Parser, Debug)]
#[command(name = "pdfchat", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Start the HTTP server (default).
    Serve {
        /// Override the listen port.
        #[arg(long)]
        port: Option<u16>,
    },
    /// Build the index from local PDF files, replacing any existing one.
    Ingest {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Answer a question from the current index.
    Ask { question: String },
}

impl Cli {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Serve { port: None })
    }
}
