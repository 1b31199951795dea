use clap::{ArgAction, Args, Parser, Subcommand};

use certa_core::parse::DEFAULT_MAX_JSON_BYTES;

#[derive(Parser, Debug, Clone)]
#[command(name = "certa", version, about = "Schema-bound Merkle evidence with selective disclosure")]
pub struct Cli {
    /// Emit JSON output on stdout.
    #[arg(long, global = true)]
    pub json: bool,

    /// Digest algorithm: sha256|blake3
    #[arg(long, global = true, default_value = "sha256")]
    pub hash_alg: String,

    /// Largest accepted input file in bytes.
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_JSON_BYTES)]
    pub max_json_bytes: usize,

    /// More logging on stderr (-v debug, -vv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Schema and data document shared by most commands.
#[derive(Args, Debug, Clone)]
pub struct DocArgs {
    /// JSON schema file.
    #[arg(long)]
    pub schema: String,

    /// JSON data file.
    #[arg(long)]
    pub data: String,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Fingerprint a schema.
    Identify {
        /// JSON schema file.
        #[arg(long)]
        schema: String,

        /// Hash the schema as written instead of its normalized form.
        #[arg(long)]
        raw: bool,
    },

    /// Produce full evidence for a document.
    Notarize {
        #[command(flatten)]
        doc: DocArgs,

        /// Write the evidence here instead of stdout.
        #[arg(long)]
        out: Option<String>,
    },

    /// Produce evidence proving only the given paths.
    Disclose {
        #[command(flatten)]
        doc: DocArgs,

        /// Dotted path to disclose, e.g. books.1.title (repeatable).
        #[arg(long = "path")]
        paths: Vec<String>,

        #[arg(long)]
        out: Option<String>,
    },

    /// Project a document down to the given paths.
    Expose {
        #[command(flatten)]
        doc: DocArgs,

        /// Dotted path to keep (repeatable).
        #[arg(long = "path")]
        paths: Vec<String>,

        #[arg(long)]
        out: Option<String>,
    },

    /// Verify a (partial) document against evidence and print its imprint.
    Calculate {
        #[command(flatten)]
        doc: DocArgs,

        /// Evidence JSON file.
        #[arg(long)]
        evidence: String,
    },

    /// Print the imprint of a document.
    Imprint {
        #[command(flatten)]
        doc: DocArgs,
    },

    /// Report whether a JSON file is a schema or an evidence document.
    Inspect { input: String },
}
