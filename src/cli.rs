use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// A small Lisp interpreter with a macro system.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
#[clap(name = "sprig", bin_name = "sprig")]
#[clap(subcommand_required = true, arg_required_else_help = true)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluates an expression from the command line or executes a source file.
    Run(RunArgs),

    /// Starts an interactive session.
    Repl,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Source text to evaluate.
    #[clap(short, long, value_name = "SOURCE", conflicts_with = "file")]
    pub expr: Option<String>,

    /// Path to a source file to execute.
    #[clap(
        value_name = "FILE_PATH",
        conflicts_with = "expr",
        required_unless_present = "expr"
    )]
    pub file: Option<PathBuf>,
}
