mod cli;
mod engine;
mod logging;
mod repl;

use crate::engine::ast::Expr;
use crate::engine::env::Environment;
use crate::engine::eval::eval;
use crate::engine::parser::parse_program;
use anyhow::{Context, Result, bail};
use clap::Parser;
use std::cell::RefCell;
use std::fs;
use std::rc::Rc;
use tracing::debug;

/// Parses and evaluates a whole source text in the given environment,
/// returning the values of the top-level forms in order. A source holding
/// no forms at all (blank text or comments only) yields an empty sequence.
pub(crate) fn evaluate_source(source: &str, env: Rc<RefCell<Environment>>) -> Result<Vec<Expr>> {
    let forms = parse_program(source)?;
    debug!(forms = forms.len(), "Parsed source");

    let mut values = Vec::with_capacity(forms.len());
    for form in &forms {
        values.push(eval(form, Rc::clone(&env))?);
    }
    Ok(values)
}

fn main() -> Result<()> {
    logging::init_logging();

    let args = cli::Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    match args.command {
        cli::Commands::Run(run_args) => {
            let source = if let Some(expr) = run_args.expr {
                expr
            } else if let Some(path) = run_args.file {
                fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?
            } else {
                // clap's argument rules guarantee one of the two is present.
                bail!("No expression or file provided");
            };

            let env = engine::prelude::bootstrap()?;
            if let Some(value) = evaluate_source(&source, env)?.last() {
                println!("{}", value);
            }
        }
        cli::Commands::Repl => {
            let env = engine::prelude::bootstrap()?;
            repl::start_repl(env)?;
        }
    }

    Ok(())
}
