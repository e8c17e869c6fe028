mod highlighter;
mod history;

use crate::engine::env::Environment;
use crate::repl::highlighter::ReplHelper;
use owo_colors::OwoColorize;
use rustyline::Editor;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{info, warn};

#[tracing::instrument(skip(env))]
pub fn start_repl(env: Rc<RefCell<Environment>>) -> anyhow::Result<()> {
    info!("Starting REPL session");
    let mut rl: Editor<ReplHelper, DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(ReplHelper::new()));

    let history_path = history::get_history_path();
    match history_path {
        Some(ref path) => history::load_history_from_path(&mut rl, path),
        None => warn!("Could not determine history file path. History will not be saved."),
    }

    let mut line_number = 1;
    loop {
        let prompt = format!("sprig ({})> ", line_number);

        match rl.readline(&prompt) {
            Ok(line) => {
                let input = line.trim();

                if input.is_empty() {
                    line_number += 1;
                    continue;
                }

                if let Err(err) = rl.add_history_entry(line.as_str()) {
                    warn!("Failed to add line to history: {}", err);
                }

                if input == ".exit" || input == "(exit)" {
                    info!("Exiting REPL session via user command.");
                    println!("Exiting.");
                    break;
                }

                match crate::evaluate_source(input, Rc::clone(&env)) {
                    // A line may hold several forms; echo each value in turn.
                    // Comments or blank forms produce nothing to print.
                    Ok(values) => {
                        for value in values {
                            println!("{}", value);
                        }
                    }
                    Err(e) => eprintln!("{} {}", "Error:".red(), e),
                }
            }
            Err(ReadlineError::Interrupted) => {
                info!("REPL interrupted (Ctrl-C).");
                println!("Interrupted. Type .exit, (exit), or Ctrl-D to exit.");
            }
            Err(ReadlineError::Eof) => {
                info!("REPL EOF detected (Ctrl-D).");
                println!("Exiting.");
                break;
            }
            Err(err) => {
                eprintln!("{} {:?}", "Readline error:".red(), err);
                break;
            }
        }
        line_number += 1;
    }

    if let Some(ref path) = history_path {
        history::save_history_to_path(&mut rl, path);
    }
    Ok(())
}
