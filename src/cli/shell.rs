use std::io::{self, BufRead, Write};

use shell_words::split;

use crate::cli::context::{CliError, CliMode, CommandError, LoopControl, ShellContext};
use crate::cli::output;

/// Runs the shell over stdin until `exit` or end of input.
///
/// `TONTINE_CLI_SCRIPT` switches to script mode: no prompt and no snapshot auto-load.
pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os("TONTINE_CLI_SCRIPT").is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;
    run_loop(&mut context, io::stdin().lock())
}

fn run_loop(context: &mut ShellContext, input: impl BufRead) -> Result<(), CliError> {
    let mut lines = input.lines();
    while context.running {
        if context.mode == CliMode::Interactive {
            print!("{}", context.prompt());
            io::stdout().flush()?;
        }
        let Some(line) = lines.next() else {
            if context.mode == CliMode::Interactive {
                output::info("Exiting shell.");
            }
            break;
        };
        match handle_line(context, &line?) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => context.report_error(err),
        }
    }
    Ok(())
}

fn handle_line(context: &mut ShellContext, line: &str) -> Result<LoopControl, CommandError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(LoopControl::Continue);
    }

    let tokens = match split(trimmed) {
        Ok(tokens) => tokens,
        Err(err) => {
            output::warning(format!("Could not parse `{trimmed}`: {err}"));
            return Ok(LoopControl::Continue);
        }
    };
    let Some((raw, rest)) = tokens.split_first() else {
        return Ok(LoopControl::Continue);
    };

    let command = raw.to_lowercase();
    let args: Vec<&str> = rest.iter().map(String::as_str).collect();
    context.last_command = Some(trimmed.to_string());

    match context.dispatch(&command, raw, &args) {
        Ok(LoopControl::Exit) => {
            context.running = false;
            Ok(LoopControl::Exit)
        }
        other => other,
    }
}
