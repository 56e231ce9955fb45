use clap::Parser;
use std::io::{self, BufRead};
use std::path::PathBuf;
use tasksphere_bot::dispatch::{Dispatcher, Reply};
use tasksphere_core::config::{BotConfig, ConfigOverrides};
use tasksphere_core::error::AppError;

#[derive(Parser, Debug)]
#[command(author, version, about = "Chat-driven task tracker", long_about = None)]
struct Cli {
    /// Override the list store path (TASKSPHERE_STORE_PATH)
    #[arg(long, value_name = "PATH")]
    store: Option<PathBuf>,

    /// Override the completed-task archive path (TASKSPHERE_ARCHIVE_PATH)
    #[arg(long, value_name = "PATH")]
    archive: Option<PathBuf>,
}

/// Each inbound line is "<user_id> <message...>".
fn parse_inbound(line: &str) -> Result<(i64, &str), AppError> {
    let (user, message) = line
        .split_once(char::is_whitespace)
        .ok_or_else(|| AppError::usage("expected '<user_id> <message>'"))?;
    let user_id = user
        .parse::<i64>()
        .map_err(|_| AppError::usage("user id must be an integer"))?;

    let message = message.trim();
    if message.is_empty() {
        return Err(AppError::usage("expected '<user_id> <message>'"));
    }

    Ok((user_id, message))
}

fn print_reply(reply: &Reply) {
    println!("{}", reply.text);
    if let Some(menu) = &reply.menu {
        println!("Options: {}", menu.join(" | "));
    }
}

fn run_session(dispatcher: &Dispatcher) -> Result<(), AppError> {
    let mut input = String::new();
    let stdin = io::stdin();
    let mut stdin_lock = stdin.lock();

    loop {
        input.clear();
        let bytes = stdin_lock
            .read_line(&mut input)
            .map_err(|err| AppError::io(err.to_string()))?;

        if bytes == 0 {
            break;
        }

        let line = input.trim();
        if line.is_empty() {
            continue;
        }

        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }

        match parse_inbound(line) {
            Ok((user_id, message)) => print_reply(&dispatcher.handle_message(user_id, message)),
            Err(err) => eprintln!("ERROR: {}", err),
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    let overrides = ConfigOverrides {
        store_path: cli.store,
        archive_path: cli.archive,
    };

    let config = match BotConfig::from_env(&overrides) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("ERROR: {}", err);
            std::process::exit(1);
        }
    };

    let dispatcher = Dispatcher::new(config.store_path, config.archive_path);
    if let Err(err) = run_session(&dispatcher) {
        eprintln!("ERROR: {}", err);
        std::process::exit(1);
    }
}
