//! Question List Admin
//!
//! Manages the persisted questionnaire over its JSON store.
//!
//! Usage:
//!   cargo run --bin question_admin -- list
//!   cargo run --bin question_admin -- --password admin123 add "New question?"
//!   cargo run --bin question_admin -- --password admin123 delete 3
//!   cargo run --bin question_admin -- --file custom.json --password admin123 move-up 5

use std::path::PathBuf;
use std::process::ExitCode;

use medintake::admin::AdminPanel;
use medintake::storage::JsonQuestionStore;

struct AdminConfig {
    file: PathBuf,
    password: Option<String>,
    command: Vec<String>,
}

impl AdminConfig {
    fn from_args() -> Self {
        let args: Vec<String> = std::env::args().collect();
        let mut file = PathBuf::from(JsonQuestionStore::DEFAULT_FILE_NAME);
        let mut password = None;
        let mut command = Vec::new();

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--file" => {
                    i += 1;
                    if i < args.len() {
                        file = PathBuf::from(&args[i]);
                    }
                },
                "--password" => {
                    i += 1;
                    if i < args.len() {
                        password = Some(args[i].clone());
                    }
                },
                other => command.push(other.to_string()),
            }
            i += 1;
        }

        Self {
            file,
            password,
            command,
        }
    }
}

fn print_usage() {
    eprintln!("Usage: question_admin [--file PATH] [--password PASS] COMMAND");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  list                 Print the question list");
    eprintln!("  add TEXT             Append a question");
    eprintln!("  edit ID TEXT         Replace a question's text");
    eprintln!("  delete ID            Remove a question");
    eprintln!("  move-up ID           Move a question one position up");
    eprintln!("  move-down ID         Move a question one position down");
    eprintln!();
    eprintln!("Mutating commands require --password.");
}

fn parse_id(raw: &str) -> Option<u32> {
    match raw.parse() {
        Ok(id) => Some(id),
        Err(_) => {
            eprintln!("Error: '{}' is not a question id", raw);
            None
        },
    }
}

fn run(config: AdminConfig) -> medintake::Result<bool> {
    let store = JsonQuestionStore::new(&config.file);
    let mut panel = AdminPanel::open(store)?;

    if let Some(password) = &config.password {
        if !panel.login(password) {
            eprintln!("Error: password rejected");
            return Ok(false);
        }
    }

    let command: Vec<&str> = config.command.iter().map(String::as_str).collect();
    match command.as_slice() {
        ["list"] => {
            for q in panel.questions().questions() {
                println!("{:>3}. [id {:>3}] {}", q.order, q.id, q.text);
            }
        },
        ["add", text] => {
            let id = panel.add_question(text)?;
            println!("Added question with id {}", id);
        },
        ["edit", id, text] => {
            let Some(id) = parse_id(id) else {
                return Ok(false);
            };
            panel.edit_question(id, text)?;
            println!("Updated question {}", id);
        },
        ["delete", id] => {
            let Some(id) = parse_id(id) else {
                return Ok(false);
            };
            panel.delete_question(id)?;
            println!("Deleted question {}", id);
        },
        ["move-up", id] => {
            let Some(id) = parse_id(id) else {
                return Ok(false);
            };
            if panel.move_question_up(id)? {
                println!("Moved question {} up", id);
            } else {
                println!("Question {} is already first", id);
            }
        },
        ["move-down", id] => {
            let Some(id) = parse_id(id) else {
                return Ok(false);
            };
            if panel.move_question_down(id)? {
                println!("Moved question {} down", id);
            } else {
                println!("Question {} is already last", id);
            }
        },
        _ => {
            print_usage();
            return Ok(false);
        },
    }

    Ok(true)
}

fn main() -> ExitCode {
    env_logger::init();

    let config = AdminConfig::from_args();
    match run(config) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        },
    }
}
