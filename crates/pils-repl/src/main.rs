//! `pils`: run the interpreter from a terminal.
//!
//! ```text
//! pils                 interactive prompt
//! pils script.pils     run every line of a file
//! pils -c "6 * 7"      run one line
//! pils -i script.pils  run a file, then stay at the prompt
//! ```

use std::fs;
use std::process;

use clap::{crate_version, Arg, ArgMatches, Command};
use log::debug;
use pils_eval::help::HELP_TEXT;
use pils_eval::Session;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

const PROMPT: &str = "pils> ";

fn main() {
    env_logger::init();

    let app = Command::new("pils")
        .version(crate_version!())
        .about("Line-oriented expression interpreter")
        .arg(
            Arg::new("file")
                .index(1)
                .help("Path to a script; each line is one statement")
                .value_name("FILE"),
        )
        .arg(
            Arg::new("cmd")
                .short('c')
                .help("Evaluate one line then exit")
                .takes_value(true)
                .value_name("CMD"),
        )
        .arg(
            Arg::new("interactive")
                .short('i')
                .help("Drop into the interactive prompt after running FILE or CMD"),
        );

    let args = app.get_matches();
    let mut session = Session::new();

    let ran_batch = args.is_present("cmd") || args.is_present("file");
    let batch_ok = run_batch(&args, &mut session);

    if !ran_batch || args.is_present("interactive") {
        println!("pils {} (type 'help' for help, 'exit' to leave)", crate_version!());
        if let Err(e) = Repl::new(PROMPT, session).run() {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    } else if !batch_ok {
        process::exit(1);
    }
}

/// Run `-c` or `FILE`, whichever was given. Returns `false` if any line
/// failed.
fn run_batch(args: &ArgMatches, session: &mut Session) -> bool {
    if let Some(cmd) = args.value_of("cmd") {
        return run_line(session, cmd, None);
    }

    let Some(path) = args.value_of("file") else {
        return true;
    };
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error: could not read {path}: {e}");
            process::exit(2);
        }
    };

    let mut ok = true;
    for (index, line) in source.lines().enumerate() {
        ok &= run_line(session, line, Some(index + 1));
    }
    ok
}

/// Evaluate one line and print its outcome. Blank results print nothing.
fn run_line(session: &mut Session, line: &str, line_number: Option<usize>) -> bool {
    match session.process(line) {
        Ok(Some(value)) => {
            println!("{value}");
            true
        }
        Ok(None) => true,
        Err(e) => {
            match line_number {
                Some(n) => eprintln!("line {n}: {}", e.render()),
                None => eprintln!("{}", e.render()),
            }
            false
        }
    }
}

struct Repl {
    prompt: &'static str,
    session: Session,
}

impl Repl {
    fn new(prompt: &'static str, session: Session) -> Self {
        Self { prompt, session }
    }

    /// Read lines until `exit`, Ctrl-C or Ctrl-D. Only a failure of the
    /// line editor itself is an error.
    fn run(&mut self) -> Result<(), ReadlineError> {
        let mut editor = DefaultEditor::new()?;

        loop {
            let line = match editor.readline(self.prompt) {
                Ok(line) => line,
                Err(ReadlineError::Interrupted) => {
                    println!("CTRL-C");
                    return Ok(());
                }
                Err(ReadlineError::Eof) => {
                    println!("CTRL-D");
                    return Ok(());
                }
                Err(e) => return Err(e),
            };

            if !line.trim().is_empty() {
                if let Err(e) = editor.add_history_entry(line.as_str()) {
                    debug!("could not record history: {e}");
                }
            }

            match self.respond(&line) {
                Reply::Quit => return Ok(()),
                Reply::Print(text) => println!("{text}"),
                Reply::Nothing => {}
            }
        }
    }

    /// Handle one prompt line: a REPL command or a statement.
    fn respond(&mut self, line: &str) -> Reply {
        match line.trim() {
            "exit" | "quit" => Reply::Quit,
            "help" => Reply::Print(HELP_TEXT.to_string()),
            "env" => Reply::Print(self.session.env_tuples()),
            _ => {
                let output = self.session.process_str(line);
                if output.is_empty() {
                    Reply::Nothing
                } else {
                    Reply::Print(output)
                }
            }
        }
    }
}

/// What the prompt does after one line.
#[derive(Debug, PartialEq)]
enum Reply {
    Print(String),
    Nothing,
    Quit,
}
