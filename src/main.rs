use std::env;
use std::io::{self, BufRead, Write};
use std::process;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use morsetrain::playback::{Continuation, Presenter, Solution, StaticControls, Trainer};
use morsetrain::{RandomSource, TimerQueue, TrainerError};
use tracing::warn;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Usage: morsetrain <metadata.json|metadata.yaml> [category] [--speed F]";

const HELP: &str = "Commands: r = reveal, n = new word, s <F> = speed, c <name> = category, l = list, q = quit";

enum Command {
    Reveal,
    Randomize,
    Speed(String),
    Category(String),
    List,
    Quit,
}

impl Command {
    fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        let (word, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim().to_string();
        match word {
            "r" => Some(Command::Reveal),
            "n" => Some(Command::Randomize),
            "s" => Some(Command::Speed(rest)),
            "c" => Some(Command::Category(rest)),
            "l" => Some(Command::List),
            "q" => Some(Command::Quit),
            _ => None,
        }
    }
}

/// Draws the lamp and the current letter on one terminal line.
///
/// The first failed write is logged and ends all further rendering; the main
/// loop then quits.
struct TerminalPresenter<W> {
    out: W,
    closed: bool,
    indicator: bool,
    label: String,
    solution: Option<Solution>,
    solution_visible: bool,
}

impl<W: Write> TerminalPresenter<W> {
    fn new(out: W) -> Self {
        Self {
            out,
            closed: false,
            indicator: false,
            label: String::new(),
            solution: None,
            solution_visible: false,
        }
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    fn render(&mut self) {
        if self.closed {
            return;
        }
        let lamp = if self.indicator { "●" } else { "○" };
        let mut line = format!("\r\x1b[2K {}  {:<5}", lamp, self.label);
        if self.solution_visible {
            if let Some(solution) = &self.solution {
                line.push_str(&format!("  {}  {}", solution.word, solution.morse));
            }
        }
        let written = self
            .out
            .write_all(line.as_bytes())
            .and_then(|()| self.out.flush());
        if let Err(e) = written {
            warn!(error = %e, "terminal output closed");
            self.closed = true;
        }
    }
}

impl<W: Write> Presenter for TerminalPresenter<W> {
    fn set_indicator(&mut self, on: bool) {
        self.indicator = on;
        self.render();
    }

    fn set_current_label(&mut self, label: &str) {
        self.label = label.to_string();
        self.render();
    }

    fn show_solution(&mut self, solution: &Solution) {
        self.solution = Some(solution.clone());
    }

    fn set_solution_visible(&mut self, visible: bool) {
        self.solution_visible = visible;
        self.render();
    }
}

/// Select `name` and start a word from it; on failure the previous category stays selected.
fn switch_category<P: Presenter, R: RandomSource>(
    trainer: &mut Trainer<StaticControls, P, R>,
    name: String,
) -> Result<Continuation, TrainerError> {
    let previous = std::mem::replace(&mut trainer.controls_mut().category, name);
    trainer.restart().map_err(|e| {
        trainer.controls_mut().category = previous;
        e
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn spawn_stdin_reader() -> Receiver<Command> {
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            match Command::parse(&line) {
                Some(command) => {
                    if sender.send(command).is_err() {
                        break;
                    }
                }
                None => eprintln!("\n{}", HELP),
            }
        }
    });
    receiver
}

fn main() {
    init_tracing();
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("{}", USAGE);
        process::exit(1);
    }

    let mut metadata_path: Option<&String> = None;
    let mut category: Option<String> = None;
    let mut speed = "1".to_string();

    // Parse flags
    let mut rest = args[1..].iter();
    while let Some(arg) = rest.next() {
        if arg == "--speed" {
            match rest.next() {
                Some(value) => speed = value.clone(),
                None => {
                    eprintln!("{}", USAGE);
                    process::exit(1);
                }
            }
        } else if metadata_path.is_none() {
            metadata_path = Some(arg);
        } else if category.is_none() {
            category = Some(arg.clone());
        } else {
            eprintln!("{}", USAGE);
            process::exit(1);
        }
    }

    let Some(metadata_path) = metadata_path else {
        eprintln!("{}", USAGE);
        process::exit(1);
    };

    // Load metadata
    let metadata = match morsetrain::load(metadata_path) {
        Ok(metadata) => metadata,
        Err(e) => {
            eprintln!("Error loading metadata: {}", e);
            process::exit(1);
        }
    };

    let category = match category.or_else(|| metadata.category_names().next().map(String::from)) {
        Some(category) => category,
        None => {
            eprintln!("Metadata '{}' defines no categories", metadata_path);
            process::exit(1);
        }
    };

    let controls = StaticControls::new(category).with_speed(speed);
    let mut trainer = Trainer::new(metadata, controls, TerminalPresenter::new(io::stdout()));
    let mut queue = TimerQueue::new();

    match trainer.restart() {
        Ok(continuation) => queue.schedule(continuation),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }

    eprintln!("{}", HELP);
    let commands = spawn_stdin_reader();
    let mut stdin_open = true;
    let started = Instant::now();

    while !trainer.presenter().is_closed() {
        queue.set_now(started.elapsed());
        while let Some(ticket) = queue.pop_expired() {
            if let Some(next) = trainer.step(ticket) {
                queue.schedule(next);
            }
        }

        let wait = queue.time_until_next().unwrap_or(Duration::from_secs(1));
        if !stdin_open {
            thread::sleep(wait);
            continue;
        }

        let command = match commands.recv_timeout(wait) {
            Ok(command) => command,
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => {
                stdin_open = false;
                continue;
            }
        };

        queue.set_now(started.elapsed());
        match command {
            Command::Reveal => trainer.reveal(),
            Command::Randomize => match trainer.restart() {
                Ok(continuation) => queue.schedule(continuation),
                Err(e) => eprintln!("\nError: {}", e),
            },
            Command::Speed(value) => trainer.controls_mut().speed = value,
            Command::Category(name) => {
                match switch_category(&mut trainer, name) {
                    Ok(continuation) => queue.schedule(continuation),
                    Err(e) => eprintln!("\nError: {}", e),
                }
            }
            Command::List => {
                let names: Vec<&str> = trainer.metadata().category_names().collect();
                eprintln!("\nCategories: {}", names.join(", "));
            }
            Command::Quit => break,
        }
    }

    println!();
}
