// quadtty: terminal compiler playground with quadruple IR and 8086 output

use std::fs;
use std::io;
use std::path::Path;

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use quadtty::compiler;
use quadtty::config::Config;
use quadtty::logger::{self, LogLevel};
use quadtty::ui::{App, SubmitOutcome};

const DEFAULT_SOURCE: &str = "\
int add(int a, int b) {
    return a + b;
}

int x;
int i;
x = 0;
i = 0;
while (i < 10) {
    x = x + i * 2;
    i = i + 1;
}
if (x > 50) {
    x = add(x, 1);
} else {
    x = 0;
}
";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Optional source file argument; otherwise start with the sample program.
    let args: Vec<String> = std::env::args().collect();
    let source = match args.get(1) {
        Some(path) => {
            if !Path::new(path).exists() {
                eprintln!("Error: File '{}' not found", path);
                eprintln!(
                    "Usage: {} [file.mc]",
                    args.first().map(|s| s.as_str()).unwrap_or("quadtty")
                );
                std::process::exit(1);
            }
            fs::read_to_string(path)?
        }
        None => DEFAULT_SOURCE.to_string(),
    };

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: failed to load config, using defaults: {}", e);
            Config::default()
        }
    };

    let min_level = LogLevel::from_str(&config.min_log_level).unwrap_or(LogLevel::Info);
    logger::init(config.log_file_path(), min_level);
    logger::info("quadtty starting");

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // The UI only knows the submission hook; the compiler outcome is adapted
    // to section contents here.
    let submit = Box::new(|source: &str| {
        let outcome = compiler::compile(source);
        SubmitOutcome {
            success: outcome.success,
            message: outcome.message.lines().next().unwrap_or("").to_string(),
            sections: outcome.sections(),
        }
    });

    let mut app = App::new(&config, source, submit);
    app.submit_source();
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }
    logger::info("quadtty exiting");

    Ok(())
}
