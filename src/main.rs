use std::process::ExitCode;
use std::time::Instant;

use anyhow::Context;
use termion::input::TermRead;
use tracing::{debug, info};

use fignotes::{
    config::{Command, Config, USAGE},
    logger,
    renderer::{BlockCache, FigletRenderer},
    screen::Screen,
    session::{Flow, Session},
    store::FileStore,
    terminal::Terminal,
};

fn run(config: Config) -> anyhow::Result<()> {
    if let Some(path) = &config.log_path {
        logger::init(path)?;
    }
    info!(notes = %config.notes_path.display(), "starting");

    let store = FileStore::new(&config.notes_path);
    let renderer = FigletRenderer::standard().context("failed to load figlet font")?;
    let mut blocks = BlockCache::new(Box::new(renderer));
    let notes_name = config.notes_path.display().to_string();

    let mut terminal = Terminal::new().context("failed to initialize terminal")?;
    let (_, rows) = terminal.size();
    let mut session = Session::load(
        &store,
        &mut blocks,
        Screen::viewport_rows(rows),
        Instant::now(),
        config.highlight_decay,
    );

    // 入力はノンブロッキングで 1 キーずつ読む
    let mut keys = termion::async_stdin().keys();

    loop {
        let size = terminal.refresh_size();
        session.relayout(&mut blocks);
        session.resize(Screen::viewport_rows(size.1));

        let frame = session.frame(Instant::now());
        if let Err(err) = Screen::refresh(terminal.stdout(), &frame, &notes_name, size) {
            debug!(error = %err, "failed to draw frame");
        }

        match keys.next() {
            Some(Ok(key)) => {
                let flow = session.handle_key(key, &mut blocks, &store, Instant::now());
                if flow == Flow::Quit {
                    break;
                }
            }
            Some(Err(err)) => debug!(error = %err, "ignoring unreadable input"),
            None => std::thread::sleep(config.poll_interval),
        }
    }

    info!("quit");
    Ok(())
}

fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(Command::Run(config)) => config,
        Ok(Command::Help) => {
            println!("{}", USAGE);
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            eprintln!("fignotes: {}", err);
            eprintln!("{}", USAGE);
            return ExitCode::FAILURE;
        }
    };

    match run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("fignotes: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
