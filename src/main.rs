use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use invoker_trainer::{
    app_dirs::AppDirs,
    catalog::Catalog,
    config::{Config, ConfigStore, FileConfigStore},
    error::LoggingError,
    keymap, logging,
    round::{IndexSource, SeededSource, ThreadRngSource},
    runtime::{CrosstermEventSource, FixedTicker, Runner, TermEvent, TermEventSource, Ticker},
    session::{SessionEvent, SessionState, Trainer},
    ui::{TrainerView, ViewOptions},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    process::ExitCode,
};
use tracing_subscriber::EnvFilter;

/// terminal trainer for invoker orb combinations
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Practice mapping abilities to their three-orb combinations (Q/W/E) in timed or freeform rounds."
)]
pub struct Cli {
    /// json file with a custom ability catalog
    #[clap(short = 'c', long)]
    catalog: Option<PathBuf>,

    /// seed for a reproducible challenge order
    #[clap(long)]
    seed: Option<u64>,

    /// do not reveal the correct combo after a wrong answer
    #[clap(long)]
    hide_answers: bool,

    /// tracing filter for the log file (overrides RUST_LOG and config)
    #[clap(long)]
    log_filter: Option<String>,

    /// persist the effective options as the new defaults
    #[clap(long)]
    save_config: bool,

    /// print the catalog and exit
    #[clap(short = 'l', long)]
    list_abilities: bool,
}

/// Options after merging the config file with command line flags
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeSettings {
    pub catalog: Option<PathBuf>,
    pub seed: Option<u64>,
    pub reveal_answers: bool,
    pub log_filter: String,
    /// `log_filter` came from the command line rather than the config file
    pub explicit_log_filter: bool,
}

impl RuntimeSettings {
    fn merge(cli: &Cli, config: Config) -> Self {
        Self {
            catalog: cli.catalog.clone().or(config.catalog),
            seed: cli.seed,
            reveal_answers: config.reveal_answers && !cli.hide_answers,
            log_filter: cli.log_filter.clone().unwrap_or(config.log_filter),
            explicit_log_filter: cli.log_filter.is_some(),
        }
    }

    fn load_catalog(&self) -> Result<Catalog, Box<dyn Error>> {
        let catalog = match &self.catalog {
            Some(path) => Catalog::load(path)?,
            None => Catalog::builtin()?,
        };
        Ok(catalog)
    }

    fn log_filter(&self) -> Result<EnvFilter, LoggingError> {
        let explicit = self.explicit_log_filter.then_some(self.log_filter.as_str());
        logging::resolve_filter(explicit, logging::env_filter_var().as_deref(), &self.log_filter)
    }

    fn index_source(&self) -> Box<dyn IndexSource> {
        match self.seed {
            Some(seed) => Box::new(SeededSource::new(seed)),
            None => Box::new(ThreadRngSource),
        }
    }
}

impl From<&RuntimeSettings> for Config {
    fn from(rs: &RuntimeSettings) -> Self {
        Self {
            catalog: rs.catalog.clone(),
            reveal_answers: rs.reveal_answers,
            log_filter: rs.log_filter.clone(),
        }
    }
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let store = FileConfigStore::new();
    let settings = RuntimeSettings::merge(&cli, store.load());

    // Only settings that actually work are persisted
    let catalog = settings.load_catalog()?;
    let log_filter = settings.log_filter()?;

    if cli.save_config {
        store.save(&Config::from(&settings))?;
    }

    if cli.list_abilities {
        print!("{}", format_catalog(&catalog));
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let _log_guard = logging::init(&AppDirs::log_dir(), log_filter)?;
    tracing::info!(catalog = %catalog.name, abilities = catalog.len(), "starting trainer");

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut trainer = Trainer::new(catalog, settings.index_source());
    let options = ViewOptions {
        reveal_answers: settings.reveal_answers,
    };
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(trainer.tick_interval()),
    );
    let result = start_tui(&mut terminal, &mut trainer, runner, options);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &result {
        tracing::error!(%err, "trainer exited with error");
    }
    result
}

fn format_catalog(catalog: &Catalog) -> String {
    let width = catalog.names().iter().map(|n| n.len()).max().unwrap_or(0);
    catalog
        .entries()
        .map(|(name, combo)| format!("{name:<width$}  {}\n", combo.to_string().to_uppercase()))
        .collect()
}

fn start_tui<B: Backend, R: IndexSource, E: TermEventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    trainer: &mut Trainer<R>,
    mut runner: Runner<E, T>,
    options: ViewOptions,
) -> Result<(), Box<dyn Error>> {
    let mut state = SessionState::new();
    let mut wants_ticks = false;

    loop {
        terminal.draw(|f| f.render_widget(&TrainerView::new(&state, options), f.area()))?;

        let event = match runner.step(wants_ticks) {
            Some(TermEvent::Tick) => SessionEvent::Tick,
            Some(TermEvent::Resize) => continue,
            Some(TermEvent::Key(key)) => {
                if keymap::is_interrupt(&key) {
                    tracing::info!("interrupted");
                    break;
                }
                match keymap::translate(&key, state.mode) {
                    Some(action) => SessionEvent::Key(action),
                    None => continue,
                }
            }
            None => break,
        };

        let transition = trainer.apply(state, event);
        if transition.quit {
            break;
        }
        state = transition.state;
        wants_ticks = transition.wants_ticks;
    }

    Ok(())
}
