use clap::Parser;
use log::{LevelFilter, info};
use std::fs::File;
use std::path::PathBuf;
use std::time::Duration;
use steply_datepicker::app::App;
use steply_datepicker::calendar::{SystemClock, WeekStart};
use steply_datepicker::error::PickerError;
use steply_datepicker::pointer::PointerKind;
use steply_datepicker::state::PickerConfig;
use steply_datepicker::terminal::{Terminal, TerminalEvent};

#[derive(Parser)]
#[command(name = "steply-datepicker")]
#[command(about = "Pick a date into a form field from the terminal", long_about = None)]
#[command(version)]
struct Cli {
    /// YAML file with initial picker state.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of month grids shown at once.
    #[arg(long)]
    months: Option<i32>,

    /// Start weeks on Monday instead of Sunday.
    #[arg(long)]
    monday: bool,

    /// Write logs here. Logging is off without it.
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[arg(long, value_parser = ["error", "warn", "info", "debug", "trace"], default_value = "info")]
    log_level: String,
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), PickerError> {
    init_logging(cli)?;
    let config = load_config(cli)?;
    info!(
        "starting picker: field={} months={} week_start={:?}",
        config.field_name, config.number_of_months, config.week_start
    );

    let mut terminal = Terminal::new()?;
    terminal.enter()?;
    let result = event_loop(&mut terminal, &config);
    terminal.exit()?;

    if let Some(values) = result? {
        println!("{values}");
    }
    Ok(())
}

fn init_logging(cli: &Cli) -> Result<(), PickerError> {
    let mut builder = env_logger::Builder::new();
    match &cli.log_file {
        Some(path) => {
            let level = cli.log_level.parse().unwrap_or(LevelFilter::Info);
            builder
                .filter_level(level)
                .parse_default_env()
                .target(env_logger::Target::Pipe(Box::new(File::create(path)?)));
        }
        // stderr shares the screen with the picker
        None => {
            builder.filter_level(LevelFilter::Off);
        }
    }
    builder.init();
    Ok(())
}

fn load_config(cli: &Cli) -> Result<PickerConfig, PickerError> {
    let mut config = match &cli.config {
        Some(path) => PickerConfig::load(path)?,
        None => PickerConfig::default(),
    };
    if let Some(months) = cli.months {
        config = config.with_number_of_months(months);
    }
    if cli.monday {
        config = config.with_week_start(WeekStart::Monday);
    }
    Ok(config)
}

fn event_loop(
    terminal: &mut Terminal,
    config: &PickerConfig,
) -> Result<Option<serde_json::Value>, PickerError> {
    let mut app = App::new(config, SystemClock);
    let mut render_requested = true;

    loop {
        if render_requested {
            let frame = app.render(terminal.size());
            terminal.render_frame(&frame)?;
            render_requested = false;
        }

        match terminal.poll_event(Duration::from_millis(100))? {
            TerminalEvent::Key(key) => {
                app.handle_key(key)?;
                render_requested = true;
            }
            TerminalEvent::Pointer(event) => {
                app.handle_pointer(event)?;
                render_requested = event.kind != PointerKind::Move;
            }
            TerminalEvent::Resize(_) => render_requested = true,
            TerminalEvent::Tick => {}
        }

        if app.should_exit() {
            break;
        }
    }

    Ok(app.submitted().cloned())
}
