use clap::Parser;
use color_eyre::Result;
use gestui::{apply_cli_overrides, App, AppConfig, AppEvent, Args, ConfigManager, Theme, APP_NAME};
use ratatui::DefaultTerminal;
use simplelog::WriteLogger;
use std::fs::File;
use std::sync::mpsc::channel;

fn render(terminal: &mut DefaultTerminal, app: &mut App) -> Result<()> {
    terminal.draw(|frame| frame.render_widget(app, frame.area()))?;
    Ok(())
}

fn init_logging(config: &AppConfig) {
    let Ok(manager) = ConfigManager::new(APP_NAME) else {
        return;
    };
    if manager.ensure_config_dir().is_err() {
        return;
    }
    let level = if config.debug.enabled {
        simplelog::LevelFilter::Debug
    } else {
        simplelog::LevelFilter::Info
    };
    match File::create(manager.config_path("gestui.log")) {
        Ok(log_file) => {
            let _ = WriteLogger::init(level, simplelog::Config::default(), log_file);
        }
        Err(e) => eprintln!("Warning: could not open log file: {e}"),
    }
}

fn run(mut terminal: DefaultTerminal, args: &Args, config: AppConfig) -> Result<()> {
    let (tx, rx) = channel::<AppEvent>();
    let theme = Theme::from_config(&config.theme)?;
    let poll_interval = std::time::Duration::from_millis(config.performance.event_poll_interval_ms);
    let mut app = App::new_with_config(tx.clone(), theme, config);

    if let Some(path) = &args.data {
        app.set_store(gestui::data::mock::load_seed(path)?);
    }
    if args.narrow {
        app.force_narrow();
    }
    if let Some(name) = &args.module {
        match gestui::modules::Module::from_cli_name(name) {
            Some(module) => app.open_module(module),
            None => eprintln!("Warning: unknown module '{name}', opening Clientes"),
        }
    }

    // Classify the viewport once before the first frame.
    let size = terminal.size()?;
    tx.send(AppEvent::Resize(size.width, size.height))?;
    render(&mut terminal, &mut app)?;

    loop {
        if crossterm::event::poll(poll_interval)? {
            match crossterm::event::read()? {
                crossterm::event::Event::Key(key) => tx.send(AppEvent::Key(key))?,
                crossterm::event::Event::Resize(cols, rows) => {
                    tx.send(AppEvent::Resize(cols, rows))?
                }
                _ => {}
            }
        } else {
            tx.send(AppEvent::Tick)?;
        }

        let updated = match rx.recv_timeout(std::time::Duration::from_millis(0)) {
            Ok(event) => {
                match event {
                    AppEvent::Exit => break,
                    event => {
                        if let Some(event) = app.event(&event) {
                            tx.send(event)?;
                        }
                    }
                }
                true
            }
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => false,
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
        };

        if updated {
            render(&mut terminal, &mut app)?;
        }
    }
    Ok(())
}

fn handle_early_exit_flags(args: &Args) -> Result<Option<()>> {
    if args.write_config {
        match ConfigManager::new(APP_NAME) {
            Ok(manager) => match manager.write_default_config(args.force) {
                Ok(path) => {
                    println!("Config written to {}", path.display());
                    return Ok(Some(()));
                }
                Err(e) => {
                    eprintln!("Error writing config: {}", e);
                    std::process::exit(1);
                }
            },
            Err(e) => {
                eprintln!("Error initializing config manager: {}", e);
                std::process::exit(1);
            }
        }
    }
    Ok(None)
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(()) = handle_early_exit_flags(&args)? {
        return Ok(());
    }

    color_eyre::install()?;
    let mut config = AppConfig::load(APP_NAME)?;
    apply_cli_overrides(&mut config, &args);
    init_logging(&config);

    let terminal = ratatui::init();
    let result = run(terminal, &args, config);
    ratatui::restore();
    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    Ok(())
}
