use recipe_browser::config::AppConfig;
use recipe_browser::startup::{Session, startup_options_from_args};
use recipe_browser::ui::{self, Command, Reply};
use std::io::{self, BufRead, Write};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let options = startup_options_from_args(std::env::args().skip(1));
    let config = AppConfig::from_env()?;
    log::info!("API base: {}", config.api.absolute_base());

    let mut session = if options.offline {
        Session::offline(&config)?
    } else {
        Session::open(&config)?
    };
    session.start_auto_load();

    async_std::task::block_on(async move {
        let first = match options.initial_search {
            Some(text) => Command::Search(text),
            None => Command::List,
        };
        if let Reply::Text(text) = ui::dispatch(&session, first).await {
            print!("{}", text);
        }

        let stdin = io::stdin();
        let mut input = String::new();
        loop {
            print!("> ");
            io::stdout().flush()?;
            input.clear();
            if stdin.lock().read_line(&mut input)? == 0 {
                break;
            }
            if input.trim().is_empty() {
                continue;
            }
            match ui::parse(&input) {
                Ok(command) => match ui::dispatch(&session, command).await {
                    Reply::Text(text) => print!("{}", text),
                    Reply::Quit => break,
                },
                Err(hint) => println!("{}", hint),
            }
        }

        session.close().await;
        Ok::<(), io::Error>(())
    })?;

    Ok(())
}
