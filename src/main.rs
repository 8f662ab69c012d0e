use std::{
    process::ExitCode,
    sync::Arc,
};

use clap::{
    Parser,
    Subcommand,
};
use somemo::{
    logging::init_logging,
    memo::{
        CardView,
        MemoController,
    },
    persistence::{
        FileStore,
        KeyValueStore,
    },
    session::LoginRedirect,
    MemoApp,
    MemoConfig,
    MemoError,
};

#[derive(Parser, Debug)]
#[command(name = "somemo", version, about = "Study flip cards against a somemo backend")]
struct Cli {
    /// Backend base URL (overrides settings and SOMEMO_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Keep a local snapshot of the cards for when the backend is down
    #[arg(long, global = true)]
    offline_cache: bool,

    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and store the session token
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long, env = "SOMEMO_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show who is logged in
    Whoami,
    /// List your cards
    List {
        /// Show both sides of every card
        #[arg(long)]
        reveal: bool,
    },
    /// Add a card
    Add { front: String, back: String },
    /// Mark cards as done and save the checked ones
    Remember {
        #[arg(long = "check", value_name = "INDEX")]
        check: Vec<usize>,
    },
    /// Print the effective settings
    Config {
        /// Also write them to the settings file
        #[arg(long)]
        save: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(if cli.verbose { "debug" } else { "warn" });

    let mut config = MemoConfig::load();
    if let Some(url) = cli.api_url {
        config.api_base_url = url;
    }
    if cli.offline_cache {
        config.offline_cache = true;
    }

    let redirect = Arc::new(LoginRedirect::new());
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open_default());
    let app = match MemoApp::new(config, store, redirect.clone()) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let is_logout = matches!(cli.command, Command::Logout);
    let result = run(&app, cli.command).await;

    if redirect.requested() && !is_logout {
        eprintln!("Please log in: somemo login -u <USERNAME>");
    }

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(app: &MemoApp, command: Command) -> Result<(), MemoError> {
    match command {
        Command::Login { username, password } => {
            let credential = app.login(&username, &password).await?;
            println!("Welcome, {}", credential.username);
        }
        Command::Logout => {
            app.logout();
            println!("Logged out");
        }
        Command::Whoami => match app.session().username() {
            Some(username) => println!("{username}"),
            None => println!("Not logged in"),
        },
        Command::List { reveal } => {
            let view = app.memo_view();
            view.load_initial().await?;
            print_cards(&view, reveal);
        }
        Command::Add { front, back } => {
            // Appending needs no listing; the backend assigns the card's place.
            let view = app.memo_view();
            if let Some(index) = view.add_card(&front, &back).await?.applied() {
                if let Some(card) = view.snapshot().cards().get(index) {
                    println!("Added card: {} -> {}", card.front, card.back);
                }
            }
        }
        Command::Remember { check } => {
            let view = app.memo_view();
            view.load_initial().await?;
            for index in check {
                let Some(card) = view.snapshot().cards().get(index).cloned() else {
                    tracing::warn!(index, "no card at this index, skipping");
                    continue;
                };
                let mut card_view = CardView::new(index, &card);
                view.with_collection(|collection| card_view.set_checked(true, collection));
            }
            let message = view.remember().await?;
            print_cards(&view, true);
            println!("{message}");
        }
        Command::Config { save } => {
            let config = app.config();
            let json = serde_json::to_string_pretty(config)
                .map_err(|e| MemoError::Config(e.to_string()))?;
            println!("{json}");
            if save {
                config.save()?;
            }
        }
    }
    Ok(())
}

fn print_cards(view: &MemoController, reveal: bool) {
    let collection = view.snapshot();
    if collection.from_cache() {
        println!("(offline: showing cached cards)");
    }
    if collection.is_empty() {
        println!("No cards yet. Add one with: somemo add <FRONT> <BACK>");
        return;
    }
    for (index, card) in collection.cards().iter().enumerate() {
        let card_view = CardView::new(index, card);
        if reveal {
            println!("{}", card_view.render_revealed());
        } else {
            println!("{}", card_view.render_line());
        }
    }
}
