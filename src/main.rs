use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use updatesite_index::config::{self, AppState, Config};
use updatesite_index::site::{render_index, RequestedPath};
use updatesite_index::{logger, server};

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), version, about = "Eclipse update site index server")]
struct Cli {
    /// Configuration file (extension optional)
    #[arg(short, long, default_value = config::DEFAULT_CONFIG_PATH)]
    config: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Print the index page for a directory to stdout
    Render {
        /// `/`-separated directory to expand, as in `?dir=`
        #[arg(long, default_value = "")]
        dir: String,
        /// Site root, overriding the configuration
        #[arg(long)]
        root: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut cfg = Config::load_from(&cli.config)?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(cfg),
        Command::Render { dir, root } => {
            if let Some(root) = root {
                cfg.site.root = root;
            }
            print!("{}", render_index(&cfg.site, &RequestedPath::parse(&dir)));
            Ok(())
        }
    }
}

fn serve(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    logger::init(&cfg)?;

    // Tokio runtime sized by the workers setting
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_reusable_listener(addr)?;

    if !cfg.site.root.is_dir() {
        logger::log_warning(&format!(
            "Site root '{}' is not a readable directory, listings will be empty",
            cfg.site.root.display()
        ));
    }
    logger::log_server_start(&addr, &cfg);

    let state = Arc::new(AppState::new(cfg));
    let signals = Arc::new(server::SignalHandler::new());
    server::start_signal_handler(Arc::clone(&signals), Arc::clone(&state));

    let local = tokio::task::LocalSet::new();
    local
        .run_until(server::start_server_loop(
            listener,
            state,
            Arc::clone(&signals.shutdown),
        ))
        .await
}
