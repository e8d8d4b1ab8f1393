use clap::Parser;
use kdb1::cli::{commands, output, Cli, Commands};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding a `tracing` filter directive.
const LOG_ENV: &str = "KDB1_LOG";

fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let result = match cli.command {
        Commands::Info { ref file } => commands::info::execute(file),
        Commands::Tree { ref file } => commands::tree::execute(&cli, file),
        Commands::List { ref file } => commands::list::execute(&cli, file),
        Commands::Show {
            ref file,
            ref title,
            reveal,
        } => commands::show::execute(&cli, file, title, reveal),
        Commands::Keyfile { ref path } => commands::keyfile::execute(path),
        Commands::SelfTest => commands::self_test::execute(),
        Commands::Completions { shell } => commands::completions::execute(shell),
    };

    if let Err(e) = result {
        output::error(&e.to_string());
        std::process::exit(1);
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
