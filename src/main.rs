use clap::Parser;
use notestash::cli::{handle_init, handle_serve, init_logging, Cli, Commands};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_filter.as_deref());

    let result = match cli.command {
        Commands::Serve(args) => handle_serve(args.into()),
        Commands::Init { data_dir } => handle_init(data_dir),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
