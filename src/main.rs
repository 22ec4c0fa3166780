mod cli;

use clap::Parser;

use cli::Cli;

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(e) = cli::run(cli) {
        log::error!("{e:#}");
        std::process::exit(1);
    }
}
