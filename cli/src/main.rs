use clap::Parser;

mod cli;
mod commands;
mod logging;
mod notify;
mod watch;

fn main() {
    let args = cli::Cli::parse();

    if let Err(err) = commands::run(args) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
