use clap::Parser;
use fxtrader::cli::{run, Cli};
use fxtrader::logging::setup_logging;

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    setup_logging(&cli.log_level, cli.log_json);
    run(cli)
}
