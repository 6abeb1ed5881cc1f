use clap::Parser;
use pulsetrader::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(level) = cli.log_level() {
        logger.filter_level(level);
    }
    logger.init();

    run(cli)
}
