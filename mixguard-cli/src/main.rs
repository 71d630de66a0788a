//! mixguard 명령줄 도구
//!
//! 시뮬레이션 브라우저에 대해 시나리오 스위트를 실행하고 결과를 텍스트
//! 또는 JSON으로 출력합니다. 종료 코드는 [`error::CliError::exit_code`]를
//! 따릅니다.

mod cli;
mod commands;
mod error;
mod logging;
mod output;

use clap::Parser;
use colored::Colorize;

use mixguard_core::config::GeneralConfig;

use crate::cli::{Cli, Commands};
use crate::error::CliError;
use crate::output::OutputWriter;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    let code = match dispatch(cli).await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            e.exit_code()
        }
    };
    std::process::exit(code);
}

async fn dispatch(cli: Cli) -> Result<(), CliError> {
    let writer = OutputWriter::new(cli.output);

    match cli.command {
        Commands::Config(args) => {
            init_logging(GeneralConfig::default(), cli.log_level)?;
            commands::config::execute(args, &cli.config, &writer).await
        }
        Commands::Run(args) => {
            let config = commands::load_config(&cli.config).await?;
            init_logging(config.general.clone(), cli.log_level)?;
            commands::run::execute(args, &config, &writer).await
        }
        Commands::Scenarios(args) => {
            let config = commands::load_config(&cli.config).await?;
            init_logging(config.general.clone(), cli.log_level)?;
            commands::scenarios::execute(args, &config, &writer).await
        }
    }
}

/// `--log-level`이 설정 파일 값보다 우선합니다.
fn init_logging(mut general: GeneralConfig, log_level: Option<String>) -> Result<(), CliError> {
    if let Some(level) = log_level {
        general.log_level = level;
    }
    logging::init_tracing(&general).map_err(|e| CliError::Config(e.to_string()))
}
