use std::process::ExitCode;

use chrono::Utc;
use clap::error::ErrorKind;
use clap::Parser;
use dotenv::dotenv;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use repo_seek_lib::{
    render, validate, Args, Config, FileRateLimitStore, GitHubSearcher, RequestOrchestrator,
    SeekError, Stage, TerminalPrompter,
};

#[tokio::main]
async fn main() -> ExitCode {
    // RUST_LOG may come from .env
    dotenv().ok();

    // Logs go to stderr so printed results stay clean
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            eprintln!("{} error:- \n{}", Stage::Parsing, e.render());
            return ExitCode::FAILURE;
        }
    };

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_cancelled() => {
            println!("{}", e);
            ExitCode::FAILURE
        }
        Err(e) => {
            debug!("{:?}", e);
            let stage = e.stage().unwrap_or(Stage::Server);
            eprintln!("{} error:- \n{}", stage, e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), SeekError> {
    let config = Config::from_env();
    let prompter = TerminalPrompter;

    // A running cooldown is reported before any option is looked at
    let store = FileRateLimitStore::in_dir(&config.state_dir);
    let mut orchestrator = RequestOrchestrator::load(config.api_url, store)?;
    orchestrator.check_cooldown(Utc::now().timestamp())?;

    let options = args.into_option_set();
    let search = validate::validate(&options, Utc::now().date_naive(), &prompter)?;

    let urls = orchestrator.plan_requests(&search, Utc::now().timestamp())?;
    orchestrator.confirm_requests(urls.len(), search.force, &prompter)?;

    info!("Sending {} request(s)", urls.len());
    let searcher = GitHubSearcher::new(search.raw)?;
    let results = searcher.run(&urls, &mut orchestrator).await?;

    render(&search, &results, orchestrator.state())
}
