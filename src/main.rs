mod input;
mod logging;
mod model;
mod pipeline;
mod report;
mod server;
mod survey;

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::input::{ArtifactPaths, load_artifacts};
use crate::pipeline::evaluate;
use crate::pipeline::stage5_report::ChartOutput;
use crate::report::text::render_report_text;
use crate::server::AppState;
use crate::survey::store::SurveyStore;

#[derive(Debug, Parser)]
#[command(
    name = "airsat-ipa",
    version,
    about = "Passenger survey intake and Importance-Performance Analysis service",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
    #[command(flatten)]
    serve: ServeArgs,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the survey form and the evaluation endpoints.
    Serve(ServeArgs),
    /// Run one evaluation offline and print the report.
    Evaluate(EvaluateArgs),
}

#[derive(Debug, Clone, Args)]
struct ArtifactArgs {
    #[arg(long, env = "AIRSAT_TEST_CSV", default_value = "data/test.csv")]
    test_csv: PathBuf,
    #[arg(long, env = "AIRSAT_FOREST", default_value = "models/forest.json")]
    forest: PathBuf,
    #[arg(long, env = "AIRSAT_ENCODER", default_value = "models/label_encoder.json")]
    encoder: PathBuf,
    #[arg(long, env = "AIRSAT_SCALER", default_value = "models/scaler.json")]
    scaler: PathBuf,
    #[arg(long, env = "AIRSAT_IMPORTANCE", default_value = "config/ipa.json")]
    importance: PathBuf,
    #[arg(long, env = "AIRSAT_IMPORTANCE_PROFILE", default_value = "company_2")]
    importance_profile: String,
    /// Directory served under /static; charts go to its images/ folder.
    #[arg(long, env = "AIRSAT_STATIC_DIR", default_value = "static")]
    static_dir: PathBuf,
}

impl ArtifactArgs {
    fn paths(&self) -> ArtifactPaths {
        ArtifactPaths {
            test_csv: self.test_csv.clone(),
            forest: self.forest.clone(),
            encoder: self.encoder.clone(),
            scaler: self.scaler.clone(),
            importance: self.importance.clone(),
            importance_profile: self.importance_profile.clone(),
        }
    }
}

#[derive(Debug, Clone, Args)]
struct ServeArgs {
    #[command(flatten)]
    artifacts: ArtifactArgs,
    #[arg(long, env = "AIRSAT_BIND", default_value = "127.0.0.1:5000")]
    bind: SocketAddr,
    #[arg(long, env = "AIRSAT_SURVEY_CSV", default_value = "data/survey.csv")]
    survey_csv: PathBuf,
}

#[derive(Debug, Clone, Args)]
struct EvaluateArgs {
    #[command(flatten)]
    artifacts: ArtifactArgs,
    /// Print the JSON report instead of the text summary.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, thiserror::Error)]
enum RunError {
    #[error(transparent)]
    Input(#[from] input::InputError),
    #[error(transparent)]
    Evaluation(#[from] pipeline::EvalError),
    #[error(transparent)]
    Survey(#[from] survey::SurveyError),
    #[error("failed to encode report: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

#[tokio::main]
async fn main() {
    logging::init_logging();
    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        tracing::error!(error = %err, "fatal");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), RunError> {
    match resolve_command(cli) {
        Command::Serve(args) => run_serve(args).await,
        Command::Evaluate(args) => run_evaluate(args),
    }
}

/// Bare invocation means `serve`.
fn resolve_command(cli: Cli) -> Command {
    cli.command.unwrap_or(Command::Serve(cli.serve))
}

async fn run_serve(args: ServeArgs) -> Result<(), RunError> {
    let artifacts = load_artifacts(&args.artifacts.paths())?;
    let survey = SurveyStore::open(&args.survey_csv)?;
    tracing::info!(survey_csv = %survey.path().display(), "survey store ready");
    let state = AppState::new(artifacts, survey, args.artifacts.static_dir.clone());
    server::serve(args.bind, state).await?;
    Ok(())
}

fn run_evaluate(args: EvaluateArgs) -> Result<(), RunError> {
    let artifacts = load_artifacts(&args.artifacts.paths())?;
    let charts = ChartOutput {
        static_dir: args.artifacts.static_dir.clone(),
    };
    let evaluation = evaluate(&artifacts, &charts)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&evaluation.report)?);
    } else {
        print!("{}", render_report_text(&evaluation));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../tests/src_inline/support.rs"]
mod test_support;

#[cfg(test)]
#[path = "../tests/src_inline/main_inline.rs"]
mod tests;
