use crate::commands::{run_ej_report, run_score, EjArgs, ScoreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use esg_advisor::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "ESG Advisor",
    about = "Score energy projects against ESG criteria and rank remediation steps",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Score a survey CSV and print ranked recommendations
    Score(ScoreArgs),
    /// Summarize environmental-justice indicators around a location
    Ej(EjArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Score(args) => run_score(args),
        Command::Ej(args) => run_ej_report(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_score_arguments() {
        let cli = Cli::try_parse_from([
            "esg-advisor-api",
            "score",
            "--project-type",
            "Wind",
            "--responses",
            "survey.csv",
            "--demographic-index",
            "62.5",
        ])
        .expect("arguments parse");

        match cli.command {
            Some(Command::Score(args)) => {
                assert_eq!(args.project_type.as_str(), "wind");
                assert_eq!(args.demographic_index, Some(62.5));
                assert!(args.location.location.is_none());
            }
            other => panic!("expected score command, got {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_project_type() {
        let result = Cli::try_parse_from([
            "esg-advisor-api",
            "score",
            "--project-type",
            "coal",
            "--responses",
            "survey.csv",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn rejects_non_finite_context_and_radius_flags() {
        for args in [
            ["--demographic-index", "NaN"],
            ["--ej-score", "inf"],
            ["--radius-m", "-5"],
        ] {
            let mut argv = vec![
                "esg-advisor-api",
                "score",
                "--project-type",
                "gas",
                "--responses",
                "survey.csv",
            ];
            argv.extend(args);
            assert!(Cli::try_parse_from(argv).is_err(), "{args:?} should be rejected");
        }
    }
}
