use critdice::{DiceRoller, KnowledgeBase, RollConfig};
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt};

const DATA_DIR_VAR: &str = "CRITDICE_DATA_DIR";

/// Logs go to stderr; `RUST_LOG` overrides the default filter.
fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,critdice=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_knowledge() -> Result<KnowledgeBase, critdice::KnowledgeError> {
    match std::env::var_os(DATA_DIR_VAR) {
        Some(dir) => KnowledgeBase::load(dir),
        None => KnowledgeBase::builtin(),
    }
}

fn main() -> ExitCode {
    init_logging();

    let spec = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    if spec.trim().is_empty() {
        eprintln!("usage: critdice <dice spec>, e.g. critdice critical longsword plus 3");
        return ExitCode::from(2);
    }

    let knowledge = match load_knowledge() {
        Ok(knowledge) => knowledge,
        Err(e) => {
            tracing::error!(error = %e, "could not load the ruleset");
            return ExitCode::from(2);
        }
    };
    let roller = DiceRoller::with_config(knowledge, RollConfig::from_env());

    match roller.roll(&spec) {
        Ok(outcome) => {
            println!("{}", outcome.narration());
            ExitCode::SUCCESS
        }
        Err(e) if e.is_unfulfillable() => {
            println!("{}", e);
            ExitCode::from(1)
        }
        Err(e) => {
            tracing::error!(error = %e, spec = %spec, "roll failed");
            ExitCode::from(2)
        }
    }
}
