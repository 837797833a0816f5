use std::path::PathBuf;

use anyhow::{Context, bail};
use blockfit_engine::PlacementRequest;

use crate::{
    record::RecordingRound,
    schema::{
        record::SessionRecord,
        script::{ReplayScript, ScriptStep},
    },
    util::{self, Output},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ReplayArg {
    /// Path to the replay script (JSON format)
    script_file: PathBuf,
    /// Output file for the session record (stdout if omitted)
    #[clap(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &ReplayArg) -> anyhow::Result<()> {
    let ReplayArg {
        script_file,
        output,
    } = arg;

    eprintln!("Loading script from {}", script_file.display());
    let script: ReplayScript = util::read_json_file("replay script", script_file)?;
    eprintln!("Loaded {} steps", script.steps.len());

    let record = replay(&script)?;
    match &record.summary {
        Some(summary) => eprintln!(
            "Round ended ({}): {} lines cleared",
            summary.termination_reason, summary.total_lines_cleared
        ),
        None => eprintln!("Script finished with the round still running"),
    }

    Output::save_json(&record, output.clone())
}

fn replay(script: &ReplayScript) -> anyhow::Result<SessionRecord> {
    if script.steps.is_empty() {
        bail!("replay script has no steps");
    }
    let board = script
        .initial_board()
        .context("Invalid initial board in replay script")?;
    let mut recording = RecordingRound::new(script.config.clone(), script.seed, board)?;

    for (i, step) in script.steps.iter().enumerate() {
        if let Some(reason) = recording.round().termination_reason() {
            log::warn!(
                "round ended ({reason}) at step {i}, ignoring {} remaining steps",
                script.steps.len() - i
            );
            break;
        }
        // Rejected steps end up in the record.
        match *step {
            ScriptStep::Unlock => {
                let _ = recording.unlock();
            }
            ScriptStep::Place { piece_id, row, col } => {
                let _ = recording.place(PlacementRequest::new(piece_id, row, col));
            }
            ScriptStep::Terminate { reason } => {
                let _ = recording.terminate(reason);
            }
        }
    }

    Ok(recording.into_record())
}
