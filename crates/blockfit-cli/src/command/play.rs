use std::{
    io::{self, BufRead as _, Write},
    num::NonZeroUsize,
    path::PathBuf,
    str::FromStr,
};

use anyhow::Context;
use blockfit_engine::{
    Board, DEFAULT_BATCH_SIZE, Piece, PieceSeed, PlacementRequest, RoundConfig, RoundController,
    RoundEvent, RoundSummary, TerminationReason,
};
use rand::Rng as _;

use crate::record::RecordingRound;

const HELP: &str = "\
commands:
  place <slot> <row> <col>  place the piece in <slot> with its top-left cell at (row, col)
  next                      deal the next batch (with --manual-deal)
  end <reason>              end the round (completed, error-limit or time-up)
  help                      show this help
  quit                      leave without ending the round";

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct RoundArg {
    /// Seed for the piece sequence (32 hex digits); random if omitted
    #[clap(long)]
    seed: Option<PieceSeed>,
    /// Number of pieces dealt together
    #[clap(long, default_value_t = DEFAULT_BATCH_SIZE)]
    batch_size: usize,
    /// Wait for `next` after each batch instead of dealing automatically
    #[clap(long)]
    manual_deal: bool,
    /// End the round after this many batches
    #[clap(long)]
    content_units: Option<NonZeroUsize>,
}

impl Default for RoundArg {
    fn default() -> Self {
        Self {
            seed: None,
            batch_size: DEFAULT_BATCH_SIZE,
            manual_deal: false,
            content_units: None,
        }
    }
}

impl RoundArg {
    fn to_config(&self) -> RoundConfig {
        RoundConfig {
            batch_size: self.batch_size,
            auto_deal: !self.manual_deal,
            content_units: self.content_units,
        }
    }
}

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    #[clap(flatten)]
    round: RoundArg,
    /// Directory to save the session record to when the round ends
    #[clap(long)]
    save_record: Option<PathBuf>,
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg { round, save_record } = arg;

    let seed = round.seed.unwrap_or_else(|| rand::rng().random());
    eprintln!("Seed: {seed}");
    let mut recording = RecordingRound::new(round.to_config(), seed, Board::EMPTY)?;
    recording.unlock()?;

    let mut out = io::stdout().lock();
    writeln!(out, "{HELP}")?;
    print_events(&mut out, recording.round_mut())?;
    print_round(&mut out, recording.round())?;

    for line in io::stdin().lock().lines() {
        let line = line.context("Failed to read command")?;
        if line.trim().is_empty() {
            continue;
        }
        let command = match line.parse::<PlayCommand>() {
            Ok(command) => command,
            Err(e) => {
                writeln!(out, "{e}")?;
                continue;
            }
        };

        match command {
            PlayCommand::Place { slot, row, col } => {
                let piece_id = recording
                    .round()
                    .batch()
                    .and_then(|batch| batch.pieces().get(slot))
                    .map(Piece::id);
                let Some(piece_id) = piece_id else {
                    writeln!(out, "no piece in slot {}", slot + 1)?;
                    continue;
                };
                match recording.place(PlacementRequest::new(piece_id, row, col)) {
                    Ok(report) => writeln!(
                        out,
                        "cleared {} line(s), score {}",
                        report.lines_cleared(),
                        report.total_lines_cleared
                    )?,
                    Err(e) => writeln!(out, "rejected: {e}")?,
                }
            }
            PlayCommand::Next => {
                if let Err(e) = recording.unlock() {
                    writeln!(out, "{e}")?;
                }
            }
            PlayCommand::End(reason) => {
                if let Err(e) = recording.terminate(reason) {
                    writeln!(out, "{e}")?;
                }
            }
            PlayCommand::Help => {
                writeln!(out, "{HELP}")?;
                continue;
            }
            PlayCommand::Quit => break,
        }

        print_events(&mut out, recording.round_mut())?;
        if recording.round().state().is_terminated() {
            break;
        }
        print_round(&mut out, recording.round())?;
    }

    if let Some(record_dir) = save_record {
        let path = recording.into_record().save(record_dir)?;
        eprintln!("Saved session record to {}", path.display());
    }

    Ok(())
}

fn print_events<W>(out: &mut W, round: &mut RoundController) -> io::Result<()>
where
    W: Write,
{
    for event in round.drain_events() {
        match event {
            RoundEvent::BatchDealt { pieces } => writeln!(out, "dealt {} pieces", pieces.len())?,
            RoundEvent::AwaitingBatch => writeln!(out, "batch used up, type `next` to continue")?,
            RoundEvent::RoundEnded { summary } => print_summary(out, &summary)?,
            RoundEvent::PiecePlaced { .. } => {}
        }
    }
    Ok(())
}

fn print_summary<W>(out: &mut W, summary: &RoundSummary) -> io::Result<()>
where
    W: Write,
{
    writeln!(out, "round ended: {}", summary.termination_reason)?;
    writeln!(out, "  lines cleared:     {}", summary.total_lines_cleared)?;
    writeln!(out, "  pieces placed:     {}", summary.placed_pieces)?;
    writeln!(out, "  batches completed: {}", summary.completed_batches)
}

fn print_round<W>(out: &mut W, round: &RoundController) -> io::Result<()>
where
    W: Write,
{
    writeln!(out)?;
    writeln!(out, "   0123456789   score {}", round.score())?;
    for (i, row) in round.board().to_string().lines().enumerate() {
        writeln!(out, "{i:>2} {row}")?;
    }

    let Some(batch) = round.batch() else {
        return Ok(());
    };
    writeln!(out)?;
    for (slot, piece) in batch.iter().enumerate() {
        writeln!(out, "[{}] {} ({})", slot + 1, piece.kind().as_char(), piece.id())?;
        for row in piece.shape().render_rows() {
            writeln!(out, "    {row}")?;
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlayCommand {
    /// `slot` is zero-based; players type it one-based.
    Place {
        slot: usize,
        row: usize,
        col: usize,
    },
    Next,
    End(TerminationReason),
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
enum ParseCommandError {
    #[display("unknown command `{name}`, type `help` for a list")]
    Unknown { name: String },
    #[display("usage: {usage}")]
    Usage { usage: &'static str },
    #[display("unknown reason `{reason}`")]
    Reason { reason: String },
}

const PLACE_USAGE: &str = "place <slot> <row> <col>";
const END_USAGE: &str = "end <reason>";

impl FromStr for PlayCommand {
    type Err = ParseCommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((&name, args)) = words.split_first() else {
            return Err(ParseCommandError::Usage { usage: "help" });
        };

        match (name, args) {
            ("place" | "p", [slot, row, col]) => {
                let number = |s: &str| {
                    s.parse::<usize>().map_err(|_| ParseCommandError::Usage {
                        usage: PLACE_USAGE,
                    })
                };
                let slot = number(slot)?
                    .checked_sub(1)
                    .ok_or(ParseCommandError::Usage { usage: PLACE_USAGE })?;
                Ok(Self::Place {
                    slot,
                    row: number(row)?,
                    col: number(col)?,
                })
            }
            ("place" | "p", _) => Err(ParseCommandError::Usage { usage: PLACE_USAGE }),
            ("next" | "n", []) => Ok(Self::Next),
            ("end", [reason]) => TerminationReason::ALL
                .into_iter()
                .find(|r| r.to_string() == *reason)
                .map(Self::End)
                .ok_or_else(|| ParseCommandError::Reason {
                    reason: (*reason).to_owned(),
                }),
            ("end", _) => Err(ParseCommandError::Usage { usage: END_USAGE }),
            ("help" | "h" | "?", _) => Ok(Self::Help),
            ("quit" | "q", _) => Ok(Self::Quit),
            _ => Err(ParseCommandError::Unknown {
                name: name.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_place() {
        assert_eq!(
            "place 1 3 4".parse(),
            Ok(PlayCommand::Place {
                slot: 0,
                row: 3,
                col: 4
            })
        );
        assert_eq!(
            "  p 3 0 9 ".parse(),
            Ok(PlayCommand::Place {
                slot: 2,
                row: 0,
                col: 9
            })
        );
    }

    #[test]
    fn test_parse_place_errors() {
        for line in ["place", "place 1 2", "place 0 1 1", "place a 1 1", "place 1 -1 1"] {
            assert_eq!(
                line.parse::<PlayCommand>(),
                Err(ParseCommandError::Usage { usage: PLACE_USAGE }),
                "{line}"
            );
        }
    }

    #[test]
    fn test_parse_end() {
        assert_eq!(
            "end time-up".parse(),
            Ok(PlayCommand::End(TerminationReason::TimeUp))
        );
        assert_eq!(
            "end soon".parse::<PlayCommand>(),
            Err(ParseCommandError::Reason {
                reason: "soon".to_owned()
            })
        );
        assert!("end".parse::<PlayCommand>().is_err());
    }

    #[test]
    fn test_parse_other() {
        assert_eq!("next".parse(), Ok(PlayCommand::Next));
        assert_eq!("help".parse(), Ok(PlayCommand::Help));
        assert_eq!("q".parse(), Ok(PlayCommand::Quit));
        assert!(matches!(
            "jump".parse::<PlayCommand>(),
            Err(ParseCommandError::Unknown { .. })
        ));
    }

    #[test]
    fn test_round_arg_config() {
        let arg = RoundArg {
            manual_deal: true,
            content_units: NonZeroUsize::new(4),
            ..RoundArg::default()
        };
        let config = arg.to_config();
        assert_eq!(config.batch_size, DEFAULT_BATCH_SIZE);
        assert!(!config.auto_deal);
        assert_eq!(config.content_units, NonZeroUsize::new(4));
        assert_eq!(RoundArg::default().to_config(), RoundConfig::default());
    }
}
