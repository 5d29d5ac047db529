//! Real-time playthrough in the terminal using the async presentation driver.
use anyhow::Result;
use colored::Colorize;
use colorchain_game::driver::{TokioClock, present};
use colorchain_game::numbers::ms_to_secs;
use colorchain_game::{GameEngine, GameEvent, Phase, ProfileStore};
use std::io::Write;
use std::time::Duration;

use crate::common::util::paint_button;
use crate::logic::GameplayStrategy;

/// Delay between simulated button presses.
const PRESS_DELAY: Duration = Duration::from_millis(300);

pub struct WatchOptions {
    pub seed: u64,
    pub levels: u32,
    pub strategy: GameplayStrategy,
    pub player: Option<String>,
}

/// Play up to `options.levels` levels at real speed, narrating to `out`.
pub async fn run_watch<S, W>(engine: &GameEngine<S>, options: &WatchOptions, out: &mut W) -> Result<Phase>
where
    S: ProfileStore + Clone,
    W: Write + ?Sized,
{
    let session = match options.player.as_deref() {
        Some(name) => engine.create_session(name, options.seed),
        None => engine.guest_session(options.seed),
    };
    let mut session = session.with_clock(TokioClock::new());
    let mut policy = options.strategy.create_policy(options.seed);
    let mut pending = session.start_game();

    loop {
        let color_blind = session.modifiers().color_blind;
        for event in pending.drain(..) {
            policy.observe(&event);
            narrate(out, &event, color_blind)?;
        }
        out.flush()?;

        match session.phase() {
            Phase::LevelSetup | Phase::Presenting => {
                let mut shown = Vec::new();
                present(&mut session, |event| shown.push(event)).await;
                pending = shown;
            }
            Phase::AwaitingInput => {
                tokio::time::sleep(PRESS_DELAY).await;
                let position = session.progress().entered;
                let visual = policy.press(position, session.meanings());
                pending = session.submit_color(visual);
            }
            Phase::LevelCleared if session.level() <= options.levels => {
                writeln!(out, "{}", session.meaning_hint().dimmed())?;
                pending = session.next_level();
            }
            phase => return Ok(phase),
        }
    }
}

fn narrate<W: Write + ?Sized>(out: &mut W, event: &GameEvent, color_blind: bool) -> Result<()> {
    match event {
        GameEvent::LevelStarted {
            level,
            sequence_len,
            params,
        } => writeln!(
            out,
            "{} level {level}: {sequence_len} flashes at {} ms",
            "▶".bright_cyan(),
            params.flash_ms
        )?,
        GameEvent::Milestone { message, .. } => writeln!(out, "🏁 {}", message.bright_magenta())?,
        GameEvent::TwistApplied(report) => writeln!(out, "🌀 {}", report.message.yellow())?,
        GameEvent::FlashOn { color, .. } => write!(out, "{} ", paint_button(*color, color_blind))?,
        GameEvent::InputOpened { .. } => writeln!(out)?,
        GameEvent::InputAccepted {
            visual, logical, ..
        } => writeln!(
            out,
            "  pressed {} meaning {}",
            paint_button(*visual, color_blind),
            logical.label()
        )?,
        GameEvent::LevelSucceeded {
            breakdown, cheer, ..
        } => writeln!(out, "{} {}", cheer.green().bold(), breakdown.summary())?,
        GameEvent::LevelFailed {
            position,
            expected,
            got,
            ..
        } => writeln!(
            out,
            "{} step {}: expected {}, got {}",
            "✖".red().bold(),
            position + 1,
            expected.label(),
            got.label()
        )?,
        GameEvent::AchievementsUnlocked(entries) => {
            for entry in entries {
                writeln!(out, "🏆 {} - {}", entry.name.bright_yellow(), entry.description)?;
            }
        }
        GameEvent::SessionComplete(outcome) | GameEvent::SessionFailed(outcome) => writeln!(
            out,
            "Final level {} with {} points in {:.1}s{}",
            outcome.final_level,
            outcome.final_score,
            ms_to_secs(outcome.duration_ms),
            if outcome.new_personal_best {
                " (new personal best!)"
            } else {
                ""
            }
        )?,
        GameEvent::PresentationStarted { .. } | GameEvent::FlashOff { .. } => {}
    }
    Ok(())
}
