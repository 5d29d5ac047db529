//! Tokio driver that plays a session's presentation in real time.
use log::debug;
use std::time::Duration;
use tokio::time::Instant;

use crate::ProfileStore;
use crate::clock::Clock;
use crate::events::GameEvent;
use crate::session::{GameSession, Phase};

/// Milliseconds since construction on tokio's clock, so paused test time
/// drives the session too.
#[derive(Debug, Clone, Copy)]
pub struct TokioClock {
    origin: Instant,
}

impl TokioClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TokioClock {
    fn now_ms(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

/// Sleep until each pending ticket is due and fire it, handing every
/// event to `sink`, until the session stops presenting.
///
/// Returns the phase the session settled in.
pub async fn present<S, F>(session: &mut GameSession<S>, mut sink: F) -> Phase
where
    S: ProfileStore,
    F: FnMut(GameEvent),
{
    while matches!(session.phase(), Phase::LevelSetup | Phase::Presenting) {
        let Some(due) = session.next_due() else {
            break;
        };
        let wait = due.saturating_sub(session.now_ms());
        if wait > 0 {
            tokio::time::sleep(Duration::from_millis(wait)).await;
        }
        for event in session.advance() {
            sink(event);
        }
    }
    debug!("presentation settled in {}", session.phase());
    session.phase()
}

/// Convenience over [`present`] that collects the events.
pub async fn collect_presentation<S: ProfileStore>(session: &mut GameSession<S>) -> Vec<GameEvent> {
    let mut events = Vec::new();
    present(session, |event| events.push(event)).await;
    events
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn presents_level_one_on_schedule() {
        let clock = TokioClock::new();
        let mut session = GameSession::guest(21).with_clock(clock);
        session.start_game();
        let events = collect_presentation(&mut session).await;
        assert_eq!(session.phase(), Phase::AwaitingInput);
        assert_eq!(events.last().map(GameEvent::name), Some("input_opened"));
        assert_eq!(clock.now_ms(), 1_480);
    }

    #[tokio::test(start_paused = true)]
    async fn idle_session_returns_immediately() {
        let mut session = GameSession::guest(22).with_clock(TokioClock::new());
        let phase = present(&mut session, |_| {}).await;
        assert_eq!(phase, Phase::Idle);
    }
}
