//! Named simulation scenarios runnable from the command line.
use anyhow::{Result, ensure};
use colorchain_game::{CATALOG, scoring};

use crate::logic::policy::{FORGETFUL_SPAN, GameplayStrategy};
use crate::logic::simulation::{SimulationPlan, SimulationSummary};

/// A plan with a stable CLI name.
#[derive(Clone)]
pub struct TestScenario {
    pub name: String,
    pub plan: SimulationPlan,
}

const SCENARIOS: [(&str, &str); 7] = [
    ("smoke", "Perfect player clears the first ten levels"),
    ("full-run", "Perfect player completes all fifty levels"),
    ("twist-trap", "Player ignoring twists fails once meanings shift"),
    ("forgetful", "Short memory span fails once sequences outgrow it"),
    ("replay", "Mid-input replays restart playback without penalty"),
    ("profile-checkpoints", "Named player's profile records the session"),
    ("determinism", "Same seed yields an identical event stream"),
];

pub fn list_scenarios() -> &'static [(&'static str, &'static str)] {
    &SCENARIOS
}

pub fn scenario_names() -> Vec<String> {
    SCENARIOS.iter().map(|(name, _)| (*name).to_string()).collect()
}

pub fn get_scenario(name: &str) -> Option<TestScenario> {
    let key = name.trim().to_lowercase();
    let plan = match key.as_str() {
        "smoke" => SimulationPlan::new(GameplayStrategy::Perfect)
            .with_level_cap(10)
            .expect(no_failure)
            .expect(|summary| expect_cleared(summary, 10))
            .expect(score_matches_awards),
        "full-run" => SimulationPlan::new(GameplayStrategy::Perfect)
            .expect(no_failure)
            .expect(completed_everything),
        "twist-trap" => SimulationPlan::new(GameplayStrategy::Literal).expect(failed_after_twists),
        "forgetful" => SimulationPlan::new(GameplayStrategy::Forgetful).expect(failed_past_span),
        "replay" => SimulationPlan::new(GameplayStrategy::Replayer)
            .with_level_cap(12)
            .expect(no_failure)
            .expect(|summary| expect_cleared(summary, 12))
            .expect(replayed_each_multi_step_level),
        "profile-checkpoints" => SimulationPlan::new(GameplayStrategy::Forgetful)
            .with_player("Simulator")
            .expect(profile_recorded),
        "determinism" => SimulationPlan::new(GameplayStrategy::Perfect)
            .with_level_cap(15)
            .verifying_determinism()
            .expect(no_failure),
        _ => return None,
    };
    Some(TestScenario { name: key, plan })
}

fn no_failure(summary: &SimulationSummary) -> Result<()> {
    ensure!(
        !summary.failed,
        "failed at level {} with score {}",
        summary.final_level,
        summary.score
    );
    Ok(())
}

fn expect_cleared(summary: &SimulationSummary, levels: u32) -> Result<()> {
    ensure!(
        summary.levels_cleared == levels,
        "cleared {} levels, expected {levels}",
        summary.levels_cleared
    );
    Ok(())
}

fn score_matches_awards(summary: &SimulationSummary) -> Result<()> {
    let expected: u64 = (1..=summary.levels_cleared)
        .map(|level| {
            let len = usize::try_from(level).unwrap_or(usize::MAX);
            scoring::award(level, len, level > 35).total
        })
        .sum();
    ensure!(
        summary.score == expected,
        "score {} differs from award total {expected}",
        summary.score
    );
    Ok(())
}

fn completed_everything(summary: &SimulationSummary) -> Result<()> {
    ensure!(summary.completed, "session did not complete");
    ensure!(
        summary.final_level == 50,
        "final level {}",
        summary.final_level
    );
    ensure!(
        summary.achievements.len() == CATALOG.len(),
        "unlocked {} of {} achievements",
        summary.achievements.len(),
        CATALOG.len()
    );
    ensure!(
        summary.twists.len() == 23,
        "saw {} twists",
        summary.twists.len()
    );
    ensure!(
        summary.milestones == 10,
        "saw {} milestones",
        summary.milestones
    );
    score_matches_awards(summary)
}

fn failed_after_twists(summary: &SimulationSummary) -> Result<()> {
    ensure!(summary.failed, "ignoring twists should eventually fail");
    ensure!(
        summary.final_level >= 6,
        "failed at level {} before any twist",
        summary.final_level
    );
    Ok(())
}

fn failed_past_span(summary: &SimulationSummary) -> Result<()> {
    let span = u32::try_from(FORGETFUL_SPAN).unwrap_or(u32::MAX);
    ensure!(summary.failed, "short memory should eventually fail");
    ensure!(
        summary.final_level > span,
        "failed at level {} within memory span {span}",
        summary.final_level
    );
    Ok(())
}

fn replayed_each_multi_step_level(summary: &SimulationSummary) -> Result<()> {
    let expected = summary.levels_cleared.saturating_sub(1);
    ensure!(
        summary.replays == expected,
        "replayed {} times, expected {expected}",
        summary.replays
    );
    Ok(())
}

fn profile_recorded(summary: &SimulationSummary) -> Result<()> {
    let Some(profile) = summary.profile.as_ref() else {
        anyhow::bail!("no profile attached");
    };
    ensure!(profile.games_played >= 1, "games played not recorded");
    ensure!(
        profile.high_score >= summary.score,
        "high score {} below session score {}",
        profile.high_score,
        summary.score
    );
    ensure!(
        profile.best_level >= summary.final_level,
        "best level {} below final level {}",
        profile.best_level,
        summary.final_level
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_scenario_resolves() {
        for (name, _) in list_scenarios() {
            let scenario = get_scenario(name).unwrap();
            assert_eq!(scenario.name, *name);
            assert!(!scenario.plan.expectations.is_empty());
        }
        assert!(get_scenario(" SMOKE ").is_some());
        assert!(get_scenario("nope").is_none());
    }
}
