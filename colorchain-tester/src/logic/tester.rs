use colored::Colorize;
use colorchain_game::{GameEngine, ProfileStore};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::common::scenario::TestScenario;
use crate::logic::simulation::{SimulationPlan, SimulationSummary, run_plan};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub seed: u64,
    pub passed: bool,
    pub iterations_run: usize,
    pub successful_iterations: usize,
    pub failures: Vec<String>,
    /// Highest level reached across iterations.
    pub best_level: u32,
    pub best_score: u64,
    #[serde(with = "duration_serde")]
    pub average_duration: Duration,
    #[serde(with = "duration_vec_serde")]
    pub performance_data: Vec<Duration>,
}

pub struct LogicTester<S: ProfileStore + Clone> {
    engine: GameEngine<S>,
    verbose: bool,
}

impl<S: ProfileStore + Clone> LogicTester<S> {
    pub const fn new(engine: GameEngine<S>, verbose: bool) -> Self {
        Self { engine, verbose }
    }

    pub fn run_scenario(
        &self,
        scenario: &TestScenario,
        seeds: &[u64],
        iterations: usize,
    ) -> Vec<ScenarioResult> {
        let mut results = Vec::new();

        for &seed in seeds {
            if self.verbose {
                println!(
                    "🧪 Testing scenario: {} (strategy: {} seed: {})",
                    scenario.name.bright_white(),
                    scenario.plan.strategy,
                    seed
                );
            }

            results.push(self.run_single_scenario(scenario, seed, iterations));
        }

        results
    }

    fn run_single_scenario(
        &self,
        scenario: &TestScenario,
        seed: u64,
        iterations: usize,
    ) -> ScenarioResult {
        let mut successes = 0;
        let mut failures = Vec::new();
        let mut performance_data = Vec::new();
        let mut best_level = 0;
        let mut best_score = 0;

        for i in 0..iterations {
            let start_time = Instant::now();
            let iteration_seed = seed.wrapping_add(u64::try_from(i).unwrap_or(u64::MAX));
            let summary = run_plan(&self.engine, &scenario.plan, iteration_seed);
            best_level = best_level.max(summary.final_level);
            best_score = best_score.max(summary.score);

            let verdict = evaluate_expectations(&scenario.plan, &summary)
                .or_else(|| self.check_determinism(&scenario.plan, &summary));

            if let Some(err) = verdict {
                failures.push(format!(
                    "Iteration {} (strategy {}, seed {}, level {}, score {}, twists [{}]): {}",
                    i + 1,
                    summary.strategy,
                    summary.seed,
                    summary.final_level,
                    summary.score,
                    summary.twists.join(", "),
                    err
                ));
                if self.verbose {
                    println!(
                        "  ❌ Iteration {}/{} failed: {}",
                        i + 1,
                        iterations,
                        err.red()
                    );
                }
            } else {
                successes += 1;
                let duration = start_time.elapsed();
                performance_data.push(duration);

                if self.verbose {
                    println!(
                        "  ✅ Iteration {}/{} passed ({duration:?}) level:{} score:{} replays:{}",
                        i + 1,
                        iterations,
                        summary.final_level,
                        summary.score,
                        summary.replays
                    );
                }
            }
        }

        let average_duration = if performance_data.is_empty() {
            Duration::ZERO
        } else {
            performance_data.iter().sum::<Duration>()
                / u32::try_from(performance_data.len()).unwrap_or(1)
        };

        ScenarioResult {
            scenario_name: scenario.name.clone(),
            seed,
            passed: failures.is_empty(),
            iterations_run: iterations,
            successful_iterations: successes,
            failures,
            best_level,
            best_score,
            average_duration,
            performance_data,
        }
    }

    fn check_determinism(
        &self,
        plan: &SimulationPlan,
        summary: &SimulationSummary,
    ) -> Option<String> {
        if !plan.verify_determinism {
            return None;
        }
        let rerun = run_plan(&self.engine, plan, summary.seed);
        (rerun.fingerprint != summary.fingerprint).then(|| {
            format!(
                "event stream diverged on rerun: {:016x} vs {:016x}",
                summary.fingerprint, rerun.fingerprint
            )
        })
    }
}

fn evaluate_expectations(plan: &SimulationPlan, summary: &SimulationSummary) -> Option<String> {
    for expectation in &plan.expectations {
        if let Err(err) = expectation(summary) {
            return Some(err.to_string());
        }
    }
    None
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_millis().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u128::deserialize(deserializer)?;
        Ok(Duration::from_millis(u64::try_from(millis).unwrap_or(0)))
    }
}

mod duration_vec_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(durations: &[Duration], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let millis: Vec<u128> = durations.iter().map(Duration::as_millis).collect();
        millis.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis_vec = Vec::<u128>::deserialize(deserializer)?;
        Ok(millis_vec
            .into_iter()
            .map(|m| Duration::from_millis(u64::try_from(m).unwrap_or(0)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::scenario::get_scenario;
    use colorchain_game::MemoryProfiles;

    fn tester() -> LogicTester<MemoryProfiles> {
        LogicTester::new(GameEngine::new(MemoryProfiles::new()), false)
    }

    #[test]
    fn smoke_passes_for_several_seeds() {
        let scenario = get_scenario("smoke").unwrap();
        let results = tester().run_scenario(&scenario, &[1, 2], 2);
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.passed), "{results:?}");
        assert!(results.iter().all(|r| r.best_level == 11));
    }

    #[test]
    fn failing_expectation_is_reported() {
        let mut scenario = get_scenario("smoke").unwrap();
        scenario.plan = scenario
            .plan
            .expect(|_| Err(anyhow::anyhow!("always wrong")));
        let results = tester().run_scenario(&scenario, &[5], 1);
        assert!(!results[0].passed);
        assert!(results[0].failures[0].contains("always wrong"));
        assert_eq!(results[0].successful_iterations, 0);
    }

    #[test]
    fn determinism_scenario_passes() {
        let scenario = get_scenario("determinism").unwrap();
        let results = tester().run_scenario(&scenario, &[31], 1);
        assert!(results[0].passed, "{:?}", results[0].failures);
    }

    #[test]
    fn result_serializes_durations_as_millis() {
        let result = ScenarioResult {
            scenario_name: "smoke".to_string(),
            seed: 1,
            passed: true,
            iterations_run: 1,
            successful_iterations: 1,
            failures: Vec::new(),
            best_level: 11,
            best_score: 875,
            average_duration: Duration::from_millis(12),
            performance_data: vec![Duration::from_millis(12)],
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["average_duration"], 12);
        assert_eq!(json["performance_data"][0], 12);
    }
}
