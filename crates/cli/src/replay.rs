//! Replays recorded pool snapshots through a policy.

use anyhow::{Context, Result};
use clmm_lp_domain::{Position, TickRange};
use clmm_lp_policies::prelude::*;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::info;

/// Outcome of one replayed step.
#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    /// Step number of the snapshot.
    pub step: u64,
    /// Stage after the step.
    pub stage: LifecycleStage,
    /// Range of the position held after the step.
    pub held_range: Option<TickRange>,
    /// Actions emitted.
    pub actions: Vec<PolicyAction>,
    /// Signals computed.
    pub signals: Vec<Signal>,
}

/// End-of-run summary.
#[derive(Debug, Clone, Serialize)]
pub struct ReplaySummary {
    /// Policy name.
    pub policy: &'static str,
    /// Number of snapshots replayed.
    pub steps: usize,
    /// Stage after the last step.
    pub final_stage: LifecycleStage,
    /// Rebalancing trades.
    pub swap_count: u64,
    /// Rebalancing volume, in token0.
    pub swap_volume: Decimal,
    /// Positions opened.
    pub positions_opened: usize,
    /// Positions withdrawn.
    pub positions_withdrawn: usize,
    /// Signals of the last step.
    pub last_signals: Vec<Signal>,
}

/// A finished replay.
#[derive(Debug, Clone, Serialize)]
pub struct Replay {
    /// Per-step results.
    pub steps: Vec<StepReport>,
    /// Lifecycle transitions, one per step.
    pub events: Vec<TransitionEvent>,
    /// Summary.
    pub summary: ReplaySummary,
}

/// Reads a JSON array of snapshots.
pub fn load_snapshots(path: &Path) -> Result<Vec<PoolSnapshot>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read snapshots from {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse snapshots in {}", path.display()))
}

/// Reads an optional JSON policy config, falling back to the default.
pub fn load_config<T>(path: Option<&Path>) -> Result<T>
where
    T: serde::de::DeserializeOwned + Default,
{
    let Some(path) = path else {
        return Ok(T::default());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config from {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse config in {}", path.display()))
}

/// Calls `policy` once per snapshot, in order.
///
/// Stops at the first failing step.
pub fn run(policy: &mut dyn Policy, snapshots: &[PoolSnapshot]) -> Result<Replay> {
    info!(policy = policy.name(), snapshots = snapshots.len(), "Starting replay");

    let mut steps = Vec::with_capacity(snapshots.len());
    for snapshot in snapshots {
        let actions = policy
            .predict(snapshot)
            .with_context(|| format!("policy failed at step {}", snapshot.step))?;
        steps.push(StepReport {
            step: snapshot.step,
            stage: policy.state().stage(),
            held_range: policy.state().position().map(Position::range),
            actions,
            signals: policy.last_signals().to_vec(),
        });
    }

    let summary = ReplaySummary {
        policy: policy.name(),
        steps: steps.len(),
        final_stage: policy.state().stage(),
        swap_count: policy.stats().swap_count(),
        swap_volume: policy.stats().swap_volume(),
        positions_opened: policy.events().investment_count(),
        positions_withdrawn: policy.events().withdrawal_count(),
        last_signals: policy.last_signals().to_vec(),
    };
    info!(
        final_stage = %summary.final_stage,
        swap_count = summary.swap_count,
        "Replay finished"
    );

    Ok(Replay {
        steps,
        events: policy.events().events().to_vec(),
        summary,
    })
}

/// Renders a replay as plain text.
pub fn render_text(replay: &Replay) -> String {
    let mut out = String::new();
    for report in &replay.steps {
        let held = report
            .held_range
            .map_or_else(|| "-".to_string(), |range| range.to_string());
        let prefix = format!(
            "step {:>5} | {:<10} | {:<20}",
            report.step, report.stage, held
        );
        if report.actions.is_empty() {
            out.push_str(&format!("{prefix} | -\n"));
        }
        for action in &report.actions {
            out.push_str(&format!("{prefix} | {action}\n"));
        }
    }

    let summary = &replay.summary;
    out.push_str(&format!("\n{} summary\n", summary.policy));
    out.push_str(&format!("{}\n", "=".repeat(40)));
    out.push_str(&format!("Steps:               {}\n", summary.steps));
    out.push_str(&format!("Final stage:         {}\n", summary.final_stage));
    out.push_str(&format!("Swap count:          {}\n", summary.swap_count));
    out.push_str(&format!("Swap volume:         {}\n", summary.swap_volume));
    out.push_str(&format!("Positions opened:    {}\n", summary.positions_opened));
    out.push_str(&format!("Positions withdrawn: {}\n", summary.positions_withdrawn));
    for signal in &summary.last_signals {
        out.push_str(&format!("  {signal}\n"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use clmm_lp_domain::{PoolId, PositionId, PositionInfo, TokenPair};
    use rust_decimal_macros::dec;

    fn snapshot(step: u64, active: (i32, i32), wallet: (Decimal, Decimal)) -> PoolSnapshot {
        PoolSnapshot::new(step)
            .with_pool(PoolState::new(
                "A/B",
                TokenPair::new("A", "B"),
                10,
                TickRange::new(active.0, active.1).unwrap(),
                dec!(1),
            ))
            .with_balance("A", wallet.0)
            .with_balance("B", wallet.1)
    }

    fn position() -> PositionInfo {
        PositionInfo {
            id: PositionId(1),
            pool: PoolId::from("A/B"),
            range: TickRange::new(80, 220).unwrap(),
            liquidity: 42,
            amount0: dec!(500),
            amount1: dec!(500),
            fees0: dec!(1),
            fees1: dec!(1),
        }
    }

    #[test]
    fn test_replay_active_cycle() {
        let snapshots = vec![
            snapshot(0, (100, 200), (dec!(1000), dec!(0))),
            snapshot(1, (100, 200), (dec!(500), dec!(500))),
            snapshot(2, (150, 160), (dec!(0), dec!(0))).with_position(position()),
            snapshot(3, (230, 240), (dec!(0), dec!(0))).with_position(position()),
            snapshot(4, (230, 240), (dec!(500), dec!(500))).with_position(position()),
        ];
        let mut policy = ActiveConcentratedLp::without_telemetry(ActiveLpConfig::new(2)).unwrap();

        let replay = run(&mut policy, &snapshots).unwrap();

        let stages: Vec<LifecycleStage> = replay.steps.iter().map(|s| s.stage).collect();
        assert_eq!(
            stages,
            vec![
                LifecycleStage::Rebalanced,
                LifecycleStage::Invested,
                LifecycleStage::Invested,
                LifecycleStage::Withdrawn,
                LifecycleStage::Collected,
            ]
        );
        assert!(replay.steps[2].actions.is_empty());
        assert_eq!(replay.steps[0].held_range, None);
        assert_eq!(
            replay.steps[2].held_range,
            Some(TickRange::new(80, 220).unwrap())
        );
        assert_eq!(replay.events.len(), 5);
        assert!(replay.events[2].is_self_loop());
        assert_eq!(replay.summary.positions_opened, 1);
        assert_eq!(replay.summary.positions_withdrawn, 1);
        assert_eq!(replay.summary.swap_count, 1);

        let text = render_text(&replay);
        assert!(text.contains("withdraw 42 liquidity from #1"));
        assert!(text.contains("[80, 220]"));
        assert!(text.contains("Final stage:         COLLECTED"));
    }

    #[test]
    fn test_replay_stops_at_failing_step() {
        let snapshots = vec![
            snapshot(0, (100, 200), (dec!(1000), dec!(0))),
            snapshot(1, (100, 200), (dec!(500), dec!(500))),
            snapshot(2, (300, 310), (dec!(0), dec!(0))),
        ];
        let mut policy = ActiveConcentratedLp::without_telemetry(ActiveLpConfig::new(2)).unwrap();

        let err = run(&mut policy, &snapshots).unwrap_err();
        assert_eq!(err.to_string(), "policy failed at step 2");
        assert!(matches!(
            err.downcast_ref::<PolicyError>(),
            Some(PolicyError::MissingPosition)
        ));
    }

    #[test]
    fn test_replay_serializes_to_json() {
        let snapshots = vec![snapshot(0, (100, 200), (dec!(10), dec!(10)))];
        let mut policy =
            ActiveConcentratedLp::without_telemetry(ActiveLpConfig::default()).unwrap();
        let replay = run(&mut policy, &snapshots).unwrap();

        let json = serde_json::to_value(&replay).unwrap();
        assert_eq!(json["steps"][0]["stage"], "Rebalanced");
        assert_eq!(json["steps"][0]["actions"][0]["type"], "trade_to_tick_range");
        assert_eq!(json["steps"][0]["held_range"], serde_json::Value::Null);
        assert_eq!(json["events"][0]["to"], "Rebalanced");
        assert_eq!(json["summary"]["policy"], "Active Concentrated LP");
    }

    #[test]
    fn test_replay_demo_file() {
        let snapshots: Vec<PoolSnapshot> =
            serde_json::from_str(include_str!("../../../demos/active_cycle.json")).unwrap();
        let mut policy = ActiveConcentratedLp::without_telemetry(ActiveLpConfig::new(2)).unwrap();

        let replay = run(&mut policy, &snapshots).unwrap();

        assert_eq!(replay.summary.steps, 7);
        assert_eq!(replay.summary.final_stage, LifecycleStage::Rebalanced);
        assert_eq!(replay.summary.positions_withdrawn, 1);
        assert_eq!(replay.summary.swap_count, 1);
        // 0.5 WETH sold for 998.5 USDC at a price of 2000
        assert_eq!(replay.summary.swap_volume, dec!(0.00075));
    }

    #[test]
    fn test_load_config_defaults_without_file() {
        let config: PassiveLpConfig = load_config(None).unwrap();
        assert_eq!(config, PassiveLpConfig::default());
    }
}
