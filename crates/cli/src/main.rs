//! Command line replay of concentrated-liquidity policies.
//!
//! Feeds a recorded JSON array of pool snapshots to a policy, one call per
//! snapshot, and prints the emitted actions and a run summary.

mod logging;
mod replay;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use clmm_lp_domain::PoolId;
use clmm_lp_policies::prelude::*;
use dotenv::dotenv;
use logging::{LogFormat, init_logging};
use replay::{Replay, load_config, load_snapshots, render_text};
use rust_decimal::Decimal;
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser, Debug)]
#[command(name = "clmm-lp-cli")]
#[command(about = "Replay pool snapshots through a liquidity provision policy", long_about = None)]
struct Cli {
    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value_t = LogFormat::Pretty,
        env = "CLMM_LP_LOG_FORMAT",
        global = true
    )]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct ReplayArgs {
    /// JSON file holding an array of pool snapshots
    #[arg(short, long, env = "CLMM_LP_SNAPSHOTS")]
    snapshots: PathBuf,

    /// JSON file holding the policy config
    #[arg(short, long, env = "CLMM_LP_CONFIG")]
    config: Option<PathBuf>,

    /// Pool to provide into (defaults to the first pool of each snapshot)
    #[arg(long)]
    pool: Option<String>,

    /// Print per-step results as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Actively re-center liquidity around the pool price
    Active {
        #[command(flatten)]
        replay: ReplayArgs,

        /// Range padding per side, in tick spacings
        #[arg(short = 'w', long, env = "CLMM_LP_WIDTH")]
        lp_width: Option<u32>,

        /// Publish the impermanent-loss signal
        #[arg(long)]
        impermanent_loss: bool,
    },
    /// Provide once into a band around the spot price
    Passive {
        #[command(flatten)]
        replay: ReplayArgs,

        /// Lower bound as a multiple of the spot price (e.g. 0.95)
        #[arg(long)]
        lower_bound: Option<Decimal>,

        /// Upper bound as a multiple of the spot price (e.g. 1.05)
        #[arg(long)]
        upper_bound: Option<Decimal>,
    },
}

fn active_config(
    args: &ReplayArgs,
    lp_width: Option<u32>,
    impermanent_loss: bool,
) -> Result<ActiveLpConfig> {
    let mut config: ActiveLpConfig = load_config(args.config.as_deref())?;
    if let Some(pool) = &args.pool {
        config = config.with_pool(PoolId::new(pool.as_str()));
    }
    if let Some(width) = lp_width {
        config = config.with_lp_width(width);
    }
    if impermanent_loss {
        config = config.with_impermanent_loss(true);
    }
    Ok(config)
}

fn passive_config(
    args: &ReplayArgs,
    lower_bound: Option<Decimal>,
    upper_bound: Option<Decimal>,
) -> Result<PassiveLpConfig> {
    let mut config: PassiveLpConfig = load_config(args.config.as_deref())?;
    if let Some(pool) = &args.pool {
        config = config.with_pool(PoolId::new(pool.as_str()));
    }
    if let Some(bound) = lower_bound {
        config = config.with_lower_price_bound(bound);
    }
    if let Some(bound) = upper_bound {
        config = config.with_upper_price_bound(bound);
    }
    Ok(config)
}

fn print(replay: &Replay, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(replay)?);
    } else {
        print!("{}", render_text(replay));
    }
    Ok(())
}

fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.log_format, Level::INFO);

    match &cli.command {
        Commands::Active {
            replay: args,
            lp_width,
            impermanent_loss,
        } => {
            let config = active_config(args, *lp_width, *impermanent_loss)?;
            let snapshots = load_snapshots(&args.snapshots)?;
            let mut policy = ActiveConcentratedLp::new(config, TracingSink)?;
            let result = replay::run(&mut policy, &snapshots)?;
            print(&result, args.json)?;
        }
        Commands::Passive {
            replay: args,
            lower_bound,
            upper_bound,
        } => {
            let config = passive_config(args, *lower_bound, *upper_bound)?;
            let snapshots = load_snapshots(&args.snapshots)?;
            let mut policy = PassiveConcentratedLp::new(config, TracingSink)?;
            let result = replay::run(&mut policy, &snapshots)?;
            print(&result, args.json)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_active_flags() {
        let cli = Cli::try_parse_from([
            "clmm-lp-cli",
            "--log-format",
            "json",
            "active",
            "--snapshots",
            "run.json",
            "-w",
            "4",
            "--pool",
            "USDC/WETH",
            "--impermanent-loss",
        ])
        .unwrap();
        assert_eq!(cli.log_format, LogFormat::Json);

        let Commands::Active {
            replay,
            lp_width,
            impermanent_loss,
        } = cli.command
        else {
            panic!("expected the active subcommand");
        };
        let config = active_config(&replay, lp_width, impermanent_loss).unwrap();
        assert_eq!(
            config,
            ActiveLpConfig::new(4)
                .with_pool("USDC/WETH")
                .with_impermanent_loss(true)
        );
        assert!(!replay.json);
    }

    #[test]
    fn test_parse_passive_bounds() {
        let cli = Cli::try_parse_from([
            "clmm-lp-cli",
            "passive",
            "-s",
            "run.json",
            "--lower-bound",
            "0.9",
            "--json",
        ])
        .unwrap();

        let Commands::Passive {
            replay,
            lower_bound,
            upper_bound,
        } = cli.command
        else {
            panic!("expected the passive subcommand");
        };
        let config = passive_config(&replay, lower_bound, upper_bound).unwrap();
        assert_eq!(config.lower_price_bound, dec!(0.9));
        assert_eq!(config.upper_price_bound, dec!(1.05));
        assert!(replay.json);
    }

    #[test]
    fn test_snapshots_required() {
        assert!(Cli::try_parse_from(["clmm-lp-cli", "active"]).is_err());
    }
}
