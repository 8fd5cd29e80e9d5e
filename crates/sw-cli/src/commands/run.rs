//! Run command implementation

use anyhow::{Context, Result};
use serde_yaml::Value;
use sw_engine::{MigrateError, RunContext};

use crate::cli::{GlobalArgs, RunArgs};
use crate::commands::common::build_migrator;

/// Execute the run command
pub async fn execute(args: &RunArgs, global: &GlobalArgs) -> Result<()> {
    let (config, migrator) = build_migrator(global)?;

    let mut ctx = RunContext::from_values(config.vars.clone());
    for (key, raw) in &args.vars {
        ctx = ctx.with_value(key.clone(), parse_var_value(raw));
    }

    match migrator.run(&ctx).await {
        Ok(report) if report.is_noop() => {
            println!("Nothing to apply; version is {}", report.version);
            Ok(())
        }
        Ok(report) => {
            for index in &report.applied {
                println!("  applied step {index}");
            }
            println!(
                "Applied {} step{}; version is now {}",
                report.applied.len(),
                if report.applied.len() == 1 { "" } else { "s" },
                report.version
            );
            Ok(())
        }
        Err(err) => {
            if let MigrateError::DirtyState { version } = &err {
                eprintln!(
                    "Step {version} failed in an earlier run. Fix its effects by hand, \
                     then clear the dirty flag in {}.",
                    config.state_table
                );
            }
            Err(err).context("Migration run failed")
        }
    }
}

/// Interpret `--var` values as YAML scalars so `18` reaches procedures as an integer.
fn parse_var_value(raw: &str) -> Value {
    match serde_yaml::from_str::<Value>(raw) {
        Ok(value @ (Value::Bool(_) | Value::Number(_) | Value::String(_))) => value,
        _ => Value::String(raw.to_string()),
    }
}
