use clap::Args;
use serde_json::json;

use super::{open_preferences, CmdResult};

#[derive(Args)]
pub struct StatsArgs {
    /// Print as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: StatsArgs) -> CmdResult {
    let prefs = open_preferences()?;
    let count = prefs.pomodoro_count();

    if args.json {
        let stats = json!({ "pomodoro_count": count });
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("completed pomodoros: {count}");
    }
    Ok(())
}
