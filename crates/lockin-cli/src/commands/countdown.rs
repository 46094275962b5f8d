use chrono::Local;
use clap::Args;
use lockin_core::deadline::{next_deadline, parse_deadline, parse_deadline_time};
use lockin_core::{Countdown, GoalInterval};
use serde_json::json;

#[derive(Args)]
pub struct CountdownArgs {
    /// Deadline timestamp (RFC 3339, "YYYY-MM-DD HH:MM[:SS]" or a date)
    #[arg(required_unless_present = "interval")]
    deadline: Option<String>,
    /// Compute the next deadline for this interval instead
    #[arg(long, conflicts_with = "deadline", requires = "time")]
    interval: Option<String>,
    /// Daily deadline time used with --interval (HH:mm[:ss])
    #[arg(long)]
    time: Option<String>,
    /// Evaluate at this instant instead of the current time
    #[arg(long)]
    now: Option<String>,
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: CountdownArgs) -> Result<(), Box<dyn std::error::Error>> {
    let now = match &args.now {
        Some(raw) => parse_deadline(raw, &Local)?,
        None => Local::now(),
    };

    let (due, countdown) = match (&args.deadline, &args.interval, &args.time) {
        (Some(raw), _, _) => {
            let due = parse_deadline(raw, &Local)?;
            (due, Countdown::from_remaining(due - now))
        }
        (None, Some(interval), Some(time)) => {
            let interval: GoalInterval = interval.parse()?;
            let due = next_deadline(interval, parse_deadline_time(time)?, &now)?;
            (due, Countdown::from_remaining(due - now))
        }
        _ => return Err("either a deadline or --interval with --time is required".into()),
    };

    if args.json {
        let out = json!({
            "deadline": due.to_rfc3339(),
            "text": countdown.text,
            "urgent": countdown.urgent,
            "overdue": countdown.overdue,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else if countdown.urgent && !countdown.overdue {
        println!("{} (urgent)", countdown.text);
    } else {
        println!("{}", countdown.text);
    }
    Ok(())
}
