use chrono::NaiveDate;
use colored::*;
use diary_backend::{
    config::Config,
    domain::services::entry_service::cleanup_cutoff,
    infra::factory::bootstrap_state,
};
use std::process::ExitCode;

const USAGE: &str = "usage: clean_entries [--before YYYY-MM-DD] [--age YEARS]";

struct Args {
    age: u32,
    before: Option<NaiveDate>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut parsed = Args { age: 0, before: None };
    while let Some(flag) = args.next() {
        let value = args.next().ok_or_else(|| format!("missing value for {}", flag))?;
        match flag.as_str() {
            "-a" | "--age" => {
                parsed.age = value.parse().map_err(|_| format!("invalid age: {}", value))?;
            }
            "-b" | "--before" => {
                let date = NaiveDate::parse_from_str(&value, "%Y-%m-%d")
                    .map_err(|_| format!("invalid date: {}", value))?;
                parsed.before = Some(date);
            }
            other => return Err(format!("unknown option: {}", other)),
        }
    }
    Ok(parsed)
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_target(false).init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{}\n{}", msg.red(), USAGE);
            return ExitCode::FAILURE;
        }
    };

    let config = Config::from_env();
    let today = config.diary.local_now().date();
    let cutoff = match cleanup_cutoff(today, args.age, args.before) {
        Ok(cutoff) => cutoff,
        Err(e) => {
            eprintln!("{}", e.to_string().red().bold());
            return ExitCode::FAILURE;
        }
    };

    let state = bootstrap_state(&config).await;
    match state.entry_service.cleanup_before(cutoff).await {
        Ok(deleted) => {
            println!("{}", format!("Deleted {} entries dated before {}", deleted, cutoff).green());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e.to_string().red().bold());
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn test_parse_args() {
        let parsed = parse_args(args(&["--age", "2", "-b", "2020-05-01"])).unwrap();
        assert_eq!(parsed.age, 2);
        assert_eq!(parsed.before, NaiveDate::from_ymd_opt(2020, 5, 1));

        assert!(parse_args(args(&["--before"])).is_err());
        assert!(parse_args(args(&["--before", "yesterday"])).is_err());
        assert!(parse_args(args(&["--verbose", "1"])).is_err());
    }
}
