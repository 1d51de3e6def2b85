//! Watch command handler
//!
//! Feeds position fixes from stdin into the tracker and prints alerts.
//! Each line is `lat,lng` or `lat,lng,accuracy`; a line reading `clear`
//! means the location was lost.

use crate::alert::ConsoleSink;
use crate::cli::open_tracker;
use crate::config::Config;
use crate::coord::UserPosition;
use crate::error::Result;
use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

/// Watch command arguments
#[derive(Args)]
pub struct WatchArgs {
    /// Only print transitions, not the pins being watched
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

/// One parsed input line
#[derive(Debug, Clone, PartialEq)]
pub enum WatchInput {
    Position(UserPosition),
    Clear,
}

/// Parse an input line; `None` for blank lines and `#` comments
pub fn parse_line(line: &str) -> Option<std::result::Result<WatchInput, String>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    if line.eq_ignore_ascii_case("clear") {
        return Some(Ok(WatchInput::Clear));
    }

    let parsed = line.parse::<UserPosition>().and_then(|position| {
        position
            .coords
            .validate()
            .map(|_| WatchInput::Position(position))
            .map_err(|e| e.to_string())
    });
    Some(parsed)
}

/// Run the watch command
pub async fn run(args: WatchArgs) -> Result<()> {
    let config = Config::load()?;
    let mut tracker = open_tracker(&config)?;
    tracker.subscribe(Box::new(ConsoleSink));

    if !args.quiet {
        println!("Watching {} pins. Reading positions from stdin...", tracker.len());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut fixes = 0usize;

    while let Some(line) = lines.next_line().await? {
        match parse_line(&line) {
            None => continue,
            Some(Ok(WatchInput::Position(position))) => {
                fixes += 1;
                let transitions = tracker.set_user_position(position);
                debug!(
                    "Fix {} at {}: {} transitions",
                    fixes,
                    position.coords,
                    transitions.len()
                );
            }
            Some(Ok(WatchInput::Clear)) => {
                tracker.clear_user_position();
                debug!("Position cleared");
            }
            Some(Err(e)) => warn!("Skipping line {:?}: {}", line, e),
        }
    }

    info!(
        "Input closed after {} fixes, {} alerts active",
        fixes,
        tracker.active_alerts().len()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_position() {
        assert_eq!(
            parse_line("40.7128,-74.0060"),
            Some(Ok(WatchInput::Position(UserPosition::at(40.7128, -74.0060))))
        );
    }

    #[test]
    fn test_parse_position_with_accuracy() {
        match parse_line(" 40.7128, -74.0060, 12.5 ") {
            Some(Ok(WatchInput::Position(position))) => assert_eq!(position.accuracy, 12.5),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_parse_clear() {
        assert_eq!(parse_line("clear"), Some(Ok(WatchInput::Clear)));
        assert_eq!(parse_line("CLEAR"), Some(Ok(WatchInput::Clear)));
    }

    #[test]
    fn test_parse_skips_blank_and_comments() {
        assert_eq!(parse_line(""), None);
        assert_eq!(parse_line("   "), None);
        assert_eq!(parse_line("# morning walk"), None);
    }

    #[test]
    fn test_parse_garbled() {
        assert!(matches!(parse_line("forty,seventy"), Some(Err(_))));
        assert!(matches!(parse_line("40.7"), Some(Err(_))));
        assert!(matches!(parse_line("1,2,3,4"), Some(Err(_))));
    }

    #[test]
    fn test_parse_out_of_range() {
        assert!(matches!(parse_line("95.0,10.0"), Some(Err(_))));
    }
}
