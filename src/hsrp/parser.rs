// ABOUTME: Line-oriented parser for "show standby brief" router output
// ABOUTME: Extracts group -> state pairs from seven-column rows and ignores everything else

use super::types::ObservedStates;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// interface group priority state active-addr standby-addr virtual-addr
const FIELD_COUNT: usize = 7;
const GROUP_FIELD: usize = 1;
const STATE_FIELD: usize = 3;

/// Parse a captured output file. Only reading the file can fail.
pub fn parse_standby_brief_file(path: &Path) -> Result<ObservedStates> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read captured output: {}", path.display()))?;

    Ok(parse_standby_brief(&content))
}

/// Build the group -> lowercase state mapping. Lines that are not exactly
/// seven whitespace-separated tokens are skipped; a later row for the same
/// group replaces an earlier one.
pub fn parse_standby_brief(output: &str) -> ObservedStates {
    let mut states = ObservedStates::new();

    for line in output.lines() {
        match parse_line(line) {
            Some((group, state)) => {
                states.insert(group, state);
            }
            None => {
                if !line.trim().is_empty() {
                    tracing::debug!("Skipping non-status line: {:?}", line);
                }
            }
        }
    }

    states
}

pub fn parse_line(line: &str) -> Option<(String, String)> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != FIELD_COUNT {
        return None;
    }

    Some((fields[GROUP_FIELD].to_string(), fields[STATE_FIELD].to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "
                     P indicates configured to preempt.
                     |
Interface   Grp  Pri P State   Active          Standby         Virtual IP
Gi0/1       1    110   Active  local           10.0.0.2        10.0.0.254
Gi0/2       2    90    Standby 10.0.1.1        local           10.0.1.254
Vl30        30   100   Init    unknown         unknown         10.0.30.254
";

    #[test]
    fn test_parse_single_line() {
        let states = parse_standby_brief("Gi0/1 1 110 Active 10.0.0.1 10.0.0.2 10.0.0.254");

        assert_eq!(states.len(), 1);
        assert_eq!(states.get("1").map(String::as_str), Some("active"));
    }

    #[test]
    fn test_parse_device_output_with_banner() {
        let states = parse_standby_brief(SAMPLE);

        assert_eq!(states.len(), 3);
        assert_eq!(states["1"], "active");
        assert_eq!(states["2"], "standby");
        assert_eq!(states["30"], "init");
    }

    #[test]
    fn test_group_kept_verbatim() {
        let states = parse_standby_brief("Gi0/1 01 110 Speak 10.0.0.1 10.0.0.2 10.0.0.254");

        assert!(states.contains_key("01"));
        assert!(!states.contains_key("1"));
        assert_eq!(states["01"], "speak");
    }

    #[test]
    fn test_last_line_wins() {
        let content = "Gi0/1 1 110 Active 10.0.0.1 10.0.0.2 10.0.0.254
Gi0/3 1 100 Listen 10.0.0.1 10.0.0.2 10.0.0.254";

        let states = parse_standby_brief(content);

        assert_eq!(states.len(), 1);
        assert_eq!(states["1"], "listen");
    }

    #[test]
    fn test_wrong_field_counts_are_skipped() {
        // Eight tokens: preempt flag present
        assert_eq!(parse_line("Gi0/1 1 110 P Active local 10.0.0.2 10.0.0.254"), None);
        // Six tokens: truncated row
        assert_eq!(parse_line("Gi0/1 1 110 Active local 10.0.0.2"), None);
        assert_eq!(parse_line(""), None);
    }

    #[test]
    fn test_tabs_and_leading_whitespace() {
        assert_eq!(
            parse_line("  Gi0/1\t4\t100\tSTANDBY\t10.0.0.1\tlocal\t10.0.0.254  "),
            Some(("4".to_string(), "standby".to_string()))
        );
    }

    #[test]
    fn test_empty_and_garbage_input() {
        assert!(parse_standby_brief("").is_empty());
        assert!(parse_standby_brief("% Ambiguous command: \"show standby\"\n\n").is_empty());
    }

    #[test]
    fn test_seven_token_error_line_is_not_filtered() {
        // Only the token count is checked, so a seven-word error line still matches
        let states = parse_standby_brief("% Invalid input detected at '^' marker.");

        assert_eq!(states.len(), 1);
        assert_eq!(states["Invalid"], "input");
    }

    #[test]
    fn test_parse_is_deterministic() {
        assert_eq!(parse_standby_brief(SAMPLE), parse_standby_brief(SAMPLE));
    }

    #[test]
    fn test_parse_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let states = parse_standby_brief_file(file.path()).unwrap();
        assert_eq!(states["2"], "standby");
    }

    #[test]
    fn test_parse_missing_file() {
        let result = parse_standby_brief_file(Path::new("/nonexistent/capture.txt"));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Failed to read captured output"));
    }
}
