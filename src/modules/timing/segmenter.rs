use lazy_static::lazy_static;
use log::trace;
use regex::Regex;

lazy_static! {
    static ref DECIMAL_RE: Regex = Regex::new(r"\d+\.\d+").unwrap();
    static ref LETTERS_RE: Regex = Regex::new(r"[a-zA-Z]").unwrap();
}

/// a line holds lap timing when it has a lap time, a decimal and is not a page footer
pub fn is_lap_line(line: &str) -> bool {
    line.contains('\'') && !line.contains("Page") && DECIMAL_RE.is_match(line)
}

/// trim blanks and asterisks, then drop every letter
pub fn clean_lap_line(line: &str) -> String {
    let trimmed = line.trim_matches(|c| c == ' ' || c == '*');
    LETTERS_RE.replace_all(trimmed, "").into_owned()
}

/// # split merged lap line
/// a line with exactly two apostrophes holds two laps. the second lap starts at the
/// minutes digit right before the second apostrophe.
///
/// ## Returns
/// * `Vec<String>` - one or two lap lines
pub fn split_merged_line(line: &str) -> Vec<String> {
    let quotes: Vec<usize> = line
        .char_indices()
        .enumerate()
        .filter(|(_, (_, c))| *c == '\'')
        .map(|(char_index, _)| char_index)
        .collect();

    if quotes.len() != 2 {
        return vec![line.to_string()];
    }

    // byte offset of the character right before the second apostrophe
    let split_at = match line.char_indices().nth(quotes[1] - 1) {
        Some((offset, _)) => offset,
        None => return vec![line.to_string()],
    };

    trace!(target: "timing/segmenter", "splitting merged line '{}' at {}", line, split_at);
    vec![line[..split_at].to_string(), line[split_at..].to_string()]
}

/// # segment lap lines
/// pick the lap timing lines out of the sheet text, cleaned and with merged
/// lines split, in the order they appear
///
/// ## Arguments
/// * `text` - the text extracted from the analysis sheet
///
/// ## Returns
/// * `Vec<String>` - candidate lap lines
pub fn segment_lap_lines(text: &str) -> Vec<String> {
    text.lines()
        .filter(|line| is_lap_line(line))
        .flat_map(|line| split_merged_line(&clean_lap_line(line)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_lap_line_passes_unchanged() {
        let line = "1'39.894 1 28.123 31.456 25.210 312.4 15.005";
        assert_eq!(segment_lap_lines(line), vec![line.to_string()]);
    }

    #[test]
    fn merged_line_splits_before_second_minutes_digit() {
        let line = "1'39.8941'40.112";
        assert_eq!(line.find('\'').unwrap(), 1);
        assert_eq!(line.rfind('\'').unwrap(), 9);
        assert_eq!(split_merged_line(line), vec!["1'39.894", "1'40.112"]);
    }

    #[test]
    fn merged_line_with_fields_splits_at_second_quote_minus_one() {
        let line = "1'39.894 1 28.1 1'40.112 2 28.3";
        let second = line.rfind('\'').unwrap();
        let parts = split_merged_line(line);
        assert_eq!(parts[0], line[..second - 1]);
        assert_eq!(parts[1], line[second - 1..]);
        assert_eq!(parts[1], "1'40.112 2 28.3");
    }

    #[test]
    fn classification_of_lines() {
        assert!(is_lap_line("1'39.894 1 28.123"));
        assert!(!is_lap_line("Page 2 of 14 1'39.894 1.2"));
        assert!(!is_lap_line("Francesco BAGNAIA 1.2"));
        assert!(!is_lap_line("Runs 1' no decimals 12"));
    }

    #[test]
    fn cleanup_trims_asterisks_and_letters() {
        assert_eq!(clean_lap_line(" * 1'39.894 P 1 28.123 *"), "1'39.894  1 28.123");
    }

    #[test]
    fn three_quotes_pass_through() {
        let line = "1'39.894 1'40.112 1'41.000";
        assert_eq!(split_merged_line(line), vec![line.to_string()]);
    }

    #[test]
    fn sheet_order_is_kept() {
        let text = "Francesco BAGNAIA\n\
                    1'40.000 1 28.0 31.0 25.0 310.0 16.0\n\
                    Page 1 of 2\n\
                    1'39.0001'39.500 3 28.0 31.0 25.0 311.0 15.5\n";

        assert_eq!(
            segment_lap_lines(text),
            vec![
                "1'40.000 1 28.0 31.0 25.0 310.0 16.0",
                "1'39.000",
                "1'39.500 3 28.0 31.0 25.0 311.0 15.5",
            ]
        );
    }
}
