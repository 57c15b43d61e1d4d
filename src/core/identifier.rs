/*
 * Extraction of the 6-digit identifier from folder names. A folder name
 * carries an identifier when it contains a stand-alone run of exactly six
 * decimal digits; digits embedded in a longer run do not count (a folder
 * named "1234567" has no identifier even though "123456" occurs inside it).
 * At most one identifier is extracted per name: the leftmost qualifying run.
 */
use once_cell::sync::Lazy;
use regex::Regex;

static DIGIT_RUNS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+").expect("digit-run pattern is valid"));

/*
 * Returns the identifier contained in `folder_name`, if any.
 * Scans the name's maximal digit runs left to right and returns the first
 * one of exactly six digits. Runs of any other length are skipped, so the
 * identifier can never be a substring of a longer digit run.
 */
pub fn extract_identifier(folder_name: &str) -> Option<&str> {
    DIGIT_RUNS
        .find_iter(folder_name)
        .map(|m| m.as_str())
        .find(|run| run.len() == 6)
}
