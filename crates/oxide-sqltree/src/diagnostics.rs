//! ASCII rendering of an error location inside the SQL it came from.

const INDENT: &str = "   ";
const MARK_LEFT: &str = " → ";
const MARK_RIGHT: &str = " ← ";
const ARROW_DOWN: char = '↓';
const ARROW_UP: char = '↑';

/// Renders `sql` with the offending line marked and arrows pointing at
/// `offset` within `line`.
///
/// ```
/// use oxide_sqltree::diagnostics::ascii_location_dump;
///
/// let dump = ascii_location_dump("SELECT foo\nFROM bar", 1, 6);
/// assert!(dump.contains(" → FROM bar ← "));
/// ```
///
/// Every line is indented by three columns except the offending one, which
/// carries the markers. Line widths are compared in bytes, so the marker
/// arrows count as wider than the plain indent.
#[must_use]
pub fn ascii_location_dump(sql: &str, line: usize, offset: usize) -> String {
    let lines: Vec<&str> = sql.split('\n').collect();
    let width = lines
        .iter()
        .map(|l| INDENT.len() + l.len())
        .max()
        .unwrap_or(INDENT.len());
    let pointer = " ".repeat(INDENT.len() + offset);

    let mut out = Vec::with_capacity(lines.len() + 4);
    out.push(String::new());
    out.push(format!("{pointer}{ARROW_DOWN}"));
    for (index, text) in lines.iter().enumerate() {
        if index == line {
            let marked = format!("{MARK_LEFT}{text}");
            let pad = " ".repeat(width.saturating_sub(marked.len()));
            out.push(format!("{marked}{pad}{MARK_RIGHT}"));
        } else {
            out.push(format!("{INDENT}{text}"));
        }
    }
    out.push(format!("{pointer}{ARROW_UP}"));
    out.push(String::new());
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_line_dump() {
        let expected = "\n         ↓\n   SELECT foo\n → FROM bar ← \n         ↑\n";
        assert_eq!(ascii_location_dump("SELECT foo\nFROM bar", 1, 6), expected);
    }

    #[test]
    fn test_single_line_dump() {
        let expected = "\n   ↓\n → SELECT @ ← \n   ↑\n";
        assert_eq!(ascii_location_dump("SELECT @", 0, 0), expected);
    }

    #[test]
    fn test_short_offending_line_is_padded() {
        let dump = ascii_location_dump("SELECT a, b, c\nFROM t", 1, 0);
        let marked = dump.lines().find(|l| l.starts_with(" → ")).unwrap();
        assert_eq!(marked, format!(" → FROM t{}← ", " ".repeat(7)));
    }

    #[test]
    fn test_line_out_of_range_still_renders() {
        let dump = ascii_location_dump("SELECT", 4, 2);
        assert!(dump.contains("   SELECT"));
        assert!(!dump.contains('→'));
    }
}
