//! LRC format parser
//!
//! Parses time-tagged lyrics as served by NetEase:
//! [mm:ss.xx]Lyrics line here
//!
//! Example:
//! [00:12.34]Hello world
//! [00:15.500]Another line
//!
//! The fractional part of a tag is read as a plain number and divided by 1000
//! whatever its width, so `.50` and `.500` are 0.05s and 0.5s respectively.

/// A single line of lyrics with timestamp
#[derive(Debug, Clone, PartialEq)]
pub struct LyricLine {
    /// Seconds from the start of the track
    pub time: f64,
    /// The lyrics text, trimmed and never empty
    pub text: String,
}

impl LyricLine {
    pub fn new(time: f64, text: String) -> Self {
        Self { time, text }
    }
}

/// Parsed lyrics plus the cursor used for next/previous lookups.
///
/// The cursor is `Some` whenever `lines` is non-empty and always points at a
/// valid line. Only [`LyricParser::active_line`] moves it.
#[derive(Debug, Clone, Default)]
pub struct LyricParser {
    lines: Vec<LyricLine>,
    cursor: Option<usize>,
}

impl LyricParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the held lyrics with the tag lines found in `content`.
    pub fn parse(&mut self, content: &str) {
        self.lines.clear();
        self.cursor = None;

        for raw in content.split('\n') {
            let Some((time, text)) = parse_tag_line(raw) else {
                continue;
            };
            let text = text.trim();
            if text.is_empty() {
                continue;
            }
            self.lines.push(LyricLine::new(time, text.to_string()));
        }

        // Stable, so equal timestamps keep their file order
        self.lines.sort_by(|a, b| a.time.total_cmp(&b.time));

        if !self.lines.is_empty() {
            self.cursor = Some(0);
        }
        tracing::debug!(lines = self.lines.len(), "parsed lyrics");
    }

    /// Drop the held lyrics.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.cursor = None;
    }

    /// Text of the line active at `current_time` (seconds).
    ///
    /// A line is active from its own timestamp until the next line starts; the
    /// last line stays active until the end. Returns `None` before the first
    /// line, leaving the cursor where it was.
    pub fn active_line(&mut self, current_time: f64) -> Option<&str> {
        let after = self.lines.partition_point(|l| l.time <= current_time);
        if after == 0 {
            return None;
        }
        let index = after - 1;
        self.cursor = Some(index);
        Some(self.lines[index].text.as_str())
    }

    /// Line right after the cursor.
    pub fn next_line(&self) -> Option<&str> {
        let cursor = self.cursor?;
        self.lines.get(cursor + 1).map(|l| l.text.as_str())
    }

    /// Line right before the cursor.
    pub fn previous_line(&self) -> Option<&str> {
        let cursor = self.cursor?;
        let index = cursor.checked_sub(1)?;
        self.lines.get(index).map(|l| l.text.as_str())
    }

    pub fn lines(&self) -> &[LyricLine] {
        &self.lines
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.lines.len()
    }
}

/// Split `[mm:ss.xx]text` (two or three fractional digits) into seconds and
/// the remaining text. Anything else is not a tag line.
fn parse_tag_line(line: &str) -> Option<(f64, &str)> {
    let rest = line.strip_prefix('[')?;
    let (tag, text) = rest.split_once(']')?;
    let (minutes, rest) = tag.split_once(':')?;
    let (seconds, fraction) = rest.split_once('.')?;

    if !is_digits(minutes, 2..=2) || !is_digits(seconds, 2..=2) || !is_digits(fraction, 2..=3) {
        return None;
    }

    let minutes: f64 = minutes.parse().ok()?;
    let seconds: f64 = seconds.parse().ok()?;
    let fraction: f64 = fraction.parse().ok()?;
    Some((minutes * 60.0 + seconds + fraction / 1000.0, text))
}

fn is_digits(s: &str, len: std::ops::RangeInclusive<usize>) -> bool {
    len.contains(&s.len()) && s.bytes().all(|b| b.is_ascii_digit())
}

/// Format seconds back into a `[mm:ss.xx]` tag for display.
pub fn format_timestamp(time: f64) -> String {
    let centis = (time.max(0.0) * 100.0).round() as u64;
    let min = centis / 6000;
    let sec = (centis % 6000) / 100;
    let cs = centis % 100;
    format!("[{:02}:{:02}.{:02}]", min, sec, cs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(content: &str) -> LyricParser {
        let mut p = LyricParser::new();
        p.parse(content);
        p
    }

    fn abc() -> LyricParser {
        parsed("[00:00.00]A\n[00:10.00]B\n[00:20.00]C")
    }

    #[test]
    fn test_parse_tag_line() {
        assert_eq!(parse_tag_line("[01:02.50]x"), Some((62.05, "x")));
        assert_eq!(parse_tag_line("[00:12.340] y"), Some((12.34, " y")));
        assert_eq!(parse_tag_line("[ti:Title]"), None);
        assert_eq!(parse_tag_line("[1:02.50]x"), None);
        assert_eq!(parse_tag_line("[01:02.5]x"), None);
        assert_eq!(parse_tag_line("[01:02.5000]x"), None);
        assert_eq!(parse_tag_line("[0a:02.50]x"), None);
        assert_eq!(parse_tag_line("[01:02]x"), None);
        assert_eq!(parse_tag_line(" [01:02.50]x"), None);
    }

    #[test]
    fn test_fraction_is_divided_by_1000_for_both_widths() {
        // Two-digit tags are not scaled up to milliseconds.
        let p = parsed("[00:01.50]two\n[00:01.500]three");
        assert_eq!(p.lines()[0].time, 1.05);
        assert_eq!(p.lines()[0].text, "two");
        assert_eq!(p.lines()[1].time, 1.5);
        assert_eq!(p.lines()[1].text, "three");
    }

    #[test]
    fn test_parse_sorts_and_keeps_tie_order() {
        let p = parsed("[00:20.00]C\n[00:05.00]first\n[00:10.00]B\n[00:05.00]second\n");
        let texts: Vec<&str> = p.lines().iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second", "B", "C"]);
        assert!(p.lines().windows(2).all(|w| w[0].time <= w[1].time));
    }

    #[test]
    fn test_parse_drops_untagged_and_empty_lines() {
        let lrc = "[ti:Song]\n[ar:Artist]\nplain text\n[00:01.00]   \n[00:02.00]  kept  \r\n[00:03.00]";
        let p = parsed(lrc);
        assert_eq!(p.len(), 1);
        assert_eq!(p.lines()[0].text, "kept");
    }

    #[test]
    fn test_empty_payloads() {
        for content in ["", "no tags here", "[xx:yy.zz]bad"] {
            let mut p = parsed(content);
            assert!(p.is_empty());
            assert_eq!(p.cursor(), None);
            assert_eq!(p.active_line(0.0), None);
            assert_eq!(p.active_line(100.0), None);
            assert_eq!(p.next_line(), None);
            assert_eq!(p.previous_line(), None);
        }
    }

    #[test]
    fn test_active_line() {
        let mut p = abc();
        assert_eq!(p.active_line(5.0), Some("A"));
        assert_eq!(p.active_line(10.0), Some("B"));
        assert_eq!(p.active_line(19.99), Some("B"));
        assert_eq!(p.active_line(25.0), Some("C"));
        assert_eq!(p.active_line(10_000.0), Some("C"));
    }

    #[test]
    fn test_active_line_before_first_leaves_cursor() {
        let mut p = parsed("[00:05.00]A\n[00:10.00]B\n[00:20.00]C");
        assert_eq!(p.active_line(12.0), Some("B"));
        assert_eq!(p.cursor(), Some(1));

        assert_eq!(p.active_line(-1.0), None);
        assert_eq!(p.active_line(4.0), None);
        assert_eq!(p.cursor(), Some(1));
    }

    #[test]
    fn test_next_and_previous() {
        let mut p = abc();
        p.active_line(10.0);
        assert_eq!(p.next_line(), Some("C"));
        assert_eq!(p.previous_line(), Some("A"));

        p.active_line(0.0);
        assert_eq!(p.previous_line(), None);
        assert_eq!(p.next_line(), Some("B"));

        p.active_line(30.0);
        assert_eq!(p.next_line(), None);
        assert_eq!(p.previous_line(), Some("B"));
    }

    #[test]
    fn test_active_line_is_idempotent() {
        let mut p = abc();
        assert_eq!(p.active_line(10.0), Some("B"));
        let cursor = p.cursor();
        assert_eq!(p.active_line(10.0), Some("B"));
        assert_eq!(p.cursor(), cursor);
        assert_eq!(p.next_line(), Some("C"));
    }

    #[test]
    fn test_parse_resets_previous_track() {
        let mut p = abc();
        p.active_line(25.0);
        assert_eq!(p.cursor(), Some(2));

        p.parse("[00:01.00]only");
        assert_eq!(p.len(), 1);
        assert_eq!(p.cursor(), Some(0));
        assert_eq!(p.next_line(), None);

        p.parse("");
        assert_eq!(p.cursor(), None);
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0.0), "[00:00.00]");
        assert_eq!(format_timestamp(62.05), "[01:02.05]");
        assert_eq!(format_timestamp(-3.0), "[00:00.00]");
    }
}
