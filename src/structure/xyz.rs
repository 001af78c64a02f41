//! XYZ trajectory parsing.
//!
//! A file is a sequence of frames, each `N` (atom count) on its own line,
//! a free-form comment line, then `N` lines of `symbol x y z`. Every frame
//! is assumed to carry the same `N` as the first line.
//!
//! Malformed input never errors: callers get fewer (possibly zero) frames.

/// One atom as read from an XYZ record.
#[derive(Debug, Clone, PartialEq)]
pub struct XyzAtom {
    /// Element symbol exactly as written in the file.
    pub symbol: String,
    /// Cartesian coordinates.
    pub position: [f64; 3],
}

/// The atoms of a single frame.
pub type Frame = Vec<XyzAtom>;

/// Lazily parse the frames of `text`.
///
/// The frame count is `floor(lines / (N + 2))`, where `N` is parsed from
/// the first line. Iteration stops early at the first frame containing a
/// malformed atom record.
pub fn frames(text: &str) -> impl Iterator<Item = Frame> + '_ {
    let lines: Vec<&str> = text.split('\n').collect();
    let stride = parse_count(lines.first().copied().unwrap_or_default())
        .and_then(|n| n.checked_add(2))
        .filter(|&stride| stride <= lines.len());
    let nframes = stride.map_or(0, |stride| lines.len() / stride);
    let stride = stride.unwrap_or_default();

    (0..nframes).map_while(move |i| {
        let start = i * stride + 2;
        lines[start..start + stride - 2]
            .iter()
            .map(|line| parse_atom(line))
            .collect::<Option<Frame>>()
    })
}

/// Parse every frame of `text` eagerly.
#[must_use]
pub fn parse_xyz(text: &str) -> Vec<Frame> {
    frames(text).collect()
}

/// Leading atom count: the run of ASCII digits that starts the first
/// token, so `2.0` and `2 atoms` both read as 2. Zero counts and counts
/// too large for `usize` are treated as unparsable.
fn parse_count(line: &str) -> Option<usize> {
    let token = line.split_whitespace().next()?;
    let digits = token
        .find(|c: char| !c.is_ascii_digit())
        .map_or(token, |end| &token[..end]);
    let n = digits.parse::<usize>().ok()?;
    (n > 0).then_some(n)
}

fn parse_atom(line: &str) -> Option<XyzAtom> {
    let mut tokens = line.split_whitespace();
    let symbol = tokens.next()?.to_owned();
    let mut coord = || tokens.next()?.parse::<f64>().ok();
    let position = [coord()?, coord()?, coord()?];
    Some(XyzAtom { symbol, position })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_frame() {
        let frames = parse_xyz("2\ncomment\nO 0 0 0\nH 1 0 0\n");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].len(), 2);
        assert_eq!(frames[0][0].symbol, "O");
        assert_eq!(frames[0][1].position, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn multiple_frames_share_atom_count() {
        let text = "1\nfirst\nC 0 0 0\n1\nsecond\nC 0.5 0 0\n";
        let frames = parse_xyz(text);
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[1][0].position, [0.5, 0.0, 0.0]);
    }

    #[test]
    fn truncated_frame_is_dropped() {
        // Five lines: one complete frame (4 lines) plus a partial one.
        let text = "2\nc\nO 0 0 0\nH 1 0 0\n2";
        assert_eq!(parse_xyz(text).len(), 1);
        assert!(parse_xyz("3\nc\nO 0 0 0\n").is_empty());
    }

    #[test]
    fn unparsable_count_yields_nothing() {
        assert!(parse_xyz("").is_empty());
        assert!(parse_xyz("abc\nc\nO 0 0 0\n").is_empty());
        assert!(parse_xyz("0\nc\n").is_empty());
        assert!(parse_xyz("x2\nc\nO 0 0 0\nH 1 0 0\n").is_empty());
    }

    #[test]
    fn huge_count_yields_nothing() {
        assert!(parse_xyz("18446744073709551614\nc\nO 0 0 0\n").is_empty());
        assert!(parse_xyz("18446744073709551615\nc\nO 0 0 0\n").is_empty());
        assert!(parse_xyz("99999999999999999999999\nc\nO 0 0 0\n").is_empty());
        assert!(parse_xyz("5\nc\nO 0 0 0\n").is_empty());
    }

    #[test]
    fn count_reads_leading_digits() {
        let text = "2.0\nc\nO 0 0 0\nH 1 0 0\n";
        assert_eq!(parse_xyz(text).len(), 1);
        let text = "2 atoms\nc\nO 0 0 0\nH 1 0 0\n";
        assert_eq!(parse_xyz(text)[0][1].symbol, "H");
    }

    #[test]
    fn crlf_and_extra_whitespace_are_tolerated() {
        let frames = parse_xyz("1\r\ncomment\r\n  N   1.5\t-2  3e-1 \r\n");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0][0].symbol, "N");
        assert_eq!(frames[0][0].position, [1.5, -2.0, 0.3]);
    }

    #[test]
    fn malformed_record_stops_iteration() {
        let text = "1\nc\nC 0 0 0\n1\nc\nC zero 0 0\n1\nc\nC 1 1 1\n";
        assert_eq!(parse_xyz(text).len(), 1);
    }

    #[test]
    fn frames_is_lazy() {
        let text = "1\na\nC 0 0 0\n1\nb\nC 1 0 0\n";
        let first = frames(text).next().unwrap();
        assert_eq!(first[0].position, [0.0, 0.0, 0.0]);
    }
}
