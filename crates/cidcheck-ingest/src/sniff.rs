//! Item delimiter detection for delimited text.

/// Delimiters tried, in order of preference on ties.
const CANDIDATES: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Pick the candidate occurring most often outside quotes in the first
/// non-blank line of `sample`. Falls back to `,`.
pub(crate) fn sniff_item_delimiter(sample: &[u8], quote: u8) -> u8 {
    let Some(line) = sample
        .split(|byte| *byte == b'\n' || *byte == b'\r')
        .find(|line| line.iter().any(|byte| !byte.is_ascii_whitespace()))
    else {
        return b',';
    };
    let mut counts = [0usize; CANDIDATES.len()];
    let mut quoted = false;
    for byte in line {
        if *byte == quote {
            quoted = !quoted;
        } else if !quoted && let Some(index) = CANDIDATES.iter().position(|c| c == byte) {
            counts[index] += 1;
        }
    }
    let mut best = (0, b',');
    for (count, candidate) in counts.into_iter().zip(CANDIDATES) {
        if count > best.0 {
            best = (count, candidate);
        }
    }
    best.1
}
