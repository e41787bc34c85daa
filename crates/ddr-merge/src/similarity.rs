//! Character-level string similarity for fuzzy deduplication
//!
//! Matching-blocks similarity: recursively locate the longest common
//! contiguous block, then match the segments to its left and right. The
//! ratio is twice the total matched length divided by the sum of both
//! lengths, in `[0.0, 1.0]`.

/// Similarity ratio between two strings, case-sensitive
///
/// Callers wanting case-insensitive comparison lowercase first.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let matched = matching_len(&a, &b);
    (2.0 * matched as f64) / ((a.len() + b.len()) as f64)
}

/// Total length of all matching blocks
fn matching_len(a: &[char], b: &[char]) -> usize {
    let (ai, bi, len) = longest_common_block(a, b);
    if len == 0 {
        return 0;
    }
    len + matching_len(&a[..ai], &b[..bi]) + matching_len(&a[ai + len..], &b[bi + len..])
}

/// Earliest longest common contiguous block, as (start_a, start_b, length)
///
/// Ties on length keep the block starting earliest in `a`, then earliest
/// in `b`.
fn longest_common_block(a: &[char], b: &[char]) -> (usize, usize, usize) {
    // One-row DP: lengths[j] = length of the common suffix ending at
    // a[i] / b[j]. O(len(a) * len(b)) time, O(len(b)) space. `prev`
    // carries the previous row's value that the ascending scan overwrote.
    let mut lengths = vec![0usize; b.len() + 1];
    let mut best = (0usize, 0usize, 0usize);

    for (i, &ca) in a.iter().enumerate() {
        let mut prev = 0;
        for j in 0..b.len() {
            let current = lengths[j + 1];
            lengths[j + 1] = if ca == b[j] { prev + 1 } else { 0 };
            prev = current;

            let len = lengths[j + 1];
            if len > best.2 {
                best = (i + 1 - len, j + 1 - len, len);
            }
        }
    }

    best
}
