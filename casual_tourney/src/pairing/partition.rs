//! Table size partitioning.

/// Split `count` participants into table sizes
///
/// Fours are preferred and threes absorb the remainder (`count = 4q + r`):
///
/// - `r = 0`: `q` fours
/// - `r = 1`: `q - 2` fours and three threes, or one table of `count` when `q < 2`
/// - `r = 2`: `q - 1` fours and two threes, or one table of 2 when `q = 0`
/// - `r = 3`: `q` fours and one three
///
/// The only tables outside {3, 4} are the single fallback tables for 1, 2 and 5.
pub fn partition(count: usize) -> Vec<usize> {
    let (fours, threes) = match (count / 4, count % 4) {
        (q, 0) => (q, 0),
        (q, 1) if q >= 2 => (q - 2, 3),
        (q, 2) if q >= 1 => (q - 1, 2),
        (q, 3) => (q, 1),
        _ => return vec![count],
    };

    let mut sizes = vec![4; fours];
    sizes.extend(std::iter::repeat_n(3, threes));
    sizes
}

/// Whether `sizes` holds a table outside the preferred 3-4 range
pub fn has_fallback_table(sizes: &[usize]) -> bool {
    sizes.iter().any(|&s| s != 3 && s != 4)
}
