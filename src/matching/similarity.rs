//! Similarity primitives.
//!
//! `similarity_ratio` is the Ratcliff/Obershelp "gestalt" ratio: find the
//! longest common substring, recurse on the pieces to its left and right,
//! and score `2·M / (|a| + |b|)` where `M` is the total matched length.
//! Characters are compared as Unicode scalar values; no character is ever
//! treated as junk.

use rustc_hash::FxHashMap;

use crate::cards::Rarity;

/// Gestalt similarity of two strings in `[0, 1]`.
///
/// Two empty strings are identical (1.0). The pair is put in a canonical
/// order first so the score does not depend on argument order.
///
/// ```
/// use ccg_remap::matching::similarity_ratio;
///
/// assert_eq!(similarity_ratio("3/4", "3/4"), 1.0);
/// assert_eq!(similarity_ratio("abcd", "bcde"), 0.75);
/// assert_eq!(similarity_ratio("", ""), 1.0);
/// ```
#[must_use]
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let (a, b) = if a <= b { (a, b) } else { (b, a) };
    let matcher = BlockMatcher::new(a, b);
    let total = matcher.a.len() + matcher.b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matcher.matched_len() as f64 / total as f64
}

/// Whether two strings are at least `threshold` similar.
#[must_use]
pub fn text_similar(a: &str, b: &str, threshold: f64) -> bool {
    similarity_ratio(a, b) >= threshold
}

/// Whether a raw source rarity lands on the target's tier once normalized.
///
/// ```
/// use ccg_remap::cards::Rarity;
/// use ccg_remap::matching::rarity_compatible;
///
/// assert!(rarity_compatible("special", Rarity::Rare));
/// assert!(!rarity_compatible("common", Rarity::Uncommon));
/// ```
#[must_use]
pub fn rarity_compatible(source: &str, target: Rarity) -> bool {
    Rarity::normalized(source) == target
}

/// Longest-matching-block search over two char sequences.
struct BlockMatcher {
    a: Vec<char>,
    b: Vec<char>,
    /// Positions of each character in `b`, ascending.
    b_index: FxHashMap<char, Vec<usize>>,
}

impl BlockMatcher {
    fn new(a: &str, b: &str) -> Self {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        let mut b_index: FxHashMap<char, Vec<usize>> = FxHashMap::default();
        for (j, &ch) in b.iter().enumerate() {
            b_index.entry(ch).or_default().push(j);
        }
        Self { a, b, b_index }
    }

    /// Longest common block within `a[alo..ahi]` and `b[blo..bhi]`.
    ///
    /// Returns `(i, j, size)`. Ties go to the block starting earliest in
    /// `a`, then earliest in `b`.
    fn longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> (usize, usize, usize) {
        let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);
        // Length of the match ending at (i - 1, j), keyed by j.
        let mut run_len: FxHashMap<usize, usize> = FxHashMap::default();

        for i in alo..ahi {
            let mut next_run_len: FxHashMap<usize, usize> = FxHashMap::default();
            if let Some(positions) = self.b_index.get(&self.a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let previous = j.checked_sub(1).and_then(|p| run_len.get(&p)).copied();
                    let k = previous.unwrap_or(0) + 1;
                    next_run_len.insert(j, k);
                    if k > best_size {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_size = k;
                    }
                }
            }
            run_len = next_run_len;
        }

        (best_i, best_j, best_size)
    }

    /// Total size of all matching blocks.
    fn matched_len(&self) -> usize {
        let mut total = 0;
        let mut pending = vec![(0, self.a.len(), 0, self.b.len())];

        while let Some((alo, ahi, blo, bhi)) = pending.pop() {
            let (i, j, k) = self.longest_match(alo, ahi, blo, bhi);
            if k == 0 {
                continue;
            }
            total += k;
            if alo < i && blo < j {
                pending.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                pending.push((i + k, ahi, j + k, bhi));
            }
        }

        total
    }
}
