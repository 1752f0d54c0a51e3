use std::fmt;
use std::time::Instant;

use crate::flatten::LabelSequence;

/// Normalized structural distance in [0, 1]. 0 means identical label sequences.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Score(f64);

impl Score {
    /// Normalize a raw edit distance by the longer sequence length.
    /// Two empty sequences are identical and score 0.
    #[must_use]
    pub fn from_distance(distance: usize, max_len: usize) -> Self {
        if max_len == 0 {
            return Self(0.0);
        }
        Self((distance as f64 / max_len as f64).clamp(0.0, 1.0))
    }

    /// Unrounded value.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Value rounded to two decimal places, as reported. Same digits as the
    /// `Display` output.
    #[must_use]
    pub fn rounded(self) -> f64 {
        self.to_string().parse().unwrap_or(self.0)
    }
}

// `{:.2}` rounds the exact binary value with ties to even, so 0.125 prints as 0.12.
impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// The result of comparing two label sequences.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Comparison {
    /// Raw label edit distance.
    pub distance: usize,
    pub left_len: usize,
    pub right_len: usize,
    pub score: Score,
}

/// Returned when a deadline passes before the distance table is complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeadlineExceeded;

/// Compare two label sequences.
#[must_use]
pub fn compare_sequences(left: &LabelSequence, right: &LabelSequence) -> Comparison {
    let distance = edit_distance(left.labels(), right.labels());
    comparison(distance, left, right)
}

/// Compare two label sequences, giving up once `deadline` has passed.
/// The deadline is checked once per table row.
pub fn compare_sequences_until(
    left: &LabelSequence,
    right: &LabelSequence,
    deadline: Option<Instant>,
) -> Result<Comparison, DeadlineExceeded> {
    let distance = edit_distance_until(left.labels(), right.labels(), deadline)?;
    Ok(comparison(distance, left, right))
}

fn comparison(distance: usize, left: &LabelSequence, right: &LabelSequence) -> Comparison {
    let max_len = left.len().max(right.len());
    Comparison {
        distance,
        left_len: left.len(),
        right_len: right.len(),
        score: Score::from_distance(distance, max_len),
    }
}

/// Levenshtein distance over labels: unit insertion and deletion, substitution
/// free for equal labels and 1 otherwise.
#[must_use]
pub fn edit_distance<T: PartialEq>(a: &[T], b: &[T]) -> usize {
    let mut table = RollingTable::new(a, b);
    while table.step() {}
    table.result()
}

/// [`edit_distance`] with an optional deadline, checked before each row.
pub fn edit_distance_until<T: PartialEq>(
    a: &[T],
    b: &[T],
    deadline: Option<Instant>,
) -> Result<usize, DeadlineExceeded> {
    let mut table = RollingTable::new(a, b);
    loop {
        if deadline.is_some_and(|d| Instant::now() >= d) {
            return Err(DeadlineExceeded);
        }
        if !table.step() {
            return Ok(table.result());
        }
    }
}

/// The distance table kept as two rows. Rows run over the longer sequence and
/// columns over the shorter one, so memory is O(min(m, n)).
struct RollingTable<'a, T> {
    rows: &'a [T],
    cols: &'a [T],
    prev: Vec<usize>,
    cur: Vec<usize>,
    row: usize,
}

impl<'a, T: PartialEq> RollingTable<'a, T> {
    fn new(a: &'a [T], b: &'a [T]) -> Self {
        let (rows, cols) = if a.len() >= b.len() { (a, b) } else { (b, a) };
        Self {
            rows,
            cols,
            prev: (0..=cols.len()).collect(),
            cur: vec![0; cols.len() + 1],
            row: 0,
        }
    }

    /// Fill the next row. Returns false once every row is done.
    fn step(&mut self) -> bool {
        let Some(label) = self.rows.get(self.row) else {
            return false;
        };
        self.row += 1;
        self.cur[0] = self.row;
        for (j, other) in self.cols.iter().enumerate() {
            let cost = usize::from(label != other);
            self.cur[j + 1] = (self.prev[j + 1] + 1)
                .min(self.cur[j] + 1)
                .min(self.prev[j] + cost);
        }
        std::mem::swap(&mut self.prev, &mut self.cur);
        true
    }

    fn result(&self) -> usize {
        self.prev[self.cols.len()]
    }
}
