//! Operator count validation. The splitting scheme needs n = 3f+1 operators
//! to tolerate f faulty or unavailable ones, so the only valid counts are
//! 4, 7, 10 and 13.

/// Smallest meaningful quorum (f = 1).
pub const MIN_OPERATORS: usize = 4;

/// Operational upper bound (f = 4).
pub const MAX_OPERATORS: usize = 13;

/// True iff `n` is a valid operator count.
pub fn is_operator_count_valid(n: usize) -> bool {
    !(n < MIN_OPERATORS || n > MAX_OPERATORS || n % 3 != 1)
}
