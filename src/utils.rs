/// Number of radix-`radix` stages needed to cover `n` points, i.e. `ceil(log_radix(n))`.
///
/// Returns 0 for `n <= 1`.
#[must_use]
pub const fn num_stages(n: usize, radix: usize) -> usize {
    debug_assert!(radix >= 2);
    let mut stages = 0;
    let mut span: usize = 1;
    while span < n {
        stages += 1;
        span = match span.checked_mul(radix) {
            Some(next) => next,
            // Any further stage overshoots `usize::MAX >= n`.
            None => return stages,
        };
    }
    stages
}

/// Checked `base^exp`.
#[must_use]
pub const fn checked_pow(base: usize, exp: usize) -> Option<usize> {
    let mut acc: usize = 1;
    let mut i = 0;
    while i < exp {
        acc = match acc.checked_mul(base) {
            Some(next) => next,
            None => return None,
        };
        i += 1;
    }
    Some(acc)
}

/// Returns `true` if `n` is an exact (non-negative) integer power of `radix`.
#[must_use]
pub const fn is_power_of(n: usize, radix: usize) -> bool {
    match checked_pow(radix, num_stages(n, radix)) {
        Some(span) => span == n,
        None => false,
    }
}

/// `log2` of a power of two.
///
/// # Panics
/// Panics if `n` is not a power of two.
#[must_use]
pub const fn log2_strict(n: usize) -> u32 {
    assert!(n.is_power_of_two(), "Not a power of two");
    n.trailing_zeros()
}
