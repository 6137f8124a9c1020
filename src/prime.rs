//! Prime bucket-count selection shared by both map variants.
//!
//! Quadratic probing only reaches every slot of the first half of its probe
//! sequence when the table length is prime, so every bucket array in this
//! crate has a prime length. Construction rounds the requested capacity up
//! with [`next_prime`]; resizing uses [`normalize_capacity`], which keeps a
//! request that is already prime.

/// Returns `true` if `n` is prime.
///
/// Trial division by odd factors while `factor * factor <= n`.
///
/// # Examples
///
/// ```rust
/// use prime_probe::prime::is_prime;
///
/// assert!(is_prime(2));
/// assert!(is_prime(31));
/// assert!(!is_prime(1));
/// assert!(!is_prime(33));
/// ```
pub fn is_prime(n: usize) -> bool {
    if n == 2 || n == 3 {
        return true;
    }
    if n < 2 || n.is_multiple_of(2) {
        return false;
    }

    let mut factor = 3usize;
    while factor.saturating_mul(factor) <= n {
        if n.is_multiple_of(factor) {
            return false;
        }
        factor += 2;
    }
    true
}

/// Returns the smallest prime greater than or equal to `n` after forcing `n`
/// to be odd.
///
/// Even inputs are bumped by one before the search, so `next_prime(2)` is 3
/// rather than 2. The search only visits odd candidates.
///
/// # Examples
///
/// ```rust
/// use prime_probe::prime::next_prime;
///
/// assert_eq!(next_prime(0), 3);
/// assert_eq!(next_prime(2), 3);
/// assert_eq!(next_prime(11), 11);
/// assert_eq!(next_prime(22), 23);
/// ```
pub fn next_prime(n: usize) -> usize {
    let mut candidate = if n.is_multiple_of(2) { n + 1 } else { n };
    while !is_prime(candidate) {
        candidate += 2;
    }
    candidate
}

/// Returns `n` when it is already prime, otherwise [`next_prime(n)`].
///
/// This is the capacity a `resize_table` call settles on.
///
/// [`next_prime(n)`]: next_prime
pub fn normalize_capacity(n: usize) -> usize {
    if is_prime(n) { n } else { next_prime(n) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brute_force_is_prime(n: usize) -> bool {
        n >= 2 && (2..n).take_while(|d| d * d <= n).all(|d| n % d != 0)
    }

    #[test]
    fn small_values() {
        assert!(!is_prime(0));
        assert!(!is_prime(1));
        assert!(is_prime(2));
        assert!(is_prime(3));
        assert!(!is_prime(4));
        assert!(is_prime(5));
        assert!(!is_prime(9));
        assert!(!is_prime(25));
        assert!(is_prime(97));
    }

    #[test]
    fn is_prime_agrees_with_trial_division() {
        for n in 1..=10_000 {
            assert_eq!(is_prime(n), brute_force_is_prime(n), "n = {}", n);
        }
    }

    #[test]
    fn next_prime_is_smallest_prime_above_odd_normalization() {
        for n in 1..=10_000usize {
            let p = next_prime(n);
            let start = if n.is_multiple_of(2) { n + 1 } else { n };
            assert!(p >= start, "n = {}", n);
            assert!(brute_force_is_prime(p), "n = {}, p = {}", n, p);
            assert!(
                (start..p).step_by(2).all(|c| !brute_force_is_prime(c)),
                "n = {}, p = {} skipped a prime",
                n,
                p
            );
        }
    }

    #[test]
    fn next_prime_never_returns_two() {
        assert_eq!(next_prime(0), 3);
        assert_eq!(next_prime(1), 3);
        assert_eq!(next_prime(2), 3);
        assert_eq!(next_prime(3), 3);
    }

    #[test]
    fn normalize_keeps_primes() {
        assert_eq!(normalize_capacity(2), 2);
        assert_eq!(normalize_capacity(31), 31);
        assert_eq!(normalize_capacity(30), 31);
        assert_eq!(normalize_capacity(100), 101);
        assert_eq!(normalize_capacity(0), 3);
        assert_eq!(normalize_capacity(1), 3);
    }

    #[test]
    fn doubling_sequence_from_eleven() {
        let mut capacity = next_prime(11);
        let mut seen = alloc::vec::Vec::new();
        for _ in 0..5 {
            capacity = normalize_capacity(capacity * 2);
            seen.push(capacity);
        }
        assert_eq!(seen, [23, 47, 97, 197, 397]);
    }
}
