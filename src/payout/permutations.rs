//! Distinct digit arrangements of a drawn number.

use std::collections::HashMap;

/// Number of distinct permutations of a 4- or 3-digit string.
///
/// This is the multiset permutation count. For four digits with two distinct
/// values, a 3+1 split gives 4 arrangements and a 2+2 split gives 6. Returns
/// `None` for any other length.
pub fn permutation_count(number: &str) -> Option<u32> {
    let mut counts: HashMap<char, usize> = HashMap::new();
    for ch in number.chars() {
        *counts.entry(ch).or_insert(0) += 1;
    }

    match (number.chars().count(), counts.len()) {
        (4, 4) => Some(24),
        (4, 3) => Some(12),
        (4, 2) if counts.values().any(|&n| n == 3) => Some(4),
        (4, 2) => Some(6),
        (4, 1) => Some(1),
        (3, 3) => Some(6),
        (3, 2) => Some(3),
        (3, 1) => Some(1),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_four_digit_counts() {
        assert_eq!(permutation_count("1234"), Some(24));
        assert_eq!(permutation_count("1123"), Some(12));
        assert_eq!(permutation_count("1112"), Some(4));
        assert_eq!(permutation_count("2122"), Some(4));
        assert_eq!(permutation_count("1122"), Some(6));
        assert_eq!(permutation_count("1212"), Some(6));
        assert_eq!(permutation_count("8888"), Some(1));
    }

    #[test]
    fn test_three_digit_counts() {
        assert_eq!(permutation_count("123"), Some(6));
        assert_eq!(permutation_count("112"), Some(3));
        assert_eq!(permutation_count("777"), Some(1));
    }

    #[test]
    fn test_other_lengths() {
        assert_eq!(permutation_count(""), None);
        assert_eq!(permutation_count("12"), None);
        assert_eq!(permutation_count("12345"), None);
    }
}
