use unicode_segmentation::UnicodeSegmentation;

const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash = FNV_OFFSET_BASIS;
    for &byte in bytes {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Computes a 64-bit simhash fingerprint of `text`, used for near-duplicate
/// detection (spec.md §4.6). Tokens are lowercased unicode words; each
/// token's FNV-1a hash casts a +1/-1 vote into each of the 64 bit planes,
/// and the result is the majority vote per plane.
pub fn simhash64(text: &str) -> u64 {
    let mut weights = [0i64; 64];

    for token in text.unicode_words() {
        let lower = token.to_lowercase();
        let hash = fnv1a(lower.as_bytes());
        for (bit, weight) in weights.iter_mut().enumerate() {
            if (hash >> bit) & 1 == 1 {
                *weight += 1;
            } else {
                *weight -= 1;
            }
        }
    }

    let mut fingerprint: u64 = 0;
    for (bit, weight) in weights.iter().enumerate() {
        if *weight > 0 {
            fingerprint |= 1 << bit;
        }
    }
    fingerprint
}

/// Number of differing bits between two fingerprints.
pub fn hamming_distance(a: u64, b: u64) -> u32 {
    (a ^ b).count_ones()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_text_has_zero_distance() {
        let a = simhash64("the quick brown fox jumps over the lazy dog");
        let b = simhash64("the quick brown fox jumps over the lazy dog");
        assert_eq!(hamming_distance(a, b), 0);
    }

    #[test]
    fn near_duplicate_text_has_small_distance() {
        let a = simhash64("remember to buy milk and eggs tomorrow morning");
        let b = simhash64("remember to buy milk and eggs tomorrow afternoon");
        assert!(hamming_distance(a, b) < 20);
    }

    #[test]
    fn unrelated_text_has_larger_distance() {
        let a = simhash64("the quarterly financial report shows steady growth");
        let b = simhash64("grandma's recipe calls for two cups of flour");
        assert!(hamming_distance(a, b) > 0);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn simhash_is_deterministic(s in "\\PC{0,200}") {
            prop_assert_eq!(simhash64(&s), simhash64(&s));
        }
    }
}
