use openmemory_core::memory::Memory;

/// Picks the dedup match out of the simhash-neighborhood candidates
/// already filtered to the same `userId` by the caller (spec.md §4.3 step
/// 3). Ties (same Hamming distance) keep the most recently seen memory —
/// a new near-duplicate probably reinforces whichever version is still
/// being actively used.
pub fn pick_duplicate<'a>(simhash: u64, candidates: &'a [Memory]) -> Option<&'a Memory> {
    candidates
        .iter()
        .min_by_key(|m| ((m.simhash ^ simhash).count_ones(), std::cmp::Reverse(m.last_seen_at)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use openmemory_core::memory::Sector;

    #[test]
    fn no_candidates_means_no_duplicate() {
        assert!(pick_duplicate(0, &[]).is_none());
    }

    #[test]
    fn picks_closest_fingerprint() {
        let mut near = Memory::new("u1", "c", Sector::Semantic);
        near.simhash = 0b1010;
        let mut far = Memory::new("u1", "c", Sector::Semantic);
        far.simhash = 0b1111;

        let found = pick_duplicate(0b1010, &[far, near.clone()]).unwrap();
        assert_eq!(found.id, near.id);
    }
}
