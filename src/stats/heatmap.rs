/// Intensity tiers for the daily-activity heatmap.
pub const MAX_LEVEL: u8 = 4;

/// Map a day's attempt count to an intensity tier 0-4. Breakpoints are fixed:
/// 0, 1-4, 5-9, 10-14, 15+.
pub fn level(count: usize) -> u8 {
    match count {
        0 => 0,
        1..=4 => 1,
        5..=9 => 2,
        10..=14 => 3,
        _ => 4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_boundaries() {
        assert_eq!(level(0), 0);
        assert_eq!(level(1), 1);
        assert_eq!(level(4), 1);
        assert_eq!(level(5), 2);
        assert_eq!(level(9), 2);
        assert_eq!(level(10), 3);
        assert_eq!(level(14), 3);
        assert_eq!(level(15), 4);
        assert_eq!(level(1000), 4);
    }

    #[test]
    fn test_level_never_exceeds_max() {
        for count in 0..100 {
            assert!(level(count) <= MAX_LEVEL);
        }
    }
}
