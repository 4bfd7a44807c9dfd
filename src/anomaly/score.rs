/// Reduce one flag column to its bounded category score:
/// `min(floor(flagged_ratio * 25), 25)`. An empty column scores 0 — a
/// category that was never evaluated carries no risk, it is not an error.
pub fn score_category(flags: &[bool]) -> u8 {
    if flags.is_empty() {
        return 0;
    }
    let flagged = flags.iter().filter(|f| **f).count();
    let ratio = flagged as f64 / flags.len() as f64;
    ((ratio * 25.0).floor() as u32).min(25) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_scores_zero() {
        assert_eq!(score_category(&[]), 0);
    }

    #[test]
    fn test_all_flagged_hits_cap_exactly() {
        assert_eq!(score_category(&[true; 7]), 25);
    }

    #[test]
    fn test_none_flagged_scores_zero() {
        assert_eq!(score_category(&[false; 7]), 0);
    }

    #[test]
    fn test_ratio_floored() {
        // 3/10 flagged: 0.3 * 25 = 7.5 → 7.
        let mut flags = vec![false; 10];
        flags[0] = true;
        flags[4] = true;
        flags[9] = true;
        assert_eq!(score_category(&flags), 7);
    }

    #[test]
    fn test_bounds_and_monotonicity() {
        // Score stays in [0, 25] and never decreases as the flagged ratio
        // grows.
        let total = 20;
        let mut previous = 0u8;
        for flagged in 0..=total {
            let flags: Vec<bool> = (0..total).map(|i| i < flagged).collect();
            let score = score_category(&flags);
            assert!(score <= 25);
            assert!(score >= previous);
            previous = score;
        }
        assert_eq!(previous, 25);
    }
}
