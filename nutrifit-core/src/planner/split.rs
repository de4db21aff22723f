use crate::catalog::exercises::Focus;

/// Weekly focus pattern for a training frequency.
pub fn determine_split(weekly_frequency: i32) -> Vec<Focus> {
    match weekly_frequency {
        f if f <= 0 => Vec::new(),
        f @ 1..=3 => vec![Focus::FullBody; f as usize],
        4 => vec![Focus::Upper, Focus::Lower, Focus::Upper, Focus::Lower],
        _ => vec![
            Focus::Push,
            Focus::Pull,
            Focus::Lower,
            Focus::Upper,
            Focus::Lower,
        ],
    }
}

/// Day offsets (0 = first day of the window) that carry a session.
pub fn training_days(weekly_frequency: i32) -> Vec<u32> {
    match weekly_frequency {
        f if f <= 0 => Vec::new(),
        1 => vec![2],
        2 => vec![1, 4],
        3 => vec![0, 2, 4],
        4 => vec![0, 1, 3, 4],
        _ => vec![0, 1, 2, 3, 4],
    }
}

/// Pair each training day with its focus. Days beyond the pattern get full body.
pub fn weekly_schedule(weekly_frequency: i32) -> Vec<(u32, Focus)> {
    let pattern = determine_split(weekly_frequency);
    training_days(weekly_frequency)
        .into_iter()
        .enumerate()
        .map(|(i, day)| (day, pattern.get(i).copied().unwrap_or(Focus::FullBody)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn split_patterns() {
        assert_eq!(determine_split(1), vec![Focus::FullBody]);
        assert_eq!(determine_split(2), vec![Focus::FullBody; 2]);
        assert_eq!(determine_split(3), vec![Focus::FullBody; 3]);
        assert_eq!(
            determine_split(4),
            vec![Focus::Upper, Focus::Lower, Focus::Upper, Focus::Lower]
        );
        assert_eq!(determine_split(7), determine_split(5));
        assert!(determine_split(0).is_empty());
    }

    #[test]
    fn split_coverage_for_every_frequency() {
        for frequency in 1..=7 {
            let days = training_days(frequency);
            let expected = frequency.min(5) as usize;
            assert_eq!(days.len(), expected);
            assert_eq!(days.iter().collect::<BTreeSet<_>>().len(), expected);
            assert!(days.iter().all(|d| *d <= 6));
            assert!(days.windows(2).all(|w| w[0] < w[1]));
            assert_eq!(determine_split(frequency).len(), expected);
        }
    }

    #[test]
    fn schedule_follows_pattern() {
        assert_eq!(
            weekly_schedule(3),
            vec![(0, Focus::FullBody), (2, Focus::FullBody), (4, Focus::FullBody)]
        );
        assert_eq!(
            weekly_schedule(5),
            vec![
                (0, Focus::Push),
                (1, Focus::Pull),
                (2, Focus::Lower),
                (3, Focus::Upper),
                (4, Focus::Lower),
            ]
        );
        assert!(weekly_schedule(0).is_empty());
    }
}
