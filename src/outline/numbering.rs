/// Running per-level counters for one collection pass.
///
/// Skipped levels are backfilled with `1`, so an `h3` with no `h1`/`h2`
/// before it is numbered `1.1.1`. Irregular nesting never produces a
/// malformed label.
#[derive(Debug, Clone, Default)]
pub struct CounterState {
    counters: [u32; 6],
}

impl CounterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for the next heading at `level` and return its label.
    /// Levels outside 1..=6 are clamped.
    pub fn advance(&mut self, level: u8) -> String {
        let depth = level.clamp(1, 6) as usize;

        for slot in &mut self.counters[..depth - 1] {
            if *slot == 0 {
                *slot = 1;
            }
        }
        self.counters[depth - 1] += 1;
        for slot in &mut self.counters[depth..] {
            *slot = 0;
        }

        self.counters[..depth]
            .iter()
            .filter(|c| **c != 0)
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(".")
    }
}

/// Number a whole sequence of levels with a fresh counter state.
pub fn number_levels(levels: &[u8]) -> Vec<String> {
    let mut state = CounterState::new();
    levels.iter().map(|&l| state.advance(l)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_then_sibling() {
        assert_eq!(number_levels(&[1, 2, 3, 2]), vec!["1", "1.1", "1.1.1", "1.2"]);
    }

    #[test]
    fn lone_h3_is_backfilled() {
        assert_eq!(number_levels(&[3]), vec!["1.1.1"]);
    }

    #[test]
    fn h1_then_h4_stays_well_formed() {
        assert_eq!(number_levels(&[1, 4, 4, 2]), vec!["1", "1.1.1.1", "1.1.1.2", "1.2"]);
    }

    #[test]
    fn siblings_count_up() {
        let labels = number_levels(&[2, 2, 2]);
        assert_eq!(labels, vec!["1.1", "1.2", "1.3"]);
    }

    #[test]
    fn new_top_level_resets_deeper_counters() {
        assert_eq!(
            number_levels(&[1, 2, 2, 1, 2]),
            vec!["1", "1.1", "1.2", "2", "2.1"]
        );
    }

    #[test]
    fn out_of_range_levels_are_clamped() {
        assert_eq!(number_levels(&[0, 9]), vec!["1", "1.1.1.1.1.1"]);
    }
}
