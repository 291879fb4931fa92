use crate::pool::WordPool;
use crate::select;

/// Where drill items come from. One seam covers the word-list and
/// number-drill variants of the trainer.
pub trait ItemSource {
    /// Draw `count` distinct items in random order. `count` must be within
    /// `1..=max_count()`; callers validate before drawing.
    fn draw(&self, count: usize, rng: &mut dyn rand::RngCore) -> Vec<String>;

    /// Upper bound for a valid draw count.
    fn max_count(&self) -> usize;

    /// Human-readable label for status lines.
    fn describe(&self) -> String;
}

/// Draws from a loaded word pool.
pub struct WordListSource {
    pool: WordPool,
}

impl WordListSource {
    pub fn new(pool: WordPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &WordPool {
        &self.pool
    }
}

impl ItemSource for WordListSource {
    fn draw(&self, count: usize, rng: &mut dyn rand::RngCore) -> Vec<String> {
        select::sample(self.pool.words(), count, rng)
    }

    fn max_count(&self) -> usize {
        self.pool.len()
    }

    fn describe(&self) -> String {
        format!("{} words", self.pool.len())
    }
}

pub const NUMBER_DRILL_MIN: u32 = 1;
pub const NUMBER_DRILL_MAX: u32 = 100;

/// Number-drill mode: distinct random integers rendered as strings.
pub struct NumberSource {
    min: u32,
    max: u32,
}

impl NumberSource {
    /// Reversed bounds are swapped rather than underflowing `max_count`.
    pub fn new(min: u32, max: u32) -> Self {
        if min > max {
            Self { min: max, max: min }
        } else {
            Self { min, max }
        }
    }
}

impl Default for NumberSource {
    fn default() -> Self {
        Self::new(NUMBER_DRILL_MIN, NUMBER_DRILL_MAX)
    }
}

impl ItemSource for NumberSource {
    fn draw(&self, count: usize, rng: &mut dyn rand::RngCore) -> Vec<String> {
        // The range is small and fixed, so materialize it and reuse the
        // same shuffle-and-truncate draw as the word pool.
        let all: Vec<String> = (self.min..=self.max).map(|n| n.to_string()).collect();
        select::sample(&all, count, rng)
    }

    fn max_count(&self) -> usize {
        (self.max - self.min + 1) as usize
    }

    fn describe(&self) -> String {
        format!("numbers {}-{}", self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn word_list_source_draws_from_pool() {
        let pool = WordPool::from_text("cat\ndog\nbird\nfish").unwrap();
        let source = WordListSource::new(pool);
        let mut rng = StdRng::seed_from_u64(3);

        assert_eq!(source.max_count(), 4);
        let drawn = source.draw(3, &mut rng);
        assert_eq!(drawn.len(), 3);
        for item in &drawn {
            assert!(source.pool().words().contains(item));
        }
    }

    #[test]
    fn number_source_draws_distinct_in_range() {
        let source = NumberSource::new(1, 20);
        let mut rng = StdRng::seed_from_u64(9);

        let drawn = source.draw(10, &mut rng);
        assert_eq!(drawn.len(), 10);

        let unique: HashSet<u32> = drawn.iter().map(|s| s.parse().unwrap()).collect();
        assert_eq!(unique.len(), 10);
        for n in unique {
            assert!((1..=20).contains(&n));
        }
    }

    #[test]
    fn number_source_max_count_covers_range() {
        assert_eq!(NumberSource::new(1, 100).max_count(), 100);
        assert_eq!(NumberSource::new(5, 5).max_count(), 1);
    }

    #[test]
    fn number_source_swaps_reversed_bounds() {
        let source = NumberSource::new(20, 1);
        assert_eq!(source.max_count(), 20);

        let mut rng = StdRng::seed_from_u64(11);
        let drawn = source.draw(5, &mut rng);
        assert_eq!(drawn.len(), 5);
        for item in &drawn {
            let n: u32 = item.parse().unwrap();
            assert!((1..=20).contains(&n));
        }
    }

    #[test]
    fn describe_mentions_the_mode() {
        let pool = WordPool::from_text("a\nb").unwrap();
        assert_eq!(WordListSource::new(pool).describe(), "2 words");
        assert_eq!(NumberSource::default().describe(), "numbers 1-100");
    }
}
