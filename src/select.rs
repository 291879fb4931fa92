use rand::seq::SliceRandom;
use rand::Rng;

/// Draw `count` distinct items from `items` in uniformly random order.
///
/// Fisher-Yates shuffle over a copy, truncated to the first `count` entries:
/// every permutation is equally likely, so any prefix is a uniform sample
/// without replacement. The input slice is never mutated.
///
/// `count` must already be validated against `items.len()`; callers go
/// through [`crate::session::SessionRequest::validate`].
pub fn sample<R: Rng + ?Sized>(items: &[String], count: usize, rng: &mut R) -> Vec<String> {
    let mut shuffled = items.to_vec();
    shuffled.shuffle(rng);
    shuffled.truncate(count);
    shuffled
}
