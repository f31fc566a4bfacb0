use rand::{seq::SliceRandom, Rng};

use crate::constants::GENRES;

/// Returns a random element of the slice or `None` if it's empty.
pub fn randomize<T>(items: &[T]) -> Option<&T> {
    items.choose(&mut rand::thread_rng())
}

/// Returns the name of a random anime genre.
pub fn randomize_genres() -> &'static str {
    let idx = rand::thread_rng().gen_range(0..GENRES.len());

    GENRES[idx].0
}

/// A random 24bit color.
pub fn random_color() -> u32 {
    rand::thread_rng().gen_range(0..=0xFFFFFF)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_randomize() {
        let empty: [u8; 0] = [];
        assert!(randomize(&empty).is_none());

        let items = [1, 2, 3];
        let item = randomize(&items).unwrap();
        assert!(items.contains(item));
    }

    #[test]
    fn test_random_genre() {
        let genre = randomize_genres();
        assert!(GENRES.iter().any(|(name, _)| *name == genre));
    }

    #[test]
    fn test_random_color() {
        for _ in 0..100 {
            assert!(random_color() <= 0xFFFFFF);
        }
    }
}
