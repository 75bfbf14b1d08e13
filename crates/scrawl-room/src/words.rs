//! The word corpus and the masked hint shown to guessers.

use std::collections::HashSet;

use rand::Rng;
use rand::seq::IndexedRandom;

const DEFAULT_WORDS: &[&str] = &[
    "house", "tree", "car", "dog", "cat", "sun", "moon", "star", "flower",
    "book", "chair", "table", "computer", "phone", "hat", "shoe", "shirt",
    "apple", "banana", "grape", "orange", "pizza", "burger", "coffee", "tea",
    "mountain", "river", "ocean", "cloud", "rain", "snow", "wind", "fire",
    "bird", "fish", "bear", "lion", "tiger", "zebra", "elephant", "giraffe",
    "rocket", "robot", "alien", "magic", "wizard", "castle", "knight", "dragon",
    "guitar", "piano", "drum", "violin", "saxophone", "trumpet", "flute",
    "camera", "television", "radio", "microphone", "headphones", "speaker",
    "bicycle", "motorcycle", "train", "airplane", "boat", "submarine", "bus",
    "doctor", "teacher", "engineer", "artist", "chef", "pilot", "police",
    "football", "basketball", "tennis", "soccer", "golf", "swimming", "boxing",
    "diamond", "ruby", "emerald", "sapphire", "pearl", "gold", "silver", "bronze",
    "pyramid", "sphinx", "statue", "fountain", "bridge", "tower",
    "ghost", "vampire", "werewolf", "zombie", "monster", "witch",
    "rainbow", "thunder", "lightning", "storm", "hurricane", "tornado", "volcano",
    "desert", "forest", "jungle", "swamp", "glacier", "canyon", "cave", "island",
];

/// The words a drawer can be offered.
///
/// Shared read-only between rooms behind an `Arc`.
#[derive(Debug, Clone)]
pub struct WordBank {
    words: Vec<String>,
}

impl WordBank {
    /// Builds a bank from any list of words.
    ///
    /// Blank entries are dropped, surrounding whitespace trimmed, and
    /// duplicates removed (first occurrence wins), so a drawer is never
    /// offered the same word twice in one pick.
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_owned())
            .filter(|w| !w.is_empty() && seen.insert(w.clone()))
            .collect();
        Self { words }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.iter().any(|w| w == word)
    }

    /// Draws `count` distinct words at random.
    ///
    /// Returns fewer if the bank is smaller than `count`.
    pub fn candidates(&self, count: usize) -> Vec<String> {
        self.candidates_with(&mut rand::rng(), count)
    }

    /// [`candidates`](Self::candidates) with a caller-supplied RNG.
    pub fn candidates_with<R: Rng + ?Sized>(&self, rng: &mut R, count: usize) -> Vec<String> {
        self.words.choose_multiple(rng, count).cloned().collect()
    }
}

impl Default for WordBank {
    fn default() -> Self {
        Self::new(DEFAULT_WORDS)
    }
}

/// Masks a word for guessers.
///
/// Every letter becomes `_`, letters are separated by a single space, and
/// anything that isn't a letter is kept as-is: `"ice cream"` becomes
/// `"_ _ _  _ _ _ _ _"`.
pub fn mask_word(word: &str) -> String {
    let mut hint = String::with_capacity(word.len() * 2);
    let mut last_was_letter = false;
    for c in word.chars() {
        if c.is_alphabetic() {
            hint.push_str("_ ");
            last_was_letter = true;
        } else {
            hint.push(c);
            last_was_letter = false;
        }
    }
    if last_was_letter {
        hint.pop();
    }
    hint
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_default_bank_has_no_duplicates() {
        let bank = WordBank::default();
        let unique: HashSet<_> = DEFAULT_WORDS.iter().collect();
        assert_eq!(bank.len(), unique.len());
        assert!(bank.contains("castle"));
        assert!(bank.contains("wizard"));
    }

    #[test]
    fn test_new_trims_and_drops_blanks() {
        let bank = WordBank::new([" cat ", "", "cat", "dog", "   "]);
        assert_eq!(bank.len(), 2);
        assert!(bank.contains("cat"));
        assert!(!bank.contains(" cat "));
    }

    #[test]
    fn test_candidates_are_distinct() {
        let bank = WordBank::default();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let picks = bank.candidates_with(&mut rng, 3);
            assert_eq!(picks.len(), 3);
            let unique: HashSet<_> = picks.iter().collect();
            assert_eq!(unique.len(), 3);
            assert!(picks.iter().all(|w| bank.contains(w)));
        }
    }

    #[test]
    fn test_candidates_capped_by_bank_size() {
        let bank = WordBank::new(["cat", "dog"]);
        assert_eq!(bank.candidates(3).len(), 2);
    }

    #[test]
    fn test_mask_word_letters_only() {
        assert_eq!(mask_word("cat"), "_ _ _");
        assert_eq!(mask_word("a"), "_");
        assert_eq!(mask_word(""), "");
    }

    #[test]
    fn test_mask_word_keeps_non_letters() {
        assert_eq!(mask_word("ice cream"), "_ _ _  _ _ _ _ _");
        assert_eq!(mask_word("t-rex"), "_ -_ _ _");
        assert_eq!(mask_word("r2d2"), "_ 2_ 2");
    }

    #[test]
    fn test_mask_word_placeholder_count_matches_letters() {
        for word in ["elephant", "ice cream", "jack-o-lantern", "7up"] {
            let letters = word.chars().filter(|c| c.is_alphabetic()).count();
            let placeholders = mask_word(word).chars().filter(|&c| c == '_').count();
            assert_eq!(letters, placeholders, "{word}");
        }
    }
}
