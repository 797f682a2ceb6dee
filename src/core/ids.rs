//! Readable identifiers for items and listings, e.g. `panda-golden-417`.
//!
//! Ids are short enough to type into a slash command. Uniqueness is checked
//! by the caller-supplied predicate against every id currently in use.

use rand::Rng;

const ADJECTIVES: [&str; 24] = [
    "happy", "red", "blue", "green", "purple", "golden", "silver", "shiny", "dark", "bright",
    "cool", "warm", "wild", "brave", "calm", "swift", "fancy", "kind", "quick", "soft", "bold",
    "wise", "pure", "proud",
];

const NOUNS: [&str; 24] = [
    "panda", "tiger", "wolf", "bear", "eagle", "lion", "owl", "fox", "dragon", "phoenix", "hawk",
    "deer", "cat", "dog", "bird", "fish", "star", "moon", "sun", "cloud", "rain", "snow", "wind",
    "storm",
];

/// Attempts with the short 0..1000 suffix before widening it.
const SHORT_SUFFIX_ATTEMPTS: u32 = 32;

/// Draws one `noun-adjective-number` id with a number below `upper`.
fn draw<R: Rng + ?Sized>(rng: &mut R, upper: u32) -> String {
    let noun = NOUNS[rng.gen_range(0..NOUNS.len())];
    let adjective = ADJECTIVES[rng.gen_range(0..ADJECTIVES.len())];
    let number = rng.gen_range(0..upper);
    format!("{noun}-{adjective}-{number}")
}

/// Generates an id for which `in_use` returns false.
pub fn unique_readable_id<R, F>(rng: &mut R, in_use: F) -> String
where
    R: Rng + ?Sized,
    F: Fn(&str) -> bool,
{
    let mut attempt = 0;
    loop {
        let upper = if attempt < SHORT_SUFFIX_ATTEMPTS {
            1_000
        } else {
            1_000_000_000
        };
        let candidate = draw(rng, upper);
        if !in_use(&candidate) {
            return candidate;
        }
        attempt += 1;
    }
}
