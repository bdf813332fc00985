use rand::seq::IndexedRandom;

/// Number of descriptors attached to each post
pub const DESCRIPTOR_COUNT: usize = 10;

const ADJECTIVES: &str = include_str!("adjectives.txt");

fn words() -> Vec<&'static str> {
    ADJECTIVES
        .lines()
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .collect()
}

/// Pick the reaction deck for a new post: distinct random adjectives
pub fn generate_descriptors() -> Vec<String> {
    let words = words();
    words
        .choose_multiple(&mut rand::rng(), DESCRIPTOR_COUNT)
        .map(|w| w.to_string())
        .collect()
}
