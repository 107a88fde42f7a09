//! Display names for new connections.
use rand::seq::IndexedRandom;

const FIRST_NAMES: &[&str] = &[
    "Alice", "Bohdan", "Carmen", "Daria", "Emil", "Fiona", "George", "Halyna", "Ivan", "Julia",
    "Kyrylo", "Lena", "Marko", "Nadia", "Oleh", "Petra", "Roman", "Sofia", "Taras", "Vira",
];

const LAST_NAMES: &[&str] = &[
    "Bondar", "Coleman", "Dorsey", "Franko", "Hayes", "Kovalenko", "Lysenko", "Moroz",
    "Novak", "Palmer", "Reed", "Shevchenko", "Tkachenko", "Walsh", "Yarema",
];

/// Assigns a human-readable name to each new connection.
///
/// Names are not required to be unique. Any `Fn() -> String` closure is a generator.
pub trait NameGenerator: Send + Sync {
    /// Produce the next display name.
    fn generate(&self) -> String;
}

impl<F> NameGenerator for F
where
    F: Fn() -> String + Send + Sync,
{
    fn generate(&self) -> String {
        self()
    }
}

/// Random "First Last" full names.
pub struct RandomNames;

impl NameGenerator for RandomNames {
    fn generate(&self) -> String {
        let mut rng = rand::rng();
        let first = FIRST_NAMES.choose(&mut rng).copied().unwrap_or("Anonymous");
        let last = LAST_NAMES.choose(&mut rng).copied().unwrap_or("Guest");
        format!("{} {}", first, last)
    }
}
