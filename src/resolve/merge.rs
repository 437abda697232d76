use ahash::AHashSet;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Generates identifiers for merged parks that collide with neither inputs nor each other.
/// The same seed and inputs always produce the same identifiers.
pub(crate) struct MergedIdGenerator {
    rng: StdRng,
    prefix: String,
    taken: AHashSet<String>,
}

impl MergedIdGenerator {
    pub(crate) fn new<'a>(seed: u64, prefix: &str, taken: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            prefix: prefix.to_string(),
            taken: taken.into_iter().map(str::to_string).collect(),
        }
    }

    /// Draw the next unused identifier.
    pub(crate) fn next_id(&mut self) -> String {
        loop {
            let id = format!("{}{:08x}", self.prefix, self.rng.random::<u32>());
            if self.taken.insert(id.clone()) { return id }
        }
    }
}
