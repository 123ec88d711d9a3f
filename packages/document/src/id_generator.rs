use rand::Rng;

const SUFFIX_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SUFFIX_LEN: usize = 9;

/// Generates node, page and project ids of the form
/// `{prefix}-{timestamp_ms}-{random}`.
///
/// Ids are meant to be traceable in logs and exported JSON, not unguessable.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    mode: Mode,
}

#[derive(Debug, Clone)]
enum Mode {
    Random,
    /// Deterministic ids for tests and fixtures
    Sequential { seed: String, count: u64 },
}

impl IdGenerator {
    pub fn new() -> Self {
        Self { mode: Mode::Random }
    }

    /// `{prefix}-{seed}-{n}` with `n` counting up from 1
    pub fn sequential(seed: impl Into<String>) -> Self {
        Self {
            mode: Mode::Sequential {
                seed: seed.into(),
                count: 0,
            },
        }
    }

    /// Generate the next id for `prefix` (usually a lowercased kind tag)
    pub fn new_id(&mut self, prefix: &str) -> String {
        let prefix = prefix.to_lowercase();

        match &mut self.mode {
            Mode::Random => {
                let timestamp = chrono::Utc::now().timestamp_millis();
                format!("{}-{}-{}", prefix, timestamp, random_suffix())
            }
            Mode::Sequential { seed, count } => {
                *count += 1;
                format!("{}-{}-{}", prefix, seed, count)
            }
        }
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn random_suffix() -> String {
    let mut rng = rand::thread_rng();
    (0..SUFFIX_LEN)
        .map(|_| SUFFIX_ALPHABET[rng.gen_range(0..SUFFIX_ALPHABET.len())] as char)
        .collect()
}
