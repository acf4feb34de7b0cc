use std::fmt;

/// A topic as supplied by a caller, with its lower-cased key form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Topic {
    name: String,
}

impl Topic {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The topic text exactly as supplied.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Lower-cased form used for cache keys and crawl queries.
    pub fn key(&self) -> String {
        self.name.to_lowercase()
    }

    /// A copy of this topic reduced to its key form.
    pub fn normalized(&self) -> Topic {
        Topic::new(self.key())
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl From<&str> for Topic {
    fn from(name: &str) -> Self {
        Topic::new(name)
    }
}
