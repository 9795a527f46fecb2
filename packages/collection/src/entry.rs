use fsstore_core::Fields;

/// A derived key together with the fields it was derived from.
///
/// Immutable once built; take it apart with [`Entry::into_parts`].
#[derive(Clone, Debug, PartialEq)]
pub struct Entry {
    key: String,
    value: Fields,
}

impl Entry {
    pub fn new(key: impl Into<String>, value: Fields) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &Fields {
        &self.value
    }

    pub fn into_parts(self) -> (String, Fields) {
        (self.key, self.value)
    }
}
