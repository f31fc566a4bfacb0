/// A single field and its value inside of a hash bucket.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HashView<F, V> {
    pub key: F,
    pub value: V,
}

impl<F, V> HashView<F, V> {
    pub fn new(key: F, value: V) -> Self {
        Self { key, value }
    }
}

impl<F, V> From<(F, V)> for HashView<F, V> {
    #[inline]
    fn from((key, value): (F, V)) -> Self {
        Self::new(key, value)
    }
}
