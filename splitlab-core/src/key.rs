//! Stable key encoding.
//!
//! The engine identifies entities by a canonical string. Any type used as an
//! identifier must produce the same encoding for the same logical entity on
//! every call, in every process — otherwise determinism breaks silently.
//! That requirement is expressed as a trait rather than accepting arbitrary
//! input: types without a stable encoding simply do not implement it.

/// A deterministic string encoding of an identifier.
///
/// Implementations must be pure and stable: no randomness, no pointer
/// addresses, no iteration over unordered collections. Integer and string
/// primitives are covered here; composite keys can use the tuple
/// implementation or provide their own encoding.
pub trait StableKey {
    fn stable_key(&self) -> String;
}

impl StableKey for str {
    fn stable_key(&self) -> String {
        self.to_string()
    }
}

impl StableKey for String {
    fn stable_key(&self) -> String {
        self.clone()
    }
}

impl<K: StableKey + ?Sized> StableKey for &K {
    fn stable_key(&self) -> String {
        (**self).stable_key()
    }
}

macro_rules! impl_stable_key_for_int {
    ($($t:ty),* $(,)?) => {
        $(
            impl StableKey for $t {
                fn stable_key(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

impl_stable_key_for_int!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

/// Composite key: both parts encoded, joined with `:`.
impl<A: StableKey, B: StableKey> StableKey for (A, B) {
    fn stable_key(&self) -> String {
        format!("{}:{}", self.0.stable_key(), self.1.stable_key())
    }
}
