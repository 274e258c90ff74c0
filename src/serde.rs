use ::serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::Deque;

/// Encoded exactly like a `Vec<T>`: a sequence of the elements, front to back.
impl<T: Serialize> Serialize for Deque<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Deque<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<T>::deserialize(deserializer).map(Deque::from)
    }
}
