//! Tri-state field wrapper for partial updates.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A field in a partial-update body that distinguishes "not supplied" from
/// "explicitly null" from "set to a value".
///
/// Deserialized with `#[serde(default)]`: a missing key stays [`Field::Absent`],
/// a JSON `null` becomes [`Field::Null`], anything else becomes [`Field::Set`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Field<T> {
    /// The key was not present in the body.
    #[default]
    Absent,
    /// The key was present with an explicit `null`.
    Null,
    /// The key was present with a value.
    Set(T),
}

impl<T> Field<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Field::Absent)
    }

    /// The supplied value, if any.
    pub fn as_set(&self) -> Option<&T> {
        match self {
            Field::Set(value) => Some(value),
            _ => None,
        }
    }
}

impl<T> From<Option<T>> for Field<T> {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(value) => Field::Set(value),
            None => Field::Null,
        }
    }
}

impl<'de, T> Deserialize<'de> for Field<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Field::from)
    }
}

impl<T> Serialize for Field<T>
where
    T: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Field::Set(value) => serializer.serialize_some(value),
            _ => serializer.serialize_none(),
        }
    }
}
