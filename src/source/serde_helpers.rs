use std::str::FromStr;

use serde::Deserialize;

/// The station feed sends coordinates both as JSON numbers and as strings
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum MaybeStringWrapped<T> {
    Val(T),
    Str(String),
}

impl<T: FromStr> MaybeStringWrapped<T> {
    pub fn into_inner(self) -> Result<T, T::Err> {
        match self {
            MaybeStringWrapped::Str(s) => s.trim().parse(),
            MaybeStringWrapped::Val(v) => Ok(v),
        }
    }
}
