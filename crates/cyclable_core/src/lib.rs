mod bbox;
mod de;
pub mod error;
pub mod fetch;
pub mod pairs;
pub mod pipeline;
pub mod point;
pub mod reconstruct;
pub mod ride;
pub mod safety;
pub mod score;
pub mod tags;
pub mod validate;

#[cfg(test)]
pub(crate) mod test_utils;
