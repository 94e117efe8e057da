#[macro_use]
pub(crate) mod errors;
