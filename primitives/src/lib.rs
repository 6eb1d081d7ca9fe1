pub mod consts;
pub mod domain;
pub mod errors;
pub mod helpers;
pub mod polynomial;
pub mod srs;
pub mod traits;
pub mod transcript;
pub mod types;
