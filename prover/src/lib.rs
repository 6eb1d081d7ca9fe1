pub mod kzg;
pub mod srs;
