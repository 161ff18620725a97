pub mod point_decoding;
pub mod point_encoding;
