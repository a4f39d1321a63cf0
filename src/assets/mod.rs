/// Color lightening, classification and paint parsing.
pub mod color;
/// Image decoding and data URIs.
pub mod decode;
/// Product photo sources.
pub mod source;
/// Rendered card storage.
pub mod store;
