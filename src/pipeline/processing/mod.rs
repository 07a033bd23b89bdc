// Pipeline processing: block segmentation, field extraction, validation,
// and schema normalization

pub mod extractor;
pub mod normalize;
pub mod segmenter;
pub mod validator;
