pub mod blob_detector;
pub mod color_classifier;
pub mod color_range;
pub mod error;
pub mod frame;
pub mod mask;
pub mod pixel;
pub mod rectangle_detector;
pub mod region;
pub mod region_extractor;
