pub mod errors;
pub mod labels;
pub mod model;
pub mod prediction;
pub mod preprocess;
pub mod ranking;
pub mod stroke;
