pub mod model_catalog;
pub mod sketch_engine;
