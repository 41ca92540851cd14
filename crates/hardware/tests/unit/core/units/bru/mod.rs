/// Predictor construction through the dispatch wrapper.
pub mod wrapper;
