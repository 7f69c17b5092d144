pub mod cmd;
pub mod dataset;
pub mod describe;
pub mod evaluator;
pub mod plot;
pub mod scaler;
pub mod split;
pub mod stats;
pub mod trainer;
