mod accumulator;
mod running_mean;

pub use accumulator::Accumulator;
pub use running_mean::RunningMean;
