//! The quiz: ten questions answered from the enriched frames.

pub mod hazard;
pub mod plot;
pub mod queries;
pub mod render;
pub mod session;

pub use plot::{ChartSink, CsvExport, HazardChart, PlotWindow};
pub use session::{Question, Session};

#[cfg(test)]
mod tests;
