mod aggregation_table;
mod error;
mod history;
mod metadata;
mod sink;
mod split_record;

pub use aggregation_table::AggregationTable;
pub use error::ReportError;
pub use history::{HistoryFormat, SplitHistory};
pub use metadata::RunMetadata;
pub use sink::{ReportFormat, ResultSink, TableWriter};
pub use split_record::SplitRecord;
