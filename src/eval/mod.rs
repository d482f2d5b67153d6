mod report;
mod results;
mod runner;

pub use report::{generate_response_logs, report_file_name, ResponseLog};
pub use results::{
    extract_llms, extract_testcases, result_laundry, Difficulties, Provider, RawResultEntry,
    RawResults, ResultsFile, TestCase, Vars,
};
pub use runner::{score_run, ScoredRun};
