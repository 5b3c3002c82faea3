mod formatter;
pub mod report;
pub mod views;

pub use formatter::{
    format_batch_header, format_demo_links, format_facility_detail, format_formula,
    format_ranked_table, format_score, format_score_explanation, format_summary, format_tsv,
    should_use_colors,
};
pub use report::{write_csv_report, write_json_report, write_reports, TIMESTAMP_FORMAT};
