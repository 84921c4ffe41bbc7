pub mod formatter;

pub use formatter::{
    format_countdown, format_limits, format_pick_form, format_rejection, format_results_table,
    format_results_tsv, format_standings_table, format_standings_tsv, should_use_colors,
};
