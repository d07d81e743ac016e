pub mod icons;
pub mod output;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{
    header, info, is_quiet, muted, phase, resolve_summary, section, success, summary_row, warn,
};
pub use table::{configurations_table, stats_table, TableBuilder};
pub use theme::{theme, Theme};
