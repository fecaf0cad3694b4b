pub mod activity_heatmap;
pub mod chart;
pub mod level_list;
pub mod mastery_grid;
pub mod menu;
pub mod practice_area;
pub mod progress_bar;
pub mod session_summary;
pub mod stats_dashboard;
