pub mod components;
pub mod screens;
pub mod styles;

pub use components::TerminalGuard;
pub use screens::render_dashboard;
pub use styles::{chart_theme, init_chart_theme, ChartTheme};
