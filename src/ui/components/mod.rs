pub mod chart;
pub mod terminal;
pub mod utils;

pub use chart::render_price_chart;
pub use terminal::TerminalGuard;
