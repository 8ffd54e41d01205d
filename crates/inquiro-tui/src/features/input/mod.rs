//! Single-line text inputs (prompt and search query).

mod render;
mod state;

pub use render::render_input;
pub use state::LineInput;
