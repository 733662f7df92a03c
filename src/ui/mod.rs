//! Terminal UI: the game screen, plus the display projection it renders
//! from (board with an optional hover preview).

mod app;
pub mod display;
mod game_view;

pub use app::App;
pub use display::{DisplayBoard, DisplayCell};
