pub mod controls;
pub mod player;
pub mod progress;
pub mod spinner;
pub mod text_input;
pub mod toast;
