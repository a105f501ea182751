pub mod colors;
pub mod format;
pub mod logging;
pub mod print;
pub mod spinner;

/// Sets up colour handling and the log subscriber. Call once, before any output.
pub fn init(verbosity: u8, no_color: bool) {
    if no_color || std::env::var_os("NO_COLOR").is_some() {
        colored::control::set_override(false);
    }
    logging::init(verbosity);
}
