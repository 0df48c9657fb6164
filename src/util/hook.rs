use crate::ui::tui;

/// Puts the terminal back before the panic report is printed.
pub fn set_panic_hook() {
    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        if let Err(e) = tui::Tui::restore() {
            eprintln!("failed to restore terminal: {e}");
        }
        tracing::error!(panic = %panic_info, "panicked");
        hook(panic_info);
    }));
}
