#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppMessage {
    // User Input
    Quit,
    TogglePlayPause,
    VolumeUp,
    VolumeDown,
    SeekForward,
    SeekBackward,
    ToggleMute,
    Download,

    // Navigation
    NavigateTo(ViewRoute),
    GoBack,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewRoute {
    Settings,
}
