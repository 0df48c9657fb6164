pub mod home;
pub mod settings;
pub mod track_detail;

pub use home::Home;
pub use settings::Settings;
pub use track_detail::TrackDetail;
