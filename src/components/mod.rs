pub mod notice;
pub mod prompt;
pub(crate) mod selection;
pub mod surface;
pub mod toolbar;
pub mod ui;

pub use notice::NoticeAlert;
pub use prompt::ImageUrlPrompt;
pub use surface::EditorSurface;
pub use toolbar::Toolbar;
