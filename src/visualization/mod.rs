pub mod view;
pub mod window;

pub use view::TelemetryView;
pub use window::ChannelWindow;
