mod ids;
mod notification;
mod session;
mod status;
mod track;

pub use ids::{EngineHandle, SessionToken};
pub use notification::{Notification, NotificationTap};
pub use session::SessionState;
pub use status::{format_millis, PlaybackStatus};
pub use track::TrackRef;
