//! WebSocket interfaces
//!
//! - `notifications`: live parking events for dashboards and gate displays

pub mod notifications;

pub use notifications::{
    create_notification_state, ws_notifications_handler, EventFilter, NotificationState,
};
