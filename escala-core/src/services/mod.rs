//! Service layer
//!
//! - [`reminder`] - next-day task reminder computation and routing
//! - [`push`] - push notification channel boundary
//! - [`mailer`] - outbound mail boundary
//! - [`assignment`] - new-assignment diff and admin notices
//! - [`avatar`] - avatar image processing

pub mod assignment;
pub mod avatar;
pub mod mailer;
pub mod push;
pub mod reminder;
