// SPDX-License-Identifier: MPL-2.0
//! User feedback queue for edit outcomes.
//!
//! Edit operations report success or failure through short, localized
//! messages. Hosts push [`Notification`]s here and render whatever is
//! visible; resolving the text goes through [`crate::i18n::I18n`].
//!
//! # Components
//!
//! - [`notification`] - `Notification` with severity and i18n key
//! - [`manager`] - `Manager`: visible slots, waiting queue, de-duplication
//!
//! # Usage
//!
//! ```ignore
//! use photo_edit::notifications::{Manager, Notification};
//!
//! let mut manager = Manager::new();
//! manager.report(&session.apply_crop(), "notification-crop-applied");
//! if let Ok(saved) = session.export(&store) {
//!     manager.push(Notification::saved(&saved));
//! }
//! ```

mod manager;
mod notification;

pub use manager::{Manager, MAX_VISIBLE};
pub use notification::{Notification, NotificationId, Severity};
