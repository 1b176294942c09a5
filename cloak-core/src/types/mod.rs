//! Core data types for the cloak protocol.

mod address;
mod announcement;
mod keys;

pub use address::{EthAddress, MetaAddress, StealthAddressBundle};
pub use announcement::{Announcement, AnnouncementStats};
pub use keys::{PublicKeyBytes, RootSecret};
