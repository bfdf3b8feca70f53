//! Card domain module.
//!
//! # Module Structure
//!
//! - `aggregate` - Card aggregate entity
//! - `profile` - Contact details payload and its validation
//! - `vcard` - vCard 3.0 export

mod aggregate;
mod profile;
mod vcard;

pub use aggregate::{Card, MAX_CARD_NAME_LEN};
pub use profile::{parse_hex_color, CardProfile, SocialLink};
pub use vcard::{download_file_name, to_vcard, vcard_file_name};
