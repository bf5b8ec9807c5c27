pub mod claims;
pub mod profile;

pub use claims::Claims;
pub use profile::UserProfile;
