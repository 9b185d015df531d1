//! Security module - folder access control and validation

pub mod inheritance;
pub mod permission;
pub mod role;
pub mod validator;

pub use self::inheritance::*;
pub use self::permission::*;
pub use self::role::*;
pub use self::validator::*;
