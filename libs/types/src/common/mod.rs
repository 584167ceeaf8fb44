//! Common value types shared between the pricing core and its configuration

pub mod direction;
pub mod errors;
pub mod fixed_point;
pub mod oracle;
pub mod policy;
