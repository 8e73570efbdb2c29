pub mod appointment;
pub mod client;
pub mod enums;
pub mod reminder;
pub mod service;
pub mod template;

pub use appointment::*;
pub use client::*;
pub use reminder::*;
pub use service::*;
pub use template::*;
