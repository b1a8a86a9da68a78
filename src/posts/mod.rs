pub mod services;
pub mod slug;
