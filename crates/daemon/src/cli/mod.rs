pub mod args;
pub mod op;
pub mod ops;

pub use ops::{Chain, Daemon, Health, Init, Post, React, Version};
