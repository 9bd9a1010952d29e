pub mod dto;
pub mod service;
pub mod tool_registry;
