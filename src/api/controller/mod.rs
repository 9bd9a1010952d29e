pub mod agent;
pub mod system;
pub mod tool;
