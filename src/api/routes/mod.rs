//! API route declarations (e.g., /api/v1/*)

pub mod agent_routes;
pub mod system_routes;
pub mod tool_routes;
