pub mod agent_service;
