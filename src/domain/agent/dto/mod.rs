pub mod agent_dto;
