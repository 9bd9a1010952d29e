pub mod resource_records;
pub mod tool_params;
pub mod tool_result;
pub mod tool_spec;
