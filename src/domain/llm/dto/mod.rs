pub mod llm_messages;
