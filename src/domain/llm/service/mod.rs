pub mod backend_selector;
