pub mod ports;
pub mod prompts;
pub mod services;
pub mod use_cases;
