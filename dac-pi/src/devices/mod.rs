pub mod mcp4725;
pub mod tlc5615;
