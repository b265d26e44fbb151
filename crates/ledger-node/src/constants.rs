pub const DEFAULT_LISTEN: &str = "127.0.0.1:5000";
pub const MINED_MESSAGE: &str = "A block is MINED";
pub const HEALTH_OK: &str = "ok";
