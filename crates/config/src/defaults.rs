pub fn default_symbols() -> Vec<String> {
    vec!["BTCUSD".to_string()]
}

pub fn default_log_format() -> String {
    "pretty".to_string()
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_redis_port() -> u16 {
    6379
}

pub fn default_depth_levels() -> u32 {
    100
}

pub fn default_snapshot_throttle_ms() -> u64 {
    50
}
