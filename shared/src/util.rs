/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a prefixed unique string ID.
///
/// Layout: `{prefix}_{millis}{rand}` — milliseconds since epoch plus
/// 12 random bits (4096 values per ms, collision-free at roster scale).
///
/// Used for member ids created on sign-up (`m_...`) and for synthetic
/// ids of unregistered schedule participants (`p_...`).
pub fn unique_id(prefix: &str) -> String {
    use rand::Rng;
    let rand_bits: u16 = rand::thread_rng().gen_range(0..0x1000);
    format!("{}_{}{:03x}", prefix, now_millis(), rand_bits)
}
