use sortbin::config::SorterConfig;

#[toml_cfg::toml_config]
pub struct TomlConfig {
    #[default(115200)]
    pub baud_rate: u32,
    #[default(500)]
    pub settle_ms: u32,
    #[default(3000)]
    pub dwell_ms: u32,
    #[default(12)]
    pub jpeg_quality: u8,
}

pub fn sorter_config() -> SorterConfig {
    let mut config = SorterConfig::default();
    config.transport.baud_rate = TOML_CONFIG.baud_rate;
    config.timing.settle_ms = TOML_CONFIG.settle_ms;
    config.timing.dwell_ms = TOML_CONFIG.dwell_ms;
    config.camera.jpeg_quality = TOML_CONFIG.jpeg_quality;
    config
}
