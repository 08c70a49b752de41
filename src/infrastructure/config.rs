use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct FleetConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub fleet: FleetSettings,
    #[serde(default)]
    pub seed: Option<SeedSettings>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerSettings {
    pub listen_addr: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FleetSettings {
    pub target_car_count: usize,
    pub update_interval_ms: u64,
}

impl Default for FleetSettings {
    fn default() -> Self {
        Self {
            target_car_count: 15,
            update_interval_ms: 5000,
        }
    }
}

/// Remote mirror settings; leaving the section out runs the service
/// local-only.
#[derive(Debug, Deserialize, Clone)]
pub struct SeedSettings {
    pub url: String,
}

pub fn load_fleet_config() -> anyhow::Result<FleetConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/fleet").required(false))
        .build()?;

    Ok(settings.try_deserialize()?)
}
