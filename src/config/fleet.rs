use log::info;
use serde::Deserialize;
use std::fs;
use std::sync::Arc;
use thiserror::Error;
use crate::models::booking::Vehicle;

#[derive(Debug, Error)]
pub enum FleetError {
    #[error("Fleet file IO error: {0}")] Io(#[from] std::io::Error),
    #[error("Fleet JSON parsing error: {0}")] Json(#[from] serde_json::Error),
    #[error("Invalid fleet catalog: {0}")] Invalid(String),
}

#[derive(Deserialize, Debug, Clone)]
pub struct FleetConfig {
    pub vehicles: Vec<Vehicle>,
}

impl FleetConfig {
    fn validate(&self) -> Result<(), FleetError> {
        if self.vehicles.is_empty() {
            return Err(FleetError::Invalid("fleet catalog has no vehicles".to_string()));
        }
        for vehicle in &self.vehicles {
            if vehicle.name.trim().is_empty() {
                return Err(
                    FleetError::Invalid(format!("vehicle '{}' has no name", vehicle.id))
                );
            }
        }
        Ok(())
    }

    pub fn find(&self, vehicle_id: &str) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| v.id == vehicle_id)
    }
}

pub fn load_fleet(path: &str) -> Result<Arc<FleetConfig>, FleetError> {
    let file_content = fs::read_to_string(path)?;
    let config: FleetConfig = serde_json::from_str(&file_content)?;
    config.validate()?;
    info!("Loaded {} vehicles from {}", config.vehicles.len(), path);
    Ok(Arc::new(config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_catalog_loads_and_resolves_ids() {
        let fleet = load_fleet("json/fleet.json").unwrap();
        let innova = fleet.find("innova").unwrap();
        assert_eq!(innova.price_per_day, 850000);
        assert!(fleet.find("missing").is_none());
    }
}
