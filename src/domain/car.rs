// Car domain model
use chrono::{SecondsFormat, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Operational state of a car. Unknown values are rejected at the JSON
/// boundary, so the rest of the service only ever sees these three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CarStatus {
    Moving,
    Stopped,
    Idle,
}

impl CarStatus {
    /// Canonical status order, used for balancing and distribution output.
    pub const ALL: [CarStatus; 3] = [CarStatus::Moving, CarStatus::Stopped, CarStatus::Idle];
}

impl fmt::Display for CarStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CarStatus::Moving => "Moving",
            CarStatus::Stopped => "Stopped",
            CarStatus::Idle => "Idle",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Car {
    pub id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub speed: u32,
    pub status: CarStatus,
    pub timestamp: String,
}

/// A car that has not been assigned an identity yet. The store (or the
/// remote mirror) owns id assignment.
#[derive(Debug, Clone, Serialize)]
pub struct NewCar {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub speed: u32,
    pub status: CarStatus,
    pub timestamp: String,
}

impl NewCar {
    pub fn into_car(self, id: String) -> Car {
        Car {
            id,
            name: self.name,
            latitude: self.latitude,
            longitude: self.longitude,
            speed: self.speed,
            status: self.status,
            timestamp: self.timestamp,
        }
    }
}

impl Car {
    /// Apply one random-walk step in the given direction. The step length is
    /// derived from the car's speed; coordinates keep 6-decimal precision.
    pub fn advance(&mut self, angle: f64) {
        let speed_factor = f64::from(self.speed) / 10.0;
        let distance = speed_factor * 0.001;
        self.latitude = round_coordinate(self.latitude + angle.sin() * distance);
        self.longitude = round_coordinate(self.longitude + angle.cos() * distance);
        self.timestamp = now_timestamp();
    }
}

/// Round a coordinate to 6 decimal places.
pub fn round_coordinate(value: f64) -> f64 {
    (value * 1_000_000.0).round() / 1_000_000.0
}

/// Display name for the n-th car, cycling A-Z.
pub fn fleet_letter_name(index: usize) -> String {
    let letter = (b'A' + (index % 26) as u8) as char;
    format!("Car {}", letter)
}

/// Random speed for a car entering the Moving state.
pub fn roll_moving_speed() -> u32 {
    rand::rng().random_range(30..90)
}

/// Current time in ISO-8601 with millisecond precision.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
