// Domain layer - Fleet entities and movement rules
pub mod car;
