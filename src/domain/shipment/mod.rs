//! Shipment aggregate
//!
//! The shipment subsystem owns these records; the billing core prices them
//! once, reads them, and flags them as invoiced.

pub mod model;
pub mod repository;

pub use model::{NewShipment, RegisterShipment, Shipment, ShipmentStatus};
pub use repository::ShipmentRepository;
