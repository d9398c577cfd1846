//! Real Copenhagen area locations for realistic test fixtures.
//!
//! Coordinates sourced from OpenStreetMap.

use inspection_router::model::Coordinate;

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    pub fn coords(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }
}

// ============================================================================
// Home bases
// ============================================================================

pub const CITY_HALL_SQUARE: Location = Location::new("Rådhuspladsen", 55.6761, 12.5683);
pub const VALBY: Location = Location::new("Valby Station", 55.6617, 12.5146);
pub const HELLERUP: Location = Location::new("Hellerup Station", 55.7310, 12.5700);

// ============================================================================
// Inner city sites
// ============================================================================

pub const NYHAVN: Location = Location::new("Nyhavn", 55.6798, 12.5907);
pub const LITTLE_MERMAID: Location = Location::new("Den Lille Havfrue", 55.6929, 12.5993);
pub const ROSENBORG: Location = Location::new("Rosenborg Slot", 55.6858, 12.5770);
pub const AMALIENBORG: Location = Location::new("Amalienborg", 55.6840, 12.5933);
pub const CHRISTIANSBORG: Location = Location::new("Christiansborg", 55.6761, 12.5802);
pub const TIVOLI: Location = Location::new("Tivoli", 55.6737, 12.5681);

// ============================================================================
// Outer districts and suburbs
// ============================================================================

pub const FREDERIKSBERG_HAVE: Location = Location::new("Frederiksberg Have", 55.6755, 12.5244);
pub const CARLSBERG: Location = Location::new("Carlsberg Byen", 55.6665, 12.5370);
pub const FAELLEDPARKEN: Location = Location::new("Fælledparken", 55.7003, 12.5713);
pub const ASSISTENS: Location = Location::new("Assistens Kirkegård", 55.6913, 12.5496);
pub const AMAGER_STRAND: Location = Location::new("Amager Strandpark", 55.6555, 12.6476);
pub const LYNGBY: Location = Location::new("Kongens Lyngby", 55.7704, 12.5038);
pub const ROSKILDE: Location = Location::new("Roskilde Domkirke", 55.6426, 12.0804);

/// Sites spread across the city, for solver property tests.
pub const CITY_SITES: &[Location] = &[
    NYHAVN,
    LITTLE_MERMAID,
    ROSENBORG,
    AMALIENBORG,
    CHRISTIANSBORG,
    TIVOLI,
    FREDERIKSBERG_HAVE,
    CARLSBERG,
    FAELLEDPARKEN,
    ASSISTENS,
    AMAGER_STRAND,
    LYNGBY,
];
