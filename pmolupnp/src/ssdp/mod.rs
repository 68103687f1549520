//! Protocole SSDP côté responder

mod message;
mod responder;

pub use message::{ParseError, SearchRequest, SearchResponse};
pub use responder::SsdpResponder;

/// Adresse multicast SSDP
pub const SSDP_MULTICAST_ADDR: &str = "239.255.255.250";

/// Port SSDP
pub const SSDP_PORT: u16 = 1900;

/// Durée de validité des réponses de recherche (en secondes)
pub const MAX_AGE: u32 = 30;

/// Identification serveur des réponses de recherche
pub const SERVER_ID: &str = "Linux, UPnP/1.0, PMOLight/1.0";
