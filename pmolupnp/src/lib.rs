//! # Module SSDP - découverte du pont PMOLight
//!
//! Ce crate implémente la partie découverte du pont : un responder SSDP
//! (Simple Service Discovery Protocol) qui permet au hub domotique de
//! localiser le pont sans configuration préalable.
//!
//! ## Fonctionnalités
//!
//! - ✅ Écoute des M-SEARCH sur le groupe multicast standard
//! - ✅ Réponse unicast avec l'URL de description (`LOCATION`)
//! - ✅ Filtrage sur le type de device annoncé (header `ST`)
//! - ✅ Datagrammes malformés ignorés silencieusement
//! - ✅ Arrêt propre avec départ du groupe multicast
//!
//! Contrairement à un stack UPnP complet, le pont ne fait ni annonces
//! périodiques NOTIFY ni eventing GENA : le hub interroge par polling HTTP
//! et relance lui-même ses recherches multicast.
//!
//! ## Architecture
//!
//! - [`ssdp::SsdpResponder`] : socket multicast et boucle de réponse
//! - [`ssdp::SearchRequest`] / [`ssdp::SearchResponse`] : protocole texte
//! - [`device_identity`] / [`device_target`] : identité UPnP du device

mod identity;
pub mod ssdp;

pub use identity::{device_identity, device_target};
pub use ssdp::SsdpResponder;
