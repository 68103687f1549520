//! Utilitaires réseau et système pour PMOLight.
//!
//! Ce crate fournit les briques bas niveau partagées par le pont :
//!
//! - [`local_ip_for_peer`] : résolution de l'adresse IP locale utilisée pour
//!   joindre un correspondant donné (nécessaire pour construire une URL
//!   `LOCATION` joignable par le hub qui interroge)
//! - [`guess_local_ip`] : détection de l'adresse IP locale de la machine
//! - [`hardware_node_id`] : identifiant matériel stable de la machine,
//!   utilisé pour dériver l'identité UPnP du device

mod ip_utils;
mod node;

pub use ip_utils::{guess_local_ip, local_ip_for_peer};
pub use node::hardware_node_id;
