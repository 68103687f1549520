//! # pmolsession - Session de commande vers la lampe CSRMesh
//!
//! Ce crate porte le cœur du pont : la session stateful vers la lampe et
//! l'API HTTP de contrôle interrogée par le hub.
//!
//! ## Fonctionnalités
//!
//! - 💡 **Session device** : connexion, reconnexion sur échec et renvoi
//!   borné des commandes de luminosité
//! - 🔁 **Politique de reprise explicite** : tentatives et délai fixes,
//!   injectables pour les tests
//! - 🚥 **Garde d'indicateur** : LED de statut allumée pendant chaque
//!   opération, éteinte sur tous les chemins de sortie
//! - 🌐 **API de contrôle** : router Axum traduisant les chemins de polling
//!   du hub en commandes de session, réponse `OK` inconditionnelle
//!
//! ## Architecture
//!
//! - [`DeviceSession`] : propriétaire exclusif de la connexion au device
//! - [`DeviceLink`] / [`DeviceConnection`] : frontière vers le transport
//!   sans fil et le codec propriétaire (implémentés ailleurs)
//! - [`LightControl`] : poignée partagée sérialisant les commandes
//! - [`BrightnessLevel`] : pourcentage externe borné, conversion native

pub mod api;
mod brightness;
mod errors;
mod indicator;
mod link;
mod retry;
mod session;

pub use api::{control_router, LightAction, LightControl};
pub use brightness::BrightnessLevel;
pub use errors::SessionError;
pub use indicator::{IndicatorGuard, NullIndicator, StatusIndicator};
pub use link::{DeviceConnection, DeviceLink};
pub use retry::RetryPolicy;
pub use session::{pick_endpoint, DeviceSession, SessionState};

#[cfg(test)]
pub(crate) mod testing;
