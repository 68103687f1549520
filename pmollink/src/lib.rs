//! # pmollink - Transport CSRMesh over BLE
//!
//! Implémentation du lien radio vers la lampe : un central BLE (btleplug)
//! qui se connecte à l'ampoule par adresse MAC, et le codec de paquets
//! CSRMesh (clé réseau dérivée du code d'appairage, chiffrement du payload,
//! tag d'authentification tronqué).
//!
//! ## Fonctionnalités
//!
//! - 📡 **Connexion par MAC** : scan puis connexion au périphérique demandé
//! - 🔐 **Codec CSRMesh** : clé réseau depuis le PIN, paquets séquencés
//! - 💡 **Commande de luminosité** : écriture scindée sur les deux
//!   caractéristiques GATT du mesh

pub mod codec;
pub mod transport;

use thiserror::Error;

/// Erreurs du transport BLE.
#[derive(Error, Debug)]
pub enum LinkError {
    /// Aucun adaptateur Bluetooth disponible
    #[error("No Bluetooth adapters found")]
    NoBluetoothAdapters,

    /// Périphérique introuvable après le scan
    #[error("Device {0} not found during scan")]
    DeviceNotFound(String),

    /// Caractéristique GATT requise absente
    #[error("Could not find required BLE characteristic: {0}")]
    CharacteristicNotFound(String),

    /// Erreur remontée par btleplug
    #[error(transparent)]
    Ble(#[from] btleplug::Error),
}

pub use transport::CsrMeshLink;
