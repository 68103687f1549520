use anyhow::Result;
use async_trait::async_trait;

/// Connexion ouverte vers la lampe.
///
/// La connexion encapsule le transport sans fil et le codec de commande
/// propriétaire; la session ne voit que des niveaux natifs (0..=255).
#[async_trait]
pub trait DeviceConnection: Send {
    /// Envoie une luminosité sur l'échelle native du device.
    async fn send_brightness(&mut self, native: u8) -> Result<()>;

    /// Ferme la connexion. Ne doit jamais échouer de façon observable.
    async fn close(&mut self);
}

/// Capacité d'ouverture de connexions vers la lampe.
///
/// `endpoint` est une adresse physique du pool de candidats (une adresse
/// MAC BLE pour le transport CSRMesh).
#[async_trait]
pub trait DeviceLink: Send + Sync {
    async fn open(&self, endpoint: &str) -> Result<Box<dyn DeviceConnection>>;
}
