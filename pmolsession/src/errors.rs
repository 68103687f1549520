use thiserror::Error;

/// Erreurs émises par la session device.
///
/// Une fois la politique de reprise épuisée, l'erreur est remontée à
/// l'appelant et la session ne retente plus rien d'elle-même.
#[derive(Error, Debug)]
pub enum SessionError {
    /// L'ouverture du lien a échoué après épuisement des tentatives.
    #[error("connection failed after {attempts} attempts: {reason}")]
    Connection { attempts: u32, reason: String },

    /// L'envoi d'une commande a échoué malgré la reconnexion et le renvoi.
    #[error("command failed: {0}")]
    Command(String),
}
