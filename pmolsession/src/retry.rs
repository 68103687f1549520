use std::time::Duration;

/// Politique de reprise à tentatives bornées et délai fixe.
///
/// Appliquée par la session autour de l'ouverture du lien : chaque échec
/// est suivi d'une attente de `delay` avant la tentative suivante. Un
/// appel peut donc bloquer jusqu'à `attempts × delay` avant d'échouer.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self { attempts, delay }
    }
}

impl Default for RetryPolicy {
    /// 3 tentatives espacées de 2 secondes.
    fn default() -> Self {
        Self::new(3, Duration::from_secs(2))
    }
}
