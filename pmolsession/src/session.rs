//! Session stateful vers la lampe : connexion, reconnexion, renvoi borné

use crate::brightness::BrightnessLevel;
use crate::errors::SessionError;
use crate::indicator::{IndicatorGuard, StatusIndicator};
use crate::link::{DeviceConnection, DeviceLink};
use crate::retry::RetryPolicy;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use tracing::{info, warn};

/// État de la connexion au device, propriété exclusive de la session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Connected,
    Reconnecting,
}

/// Choisit un endpoint uniformément au hasard dans le pool de candidats.
///
/// Le pool est figé après construction; la source d'aléa est injectée pour
/// rendre le choix reproductible en test.
///
/// # Panics
///
/// Panique si le pool est vide (la construction de la session l'interdit).
pub fn pick_endpoint<'a, R: Rng + ?Sized>(pool: &'a [String], rng: &mut R) -> &'a str {
    &pool[rng.random_range(0..pool.len())]
}

/// Session vers la lampe.
///
/// La session est l'unique propriétaire de la connexion sans fil; le
/// détenteur (un seul `&mut self` à la fois, voir [`crate::LightControl`])
/// garantit la sérialisation des commandes.
pub struct DeviceSession {
    link: Arc<dyn DeviceLink>,
    endpoints: Vec<String>,
    retry: RetryPolicy,
    indicator: Arc<dyn StatusIndicator>,
    connection: Option<Box<dyn DeviceConnection>>,
    state: SessionState,
    rng: StdRng,
}

impl DeviceSession {
    /// Crée une session déconnectée sur le pool d'endpoints donné.
    ///
    /// # Panics
    ///
    /// Panique si `endpoints` est vide.
    pub fn new(
        link: Arc<dyn DeviceLink>,
        endpoints: Vec<String>,
        retry: RetryPolicy,
        indicator: Arc<dyn StatusIndicator>,
    ) -> Self {
        Self::with_rng(link, endpoints, retry, indicator, StdRng::from_os_rng())
    }

    /// Variante avec source d'aléa explicite (choix d'endpoint testable).
    pub fn with_rng(
        link: Arc<dyn DeviceLink>,
        endpoints: Vec<String>,
        retry: RetryPolicy,
        indicator: Arc<dyn StatusIndicator>,
        rng: StdRng,
    ) -> Self {
        assert!(
            !endpoints.is_empty(),
            "candidate endpoint pool must not be empty"
        );
        Self {
            link,
            endpoints,
            retry,
            indicator,
            connection: None,
            state: SessionState::Disconnected,
            rng,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Ouvre une connexion vers un endpoint tiré au hasard.
    ///
    /// Chaque échec est suivi du délai de la politique de reprise; après
    /// épuisement des tentatives l'appel échoue avec
    /// [`SessionError::Connection`] et l'état reste `Disconnected`.
    pub async fn connect(&mut self) -> Result<(), SessionError> {
        let _guard = IndicatorGuard::hold(&self.indicator);
        self.connect_inner().await
    }

    async fn connect_inner(&mut self) -> Result<(), SessionError> {
        // Une connexion encore ouverte est relâchée avant d'en rouvrir une
        if let Some(mut stale) = self.connection.take() {
            stale.close().await;
        }

        let mut last_error = String::from("no attempt made");

        for attempt in 1..=self.retry.attempts {
            let endpoint = pick_endpoint(&self.endpoints, &mut self.rng).to_string();
            info!(
                "Connecting to csrmesh device {} (attempt {}/{})",
                endpoint, attempt, self.retry.attempts
            );

            match self.link.open(&endpoint).await {
                Ok(connection) => {
                    self.connection = Some(connection);
                    self.state = SessionState::Connected;
                    info!("✅ Connected to {}", endpoint);
                    return Ok(());
                }
                Err(e) => {
                    warn!(
                        "Connection attempt {}/{} to {} failed: {}",
                        attempt, self.retry.attempts, endpoint, e
                    );
                    last_error = e.to_string();
                    if attempt < self.retry.attempts {
                        tokio::time::sleep(self.retry.delay).await;
                    }
                }
            }
        }

        self.state = SessionState::Disconnected;
        Err(SessionError::Connection {
            attempts: self.retry.attempts,
            reason: last_error,
        })
    }

    /// Envoie une luminosité (échelle externe 0–100) vers la lampe.
    ///
    /// Si l'envoi échoue, la session exécute exactement un cycle de
    /// reconnexion (lui-même repris en interne) puis renvoie la commande
    /// une seule fois; si cela échoue aussi, l'appel remonte
    /// [`SessionError::Command`] et l'appelant décide quoi en faire.
    pub async fn set_brightness(&mut self, level: BrightnessLevel) -> Result<(), SessionError> {
        let _guard = IndicatorGuard::hold(&self.indicator);
        let native = level.to_native();

        match self.try_send(native).await {
            Ok(()) => Ok(()),
            Err(e) => {
                warn!("Brightness send failed ({}), reconnecting", e);
                self.state = SessionState::Reconnecting;

                self.connect_inner()
                    .await
                    .map_err(|e| SessionError::Command(format!("reconnect failed: {e}")))?;

                self.try_send(native)
                    .await
                    .map_err(|e| SessionError::Command(e.to_string()))
            }
        }
    }

    async fn try_send(&mut self, native: u8) -> anyhow::Result<()> {
        match self.connection.as_mut() {
            Some(connection) => connection.send_brightness(native).await,
            None => Err(anyhow::anyhow!("no open connection")),
        }
    }

    /// Ferme la connexion si elle existe. Idempotent, n'échoue jamais.
    pub async fn disconnect(&mut self) {
        if let Some(mut connection) = self.connection.take() {
            connection.close().await;
        }
        self.state = SessionState::Disconnected;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicator::NullIndicator;
    use crate::testing::ScriptedLink;

    fn fast_retry() -> RetryPolicy {
        RetryPolicy::new(3, std::time::Duration::from_millis(1))
    }

    fn session_with(link: ScriptedLink) -> DeviceSession {
        DeviceSession::with_rng(
            Arc::new(link),
            vec!["00:02:5B:00:15:2A".to_string()],
            fast_retry(),
            Arc::new(NullIndicator),
            StdRng::seed_from_u64(7),
        )
    }

    #[test]
    fn test_pick_endpoint_is_deterministic_with_seed() {
        let pool = vec![
            "aa".to_string(),
            "bb".to_string(),
            "cc".to_string(),
        ];

        let first = pick_endpoint(&pool, &mut StdRng::seed_from_u64(42)).to_string();
        let second = pick_endpoint(&pool, &mut StdRng::seed_from_u64(42)).to_string();

        assert_eq!(first, second);
        assert!(pool.contains(&first));
    }

    #[test]
    fn test_pick_endpoint_covers_the_pool() {
        let pool = vec!["aa".to_string(), "bb".to_string()];
        let mut rng = StdRng::seed_from_u64(1);

        let mut seen = std::collections::HashSet::new();
        for _ in 0..64 {
            seen.insert(pick_endpoint(&pool, &mut rng).to_string());
        }

        assert_eq!(seen.len(), 2, "Both endpoints should eventually be picked");
    }

    #[tokio::test]
    async fn test_connect_succeeds_on_third_attempt() {
        let link = ScriptedLink::new();
        link.plan_opens([false, false, true]);

        let mut session = session_with(link.clone());
        let result = session.connect().await;

        assert!(result.is_ok());
        assert_eq!(session.state(), SessionState::Connected);
        assert_eq!(link.open_count(), 3);
    }

    #[tokio::test]
    async fn test_connect_fails_after_exhausting_attempts() {
        let link = ScriptedLink::new();
        link.plan_opens([false, false, false]);

        let mut session = session_with(link.clone());
        let result = session.connect().await;

        assert!(matches!(
            result,
            Err(SessionError::Connection { attempts: 3, .. })
        ));
        assert_eq!(session.state(), SessionState::Disconnected);
        assert_eq!(link.open_count(), 3);
    }

    #[tokio::test]
    async fn test_set_brightness_maps_percent_to_native_scale() {
        let link = ScriptedLink::new();
        link.plan_opens([true]);

        let mut session = session_with(link.clone());
        session.connect().await.unwrap();
        session
            .set_brightness(BrightnessLevel::clamped(50))
            .await
            .unwrap();

        assert_eq!(link.sent(), vec![128]);
    }

    #[tokio::test]
    async fn test_set_brightness_reconnects_and_resends_once() {
        let link = ScriptedLink::new();
        link.plan_opens([true, true]); // connexion initiale + reconnexion
        link.plan_sends([false, true]); // premier envoi en échec, renvoi ok

        let mut session = session_with(link.clone());
        session.connect().await.unwrap();

        let result = session.set_brightness(BrightnessLevel::MAX).await;

        assert!(result.is_ok());
        assert_eq!(session.state(), SessionState::Connected);
        // La commande est partie deux fois au total : 1 échec + 1 succès
        assert_eq!(link.sent(), vec![255, 255]);
        assert_eq!(link.open_count(), 2);
    }

    #[tokio::test]
    async fn test_set_brightness_fails_when_reconnect_fails() {
        let link = ScriptedLink::new();
        link.plan_opens([true, false, false, false]);
        link.plan_sends([false]);

        let mut session = session_with(link.clone());
        session.connect().await.unwrap();

        let result = session.set_brightness(BrightnessLevel::MAX).await;

        assert!(matches!(result, Err(SessionError::Command(_))));
        assert_eq!(session.state(), SessionState::Disconnected);
    }

    #[tokio::test]
    async fn test_set_brightness_fails_when_resend_fails() {
        let link = ScriptedLink::new();
        link.plan_opens([true, true]);
        link.plan_sends([false, false]); // échec puis échec du renvoi unique

        let mut session = session_with(link.clone());
        session.connect().await.unwrap();

        let result = session.set_brightness(BrightnessLevel::MAX).await;

        assert!(matches!(result, Err(SessionError::Command(_))));
        // Pas de troisième envoi : le renvoi est unique
        assert_eq!(link.sent(), vec![255, 255]);
    }

    #[tokio::test]
    async fn test_reconnect_closes_previous_connection() {
        let link = ScriptedLink::new();
        link.plan_opens([true, true]);

        let mut session = session_with(link.clone());
        session.connect().await.unwrap();

        // Un connect() explicite alors que la session est déjà connectée
        // doit relâcher l'ancien lien avant d'en ouvrir un nouveau
        session.connect().await.unwrap();

        assert_eq!(session.state(), SessionState::Connected);
        assert_eq!(link.open_count(), 2);
        assert_eq!(link.close_count(), 1);
    }

    #[tokio::test]
    async fn test_disconnect_is_idempotent() {
        let link = ScriptedLink::new();
        link.plan_opens([true]);

        let mut session = session_with(link.clone());
        session.connect().await.unwrap();

        session.disconnect().await;
        session.disconnect().await;

        assert_eq!(session.state(), SessionState::Disconnected);
        assert_eq!(link.close_count(), 1);
    }

    #[tokio::test]
    async fn test_indicator_wraps_connect_on_failure_too() {
        use std::sync::Mutex;

        #[derive(Default)]
        struct RecordingIndicator {
            transitions: Mutex<Vec<bool>>,
        }
        impl StatusIndicator for RecordingIndicator {
            fn indicate(&self, active: bool) {
                self.transitions.lock().unwrap().push(active);
            }
        }

        let link = ScriptedLink::new();
        link.plan_opens([false, false, false]);
        let recorder = Arc::new(RecordingIndicator::default());

        let mut session = DeviceSession::with_rng(
            Arc::new(link),
            vec!["00:02:5B:00:15:2A".to_string()],
            fast_retry(),
            recorder.clone(),
            StdRng::seed_from_u64(7),
        );

        let _ = session.connect().await;

        // Assert avant l'opération, clear après, même sur échec
        assert_eq!(*recorder.transitions.lock().unwrap(), vec![true, false]);
    }
}
