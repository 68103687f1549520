//! API HTTP de contrôle de la lampe (polling du hub)
//!
//! Le hub n'a pas de canal d'erreur riche : chaque chemin répond `OK`,
//! y compris les chemins inconnus et les commandes dont l'envoi a échoué
//! après la politique de reprise (l'échec est alors journalisé). Choix
//! documenté, hérité de l'intégration d'origine.

use crate::brightness::BrightnessLevel;
use crate::indicator::{IndicatorGuard, StatusIndicator};
use crate::session::DeviceSession;
use axum::extract::{Query, State};
use axum::http::Uri;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

const OK: &str = "OK";

/// Action de contrôle correspondant à un chemin HTTP reconnu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightAction {
    On,
    Off,
    Level(i64),
    Brighter,
    Dimmer,
}

struct ControlInner {
    session: DeviceSession,
    level: BrightnessLevel,
    device_target: String,
}

/// Poignée partagée sur la session et le niveau courant.
///
/// Le mutex unique sérialise les commandes dans l'ordre d'acceptation des
/// requêtes (file FIFO de `tokio::sync::Mutex`) : l'invariant « jamais deux
/// commandes en vol » tient même sous un runtime multi-thread.
#[derive(Clone)]
pub struct LightControl {
    inner: Arc<Mutex<ControlInner>>,
    indicator: Arc<dyn StatusIndicator>,
}

impl LightControl {
    pub fn new(
        session: DeviceSession,
        device_target: impl Into<String>,
        indicator: Arc<dyn StatusIndicator>,
    ) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ControlInner {
                session,
                level: BrightnessLevel::MIN,
                device_target: device_target.into(),
            })),
            indicator,
        }
    }

    /// Garde d'indicateur couvrant le traitement d'une requête.
    fn guard(&self) -> IndicatorGuard {
        IndicatorGuard::hold(&self.indicator)
    }

    /// Applique une action : met à jour le niveau puis pousse la commande.
    ///
    /// Un échec après la politique de reprise de la session est journalisé
    /// mais jamais remonté au hub.
    pub async fn apply(&self, action: LightAction) {
        let mut inner = self.inner.lock().await;

        let level = match action {
            LightAction::On => BrightnessLevel::MAX,
            LightAction::Off => BrightnessLevel::MIN,
            LightAction::Level(percent) => BrightnessLevel::clamped(percent),
            LightAction::Brighter => inner.level.brighter(),
            LightAction::Dimmer => inner.level.dimmer(),
        };
        inner.level = level;

        if let Err(e) = inner.session.set_brightness(level).await {
            warn!("⚠️ Brightness command failed after retries: {}", e);
        }
    }

    /// Niveau externe courant.
    pub async fn level(&self) -> BrightnessLevel {
        self.inner.lock().await.level
    }

    /// Document de description servi sur `/status` (cible du LOCATION).
    pub async fn status(&self) -> Value {
        let inner = self.inner.lock().await;
        json!({
            "device_target": inner.device_target,
            "level": inner.level.percent(),
            "state": format!("{:?}", inner.session.state()),
        })
    }

    /// Libère la connexion sous-jacente (arrêt du pont).
    pub async fn shutdown(&self) {
        self.inner.lock().await.session.disconnect().await;
    }
}

/// Construit le router de contrôle interrogé par le hub.
pub fn control_router(control: LightControl) -> Router {
    Router::new()
        .route("/status", get(status))
        .route("/light_on", get(light_on))
        .route("/light_off", get(light_off))
        .route("/light_level", get(light_level))
        .route("/light_bright", get(light_bright))
        .route("/light_dim", get(light_dim))
        .fallback(unrecognized)
        .with_state(control)
}

async fn status(State(control): State<LightControl>) -> Json<Value> {
    let _guard = control.guard();
    Json(control.status().await)
}

async fn light_on(State(control): State<LightControl>) -> &'static str {
    let _guard = control.guard();
    info!("💡 light_on");
    control.apply(LightAction::On).await;
    OK
}

async fn light_off(State(control): State<LightControl>) -> &'static str {
    let _guard = control.guard();
    info!("💡 light_off");
    control.apply(LightAction::Off).await;
    OK
}

async fn light_level(
    State(control): State<LightControl>,
    Query(params): Query<HashMap<String, String>>,
) -> &'static str {
    let _guard = control.guard();
    match params.get("level").and_then(|v| v.parse::<i64>().ok()) {
        Some(percent) => {
            info!("💡 light_level {}", percent);
            control.apply(LightAction::Level(percent)).await;
        }
        None => {
            // Paramètre absent ou non numérique : traité comme une requête
            // non reconnue, sans changement d'état
            info!("Ignored light_level request without usable level parameter");
        }
    }
    OK
}

async fn light_bright(State(control): State<LightControl>) -> &'static str {
    let _guard = control.guard();
    info!("💡 light_bright");
    control.apply(LightAction::Brighter).await;
    OK
}

async fn light_dim(State(control): State<LightControl>) -> &'static str {
    let _guard = control.guard();
    info!("💡 light_dim");
    control.apply(LightAction::Dimmer).await;
    OK
}

async fn unrecognized(State(control): State<LightControl>, uri: Uri) -> &'static str {
    let _guard = control.guard();
    info!("Received bogus request for {}", uri.path());
    OK
}
