//! # Module Server - API de haut niveau pour Axum
//!
//! Ce module fournit une abstraction simple pour créer le serveur HTTP du
//! pont, en cachant la configuration du listener et du routage.
//!
//! ## Fonctionnalités
//!
//! - 🚀 **Routes JSON simples** : Ajoutez des endpoints API avec `add_route()`
//! - 🔀 **Sous-routers** : Montez des routers Axum complets avec `add_router()`
//! - ⚡ **Gestion gracieuse** : Arrêt propre sur Ctrl+C

use axum::routing::get;
use axum::{Json, Router};
use pmolconfig::get_config;
use serde::Serialize;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::{signal, sync::RwLock, task::JoinHandle};
use tracing::{error, info};

/// Info serveur sérialisable
#[derive(Clone, Serialize)]
pub struct ServerInfo {
    pub name: String,
    pub http_port: u16,
}

/// Serveur principal
pub struct Server {
    name: String,
    http_port: u16,
    router: Arc<RwLock<Router>>,
    join_handle: Option<JoinHandle<()>>,
}

impl Server {
    /// Crée une nouvelle instance de serveur
    ///
    /// # Arguments
    ///
    /// * `name` - Nom du serveur (pour les logs)
    /// * `http_port` - Port HTTP à écouter
    pub fn new(name: impl Into<String>, http_port: u16) -> Self {
        Self {
            name: name.into(),
            http_port,
            router: Arc::new(RwLock::new(Router::new())),
            join_handle: None,
        }
    }

    /// Crée un serveur configuré depuis le fichier de configuration.
    pub fn new_configured() -> Self {
        let config = get_config();
        Self::new("PMO-Light-Bridge", config.get_http_port())
    }

    /// Ajoute une route JSON dynamique
    ///
    /// Crée un endpoint GET qui retourne du JSON. La closure fournie sera
    /// appelée à chaque requête sur le chemin spécifié.
    pub async fn add_route<F, Fut, T>(&mut self, path: &str, f: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = T> + Send + 'static,
        T: Serialize + Send + 'static,
    {
        let f = Arc::new(f);
        let handler = {
            let f = f.clone();
            move || {
                let f = f.clone();
                async move { Json(f().await) }
            }
        };

        let route = Router::new().route("/", get(handler));

        let mut r = self.router.write().await;
        *r = if path == "/" {
            std::mem::take(&mut *r).merge(route)
        } else {
            std::mem::take(&mut *r).nest(path, route)
        };
    }

    /// Ajoute un sous-router au serveur
    ///
    /// - Si `path` est "/", merge directement au router principal
    /// - Sinon, nest le router sous le chemin donné
    pub async fn add_router(&mut self, path: &str, sub_router: Router) {
        let mut r = self.router.write().await;

        let combined = if path == "/" {
            r.clone().merge(sub_router)
        } else {
            let normalized = format!("/{}", path.trim_start_matches('/'));
            r.clone().nest(&normalized, sub_router)
        };

        *r = combined;
    }

    /// Démarre le serveur HTTP
    ///
    /// Lance le serveur sur le port configuré et met en place la gestion
    /// de Ctrl+C pour un arrêt gracieux.
    pub async fn start(&mut self) -> anyhow::Result<()> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.http_port));
        info!("🌐 Server {} listening on http://{}", self.name, addr);

        let router = self.router.clone();
        let listener = tokio::net::TcpListener::bind(addr).await?;

        let server_task = tokio::spawn(async move {
            let r = router.read().await.clone();
            if let Err(e) = axum::serve(listener, r.into_make_service()).await {
                error!("❌ HTTP server terminated: {}", e);
            }
        });

        let shutdown_task = tokio::spawn(async move {
            if let Err(e) = signal::ctrl_c().await {
                error!("❌ Failed to listen for ctrl_c: {}", e);
                return;
            }
            info!("👋 Ctrl+C reçu, arrêt gracieux");
        });

        self.join_handle = Some(tokio::spawn(async move {
            tokio::select! {
                _ = server_task => {},
                _ = shutdown_task => {},
            }
        }));

        Ok(())
    }

    /// Attend la fin du serveur
    pub async fn wait(&mut self) {
        if let Some(h) = self.join_handle.take() {
            let _ = h.await;
        }
    }

    /// Récupère les infos du serveur
    pub fn info(&self) -> ServerInfo {
        ServerInfo {
            name: self.name.clone(),
            http_port: self.http_port,
        }
    }
}

/// Builder pattern
pub struct ServerBuilder {
    name: String,
    http_port: u16,
}

impl ServerBuilder {
    /// Crée un nouveau builder
    pub fn new(name: impl Into<String>, http_port: u16) -> Self {
        Self {
            name: name.into(),
            http_port,
        }
    }

    pub fn new_configured() -> Self {
        let config = get_config();
        Self {
            name: "PMO-Light-Bridge".to_string(),
            http_port: config.get_http_port(),
        }
    }

    /// Construit le serveur
    pub fn build(self) -> Server {
        Server::new(self.name, self.http_port)
    }
}
