//! # pmolserver - Serveur web haut niveau basé sur Axum
//!
//! Cette crate fournit une abstraction simple pour créer le serveur HTTP
//! du pont lumineux : montage de routes JSON, montage de sous-routers,
//! et arrêt gracieux sur Ctrl+C.
//!
//! ## Fonctionnalités
//!
//! - 🚀 **API de haut niveau** : Interface simple pour créer des serveurs HTTP avec Axum
//! - 🔀 **Sous-routers** : Montage de routers Axum complets avec `add_router()`
//! - 📝 **Logging** : Initialisation `tracing` avec filtre d'environnement
//! - ⚡ **Arrêt gracieux** : Gestion propre de l'arrêt sur Ctrl+C
//!
//! ## Exemple d'utilisation
//!
//! ```rust,no_run
//! use pmolserver::ServerBuilder;
//!
//! #[tokio::main]
//! async fn main() {
//!     pmolserver::init_logging(false);
//!
//!     let mut server = ServerBuilder::new("MyBridge", 8080).build();
//!     server
//!         .add_route("/info", || async {
//!             serde_json::json!({"version": "1.0.0"})
//!         })
//!         .await;
//!     server.start().await.unwrap();
//!     server.wait().await;
//! }
//! ```

pub mod logs;
pub mod server;

pub use logs::init_logging;
pub use server::{Server, ServerBuilder, ServerInfo};
