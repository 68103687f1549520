mod indicator;

use anyhow::Result;
use pmolconfig::get_config;
use pmollink::CsrMeshLink;
use pmolserver::Server;
use pmolsession::{DeviceSession, LightControl, RetryPolicy, control_router};
use pmolupnp::{SsdpResponder, device_identity, device_target};
use pmolutils::hardware_node_id;
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // ========== PHASE 1 : Configuration et logs ==========

    let config = get_config();
    pmolserver::init_logging(config.get_debug());

    // ========== PHASE 2 : Identité UPnP ==========

    let node_id = hardware_node_id();
    let target = device_target(config.get_device_index());
    let identity = device_identity(&node_id);
    info!("📡 Device target: {} (uuid:{})", target, identity);

    // ========== PHASE 3 : Session vers la lampe ==========

    let addresses = config.get_device_addresses()?;
    let pin = config.get_device_pin()?;
    let status = indicator::indicator_for_host();

    let link = Arc::new(CsrMeshLink::new(pin));
    let mut session = DeviceSession::new(
        link,
        addresses,
        RetryPolicy::default(),
        status.clone(),
    );

    info!("💡 Connecting to the light...");
    if let Err(e) = session.connect().await {
        // Le service démarre quand même : la session se reconnecte
        // à la première commande
        warn!("⚠️ Initial connection failed: {}", e);
    }

    let control = LightControl::new(session, target.clone(), status);

    // ========== PHASE 4 : Découverte SSDP ==========

    let http_port = config.get_http_port();
    let mut responder = SsdpResponder::new(target, identity, http_port);
    responder.start()?;

    // ========== PHASE 5 : Serveur de contrôle HTTP ==========

    info!("🌐 Starting HTTP control server...");
    let mut server = Server::new("PMO-Light-Bridge", http_port);
    server.add_router("/", control_router(control.clone())).await;
    server.start().await?;

    info!("✅ PMOLight is ready!");
    info!("Press Ctrl+C to stop...");
    server.wait().await;

    // ========== Arrêt ==========

    responder.stop();
    control.shutdown().await;
    info!("👋 PMOLight stopped");

    Ok(())
}
