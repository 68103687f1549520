//! Responder SSDP : écoute les M-SEARCH multicast et répond en unicast

use super::message::{SearchRequest, SearchResponse};
use super::{SERVER_ID, SSDP_MULTICAST_ADDR, SSDP_PORT};
use pmolutils::local_ip_for_peer;
use socket2::{Domain, Protocol, Socket, Type};
use std::net::{Ipv4Addr, SocketAddr, UdpSocket};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Responder SSDP pour le device unique exposé par le pont.
///
/// Chaque datagramme est traité jusqu'au bout avant de lire le suivant :
/// la découverte est best-effort et idempotente, le hub relance lui-même
/// ses recherches.
pub struct SsdpResponder {
    device_target: String,
    identity: Uuid,
    status_port: u16,
    socket: Option<Arc<UdpSocket>>,
    running: Arc<AtomicBool>,
}

impl SsdpResponder {
    /// Crée un responder pour le type de device et le port de contrôle donnés.
    pub fn new(device_target: impl Into<String>, identity: Uuid, status_port: u16) -> Self {
        Self {
            device_target: device_target.into(),
            identity,
            status_port,
            socket: None,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Démarre l'écoute multicast.
    ///
    /// Le socket est lié avec `SO_REUSEADDR` (d'autres services SSDP peuvent
    /// partager le port 1900), rejoint le groupe multicast et boucle sur un
    /// thread dédié avec un timeout de lecture d'une seconde.
    pub fn start(&mut self) -> std::io::Result<()> {
        let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?;
        socket.set_reuse_address(true)?;
        socket.bind(&SocketAddr::from((Ipv4Addr::UNSPECIFIED, SSDP_PORT)).into())?;

        let socket: UdpSocket = socket.into();
        socket.join_multicast_v4(
            &SSDP_MULTICAST_ADDR.parse().unwrap(),
            &Ipv4Addr::UNSPECIFIED,
        )?;
        socket.set_read_timeout(Some(Duration::from_secs(1)))?;

        let socket = Arc::new(socket);
        self.socket = Some(socket.clone());
        self.running.store(true, Ordering::Relaxed);

        info!(
            "✅ SSDP responder started on {}:{} for {}",
            SSDP_MULTICAST_ADDR, SSDP_PORT, self.device_target
        );

        self.start_search_listener(socket);
        Ok(())
    }

    /// Lance la boucle de lecture des M-SEARCH.
    fn start_search_listener(&self, socket: Arc<UdpSocket>) {
        let device_target = self.device_target.clone();
        let usn = format!("uuid:{}::{}", self.identity, self.device_target);
        let status_port = self.status_port;
        let running = Arc::clone(&self.running);

        std::thread::spawn(move || {
            let mut buf = [0u8; 8192];
            while running.load(Ordering::Relaxed) {
                match socket.recv_from(&mut buf) {
                    Ok((n, src)) => {
                        let data = String::from_utf8_lossy(&buf[..n]);
                        Self::handle_datagram(
                            &socket,
                            src,
                            &data,
                            &device_target,
                            &usn,
                            status_port,
                        );
                    }
                    Err(e)
                        if e.kind() == std::io::ErrorKind::WouldBlock
                            || e.kind() == std::io::ErrorKind::TimedOut =>
                    {
                        // Timeout de lecture, on reteste le flag d'arrêt
                        continue;
                    }
                    Err(e) => {
                        warn!("❌ SSDP read error: {}", e);
                    }
                }
            }
        });
    }

    /// Traite un datagramme reçu et répond si la recherche vise ce device.
    fn handle_datagram(
        socket: &UdpSocket,
        src: SocketAddr,
        data: &str,
        device_target: &str,
        usn: &str,
        status_port: u16,
    ) {
        let request = match SearchRequest::parse(data) {
            Ok(request) => request,
            Err(e) => {
                debug!("Ignored malformed SSDP datagram from {}: {}", src, e);
                return;
            }
        };

        if !request.matches(device_target) {
            debug!(
                "Ignored SSDP command {} {} from {}",
                request.method, request.target, src
            );
            return;
        }

        info!(
            "📡 M-SEARCH for {:?} from {}",
            request.search_target(),
            src
        );

        // L'URL LOCATION doit être joignable par ce requérant précisément
        let local_ip = match local_ip_for_peer(src.ip()) {
            Ok(ip) => ip,
            Err(e) => {
                warn!(
                    "⚠️ Cannot resolve local address towards {}: {}, dropping reply",
                    src, e
                );
                return;
            }
        };

        let response = SearchResponse {
            location: format!("http://{}:{}/status", local_ip, status_port),
            server: SERVER_ID.to_string(),
            search_target: request.search_target().to_string(),
            usn: usn.to_string(),
        };

        match socket.send_to(response.render().as_bytes(), src) {
            Ok(_) => debug!("📡 Search response sent to {}", src),
            Err(e) => warn!("❌ Failed to send search response to {}: {}", src, e),
        }
    }

    /// Quitte le groupe multicast et arrête de répondre. Idempotent.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(socket) = self.socket.take() {
            if let Err(e) = socket.leave_multicast_v4(
                &SSDP_MULTICAST_ADDR.parse().unwrap(),
                &Ipv4Addr::UNSPECIFIED,
            ) {
                warn!("❌ Failed to leave SSDP multicast group: {}", e);
            }
            info!("👋 SSDP responder stopped");
        }
    }
}

impl Drop for SsdpResponder {
    fn drop(&mut self) {
        self.stop();
    }
}
