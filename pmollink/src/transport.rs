//! Central BLE : connexion à l'ampoule et écriture des paquets mesh.

use crate::LinkError;
use crate::codec;
use anyhow::Result;
use async_trait::async_trait;
use btleplug::api::{
    Central, CharPropFlags, Characteristic, Manager as _, Peripheral as _, ScanFilter, WriteType,
};
use btleplug::platform::{Adapter, Manager, Peripheral};
use pmolsession::{DeviceConnection, DeviceLink};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

/// Caractéristique mesh basse : reçoit les 20 premiers octets du paquet.
const MESH_LOW_CHAR: Uuid = Uuid::from_u128(0xc4edc000_9daf_11e3_8003_00025b000b00);
/// Caractéristique mesh haute : reçoit le reste du paquet.
const MESH_HIGH_CHAR: Uuid = Uuid::from_u128(0xc4edc000_9daf_11e3_8004_00025b000b00);

/// Durée laissée au scan pour voir annoncer l'ampoule.
const SCAN_WINDOW: Duration = Duration::from_secs(5);

/// Lien CSRMesh : fabrique des connexions BLE vers une ampoule donnée.
///
/// La clé réseau est dérivée une fois du code d'appairage et partagée par
/// toutes les connexions ouvertes.
pub struct CsrMeshLink {
    key: [u8; 16],
}

impl CsrMeshLink {
    pub fn new(pin: u32) -> Self {
        Self {
            key: codec::network_key(pin),
        }
    }

    async fn adapter() -> Result<Adapter, LinkError> {
        let manager = Manager::new().await?;
        let adapters = manager.adapters().await?;
        adapters.into_iter().next().ok_or(LinkError::NoBluetoothAdapters)
    }

    /// Scanne puis retourne le périphérique dont l'adresse MAC correspond.
    async fn find_peripheral(adapter: &Adapter, mac: &str) -> Result<Peripheral, LinkError> {
        adapter.start_scan(ScanFilter::default()).await?;
        tokio::time::sleep(SCAN_WINDOW).await;
        adapter.stop_scan().await?;

        for peripheral in adapter.peripherals().await? {
            let address = peripheral.address().to_string();
            debug!("Scan saw {}", address);
            if address.eq_ignore_ascii_case(mac) {
                return Ok(peripheral);
            }
        }
        Err(LinkError::DeviceNotFound(mac.to_string()))
    }

    fn find_characteristic(peripheral: &Peripheral, uuid: Uuid) -> Result<Characteristic, LinkError> {
        peripheral
            .characteristics()
            .into_iter()
            .find(|c| c.uuid == uuid && c.properties.contains(CharPropFlags::WRITE))
            .ok_or_else(|| LinkError::CharacteristicNotFound(uuid.to_string()))
    }
}

#[async_trait]
impl DeviceLink for CsrMeshLink {
    async fn open(&self, endpoint: &str) -> Result<Box<dyn DeviceConnection>> {
        let adapter = Self::adapter().await?;
        let peripheral = Self::find_peripheral(&adapter, endpoint).await?;

        peripheral.connect().await.map_err(LinkError::Ble)?;
        peripheral.discover_services().await.map_err(LinkError::Ble)?;

        let low = Self::find_characteristic(&peripheral, MESH_LOW_CHAR)?;
        let high = Self::find_characteristic(&peripheral, MESH_HIGH_CHAR)?;
        info!("✅ CSRMesh characteristics discovered on {}", endpoint);

        Ok(Box::new(CsrMeshConnection {
            peripheral,
            low,
            high,
            key: self.key,
            rng: StdRng::from_os_rng(),
        }))
    }
}

/// Connexion ouverte vers une ampoule : écrit les paquets mesh scindés
/// sur les deux caractéristiques, avec réponse.
struct CsrMeshConnection {
    peripheral: Peripheral,
    low: Characteristic,
    high: Characteristic,
    key: [u8; 16],
    rng: StdRng,
}

#[async_trait]
impl DeviceConnection for CsrMeshConnection {
    async fn send_brightness(&mut self, native: u8) -> Result<()> {
        let payload = codec::light_set_payload(native, 0xFF, 0xFF, 0xFF);
        let seq = codec::random_seq(&mut self.rng);
        let packet = codec::make_packet(&self.key, seq, &payload);

        debug!("Writing mesh packet seq={} level={}", seq, native);
        self.peripheral
            .write(&self.low, &packet[..20], WriteType::WithResponse)
            .await
            .map_err(LinkError::Ble)?;
        self.peripheral
            .write(&self.high, &packet[20..], WriteType::WithResponse)
            .await
            .map_err(LinkError::Ble)?;
        Ok(())
    }

    async fn close(&mut self) {
        if let Err(e) = self.peripheral.disconnect().await {
            debug!("Disconnect from bulb failed: {}", e);
        }
    }
}
