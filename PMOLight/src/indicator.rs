//! Indicateur d'activité matériel de l'hôte (LED de statut du CHIP).

use pmolsession::{NullIndicator, StatusIndicator};
use std::path::Path;
use std::process::Command;
use std::sync::Arc;
use tracing::debug;

const I2CSET: &str = "/usr/sbin/i2cset";

/// Pilote la LED de statut du SBC via le contrôleur d'alimentation AXP209.
///
/// Fire-and-forget : une erreur d'exécution est tracée en `debug!` et
/// n'affecte jamais l'opération signalée.
pub struct ChipIndicator;

impl StatusIndicator for ChipIndicator {
    fn indicate(&self, active: bool) {
        let value = if active { "0x1" } else { "0x0" };
        let result = Command::new(I2CSET)
            .args(["-f", "-y", "0", "0x34", "0x93", value])
            .output();

        if let Err(e) = result {
            debug!("Status LED toggle failed: {}", e);
        }
    }
}

/// Retourne l'indicateur adapté à l'hôte : la LED du CHIP si l'outil
/// `i2cset` est présent, sinon un indicateur nul.
pub fn indicator_for_host() -> Arc<dyn StatusIndicator> {
    if Path::new(I2CSET).exists() {
        Arc::new(ChipIndicator)
    } else {
        Arc::new(NullIndicator)
    }
}
