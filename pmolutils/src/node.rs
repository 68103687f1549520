use get_if_addrs::get_if_addrs;
use tracing::debug;

/// Identifiant matériel stable de la machine.
///
/// Retourne l'adresse MAC de la première interface réseau non-loopback
/// (lue dans `/sys/class/net` sous Linux). À défaut, retombe sur l'adresse
/// IP locale devinée — moins stable, mais suffisant pour dériver une
/// identité de device constante sur la durée de vie du process.
pub fn hardware_node_id() -> String {
    if let Some(mac) = first_interface_mac() {
        return mac;
    }
    debug!("No interface MAC available, falling back to local IP");
    crate::guess_local_ip()
}

#[cfg(target_os = "linux")]
fn first_interface_mac() -> Option<String> {
    let interfaces = get_if_addrs().ok()?;
    for iface in interfaces {
        if iface.is_loopback() {
            continue;
        }
        let path = format!("/sys/class/net/{}/address", iface.name);
        if let Ok(mac) = std::fs::read_to_string(&path) {
            let mac = mac.trim();
            if !mac.is_empty() && mac != "00:00:00:00:00:00" {
                return Some(mac.to_string());
            }
        }
    }
    None
}

#[cfg(not(target_os = "linux"))]
fn first_interface_mac() -> Option<String> {
    // Pas de sysfs ailleurs que sous Linux; l'IP locale fait office
    // d'identifiant.
    let _ = get_if_addrs();
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hardware_node_id_not_empty() {
        let id = hardware_node_id();

        assert!(!id.is_empty(), "Node id should never be empty");
    }

    #[test]
    fn test_hardware_node_id_is_stable() {
        // Deux lectures successives doivent produire le même identifiant
        assert_eq!(hardware_node_id(), hardware_node_id());
    }
}
