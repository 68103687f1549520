//! Identité UPnP du device annoncé

use uuid::Uuid;

/// Construit le type de device annoncé par le pont.
///
/// L'index permet de distinguer plusieurs instances du pont sur le même
/// réseau; il est figé pour la durée de vie du process.
pub fn device_target(index: u32) -> String {
    format!("urn:schemas-upnp-org:device:DimmableLight:{index}")
}

/// Identité stable du device: UUIDv5 (espace de noms OID) dérivé d'un
/// identifiant matériel local. Constante pour la durée de vie du process,
/// utilisée dans le champ `USN` des réponses de découverte.
pub fn device_identity(node_id: &str) -> Uuid {
    Uuid::new_v5(
        &Uuid::NAMESPACE_OID,
        format!("dimmable_light_{node_id}").as_bytes(),
    )
}
