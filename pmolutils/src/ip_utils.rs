use std::io;
use std::net::{IpAddr, SocketAddr, UdpSocket};

/// Détermine l'adresse IP locale utilisée pour joindre un correspondant donné.
///
/// Crée un socket UDP éphémère, le « connecte » vers le correspondant (aucun
/// paquet n'est émis, UDP est sans connexion), puis lit l'adresse locale que
/// le système a choisie pour cette route. Le socket est libéré en sortant.
///
/// Sur une machine multi-domiciliée, c'est la seule façon fiable d'obtenir
/// l'adresse que le correspondant pourra joindre en retour.
///
/// # Arguments
///
/// * `peer` - L'adresse du correspondant à joindre
///
/// # Returns
///
/// L'adresse IP locale de l'interface qui serait utilisée, ou l'erreur
/// d'entrée/sortie rencontrée. Aucune reprise n'est tentée ici : l'appelant
/// décide quoi abandonner (typiquement une seule réponse de découverte).
pub fn local_ip_for_peer(peer: IpAddr) -> io::Result<IpAddr> {
    let socket = UdpSocket::bind(("0.0.0.0", 0))?;
    socket.connect(SocketAddr::new(peer, 1900))?;
    Ok(socket.local_addr()?.ip())
}

/// Devine l'adresse IP locale de la machine.
///
/// Tente une connexion UDP (non effective) vers un serveur DNS public pour
/// identifier l'interface de sortie par défaut. En cas d'échec à n'importe
/// quelle étape, retourne `127.0.0.1`.
pub fn guess_local_ip() -> String {
    match UdpSocket::bind("0.0.0.0:0") {
        Ok(socket) => {
            if socket.connect("8.8.8.8:80").is_ok() {
                if let Ok(local_addr) = socket.local_addr() {
                    return local_addr.ip().to_string();
                }
            }
            "127.0.0.1".to_string()
        }
        Err(_) => "127.0.0.1".to_string(),
    }
}
