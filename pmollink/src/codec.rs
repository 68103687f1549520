//! Codec de paquets CSRMesh.
//!
//! Format d'un paquet : `seq (3 octets LE) || 0x80 0x00 || payload chiffré
//! || tag (8 octets) || 0xFF`. Le payload est chiffré en AES-128-OFB avec
//! un nonce dérivé du numéro de séquence; le tag est un HMAC-SHA256
//! tronqué à 8 octets, octets inversés, couvrant le préfixe et le payload
//! chiffré.

use aes::Aes128;
use aes::cipher::{BlockEncrypt, KeyInit, generic_array::GenericArray};
use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

/// Clé réseau CSRMesh : 16 premiers octets, inversés, du SHA-256 du code
/// d'appairage (décimal, zéro-paddé à 4 chiffres) suivi de `\0MCP`.
pub fn network_key(pin: u32) -> [u8; 16] {
    let mut hasher = Sha256::new();
    hasher.update(format!("{:04}", pin).as_bytes());
    hasher.update(b"\x00MCP");
    let digest = hasher.finalize();

    let mut key = [0u8; 16];
    for (i, byte) in digest[..16].iter().rev().enumerate() {
        key[i] = *byte;
    }
    key
}

/// Payload mesh « light set » : luminosité plus composantes RGB.
pub fn light_set_payload(level: u8, red: u8, green: u8, blue: u8) -> [u8; 13] {
    [
        0x80, 0x80, 0x73, 0x11, 0x00, 0x02, 0x00, level, red, green, blue, 0x00, 0x00,
    ]
}

/// Numéro de séquence aléatoire sur 3 octets, jamais nul.
pub fn random_seq<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    rng.random_range(1..0x00FF_FFFF)
}

/// Assemble un paquet CSRMesh complet, prêt à être scindé sur les deux
/// caractéristiques GATT (20 premiers octets sur la basse, le reste sur
/// la haute).
pub fn make_packet(key: &[u8; 16], seq: u32, payload: &[u8]) -> Vec<u8> {
    let seq_bytes = &seq.to_le_bytes()[..3];

    // Préfixe en clair : séquence + source 0x0080 (LE)
    let mut prefix = Vec::with_capacity(5);
    prefix.extend_from_slice(seq_bytes);
    prefix.extend_from_slice(&0x0080u16.to_le_bytes());

    // Nonce OFB : préfixe zéro-paddé à 16 octets
    let mut nonce = [0u8; 16];
    nonce[..5].copy_from_slice(&prefix);

    let encrypted = ofb_encrypt(key, &nonce, payload);

    let mut mac = <HmacSha256 as Mac>::new_from_slice(key).expect("HMAC accepts any key length");
    mac.update(&prefix);
    mac.update(&encrypted);
    let tag_full = mac.finalize().into_bytes();
    let tag: Vec<u8> = tag_full[..8].iter().rev().copied().collect();

    let mut packet = Vec::with_capacity(prefix.len() + encrypted.len() + tag.len() + 1);
    packet.extend_from_slice(&prefix);
    packet.extend_from_slice(&encrypted);
    packet.extend_from_slice(&tag);
    packet.push(0xFF);
    packet
}

/// AES-128 en mode OFB : le keystream est la suite des chiffrés du nonce.
fn ofb_encrypt(key: &[u8; 16], nonce: &[u8; 16], data: &[u8]) -> Vec<u8> {
    let cipher = Aes128::new(GenericArray::from_slice(key));
    let mut feedback = GenericArray::clone_from_slice(nonce);
    let mut out = Vec::with_capacity(data.len());

    for chunk in data.chunks(16) {
        cipher.encrypt_block(&mut feedback);
        for (byte, ks) in chunk.iter().zip(feedback.iter()) {
            out.push(byte ^ ks);
        }
    }
    out
}
