//! Parsing des requêtes de recherche et rendu des réponses

use std::collections::HashMap;
use thiserror::Error;

/// Erreur de parsing d'un datagramme de découverte.
///
/// Jamais propagée au-delà du responder : le datagramme fautif est ignoré
/// (trace debug uniquement), sans réponse ni arrêt du service.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("datagram has no header/body separator")]
    MissingSeparator,
    #[error("datagram has an empty request line")]
    MissingRequestLine,
}

/// Requête de découverte parsée depuis un datagramme texte.
///
/// Format attendu : une ligne de méthode (`METHOD TARGET`) suivie de
/// headers `Nom: valeur`, le bloc étant terminé par une ligne vide.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub method: String,
    pub target: String,
    headers: HashMap<String, String>,
}

impl SearchRequest {
    /// Parse un datagramme texte en requête de découverte.
    pub fn parse(data: &str) -> Result<Self, ParseError> {
        let (header, _body) = data
            .split_once("\r\n\r\n")
            .ok_or(ParseError::MissingSeparator)?;

        let mut lines = header.split("\r\n");
        let request_line = lines.next().unwrap_or("");
        if request_line.is_empty() {
            return Err(ParseError::MissingRequestLine);
        }

        let mut parts = request_line.split_whitespace();
        let method = parts.next().unwrap_or("").to_string();
        let target = parts.next().unwrap_or("").to_string();

        // Headers en clés minuscules, à la manière du dictionnaire du hub
        let mut headers = HashMap::new();
        for line in lines {
            if line.is_empty() {
                continue;
            }
            if let Some((name, value)) = line.split_once(':') {
                headers.insert(name.trim().to_lowercase(), value.trim().to_string());
            }
        }

        Ok(Self {
            method,
            target,
            headers,
        })
    }

    /// Valeur d'un header (nom insensible à la casse).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(|s| s.as_str())
    }

    /// Cible de recherche (`ST`), chaîne vide si absente.
    pub fn search_target(&self) -> &str {
        self.header("st").unwrap_or("")
    }

    /// Vrai si la requête est un M-SEARCH générique visant ce device.
    ///
    /// Le test est une containment et non une égalité : un `ST` absent
    /// (chaîne vide) matche, comme dans le pont d'origine.
    pub fn matches(&self, device_target: &str) -> bool {
        self.method == "M-SEARCH"
            && self.target == "*"
            && device_target.contains(self.search_target())
    }
}

/// Réponse unicast à un M-SEARCH.
#[derive(Debug, Clone)]
pub struct SearchResponse {
    pub location: String,
    pub server: String,
    pub search_target: String,
    pub usn: String,
}

impl SearchResponse {
    /// Rend la réponse sous sa forme filaire.
    pub fn render(&self) -> String {
        format!(
            "HTTP/1.1 200 OK\r\n\
             CACHE-CONTROL:max-age={}\r\n\
             EXT:\r\n\
             LOCATION:{}\r\n\
             SERVER:{}\r\n\
             ST:{}\r\n\
             USN:{}\r\n\
             \r\n",
            super::MAX_AGE,
            self.location,
            self.server,
            self.search_target,
            self.usn
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEVICE_TARGET: &str = "urn:schemas-upnp-org:device:DimmableLight:1";

    fn msearch(st: &str) -> String {
        format!(
            "M-SEARCH * HTTP/1.1\r\nHOST: 239.255.255.250:1900\r\nMAN: \"ssdp:discover\"\r\nMX: 4\r\nST: {st}\r\n\r\n"
        )
    }

    #[test]
    fn test_parse_msearch() {
        let request = SearchRequest::parse(&msearch(DEVICE_TARGET)).unwrap();

        assert_eq!(request.method, "M-SEARCH");
        assert_eq!(request.target, "*");
        assert_eq!(request.search_target(), DEVICE_TARGET);
        assert_eq!(request.header("mx"), Some("4"));
    }

    #[test]
    fn test_parse_rejects_datagram_without_separator() {
        let result = SearchRequest::parse("M-SEARCH * HTTP/1.1\r\nST: foo\r\n");

        assert!(matches!(result, Err(ParseError::MissingSeparator)));
    }

    #[test]
    fn test_parse_rejects_empty_request_line() {
        let result = SearchRequest::parse("\r\n\r\n");

        assert!(matches!(result, Err(ParseError::MissingRequestLine)));
    }

    #[test]
    fn test_matching_search_target() {
        let request = SearchRequest::parse(&msearch(DEVICE_TARGET)).unwrap();

        assert!(request.matches(DEVICE_TARGET));
    }

    #[test]
    fn test_substring_search_target_matches() {
        let request =
            SearchRequest::parse(&msearch("urn:schemas-upnp-org:device:DimmableLight")).unwrap();

        assert!(request.matches(DEVICE_TARGET));
    }

    #[test]
    fn test_absent_search_target_matches() {
        // Un M-SEARCH sans header ST a une cible vide, qui matche
        let data = "M-SEARCH * HTTP/1.1\r\nHOST: 239.255.255.250:1900\r\n\r\n";
        let request = SearchRequest::parse(data).unwrap();

        assert_eq!(request.search_target(), "");
        assert!(request.matches(DEVICE_TARGET));
    }

    #[test]
    fn test_foreign_search_target_does_not_match() {
        let request =
            SearchRequest::parse(&msearch("urn:schemas-upnp-org:device:MediaRenderer:1")).unwrap();

        assert!(!request.matches(DEVICE_TARGET));
    }

    #[test]
    fn test_notify_method_does_not_match() {
        let data = format!(
            "NOTIFY * HTTP/1.1\r\nST: {DEVICE_TARGET}\r\n\r\n"
        );
        let request = SearchRequest::parse(&data).unwrap();

        assert!(!request.matches(DEVICE_TARGET));
    }

    #[test]
    fn test_non_wildcard_target_does_not_match() {
        let data = format!(
            "M-SEARCH /device HTTP/1.1\r\nST: {DEVICE_TARGET}\r\n\r\n"
        );
        let request = SearchRequest::parse(&data).unwrap();

        assert!(!request.matches(DEVICE_TARGET));
    }

    #[test]
    fn test_response_render() {
        let response = SearchResponse {
            location: "http://192.168.1.10:8080/status".to_string(),
            server: super::super::SERVER_ID.to_string(),
            search_target: DEVICE_TARGET.to_string(),
            usn: format!("uuid:0af2b79a-7a2f-5e24-9d1c-2a1f00000000::{DEVICE_TARGET}"),
        };

        let rendered = response.render();

        assert!(rendered.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(rendered.contains("CACHE-CONTROL:max-age=30\r\n"));
        assert!(rendered.contains("LOCATION:http://192.168.1.10:8080/status\r\n"));
        assert!(rendered.contains(&format!("ST:{DEVICE_TARGET}\r\n")));
        assert!(rendered.contains("USN:uuid:"));
        assert!(rendered.ends_with("\r\n\r\n"));
    }
}
