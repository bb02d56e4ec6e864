//! Boolean gates run on raw session input before anything is built from it.
//!
//! Every check here fails closed: malformed input yields `false`, never an error.

use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use once_cell::sync::Lazy;
use regex::Regex;
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::traits::PublicKeyParts;
use rsa::RsaPrivateKey;
use tracing::debug;
use x509_parser::pem::parse_x509_pem;
use x509_parser::public_key::PublicKey;

/// AES-256 keys are 32 bytes once decoded.
pub const AES_KEY_LEN: usize = 32;

static UEN_BUSINESS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{8}[A-Z]$").unwrap());
static UEN_LOCAL_COMPANY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{9}[A-Z]$").unwrap());
static UEN_OTHER_ENTITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^T[0-9]{2}[A-Z]{2}[0-9]{4}[A-Z]$").unwrap());

/// Structural UEN check. No registry lookup.
///
/// - 9 characters: `nnnnnnnnX` (businesses)
/// - 10 characters: `nnnnnnnnnX` (local companies) or `TyyPQnnnnX` (other entities)
pub fn verify_uen(uen: &str) -> bool {
    match uen.chars().count() {
        9 => UEN_BUSINESS.is_match(uen),
        10 => UEN_LOCAL_COMPANY.is_match(uen) || UEN_OTHER_ENTITY.is_match(uen),
        _ => false,
    }
}

/// True iff `key` is standard Base64 decoding to a 256-bit key.
pub fn verify_aes_encryption_key(key: &str) -> bool {
    match STANDARD.decode(key.trim()) {
        Ok(bytes) => bytes.len() == AES_KEY_LEN,
        Err(e) => {
            debug!("Encryption key is not valid Base64: {e}");
            false
        }
    }
}

/// True iff the private key at `key_path` is the private half of the public key in
/// the certificate at `cert_path`. Both files are PEM; the key may be PKCS#8 or PKCS#1.
pub fn verify_cert_private_key(cert_path: impl AsRef<Path>, key_path: impl AsRef<Path>) -> bool {
    let (cert_pem, key_pem) = match (
        std::fs::read(cert_path.as_ref()),
        std::fs::read_to_string(key_path.as_ref()),
    ) {
        (Ok(cert), Ok(key)) => (cert, key),
        (Err(e), _) | (_, Err(e)) => {
            debug!("Could not read certificate or key: {e}");
            return false;
        }
    };
    cert_matches_key(&cert_pem, &key_pem)
}

/// In-memory form of [`verify_cert_private_key`].
pub fn cert_matches_key(cert_pem: &[u8], key_pem: &str) -> bool {
    let Some((modulus, exponent)) = certificate_rsa_key(cert_pem) else {
        return false;
    };
    let Some(private_key) = parse_rsa_private_key(key_pem) else {
        return false;
    };

    strip_leading_zeros(&modulus) == private_key.n().to_bytes_be().as_slice()
        && strip_leading_zeros(&exponent) == private_key.e().to_bytes_be().as_slice()
}

fn certificate_rsa_key(cert_pem: &[u8]) -> Option<(Vec<u8>, Vec<u8>)> {
    let (_, pem) = parse_x509_pem(cert_pem)
        .map_err(|e| debug!("Certificate is not PEM: {e}"))
        .ok()?;
    let cert = pem
        .parse_x509()
        .map_err(|e| debug!("Certificate is not X.509: {e}"))
        .ok()?;
    match cert.public_key().parsed() {
        Ok(PublicKey::RSA(rsa)) => Some((rsa.modulus.to_vec(), rsa.exponent.to_vec())),
        Ok(_) => {
            debug!("Certificate public key is not RSA");
            None
        }
        Err(e) => {
            debug!("Certificate public key could not be parsed: {e}");
            None
        }
    }
}

fn parse_rsa_private_key(key_pem: &str) -> Option<RsaPrivateKey> {
    RsaPrivateKey::from_pkcs8_pem(key_pem)
        .or_else(|_| RsaPrivateKey::from_pkcs1_pem(key_pem))
        .map_err(|e| debug!("Private key could not be parsed: {e}"))
        .ok()
}

fn strip_leading_zeros(bytes: &[u8]) -> &[u8] {
    let first = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
    &bytes[first..]
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURES: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures");

    fn fixture(name: &str) -> String {
        format!("{FIXTURES}/{name}")
    }

    #[test]
    fn test_uen_nine_chars() {
        assert!(verify_uen("12345678A"));
        assert!(!verify_uen("12345678a"));
        assert!(!verify_uen("1234567AB"));
    }

    #[test]
    fn test_uen_ten_chars_local_company() {
        assert!(verify_uen("123456789Z"));
        assert!(!verify_uen("12345678ZZ"));
    }

    #[test]
    fn test_uen_ten_chars_other_entity() {
        assert!(verify_uen("T01AB2345C"));
        assert!(!verify_uen("S01AB2345C"));
        assert!(!verify_uen("T01A12345C"));
    }

    #[test]
    fn test_uen_wrong_length() {
        assert!(!verify_uen("1234567A"));
        assert!(!verify_uen(""));
        assert!(!verify_uen("12345678901A"));
    }

    #[test]
    fn test_uen_all_letters() {
        assert!(!verify_uen("ABCDEFGHIJ"));
    }

    #[test]
    fn test_aes_key_valid_256_bits() {
        let key = STANDARD.encode([7u8; 32]);
        assert!(verify_aes_encryption_key(&key));
    }

    #[test]
    fn test_aes_key_wrong_length() {
        let key = STANDARD.encode([7u8; 16]);
        assert!(!verify_aes_encryption_key(&key));
    }

    #[test]
    fn test_aes_key_not_base64() {
        assert!(!verify_aes_encryption_key("this is not base64!!"));
        assert!(!verify_aes_encryption_key(""));
    }

    #[test]
    fn test_cert_matches_pkcs8_key() {
        assert!(verify_cert_private_key(fixture("cert.pem"), fixture("key.pem")));
    }

    #[test]
    fn test_cert_matches_pkcs1_key() {
        assert!(verify_cert_private_key(fixture("cert.pem"), fixture("key_pkcs1.pem")));
    }

    #[test]
    fn test_cert_rejects_foreign_key() {
        assert!(!verify_cert_private_key(fixture("cert.pem"), fixture("other_key.pem")));
    }

    #[test]
    fn test_cert_missing_file_is_false() {
        assert!(!verify_cert_private_key(fixture("nope.pem"), fixture("key.pem")));
    }

    #[test]
    fn test_cert_swapped_files_is_false() {
        assert!(!verify_cert_private_key(fixture("key.pem"), fixture("cert.pem")));
    }

    #[test]
    fn test_cert_garbage_is_false() {
        assert!(!cert_matches_key(b"garbage", "garbage"));
    }
}
