use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use openssl::pkcs12::Pkcs12;
use std::fs;
use uuid::Uuid;

use crate::common::error::ConfigurationError;

/// Parses the FairPlay application secret key.
///
/// The key is configured as a GUID-formatted hex string and delivered as the
/// GUID's 16-byte array, whose first three groups are little-endian.
pub fn parse_application_secret_key(ask: Option<&str>) -> Result<[u8; 16], ConfigurationError> {
    let ask = ask
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(ConfigurationError::MissingFairPlayAsk)?;

    let guid = Uuid::parse_str(ask)
        .map_err(|e| ConfigurationError::InvalidFairPlayAsk(e.to_string()))?;

    Ok(guid.to_bytes_le())
}

/// Opens the base64-encoded PKCS#12 certificate file with `password` and
/// re-exports it, under the same password, as the base64 PFX string license
/// delivery expects.
pub fn certificate_to_pfx_base64(path: &str, password: &str) -> Result<String, ConfigurationError> {
    let conversion_error = |reason: String| ConfigurationError::CertificateConversion {
        path: path.to_string(),
        reason,
    };

    let encoded = fs::read_to_string(path).map_err(|e| conversion_error(e.to_string()))?;

    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    let der = STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| conversion_error(format!("not valid base64: {}", e)))?;

    let parsed = Pkcs12::from_der(&der)
        .and_then(|container| container.parse2(password))
        .map_err(|e| conversion_error(format!("cannot open PKCS#12 container: {}", e)))?;

    let (Some(pkey), Some(cert)) = (parsed.pkey, parsed.cert) else {
        return Err(conversion_error(
            "container holds no private key and certificate".to_string(),
        ));
    };

    let mut builder = Pkcs12::builder();
    builder.pkey(&pkey).cert(&cert);
    if let Some(chain) = parsed.ca {
        builder.ca(chain);
    }

    let pfx = builder
        .build2(password)
        .and_then(|container| container.to_der())
        .map_err(|e| conversion_error(format!("cannot export PFX: {}", e)))?;

    Ok(STANDARD.encode(pfx))
}
