//! Share links: a structure plus its view state packed into a URL-safe
//! string.
//!
//! Encoding is JSON, then raw deflate, then unpadded URL-safe base64, so
//! the result can sit in a URL fragment unescaped.

use std::io::{Read, Write};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};

use crate::error::SpeckleError;
use crate::structure::Structure;
use crate::view::ViewState;

/// Everything needed to reproduce a view elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharePayload {
    /// The displayed molecule.
    pub structure: Structure,
    /// Camera and shading parameters.
    pub state: ViewState,
}

fn share_err(e: impl std::fmt::Display) -> SpeckleError {
    SpeckleError::Share(e.to_string())
}

impl SharePayload {
    /// Encode into a compact URL-safe string.
    ///
    /// # Errors
    ///
    /// Returns [`SpeckleError::Share`] if serialization or compression
    /// fails.
    pub fn encode(&self) -> Result<String, SpeckleError> {
        let json = serde_json::to_vec(self).map_err(share_err)?;
        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::best());
        encoder.write_all(&json).map_err(share_err)?;
        let compressed = encoder.finish().map_err(share_err)?;
        Ok(URL_SAFE_NO_PAD.encode(compressed))
    }

    /// Decode a string produced by [`encode`](Self::encode). The view state
    /// is resolved before it is returned.
    ///
    /// # Errors
    ///
    /// Returns [`SpeckleError::Share`] if any decoding stage fails.
    pub fn decode(encoded: &str) -> Result<Self, SpeckleError> {
        let compressed = URL_SAFE_NO_PAD.decode(encoded.trim()).map_err(share_err)?;
        let mut json = Vec::new();
        let _ = DeflateDecoder::new(compressed.as_slice())
            .read_to_end(&mut json)
            .map_err(share_err)?;
        let mut payload: Self = serde_json::from_slice(&json).map_err(share_err)?;
        payload.state.resolve();
        Ok(payload)
    }

    /// Append the encoded payload as the fragment of `base_url`, replacing
    /// any existing fragment.
    ///
    /// # Errors
    ///
    /// See [`encode`](Self::encode).
    pub fn to_url(&self, base_url: &str) -> Result<String, SpeckleError> {
        let base = base_url.split('#').next().unwrap_or(base_url);
        Ok(format!("{base}#{}", self.encode()?))
    }

    /// Decode the fragment of `url`.
    ///
    /// # Errors
    ///
    /// Returns [`SpeckleError::Share`] if the URL has no fragment or the
    /// fragment does not decode.
    pub fn from_url(url: &str) -> Result<Self, SpeckleError> {
        let (_, fragment) = url
            .split_once('#')
            .ok_or_else(|| SpeckleError::Share("URL has no fragment".to_owned()))?;
        Self::decode(fragment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> SharePayload {
        let structure = Structure::from_xyz("3\nwater\nO 0 0 0\nH 0.96 0 0\nH -0.24 0.93 0\n").unwrap();
        let mut state = ViewState::default();
        state.rotate(12.0, 34.0);
        state.bonds = true;
        SharePayload { structure, state }
    }

    #[test]
    fn encode_decode_round_trip() {
        let p = payload();
        let encoded = p.encode().unwrap();
        assert!(encoded
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        assert_eq!(SharePayload::decode(&encoded).unwrap(), p);
    }

    #[test]
    fn url_fragment_round_trip() {
        let p = payload();
        let url = p.to_url("https://example.org/view#stale").unwrap();
        assert!(url.starts_with("https://example.org/view#"));
        assert!(!url.contains("stale"));
        assert_eq!(SharePayload::from_url(&url).unwrap(), p);
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(SharePayload::decode("!!!").is_err());
        assert!(SharePayload::decode("AAAA").is_err());
        assert!(SharePayload::from_url("https://example.org/").is_err());
    }
}
