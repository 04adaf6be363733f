//! Elliptic curve keys on Weierstrass curves

use std::fmt;

use elliptic_curve::sec1::ToEncodedPoint;
use zeroize::Zeroizing;

use crate::algorithms::{EncryptionMethod, JweAlgorithm, JwsAlgorithm};
use crate::curves::EcCurve;
use crate::error::{KeyError, Result};

const ECDH_KEY_MANAGEMENT: &[JweAlgorithm] = &[
    JweAlgorithm::EcdhEs,
    JweAlgorithm::EcdhEsA128Kw,
    JweAlgorithm::EcdhEsA192Kw,
    JweAlgorithm::EcdhEsA256Kw,
];

/// EC public point with optional private scalar
///
/// Coordinates and scalar are stored big-endian at the curve's fixed width.
#[derive(Clone)]
pub struct EcKey {
    kid: Option<String>,
    curve: EcCurve,
    x: Vec<u8>,
    y: Vec<u8>,
    d: Option<Zeroizing<Vec<u8>>>,
}

/// Left-pad or strip leading zeros so `bytes` is exactly `len` long.
pub(crate) fn fixed_width(bytes: &[u8], len: usize) -> Option<Vec<u8>> {
    let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    let significant = &bytes[start..];
    if significant.len() > len {
        return None;
    }
    let mut out = vec![0u8; len - significant.len()];
    out.extend_from_slice(significant);
    Some(out)
}

/// Split an uncompressed SEC1 point into its coordinates, validating it is on the curve.
fn decode_point(curve: EcCurve, point: &[u8]) -> Result<(Vec<u8>, Vec<u8>)> {
    crate::with_ec_curve!(curve, c => {
        let public = c::PublicKey::from_sec1_bytes(point)
            .map_err(|_| KeyError::invalid_key(format!("point is not on {curve}")))?;
        let encoded = public.to_encoded_point(false);
        match (encoded.x(), encoded.y()) {
            (Some(x), Some(y)) => Ok((x.to_vec(), y.to_vec())),
            _ => Err(KeyError::invalid_key("point at infinity")),
        }
    })
}

/// Public point G·d for a private scalar.
fn derive_point(curve: EcCurve, d: &[u8]) -> Result<(Vec<u8>, Vec<u8>)> {
    let point = crate::with_ec_curve!(curve, c => {
        let secret = c::SecretKey::from_slice(d)
            .map_err(|_| KeyError::invalid_key(format!("invalid {curve} private scalar")))?;
        secret
            .public_key()
            .to_encoded_point(false)
            .as_bytes()
            .to_vec()
    });
    decode_point(curve, &point)
}

impl EcKey {
    /// Public key from affine coordinates
    pub fn from_public_coordinates(
        curve: EcCurve,
        x: &[u8],
        y: &[u8],
        kid: Option<String>,
    ) -> Result<Self> {
        let width = curve.coordinate_len();
        let (x, y) = match (fixed_width(x, width), fixed_width(y, width)) {
            (Some(x), Some(y)) => (x, y),
            _ => {
                return Err(KeyError::invalid_key(format!(
                    "coordinates too long for {curve}"
                )))
            }
        };

        let mut point = Vec::with_capacity(1 + 2 * width);
        point.push(0x04);
        point.extend_from_slice(&x);
        point.extend_from_slice(&y);
        let (x, y) = decode_point(curve, &point)?;

        Ok(Self {
            kid,
            curve,
            x,
            y,
            d: None,
        })
    }

    /// Public key from a SEC1 encoded point, compressed or not
    pub fn from_sec1_point(curve: EcCurve, point: &[u8], kid: Option<String>) -> Result<Self> {
        let (x, y) = decode_point(curve, point)?;
        Ok(Self {
            kid,
            curve,
            x,
            y,
            d: None,
        })
    }

    /// Key pair from a private scalar; the public point is derived as G·d
    pub fn from_private_scalar(curve: EcCurve, d: &[u8], kid: Option<String>) -> Result<Self> {
        let d = fixed_width(d, curve.coordinate_len())
            .ok_or_else(|| KeyError::invalid_key(format!("private scalar too long for {curve}")))?;
        let (x, y) = derive_point(curve, &d)?;
        Ok(Self {
            kid,
            curve,
            x,
            y,
            d: Some(Zeroizing::new(d)),
        })
    }

    /// Key pair from coordinates and scalar, checking they belong together
    pub fn from_private_parts(
        curve: EcCurve,
        x: &[u8],
        y: &[u8],
        d: &[u8],
        kid: Option<String>,
    ) -> Result<Self> {
        let key = Self::from_private_scalar(curve, d, kid)?;
        let width = curve.coordinate_len();
        if fixed_width(x, width).as_deref() != Some(key.x.as_slice())
            || fixed_width(y, width).as_deref() != Some(key.y.as_slice())
        {
            return Err(KeyError::invalid_key(
                "public coordinates do not match the private scalar",
            ));
        }
        Ok(key)
    }

    /// Key identifier
    #[must_use]
    pub fn key_id(&self) -> Option<&str> {
        self.kid.as_deref()
    }

    /// Curve
    #[must_use]
    pub fn curve(&self) -> EcCurve {
        self.curve
    }

    /// Affine x coordinate
    #[must_use]
    pub fn x(&self) -> &[u8] {
        &self.x
    }

    /// Affine y coordinate
    #[must_use]
    pub fn y(&self) -> &[u8] {
        &self.y
    }

    /// Private scalar, when present
    #[must_use]
    pub fn d(&self) -> Option<&[u8]> {
        self.d.as_deref().map(Vec::as_slice)
    }

    /// Uncompressed SEC1 encoding of the public point
    #[must_use]
    pub fn sec1_point(&self) -> Vec<u8> {
        let mut point = Vec::with_capacity(1 + self.x.len() + self.y.len());
        point.push(0x04);
        point.extend_from_slice(&self.x);
        point.extend_from_slice(&self.y);
        point
    }

    pub(crate) fn with_key_id(&self, kid: Option<String>) -> Self {
        Self {
            kid,
            ..self.clone()
        }
    }

    pub(crate) fn to_public(&self) -> Self {
        Self {
            d: None,
            ..self.clone()
        }
    }

    pub(crate) fn signing_algorithms(&self) -> &'static [JwsAlgorithm] {
        match self.curve {
            EcCurve::P256 => &[JwsAlgorithm::Es256],
            EcCurve::Secp256k1 => &[JwsAlgorithm::Es256k],
            EcCurve::P384 => &[JwsAlgorithm::Es384],
            EcCurve::P521 => &[JwsAlgorithm::Es512],
        }
    }

    pub(crate) fn key_encryption_algorithms(&self) -> &'static [JweAlgorithm] {
        if self.curve.supports_key_agreement() {
            ECDH_KEY_MANAGEMENT
        } else {
            &[]
        }
    }

    pub(crate) fn content_encryption_algorithms(&self) -> &'static [EncryptionMethod] {
        EncryptionMethod::ALL
    }
}

impl fmt::Debug for EcKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EcKey")
            .field("kid", &self.kid)
            .field("curve", &self.curve)
            .field("private", &self.d.is_some())
            .finish_non_exhaustive()
    }
}
