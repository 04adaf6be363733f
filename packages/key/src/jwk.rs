//! JSON Web Key import and export (RFC 7517, RFC 7518 §6, RFC 8037)
//!
//! Export writes members in a fixed order so serialized keys are stable
//! across runs:
//!
//! | kty | order |
//! |-----|-------|
//! | `RSA` public | `kty,e,kid,n` |
//! | `RSA` private | `p,kty,q,d,e,kid,qi,dp,dq,n` |
//! | `EC` | `kty,(d),crv,kid,x,y` |
//! | `OKP` | `kty,(d),crv,kid,x` |
//! | `oct` | `kty,kid,k` |

use jwtsmith_common::encoding::base64url;
use rsa::traits::{PrivateKeyParts, PublicKeyParts};
use rsa::{BigUint, RsaPrivateKey, RsaPublicKey};
use serde_json::{Map, Value};

use crate::curves::{EcCurve, OkpCurve};
use crate::error::{KeyError, Result};
use crate::keys::{EcKey, Key, OkpKey, RsaKey, SymmetricKey};

/// Typed access to the members of a JWK object
struct Members<'a>(&'a Map<String, Value>);

impl<'a> Members<'a> {
    fn text(&self, name: &str) -> Result<Option<&'a str>> {
        match self.0.get(name) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(text)) => Ok(Some(text.as_str())),
            Some(_) => Err(KeyError::json(format!("'{name}' must be a string"))),
        }
    }

    fn required_text(&self, name: &str) -> Result<&'a str> {
        self.text(name)?
            .ok_or_else(|| KeyError::json(format!("missing '{name}'")))
    }

    fn bytes(&self, name: &str) -> Result<Option<Vec<u8>>> {
        self.text(name)?
            .map(|text| base64url::decode(text).map_err(KeyError::from))
            .transpose()
    }

    fn required_bytes(&self, name: &str) -> Result<Vec<u8>> {
        self.bytes(name)?
            .ok_or_else(|| KeyError::json(format!("missing '{name}'")))
    }

    fn uint(&self, name: &str) -> Result<Option<BigUint>> {
        Ok(self.bytes(name)?.map(|bytes| BigUint::from_bytes_be(&bytes)))
    }

    fn required_uint(&self, name: &str) -> Result<BigUint> {
        Ok(BigUint::from_bytes_be(&self.required_bytes(name)?))
    }

    fn kid(&self) -> Result<Option<String>> {
        Ok(self.text("kid")?.map(str::to_owned))
    }
}

fn uint_member(value: &BigUint) -> Value {
    Value::String(base64url::encode(value.to_bytes_be()))
}

fn bytes_member(bytes: &[u8]) -> Value {
    Value::String(base64url::encode(bytes))
}

impl Key {
    /// Parse a JWK from JSON text
    pub fn from_jwk_json(json: &str) -> Result<Key> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_jwk(&value)
    }

    /// Parse a JWK from a JSON value
    pub fn from_jwk(value: &Value) -> Result<Key> {
        let object = value
            .as_object()
            .ok_or_else(|| KeyError::json("JWK must be a JSON object"))?;
        let members = Members(object);

        match members.required_text("kty")? {
            "oct" => parse_oct(&members),
            "RSA" => parse_rsa(&members),
            "EC" => parse_ec(&members),
            "OKP" => parse_okp(&members),
            other => Err(KeyError::unsupported(format!("unsupported kty '{other}'"))),
        }
    }

    /// JWK form of this key; private members only when `include_private` is set
    pub fn to_jwk(&self, include_private: bool) -> Result<Value> {
        let mut jwk = Map::new();
        let kid = self.key_id().map(|kid| Value::String(kid.to_owned()));

        match self {
            Key::Symmetric(key) => {
                jwk.insert("kty".into(), "oct".into());
                if let Some(kid) = kid {
                    jwk.insert("kid".into(), kid);
                }
                jwk.insert("k".into(), bytes_member(key.secret()));
            }
            Key::Rsa(key) => write_rsa(&mut jwk, key, kid, include_private),
            Key::Ec(key) => {
                jwk.insert("kty".into(), "EC".into());
                if let (true, Some(d)) = (include_private, key.d()) {
                    jwk.insert("d".into(), bytes_member(d));
                }
                jwk.insert("crv".into(), key.curve().name().into());
                if let Some(kid) = kid {
                    jwk.insert("kid".into(), kid);
                }
                jwk.insert("x".into(), bytes_member(key.x()));
                jwk.insert("y".into(), bytes_member(key.y()));
            }
            Key::Okp(key) => {
                jwk.insert("kty".into(), "OKP".into());
                if let (true, Some(d)) = (include_private, key.d()) {
                    jwk.insert("d".into(), bytes_member(d));
                }
                jwk.insert("crv".into(), key.curve().name().into());
                if let Some(kid) = kid {
                    jwk.insert("kid".into(), kid);
                }
                jwk.insert("x".into(), bytes_member(key.x()));
            }
            Key::Password(_) => {
                return Err(KeyError::unsupported("password keys have no JWK form"));
            }
        }

        Ok(Value::Object(jwk))
    }

    /// Compact JSON text of [`Key::to_jwk`]
    pub fn to_jwk_json(&self, include_private: bool) -> Result<String> {
        Ok(serde_json::to_string(&self.to_jwk(include_private)?)?)
    }
}

fn parse_oct(members: &Members<'_>) -> Result<Key> {
    let secret = members.required_bytes("k")?;
    Ok(Key::Symmetric(SymmetricKey::new(members.kid()?, secret)))
}

fn parse_rsa(members: &Members<'_>) -> Result<Key> {
    let n = members.required_uint("n")?;
    let e = members.required_uint("e")?;
    let kid = members.kid()?;

    let Some(d) = members.uint("d")? else {
        let public = RsaPublicKey::new(n, e)
            .map_err(|e| KeyError::invalid_key(format!("RSA public key: {e}")))?;
        return Ok(Key::Rsa(RsaKey::from_public(public, kid)));
    };

    // Missing primes are recovered from n, e and d
    let primes = match (members.uint("p")?, members.uint("q")?) {
        (Some(p), Some(q)) => vec![p, q],
        _ => Vec::new(),
    };
    let private = RsaPrivateKey::from_components(n, e, d, primes)
        .map_err(|e| KeyError::invalid_key(format!("RSA private key: {e}")))?;
    private
        .validate()
        .map_err(|e| KeyError::invalid_key(format!("RSA private key: {e}")))?;
    Ok(Key::Rsa(RsaKey::from_private(private, kid)))
}

fn write_rsa(jwk: &mut Map<String, Value>, key: &RsaKey, kid: Option<Value>, include_private: bool) {
    let public = key.public_key();
    let private = key.private_key().filter(|_| include_private);

    // CRT members only exist for two-prime keys
    let crt = private.and_then(|private| match private.primes() {
        [p, q] => {
            let one = BigUint::from(1u8);
            let two = BigUint::from(2u8);
            let dp = private.d() % (p - &one);
            let dq = private.d() % (q - &one);
            let qi = q.modpow(&(p - &two), p);
            Some((p.clone(), q.clone(), dp, dq, qi))
        }
        _ => None,
    });

    if let Some((p, _, _, _, _)) = &crt {
        jwk.insert("p".into(), uint_member(p));
    }
    jwk.insert("kty".into(), "RSA".into());
    if let Some((_, q, _, _, _)) = &crt {
        jwk.insert("q".into(), uint_member(q));
    }
    if let Some(private) = private {
        jwk.insert("d".into(), uint_member(private.d()));
    }
    jwk.insert("e".into(), uint_member(public.e()));
    if let Some(kid) = kid {
        jwk.insert("kid".into(), kid);
    }
    if let Some((_, _, dp, dq, qi)) = &crt {
        jwk.insert("qi".into(), uint_member(qi));
        jwk.insert("dp".into(), uint_member(dp));
        jwk.insert("dq".into(), uint_member(dq));
    }
    jwk.insert("n".into(), uint_member(public.n()));
}

fn parse_ec(members: &Members<'_>) -> Result<Key> {
    let curve = EcCurve::from_name(members.required_text("crv")?)?;
    let x = members.required_bytes("x")?;
    let y = members.required_bytes("y")?;
    let kid = members.kid()?;

    let key = match members.bytes("d")? {
        Some(d) => EcKey::from_private_parts(curve, &x, &y, &d, kid)?,
        None => EcKey::from_public_coordinates(curve, &x, &y, kid)?,
    };
    Ok(Key::Ec(key))
}

fn parse_okp(members: &Members<'_>) -> Result<Key> {
    let curve = OkpCurve::from_name(members.required_text("crv")?)?;
    let kid = members.kid()?;

    let key = match (members.bytes("x")?, members.bytes("d")?) {
        (Some(x), Some(d)) => OkpKey::from_private_parts(curve, &x, &d, kid)?,
        (None, Some(d)) => OkpKey::from_private(curve, &d, kid)?,
        (Some(x), None) => OkpKey::from_public(curve, &x, kid)?,
        (None, None) => return Err(KeyError::json("missing 'x'")),
    };
    Ok(Key::Okp(key))
}
