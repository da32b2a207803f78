//! PEM-style envelope codec for private keys, public keys, and
//! signatures.
//!
//! Grounded on `generate_keys` / `read_private_key` / `write_public_key`
//! / `read_public_key` / `write_signature` / `read_signature` in
//! `spg_ops.c`. The payload inside each `-----BEGIN SPG ...-----` block
//! is a flat sequence of length-prefixed fields (one length byte
//! followed by that many bytes of minimal big-endian integer, or of
//! ASCII curve name):
//!
//! - private key: `Qx | Qy | d | curve_name`
//! - public key:  `Qx | Qy | curve_name`
//! - signature:   `r | s`
//!
//! PEM framing itself (base64 body, `-----BEGIN/END <label>-----`
//! delimiters) is handled by [`pem_rfc7468`]; this module only packs
//! and unpacks the payload bytes.

use spg_core::{get_curve, AffinePoint, Nat, PrivateKey, PublicKey, Signature};

use crate::error::{CipherError, Result};

pub const PEM_PRIVATE_KEY_LABEL: &str = "SPG PRIVATE KEY";
pub const PEM_PUBLIC_KEY_LABEL: &str = "SPG PUBLIC KEY";
pub const PEM_SIGNATURE_LABEL: &str = "SPG SIGNATURE";

fn push_field(buf: &mut Vec<u8>, field: &[u8]) -> Result<()> {
    if field.len() > u8::MAX as usize {
        return Err(CipherError::Envelope(format!(
            "field of {} bytes exceeds the 255-byte length prefix",
            field.len()
        )));
    }
    buf.push(field.len() as u8);
    buf.extend_from_slice(field);
    Ok(())
}

struct FieldReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> FieldReader<'a> {
    fn new(data: &'a [u8]) -> FieldReader<'a> {
        FieldReader { data, pos: 0 }
    }

    fn next(&mut self) -> Result<&'a [u8]> {
        let len = *self
            .data
            .get(self.pos)
            .ok_or_else(|| CipherError::Envelope("unexpected end of envelope payload".into()))?
            as usize;
        let start = self.pos + 1;
        let end = start + len;
        let field = self
            .data
            .get(start..end)
            .ok_or_else(|| CipherError::Envelope("truncated envelope field".into()))?;
        self.pos = end;
        Ok(field)
    }
}

fn pem_encode(label: &str, payload: &[u8]) -> Result<String> {
    let mut buf = vec![0u8; pem_rfc7468::encoded_len(label, pem_rfc7468::LineEnding::LF, payload)];
    let written = pem_rfc7468::encode(label, pem_rfc7468::LineEnding::LF, payload, &mut buf)
        .map_err(|e| CipherError::Envelope(e.to_string()))?;
    Ok(String::from_utf8_lossy(&buf[..written.len()]).into_owned())
}

fn pem_decode<'a>(expected_label: &str, pem: &'a str, buf: &'a mut Vec<u8>) -> Result<()> {
    let (label, decoded) =
        pem_rfc7468::decode_vec(pem.as_bytes()).map_err(|e| CipherError::Envelope(e.to_string()))?;
    if label != expected_label {
        return Err(CipherError::Envelope(format!(
            "expected a \"{expected_label}\" envelope, found \"{label}\""
        )));
    }
    *buf = decoded;
    Ok(())
}

/// Serialize a private key as PEM text.
pub fn encode_private_key(key: &PrivateKey) -> Result<String> {
    let mut payload = Vec::new();
    let (qx, qy) = affine_xy(&key.public.q)?;
    push_field(&mut payload, &qx.to_be_bytes())?;
    push_field(&mut payload, &qy.to_be_bytes())?;
    push_field(&mut payload, &key.d.to_be_bytes())?;
    push_field(&mut payload, key.curve.name.as_bytes())?;
    pem_encode(PEM_PRIVATE_KEY_LABEL, &payload)
}

/// Parse a private key from PEM text.
pub fn decode_private_key(pem: &str) -> Result<PrivateKey> {
    let mut raw = Vec::new();
    pem_decode(PEM_PRIVATE_KEY_LABEL, pem, &mut raw)?;
    let mut reader = FieldReader::new(&raw);
    let qx = Nat::from_be_bytes(reader.next()?)?;
    let qy = Nat::from_be_bytes(reader.next()?)?;
    let d = Nat::from_be_bytes(reader.next()?)?;
    let curve_name =
        std::str::from_utf8(reader.next()?).map_err(|_| CipherError::Envelope("curve name is not valid UTF-8".into()))?;
    let curve = get_curve(curve_name)?;
    let q = AffinePoint::new(qx, qy);
    Ok(PrivateKey {
        curve,
        d,
        public: PublicKey { curve, q },
    })
}

/// Serialize a public key as PEM text.
pub fn encode_public_key(key: &PublicKey) -> Result<String> {
    let mut payload = Vec::new();
    let (qx, qy) = affine_xy(&key.q)?;
    push_field(&mut payload, &qx.to_be_bytes())?;
    push_field(&mut payload, &qy.to_be_bytes())?;
    push_field(&mut payload, key.curve.name.as_bytes())?;
    pem_encode(PEM_PUBLIC_KEY_LABEL, &payload)
}

/// Parse a public key from PEM text.
pub fn decode_public_key(pem: &str) -> Result<PublicKey> {
    let mut raw = Vec::new();
    pem_decode(PEM_PUBLIC_KEY_LABEL, pem, &mut raw)?;
    let mut reader = FieldReader::new(&raw);
    let qx = Nat::from_be_bytes(reader.next()?)?;
    let qy = Nat::from_be_bytes(reader.next()?)?;
    let curve_name =
        std::str::from_utf8(reader.next()?).map_err(|_| CipherError::Envelope("curve name is not valid UTF-8".into()))?;
    let curve = get_curve(curve_name)?;
    Ok(PublicKey {
        curve,
        q: AffinePoint::new(qx, qy),
    })
}

/// Serialize a signature as PEM text.
pub fn encode_signature(sig: &Signature) -> Result<String> {
    let mut payload = Vec::new();
    push_field(&mut payload, &sig.r.to_be_bytes())?;
    push_field(&mut payload, &sig.s.to_be_bytes())?;
    pem_encode(PEM_SIGNATURE_LABEL, &payload)
}

/// Parse a signature from PEM text.
pub fn decode_signature(pem: &str) -> Result<Signature> {
    let mut raw = Vec::new();
    pem_decode(PEM_SIGNATURE_LABEL, pem, &mut raw)?;
    let mut reader = FieldReader::new(&raw);
    let r = Nat::from_be_bytes(reader.next()?)?;
    let s = Nat::from_be_bytes(reader.next()?)?;
    Ok(Signature { r, s })
}

fn affine_xy(p: &AffinePoint) -> Result<(&Nat, &Nat)> {
    match (p.x(), p.y()) {
        (Some(x), Some(y)) => Ok((x, y)),
        _ => Err(CipherError::Envelope(
            "cannot encode the point at infinity as a key".into(),
        )),
    }
}

/// Encode an ephemeral ECIES point `R` the same length-prefixed way
/// the file-crypto header does, without curve metadata (the curve is
/// implied by the recipient's key, not re-stated per file).
pub fn encode_point(p: &AffinePoint) -> Result<Vec<u8>> {
    let (x, y) = affine_xy(p)?;
    let mut buf = Vec::new();
    push_field(&mut buf, &x.to_be_bytes())?;
    push_field(&mut buf, &y.to_be_bytes())?;
    Ok(buf)
}

/// The curve parameter is needed because the library, unlike the
/// `gcry_mpi_scan` call it is grounded on, tags its integers with a
/// fixed width only implicitly through the field byte count.
pub fn decode_point(data: &[u8]) -> Result<(AffinePoint, usize)> {
    let mut reader = FieldReader::new(data);
    let x = Nat::from_be_bytes(reader.next()?)?;
    let y = Nat::from_be_bytes(reader.next()?)?;
    Ok((AffinePoint::new(x, y), reader.pos))
}

#[cfg(test)]
mod tests {
    use super::*;
    use spg_core::ScalarMulMethod;

    #[test]
    fn private_key_round_trips_through_pem() {
        let key = PrivateKey::generate("secp224r1", ScalarMulMethod::WindowNaf).unwrap();
        let pem = encode_private_key(&key).unwrap();
        assert!(pem.contains(PEM_PRIVATE_KEY_LABEL));
        let decoded = decode_private_key(&pem).unwrap();
        assert_eq!(decoded.d, key.d);
        assert_eq!(decoded.curve.name, key.curve.name);
    }

    #[test]
    fn public_key_round_trips_through_pem() {
        let key = PrivateKey::generate("secp256r1", ScalarMulMethod::WindowNaf).unwrap();
        let pem = encode_public_key(&key.public).unwrap();
        let decoded = decode_public_key(&pem).unwrap();
        assert_eq!(decoded.q, key.public.q);
    }

    #[test]
    fn signature_round_trips_through_pem() {
        let key = PrivateKey::generate("secp192r1", ScalarMulMethod::BinaryNaf).unwrap();
        let sig = spg_core::sign(&key, b"hello world", ScalarMulMethod::BinaryNaf).unwrap();
        let pem = encode_signature(&sig).unwrap();
        let decoded = decode_signature(&pem).unwrap();
        assert_eq!(decoded, sig);
    }

    #[test]
    fn wrong_label_is_rejected() {
        let key = PrivateKey::generate("secp160r2", ScalarMulMethod::WindowNaf).unwrap();
        let pem = encode_public_key(&key.public).unwrap();
        assert!(decode_private_key(&pem).is_err());
    }

    #[test]
    fn ephemeral_point_round_trips() {
        let key = PrivateKey::generate("secp256r1", ScalarMulMethod::WindowNaf).unwrap();
        let encoded = encode_point(&key.public.q).unwrap();
        let (decoded, consumed) = decode_point(&encoded).unwrap();
        assert_eq!(decoded, key.public.q);
        assert_eq!(consumed, encoded.len());
    }
}
