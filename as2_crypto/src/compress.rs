//! RFC 3274 `compressed-data` content type.
//!
//! The `openssl` crate's PKCS#7 support only covers `signed-data` and `enveloped-data`; AS2's
//! optional compression step needs a CMS `compressed-data` structure wrapping zlib-deflated
//! content. It is a single small SEQUENCE, so it is encoded and decoded here directly with
//! `bcder` rather than pulling in anything richer.
//!
//! ```ASN.1
//! ContentInfo ::= SEQUENCE {
//!   contentType OBJECT IDENTIFIER,
//!   content [0] EXPLICIT CompressedData }
//!
//! CompressedData ::= SEQUENCE {
//!   version INTEGER,
//!   compressionAlgorithm SEQUENCE { algorithm OBJECT IDENTIFIER },
//!   encapContentInfo SEQUENCE {
//!     eContentType OBJECT IDENTIFIER,
//!     eContent [0] EXPLICIT OCTET STRING OPTIONAL } }
//! ```

use as2_core::prelude::*;

use bcder::{
    decode::Constructed,
    encode::{self, PrimitiveContent, Values},
    Integer, Mode, Oid, OctetString, Tag,
};

use std::io::{Read, Write};

use flate2::{read::ZlibDecoder, write::ZlibEncoder, Compression};

/// `id-ct-compressedData`, 1.2.840.113549.1.9.16.1.9.
const OID_COMPRESSED_DATA: &[u8] = &[42, 134, 72, 134, 247, 13, 1, 9, 16, 1, 9];
/// `id-data`, 1.2.840.113549.1.7.1.
const OID_ID_DATA: &[u8] = &[42, 134, 72, 134, 247, 13, 1, 7, 1];
/// `id-alg-zlibCompress`, 1.2.840.113549.1.9.16.3.8.
const OID_ZLIB_COMPRESS: &[u8] = &[42, 134, 72, 134, 247, 13, 1, 9, 16, 3, 8];

/// Deflate `plaintext` and wrap it in a DER-encoded CMS ContentInfo/CompressedData structure.
pub fn compress(plaintext: &[u8]) -> Outcome<Vec<u8>> {
    let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
    res!(enc.write_all(plaintext), IO, Encrypt);
    let deflated = res!(enc.finish(), IO, Encrypt);

    let e_content = OctetString::new(bytes::Bytes::from(deflated));
    let content_type = Oid(bytes::Bytes::from_static(OID_ID_DATA));
    let compression_alg = Oid(bytes::Bytes::from_static(OID_ZLIB_COMPRESS));

    let encap_content_info = encode::sequence((
        content_type.encode_ref(),
        encode::sequence_as(Tag::CTX_0, e_content.encode_ref()),
    ));

    let compressed_data = encode::sequence((
        0u8.encode(),
        encode::sequence(compression_alg.encode_ref()),
        encap_content_info,
    ));

    let content_type_compressed = Oid(bytes::Bytes::from_static(OID_COMPRESSED_DATA));
    let content_info = encode::sequence((
        content_type_compressed.encode_ref(),
        encode::sequence_as(Tag::CTX_0, compressed_data),
    ));

    let mut out = Vec::new();
    res!(content_info.write_encoded(Mode::Der, &mut out), Encode, Bug);
    Ok(out)
}

/// Parse a DER-encoded CMS ContentInfo/CompressedData structure and inflate its content.
pub fn decompress(der: &[u8]) -> Outcome<Vec<u8>> {
    let deflated = res!(
        Constructed::decode(der, Mode::Der, |cons| {
            cons.take_sequence(|cons| {
                let _content_type = Oid::take_from(cons)?;
                cons.take_constructed_if(Tag::CTX_0, |cons| {
                    cons.take_sequence(|cons| {
                        let _version = cons.take_primitive_if(Tag::INTEGER, Integer::i8_from_primitive)?;
                        cons.take_sequence(|cons| Oid::take_from(cons))?;
                        cons.take_sequence(|cons| {
                            let _e_content_type = Oid::take_from(cons)?;
                            let e_content = cons.take_constructed_if(Tag::CTX_0, |cons| {
                                OctetString::take_from(cons)
                            })?;
                            Ok(e_content.to_bytes().to_vec())
                        })
                    })
                })
            })
        }),
        Decode,
        Invalid,
    );
    let mut dec = ZlibDecoder::new(deflated.as_slice());
    let mut out = Vec::new();
    res!(dec.read_to_end(&mut out), Decrypt, Invalid);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_compressed_content() -> Outcome<()> {
        let plaintext = b"EDI payload intended for AS2 transport, repeated repeated repeated.";
        let wrapped = res!(compress(plaintext));
        let recovered = res!(decompress(&wrapped));
        assert_eq!(recovered, plaintext);
        Ok(())
    }
}
