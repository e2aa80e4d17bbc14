use std::collections::BTreeMap;

use openssl::bn::{BigNum, BigNumContext};
use openssl::ec::{EcGroup, EcKey};
use openssl::hash::MessageDigest;
use openssl::nid::Nid;
use openssl::pkey::{PKey, Private};
use openssl::sha::sha256;
use openssl::sign::Signer;
use serde_cbor_2::Value;
use serde_json::json;
use uuid::Uuid;
use webauthn_rs::prelude::{
    CreationChallengeResponse, PublicKeyCredential, RegisterPublicKeyCredential,
    RequestChallengeResponse,
};

use crate::utils::base64url_encode;

const FLAG_UP: u8 = 0x01;
const FLAG_UV: u8 = 0x04;
const FLAG_AT: u8 = 0x40;

/// A minimal in-process authenticator for exercising the ceremony success
/// paths end to end.
///
/// Holds one P-256 key pair and a signature counter, and produces the
/// browser-side response shapes: a "none"-format attestation for
/// registration and a real ECDSA assertion signature for authentication.
pub(super) struct SoftAuthenticator {
    key: EcKey<Private>,
    credential_id: Vec<u8>,
    counter: u32,
}

impl SoftAuthenticator {
    pub(super) fn new() -> Self {
        let group = EcGroup::from_curve_name(Nid::X9_62_PRIME256V1).expect("P-256 group");
        Self {
            key: EcKey::generate(&group).expect("P-256 key generation"),
            credential_id: Uuid::new_v4().as_bytes().to_vec(),
            counter: 0,
        }
    }

    pub(super) fn credential_id(&self) -> String {
        base64url_encode(&self.credential_id)
    }

    /// Answer a registration challenge with a "none"-format attestation.
    pub(super) fn register(
        &self,
        ccr: &CreationChallengeResponse,
        rp_id: &str,
        origin: &str,
    ) -> RegisterPublicKeyCredential {
        let client_data = json!({
            "type": "webauthn.create",
            "challenge": base64url_encode(&ccr.public_key.challenge),
            "origin": origin,
            "crossOrigin": false
        })
        .to_string();

        let auth_data = self.authenticator_data(rp_id, FLAG_UP | FLAG_UV | FLAG_AT, 0, true);

        let mut attestation = BTreeMap::new();
        attestation.insert(Value::Text("fmt".to_string()), Value::Text("none".to_string()));
        attestation.insert(Value::Text("attStmt".to_string()), Value::Map(BTreeMap::new()));
        attestation.insert(Value::Text("authData".to_string()), Value::Bytes(auth_data));
        let attestation_object =
            serde_cbor_2::to_vec(&Value::Map(attestation)).expect("attestation object encodes");

        serde_json::from_value(json!({
            "id": self.credential_id(),
            "rawId": self.credential_id(),
            "response": {
                "attestationObject": base64url_encode(&attestation_object),
                "clientDataJSON": base64url_encode(client_data.as_bytes()),
                "transports": ["internal"]
            },
            "type": "public-key",
            "extensions": {}
        }))
        .expect("registration response should deserialize")
    }

    /// Answer an authentication challenge with a signed assertion,
    /// incrementing the signature counter.
    pub(super) fn sign(
        &mut self,
        rcr: &RequestChallengeResponse,
        rp_id: &str,
        origin: &str,
    ) -> PublicKeyCredential {
        self.counter += 1;

        let client_data = json!({
            "type": "webauthn.get",
            "challenge": base64url_encode(&rcr.public_key.challenge),
            "origin": origin,
            "crossOrigin": false
        })
        .to_string();

        let auth_data = self.authenticator_data(rp_id, FLAG_UP | FLAG_UV, self.counter, false);

        // The assertion signs authenticatorData ++ sha256(clientDataJSON)
        let mut signed = auth_data.clone();
        signed.extend_from_slice(&sha256(client_data.as_bytes()));
        let pkey = PKey::from_ec_key(self.key.clone()).expect("EC key wraps into PKey");
        let mut signer = Signer::new(MessageDigest::sha256(), &pkey).expect("ECDSA signer");
        let signature = signer
            .sign_oneshot_to_vec(&signed)
            .expect("assertion signature");

        serde_json::from_value(json!({
            "id": self.credential_id(),
            "rawId": self.credential_id(),
            "response": {
                "authenticatorData": base64url_encode(&auth_data),
                "clientDataJSON": base64url_encode(client_data.as_bytes()),
                "signature": base64url_encode(&signature),
                "userHandle": null
            },
            "type": "public-key",
            "extensions": {}
        }))
        .expect("assertion response should deserialize")
    }

    /// rpIdHash | flags | counter, plus the attested credential data
    /// (aaguid, credential id, COSE public key) during registration.
    fn authenticator_data(&self, rp_id: &str, flags: u8, counter: u32, attested: bool) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&sha256(rp_id.as_bytes()));
        data.push(flags);
        data.extend_from_slice(&counter.to_be_bytes());
        if attested {
            data.extend_from_slice(&[0u8; 16]);
            data.extend_from_slice(&(self.credential_id.len() as u16).to_be_bytes());
            data.extend_from_slice(&self.credential_id);
            data.extend_from_slice(&self.cose_public_key());
        }
        data
    }

    /// COSE EC2 map: kty EC2, alg ES256, crv P-256, x, y.
    fn cose_public_key(&self) -> Vec<u8> {
        let group = EcGroup::from_curve_name(Nid::X9_62_PRIME256V1).expect("P-256 group");
        let mut ctx = BigNumContext::new().expect("bignum context");
        let mut x = BigNum::new().expect("bignum");
        let mut y = BigNum::new().expect("bignum");
        self.key
            .public_key()
            .affine_coordinates(&group, &mut x, &mut y, &mut ctx)
            .expect("public key coordinates");

        let mut map = BTreeMap::new();
        map.insert(Value::Integer(1), Value::Integer(2));
        map.insert(Value::Integer(3), Value::Integer(-7));
        map.insert(Value::Integer(-1), Value::Integer(1));
        map.insert(
            Value::Integer(-2),
            Value::Bytes(x.to_vec_padded(32).expect("x coordinate")),
        );
        map.insert(
            Value::Integer(-3),
            Value::Bytes(y.to_vec_padded(32).expect("y coordinate")),
        );
        serde_cbor_2::to_vec(&Value::Map(map)).expect("COSE key encodes")
    }
}
