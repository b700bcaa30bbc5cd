//! Self-signed identity certificates.
//!
//! Subject and issuer are the same name and the certificate is signed by the
//! key it certifies (sha256WithRSAEncryption). Validity is exactly one
//! calendar year from issuance.

use std::time::SystemTime;

use chrono::{DateTime, Months, Timelike, Utc};
use rand::rngs::OsRng;
use rand_core::RngCore;
use rsa::pkcs1v15::{Signature, SigningKey, VerifyingKey};
use rsa::pkcs8::{DecodePublicKey, EncodePublicKey};
use rsa::signature::Verifier;
use rsa::RsaPublicKey;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use x509_cert::attr::AttributeTypeAndValue;
use x509_cert::builder::{Builder, CertificateBuilder, Profile};
use x509_cert::der::asn1::{GeneralizedTime, PrintableStringRef, SetOfVec, UtcTime};
use x509_cert::der::oid::ObjectIdentifier;
use x509_cert::der::pem::LineEnding;
use x509_cert::der::{Any, Decode, DecodePem, Encode, EncodePem, Tag};
use x509_cert::name::{Name, RdnSequence, RelativeDistinguishedName};
use x509_cert::serial_number::SerialNumber;
use x509_cert::spki::SubjectPublicKeyInfoOwned;
use x509_cert::time::{Time, Validity};

use crate::crypto::KeyPair;
use crate::error::{Result, SelfSignError};

/// sha256WithRSAEncryption (RFC 4055).
pub const SHA256_WITH_RSA_OID: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.11");

const OID_COMMON_NAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.3");
const OID_COUNTRY_NAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.6");
const OID_LOCALITY_NAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.7");
const OID_STATE_OR_PROVINCE: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.8");
const OID_ORGANIZATION_NAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.10");
const OID_ORGANIZATIONAL_UNIT: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.11");

/// Serial numbers are 16 random bytes.
const SERIAL_LENGTH: usize = 16;

/// Validity period in calendar months.
const VALIDITY_MONTHS: u32 = 12;

/// User-supplied subject attributes. All free text, all optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubjectAttributes {
    pub common_name: String,
    pub country_name: String,
    pub state_or_province: String,
    pub locality_name: String,
    pub organization_name: String,
    pub organizational_unit_name: String,
}

impl SubjectAttributes {
    /// Attributes with only a common name set.
    pub fn with_common_name(common_name: impl Into<String>) -> Self {
        Self {
            common_name: common_name.into(),
            ..Self::default()
        }
    }

    /// Build the X.501 name, one RDN per non-empty attribute.
    pub fn to_name(&self) -> Result<Name> {
        let fields = [
            (OID_COMMON_NAME, &self.common_name),
            (OID_COUNTRY_NAME, &self.country_name),
            (OID_STATE_OR_PROVINCE, &self.state_or_province),
            (OID_LOCALITY_NAME, &self.locality_name),
            (OID_ORGANIZATION_NAME, &self.organization_name),
            (OID_ORGANIZATIONAL_UNIT, &self.organizational_unit_name),
        ];

        let mut rdns = Vec::new();
        for (oid, value) in fields {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            rdns.push(relative_name(oid, value)?);
        }
        Ok(RdnSequence(rdns))
    }
}

fn relative_name(oid: ObjectIdentifier, value: &str) -> Result<RelativeDistinguishedName> {
    // countryName is a PrintableString; fall back to UTF8String for free text
    let tag = if oid == OID_COUNTRY_NAME && PrintableStringRef::new(value).is_ok() {
        Tag::PrintableString
    } else {
        Tag::Utf8String
    };

    let attribute = AttributeTypeAndValue {
        oid,
        value: Any::new(tag, value.as_bytes()).map_err(cert_error)?,
    };
    let set = SetOfVec::try_from(vec![attribute]).map_err(cert_error)?;
    Ok(RelativeDistinguishedName(set))
}

fn cert_error(err: impl std::fmt::Display) -> SelfSignError {
    SelfSignError::CertificateGenerationFailure(err.to_string())
}

/// A self-signed X.509 certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    inner: x509_cert::Certificate,
}

/// Human-readable view of a certificate.
#[derive(Debug, Clone, Serialize)]
pub struct CertificateSummary {
    pub subject: String,
    pub issuer: String,
    pub serial_number: String,
    pub not_before: DateTime<Utc>,
    pub not_after: DateTime<Utc>,
    pub signature_algorithm: String,
    pub self_signature_valid: bool,
}

impl Certificate {
    /// Parse a DER-encoded certificate.
    pub fn from_der(bytes: &[u8]) -> Result<Self> {
        let inner = x509_cert::Certificate::from_der(bytes)
            .map_err(|e| SelfSignError::MalformedContainer(format!("Invalid certificate: {}", e)))?;
        Ok(Self { inner })
    }

    /// Parse a PEM-encoded certificate.
    pub fn from_pem(pem: &str) -> Result<Self> {
        let inner = x509_cert::Certificate::from_pem(pem)
            .map_err(|e| SelfSignError::MalformedContainer(format!("Invalid certificate: {}", e)))?;
        Ok(Self { inner })
    }

    /// DER encoding.
    pub fn to_der(&self) -> Result<Vec<u8>> {
        self.inner.to_der().map_err(cert_error)
    }

    /// PEM encoding (`-----BEGIN CERTIFICATE-----`).
    pub fn to_pem(&self) -> Result<String> {
        self.inner.to_pem(LineEnding::LF).map_err(cert_error)
    }

    /// The underlying X.509 structure.
    pub fn as_x509(&self) -> &x509_cert::Certificate {
        &self.inner
    }

    /// Serial number as lowercase hex.
    pub fn serial_hex(&self) -> String {
        hex::encode(self.inner.tbs_certificate.serial_number.as_bytes())
    }

    pub fn not_before(&self) -> DateTime<Utc> {
        DateTime::<Utc>::from(self.inner.tbs_certificate.validity.not_before.to_system_time())
    }

    pub fn not_after(&self) -> DateTime<Utc> {
        DateTime::<Utc>::from(self.inner.tbs_certificate.validity.not_after.to_system_time())
    }

    /// The RSA public key embedded in the certificate.
    pub fn public_key(&self) -> Result<RsaPublicKey> {
        let spki = self
            .inner
            .tbs_certificate
            .subject_public_key_info
            .to_der()
            .map_err(|e| SelfSignError::VerificationFailure(e.to_string()))?;
        RsaPublicKey::from_public_key_der(&spki)
            .map_err(|e| SelfSignError::UnsupportedKeyType(format!("Certificate key: {}", e)))
    }

    /// Verify the certificate's signature against its own public key.
    pub fn verify_self_signature(&self) -> Result<()> {
        if self.inner.signature_algorithm.oid != SHA256_WITH_RSA_OID {
            return Err(SelfSignError::VerificationFailure(format!(
                "Unexpected signature algorithm {}",
                self.inner.signature_algorithm.oid
            )));
        }

        let message = self
            .inner
            .tbs_certificate
            .to_der()
            .map_err(|e| SelfSignError::VerificationFailure(e.to_string()))?;
        let signature_bytes = self.inner.signature.as_bytes().ok_or_else(|| {
            SelfSignError::VerificationFailure("Signature has unused bits".to_string())
        })?;
        let signature = Signature::try_from(signature_bytes)
            .map_err(|e| SelfSignError::VerificationFailure(e.to_string()))?;

        VerifyingKey::<Sha256>::new(self.public_key()?)
            .verify(&message, &signature)
            .map_err(|e| SelfSignError::VerificationFailure(format!("Certificate signature: {}", e)))
    }

    /// Summarize the certificate for display.
    pub fn summary(&self) -> CertificateSummary {
        let tbs = &self.inner.tbs_certificate;
        CertificateSummary {
            subject: tbs.subject.to_string(),
            issuer: tbs.issuer.to_string(),
            serial_number: self.serial_hex(),
            not_before: self.not_before(),
            not_after: self.not_after(),
            signature_algorithm: self.inner.signature_algorithm.oid.to_string(),
            self_signature_valid: self.verify_self_signature().is_ok(),
        }
    }
}

/// Issue a self-signed certificate valid from now.
pub fn issue_self_signed(key_pair: &KeyPair, attrs: &SubjectAttributes) -> Result<Certificate> {
    issue_self_signed_at(key_pair, attrs, Utc::now())
}

/// Issue a self-signed certificate valid from `not_before`.
///
/// `not_before` is truncated to whole seconds; `not_after` is twelve calendar
/// months later.
pub fn issue_self_signed_at(
    key_pair: &KeyPair,
    attrs: &SubjectAttributes,
    not_before: DateTime<Utc>,
) -> Result<Certificate> {
    let not_before = not_before.with_nanosecond(0).unwrap_or(not_before);
    let not_after = not_before
        .checked_add_months(Months::new(VALIDITY_MONTHS))
        .ok_or_else(|| cert_error("Validity end is out of range"))?;

    let validity = Validity {
        not_before: asn1_time(not_before)?,
        not_after: asn1_time(not_after)?,
    };

    let spki_der = key_pair
        .public_key()
        .to_public_key_der()
        .map_err(cert_error)?;
    let spki = SubjectPublicKeyInfoOwned::from_der(spki_der.as_bytes()).map_err(cert_error)?;

    let signer = SigningKey::<Sha256>::new(key_pair.private_key().clone());
    let builder = CertificateBuilder::new(
        Profile::Root,
        random_serial()?,
        validity,
        attrs.to_name()?,
        spki,
        &signer,
    )
    .map_err(cert_error)?;

    let inner = builder.build::<Signature>().map_err(cert_error)?;
    Ok(Certificate { inner })
}

fn random_serial() -> Result<SerialNumber> {
    let mut bytes = [0u8; SERIAL_LENGTH];
    OsRng.fill_bytes(&mut bytes);
    // Positive and minimally encoded
    bytes[0] = (bytes[0] & 0x7f) | 0x40;
    SerialNumber::new(&bytes).map_err(cert_error)
}

/// RFC 5280: UTCTime through 2049, GeneralizedTime afterwards.
fn asn1_time(at: DateTime<Utc>) -> Result<Time> {
    let system_time = SystemTime::from(at);
    match UtcTime::from_system_time(system_time) {
        Ok(time) => Ok(Time::UtcTime(time)),
        Err(_) => GeneralizedTime::from_system_time(system_time)
            .map(Time::GeneralTime)
            .map_err(cert_error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{derive_seed, generate_key_pair};
    use chrono::TimeZone;

    fn test_key_pair() -> KeyPair {
        generate_key_pair(Some(&derive_seed("certificate-tests")), 1024).unwrap()
    }

    fn full_attributes() -> SubjectAttributes {
        SubjectAttributes {
            common_name: "Alice".to_string(),
            country_name: "RO".to_string(),
            state_or_province: "Cluj".to_string(),
            locality_name: "Cluj-Napoca".to_string(),
            organization_name: "Example Org".to_string(),
            organizational_unit_name: "Signing".to_string(),
        }
    }

    #[test]
    fn test_self_signature_verifies() {
        let kp = test_key_pair();
        let cert = issue_self_signed(&kp, &full_attributes()).unwrap();
        cert.verify_self_signature().unwrap();
    }

    #[test]
    fn test_subject_equals_issuer() {
        let kp = test_key_pair();
        let cert = issue_self_signed(&kp, &full_attributes()).unwrap();
        let tbs = &cert.as_x509().tbs_certificate;
        assert_eq!(tbs.subject, tbs.issuer);
        assert_eq!(tbs.subject, full_attributes().to_name().unwrap());
    }

    #[test]
    fn test_embedded_public_key_matches() {
        let kp = test_key_pair();
        let cert = issue_self_signed(&kp, &SubjectAttributes::with_common_name("Alice")).unwrap();
        assert_eq!(cert.public_key().unwrap(), kp.public_key());
    }

    #[test]
    fn test_validity_is_one_calendar_year() {
        let kp = test_key_pair();
        let start = Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap();
        let cert =
            issue_self_signed_at(&kp, &SubjectAttributes::with_common_name("Alice"), start).unwrap();

        assert_eq!(cert.not_before(), start);
        assert_eq!(
            cert.not_after(),
            Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap()
        );
    }

    #[test]
    fn test_leap_day_validity_clamps() {
        let kp = test_key_pair();
        let start = Utc.with_ymd_and_hms(2028, 2, 29, 12, 0, 0).unwrap();
        let cert =
            issue_self_signed_at(&kp, &SubjectAttributes::with_common_name("Leap"), start).unwrap();
        assert_eq!(
            cert.not_after(),
            Utc.with_ymd_and_hms(2029, 2, 28, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_signature_algorithm_is_sha256_rsa() {
        let kp = test_key_pair();
        let cert = issue_self_signed(&kp, &full_attributes()).unwrap();
        assert_eq!(cert.as_x509().signature_algorithm.oid, SHA256_WITH_RSA_OID);
    }

    #[test]
    fn test_serial_numbers_are_unique() {
        let kp = test_key_pair();
        let attrs = SubjectAttributes::with_common_name("Alice");
        let a = issue_self_signed(&kp, &attrs).unwrap();
        let b = issue_self_signed(&kp, &attrs).unwrap();
        assert_ne!(a.serial_hex(), b.serial_hex());
        assert_ne!(a.serial_hex(), "01");
    }

    #[test]
    fn test_pem_round_trip() {
        let kp = test_key_pair();
        let cert = issue_self_signed(&kp, &full_attributes()).unwrap();
        let pem = cert.to_pem().unwrap();
        assert!(pem.starts_with("-----BEGIN CERTIFICATE-----"));
        assert_eq!(Certificate::from_pem(&pem).unwrap(), cert);
    }

    #[test]
    fn test_empty_attributes_are_omitted() {
        let name = SubjectAttributes::with_common_name("Alice").to_name().unwrap();
        assert_eq!(name.0.len(), 1);
        assert_eq!(name.to_string().to_lowercase(), "cn=alice");
    }

    #[test]
    fn test_tampered_certificate_fails_verification() {
        let kp = test_key_pair();
        let cert = issue_self_signed(&kp, &full_attributes()).unwrap();

        // Re-sign nothing: swap in another key's public key
        let other = generate_key_pair(Some(&derive_seed("someone-else")), 1024).unwrap();
        let mut inner = cert.as_x509().clone();
        let spki_der = other.public_key().to_public_key_der().unwrap();
        inner.tbs_certificate.subject_public_key_info =
            SubjectPublicKeyInfoOwned::from_der(spki_der.as_bytes()).unwrap();
        let tampered = Certificate { inner };

        assert!(matches!(
            tampered.verify_self_signature(),
            Err(SelfSignError::VerificationFailure(_))
        ));
    }

    #[test]
    fn test_summary_fields() {
        let kp = test_key_pair();
        let cert = issue_self_signed(&kp, &full_attributes()).unwrap();
        let summary = cert.summary();
        assert!(summary.subject.to_lowercase().contains("cn=alice"));
        assert_eq!(summary.subject, summary.issuer);
        assert_eq!(summary.serial_number, cert.serial_hex());
        assert_eq!(summary.signature_algorithm, "1.2.840.113549.1.1.11");
        assert!(summary.self_signature_valid);
    }
}
