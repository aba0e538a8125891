//! tests/decrypt_tests.rs
//! End-to-end decryption through the public API

mod common;

use common::{
    field_bytes, seal, seal_default, set_field_bytes, TEST_ITERATIONS, TEST_PLAINTEXT,
    TEST_SECRETS,
};
use netnode::crypto::{open, parse, Decryptor, EnvelopeFormat, SecureString, TagLayout};
use netnode::{DecryptError, ErrorKind};

fn open_value(envelope: &serde_json::Value, format: &EnvelopeFormat) -> Result<String, DecryptError> {
    open(&envelope.to_string(), format)
}

#[test]
fn round_trip_both_layouts() {
    let detached = seal_default(TagLayout::Detached);
    assert_eq!(
        open_value(&detached, &EnvelopeFormat::standard()).unwrap(),
        TEST_PLAINTEXT
    );

    let appended = seal_default(TagLayout::Appended);
    assert_eq!(
        open_value(&appended, &EnvelopeFormat::appended_tag()).unwrap(),
        TEST_PLAINTEXT
    );
}

#[test]
fn producer_scenario_with_iterations_as_secret() {
    let format = EnvelopeFormat::standard().with_secret_fields([
        "date_string",
        "random_number_string",
        "iterations",
    ]);
    let plaintext = br#"{"v2ray":{"add":"example.com","port":443}}"#;
    let mut envelope = seal(
        plaintext,
        &[0u8; 16],
        &[0x11u8; 12],
        100_000,
        &[
            ("date_string", "2024-01-01"),
            ("random_number_string", "abc123"),
            ("iterations", "100000"),
        ],
        TagLayout::Detached,
    );

    let text = open_value(&envelope, &format).unwrap();
    assert_eq!(text.as_bytes(), plaintext);

    let mut tag = field_bytes(&envelope, "tag");
    tag[0] ^= 0x01;
    set_field_bytes(&mut envelope, "tag", &tag);

    let err = open_value(&envelope, &format).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AuthenticationFailed);
}

#[test]
fn every_single_bit_flip_fails_authentication() {
    let envelope = seal_default(TagLayout::Detached);
    let format = EnvelopeFormat::standard();

    for field in ["ciphertext", "tag"] {
        let original = field_bytes(&envelope, field);
        for byte in 0..original.len() {
            for bit in 0..8 {
                let mut tampered = envelope.clone();
                let mut bytes = original.clone();
                bytes[byte] ^= 1 << bit;
                set_field_bytes(&mut tampered, field, &bytes);

                let err = open_value(&tampered, &format).unwrap_err();
                assert_eq!(
                    err.kind(),
                    ErrorKind::AuthenticationFailed,
                    "{field} byte {byte} bit {bit} was accepted"
                );
            }
        }
    }
}

#[test]
fn every_single_bit_flip_fails_authentication_with_appended_tag() {
    let envelope = seal_default(TagLayout::Appended);
    let format = EnvelopeFormat::appended_tag();
    let original = field_bytes(&envelope, "ciphertext");

    for byte in 0..original.len() {
        for bit in 0..8 {
            let mut tampered = envelope.clone();
            let mut bytes = original.clone();
            bytes[byte] ^= 1 << bit;
            set_field_bytes(&mut tampered, "ciphertext", &bytes);

            let err = open_value(&tampered, &format).unwrap_err();
            assert_eq!(
                err.kind(),
                ErrorKind::AuthenticationFailed,
                "ciphertext byte {byte} bit {bit} was accepted"
            );
        }
    }
}

#[test]
fn envelopes_differing_only_in_iterations_each_decrypt() {
    let format = EnvelopeFormat::standard();
    let sealed_with = |iterations: u32| {
        seal(
            TEST_PLAINTEXT.as_bytes(),
            &[7u8; 16],
            &[3u8; 12],
            iterations,
            TEST_SECRETS,
            TagLayout::Detached,
        )
    };

    let mut three = sealed_with(3);
    let mut five = sealed_with(5);
    assert_eq!(open_value(&three, &format).unwrap(), TEST_PLAINTEXT);
    assert_eq!(open_value(&five, &format).unwrap(), TEST_PLAINTEXT);

    three["iterations"] = serde_json::json!(5);
    five["iterations"] = serde_json::json!(3);
    for swapped in [&three, &five] {
        let err = open_value(swapped, &format).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AuthenticationFailed);
    }
}

#[test]
fn wrong_secret_fails_authentication() {
    let mut envelope = seal_default(TagLayout::Detached);
    envelope["random_num"] = serde_json::json!("4822");

    let err = open_value(&envelope, &EnvelopeFormat::standard()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AuthenticationFailed);
    assert!(err.is_retryable_with_new_secret());
}

#[test]
fn wrong_iteration_count_fails_authentication() {
    let mut envelope = seal_default(TagLayout::Detached);
    envelope["iterations"] = serde_json::json!(TEST_ITERATIONS + 1);

    let err = open_value(&envelope, &EnvelopeFormat::standard()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AuthenticationFailed);
}

#[test]
fn nonce_of_wrong_length_is_malformed() {
    for len in [11usize, 13] {
        let mut envelope = seal_default(TagLayout::Detached);
        set_field_bytes(&mut envelope, "iv", &vec![3u8; len]);

        let err = open_value(&envelope, &EnvelopeFormat::standard()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedEnvelope, "nonce length {len}");
    }
}

#[test]
fn non_utf8_plaintext_is_a_decoding_failure() {
    let envelope = seal(
        &[0x7b, 0xff, 0xfe, 0x7d],
        &[7u8; 16],
        &[3u8; 12],
        TEST_ITERATIONS,
        TEST_SECRETS,
        TagLayout::Detached,
    );

    let err = open_value(&envelope, &EnvelopeFormat::standard()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DecodingFailed);
}

#[test]
fn legacy_format_uses_fallback_iterations_and_requires_length() {
    let format = EnvelopeFormat {
        legacy_iterations: Some(TEST_ITERATIONS),
        ..EnvelopeFormat::legacy_native()
    };

    let mut envelope = seal_default(TagLayout::Detached);
    envelope.as_object_mut().unwrap().remove("iterations");
    assert_eq!(open_value(&envelope, &format).unwrap(), TEST_PLAINTEXT);

    envelope
        .as_object_mut()
        .unwrap()
        .remove("original_data_length");
    let err = open_value(&envelope, &format).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedEnvelope);
}

#[test]
fn missing_iterations_without_fallback_is_malformed() {
    let mut envelope = seal_default(TagLayout::Detached);
    envelope.as_object_mut().unwrap().remove("iterations");

    let err = open_value(&envelope, &EnvelopeFormat::standard()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedEnvelope);
}

#[test]
fn caller_supplied_password_overrides_envelope_secrets() {
    let mut envelope = seal_default(TagLayout::Detached);
    envelope["date_string"] = serde_json::json!("19700101");

    let parsed = parse(&envelope.to_string(), &EnvelopeFormat::standard()).unwrap();
    let password = SecureString::new("202401014821");
    let text = Decryptor::new()
        .decrypt_with_password(parsed, &password)
        .unwrap();
    assert_eq!(text, TEST_PLAINTEXT);
}

#[test]
fn errors_never_echo_secret_material() {
    let mut envelope = seal_default(TagLayout::Detached);
    envelope["random_num"] = serde_json::json!("9999");

    let err = open_value(&envelope, &EnvelopeFormat::standard()).unwrap_err();
    let rendered = format!("{err} {err:?}");
    assert!(!rendered.contains("9999"));
    assert!(!rendered.contains("20240101"));
}

#[test]
fn empty_plaintext_depends_on_tag_layout() {
    let seal_empty = |layout| {
        seal(b"", &[7u8; 16], &[3u8; 12], TEST_ITERATIONS, TEST_SECRETS, layout)
    };

    let appended = seal_empty(TagLayout::Appended);
    assert_eq!(
        open_value(&appended, &EnvelopeFormat::appended_tag()).unwrap(),
        ""
    );

    let detached = seal_empty(TagLayout::Detached);
    let err = open_value(&detached, &EnvelopeFormat::standard()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedEnvelope);
    assert!(err.to_string().contains("ciphertext"));
}
