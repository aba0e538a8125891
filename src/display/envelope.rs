//! Envelope summary formatting

use crate::crypto::{EnvelopeSummary, IterationSource};

/// Format an envelope summary as a detail view
pub fn format_envelope_summary(summary: &EnvelopeSummary) -> String {
    let mut output = String::new();

    output.push_str("Envelope\n");
    output.push_str(&format!("  Salt:        {} bytes\n", summary.salt_len));
    output.push_str(&format!("  Nonce:       {} bytes\n", summary.nonce_len));
    output.push_str(&format!("  Ciphertext:  {} bytes\n", summary.ciphertext_len));
    output.push_str(&format!(
        "  Tag:         {} bytes ({})\n",
        summary.tag_len, summary.tag_layout
    ));

    let source = match summary.iteration_source {
        IterationSource::Envelope => "from envelope",
        IterationSource::LegacyFallback => "legacy default",
    };
    output.push_str(&format!(
        "  KDF:         PBKDF2-{}, {} iterations ({})\n",
        summary.prf, summary.iterations, source
    ));
    output.push_str(&format!(
        "  Secret:      {}\n",
        summary.secret_fields.join(" + ")
    ));

    if let Some(len) = summary.expected_plaintext_length {
        output.push_str(&format!("  Plaintext:   {} bytes\n", len));
    }
    if let Some(date) = summary.issued_on {
        output.push_str(&format!("  Issued:      {}\n", date.format("%Y-%m-%d")));
    }

    output
}
