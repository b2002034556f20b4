//! Ready-to-run openssl command lines for common certificate tasks.

use serde::Serialize;

/// A titled openssl invocation with a short explanation.
#[derive(Debug, Clone, Serialize)]
pub struct OpensslCommand {
    /// What the command does
    pub title: &'static str,
    /// One-line description
    pub description: &'static str,
    /// The shell command itself
    pub command: String,
}

/// Generate the openssl cheat-sheet, substituting `domain` where a target
/// host is relevant (defaults to `example.com`).
#[must_use]
pub fn openssl_commands(domain: Option<&str>) -> Vec<OpensslCommand> {
    let host = match domain {
        Some(d) if !d.trim().is_empty() => d.trim(),
        _ => "example.com",
    };

    vec![
        OpensslCommand {
            title: "Get Remote Certificate Chain",
            description: "Download the full certificate chain from a remote server.",
            command: format!(
                "openssl s_client -showcerts -verify 5 -connect {host}:443 < /dev/null"
            ),
        },
        OpensslCommand {
            title: "Generate HPKP Pin (SHA-256)",
            description: "Extract the SPKI SHA-256 fingerprint from a certificate file.",
            command: "openssl x509 -in certificate.pem -pubkey -noout | \
                      openssl pkey -pubin -outform der | \
                      openssl dgst -sha256 -binary | openssl enc -base64"
                .to_string(),
        },
        OpensslCommand {
            title: "Verify Certificate Chain",
            description: "Verify a certificate against an intermediate bundle.",
            command: "openssl verify -CAfile intermediate.pem cert.pem".to_string(),
        },
        OpensslCommand {
            title: "View Certificate Details",
            description: "Print text details of a PEM certificate.",
            command: "openssl x509 -in certificate.pem -text -noout".to_string(),
        },
        OpensslCommand {
            title: "Check Certificate Expiry",
            description: "Check the end date of a remote certificate.",
            command: format!(
                "echo | openssl s_client -servername {host} -connect {host}:443 \
                 2>/dev/null | openssl x509 -noout -dates"
            ),
        },
    ]
}
