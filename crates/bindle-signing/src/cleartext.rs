//! Canonical cleartext signed for an invoice.
//!
//! ```text
//! <authors[0]>
//! <name>
//! <version>
//! <role>
//! ~
//! <parcel[0].label.sha256>
//! <parcel[1].label.sha256>
//! ...
//! ```
//!
//! Lines are joined with `\n`, without a trailing newline. The parcel digests
//! keep invoice order, so reordering parcels changes the cleartext. The
//! signing time is not part of the cleartext.

use crate::role::SignatureRole;
use crate::types::Invoice;

/// Separates the fixed metadata lines from the parcel digests.
pub const CLEARTEXT_SEPARATOR: &str = "~";

/// Build the cleartext for `invoice` signed in `role`.
pub fn build_cleartext(invoice: &Invoice, role: SignatureRole) -> String {
    let mut parts: Vec<&str> = Vec::with_capacity(5 + invoice.parcel.len());
    parts.push(invoice.primary_author().unwrap_or_default());
    parts.push(&invoice.bindle.name);
    parts.push(&invoice.bindle.version);
    parts.push(role.as_str());
    parts.push(CLEARTEXT_SEPARATOR);
    parts.extend(invoice.parcel.iter().map(|p| p.label.sha256.as_str()));
    parts.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BindleSpec, Parcel};

    fn invoice() -> Invoice {
        Invoice::new(BindleSpec::new("proj", "0.1.0").with_author("Alice"))
            .with_parcel(Parcel::from_sha256("abc123"))
    }

    #[test]
    fn test_cleartext_layout() {
        assert_eq!(
            build_cleartext(&invoice(), SignatureRole::Creator),
            "Alice\nproj\n0.1.0\ncreator\n~\nabc123"
        );
    }

    #[test]
    fn test_cleartext_no_parcels_ends_with_separator() {
        let invoice = Invoice::new(BindleSpec::new("proj", "0.1.0").with_author("Alice"));
        assert_eq!(
            build_cleartext(&invoice, SignatureRole::Host),
            "Alice\nproj\n0.1.0\nhost\n~"
        );
    }

    #[test]
    fn test_cleartext_uses_primary_author_only() {
        let invoice = Invoice::new(
            BindleSpec::new("proj", "0.1.0")
                .with_author("Alice")
                .with_author("Bob"),
        );
        let text = build_cleartext(&invoice, SignatureRole::Approver);
        assert!(text.starts_with("Alice\n"));
        assert!(!text.contains("Bob"));
    }

    #[test]
    fn test_cleartext_parcel_order() {
        let a = invoice().with_parcel(Parcel::from_sha256("def456"));
        let mut b = a.clone();
        b.parcel.reverse();

        let text_a = build_cleartext(&a, SignatureRole::Creator);
        let text_b = build_cleartext(&b, SignatureRole::Creator);
        assert!(text_a.ends_with("~\nabc123\ndef456"));
        assert!(text_b.ends_with("~\ndef456\nabc123"));
    }

    #[test]
    fn test_cleartext_deterministic() {
        let invoice = invoice();
        let first = build_cleartext(&invoice, SignatureRole::Proxy);
        for _ in 0..10 {
            assert_eq!(build_cleartext(&invoice, SignatureRole::Proxy), first);
        }
    }

    #[test]
    fn test_cleartext_depends_on_role() {
        let invoice = invoice();
        assert_ne!(
            build_cleartext(&invoice, SignatureRole::Creator),
            build_cleartext(&invoice, SignatureRole::Approver)
        );
    }
}
