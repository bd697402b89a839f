//! # Memory Entries
//!
//! An [`Entry`] holds the immutable facts of one memory plus the receipt
//! metadata generated at creation time: transaction id, barcode payload and
//! footer boilerplate. The rendering pipeline only reads entries; building
//! and storing them belongs to the calling layer.

use chrono::{DateTime, Local};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Characters allowed in the random suffix of a transaction id.
const TXN_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Fixed footer boilerplate. One line is chosen uniformly per entry.
pub const FOOTER_MESSAGES: [&str; 6] = [
    "GRACIAS POR SU MEMORIA * THANK YOU FOR YOUR MEMORY",
    "CONSERVE ESTE TICKET * KEEP THIS RECEIPT",
    "NO SE ACEPTAN DEVOLUCIONES * NO RETURNS ACCEPTED",
    "EL TIEMPO NO ES REEMBOLSABLE * TIME IS NON-REFUNDABLE",
    "VALIDO POR UN RECUERDO * VALID FOR ONE MEMORY",
    "VUELVA PRONTO * COME BACK SOON",
];

/// One memory to be receipted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    pub id: Uuid,
    pub timestamp: DateTime<Local>,
    /// Free-form memo text. May be empty only when a photo is present.
    pub content: String,
    /// Raw bytes of the user-selected photo, retained as provenance.
    /// Never read back by the rendering pipeline.
    #[serde(skip)]
    pub original_image: Option<Vec<u8>>,
    /// Archival receipt PNG. Absent until rendering completes, then set once.
    #[serde(skip)]
    rendered_receipt: Option<Vec<u8>>,
    pub transaction_id: String,
    pub barcode_string: String,
    pub footer_message: String,
}

impl Entry {
    /// Create an entry with freshly generated receipt metadata.
    pub fn new(content: impl Into<String>, original_image: Option<Vec<u8>>) -> Self {
        Self::with_rng(content, original_image, &mut rand::rng())
    }

    /// Create an entry using the given random source (seedable for tests).
    pub fn with_rng(
        content: impl Into<String>,
        original_image: Option<Vec<u8>>,
        rng: &mut impl Rng,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Local::now(),
            content: content.into(),
            original_image,
            rendered_receipt: None,
            transaction_id: generate_transaction_id(rng),
            barcode_string: generate_barcode_string(rng),
            footer_message: FOOTER_MESSAGES[rng.random_range(0..FOOTER_MESSAGES.len())]
                .to_string(),
        }
    }

    /// The receipt date row, `yyyy-MM-dd HH:mm:ss`.
    pub fn formatted_date(&self) -> String {
        self.timestamp.format("%Y-%m-%d %H:%M:%S").to_string()
    }

    /// Archival render bytes, if the pipeline has completed.
    pub fn rendered_receipt(&self) -> Option<&[u8]> {
        self.rendered_receipt.as_deref()
    }

    /// Attach the archival render.
    ///
    /// The slot is write-once: a second call returns `false` and leaves the
    /// existing bytes untouched.
    pub fn attach_rendered(&mut self, png: Vec<u8>) -> bool {
        if self.rendered_receipt.is_some() {
            return false;
        }
        self.rendered_receipt = Some(png);
        true
    }
}

/// `TXN-` + 8 uppercase alphanumeric characters.
fn generate_transaction_id(rng: &mut impl Rng) -> String {
    let suffix: String = (0..8)
        .map(|_| TXN_CHARSET[rng.random_range(0..TXN_CHARSET.len())] as char)
        .collect();
    format!("TXN-{}", suffix)
}

/// Uniform 12-digit decimal payload for the Code128 barcode.
fn generate_barcode_string(rng: &mut impl Rng) -> String {
    rng.random_range(100_000_000_000u64..=999_999_999_999).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_transaction_id_shape() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..200 {
            let txn = generate_transaction_id(&mut rng);
            assert_eq!(txn.len(), 12);
            assert!(txn.starts_with("TXN-"));
            assert!(
                txn[4..]
                    .chars()
                    .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()),
                "bad suffix in {}",
                txn
            );
        }
    }

    #[test]
    fn test_barcode_string_range() {
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..200 {
            let digits = generate_barcode_string(&mut rng);
            assert_eq!(digits.len(), 12);
            let n: u64 = digits.parse().expect("barcode string must be numeric");
            assert!((100_000_000_000..=999_999_999_999).contains(&n));
        }
    }

    #[test]
    fn test_footer_message_membership() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let entry = Entry::with_rng("memo", None, &mut rng);
            assert!(FOOTER_MESSAGES.contains(&entry.footer_message.as_str()));
        }
    }

    #[test]
    fn test_attach_rendered_is_write_once() {
        let mut entry = Entry::new("memo", None);
        assert!(entry.rendered_receipt().is_none());
        assert!(entry.attach_rendered(vec![1, 2, 3]));
        assert!(!entry.attach_rendered(vec![9, 9, 9]));
        assert_eq!(entry.rendered_receipt(), Some(&[1u8, 2, 3][..]));
    }

    #[test]
    fn test_entry_record_serializes_without_image_bytes() {
        let mut entry = Entry::new("memo", Some(vec![0xFF; 64]));
        entry.attach_rendered(vec![0xAA; 64]);
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("transaction_id"));
        assert!(!json.contains("original_image"));
        assert!(!json.contains("rendered_receipt"));
    }
}
