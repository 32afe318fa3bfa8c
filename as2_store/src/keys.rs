//! Composite keys and content-addressed path layout.
//!
//! Filenames derived from AS2 names and Message-IDs can contain characters a filesystem
//! dislikes (`/`, whitespace, quotes from an escaped name); every path helper
//! here sanitises before joining, rather than trusting the caller to have done so.

/// The inbound storage key: `messageID # as2To # as2From`, permitting the same raw
/// Message-ID to recur across different partner pairs, and forming the basis of duplicate
/// detection.
pub fn composite_key(message_id: &str, as2_to: &str, as2_from: &str) -> String {
    format!("{}#{}#{}", message_id, as2_to, as2_from)
}

/// Replace characters unsafe in a path segment with `_`. AS2 names may be escaped/quoted
/// (`as2_profile::escape`) before this is ever called, but a defence at the filesystem boundary
/// costs nothing and a malicious or malformed name must never be interpreted as a path
/// separator.
pub fn sanitise(segment: &str) -> String {
    segment.chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '#') { c } else { '_' })
        .collect()
}

/// `<root>/messages/<org>/inbox/<partner>/<filename>`.
pub fn inbox_path(root: &str, org: &str, partner: &str, filename: &str) -> String {
    format!("{}/messages/{}/inbox/{}/{}", root, sanitise(org), sanitise(partner), sanitise(filename))
}

/// `<root>/messages/<partner>/outbox/<org>/...`.
pub fn outbox_path(root: &str, partner: &str, org: &str, filename: &str) -> String {
    format!("{}/messages/{}/outbox/{}/{}", root, sanitise(partner), sanitise(org), sanitise(filename))
}

/// `<root>/messages/__store/payload/{received,sent}/<message_id>`.
pub fn payload_store_path(root: &str, direction_dir: &str, message_id: &str) -> String {
    format!("{}/messages/__store/payload/{}/{}", root, direction_dir, sanitise(message_id))
}

/// `<root>/messages/__store/mdn/{received,sent}/<message_id>.mdn`.
pub fn mdn_store_path(root: &str, direction_dir: &str, message_id: &str) -> String {
    format!("{}/messages/__store/mdn/{}/{}.mdn", root, direction_dir, sanitise(message_id))
}

/// `<root>/messages/__store/raw/received/<id>#<to>#<from>`.
pub fn raw_received_path(root: &str, message_id: &str, as2_to: &str, as2_from: &str) -> String {
    format!(
        "{}/messages/__store/raw/received/{}",
        root,
        sanitise(&composite_key(message_id, as2_to, as2_from)),
    )
}

/// Path relative to an [`crate::ArtifactStore`]'s own root, for the content-addressed payload
/// store; the engine passes this as the artifact `filename` with an empty `store`, since
/// the store object is already rooted at `<root>` and need not be told `root` a second time.
pub fn payload_store_rel(direction_dir: &str, message_id: &str) -> String {
    format!("messages/__store/payload/{}/{}", direction_dir, sanitise(message_id))
}

/// Relative counterpart to [`mdn_store_path`].
pub fn mdn_store_rel(direction_dir: &str, message_id: &str) -> String {
    format!("messages/__store/mdn/{}/{}.mdn", direction_dir, sanitise(message_id))
}

/// Relative counterpart to [`raw_received_path`].
pub fn raw_received_rel(message_id: &str, as2_to: &str, as2_from: &str) -> String {
    format!("messages/__store/raw/received/{}", sanitise(&composite_key(message_id, as2_to, as2_from)))
}

/// Relative counterpart to [`inbox_path`].
pub fn inbox_rel(org: &str, partner: &str, filename: &str) -> String {
    format!("messages/{}/inbox/{}/{}", sanitise(org), sanitise(partner), sanitise(filename))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composite_key_preserves_the_three_components_in_order() {
        assert_eq!(composite_key("abc123", "BigCo", "AcmeCorp"), "abc123#BigCo#AcmeCorp");
    }

    #[test]
    fn sanitise_neutralises_path_separators() {
        assert_eq!(sanitise("../../etc/passwd"), ".._.._etc_passwd");
        assert_eq!(sanitise("Acme Corp"), "Acme_Corp");
    }

    #[test]
    fn raw_received_path_embeds_the_composite_key() {
        let p = raw_received_path("/data", "msg1", "BigCo", "AcmeCorp");
        assert_eq!(p, "/data/messages/__store/raw/received/msg1_BigCo_AcmeCorp");
    }
}
