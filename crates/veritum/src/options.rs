use veritum_continuation::RootParams;
use veritum_crypto::SecretKey;

/// Plaintext bytes placed in each content chunk before AEAD sealing. Conservative
/// relative to [`veritum_continuation::DEFAULT_CHUNK_CAPACITY`] to leave room for the
/// 16-byte Poly1305 tag and the chunk's own TLV headers.
pub const DEFAULT_PLAINTEXT_CHUNK_CAPACITY: usize = 900;

/// Tunables for [`crate::Veritum::compile`].
pub struct VeritumOptions {
    /// X25519 public keys of every recipient. Empty with `pre_shared_key` set means
    /// [`crate::EncryptionVariant::PreShared`]; one entry means
    /// [`crate::EncryptionVariant::SingleRecipient`]; more than one means
    /// [`crate::EncryptionVariant::MultiRecipient`].
    pub recipients: Vec<[u8; 32]>,
    /// A symmetric key shared with every recipient out of band, bypassing per-recipient
    /// key wrapping entirely.
    pub pre_shared_key: Option<[u8; 32]>,
    /// The sender's own agreement key. Generated fresh if omitted; callers only need to
    /// supply one to keep an identity stable across messages (the spec has no such
    /// requirement — these are "ephemeral" by design, see `veritum-crypto::agreement`).
    pub sender_secret: Option<SecretKey>,
    /// Plaintext bytes per content chunk before sealing.
    pub chunk_payload_capacity: usize,
    /// Notify/date/signing-key/update-count parameters for the root content Cube.
    pub root: RootParams,
}

impl Default for VeritumOptions {
    fn default() -> Self {
        Self {
            recipients: Vec::new(),
            pre_shared_key: None,
            sender_secret: None,
            chunk_payload_capacity: DEFAULT_PLAINTEXT_CHUNK_CAPACITY,
            root: RootParams::default(),
        }
    }
}

/// The credential a recipient opens a Veritum with: either their own agreement secret
/// (for [`crate::EncryptionVariant::SingleRecipient`]/`MultiRecipient`) or the shared
/// symmetric key (for `PreShared`).
pub enum RecipientCredential {
    Secret(SecretKey),
    PreShared([u8; 32]),
}
