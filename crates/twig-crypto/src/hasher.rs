use sha1::{Digest, Sha1};
use twig_types::{ObjectId, OBJECT_ID_LEN};

/// SHA-1 content hasher.
///
/// The digest is computed over the raw bytes only. Blobs and commit records
/// share one id space and are told apart by how callers read them back.
#[derive(Clone, Copy, Debug, Default)]
pub struct ContentHasher;

impl ContentHasher {
    /// Hash raw bytes.
    pub fn hash(data: &[u8]) -> ObjectId {
        let mut hasher = Sha1::new();
        hasher.update(data);
        let digest = hasher.finalize();
        let mut bytes = [0u8; OBJECT_ID_LEN];
        bytes.copy_from_slice(&digest);
        ObjectId::from_hash(bytes)
    }

    /// Verify that data produces the expected object ID.
    pub fn verify(data: &[u8], expected: &ObjectId) -> bool {
        Self::hash(data) == *expected
    }
}
