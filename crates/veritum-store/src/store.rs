use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use veritum_cube::Cube;
use veritum_crypto::PowPolicy;
use veritum_types::{CubeType, Key};

use crate::contest::{contest, Winner};
use crate::traits::{AddOutcome, CubeListener, CubeStore};
use crate::StoreError;

/// The reference [`CubeStore`]: an in-memory, mutex-guarded map from key to blob, with
/// contest resolution on collision and synchronous listener notification.
///
/// Grounded on `kimberlite-storage::Storage`'s manager-struct-with-lock shape, simplified
/// down from its segment-file/WAL machinery since this store has no on-disk format
/// (`SPEC_FULL.md` §1 non-goals).
pub struct InMemoryCubeStore {
    cubes: Mutex<HashMap<Key, Cube>>,
    listeners: Mutex<Vec<Arc<dyn CubeListener>>>,
    pow_policy: PowPolicy,
}

impl InMemoryCubeStore {
    #[must_use]
    pub fn new(pow_policy: PowPolicy) -> Self {
        Self { cubes: Mutex::new(HashMap::new()), listeners: Mutex::new(Vec::new()), pow_policy }
    }

    pub fn register_listener(&self, listener: Arc<dyn CubeListener>) {
        self.listeners.lock().expect("cube store listener lock poisoned").push(listener);
    }

    fn notify(&self, key: Key) {
        for listener in self.listeners.lock().expect("cube store listener lock poisoned").iter() {
            listener.on_cube_added(key);
        }
    }
}

impl CubeStore for InMemoryCubeStore {
    fn add(&self, blob: Vec<u8>) -> Result<AddOutcome, StoreError> {
        let type_byte = *blob.first().ok_or(StoreError::EmptyBlob)?;
        let cube_type = CubeType::from_byte(type_byte).ok_or(StoreError::UnknownCubeType(type_byte))?;

        let incoming = match Cube::from_blob(cube_type, &blob) {
            Ok(cube) => cube,
            Err(err) => {
                tracing::debug!(?err, "rejected cube: failed to parse or verify");
                return Ok(AddOutcome::RejectedForInvalid(err));
            }
        };
        if !incoming.verify_proof_of_work(self.pow_policy) {
            tracing::debug!(key = %incoming.key(), "rejected cube: insufficient proof-of-work");
            return Ok(AddOutcome::RejectedForInvalid(veritum_cube::CubeError::InsufficientProofOfWork));
        }

        let mut cubes = self.cubes.lock().expect("cube store lock poisoned");
        let key = incoming.key();
        match cubes.get(&key) {
            None => {
                cubes.insert(key, incoming);
                drop(cubes);
                tracing::debug!(%key, "cube accepted");
                self.notify(key);
                Ok(AddOutcome::Accepted)
            }
            Some(local) => match contest(local, &incoming) {
                Winner::Incoming => {
                    cubes.insert(key, incoming);
                    drop(cubes);
                    tracing::debug!(%key, "cube accepted: won contest against stored copy");
                    self.notify(key);
                    Ok(AddOutcome::Accepted)
                }
                Winner::Local => {
                    tracing::trace!(%key, "cube rejected: lost contest against stored copy");
                    Ok(AddOutcome::RejectedForContest)
                }
            },
        }
    }

    fn get(&self, key: &Key) -> Option<Vec<u8>> {
        self.cubes.lock().expect("cube store lock poisoned").get(key).map(|c| c.blob().to_vec())
    }

    fn get_all(&self) -> Vec<Vec<u8>> {
        self.cubes.lock().expect("cube store lock poisoned").values().map(|c| c.blob().to_vec()).collect()
    }
}
