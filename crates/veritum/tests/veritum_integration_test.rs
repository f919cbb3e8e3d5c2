//! End-to-end tests exercising the whole stack through a [`CubeStore`]: compile a
//! Veritum, persist every Cube it produced, re-fetch them by key, and recover the
//! original plaintext. Mirrors the store-facing workflow a real client would use, rather
//! than constructing Cubes in isolation the way the per-crate unit tests do.

use veritum::{
    AddOutcome, CubeStore, CubeType, InMemoryCubeStore, PowPolicy, RecipientCredential, SecretKey, Veritum,
    VeritumOptions,
};

fn store_all(cubes: &[veritum_cube::Cube], store: &InMemoryCubeStore) -> Vec<veritum_types::Key> {
    cubes
        .iter()
        .map(|cube| {
            let outcome = store.add(cube.blob().to_vec()).unwrap();
            assert!(matches!(outcome, AddOutcome::Accepted));
            cube.key()
        })
        .collect()
}

fn fetch_all(keys: &[veritum_types::Key], store: &InMemoryCubeStore) -> Vec<veritum_cube::Cube> {
    keys.iter()
        .map(|key| {
            let blob = store.get(key).expect("cube was just stored");
            let cube_type = CubeType::from_byte(blob[0]).expect("stored blob carries a recognized cube type byte");
            veritum_cube::Cube::from_blob(cube_type, &blob).expect("stored cube round-trips through from_blob")
        })
        .collect()
}

fn roundtrip_through_store(veritum: &Veritum, store: &InMemoryCubeStore) -> (Vec<veritum_cube::Cube>, Vec<veritum_cube::Cube>) {
    let content_keys = store_all(veritum.content_cubes(), store);
    let key_distribution_keys = store_all(veritum.key_distribution_cubes(), store);
    (fetch_all(&content_keys, store), fetch_all(&key_distribution_keys, store))
}

#[test]
fn single_recipient_message_survives_a_round_trip_through_the_store() {
    let store = InMemoryCubeStore::new(PowPolicy::new(0));
    let recipient = SecretKey::generate();
    let options = VeritumOptions { recipients: vec![recipient.public_key()], ..VeritumOptions::default() };

    let veritum = Veritum::compile(b"store me securely", CubeType::Frozen, PowPolicy::new(0), options).unwrap();
    let (content, key_distribution) = roundtrip_through_store(&veritum, &store);

    let plaintext = Veritum::open(&content, &key_distribution, &RecipientCredential::Secret(recipient)).unwrap();
    assert_eq!(plaintext, b"store me securely");
}

#[test]
fn long_pre_shared_message_spans_several_cubes_in_the_store() {
    let store = InMemoryCubeStore::new(PowPolicy::new(0));
    let psk = [5u8; 32];
    let options = VeritumOptions { pre_shared_key: Some(psk), chunk_payload_capacity: 32, ..VeritumOptions::default() };

    let plaintext = vec![b'm'; 500];
    let veritum = Veritum::compile(&plaintext, CubeType::Frozen, PowPolicy::new(0), options).unwrap();
    assert!(veritum.content_cubes().len() > 1);

    let (content, key_distribution) = roundtrip_through_store(&veritum, &store);
    let recovered = Veritum::open(&content, &key_distribution, &RecipientCredential::PreShared(psk)).unwrap();
    assert_eq!(recovered, plaintext);
}

/// Scenario 5 (`SPEC_FULL.md` §8), through the store: 3 recipients, a short payload, one
/// chunk, and an `ENCRYPTED` value whose length is exactly the framing table predicts.
#[test]
fn three_recipient_message_fits_a_single_chunk_and_matches_scenario_five() {
    let store = InMemoryCubeStore::new(PowPolicy::new(0));
    let recipients: Vec<SecretKey> = (0..3).map(|_| SecretKey::generate()).collect();
    let public_keys = recipients.iter().map(SecretKey::public_key).collect();
    let options = VeritumOptions { recipients: public_keys, ..VeritumOptions::default() };

    let plaintext = b"board meeting at noon";
    let veritum = Veritum::compile(plaintext, CubeType::Frozen, PowPolicy::new(0), options).unwrap();
    assert_eq!(veritum.content_cubes().len(), 1);
    assert!(veritum.key_distribution_cubes().is_empty());

    let root_fields = veritum.content_cubes()[0].fields().unwrap();
    let encrypted = root_fields
        .iter()
        .find(|f| f.field_type == veritum_types::FieldType::Encrypted)
        .unwrap();
    let expected_len = 32 + 24 + 3 * 32 + plaintext.len() + 16;
    assert_eq!(encrypted.value.len(), expected_len);

    let (content, key_distribution) = roundtrip_through_store(&veritum, &store);
    for recipient in recipients {
        let plaintext_out =
            Veritum::open(&content, &key_distribution, &RecipientCredential::Secret(recipient)).unwrap();
        assert_eq!(plaintext_out, plaintext);
    }

    let impostor = SecretKey::generate();
    let opened = Veritum::open(&content, &key_distribution, &RecipientCredential::Secret(impostor)).unwrap();
    assert!(opened.is_empty());
}

/// Scenario 6 (`SPEC_FULL.md` §8), through the store: 40 recipients force the key-slot
/// table into more than one key-distribution chunk, and each recipient is handed only
/// the one chunk [`Veritum::chunks_for_recipient`] says they need.
#[test]
fn forty_recipient_message_round_trips_its_key_distribution_chain_through_the_store() {
    let store = InMemoryCubeStore::new(PowPolicy::new(0));
    let recipients: Vec<SecretKey> = (0..40).map(|_| SecretKey::generate()).collect();
    let public_keys = recipients.iter().map(SecretKey::public_key).collect();
    let options = VeritumOptions { recipients: public_keys, ..VeritumOptions::default() };

    let veritum = Veritum::compile(b"quarterly results", CubeType::Frozen, PowPolicy::new(0), options).unwrap();
    assert!(veritum.key_distribution_cubes().len() > 1);

    let content_keys = store_all(veritum.content_cubes(), &store);
    let key_distribution_keys = store_all(veritum.key_distribution_cubes(), &store);
    let content = fetch_all(&content_keys, &store);

    for recipient in &recipients {
        let (_, key_chunk_cubes) = veritum.chunks_for_recipient(&recipient.public_key());
        assert_eq!(key_chunk_cubes.len(), 1);
        let key_chunk = vec![fetch_all(&[key_chunk_cubes[0].key()], &store).remove(0)];

        let plaintext =
            Veritum::open(&content, &key_chunk, &RecipientCredential::Secret(recipient.clone())).unwrap();
        assert_eq!(plaintext, b"quarterly results");
    }

    // Handing a recipient someone else's key-distribution chunk must not leak anything.
    let (_, correct_chunk) = veritum.chunks_for_recipient(&recipients[0].public_key());
    let wrong_key = key_distribution_keys
        .iter()
        .find(|key| **key != correct_chunk[0].key())
        .expect("more than one key-distribution chunk exists");
    let wrong_chunk = vec![fetch_all(std::slice::from_ref(wrong_key), &store).remove(0)];
    let opened =
        Veritum::open(&content, &wrong_chunk, &RecipientCredential::Secret(recipients[0].clone())).unwrap();
    assert!(opened.is_empty());
}
