//! End-to-end recovery scenarios
//!
//! Each test plays the full protocol between independent actors who
//! share nothing but published artifacts: bundles, envelopes, the
//! on-chain policy root, and disclosed claims. No state is shared
//! between the two sides of any exchange.

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::json;
use warden_core::{
    build_policy_root, codec, commit_guardian, compute_nullifier, compute_recovery_request_id,
    merkle, sort_by_address, verify_disclosure, IssuedCredential,
};
use warden_crypto::session::NONCE_SIZE;
use warden_crypto::{
    derive_as_initiator, derive_as_responder, IdentityKeyPair, PolicyId, PreKeyBundle, Role,
    SessionState,
};
use warden_proto::Address;

fn policy_id() -> PolicyId {
    let mut bytes = [0u8; 32];
    bytes[31] = 0x01;
    PolicyId::new(bytes)
}

#[test]
fn ping_pong_over_one_published_bundle() {
    // Holder initiates from the guardian's published bundle; the
    // guardian responds knowing only the holder's identity public key.
    let holder_identity = IdentityKeyPair::generate();
    let guardian_bundle = PreKeyBundle::generate(1_700_000_000_000);
    let published = codec::export_bundle(&guardian_bundle);

    let holder_secret = derive_as_initiator(
        &holder_identity,
        &codec::import_bundle(&published).unwrap(),
        &policy_id(),
    );
    let guardian_secret =
        derive_as_responder(&guardian_bundle, &holder_identity.public(), &policy_id());
    assert_eq!(holder_secret.as_bytes(), guardian_secret.as_bytes());

    let mut holder = SessionState::init(&holder_secret, Role::Initiator);
    let mut guardian = SessionState::init(&guardian_secret, Role::Responder);

    let ping = holder.encrypt(b"ping", [0x01; NONCE_SIZE]).unwrap();
    assert_eq!(ping.counter, 0);
    let ping_wire = codec::export_envelope(&ping);
    let received = codec::import_envelope(&ping_wire).unwrap();
    assert_eq!(guardian.decrypt(&received).unwrap(), b"ping");

    let pong = guardian.encrypt(b"pong", [0x02; NONCE_SIZE]).unwrap();
    assert_eq!(pong.counter, 0);
    assert_eq!(holder.decrypt(&pong).unwrap(), b"pong");

    // Chains stay in lockstep after the exchange: further traffic in
    // both directions still decrypts.
    let again = holder.encrypt(b"still there?", [0x03; NONCE_SIZE]).unwrap();
    assert_eq!(guardian.decrypt(&again).unwrap(), b"still there?");
    let reply = guardian.encrypt(b"yes", [0x04; NONCE_SIZE]).unwrap();
    assert_eq!(holder.decrypt(&reply).unwrap(), b"yes");
}

#[test]
fn five_guardian_policy_root_and_membership_proof() {
    let holder_identity = IdentityKeyPair::generate();

    // Five guardians, each with its own channel secret under the policy.
    let mut entries = Vec::new();
    for i in 0..5u8 {
        let address = Address::new([i + 1; 20]);
        let bundle = PreKeyBundle::generate(0);
        let secret = derive_as_initiator(&holder_identity, &bundle.to_public(), &policy_id());
        entries.push((address, commit_guardian(&address, &secret)));
    }
    sort_by_address(&mut entries);
    let commitments: Vec<_> = entries.iter().map(|(_, c)| *c).collect();
    let root = build_policy_root(&commitments);

    // Guardian at index 2 proves membership.
    let proof = merkle::build_proof(&commitments, 2).unwrap();
    assert!(merkle::verify(&commitments[2], &proof, &root));

    // The same proof is useless against a root over a reordered list.
    let mut reordered = commitments.clone();
    reordered.swap(0, 4);
    let wrong_root = build_policy_root(&reordered);
    assert!(!merkle::verify(&commitments[2], &proof, &wrong_root));
}

#[test]
fn nullifiers_are_scoped_to_one_recovery_request() {
    let holder_identity = IdentityKeyPair::generate();
    let bundle = PreKeyBundle::generate(0);
    let secret = derive_as_initiator(&holder_identity, &bundle.to_public(), &policy_id());

    let first = compute_recovery_request_id(&policy_id(), "nonce-1", "0x04aa");
    let second = compute_recovery_request_id(&policy_id(), "nonce-2", "0x04aa");

    // Double-voting the same request is detectable, approvals of
    // distinct requests are unlinkable.
    assert_eq!(compute_nullifier(&secret, &first), compute_nullifier(&secret, &first));
    assert_ne!(compute_nullifier(&secret, &first), compute_nullifier(&secret, &second));
}

#[test]
fn disclosing_age_reveals_nothing_about_name() {
    let mut rng = StdRng::seed_from_u64(7);
    let credential = IssuedCredential::issue(
        "did:example:alice",
        [
            ("name".to_string(), json!("Alice")),
            ("age".to_string(), json!(30)),
        ],
        &mut rng,
    );
    let published_root = *credential.merkle_root();

    let disclosed = credential.disclose(&["age"]).unwrap();
    assert_eq!(disclosed.len(), 1);
    assert_eq!(disclosed[0].value, json!(30));

    // Verifier holds only the published root.
    assert!(verify_disclosure(&disclosed[0], &published_root));

    // The disclosed payload carries neither the name value nor its salt.
    let payload = serde_json::to_string(&disclosed).unwrap();
    assert!(!payload.contains("Alice"));
    assert!(!payload.contains(credential.salts().get("name").unwrap().as_str()));
}

#[test]
fn secrets_and_commitments_differ_per_policy() {
    let holder_identity = IdentityKeyPair::generate();
    let bundle = PreKeyBundle::generate(0);
    let address = Address::new([0x55; 20]);

    let under_a =
        derive_as_initiator(&holder_identity, &bundle.to_public(), &PolicyId::new([0xaa; 32]));
    let under_b =
        derive_as_initiator(&holder_identity, &bundle.to_public(), &PolicyId::new([0xbb; 32]));

    assert_ne!(under_a.as_bytes(), under_b.as_bytes());
    assert_ne!(commit_guardian(&address, &under_a), commit_guardian(&address, &under_b));
}
