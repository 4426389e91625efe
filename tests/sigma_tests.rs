use num_bigint::BigUint;
use sigma_pedersen::{
    DlogGroup, Error, SecureRng, SigmaDhCommonInput, SigmaDhProver, SigmaDhProverInput,
    SigmaDhSimulator, SigmaDhVerifier, ZpGroup,
};

const SOUNDNESS: u32 = 80;

fn group() -> ZpGroup {
    ZpGroup::rfc5114_2048_256()
}

/// Builds (h, u, v) for u = g^w, v = h^w over an independent h.
fn statement(group: &ZpGroup, w: &BigUint) -> SigmaDhCommonInput<ZpGroup> {
    let mut rng = SecureRng::new();
    let h = group.exponentiate(group.generator(), &group.random_exponent(&mut rng));
    let u = group.exponentiate(group.generator(), w);
    let v = group.exponentiate(&h, w);
    SigmaDhCommonInput::new(h, u, v)
}

#[test]
fn honest_prover_convinces_verifier() {
    let group = group();
    let w = BigUint::from(7u8);
    let common = statement(&group, &w);

    let mut prover = SigmaDhProver::new(group.clone(), SOUNDNESS, SecureRng::new()).unwrap();
    let mut verifier = SigmaDhVerifier::new(group, SOUNDNESS, SecureRng::new()).unwrap();

    let first = prover
        .compute_first_message(SigmaDhProverInput::new(common.clone(), w))
        .unwrap();
    let challenge = verifier.sample_challenge();
    assert_eq!(challenge.len(), 10);
    let second = prover.compute_second_message(&challenge).unwrap();

    assert!(verifier.verify(&common, &first, &second).unwrap());
}

#[test]
fn wrong_witness_fails_verification() {
    let group = group();
    let common = statement(&group, &BigUint::from(7u8));

    let mut prover = SigmaDhProver::new(group.clone(), SOUNDNESS, SecureRng::new()).unwrap();
    let mut verifier = SigmaDhVerifier::new(group, SOUNDNESS, SecureRng::new()).unwrap();

    let first = prover
        .compute_first_message(SigmaDhProverInput::new(common.clone(), BigUint::from(8u8)))
        .unwrap();
    let challenge = verifier.sample_challenge();
    let second = prover.compute_second_message(&challenge).unwrap();

    assert!(!verifier.verify(&common, &first, &second).unwrap());
}

#[test]
fn simulated_transcript_passes_the_real_verifier() {
    let group = group();
    let common = statement(&group, &BigUint::from(7u8));

    let mut simulator = SigmaDhSimulator::new(group.clone(), SOUNDNESS, SecureRng::new()).unwrap();
    let challenge = vec![0xab; 10];
    let output = simulator.simulate(&common, challenge.clone()).unwrap();

    let mut verifier = SigmaDhVerifier::new(group, SOUNDNESS, SecureRng::new()).unwrap();
    verifier.set_challenge(&challenge).unwrap();
    assert!(verifier
        .verify(&common, output.first_message(), output.response())
        .unwrap());
}

#[test]
fn challenge_length_is_enforced_everywhere() {
    let group = group();
    let w = BigUint::from(7u8);
    let common = statement(&group, &w);

    let mut prover = SigmaDhProver::new(group.clone(), SOUNDNESS, SecureRng::new()).unwrap();
    prover
        .compute_first_message(SigmaDhProverInput::new(common.clone(), w))
        .unwrap();
    assert!(matches!(
        prover.compute_second_message(&[0u8; 9]),
        Err(Error::CheatAttempt(_))
    ));
    assert!(matches!(
        prover.compute_second_message(&[0u8; 11]),
        Err(Error::CheatAttempt(_))
    ));

    let mut verifier =
        SigmaDhVerifier::new(group.clone(), SOUNDNESS, SecureRng::new()).unwrap();
    assert!(matches!(
        verifier.set_challenge(&[0u8; 9]),
        Err(Error::CheatAttempt(_))
    ));

    let mut simulator = SigmaDhSimulator::new(group, SOUNDNESS, SecureRng::new()).unwrap();
    assert!(matches!(
        simulator.simulate(&common, vec![0u8; 11]),
        Err(Error::CheatAttempt(_))
    ));
}

#[test]
fn soundness_parameter_must_stay_below_group_order() {
    let group = group();
    // q has 256 bits, so 2^255 < q but 2^256 > q.
    assert!(SigmaDhProver::new(group.clone(), 255, SecureRng::new()).is_ok());
    assert!(matches!(
        SigmaDhProver::new(group.clone(), 256, SecureRng::new()),
        Err(Error::BadInput(_))
    ));
    assert!(matches!(
        SigmaDhVerifier::new(group.clone(), 256, SecureRng::new()),
        Err(Error::BadInput(_))
    ));
    assert!(matches!(
        SigmaDhSimulator::new(group, 256, SecureRng::new()),
        Err(Error::BadInput(_))
    ));
}

#[test]
fn fresh_prover_required_per_proof() {
    let group = group();
    let w = BigUint::from(3u8);
    let common = statement(&group, &w);

    let mut prover = SigmaDhProver::new(group, SOUNDNESS, SecureRng::new()).unwrap();
    prover
        .compute_first_message(SigmaDhProverInput::new(common.clone(), w.clone()))
        .unwrap();
    prover.compute_second_message(&[0u8; 10]).unwrap();

    assert!(matches!(
        prover.compute_first_message(SigmaDhProverInput::new(common, w)),
        Err(Error::BadInput(_))
    ));
}
