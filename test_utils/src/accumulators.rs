use ark_bls12_381::Bls12_381;
use ark_std::rand::RngCore;
use vb_accumulator::{
    positive::PositiveAccumulator,
    setup::{Keypair, SetupParams},
    universal::UniversalAccumulator,
};

use crate::Fr;

pub use vb_accumulator::persistence::in_memory::{InMemoryInitialElements, InMemoryState};

pub fn setup_positive_accum<R: RngCore>(
    rng: &mut R,
) -> (
    SetupParams<Bls12_381>,
    Keypair<Bls12_381>,
    PositiveAccumulator<Bls12_381>,
    InMemoryState<Fr>,
) {
    let params = SetupParams::<Bls12_381>::generate_using_rng(rng);
    let keypair = Keypair::<Bls12_381>::generate_using_rng(rng, &params);
    let accumulator = PositiveAccumulator::initialize(&params);
    (params, keypair, accumulator, InMemoryState::new())
}

/// Universal accumulator that can hold `max` members
pub fn setup_universal_accum<R: RngCore>(
    rng: &mut R,
    max: u64,
) -> (
    SetupParams<Bls12_381>,
    Keypair<Bls12_381>,
    UniversalAccumulator<Bls12_381>,
    InMemoryInitialElements<Fr>,
    InMemoryState<Fr>,
) {
    let params = SetupParams::<Bls12_381>::generate_using_rng(rng);
    let keypair = Keypair::<Bls12_381>::generate_using_rng(rng, &params);
    let mut initial_elements = InMemoryInitialElements::new();
    let accumulator = UniversalAccumulator::initialize(
        rng,
        &params,
        max,
        &keypair.secret_key,
        &mut initial_elements,
    )
    .unwrap();
    (
        params,
        keypair,
        accumulator,
        initial_elements,
        InMemoryState::new(),
    )
}
