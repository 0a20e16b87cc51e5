//! Positive and universal accumulators over byte buffers.
//!
//! A positive accumulator is passed around as its accumulated value. A universal accumulator is passed as
//! the encoding of [`UniversalAccumulator`] which also carries `f_V` and the maximum size, so it is meant for
//! the accumulator manager only. Verifiers and witness holders work with the accumulated value which
//! [`universal_accumulator_get_accumulated`] returns.
//!
//! Adding and removing consults the manager's [`State`] so that adding a present element fails with
//! [`ApiError::DuplicateElement`] and removing an absent one with [`ApiError::NotAMember`].

use ark_std::{rand::RngCore, vec, vec::Vec};
use blake2::Blake2b512;
use vb_accumulator::prelude::{
    Accumulator, InitialElementsStore, Keypair, MembershipProof, MembershipProofProtocol,
    MembershipProvingKey, MembershipWitness, NonMembershipProof, NonMembershipProofProtocol,
    NonMembershipProvingKey, NonMembershipWitness, Omega, PositiveAccumulator, PublicKey,
    SecretKey, SetupParams, State, UniversalAccumulator,
};

use crate::{
    error::{ApiError, VerifyResponse},
    util::{
        fr_from_bytes, fr_to_bytes, fr_vec_from_bytes, fr_vec_to_bytes, obj_from_bytes,
        obj_from_bytes_of_length, obj_to_bytes,
    },
    Bls12_381, Fr, G1Affine, BLS12381_G2_PUBLIC_KEY_LENGTH, BLS12381_PRIVATE_KEY_LENGTH,
};

/// Size of the accumulated value, a G1 element
pub const ACCUMULATED_LENGTH: usize = 48;
pub const MEMBERSHIP_WITNESS_LENGTH: usize = 48;
/// Size of a non-membership witness, a G1 element and a field element
pub const NON_MEMBERSHIP_WITNESS_LENGTH: usize = 80;

type Params = SetupParams<Bls12_381>;
type Pk = PublicKey<Bls12_381>;
type MemPrk = MembershipProvingKey<G1Affine>;
type NonMemPrk = NonMembershipProvingKey<G1Affine>;

fn secret_key_from_bytes(bytes: &[u8]) -> Result<SecretKey<Fr>, ApiError> {
    obj_from_bytes_of_length(bytes, BLS12381_PRIVATE_KEY_LENGTH, "secret key")
}

fn public_key_from_bytes(bytes: &[u8]) -> Result<Pk, ApiError> {
    obj_from_bytes_of_length(bytes, BLS12381_G2_PUBLIC_KEY_LENGTH, "public key")
}

fn accumulated_from_bytes(bytes: &[u8]) -> Result<G1Affine, ApiError> {
    obj_from_bytes_of_length(bytes, ACCUMULATED_LENGTH, "accumulated value")
}

fn membership_witness_from_bytes(bytes: &[u8]) -> Result<MembershipWitness<G1Affine>, ApiError> {
    obj_from_bytes_of_length(bytes, MEMBERSHIP_WITNESS_LENGTH, "membership witness")
}

fn non_membership_witness_from_bytes(
    bytes: &[u8],
) -> Result<NonMembershipWitness<G1Affine>, ApiError> {
    obj_from_bytes_of_length(bytes, NON_MEMBERSHIP_WITNESS_LENGTH, "non-membership witness")
}

fn witnesses_to_bytes<W: ark_serialize::CanonicalSerialize>(
    witnesses: &[W],
) -> Result<Vec<Vec<u8>>, ApiError> {
    witnesses.iter().map(obj_to_bytes).collect()
}

/// Setup params `(P, P_tilde)`, from `label` when given and random otherwise
pub fn generate_accumulator_params<R: RngCore>(
    rng: &mut R,
    label: Option<&[u8]>,
) -> Result<Vec<u8>, ApiError> {
    let params = match label {
        Some(label) => Params::new::<Blake2b512>(label),
        None => Params::generate_using_rng(rng),
    };
    obj_to_bytes(&params)
}

pub fn is_accumulator_params_valid(params: &[u8]) -> Result<bool, ApiError> {
    let params: Params = obj_from_bytes(params)?;
    Ok(params.is_valid())
}

pub fn generate_accumulator_secret_key<R: RngCore>(
    rng: &mut R,
    seed: Option<&[u8]>,
) -> Result<Vec<u8>, ApiError> {
    let sk = match seed {
        Some(seed) => SecretKey::<Fr>::generate_using_seed(seed),
        None => SecretKey::<Fr>::generate_using_rng(rng),
    };
    obj_to_bytes(&sk)
}

pub fn generate_accumulator_public_key(
    secret_key: &[u8],
    params: &[u8],
) -> Result<Vec<u8>, ApiError> {
    let sk = secret_key_from_bytes(secret_key)?;
    let params: Params = obj_from_bytes(params)?;
    obj_to_bytes(&Pk::new_from_secret_key(&sk, &params))
}

pub fn is_accumulator_public_key_valid(public_key: &[u8]) -> Result<bool, ApiError> {
    Ok(public_key_from_bytes(public_key)?.is_valid())
}

pub fn generate_accumulator_keypair<R: RngCore>(
    rng: &mut R,
    params: &[u8],
    seed: Option<&[u8]>,
) -> Result<crate::KeypairBytes, ApiError> {
    let params: Params = obj_from_bytes(params)?;
    let keypair = match seed {
        Some(seed) => Keypair::<Bls12_381>::generate_using_seed(seed, &params),
        None => Keypair::<Bls12_381>::generate_using_rng(rng, &params),
    };
    Ok(crate::KeypairBytes {
        secret_key: obj_to_bytes(&keypair.secret_key)?,
        public_key: obj_to_bytes(&keypair.public_key)?,
    })
}

pub fn generate_membership_proving_key<R: RngCore>(
    rng: &mut R,
    label: Option<&[u8]>,
) -> Result<Vec<u8>, ApiError> {
    let prk = match label {
        Some(label) => MemPrk::new::<Blake2b512>(label),
        None => MemPrk::generate_using_rng(rng),
    };
    obj_to_bytes(&prk)
}

pub fn generate_non_membership_proving_key<R: RngCore>(
    rng: &mut R,
    label: Option<&[u8]>,
) -> Result<Vec<u8>, ApiError> {
    let prk = match label {
        Some(label) => NonMemPrk::new::<Blake2b512>(label),
        None => NonMemPrk::generate_using_rng(rng),
    };
    obj_to_bytes(&prk)
}

/// Membership proving key contained in the non-membership proving key so that membership and
/// non-membership proofs can share a key
pub fn derive_membership_proving_key_from_non_membership_key(
    non_membership_proving_key: &[u8],
) -> Result<Vec<u8>, ApiError> {
    let prk: NonMemPrk = obj_from_bytes(non_membership_proving_key)?;
    obj_to_bytes(&prk.derive_membership_proving_key())
}

pub fn positive_accumulator_initialize(params: &[u8]) -> Result<Vec<u8>, ApiError> {
    let params: Params = obj_from_bytes(params)?;
    obj_to_bytes(PositiveAccumulator::initialize(&params).value())
}

fn positive_accumulator_from_bytes(bytes: &[u8]) -> Result<PositiveAccumulator<Bls12_381>, ApiError> {
    Ok(PositiveAccumulator::from_accumulated(accumulated_from_bytes(bytes)?))
}

pub fn positive_accumulator_add(
    accumulator: &[u8],
    element: &[u8],
    secret_key: &[u8],
    state: &mut dyn State<Fr>,
) -> Result<Vec<u8>, ApiError> {
    let accumulator = positive_accumulator_from_bytes(accumulator)?;
    let element = fr_from_bytes(element)?;
    let sk = secret_key_from_bytes(secret_key)?;
    obj_to_bytes(accumulator.add(element, &sk, state)?.value())
}

pub fn positive_accumulator_remove(
    accumulator: &[u8],
    element: &[u8],
    secret_key: &[u8],
    state: &mut dyn State<Fr>,
) -> Result<Vec<u8>, ApiError> {
    let accumulator = positive_accumulator_from_bytes(accumulator)?;
    let element = fr_from_bytes(element)?;
    let sk = secret_key_from_bytes(secret_key)?;
    obj_to_bytes(accumulator.remove(&element, &sk, state)?.value())
}

pub fn positive_accumulator_add_batch(
    accumulator: &[u8],
    elements: &[Vec<u8>],
    secret_key: &[u8],
    state: &mut dyn State<Fr>,
) -> Result<Vec<u8>, ApiError> {
    let accumulator = positive_accumulator_from_bytes(accumulator)?;
    let elements = fr_vec_from_bytes(elements)?;
    let sk = secret_key_from_bytes(secret_key)?;
    obj_to_bytes(accumulator.add_batch(elements, &sk, state)?.value())
}

pub fn positive_accumulator_remove_batch(
    accumulator: &[u8],
    elements: &[Vec<u8>],
    secret_key: &[u8],
    state: &mut dyn State<Fr>,
) -> Result<Vec<u8>, ApiError> {
    let accumulator = positive_accumulator_from_bytes(accumulator)?;
    let elements = fr_vec_from_bytes(elements)?;
    let sk = secret_key_from_bytes(secret_key)?;
    obj_to_bytes(accumulator.remove_batch(&elements, &sk, state)?.value())
}

/// Add and remove in a single update
pub fn positive_accumulator_batch_updates(
    accumulator: &[u8],
    additions: &[Vec<u8>],
    removals: &[Vec<u8>],
    secret_key: &[u8],
    state: &mut dyn State<Fr>,
) -> Result<Vec<u8>, ApiError> {
    let accumulator = positive_accumulator_from_bytes(accumulator)?;
    let additions = fr_vec_from_bytes(additions)?;
    let removals = fr_vec_from_bytes(removals)?;
    let sk = secret_key_from_bytes(secret_key)?;
    obj_to_bytes(
        accumulator
            .batch_updates(additions, &removals, &sk, state)?
            .value(),
    )
}

/// Create a universal accumulator holding at most `max_size` elements. The initial elements are written to
/// `initial_elements_store` and can never be added or removed.
pub fn universal_accumulator_initialize<R: RngCore>(
    rng: &mut R,
    params: &[u8],
    secret_key: &[u8],
    max_size: u64,
    initial_elements_store: &mut dyn InitialElementsStore<Fr>,
) -> Result<Vec<u8>, ApiError> {
    let params: Params = obj_from_bytes(params)?;
    let sk = secret_key_from_bytes(secret_key)?;
    let accumulator = UniversalAccumulator::<Bls12_381>::initialize(
        rng,
        &params,
        max_size,
        &sk,
        initial_elements_store,
    )?;
    obj_to_bytes(&accumulator)
}

/// `f_V` for a chunk of the initial elements
pub fn universal_accumulator_compute_initial_fv(
    initial_elements: &[Vec<u8>],
    secret_key: &[u8],
) -> Result<Vec<u8>, ApiError> {
    let elements = fr_vec_from_bytes(initial_elements)?;
    let sk = secret_key_from_bytes(secret_key)?;
    fr_to_bytes(&UniversalAccumulator::<Bls12_381>::compute_initial_f_V(
        &elements, &sk,
    ))
}

pub fn universal_accumulator_combine_multiple_initial_fv(
    initial_fvs: &[Vec<u8>],
) -> Result<Vec<u8>, ApiError> {
    let f_vs = fr_vec_from_bytes(initial_fvs)?;
    fr_to_bytes(&UniversalAccumulator::<Bls12_381>::combine_multiple_initial_f_V(f_vs))
}

pub fn universal_accumulator_initialize_given_fv(
    f_v: &[u8],
    params: &[u8],
    max_size: u64,
) -> Result<Vec<u8>, ApiError> {
    let f_v = fr_from_bytes(f_v)?;
    let params: Params = obj_from_bytes(params)?;
    obj_to_bytes(&UniversalAccumulator::<Bls12_381>::initialize_given_f_V(
        f_v, &params, max_size,
    ))
}

pub fn universal_accumulator_get_accumulated(accumulator: &[u8]) -> Result<Vec<u8>, ApiError> {
    let accumulator: UniversalAccumulator<Bls12_381> = obj_from_bytes(accumulator)?;
    obj_to_bytes(accumulator.value())
}

pub fn universal_accumulator_add(
    accumulator: &[u8],
    element: &[u8],
    secret_key: &[u8],
    initial_elements_store: &dyn InitialElementsStore<Fr>,
    state: &mut dyn State<Fr>,
) -> Result<Vec<u8>, ApiError> {
    let accumulator: UniversalAccumulator<Bls12_381> = obj_from_bytes(accumulator)?;
    let element = fr_from_bytes(element)?;
    let sk = secret_key_from_bytes(secret_key)?;
    obj_to_bytes(&accumulator.add(element, &sk, initial_elements_store, state)?)
}

pub fn universal_accumulator_remove(
    accumulator: &[u8],
    element: &[u8],
    secret_key: &[u8],
    initial_elements_store: &dyn InitialElementsStore<Fr>,
    state: &mut dyn State<Fr>,
) -> Result<Vec<u8>, ApiError> {
    let accumulator: UniversalAccumulator<Bls12_381> = obj_from_bytes(accumulator)?;
    let element = fr_from_bytes(element)?;
    let sk = secret_key_from_bytes(secret_key)?;
    obj_to_bytes(&accumulator.remove(&element, &sk, initial_elements_store, state)?)
}

pub fn universal_accumulator_add_batch(
    accumulator: &[u8],
    elements: &[Vec<u8>],
    secret_key: &[u8],
    initial_elements_store: &dyn InitialElementsStore<Fr>,
    state: &mut dyn State<Fr>,
) -> Result<Vec<u8>, ApiError> {
    let accumulator: UniversalAccumulator<Bls12_381> = obj_from_bytes(accumulator)?;
    let elements = fr_vec_from_bytes(elements)?;
    let sk = secret_key_from_bytes(secret_key)?;
    obj_to_bytes(&accumulator.add_batch(elements, &sk, initial_elements_store, state)?)
}

pub fn universal_accumulator_remove_batch(
    accumulator: &[u8],
    elements: &[Vec<u8>],
    secret_key: &[u8],
    initial_elements_store: &dyn InitialElementsStore<Fr>,
    state: &mut dyn State<Fr>,
) -> Result<Vec<u8>, ApiError> {
    let accumulator: UniversalAccumulator<Bls12_381> = obj_from_bytes(accumulator)?;
    let elements = fr_vec_from_bytes(elements)?;
    let sk = secret_key_from_bytes(secret_key)?;
    obj_to_bytes(&accumulator.remove_batch(&elements, &sk, initial_elements_store, state)?)
}

pub fn universal_accumulator_batch_updates(
    accumulator: &[u8],
    additions: &[Vec<u8>],
    removals: &[Vec<u8>],
    secret_key: &[u8],
    initial_elements_store: &dyn InitialElementsStore<Fr>,
    state: &mut dyn State<Fr>,
) -> Result<Vec<u8>, ApiError> {
    let accumulator: UniversalAccumulator<Bls12_381> = obj_from_bytes(accumulator)?;
    let additions = fr_vec_from_bytes(additions)?;
    let removals = fr_vec_from_bytes(removals)?;
    let sk = secret_key_from_bytes(secret_key)?;
    obj_to_bytes(&accumulator.batch_updates(
        additions,
        &removals,
        &sk,
        initial_elements_store,
        state,
    )?)
}

/// `d` for a non-member given a chunk of the current members. Outputs over all chunks are combined
/// with [`universal_accumulator_combine_multiple_d`].
pub fn universal_accumulator_compute_d(
    non_member: &[u8],
    members: &[Vec<u8>],
) -> Result<Vec<u8>, ApiError> {
    let non_member = fr_from_bytes(non_member)?;
    let members = fr_vec_from_bytes(members)?;
    fr_to_bytes(&UniversalAccumulator::<Bls12_381>::compute_d_given_members(
        &non_member,
        &members,
    ))
}

pub fn universal_accumulator_combine_multiple_d(ds: &[Vec<u8>]) -> Result<Vec<u8>, ApiError> {
    let ds = fr_vec_from_bytes(ds)?;
    fr_to_bytes(&UniversalAccumulator::<Bls12_381>::combine_multiple_d(ds))
}

/// One `d` per non-member given a chunk of the current members
pub fn universal_accumulator_compute_d_for_batch(
    non_members: &[Vec<u8>],
    members: &[Vec<u8>],
) -> Result<Vec<Vec<u8>>, ApiError> {
    let non_members = fr_vec_from_bytes(non_members)?;
    let members = fr_vec_from_bytes(members)?;
    fr_vec_to_bytes(
        &UniversalAccumulator::<Bls12_381>::compute_d_for_batch_given_members(
            &non_members,
            &members,
        ),
    )
}

/// Combine the outputs of [`universal_accumulator_compute_d_for_batch`] over all chunks of members.
/// Each output must be for the same non-members.
pub fn universal_accumulator_combine_multiple_d_for_batch(
    ds: &[Vec<Vec<u8>>],
) -> Result<Vec<Vec<u8>>, ApiError> {
    let ds = ds
        .iter()
        .map(|d| fr_vec_from_bytes(d))
        .collect::<Result<Vec<_>, _>>()?;
    fr_vec_to_bytes(&UniversalAccumulator::<Bls12_381>::combine_multiple_d_for_batch(ds)?)
}

pub fn universal_accumulator_non_membership_witness(
    accumulator: &[u8],
    d: &[u8],
    non_member: &[u8],
    secret_key: &[u8],
    params: &[u8],
) -> Result<Vec<u8>, ApiError> {
    let accumulator: UniversalAccumulator<Bls12_381> = obj_from_bytes(accumulator)?;
    let d = fr_from_bytes(d)?;
    let non_member = fr_from_bytes(non_member)?;
    let sk = secret_key_from_bytes(secret_key)?;
    let params: Params = obj_from_bytes(params)?;
    obj_to_bytes(&accumulator.compute_non_membership_witness_given_d(d, &non_member, &sk, &params)?)
}

pub fn universal_accumulator_non_membership_witnesses_for_batch(
    accumulator: &[u8],
    ds: &[Vec<u8>],
    non_members: &[Vec<u8>],
    secret_key: &[u8],
    params: &[u8],
) -> Result<Vec<Vec<u8>>, ApiError> {
    let accumulator: UniversalAccumulator<Bls12_381> = obj_from_bytes(accumulator)?;
    let ds = fr_vec_from_bytes(ds)?;
    let non_members = fr_vec_from_bytes(non_members)?;
    let sk = secret_key_from_bytes(secret_key)?;
    let params: Params = obj_from_bytes(params)?;
    witnesses_to_bytes(&accumulator.compute_non_membership_witnesses_for_batch_given_d(
        ds,
        &non_members,
        &sk,
        &params,
    )?)
}

/// Membership witness for an element of either kind of accumulator, given its accumulated value. Fails
/// with [`ApiError::NotAMember`] when the element is absent from `state`.
pub fn membership_witness(
    accumulated: &[u8],
    element: &[u8],
    secret_key: &[u8],
    state: &dyn State<Fr>,
) -> Result<Vec<u8>, ApiError> {
    let accumulator = positive_accumulator_from_bytes(accumulated)?;
    let element = fr_from_bytes(element)?;
    let sk = secret_key_from_bytes(secret_key)?;
    obj_to_bytes(&accumulator.get_membership_witness(&element, &sk, state)?)
}

pub fn membership_witnesses_for_batch(
    accumulated: &[u8],
    elements: &[Vec<u8>],
    secret_key: &[u8],
    state: &dyn State<Fr>,
) -> Result<Vec<Vec<u8>>, ApiError> {
    let accumulator = positive_accumulator_from_bytes(accumulated)?;
    let elements = fr_vec_from_bytes(elements)?;
    let sk = secret_key_from_bytes(secret_key)?;
    witnesses_to_bytes(&accumulator.get_membership_witnesses_for_batch(&elements, &sk, state)?)
}

pub fn verify_membership(
    accumulated: &[u8],
    element: &[u8],
    witness: &[u8],
    public_key: &[u8],
    params: &[u8],
) -> VerifyResponse {
    let accumulator = try_or_fail!(positive_accumulator_from_bytes(accumulated));
    let element = try_or_fail!(fr_from_bytes(element));
    let witness = try_or_fail!(membership_witness_from_bytes(witness));
    let pk = try_or_fail!(public_key_from_bytes(public_key));
    let params: Params = try_or_fail!(obj_from_bytes(params));
    accumulator
        .verify_membership(&element, &witness, &pk, &params)
        .into()
}

pub fn verify_non_membership(
    accumulated: &[u8],
    non_member: &[u8],
    witness: &[u8],
    public_key: &[u8],
    params: &[u8],
) -> VerifyResponse {
    let accumulated = try_or_fail!(accumulated_from_bytes(accumulated));
    let non_member = try_or_fail!(fr_from_bytes(non_member));
    let witness = try_or_fail!(non_membership_witness_from_bytes(witness));
    let pk = try_or_fail!(public_key_from_bytes(public_key));
    let params: Params = try_or_fail!(obj_from_bytes(params));
    UniversalAccumulator::<Bls12_381>::verify_non_membership_given_accumulated(
        &accumulated,
        &non_member,
        &witness,
        &pk,
        &params,
    )
    .into()
}

/// Public info `Omega` published by the manager after a batch of additions and removals on the
/// accumulator `old_accumulated`. Lets holders update their witnesses without the secret key.
pub fn public_info_for_witness_update(
    old_accumulated: &[u8],
    additions: &[Vec<u8>],
    removals: &[Vec<u8>],
    secret_key: &[u8],
) -> Result<Vec<u8>, ApiError> {
    let old_accumulated = accumulated_from_bytes(old_accumulated)?;
    let additions = fr_vec_from_bytes(additions)?;
    let removals = fr_vec_from_bytes(removals)?;
    let sk = secret_key_from_bytes(secret_key)?;
    obj_to_bytes(&Omega::new(&additions, &removals, &old_accumulated, &sk)?)
}

/// Additions, removals and `Omega` of one batch update, all encoded
pub type BatchUpdateInfo = (Vec<Vec<u8>>, Vec<Vec<u8>>, Vec<u8>);

fn decode_batch_updates(
    updates: &[BatchUpdateInfo],
) -> Result<Vec<(Vec<Fr>, Vec<Fr>, Omega<G1Affine>)>, ApiError> {
    updates
        .iter()
        .map(|(a, r, o)| Ok((fr_vec_from_bytes(a)?, fr_vec_from_bytes(r)?, obj_from_bytes(o)?)))
        .collect()
}

macro_rules! impl_witness_update_api {
    (
        $wit: ident, $decode_wit: ident, $post_add: ident, $post_remove: ident, $public_info: ident,
        $multiple_public_info: ident, $secret_key_batch: ident
    ) => {
        /// Update the witness of `element` after `addition` was added. Needs the accumulated value before
        /// the addition.
        pub fn $post_add(
            witness: &[u8],
            element: &[u8],
            addition: &[u8],
            old_accumulated: &[u8],
        ) -> Result<Vec<u8>, ApiError> {
            let witness = $decode_wit(witness)?;
            let element = fr_from_bytes(element)?;
            let addition = fr_from_bytes(addition)?;
            let old_accumulated = accumulated_from_bytes(old_accumulated)?;
            obj_to_bytes(&witness.update_after_addition(&element, &addition, &old_accumulated))
        }

        /// Update the witness of `element` after `removal` was removed. Needs the accumulated value after
        /// the removal.
        pub fn $post_remove(
            witness: &[u8],
            element: &[u8],
            removal: &[u8],
            new_accumulated: &[u8],
        ) -> Result<Vec<u8>, ApiError> {
            let witness = $decode_wit(witness)?;
            let element = fr_from_bytes(element)?;
            let removal = fr_from_bytes(removal)?;
            let new_accumulated = accumulated_from_bytes(new_accumulated)?;
            obj_to_bytes(&witness.update_after_removal(&element, &removal, &new_accumulated)?)
        }

        pub fn $public_info(
            witness: &[u8],
            element: &[u8],
            additions: &[Vec<u8>],
            removals: &[Vec<u8>],
            public_info: &[u8],
        ) -> Result<Vec<u8>, ApiError> {
            let witness = $decode_wit(witness)?;
            let element = fr_from_bytes(element)?;
            let additions = fr_vec_from_bytes(additions)?;
            let removals = fr_vec_from_bytes(removals)?;
            let omega: Omega<G1Affine> = obj_from_bytes(public_info)?;
            obj_to_bytes(&witness.update_using_public_info_after_batch_updates(
                &additions, &removals, &omega, &element,
            )?)
        }

        /// Update the witness over several consecutive batch updates, given in the order they were applied
        pub fn $multiple_public_info(
            witness: &[u8],
            element: &[u8],
            updates: &[BatchUpdateInfo],
        ) -> Result<Vec<u8>, ApiError> {
            let witness = $decode_wit(witness)?;
            let element = fr_from_bytes(element)?;
            let updates = decode_batch_updates(updates)?;
            let updates = updates
                .iter()
                .map(|(a, r, o)| (a.as_slice(), r.as_slice(), o))
                .collect::<Vec<_>>();
            obj_to_bytes(
                &witness.update_using_public_info_after_multiple_batch_updates(updates, &element)?,
            )
        }

        /// Manager-side update of the witnesses of `elements` after a batch of additions and removals.
        /// Needs the accumulated value before the update.
        pub fn $secret_key_batch(
            witnesses: &[Vec<u8>],
            elements: &[Vec<u8>],
            additions: &[Vec<u8>],
            removals: &[Vec<u8>],
            old_accumulated: &[u8],
            secret_key: &[u8],
        ) -> Result<Vec<Vec<u8>>, ApiError> {
            let witnesses = witnesses
                .iter()
                .map(|w| $decode_wit(w))
                .collect::<Result<Vec<_>, _>>()?;
            let elements = fr_vec_from_bytes(elements)?;
            let additions = fr_vec_from_bytes(additions)?;
            let removals = fr_vec_from_bytes(removals)?;
            let old_accumulated = accumulated_from_bytes(old_accumulated)?;
            let sk = secret_key_from_bytes(secret_key)?;
            witnesses_to_bytes(&$wit::update_using_secret_key_after_batch_updates(
                &additions,
                &removals,
                &elements,
                &witnesses,
                &old_accumulated,
                &sk,
            )?)
        }
    };
}

impl_witness_update_api!(
    MembershipWitness,
    membership_witness_from_bytes,
    update_membership_witness_post_add,
    update_membership_witness_post_remove,
    update_membership_witness_using_public_info_after_batch_update,
    update_membership_witness_using_public_info_after_multiple_batch_updates,
    update_membership_witnesses_using_secret_key_after_batch_updates
);

impl_witness_update_api!(
    NonMembershipWitness,
    non_membership_witness_from_bytes,
    update_non_membership_witness_post_add,
    update_non_membership_witness_post_remove,
    update_non_membership_witness_using_public_info_after_batch_update,
    update_non_membership_witness_using_public_info_after_multiple_batch_updates,
    update_non_membership_witnesses_using_secret_key_after_batch_updates
);

macro_rules! impl_proof_api {
    (
        $protocol: ident, $proof: ident, $prk: ident, $decode_wit: ident,
        $init: ident, $contribution_from_protocol: ident, $gen_proof: ident,
        $contribution_from_proof: ident, $verify: ident
    ) => {
        /// Start a proof of knowledge of the element and its witness. `blinding` is used as the randomness
        /// for the element when given, so the element can be proven equal to a value in another proof.
        pub fn $init<R: RngCore>(
            rng: &mut R,
            element: &[u8],
            blinding: Option<&[u8]>,
            witness: &[u8],
            public_key: &[u8],
            params: &[u8],
            proving_key: &[u8],
        ) -> Result<Vec<u8>, ApiError> {
            let element = fr_from_bytes(element)?;
            let blinding = blinding.map(fr_from_bytes).transpose()?;
            let witness = $decode_wit(witness)?;
            let pk = public_key_from_bytes(public_key)?;
            let params: Params = obj_from_bytes(params)?;
            let prk: $prk = obj_from_bytes(proving_key)?;
            let protocol = init_protocol!($protocol, rng, &element, blinding, &witness, &pk, &params, &prk);
            obj_to_bytes(&protocol)
        }

        pub fn $contribution_from_protocol(
            protocol: &[u8],
            accumulated: &[u8],
            public_key: &[u8],
            params: &[u8],
            proving_key: &[u8],
        ) -> Result<Vec<u8>, ApiError> {
            let protocol: $protocol<Bls12_381> = obj_from_bytes(protocol)?;
            let accumulated = accumulated_from_bytes(accumulated)?;
            let pk = public_key_from_bytes(public_key)?;
            let params: Params = obj_from_bytes(params)?;
            let prk: $prk = obj_from_bytes(proving_key)?;
            let mut bytes = vec![];
            protocol.challenge_contribution(&accumulated, &pk, &params, &prk, &mut bytes)?;
            Ok(bytes)
        }

        pub fn $gen_proof(protocol: &[u8], challenge: &[u8]) -> Result<Vec<u8>, ApiError> {
            let protocol: $protocol<Bls12_381> = obj_from_bytes(protocol)?;
            let challenge = fr_from_bytes(challenge)?;
            obj_to_bytes(&protocol.gen_proof(&challenge))
        }

        pub fn $contribution_from_proof(
            proof: &[u8],
            accumulated: &[u8],
            public_key: &[u8],
            params: &[u8],
            proving_key: &[u8],
        ) -> Result<Vec<u8>, ApiError> {
            let proof: $proof<Bls12_381> = obj_from_bytes(proof)?;
            let accumulated = accumulated_from_bytes(accumulated)?;
            let pk = public_key_from_bytes(public_key)?;
            let params: Params = obj_from_bytes(params)?;
            let prk: $prk = obj_from_bytes(proving_key)?;
            let mut bytes = vec![];
            proof.challenge_contribution(&accumulated, &pk, &params, &prk, &mut bytes)?;
            Ok(bytes)
        }

        pub fn $verify(
            proof: &[u8],
            accumulated: &[u8],
            challenge: &[u8],
            public_key: &[u8],
            params: &[u8],
            proving_key: &[u8],
        ) -> VerifyResponse {
            let proof: $proof<Bls12_381> = try_or_fail!(obj_from_bytes(proof));
            let accumulated = try_or_fail!(accumulated_from_bytes(accumulated));
            let challenge = try_or_fail!(fr_from_bytes(challenge));
            let pk = try_or_fail!(public_key_from_bytes(public_key));
            let params: Params = try_or_fail!(obj_from_bytes(params));
            let prk: $prk = try_or_fail!(obj_from_bytes(proving_key));
            proof
                .verify(&accumulated, &challenge, &pk, &params, &prk)
                .into()
        }
    };
}

// Initializing the membership protocol can't fail while the non-membership one can
macro_rules! init_protocol {
    (MembershipProofProtocol, $($arg: expr),+) => {
        MembershipProofProtocol::init($($arg),+)
    };
    (NonMembershipProofProtocol, $($arg: expr),+) => {
        NonMembershipProofProtocol::init($($arg),+)?
    };
}

impl_proof_api!(
    MembershipProofProtocol,
    MembershipProof,
    MemPrk,
    membership_witness_from_bytes,
    initialize_membership_proof,
    membership_proof_challenge_contribution_from_protocol,
    gen_membership_proof,
    membership_proof_challenge_contribution_from_proof,
    verify_membership_proof
);

impl_proof_api!(
    NonMembershipProofProtocol,
    NonMembershipProof,
    NonMemPrk,
    non_membership_witness_from_bytes,
    initialize_non_membership_proof,
    non_membership_proof_challenge_contribution_from_protocol,
    gen_non_membership_proof,
    non_membership_proof_challenge_contribution_from_proof,
    verify_non_membership_proof
);
