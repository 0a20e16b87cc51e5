#![allow(non_snake_case)]

//! Keys, setup parameters and proving keys of the accumulators. Described in section 2 of the paper
//! # Examples
//!
//! Creating setup parameters and keypair:
//!
//! ```
//! use ark_bls12_381::Bls12_381;
//! use blake2::Blake2b512;
//! use vb_accumulator::setup::{Keypair, SetupParams};
//! use ark_std::rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(0u64);
//! let params = SetupParams::<Bls12_381>::generate_using_rng(&mut rng);
//! let params_1 = SetupParams::<Bls12_381>::new::<Blake2b512>(&[1, 2, 3, 4]);
//!
//! let keypair = Keypair::<Bls12_381>::generate_using_rng(&mut rng, &params);
//! let keypair_1 = Keypair::<Bls12_381>::generate_using_seed(&[0; 32], &params);
//! ```

use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup};
use ark_ff::PrimeField;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{rand::RngCore, UniformRand};
use credential_utils::{
    concat_slices,
    hashing_utils::{field_elem_from_seed, projective_group_elem_from_try_and_incr},
    serde_utils::ArkObjectBytes,
};
use digest::Digest;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Salt used when deriving the accumulator manager's secret key from a seed
pub const SECRET_KEY_SALT: &[u8] = b"VB-ACC-KEYGEN-SALT";

/// Secret key for accumulator manager
#[serde_as]
#[derive(
    Clone,
    PartialEq,
    Eq,
    Debug,
    CanonicalSerialize,
    CanonicalDeserialize,
    Serialize,
    Deserialize,
    Zeroize,
    ZeroizeOnDrop,
)]
pub struct SecretKey<F: PrimeField>(#[serde_as(as = "ArkObjectBytes")] pub F);

/// Public key for accumulator manager, `Q_tilde` in the paper
#[serde_as]
#[derive(
    Clone, PartialEq, Eq, Debug, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct PublicKey<E: Pairing>(#[serde_as(as = "ArkObjectBytes")] pub E::G2Affine);

#[serde_as]
#[derive(
    Clone,
    PartialEq,
    Eq,
    Debug,
    CanonicalSerialize,
    CanonicalDeserialize,
    Serialize,
    Deserialize,
    Zeroize,
    ZeroizeOnDrop,
)]
#[serde(bound = "")]
pub struct Keypair<E: Pairing> {
    pub secret_key: SecretKey<E::ScalarField>,
    #[zeroize(skip)]
    pub public_key: PublicKey<E>,
}

/// Setup parameters for accumulators
#[serde_as]
#[derive(
    Clone, PartialEq, Eq, Debug, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct SetupParams<E: Pairing> {
    #[serde_as(as = "ArkObjectBytes")]
    pub P: E::G1Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub P_tilde: E::G2Affine,
}

/// Common elements of the membership and non-membership proving key
#[serde_as]
#[derive(
    Clone, PartialEq, Eq, Debug, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct ProvingKey<G: AffineRepr> {
    #[serde_as(as = "ArkObjectBytes")]
    pub X: G,
    #[serde_as(as = "ArkObjectBytes")]
    pub Y: G,
    #[serde_as(as = "ArkObjectBytes")]
    pub Z: G,
}

/// Used between prover and verifier only to prove knowledge of member and corresponding witness
#[derive(
    Clone, PartialEq, Eq, Debug, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
#[serde(bound = "")]
pub struct MembershipProvingKey<G: AffineRepr>(pub ProvingKey<G>);

/// Used between prover and verifier only to prove knowledge of non-member and corresponding witness
#[serde_as]
#[derive(
    Clone, PartialEq, Eq, Debug, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
#[serde(bound = "")]
pub struct NonMembershipProvingKey<G: AffineRepr> {
    pub XYZ: ProvingKey<G>,
    #[serde_as(as = "ArkObjectBytes")]
    pub K: G,
}

impl<F: PrimeField> SecretKey<F> {
    /// Derive the secret key deterministically from `seed`
    pub fn generate_using_seed(seed: &[u8]) -> Self {
        Self(field_elem_from_seed::<F>(seed, SECRET_KEY_SALT))
    }

    pub fn generate_using_rng<R: RngCore>(rng: &mut R) -> Self {
        Self(F::rand(rng))
    }
}

impl<E: Pairing> SetupParams<E> {
    /// Generate params using a random number generator
    pub fn generate_using_rng<R: RngCore>(rng: &mut R) -> Self {
        Self {
            P: E::G1::rand(rng).into_affine(),
            P_tilde: E::G2::rand(rng).into_affine(),
        }
    }

    /// Generate params by hashing a known string. The hash function is vulnerable to timing
    /// attack but since all this is public knowledge, it is fine.
    /// This is useful if people need to be convinced that the discrete log of group elements wrt each other is not known.
    pub fn new<D: Digest>(label: &[u8]) -> Self {
        let P = projective_group_elem_from_try_and_incr::<E::G1Affine, D>(&concat_slices!(
            label, b" : P"
        ))
        .into_affine();
        let P_tilde = projective_group_elem_from_try_and_incr::<E::G2Affine, D>(&concat_slices!(
            label,
            b" : P_tilde"
        ))
        .into_affine();
        Self { P, P_tilde }
    }

    /// Params shouldn't be 0
    pub fn is_valid(&self) -> bool {
        !(self.P.is_zero() || self.P_tilde.is_zero())
    }
}

impl<E: Pairing> PublicKey<E> {
    /// `Q_tilde = sk * P_tilde`
    pub fn new_from_secret_key(
        secret_key: &SecretKey<E::ScalarField>,
        setup_params: &SetupParams<E>,
    ) -> Self {
        Self(
            setup_params
                .P_tilde
                .mul_bigint(secret_key.0.into_bigint())
                .into_affine(),
        )
    }

    /// Public key shouldn't be 0
    pub fn is_valid(&self) -> bool {
        !self.0.is_zero()
    }
}

impl<E: Pairing> Keypair<E> {
    /// Create a secret key from `seed` and the corresponding public key
    pub fn generate_using_seed(seed: &[u8], setup_params: &SetupParams<E>) -> Self {
        Self::new_from_secret_key(SecretKey::generate_using_seed(seed), setup_params)
    }

    /// Create a random secret key and the corresponding public key
    pub fn generate_using_rng<R: RngCore>(rng: &mut R, setup_params: &SetupParams<E>) -> Self {
        Self::new_from_secret_key(SecretKey::generate_using_rng(rng), setup_params)
    }

    pub fn new_from_secret_key(
        secret_key: SecretKey<E::ScalarField>,
        setup_params: &SetupParams<E>,
    ) -> Self {
        let public_key = PublicKey::new_from_secret_key(&secret_key, setup_params);
        Self {
            secret_key,
            public_key,
        }
    }
}

impl<G: AffineRepr> ProvingKey<G> {
    fn generate_using_rng<R: RngCore>(rng: &mut R) -> Self {
        let elems = G::Group::normalize_batch(&[
            G::Group::rand(rng),
            G::Group::rand(rng),
            G::Group::rand(rng),
        ]);
        Self {
            X: elems[0],
            Y: elems[1],
            Z: elems[2],
        }
    }

    fn new<D: Digest>(label: &[u8]) -> Self {
        let elems = G::Group::normalize_batch(&[
            projective_group_elem_from_try_and_incr::<G, D>(&concat_slices!(label, b" : X")),
            projective_group_elem_from_try_and_incr::<G, D>(&concat_slices!(label, b" : Y")),
            projective_group_elem_from_try_and_incr::<G, D>(&concat_slices!(label, b" : Z")),
        ]);
        Self {
            X: elems[0],
            Y: elems[1],
            Z: elems[2],
        }
    }

    fn is_valid(&self) -> bool {
        !(self.X.is_zero() || self.Y.is_zero() || self.Z.is_zero())
            && self.X != self.Y
            && self.Y != self.Z
            && self.X != self.Z
    }
}

impl<G: AffineRepr> MembershipProvingKey<G> {
    /// Generate using a random number generator
    pub fn generate_using_rng<R: RngCore>(rng: &mut R) -> Self {
        Self(ProvingKey::generate_using_rng(rng))
    }

    /// Generate by hashing known strings
    pub fn new<D: Digest>(label: &[u8]) -> Self {
        Self(ProvingKey::new::<D>(label))
    }

    pub fn is_valid(&self) -> bool {
        self.0.is_valid()
    }
}

impl<G: AffineRepr> NonMembershipProvingKey<G> {
    /// Generate using a random number generator
    pub fn generate_using_rng<R: RngCore>(rng: &mut R) -> Self {
        let XYZ = ProvingKey::generate_using_rng(rng);
        Self {
            XYZ,
            K: G::Group::rand(rng).into_affine(),
        }
    }

    /// Generate by hashing known strings. The `X`, `Y` and `Z` are the same as the ones of the
    /// membership proving key created with the same label.
    pub fn new<D: Digest>(label: &[u8]) -> Self {
        let XYZ = ProvingKey::new::<D>(label);
        Self {
            XYZ,
            K: projective_group_elem_from_try_and_incr::<G, D>(&concat_slices!(label, b" : K"))
                .into_affine(),
        }
    }

    /// Derive the membership proving key when doing a membership proof with a universal accumulator.
    pub fn derive_membership_proving_key(&self) -> MembershipProvingKey<G> {
        MembershipProvingKey(self.XYZ.clone())
    }

    pub fn is_valid(&self) -> bool {
        self.XYZ.is_valid()
            && !self.K.is_zero()
            && self.K != self.XYZ.X
            && self.K != self.XYZ.Y
            && self.K != self.XYZ.Z
    }
}
