//! Fixed initial elements of the universal accumulator for the BLS12-381 scalar field.
//!
//! These are generators of the Sylow subgroups of the multiplicative group of the scalar field, one per prime power
//! factor of `p - 1`. They are public and absorbed into every universal accumulator in addition to secret random
//! initial elements, so that the number of secret initial elements always exceeds the number of non-membership
//! witnesses a coalition can collect.

use crate::error::VBAccumulatorError;
use ark_ff::PrimeField;
use ark_std::vec::Vec;

const BLS12_381_FR_INITIAL_ELEMENTS: [&str; 12] = [
    "45910016902681717864896679571072475294322032934598173703909760003353935933116",
    "52435875175126190479447740508185965837461563690374988244538805122978187051009",
    "37533245345601403256813828457599989378570083626066733924633634395813390498968",
    "42939921189405567213077474811229290751859625183971855670316936332150258841064",
    "24518586603007977414467141059720982525773565200609287602828525318350257240104",
    "7068825200903980455640497218918153984634398014009947999387811699166394755973",
    "11099127048999275356047760994759979338510697874908724576763630115325423199983",
    "16206340973491634074300543581824154688167728015112494212742147729096110011734",
    "33548451850986140156856751094473866810332892843047892283310584582447242129372",
    "41579556168512365951196638111110702956139037360820703075545264197188086371151",
    "40391639477853709172194404305481070941088466966694331713706272464526707697647",
    "901256629686847939547008227790605515020395723603584292339910499590411164006",
];

/// Number of fixed initial elements
pub const FIXED_INITIAL_ELEMENTS_COUNT: usize = BLS12_381_FR_INITIAL_ELEMENTS.len();

/// Parse the fixed initial elements in field `F`
pub fn fixed_initial_elements<F: PrimeField>() -> Result<Vec<F>, VBAccumulatorError> {
    BLS12_381_FR_INITIAL_ELEMENTS
        .iter()
        .enumerate()
        .map(|(i, s)| {
            F::from_str(s)
                .ok()
                .ok_or(VBAccumulatorError::InvalidFixedInitialElement(i))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bls12_381::Fr;
    use ark_ff::Zero;

    #[test]
    fn parse_fixed_elements() {
        let elems = fixed_initial_elements::<Fr>().unwrap();
        assert_eq!(elems.len(), FIXED_INITIAL_ELEMENTS_COUNT);
        for (i, e) in elems.iter().enumerate() {
            assert!(!e.is_zero());
            for e2 in elems.iter().skip(i + 1) {
                assert_ne!(e, e2);
            }
        }
    }
}
