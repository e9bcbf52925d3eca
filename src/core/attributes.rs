use crate::models::{AttributeWeights, PetProfile};

/// Calculate the attribute compatibility score (0-13 with default weights)
/// for a pair of pet profiles.
///
/// Each rule is applied independently and the points add up:
/// - same species            -> +5
/// - same breed              -> +3
/// - same sex +1, different  -> +2
/// - same colour             -> +1
/// - location substring
///   match in either order   -> +2
///
/// Comparisons are case-insensitive on trimmed values. A field missing on
/// either side simply skips its rule. The score is symmetric in its two
/// arguments.
pub fn attribute_match_score(a: &PetProfile, b: &PetProfile, weights: &AttributeWeights) -> u32 {
    let mut score = 0;

    if let (Some(ours), Some(theirs)) = (normalized(&a.species), normalized(&b.species)) {
        if ours == theirs {
            score += weights.species;
        }
    }

    if let (Some(ours), Some(theirs)) = (normalized(&a.breed), normalized(&b.breed)) {
        if ours == theirs {
            score += weights.breed;
        }
    }

    // Opposite sexes are rewarded over same sex.
    if let (Some(ours), Some(theirs)) = (normalized(&a.sex), normalized(&b.sex)) {
        if ours == theirs {
            score += weights.sex_same;
        } else {
            score += weights.sex_different;
        }
    }

    if let (Some(ours), Some(theirs)) = (normalized(&a.colour), normalized(&b.colour)) {
        if ours == theirs {
            score += weights.colour;
        }
    }

    // "Brooklyn, NY" and "NY" count as the same area.
    if let (Some(ours), Some(theirs)) = (normalized(&a.location), normalized(&b.location)) {
        if ours.contains(&theirs) || theirs.contains(&ours) {
            score += weights.location;
        }
    }

    score
}

/// Whether two profiles declare the same species.
///
/// False when either side is missing or blank.
#[inline]
pub fn same_species(a: &PetProfile, b: &PetProfile) -> bool {
    match (normalized(&a.species), normalized(&b.species)) {
        (Some(ours), Some(theirs)) => ours == theirs,
        _ => false,
    }
}

/// Trimmed, lowercased field value; `None` when absent or blank.
#[inline]
fn normalized(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(
        species: &str,
        breed: &str,
        sex: &str,
        colour: &str,
        location: &str,
    ) -> PetProfile {
        let field = |v: &str| {
            if v.is_empty() {
                None
            } else {
                Some(v.to_string())
            }
        };

        PetProfile {
            species: field(species),
            breed: field(breed),
            sex: field(sex),
            colour: field(colour),
            location: field(location),
            ..PetProfile::default()
        }
    }

    #[test]
    fn test_full_score() {
        // Species +5, breed +3, different sex +2, colour +1, location
        // substring ("ny" in "brooklyn, ny") +2.
        let a = profile("Dog", "Lab", "M", "Black", "Brooklyn, NY");
        let b = profile("dog", "Lab", "F", "Black", "NY");

        let weights = AttributeWeights::default();
        assert_eq!(attribute_match_score(&a, &b, &weights), 13);
    }

    #[test]
    fn test_no_overlap_scores_zero() {
        let a = profile("Cat", "", "", "", "");
        let b = profile("Dog", "Lab", "", "", "");

        let weights = AttributeWeights::default();
        assert_eq!(attribute_match_score(&a, &b, &weights), 0);
    }

    #[test]
    fn test_same_sex_scores_one_point() {
        let a = profile("", "", "M", "", "");
        let b = profile("", "", "m", "", "");

        let weights = AttributeWeights::default();
        assert_eq!(attribute_match_score(&a, &b, &weights), 1);
    }

    #[test]
    fn test_missing_fields_skip_rules() {
        let a = profile("Dog", "", "", "", "");
        let b = profile("Dog", "Lab", "M", "Black", "NY");

        let weights = AttributeWeights::default();
        assert_eq!(attribute_match_score(&a, &b, &weights), 5);
    }

    #[test]
    fn test_blank_field_treated_as_missing() {
        let a = profile("  ", "", "", "", "");
        let b = profile("   ", "", "", "", "");

        let weights = AttributeWeights::default();
        assert_eq!(attribute_match_score(&a, &b, &weights), 0);
        assert!(!same_species(&a, &b));
    }

    #[test]
    fn test_score_is_symmetric() {
        let weights = AttributeWeights::default();
        let cases = [
            (
                profile("Dog", "Lab", "M", "Black", "Brooklyn, NY"),
                profile("dog", "lab", "F", "black", "NY"),
            ),
            (
                profile("Cat", "", "F", "White", "Berlin"),
                profile("Dog", "Poodle", "F", "", "berlin, germany"),
            ),
            (profile("", "", "", "", ""), profile("Dog", "Lab", "M", "Black", "NY")),
        ];

        for (a, b) in &cases {
            assert_eq!(
                attribute_match_score(a, b, &weights),
                attribute_match_score(b, a, &weights)
            );
        }
    }

    #[test]
    fn test_score_within_bounds() {
        let weights = AttributeWeights::default();
        let a = profile("Dog", "Lab", "M", "Black", "Brooklyn, NY");
        let b = profile("dog", "Lab", "F", "Black", "NY");

        let score = attribute_match_score(&a, &b, &weights);
        assert!(score <= weights.max_score());
    }

    #[test]
    fn test_location_substring_either_direction() {
        let weights = AttributeWeights::default();
        let narrow = profile("", "", "", "", "Brooklyn, NY");
        let broad = profile("", "", "", "", "ny");

        assert_eq!(attribute_match_score(&narrow, &broad, &weights), 2);
        assert_eq!(attribute_match_score(&broad, &narrow, &weights), 2);
    }

    #[test]
    fn test_same_species_case_insensitive() {
        let a = profile(" DOG ", "", "", "", "");
        let b = profile("dog", "", "", "", "");
        assert!(same_species(&a, &b));
    }
}
