//! Brewing guide inputs.

use crate::lookup_key;

lookup_key! {
    /// Brewing method supported by the brewing guide.
    pub enum BrewMethod("brew method") {
        Pourover => "pourover",
        FrenchPress => "french-press",
        Espresso => "espresso",
        ColdBrew => "cold-brew",
        Aeropress => "aeropress",
        MokaPot => "moka-pot",
    }
}

lookup_key! {
    /// Brew strength; selects the water-to-coffee ratio.
    pub enum Strength("strength") {
        Light => "light",
        Medium => "medium",
        Strong => "strong",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brew_method_keys() {
        assert_eq!(
            BrewMethod::keys(),
            vec![
                "pourover",
                "french-press",
                "espresso",
                "cold-brew",
                "aeropress",
                "moka-pot"
            ]
        );
    }

    #[test]
    fn test_brew_method_serde_uses_kebab_case() {
        let json = serde_json::to_string(&BrewMethod::FrenchPress).expect("serialize");
        assert_eq!(json, "\"french-press\"");

        let parsed: BrewMethod = serde_json::from_str("\"moka-pot\"").expect("deserialize");
        assert_eq!(parsed, BrewMethod::MokaPot);
    }

    #[test]
    fn test_strength_from_str_rejects_unknown() {
        let err = "extra-strong".parse::<Strength>().unwrap_err();
        assert_eq!(err.to_string(), "invalid strength: extra-strong");
    }
}
